//! Structural capability matching through embedding chains.

use std::collections::{HashSet, VecDeque};

use appscan_parser::{SourceFile, TypeBody, TypeDecl, TypeExpr};

use crate::options::{DiscoveryOptions, ExternalType, MethodSignature, split_qualified};
use crate::resolver::SymbolIndex;
use crate::types::{CapabilityReport, Provided, TypeRef};

/// A type reachable from a candidate.
#[derive(Debug, Clone, Copy)]
enum TypeNode<'t, 'o> {
    InTree {
        unit: &'t str,
        decl: &'t TypeDecl,
        file: &'t SourceFile,
    },
    External {
        path: &'o str,
        name: &'o str,
        ty: &'o ExternalType,
    },
}

impl TypeNode<'_, '_> {
    fn type_ref(&self) -> TypeRef {
        match self {
            Self::InTree { unit, decl, .. } => TypeRef::new(*unit, &decl.name),
            Self::External { path, name, .. } => TypeRef::new(*path, *name),
        }
    }
}

/// How far the walk has settled one capability.
#[derive(Debug, Clone)]
enum Slot {
    Open,
    Provided(TypeRef),
    /// A shallower method of the same name with another signature hides
    /// every deeper one.
    Hidden,
}

/// Checks candidates against the configured capability set.
pub struct CapabilityMatcher<'t, 'o> {
    index: &'t SymbolIndex<'t>,
    options: &'o DiscoveryOptions,
}

impl<'t, 'o> CapabilityMatcher<'t, 'o> {
    #[must_use]
    pub const fn new(index: &'t SymbolIndex<'t>, options: &'o DiscoveryOptions) -> Self {
        Self { index, options }
    }

    /// Walk `decl` and its embedded bases breadth first. The shallowest type
    /// declaring a method of a capability's name settles it: provided when the
    /// signature is compatible, missing otherwise.
    #[must_use]
    pub fn check(&self, unit: &'t str, decl: &'t TypeDecl, file: &'t SourceFile) -> CapabilityReport {
        let required = &self.options.capabilities;
        let mut slots = vec![Slot::Open; required.len()];
        let mut bases = Vec::new();

        let root = TypeNode::InTree { unit, decl, file };
        let mut visited: HashSet<TypeRef> = HashSet::from([root.type_ref()]);
        let mut queue = VecDeque::from([(root, 0usize)]);

        while let Some((node, depth)) = queue.pop_front() {
            let methods = self.methods(&node);
            let provider = node.type_ref();
            for (slot, capability) in slots.iter_mut().zip(required) {
                if !matches!(slot, Slot::Open) {
                    continue;
                }
                let mut named = methods.iter().filter(|m| m.name == capability.name).peekable();
                if named.peek().is_none() {
                    continue;
                }
                *slot = if named.any(|m| capability.is_compatible(m)) {
                    Slot::Provided(provider.clone())
                } else {
                    tracing::debug!(
                        ty = %provider,
                        capability = %capability.name,
                        "incompatible signature hides deeper methods"
                    );
                    Slot::Hidden
                };
            }
            if depth >= self.options.max_embed_depth {
                tracing::debug!(ty = %provider, depth, "embedding depth limit reached");
                continue;
            }
            for base in self.bases(&node) {
                if visited.insert(base.type_ref()) {
                    if matches!(base, TypeNode::InTree { .. }) {
                        bases.push(base.type_ref());
                    }
                    queue.push_back((base, depth + 1));
                }
            }
        }

        let candidate = TypeRef::new(unit, &decl.name);
        let mut satisfied = Vec::new();
        let mut missing = Vec::new();
        for (capability, slot) in required.iter().zip(slots) {
            match slot {
                Slot::Provided(provider) => satisfied.push(Provided {
                    capability: capability.name.clone(),
                    provider,
                }),
                Slot::Open | Slot::Hidden => missing.push(capability.name.clone()),
            }
        }
        CapabilityReport {
            candidate,
            satisfied,
            missing,
            bases,
        }
    }

    /// Receiver methods of an in-tree type, plus the method elements when it
    /// is an interface.
    fn methods(&self, node: &TypeNode<'t, 'o>) -> Vec<MethodSignature> {
        match *node {
            TypeNode::InTree { unit, decl, .. } => {
                let mut methods: Vec<MethodSignature> = self
                    .index
                    .methods_of(unit, &decl.name)
                    .iter()
                    .map(|m| {
                        MethodSignature::new(
                            m.decl.name.clone(),
                            Some(m.decl.param_arity()),
                            Some(m.decl.result_arity),
                        )
                    })
                    .collect();
                if let TypeBody::Interface(body) = &decl.body {
                    methods.extend(body.methods.iter().map(|m| {
                        MethodSignature::new(
                            m.name.clone(),
                            Some(m.param_arity),
                            Some(m.result_arity),
                        )
                    }));
                }
                methods
            }
            TypeNode::External { ty, .. } => ty.methods.clone(),
        }
    }

    /// Types whose methods `node` inherits: embedded fields of a struct, the
    /// interfaces an interface embeds, the target of an alias, the declared
    /// embeds of an external type.
    fn bases(&self, node: &TypeNode<'t, 'o>) -> Vec<TypeNode<'t, 'o>> {
        match *node {
            TypeNode::InTree { unit, decl, file } => {
                let embedded: Vec<&TypeExpr> = match &decl.body {
                    TypeBody::Struct(fields) => fields
                        .iter()
                        .filter(|f| f.is_embedded())
                        .map(|f| &f.ty)
                        .collect(),
                    TypeBody::Interface(body) => body.embeds.iter().collect(),
                    TypeBody::Alias(target) => vec![target],
                    TypeBody::Defined(_) => Vec::new(),
                };
                embedded
                    .into_iter()
                    .filter_map(|ty| {
                        let resolved = self.resolve_type(unit, file, ty);
                        if resolved.is_none() {
                            tracing::debug!(
                                ty = %ty,
                                owner = %decl.name,
                                "embedded type not resolvable, skipped"
                            );
                        }
                        resolved
                    })
                    .collect()
            }
            TypeNode::External { ty, .. } => ty
                .embeds
                .iter()
                .filter_map(|qualified| {
                    let (path, name) = split_qualified(qualified)?;
                    self.in_tree_type(path, name)
                        .or_else(|| self.external_type(path, name))
                })
                .collect(),
        }
    }

    /// Resolve a type written in `file` of `unit`.
    fn resolve_type(
        &self,
        unit: &'t str,
        file: &'t SourceFile,
        ty: &TypeExpr,
    ) -> Option<TypeNode<'t, 'o>> {
        let (qualifier, name) = ty.named_parts()?;
        let path = match qualifier {
            None => unit,
            Some(q) => self.index.import_path(file, q)?,
        };
        self.in_tree_type(path, name)
            .or_else(|| self.external_type(path, name))
    }

    fn in_tree_type(&self, path: &str, name: &str) -> Option<TypeNode<'t, 'o>> {
        let symbol = self.index.lookup(path, name)?;
        let decl = symbol.as_type()?;
        let unit = self.index.loaded_unit(path)?.name.as_str();
        Some(TypeNode::InTree {
            unit,
            decl,
            file: symbol.file,
        })
    }

    fn external_type(&self, path: &str, name: &str) -> Option<TypeNode<'t, 'o>> {
        let ty = self.options.external_type(path, name)?;
        let (path, name) = split_qualified(&ty.name)?;
        Some(TypeNode::External { path, name, ty })
    }
}
