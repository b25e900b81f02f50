//! Discovery knobs: the capability set, registry constructors, the external
//! type registry and the keeper naming convention.
//!
//! Framework names live here rather than in code so projects built on a
//! fork of the SDK can be scanned by configuration alone.

use serde::{Deserialize, Serialize};

const fn default_max_embed_depth() -> usize {
    16
}

const fn default_max_eval_depth() -> usize {
    64
}

fn default_keeper_suffix() -> String {
    "Keeper".to_string()
}

fn default_registry_constructors() -> Vec<String> {
    vec!["github.com/cosmos/cosmos-sdk/types/module.NewBasicManager".to_string()]
}

fn default_capabilities() -> Vec<MethodSignature> {
    vec![
        MethodSignature::new("Name", Some(0), Some(1)),
        MethodSignature::new("LegacyAmino", Some(0), Some(1)),
        MethodSignature::new("AppCodec", Some(0), Some(1)),
        MethodSignature::new("InterfaceRegistry", Some(0), Some(1)),
        MethodSignature::new("GetKey", Some(1), Some(1)),
        MethodSignature::new("BeginBlocker", None, None),
        MethodSignature::new("EndBlocker", None, None),
        MethodSignature::new("InitChainer", None, None),
        MethodSignature::new("RegisterAPIRoutes", Some(2), Some(0)),
    ]
}

fn default_external_types() -> Vec<ExternalType> {
    vec![
        ExternalType {
            name: "github.com/cosmos/cosmos-sdk/runtime.App".to_string(),
            methods: vec![
                MethodSignature::new("BeginBlocker", None, None),
                MethodSignature::new("EndBlocker", None, None),
                MethodSignature::new("InitChainer", None, None),
            ],
            embeds: vec!["github.com/cosmos/cosmos-sdk/baseapp.BaseApp".to_string()],
        },
        ExternalType {
            name: "github.com/cosmos/cosmos-sdk/baseapp.BaseApp".to_string(),
            methods: vec![MethodSignature::new("Name", Some(0), Some(1))],
            embeds: Vec::new(),
        },
    ]
}

/// A required (or provided) method: name plus parameter/result arity.
///
/// `None` leaves an arity unconstrained.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct MethodSignature {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<usize>,
}

impl MethodSignature {
    pub fn new(name: impl Into<String>, params: Option<usize>, results: Option<usize>) -> Self {
        Self {
            name: name.into(),
            params,
            results,
        }
    }

    /// Same name, and each arity equal or unconstrained on either side.
    #[must_use]
    pub fn is_compatible(&self, other: &Self) -> bool {
        fn arity_matches(a: Option<usize>, b: Option<usize>) -> bool {
            match (a, b) {
                (Some(a), Some(b)) => a == b,
                _ => true,
            }
        }
        self.name == other.name
            && arity_matches(self.params, other.params)
            && arity_matches(self.results, other.results)
    }
}

/// A type declared outside the loaded tree, described by what it provides.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ExternalType {
    /// Qualified name, `import/path.Type`.
    pub name: String,
    #[serde(default)]
    pub methods: Vec<MethodSignature>,
    /// Qualified names of the types it embeds.
    #[serde(default)]
    pub embeds: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DiscoveryOptions {
    /// Methods the entry type must expose, directly or through embedding.
    #[serde(default = "default_capabilities")]
    pub capabilities: Vec<MethodSignature>,

    /// Module registry constructors, `import/path.Function`.
    #[serde(default = "default_registry_constructors")]
    pub registry_constructors: Vec<String>,

    #[serde(default = "default_external_types")]
    pub external_types: Vec<ExternalType>,

    /// Type-name suffix marking keeper fields.
    #[serde(default = "default_keeper_suffix")]
    pub keeper_suffix: String,

    /// Embedding levels followed when looking for a capability.
    #[serde(default = "default_max_embed_depth")]
    pub max_embed_depth: usize,

    /// Reference hops followed when evaluating the module list.
    #[serde(default = "default_max_eval_depth")]
    pub max_eval_depth: usize,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            capabilities: default_capabilities(),
            registry_constructors: default_registry_constructors(),
            external_types: default_external_types(),
            keeper_suffix: default_keeper_suffix(),
            max_embed_depth: default_max_embed_depth(),
            max_eval_depth: default_max_eval_depth(),
        }
    }
}

impl DiscoveryOptions {
    /// Constructor function names, for call-site tracking during load.
    #[must_use]
    pub fn tracked_calls(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .registry_constructors
            .iter()
            .filter_map(|c| split_qualified(c))
            .map(|(_, name)| name.to_string())
            .collect();
        names.sort();
        names.dedup();
        names
    }

    /// Registry constructors as `(import path, function)` pairs.
    pub fn constructors(&self) -> impl Iterator<Item = (&str, &str)> {
        self.registry_constructors
            .iter()
            .filter_map(|c| split_qualified(c))
    }

    #[must_use]
    pub fn external_type(&self, path: &str, name: &str) -> Option<&ExternalType> {
        self.external_types
            .iter()
            .find(|t| split_qualified(&t.name) == Some((path, name)))
    }
}

/// Split `import/path.Name` at the last `.` following the last `/`.
///
/// Returns `None` when either half would be empty.
#[must_use]
pub fn split_qualified(qualified: &str) -> Option<(&str, &str)> {
    let last_segment = qualified.rfind('/').map_or(0, |i| i + 1);
    let dot = last_segment + qualified[last_segment..].rfind('.')?;
    let (path, name) = (&qualified[..dot], &qualified[dot + 1..]);
    if path.is_empty() || name.is_empty() {
        return None;
    }
    Some((path, name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_are_correct() {
        let options = DiscoveryOptions::default();
        assert_eq!(options.capabilities.len(), 9);
        assert_eq!(options.keeper_suffix, "Keeper");
        assert_eq!(options.tracked_calls(), vec!["NewBasicManager".to_string()]);
        assert!(
            options
                .external_type("github.com/cosmos/cosmos-sdk/baseapp", "BaseApp")
                .is_some()
        );
    }

    #[test]
    fn split_qualified_uses_last_segment_dot() {
        assert_eq!(
            split_qualified("gopkg.in/yaml.v3.Node"),
            Some(("gopkg.in/yaml.v3", "Node"))
        );
        assert_eq!(
            split_qualified("github.com/cosmos/cosmos-sdk/types/module.NewBasicManager"),
            Some(("github.com/cosmos/cosmos-sdk/types/module", "NewBasicManager"))
        );
        assert_eq!(split_qualified("local.Type"), Some(("local", "Type")));
        assert_eq!(split_qualified("NoDot"), None);
        assert_eq!(split_qualified("trailing."), None);
    }

    #[test]
    fn unconstrained_arity_is_compatible() {
        let required = MethodSignature::new("BeginBlocker", None, None);
        let provided = MethodSignature::new("BeginBlocker", Some(1), Some(2));
        assert!(required.is_compatible(&provided));
        assert!(provided.is_compatible(&required));
    }

    #[test]
    fn arity_mismatch_is_incompatible() {
        let required = MethodSignature::new("GetKey", Some(1), Some(1));
        assert!(!required.is_compatible(&MethodSignature::new("GetKey", Some(0), Some(1))));
        assert!(!required.is_compatible(&MethodSignature::new("Getkey", Some(1), Some(1))));
    }

    #[test]
    fn deserializes_partial_sections() {
        let options: DiscoveryOptions = serde_json::from_str(
            r#"{"keeper_suffix":"Store","capabilities":[{"name":"Name","params":0}]}"#,
        )
        .expect("deserialize");
        assert_eq!(options.keeper_suffix, "Store");
        assert_eq!(options.capabilities, vec![MethodSignature::new("Name", Some(0), None)]);
        assert_eq!(options.max_eval_depth, 64);
    }
}
