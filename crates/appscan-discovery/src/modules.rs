//! Module registry extraction.

use appscan_parser::{CallSite, ExprKind, SourceFile, Unit};

use crate::error::ResolutionError;
use crate::options::DiscoveryOptions;
use crate::resolver::{Evaluator, Frame, SymbolIndex};
use crate::types::TypeRef;

/// A recognised registry constructor call inside the entry unit.
struct RegistryCall<'t> {
    site: &'t CallSite,
    file: &'t SourceFile,
}

/// Evaluate the module list fed to the registry constructor of `unit`.
///
/// Package-level call sites win over calls inside function bodies; ties are
/// broken by file path, then line. A unit without any call yields an empty
/// list.
///
/// # Errors
///
/// Returns a [`ResolutionError`] when an argument of the chosen call cannot
/// be evaluated statically.
pub fn extract_modules<'t>(
    index: &'t SymbolIndex<'t>,
    unit: &'t Unit,
    options: &DiscoveryOptions,
) -> Result<Vec<TypeRef>, ResolutionError> {
    let mut calls = registry_calls(index, unit, options);
    calls.sort_by(|a, b| {
        (a.site.enclosing.is_some(), &a.file.path, a.site.call.location.line).cmp(&(
            b.site.enclosing.is_some(),
            &b.file.path,
            b.site.call.location.line,
        ))
    });

    let Some(chosen) = calls.first() else {
        tracing::warn!(unit = %unit.name, "no module registry constructor call found");
        return Ok(Vec::new());
    };
    if calls.len() > 1 {
        tracing::debug!(
            unit = %unit.name,
            calls = calls.len(),
            chosen = %chosen.site.call.location,
            "several registry constructor calls, using the first"
        );
    }

    let ExprKind::Call { args, .. } = &chosen.site.call.kind else {
        return Ok(Vec::new());
    };
    let function = chosen
        .site
        .enclosing
        .as_ref()
        .and_then(|enclosing| chosen.file.enclosing_function(enclosing));
    let frame = Frame::in_function(chosen.file, function);

    let modules = Evaluator::new(index, options.max_eval_depth).module_list(args, &frame)?;
    tracing::debug!(unit = %unit.name, modules = modules.len(), "module list resolved");
    Ok(modules)
}

fn registry_calls<'t>(
    index: &SymbolIndex<'t>,
    unit: &'t Unit,
    options: &DiscoveryOptions,
) -> Vec<RegistryCall<'t>> {
    let mut calls = Vec::new();
    for file in &unit.files {
        for site in &file.call_sites {
            let ExprKind::Call { callee, .. } = &site.call.kind else {
                continue;
            };
            let matches = match &callee.kind {
                ExprKind::Selector { qualifier, name } => {
                    index.import_path(file, qualifier).is_some_and(|path| {
                        options
                            .constructors()
                            .any(|(ctor_path, ctor)| ctor_path == path && ctor == name.as_str())
                    })
                }
                ExprKind::Ident(name) => options
                    .constructors()
                    .any(|(ctor_path, ctor)| ctor_path == unit.name.as_str() && ctor == name.as_str()),
                _ => false,
            };
            if matches {
                calls.push(RegistryCall { site, file });
            }
        }
    }
    calls
}
