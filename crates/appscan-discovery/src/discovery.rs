//! Discovery orchestration: load, index, match, select, extract.

use std::path::{Path, PathBuf};
use std::time::Instant;

use appscan_parser::{Cancellation, LoadOptions, SourceTree, TypeDecl, Unit, WalkOptions};

use crate::capability::CapabilityMatcher;
use crate::error::DiscoveryError;
use crate::fields::keeper_fields;
use crate::modules::extract_modules;
use crate::options::DiscoveryOptions;
use crate::resolver::SymbolIndex;
use crate::types::{CapabilityReport, Discovery};

/// A struct declaration checked against the capability set.
struct Candidate<'t> {
    unit: &'t Unit,
    decl: &'t TypeDecl,
    report: CapabilityReport,
}

/// Find the application entry type under `root` and extract its module list
/// and keeper fields.
///
/// `hint` (absolute, or relative to `root`) narrows the search to units at
/// or below a directory; a file hint narrows to the file's directory.
///
/// # Errors
///
/// Exactly one [`DiscoveryError`] describes why no single entry type could
/// be returned. Files that fail to parse are not errors; they are listed in
/// [`Discovery::parse_errors`].
pub fn discover(
    root: &Path,
    hint: Option<&Path>,
    walk: &WalkOptions,
    options: &DiscoveryOptions,
    cancel: &Cancellation,
) -> Result<Discovery, DiscoveryError> {
    let started = Instant::now();
    let hint_dir = hint.map(|h| hint_dir(root, h)).transpose()?;

    let load = LoadOptions {
        walk: walk.clone(),
        tracked_calls: options.tracked_calls(),
    };
    let tree = SourceTree::load(root, &load, cancel)?;
    let index = SymbolIndex::build(&tree);
    let matcher = CapabilityMatcher::new(&index, options);

    let mut candidates = Vec::new();
    for unit in tree.units.values() {
        if cancel.is_cancelled() {
            return Err(DiscoveryError::Cancelled);
        }
        for file in &unit.files {
            for decl in file.types() {
                // An uninstantiated generic struct cannot be the running app.
                if !decl.is_struct() || !decl.type_params.is_empty() {
                    continue;
                }
                let report = matcher.check(&unit.name, decl, file);
                tracing::trace!(
                    candidate = %report.candidate,
                    missing = report.missing.len(),
                    "capability check"
                );
                candidates.push(Candidate { unit, decl, report });
            }
        }
    }

    let qualifying = qualifying(&candidates);
    let in_scope = |candidate: &Candidate<'_>| {
        hint_dir
            .as_deref()
            .is_none_or(|dir| candidate.unit.dir.starts_with(dir))
    };
    let selected: Vec<&Candidate<'_>> = qualifying.into_iter().filter(|c| in_scope(*c)).collect();

    let entry = match selected.as_slice() {
        [one] => *one,
        [] => {
            let closest = near_miss(candidates.iter().filter(|c| in_scope(*c)));
            return Err(match (hint_dir.is_some(), closest) {
                (true, Some(report)) => DiscoveryError::Capability {
                    candidate: report.candidate.clone(),
                    missing: report.missing.clone(),
                },
                (_, closest) => DiscoveryError::NotFound {
                    searched_units: tree.units.len(),
                    parse_errors: tree.parse_errors.len(),
                    closest: closest.or_else(|| near_miss(candidates.iter())).cloned(),
                },
            });
        }
        many => {
            return Err(DiscoveryError::Ambiguous {
                candidates: many.iter().map(|c| c.report.candidate.clone()).collect(),
            });
        }
    };

    if cancel.is_cancelled() {
        return Err(DiscoveryError::Cancelled);
    }
    tracing::info!(entry = %entry.report.candidate, "entry type selected");

    let modules = extract_modules(&index, entry.unit, options)?;
    let keeper_fields = keeper_fields(entry.decl, &options.keeper_suffix);

    tracing::debug!(
        units = tree.units.len(),
        modules = modules.len(),
        keeper_fields = keeper_fields.len(),
        parse_errors = tree.parse_errors.len(),
        elapsed_ms = started.elapsed().as_millis(),
        "discovery complete"
    );

    Ok(Discovery {
        entry_type: entry.report.candidate.clone(),
        modules,
        keeper_fields,
        parse_errors: tree.parse_errors.clone(),
    })
}

/// Candidates satisfying the whole capability set, minus those another
/// qualifying candidate embeds: the outermost type is the application.
fn qualifying<'c, 't>(candidates: &'c [Candidate<'t>]) -> Vec<&'c Candidate<'t>> {
    let satisfied: Vec<&Candidate<'t>> = candidates
        .iter()
        .filter(|c| c.report.is_satisfied())
        .collect();
    satisfied
        .iter()
        .copied()
        .filter(|c| {
            !satisfied
                .iter()
                .any(|outer| outer.report.bases.contains(&c.report.candidate))
        })
        .collect()
}

/// The non-qualifying candidate missing the fewest capabilities, provided it
/// satisfies at least one. Ties go to the first in unit order.
fn near_miss<'c, 't: 'c>(
    candidates: impl Iterator<Item = &'c Candidate<'t>>,
) -> Option<&'c CapabilityReport> {
    candidates
        .map(|c| &c.report)
        .filter(|r| !r.is_satisfied() && !r.satisfied.is_empty())
        .min_by_key(|r| r.missing.len())
}

/// Directory of `hint` relative to `root`.
fn hint_dir(root: &Path, hint: &Path) -> Result<PathBuf, DiscoveryError> {
    let invalid = |reason: &str| DiscoveryError::InvalidPath {
        path: hint.to_path_buf(),
        reason: reason.to_string(),
    };
    let joined = if hint.is_absolute() {
        hint.to_path_buf()
    } else {
        root.join(hint)
    };
    let hint_abs = joined
        .canonicalize()
        .map_err(|_| invalid("does not exist"))?;
    let root_abs = root.canonicalize().map_err(|e| DiscoveryError::InvalidPath {
        path: root.to_path_buf(),
        reason: e.to_string(),
    })?;
    let dir = if hint_abs.is_file() {
        hint_abs.parent().map(Path::to_path_buf).unwrap_or_default()
    } else {
        hint_abs
    };
    dir.strip_prefix(&root_abs)
        .map(Path::to_path_buf)
        .map_err(|_| invalid("is outside the scanned root"))
}
