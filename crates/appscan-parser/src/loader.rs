//! Source tree loading: walk, parallel parse, group into compilation units.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::cancel::Cancellation;
use crate::error::{ParseError, ParserError};
use crate::extractors::go;
use crate::gomod::{self, ModuleRoot};
use crate::parser::parse_source;
use crate::test_files::has_generated_header;
use crate::types::SourceFile;
use crate::walk::{WalkOptions, collect_files};

/// What to walk and which call sites to record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoadOptions {
    #[serde(default)]
    pub walk: WalkOptions,
    /// Function names whose call sites are recorded on each [`SourceFile`].
    #[serde(default)]
    pub tracked_calls: Vec<String>,
}

/// One compilation unit: the non-test `.go` files of a directory.
#[derive(Debug, Clone)]
pub struct Unit {
    /// Import path, or root-relative directory without a `go.mod`.
    pub name: String,
    /// Package clause shared by every file.
    pub package: String,
    /// Directory relative to the root.
    pub dir: PathBuf,
    /// Files sorted by path.
    pub files: Vec<SourceFile>,
}

/// Every unit under a root, plus the files that could not be loaded.
#[derive(Debug, Clone)]
pub struct SourceTree {
    pub root: PathBuf,
    pub units: BTreeMap<String, Unit>,
    /// Sorted by path, then line.
    pub parse_errors: Vec<ParseError>,
}

enum Loaded {
    File(SourceFile),
    Generated,
    Failed(ParseError),
    Cancelled,
}

impl SourceTree {
    /// Walk `root`, parse every eligible Go file, and group the results.
    ///
    /// Files are parsed on the rayon pool. Malformed files are recorded in
    /// [`SourceTree::parse_errors`] and skipped.
    ///
    /// # Errors
    ///
    /// - `ParserError::InvalidRoot` if `root` is not a directory.
    /// - `ParserError::InvalidGlob` / `ParserError::Walk` from the walker.
    /// - `ParserError::Cancelled` if `cancel` fires before loading completes.
    pub fn load(
        root: &Path,
        options: &LoadOptions,
        cancel: &Cancellation,
    ) -> Result<Self, ParserError> {
        if !root.is_dir() {
            return Err(ParserError::InvalidRoot {
                path: root.to_path_buf(),
                reason: "not a directory".to_string(),
            });
        }
        options.walk.validate()?;

        let files = collect_files(root, &options.walk)?;
        if cancel.is_cancelled() {
            return Err(ParserError::Cancelled);
        }
        tracing::debug!(
            root = %root.display(),
            sources = files.sources.len(),
            manifests = files.manifests.len(),
            "walk complete"
        );

        let mut parse_errors = Vec::new();
        let module_roots = read_module_roots(root, &files.manifests, &mut parse_errors);

        let loaded: Vec<Loaded> = files
            .sources
            .par_iter()
            .map(|path| {
                if cancel.is_cancelled() {
                    return Loaded::Cancelled;
                }
                load_file(root, path, &options.tracked_calls)
            })
            .collect();

        if cancel.is_cancelled() || loaded.iter().any(|l| matches!(l, Loaded::Cancelled)) {
            return Err(ParserError::Cancelled);
        }

        let mut parsed = Vec::with_capacity(loaded.len());
        for outcome in loaded {
            match outcome {
                Loaded::File(file) => parsed.push(file),
                Loaded::Failed(err) => {
                    tracing::debug!(error = %err, "skipping malformed file");
                    parse_errors.push(err);
                }
                Loaded::Generated | Loaded::Cancelled => {}
            }
        }

        let units = group_units(parsed, &module_roots, &mut parse_errors);
        parse_errors.sort_by(|a, b| (&a.path, a.line).cmp(&(&b.path, b.line)));

        tracing::debug!(
            units = units.len(),
            parse_errors = parse_errors.len(),
            "source tree loaded"
        );

        Ok(Self {
            root: root.to_path_buf(),
            units,
            parse_errors,
        })
    }

    #[must_use]
    pub fn unit(&self, name: &str) -> Option<&Unit> {
        self.units.get(name)
    }

    /// Number of `.go` files successfully loaded.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.units.values().map(|u| u.files.len()).sum()
    }
}

fn relative(root: &Path, path: &Path) -> PathBuf {
    path.strip_prefix(root).unwrap_or(path).to_path_buf()
}

fn read_module_roots(
    root: &Path,
    manifests: &[PathBuf],
    parse_errors: &mut Vec<ParseError>,
) -> Vec<ModuleRoot> {
    let mut roots = Vec::new();
    for manifest in manifests {
        let rel = relative(root, manifest);
        let contents = match std::fs::read_to_string(manifest) {
            Ok(contents) => contents,
            Err(e) => {
                parse_errors.push(ParseError::new(rel, None, format!("unreadable go.mod: {e}")));
                continue;
            }
        };
        match gomod::module_path(&contents) {
            Some(path) => roots.push(ModuleRoot {
                dir: rel.parent().map(Path::to_path_buf).unwrap_or_default(),
                path,
            }),
            None => parse_errors.push(ParseError::new(rel, None, "go.mod has no module directive")),
        }
    }
    roots
}

fn load_file(root: &Path, path: &Path, tracked_calls: &[String]) -> Loaded {
    let rel = relative(root, path);
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => return Loaded::Failed(ParseError::new(rel, None, format!("unreadable: {e}"))),
    };
    let Ok(source) = String::from_utf8(bytes) else {
        return Loaded::Failed(ParseError::new(rel, None, "not valid UTF-8"));
    };
    if has_generated_header(&source) {
        tracing::trace!(path = %rel.display(), "skipping file with generated header");
        return Loaded::Generated;
    }

    let tree = parse_source(&source);
    match go::lower(&tree, &rel, tracked_calls) {
        Ok(file) => Loaded::File(file),
        Err(err) => Loaded::Failed(err),
    }
}

/// Group files by directory. `files` must be sorted by path; the first file
/// of a directory fixes its package name.
fn group_units(
    files: Vec<SourceFile>,
    module_roots: &[ModuleRoot],
    parse_errors: &mut Vec<ParseError>,
) -> BTreeMap<String, Unit> {
    let mut units: BTreeMap<String, Unit> = BTreeMap::new();
    for mut file in files {
        let dir = file.path.parent().map(Path::to_path_buf).unwrap_or_default();
        let name = gomod::unit_name(&dir, module_roots);
        let unit = units.entry(name.clone()).or_insert_with(|| Unit {
            name: name.clone(),
            package: file.package.clone(),
            dir,
            files: Vec::new(),
        });
        if unit.package != file.package {
            parse_errors.push(ParseError::new(
                file.path.clone(),
                None,
                format!(
                    "package `{}` conflicts with package `{}` of {}",
                    file.package, unit.package, unit.name
                ),
            ));
            continue;
        }
        file.unit = name;
        unit.files.push(file);
    }
    units
}
