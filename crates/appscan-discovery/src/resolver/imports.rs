use std::collections::HashMap;

use appscan_parser::SourceFile;

/// The package name an import path conventionally binds: its last segment,
/// skipping a `/vN` major-version suffix, with a `.vN` suffix removed
/// (`gopkg.in/yaml.v3` → `yaml`).
#[must_use]
pub fn conventional_name(path: &str) -> &str {
    let mut segments = path.rsplit('/');
    let mut last = segments.next().unwrap_or(path);
    if is_major_version(last)
        && let Some(previous) = segments.next()
    {
        last = previous;
    }
    match last.split_once('.') {
        Some((head, tail)) if is_major_version(tail) => head,
        _ => last,
    }
}

fn is_major_version(segment: &str) -> bool {
    segment
        .strip_prefix('v')
        .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
}

/// Map a qualifier used in `file` to the import path it names.
///
/// An explicit alias wins. Otherwise an in-tree unit's package clause is
/// used (`packages` maps unit name to package name), then the conventional
/// name of the path. Blank and dot imports never bind a qualifier.
pub(super) fn import_path<'f>(
    file: &'f SourceFile,
    qualifier: &str,
    packages: &HashMap<&str, &str>,
) -> Option<&'f str> {
    if qualifier == "_" || qualifier == "." {
        return None;
    }
    if let Some(spec) = file
        .imports
        .iter()
        .find(|spec| spec.alias.as_deref() == Some(qualifier))
    {
        return Some(spec.path.as_str());
    }

    let unaliased = || file.imports.iter().filter(|spec| spec.alias.is_none());
    if let Some(spec) = unaliased().find(|spec| packages.get(spec.path.as_str()) == Some(&qualifier)) {
        return Some(spec.path.as_str());
    }
    unaliased()
        .filter(|spec| !packages.contains_key(spec.path.as_str()))
        .find(|spec| conventional_name(&spec.path) == qualifier)
        .map(|spec| spec.path.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use appscan_parser::ImportSpec;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::path::PathBuf;

    #[rstest]
    #[case("github.com/cosmos/cosmos-sdk/types/module", "module")]
    #[case("github.com/cosmos/ibc-go/v8", "ibc-go")]
    #[case("github.com/cosmos/ibc-go/v8/modules/core", "core")]
    #[case("gopkg.in/yaml.v3", "yaml")]
    #[case("fmt", "fmt")]
    #[case("v2", "v2")]
    fn conventional_names(#[case] path: &str, #[case] expected: &str) {
        assert_eq!(conventional_name(path), expected);
    }

    fn file(imports: &[(Option<&str>, &str)]) -> SourceFile {
        SourceFile {
            path: PathBuf::from("app/app.go"),
            unit: "app".to_string(),
            package: "app".to_string(),
            imports: imports
                .iter()
                .map(|(alias, path)| ImportSpec {
                    alias: alias.map(ToString::to_string),
                    path: (*path).to_string(),
                })
                .collect(),
            declarations: Vec::new(),
            call_sites: Vec::new(),
        }
    }

    #[test]
    fn alias_wins() {
        let f = file(&[
            (Some("bankkeeper"), "github.com/cosmos/cosmos-sdk/x/bank/keeper"),
            (None, "github.com/cosmos/cosmos-sdk/x/staking/keeper"),
        ]);
        let packages = HashMap::new();
        assert_eq!(
            import_path(&f, "bankkeeper", &packages),
            Some("github.com/cosmos/cosmos-sdk/x/bank/keeper")
        );
        assert_eq!(
            import_path(&f, "keeper", &packages),
            Some("github.com/cosmos/cosmos-sdk/x/staking/keeper")
        );
    }

    #[test]
    fn in_tree_package_clause_overrides_path() {
        let f = file(&[(None, "example.com/chain/x/mint-v2")]);
        let packages = HashMap::from([("example.com/chain/x/mint-v2", "mint")]);
        assert_eq!(import_path(&f, "mint", &packages), Some("example.com/chain/x/mint-v2"));
        assert_eq!(import_path(&f, "mint-v2", &packages), None);
    }

    #[test]
    fn blank_and_dot_imports_bind_nothing() {
        let f = file(&[(Some("_"), "embed"), (Some("."), "fmt")]);
        let packages = HashMap::new();
        assert_eq!(import_path(&f, "embed", &packages), None);
        assert_eq!(import_path(&f, "fmt", &packages), None);
    }
}
