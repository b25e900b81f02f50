//! Keeper field enumeration.

use appscan_parser::TypeDecl;

use crate::types::KeeperField;

/// Named fields declared directly on `decl` whose type's base name ends
/// with `suffix`, in declaration order. Embedded fields are never keepers.
#[must_use]
pub fn keeper_fields(decl: &TypeDecl, suffix: &str) -> Vec<KeeperField> {
    decl.fields()
        .iter()
        .filter(|field| !field.is_embedded())
        .filter(|field| {
            field
                .ty
                .named_parts()
                .is_some_and(|(_, name)| name.ends_with(suffix))
        })
        .flat_map(|field| {
            let type_name = field.type_text.trim_start_matches('*').to_string();
            field.names.iter().map(move |name| KeeperField {
                name: name.clone(),
                type_name: type_name.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use appscan_parser::extractors::go::lower;
    use appscan_parser::parser::parse_source;
    use pretty_assertions::assert_eq;
    use std::path::Path;

    fn app_decl(source: &str) -> TypeDecl {
        let tree = parse_source(source);
        let file = lower(&tree, Path::new("app.go"), &[]).expect("lower");
        file.types()
            .find(|t| t.name == "App")
            .cloned()
            .expect("App type")
    }

    fn pairs(fields: &[KeeperField]) -> Vec<(&str, &str)> {
        fields
            .iter()
            .map(|f| (f.name.as_str(), f.type_name.as_str()))
            .collect()
    }

    #[test]
    fn keeper_fields_in_declaration_order() {
        let decl = app_decl(
            "package app\n\ntype App struct {\n\t*baseapp.BaseApp\n\n\tAccountKeeper authkeeper.AccountKeeper\n\tBankKeeper    *bankkeeper.BaseKeeper\n\tcdc           *codec.LegacyAmino\n\tScopedIBCKeeper, ScopedTransferKeeper capabilitykeeper.ScopedKeeper\n\tlocalKeeper   Keeper\n}\n",
        );
        assert_eq!(
            pairs(&keeper_fields(&decl, "Keeper")),
            vec![
                ("AccountKeeper", "authkeeper.AccountKeeper"),
                ("BankKeeper", "bankkeeper.BaseKeeper"),
                ("ScopedIBCKeeper", "capabilitykeeper.ScopedKeeper"),
                ("ScopedTransferKeeper", "capabilitykeeper.ScopedKeeper"),
                ("localKeeper", "Keeper"),
            ]
        );
    }

    #[test]
    fn embedded_keeper_is_not_a_field() {
        let decl = app_decl("package app\n\ntype App struct {\n\t*govkeeper.Keeper\n\tkeeper.Keeper\n}\n");
        assert!(keeper_fields(&decl, "Keeper").is_empty());
    }

    #[test]
    fn generic_keeper_type_keeps_arguments_in_name() {
        let decl = app_decl("package app\n\ntype App struct {\n\tStore collections.MapKeeper[string, int]\n}\n");
        assert_eq!(
            pairs(&keeper_fields(&decl, "Keeper")),
            vec![("Store", "collections.MapKeeper[string, int]")]
        );
    }

    #[test]
    fn configurable_suffix() {
        let decl = app_decl("package app\n\ntype App struct {\n\tBank bank.Store\n\tAuth auth.Keeper\n}\n");
        assert_eq!(pairs(&keeper_fields(&decl, "Store")), vec![("Bank", "bank.Store")]);
    }

    #[test]
    fn non_struct_has_no_fields() {
        let decl = app_decl("package app\n\ntype App = Base\n");
        assert!(keeper_fields(&decl, "Keeper").is_empty());
    }
}
