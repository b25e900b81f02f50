use pretty_assertions::assert_eq;

use super::*;

fn var_kind(file: &SourceFile, name: &str) -> ExprKind {
    find_var(file, name).value.as_ref().expect("value").kind.clone()
}

#[test]
fn composite_literal_elements() {
    let file = lower_source(
        "package x\n\nvar l = []module.AppModuleBasic{auth.AppModuleBasic{}, &bank.AppModuleBasic{}, nil}\n",
    );
    let ExprKind::Composite { ty, elements } = var_kind(&file, "l") else {
        panic!("expected composite literal");
    };
    assert_eq!(ty.to_string(), "[]module.AppModuleBasic");
    assert_eq!(elements.len(), 3);
    assert!(matches!(elements[0].kind, ExprKind::Composite { .. }));
    assert!(matches!(elements[1].kind, ExprKind::AddressOf(_)));
    assert!(matches!(elements[2].kind, ExprKind::Nil));
    assert_eq!(elements[0].text, "auth.AppModuleBasic{}");
}

#[test]
fn keyed_elements_are_opaque() {
    let file = lower_source("package x\n\nvar m = T{A: 1}\n");
    let ExprKind::Composite { elements, .. } = var_kind(&file, "m") else {
        panic!("expected composite literal");
    };
    assert!(matches!(&elements[0].kind, ExprKind::Opaque(k) if k == "keyed_element"));
}

#[test]
fn selector_and_ident() {
    let file = lower_source("package x\n\nvar a = other.List\nvar b = a\n");
    assert!(matches!(
        var_kind(&file, "a"),
        ExprKind::Selector { ref qualifier, ref name } if qualifier == "other" && name == "List"
    ));
    assert!(matches!(var_kind(&file, "b"), ExprKind::Ident(ref n) if n == "a"));
}

#[test]
fn call_with_spread_argument() {
    let file = lower_source("package x\n\nvar l = append(base, extra...)\n");
    let ExprKind::Call { callee, args } = var_kind(&file, "l") else {
        panic!("expected call");
    };
    assert!(matches!(callee.kind, ExprKind::Ident(ref n) if n == "append"));
    assert_eq!(args.len(), 2);
    assert!(!args[0].spread);
    assert!(args[1].spread);
    assert_eq!(args[1].value.text, "extra");
}

#[test]
fn parenthesized_expression_unwraps() {
    let file = lower_source("package x\n\nvar a = (b)\n");
    assert!(matches!(var_kind(&file, "a"), ExprKind::Ident(ref n) if n == "b"));
}

#[test]
fn unsupported_shapes_are_opaque() {
    let file = lower_source("package x\n\nvar a = 1 + 2\nvar b = f()[0]\n");
    assert!(matches!(var_kind(&file, "a"), ExprKind::Opaque(_)));
    assert!(matches!(var_kind(&file, "b"), ExprKind::Opaque(_)));
}

#[test]
fn expression_location_is_one_based() {
    let file = lower_source("package x\n\nvar a = b\n");
    let value = find_var(&file, "a").value.as_ref().expect("value");
    assert_eq!(value.location.line, 3);
    assert_eq!(value.location.to_string(), "app/app.go:3");
}
