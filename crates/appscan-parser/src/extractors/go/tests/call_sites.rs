use pretty_assertions::assert_eq;

use super::*;

#[test]
fn tracked_calls_collected_at_package_level() {
    let file = lower_tracking(FIXTURE, &["NewBasicManager"]);
    assert_eq!(file.call_sites.len(), 1);
    let site = &file.call_sites[0];
    assert!(site.enclosing.is_none());
    let ExprKind::Call { args, .. } = &site.call.kind else {
        panic!("expected call");
    };
    assert_eq!(args.len(), 3);
    assert!(args[2].spread);
}

#[test]
fn untracked_calls_ignored() {
    let file = lower_tracking(FIXTURE, &["NewManager"]);
    assert!(file.call_sites.is_empty());
    assert!(lower_source(FIXTURE).call_sites.is_empty());
}

#[test]
fn enclosing_function_and_method() {
    let source = "package x\n\nfunc setup() {\n\tNewBasicManager()\n}\n\nfunc (a *App) init() {\n\tm.NewBasicManager()\n}\n";
    let file = lower_tracking(source, &["NewBasicManager"]);
    assert_eq!(file.call_sites.len(), 2);
    let first = file.call_sites[0].enclosing.as_ref().expect("in function");
    assert_eq!(first.name, "setup");
    assert_eq!(first.receiver, None);
    let second = file.call_sites[1].enclosing.as_ref().expect("in method");
    assert_eq!(second.name, "init");
    assert_eq!(second.receiver.as_deref(), Some("App"));
    assert!(file.enclosing_function(second).is_some());
}

#[test]
fn nested_tracked_call_found() {
    let source = "package x\n\nvar m = wrap(module.NewBasicManager(a.B{}))\n";
    let file = lower_tracking(source, &["NewBasicManager"]);
    assert_eq!(file.call_sites.len(), 1);
    assert_eq!(file.call_sites[0].call.text, "module.NewBasicManager(a.B{})");
}
