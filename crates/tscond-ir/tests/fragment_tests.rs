//! Fragment construction over realistic statements.

use tscond_common::Span;
use tscond_ir::{BinaryOperator, FragmentBuilder, FragmentError, NodeKind, SyntaxFragment};

fn build_if_optional_call() -> (SyntaxFragment, [tscond_ir::NodeId; 3]) {
    // if (user?.isActive()) { notify(); }
    let mut b = FragmentBuilder::new("if (user?.isActive()) { notify(); }");
    let user = b.identifier("user").unwrap();
    let access = b.property(user, "isActive").unwrap();
    let call = b.call(access, Vec::new()).unwrap();
    let notify = b.identifier("notify").unwrap();
    let notify_call = b.call(notify, Vec::new()).unwrap();
    let stmt = b.expression_statement(notify_call).unwrap();
    let block = b.block(vec![stmt]).unwrap();
    let root = b.if_statement(call, block, None).unwrap();
    (b.finish(root).unwrap(), [user, access, call])
}

#[test]
fn test_if_statement_with_optional_call() {
    let (fragment, [user, access, call]) = build_if_optional_call();
    assert_eq!(fragment.text(fragment.root()), "if (user?.isActive()) { notify(); }");
    assert_eq!(fragment.text(call), "user?.isActive()");
    assert_eq!(fragment.parent(user), Some(access));
    assert_eq!(fragment.parent(access), Some(call));
    assert_eq!(fragment.parent(call), Some(fragment.root()));
    assert!(matches!(
        fragment.kind(access),
        Some(NodeKind::PropertyAccess { optional: true, .. })
    ));
    assert!(matches!(
        fragment.kind(call),
        Some(NodeKind::Call { optional: false, .. })
    ));
}

#[test]
fn test_parentheses_and_prefix() {
    let mut b = FragmentBuilder::new("if (!(a || b)) {}");
    let a = b.identifier("a").unwrap();
    let bb = b.identifier("b").unwrap();
    let or = b.binary(a, "||", bb).unwrap();
    let paren = b.parenthesized(or).unwrap();
    let not = b.prefix("!", paren).unwrap();
    let block = b.block(Vec::new()).unwrap();
    let root = b.if_statement(not, block, None).unwrap();
    let fragment = b.finish(root).unwrap();

    assert_eq!(fragment.text(paren), "(a || b)");
    assert_eq!(fragment.text(not), "!(a || b)");
    assert_eq!(fragment.skip_parentheses(paren), or);
    assert_eq!(fragment.parent_skipping_parentheses(or), Some(not));
    assert!(matches!(
        fragment.kind(or),
        Some(NodeKind::Binary {
            op: BinaryOperator::Or,
            ..
        })
    ));
}

#[test]
fn test_comparison_and_coalesce() {
    let mut b = FragmentBuilder::new("const label = name ?? 'anonymous';");
    let label = b.identifier("label").unwrap();
    let name = b.identifier("name").unwrap();
    let fallback = b.string("'anonymous'").unwrap();
    let coalesce = b.binary(name, "??", fallback).unwrap();
    let root = b.variable_declaration(label, Some(coalesce)).unwrap();
    let fragment = b.finish(root).unwrap();
    assert_eq!(fragment.span(root), Some(Span::new(0, 34)));
    assert_eq!(fragment.text(coalesce), "name ?? 'anonymous'");
}

#[test]
fn test_loops() {
    let mut b = FragmentBuilder::new("for (let i = 0; i < n; i++) {}");
    let i = b.identifier("i").unwrap();
    let zero = b.number("0").unwrap();
    let init = b.variable_declaration(i, Some(zero)).unwrap();
    let i2 = b.identifier("i").unwrap();
    let n = b.identifier("n").unwrap();
    let cond = b.binary(i2, "<", n).unwrap();
    let i3 = b.identifier("i").unwrap();
    let incr = b.other(vec![i3]).unwrap();
    let body = b.block(Vec::new()).unwrap();
    let root = b.for_statement(Some(init), Some(cond), Some(incr), body).unwrap();
    let fragment = b.finish(root).unwrap();
    assert_eq!(fragment.text(init), "let i = 0;");
    assert_eq!(fragment.text(cond), "i < n");
    assert!(fragment.kind(root).is_some_and(NodeKind::is_loop));

    let mut b = FragmentBuilder::new("do { step(); } while (running);");
    let step = b.identifier("step").unwrap();
    let step_call = b.call(step, Vec::new()).unwrap();
    let step_stmt = b.expression_statement(step_call).unwrap();
    let body = b.block(vec![step_stmt]).unwrap();
    let running = b.identifier("running").unwrap();
    let root = b.do_while(body, running).unwrap();
    let fragment = b.finish(root).unwrap();
    assert_eq!(fragment.span(root), Some(Span::new(0, 31)));
}

#[test]
fn test_element_access_and_new() {
    let mut b = FragmentBuilder::new("const item = list?.[0] ?? new Item();");
    let item = b.identifier("item").unwrap();
    let list = b.identifier("list").unwrap();
    let zero = b.number("0").unwrap();
    let element = b.element(list, zero).unwrap();
    let class = b.identifier("Item").unwrap();
    let created = b.new_expression(class, Vec::new()).unwrap();
    let coalesce = b.binary(element, "??", created).unwrap();
    let root = b.variable_declaration(item, Some(coalesce)).unwrap();
    let fragment = b.finish(root).unwrap();
    assert_eq!(fragment.text(element), "list?.[0]");
    assert_eq!(fragment.text(created), "new Item()");
    assert!(matches!(
        fragment.kind(element),
        Some(NodeKind::ElementAccess { optional: true, .. })
    ));
}

#[test]
fn test_arrow_with_parenthesized_params() {
    let mut b = FragmentBuilder::new("items.find((item, index) => item.id === id);");
    let items = b.identifier("items").unwrap();
    let find = b.property(items, "find").unwrap();
    let item = b.identifier("item").unwrap();
    let index = b.identifier("index").unwrap();
    let item_use = b.identifier("item").unwrap();
    let id_access = b.property(item_use, "id").unwrap();
    let id = b.identifier("id").unwrap();
    let cmp = b.binary(id_access, "===", id).unwrap();
    let arrow = b.arrow(vec![item, index], cmp).unwrap();
    let call = b.call(find, vec![arrow]).unwrap();
    let root = b.expression_statement(call).unwrap();
    let fragment = b.finish(root).unwrap();
    assert_eq!(fragment.text(arrow), "(item, index) => item.id === id");
    assert_eq!(fragment.text(root), "items.find((item, index) => item.id === id);");
}

#[test]
fn test_missing_tokens_are_reported() {
    let mut b = FragmentBuilder::new("if (ready) {}");
    assert!(matches!(
        b.identifier("done"),
        Err(FragmentError::TokenNotFound { .. })
    ));
    let ready = b.identifier("ready").unwrap();
    assert!(matches!(
        b.while_statement(ready, ready),
        Err(FragmentError::TokenNotFound { .. })
    ));
    assert!(matches!(
        FragmentBuilder::new("").finish(tscond_ir::NodeId(0)),
        Err(FragmentError::EmptyText)
    ));
}
