//! End-to-end use of the facade: JSON options, a provider and a sink.

use tscond::ir::{ConstValue, FragmentBuilder, FragmentError, SourceExpression};
use tscond::{
    AnalysisSession, Body, ConditionCategory, ConditionOptions, Diagnostic, HostOptions, Span,
    SyntaxFragment, TypeId, TypeInterner, analyze_body,
};

const LOOP: &str = "while (true) {}";

fn parse(text: &str) -> Result<SyntaxFragment, FragmentError> {
    let mut b = FragmentBuilder::new(text);
    let yes = b.keyword_literal("true")?;
    let block = b.block(Vec::new())?;
    let root = b.while_statement(yes, block)?;
    b.finish(root)
}

fn loop_body() -> Body {
    let mut body = Body::new();
    let yes = body.constant(ConstValue::Boolean(true), TypeId::BOOLEAN, Some(Span::new(7, 11)));
    let test = body.truthiness_test(yes, Some(Span::new(7, 11)));
    body.if_stmt(test, SourceExpression::new(0, 1, 1, LOOP));
    body
}

fn run(options: ConditionOptions) -> Vec<Diagnostic> {
    let types = TypeInterner::new();
    let body = loop_body();
    let mut session = AnalysisSession::new();
    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    analyze_body(
        &types,
        &body,
        &parse,
        options,
        HostOptions::default(),
        &mut session,
        &mut diagnostics,
    );
    diagnostics
}

#[test]
fn test_constant_loop_reported_by_default() {
    let diagnostics = run(ConditionOptions::default());
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].category, ConditionCategory::AlwaysTruthy);
    assert_eq!(diagnostics[0].span, Span::new(7, 11));
}

#[test]
fn test_constant_loop_allowed_by_json_options() {
    let options = ConditionOptions::from_json(r#"{"allowConstantLoopConditions": "true"}"#).unwrap();
    assert!(run(options).is_empty());
}

#[test]
fn test_invalid_options_are_rejected() {
    let err = ConditionOptions::from_json(r#"{"allowConstantLoopConditions": "maybe"}"#).unwrap_err();
    assert!(err.to_string().contains("invalid boolean value"));
}
