//! Statement checker.
//!
//! Runs the site walker over one statement's syntax fragment, resolves each
//! site's subject through the IR (or the token text when the IR has no value
//! for it), classifies it and turns findings into positioned diagnostics.
//!
//! Per statement:
//!
//! 1. Reject statements without source text; skip bare numeric assignments
//! 2. Pair syntax nodes with IR values (`SiteMap`)
//! 3. Classify each site, at most one finding per subject node
//! 4. Rebase spans onto the file and sort

use crate::classifier::{
    ComparisonFinding, classify_callback_return, classify_comparison, classify_nullish,
    classify_optional_chain, classify_truthiness, is_array, is_array_like,
};
use crate::error::AnalysisError;
use crate::options::ConditionOptions;
use crate::resolver::{ConstrainedTypeResolver, ResolveLimits, SiteContext};
use crate::session::AnalysisSession;
use crate::walker::{ConditionSite, SiteRole, locate_sites};
use tracing::{debug, trace};
use tscond_common::diagnostics::{format_message, messages, sort_diagnostics};
use tscond_common::{ComparisonOperator, ConditionCategory, Diagnostic, Position, Span};
use tscond_ir::{
    BinaryOperator, Body, IrStatement, NodeId, NodeKind, PrefixOperator, SiteMap,
    SourceExpression, StmtId, SyntaxFragment, ValueId, syntax_literal_type,
};
use tscond_types::{TypeId, TypeInterner, strip_aliases};

/// Checks statements of one body against one type table.
pub struct ConditionChecker<'a> {
    types: &'a TypeInterner,
    body: &'a Body,
    options: ConditionOptions,
    limits: ResolveLimits,
}

impl<'a> ConditionChecker<'a> {
    pub fn new(types: &'a TypeInterner, body: &'a Body, options: ConditionOptions) -> Self {
        ConditionChecker {
            types,
            body,
            options,
            limits: ResolveLimits::default(),
        }
    }

    #[must_use]
    pub fn with_limits(mut self, limits: ResolveLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn options(&self) -> ConditionOptions {
        self.options
    }

    /// Diagnostics for `stmt`, sorted by position.
    ///
    /// `fragment` must be the parse of the statement's source text. Sites
    /// that fail individually are logged and skipped.
    #[tracing::instrument(level = "trace", skip_all, fields(stmt = stmt.0))]
    pub fn check_statement(
        &self,
        session: &mut AnalysisSession,
        stmt: StmtId,
        fragment: &SyntaxFragment,
    ) -> Result<Vec<Diagnostic>, AnalysisError> {
        let data = self
            .body
            .statement(stmt)
            .ok_or_else(|| AnalysisError::unknown_statement(stmt))?;
        if data.source.is_synthetic() {
            return Err(AnalysisError::empty_source(stmt));
        }
        session.begin_statement();

        if let IrStatement::Assign { right, .. } = data.stmt {
            let right = self
                .body
                .value(right)
                .ok_or_else(|| AnalysisError::unknown_value(right))?;
            if right.value.is_numeric_constant() {
                trace!("numeric constant assignment, nothing to check");
                return Ok(Vec::new());
            }
        }

        let sites = SiteMap::build(self.body, stmt, fragment).unwrap_or_default();
        let if_condition = match data.stmt {
            IrStatement::If { condition } => Some(condition),
            _ => None,
        };
        let mut cx = StatementContext {
            types: self.types,
            body: self.body,
            options: self.options,
            fragment,
            sites,
            source: &data.source,
            resolver: ConstrainedTypeResolver::with_limits(self.types, self.body, self.limits),
            if_condition,
        };

        let mut diagnostics = Vec::new();
        for site in locate_sites(fragment) {
            if session.is_visited(site.node) {
                continue;
            }
            match cx.classify(session, &site) {
                Ok(Some(finding)) => {
                    session.mark_visited(site.node);
                    trace!(category = %finding.category, site = site.node.0, "finding");
                    diagnostics.push(cx.diagnostic(finding));
                }
                Ok(None) => {}
                Err(err) => debug!(site = site.node.0, %err, "skipping site"),
            }
        }

        sort_diagnostics(&mut diagnostics);
        Ok(diagnostics)
    }
}

// =============================================================================
// Findings
// =============================================================================

/// A finding in fragment coordinates.
struct Finding {
    category: ConditionCategory,
    /// Node the finding is about.
    node: NodeId,
    /// Reported span, relative to the statement text.
    span: Span,
    message: Option<String>,
    /// Replacement for a relative span.
    fix: Option<(Span, &'static str)>,
}

struct StatementContext<'c, 'a> {
    types: &'a TypeInterner,
    body: &'a Body,
    options: ConditionOptions,
    fragment: &'c SyntaxFragment,
    sites: SiteMap,
    source: &'a SourceExpression,
    resolver: ConstrainedTypeResolver<'a>,
    if_condition: Option<ValueId>,
}

impl StatementContext<'_, '_> {
    fn classify(
        &mut self,
        session: &mut AnalysisSession,
        site: &ConditionSite,
    ) -> Result<Option<Finding>, AnalysisError> {
        let finding = match site.role {
            SiteRole::Truthiness { loop_test } => {
                self.truthiness_site(session, site.node, site.negations, loop_test)?
            }
            SiteRole::Nullish { operator } => self.nullish_site(session, site.node, operator)?,
            SiteRole::Comparison { op } => self.comparison_site(session, site.node, op)?,
            SiteRole::OptionalChain => self.optional_chain_site(session, site.node)?,
            SiteRole::ArrayPredicate => self.predicate_site(session, site.node)?,
        };
        Ok(finding.filter(|finding| !self.is_negated_operand(finding.node)))
    }

    fn finding(&self, category: ConditionCategory, node: NodeId) -> Option<Finding> {
        Some(Finding {
            category,
            node,
            span: self.fragment.span(node)?,
            message: None,
            fix: None,
        })
    }

    fn diagnostic(&self, finding: Finding) -> Diagnostic {
        let origin = self.source.span.start;
        let position = Position::new(self.source.line, self.source.column)
            .advance(self.fragment.source(), finding.span.start);
        let mut diagnostic =
            Diagnostic::new(finding.category, finding.span.offset(origin), position);
        if let Some(message) = finding.message {
            diagnostic = diagnostic.with_message(message);
        }
        if let Some((span, text)) = finding.fix {
            diagnostic = diagnostic.with_fix(span.offset(origin), text);
        }
        diagnostic
    }

    // -------------------------------------------------------------------------
    // Types at sites
    // -------------------------------------------------------------------------

    /// Constrained type of the expression at `node`.
    fn type_at(
        &mut self,
        session: &mut AnalysisSession,
        node: NodeId,
    ) -> Result<Option<TypeId>, AnalysisError> {
        let Some(value) = self.sites.value_at(self.fragment, node) else {
            return Ok(syntax_literal_type(self.types, self.fragment, node));
        };
        if self.body.value(value).is_none() {
            return Err(AnalysisError::unknown_value(value));
        }
        let site = SiteContext {
            node,
            assigned_literal: self.assigned_literal(node),
            if_condition: self.if_condition,
        };
        Ok(self
            .resolver
            .resolve(session, value, &site)
            .or_else(|| syntax_literal_type(self.types, self.fragment, node)))
    }

    /// Literal type of `y` when `node` is `x = y`.
    fn assigned_literal(&self, node: NodeId) -> Option<TypeId> {
        match self.fragment.kind(node)? {
            NodeKind::Binary {
                op: BinaryOperator::Assign,
                right,
                ..
            } => syntax_literal_type(self.types, self.fragment, *right),
            _ => None,
        }
    }

    /// `node` is the operand of a unary minus (`-x`).
    fn is_negated_operand(&self, node: NodeId) -> bool {
        let Some(parent) = self.fragment.parent_skipping_parentheses(node) else {
            return false;
        };
        match self.fragment.kind(parent) {
            Some(NodeKind::Prefix {
                op: PrefixOperator::Minus,
                operand,
            }) => {
                let operand = self.fragment.skip_parentheses(*operand);
                self.fragment.text(operand) == self.fragment.text(node)
            }
            _ => false,
        }
    }

    /// `node` is `arr[i]` with `arr` an array (not a tuple).
    fn is_array_element(
        &mut self,
        session: &mut AnalysisSession,
        node: NodeId,
    ) -> Result<bool, AnalysisError> {
        let Some(NodeKind::ElementAccess { object, .. }) = self.fragment.kind(node) else {
            return Ok(false);
        };
        let object = *object;
        Ok(self
            .type_at(session, object)?
            .is_some_and(|ty| is_array(self.types, ty)))
    }

    // -------------------------------------------------------------------------
    // Site kinds
    // -------------------------------------------------------------------------

    fn truthiness_site(
        &mut self,
        session: &mut AnalysisSession,
        node: NodeId,
        negations: u32,
        loop_test: bool,
    ) -> Result<Option<Finding>, AnalysisError> {
        // Index signatures do not model missing elements.
        if self.is_array_element(session, node)? {
            return Ok(None);
        }
        let Some(ty) = self.type_at(session, node)? else {
            return Ok(None);
        };
        if loop_test
            && self.options.allow_constant_loop_conditions
            && strip_aliases(self.types, ty) == TypeId::BOOLEAN_TRUE
        {
            trace!("constant loop condition allowed");
            return Ok(None);
        }
        let Some(mut category) = classify_truthiness(self.types, ty) else {
            return Ok(None);
        };
        if negations % 2 == 1 {
            category = category.negated();
        }
        Ok(self.finding(category, node))
    }

    fn nullish_site(
        &mut self,
        session: &mut AnalysisSession,
        node: NodeId,
        operator: &'static str,
    ) -> Result<Option<Finding>, AnalysisError> {
        if matches!(self.fragment.kind(node), Some(NodeKind::ElementAccess { .. })) {
            return Ok(None);
        }
        let Some(ty) = self.type_at(session, node)? else {
            return Ok(None);
        };
        let Some(category) = classify_nullish(self.types, ty) else {
            return Ok(None);
        };
        let message = match category {
            ConditionCategory::NeverNullish => {
                Some(format_message(messages::NEVER_NULLISH, &[operator]))
            }
            ConditionCategory::AlwaysNullish => {
                Some(format_message(messages::ALWAYS_NULLISH, &[operator]))
            }
            _ => None,
        };
        Ok(self.finding(category, node).map(|finding| Finding { message, ..finding }))
    }

    fn comparison_site(
        &mut self,
        session: &mut AnalysisSession,
        node: NodeId,
        op: ComparisonOperator,
    ) -> Result<Option<Finding>, AnalysisError> {
        let Some(&NodeKind::Binary { left, right, .. }) = self.fragment.kind(node) else {
            return Ok(None);
        };
        let (Some(left_ty), Some(right_ty)) =
            (self.type_at(session, left)?, self.type_at(session, right)?)
        else {
            return Ok(None);
        };
        let Some(comparison) = classify_comparison(self.types, op, left_ty, right_ty) else {
            return Ok(None);
        };
        let message = match comparison {
            ComparisonFinding::Literal {
                outcome: Some(outcome),
            } => {
                let outcome = outcome.to_string();
                let left = self.types.display(left_ty);
                let right = self.types.display(right_ty);
                Some(format_message(
                    messages::LITERAL_COMPARISON_EVALUATED,
                    &[&outcome, &left, op.as_str(), &right],
                ))
            }
            _ => None,
        };
        Ok(self
            .finding(comparison.category(), node)
            .map(|finding| Finding { message, ..finding }))
    }

    fn optional_chain_site(
        &mut self,
        session: &mut AnalysisSession,
        node: NodeId,
    ) -> Result<Option<Finding>, AnalysisError> {
        let (base, replacement) = match self.fragment.kind(node) {
            Some(NodeKind::PropertyAccess { object, .. }) => (*object, "."),
            Some(NodeKind::ElementAccess { object, .. }) => (*object, ""),
            Some(NodeKind::Call { callee, .. }) => (*callee, ""),
            _ => return Ok(None),
        };
        let Some(token) = self.optional_token(base, node) else {
            return Ok(None);
        };
        let Some(base_ty) = self.type_at(session, base)? else {
            return Ok(None);
        };
        let Some(category) = classify_optional_chain(self.types, base_ty) else {
            return Ok(None);
        };
        Ok(Some(Finding {
            category,
            node,
            span: token,
            message: None,
            fix: Some((token, replacement)),
        }))
    }

    /// Span of the `?.` after `base` inside `node`.
    fn optional_token(&self, base: NodeId, node: NodeId) -> Option<Span> {
        let base = self.fragment.span(base)?;
        let node = self.fragment.span(node)?;
        let tail = Span::new(base.end, node.end).slice(self.fragment.source())?;
        let at = tail.find("?.")? as u32;
        Some(Span::at(base.end + at, 2))
    }

    fn predicate_site(
        &mut self,
        session: &mut AnalysisSession,
        node: NodeId,
    ) -> Result<Option<Finding>, AnalysisError> {
        let Some(NodeKind::Call { callee, args, .. }) = self.fragment.kind(node) else {
            return Ok(None);
        };
        let Some(&callback) = args.first() else {
            return Ok(None);
        };
        let callee = self.fragment.skip_parentheses(*callee);
        let Some(&NodeKind::PropertyAccess { object, .. }) = self.fragment.kind(callee) else {
            return Ok(None);
        };
        if !self
            .type_at(session, object)?
            .is_some_and(|ty| is_array_like(self.types, ty))
        {
            return Ok(None);
        }
        let Some((ret, subject)) = self.callback_return(session, callback)? else {
            return Ok(None);
        };
        let Some(category) = classify_callback_return(self.types, ret) else {
            return Ok(None);
        };
        Ok(self.finding(category, subject))
    }

    /// Return type of a predicate callback, and the node a finding on it spans.
    ///
    /// An arrow's returned expression is consulted first (`x => true`,
    /// `x => { return true; }`); otherwise the callback's signature.
    fn callback_return(
        &mut self,
        session: &mut AnalysisSession,
        callback: NodeId,
    ) -> Result<Option<(TypeId, NodeId)>, AnalysisError> {
        let callback = self.fragment.skip_parentheses(callback);
        let returned = self.returned_expression(callback);
        if let Some(expr) = returned
            && let Some(ty) = self.type_at(session, expr)?
            && !strip_aliases(self.types, ty).is_any_or_unknown()
        {
            return Ok(Some((ty, expr)));
        }

        let Some(callback_ty) = self.type_at(session, callback)? else {
            return Ok(None);
        };
        let Some(signature) = self
            .types
            .signature_of(strip_aliases(self.types, callback_ty))
        else {
            return Ok(None);
        };
        Ok(Some((signature.return_type, returned.unwrap_or(callback))))
    }

    fn returned_expression(&self, callback: NodeId) -> Option<NodeId> {
        let NodeKind::Arrow { body, .. } = self.fragment.kind(callback)? else {
            return None;
        };
        match self.fragment.kind(*body)? {
            NodeKind::Block { statements } => match statements.as_slice() {
                [only] => match self.fragment.kind(*only)? {
                    NodeKind::Return {
                        expression: Some(expression),
                    } => Some(*expression),
                    _ => None,
                },
                _ => None,
            },
            _ => Some(*body),
        }
    }
}
