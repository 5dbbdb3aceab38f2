//! Condition-site location.
//!
//! Finds the sub-expressions of one statement whose truthiness, nullishness
//! or comparison outcome decides control flow:
//!
//! ```text
//! if (a && !b) {}          a: truthiness (left of &&), b: truthiness, negated once
//! x ?? y                   x: nullish
//! x === null               the comparison
//! a?.b                     the optional access
//! arr.filter(x => ...)     the predicate call
//! ```
//!
//! Nested blocks are not entered; their statements are analyzed on their own.

use smallvec::SmallVec;
use tscond_common::ComparisonOperator;
use tscond_ir::{BinaryOperator, NodeId, NodeKind, PrefixOperator, SyntaxFragment};

/// Array methods whose callback is used as a predicate.
pub const ARRAY_PREDICATE_METHODS: &[&str] = &[
    "filter",
    "find",
    "findIndex",
    "findLast",
    "findLastIndex",
    "some",
    "every",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SiteRole {
    /// A value used as a condition. `loop_test` marks the direct test of a loop.
    Truthiness { loop_test: bool },
    /// Left operand of `??` (or `??=`).
    Nullish { operator: &'static str },
    /// An equality or relational comparison.
    Comparison { op: ComparisonOperator },
    /// A `?.` access or call.
    OptionalChain,
    /// `arr.filter(cb)` and friends.
    ArrayPredicate,
}

impl SiteRole {
    /// Classification order; truthiness comes last so a comparison finding
    /// on the same node wins.
    fn rank(self) -> u8 {
        match self {
            SiteRole::Comparison { .. } => 0,
            SiteRole::Nullish { .. } => 1,
            SiteRole::OptionalChain => 2,
            SiteRole::ArrayPredicate => 3,
            SiteRole::Truthiness { .. } => 4,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConditionSite {
    /// Subject node, with parentheses (and for truthiness sites, `!`) stripped.
    pub node: NodeId,
    pub role: SiteRole,
    /// Logical `!` prefixes stripped from a truthiness subject.
    pub negations: u32,
}

/// Condition sites of `fragment`, comparisons first, each group in source order.
pub fn locate_sites(fragment: &SyntaxFragment) -> Vec<ConditionSite> {
    let mut locator = SiteLocator {
        fragment,
        sites: Vec::new(),
    };
    let root = fragment.root();
    let mut stack: SmallVec<[NodeId; 16]> = SmallVec::new();
    stack.push(root);
    while let Some(node) = stack.pop() {
        let Some(kind) = fragment.kind(node) else {
            continue;
        };
        if node != root && matches!(kind, NodeKind::Block { .. }) {
            continue;
        }
        locator.visit(node, kind);
        stack.extend(fragment.children(node).into_iter().rev());
    }

    let mut sites = locator.sites;
    sites.sort_by_key(|site| {
        (
            site.role.rank(),
            fragment.span(site.node).map_or(u32::MAX, |span| span.start),
        )
    });
    sites.dedup();
    sites
}

/// `callee` is `<expr>.filter` (or another predicate method).
pub fn is_array_predicate_callee(fragment: &SyntaxFragment, callee: NodeId) -> bool {
    match fragment.kind(fragment.skip_parentheses(callee)) {
        Some(NodeKind::PropertyAccess { name, .. }) => {
            ARRAY_PREDICATE_METHODS.contains(&fragment.text(*name))
        }
        _ => false,
    }
}

struct SiteLocator<'f> {
    fragment: &'f SyntaxFragment,
    sites: Vec<ConditionSite>,
}

impl SiteLocator<'_> {
    fn visit(&mut self, node: NodeId, kind: &NodeKind) {
        match kind {
            NodeKind::If { condition, .. } => self.test(*condition, false),
            NodeKind::While { condition, .. } | NodeKind::DoWhile { condition, .. } => {
                self.test(*condition, true)
            }
            NodeKind::For {
                condition: Some(condition),
                ..
            } => self.test(*condition, true),
            NodeKind::Conditional { condition, .. } => self.test(*condition, false),
            NodeKind::Binary { op, left, .. } => match op {
                BinaryOperator::And | BinaryOperator::Or => self.logical_operand(*left),
                BinaryOperator::AndAssign | BinaryOperator::OrAssign => {
                    self.truthiness(*left, false)
                }
                BinaryOperator::Coalesce => self.nullish(*left, "??"),
                BinaryOperator::CoalesceAssign => self.nullish(*left, "??="),
                BinaryOperator::Comparison(op) => self.push(node, SiteRole::Comparison { op: *op }, 0),
                _ => {}
            },
            NodeKind::PropertyAccess { optional: true, .. }
            | NodeKind::ElementAccess { optional: true, .. } => {
                self.push(node, SiteRole::OptionalChain, 0)
            }
            NodeKind::Call {
                callee,
                args,
                optional,
            } => {
                if *optional {
                    self.push(node, SiteRole::OptionalChain, 0);
                }
                if !args.is_empty() && is_array_predicate_callee(self.fragment, *callee) {
                    self.push(node, SiteRole::ArrayPredicate, 0);
                }
            }
            _ => {}
        }
    }

    /// The test of a statement or ternary. A logical test contributes its
    /// right operand; its left is contributed when the logical node is visited.
    fn test(&mut self, node: NodeId, loop_test: bool) {
        let (subject, negations) = self.strip_negations(node);
        match self.fragment.kind(subject) {
            Some(NodeKind::Binary {
                op: BinaryOperator::And | BinaryOperator::Or,
                right,
                ..
            }) => self.test(*right, false),
            _ => self.push(subject, SiteRole::Truthiness { loop_test }, negations),
        }
    }

    /// Left operand of `&&`/`||`. A logical nested there is tested as a
    /// whole, and so is its right operand, since `(a && b) || c` tests `b`.
    fn logical_operand(&mut self, node: NodeId) {
        let (subject, negations) = self.strip_negations(node);
        self.push(subject, SiteRole::Truthiness { loop_test: false }, negations);
        if let Some(NodeKind::Binary {
            op: BinaryOperator::And | BinaryOperator::Or,
            right,
            ..
        }) = self.fragment.kind(subject)
        {
            self.logical_operand(*right);
        }
    }

    fn truthiness(&mut self, node: NodeId, loop_test: bool) {
        let (subject, negations) = self.strip_negations(node);
        self.push(subject, SiteRole::Truthiness { loop_test }, negations);
    }

    fn nullish(&mut self, node: NodeId, operator: &'static str) {
        let subject = self.fragment.skip_parentheses(node);
        self.push(subject, SiteRole::Nullish { operator }, 0);
    }

    fn strip_negations(&self, node: NodeId) -> (NodeId, u32) {
        let mut current = self.fragment.skip_parentheses(node);
        let mut negations = 0;
        while let Some(NodeKind::Prefix {
            op: PrefixOperator::Not,
            operand,
        }) = self.fragment.kind(current)
        {
            negations += 1;
            current = self.fragment.skip_parentheses(*operand);
        }
        (current, negations)
    }

    fn push(&mut self, node: NodeId, role: SiteRole, negations: u32) {
        self.sites.push(ConditionSite {
            node,
            role,
            negations,
        });
    }
}
