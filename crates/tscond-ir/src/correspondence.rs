//! Syntax-to-value correspondence.
//!
//! Values carry absolute spans; fragment nodes carry spans relative to the
//! statement text. [`SiteMap`] rebases the value spans onto the fragment and
//! pairs every node with the value that was lowered from exactly the same
//! range. When several values share a range (a use and the temporary
//! assigned from it, for instance), the most recently created one wins,
//! since lowering creates outer expressions after their operands.

use crate::ir::{Body, IrValue, StmtId, ValueId};
use crate::syntax::{NodeId, SyntaxFragment};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::trace;
use tscond_common::Span;

#[derive(Clone, Debug, Default)]
pub struct SiteMap {
    by_node: FxHashMap<NodeId, ValueId>,
    by_value: FxHashMap<ValueId, NodeId>,
}

impl SiteMap {
    /// Pair the nodes of `fragment` with the values reachable from `stmt`.
    ///
    /// Values reachable through locals whose reaching assignment is a
    /// lowering temporary are included, so `if (a && b)` lowered through a
    /// synthetic `t = a && b` still maps `a` and `b`. Returns `None` when
    /// `stmt` is not in `body`.
    pub fn build(body: &Body, stmt: StmtId, fragment: &SyntaxFragment) -> Option<SiteMap> {
        let data = body.statement(stmt)?;
        let origin = data.source.span.start;

        let mut by_span: FxHashMap<Span, ValueId> = FxHashMap::default();
        let mut seen_values: FxHashSet<ValueId> = FxHashSet::default();
        let mut seen_statements: FxHashSet<StmtId> = FxHashSet::default();
        seen_statements.insert(stmt);

        let mut stack: Vec<ValueId> = data.stmt.operands().into_iter().collect();
        while let Some(id) = stack.pop() {
            if !seen_values.insert(id) {
                continue;
            }
            let Some(value) = body.value(id) else {
                continue;
            };
            if let Some(span) = value.span.and_then(|span| span.relative_to(origin)) {
                by_span
                    .entry(span)
                    .and_modify(|current| *current = (*current).max(id))
                    .or_insert(id);
            }
            stack.extend(value.value.operands());

            if let IrValue::Local {
                decl: Some(decl), ..
            } = value.value
                && let Some(decl_data) = body.statement(decl)
                && decl_data.source.is_synthetic()
                && seen_statements.insert(decl)
            {
                stack.extend(decl_data.stmt.operands());
            }
        }

        let mut map = SiteMap::default();
        for (node_id, node) in fragment.nodes() {
            if let Some(&value) = by_span.get(&node.span) {
                map.by_node.insert(node_id, value);
                map.by_value
                    .entry(value)
                    .and_modify(|current| {
                        // A statement without a semicolon shares its expression span.
                        if node.span.len() < fragment.span(*current).map_or(u32::MAX, |s| s.len()) {
                            *current = node_id;
                        }
                    })
                    .or_insert(node_id);
            }
        }
        trace!(
            stmt = stmt.0,
            values = seen_values.len(),
            mapped = map.by_node.len(),
            "built site map"
        );
        Some(map)
    }

    /// Value lowered from `node`, looking through parentheses.
    pub fn value_at(&self, fragment: &SyntaxFragment, node: NodeId) -> Option<ValueId> {
        self.by_node
            .get(&fragment.skip_parentheses(node))
            .or_else(|| self.by_node.get(&node))
            .copied()
    }

    /// Node a value was lowered from.
    pub fn node_of(&self, value: ValueId) -> Option<NodeId> {
        self.by_value.get(&value).copied()
    }

    pub fn len(&self) -> usize {
        self.by_node.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_node.is_empty()
    }
}
