//! Per-file analysis state.
//!
//! An [`AnalysisSession`] owns every cache the analyzer keeps. Nothing in it
//! outlives a file: hosts call [`begin_file`](AnalysisSession::begin_file)
//! when they move to the next file, and the checker calls
//! [`begin_statement`](AnalysisSession::begin_statement) before each
//! statement. Run one session per thread to analyze files in parallel.

use rustc_hash::{FxHashMap, FxHashSet};
use tscond_common::{ConditionCategory, Diagnostic, Span};
use tscond_ir::{NodeId, ValueId};
use tscond_types::TypeId;

/// Memo key: a value as seen from one syntax site.
pub type ResolutionKey = (ValueId, NodeId);

#[derive(Debug, Default)]
pub struct AnalysisSession {
    /// Statement-scoped.
    resolutions: FxHashMap<ResolutionKey, Option<TypeId>>,
    /// Statement-scoped.
    visited_sites: FxHashSet<NodeId>,
    /// File-scoped.
    reported: FxHashSet<(Span, ConditionCategory)>,
    statements: u32,
    cache_hits: u32,
}

impl AnalysisSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop everything from the previous file.
    pub fn begin_file(&mut self) {
        self.clear();
    }

    /// Drop statement-scoped caches.
    pub fn begin_statement(&mut self) {
        self.resolutions.clear();
        self.visited_sites.clear();
        self.statements += 1;
    }

    pub fn clear(&mut self) {
        self.resolutions.clear();
        self.visited_sites.clear();
        self.reported.clear();
        self.statements = 0;
        self.cache_hits = 0;
    }

    // -------------------------------------------------------------------------
    // Resolution memo
    // -------------------------------------------------------------------------

    /// `Some(result)` when `key` was resolved earlier in this statement.
    pub fn cached_resolution(&mut self, key: ResolutionKey) -> Option<Option<TypeId>> {
        let cached = self.resolutions.get(&key).copied();
        if cached.is_some() {
            self.cache_hits += 1;
        }
        cached
    }

    pub fn store_resolution(&mut self, key: ResolutionKey, result: Option<TypeId>) {
        self.resolutions.insert(key, result);
    }

    pub fn resolution_count(&self) -> usize {
        self.resolutions.len()
    }

    // -------------------------------------------------------------------------
    // Sites and findings
    // -------------------------------------------------------------------------

    /// Returns `false` if `node` was already visited in this statement.
    pub fn mark_visited(&mut self, node: NodeId) -> bool {
        self.visited_sites.insert(node)
    }

    pub fn is_visited(&self, node: NodeId) -> bool {
        self.visited_sites.contains(&node)
    }

    /// Returns `false` if an identical finding was already reported in this file.
    pub fn record_reported(&mut self, diagnostic: &Diagnostic) -> bool {
        self.reported.insert((diagnostic.span, diagnostic.category))
    }

    pub fn reported_count(&self) -> usize {
        self.reported.len()
    }

    pub fn statements_analyzed(&self) -> u32 {
        self.statements
    }

    pub fn cache_hits(&self) -> u32 {
        self.cache_hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tscond_common::Position;

    #[test]
    fn statement_scope_keeps_reported_set() {
        let mut session = AnalysisSession::new();
        session.begin_statement();
        session.store_resolution((ValueId(0), NodeId(0)), Some(TypeId::STRING));
        assert!(session.mark_visited(NodeId(3)));
        assert!(!session.mark_visited(NodeId(3)));

        let diagnostic = Diagnostic::new(
            ConditionCategory::AlwaysTruthy,
            Span::new(4, 5),
            Position::default(),
        );
        assert!(session.record_reported(&diagnostic));

        session.begin_statement();
        assert_eq!(session.cached_resolution((ValueId(0), NodeId(0))), None);
        assert!(session.mark_visited(NodeId(3)));
        assert!(!session.record_reported(&diagnostic));

        session.begin_file();
        assert_eq!(session.reported_count(), 0);
        assert_eq!(session.statements_analyzed(), 0);
    }

    #[test]
    fn cache_hits_are_counted() {
        let mut session = AnalysisSession::new();
        session.store_resolution((ValueId(1), NodeId(2)), None);
        assert_eq!(session.cached_resolution((ValueId(1), NodeId(2))), Some(None));
        assert_eq!(session.cache_hits(), 1);
    }
}
