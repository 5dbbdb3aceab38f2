//! Body-level entry points.

use crate::checker::ConditionChecker;
use crate::error::AnalysisError;
use crate::options::{ConditionOptions, HostOptions};
use crate::session::AnalysisSession;
use tracing::{debug, warn};
use tscond_common::{ConditionCategory, Diagnostic, Position, Span};
use tscond_ir::{Body, StmtId, SyntaxFragment, SyntaxProvider};
use tscond_types::TypeInterner;

/// Receives findings as they are produced.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Diagnostics for one statement, with a fresh session.
pub fn analyze_statement(
    types: &TypeInterner,
    body: &Body,
    stmt: StmtId,
    fragment: &SyntaxFragment,
    options: ConditionOptions,
) -> Result<Vec<Diagnostic>, AnalysisError> {
    let mut session = AnalysisSession::new();
    ConditionChecker::new(types, body, options).check_statement(&mut session, stmt, fragment)
}

/// Analyze every statement of `body`, reporting into `sink`.
///
/// Without strict null checks on the host (and unless the options allow
/// it) the only output is one advisory diagnostic. Statements lowered from
/// no source text are skipped; statements that fail to parse or check are
/// logged and skipped. Returns the number of diagnostics reported.
#[tracing::instrument(level = "trace", skip_all, fields(statements = body.statement_count()))]
pub fn analyze_body(
    types: &TypeInterner,
    body: &Body,
    provider: &dyn SyntaxProvider,
    options: ConditionOptions,
    host: HostOptions,
    session: &mut AnalysisSession,
    sink: &mut dyn DiagnosticSink,
) -> usize {
    session.begin_file();
    if !host.strict_null_checks && !options.allow_loose_null_checks_without_strict_mode {
        debug!("strict null checks off, reporting advisory only");
        sink.report(Diagnostic::new(
            ConditionCategory::NoStrictNullChecks,
            Span::new(0, 0),
            Position::default(),
        ));
        return 1;
    }

    let checker = ConditionChecker::new(types, body, options);
    let mut reported = 0;
    for stmt in body.statement_ids() {
        let Some(data) = body.statement(stmt) else {
            continue;
        };
        if data.source.is_synthetic() {
            continue;
        }
        let fragment = match provider.parse_statement(&data.source.text) {
            Ok(fragment) => fragment,
            Err(err) => {
                warn!(stmt = stmt.0, %err, "cannot parse statement, skipping");
                continue;
            }
        };
        let diagnostics = match checker.check_statement(session, stmt, &fragment) {
            Ok(diagnostics) => diagnostics,
            Err(err) => {
                warn!(stmt = stmt.0, %err, "cannot check statement, skipping");
                continue;
            }
        };
        for diagnostic in diagnostics {
            if session.record_reported(&diagnostic) {
                sink.report(diagnostic);
                reported += 1;
            }
        }
    }
    debug!(
        reported,
        cache_hits = session.cache_hits(),
        "body analyzed"
    );
    reported
}
