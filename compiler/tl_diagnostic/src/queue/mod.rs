//! Diagnostic queue for collecting, deduplicating, and sorting diagnostics.
//!
//! Features:
//! - Error limits to prevent overwhelming output
//! - Deduplication of an error repeated at the same span
//! - Follow-on error filtering
//! - `ErrorGuaranteed` proof that errors were emitted

use std::hash::{Hash, Hasher};

use tl_ir::Span;

use crate::span_utils::LineOffsetTable;
use crate::{Diagnostic, ErrorCode, ErrorGuaranteed};

/// Number of characters to use for message prefix deduplication.
const MESSAGE_PREFIX_LEN: usize = 30;

/// Marker that sema puts in messages about expressions that already failed.
const FOLLOW_ON_MARKER: &str = "<error>";

#[inline]
fn message_prefix_hash(msg: &str) -> u64 {
    let byte_end = msg
        .char_indices()
        .nth(MESSAGE_PREFIX_LEN)
        .map_or(msg.len(), |(idx, _)| idx);
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    msg[..byte_end].hash(&mut hasher);
    hasher.finish()
}

/// Configuration for diagnostic processing.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct DiagnosticConfig {
    /// Maximum number of errors before stopping (0 = unlimited).
    pub error_limit: usize,
    /// Filter out follow-on errors that result from previous errors.
    pub filter_follow_on: bool,
    /// Drop an error that repeats the previous one: same code, same span,
    /// same message prefix.
    pub deduplicate: bool,
}

impl Default for DiagnosticConfig {
    fn default() -> Self {
        DiagnosticConfig {
            error_limit: 0,
            filter_follow_on: true,
            deduplicate: true,
        }
    }
}

impl DiagnosticConfig {
    /// No limit, no filtering. Tests use this to see everything.
    pub fn unlimited() -> Self {
        DiagnosticConfig {
            error_limit: 0,
            filter_follow_on: false,
            deduplicate: false,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
struct QueuedDiagnostic {
    diagnostic: Diagnostic,
    /// 1-based.
    line: u32,
    /// 1-based, in characters.
    column: u32,
}

/// Queue for collecting, deduplicating, and sorting diagnostics.
///
/// Every phase of one compilation unit reports into the same queue. Errors
/// never stop a phase; the driver asks [`DiagnosticQueue::has_errors`] after
/// Sema and refuses to run codegen if it returns a proof.
///
/// ```text
/// let mut queue = DiagnosticQueue::new();
/// queue.add_with_source(diagnostic, source);
/// // ... add more diagnostics
/// let sorted = queue.flush();
/// ```
#[derive(Clone, Debug)]
pub struct DiagnosticQueue {
    diagnostics: Vec<QueuedDiagnostic>,
    /// Count of errors (not warnings/notes).
    error_count: usize,
    warning_count: usize,
    /// Last (code, primary span, `message_prefix_hash`) for dedup.
    last_error: Option<(ErrorCode, Span, u64)>,
    /// Set once the "too many errors" note has been queued.
    limit_noted: bool,
    /// Built lazily, keyed on the source length it was built for.
    lines: Option<(usize, LineOffsetTable)>,
    config: DiagnosticConfig,
}

impl Default for DiagnosticQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticQueue {
    pub fn new() -> Self {
        Self::with_config(DiagnosticConfig::default())
    }

    pub fn with_config(config: DiagnosticConfig) -> Self {
        DiagnosticQueue {
            diagnostics: Vec::new(),
            error_count: 0,
            warning_count: 0,
            last_error: None,
            limit_noted: false,
            lines: None,
            config,
        }
    }

    fn add_internal(&mut self, diag: Diagnostic, line: u32, column: u32) -> bool {
        if self.limit_reached() {
            if diag.is_error() && !self.limit_noted {
                self.limit_noted = true;
                let span = diag.primary_span().unwrap_or(Span::DUMMY);
                self.diagnostics.push(QueuedDiagnostic {
                    diagnostic: too_many_errors(self.config.error_limit, span),
                    line,
                    column,
                });
            }
            return false;
        }

        let is_error = diag.is_error();

        if self.config.filter_follow_on && Self::is_follow_on(&diag) {
            return false;
        }

        if is_error {
            let key = Self::dedup_key(&diag);
            if self.config.deduplicate && self.last_error == Some(key) {
                return false;
            }
            self.last_error = Some(key);
            self.error_count += 1;
        } else if matches!(diag.severity, crate::Severity::Warning) {
            self.warning_count += 1;
        }

        tracing::trace!(code = %diag.code, line, column, "diagnostic queued");
        self.diagnostics.push(QueuedDiagnostic {
            diagnostic: diag,
            line,
            column,
        });

        true
    }

    /// Add a diagnostic at an explicit position.
    ///
    /// Returns `true` if the diagnostic was added, `false` if it was filtered.
    pub fn add(&mut self, diag: Diagnostic, line: u32, column: u32) -> bool {
        self.add_internal(diag, line, column)
    }

    /// Add a diagnostic with its position computed from `source`.
    pub fn add_with_source(&mut self, diag: Diagnostic, source: &str) -> bool {
        let (line, column) = self.position_of(&diag, source);
        self.add_internal(diag, line, column)
    }

    fn position_of(&mut self, diag: &Diagnostic, source: &str) -> (u32, u32) {
        let Some(span) = diag.primary_span() else {
            return (1, 1);
        };
        let stale = self
            .lines
            .as_ref()
            .map_or(true, |(len, _)| *len != source.len());
        if stale {
            self.lines = Some((source.len(), LineOffsetTable::build(source)));
        }
        match &self.lines {
            Some((_, table)) => table.offset_to_line_col(source, span.start),
            None => (1, 1),
        }
    }

    pub fn limit_reached(&self) -> bool {
        self.config.error_limit > 0 && self.error_count >= self.config.error_limit
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn warning_count(&self) -> usize {
        self.warning_count
    }

    /// `Some` proof if at least one error was emitted.
    pub fn has_errors(&self) -> Option<ErrorGuaranteed> {
        ErrorGuaranteed::from_error_count(self.error_count)
    }

    /// Sort diagnostics by position and return them, clearing the queue.
    pub fn flush(&mut self) -> Vec<Diagnostic> {
        let already_sorted = self
            .diagnostics
            .windows(2)
            .all(|w| (w[0].line, w[0].column) <= (w[1].line, w[1].column));

        if !already_sorted {
            // Stable, so diagnostics at one position keep report order.
            self.diagnostics.sort_by_key(|d| (d.line, d.column));
        }

        let result: Vec<Diagnostic> = self.diagnostics.drain(..).map(|d| d.diagnostic).collect();

        self.error_count = 0;
        self.warning_count = 0;
        self.last_error = None;
        self.limit_noted = false;

        result
    }

    /// Get diagnostics without clearing the queue.
    pub fn peek(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().map(|d| &d.diagnostic)
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    fn is_follow_on(diag: &Diagnostic) -> bool {
        diag.is_error() && diag.message.contains(FOLLOW_ON_MARKER)
    }

    fn dedup_key(diag: &Diagnostic) -> (ErrorCode, Span, u64) {
        (
            diag.code,
            diag.primary_span().unwrap_or(Span::DUMMY),
            message_prefix_hash(&diag.message),
        )
    }
}

/// Create a "too many errors" diagnostic.
#[cold]
pub fn too_many_errors(limit: usize, span: Span) -> Diagnostic {
    Diagnostic::error(ErrorCode::E9002)
        .with_message(format!("aborting due to {limit} previous errors"))
        .with_label(span, "error limit reached here")
        .with_note("use --error-limit to increase the limit")
}

#[cfg(test)]
mod tests;
