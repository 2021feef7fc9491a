//! Advisory diagnostics raised while gathering and writing rules.
//!
//! Reconciliation and writing push into an injected [`DiagnosticSink`]
//! rather than printing, so callers decide where reports go.

use crate::models::Conflict;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// A later profile disagreed with the stored setting of a rule.
    Conflict(Conflict),
    /// One artifact could not be persisted; the others are unaffected.
    WriteFailed { path: PathBuf, message: String },
}

pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl<F: FnMut(Diagnostic)> DiagnosticSink for F {
    fn report(&mut self, diagnostic: Diagnostic) {
        self(diagnostic)
    }
}

#[derive(Debug, Default)]
/// Append-only sink.
pub struct Collector {
    pub diagnostics: Vec<Diagnostic>,
}

impl Collector {
    pub fn conflicts(&self) -> impl Iterator<Item = &Conflict> {
        self.diagnostics.iter().filter_map(|d| match d {
            Diagnostic::Conflict(c) => Some(c),
            _ => None,
        })
    }

    pub fn write_failures(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| matches!(d, Diagnostic::WriteFailed { .. }))
            .count()
    }
}

impl DiagnosticSink for Collector {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}
