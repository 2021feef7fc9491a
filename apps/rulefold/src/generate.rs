//! End-to-end run: resolve profiles, reconcile, render, then persist.
//!
//! Everything up to rendering is synchronous and may fail the run; once
//! rendering succeeds every artifact is attempted.

use crate::config::Effective;
use crate::diagnostics::DiagnosticSink;
use crate::error::Result;
use crate::loader::{self, CommandResolver, ConfigResolver, SnapshotResolver};
use crate::namespace::NamespaceResolver;
use crate::reconcile::{self, Reconciled};
use crate::writer::{self, Artifact, ArtifactStatus, WriteOutcome};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Write,
    /// Render only; nothing touches the output directory.
    DryRun,
    /// Render and compare with the output directory without writing.
    Check,
}

#[derive(Debug)]
pub struct GenerateReport {
    pub reconciled: Reconciled,
    pub artifacts: Vec<Artifact>,
    /// Filled in `Mode::Write`.
    pub outcomes: Vec<WriteOutcome>,
    /// Filled in `Mode::Check`.
    pub statuses: Vec<(PathBuf, ArtifactStatus)>,
}

impl GenerateReport {
    pub fn write_failures(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.ok()).count()
    }

    pub fn out_of_date(&self) -> usize {
        self.statuses
            .iter()
            .filter(|(_, s)| *s != ArtifactStatus::UpToDate)
            .count()
    }
}

/// Snapshot input when configured, otherwise the engine command.
pub fn build_resolver(eff: &Effective) -> Result<Box<dyn ConfigResolver>> {
    let resolver: Box<dyn ConfigResolver> = match &eff.input {
        Some(path) => Box::new(SnapshotResolver::open(path)?),
        None => Box::new(CommandResolver::new(&eff.command, &eff.repo_root)),
    };
    Ok(resolver)
}

/// Load every profile and fold it into namespaces.
pub fn gather(eff: &Effective, sink: &mut dyn DiagnosticSink) -> Result<Reconciled> {
    let resolver = build_resolver(eff)?;
    let gathered = loader::load_profiles(resolver.as_ref(), &eff.base, &eff.profiles)?;
    let reconciled = reconcile::reconcile(
        NamespaceResolver::new(&eff.default_namespace),
        &gathered.plugins,
        &gathered.profiles,
        sink,
    );
    info!(
        namespaces = reconciled.namespaces.len(),
        rules = reconciled.rule_count(),
        conflicts = reconciled.conflicts.len(),
        "reconciled"
    );
    Ok(reconciled)
}

pub fn run_generate(
    eff: &Effective,
    mode: Mode,
    sink: &mut dyn DiagnosticSink,
) -> Result<GenerateReport> {
    let reconciled = gather(eff, sink)?;
    let artifacts = writer::render(&reconciled, &eff.ext);
    let mut report = GenerateReport {
        reconciled,
        artifacts,
        outcomes: Vec::new(),
        statuses: Vec::new(),
    };
    match mode {
        Mode::Write => report.outcomes = writer::write_all(&eff.out_dir, &report.artifacts, sink),
        Mode::Check => report.statuses = writer::check(&eff.out_dir, &report.artifacts),
        Mode::DryRun => {}
    }
    Ok(report)
}
