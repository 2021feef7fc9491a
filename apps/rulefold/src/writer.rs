//! Artifact rendering and persistence.
//!
//! One artifact per namespace, `<label>_rules.<ext>`, plus an `index.<ext>`
//! composing all of them. Rendering is pure; writes are independent and a
//! failure on one artifact never blocks the rest.

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::models::Namespace;
use crate::reconcile::Reconciled;
use crate::serialize::{expand_indent, key, serialize};
use rayon::prelude::*;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const INDEX_STEM: &str = "index";

#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    /// File name inside the output directory.
    pub file_name: String,
    /// Namespace label; `None` for the index.
    pub namespace: Option<String>,
    pub contents: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct WriteOutcome {
    pub path: PathBuf,
    pub error: Option<String>,
}

impl WriteOutcome {
    pub fn ok(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArtifactStatus {
    UpToDate,
    Stale,
    Missing,
}

impl ArtifactStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ArtifactStatus::UpToDate => "up-to-date",
            ArtifactStatus::Stale => "stale",
            ArtifactStatus::Missing => "missing",
        }
    }
}

fn module_name(label: &str) -> String {
    format!("{label}_rules")
}

/// Render one namespace module.
pub fn render_namespace(ns: &Namespace) -> String {
    let body = ns
        .rules
        .iter()
        .map(|(rule, setting)| format!("\t{}: {}", key(rule), serialize(setting)))
        .collect::<Vec<_>>()
        .join(",\n");
    expand_indent(&format!(
        "// {} Rules\nmodule.exports = {{\n{}\n}};\n",
        ns.label, body
    ))
}

/// Render the index module spreading every namespace module, in the given
/// order.
pub fn render_index<'a>(labels: impl IntoIterator<Item = &'a str>) -> String {
    let body = labels
        .into_iter()
        .map(|l| format!("\t...require('./{}')", module_name(l)))
        .collect::<Vec<_>>()
        .join(",\n");
    expand_indent(&format!("module.exports = {{\n{body}\n}};\n"))
}

/// Render all artifacts: namespaces sorted by label, index last.
pub fn render(reconciled: &Reconciled, ext: &str) -> Vec<Artifact> {
    let mut namespaces: Vec<&Namespace> = reconciled.namespaces.iter().collect();
    namespaces.sort_by(|a, b| a.label.cmp(&b.label));
    let mut out: Vec<Artifact> = namespaces
        .iter()
        .map(|ns| Artifact {
            file_name: format!("{}.{}", module_name(&ns.label), ext),
            namespace: Some(ns.label.clone()),
            contents: render_namespace(ns),
        })
        .collect();
    out.push(Artifact {
        file_name: format!("{INDEX_STEM}.{ext}"),
        namespace: None,
        contents: render_index(namespaces.iter().map(|ns| ns.label.as_str())),
    });
    out
}

/// Write every artifact into `out_dir`, one outcome per artifact in input
/// order. Failures are also pushed to `sink`.
pub fn write_all(
    out_dir: &Path,
    artifacts: &[Artifact],
    sink: &mut dyn DiagnosticSink,
) -> Vec<WriteOutcome> {
    if let Err(e) = fs::create_dir_all(out_dir) {
        warn!(dir = %out_dir.display(), error = %e, "cannot create output directory");
    }
    let outcomes: Vec<WriteOutcome> = artifacts
        .par_iter()
        .map(|a| {
            let path = out_dir.join(&a.file_name);
            let error = match fs::write(&path, &a.contents) {
                Ok(()) => {
                    debug!(path = %path.display(), "artifact written");
                    None
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "artifact write failed");
                    Some(e.to_string())
                }
            };
            WriteOutcome { path, error }
        })
        .collect();
    for o in &outcomes {
        if let Some(message) = &o.error {
            sink.report(Diagnostic::WriteFailed {
                path: o.path.clone(),
                message: message.clone(),
            });
        }
    }
    outcomes
}

/// Compare rendered artifacts with what is on disk.
pub fn check(out_dir: &Path, artifacts: &[Artifact]) -> Vec<(PathBuf, ArtifactStatus)> {
    artifacts
        .iter()
        .map(|a| {
            let path = out_dir.join(&a.file_name);
            let status = match fs::read_to_string(&path) {
                Ok(cur) if cur == a.contents => ArtifactStatus::UpToDate,
                Ok(_) => ArtifactStatus::Stale,
                Err(_) => ArtifactStatus::Missing,
            };
            (path, status)
        })
        .collect()
}
