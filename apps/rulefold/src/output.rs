//! Output rendering for generate, conflicts, and namespace commands.
//!
//! Supports `human` (default) and `json` outputs. The JSON form includes
//! per-item fields and a top-level summary.

use crate::diagnostics::{Collector, Diagnostic, DiagnosticSink};
use crate::generate::{GenerateReport, Mode};
use crate::models::Conflict;
use crate::utils::{error_prefix, rel_to_wd, use_colors};
use crate::writer::ArtifactStatus;
use owo_colors::OwoColorize;
use serde_json::json;
use serde_json::Value as JsonVal;
use std::path::Path;

/// Diagnostic sink for the CLI: records everything and, in human mode,
/// echoes each diagnostic to stderr as it arrives.
pub struct ConsoleSink {
    echo: bool,
    color: bool,
    pub collected: Collector,
}

impl ConsoleSink {
    pub fn new(output: &str) -> Self {
        Self {
            echo: output != "json",
            color: use_colors(output),
            collected: Collector::default(),
        }
    }
}

impl DiagnosticSink for ConsoleSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        if self.echo {
            match &diagnostic {
                Diagnostic::Conflict(c) => {
                    let msg = format_conflict(c);
                    if self.color {
                        eprintln!("{}", msg.bright_yellow().bold());
                    } else {
                        eprintln!("{}", msg);
                    }
                }
                Diagnostic::WriteFailed { path, message } => {
                    eprintln!(
                        "{} failed to write {}: {}",
                        error_prefix(),
                        rel_to_wd(path),
                        message
                    );
                }
            }
        }
        self.collected.report(diagnostic);
    }
}

/// One-line human rendering of a conflict.
pub fn format_conflict(c: &Conflict) -> String {
    format!(
        "Rule from {} differs -> {} --> {} - {}",
        c.profile, c.rule, c.stored, c.incoming
    )
}

fn print_json(v: &JsonVal) {
    match serde_json::to_string_pretty(v) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("{} {}", error_prefix(), e),
    }
}

/// Print the outcome of `generate` in the requested format.
pub fn print_generate(report: &GenerateReport, mode: Mode, output: &str, out_dir: &Path) {
    if output == "json" {
        print_json(&compose_generate_json(report, mode));
        return;
    }
    let color = use_colors(output);
    let dir = |f: &str| rel_to_wd(&out_dir.join(f));
    match mode {
        Mode::DryRun => {
            for a in &report.artifacts {
                if color {
                    println!("{} {}\n{}", "---".cyan().bold(), dir(&a.file_name).bold(), a.contents);
                } else {
                    println!("--- {}\n{}", dir(&a.file_name), a.contents);
                }
            }
        }
        Mode::Check => {
            for (path, status) in &report.statuses {
                let label = status.as_str();
                if color && *status != ArtifactStatus::UpToDate {
                    println!("{} {}", format!("{label}:").yellow().bold(), rel_to_wd(path));
                } else if color {
                    println!("{} {}", format!("{label}:").bright_black(), rel_to_wd(path));
                } else {
                    println!("{}: {}", label, rel_to_wd(path));
                }
            }
        }
        Mode::Write => {
            for o in report.outcomes.iter().filter(|o| o.ok()) {
                if color {
                    println!("{} {}", "📥 wrote:".green().bold(), rel_to_wd(&o.path));
                } else {
                    println!("📥 wrote: {}", rel_to_wd(&o.path));
                }
            }
        }
    }
    let summary = format!(
        "— Summary — namespaces={} rules={} conflicts={} artifacts={} failed={}",
        report.reconciled.namespaces.len(),
        report.reconciled.rule_count(),
        report.reconciled.conflicts.len(),
        report.artifacts.len(),
        report.write_failures()
    );
    if color {
        println!("{}", summary.bold());
    } else {
        println!("{}", summary);
    }
}

/// Explain how to opt into the generated rules; they are never wired in
/// automatically.
pub fn print_banner(out_dir: &Path, output: &str) {
    if output == "json" {
        return;
    }
    let info = [
        format!(
            "Rules placed in `{}` to avoid overriding existing rules,",
            rel_to_wd(out_dir)
        ),
        "rename it to `configs/eslint_rules` to use the new rules.".to_string(),
        "Then add `...require('./configs/eslint_rules')` to the `rules` of your root ESLint config."
            .to_string(),
    ];
    let text = info.join("\n");
    if use_colors(output) {
        eprintln!("{}", text.bright_white().on_blue());
    } else {
        eprintln!("{}", text);
    }
}

/// Print conflicts only.
pub fn print_conflicts(conflicts: &[Conflict], output: &str) {
    if output == "json" {
        print_json(&compose_conflicts_json(conflicts));
        return;
    }
    let color = use_colors(output);
    if conflicts.is_empty() {
        if color {
            println!("{}", "no conflicts".bright_black());
        } else {
            println!("no conflicts");
        }
        return;
    }
    for c in conflicts {
        if color {
            println!("{}", format_conflict(c).bright_yellow().bold());
        } else {
            println!("{}", format_conflict(c));
        }
    }
    println!("— Summary — conflicts={}", conflicts.len());
}

/// Print `rule -> namespace` pairs.
pub fn print_namespaces(pairs: &[(String, String)], output: &str) {
    if output == "json" {
        let items: Vec<_> = pairs
            .iter()
            .map(|(rule, ns)| json!({"rule": rule, "namespace": ns}))
            .collect();
        print_json(&JsonVal::Array(items));
        return;
    }
    for (rule, ns) in pairs {
        println!("{} -> {}", rule, ns);
    }
}

/// Compose conflicts JSON (pure) for testing purposes.
pub fn compose_conflicts_json(conflicts: &[Conflict]) -> JsonVal {
    json!({
        "conflicts": conflicts,
        "summary": { "conflicts": conflicts.len() },
    })
}

/// Compose generate JSON object (pure) for testing purposes.
pub fn compose_generate_json(report: &GenerateReport, mode: Mode) -> JsonVal {
    let items: Vec<_> = report
        .artifacts
        .iter()
        .enumerate()
        .map(|(i, a)| {
            let outcome = report.outcomes.get(i);
            let status = report.statuses.get(i).map(|(_, s)| *s);
            json!({
                "file": a.file_name,
                "namespace": a.namespace,
                "wrote": mode == Mode::Write && outcome.map(|o| o.ok()).unwrap_or(false),
                "error": outcome.and_then(|o| o.error.clone()),
                "status": status,
                "preview": if mode == Mode::DryRun { Some(&a.contents) } else { None },
            })
        })
        .collect();
    let summary = json!({
        "namespaces": report.reconciled.namespaces.len(),
        "rules": report.reconciled.rule_count(),
        "conflicts": report.reconciled.conflicts.len(),
        "artifacts": report.artifacts.len(),
        "failed": report.write_failures(),
        "outOfDate": report.out_of_date(),
    });
    json!({
        "results": items,
        "conflicts": report.reconciled.conflicts,
        "summary": summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Namespace, RuleTable, Setting};
    use crate::reconcile::Reconciled;
    use crate::writer::{self, WriteOutcome};
    use std::path::PathBuf;

    fn conflict() -> Conflict {
        Conflict {
            profile: "*.ts".into(),
            rule: "r".into(),
            namespace: "eslint".into(),
            stored: serde_json::from_str("[1, {\"a\": 1}]").unwrap(),
            incoming: Setting::Number(2.0),
        }
    }

    fn report(mode: Mode) -> GenerateReport {
        let mut rules = RuleTable::new();
        rules.insert("no-console".into(), Setting::Number(1.0));
        let reconciled = Reconciled {
            namespaces: vec![Namespace {
                label: "eslint".into(),
                rules,
            }],
            conflicts: vec![conflict()],
        };
        let artifacts = writer::render(&reconciled, "js");
        let outcomes = if mode == Mode::Write {
            vec![
                WriteOutcome {
                    path: PathBuf::from("out/eslint_rules.js"),
                    error: None,
                },
                WriteOutcome {
                    path: PathBuf::from("out/index.js"),
                    error: Some("permission denied".into()),
                },
            ]
        } else {
            Vec::new()
        };
        GenerateReport {
            reconciled,
            artifacts,
            outcomes,
            statuses: Vec::new(),
        }
    }

    #[test]
    fn test_format_conflict_shows_both_settings() {
        assert_eq!(
            format_conflict(&conflict()),
            r#"Rule from *.ts differs -> r --> [1,{"a":1}] - 2"#
        );
    }

    #[test]
    fn test_compose_generate_json_write() {
        let out = compose_generate_json(&report(Mode::Write), Mode::Write);
        assert_eq!(out["summary"]["artifacts"], 2);
        assert_eq!(out["summary"]["failed"], 1);
        assert_eq!(out["results"][0]["wrote"], true);
        assert_eq!(out["results"][1]["wrote"], false);
        assert_eq!(out["results"][1]["error"], "permission denied");
        assert!(out["results"][0]["preview"].is_null());
        assert_eq!(out["conflicts"][0]["profile"], "*.ts");
    }

    #[test]
    fn test_compose_generate_json_dry_run_has_previews() {
        let out = compose_generate_json(&report(Mode::DryRun), Mode::DryRun);
        assert!(out["results"][0]["preview"]
            .as_str()
            .unwrap()
            .starts_with("// eslint Rules"));
        assert_eq!(out["summary"]["failed"], 0);
    }

    #[test]
    fn test_compose_conflicts_json_shape() {
        let out = compose_conflicts_json(&[conflict()]);
        assert_eq!(out["summary"]["conflicts"], 1);
        assert_eq!(out["conflicts"][0]["rule"], "r");
        assert_eq!(out["conflicts"][0]["incoming"], 2);
    }

    #[test]
    fn test_console_sink_collects_in_json_mode() {
        let mut sink = ConsoleSink::new("json");
        sink.report(Diagnostic::Conflict(conflict()));
        assert_eq!(sink.collected.conflicts().count(), 1);
    }
}
