//! Rulefold CLI binary entry point.
//! Delegates to library modules for gathering and writing, then prints results.

use clap::Parser;
use rulefold::cli::{Cli, Commands};
use rulefold::config::{self, Effective};
use rulefold::generate::{self, Mode};
use rulefold::namespace::{NamespaceResolver, DEFAULT_NAMESPACE};
use rulefold::output::{self, ConsoleSink};
use rulefold::utils::{error_prefix, note_prefix, warn_prefix};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    rulefold::init_tracing(cli.verbose);
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {}", error_prefix(), e);
            ExitCode::from(2)
        }
    }
}

fn effective(overrides: &config::CliOverrides) -> rulefold::Result<Effective> {
    let eff = config::resolve_effective(overrides)?;
    // Friendly note if no rulefold config was found
    if !eff.config_found && eff.output != "json" {
        eprintln!(
            "{} No rulefold.toml found; using defaults.",
            note_prefix()
        );
    }
    Ok(eff)
}

fn run(cli: Cli) -> rulefold::Result<ExitCode> {
    match cli.cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(ExitCode::SUCCESS)
        }
        Commands::Generate {
            source,
            out_dir,
            ext,
            dry_run,
            check,
            fail_on_conflict,
        } => {
            let mut overrides = source.overrides();
            overrides.out_dir = out_dir;
            overrides.ext = ext;
            let eff = effective(&overrides)?;
            // --check wins over --dry-run; neither writes
            let mode = if check {
                Mode::Check
            } else if dry_run {
                Mode::DryRun
            } else {
                Mode::Write
            };
            let mut sink = ConsoleSink::new(&eff.output);
            let report = generate::run_generate(&eff, mode, &mut sink)?;
            output::print_generate(&report, mode, &eff.output, &eff.out_dir);
            if mode == Mode::Write {
                output::print_banner(&eff.out_dir, &eff.output);
            }

            let mut failed = false;
            if report.write_failures() > 0 {
                eprintln!(
                    "{} {} artifact(s) could not be written",
                    warn_prefix(),
                    report.write_failures()
                );
                failed = true;
            }
            if mode == Mode::Check && report.out_of_date() > 0 {
                failed = true;
            }
            if fail_on_conflict && !report.reconciled.conflicts.is_empty() {
                failed = true;
            }
            Ok(if failed {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            })
        }
        Commands::Conflicts { source } => {
            let eff = effective(&source.overrides())?;
            // Printing happens once at the end, so do not echo while folding
            let mut sink = rulefold::diagnostics::Collector::default();
            let reconciled = generate::gather(&eff, &mut sink)?;
            output::print_conflicts(&reconciled.conflicts, &eff.output);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Namespace {
            rules,
            default_namespace,
            output,
        } => {
            let resolver =
                NamespaceResolver::new(default_namespace.unwrap_or_else(|| DEFAULT_NAMESPACE.into()));
            let pairs: Vec<(String, String)> = rules
                .into_iter()
                .map(|r| {
                    let ns = resolver.resolve(&r);
                    (r, ns)
                })
                .collect();
            output::print_namespaces(&pairs, output.as_deref().unwrap_or("human"));
            Ok(ExitCode::SUCCESS)
        }
    }
}
