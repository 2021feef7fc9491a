//! CLI argument parsing via `clap`.

use crate::config::CliOverrides;
use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "rulefold",
    version,
    about = "Fold per-file-type lint rules into per-plugin rule modules",
    long_about = "Rulefold — gathers the lint rules resolved for several file-type profiles, reconciles them into one ruleset per plugin namespace, reports conflicting declarations, and writes deterministic rule modules.\n\nConfiguration precedence: CLI > rulefold.toml > defaults.",
    after_help = "Examples:\n  rulefold generate --input lint/resolved.json\n  rulefold generate --dry-run\n  rulefold generate --check --output json\n  rulefold conflicts\n  rulefold namespace @typescript-eslint/no-unused-vars no-console",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    /// Raise log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Args, Clone, Default)]
/// Options selecting where resolved lint configuration comes from.
pub struct SourceArgs {
    #[arg(long, help = "Repository root (default: current dir)")]
    pub repo_root: Option<String>,
    #[arg(long, help = "Snapshot of resolved configs per glob (json|yaml|toml)")]
    pub input: Option<String>,
    #[arg(long, help = "Command printing the resolved config for {file}")]
    pub command: Option<String>,
    #[arg(long, help = "Output mode: human|json (default: human)")]
    pub output: Option<String>,
}

impl SourceArgs {
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            repo_root: self.repo_root.clone(),
            input: self.input.clone(),
            command: self.command.clone(),
            output: self.output.clone(),
            ..Default::default()
        }
    }
}

#[derive(Subcommand)]
/// Supported subcommands.
pub enum Commands {
    /// Show version
    #[command(about = "Show version", long_about = "Print the current rulefold version.")]
    Version,
    /// Generate per-namespace rule modules and an index
    #[command(
        about = "Generate rule modules",
        long_about = "Reconcile rules across profiles and write one module per plugin namespace plus an index. --dry-run and --check never write.",
        after_help = "Examples:\n  rulefold generate --input lint/resolved.json --out-dir configs/eslint_rules-tmp\n  rulefold generate --check"
    )]
    Generate {
        #[command(flatten)]
        source: SourceArgs,
        #[arg(long, help = "Output directory (default: configs/eslint_rules-tmp)")]
        out_dir: Option<String>,
        #[arg(long, help = "Artifact file extension (default: js)")]
        ext: Option<String>,
        #[arg(long, action = ArgAction::SetTrue, help = "Print artifacts without writing")]
        dry_run: bool,
        #[arg(long, action = ArgAction::SetTrue, help = "Exit non-zero if artifacts on disk are missing or stale (implies no write)")]
        check: bool,
        #[arg(long, action = ArgAction::SetTrue, help = "Exit non-zero when profiles disagree on a rule")]
        fail_on_conflict: bool,
    },
    /// Report conflicting rule declarations across profiles
    #[command(
        about = "Report conflicts",
        long_about = "Reconcile rules across profiles and print the rules whose settings differ between profiles. Nothing is written."
    )]
    Conflicts {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Show the namespace each rule name belongs to
    #[command(about = "Resolve rule namespaces")]
    Namespace {
        #[arg(required = true, help = "Rule names, e.g. import/no-cycle")]
        rules: Vec<String>,
        #[arg(long, help = "Namespace for rules without a plugin prefix (default: eslint)")]
        default_namespace: Option<String>,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
    },
}
