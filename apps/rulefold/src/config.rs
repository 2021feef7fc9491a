//! Configuration discovery and effective settings resolution.
//!
//! Rulefold reads `rulefold.toml|yaml|yml` from the repository root (or
//! closest ancestor) and merges it with CLI flags to produce an `Effective`
//! config.
//! Defaults:
//! - `input`: none (the engine is queried through `command`)
//! - `command`: `npx eslint --print-config {file}`
//! - `base`: `*.js`; `profiles`: `*.jsx`, `*.ts`, `*.tsx`
//! - `out_dir`: `configs/eslint_rules-tmp`; `ext`: `js`
//! - `default_namespace`: `eslint`; `output`: `human`
//!
//! Overrides precedence: CLI > config file > defaults.

use crate::error::{Error, Result};
use crate::loader::DEFAULT_COMMAND;
use crate::namespace::DEFAULT_NAMESPACE;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_BASE: &str = "*.js";
pub const DEFAULT_PROFILES: [&str; 3] = ["*.jsx", "*.ts", "*.tsx"];
pub const DEFAULT_OUT_DIR: &str = "configs/eslint_rules-tmp";
pub const DEFAULT_EXT: &str = "js";

const CONFIG_FILES: [&str; 3] = ["rulefold.toml", "rulefold.yaml", "rulefold.yml"];

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `rulefold.toml|yaml`.
pub struct RulefoldConfig {
    /// Snapshot of the resolved lint configuration, relative to the root.
    pub input: Option<String>,
    pub command: Option<String>,
    pub base: Option<String>,
    pub profiles: Option<Vec<String>>,
    #[serde(alias = "outDir")]
    pub out_dir: Option<String>,
    pub ext: Option<String>,
    #[serde(alias = "defaultNamespace")]
    pub default_namespace: Option<String>,
    pub output: Option<String>,
}

#[derive(Debug, Default, Clone)]
/// Values given on the command line; `None` falls through to the config.
pub struct CliOverrides {
    pub repo_root: Option<String>,
    pub input: Option<String>,
    pub command: Option<String>,
    pub out_dir: Option<String>,
    pub ext: Option<String>,
    pub output: Option<String>,
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by commands after applying precedence.
pub struct Effective {
    pub repo_root: PathBuf,
    pub config_found: bool,
    pub input: Option<PathBuf>,
    pub command: String,
    pub base: String,
    pub profiles: Vec<String>,
    pub out_dir: PathBuf,
    pub ext: String,
    pub default_namespace: String,
    pub output: String,
}

/// Walk upward from `start` to detect the repository root.
///
/// Stops when a `rulefold.toml|yaml|yml` or a `.git` directory is found.
pub fn detect_repo_root(start: &Path) -> PathBuf {
    let mut cur = start;
    loop {
        if CONFIG_FILES.iter().any(|f| cur.join(f).exists()) || cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return start.to_path_buf(),
        }
    }
}

/// Load `RulefoldConfig` from the first config file present in `root`.
///
/// A missing file is `Ok(None)`; an unreadable or invalid one is an error.
pub fn load_config(root: &Path) -> Result<Option<RulefoldConfig>> {
    for name in CONFIG_FILES {
        let p = root.join(name);
        if !p.exists() {
            continue;
        }
        let s = fs::read_to_string(&p).map_err(|source| Error::Io {
            path: p.clone(),
            source,
        })?;
        let parsed = if name.ends_with(".toml") {
            toml::from_str::<RulefoldConfig>(&s).map_err(|e| e.to_string())
        } else {
            serde_yaml::from_str::<RulefoldConfig>(&s).map_err(|e| e.to_string())
        };
        return parsed
            .map(Some)
            .map_err(|message| Error::Parse { path: p, message });
    }
    Ok(None)
}

/// Resolve `Effective` by merging CLI flags, discovered config, and defaults.
pub fn resolve_effective(cli: &CliOverrides) -> Result<Effective> {
    let start = PathBuf::from(cli.repo_root.as_deref().unwrap_or("."));
    let repo_root = detect_repo_root(&start);
    let loaded = load_config(&repo_root)?;
    let config_found = loaded.is_some();
    let cfg = loaded.unwrap_or_default();

    let input = cli
        .input
        .clone()
        .or(cfg.input)
        .map(|p| repo_root.join(p));
    let command = cli
        .command
        .clone()
        .or(cfg.command)
        .unwrap_or_else(|| DEFAULT_COMMAND.to_string());
    let base = cfg.base.unwrap_or_else(|| DEFAULT_BASE.to_string());
    let profiles = cfg
        .profiles
        .unwrap_or_else(|| DEFAULT_PROFILES.iter().map(|s| s.to_string()).collect());
    if profiles.is_empty() {
        return Err(Error::Config("`profiles` must list at least one glob".into()));
    }
    let out_dir = repo_root.join(
        cli.out_dir
            .clone()
            .or(cfg.out_dir)
            .unwrap_or_else(|| DEFAULT_OUT_DIR.to_string()),
    );
    let ext = cli
        .ext
        .clone()
        .or(cfg.ext)
        .unwrap_or_else(|| DEFAULT_EXT.to_string());
    let default_namespace = cfg
        .default_namespace
        .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string());
    let output = cli
        .output
        .clone()
        .or(cfg.output)
        .unwrap_or_else(|| "human".to_string());
    if output != "human" && output != "json" {
        return Err(Error::Config(format!(
            "unknown output mode '{output}' (expected human|json)"
        )));
    }

    Ok(Effective {
        repo_root,
        config_found,
        input,
        command,
        base,
        profiles,
        out_dir,
        ext,
        default_namespace,
        output,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    fn at(root: &Path) -> CliOverrides {
        CliOverrides {
            repo_root: root.to_str().map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults_without_config() {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join(".git")).unwrap();
        let eff = resolve_effective(&at(dir.path())).unwrap();
        assert!(!eff.config_found);
        assert!(eff.input.is_none());
        assert_eq!(eff.command, DEFAULT_COMMAND);
        assert_eq!(eff.base, "*.js");
        assert_eq!(eff.profiles, vec!["*.jsx", "*.ts", "*.tsx"]);
        assert_eq!(eff.out_dir, dir.path().join("configs/eslint_rules-tmp"));
        assert_eq!(eff.default_namespace, "eslint");
        assert_eq!(eff.output, "human");
    }

    #[test]
    fn test_detect_and_load_toml() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let mut f = fs::File::create(root.join("rulefold.toml")).unwrap();
        writeln!(
            f,
            "{}",
            r#"
input = "lint/resolved.json"
profiles = ["*.ts"]
out_dir = "configs/eslint_rules"
output = "json"
    "#
        )
        .unwrap();

        let nested = root.join("packages/app");
        fs::create_dir_all(&nested).unwrap();
        let eff = resolve_effective(&CliOverrides {
            repo_root: nested.to_str().map(String::from),
            ..Default::default()
        })
        .unwrap();
        assert!(eff.config_found);
        assert_eq!(eff.repo_root, root);
        assert_eq!(eff.input, Some(root.join("lint/resolved.json")));
        assert_eq!(eff.profiles, vec!["*.ts"]);
        assert_eq!(eff.out_dir, root.join("configs/eslint_rules"));
        assert_eq!(eff.output, "json");
    }

    #[test]
    fn test_load_yaml_with_camel_case_aliases() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(
            root.join("rulefold.yaml"),
            "outDir: out\ndefaultNamespace: core\next: cjs\n",
        )
        .unwrap();
        let eff = resolve_effective(&at(root)).unwrap();
        assert_eq!(eff.out_dir, root.join("out"));
        assert_eq!(eff.default_namespace, "core");
        assert_eq!(eff.ext, "cjs");
    }

    #[test]
    fn test_cli_takes_precedence() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("rulefold.toml"), "output = \"json\"\next = \"cjs\"\n").unwrap();
        let mut cli = at(root);
        cli.output = Some("human".into());
        cli.input = Some("snap.yaml".into());
        let eff = resolve_effective(&cli).unwrap();
        assert_eq!(eff.output, "human");
        assert_eq!(eff.ext, "cjs");
        assert_eq!(eff.input, Some(root.join("snap.yaml")));
    }

    #[test]
    fn test_invalid_config_and_values_are_errors() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("rulefold.toml"), "profiles = [").unwrap();
        assert!(matches!(
            resolve_effective(&at(root)),
            Err(Error::Parse { .. })
        ));

        fs::write(root.join("rulefold.toml"), "profiles = []").unwrap();
        assert!(matches!(resolve_effective(&at(root)), Err(Error::Config(_))));

        fs::write(root.join("rulefold.toml"), "output = \"xml\"").unwrap();
        assert!(matches!(resolve_effective(&at(root)), Err(Error::Config(_))));
    }
}
