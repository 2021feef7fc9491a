//! Profile loading from an already-resolved lint configuration.
//!
//! The linting engine itself is an external collaborator. Two resolvers
//! are provided:
//! - [`SnapshotResolver`] reads one file mapping glob → resolved config
//!   (JSON, YAML or TOML, chosen by extension).
//! - [`CommandResolver`] runs a command such as
//!   `npx eslint --print-config {file}` and parses its JSON stdout.
//!
//! Any resolution failure is fatal for the run.

use crate::error::{Error, Result};
use crate::models::{FileProfile, RuleTable};
use glob::Pattern;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

/// Default command template for [`CommandResolver`].
pub const DEFAULT_COMMAND: &str = "npx eslint --print-config {file}";

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
/// What the engine reports for one glob. Unknown keys are ignored.
pub struct ResolvedConfig {
    #[serde(default)]
    pub plugins: Vec<String>,
    #[serde(default)]
    pub rules: RuleTable,
}

pub trait ConfigResolver {
    fn resolve(&self, glob: &str) -> Result<ResolvedConfig>;
}

/// Resolver backed by a snapshot file.
pub struct SnapshotResolver {
    path: PathBuf,
    entries: BTreeMap<String, ResolvedConfig>,
}

impl SnapshotResolver {
    pub fn open(path: &Path) -> Result<Self> {
        let s = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let parse_err = |message: String| Error::Parse {
            path: path.to_path_buf(),
            message,
        };
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let entries: BTreeMap<String, ResolvedConfig> = match ext.as_str() {
            "yaml" | "yml" => serde_yaml::from_str(&s).map_err(|e| parse_err(e.to_string()))?,
            "toml" => toml::from_str(&s).map_err(|e| parse_err(e.to_string()))?,
            _ => serde_json::from_str(&s).map_err(|e| parse_err(e.to_string()))?,
        };
        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }
}

impl ConfigResolver for SnapshotResolver {
    fn resolve(&self, glob: &str) -> Result<ResolvedConfig> {
        self.entries.get(glob).cloned().ok_or_else(|| Error::Resolve {
            glob: glob.to_string(),
            message: format!("no entry in snapshot {}", self.path.display()),
        })
    }
}

/// Resolver that shells out to the linting engine.
pub struct CommandResolver {
    template: String,
    cwd: PathBuf,
}

impl CommandResolver {
    /// `template` may contain `{file}`, replaced by a sample path matching
    /// the requested glob.
    pub fn new(template: impl Into<String>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            template: template.into(),
            cwd: cwd.into(),
        }
    }
}

impl ConfigResolver for CommandResolver {
    fn resolve(&self, glob: &str) -> Result<ResolvedConfig> {
        let sample = sample_path(glob)?;
        let cmd = self.template.replace("{file}", &sample);
        debug!(command = %cmd, "resolving lint configuration");
        let fail = |message: String| Error::Resolve {
            glob: glob.to_string(),
            message,
        };
        let out = Command::new("sh")
            .arg("-c")
            .arg(&cmd)
            .current_dir(&self.cwd)
            .output()
            .map_err(|e| fail(format!("failed to run `{cmd}`: {e}")))?;
        if !out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr);
            return Err(fail(format!("`{cmd}` exited with {}: {}", out.status, stderr.trim())));
        }
        serde_json::from_slice(&out.stdout)
            .map_err(|e| fail(format!("`{cmd}` printed invalid JSON: {e}")))
    }
}

/// Derive a file path that the glob matches, for engines that resolve
/// configuration per file rather than per pattern.
pub fn sample_path(glob: &str) -> Result<String> {
    let pattern = Pattern::new(glob).map_err(|e| Error::InvalidGlob {
        glob: glob.to_string(),
        message: e.to_string(),
    })?;
    let sample = glob
        .replace("**/", "")
        .replace('*', "sample")
        .replace('?', "x");
    if pattern.matches(&sample) {
        Ok(sample)
    } else {
        Err(Error::Resolve {
            glob: glob.to_string(),
            message: "cannot derive a sample file name matching this glob".into(),
        })
    }
}

/// Profiles read for one run.
#[derive(Debug, Clone)]
pub struct Gathered {
    /// Plugins declared by the base configuration.
    pub plugins: Vec<String>,
    /// In fold order.
    pub profiles: Vec<FileProfile>,
}

/// Resolve the base glob (for its plugin list) and then every profile glob
/// in order.
pub fn load_profiles(
    resolver: &dyn ConfigResolver,
    base: &str,
    globs: &[String],
) -> Result<Gathered> {
    info!("Using rules from {} as base", base);
    let plugins = resolver.resolve(base)?.plugins;
    info!("Gathering rules for [{}] files", globs.join(", "));
    let mut profiles = Vec::with_capacity(globs.len());
    for g in globs {
        let resolved = resolver.resolve(g)?;
        info!(glob = %g, rules = resolved.rules.len(), "profile resolved");
        profiles.push(FileProfile {
            glob: g.clone(),
            rules: resolved.rules,
        });
    }
    Ok(Gathered { plugins, profiles })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Setting;
    use tempfile::tempdir;

    #[test]
    fn test_snapshot_json_resolves_each_glob() {
        let dir = tempdir().unwrap();
        let p = dir.path().join("resolved.json");
        fs::write(
            &p,
            r#"{
  "*.js": { "plugins": ["import"], "rules": { "no-console": ["warn"] }, "env": {} },
  "*.ts": { "rules": { "import/no-cycle": "error" } }
}"#,
        )
        .unwrap();
        let r = SnapshotResolver::open(&p).unwrap();
        let base = r.resolve("*.js").unwrap();
        assert_eq!(base.plugins, vec!["import"]);
        assert_eq!(
            base.rules["no-console"],
            Setting::Sequence(vec![Setting::Text("warn".into())])
        );
        assert!(r.resolve("*.ts").unwrap().plugins.is_empty());
        assert!(matches!(r.resolve("*.tsx"), Err(Error::Resolve { .. })));
    }

    #[test]
    fn test_snapshot_yaml_and_toml() {
        let dir = tempdir().unwrap();
        let y = dir.path().join("resolved.yaml");
        fs::write(&y, "'*.ts':\n  rules:\n    max-len: [error, {code: .inf}]\n").unwrap();
        let ry = SnapshotResolver::open(&y).unwrap();
        assert!(ry.resolve("*.ts").unwrap().rules.contains_key("max-len"));

        let t = dir.path().join("resolved.toml");
        fs::write(&t, "[\"*.ts\"]\nplugins = [\"react\"]\n[\"*.ts\".rules]\nsemi = [\"error\", \"never\"]\n").unwrap();
        let rt = SnapshotResolver::open(&t).unwrap();
        let ts = rt.resolve("*.ts").unwrap();
        assert_eq!(ts.plugins, vec!["react"]);
        assert!(ts.rules.contains_key("semi"));
    }

    #[test]
    fn test_snapshot_errors() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            SnapshotResolver::open(&dir.path().join("missing.json")),
            Err(Error::Io { .. })
        ));
        let bad = dir.path().join("bad.json");
        fs::write(&bad, "{ not json").unwrap();
        assert!(matches!(SnapshotResolver::open(&bad), Err(Error::Parse { .. })));
    }

    #[test]
    fn test_sample_path() {
        assert_eq!(sample_path("*.ts").unwrap(), "sample.ts");
        assert_eq!(sample_path("*.jsx").unwrap(), "sample.jsx");
        assert!(matches!(sample_path("*.[ts"), Err(Error::InvalidGlob { .. })));
    }

    #[test]
    fn test_load_profiles_keeps_order_and_base_plugins() {
        struct Fixed;
        impl ConfigResolver for Fixed {
            fn resolve(&self, glob: &str) -> Result<ResolvedConfig> {
                let mut rules = RuleTable::new();
                rules.insert(format!("rule-{glob}"), Setting::Number(1.0));
                Ok(ResolvedConfig {
                    plugins: vec![format!("plugin-{glob}")],
                    rules,
                })
            }
        }
        let globs = vec!["*.jsx".to_string(), "*.ts".to_string()];
        let g = load_profiles(&Fixed, "*.js", &globs).unwrap();
        assert_eq!(g.plugins, vec!["plugin-*.js"]);
        let order: Vec<_> = g.profiles.iter().map(|p| p.glob.as_str()).collect();
        assert_eq!(order, vec!["*.jsx", "*.ts"]);
    }

    #[test]
    fn test_load_profiles_aborts_on_first_failure() {
        struct Failing;
        impl ConfigResolver for Failing {
            fn resolve(&self, glob: &str) -> Result<ResolvedConfig> {
                if glob == "*.ts" {
                    Err(Error::Resolve {
                        glob: glob.into(),
                        message: "boom".into(),
                    })
                } else {
                    Ok(ResolvedConfig::default())
                }
            }
        }
        let globs = vec!["*.jsx".to_string(), "*.ts".to_string(), "*.tsx".to_string()];
        let err = load_profiles(&Failing, "*.js", &globs).unwrap_err();
        assert!(err.to_string().contains("*.ts"));
    }

    #[cfg(unix)]
    #[test]
    fn test_command_resolver_parses_stdout() {
        let dir = tempdir().unwrap();
        let r = CommandResolver::new(
            r#"printf '{"plugins":["x"],"rules":{"f":"{file}"}}'"#,
            dir.path(),
        );
        let out = r.resolve("*.ts").unwrap();
        assert_eq!(out.plugins, vec!["x"]);
        assert_eq!(out.rules["f"], Setting::Text("sample.ts".into()));

        let failing = CommandResolver::new("exit 3", dir.path());
        assert!(matches!(failing.resolve("*.ts"), Err(Error::Resolve { .. })));
    }
}
