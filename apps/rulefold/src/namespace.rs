//! Plugin namespace derivation.
//!
//! The namespace is the partition key for reconciliation and for output
//! artifacts, so resolution is a pure function of the rule name.

use regex::Regex;
use std::sync::LazyLock;

/// Namespace for rules without a `/`-delimited origin prefix.
pub const DEFAULT_NAMESPACE: &str = "eslint";

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));
static ESLINT_AFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-_]eslint").expect("valid regex"));

#[derive(Debug, Clone)]
pub struct NamespaceResolver {
    default: String,
}

impl Default for NamespaceResolver {
    fn default() -> Self {
        Self::new(DEFAULT_NAMESPACE)
    }
}

impl NamespaceResolver {
    pub fn new(default: impl Into<String>) -> Self {
        Self {
            default: default.into(),
        }
    }

    pub fn default_label(&self) -> &str {
        &self.default
    }

    /// Namespace label for a qualified rule name.
    ///
    /// `@typescript-eslint/no-unused-vars` → `typescript`,
    /// `import/no-cycle` → `import`, `no-console` → the default.
    pub fn resolve(&self, rule: &str) -> String {
        match rule.split_once('/') {
            Some((origin, _)) => self.origin_label(origin),
            None => self.default.clone(),
        }
    }

    /// Namespace label for a plugin name as listed in a config's `plugins`.
    ///
    /// Treated as the origin of a rule from that plugin, so `@next/next`
    /// maps to `next` just like `@next/next/no-img-element` does.
    pub fn for_plugin(&self, plugin: &str) -> String {
        self.resolve(&format!("{plugin}/"))
    }

    fn origin_label(&self, origin: &str) -> String {
        let origin = origin.trim();
        let origin = origin.strip_prefix('@').unwrap_or(origin);
        let collapsed = WHITESPACE.replace_all(origin, "_").to_lowercase();
        let label = ESLINT_AFFIX.replace(&collapsed, "");
        if label.is_empty() {
            self.default.clone()
        } else {
            label.into_owned()
        }
    }
}
