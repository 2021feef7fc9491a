//! Rule reconciliation across file-type profiles.
//!
//! Profiles fold in order into one rule table per namespace. The first
//! profile to declare a rule wins; a later profile declaring a different
//! setting produces a [`Conflict`] and leaves the stored value untouched.
//! Narrower profiles are folded after broader ones, so silently overriding
//! would make the output depend on fold order.

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::models::{Conflict, FileProfile, Namespace, RuleTable};
use crate::namespace::NamespaceResolver;
use crate::severity;
use std::collections::BTreeMap;
use tracing::debug;

/// Frozen result of a reconciliation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciled {
    /// Sorted by label.
    pub namespaces: Vec<Namespace>,
    pub conflicts: Vec<Conflict>,
}

impl Reconciled {
    pub fn rule_count(&self) -> usize {
        self.namespaces.iter().map(|ns| ns.rules.len()).sum()
    }
}

pub struct Reconciler {
    resolver: NamespaceResolver,
    tables: BTreeMap<String, RuleTable>,
    conflicts: Vec<Conflict>,
}

impl Reconciler {
    /// Start with an empty table for the default namespace and for each
    /// known plugin.
    pub fn new(resolver: NamespaceResolver, plugins: &[String]) -> Self {
        let mut tables = BTreeMap::new();
        tables.insert(resolver.default_label().to_string(), RuleTable::new());
        for p in plugins {
            tables.entry(resolver.for_plugin(p)).or_default();
        }
        Self {
            resolver,
            tables,
            conflicts: Vec::new(),
        }
    }

    /// Fold one profile into the tables.
    pub fn fold(&mut self, profile: &FileProfile, sink: &mut dyn DiagnosticSink) {
        for (rule, raw) in &profile.rules {
            let setting = severity::normalize(raw.clone());
            let label = self.resolver.resolve(rule);
            if !self.tables.contains_key(&label) {
                debug!(namespace = %label, rule = %rule, "namespace not among configured plugins; adding it");
            }
            let table = self.tables.entry(label.clone()).or_default();
            match table.get(rule) {
                None => {
                    table.insert(rule.clone(), setting);
                }
                Some(stored) if *stored != setting => {
                    let conflict = Conflict {
                        profile: profile.glob.clone(),
                        rule: rule.clone(),
                        namespace: label,
                        stored: stored.clone(),
                        incoming: setting,
                    };
                    sink.report(Diagnostic::Conflict(conflict.clone()));
                    self.conflicts.push(conflict);
                }
                Some(_) => {}
            }
        }
    }

    pub fn finish(self) -> Reconciled {
        Reconciled {
            namespaces: self
                .tables
                .into_iter()
                .map(|(label, rules)| Namespace { label, rules })
                .collect(),
            conflicts: self.conflicts,
        }
    }
}

/// Fold all profiles in order and freeze the result.
pub fn reconcile(
    resolver: NamespaceResolver,
    plugins: &[String],
    profiles: &[FileProfile],
    sink: &mut dyn DiagnosticSink,
) -> Reconciled {
    let mut rc = Reconciler::new(resolver, plugins);
    for p in profiles {
        rc.fold(p, sink);
    }
    rc.finish()
}
