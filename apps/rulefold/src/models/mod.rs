//! Shared data models for rule settings, profiles, namespaces and conflicts.

use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Mapping of rule name to its (normalized or raw) setting.
///
/// Backed by a `BTreeMap`, so iteration is always in ascending key order.
pub type RuleTable = BTreeMap<String, Setting>;

/// A rule setting value as reported by the linting engine.
///
/// `Flag` and `Null` only appear inside option payloads; severity slots are
/// either `Text` tokens or `Number` codes.
#[derive(Debug, Clone, PartialEq)]
pub enum Setting {
    Number(f64),
    Text(String),
    Flag(bool),
    Null,
    Sequence(Vec<Setting>),
    /// Keys are kept sorted, which makes mapping output canonical.
    Mapping(BTreeMap<String, Setting>),
}

impl Setting {
    /// True for values that may appear in a single-line array literal.
    pub fn is_scalar(&self) -> bool {
        matches!(self, Setting::Number(_) | Setting::Text(_) | Setting::Flag(_))
    }
}

impl fmt::Display for Setting {
    /// Compact JSON rendering used in diagnostics.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&s)
    }
}

impl Serialize for Setting {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            // Integral values print without a fraction, like JSON.stringify does
            Setting::Number(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < 9.0e15 => {
                serializer.serialize_i64(*n as i64)
            }
            Setting::Number(n) => serializer.serialize_f64(*n),
            Setting::Text(s) => serializer.serialize_str(s),
            Setting::Flag(b) => serializer.serialize_bool(*b),
            Setting::Null => serializer.serialize_unit(),
            Setting::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for it in items {
                    seq.serialize_element(it)?;
                }
                seq.end()
            }
            Setting::Mapping(map) => {
                let mut m = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map {
                    m.serialize_entry(k, v)?;
                }
                m.end()
            }
        }
    }
}

struct SettingVisitor;

impl<'de> Visitor<'de> for SettingVisitor {
    type Value = Setting;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a rule setting (number, string, boolean, null, array or map)")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Setting, E> {
        Ok(Setting::Flag(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Setting, E> {
        Ok(Setting::Number(v as f64))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Setting, E> {
        Ok(Setting::Number(v as f64))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Setting, E> {
        Ok(Setting::Number(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Setting, E> {
        Ok(Setting::Text(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Setting, E> {
        Ok(Setting::Text(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Setting, E> {
        Ok(Setting::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Setting, E> {
        Ok(Setting::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Setting, D::Error> {
        Setting::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Setting, A::Error> {
        let mut items = Vec::new();
        while let Some(it) = seq.next_element()? {
            items.push(it);
        }
        Ok(Setting::Sequence(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Setting, A::Error> {
        let mut out = BTreeMap::new();
        while let Some((k, v)) = map.next_entry::<String, Setting>()? {
            out.insert(k, v);
        }
        Ok(Setting::Mapping(out))
    }
}

impl<'de> Deserialize<'de> for Setting {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(SettingVisitor)
    }
}

#[derive(Debug, Clone, PartialEq)]
/// A file-type glob paired with the rule table the engine resolved for it.
pub struct FileProfile {
    pub glob: String,
    pub rules: RuleTable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// A plugin namespace and its reconciled rules.
pub struct Namespace {
    pub label: String,
    pub rules: RuleTable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// Two profiles disagreeing on one rule. `stored` is the value that was kept.
pub struct Conflict {
    pub profile: String,
    pub rule: String,
    pub namespace: String,
    pub stored: Setting,
    pub incoming: Setting,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_nested_json() {
        let s: Setting = serde_json::from_value(json!(["error", {"b": 1, "a": [true, null]}])).unwrap();
        let mut inner = BTreeMap::new();
        inner.insert(
            "a".to_string(),
            Setting::Sequence(vec![Setting::Flag(true), Setting::Null]),
        );
        inner.insert("b".to_string(), Setting::Number(1.0));
        assert_eq!(
            s,
            Setting::Sequence(vec![Setting::Text("error".into()), Setting::Mapping(inner)])
        );
    }

    #[test]
    fn test_yaml_infinity_becomes_infinite_number() {
        let s: Setting = serde_yaml::from_str("[2, {max: .inf}]").unwrap();
        let Setting::Sequence(items) = s else {
            panic!("expected sequence")
        };
        let Setting::Mapping(m) = &items[1] else {
            panic!("expected mapping")
        };
        assert_eq!(m["max"], Setting::Number(f64::INFINITY));
    }

    #[test]
    fn test_display_is_compact_json() {
        let s: Setting = serde_json::from_value(json!([1, {"a": 1.5, "b": "x"}])).unwrap();
        assert_eq!(s.to_string(), r#"[1,{"a":1.5,"b":"x"}]"#);
    }

    #[test]
    fn test_structural_equality_ignores_key_order() {
        let a: Setting = serde_json::from_str(r#"{"x": 1, "y": [1, 2]}"#).unwrap();
        let b: Setting = serde_json::from_str(r#"{"y": [1, 2], "x": 1}"#).unwrap();
        assert_eq!(a, b);
    }
}
