//! Severity normalization.
//!
//! Rule settings arrive either as a bare token (`"warn"`), a bare code
//! (`1`), or a sequence whose first slot is the severity followed by
//! option payloads. Normalization rewrites a text severity into its numeric
//! code and collapses option-less sequences to the bare code.

use crate::models::Setting;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Severity {
    Off = 0,
    Warn = 1,
    Error = 2,
    /// Any token other than off|warn|error. Kept so the bad declaration
    /// stays visible in generated output and in conflicts.
    Unknown = 3,
}

impl Severity {
    pub fn from_token(token: &str) -> Self {
        match token {
            "off" => Severity::Off,
            "warn" => Severity::Warn,
            "error" => Severity::Error,
            _ => Severity::Unknown,
        }
    }

    pub fn code(self) -> u8 {
        self as u8
    }
}

fn code_of(token: &str) -> Setting {
    Setting::Number(f64::from(Severity::from_token(token).code()))
}

/// Normalize a raw rule setting. Never fails.
pub fn normalize(raw: Setting) -> Setting {
    match raw {
        Setting::Text(token) => code_of(&token),
        Setting::Sequence(mut items) => {
            let code = match items.first() {
                Some(Setting::Text(token)) => Some(code_of(token)),
                _ => None,
            };
            if let Some(code) = code {
                items[0] = code;
            }
            if items.len() == 1 {
                if let Some(only) = items.pop() {
                    return only;
                }
            }
            Setting::Sequence(items)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn setting(v: serde_json::Value) -> Setting {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn test_single_element_sequence_collapses() {
        assert_eq!(normalize(setting(json!(["error"]))), Setting::Number(2.0));
        assert_eq!(normalize(setting(json!([0]))), Setting::Number(0.0));
    }

    #[test]
    fn test_tokens_map_to_codes() {
        assert_eq!(normalize(setting(json!("off"))), Setting::Number(0.0));
        assert_eq!(normalize(setting(json!("warn"))), Setting::Number(1.0));
        assert_eq!(normalize(setting(json!(["error"]))), Setting::Number(2.0));
    }

    #[test]
    fn test_unknown_token_yields_code_three() {
        assert_eq!(normalize(setting(json!("nonsense"))), Setting::Number(3.0));
        assert_eq!(
            normalize(setting(json!(["nonsense", "always"]))),
            setting(json!([3, "always"]))
        );
    }

    #[test]
    fn test_options_are_kept_with_numeric_first_slot() {
        let out = normalize(setting(json!(["warn", {"max": 2}, "x"])));
        assert_eq!(out, setting(json!([1, {"max": 2}, "x"])));
    }

    #[test]
    fn test_numeric_severity_passes_through() {
        let raw = setting(json!([2, "always"]));
        assert_eq!(normalize(raw.clone()), raw);
    }
}
