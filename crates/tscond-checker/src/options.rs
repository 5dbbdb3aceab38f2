//! Analyzer options.
//!
//! Hosts pass options as a JSON object with camelCase keys. Boolean options
//! also accept the strings `"true"`/`"false"` (and `"1"`, `"yes"`, `"on"`,
//! ...), as configuration files written by hand often quote them.

use crate::error::OptionsError;
use serde::{Deserialize, Deserializer};

fn deserialize_bool_or_string<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrString {
        Bool(bool),
        String(String),
    }

    match BoolOrString::deserialize(deserializer)? {
        BoolOrString::Bool(b) => Ok(b),
        BoolOrString::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(Error::custom(format!(
                "invalid boolean value: '{s}'. Expected true, false, 'true', or 'false'"
            ))),
        },
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConditionOptions {
    /// Do not report loop tests that are the literal `true` (`while (true)`).
    #[serde(deserialize_with = "deserialize_bool_or_string")]
    pub allow_constant_loop_conditions: bool,
    /// Analyze normally even when the host compiles without strict null checks.
    #[serde(deserialize_with = "deserialize_bool_or_string")]
    pub allow_loose_null_checks_without_strict_mode: bool,
}

impl ConditionOptions {
    pub fn from_json(text: &str) -> Result<Self, OptionsError> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Compiler settings of the host program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostOptions {
    pub strict_null_checks: bool,
}

impl Default for HostOptions {
    fn default() -> Self {
        HostOptions {
            strict_null_checks: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_off() {
        let options = ConditionOptions::from_json("{}").unwrap();
        assert_eq!(options, ConditionOptions::default());
    }

    #[test]
    fn accepts_quoted_booleans() {
        let options = ConditionOptions::from_json(
            r#"{"allowConstantLoopConditions": "yes", "allowLooseNullChecksWithoutStrictMode": true}"#,
        )
        .unwrap();
        assert!(options.allow_constant_loop_conditions);
        assert!(options.allow_loose_null_checks_without_strict_mode);
    }

    #[test]
    fn rejects_unknown_boolean_strings() {
        let err = ConditionOptions::from_json(r#"{"allowConstantLoopConditions": "sometimes"}"#)
            .unwrap_err();
        assert!(err.to_string().contains("invalid boolean value"));
    }
}
