// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `.cw-settings` document: user overrides read at create time.

use serde::{Deserialize, Deserializer};

/// Include/exclude lists inside the `watchedFiles` setting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchedFilesSetting {
    #[serde(default)]
    pub include_files: Option<Vec<String>>,
    #[serde(default)]
    pub exclude_files: Option<Vec<String>>,
}

/// Parsed `.cw-settings` JSON. Unknown fields are ignored; ports accept
/// either JSON strings or numbers and are coerced to strings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSettings {
    #[serde(default, deserialize_with = "string_or_number")]
    pub internal_port: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub internal_debug_port: Option<String>,
    #[serde(default)]
    pub context_root: Option<String>,
    #[serde(default)]
    pub health_check: Option<String>,
    #[serde(default)]
    pub ignored_paths: Option<Vec<String>>,
    #[serde(default)]
    pub maven_profiles: Option<Vec<String>>,
    #[serde(default)]
    pub maven_properties: Option<Vec<String>>,
    #[serde(default)]
    pub watched_files: Option<WatchedFilesSetting>,
}

impl ProjectSettings {
    pub fn parse(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Accepts `"3000"`, `3000`, or `null`; everything else is a type error.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected string or number for port, got {other}"
        ))),
    }
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
