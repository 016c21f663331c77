// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Message-key translation for status emissions.

/// Resolves a message key plus `{name}` arguments to localised text.
pub trait Translator: Send + Sync {
    fn translation(&self, key: &str, args: &[(&str, &str)]) -> String;
}

/// Built-in English catalog. Unknown keys resolve to the key itself so a
/// missing entry never hides a status transition.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnglishCatalog;

impl Translator for EnglishCatalog {
    fn translation(&self, key: &str, args: &[(&str, &str)]) -> String {
        let template = match key {
            "projectStatusController.buildStarted" => "Project build started",
            "projectStatusController.buildRank" => "Build queued, position {rank}",
            "projectStatusController.buildSuccess" => "Project built",
            "buildscripts.buildFailMissingFile" => {
                "Build failed: required file {file} is missing"
            }
            "projectUtil.projectDeleted" => "Project deleted",
            other => other,
        };
        args.iter().fold(template.to_string(), |text, (name, value)| {
            text.replace(&format!("{{{name}}}"), value)
        })
    }
}

#[cfg(test)]
#[path = "locale_tests.rs"]
mod tests;
