//! Shared Run Context
//!
//! The key-value state threaded through every step of a single run. It is
//! seeded with the package name and version before the first step and
//! mutated in place by steps (a version bump overwrites `version`), so a
//! value written by one step is visible to every later step.

use std::collections::BTreeMap;

use log::debug;

use super::metadata::PackageMetadata;

/// Key holding the package name.
pub const PKGNAME: &str = "pkgname";

/// Key holding the current package version.
pub const VERSION: &str = "version";

/// Mutable state shared by all steps of one run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    values: BTreeMap<String, String>,

    /// Abort on a failing automated command instead of warning
    strict: bool,
}

impl Context {
    /// Creates a context seeded from resolved package metadata.
    pub fn from_metadata(metadata: PackageMetadata) -> Self {
        let mut context = Self::default();
        context.set(PKGNAME, metadata.pkgname);
        context.set(VERSION, metadata.version);
        context
    }

    /// Enables or disables strict command checking.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Returns true when failing commands abort the run.
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Gets a value by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Sets a value, replacing any previous one.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        debug!("Context: {} = {}", key, value);
        self.values.insert(key, value);
    }

    /// The package name, or an empty string before seeding.
    pub fn pkgname(&self) -> &str {
        self.get(PKGNAME).unwrap_or_default()
    }

    /// The current version, or an empty string before seeding.
    pub fn version(&self) -> &str {
        self.get(VERSION).unwrap_or_default()
    }

    /// Returns true once both `pkgname` and `version` are present.
    pub fn is_seeded(&self) -> bool {
        self.values.contains_key(PKGNAME) && self.values.contains_key(VERSION)
    }

    /// Substitutes `{key}` placeholders with context values.
    ///
    /// Placeholders naming an unknown key are left untouched.
    pub fn render(&self, template: &str) -> String {
        self.values
            .iter()
            .fold(template.to_string(), |text, (key, value)| {
                text.replace(&format!("{{{}}}", key), value)
            })
    }

    /// Iterates over all keys and values in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
