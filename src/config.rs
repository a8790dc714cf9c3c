//! Configuration management for mkrpm.
//!
//! Reads configuration from the process environment, which `main` seeds
//! from a `.env` file. Environment variables take precedence over .env file.
//! Command-line flags override both.

use std::collections::HashMap;

use crate::clean::CleanPolicy;
use crate::collect::MatchMode;
use crate::error::{Error, Result};

/// Default builder command. The spec file path is appended to it.
pub const DEFAULT_BUILDER: &str = "rpmbuild -ba";

/// Default `License:` tag.
pub const DEFAULT_LICENSE: &str = "MIT";

/// mkrpm configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Builder command prefix, split with shell word rules (MKRPM_BUILDER)
    pub builder: String,
    /// Pass `--define "_topdir <tree>"` to the builder (MKRPM_DEFINE_TOPDIR)
    pub define_topdir: bool,
    /// License tag written into the spec file (MKRPM_LICENSE)
    pub license: String,
    /// Working tree cleanup (MKRPM_CLEAN)
    pub clean: CleanPolicy,
    /// Artifact match mode (MKRPM_MATCH)
    pub match_mode: MatchMode,
    /// Accept a build that produced no artifacts (MKRPM_ALLOW_EMPTY)
    pub allow_empty: bool,
    /// Also collect source RPMs (MKRPM_COLLECT_SRPMS)
    pub collect_srpms: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            builder: DEFAULT_BUILDER.to_string(),
            define_topdir: true,
            license: DEFAULT_LICENSE.to_string(),
            clean: CleanPolicy::default(),
            match_mode: MatchMode::default(),
            allow_empty: false,
            collect_srpms: false,
        }
    }
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// Only `MKRPM_*` variables are read. Unrelated variables may hold any
    /// bytes; a non-UTF-8 `MKRPM_*` value is an [`Error::InvalidValue`].
    pub fn from_env() -> Result<Self> {
        let mut vars = HashMap::new();
        for (key, value) in std::env::vars_os() {
            let Some(key) = key.to_str().filter(|key| key.starts_with("MKRPM_")) else {
                continue;
            };
            let value = value.into_string().map_err(|value| {
                Error::invalid_value(key, value.to_string_lossy(), "not valid UTF-8")
            })?;
            vars.insert(key.to_string(), value);
        }
        Self::from_vars(&vars)
    }

    /// Build a configuration from a set of variables, falling back to defaults.
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(builder) = vars.get("MKRPM_BUILDER") {
            if builder.trim().is_empty() {
                return Err(Error::invalid_value(
                    "MKRPM_BUILDER",
                    builder.as_str(),
                    "builder command must not be empty",
                ));
            }
            config.builder = builder.clone();
        }

        if let Some(value) = vars.get("MKRPM_DEFINE_TOPDIR") {
            config.define_topdir = parse_bool("MKRPM_DEFINE_TOPDIR", value)?;
        }

        if let Some(license) = vars.get("MKRPM_LICENSE") {
            if !license.trim().is_empty() {
                config.license = license.trim().to_string();
            }
        }

        if let Some(value) = vars.get("MKRPM_CLEAN") {
            config.clean = value
                .parse()
                .map_err(|reason: String| {
                    Error::invalid_value("MKRPM_CLEAN", value.as_str(), reason)
                })?;
        }

        if let Some(value) = vars.get("MKRPM_MATCH") {
            config.match_mode = value
                .parse()
                .map_err(|reason: String| {
                    Error::invalid_value("MKRPM_MATCH", value.as_str(), reason)
                })?;
        }

        if let Some(value) = vars.get("MKRPM_ALLOW_EMPTY") {
            config.allow_empty = parse_bool("MKRPM_ALLOW_EMPTY", value)?;
        }

        if let Some(value) = vars.get("MKRPM_COLLECT_SRPMS") {
            config.collect_srpms = parse_bool("MKRPM_COLLECT_SRPMS", value)?;
        }

        Ok(config)
    }

    /// Print configuration for debugging.
    pub fn print(&self) {
        println!("Configuration:");
        println!("  MKRPM_BUILDER: {}", self.builder);
        println!("  MKRPM_DEFINE_TOPDIR: {}", self.define_topdir);
        println!("  MKRPM_LICENSE: {}", self.license);
        println!("  MKRPM_CLEAN: {}", self.clean);
        println!("  MKRPM_MATCH: {}", self.match_mode);
        println!("  MKRPM_ALLOW_EMPTY: {}", self.allow_empty);
        println!("  MKRPM_COLLECT_SRPMS: {}", self.collect_srpms);
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::invalid_value(key, value, "expected true or false")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_vars(&HashMap::new()).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.builder, "rpmbuild -ba");
        assert!(config.define_topdir);
        assert_eq!(config.license, "MIT");
        assert_eq!(config.clean, CleanPolicy::Keep);
        assert_eq!(config.match_mode, MatchMode::Loose);
        assert!(!config.allow_empty);
        assert!(!config.collect_srpms);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_vars(&vars(&[
            ("MKRPM_BUILDER", "rpmbuild -bb --quiet"),
            ("MKRPM_DEFINE_TOPDIR", "no"),
            ("MKRPM_LICENSE", "GPL-2.0-or-later"),
            ("MKRPM_CLEAN", "after"),
            ("MKRPM_MATCH", "strict"),
            ("MKRPM_ALLOW_EMPTY", "1"),
            ("MKRPM_COLLECT_SRPMS", "true"),
        ]))
        .unwrap();

        assert_eq!(config.builder, "rpmbuild -bb --quiet");
        assert!(!config.define_topdir);
        assert_eq!(config.license, "GPL-2.0-or-later");
        assert_eq!(config.clean, CleanPolicy::After);
        assert_eq!(config.match_mode, MatchMode::Strict);
        assert!(config.allow_empty);
        assert!(config.collect_srpms);
    }

    #[test]
    fn test_invalid_values_name_the_key() {
        let err = Config::from_vars(&vars(&[("MKRPM_CLEAN", "sometimes")])).unwrap_err();
        assert!(err.to_string().contains("MKRPM_CLEAN"));
        assert_eq!(err.exit_code(), 2);

        let err = Config::from_vars(&vars(&[("MKRPM_ALLOW_EMPTY", "maybe")])).unwrap_err();
        assert!(err.to_string().contains("MKRPM_ALLOW_EMPTY"));

        let err = Config::from_vars(&vars(&[("MKRPM_BUILDER", "   ")])).unwrap_err();
        assert!(err.to_string().contains("MKRPM_BUILDER"));
    }

    #[test]
    fn test_blank_license_keeps_default() {
        let config = Config::from_vars(&vars(&[("MKRPM_LICENSE", "")])).unwrap();
        assert_eq!(config.license, DEFAULT_LICENSE);
    }
}
