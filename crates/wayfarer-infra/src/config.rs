//! Deployment configuration
//!
//! Layered from lowest to highest precedence: built-in defaults, an optional
//! TOML file, process environment variables, then explicit `with_*` calls
//! (the CLI flags).

use crate::allow_list::parse_allowed_ip_ranges;
use crate::environment::{EnvironmentConfig, PRODUCTION};
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const PROJECT: &str = "wayfarer";

pub const DEFAULT_ENVIRONMENT: &str = "development";
/// Keeps `wayfarer-{environment}-rg` within the 90 character limit
pub const MAX_ENVIRONMENT_LEN: usize = 78;
pub const DEFAULT_LOCATION: &str = "eastus";
pub const DEFAULT_DNS_ZONE_RESOURCE_GROUP: &str = "wayfarer-dns-rg";
pub const DEFAULT_DNS_ZONE_NAME: &str = "wayfarer.travel";

pub const ENV_ENVIRONMENT: &str = "ENVIRONMENT";
pub const ENV_LOCATION: &str = "AZURE_LOCATION";
pub const ENV_DNS_ZONE_RESOURCE_GROUP: &str = "DNS_ZONE_RESOURCE_GROUP";
pub const ENV_DNS_ZONE_NAME: &str = "DNS_ZONE_NAME";
pub const ENV_ALLOWED_IP_RANGES: &str = "ALLOWED_IP_RANGES";

/// Inputs of one deployment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeployConfig {
    /// `production` or anything else (treated as development)
    pub environment: String,
    /// Azure region for regional resources
    pub location: String,
    /// Resource group holding the existing DNS zone
    pub dns_zone_resource_group: String,
    pub dns_zone_name: String,
    /// Raw `label|cidr;label|cidr` allow-list
    pub allowed_ip_ranges: Option<String>,
}

impl DeployConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overlaid with the process environment
    pub fn from_env() -> Self {
        Self::default().overlay_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with values from `lookup`
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::default().overlay_lookup(lookup)
    }

    /// Parse a TOML document; missing keys keep their defaults
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Override fields with variables present in `lookup`
    ///
    /// Blank values are ignored, except for the allow-list where an empty
    /// value is meaningful (it selects the loopback fallback).
    #[must_use]
    pub fn overlay_lookup<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let present = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = present(ENV_ENVIRONMENT) {
            self.environment = v.trim().to_string();
        }
        if let Some(v) = present(ENV_LOCATION) {
            self.location = v.trim().to_string();
        }
        if let Some(v) = present(ENV_DNS_ZONE_RESOURCE_GROUP) {
            self.dns_zone_resource_group = v.trim().to_string();
        }
        if let Some(v) = present(ENV_DNS_ZONE_NAME) {
            self.dns_zone_name = v.trim().to_string();
        }
        if let Some(v) = lookup(ENV_ALLOWED_IP_RANGES) {
            self.allowed_ip_ranges = Some(v);
        }
        self
    }

    #[must_use]
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = environment.into();
        self
    }

    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    #[must_use]
    pub fn with_dns_zone(
        mut self,
        resource_group: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        self.dns_zone_resource_group = resource_group.into();
        self.dns_zone_name = name.into();
        self
    }

    #[must_use]
    pub fn with_allowed_ip_ranges(mut self, raw: impl Into<String>) -> Self {
        self.allowed_ip_ranges = Some(raw.into());
        self
    }

    pub fn is_production(&self) -> bool {
        self.environment == PRODUCTION
    }

    /// Settings derived from the environment name
    pub fn environment_config(&self) -> EnvironmentConfig {
        EnvironmentConfig::for_environment(&self.environment)
    }

    /// Parsed allow-list, never empty
    pub fn allowed_ip_ranges(&self) -> Vec<String> {
        parse_allowed_ip_ranges(self.allowed_ip_ranges.as_deref())
    }

    /// Check values that end up inside resource names
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Resource group names: at most 90 characters of [A-Za-z0-9-_.()]
        let env_ok = !self.environment.is_empty()
            && self.environment.len() <= MAX_ENVIRONMENT_LEN
            && self
                .environment
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '(' | ')'));
        if !env_ok {
            return Err(ConfigError::InvalidEnvironment(self.environment.clone()));
        }

        if self.location.is_empty() || !self.location.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ConfigError::InvalidLocation(self.location.clone()));
        }

        let zone_ok = self.dns_zone_name.contains('.')
            && self.dns_zone_name.split('.').all(|label| {
                !label.is_empty()
                    && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
                    && !label.starts_with('-')
                    && !label.ends_with('-')
            });
        if !zone_ok || self.dns_zone_resource_group.is_empty() {
            return Err(ConfigError::InvalidDnsZone(self.dns_zone_name.clone()));
        }

        Ok(())
    }
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            environment: DEFAULT_ENVIRONMENT.to_string(),
            location: DEFAULT_LOCATION.to_string(),
            dns_zone_resource_group: DEFAULT_DNS_ZONE_RESOURCE_GROUP.to_string(),
            dns_zone_name: DEFAULT_DNS_ZONE_NAME.to_string(),
            allowed_ip_ranges: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = DeployConfig::from_lookup(|_| None);
        assert_eq!(config.environment, "development");
        assert_eq!(config.location, "eastus");
        assert!(!config.is_production());
        assert_eq!(config.allowed_ip_ranges(), vec!["127.0.0.1/32"]);
    }

    #[test]
    fn test_lookup_overrides_and_blank_values() {
        let config = DeployConfig::from_lookup(lookup(&[
            ("ENVIRONMENT", "production"),
            ("AZURE_LOCATION", "  "),
            ("DNS_ZONE_NAME", "example.com"),
            ("ALLOWED_IP_RANGES", "office|203.0.113.0/24"),
        ]));

        assert!(config.is_production());
        assert_eq!(config.location, DEFAULT_LOCATION);
        assert_eq!(config.dns_zone_name, "example.com");
        assert_eq!(config.allowed_ip_ranges(), vec!["203.0.113.0/24"]);
    }

    #[test]
    fn test_toml_keeps_defaults_for_missing_keys() {
        let config =
            DeployConfig::from_toml_str("environment = \"staging\"\nlocation = \"westeurope\"\n")
                .unwrap();
        assert_eq!(config.environment, "staging");
        assert_eq!(config.location, "westeurope");
        assert_eq!(config.dns_zone_name, DEFAULT_DNS_ZONE_NAME);
    }

    #[test]
    fn test_toml_rejects_unknown_keys() {
        assert!(matches!(
            DeployConfig::from_toml_str("enviroment = \"prod\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_validate() {
        assert!(DeployConfig::new().validate().is_ok());
        assert!(DeployConfig::new().with_environment("Prod Env").validate().is_err());
        assert!(DeployConfig::new().with_environment("").validate().is_err());
        assert!(DeployConfig::new().with_environment("a".repeat(79)).validate().is_err());
        let longest = "a".repeat(78);
        for env in ["Production", "Staging", "staging_eu", "dev.1", "qa(2)", longest.as_str()] {
            assert!(DeployConfig::new().with_environment(env).validate().is_ok(), "{env}");
        }
        assert!(DeployConfig::new().with_location("east us").validate().is_err());
        assert!(DeployConfig::new().with_dns_zone("rg", "localhost").validate().is_err());
        assert!(DeployConfig::new().with_dns_zone("rg", "-bad.com").validate().is_err());
    }
}
