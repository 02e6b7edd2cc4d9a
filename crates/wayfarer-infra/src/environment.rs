//! Per-environment settings
//!
//! Derived once from the environment name. Only `"production"` selects the
//! production profile; every other name, including a missing one, gets the
//! development profile.

use serde::Serialize;

/// Name that selects the production profile
pub const PRODUCTION: &str = "production";

const ONE_YEAR_SECONDS: u64 = 365 * 24 * 60 * 60;
const DEV_CACHE_TTL_SECONDS: u64 = 300;

/// Storage account redundancy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReplicationTier {
    /// Geo-redundant
    StandardGrs,
    /// Locally redundant
    StandardLrs,
}

impl ReplicationTier {
    pub fn sku_name(self) -> &'static str {
        match self {
            ReplicationTier::StandardGrs => "Standard_GRS",
            ReplicationTier::StandardLrs => "Standard_LRS",
        }
    }
}

/// CDN profile SKU
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CdnTier {
    StandardAzureFrontDoor,
}

impl CdnTier {
    pub fn sku_name(self) -> &'static str {
        match self {
            CdnTier::StandardAzureFrontDoor => "Standard_AzureFrontDoor",
        }
    }
}

/// Settings that differ between production and everything else
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EnvironmentConfig {
    pub is_production: bool,
    pub storage_replication: ReplicationTier,
    /// Always true today; the stack still honours `false`
    pub enable_cdn: bool,
    pub cdn_tier: CdnTier,
    /// Computed but not attached to any cache configuration
    pub cache_ttl_seconds: u64,
    /// Enabled outside production only
    pub enable_ip_restrictions: bool,
}

impl EnvironmentConfig {
    pub fn for_environment(name: &str) -> Self {
        let is_production = name == PRODUCTION;
        Self {
            is_production,
            storage_replication: if is_production {
                ReplicationTier::StandardGrs
            } else {
                ReplicationTier::StandardLrs
            },
            enable_cdn: true,
            cdn_tier: CdnTier::StandardAzureFrontDoor,
            cache_ttl_seconds: if is_production {
                ONE_YEAR_SECONDS
            } else {
                DEV_CACHE_TTL_SECONDS
            },
            enable_ip_restrictions: !is_production,
        }
    }

    /// Short suffix used in resource names
    pub fn suffix(&self) -> &'static str {
        if self.is_production {
            "prod"
        } else {
            "dev"
        }
    }

    /// Value of the `CostCenter` tag
    pub fn cost_center(&self) -> &'static str {
        if self.is_production {
            "Production"
        } else {
            "Development"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_production_profile() {
        let env = EnvironmentConfig::for_environment("production");
        assert!(env.is_production);
        assert!(!env.enable_ip_restrictions);
        assert_eq!(env.storage_replication, ReplicationTier::StandardGrs);
        assert_eq!(env.cache_ttl_seconds, 31_536_000);
        assert_eq!(env.suffix(), "prod");
    }

    #[test]
    fn test_everything_else_is_development() {
        for name in ["development", "staging", "", "Production"] {
            let env = EnvironmentConfig::for_environment(name);
            assert!(!env.is_production, "{name}");
            assert!(env.enable_ip_restrictions, "{name}");
            assert_eq!(env.storage_replication, ReplicationTier::StandardLrs);
            assert_eq!(env.cache_ttl_seconds, 300);
            assert_eq!(env.cost_center(), "Development");
        }
    }

    #[test]
    fn test_cdn_always_enabled() {
        assert!(EnvironmentConfig::for_environment("production").enable_cdn);
        assert!(EnvironmentConfig::for_environment("development").enable_cdn);
        assert_eq!(CdnTier::StandardAzureFrontDoor.sku_name(), "Standard_AzureFrontDoor");
    }
}
