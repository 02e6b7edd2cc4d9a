//! Wayfarer Infra - hosting for the Wayfarer travel planner
//!
//! Declares the static site stack on top of [`wayfarer_graph`]:
//! - A resource group scoping everything
//! - A storage account serving the single-page build as a static website
//! - Azure Front Door in front of it, with an optional IP allow-list, a
//!   DNS-validated custom domain and one route
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use wayfarer_infra::{DeployConfig, LocalEngine, Stack};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = DeployConfig::from_env();
//! let stack = Stack::define(&config)?;
//!
//! let outputs = stack.deploy(Arc::new(LocalEngine::new())).await?;
//! println!("{}", outputs.public_url);
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod allow_list;
pub mod cdn;
pub mod config;
pub mod environment;
pub mod error;
pub mod kinds;
pub mod naming;
pub mod resource_group;
pub mod simulate;
pub mod stack;
pub mod storage;
pub mod tags;

// Re-exports for convenience
pub use allow_list::{parse_allowed_ip_ranges, LOOPBACK_FALLBACK};
pub use cdn::{
    CdnDomainStage, CdnEndpointStage, CdnOriginStage, CdnProfileStage, CdnRestrictedStage, CdnStack,
    CustomDomain, IpRestrictions,
};
pub use config::DeployConfig;
pub use environment::{CdnTier, EnvironmentConfig, ReplicationTier};
pub use error::{ConfigError, InfraError};
pub use resource_group::ResourceGroup;
pub use simulate::LocalEngine;
pub use stack::{Stack, StackOutputs, PUBLIC_URL_EXPORT};
pub use storage::{StaticWebsite, StorageAccount};
pub use tags::Tags;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
