//! CDN stages
//!
//! Azure Front Door in front of the static website, assembled as a chain of
//! consuming stages. Each step takes the previous stage by value and returns
//! the next one, so a route cannot be declared before its origin, endpoint
//! and custom domain exist:
//!
//! ```text
//! CdnProfileStage ─create_origin─▶ CdnOriginStage ─create_endpoint─▶ CdnEndpointStage
//!   ─setup_ip_restrictions─▶ CdnRestrictedStage ─setup_custom_domain─▶ CdnDomainStage
//!   ─create_route─▶ CdnStack
//! ```

mod custom_domain;
mod endpoint;
mod ip_restrictions;
mod origin;
mod profile;
mod route;

pub use custom_domain::{CdnDomainStage, CustomDomain, DNS_RECORD_TTL_SECONDS};
pub use endpoint::CdnEndpointStage;
pub use ip_restrictions::{CdnRestrictedStage, IpRestrictions, BLOCKED_PAGE, BLOCK_RULE_NAME};
pub use origin::CdnOriginStage;
pub use profile::CdnProfileStage;
pub use route::{CdnStack, COMPRESSED_CONTENT_TYPES};

use crate::environment::EnvironmentConfig;
use crate::resource_group::ResourceGroup;
use wayfarer_graph::{Properties, ResourceRef};

/// Front Door profiles and endpoints are global resources
const GLOBAL_LOCATION: &str = "global";

/// What every stage after the profile needs
#[derive(Debug, Clone)]
struct ProfileScope {
    group: ResourceGroup,
    profile: ResourceRef,
    settings: EnvironmentConfig,
}

impl ProfileScope {
    /// Inputs shared by every child of the profile
    fn child_properties(&self) -> Properties {
        Properties::new()
            .set("profileName", self.profile.output::<String>("profileName"))
            .set("resourceGroupName", self.group.name_output())
    }
}
