use super::{ProfileScope, GLOBAL_LOCATION};
use crate::config::PROJECT;
use crate::environment::EnvironmentConfig;
use crate::error::InfraError;
use crate::kinds::CDN_PROFILE;
use crate::resource_group::ResourceGroup;
use crate::tags::Tags;
use wayfarer_graph::{GraphBuilder, Properties, ResourceRef, ResourceSpec};

/// First CDN stage: the Front Door profile
#[derive(Debug, Clone)]
pub struct CdnProfileStage {
    pub(super) scope: ProfileScope,
}

impl CdnProfileStage {
    /// Declare the profile; SKU comes from the environment settings
    pub fn create_profile(
        graph: &mut GraphBuilder,
        group: &ResourceGroup,
        settings: &EnvironmentConfig,
        tags: &Tags,
    ) -> Result<Self, InfraError> {
        let name = format!("{PROJECT}-cdn-{}", settings.suffix());
        let profile = graph.register(
            ResourceSpec::new(CDN_PROFILE, name.clone()).with_properties(
                Properties::new()
                    .set("profileName", name.as_str())
                    .set("resourceGroupName", group.name_output())
                    .set("location", GLOBAL_LOCATION)
                    .set("sku", Properties::new().set("name", settings.cdn_tier.sku_name()))
                    .set("tags", tags),
            ),
        )?;
        tracing::info!(profile = %name, sku = settings.cdn_tier.sku_name(), "declared CDN profile");

        Ok(Self {
            scope: ProfileScope {
                group: group.clone(),
                profile,
                settings: *settings,
            },
        })
    }

    pub fn profile(&self) -> &ResourceRef {
        &self.scope.profile
    }

    pub fn settings(&self) -> &EnvironmentConfig {
        &self.scope.settings
    }
}
