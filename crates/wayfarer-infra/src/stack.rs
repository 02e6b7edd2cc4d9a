//! Stack orchestrator
//!
//! Composition root: derives the environment settings, runs the storage and
//! CDN stages in order, exports the public URL and freezes everything into
//! a [`DeploymentPlan`].

use crate::cdn::{CdnProfileStage, CdnStack};
use crate::config::{DeployConfig, PROJECT};
use crate::environment::EnvironmentConfig;
use crate::error::InfraError;
use crate::kinds::LIST_STORAGE_ACCOUNT_KEYS;
use crate::naming::resource_group_name;
use crate::resource_group::ResourceGroup;
use crate::storage::{StaticWebsite, StorageAccount};
use crate::tags::Tags;
use serde_json::json;
use std::sync::Arc;
use wayfarer_graph::{
    Deployer, DeploymentPlan, DeploymentSummary, GraphBuilder, Output, ProvisioningEngine,
};

/// Name of the stack's only output
pub const PUBLIC_URL_EXPORT: &str = "publicUrl";

/// The declared stack, ready to plan or deploy
#[derive(Debug)]
pub struct Stack {
    config: DeployConfig,
    settings: EnvironmentConfig,
    tags: Tags,
    resource_group: ResourceGroup,
    website: StaticWebsite,
    cdn: Option<CdnStack>,
    public_url: Output<String>,
    plan: DeploymentPlan,
}

/// Outputs of a deployment run
#[derive(Debug, Clone)]
pub struct StackOutputs {
    pub public_url: String,
    pub summary: DeploymentSummary,
}

impl Stack {
    /// Declare the stack for `config`
    ///
    /// # Errors
    /// Returns `InfraError::Config` for unusable configuration values and
    /// `InfraError::Graph` if a stage declares an inconsistent graph.
    pub fn define(config: &DeployConfig) -> Result<Self, InfraError> {
        config.validate()?;
        Self::define_with_environment(config, config.environment_config())
    }

    /// Declare the stack with explicit environment settings
    pub fn define_with_environment(
        config: &DeployConfig,
        settings: EnvironmentConfig,
    ) -> Result<Self, InfraError> {
        let tags = Tags::for_environment(&config.environment, &settings);
        let mut graph = GraphBuilder::new();

        let resource_group = ResourceGroup::create(
            &mut graph,
            &resource_group_name(PROJECT, &config.environment),
            &config.location,
            &tags,
        )?;

        let website = StorageAccount::create(
            &mut graph,
            &resource_group,
            settings.storage_replication,
            &settings,
            &tags,
        )?
        .enable_static_website(&mut graph)?;

        let (cdn, public_url) = if settings.enable_cdn {
            let cdn =
                CdnProfileStage::create_profile(&mut graph, &resource_group, &settings, &tags)?
                    .create_origin(&mut graph, website.primary_web_endpoint())?
                    .create_endpoint(&mut graph)?
                    .setup_ip_restrictions(&mut graph, &config.allowed_ip_ranges())?
                    .setup_custom_domain(
                        &mut graph,
                        &config.dns_zone_resource_group,
                        &config.dns_zone_name,
                    )?
                    .create_route(&mut graph)?;
            let url = cdn.endpoint_url();
            (Some(cdn), url)
        } else {
            tracing::info!("CDN disabled, serving from the storage web endpoint");
            (None, website.primary_web_endpoint())
        };

        graph.export(PUBLIC_URL_EXPORT, public_url.clone())?;
        let plan = graph.validate()?;

        tracing::info!(
            environment = %config.environment,
            production = settings.is_production,
            resources = plan.len(),
            "stack defined"
        );

        Ok(Self {
            config: config.clone(),
            settings,
            tags,
            resource_group,
            website,
            cdn,
            public_url,
            plan,
        })
    }

    pub fn config(&self) -> &DeployConfig {
        &self.config
    }

    pub fn settings(&self) -> &EnvironmentConfig {
        &self.settings
    }

    pub fn tags(&self) -> &Tags {
        &self.tags
    }

    pub fn resource_group(&self) -> &ResourceGroup {
        &self.resource_group
    }

    pub fn website(&self) -> &StaticWebsite {
        &self.website
    }

    /// CDN stages, absent when the CDN is disabled
    pub fn cdn(&self) -> Option<&CdnStack> {
        self.cdn.as_ref()
    }

    pub fn public_url(&self) -> &Output<String> {
        &self.public_url
    }

    pub fn plan(&self) -> &DeploymentPlan {
        &self.plan
    }

    /// Apply the plan through `engine` and return the public URL
    pub async fn deploy(
        &self,
        engine: Arc<dyn ProvisioningEngine>,
    ) -> Result<StackOutputs, InfraError> {
        let summary = Deployer::new(Arc::clone(&engine)).apply(&self.plan).await?;
        let public_url = summary
            .outputs
            .get(PUBLIC_URL_EXPORT)
            .cloned()
            .ok_or_else(|| InfraError::MissingOutput(PUBLIC_URL_EXPORT.to_string()))?;

        self.inspect_storage_keys(engine.as_ref()).await;

        tracing::info!(
            public_url = %public_url,
            resources = summary.resources_created,
            waves = summary.waves,
            "deployment complete"
        );
        Ok(StackOutputs { public_url, summary })
    }

    /// Diagnostic key listing; the result is discarded and failures ignored
    async fn inspect_storage_keys(&self, engine: &dyn ProvisioningEngine) {
        let account = self.website.account();
        let args = json!({
            "resourceGroupName": self.resource_group.name(),
            "accountName": account.name(),
        });

        match engine.invoke(LIST_STORAGE_ACCOUNT_KEYS, args).await {
            Ok(result) => {
                let keys = result["keys"].as_array().map_or(0, Vec::len);
                tracing::debug!(account = account.name(), keys, "listed storage account keys");
            }
            Err(e) => {
                tracing::warn!(
                    account = account.name(),
                    error = %e,
                    "could not list storage account keys"
                );
            }
        }
    }
}
