//! Storage stage
//!
//! A storage account serving the site's static build. The static website
//! feature can only be enabled on a [`StorageAccount`] value, so the call
//! order is enforced by the types; the remaining runtime check catches an
//! account that belongs to a different graph.

use crate::environment::{EnvironmentConfig, ReplicationTier};
use crate::error::{ConfigError, InfraError};
use crate::kinds::{STATIC_WEBSITE, STORAGE_ACCOUNT};
use crate::naming::{storage_account_name, validate_storage_account_name};
use crate::resource_group::ResourceGroup;
use crate::tags::Tags;
use wayfarer_graph::{GraphBuilder, Output, Properties, ResourceRef, ResourceSpec};

/// Document served for `/` and for every missing path
pub const INDEX_DOCUMENT: &str = "index.html";

const WEB_ENDPOINT_PATH: &str = "primaryEndpoints.web";

/// A registered storage account
#[derive(Debug, Clone)]
pub struct StorageAccount {
    resource: ResourceRef,
    group: ResourceGroup,
    name: String,
}

impl StorageAccount {
    /// Register the account with public blob read access and TLS 1.2
    pub fn create(
        graph: &mut GraphBuilder,
        group: &ResourceGroup,
        replication: ReplicationTier,
        settings: &EnvironmentConfig,
        tags: &Tags,
    ) -> Result<Self, InfraError> {
        let name = storage_account_name(settings.suffix());
        validate_storage_account_name(&name)?;

        let resource = graph.register(
            ResourceSpec::new(STORAGE_ACCOUNT, name.clone()).with_properties(
                Properties::new()
                    .set("accountName", name.as_str())
                    .set("resourceGroupName", group.name_output())
                    .set("kind", "StorageV2")
                    .set("sku", Properties::new().set("name", replication.sku_name()))
                    .set("allowBlobPublicAccess", true)
                    .set("enableHttpsTrafficOnly", true)
                    .set("minimumTlsVersion", "TLS1_2")
                    .set("tags", tags),
            ),
        )?;
        tracing::info!(account = %name, sku = replication.sku_name(), "declared storage account");

        Ok(Self {
            resource,
            group: group.clone(),
            name,
        })
    }

    /// Turn on static website hosting with SPA-style 404 fallback
    ///
    /// # Errors
    /// `ConfigError::StorageAccountMissing` if this account was not created
    /// in `graph`.
    pub fn enable_static_website(
        self,
        graph: &mut GraphBuilder,
    ) -> Result<StaticWebsite, InfraError> {
        if !graph.contains(self.resource.id()) {
            return Err(ConfigError::StorageAccountMissing.into());
        }

        let resource = graph.register(
            ResourceSpec::new(STATIC_WEBSITE, format!("{}-website", self.name)).with_properties(
                Properties::new()
                    .set("accountName", self.resource.output::<String>("accountName"))
                    .set("resourceGroupName", self.group.name_output())
                    .set("indexDocument", INDEX_DOCUMENT)
                    .set("error404Document", INDEX_DOCUMENT),
            ),
        )?;
        tracing::info!(account = %self.name, "enabled static website");

        Ok(StaticWebsite {
            account: self,
            resource,
        })
    }

    pub fn resource(&self) -> &ResourceRef {
        &self.resource
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn resource_group(&self) -> &ResourceGroup {
        &self.group
    }

    /// Web endpoint URL, e.g. `https://<account>.z13.web.core.windows.net/`
    pub fn primary_web_endpoint(&self) -> Output<String> {
        self.resource.output(WEB_ENDPOINT_PATH)
    }
}

/// A storage account with static website hosting enabled
#[derive(Debug, Clone)]
pub struct StaticWebsite {
    account: StorageAccount,
    resource: ResourceRef,
}

impl StaticWebsite {
    pub fn account(&self) -> &StorageAccount {
        &self.account
    }

    pub fn resource(&self) -> &ResourceRef {
        &self.resource
    }

    /// Web endpoint, ordered after the website feature is enabled
    pub fn primary_web_endpoint(&self) -> Output<String> {
        self.account.primary_web_endpoint().after(&self.resource)
    }
}
