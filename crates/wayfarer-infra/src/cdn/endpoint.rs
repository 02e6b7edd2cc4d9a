use super::{CdnOriginStage, GLOBAL_LOCATION};
use crate::config::PROJECT;
use crate::error::InfraError;
use crate::kinds::AFD_ENDPOINT;
use wayfarer_graph::{GraphBuilder, Output, ResourceRef, ResourceSpec};

/// Origin stage plus the edge endpoint clients connect to
#[derive(Debug, Clone)]
pub struct CdnEndpointStage {
    pub(super) origin: CdnOriginStage,
    endpoint: ResourceRef,
}

impl CdnOriginStage {
    pub fn create_endpoint(self, graph: &mut GraphBuilder) -> Result<CdnEndpointStage, InfraError> {
        let name = format!("{PROJECT}-endpoint-{}", self.scope.settings.suffix());
        let endpoint = graph.register(
            ResourceSpec::new(AFD_ENDPOINT, name.clone()).with_properties(
                self.scope
                    .child_properties()
                    .set("endpointName", name.as_str())
                    .set("location", GLOBAL_LOCATION)
                    .set("enabledState", "Enabled"),
            ),
        )?;
        tracing::info!(endpoint = %name, "declared CDN endpoint");

        Ok(CdnEndpointStage {
            origin: self,
            endpoint,
        })
    }
}

impl CdnEndpointStage {
    pub fn origin_stage(&self) -> &CdnOriginStage {
        &self.origin
    }

    pub fn endpoint(&self) -> &ResourceRef {
        &self.endpoint
    }

    /// Host name assigned by the CDN, e.g. `wayfarer-endpoint-dev-abc.z01.azurefd.net`
    pub fn host_name(&self) -> Output<String> {
        self.endpoint.output("hostName")
    }
}
