use super::{CdnProfileStage, ProfileScope};
use crate::config::PROJECT;
use crate::error::InfraError;
use crate::kinds::{AFD_ORIGIN, AFD_ORIGIN_GROUP};
use crate::naming::origin_host;
use wayfarer_graph::{GraphBuilder, Output, Properties, ResourceRef, ResourceSpec};

const LB_SAMPLE_SIZE: u32 = 4;
const LB_SUCCESSFUL_SAMPLES: u32 = 3;
const LB_ADDITIONAL_LATENCY_MS: u32 = 50;
const PROBE_INTERVAL_SECONDS: u32 = 100;

/// Profile plus the origin group and the storage origin behind it
#[derive(Debug, Clone)]
pub struct CdnOriginStage {
    pub(super) scope: ProfileScope,
    origin_group: ResourceRef,
    origin: ResourceRef,
    origin_host: Output<String>,
}

impl CdnProfileStage {
    /// Point the profile at the storage web endpoint
    pub fn create_origin(
        self,
        graph: &mut GraphBuilder,
        web_endpoint: Output<String>,
    ) -> Result<CdnOriginStage, InfraError> {
        let scope = self.scope;
        let host = web_endpoint.map(|url| origin_host(&url));

        let group_name = format!("{PROJECT}-origin-group");
        let origin_group = graph.register(
            ResourceSpec::new(AFD_ORIGIN_GROUP, group_name.clone()).with_properties(
                scope
                    .child_properties()
                    .set("originGroupName", group_name.as_str())
                    .set(
                        "loadBalancingSettings",
                        Properties::new()
                            .set("sampleSize", LB_SAMPLE_SIZE)
                            .set("successfulSamplesRequired", LB_SUCCESSFUL_SAMPLES)
                            .set("additionalLatencyInMilliseconds", LB_ADDITIONAL_LATENCY_MS),
                    )
                    .set(
                        "healthProbeSettings",
                        Properties::new()
                            .set("probePath", "/")
                            .set("probeRequestType", "GET")
                            .set("probeProtocol", "Https")
                            .set("probeIntervalInSeconds", PROBE_INTERVAL_SECONDS),
                    ),
            ),
        )?;

        let origin_name = format!("{PROJECT}-storage-origin");
        let origin = graph.register(
            ResourceSpec::new(AFD_ORIGIN, origin_name.clone()).with_properties(
                scope
                    .child_properties()
                    .set("originGroupName", origin_group.output::<String>("originGroupName"))
                    .set("originName", origin_name.as_str())
                    .set("hostName", host.clone())
                    .set("originHostHeader", host.clone())
                    .set("httpPort", 80u16)
                    .set("httpsPort", 443u16)
                    .set("priority", 1u32)
                    .set("weight", 1000u32)
                    .set("enabledState", "Enabled"),
            ),
        )?;
        tracing::info!(origin = %origin_name, host = host.label(), "declared CDN origin");

        Ok(CdnOriginStage {
            scope,
            origin_group,
            origin,
            origin_host: host,
        })
    }
}

impl CdnOriginStage {
    pub fn profile(&self) -> &ResourceRef {
        &self.scope.profile
    }

    pub fn origin_group(&self) -> &ResourceRef {
        &self.origin_group
    }

    pub fn origin(&self) -> &ResourceRef {
        &self.origin
    }

    /// Storage web endpoint without scheme or trailing slash
    pub fn origin_host(&self) -> &Output<String> {
        &self.origin_host
    }
}
