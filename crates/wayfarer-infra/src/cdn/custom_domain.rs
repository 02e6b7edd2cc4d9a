use super::CdnRestrictedStage;
use crate::error::{ConfigError, InfraError};
use crate::kinds::{AFD_CUSTOM_DOMAIN, DNS_RECORD_SET};
use crate::naming::{custom_domain, sanitize_resource_name, subdomain, validation_record_name};
use wayfarer_graph::{GraphBuilder, Input, Output, Properties, ResourceRef, ResourceSpec};

pub const DNS_RECORD_TTL_SECONDS: u32 = 3600;

/// Custom domain bound to the endpoint, with its DNS records
#[derive(Debug, Clone)]
pub struct CustomDomain {
    domain: String,
    subdomain: &'static str,
    cname: ResourceRef,
    custom_domain: ResourceRef,
    validation_record: ResourceRef,
}

impl CustomDomain {
    /// Fully qualified domain, e.g. `dev.wayfarer.travel`
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Relative record name in the zone: `@` or `dev`
    pub fn subdomain(&self) -> &str {
        self.subdomain
    }

    pub fn cname(&self) -> &ResourceRef {
        &self.cname
    }

    pub fn resource(&self) -> &ResourceRef {
        &self.custom_domain
    }

    pub fn validation_record(&self) -> &ResourceRef {
        &self.validation_record
    }

    /// Token the CDN expects in the `_dnsauth` TXT record
    pub fn validation_token(&self) -> Output<String> {
        self.custom_domain.output("validationProperties.validationToken")
    }
}

/// Restricted stage plus the custom domain
#[derive(Debug, Clone)]
pub struct CdnDomainStage {
    pub(super) restricted: CdnRestrictedStage,
    domain: CustomDomain,
}

impl CdnRestrictedStage {
    /// Bind `dev.<zone>` (or the zone apex in production) to the endpoint
    ///
    /// Records are created in the existing zone `dns_zone_name` inside
    /// `dns_zone_resource_group`: a CNAME to the endpoint host, then the
    /// custom domain, then the TXT record carrying its validation token.
    pub fn setup_custom_domain(
        self,
        graph: &mut GraphBuilder,
        dns_zone_resource_group: &str,
        dns_zone_name: &str,
    ) -> Result<CdnDomainStage, InfraError> {
        if dns_zone_name.trim().is_empty() {
            return Err(ConfigError::InvalidDnsZone(dns_zone_name.to_string()).into());
        }

        let scope = &self.endpoint.origin.scope;
        let is_production = scope.settings.is_production;
        let sub = subdomain(is_production);
        let domain = custom_domain(is_production, dns_zone_name);
        let resource_name = sanitize_resource_name(&domain);

        let zone = |record_name: &str, record_type: &str| {
            Properties::new()
                .set("resourceGroupName", dns_zone_resource_group)
                .set("zoneName", dns_zone_name)
                .set("relativeRecordSetName", record_name)
                .set("recordType", record_type)
                .set("ttl", DNS_RECORD_TTL_SECONDS)
        };

        let cname = graph.register(
            ResourceSpec::new(DNS_RECORD_SET, format!("{resource_name}-cname")).with_properties(
                zone(sub, "CNAME").set(
                    "cnameRecord",
                    Properties::new().set("cname", self.endpoint.host_name()),
                ),
            ),
        )?;

        let custom = graph.register(
            ResourceSpec::new(AFD_CUSTOM_DOMAIN, resource_name.clone())
                .with_properties(
                    scope
                        .child_properties()
                        .set("customDomainName", resource_name.as_str())
                        .set("hostName", domain.as_str())
                        .set(
                            "tlsSettings",
                            Properties::new()
                                .set("certificateType", "ManagedCertificate")
                                .set("minimumTlsVersion", "TLS12"),
                        ),
                )
                .depends_on(&cname),
        )?;

        let token: Output<String> = custom.output("validationProperties.validationToken");
        let validation_record = graph.register(
            ResourceSpec::new(DNS_RECORD_SET, format!("{resource_name}-validation"))
                .with_properties(zone(&validation_record_name(sub), "TXT").set(
                    "txtRecords",
                    Input::List(vec![Properties::new()
                        .set("value", Input::List(vec![token.into()]))
                        .into()]),
                )),
        )?;
        tracing::info!(domain = %domain, zone = dns_zone_name, "declared custom domain");

        Ok(CdnDomainStage {
            restricted: self,
            domain: CustomDomain {
                domain,
                subdomain: sub,
                cname,
                custom_domain: custom,
                validation_record,
            },
        })
    }
}

impl CdnDomainStage {
    pub fn restricted_stage(&self) -> &CdnRestrictedStage {
        &self.restricted
    }

    pub fn custom_domain(&self) -> &CustomDomain {
        &self.domain
    }
}
