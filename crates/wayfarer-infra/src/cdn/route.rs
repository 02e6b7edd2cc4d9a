use super::{CdnDomainStage, CustomDomain, IpRestrictions};
use crate::config::PROJECT;
use crate::error::InfraError;
use crate::kinds::ROUTE;
use wayfarer_graph::{
    string_list, GraphBuilder, Input, Output, Properties, ResourceRef, ResourceSpec,
};

/// Content types compressed at the edge
pub const COMPRESSED_CONTENT_TYPES: &[&str] = &[
    "text/html",
    "text/css",
    "text/javascript",
    "text/plain",
    "application/javascript",
    "application/json",
    "application/xml",
    "image/svg+xml",
];

/// Final CDN stage: every resource declared, route included
#[derive(Debug, Clone)]
pub struct CdnStack {
    domain: CdnDomainStage,
    route: ResourceRef,
}

impl CdnDomainStage {
    /// Bind origin group, custom domain and optional rule set on `/*`
    pub fn create_route(self, graph: &mut GraphBuilder) -> Result<CdnStack, InfraError> {
        let endpoint_stage = &self.restricted.endpoint;
        let origin_stage = &endpoint_stage.origin;
        let restrictions = self.restricted.restrictions();
        let custom_domain = self.custom_domain().resource();

        let mut properties = origin_stage
            .scope
            .child_properties()
            .set("routeName", format!("{PROJECT}-route"))
            .set("endpointName", endpoint_stage.endpoint().output::<String>("endpointName"))
            .set(
                "originGroup",
                Properties::new().set("id", origin_stage.origin_group().id_output()),
            )
            .set(
                "customDomains",
                Input::List(vec![Properties::new().set("id", custom_domain.id_output()).into()]),
            );
        if let Some(restrictions) = restrictions {
            properties.insert(
                "ruleSets",
                Input::List(vec![Properties::new()
                    .set("id", restrictions.rule_set().id_output())
                    .into()]),
            );
        }
        let properties = properties
            .set("supportedProtocols", string_list(["Http", "Https"]))
            .set("forwardingProtocol", "HttpsOnly")
            .set("httpsRedirect", "Enabled")
            .set("linkToDefaultDomain", "Enabled")
            .set("patternsToMatch", string_list(["/*"]))
            .set(
                "cacheConfiguration",
                Properties::new()
                    .set("queryStringCachingBehavior", "IgnoreQueryString")
                    .set(
                        "compressionSettings",
                        Properties::new()
                            .set("isCompressionEnabled", true)
                            .set(
                                "contentTypesToCompress",
                                string_list(COMPRESSED_CONTENT_TYPES.iter().copied()),
                            ),
                    ),
            );

        let mut spec = ResourceSpec::new(ROUTE, format!("{PROJECT}-route"))
            .with_properties(properties)
            .depends_on(origin_stage.origin())
            .depends_on(custom_domain);
        if let Some(restrictions) = restrictions {
            spec = spec.depends_on(restrictions.rule_set()).depends_on(restrictions.rule());
        }

        let route = graph.register(spec)?;
        tracing::info!(
            route = route.name(),
            restricted = restrictions.is_some(),
            "declared CDN route"
        );

        Ok(CdnStack { domain: self, route })
    }
}

impl CdnStack {
    pub fn profile(&self) -> &ResourceRef {
        &self.domain.restricted.endpoint.origin.scope.profile
    }

    pub fn origin_group(&self) -> &ResourceRef {
        self.domain.restricted.endpoint.origin.origin_group()
    }

    pub fn origin(&self) -> &ResourceRef {
        self.domain.restricted.endpoint.origin.origin()
    }

    pub fn origin_host(&self) -> &Output<String> {
        self.domain.restricted.endpoint.origin.origin_host()
    }

    pub fn endpoint(&self) -> &ResourceRef {
        self.domain.restricted.endpoint.endpoint()
    }

    pub fn ip_restrictions(&self) -> Option<&IpRestrictions> {
        self.domain.restricted.restrictions()
    }

    pub fn custom_domain(&self) -> &CustomDomain {
        self.domain.custom_domain()
    }

    pub fn route(&self) -> &ResourceRef {
        &self.route
    }

    /// Public URL of the edge endpoint
    pub fn endpoint_url(&self) -> Output<String> {
        self.domain
            .restricted
            .endpoint
            .host_name()
            .map(|host| format!("https://{host}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cdn::{CdnProfileStage, BLOCK_RULE_NAME};
    use crate::environment::EnvironmentConfig;
    use crate::resource_group::ResourceGroup;
    use crate::tags::Tags;
    use std::collections::BTreeSet;
    use wayfarer_graph::DeploymentState;

    fn build(environment: &str, ranges: &[&str]) -> (GraphBuilder, CdnStack) {
        let settings = EnvironmentConfig::for_environment(environment);
        let tags = Tags::for_environment(environment, &settings);
        let mut graph = GraphBuilder::new();
        let group = ResourceGroup::create(&mut graph, "wayfarer-test-rg", "eastus", &tags).unwrap();
        let ranges: Vec<String> = ranges.iter().map(|r| r.to_string()).collect();

        let web_endpoint = Output::known("https://acct.z13.web.core.windows.net/".to_string());
        let stack = CdnProfileStage::create_profile(&mut graph, &group, &settings, &tags)
            .unwrap()
            .create_origin(&mut graph, web_endpoint)
            .unwrap()
            .create_endpoint(&mut graph)
            .unwrap()
            .setup_ip_restrictions(&mut graph, &ranges)
            .unwrap()
            .setup_custom_domain(&mut graph, "dns-rg", "example.com")
            .unwrap()
            .create_route(&mut graph)
            .unwrap();
        (graph, stack)
    }

    #[test]
    fn test_route_depends_on_rules_when_restricted() {
        let (graph, stack) = build("development", &["203.0.113.0/24"]);
        let restrictions = stack
            .ip_restrictions()
            .expect("restrictions enabled outside production");
        let route = graph.get(stack.route().id()).unwrap();

        let declared: BTreeSet<_> = route.declared_dependencies().iter().copied().collect();
        let expected = BTreeSet::from([
            stack.origin().id(),
            stack.custom_domain().resource().id(),
            restrictions.rule_set().id(),
            restrictions.rule().id(),
        ]);
        assert_eq!(declared, expected);
        assert_eq!(restrictions.rule().name(), BLOCK_RULE_NAME);

        let rendered = route.properties().render();
        assert!(rendered["ruleSets"][0]["id"].is_string());
    }

    #[test]
    fn test_route_without_restrictions() {
        let (graph, stack) = build("production", &[]);
        assert!(stack.ip_restrictions().is_none());

        let route = graph.get(stack.route().id()).unwrap();
        let declared: BTreeSet<_> = route.declared_dependencies().iter().copied().collect();
        assert_eq!(
            declared,
            BTreeSet::from([stack.origin().id(), stack.custom_domain().resource().id()])
        );
        assert!(route.properties().get("ruleSets").is_none());
    }

    #[test]
    fn test_route_forwarding_policy() {
        let (graph, stack) = build("development", &["203.0.113.0/24"]);
        let rendered = graph.get(stack.route().id()).unwrap().properties().render();

        assert_eq!(rendered["forwardingProtocol"], "HttpsOnly");
        assert_eq!(rendered["httpsRedirect"], "Enabled");
        assert_eq!(rendered["linkToDefaultDomain"], "Enabled");
        assert_eq!(rendered["supportedProtocols"], serde_json::json!(["Http", "Https"]));
        assert_eq!(rendered["patternsToMatch"], serde_json::json!(["/*"]));
        assert_eq!(
            rendered["cacheConfiguration"]["queryStringCachingBehavior"],
            "IgnoreQueryString"
        );
        assert_eq!(
            rendered["cacheConfiguration"]["compressionSettings"]["contentTypesToCompress"]
                .as_array()
                .map(Vec::len),
            Some(COMPRESSED_CONTENT_TYPES.len())
        );
    }

    #[test]
    fn test_block_rule_negates_both_conditions() {
        let (graph, stack) = build("development", &["203.0.113.0/24", "198.51.100.5/32"]);
        let rule = stack.ip_restrictions().unwrap().rule().id();
        let rendered = graph.get(rule).unwrap().properties().render();

        let conditions = rendered["conditions"].as_array().unwrap();
        assert_eq!(conditions.len(), 2);
        assert!(conditions.iter().all(|c| c["parameters"]["negateCondition"] == true));
        assert_eq!(
            conditions[1]["parameters"]["matchValues"],
            serde_json::json!(["203.0.113.0/24", "198.51.100.5/32"])
        );
        assert_eq!(rendered["actions"][0]["parameters"]["redirectType"], "Found");
        assert_eq!(rendered["actions"][0]["parameters"]["customPath"], "/blocked.html");
    }

    #[test]
    fn test_origin_host_and_probe() {
        let (graph, stack) = build("development", &[]);
        let origin = graph.get(stack.origin().id()).unwrap().properties().render();
        let group = graph.get(stack.origin_group().id()).unwrap().properties().render();

        assert_eq!(origin["hostName"], "acct.z13.web.core.windows.net");
        assert_eq!(origin["originHostHeader"], "acct.z13.web.core.windows.net");
        assert_eq!(origin["weight"], 1000);
        assert_eq!(group["loadBalancingSettings"]["sampleSize"], 4);
        assert_eq!(group["healthProbeSettings"]["probeIntervalInSeconds"], 100);
        assert_eq!(
            stack.origin_host().resolve(&DeploymentState::new()).unwrap(),
            "acct.z13.web.core.windows.net"
        );
    }

    #[test]
    fn test_custom_domain_records() {
        let (graph, stack) = build("development", &[]);
        let domain = stack.custom_domain();

        assert_eq!(domain.domain(), "dev.example.com");
        assert_eq!(domain.resource().name(), "dev-example-com");
        assert_eq!(
            graph.get(domain.resource().id()).unwrap().declared_dependencies(),
            &[domain.cname().id()]
        );

        let txt = graph.get(domain.validation_record().id()).unwrap();
        assert!(txt.implicit_dependencies().contains(&domain.resource().id()));
        assert_eq!(txt.properties().render()["relativeRecordSetName"], "_dnsauth.dev");
    }
}
