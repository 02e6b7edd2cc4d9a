//! IP allow-list at the edge
//!
//! Expressed as a single negated block rule: any request that is not for the
//! blocked page and does not come from an allowed range is redirected to the
//! blocked page. Declared only when the environment enables restrictions,
//! which today means outside production.

use super::CdnEndpointStage;
use crate::error::InfraError;
use crate::kinds::{RULE, RULE_SET};
use wayfarer_graph::{string_list, GraphBuilder, Input, Properties, ResourceRef, ResourceSpec};

/// Page unlisted clients are redirected to
pub const BLOCKED_PAGE: &str = "/blocked.html";

pub const BLOCK_RULE_NAME: &str = "BlockUnlistedIps";

/// Rule set and block rule, present only when restrictions are enabled
#[derive(Debug, Clone)]
pub struct IpRestrictions {
    rule_set: ResourceRef,
    rule: ResourceRef,
    allowed_ranges: Vec<String>,
}

impl IpRestrictions {
    pub fn rule_set(&self) -> &ResourceRef {
        &self.rule_set
    }

    pub fn rule(&self) -> &ResourceRef {
        &self.rule
    }

    pub fn allowed_ranges(&self) -> &[String] {
        &self.allowed_ranges
    }
}

/// Endpoint stage after the optional restriction step
#[derive(Debug, Clone)]
pub struct CdnRestrictedStage {
    pub(super) endpoint: CdnEndpointStage,
    restrictions: Option<IpRestrictions>,
}

impl CdnEndpointStage {
    /// Declare the allow-list rule set; no-op unless the environment enables it
    ///
    /// `allowed_ranges` is the parsed `ALLOWED_IP_RANGES` list.
    pub fn setup_ip_restrictions(
        self,
        graph: &mut GraphBuilder,
        allowed_ranges: &[String],
    ) -> Result<CdnRestrictedStage, InfraError> {
        let scope = &self.origin.scope;
        if !scope.settings.enable_ip_restrictions {
            tracing::debug!("IP restrictions disabled for this environment");
            return Ok(CdnRestrictedStage {
                endpoint: self,
                restrictions: None,
            });
        }

        // Rule set names are alphanumeric only
        let rule_set_name = format!("IpRestrictions{}", scope.settings.suffix());
        let rule_set = graph.register(
            ResourceSpec::new(RULE_SET, rule_set_name.clone()).with_properties(
                scope
                    .child_properties()
                    .set("ruleSetName", rule_set_name.as_str()),
            ),
        )?;

        let rule = graph.register(
            ResourceSpec::new(RULE, BLOCK_RULE_NAME).with_properties(
                scope
                    .child_properties()
                    .set("ruleSetName", rule_set.output::<String>("ruleSetName"))
                    .set("ruleName", BLOCK_RULE_NAME)
                    .set("order", 1u32)
                    .set("conditions", block_conditions(allowed_ranges))
                    .set("actions", Input::List(vec![redirect_to_blocked_page()]))
                    .set("matchProcessingBehavior", "Stop"),
            ),
        )?;
        tracing::info!(
            rule_set = %rule_set_name,
            ranges = allowed_ranges.len(),
            "declared IP restriction rule"
        );

        Ok(CdnRestrictedStage {
            endpoint: self,
            restrictions: Some(IpRestrictions {
                rule_set,
                rule,
                allowed_ranges: allowed_ranges.to_vec(),
            }),
        })
    }
}

/// Path is not the blocked page AND remote address is outside the allow-list
fn block_conditions(allowed_ranges: &[String]) -> Input {
    let not_blocked_page = Properties::new().set("name", "UrlPath").set(
        "parameters",
        Properties::new()
            .set("typeName", "DeliveryRuleUrlPathMatchConditionParameters")
            .set("operator", "Equal")
            .set("negateCondition", true)
            .set("matchValues", string_list([BLOCKED_PAGE])),
    );
    let not_allowed = Properties::new().set("name", "RemoteAddress").set(
        "parameters",
        Properties::new()
            .set("typeName", "DeliveryRuleRemoteAddressConditionParameters")
            .set("operator", "IPMatch")
            .set("negateCondition", true)
            .set("matchValues", string_list(allowed_ranges.iter().map(String::as_str))),
    );
    Input::List(vec![not_blocked_page.into(), not_allowed.into()])
}

fn redirect_to_blocked_page() -> Input {
    Properties::new()
        .set("name", "UrlRedirect")
        .set(
            "parameters",
            Properties::new()
                .set("typeName", "DeliveryRuleUrlRedirectActionParameters")
                .set("redirectType", "Found")
                .set("destinationProtocol", "MatchRequest")
                .set("customPath", BLOCKED_PAGE),
        )
        .into()
}

impl CdnRestrictedStage {
    pub fn endpoint_stage(&self) -> &CdnEndpointStage {
        &self.endpoint
    }

    pub fn restrictions(&self) -> Option<&IpRestrictions> {
        self.restrictions.as_ref()
    }
}
