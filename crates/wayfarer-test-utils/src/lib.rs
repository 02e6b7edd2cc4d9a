//! Testing utilities for the Wayfarer workspace
//!
//! Shared fixtures and assertions.

#![allow(missing_docs)]

use std::collections::HashMap;
use wayfarer_graph::{DeploymentPlan, ResourceKind, ResourceRef};
use wayfarer_infra::{DeployConfig, Stack};

pub const TEST_ZONE: &str = "example.com";
pub const TEST_ZONE_RESOURCE_GROUP: &str = "dns-rg";
pub const OFFICE_RANGES: &str = "office|203.0.113.0/24;home|198.51.100.5/32";

/// Lookup closure over fixed variables, for `DeployConfig::from_lookup`
pub fn env_lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

/// Config for `environment` against the test zone, with the office allow-list
pub fn test_config(environment: &str) -> DeployConfig {
    DeployConfig::new()
        .with_environment(environment)
        .with_dns_zone(TEST_ZONE_RESOURCE_GROUP, TEST_ZONE)
        .with_allowed_ip_ranges(OFFICE_RANGES)
}

pub fn define_stack(environment: &str) -> Stack {
    Stack::define(&test_config(environment)).unwrap()
}

/// The single planned resource of `kind`
pub fn only_of_kind(plan: &DeploymentPlan, kind: ResourceKind) -> &wayfarer_graph::PlannedResource {
    let mut matches = plan.of_kind(kind);
    let first = matches.next().unwrap_or_else(|| panic!("no {kind} in plan"));
    assert!(matches.next().is_none(), "more than one {kind} in plan");
    first
}

/// Assert `before` precedes `after` in plan order
pub fn assert_ordered(plan: &DeploymentPlan, before: &ResourceRef, after: &ResourceRef) {
    let b = plan.position(before.id()).unwrap();
    let a = plan.position(after.id()).unwrap();
    assert!(b < a, "{} must come before {}", before.urn(), after.urn());
}

/// Assert `before` was created before `after`, given an engine creation log
pub fn assert_created_before(log: &[String], before: &ResourceRef, after: &ResourceRef) {
    let position = |r: &ResourceRef| {
        log.iter()
            .position(|urn| *urn == r.urn())
            .unwrap_or_else(|| panic!("{} was never created", r.urn()))
    };
    assert!(
        position(before) < position(after),
        "{} must be created before {}",
        before.urn(),
        after.urn()
    );
}
