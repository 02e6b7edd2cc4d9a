//! Azure resource type tokens used by the stack

use wayfarer_graph::ResourceKind;

pub const RESOURCE_GROUP: ResourceKind = ResourceKind::new("azure-native:resources:ResourceGroup");

pub const STORAGE_ACCOUNT: ResourceKind = ResourceKind::new("azure-native:storage:StorageAccount");
pub const STATIC_WEBSITE: ResourceKind =
    ResourceKind::new("azure-native:storage:StorageAccountStaticWebsite");

pub const CDN_PROFILE: ResourceKind = ResourceKind::new("azure-native:cdn:Profile");
pub const AFD_ENDPOINT: ResourceKind = ResourceKind::new("azure-native:cdn:AFDEndpoint");
pub const AFD_ORIGIN_GROUP: ResourceKind = ResourceKind::new("azure-native:cdn:AFDOriginGroup");
pub const AFD_ORIGIN: ResourceKind = ResourceKind::new("azure-native:cdn:AFDOrigin");
pub const AFD_CUSTOM_DOMAIN: ResourceKind = ResourceKind::new("azure-native:cdn:AFDCustomDomain");
pub const RULE_SET: ResourceKind = ResourceKind::new("azure-native:cdn:RuleSet");
pub const RULE: ResourceKind = ResourceKind::new("azure-native:cdn:Rule");
pub const ROUTE: ResourceKind = ResourceKind::new("azure-native:cdn:Route");

pub const DNS_RECORD_SET: ResourceKind = ResourceKind::new("azure-native:network:RecordSet");

/// Provider function listing storage account keys
pub const LIST_STORAGE_ACCOUNT_KEYS: &str = "azure-native:storage:listStorageAccountKeys";

/// Every resource kind the stack declares
pub const ALL: &[ResourceKind] = &[
    RESOURCE_GROUP,
    STORAGE_ACCOUNT,
    STATIC_WEBSITE,
    CDN_PROFILE,
    AFD_ENDPOINT,
    AFD_ORIGIN_GROUP,
    AFD_ORIGIN,
    AFD_CUSTOM_DOMAIN,
    RULE_SET,
    RULE,
    ROUTE,
    DNS_RECORD_SET,
];
