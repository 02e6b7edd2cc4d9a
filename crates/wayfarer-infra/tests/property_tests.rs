use proptest::prelude::*;
use wayfarer_infra::naming::{custom_domain, origin_host, sanitize_resource_name};
use wayfarer_infra::{parse_allowed_ip_ranges, EnvironmentConfig, ReplicationTier};

proptest! {
    #[test]
    fn prop_allow_list_without_separator_falls_back(raw in "[^|]*") {
        prop_assert_eq!(parse_allowed_ip_ranges(Some(&raw)), vec!["127.0.0.1/32".to_string()]);
    }

    #[test]
    fn prop_allow_list_is_never_empty(raw in ".*") {
        prop_assert!(!parse_allowed_ip_ranges(Some(&raw)).is_empty());
    }

    #[test]
    fn prop_allow_list_keeps_order(
        cidrs in proptest::collection::vec("[0-9]{1,3}(\\.[0-9]{1,3}){3}/[0-9]{1,2}", 1..6)
    ) {
        let raw = cidrs
            .iter()
            .enumerate()
            .map(|(i, cidr)| format!("site{i}|{cidr}"))
            .collect::<Vec<_>>()
            .join(";");
        prop_assert_eq!(parse_allowed_ip_ranges(Some(&raw)), cidrs);
    }

    #[test]
    fn prop_origin_host_is_idempotent(host in "[a-z0-9]{3,24}(\\.[a-z0-9]{1,10}){1,4}") {
        let endpoint = format!("https://{host}/");
        let once = origin_host(&endpoint);
        prop_assert_eq!(&once, &host);
        prop_assert_eq!(origin_host(&once), once);
    }

    #[test]
    fn prop_sanitized_domain_has_no_dots(
        zone in "[a-z]{1,12}\\.[a-z]{2,6}",
        production in any::<bool>()
    ) {
        let name = sanitize_resource_name(&custom_domain(production, &zone));
        prop_assert!(!name.contains('.'));
        prop_assert_eq!(name.starts_with("dev-"), !production);
    }

    #[test]
    fn prop_only_production_disables_restrictions(name in "[a-z]{0,12}") {
        let settings = EnvironmentConfig::for_environment(&name);
        let production = name == "production";
        prop_assert_eq!(settings.enable_ip_restrictions, !production);
        let expected = if production {
            ReplicationTier::StandardGrs
        } else {
            ReplicationTier::StandardLrs
        };
        prop_assert_eq!(settings.storage_replication, expected);
    }
}
