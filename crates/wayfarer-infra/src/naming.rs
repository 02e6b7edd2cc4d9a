//! Resource naming and string transforms
//!
//! Pure functions; deferred values reach them through `Output::map`.

use crate::error::ConfigError;
use once_cell::sync::Lazy;
use regex::Regex;

pub const STORAGE_ACCOUNT_PREFIX: &str = "wayfarerweb";

static SCHEME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^https://").expect("static regex"));
static TRAILING_SLASH: Lazy<Regex> = Lazy::new(|| Regex::new(r"/$").expect("static regex"));

/// `<project>-<env>-rg`
pub fn resource_group_name(project: &str, environment: &str) -> String {
    format!("{project}-{environment}-rg")
}

pub fn storage_account_name(suffix: &str) -> String {
    format!("{STORAGE_ACCOUNT_PREFIX}{suffix}")
}

/// Storage account names: 3-24 characters, lowercase letters and digits
pub fn validate_storage_account_name(name: &str) -> Result<(), ConfigError> {
    let reason = if !(3..=24).contains(&name.len()) {
        Some("must be 3-24 characters long")
    } else if !name.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()) {
        Some("only lowercase letters and digits are allowed")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(ConfigError::InvalidStorageAccountName {
            name: name.to_string(),
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}

/// Host name of a storage web endpoint: strip `https://`, then one trailing `/`
pub fn origin_host(web_endpoint: &str) -> String {
    let without_scheme = SCHEME.replace(web_endpoint, "");
    TRAILING_SLASH.replace(&without_scheme, "").into_owned()
}

/// Relative record name: zone apex for production, `dev` otherwise
pub fn subdomain(is_production: bool) -> &'static str {
    if is_production {
        "@"
    } else {
        "dev"
    }
}

/// Fully qualified custom domain
pub fn custom_domain(is_production: bool, zone: &str) -> String {
    match subdomain(is_production) {
        "@" => zone.to_string(),
        sub => format!("{sub}.{zone}"),
    }
}

/// Resource names cannot contain dots
pub fn sanitize_resource_name(domain: &str) -> String {
    domain.replace('.', "-")
}

/// Relative name of the domain validation TXT record
///
/// At the zone apex this is plain `_dnsauth`, not `_dnsauth.@`.
pub fn validation_record_name(subdomain: &str) -> String {
    match subdomain {
        "@" => "_dnsauth".to_string(),
        sub => format!("_dnsauth.{sub}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_host_strips_scheme_and_slash() {
        let host = origin_host("https://mystorageacct.z13.web.core.windows.net/");
        assert_eq!(host, "mystorageacct.z13.web.core.windows.net");
        assert_eq!(origin_host(&host), host);
    }

    #[test]
    fn test_origin_host_leaves_other_schemes() {
        assert_eq!(origin_host("http://a.example/"), "http://a.example");
        assert_eq!(origin_host("https://a.example//"), "a.example/");
    }

    #[test]
    fn test_domains_by_environment() {
        assert_eq!(custom_domain(true, "example.com"), "example.com");
        assert_eq!(sanitize_resource_name(&custom_domain(true, "example.com")), "example-com");
        assert_eq!(custom_domain(false, "example.com"), "dev.example.com");
        assert_eq!(
            sanitize_resource_name(&custom_domain(false, "example.com")),
            "dev-example-com"
        );
    }

    #[test]
    fn test_validation_record_names() {
        assert_eq!(validation_record_name("dev"), "_dnsauth.dev");
        assert_eq!(validation_record_name("@"), "_dnsauth");
    }

    #[test]
    fn test_storage_account_names() {
        assert_eq!(storage_account_name("dev"), "wayfarerwebdev");
        assert!(validate_storage_account_name("wayfarerwebprod").is_ok());
        assert!(validate_storage_account_name("ab").is_err());
        assert!(validate_storage_account_name("Wayfarer").is_err());
        assert!(validate_storage_account_name("wayfarer-web").is_err());
        assert!(validate_storage_account_name(&"a".repeat(25)).is_err());
    }

    #[test]
    fn test_resource_group_name() {
        assert_eq!(resource_group_name("wayfarer", "staging"), "wayfarer-staging-rg");
    }
}
