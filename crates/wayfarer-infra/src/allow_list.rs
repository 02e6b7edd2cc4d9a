//! `ALLOWED_IP_RANGES` parsing
//!
//! Format: `label|cidr;label|cidr`. Labels are informational and dropped.
//! The result is never empty: anything that yields no usable entry falls
//! back to loopback only.

/// Used when no valid entry is configured
pub const LOOPBACK_FALLBACK: &str = "127.0.0.1/32";

/// Parse the raw allow-list, preserving entry order
pub fn parse_allowed_ip_ranges(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw else {
        tracing::debug!("ALLOWED_IP_RANGES not set, using {LOOPBACK_FALLBACK}");
        return vec![LOOPBACK_FALLBACK.to_string()];
    };

    let ranges: Vec<String> = raw
        .split(';')
        .filter(|entry| !entry.trim().is_empty())
        .filter_map(|entry| {
            let parts: Vec<&str> = entry.split('|').collect();
            match parts.as_slice() {
                [_, cidr, ..] if !cidr.trim().is_empty() => Some(cidr.trim().to_string()),
                _ => {
                    tracing::debug!(entry, "dropping malformed allow-list entry");
                    None
                }
            }
        })
        .collect();

    if ranges.is_empty() {
        tracing::warn!(
            "ALLOWED_IP_RANGES has no valid entries, falling back to {LOOPBACK_FALLBACK}"
        );
        return vec![LOOPBACK_FALLBACK.to_string()];
    }

    ranges
}
