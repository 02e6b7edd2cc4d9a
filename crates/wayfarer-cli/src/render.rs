//! Plan and config rendering

use clap::builder::PossibleValue;
use clap::ValueEnum;
use serde::Serialize;
use std::fmt::Write;
use wayfarer_graph::PlanDocument;
use wayfarer_infra::{DeployConfig, EnvironmentConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Yaml,
}

impl ValueEnum for OutputFormat {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::Text, Self::Json, Self::Yaml]
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        Some(match self {
            Self::Text => PossibleValue::new("text"),
            Self::Json => PossibleValue::new("json"),
            Self::Yaml => PossibleValue::new("yaml"),
        })
    }
}

/// Human-readable plan, one block per wave
pub fn plan_text(environment: &str, doc: &PlanDocument) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Plan for '{environment}': {} resources in {} waves",
        doc.resources.len(),
        doc.waves
    );

    for wave in 0..doc.waves {
        let _ = writeln!(out, "\nwave {wave}");
        for entry in doc.resources.iter().filter(|e| e.wave == wave) {
            let _ = writeln!(out, "  + {}", entry.urn);
            if !entry.depends_on.is_empty() {
                let _ = writeln!(out, "      depends on: {}", entry.depends_on.join(", "));
            }
            if !entry.inputs_from.is_empty() {
                let _ = writeln!(out, "      inputs from: {}", entry.inputs_from.join(", "));
            }
        }
    }

    let _ = writeln!(out, "\nOutputs:");
    for (name, value) in &doc.outputs {
        let _ = writeln!(out, "  {name} = {value}");
    }
    out
}

#[derive(Debug, Serialize)]
struct ConfigView<'a> {
    deploy: &'a DeployConfig,
    allowed_ip_ranges: Vec<String>,
    settings: &'a EnvironmentConfig,
}

pub fn config_text(config: &DeployConfig) -> String {
    let settings = config.environment_config();
    let mut out = String::new();
    let _ = writeln!(out, "environment:             {}", config.environment);
    let _ = writeln!(out, "location:                {}", config.location);
    let _ = writeln!(
        out,
        "dns zone:                {} (resource group {})",
        config.dns_zone_name, config.dns_zone_resource_group
    );
    let _ = writeln!(out, "production:              {}", settings.is_production);
    let _ = writeln!(out, "storage replication:     {}", settings.storage_replication.sku_name());
    let _ = writeln!(out, "cdn:                     {}", settings.cdn_tier.sku_name());
    let _ = writeln!(out, "cache ttl (s):           {}", settings.cache_ttl_seconds);
    let _ = writeln!(out, "ip restrictions:         {}", settings.enable_ip_restrictions);
    let _ = writeln!(out, "allowed ip ranges:       {}", config.allowed_ip_ranges().join(", "));
    out
}

pub fn render_plan(
    format: OutputFormat,
    environment: &str,
    doc: &PlanDocument,
) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Text => plan_text(environment, doc),
        OutputFormat::Json => serde_json::to_string_pretty(doc)?,
        OutputFormat::Yaml => serde_yaml::to_string(doc)?,
    })
}

pub fn render_config(format: OutputFormat, config: &DeployConfig) -> anyhow::Result<String> {
    let settings = config.environment_config();
    let view = ConfigView {
        deploy: config,
        allowed_ip_ranges: config.allowed_ip_ranges(),
        settings: &settings,
    };
    Ok(match format {
        OutputFormat::Text => config_text(config),
        OutputFormat::Json => serde_json::to_string_pretty(&view)?,
        OutputFormat::Yaml => serde_yaml::to_string(&view)?,
    })
}
