//! Command-line definition and config resolution

use crate::render::OutputFormat;
use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use wayfarer_infra::DeployConfig;

pub fn build_cli() -> Command {
    Command::new("wayfarer")
        .version(wayfarer_infra::VERSION)
        .about("Plan and deploy the Wayfarer static site stack")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML file with deploy settings"),
        )
        .arg(
            Arg::new("environment")
                .long("environment")
                .short('e')
                .global(true)
                .help("Environment name; only 'production' selects the production profile"),
        )
        .arg(
            Arg::new("location")
                .long("location")
                .global(true)
                .help("Azure region for regional resources"),
        )
        .arg(
            Arg::new("dns-zone-resource-group")
                .long("dns-zone-resource-group")
                .global(true)
                .help("Resource group of the existing DNS zone"),
        )
        .arg(
            Arg::new("dns-zone-name")
                .long("dns-zone-name")
                .global(true)
                .help("Existing DNS zone the custom domain lives in"),
        )
        .arg(
            Arg::new("allowed-ip-ranges")
                .long("allowed-ip-ranges")
                .global(true)
                .help("Allow-list as label|cidr;label|cidr"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON"),
        )
        .subcommand(
            Command::new("plan")
                .about("Show the resources, their order and the stack output")
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .default_value("text")
                        .value_parser(value_parser!(OutputFormat))
                        .help("Output format"),
                ),
        )
        .subcommand(
            Command::new("up")
                .about("Deploy against the local simulated engine and print the public URL")
                .arg(
                    Arg::new("subscription")
                        .long("subscription")
                        .default_value(wayfarer_infra::simulate::DEFAULT_SUBSCRIPTION)
                        .help("Subscription id used by the simulated engine"),
                ),
        )
        .subcommand(
            Command::new("config")
                .about("Print the resolved deploy and environment configuration")
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .default_value("text")
                        .value_parser(value_parser!(OutputFormat))
                        .help("Output format"),
                ),
        )
}

/// Defaults, then `--config`, then the environment, then flags
pub fn resolve_config<F>(matches: &ArgMatches, lookup: F) -> anyhow::Result<DeployConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let base = match matches.get_one::<PathBuf>("config") {
        Some(path) => DeployConfig::from_file(path)
            .with_context(|| format!("loading config file {}", path.display()))?,
        None => DeployConfig::new(),
    };
    let mut config = base.overlay_lookup(lookup);

    let flag = |name: &str| matches.get_one::<String>(name).cloned();
    if let Some(v) = flag("environment") {
        config = config.with_environment(v);
    }
    if let Some(v) = flag("location") {
        config = config.with_location(v);
    }
    if let Some(v) = flag("dns-zone-resource-group") {
        config.dns_zone_resource_group = v;
    }
    if let Some(v) = flag("dns-zone-name") {
        config.dns_zone_name = v;
    }
    if let Some(v) = flag("allowed-ip-ranges") {
        config = config.with_allowed_ip_ranges(v);
    }

    config.validate().context("invalid deploy configuration")?;
    Ok(config)
}
