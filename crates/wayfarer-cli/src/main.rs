use anyhow::Context;
use std::sync::Arc;
use wayfarer_cli::{build_cli, logging, render_config, render_plan, resolve_config, OutputFormat};
use wayfarer_infra::{LocalEngine, Stack};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = build_cli().get_matches();
    logging::init(matches.get_flag("log-json"));

    let config = resolve_config(&matches, |key| std::env::var(key).ok())?;

    match matches.subcommand() {
        Some(("plan", args)) => {
            let format = args
                .get_one::<OutputFormat>("format")
                .copied()
                .unwrap_or(OutputFormat::Text);
            let stack = Stack::define(&config)?;
            println!("{}", render_plan(format, &config.environment, &stack.plan().document())?);
        }
        Some(("up", args)) => {
            let subscription = args
                .get_one::<String>("subscription")
                .cloned()
                .unwrap_or_default();
            let stack = Stack::define(&config)?;
            let engine = Arc::new(LocalEngine::with_subscription(subscription));
            let outputs = stack.deploy(engine).await.context("deployment failed")?;

            println!(
                "{} resources created in {} waves",
                outputs.summary.resources_created, outputs.summary.waves
            );
            println!("publicUrl: {}", outputs.public_url);
        }
        Some(("config", args)) => {
            let format = args
                .get_one::<OutputFormat>("format")
                .copied()
                .unwrap_or(OutputFormat::Text);
            println!("{}", render_config(format, &config)?);
        }
        _ => unreachable!("subcommand is required"),
    }

    Ok(())
}
