//! wayfarer command-line front end
//!
//! Thin layer over [`wayfarer_infra`]: resolves configuration from file,
//! environment and flags, then plans or deploys the stack.

pub mod command;
pub mod logging;
pub mod render;

pub use command::{build_cli, resolve_config};
pub use render::{render_config, render_plan, OutputFormat};
