//! Wayfarer resource graph
//!
//! Declarative infrastructure as a two-phase pipeline:
//! 1. **Construction Phase**: register resources, with explicit `depends_on`
//!    edges and implicit edges from deferred inputs, then validate into an
//!    immutable [`DeploymentPlan`]
//! 2. **Apply Phase**: a [`Deployer`] walks the plan wave by wave through a
//!    [`ProvisioningEngine`], resolving deferred values as producers appear
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use wayfarer_graph::prelude::*;
//!
//! const BUCKET: ResourceKind = ResourceKind::new("azure-native:storage:StorageAccount");
//!
//! let mut builder = GraphBuilder::new();
//! let account = builder.register(ResourceSpec::new(BUCKET, "web"))?;
//! let endpoint: Output<String> = account.output("primaryEndpoints.web");
//! builder.export("url", endpoint)?;
//!
//! let plan = builder.validate()?;
//! let summary = Deployer::new(engine).apply(&plan).await?;
//! ```

pub mod builder;
pub mod dag;
pub mod engine;
pub mod error;
pub mod output;
pub mod plan;
pub mod resource;
pub mod state;
pub mod types;

pub use builder::GraphBuilder;
pub use engine::{Deployer, DeploymentSummary, ProvisioningEngine};
pub use error::{DeployError, EngineError, GraphBuilderError, ResolveError};
pub use output::Output;
pub use plan::{DeploymentPlan, PlanDocument, PlanEntry, PlannedResource};
pub use resource::{string_list, Input, Properties, ResolvedResource, ResourceRef, ResourceSpec};
pub use state::DeploymentState;
pub use types::{GraphId, ResourceId, ResourceKind};

/// Common imports for building and applying graphs
pub mod prelude {
    pub use crate::builder::GraphBuilder;
    pub use crate::engine::{Deployer, DeploymentSummary, ProvisioningEngine};
    pub use crate::error::{DeployError, EngineError, GraphBuilderError, ResolveError};
    pub use crate::output::Output;
    pub use crate::plan::DeploymentPlan;
    pub use crate::resource::{
        string_list, Input, Properties, ResolvedResource, ResourceRef, ResourceSpec,
    };
    pub use crate::state::DeploymentState;
    pub use crate::types::{ResourceId, ResourceKind};
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
