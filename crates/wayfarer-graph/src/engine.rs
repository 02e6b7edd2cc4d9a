//! Provisioning engine seam and the deployer
//!
//! The deployer only accepts a [`DeploymentPlan`]. It walks the plan wave by
//! wave: inputs of every resource in a wave are resolved against the state
//! built so far, then the wave is created concurrently. There is no retry or
//! rollback here; the first failure aborts the run.

use crate::error::{DeployError, EngineError};
use crate::plan::DeploymentPlan;
use crate::resource::ResolvedResource;
use crate::state::{merge_attributes, DeploymentState};
use crate::types::GraphId;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde_json::Value;
use std::sync::Arc;
use tokio::task::JoinSet;

/// A provisioning engine
///
/// Implement this trait to create resources against a real or simulated
/// provider. Attributes returned from `create` are overlaid onto the
/// resolved inputs and become readable through deferred outputs.
#[async_trait::async_trait]
pub trait ProvisioningEngine: Send + Sync {
    /// Create a single resource, returning the attributes it reports
    async fn create(&self, resource: &ResolvedResource) -> Result<Value, EngineError>;

    /// Call a provider function that does not create a resource
    async fn invoke(&self, function: &str, args: Value) -> Result<Value, EngineError>;
}

/// Result of a deployment run
#[derive(Debug, Clone)]
pub struct DeploymentSummary {
    pub graph_id: GraphId,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub resources_created: usize,
    pub waves: usize,
    pub outputs: IndexMap<String, String>,
    pub state: DeploymentState,
}

/// Applies deployment plans through a provisioning engine
pub struct Deployer {
    engine: Arc<dyn ProvisioningEngine>,
}

impl Deployer {
    pub fn new(engine: Arc<dyn ProvisioningEngine>) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &Arc<dyn ProvisioningEngine> {
        &self.engine
    }

    /// Apply a plan
    ///
    /// # Errors
    /// Returns `DeployError` if:
    /// - A deferred input cannot be resolved (plan defect)
    /// - The engine fails to create a resource
    /// - A provisioning task panics
    pub async fn apply(&self, plan: &DeploymentPlan) -> Result<DeploymentSummary, DeployError> {
        let started_at = Utc::now();
        let mut state = DeploymentState::new();

        for (wave_index, wave) in plan.waves().iter().enumerate() {
            tracing::debug!(wave = wave_index, resources = wave.len(), "applying wave");
            let mut tasks = JoinSet::new();

            for id in wave {
                let planned = plan.get(*id).ok_or(DeployError::MissingResource(*id))?;
                let inputs = planned.properties().resolve(&state)?;
                let resolved = ResolvedResource {
                    id: planned.id(),
                    kind: planned.kind(),
                    name: planned.name().to_string(),
                    inputs,
                };
                let engine = Arc::clone(&self.engine);
                tasks.spawn(async move {
                    let reported = engine.create(&resolved).await;
                    (resolved, reported)
                });
            }

            while let Some(joined) = tasks.join_next().await {
                let (resolved, reported) =
                    joined.map_err(|e| DeployError::TaskFailed(e.to_string()))?;
                let reported = reported?;
                tracing::info!(urn = %resolved.urn(), "created");
                state.insert(resolved.id, merge_attributes(resolved.inputs, reported));
            }
        }

        let mut outputs = IndexMap::with_capacity(plan.exports().len());
        for (name, output) in plan.exports() {
            outputs.insert(name.clone(), output.resolve(&state)?);
        }

        Ok(DeploymentSummary {
            graph_id: plan.graph_id(),
            started_at,
            finished_at: Utc::now(),
            resources_created: state.len(),
            waves: plan.waves().len(),
            outputs,
            state,
        })
    }
}
