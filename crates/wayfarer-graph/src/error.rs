//! Error types for the resource graph
//!
//! - Construction errors: graph misuse, caught before anything is deployed
//! - Resolution errors: deferred values read before their producer exists
//! - Engine and deploy errors: provisioning failures surfaced by the engine

use crate::types::ResourceId;

/// Errors raised while building a graph
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphBuilderError {
    /// Another resource of the same kind already uses this logical name
    #[error("duplicate resource {kind}::{name}")]
    DuplicateResource { kind: String, name: String },

    /// A dependency has not been registered in this graph yet
    #[error("{resource} depends on {dependency}, which is not registered in this graph")]
    UnknownDependency { resource: String, dependency: String },

    /// A dependency was registered in a different graph
    #[error("{resource} depends on {dependency} from another graph")]
    ForeignResource { resource: String, dependency: String },

    /// Adding the edge would make the graph cyclic
    #[error("edge {from} -> {to} would create a cycle")]
    WouldCreateCycle { from: ResourceId, to: ResourceId },

    /// Edge from a resource to itself
    #[error("self dependency on {0}")]
    SelfLoop(ResourceId),

    /// Two exports share a name
    #[error("duplicate export {0}")]
    DuplicateExport(String),
}

/// Errors raised while resolving deferred values
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// The producing resource has not been created yet
    #[error("{label} is not available before its resource is created")]
    Pending { label: String },

    /// The engine did not report the attribute
    #[error("{label} was not reported by the provisioning engine")]
    MissingAttribute { label: String },

    /// The attribute has an unexpected shape
    #[error("{label} has an unexpected type: {reason}")]
    TypeMismatch { label: String, reason: String },
}

/// Errors reported by a provisioning engine
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("failed to create {urn}: {reason}")]
    CreateFailed { urn: String, reason: String },

    #[error("invoke {function} failed: {reason}")]
    InvokeFailed { function: String, reason: String },

    #[error("unsupported resource kind: {0}")]
    UnsupportedKind(String),
}

/// Errors that abort a deployment run
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    #[error("resolution failed: {0}")]
    Resolve(#[from] ResolveError),

    #[error("engine error: {0}")]
    Engine(#[from] EngineError),

    /// A provisioning task panicked or was cancelled
    #[error("provisioning task failed: {0}")]
    TaskFailed(String),

    #[error("resource {0} is missing from the plan")]
    MissingResource(ResourceId),
}

impl DeployError {
    /// Errors caused by a malformed plan rather than by the engine
    #[inline]
    #[must_use]
    pub fn is_plan_defect(&self) -> bool {
        matches!(self, Self::Resolve(_) | Self::MissingResource(_))
    }
}
