use thiserror::Error;

/// Why a task descriptor could not be turned into a mission task. Never fatal:
/// the descriptor is dropped and generation goes on.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("object '{name}' not found in environment")]
    MissingObjectReference { name: String },
    #[error("cannot create task of type '{task_type}'")]
    UnknownTaskType { task_type: String },
}

/// Fatal for the whole run.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PlanError {
    #[error("segment '{segment}' is malformed: {reason}")]
    MalformedSegment { segment: String, reason: String },
}
