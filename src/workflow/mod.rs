//! Core workflows: task completion & scoring, and complaint moderation.
//!
//! The engines hold no state of their own; every operation runs against a
//! [`Store`](crate::store::Store) and relies on the backend for atomicity of
//! multi-record writes.

pub mod complaints;
pub mod tasks;

use crate::store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("{0} {1} not found")]
    NotFound(&'static str, i64),

    #[error("complaint {0} already adjudicated")]
    InvalidStateTransition(i64),

    #[error("storage failure: {0}")]
    Store(StoreError),
}

impl From<StoreError> for WorkflowError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(kind, id) => WorkflowError::NotFound(kind, id),
            StoreError::NotPending(id) => WorkflowError::InvalidStateTransition(id),
            other => WorkflowError::Store(other),
        }
    }
}
