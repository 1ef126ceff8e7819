//! Framework error type.
//!
//! Sub-crates may define their own error enums and convert them into
//! `PedError` via `From` impls, or keep them separate and wrap `PedError` as
//! one variant.  Both patterns are acceptable; prefer whichever keeps error
//! sites clean.

use thiserror::Error;

use crate::{AgentId, QueueId};

/// The top-level error type for `ped-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum PedError {
    #[error("agent {0} not found")]
    AgentNotFound(AgentId),

    #[error("queue {0} not found")]
    QueueNotFound(QueueId),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `ped-*` crates.
pub type PedResult<T> = Result<T, PedError>;
