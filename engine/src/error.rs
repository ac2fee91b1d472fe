use thiserror::Error;

use crate::genome::{Innovation, NodeId};

/// Result type used across the engine.
pub type Result<T> = std::result::Result<T, NeatError>;

/// Errors surfaced by bootstrap, registry lookups and checked genome edits.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NeatError {
    #[error("invalid config: {reason}")]
    InvalidConfig { reason: String },

    #[error("unknown activation function '{0}'")]
    UnknownActivation(String),

    #[error("connection {innovation} references missing node {node}")]
    DanglingConnection { innovation: Innovation, node: NodeId },

    #[error("connection {input}->{output} already exists")]
    DuplicateConnection { input: NodeId, output: NodeId },

    #[error("innovation {0} appears more than once in a genome")]
    DuplicateInnovation(Innovation),

    #[error("node id {0} is used more than once")]
    DuplicateNode(NodeId),

    #[error("cached {kind} count {cached} != {actual}")]
    CountMismatch {
        kind: &'static str,
        cached: usize,
        actual: usize,
    },
}

impl NeatError {
    pub(crate) fn invalid_config(reason: impl Into<String>) -> Self {
        NeatError::InvalidConfig {
            reason: reason.into(),
        }
    }
}
