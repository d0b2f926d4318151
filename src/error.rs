use thiserror::Error;

/// Errors produced while building graphs, partitions, and chains.
///
/// Only `GraphConstruction` and `InvalidConfiguration` ever reach a caller.
/// The per-step variants are raised by proposals and constraints and absorbed
/// by the chain as self-loops.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("graph construction failed: {message}")]
    GraphConstruction { message: String },

    #[error("invalid configuration: {field} = {value} ({reason})")]
    InvalidConfiguration { field: String, value: String, reason: String },

    #[error("no population-balanced cut found after {attempts} spanning trees")]
    ProposalExhausted { attempts: usize },

    #[error("constraint '{constraint}' rejected the candidate")]
    ConstraintViolation { constraint: String },
}

impl Error {
    pub(crate) fn graph(message: impl Into<String>) -> Self {
        Self::GraphConstruction { message: message.into() }
    }

    pub(crate) fn config(field: impl Into<String>, value: impl ToString, reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            field: field.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// True for failures a chain step recovers from by staying in place.
    #[inline]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::ProposalExhausted { .. } | Self::ConstraintViolation { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
