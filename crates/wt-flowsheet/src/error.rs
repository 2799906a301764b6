//! Flowsheet-specific error types.

use thiserror::Error;
use wt_components::ComponentError;
use wt_core::WtError;

/// Flowsheet construction and wiring errors.
#[derive(Error, Debug)]
pub enum FlowsheetError {
    #[error("Block {block} is not on the flowsheet")]
    BlockAbsent { block: &'static str },

    #[error("Block {block} has no port {port}")]
    NoSuchPort {
        block: &'static str,
        port: &'static str,
    },

    #[error("Arc {arc} must run from an outlet port to an inlet port")]
    PortDirection { arc: String },

    #[error("Port {block}.{port} is the destination of more than one arc")]
    DuplicateDestination {
        block: &'static str,
        port: &'static str,
    },

    #[error("Arcs have not been expanded")]
    NotExpanded,

    #[error("No state computed at {block}.{port}")]
    StateMissing {
        block: &'static str,
        port: &'static str,
    },

    #[error("Component error: {0}")]
    Component(#[from] ComponentError),
}

pub type FlowsheetResult<T> = Result<T, FlowsheetError>;

impl From<FlowsheetError> for WtError {
    fn from(err: FlowsheetError) -> Self {
        match err {
            FlowsheetError::Component(e) => e.into(),
            other => WtError::Invariant {
                what: Box::leak(other.to_string().into_boxed_str()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_names_the_port() {
        let err = FlowsheetError::StateMissing {
            block: "NF",
            port: "permeate",
        };
        assert!(err.to_string().contains("NF.permeate"));
    }
}
