//! Error types for costing operations.

use thiserror::Error;
use wt_components::ComponentError;
use wt_core::WtError;
use wt_flowsheet::FlowsheetError;

/// Errors that can occur while costing a flowsheet.
#[derive(Error, Debug)]
pub enum CostingError {
    /// A unit variant with no defined cost model was requested.
    #[error("Not implemented: {what}")]
    NotImplemented { what: &'static str },

    #[error("Missing state: {what}")]
    MissingState { what: &'static str },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Component error: {0}")]
    Component(#[from] ComponentError),

    #[error("Flowsheet error: {0}")]
    Flowsheet(#[from] FlowsheetError),
}

pub type CostingResult<T> = Result<T, CostingError>;

impl From<CostingError> for WtError {
    fn from(e: CostingError) -> Self {
        match e {
            CostingError::NotImplemented { what } => WtError::NotImplemented { what },
            CostingError::MissingState { what } => WtError::Invariant { what },
            CostingError::InvalidArg { what } => WtError::InvalidArg { what },
            CostingError::Component(c) => c.into(),
            CostingError::Flowsheet(f) => f.into(),
        }
    }
}
