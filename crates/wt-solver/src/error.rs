//! Error types for solver operations.

use thiserror::Error;
use wt_components::ComponentError;
use wt_core::WtError;
use wt_flowsheet::FlowsheetError;

/// Errors that can occur while initializing or solving a flowsheet.
#[derive(Error, Debug)]
pub enum SolverError {
    #[error("Problem setup error: {what}")]
    ProblemSetup { what: &'static str },

    #[error("Arcs must be expanded before solving")]
    NotExpanded,

    #[error("Model is under-specified: {dof} degrees of freedom remain")]
    UnderSpecified { dof: u32 },

    #[error("Solve did not converge: residual {residual:.3e} after {passes} passes")]
    NotConverged { residual: f64, passes: usize },

    #[error("Cycle detected in the arc network")]
    Cyclic,

    #[error("Component error: {0}")]
    Component(#[from] ComponentError),

    #[error("Flowsheet error: {0}")]
    Flowsheet(#[from] FlowsheetError),
}

pub type SolverResult<T> = Result<T, SolverError>;

impl From<SolverError> for WtError {
    fn from(e: SolverError) -> Self {
        match e {
            SolverError::UnderSpecified { dof } => WtError::UnderSpecified { dof },
            SolverError::NotConverged { .. } => WtError::NotConverged {
                what: "solver residual stayed above tolerance",
            },
            SolverError::ProblemSetup { what } => WtError::Invariant { what },
            SolverError::NotExpanded => WtError::Invariant {
                what: "arcs not expanded",
            },
            SolverError::Cyclic => WtError::Invariant {
                what: "cycle in arc network",
            },
            SolverError::Component(c) => c.into(),
            SolverError::Flowsheet(f) => f.into(),
        }
    }
}
