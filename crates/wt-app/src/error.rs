//! Error types for the wt-app service layer.

use std::path::PathBuf;

use wt_components::ComponentError;
use wt_costing::CostingError;
use wt_flowsheet::FlowsheetError;
use wt_props::PropError;
use wt_solver::SolverError;

/// Application error type that wraps errors from the backend crates and
/// provides a unified interface for the CLI.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Failed to read config file: {path}")]
    ConfigFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Property error: {0}")]
    Prop(#[from] PropError),

    #[error("Component error: {0}")]
    Component(#[from] ComponentError),

    #[error("Flowsheet error: {0}")]
    Flowsheet(#[from] FlowsheetError),

    #[error("Solver error: {0}")]
    Solver(#[from] SolverError),

    #[error("Costing error: {0}")]
    Costing(#[from] CostingError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for wt-app operations.
pub type AppResult<T> = Result<T, AppError>;
