//! Error types for unit-block operations.

use thiserror::Error;
use wt_core::WtError;
use wt_props::PropError;

/// Errors that can occur during unit-block construction and evaluation.
#[derive(Error, Debug, Clone)]
pub enum ComponentError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Non-physical value: {what}")]
    NonPhysical { what: &'static str },

    #[error("Not supported: {what}")]
    NotSupported { what: &'static str },

    #[error("Missing state: {what}")]
    MissingState { what: &'static str },

    #[error("Under-specified: {what}")]
    UnderSpecified { what: &'static str },

    #[error("Property error: {0}")]
    Prop(#[from] PropError),
}

pub type ComponentResult<T> = Result<T, ComponentError>;

impl From<ComponentError> for WtError {
    fn from(e: ComponentError) -> Self {
        match e {
            ComponentError::InvalidArg { what } => WtError::InvalidArg { what },
            ComponentError::NonPhysical { what } => WtError::InvalidArg { what },
            ComponentError::NotSupported { what } => WtError::NotImplemented { what },
            ComponentError::MissingState { what } => WtError::Invariant { what },
            ComponentError::UnderSpecified { what: _ } => WtError::UnderSpecified { dof: 1 },
            ComponentError::Prop(p) => p.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ComponentError::MissingState {
            what: "splitter inlet",
        };
        assert!(err.to_string().contains("splitter inlet"));
    }

    #[test]
    fn not_supported_maps_to_not_implemented() {
        let err = ComponentError::NotSupported { what: "test" };
        let wt: WtError = err.into();
        assert!(matches!(wt, WtError::NotImplemented { .. }));
    }
}
