//! Error types for property-package operations.

use thiserror::Error;
use wt_core::WtError;

/// Errors that can occur while constructing or combining stream states.
#[derive(Error, Debug, Clone)]
pub enum PropError {
    #[error("Non-physical value: {what}")]
    NonPhysical { what: &'static str },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Basis mismatch: {what}")]
    BasisMismatch { what: &'static str },
}

pub type PropResult<T> = Result<T, PropError>;

impl From<PropError> for WtError {
    fn from(e: PropError) -> Self {
        match e {
            PropError::NonPhysical { what } => WtError::InvalidArg { what },
            PropError::InvalidArg { what } => WtError::InvalidArg { what },
            PropError::BasisMismatch { what } => WtError::Invariant { what },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = PropError::NonPhysical {
            what: "mass fraction",
        };
        assert!(err.to_string().contains("mass fraction"));
    }

    #[test]
    fn error_conversion() {
        let err = PropError::InvalidArg { what: "test" };
        let wt: WtError = err.into();
        assert!(matches!(wt, WtError::InvalidArg { .. }));
    }
}
