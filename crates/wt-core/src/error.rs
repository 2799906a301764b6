use thiserror::Error;

pub type WtResult<T> = Result<T, WtError>;

#[derive(Error, Debug)]
pub enum WtError {
    #[error("Not implemented: {what}")]
    NotImplemented { what: &'static str },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Model is under-specified: {dof} degrees of freedom remain")]
    UnderSpecified { dof: u32 },

    #[error("Solve did not converge: {what}")]
    NotConverged { what: &'static str },

    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invariant violated: {what}")]
    Invariant { what: &'static str },
}
