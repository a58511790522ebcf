use crate::component::Phase;
use crate::table::Time;
use crate::value::VarType;
use thiserror::Error;

/// Error type for invalid operations.
#[derive(Error, Debug)]
pub enum CosimError {
    #[error("{0}")]
    Error(String),
    #[error("unknown variable '{0}'")]
    UnknownVariable(String),
    #[error("cannot convert {value:?} to {kind}")]
    Conversion { value: String, kind: VarType },
    #[error("unsupported variable type {declared:?}")]
    UnsupportedType { declared: String },
    #[error("type mismatch for '{variable}': declared {declared}, got {actual}")]
    TypeMismatch {
        variable: String,
        declared: VarType,
        actual: VarType,
    },
    #[error("failed to instantiate component: {0}")]
    Instantiation(String),
    #[error("step rejected at t={time} (step size {step_size})")]
    StepFailed { time: Time, step_size: Time },
    #[error("{operation} called in phase {phase}")]
    InvalidPhase {
        operation: &'static str,
        phase: Phase,
    },
    #[error("malformed table: {0}")]
    MalformedTable(String),
}

/// Convenience type for `Result<T, CosimError>`.
pub type CosimResult<T> = Result<T, CosimError>;
