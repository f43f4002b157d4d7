use thiserror::Error;

/// Failures raised by the transport model.
///
/// An infeasible time-constrained search is not an error: the optimizer
/// returns `None` for it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("Invalid physical parameters: {0}")]
    InvalidPhysicalParameters(String),

    #[error("Invalid sample size: {0} trials requested, at least 1 required")]
    InvalidSampleSize(usize),

    #[error("Configuration out of range: {param} = {value} ({reason})")]
    ConfigurationOutOfRange {
        param: String,
        value: f64,
        reason: String,
    },
}

impl ModelError {
    pub(crate) fn out_of_range(param: &str, value: f64, reason: &str) -> Self {
        ModelError::ConfigurationOutOfRange {
            param: param.to_string(),
            value,
            reason: reason.to_string(),
        }
    }
}

pub type ModelResult<T> = Result<T, ModelError>;
