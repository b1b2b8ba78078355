use thiserror::Error;

use crate::domain::forecast::entities::ForecastMethod;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ForecastError {
    #[error("{method} needs at least {required} daily observations, got {actual}")]
    InsufficientData {
        method: ForecastMethod,
        required: usize,
        actual: usize,
    },

    #[error("{method} could not be fitted: {reason}")]
    NonConvergence {
        method: ForecastMethod,
        reason: String,
    },

    #[error("{method} produced a degenerate fit: {reason}")]
    Degenerate {
        method: ForecastMethod,
        reason: String,
    },
}
