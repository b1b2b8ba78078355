use crate::domain::{
    consumption::value_objects::DailySeries,
    forecast::{
        entities::{ForecastMethod, ForecastSeries},
        errors::ForecastError,
    },
};

/// A univariate model fitted on the daily series at call time.
///
/// Implementations are CPU bound and synchronous; callers run them on a
/// blocking thread.
#[cfg_attr(test, mockall::automock)]
pub trait Forecaster: Send + Sync + 'static {
    fn method(&self) -> ForecastMethod;

    /// Fit on `series` and predict the `horizon` days after its last date
    fn forecast(
        &self,
        series: &DailySeries,
        horizon: usize,
    ) -> Result<ForecastSeries, ForecastError>;
}
