use anofox_forecast::models::exponential::{HoltWinters, SeasonalType};
use tracing::debug;

use crate::{
    domain::{
        consumption::value_objects::DailySeries,
        forecast::{
            entities::{ForecastMethod, ForecastSeries},
            errors::ForecastError,
            ports::Forecaster,
            value_objects::HoltWintersSpec,
        },
    },
    infrastructure::forecast::model,
};

const METHOD: ForecastMethod = ForecastMethod::HoltWinters;

/// Holt-Winters exponential smoothing with additive trend and additive
/// seasonality. Smoothing weights are optimised on every call.
#[derive(Debug, Clone, Default)]
pub struct HoltWintersForecaster {
    spec: HoltWintersSpec,
}

impl Forecaster for HoltWintersForecaster {
    fn method(&self) -> ForecastMethod {
        METHOD
    }

    fn forecast(
        &self,
        series: &DailySeries,
        horizon: usize,
    ) -> Result<ForecastSeries, ForecastError> {
        let required = self.spec.min_observations();
        if series.len() < required {
            return Err(ForecastError::InsufficientData {
                method: METHOD,
                required,
                actual: series.len(),
            });
        }

        let mut model = HoltWinters::auto(self.spec.seasonal_period, SeasonalType::Additive);
        model::fit(METHOD, &mut model, series)?;
        debug!(
            alpha = ?model.alpha(),
            beta = ?model.beta(),
            gamma = ?model.gamma(),
            "Holt-Winters smoothing weights"
        );

        model::predict(METHOD, &mut model, series, horizon)
    }
}
