use anofox_forecast::models::arima::SARIMA;

use crate::{
    domain::{
        consumption::value_objects::DailySeries,
        forecast::{
            entities::{ForecastMethod, ForecastSeries},
            errors::ForecastError,
            ports::Forecaster,
            value_objects::SarimaSpec,
        },
    },
    infrastructure::forecast::model,
};

const METHOD: ForecastMethod = ForecastMethod::Sarima;

/// Seasonal ARIMA, refitted on every call
#[derive(Debug, Clone, Default)]
pub struct SarimaForecaster {
    spec: SarimaSpec,
}

impl SarimaForecaster {
    fn model(&self) -> SARIMA {
        let SarimaSpec { order, seasonal } = self.spec;
        SARIMA::new(
            order.p,
            order.d,
            order.q,
            seasonal.p,
            seasonal.d,
            seasonal.q,
            seasonal.period,
        )
    }
}

impl Forecaster for SarimaForecaster {
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

        let mut model = self.model();
        model::fit(METHOD, &mut model, series)?;
        model::predict(METHOD, &mut model, series, horizon)
    }
}
