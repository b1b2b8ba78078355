use anofox_forecast::{core::TimeSeries, models::Forecaster as FittedModel};
use chrono::{NaiveTime, TimeZone, Utc};
use tracing::debug;

use crate::domain::{
    consumption::value_objects::DailySeries,
    forecast::{
        entities::{ForecastMethod, ForecastSeries},
        errors::ForecastError,
    },
};

/// The daily series as a library time series, one timestamp per midnight UTC
pub(crate) fn time_series(
    method: ForecastMethod,
    series: &DailySeries,
) -> Result<TimeSeries, ForecastError> {
    let timestamps = series
        .points()
        .map(|(date, _)| Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)))
        .collect();

    TimeSeries::univariate(timestamps, series.values.clone()).map_err(|e| {
        ForecastError::Degenerate {
            method,
            reason: format!("cannot build time series: {e}"),
        }
    })
}

pub(crate) fn fit<M: FittedModel>(
    method: ForecastMethod,
    model: &mut M,
    series: &DailySeries,
) -> Result<(), ForecastError> {
    let ts = time_series(method, series)?;
    model
        .fit(&ts)
        .map_err(|e| ForecastError::NonConvergence {
            method,
            reason: e.to_string(),
        })?;

    debug!(%method, observations = series.len(), "Model fitted");
    Ok(())
}

pub(crate) fn predict<M: FittedModel>(
    method: ForecastMethod,
    model: &mut M,
    series: &DailySeries,
    horizon: usize,
) -> Result<ForecastSeries, ForecastError> {
    let forecast = model
        .predict(horizon)
        .map_err(|e| ForecastError::Degenerate {
            method,
            reason: format!("prediction failed: {e}"),
        })?;

    forecast_series(method, series, horizon, forecast.primary().to_vec())
}

/// Dates the predicted values on the days after the series.
/// Exactly `horizon` finite values are accepted.
fn forecast_series(
    method: ForecastMethod,
    series: &DailySeries,
    horizon: usize,
    values: Vec<f64>,
) -> Result<ForecastSeries, ForecastError> {
    if values.len() != horizon {
        return Err(ForecastError::Degenerate {
            method,
            reason: format!("expected {horizon} predictions, got {}", values.len()),
        });
    }
    if let Some(step) = values.iter().position(|v| !v.is_finite()) {
        return Err(ForecastError::Degenerate {
            method,
            reason: format!("non-finite prediction at step {}", step + 1),
        });
    }

    Ok(ForecastSeries::new(method, series.future_dates(horizon), values))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn series(len: usize) -> DailySeries {
        DailySeries {
            start: NaiveDate::from_ymd_opt(2024, 2, 20).unwrap(),
            values: (0..len).map(|t| 10.0 + t as f64).collect(),
        }
    }

    #[test]
    fn test_time_series_keeps_every_day() {
        let ts = time_series(ForecastMethod::Sarima, &series(21)).unwrap();
        assert_eq!(ts.len(), 21);
    }

    #[test]
    fn test_forecast_is_dated_after_last_observation() {
        let input = series(10);
        let forecast =
            forecast_series(ForecastMethod::HoltWinters, &input, 3, vec![1.0, 2.0, 3.0]).unwrap();

        assert_eq!(forecast.method, ForecastMethod::HoltWinters);
        let dates: Vec<NaiveDate> = forecast.points.iter().map(|p| p.date).collect();
        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
                NaiveDate::from_ymd_opt(2024, 3, 3).unwrap(),
            ]
        );
    }

    #[test]
    fn test_non_finite_prediction_is_degenerate() {
        let err = forecast_series(ForecastMethod::Sarima, &series(10), 3, vec![1.0, f64::NAN, 3.0])
            .unwrap_err();
        assert_eq!(
            err,
            ForecastError::Degenerate {
                method: ForecastMethod::Sarima,
                reason: "non-finite prediction at step 2".to_string(),
            }
        );
    }

    #[test]
    fn test_short_prediction_is_degenerate() {
        let err = forecast_series(ForecastMethod::Sarima, &series(10), 30, vec![1.0; 29])
            .unwrap_err();
        assert!(matches!(err, ForecastError::Degenerate { .. }), "{err:?}");
    }
}
