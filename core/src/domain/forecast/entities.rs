use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ForecastMethod {
    Sarima,
    HoltWinters,
}

impl ForecastMethod {
    /// Legend label used on the prediction chart
    pub fn label(&self) -> &'static str {
        match self {
            ForecastMethod::Sarima => "Predicción SARIMA",
            ForecastMethod::HoltWinters => "Predicción Holt-Winters",
        }
    }
}

impl fmt::Display for ForecastMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ForecastMethod::Sarima => write!(f, "SARIMA"),
            ForecastMethod::HoltWinters => write!(f, "Holt-Winters"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Point forecasts for consecutive days following the observed series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ForecastSeries {
    pub method: ForecastMethod,
    pub points: Vec<ForecastPoint>,
}

impl ForecastSeries {
    pub fn new(method: ForecastMethod, dates: Vec<NaiveDate>, values: Vec<f64>) -> Self {
        let points = dates
            .into_iter()
            .zip(values)
            .map(|(date, value)| ForecastPoint { date, value })
            .collect();

        Self { method, points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.value)
    }
}
