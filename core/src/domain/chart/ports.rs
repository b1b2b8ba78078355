use std::future::Future;

use bytes::Bytes;

use crate::domain::{
    chart::entities::{ChartFile, ChartName, GeneratedCharts, StoredChart},
    common::entities::app_errors::CoreError,
    consumption::{
        entities::ConsumptionUpload,
        value_objects::{CategoryTotals, DailySeries},
    },
    forecast::entities::ForecastSeries,
};

/// Draws charts as encoded PNG images.
///
/// Rendering is synchronous; callers run it on a blocking thread.
#[cfg_attr(test, mockall::automock)]
pub trait ChartRenderer: Send + Sync + 'static {
    /// Share of each category in the total consumption
    fn render_category_share(&self, totals: &CategoryTotals) -> Result<Vec<u8>, CoreError>;

    /// Daily consumption over the observed calendar
    fn render_daily_series(&self, series: &DailySeries) -> Result<Vec<u8>, CoreError>;

    /// Observed series followed by each forecast
    fn render_forecast(
        &self,
        series: &DailySeries,
        forecasts: &[ForecastSeries],
    ) -> Result<Vec<u8>, CoreError>;
}

/// Port for persisting generated chart images
#[cfg_attr(test, mockall::automock)]
pub trait ChartStore: Send + Sync {
    /// Write a chart so that readers never observe a partial file
    fn save(
        &self,
        name: &ChartName,
        png: Bytes,
    ) -> impl Future<Output = Result<StoredChart, CoreError>> + Send;

    /// Read a chart back, `ChartNotFound` when absent
    fn load(&self, name: &ChartName) -> impl Future<Output = Result<Bytes, CoreError>> + Send;

    /// Remove a chart; removing an absent chart is not an error
    fn remove(&self, name: &ChartName) -> impl Future<Output = Result<(), CoreError>> + Send;

    /// Check that the output location is usable
    fn health_check(&self) -> impl Future<Output = Result<(), CoreError>> + Send;
}

/// Service trait for the chart generation pipeline
#[cfg_attr(test, mockall::automock)]
pub trait ChartService: Send + Sync {
    /// Validate an upload, forecast its daily series and persist the three charts
    fn generate_charts(
        &self,
        upload: ConsumptionUpload,
    ) -> impl Future<Output = Result<GeneratedCharts, CoreError>> + Send;

    /// Fetch a previously generated chart by file name
    fn get_chart(&self, filename: String)
    -> impl Future<Output = Result<ChartFile, CoreError>> + Send;

    fn check_health(&self) -> impl Future<Output = Result<(), CoreError>> + Send;
}
