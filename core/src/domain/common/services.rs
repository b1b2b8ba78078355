use std::sync::Arc;

use crate::domain::{
    chart::ports::{ChartRenderer, ChartStore},
    forecast::ports::Forecaster,
};

/// Application service wiring the pipeline ports together.
///
/// Forecasters and the renderer are CPU bound and run on blocking worker
/// threads, hence the `Arc`s.
pub struct Service<SF, HW, CR, CS>
where
    SF: Forecaster,
    HW: Forecaster,
    CR: ChartRenderer,
    CS: ChartStore,
{
    pub(crate) seasonal_forecaster: Arc<SF>,
    pub(crate) smoothing_forecaster: Arc<HW>,
    pub(crate) chart_renderer: Arc<CR>,
    pub(crate) chart_store: CS,
}

impl<SF, HW, CR, CS> Service<SF, HW, CR, CS>
where
    SF: Forecaster,
    HW: Forecaster,
    CR: ChartRenderer,
    CS: ChartStore,
{
    pub fn new(
        seasonal_forecaster: SF,
        smoothing_forecaster: HW,
        chart_renderer: CR,
        chart_store: CS,
    ) -> Self {
        Self {
            seasonal_forecaster: Arc::new(seasonal_forecaster),
            smoothing_forecaster: Arc::new(smoothing_forecaster),
            chart_renderer: Arc::new(chart_renderer),
            chart_store,
        }
    }
}

impl<SF, HW, CR, CS> Clone for Service<SF, HW, CR, CS>
where
    SF: Forecaster,
    HW: Forecaster,
    CR: ChartRenderer,
    CS: ChartStore + Clone,
{
    fn clone(&self) -> Self {
        Self {
            seasonal_forecaster: Arc::clone(&self.seasonal_forecaster),
            smoothing_forecaster: Arc::clone(&self.smoothing_forecaster),
            chart_renderer: Arc::clone(&self.chart_renderer),
            chart_store: self.chart_store.clone(),
        }
    }
}
