pub mod chart;
pub mod chart_store;
pub mod forecast;
