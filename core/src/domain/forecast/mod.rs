pub mod entities;
pub mod errors;
pub mod ports;
pub mod value_objects;

/// Number of days forecast ahead of the last observation
pub const FORECAST_HORIZON: usize = 30;

/// Weekly seasonality of daily consumption
pub const WEEKLY_PERIOD: usize = 7;
