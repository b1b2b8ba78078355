pub mod chart;
pub mod common;
pub mod consumption;
pub mod forecast;
