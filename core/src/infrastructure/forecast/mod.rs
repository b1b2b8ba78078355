pub mod holt_winters;
mod model;
pub mod sarima;
