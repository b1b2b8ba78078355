pub mod chart;
pub mod health;
pub mod server;
