pub mod download_chart;
pub mod generate_charts;
