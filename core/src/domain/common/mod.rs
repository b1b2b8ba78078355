use std::path::PathBuf;

use chrono::{DateTime, Utc};
use uuid::{NoContext, Timestamp, Uuid};

pub mod entities;
pub mod services;

#[derive(Clone, Debug)]
pub struct FoodcastConfig {
    pub storage: StorageConfig,
    pub chart: ChartConfig,
}

#[derive(Clone, Debug)]
pub struct StorageConfig {
    /// Directory receiving the generated PNG files
    pub output_dir: PathBuf,
}

#[derive(Clone, Debug, Default)]
pub struct ChartConfig {
    /// TrueType font used for titles, labels and legends.
    /// When unset, the bundled DejaVu Sans is used.
    pub font_path: Option<PathBuf>,
}

pub fn generate_timestamp() -> (DateTime<Utc>, Timestamp) {
    let now = Utc::now();
    let seconds = now.timestamp().try_into().unwrap_or(0);
    let nanos = now.timestamp_subsec_nanos();
    let timestamp = Timestamp::from_unix(NoContext, seconds, nanos);

    (now, timestamp)
}

pub fn generate_uuid_v7() -> Uuid {
    let (_, timestamp) = generate_timestamp();
    Uuid::new_v7(timestamp)
}
