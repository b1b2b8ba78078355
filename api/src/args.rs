use std::path::PathBuf;

use clap::{ArgAction, Parser};
use foodcast_core::domain::common::{ChartConfig, FoodcastConfig, StorageConfig};

const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

#[derive(Debug, Clone, Parser)]
#[command(name = "foodcast-api", version, about = "Food consumption charts and forecasts")]
pub struct Args {
    #[command(flatten)]
    pub server: ServerArgs,

    #[command(flatten)]
    pub storage: StorageArgs,

    #[command(flatten)]
    pub chart: ChartArgs,

    #[command(flatten)]
    pub log: LogArgs,
}

#[derive(Debug, Clone, clap::Args)]
pub struct ServerArgs {
    #[arg(long, env = "SERVER_HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "SERVER_PORT", default_value_t = 8000)]
    pub port: u16,

    /// Prefix prepended to every route, e.g. `/api`
    #[arg(long, env = "SERVER_ROOT_PATH", default_value = "")]
    pub root_path: String,

    #[arg(
        long,
        env = "ALLOWED_ORIGINS",
        value_delimiter = ',',
        default_value = "http://localhost:3000"
    )]
    pub allowed_origins: Vec<String>,

    #[arg(long, env = "MAX_UPLOAD_BYTES", default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    pub max_upload_bytes: usize,

    #[arg(long, env = "METRICS_ENABLED", default_value_t = true, action = ArgAction::Set)]
    pub metrics_enabled: bool,
}

#[derive(Debug, Clone, clap::Args)]
pub struct StorageArgs {
    /// Directory receiving generated charts
    #[arg(long, env = "GRAPH_OUTPUT_DIR", default_value = "./generated_graphs")]
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone, clap::Args)]
pub struct ChartArgs {
    /// TrueType font for chart text; the bundled DejaVu Sans is used when unset
    #[arg(long, env = "CHART_FONT_PATH")]
    pub font_path: Option<PathBuf>,
}

#[derive(Debug, Clone, clap::Args)]
pub struct LogArgs {
    #[arg(long = "log-filter", env = "RUST_LOG", default_value = "info")]
    pub filter: String,

    #[arg(long = "log-json", env = "LOG_JSON", default_value_t = false, action = ArgAction::Set)]
    pub json: bool,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            server: ServerArgs {
                host: "0.0.0.0".to_string(),
                port: 8000,
                root_path: String::new(),
                allowed_origins: vec!["http://localhost:3000".to_string()],
                max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
                metrics_enabled: true,
            },
            storage: StorageArgs {
                output_dir: PathBuf::from("./generated_graphs"),
            },
            chart: ChartArgs { font_path: None },
            log: LogArgs {
                filter: "info".to_string(),
                json: false,
            },
        }
    }
}

impl From<Args> for FoodcastConfig {
    fn from(args: Args) -> Self {
        FoodcastConfig {
            storage: StorageConfig {
                output_dir: args.storage.output_dir,
            },
            chart: ChartConfig {
                font_path: args.chart.font_path,
            },
        }
    }
}
