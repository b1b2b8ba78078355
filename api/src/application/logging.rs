use tracing_subscriber::EnvFilter;

use crate::args::LogArgs;

/// Installs the global subscriber. Falls back to `info` when the filter
/// directive does not parse.
pub fn init_logging(args: &LogArgs) {
    let filter = EnvFilter::try_new(&args.filter).unwrap_or_else(|_| EnvFilter::new("info"));

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
