//! Structured logging for the HeightfieldTesselator designer.
//!
//! Sets up filterable logging via the `tracing` ecosystem: console output with
//! uptime stamps and module paths, plus a JSON log file in debug builds. Events
//! from the `log` facade used by `hft-config` are bridged into the same
//! subscriber. The level comes from `RUST_LOG`, else from the designer settings.

use std::fs::File;
use std::path::Path;

use hft_config::Settings;
use tracing::Subscriber;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "info";
const LOG_FILE: &str = "hft-designer.log";

/// Initialize the global tracing subscriber.
///
/// * `log_dir` - Directory for the JSON log file (debug builds only)
/// * `debug_build` - Whether to also log to a file
/// * `settings` - Optional settings supplying the log level
///
/// ```no_run
/// use hft_config::Settings;
/// use hft_log::init_logging;
///
/// let settings = Settings::default();
/// init_logging(None, false, Some(&settings));
/// ```
pub fn init_logging(log_dir: Option<&Path>, debug_build: bool, settings: Option<&Settings>) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(settings)));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    if debug_build
        && let Some(log_dir) = log_dir
        && std::fs::create_dir_all(log_dir).is_ok()
        && let Ok(log_file) = File::create(log_dir.join(LOG_FILE))
    {
        subscriber.with(json_file_layer(log_file)).init();
        return;
    }

    subscriber.init();
}

/// Filter directives from settings, falling back to `info`.
pub fn filter_directives(settings: Option<&Settings>) -> String {
    settings
        .map(|s| s.log_level.trim())
        .filter(|level| !level.is_empty())
        .unwrap_or(DEFAULT_FILTER)
        .to_string()
}

/// Create an `EnvFilter` with the default filter string.
pub fn default_env_filter() -> EnvFilter {
    EnvFilter::new(DEFAULT_FILTER)
}

/// One JSON object per event, no ANSI codes.
fn json_file_layer<S>(file: File) -> impl Layer<S> + Send + Sync + 'static
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_target(true)
        .with_timer(fmt::time::uptime())
        .json()
}
