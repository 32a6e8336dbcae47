//! Logging setup
//!
//! Built on `tracing` and `tracing-subscriber`, with one log target per
//! engine component (`ryo::engine`, `ryo::accessor`, ...).
//!
//! # Example
//! ```ignore
//! use ryo::config::{Config, init};
//! use ryo::logger::init_logger;
//!
//! init(Config::default()).unwrap();
//! init_logger();
//! ```

use std::io;
use std::path::Path;

use ryo_config::Component;
use tracing_subscriber::{
    filter::Targets, fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer,
};

use crate::config;

/// Log output format
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Colored, multi-line (development)
    #[default]
    Pretty,
    /// Single line
    Compact,
    /// JSON lines (tool integration)
    Json,
}

/// Initialize logging with the default format
pub fn init_logger() {
    init_with_format(LogFormat::default());
}

/// Initialize logging with the given format
pub fn init_with_format(format: LogFormat) {
    let layer = create_format_layer(format, io::stdout).with_filter(targets());
    let _ = tracing_subscriber::registry().with(layer).try_init();
}

/// Initialize logging to stdout and to a file
///
/// The file is opened in append mode and created if missing.
pub fn init_with_file<P: AsRef<Path>>(format: LogFormat, path: P) -> io::Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;

    let targets = targets();
    let stdout_layer = create_format_layer(format, io::stdout).with_filter(targets.clone());
    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_writer(std::sync::Mutex::new(file))
        .with_filter(targets);

    let _ = tracing_subscriber::registry()
        .with(stdout_layer)
        .with(file_layer)
        .try_init();
    Ok(())
}

/// Per-component filter built from the global configuration
fn targets() -> Targets {
    let cfg = &config::config().log;
    Component::ALL
        .into_iter()
        .fold(Targets::new().with_default(cfg.global), |targets, component| {
            targets.with_target(component.target(), cfg.level_for(component))
        })
}

/// Build the formatter layer for `format`
fn create_format_layer<W, F>(
    format: LogFormat,
    make_writer: F,
) -> Box<dyn Layer<tracing_subscriber::Registry> + Send + Sync>
where
    W: io::Write + 'static,
    F: Fn() -> W + Send + Sync + 'static,
{
    match format {
        LogFormat::Pretty => fmt::layer()
            .pretty()
            .with_target(true)
            .with_writer(make_writer)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_target(false)
            .without_time()
            .with_writer(make_writer)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(true)
            .with_writer(make_writer)
            .boxed(),
    }
}

/// Check whether debug events of a component are enabled
#[inline]
pub fn is_enabled(component: Component) -> bool {
    // `enabled!` needs a constant target per call site
    macro_rules! enabled {
        ($($variant:ident),+ $(,)?) => {
            match component {
                $(Component::$variant => {
                    const TARGET: &str = Component::$variant.target();
                    tracing::enabled!(target: TARGET, tracing::Level::DEBUG)
                })+
            }
        };
    }
    enabled!(Engine, Accessor, Builder, Enumerable, Reflect)
}
