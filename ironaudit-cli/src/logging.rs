//! Logging initialization for the ironaudit CLI.
//!
//! Configures `tracing-subscriber` from the `[general]` section of
//! `IronauditConfig`, with `--log-level` taking precedence over the file.
//! Logs go to stderr so reports written to stdout stay machine-readable.

use anyhow::Result;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use ironaudit_core::config::GeneralConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Apply the `--log-level` flag on top of the loaded `[general]` section.
///
/// # Errors
///
/// Returns an error if the flag is not one of trace, debug, info, warn, error.
pub fn effective_general(config: &GeneralConfig, log_level: Option<&str>) -> Result<GeneralConfig> {
    let mut general = config.clone();
    if let Some(level) = log_level {
        let level = level.to_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(anyhow::anyhow!(
                "invalid --log-level '{}', expected one of: {}",
                level,
                LOG_LEVELS.join(", ")
            ));
        }
        general.log_level = level;
    }
    Ok(general)
}

/// Initialize the global tracing subscriber.
///
/// Must be called exactly once, before any tracing macros are used.
/// `RUST_LOG` takes precedence over `config.log_level` when set.
///
/// # Formats
///
/// * `"json"` - Machine-parseable JSON lines
/// * `"pretty"` - Human-readable colored output
pub fn init_tracing(config: &GeneralConfig) -> Result<()> {
    let fmt_layer = stderr_layer(&config.log_format)?;
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(env_filter)
        .try_init()
        .map_err(|e| {
            anyhow::anyhow!(
                "failed to initialize {} tracing subscriber: {}",
                config.log_format,
                e
            )
        })
}

fn stderr_layer(log_format: &str) -> Result<Box<dyn Layer<Registry> + Send + Sync>> {
    match log_format {
        "json" => Ok(tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed()),
        "pretty" => Ok(tracing_subscriber::fmt::layer()
            .pretty()
            .with_writer(std::io::stderr)
            .boxed()),
        _ => Err(anyhow::anyhow!(
            "unknown log format '{}', expected 'json' or 'pretty'",
            log_format
        )),
    }
}
