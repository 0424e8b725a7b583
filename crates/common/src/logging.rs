//! Logging configuration for InfraForge components.
//!
//! Provides centralized tracing setup with:
//! - Structured console output with timestamps
//! - Optional file logging with daily rotation under the temp directory
//! - Environment variable support (`RUST_LOG`)
//! - Default INFO level when nothing is configured

use eyre::Result;
use std::{env, fs, path::PathBuf, sync::Once};
use tracing::Level;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan, time::LocalTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

/// Initialize tracing for an InfraForge component.
///
/// Sets up a console layer (with HTTP client/server internals capped at warn
/// to keep request logs readable) and, when `enable_file_logging` is set, a
/// daily-rotated file layer under `$TMPDIR/infraforge-logs/<component>`.
/// `RUST_LOG` controls levels; the default is `info`.
///
/// # Arguments
/// * `component_name` - Name of the component (e.g., "infraforge", "infraforge-server")
/// * `enable_file_logging` - Whether to also write logs to a rolling file
pub fn init_logging(component_name: &str, enable_file_logging: bool) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    let console_layer = fmt::layer()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_timer(LocalTime::rfc_3339())
        .with_ansi(true);

    if enable_file_logging {
        let log_dir = create_log_directory(component_name)?;

        let file_appender = rolling::daily(&log_dir, format!("{component_name}.log"));
        let (non_blocking_appender, guard) = non_blocking(file_appender);

        // The guard flushes buffered records on drop; it must live as long
        // as the process.
        std::mem::forget(guard);

        let file_layer = fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_span_events(FmtSpan::CLOSE)
            .with_timer(LocalTime::rfc_3339())
            .with_ansi(false)
            .with_writer(non_blocking_appender);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(console_layer.with_filter(console_filter()))
            .with(file_layer)
            .try_init()
            .map_err(|e| eyre::eyre!("Failed to initialize tracing subscriber: {}", e))?;

        tracing::info!(
            component = component_name,
            log_dir = %log_dir.display(),
            "Logging initialized with console and file output"
        );
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(console_layer.with_filter(console_filter()))
            .try_init()
            .map_err(|e| eyre::eyre!("Failed to initialize tracing subscriber: {}", e))?;

        tracing::info!(component = component_name, "Logging initialized with console output only");
    }

    let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing::debug!(component = component_name, rust_log = %rust_log, "Environment information");

    Ok(())
}

/// Create the component's log directory in the system temp folder.
fn create_log_directory(component_name: &str) -> Result<PathBuf> {
    let log_dir = env::temp_dir().join("infraforge-logs").join(component_name);
    fs::create_dir_all(&log_dir)?;
    Ok(log_dir)
}

/// Console filter that silences chatty HTTP internals.
fn console_filter() -> EnvFilter {
    EnvFilter::from_default_env()
        .add_directive("tower_http=warn".parse().expect("static directive"))
        .add_directive("hyper=warn".parse().expect("static directive"))
        .add_directive("reqwest=warn".parse().expect("static directive"))
}

/// Initialize plain console-only logging without the fancy formatting.
///
/// Useful for tests and small utilities.
pub fn init_simple_logging(level: Level) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level.as_str()))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|e| eyre::eyre!("Failed to initialize simple logging: {}", e))?;

    Ok(())
}

// Global test logging initialization - ensures logging is only set up once
// across all tests in a process.
static TEST_LOGGING_INIT: Once = Once::new();

/// Safe logging initialization for tests.
///
/// Can be called from any test, any number of times; the first call wins and
/// later calls are no-ops. Respects `RUST_LOG`, defaulting to INFO.
pub fn ensure_test_logging(default_level: Option<Level>) {
    TEST_LOGGING_INIT.call_once(|| {
        let default_level = default_level.unwrap_or(Level::INFO);
        // Errors here mean a subscriber is already installed, which is fine
        // for tests.
        let _ = init_simple_logging(default_level);
    });
}
