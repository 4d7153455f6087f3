//! Process start-up shared by every handler binary.

use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

use aps_config::{load_handler_config, HandlerConfig};
use aps_core::error::Result;

/// Install the tracing subscriber and load the handler configuration.
///
/// The returned guard keeps file logging flushing and must outlive every
/// invocation handled by the process.
pub fn bootstrap() -> Result<(HandlerConfig, Option<WorkerGuard>)> {
    let guard = aps_logging::init_subscriber();
    let config = load_handler_config()?;
    info!(
        short_seconds = config.callbacks.short_seconds,
        long_seconds = config.callbacks.long_seconds,
        "handler configuration loaded"
    );
    Ok((config, guard))
}
