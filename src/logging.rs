//! File-based tracing setup. The terminal belongs to the TUI, so log output
//! goes to a rolling file under `~/.quack/logs`.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Keeps the non-blocking writer alive for the lifetime of the process.
pub struct LoggingGuard {
    _guard: WorkerGuard,
}

/// Initializes the rolling file subscriber. Returns `None` when no writable
/// log directory exists or a subscriber is already installed.
pub fn init() -> Option<LoggingGuard> {
    let log_dir = crate::config::log_dir()
        .ok()
        .and_then(|dir| std::fs::create_dir_all(&dir).ok().map(|_| dir))
        .or_else(|| {
            let dir = std::env::temp_dir().join("quack").join("logs");
            std::fs::create_dir_all(&dir).ok().map(|_| dir)
        })?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, "quack.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("quack=info"));

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true),
    );

    if subscriber.try_init().is_err() {
        return None;
    }

    std::panic::set_hook(Box::new(|panic_info| {
        tracing::error!(panic = %panic_info, "panic");
    }));

    tracing::info!(log_dir = %log_dir.display(), "tracing initialized");

    Some(LoggingGuard { _guard: guard })
}
