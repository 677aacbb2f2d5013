use std::{fmt, sync::Arc};

/// Sink for human-readable progress messages emitted by the executor.
///
/// The executor never writes to a console on its own; whatever should see
/// retry progress is handed in as a `Logger`.
#[derive(Clone)]
pub struct Logger(Arc<dyn Fn(&str) + Send + Sync>);

impl Logger {
    /// Wraps an arbitrary message sink.
    pub fn new<F>(sink: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        Self(Arc::new(sink))
    }

    /// A sink that drops every message.
    pub fn noop() -> Self {
        Self::new(|_| {})
    }

    /// Forwards every message to `tracing` at info level.
    pub fn info() -> Self {
        Self::new(|message| tracing::info!("{message}"))
    }

    pub fn log(&self, message: &str) {
        (self.0)(message)
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::noop()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Logger(..)")
    }
}
