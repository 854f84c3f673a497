use std::{fmt, path::PathBuf, sync::Arc};

use anyhow::Result;
use serde_json::Value;
use shared_logging::{JsonLogger, LogLevel, LogRecord, LogSink};

/// Builder for solver telemetry sinks.
pub struct SolverTelemetryBuilder {
    module: String,
    log_path: Option<PathBuf>,
    min_level: LogLevel,
    sinks: Vec<Arc<dyn LogSink>>,
}

impl SolverTelemetryBuilder {
    /// Creates the builder.
    #[must_use]
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            log_path: None,
            min_level: LogLevel::Info,
            sinks: Vec::new(),
        }
    }

    /// Sets the JSON-lines log path.
    #[must_use]
    pub fn log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_path = Some(path.into());
        self
    }

    /// Drops records below `level`.
    #[must_use]
    pub const fn min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    /// Adds an extra sink, such as a [`shared_logging::MemoryLogger`].
    #[must_use]
    pub fn sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Builds the telemetry handle.
    pub fn build(self) -> Result<SolverTelemetry> {
        let mut sinks = self.sinks;
        if let Some(path) = self.log_path {
            sinks.push(Arc::new(JsonLogger::with_min_level(path, self.min_level)?));
        }
        Ok(SolverTelemetry {
            inner: Arc::new(TelemetryInner {
                module: self.module,
                min_level: self.min_level,
                sinks,
            }),
        })
    }
}

/// Telemetry handle shared across solver components.
#[derive(Clone)]
pub struct SolverTelemetry {
    inner: Arc<TelemetryInner>,
}

impl fmt::Debug for SolverTelemetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SolverTelemetry")
            .field("module", &self.inner.module)
            .field("min_level", &self.inner.min_level)
            .field("sinks", &self.inner.sinks.len())
            .finish()
    }
}

struct TelemetryInner {
    module: String,
    min_level: LogLevel,
    sinks: Vec<Arc<dyn LogSink>>,
}

impl SolverTelemetry {
    /// Returns a builder.
    #[must_use]
    pub fn builder(module: impl Into<String>) -> SolverTelemetryBuilder {
        SolverTelemetryBuilder::new(module)
    }

    /// Logs structured metadata to every sink.
    pub fn log(&self, level: LogLevel, message: &str, metadata: Value) -> Result<()> {
        if level < self.inner.min_level || self.inner.sinks.is_empty() {
            return Ok(());
        }
        let mut record = LogRecord::new(&self.inner.module, level, message);
        match metadata {
            Value::Object(obj) => record.metadata = obj,
            Value::Null => {}
            other => record = record.with_field("value", other),
        }
        for sink in &self.inner.sinks {
            sink.write(&record)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shared_logging::MemoryLogger;
    use tempfile::tempdir;

    #[test]
    fn telemetry_writes_file_and_memory() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("solver.log");
        let memory = Arc::new(MemoryLogger::new());
        let telemetry = SolverTelemetry::builder("solver")
            .log_path(&path)
            .sink(memory.clone())
            .build()
            .unwrap();
        telemetry
            .log(LogLevel::Info, "solver.request.received", json!({ "chars": 12 }))
            .unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("solver.request.received"));
        assert_eq!(memory.snapshot()[0].metadata["chars"], 12);
    }

    #[test]
    fn filters_below_min_level() {
        let memory = Arc::new(MemoryLogger::new());
        let telemetry = SolverTelemetry::builder("solver")
            .min_level(LogLevel::Warn)
            .sink(memory.clone())
            .build()
            .unwrap();
        telemetry.log(LogLevel::Info, "quiet", json!({})).unwrap();
        telemetry.log(LogLevel::Warn, "loud", json!({})).unwrap();
        assert_eq!(memory.messages(), vec!["loud".to_string()]);
    }

    #[test]
    fn scalar_metadata_lands_under_value() {
        let memory = Arc::new(MemoryLogger::new());
        let telemetry = SolverTelemetry::builder("solver")
            .sink(memory.clone())
            .build()
            .unwrap();
        telemetry.log(LogLevel::Info, "count", json!(3)).unwrap();
        telemetry.log(LogLevel::Info, "bare", Value::Null).unwrap();
        let records = memory.snapshot();
        assert_eq!(records[0].metadata["value"], 3);
        assert!(records[1].metadata.is_empty());
    }
}
