use crate::config::LoggingConfig;
use crate::domains::logger::{DomainLogger, DynLogger};
use std::sync::Arc;

/// Forwards every message to a primary logger and an optional secondary one.
pub struct MultiLogger {
    primary: DynLogger,
    secondary: Option<DynLogger>,
}

impl MultiLogger {
    pub fn new(primary: DynLogger, secondary: Option<DynLogger>) -> Self {
        Self { primary, secondary }
    }
}

impl DomainLogger for MultiLogger {
    fn info(&self, msg: &str) {
        self.primary.info(msg);
        if let Some(sec) = &self.secondary {
            sec.info(msg);
        }
    }

    fn warn(&self, msg: &str) {
        self.primary.warn(msg);
        if let Some(sec) = &self.secondary {
            sec.warn(msg);
        }
    }

    fn error(&self, msg: &str) {
        self.primary.error(msg);
        if let Some(sec) = &self.secondary {
            sec.error(msg);
        }
    }
}

/// Build the application logger: `tracing` always, plus a file when configured.
/// A file logger that cannot be initialized degrades to `tracing` only.
pub fn init_domain_logger(config: &LoggingConfig) -> DynLogger {
    let tracing_logger = super::init_tracing_logger();
    let Some(path) = config.file.as_deref() else {
        return tracing_logger;
    };
    match super::init_file_logger(path, &config.level) {
        Ok(file_logger) => Arc::new(MultiLogger::new(tracing_logger, Some(file_logger))),
        Err(e) => {
            tracing_logger.warn(&format!("File logging disabled: {}", e));
            tracing_logger
        }
    }
}
