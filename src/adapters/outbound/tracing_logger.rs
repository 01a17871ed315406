use crate::domains::logger::{DomainLogger, DynLogger};
use std::sync::Arc;

/// Forwards domain log lines to the `tracing` subscriber installed by the binary.
pub struct TracingLogger;

impl DomainLogger for TracingLogger {
    fn info(&self, msg: &str) {
        tracing::info!(target: "wall_planner", "{}", msg);
    }

    fn warn(&self, msg: &str) {
        tracing::warn!(target: "wall_planner", "{}", msg);
    }

    fn error(&self, msg: &str) {
        tracing::error!(target: "wall_planner", "{}", msg);
    }
}

pub fn init_tracing_logger() -> DynLogger {
    Arc::new(TracingLogger)
}
