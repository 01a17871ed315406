use crate::domains::logger::{DomainLogger, DynLogger};
use std::sync::Arc;

/// Sink for services wired without an observable log, mostly test fixtures.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLogger;

impl DomainLogger for NoopLogger {
    fn info(&self, _: &str) {}

    fn warn(&self, _: &str) {}

    fn error(&self, _: &str) {}
}

pub fn init_noop_logger() -> DynLogger {
    Arc::new(NoopLogger)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_handle_accepts_every_level() {
        let logger = init_noop_logger();
        let shared = Arc::clone(&logger);
        shared.info("plan created");
        shared.warn("no points");
        logger.error("store down");
        assert_eq!(Arc::strong_count(&logger), 2);
    }
}
