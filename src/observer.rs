//! Query timing hook
//!
//! Repositories report the duration of each read to an injected observer
//! rather than logging it inline. The default observer emits a tracing event.

use std::fmt;
use std::time::Duration;

/// Receives the outcome of every read-style repository operation
pub trait QueryObserver: Send + Sync + fmt::Debug {
    fn query_finished(&self, operation: &'static str, elapsed: Duration, returned: usize);
}

/// Emits one debug event per query
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl QueryObserver for TracingObserver {
    fn query_finished(&self, operation: &'static str, elapsed: Duration, returned: usize) {
        tracing::debug!(
            operation,
            elapsed_ms = elapsed.as_secs_f64() * 1000.0,
            returned,
            "query finished"
        );
    }
}
