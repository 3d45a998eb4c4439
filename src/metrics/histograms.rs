//! Histogram metrics

use super::labels;
use std::time::Duration;

/// Time spent reading and validating trust material
pub fn trust_load_duration(elapsed: Duration) {
    metrics::histogram!("mycrud_trust_load_duration_seconds").record(elapsed.as_secs_f64());
}

/// Time spent in a database operation
pub fn query_duration(operation: &'static str, elapsed: Duration) {
    metrics::histogram!("mycrud_query_duration_seconds", labels::OPERATION => operation)
        .record(elapsed.as_secs_f64());
}
