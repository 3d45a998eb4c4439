//! Counter metrics

use super::labels;

/// Configuration was resolved from the environment
pub fn config_resolved(tls: bool) {
    metrics::counter!("mycrud_config_resolved_total", labels::TLS => labels::bool_value(tls))
        .increment(1);
}

/// A trust profile was stored in the registry
pub fn trust_profile_registered(replaced: bool) {
    let outcome = if replaced {
        labels::OUTCOME_REPLACED
    } else {
        labels::OUTCOME_INSERTED
    };
    metrics::counter!("mycrud_trust_profiles_registered_total", labels::OUTCOME => outcome)
        .increment(1);
}

/// A database operation completed successfully
pub fn query_executed(operation: &'static str) {
    metrics::counter!("mycrud_queries_total", labels::OPERATION => operation).increment(1);
}

/// A database operation failed
pub fn query_failed(operation: &'static str, category: &'static str) {
    metrics::counter!(
        "mycrud_query_errors_total",
        labels::OPERATION => operation,
        labels::CATEGORY => category
    )
    .increment(1);
}
