//! Metrics instrumentation
//!
//! Thin wrappers over the `metrics` facade. Nothing is exported unless the host
//! process installs a recorder; without one every call is a no-op.
//!
//! * `counters` - event counts (queries, failures, trust profile registrations)
//! * `histograms` - durations
//! * `labels` - label keys and fixed label values

pub mod counters;
pub mod histograms;
pub mod labels;
