//! Environment sources

use std::collections::HashMap;
use std::hash::BuildHasher;

/// Read-only source of environment variables.
///
/// Lookups report presence, not content: `Some("")` means the variable is set to
/// an empty value, which is different from `None`.
pub trait Env {
    /// Look up a variable, returning `None` when it is not set
    fn lookup(&self, key: &str) -> Option<String>;

    /// Whether the variable is set (to any value, including empty)
    fn is_set(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }
}

/// The process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl Env for ProcessEnv {
    fn lookup(&self, key: &str) -> Option<String> {
        // Non-UTF-8 values still count as set
        std::env::var_os(key).map(|value| value.to_string_lossy().into_owned())
    }
}

impl<S: BuildHasher> Env for HashMap<String, String, S> {
    fn lookup(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl<E: Env + ?Sized> Env for &E {
    fn lookup(&self, key: &str) -> Option<String> {
        (**self).lookup(key)
    }
}
