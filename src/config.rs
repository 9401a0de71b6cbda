use std::time::Duration;

use crate::session::Algorithm;

/// Alias of the collection whose password is changed by default.
pub const DEFAULT_ALIAS: &str = "default";

/// Longest timeout libdbus accepts; it treats this value as "wait forever".
pub const MAX_TIMEOUT: Duration = Duration::from_millis(i32::MAX as u64);

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    pub alias: String,
    pub algorithm: Algorithm,
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            alias: DEFAULT_ALIAS.to_string(),
            algorithm: Algorithm::default(),
            timeout: MAX_TIMEOUT,
        }
    }
}

impl Config {
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = alias.into();
        self
    }

    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }
}
