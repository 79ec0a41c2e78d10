//! Evaluation configuration

use crate::error::{Error, Result};

/// Environment variable that enables ("1"/"true") or disables ("0"/"false")
/// parallel evaluation
pub const ENV_PARALLEL: &str = "SPEXPR_PARALLEL";

/// Environment variable holding the minimum number of work items per task
pub const ENV_MIN_LEN: &str = "SPEXPR_MIN_LEN";

const DEFAULT_MIN_LEN: usize = 4;

/// Controls how sinks schedule work
///
/// A work item is one (batch, outer segment) of a sparsity pattern, or one
/// (batch, column) of a dense walk.
///
/// # Example
///
/// ```
/// use spexpr::eval::EvalConfig;
///
/// let config = EvalConfig::default().with_min_len(64);
/// assert_eq!(config.min_len(), 64);
/// assert!(!EvalConfig::sequential().parallel());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvalConfig {
    parallel: bool,
    min_len: usize,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            parallel: cfg!(feature = "rayon"),
            min_len: DEFAULT_MIN_LEN,
        }
    }
}

impl EvalConfig {
    /// Configuration that evaluates on the calling thread only
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }

    /// Read overrides from `SPEXPR_PARALLEL` and `SPEXPR_MIN_LEN`
    ///
    /// Unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if a variable is set to an unparsable value.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(value) = lookup(ENV_PARALLEL) {
            let parallel = match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "on" => true,
                "0" | "false" | "off" => false,
                other => {
                    return Err(Error::invalid_argument(
                        ENV_PARALLEL,
                        format!("expected a boolean, got '{}'", other),
                    ));
                }
            };
            config = config.with_parallel(parallel);
        }
        if let Some(value) = lookup(ENV_MIN_LEN) {
            let min_len = value.trim().parse::<usize>().map_err(|e| {
                Error::invalid_argument(ENV_MIN_LEN, format!("'{}': {}", value, e))
            })?;
            config = config.with_min_len(min_len);
        }
        Ok(config)
    }

    /// Enable or disable parallel evaluation
    ///
    /// Has no effect without the `rayon` feature.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel && cfg!(feature = "rayon");
        self
    }

    /// Minimum number of work items per parallel task (at least 1)
    pub fn with_min_len(mut self, min_len: usize) -> Self {
        self.min_len = min_len.max(1);
        self
    }

    /// Whether sinks evaluate in parallel
    pub fn parallel(&self) -> bool {
        self.parallel
    }

    /// Minimum number of work items per parallel task
    pub fn min_len(&self) -> usize {
        self.min_len
    }
}
