//! Error types for the clockkit library.
//!
//! ## Key Components
//!
//! - [`ConfigError`]: Returned when cache configuration parameters are invalid
//!   (capacity below the supported minimum, out-of-range cold ratio).
//!
//! Runtime operations never fail: the cache is an in-memory structure, and the
//! loader entry point surfaces the caller's fetch error verbatim instead of
//! wrapping it. Construction is the only fallible step owned by this crate.
//!
//! ## Example Usage
//!
//! ```
//! use clockkit::error::ConfigError;
//! use clockkit::policy::clock_pro_plus::ClockProPlusCache;
//!
//! // Fallible constructor for user-configurable parameters
//! let cache = ClockProPlusCache::<String, i32>::new(100);
//! assert!(cache.is_ok());
//!
//! // An invalid capacity is caught without panicking, and the kind is matchable
//! let err = ClockProPlusCache::<String, i32>::new(1).unwrap_err();
//! assert!(matches!(err, ConfigError::InvalidCapacity { requested: 1 }));
//! ```

use std::fmt;

use crate::policy::clock_pro_plus::MINIMUM_CAPACITY;

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error returned when cache configuration parameters are invalid.
///
/// Produced by fallible constructors such as
/// [`ClockProPlusCache::new`](crate::policy::clock_pro_plus::ClockProPlusCache::new)
/// and
/// [`ClockProPlusCache::try_with_cold_ratio`](crate::policy::clock_pro_plus::ClockProPlusCache::try_with_cold_ratio).
/// Variants identify which parameter failed validation and carry the rejected
/// value, so callers can match on the failure kind.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The requested capacity is below the minimum needed to hold both a hot
    /// and a cold page.
    InvalidCapacity {
        /// The capacity the caller asked for.
        requested: usize,
    },
    /// The requested initial cold fraction falls outside `(0.0, 0.5]`.
    InvalidColdRatio {
        /// The ratio the caller asked for.
        requested: f64,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCapacity { requested } => write!(
                f,
                "invalid capacity: must be >={MINIMUM_CAPACITY} but {requested} was requested"
            ),
            Self::InvalidColdRatio { requested } => write!(
                f,
                "invalid cold ratio: must be within (0.0, 0.5] but {requested} was requested"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
