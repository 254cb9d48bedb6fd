pub use crate::ds::{PageId, PageRing};
pub use crate::error::ConfigError;
pub use crate::policy::clock_pro_plus::ClockProPlusCache;
