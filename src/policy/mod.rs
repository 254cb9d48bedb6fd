pub mod clock_pro_plus;

pub use clock_pro_plus::ClockProPlusCache;
