pub mod battery;

pub use battery::{SysfsBattery, POWER_SUPPLY_ROOT};
