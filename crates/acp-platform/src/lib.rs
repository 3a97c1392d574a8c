//! Target platforms for the ACP builder.
//!
//! A platform is a plain capability record (pin, interrupt and serial counts,
//! maximum watchdog level) looked up by name in a [`PlatformRegistry`]. Type
//! sizes, value checks and literal rendering are one shared rule set
//! parameterized by that record.

mod registry;
pub mod rules;
mod value_type;

pub use registry::{Platform, PlatformRegistry, DEFAULT_PLATFORM};
pub use value_type::{Suffix, ValueType};
