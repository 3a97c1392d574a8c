//! ACP code synthesis: turns a validated project into a C++ library.
//!
//! # Architecture
//!
//! Generation runs as a [`Pipeline`] of [`ContentGenerator`]s. Each generator
//! first *prepares* its template values, then *generates* files from them.
//! All prepare steps finish before any generate step starts, and the order
//! among generators follows their declared dependencies.
//!
//! ## Generated library
//! - `src/<library>.h`: views, library includes, EEPROM item externs
//! - `src/acp/core.h`: runtime header with the debug switch
//! - `src/acp/eeprom_vars.h`, `src/sources/eeprom_vars.cpp`: EEPROM
//!   wrappers (only when EEPROM is used)
//! - `src/sources/core.cpp`: controllers, bindings, loopers, `setup()`,
//!   `loop()`
//! - `examples/<library>Skeleton/<library>Skeleton.ino`
//! - `library.properties`
//!
//! ## Shared state
//!
//! The project code generator publishes EEPROM usage, EEPROM externs and
//! autogenerated component properties in [`SharedState`]; the header,
//! EEPROM and example generators depend on it and read them.

pub mod context;
pub mod eeprom;
pub mod error;
pub mod generators;
pub mod instance;
pub mod order;
pub mod pipeline;
pub mod template;

pub use acp_types::{AcpError, Result};
pub use context::{GenerationContext, SharedState, PRIVATE_NAMESPACE};
pub use error::{CycleError, OutputError};
pub use generators::standard_pipeline;
pub use pipeline::{Artifacts, ContentGenerator, GeneratorId, Output, Pipeline};
