//! Shared types for the ACP builder.
//!
//! This crate defines the module contracts (component types and libraries),
//! the project model, compile settings, and the error type used by every
//! pipeline stage.

mod binding;
mod component_type;
mod error;
mod module;
mod project;
mod settings;

pub use binding::{Binding, BindingKind};
pub use component_type::{
    ComponentType, Event, Instance, Looper, MethodCall, MethodWrapper, Parameter,
    PredefinedValue, PropertyType, Restriction, Timing, ValueKind,
};
pub use error::{AcpError, Cause, ErrorKind};
pub use module::{module_dir, module_path, Library, Module, ModuleKind, ModuleMap};
pub use project::{Component, EepromItem, Project, ON_LOOP, ON_START};
pub use settings::{LooperStrategy, Settings};

/// Result type used throughout the ACP builder.
pub type Result<T> = std::result::Result<T, AcpError>;
