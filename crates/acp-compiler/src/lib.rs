//! ACP compiler: orchestrates the full compilation pipeline.
//!
//! ```text
//! project.json → Project → platform → module closure → component checks
//!              → module file export → generator pipeline → Arduino library
//! ```

pub mod assets;
pub mod compiler;
pub mod description;
pub mod resolver;
pub mod validator;

pub use acp_types::{AcpError, Result, Settings};
pub use compiler::{CompileReport, Compiler};
pub use description::{load_module, load_project, DescriptionError, MODULE_DESCRIPTION_FILE};
pub use resolver::{resolve_modules, FsModuleSource, ModuleSource};
