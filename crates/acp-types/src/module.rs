use crate::ComponentType;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// A library module: a set of headers exposed to user code.
#[derive(Debug, Clone, Default)]
pub struct Library {
    pub includes: Vec<String>,
}

#[derive(Debug, Clone)]
pub enum ModuleKind {
    ComponentType(ComponentType),
    Library(Library),
}

/// A reusable unit of firmware functionality.
#[derive(Debug, Clone)]
pub struct Module {
    /// Dotted name, e.g. `acp.io.led`.
    pub name: String,
    /// Directory holding the module description and its assets.
    pub directory: PathBuf,
    pub required_modules: Vec<String>,
    /// Headers of platform libraries the module needs (`Servo.h`, ...).
    pub platform_includes: Vec<String>,
    pub kind: ModuleKind,
}

/// Resolved modules keyed by name.
pub type ModuleMap = BTreeMap<String, Module>;

impl Module {
    pub fn new(name: impl Into<String>, directory: impl Into<PathBuf>, kind: ModuleKind) -> Self {
        Self {
            name: name.into(),
            directory: directory.into(),
            required_modules: Vec::new(),
            platform_includes: Vec::new(),
            kind,
        }
    }

    pub fn as_component_type(&self) -> Option<&ComponentType> {
        match &self.kind {
            ModuleKind::ComponentType(ct) => Some(ct),
            ModuleKind::Library(_) => None,
        }
    }

    pub fn as_library(&self) -> Option<&Library> {
        match &self.kind {
            ModuleKind::Library(lib) => Some(lib),
            ModuleKind::ComponentType(_) => None,
        }
    }

    /// Slash-separated path of the module, e.g. `acp/io/led`.
    pub fn include_prefix(&self) -> String {
        module_path(&self.name)
    }

    /// `include/` directory of the module.
    pub fn include_dir(&self) -> PathBuf {
        self.directory.join("include")
    }

    /// `src/` directory of the module.
    pub fn source_dir(&self) -> PathBuf {
        self.directory.join("src")
    }
}

/// Map a dotted module name to its relative slash-separated path.
pub fn module_path(name: &str) -> String {
    name.replace('.', "/")
}

/// Map a dotted module name to its directory below `root`.
pub fn module_dir(root: &Path, name: &str) -> PathBuf {
    name.split('.').fold(root.to_path_buf(), |dir, segment| dir.join(segment))
}
