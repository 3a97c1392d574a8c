//! Transitive loading of the modules a project references.

use crate::description::{load_module, MODULE_DESCRIPTION_FILE};
use acp_types::{module_dir, AcpError, Module, ModuleMap, Result};
use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Where module descriptions come from.
pub trait ModuleSource {
    /// Load the module requested as `name`.
    fn load(&self, name: &str) -> Result<Module>;
}

/// Modules stored below a root directory, one directory per dotted name
/// segment, each holding a `description.json`.
#[derive(Debug, Clone)]
pub struct FsModuleSource {
    root: PathBuf,
}

impl FsModuleSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ModuleSource for FsModuleSource {
    fn load(&self, name: &str) -> Result<Module> {
        if !name.split('.').all(is_plain_segment) {
            return Err(AcpError::compile(format!("Unavailable module {name}")));
        }
        let directory = module_dir(&self.root, name);
        if !directory.is_dir() {
            return Err(AcpError::compile(format!("Unavailable module {name}")));
        }
        load_module(&directory.join(MODULE_DESCRIPTION_FILE))
    }
}

/// A name segment must stay one directory level below its parent.
fn is_plain_segment(segment: &str) -> bool {
    let mut components = Path::new(segment).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(part)), None) if part == segment
    )
}

/// Load `seeds` and everything they require.
///
/// Each round loads every missing name, then collects the requirements of
/// the newly loaded modules that are not loaded yet. A name is loaded at most
/// once, so cyclic requirements terminate.
pub fn resolve_modules<S: ModuleSource + ?Sized>(source: &S, seeds: &[String]) -> Result<ModuleMap> {
    let mut modules = ModuleMap::new();
    let mut missing: BTreeSet<String> = seeds.iter().map(|s| s.trim().to_string()).collect();

    while !missing.is_empty() {
        let mut loaded = Vec::with_capacity(missing.len());
        for name in std::mem::take(&mut missing) {
            if name.is_empty() {
                return Err(AcpError::compile("Module name cannot be empty."));
            }
            let module = load_checked(source, &name).map_err(|e| {
                AcpError::compile(format!("Invalid description file of module {name}")).caused_by(e)
            })?;
            debug!(module = %name, requires = ?module.required_modules, "resolved module");
            loaded.push(name.clone());
            modules.insert(name, module);
        }

        for name in &loaded {
            for required in &modules[name].required_modules {
                if !modules.contains_key(required) {
                    missing.insert(required.clone());
                }
            }
        }
    }
    Ok(modules)
}

fn load_checked<S: ModuleSource + ?Sized>(source: &S, name: &str) -> Result<Module> {
    let module = source.load(name)?;
    if module.name != name {
        return Err(AcpError::compile(format!(
            "Invalid name of module in module description: {name}"
        )));
    }
    Ok(module)
}

#[cfg(test)]
mod tests {
    use super::*;
    use acp_types::{Library, ModuleKind};
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// In-memory modules that count how often each one is loaded.
    #[derive(Default)]
    struct MemorySource {
        modules: HashMap<String, (String, Vec<String>)>,
        loads: RefCell<Vec<String>>,
    }

    impl MemorySource {
        fn with(mut self, name: &str, declared: &str, requires: &[&str]) -> Self {
            self.modules.insert(
                name.to_string(),
                (
                    declared.to_string(),
                    requires.iter().map(|s| s.to_string()).collect(),
                ),
            );
            self
        }
    }

    impl ModuleSource for MemorySource {
        fn load(&self, name: &str) -> Result<Module> {
            self.loads.borrow_mut().push(name.to_string());
            let (declared, requires) = self
                .modules
                .get(name)
                .ok_or_else(|| AcpError::compile(format!("Unavailable module {name}")))?;
            let mut module = Module::new(
                declared.clone(),
                "/m",
                ModuleKind::Library(Library::default()),
            );
            module.required_modules = requires.clone();
            Ok(module)
        }
    }

    fn seeds(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_transitive_closure() {
        let source = MemorySource::default()
            .with("a", "a", &["b", "c"])
            .with("b", "b", &["d"])
            .with("c", "c", &["d"])
            .with("d", "d", &[])
            .with("unused", "unused", &[]);
        let modules = resolve_modules(&source, &seeds(&["a"])).unwrap();
        let names: Vec<&str> = modules.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["a", "b", "c", "d"]);
        // d is required twice but loaded once
        assert_eq!(source.loads.borrow().iter().filter(|n| *n == "d").count(), 1);
    }

    #[test]
    fn test_cycle_terminates() {
        let source = MemorySource::default()
            .with("a", "a", &["b"])
            .with("b", "b", &["a"]);
        let modules = resolve_modules(&source, &seeds(&["a", "a"])).unwrap();
        assert_eq!(modules.len(), 2);
        assert_eq!(source.loads.borrow().len(), 2);
    }

    #[test]
    fn test_name_mismatch_is_fatal() {
        let source = MemorySource::default().with("a", "b", &[]);
        let err = resolve_modules(&source, &seeds(&["a"])).unwrap_err();
        assert!(err.is_compile());
        assert_eq!(err.message, "Invalid description file of module a");
        assert_eq!(
            err.messages()[1],
            "Invalid name of module in module description: a"
        );
    }

    #[test]
    fn test_unavailable_module() {
        let source = MemorySource::default().with("a", "a", &["missing"]);
        let err = resolve_modules(&source, &seeds(&["a"])).unwrap_err();
        assert_eq!(err.messages()[1], "Unavailable module missing");
    }

    #[test]
    fn test_empty_name_is_fatal() {
        let err = resolve_modules(&MemorySource::default(), &seeds(&[" "])).unwrap_err();
        assert!(err.is_compile());
    }

    #[test]
    fn test_fs_source_maps_dots_to_directories() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("acp/utils");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join(MODULE_DESCRIPTION_FILE),
            r#"{"library": {"name": "acp.utils", "includes": ["u.h"]}}"#,
        )
        .unwrap();

        let source = FsModuleSource::new(root.path());
        let module = source.load("acp.utils").unwrap();
        assert_eq!(module.directory, dir);
        assert!(source.load("acp.other").unwrap_err().is_compile());
    }

    #[test]
    fn test_fs_source_stays_below_root() {
        let base = tempfile::tempdir().unwrap();
        let secret = base.path().join("secret");
        std::fs::create_dir_all(&secret).unwrap();
        std::fs::write(
            secret.join(MODULE_DESCRIPTION_FILE),
            r#"{"library": {"name": "secret"}}"#,
        )
        .unwrap();
        std::fs::create_dir_all(base.path().join("modules/acp")).unwrap();

        let source = FsModuleSource::new(base.path().join("modules"));
        let absolute = format!("acp.{}", secret.display());
        for name in [
            "../secret",
            "acp/../../secret",
            absolute.as_str(),
            "acp..utils",
            "acp./",
        ] {
            let err = source.load(name).unwrap_err();
            assert!(err.is_compile());
            assert_eq!(err.message, format!("Unavailable module {name}"));
        }
    }
}
