//! The compile entry point.

use crate::assets::export_module;
use crate::description::load_project;
use crate::resolver::{resolve_modules, FsModuleSource, ModuleSource};
use crate::validator::{check_component, check_component_names, check_library_imports};
use acp_codegen::{standard_pipeline, GenerationContext, SharedState, PRIVATE_NAMESPACE};
use acp_platform::PlatformRegistry;
use acp_types::{AcpError, Project, Result, Settings};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Summary of a successful compile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileReport {
    /// Names of all resolved modules, sorted.
    pub modules: Vec<String>,
    /// EEPROM bytes used, version marker included.
    pub eeprom_usage: u32,
    /// Exported module files followed by generated files.
    pub files: Vec<PathBuf>,
}

/// Compiles projects against the modules found below one root directory.
pub struct Compiler {
    source: Box<dyn ModuleSource>,
    platforms: PlatformRegistry,
}

impl Compiler {
    pub fn new(modules_root: impl Into<PathBuf>) -> Self {
        Self::with_source(FsModuleSource::new(modules_root))
    }

    /// Use a custom module source instead of the filesystem layout.
    pub fn with_source(source: impl ModuleSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            platforms: PlatformRegistry::new(),
        }
    }

    pub fn platforms_mut(&mut self) -> &mut PlatformRegistry {
        &mut self.platforms
    }

    /// Load the project named by `settings` and compile it.
    pub fn compile(&self, settings: &Settings) -> Result<CompileReport> {
        settings.validate()?;
        let project = load_project(&settings.project_file).map_err(|e| {
            AcpError::compile("Project configuration contains errors.").caused_by(e)
        })?;
        self.compile_project(settings, &project)
    }

    /// Compile an already loaded project.
    pub fn compile_project(&self, settings: &Settings, project: &Project) -> Result<CompileReport> {
        settings.validate()?;
        info!(library = %settings.library_name, "compiling project");

        let platform = self.platforms.get(&project.platform).ok_or_else(|| {
            AcpError::compile(format!(
                "Unsupported hardware platform '{}'.",
                project.platform
            ))
        })?;
        debug!(platform = %platform.name, "selected platform");

        check_component_names(&project.components)?;

        let modules = resolve_modules(self.source.as_ref(), &project.referenced_modules())?;
        info!(count = modules.len(), "resolved modules");

        for component in &project.components {
            check_component(component, &modules, platform)?;
        }
        check_library_imports(project, &modules)?;

        create_output_dir(&settings.include_dir(), "includes")?;
        create_output_dir(&settings.source_dir(), "source files")?;

        let mut files = Vec::new();
        for module in modules.values() {
            files.extend(export_module(module, settings)?);
        }

        let cx = GenerationContext::new(settings, project, platform, &modules);
        let mut state = SharedState::new(PRIVATE_NAMESPACE);
        let artifacts = standard_pipeline().run(&cx, &mut state)?;
        files.extend(artifacts.into_files());

        info!(
            files = files.len(),
            eeprom_usage = state.eeprom_usage,
            output = %settings.library_dir().display(),
            "compile finished"
        );
        Ok(CompileReport {
            modules: modules.keys().cloned().collect(),
            eeprom_usage: state.eeprom_usage,
            files,
        })
    }
}

fn create_output_dir(dir: &Path, what: &str) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| {
        AcpError::compile(format!(
            "Output directory for {what} ({}) cannot be created.",
            dir.display()
        ))
        .caused_by(e)
    })
}
