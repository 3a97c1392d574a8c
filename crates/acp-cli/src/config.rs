//! Build configuration: an optional JSON file overlaid by command-line flags.

use acp_types::{LooperStrategy, Settings};
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Contents of a `--config` file. Every field is optional; flags win.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct BuildConfig {
    pub modules_path: Option<PathBuf>,
    pub project_file: Option<PathBuf>,
    pub output_root: Option<PathBuf>,
    pub library_name: Option<String>,
    pub merge_source_directories: Option<bool>,
    pub debug_mode: Option<bool>,
    pub looper_strategy: Option<LooperStrategy>,
}

/// Values given on the command line.
#[derive(Debug, Default)]
pub struct Overrides {
    pub modules_path: Option<PathBuf>,
    pub project_file: Option<PathBuf>,
    pub output_root: Option<PathBuf>,
    pub library_name: Option<String>,
    pub merge_source_directories: bool,
    pub debug_mode: bool,
}

impl BuildConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("cannot read build config {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("invalid build config {}", path.display()))
    }

    /// Merge with `flags` into the modules root and the compile settings.
    pub fn resolve(self, flags: Overrides) -> Result<(PathBuf, Settings)> {
        let Some(modules) = flags.modules_path.or(self.modules_path) else {
            bail!("no modules directory given (--modules or modules-path)");
        };
        let Some(project) = flags.project_file.or(self.project_file) else {
            bail!("no project file given (--project or project-file)");
        };
        let Some(output) = flags.output_root.or(self.output_root) else {
            bail!("no output directory given (--output or output-root)");
        };
        let library_name = match flags.library_name.or(self.library_name) {
            Some(name) => name,
            None => default_library_name(&project)?,
        };

        let mut settings = Settings::new(project, output, library_name);
        settings.merge_source_directories =
            flags.merge_source_directories || self.merge_source_directories.unwrap_or(false);
        settings.debug_mode = flags.debug_mode || self.debug_mode.unwrap_or(false);
        settings.looper_strategy = self.looper_strategy.unwrap_or_default();
        Ok((modules, settings))
    }
}

/// The project file stem with everything but letters, digits and spaces
/// removed.
fn default_library_name(project: &Path) -> Result<String> {
    let stem = project
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name: String = stem
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ')
        .collect();
    if name.trim().is_empty() {
        bail!("cannot derive a library name from {}; use --library-name", project.display());
    }
    Ok(name)
}
