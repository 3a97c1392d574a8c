//! Export of module `include/` and `src/` trees into the generated library.

use acp_types::{AcpError, Module, Result, Settings};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Filesystem failure while exporting module files.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("directory {} cannot be listed", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("directory {} does not exist or cannot be created", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("file {} cannot be copied to {}", from.display(), to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn export_error(module: &Module, err: AssetError) -> AcpError {
    AcpError::compile(format!("Files of module '{}' cannot be exported.", module.name))
        .caused_by(err)
}

/// Copy the module's headers to `include_dir/<module path>` and its sources
/// to `source_dir/<module path>`, or flattened into `source_dir` when source
/// directories are merged. Returns the written files.
pub fn export_module(module: &Module, settings: &Settings) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    let module_path = module.include_prefix();

    let include_dir = module.include_dir();
    if include_dir.is_dir() {
        let target = settings.include_dir().join(&module_path);
        copy_tree(&include_dir, &target, &mut written).map_err(|e| export_error(module, e))?;
    }

    let source_dir = module.source_dir();
    if source_dir.is_dir() {
        if settings.merge_source_directories {
            let prefix = format!("{}_", underscore_escape(&module.name).replace('.', "_"));
            copy_tree_merged(&source_dir, &settings.source_dir(), &prefix, &mut written)
                .map_err(|e| export_error(module, e))?;
        } else {
            let target = settings.source_dir().join(&module_path);
            copy_tree(&source_dir, &target, &mut written).map_err(|e| export_error(module, e))?;
        }
    }

    debug!(module = %module.name, files = written.len(), "exported module files");
    Ok(written)
}

/// Double every underscore so flattened names stay unambiguous.
pub fn underscore_escape(name: &str) -> String {
    name.replace('_', "__")
}

/// Directory entries sorted by name.
fn entries(dir: &Path) -> std::result::Result<Vec<PathBuf>, AssetError> {
    let read_dir_error = |source| AssetError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };
    let mut paths = fs::read_dir(dir)
        .map_err(read_dir_error)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<io::Result<Vec<_>>>()
        .map_err(read_dir_error)?;
    paths.sort();
    Ok(paths)
}

fn create_dir(dir: &Path) -> std::result::Result<(), AssetError> {
    fs::create_dir_all(dir).map_err(|source| AssetError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })
}

fn copy_file(from: &Path, to: PathBuf, written: &mut Vec<PathBuf>) -> std::result::Result<(), AssetError> {
    fs::copy(from, &to).map_err(|source| AssetError::Copy {
        from: from.to_path_buf(),
        to: to.clone(),
        source,
    })?;
    written.push(to);
    Ok(())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn copy_tree(
    source: &Path,
    target: &Path,
    written: &mut Vec<PathBuf>,
) -> std::result::Result<(), AssetError> {
    create_dir(target)?;
    for path in entries(source)? {
        let dest = target.join(file_name(&path));
        if path.is_dir() {
            copy_tree(&path, &dest, written)?;
        } else if path.is_file() {
            copy_file(&path, dest, written)?;
        }
    }
    Ok(())
}

fn copy_tree_merged(
    source: &Path,
    target: &Path,
    prefix: &str,
    written: &mut Vec<PathBuf>,
) -> std::result::Result<(), AssetError> {
    create_dir(target)?;
    for path in entries(source)? {
        let name = underscore_escape(&file_name(&path));
        if path.is_dir() {
            copy_tree_merged(&path, target, &format!("{prefix}{name}_"), written)?;
        } else if path.is_file() {
            copy_file(&path, target.join(format!("{prefix}{name}")), written)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use acp_types::{Library, ModuleKind};

    fn touch(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn fixture() -> (tempfile::TempDir, Module) {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("modules/acp/my_led");
        touch(&dir.join("include/led.h"), "// led.h");
        touch(&dir.join("src/led.cpp"), "// led.cpp");
        touch(&dir.join("src/hw_impl/pwm.cpp"), "// pwm.cpp");
        let module = Module::new("acp.my_led", dir, ModuleKind::Library(Library::default()));
        (root, module)
    }

    #[test]
    fn test_escape() {
        assert_eq!(underscore_escape("a_b__c"), "a__b____c");
    }

    #[test]
    fn test_mirrored_export() {
        let (root, module) = fixture();
        let settings = Settings::new("p.json", root.path().join("out"), "Demo");
        let written = export_module(&module, &settings).unwrap();
        assert_eq!(written.len(), 3);

        let include = settings.include_dir().join("acp/my_led/led.h");
        assert_eq!(fs::read_to_string(include).unwrap(), "// led.h");
        assert!(settings.source_dir().join("acp/my_led/led.cpp").is_file());
        assert!(settings.source_dir().join("acp/my_led/hw_impl/pwm.cpp").is_file());
    }

    #[test]
    fn test_merged_export() {
        let (root, module) = fixture();
        let mut settings = Settings::new("p.json", root.path().join("out"), "Demo");
        settings.merge_source_directories = true;
        export_module(&module, &settings).unwrap();

        let sources = settings.source_dir();
        assert!(sources.join("acp_my__led_led.cpp").is_file());
        assert!(sources.join("acp_my__led_hw__impl_pwm.cpp").is_file());
        // headers are mirrored either way
        assert!(settings.include_dir().join("acp/my_led/led.h").is_file());
    }

    #[test]
    fn test_module_without_assets() {
        let root = tempfile::tempdir().unwrap();
        let module = Module::new(
            "acp.empty",
            root.path().join("nothing"),
            ModuleKind::Library(Library::default()),
        );
        let settings = Settings::new("p.json", root.path().join("out"), "Demo");
        assert!(export_module(&module, &settings).unwrap().is_empty());
    }
}
