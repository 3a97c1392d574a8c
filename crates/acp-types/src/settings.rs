use crate::{AcpError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// How looper scheduling code is generated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LooperStrategy {
    /// A fixed table of looper records plus a delay-ordered index array.
    #[default]
    Array,
}

/// Settings of one compile invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Settings {
    pub project_file: PathBuf,
    /// Directory receiving the generated library directory.
    pub output_root: PathBuf,
    pub library_name: String,
    /// Flatten module sources into a single directory.
    #[serde(default)]
    pub merge_source_directories: bool,
    #[serde(default)]
    pub debug_mode: bool,
    #[serde(default)]
    pub looper_strategy: LooperStrategy,
}

impl Settings {
    pub fn new(
        project_file: impl Into<PathBuf>,
        output_root: impl Into<PathBuf>,
        library_name: impl Into<String>,
    ) -> Self {
        Self {
            project_file: project_file.into(),
            output_root: output_root.into(),
            library_name: library_name.into(),
            merge_source_directories: false,
            debug_mode: false,
            looper_strategy: LooperStrategy::Array,
        }
    }

    /// Library names may contain only ASCII letters, digits and spaces.
    pub fn validate(&self) -> Result<()> {
        let name = &self.library_name;
        if name.trim().is_empty() {
            return Err(AcpError::config("Library name cannot be empty."));
        }
        if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == ' ') {
            return Err(AcpError::config(format!(
                "Invalid library name '{name}': only letters, digits and spaces are allowed."
            )));
        }
        Ok(())
    }

    // ── Output layout ──

    pub fn library_dir(&self) -> PathBuf {
        self.output_root.join(&self.library_name)
    }

    /// Root of the headers exposed to sketches.
    pub fn include_dir(&self) -> PathBuf {
        self.library_dir().join("src")
    }

    pub fn source_dir(&self) -> PathBuf {
        self.include_dir().join("sources")
    }

    pub fn project_header_file(&self) -> PathBuf {
        self.include_dir().join(format!("{}.h", self.library_name))
    }

    pub fn example_file(&self) -> PathBuf {
        let sketch = format!("{}Skeleton", self.library_name);
        self.library_dir()
            .join("examples")
            .join(&sketch)
            .join(format!("{sketch}.ino"))
    }

    pub fn library_properties_file(&self) -> PathBuf {
        self.library_dir().join("library.properties")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_library_name_rules() {
        assert!(Settings::new("p.json", "out", "My Lib 2").validate().is_ok());
        assert!(Settings::new("p.json", "out", "").validate().is_err());
        assert!(Settings::new("p.json", "out", "my_lib").validate().is_err());
        assert!(Settings::new("p.json", "out", "lib-1").validate().unwrap_err().is_config());
    }

    #[test]
    fn test_derived_paths() {
        let s = Settings::new("p.json", "/out", "Blink");
        assert_eq!(s.library_dir(), Path::new("/out/Blink"));
        assert_eq!(s.include_dir(), Path::new("/out/Blink/src"));
        assert_eq!(s.source_dir(), Path::new("/out/Blink/src/sources"));
        assert_eq!(s.project_header_file(), Path::new("/out/Blink/src/Blink.h"));
        assert_eq!(
            s.example_file(),
            Path::new("/out/Blink/examples/BlinkSkeleton/BlinkSkeleton.ino")
        );
        assert_eq!(s.library_properties_file(), Path::new("/out/Blink/library.properties"));
    }

    #[test]
    fn test_deserialize_kebab_case_with_defaults() {
        let json = r#"{"project-file": "blink.json", "output-root": "out", "library-name": "Blink"}"#;
        let s: Settings = serde_json::from_str(json).unwrap();
        assert!(!s.merge_source_directories);
        assert!(!s.debug_mode);
        assert_eq!(s.looper_strategy, LooperStrategy::Array);

        let json = r#"{"project-file": "b.json", "output-root": "o", "library-name": "B",
                       "merge-source-directories": true, "looper-strategy": "array"}"#;
        let s: Settings = serde_json::from_str(json).unwrap();
        assert!(s.merge_source_directories);
    }
}
