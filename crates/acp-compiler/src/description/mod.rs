//! JSON description files of modules and projects.
//!
//! Every description is an object with a single key, the root tag, whose
//! value holds the description body. Bodies are deserialized into raw
//! structs first and then checked and converted into the model types.

mod module;
mod project;

pub use module::load_module;
pub use project::load_project;

use acp_types::{AcpError, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name of a module description inside the module directory.
pub const MODULE_DESCRIPTION_FILE: &str = "description.json";

/// Failure to read a description file into a raw document.
#[derive(Debug, Error)]
pub enum DescriptionError {
    #[error("file {} cannot be read", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("file {} is not valid JSON: {source}", path.display())]
    Syntax {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("file {} must hold an object with exactly one root key", path.display())]
    Root { path: PathBuf },

    #[error("invalid '{tag}' description: {source}")]
    Structure {
        tag: String,
        #[source]
        source: serde_json::Error,
    },
}

fn config_error(err: DescriptionError) -> AcpError {
    AcpError::config(err.to_string()).caused_by(err)
}

/// Read `path` and split it into its root tag and body.
fn read_root(path: &Path) -> Result<(String, Value)> {
    let text = fs::read_to_string(path).map_err(|source| {
        config_error(DescriptionError::Read {
            path: path.to_path_buf(),
            source,
        })
    })?;
    let root: serde_json::Map<String, Value> = serde_json::from_str(&text).map_err(|source| {
        config_error(DescriptionError::Syntax {
            path: path.to_path_buf(),
            source,
        })
    })?;
    let mut entries = root.into_iter();
    match (entries.next(), entries.next()) {
        (Some((tag, body)), None) => Ok((tag, body)),
        _ => Err(config_error(DescriptionError::Root {
            path: path.to_path_buf(),
        })),
    }
}

/// Deserialize the body of a `tag` description.
fn from_body<T: DeserializeOwned>(tag: &str, body: Value) -> Result<T> {
    serde_json::from_value(body).map_err(|source| {
        config_error(DescriptionError::Structure {
            tag: tag.to_string(),
            source,
        })
    })
}

/// A scalar written either as a JSON string or as a bare JSON value.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    fn into_text(self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::Int(n) => n.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Text(text) => text,
        }
    }
}

/// Trim and drop blank entries.
fn non_blank(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
