//! Project descriptions.

use super::{from_body, read_root, Scalar};
use acp_types::{AcpError, Component, EepromItem, Project, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

const PROJECT_ROOT: &str = "project";

/// Load the project description stored in `path`.
pub fn load_project(path: &Path) -> Result<Project> {
    read_project(path).map_err(|e| {
        AcpError::config("Loading of project configuration failed.").caused_by(e)
    })
}

fn read_project(path: &Path) -> Result<Project> {
    let (tag, body) = read_root(path)?;
    if tag != PROJECT_ROOT {
        return Err(AcpError::config(
            "Root element of a project configuration must be an element with name 'project'.",
        ));
    }
    let raw: RawProject = from_body(PROJECT_ROOT, body)?;
    raw.into_project()
}

#[derive(Debug, Deserialize)]
struct RawProject {
    #[serde(default)]
    platform: String,
    #[serde(default)]
    program: RawProgram,
    #[serde(default)]
    eeprom: RawEeprom,
    #[serde(default)]
    components: Vec<RawComponent>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct RawProgram {
    watchdog_level: Option<Scalar>,
    #[serde(default)]
    events: Vec<RawProgramEvent>,
    #[serde(default)]
    imports: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawProgramEvent {
    #[serde(default)]
    name: String,
    #[serde(default)]
    handler: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct RawEeprom {
    layout_version: Option<Scalar>,
    #[serde(default)]
    items: Vec<RawEepromItem>,
}

#[derive(Debug, Deserialize)]
struct RawEepromItem {
    #[serde(default)]
    kind: String,
    #[serde(default)]
    name: String,
    #[serde(rename = "type", default)]
    ty: String,
    value: Option<Scalar>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    cached: bool,
    length: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct RawComponent {
    #[serde(rename = "type", default)]
    type_name: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    properties: BTreeMap<String, Scalar>,
    #[serde(default)]
    events: BTreeMap<String, String>,
}

impl RawProject {
    fn into_project(self) -> Result<Project> {
        let mut project = Project {
            platform: self.platform.trim().to_string(),
            eeprom_layout_version: self
                .eeprom
                .layout_version
                .map(Scalar::into_text)
                .unwrap_or_default()
                .trim()
                .to_string(),
            ..Project::default()
        };

        project.watchdog_level = match self.program.watchdog_level {
            None => None,
            Some(level) => Some(watchdog_level(level)?),
        };

        for event in self.program.events {
            let name = event.name.trim();
            let handler = event.handler.trim();
            if name.is_empty() {
                return Err(AcpError::config("Program contains event with empty name."));
            }
            if handler.is_empty() {
                return Err(AcpError::config(format!(
                    "Program event {name} is not set to any function or procedure."
                )));
            }
            project
                .program_events
                .insert(name.to_string(), handler.to_string());
        }

        for import in self.program.imports {
            let import = import.trim();
            if import.is_empty() {
                return Err(AcpError::config(
                    "Program contains an empty import of a library module.",
                ));
            }
            project.library_imports.push(import.to_string());
        }

        for item in self.eeprom.items {
            let name = item.name.trim().to_string();
            let converted = item.into_item().map_err(|e| {
                AcpError::config(format!("Configuration of EEPROM item {name} contains errors."))
                    .caused_by(e)
            })?;
            project.eeprom.push(converted);
        }

        for component in self.components {
            project.components.push(component.into_component()?);
        }
        Ok(project)
    }
}

fn watchdog_level(level: Scalar) -> Result<u32> {
    let invalid = || AcpError::config("Watchdog level must be a non-negative integer.");
    let level = match level {
        Scalar::Int(n) => n,
        Scalar::Text(text) => text.trim().parse::<i64>().map_err(|_| invalid())?,
        _ => return Err(invalid()),
    };
    u32::try_from(level).map_err(|_| invalid())
}

impl RawEepromItem {
    fn into_item(self) -> Result<EepromItem> {
        let name = self.name.trim();
        let ty = self.ty.trim();
        if name.is_empty() {
            return Err(AcpError::config(
                "Name of an EEPROM item cannot be null or an empty string.",
            ));
        }
        if ty.is_empty() {
            return Err(AcpError::config(
                "Type of an EEPROM item cannot be null or an empty string.",
            ));
        }

        let mut item = match self.kind.trim() {
            "" | "variable" => EepromItem::variable(name, ty),
            "array" => {
                let length = self
                    .length
                    .and_then(|n| u32::try_from(n).ok())
                    .ok_or_else(|| {
                        AcpError::config("Length of array must be a nonnegative integer.")
                    })?;
                EepromItem::array(name, ty, length)
            }
            other => {
                return Err(AcpError::config(format!(
                    "Unknown kind of EEPROM item: '{other}'."
                )))
            }
        };
        item.value = self.value.map(Scalar::into_text);
        item.description = self.description.trim().to_string();
        item.cached = self.cached;
        Ok(item)
    }
}

impl RawComponent {
    fn into_component(self) -> Result<Component> {
        let type_name = self.type_name.trim();
        let name = self.name.trim();
        if name.is_empty() {
            return Err(AcpError::config("Component must have a non-empty name."));
        }
        if type_name.is_empty() {
            return Err(AcpError::config(format!(
                "Component {name} must have a non-empty type."
            )));
        }
        let mut component = Component::new(type_name, name);
        component.description = self.description.trim().to_string();
        component.properties = self
            .properties
            .into_iter()
            .map(|(k, v)| (k.trim().to_string(), v.into_text()))
            .collect();
        component.events = self
            .events
            .into_iter()
            .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
            .filter(|(_, handler)| !handler.is_empty())
            .collect();
        Ok(component)
    }
}
