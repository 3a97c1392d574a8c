//! Inputs shared by all generators and the state they hand to each other.

use acp_platform::Platform;
use acp_types::{AcpError, Component, ComponentType, ModuleMap, Project, Result, Settings};
use std::collections::BTreeMap;

/// Namespace of objects that sketches should not touch.
pub const PRIVATE_NAMESPACE: &str = "acp_private";

/// Read-only inputs of one compile.
#[derive(Debug, Clone, Copy)]
pub struct GenerationContext<'a> {
    pub settings: &'a Settings,
    pub project: &'a Project,
    pub platform: &'a Platform,
    pub modules: &'a ModuleMap,
}

impl<'a> GenerationContext<'a> {
    pub fn new(
        settings: &'a Settings,
        project: &'a Project,
        platform: &'a Platform,
        modules: &'a ModuleMap,
    ) -> Self {
        Self {
            settings,
            project,
            platform,
            modules,
        }
    }

    /// The component type of a validated component.
    pub fn component_type(&self, component: &Component) -> Result<&'a ComponentType> {
        self.modules
            .get(&component.type_name)
            .and_then(|m| m.as_component_type())
            .ok_or_else(|| {
                AcpError::compile(format!(
                    "Invalid component type ({}) of component {}.",
                    component.type_name, component.name
                ))
            })
    }
}

/// Values one generator's prepare step computes for others.
#[derive(Debug, Clone, Default)]
pub struct SharedState {
    /// Set by the compiler. Read by the project code and EEPROM generators.
    pub private_namespace: String,
    /// EEPROM bytes in use, version marker included; 0 when there are no
    /// EEPROM items. Written by the project code prepare step. Read by the
    /// project header, the example sketch and the EEPROM generate step.
    pub eeprom_usage: u32,
    /// `extern` declarations of the EEPROM items. Written by the project code
    /// prepare step. Read by the project header.
    pub eeprom_externs: Vec<String>,
    /// Component name → autogenerated property → value (`controller`, method
    /// wrapper names). Cleared and refilled by the project code prepare step;
    /// read wherever instance templates are rendered afterwards.
    pub autogenerated: BTreeMap<String, BTreeMap<String, String>>,
}

impl SharedState {
    pub fn new(private_namespace: impl Into<String>) -> Self {
        Self {
            private_namespace: private_namespace.into(),
            ..Self::default()
        }
    }

    pub fn autogenerated_for(&self, component: &str) -> Option<&BTreeMap<String, String>> {
        self.autogenerated.get(component)
    }

    pub fn set_autogenerated(&mut self, component: &str, key: &str, value: impl Into<String>) {
        self.autogenerated
            .entry(component.to_string())
            .or_default()
            .insert(key.to_string(), value.into());
    }
}
