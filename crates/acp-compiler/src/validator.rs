//! Checks of project components against their component types.

use acp_platform::Platform;
use acp_types::{AcpError, Component, ComponentType, ModuleMap, Project, Result};
use std::collections::HashSet;

/// Component names must be unique within a project.
pub fn check_component_names(components: &[Component]) -> Result<()> {
    let mut names = HashSet::new();
    for component in components {
        if !names.insert(component.name.as_str()) {
            return Err(AcpError::compile(format!(
                "Duplicated component name: {}",
                component.name
            )));
        }
    }
    Ok(())
}

/// Resolve the type of `component` and check its configuration.
pub fn check_component<'m>(
    component: &Component,
    modules: &'m ModuleMap,
    platform: &Platform,
) -> Result<&'m ComponentType> {
    let component_type = modules
        .get(&component.type_name)
        .and_then(|m| m.as_component_type())
        .ok_or_else(|| {
            AcpError::compile(format!(
                "Invalid component type ({}) of component {}.",
                component.type_name, component.name
            ))
        })?;
    check_configuration(component, component_type, platform)?;
    Ok(component_type)
}

/// Every declared property must have a valid effective value; configured
/// properties and events must be declared.
pub fn check_configuration(
    component: &Component,
    component_type: &ComponentType,
    platform: &Platform,
) -> Result<()> {
    for property in &component_type.properties {
        let value = property.effective_value(component.property(&property.name));
        if !(platform.check_value(&property.ty, value) && property.check_restriction(value)) {
            return Err(AcpError::compile(format!(
                "Invalid or undefined value of property '{}' of component '{}'.",
                property.name, component.name
            )));
        }
    }

    for name in component.properties.keys() {
        if component_type.property(name).is_none() {
            return Err(AcpError::compile(format!(
                "Property '{name}' is not supported in component '{}'.",
                component.name
            )));
        }
    }

    for name in component.events.keys() {
        if component_type.event(name).is_none() {
            return Err(AcpError::compile(format!(
                "Event '{name}' is not supported in component '{}'.",
                component.name
            )));
        }
    }
    Ok(())
}

/// Every library import must name a library module.
pub fn check_library_imports(project: &Project, modules: &ModuleMap) -> Result<()> {
    for import in &project.library_imports {
        if modules.get(import).and_then(|m| m.as_library()).is_none() {
            return Err(AcpError::compile(format!(
                "Library {import} imported by program is not a library module."
            )));
        }
    }
    Ok(())
}
