//! Rendering of view and controller instance templates for one component.

use crate::context::{GenerationContext, SharedState};
use crate::template::{render, Replacements};
use acp_types::{Component, ComponentType, Instance, MethodCall};

/// Template values of a component: escaped effective property values, then
/// autogenerated properties.
pub fn component_replacements(
    cx: &GenerationContext<'_>,
    state: &SharedState,
    component: &Component,
    component_type: &ComponentType,
) -> Replacements {
    let mut replacements = Replacements::new();
    for property in &component_type.properties {
        let value = property.effective_value(component.property(&property.name));
        if let Some(escaped) = cx.platform.escape_value(&property.ty, value) {
            replacements.insert(property.name.clone(), escaped);
        }
    }
    if let Some(autogenerated) = state.autogenerated_for(&component.name) {
        for (key, value) in autogenerated {
            replacements.insert(key.clone(), value.clone());
        }
    }
    replacements
}

pub fn class_type(instance: &Instance, replacements: &Replacements) -> String {
    render(&instance.class_type, replacements).trim().to_string()
}

/// `(args)` when the instance declares a constructor, otherwise empty.
pub fn constructor_arguments(instance: &Instance, replacements: &Replacements) -> String {
    match &instance.constructor {
        Some(args) => format!("({})", render(args, replacements).trim()),
        None => String::new(),
    }
}

/// `Type name(args);`
pub fn declaration(instance: &Instance, object: &str, replacements: &Replacements) -> String {
    format!(
        "{} {object}{};",
        class_type(instance, replacements),
        constructor_arguments(instance, replacements)
    )
}

/// `object.method(args);`
pub fn invocation(call: &MethodCall, object: &str, replacements: &Replacements) -> String {
    format!(
        "{object}.{}({});",
        call.method,
        render(&call.arguments, replacements).trim()
    )
}
