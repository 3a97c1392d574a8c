//! Module descriptions: `component-type` and `library`.

use super::{from_body, non_blank, read_root, Scalar};
use acp_types::{
    AcpError, Binding, ComponentType, Event, Instance, Library, Looper, MethodCall,
    MethodWrapper, Module, ModuleKind, Parameter, PropertyType, Result, Timing, ValueKind,
};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use tracing::debug;

type ModuleParser = fn(Value) -> Result<(RawHeader, ModuleKind)>;

/// Root tag → parser of the module body.
const MODULE_KINDS: &[(&str, ModuleParser)] = &[
    ("component-type", parse_component_type),
    ("library", parse_library),
];

/// Load the module description stored in `path`. The module directory is the
/// directory containing the file.
pub fn load_module(path: &Path) -> Result<Module> {
    read_module(path).map_err(|e| {
        AcpError::config(format!(
            "Loading of description of a module from file {} failed.",
            path.display()
        ))
        .caused_by(e)
    })
}

fn read_module(path: &Path) -> Result<Module> {
    let (tag, body) = read_root(path)?;
    let parse = MODULE_KINDS
        .iter()
        .find(|(known, _)| *known == tag)
        .map(|(_, parse)| *parse)
        .ok_or_else(|| {
            AcpError::config(format!(
                "Unknown module type '{tag}' (root element of the module description)."
            ))
        })?;
    let (header, kind) = parse(body)?;

    let name = header.name.trim();
    if name.is_empty() {
        return Err(AcpError::config("Name of the module cannot be empty."));
    }
    let directory = path.parent().unwrap_or_else(|| Path::new("."));
    let mut module = Module::new(name, directory, kind);
    module.required_modules = non_blank(header.dependencies.modules);
    module.platform_includes = header
        .dependencies
        .platform_libraries
        .into_iter()
        .map(RawPlatformLibrary::includes)
        .collect::<Result<Vec<_>>>()?
        .into_iter()
        .flatten()
        .collect();
    debug!(module = %module.name, kind = %tag, "parsed module description");
    Ok(module)
}

// ══════════════════════════════════════════════════════════════════════════════
// Common header
// ══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
struct RawHeader {
    #[serde(default)]
    name: String,
    #[serde(default)]
    dependencies: RawDependencies,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct RawDependencies {
    #[serde(default)]
    modules: Vec<String>,
    #[serde(default)]
    platform_libraries: Vec<RawPlatformLibrary>,
}

/// `{"include": "a.h, b.h"}` or `{"name": "Servo"}`.
#[derive(Debug, Deserialize)]
struct RawPlatformLibrary {
    #[serde(default)]
    include: String,
    #[serde(default)]
    name: String,
}

impl RawPlatformLibrary {
    fn includes(self) -> Result<Vec<String>> {
        let include = self.include.trim();
        let list = if include.is_empty() {
            let name = self.name.trim();
            if name.is_empty() {
                return Err(AcpError::config(
                    "Platform library dependency must have a name or a list of includes.",
                ));
            }
            format!("{name}.h")
        } else {
            include.to_string()
        };
        Ok(non_blank(list.split(',').map(str::to_string).collect()))
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Library
// ══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
struct RawLibrary {
    #[serde(flatten)]
    header: RawHeader,
    #[serde(default)]
    includes: Vec<String>,
}

fn parse_library(body: Value) -> Result<(RawHeader, ModuleKind)> {
    let raw: RawLibrary = from_body("library", body)?;
    let library = Library {
        includes: non_blank(raw.includes),
    };
    Ok((raw.header, ModuleKind::Library(library)))
}

// ══════════════════════════════════════════════════════════════════════════════
// Component type
// ══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct RawComponentType {
    #[serde(flatten)]
    header: RawHeader,
    view: Option<RawInstance>,
    controller: Option<RawController>,
    #[serde(default)]
    properties: Vec<RawProperty>,
    #[serde(default)]
    events: Vec<RawEvent>,
    #[serde(default)]
    loopers: Vec<RawLooper>,
    #[serde(default)]
    method_wrappers: Vec<RawMethodWrapper>,
}

#[derive(Debug, Deserialize)]
struct RawInstance {
    #[serde(default)]
    includes: Vec<String>,
    #[serde(rename = "class", default)]
    class_type: String,
    constructor: Option<String>,
    init: Option<RawCall>,
    #[serde(rename = "loop")]
    loop_call: Option<RawCall>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct RawController {
    #[serde(flatten)]
    instance: RawInstance,
    view_binding: Option<RawBinding>,
}

#[derive(Debug, Deserialize)]
struct RawCall {
    method: String,
    #[serde(default)]
    arguments: String,
}

#[derive(Debug, Deserialize)]
struct RawBinding {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    target: String,
}

#[derive(Debug, Deserialize)]
struct RawValue {
    value: Scalar,
    #[serde(default)]
    kind: String,
}

#[derive(Debug, Deserialize)]
struct RawProperty {
    #[serde(default)]
    name: String,
    #[serde(rename = "type", default)]
    ty: String,
    value: Option<RawValue>,
    binding: Option<RawBinding>,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct RawParameter {
    #[serde(rename = "type", default)]
    ty: String,
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawEvent {
    #[serde(default)]
    name: String,
    #[serde(default)]
    parameters: Vec<RawParameter>,
    result: Option<String>,
    binding: Option<RawBinding>,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct RawLooper {
    #[serde(default)]
    method: String,
    interval: Option<Scalar>,
    initial_delay: Option<Scalar>,
    id_binding: Option<RawBinding>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct RawMethodWrapper {
    #[serde(default)]
    method: String,
    #[serde(default)]
    parameters: Vec<RawParameter>,
    result: Option<String>,
    autogenerated_property: Option<String>,
    binding: Option<RawBinding>,
}

fn parse_component_type(body: Value) -> Result<(RawHeader, ModuleKind)> {
    let raw: RawComponentType = from_body("component-type", body)?;

    let view = raw
        .view
        .map(convert_instance)
        .transpose()
        .map_err(|e| AcpError::config("View description contains errors.").caused_by(e))?;

    let (controller, view_binding) = match raw.controller {
        Some(controller) => {
            let view_binding = convert_binding(controller.view_binding).map_err(|e| {
                AcpError::config("Controller description contains errors.").caused_by(e)
            })?;
            let instance = convert_instance(controller.instance).map_err(|e| {
                AcpError::config("Controller description contains errors.").caused_by(e)
            })?;
            (Some(instance), view_binding)
        }
        None => (None, None),
    };

    let properties = raw
        .properties
        .into_iter()
        .map(convert_property)
        .collect::<Result<Vec<_>>>()?;
    let events = raw
        .events
        .into_iter()
        .map(convert_event)
        .collect::<Result<Vec<_>>>()?;
    let loopers = raw
        .loopers
        .into_iter()
        .map(|l| {
            convert_looper(l)
                .map_err(|e| AcpError::config("Looper description contains errors.").caused_by(e))
        })
        .collect::<Result<Vec<_>>>()?;
    let method_wrappers = raw
        .method_wrappers
        .into_iter()
        .map(|w| {
            convert_wrapper(w).map_err(|e| {
                AcpError::config("Description of a method wrapper contains errors.").caused_by(e)
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let component_type = ComponentType {
        view,
        controller,
        view_binding,
        properties,
        events,
        loopers,
        method_wrappers,
    };
    component_type.validate()?;
    Ok((raw.header, ModuleKind::ComponentType(component_type)))
}

// ── conversions ──

fn convert_binding(raw: Option<RawBinding>) -> Result<Option<Binding>> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let kind = raw.kind.parse()?;
    let target = raw.target.trim();
    if target.is_empty() {
        return Err(AcpError::config("Binding target cannot be empty."));
    }
    Ok(Some(Binding::new(kind, target)))
}

fn convert_call(raw: Option<RawCall>) -> Option<MethodCall> {
    raw.map(|c| MethodCall::new(c.method.trim(), c.arguments.trim()))
        .filter(|c| !c.method.is_empty())
}

fn convert_instance(raw: RawInstance) -> Result<Instance> {
    let instance = Instance {
        includes: non_blank(raw.includes),
        class_type: raw.class_type.trim().to_string(),
        constructor: raw.constructor.map(|c| c.trim().to_string()),
        init: convert_call(raw.init),
        loop_call: convert_call(raw.loop_call),
    };
    if instance.class_type.is_empty() {
        return Err(AcpError::config("Class type of an instance cannot be empty."));
    }
    Ok(instance)
}

fn convert_property(raw: RawProperty) -> Result<PropertyType> {
    let name = raw.name.trim().to_string();
    let context = |e: AcpError| {
        AcpError::config(format!("Description of property {name} contains errors.")).caused_by(e)
    };
    let mut property = PropertyType::new(name.clone(), raw.ty.trim());
    if let Some(value) = raw.value {
        let kind: ValueKind = value.kind.parse().map_err(|e| {
            AcpError::config(format!(
                "Unknown value type of property {name}: {}",
                value.kind
            ))
            .caused_by(e)
        })?;
        property = property.with_value(kind, value.value.into_text());
    }
    property.binding = convert_binding(raw.binding).map_err(context)?;
    property.description = raw.description.trim().to_string();
    Ok(property)
}

fn convert_parameters(raw: Vec<RawParameter>) -> Result<Vec<Parameter>> {
    raw.into_iter()
        .map(|p| Parameter::new(p.ty, p.name.map(|n| n.trim().to_string())))
        .collect()
}

fn convert_event(raw: RawEvent) -> Result<Event> {
    let name = raw.name.trim().to_string();
    let mut event = Event::new(name.clone());
    event.parameters = convert_parameters(raw.parameters).map_err(|e| {
        AcpError::config(format!("Empty parameter type in event {name}.")).caused_by(e)
    })?;
    event.result_type = raw.result.map(|r| r.trim().to_string()).filter(|r| !r.is_empty());
    event.binding = convert_binding(raw.binding).map_err(|e| {
        AcpError::config(format!("Binding of event {name} contains errors.")).caused_by(e)
    })?;
    event.description = raw.description.trim().to_string();
    Ok(event)
}

fn convert_timing(raw: Option<Scalar>) -> Timing {
    match raw {
        None => Timing::Unset,
        Some(Scalar::Int(ms)) => Timing::Millis(ms),
        Some(other) => Timing::parse(&other.into_text()),
    }
}

fn convert_looper(raw: RawLooper) -> Result<Looper> {
    let mut looper = Looper::new(raw.method.trim());
    looper.interval = convert_timing(raw.interval);
    looper.initial_delay = convert_timing(raw.initial_delay);
    looper.id_binding = convert_binding(raw.id_binding)?;
    Ok(looper)
}

fn convert_wrapper(raw: RawMethodWrapper) -> Result<MethodWrapper> {
    let method = raw.method.trim();
    if method.is_empty() {
        return Err(AcpError::config("Method wrapper must have a wrapped method."));
    }
    let mut wrapper = MethodWrapper::new(method);
    wrapper.parameters = convert_parameters(raw.parameters)?;
    wrapper.result_type = raw.result.map(|r| r.trim().to_string()).filter(|r| !r.is_empty());
    wrapper.autogenerated_property = raw
        .autogenerated_property
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty());
    wrapper.binding = convert_binding(raw.binding)?;
    Ok(wrapper)
}
