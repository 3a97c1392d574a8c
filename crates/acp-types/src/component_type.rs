//! The contract a component-type module declares for its instances.
//!
//! A [`ComponentType`] describes which objects the generated code creates for
//! every component (a public view, a private controller), which properties and
//! events can be configured, and how they are wired into the controller.

use crate::{AcpError, Binding, Result};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

// ══════════════════════════════════════════════════════════════════════════════
// Properties
// ══════════════════════════════════════════════════════════════════════════════

/// How a predefined property value interacts with the configured one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// The predefined value always wins.
    Fixed,
    /// The predefined value is used only when nothing is configured.
    Default,
}

impl FromStr for ValueKind {
    type Err = AcpError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "default" => Ok(Self::Default),
            "fixed" => Ok(Self::Fixed),
            _ => Err(AcpError::config(format!("Unknown value type: {s}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredefinedValue {
    pub kind: ValueKind,
    pub value: String,
}

type RestrictionFn = dyn Fn(Option<&str>) -> bool + Send + Sync;

/// Extra acceptance test for a property value, applied after the platform's
/// syntax check. The default restriction accepts everything.
#[derive(Clone, Default)]
pub struct Restriction(Option<Arc<RestrictionFn>>);

impl Restriction {
    pub fn new(check: impl Fn(Option<&str>) -> bool + Send + Sync + 'static) -> Self {
        Self(Some(Arc::new(check)))
    }

    pub fn permits(&self, value: Option<&str>) -> bool {
        match &self.0 {
            Some(check) => check(value),
            None => true,
        }
    }
}

impl fmt::Debug for Restriction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(_) => write!(f, "Restriction(custom)"),
            None => write!(f, "Restriction(any)"),
        }
    }
}

/// A configurable property of a component type.
#[derive(Debug, Clone)]
pub struct PropertyType {
    pub name: String,
    /// Declared platform type (`int`, `digital-pin`, `string`, ...).
    pub ty: String,
    pub predefined: Option<PredefinedValue>,
    pub binding: Option<Binding>,
    pub description: String,
    pub restriction: Restriction,
}

impl PropertyType {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            predefined: None,
            binding: None,
            description: String::new(),
            restriction: Restriction::default(),
        }
    }

    pub fn with_value(mut self, kind: ValueKind, value: impl Into<String>) -> Self {
        self.predefined = Some(PredefinedValue {
            kind,
            value: value.into(),
        });
        self
    }

    pub fn with_binding(mut self, binding: Binding) -> Self {
        self.binding = Some(binding);
        self
    }

    /// The value a component ends up with after applying the predefined value.
    ///
    /// | predefined     | configured | result     |
    /// |----------------|------------|------------|
    /// | fixed `v`      | any        | `v`        |
    /// | default `v`    | absent     | `v`        |
    /// | default `v`    | `c`        | `c`        |
    /// | none           | `c` / none | `c` / none |
    pub fn effective_value<'a>(&'a self, configured: Option<&'a str>) -> Option<&'a str> {
        match &self.predefined {
            Some(PredefinedValue {
                kind: ValueKind::Fixed,
                value,
            }) => Some(value.as_str()),
            Some(PredefinedValue {
                kind: ValueKind::Default,
                value,
            }) if configured.is_none() => Some(value.as_str()),
            _ => configured,
        }
    }

    pub fn check_restriction(&self, value: Option<&str>) -> bool {
        self.restriction.permits(value)
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Events and method wrappers
// ══════════════════════════════════════════════════════════════════════════════

/// A typed parameter of an event handler or a wrapped method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub ty: String,
    pub name: Option<String>,
}

impl Parameter {
    pub fn new(ty: impl Into<String>, name: Option<String>) -> Result<Self> {
        let ty = ty.into();
        if ty.trim().is_empty() {
            return Err(AcpError::config("Parameter type cannot be empty."));
        }
        Ok(Self {
            ty: ty.trim().to_string(),
            name: name.filter(|n| !n.trim().is_empty()),
        })
    }

    /// The parameter name, or a positional fallback.
    pub fn name_or(&self, index: usize) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("arg{index}"),
        }
    }
}

fn signature(
    result_type: Option<&str>,
    name: &str,
    parameters: &[Parameter],
    with_names: bool,
) -> String {
    let result = match result_type.map(str::trim) {
        Some(ty) if !ty.is_empty() => ty,
        _ => "void",
    };
    let params: Vec<String> = parameters
        .iter()
        .enumerate()
        .map(|(i, p)| {
            if with_names {
                format!("{} {}", p.ty, p.name_or(i))
            } else {
                p.ty.clone()
            }
        })
        .collect();
    format!("{result} {name}({})", params.join(", "))
}

/// An event a component can raise into user code.
#[derive(Debug, Clone)]
pub struct Event {
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub result_type: Option<String>,
    pub binding: Option<Binding>,
    pub description: String,
}

impl Event {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            result_type: None,
            binding: None,
            description: String::new(),
        }
    }

    /// Signature of a user handler for this event, e.g. `void onPress(int)`.
    pub fn handler_header(&self, handler: &str, with_names: bool) -> String {
        signature(
            self.result_type.as_deref(),
            handler,
            &self.parameters,
            with_names,
        )
    }
}

/// A free function generated to forward calls into a controller method, so
/// the method can be handed around as a plain function pointer.
#[derive(Debug, Clone)]
pub struct MethodWrapper {
    pub method: String,
    pub parameters: Vec<Parameter>,
    pub result_type: Option<String>,
    /// Name under which the generated wrapper is published to later templates.
    pub autogenerated_property: Option<String>,
    pub binding: Option<Binding>,
}

impl MethodWrapper {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            parameters: Vec::new(),
            result_type: None,
            autogenerated_property: None,
            binding: None,
        }
    }

    pub fn header(&self, wrapper_name: &str) -> String {
        signature(
            self.result_type.as_deref(),
            wrapper_name,
            &self.parameters,
            true,
        )
    }

    /// Call expression forwarding every wrapper parameter to `target`.
    pub fn invocation(&self, target: &str) -> String {
        let args: Vec<String> = (0..self.parameters.len())
            .map(|i| self.parameters[i].name_or(i))
            .collect();
        format!("{target}({})", args.join(", "))
    }

    pub fn returns_value(&self) -> bool {
        !matches!(self.result_type.as_deref().map(str::trim), None | Some("") | Some("void"))
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Loopers
// ══════════════════════════════════════════════════════════════════════════════

/// Interval or initial delay of a looper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Timing {
    Unset,
    Millis(i64),
    /// Read from the named property of the component.
    Property(String),
}

impl Timing {
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        if text.is_empty() {
            Self::Unset
        } else if let Ok(ms) = text.parse::<i64>() {
            Self::Millis(ms)
        } else {
            Self::Property(text.to_string())
        }
    }
}

/// A controller method invoked periodically by the generated scheduler.
#[derive(Debug, Clone)]
pub struct Looper {
    pub method: String,
    pub interval: Timing,
    pub initial_delay: Timing,
    /// Receives the numeric looper id so the controller can enable or
    /// disable itself at run time.
    pub id_binding: Option<Binding>,
}

impl Looper {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            interval: Timing::Unset,
            initial_delay: Timing::Unset,
            id_binding: None,
        }
    }

    fn validate(&self, component_type: &ComponentType) -> Result<()> {
        if self.method.trim().is_empty() {
            return Err(AcpError::config("Looper must have a looper method."));
        }
        for (what, timing) in [
            ("Interval", &self.interval),
            ("Initial delay", &self.initial_delay),
        ] {
            if let Timing::Property(name) = timing {
                if component_type.property(name).is_none() {
                    return Err(AcpError::config(format!(
                        "{what} of looper with method {} does not contain an integer value or property name.",
                        self.method
                    )));
                }
            }
        }
        Ok(())
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Instances
// ══════════════════════════════════════════════════════════════════════════════

/// `method(arguments)` invoked on an instance from `setup()` or `loop()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodCall {
    pub method: String,
    /// Argument template; `$name` placeholders expand to property values.
    pub arguments: String,
}

impl MethodCall {
    pub fn new(method: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            arguments: arguments.into(),
        }
    }
}

/// Descriptor of an object created for every component of a type.
///
/// `class_type`, `constructor` and call arguments are templates: `$name`
/// expands to the escaped effective value of property `name`, or to an
/// autogenerated property such as `$controller`.
#[derive(Debug, Clone, Default)]
pub struct Instance {
    /// Headers relative to the module directory.
    pub includes: Vec<String>,
    pub class_type: String,
    pub constructor: Option<String>,
    pub init: Option<MethodCall>,
    pub loop_call: Option<MethodCall>,
}

impl Instance {
    pub fn new(class_type: impl Into<String>) -> Self {
        Self {
            class_type: class_type.into(),
            ..Self::default()
        }
    }

    fn validate(&self, role: &str) -> Result<()> {
        if self.class_type.trim().is_empty() {
            return Err(AcpError::config(format!(
                "Invalid {role} instance description: class type cannot be empty."
            )));
        }
        Ok(())
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// ComponentType
// ══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default)]
pub struct ComponentType {
    pub view: Option<Instance>,
    pub controller: Option<Instance>,
    /// Hands the view object to the controller.
    pub view_binding: Option<Binding>,
    /// Declaration order is preserved; names are unique.
    pub properties: Vec<PropertyType>,
    pub events: Vec<Event>,
    pub loopers: Vec<Looper>,
    pub method_wrappers: Vec<MethodWrapper>,
}

impl ComponentType {
    pub fn property(&self, name: &str) -> Option<&PropertyType> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn event(&self, name: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.name == name)
    }

    /// Check the internal consistency of the contract.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for property in &self.properties {
            if property.name.trim().is_empty() {
                return Err(AcpError::config(
                    "Each component property must have a non-empty name.",
                ));
            }
            if !seen.insert(property.name.as_str()) {
                return Err(AcpError::config(format!(
                    "Duplicated property name ({}).",
                    property.name
                )));
            }
        }

        let mut seen = HashSet::new();
        for event in &self.events {
            if event.name.trim().is_empty() {
                return Err(AcpError::config(
                    "Each component event must have a non-empty name.",
                ));
            }
            if !seen.insert(event.name.as_str()) {
                return Err(AcpError::config(format!(
                    "Duplicated event name ({}).",
                    event.name
                )));
            }
        }

        if self.view_binding.is_some() && (self.view.is_none() || self.controller.is_none()) {
            return Err(AcpError::config(
                "View binding can be defined only if the component has a controller and a view.",
            ));
        }

        if let Some(view) = &self.view {
            view.validate("view")?;
            if view.init.is_some() {
                return Err(AcpError::config("Init method for views is not allowed."));
            }
            if view.loop_call.is_some() {
                return Err(AcpError::config("Loop method for views is not allowed."));
            }
        }

        if let Some(controller) = &self.controller {
            controller.validate("controller")?;
        }

        for looper in &self.loopers {
            looper.validate(self)?;
        }
        Ok(())
    }
}
