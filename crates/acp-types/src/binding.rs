use crate::AcpError;
use std::fmt;
use std::str::FromStr;

/// How a value is wired into a controller object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    /// `object.target = value;`
    Attribute,
    /// `object.target(value);`
    Method,
}

impl FromStr for BindingKind {
    type Err = AcpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "attribute" => Ok(Self::Attribute),
            "method" => Ok(Self::Method),
            _ => Err(AcpError::config(format!("Unknown binding type: {s}"))),
        }
    }
}

impl fmt::Display for BindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attribute => write!(f, "attribute"),
            Self::Method => write!(f, "method"),
        }
    }
}

/// A rule for wiring a computed value into an object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub kind: BindingKind,
    pub target: String,
}

impl Binding {
    pub fn new(kind: BindingKind, target: impl Into<String>) -> Self {
        Self {
            kind,
            target: target.into(),
        }
    }

    pub fn attribute(target: impl Into<String>) -> Self {
        Self::new(BindingKind::Attribute, target)
    }

    pub fn method(target: impl Into<String>) -> Self {
        Self::new(BindingKind::Method, target)
    }

    /// Render the binding as a single C++ statement.
    pub fn render(&self, object: &str, value: &str) -> String {
        match self.kind {
            BindingKind::Attribute => format!("{object}.{} = {value};", self.target),
            BindingKind::Method => format!("{object}.{}({value});", self.target),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_attribute() {
        let b = Binding::attribute("value");
        assert_eq!(b.render("ctrl", "42"), "ctrl.value = 42;");
    }

    #[test]
    fn test_render_method() {
        let b = Binding::method("setPin");
        assert_eq!(b.render("acp_private::controller_0", "13"), "acp_private::controller_0.setPin(13);");
    }

    #[test]
    fn test_kind_parse_is_case_insensitive() {
        assert_eq!("METHOD".parse::<BindingKind>().unwrap(), BindingKind::Method);
        assert_eq!("Attribute".parse::<BindingKind>().unwrap(), BindingKind::Attribute);
        let err = "field".parse::<BindingKind>().unwrap_err();
        assert!(err.is_config());
        assert!(err.message.contains("field"));
    }
}
