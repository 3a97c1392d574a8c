use std::collections::BTreeMap;

/// Program event fired once from `setup()`.
pub const ON_START: &str = "OnStart";
/// Program event fired on every `loop()` pass.
pub const ON_LOOP: &str = "OnLoop";

/// A configured instance of a component type.
#[derive(Debug, Clone, Default)]
pub struct Component {
    /// Name of the component-type module.
    pub type_name: String,
    /// Unique within the project; also the name of the public view object.
    pub name: String,
    pub description: String,
    pub properties: BTreeMap<String, String>,
    /// Event name → user handler function.
    pub events: BTreeMap<String, String>,
}

impl Component {
    pub fn new(type_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    pub fn with_event(mut self, name: impl Into<String>, handler: impl Into<String>) -> Self {
        self.events.insert(name.into(), handler.into());
        self
    }

    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }
}

/// A variable or array stored in EEPROM.
#[derive(Debug, Clone, Default)]
pub struct EepromItem {
    pub name: String,
    pub ty: String,
    /// Initial value written when the stored layout version does not match.
    pub value: Option<String>,
    pub description: String,
    /// Keep a copy in SRAM so reads do not touch EEPROM.
    pub cached: bool,
    /// `Some(len)` for arrays.
    pub array_length: Option<u32>,
}

impl EepromItem {
    pub fn variable(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            ..Self::default()
        }
    }

    pub fn array(name: impl Into<String>, ty: impl Into<String>, length: u32) -> Self {
        Self {
            array_length: Some(length),
            ..Self::variable(name, ty)
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn cached(mut self) -> Self {
        self.cached = true;
        self
    }

    pub fn is_array(&self) -> bool {
        self.array_length.is_some()
    }

    /// The initial value, if one is set and non-blank.
    pub fn initial_value(&self) -> Option<&str> {
        self.value.as_deref().map(str::trim).filter(|v| !v.is_empty())
    }
}

/// A project: components, program settings and persistent variables.
#[derive(Debug, Clone, Default)]
pub struct Project {
    /// Platform variant name; blank selects the generic platform.
    pub platform: String,
    /// `None` disables the watchdog.
    pub watchdog_level: Option<u32>,
    pub components: Vec<Component>,
    pub library_imports: Vec<String>,
    /// Program event name (`OnStart`, `OnLoop`) → user handler.
    pub program_events: BTreeMap<String, String>,
    pub eeprom: Vec<EepromItem>,
    /// `""`/`"hash"`, `"random"` or a decimal number.
    pub eeprom_layout_version: String,
}

impl Project {
    pub fn component(&self, name: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.name == name)
    }

    pub fn program_event(&self, name: &str) -> Option<&str> {
        self.program_events.get(name).map(String::as_str)
    }

    /// Module names referenced directly by the project, in first-use order.
    pub fn referenced_modules(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        let types = self.components.iter().map(|c| &c.type_name);
        for name in types.chain(self.library_imports.iter()) {
            if !names.contains(name) {
                names.push(name.clone());
            }
        }
        names
    }
}
