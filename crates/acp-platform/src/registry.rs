//! Named platform variants.

use crate::rules;
use crate::ValueType;
use std::collections::BTreeMap;

/// Platform selected when a project leaves the platform name blank.
pub const DEFAULT_PLATFORM: &str = "Arduino";

/// Hardware capabilities of one target board.
///
/// Variants differ only in these counts; every value-type rule is shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    pub name: String,
    pub digital_pins: u32,
    pub analog_pins: u32,
    pub interrupts: u32,
    pub hardware_serials: u32,
    pub max_watchdog_level: u32,
}

impl Platform {
    /// Size of one value of `ty` in EEPROM; 0 for unsupported types.
    pub fn size_of(&self, ty: &str) -> u32 {
        ValueType::parse(ty).map(ValueType::size).unwrap_or(0)
    }

    /// C++ type of the EEPROM wrapper for an item stored at `offset`, or
    /// `None` when the type cannot be stored.
    pub fn eeprom_wrapper(
        &self,
        ty: &str,
        offset: u32,
        cached: bool,
        array_length: Option<u32>,
    ) -> Option<String> {
        let value_type = ValueType::parse(ty).filter(|t| t.size() > 0)?;
        let carrier = value_type.carrier(ty);
        Some(match (array_length, cached) {
            (None, false) => format!("acp::EEPROMVar<{carrier}, {offset}>"),
            (None, true) => format!("acp::EEPROMCachedVar<{carrier}, {offset}>"),
            (Some(len), false) => format!("acp::EEPROMArray<{carrier}, {offset}, {len}>"),
            (Some(len), true) => format!("acp::EEPROMCachedArray<{carrier}, {offset}, {len}>"),
        })
    }

    pub fn check_value(&self, ty: &str, value: Option<&str>) -> bool {
        rules::check_value(self, ty, value)
    }

    pub fn escape_value(&self, ty: &str, value: Option<&str>) -> Option<String> {
        rules::escape_value(ty, value)
    }

    /// Clamp a requested watchdog level to what the board supports.
    pub fn watchdog_level(&self, requested: u32) -> u32 {
        requested.min(self.max_watchdog_level)
    }
}

/// Registry mapping platform name → capability record.
#[derive(Debug, Clone)]
pub struct PlatformRegistry {
    platforms: BTreeMap<String, Platform>,
}

impl PlatformRegistry {
    /// Create a registry holding the built-in Arduino variants.
    pub fn new() -> Self {
        let mut reg = Self {
            platforms: BTreeMap::new(),
        };
        reg.add("Arduino", 0, 0, 0, 1);
        reg.add("ArduinoUno", 14, 6, 2, 1);
        reg.add("ArduinoNano", 14, 6, 2, 1);
        reg.add("ArduinoMega", 54, 16, 6, 4);
        reg
    }

    /// Look up a platform; a blank name selects [`DEFAULT_PLATFORM`].
    pub fn get(&self, name: &str) -> Option<&Platform> {
        let name = name.trim();
        let name = if name.is_empty() { DEFAULT_PLATFORM } else { name };
        self.platforms.get(name)
    }

    /// Add or replace a variant.
    pub fn register(&mut self, platform: Platform) {
        self.platforms.insert(platform.name.clone(), platform);
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.platforms.keys().map(String::as_str)
    }

    fn add(&mut self, name: &str, digital: u32, analog: u32, interrupts: u32, serials: u32) {
        self.register(Platform {
            name: name.to_string(),
            digital_pins: digital,
            analog_pins: analog,
            interrupts,
            hardware_serials: serials,
            max_watchdog_level: 9,
        });
    }
}

impl Default for PlatformRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let reg = PlatformRegistry::new();
        assert_eq!(reg.get("ArduinoMega").map(|p| p.digital_pins), Some(54));
        assert_eq!(reg.get(" ArduinoNano ").map(|p| p.interrupts), Some(2));
        assert_eq!(reg.get("").map(|p| p.name.as_str()), Some("Arduino"));
        assert!(reg.get("Esp32").is_none());
        assert_eq!(reg.names().count(), 4);
    }

    #[test]
    fn test_register_custom_variant() {
        let mut reg = PlatformRegistry::new();
        let mut board = reg.get("ArduinoUno").cloned().unwrap();
        board.name = "Leonardo".into();
        board.digital_pins = 20;
        reg.register(board);
        let leo = reg.get("Leonardo").unwrap();
        assert!(leo.check_value("digital-pin", Some("19")));
    }

    #[test]
    fn test_eeprom_wrappers() {
        let p = PlatformRegistry::new().get("Arduino").cloned().unwrap();
        assert_eq!(
            p.eeprom_wrapper("int", 4, false, None).as_deref(),
            Some("acp::EEPROMVar<int, 4>")
        );
        assert_eq!(
            p.eeprom_wrapper("unsigned long", 6, true, None).as_deref(),
            Some("acp::EEPROMCachedVar<unsigned long, 6>")
        );
        assert_eq!(
            p.eeprom_wrapper("digital-pin", 10, false, Some(3)).as_deref(),
            Some("acp::EEPROMArray<byte, 10, 3>")
        );
        assert_eq!(p.eeprom_wrapper("string", 4, false, None), None);
    }

    #[test]
    fn test_watchdog_clamp() {
        let p = PlatformRegistry::new().get("ArduinoUno").cloned().unwrap();
        assert_eq!(p.watchdog_level(4), 4);
        assert_eq!(p.watchdog_level(12), 9);
    }
}
