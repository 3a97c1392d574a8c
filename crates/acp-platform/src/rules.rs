//! Value syntax checks and literal rendering shared by every platform variant.
//!
//! Each function takes the variant record only for its hardware counts; the
//! rules themselves are identical across variants.

use crate::{Platform, ValueType};

/// Whether `value` is a valid literal of the declared type on `platform`.
pub fn check_value(platform: &Platform, ty: &str, value: Option<&str>) -> bool {
    let Some(value_type) = ValueType::parse(ty) else {
        return false;
    };
    match value_type {
        // Strings may be absent; they render as NULL.
        ValueType::String | ValueType::FlashString => true,
        _ => match value {
            Some(value) => check_present(platform, value_type, value.trim()),
            None => false,
        },
    }
}

fn check_present(platform: &Platform, value_type: ValueType, value: &str) -> bool {
    match value_type {
        ValueType::Bool => value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("false"),
        ValueType::Char => char_literal(value).is_some(),
        ValueType::Integer { .. } => {
            let Some((min, max)) = value_type.integer_range() else {
                return false;
            };
            matches!(value.parse::<i64>(), Ok(n) if (min..=max).contains(&n))
        }
        ValueType::Float => matches!(value.parse::<f64>(), Ok(f) if f.is_finite()),
        ValueType::String | ValueType::FlashString => true,
        ValueType::AnalogPin => analog_pin(value).is_some_and(|n| n < platform.analog_pins),
        ValueType::DigitalPin => index_below(value, platform.digital_pins),
        ValueType::Pin => {
            check_present(platform, ValueType::AnalogPin, value)
                || check_present(platform, ValueType::DigitalPin, value)
        }
        ValueType::Interrupt => index_below(value, platform.interrupts),
        ValueType::HardwareSerial => serial_index(value).is_some_and(|n| n < platform.hardware_serials),
        ValueType::Enumeration => !value.is_empty(),
    }
}

/// Render `value` as a C++ literal of the declared type.
///
/// Returns `None` for unknown types and for absent values of types that have
/// no null literal.
pub fn escape_value(ty: &str, value: Option<&str>) -> Option<String> {
    let value_type = ValueType::parse(ty)?;
    match value_type {
        ValueType::String => Some(match value {
            Some(text) => format!("\"{}\"", escape_string(text)),
            None => "NULL".to_string(),
        }),
        ValueType::FlashString => Some(match value {
            Some(text) => format!("F(\"{}\")", escape_string(text)),
            None => "NULL".to_string(),
        }),
        _ => {
            let value = value?.trim();
            Some(match value_type {
                ValueType::Bool => value.to_ascii_lowercase(),
                ValueType::Char => format!("'{}'", char_literal(value)?),
                ValueType::Integer { suffix, .. } => format!("{value}{}", suffix.as_str()),
                _ => value.to_string(),
            })
        }
    }
}

/// Body of a C character literal for `value`, or `None` when `value` is not
/// a single character or a valid escape sequence. Blank means a space.
fn char_literal(value: &str) -> Option<String> {
    if value.is_empty() {
        return Some(" ".to_string());
    }
    if let Some(escape) = value.strip_prefix('\\') {
        let mut chars = escape.chars();
        let first = chars.next()?;
        if chars.next().is_none() && "\\'\"?abfnrtv".contains(first) {
            return Some(value.to_string());
        }
        let code = match escape.strip_prefix('x') {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => u32::from_str_radix(escape, 8).ok()?,
        };
        return (code <= 255).then(|| value.to_string());
    }
    let mut chars = value.chars();
    let c = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    Some(match c {
        '\'' => "\\'".to_string(),
        _ => c.to_string(),
    })
}

fn escape_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}

fn parse_index(text: &str) -> Option<u32> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

fn index_below(value: &str, count: u32) -> bool {
    parse_index(value).is_some_and(|n| n < count)
}

fn analog_pin(value: &str) -> Option<u32> {
    parse_index(value.strip_prefix('A')?)
}

/// `Serial` is index 0, `SerialN` is index N (N ≥ 1).
fn serial_index(value: &str) -> Option<u32> {
    let suffix = value.strip_prefix("Serial")?;
    if suffix.is_empty() {
        return Some(0);
    }
    parse_index(suffix).filter(|&n| n >= 1 && !suffix.starts_with('0'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PlatformRegistry;

    fn platform(name: &str) -> Platform {
        PlatformRegistry::new().get(name).cloned().unwrap()
    }

    fn ok(p: &Platform, ty: &str, v: &str) -> bool {
        check_value(p, ty, Some(v))
    }

    // ── numeric bounds ──

    #[test]
    fn test_unsigned_8_bit() {
        let p = platform("Arduino");
        assert!(ok(&p, "byte", "0"));
        assert!(ok(&p, "byte", "255"));
        assert!(!ok(&p, "byte", "256"));
        assert!(!ok(&p, "byte", "-1"));
        assert!(!ok(&p, "unsigned char", "x"));
    }

    #[test]
    fn test_signed_8_bit() {
        let p = platform("Arduino");
        assert!(ok(&p, "signed char", "-128"));
        assert!(ok(&p, "signed char", "127"));
        assert!(!ok(&p, "signed char", "128"));
    }

    #[test]
    fn test_32_bit() {
        let p = platform("Arduino");
        assert!(ok(&p, "unsigned long", "4294967295"));
        assert!(!ok(&p, "unsigned long", "4294967296"));
        assert!(ok(&p, "long", "-2147483648"));
        assert!(!ok(&p, "long", "2147483648"));
        assert!(ok(&p, "int", "-32768"));
        assert!(!ok(&p, "int", "32768"));
    }

    #[test]
    fn test_absent_values() {
        let p = platform("Arduino");
        assert!(!check_value(&p, "int", None));
        assert!(!check_value(&p, "bool", None));
        assert!(check_value(&p, "string", None));
        assert!(!check_value(&p, "no-such-type", Some("1")));
    }

    #[test]
    fn test_float_and_bool() {
        let p = platform("Arduino");
        assert!(ok(&p, "float", "1.5"));
        assert!(ok(&p, "double", "-2e3"));
        assert!(!ok(&p, "float", "inf"));
        assert!(!ok(&p, "float", "one"));
        assert!(ok(&p, "bool", "TRUE"));
        assert!(!ok(&p, "bool", "yes"));
    }

    #[test]
    fn test_char_literals() {
        let p = platform("Arduino");
        assert!(ok(&p, "char", "a"));
        assert!(ok(&p, "char", ""));
        assert!(ok(&p, "char", "\\n"));
        assert!(ok(&p, "char", "\\x41"));
        assert!(ok(&p, "char", "\\101"));
        assert!(!ok(&p, "char", "\\x100"));
        assert!(!ok(&p, "char", "\\q"));
        assert!(!ok(&p, "char", "ab"));
    }

    // ── hardware bounds ──

    #[test]
    fn test_pin_bounds_vary_by_variant() {
        let uno = platform("ArduinoUno");
        let mega = platform("ArduinoMega");
        assert!(ok(&uno, "digital-pin", "13"));
        assert!(!ok(&uno, "digital-pin", "14"));
        assert!(ok(&mega, "digital-pin", "53"));
        assert!(!ok(&mega, "digital-pin", "54"));
        assert!(ok(&uno, "analog-pin", "A5"));
        assert!(!ok(&uno, "analog-pin", "A6"));
        assert!(ok(&mega, "analog-pin", "A15"));
        assert!(!ok(&uno, "analog-pin", "5"));
        assert!(ok(&uno, "pin", "A0"));
        assert!(ok(&uno, "pin", "7"));
        assert!(!ok(&platform("Arduino"), "pin", "0"));
    }

    #[test]
    fn test_interrupts_and_serials() {
        let uno = platform("ArduinoUno");
        let mega = platform("ArduinoMega");
        assert!(ok(&uno, "interrupt", "1"));
        assert!(!ok(&uno, "interrupt", "2"));
        assert!(ok(&mega, "interrupt", "5"));
        assert!(ok(&uno, "hardware-serial", "Serial"));
        assert!(!ok(&uno, "hardware-serial", "Serial1"));
        assert!(ok(&mega, "hardware-serial", "Serial3"));
        assert!(!ok(&mega, "hardware-serial", "Serial4"));
        assert!(!ok(&mega, "hardware-serial", "Serial0"));
    }

    #[test]
    fn test_enumeration() {
        let p = platform("Arduino");
        assert!(ok(&p, "enumeration", "MODE_FAST"));
        assert!(!ok(&p, "enumeration", "   "));
    }

    // ── escaping ──

    #[test]
    fn test_escape_integers() {
        assert_eq!(escape_value("unsigned int", Some("5")).as_deref(), Some("5u"));
        assert_eq!(escape_value("unsigned long", Some("100")).as_deref(), Some("100ul"));
        assert_eq!(escape_value("long", Some("-3")).as_deref(), Some("-3l"));
        assert_eq!(escape_value("int", Some(" 42 ")).as_deref(), Some("42"));
        assert_eq!(escape_value("byte", None), None);
    }

    #[test]
    fn test_escape_text() {
        assert_eq!(escape_value("bool", Some("True")).as_deref(), Some("true"));
        assert_eq!(escape_value("char", Some("x")).as_deref(), Some("'x'"));
        assert_eq!(escape_value("char", Some("'")).as_deref(), Some("'\\''"));
        assert_eq!(escape_value("string", Some("hi")).as_deref(), Some("\"hi\""));
        assert_eq!(escape_value("string", Some("a\"b")).as_deref(), Some("\"a\\\"b\""));
        assert_eq!(escape_value("string", None).as_deref(), Some("NULL"));
        assert_eq!(escape_value("f-string", Some("hi")).as_deref(), Some("F(\"hi\")"));
        assert_eq!(escape_value("analog-pin", Some("A2")).as_deref(), Some("A2"));
        assert_eq!(escape_value("mystery", Some("1")), None);
    }
}
