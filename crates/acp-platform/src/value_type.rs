//! The value types a property or EEPROM item can be declared with.

/// Integer literal suffix used when rendering values of a C integer type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suffix {
    Plain,
    /// `u`
    Unsigned,
    /// `l`
    Long,
    /// `ul`
    UnsignedLong,
}

impl Suffix {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Plain => "",
            Self::Unsigned => "u",
            Self::Long => "l",
            Self::UnsignedLong => "ul",
        }
    }
}

/// A classified declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Bool,
    Char,
    Integer {
        signed: bool,
        bytes: u32,
        suffix: Suffix,
    },
    Float,
    /// `"text"` or `NULL`.
    String,
    /// `F("text")`, kept in flash memory.
    FlashString,
    /// `A0`, `A1`, ...
    AnalogPin,
    DigitalPin,
    /// Either an analog or a digital pin.
    Pin,
    Interrupt,
    /// `Serial`, `Serial1`, ...
    HardwareSerial,
    /// Any non-blank identifier.
    Enumeration,
}

impl ValueType {
    /// Classify a declared type name. Unknown names yield `None`.
    pub fn parse(name: &str) -> Option<Self> {
        use Suffix::*;
        let int = |signed, bytes, suffix| Self::Integer {
            signed,
            bytes,
            suffix,
        };
        let ty = match name.trim() {
            "bool" => Self::Bool,
            "char" => Self::Char,
            "byte" | "unsigned char" | "uint8_t" => int(false, 1, Plain),
            "signed char" | "int8_t" => int(true, 1, Plain),
            "word" | "uint16_t" => int(false, 2, Plain),
            "unsigned int" => int(false, 2, Unsigned),
            "int" | "signed int" | "int16_t" => int(true, 2, Plain),
            "unsigned long" | "uint32_t" => int(false, 4, UnsignedLong),
            "long" | "signed long" | "int32_t" => int(true, 4, Long),
            "float" | "double" => Self::Float,
            "string" => Self::String,
            "f-string" => Self::FlashString,
            "analog-pin" => Self::AnalogPin,
            "digital-pin" => Self::DigitalPin,
            "pin" => Self::Pin,
            "interrupt" => Self::Interrupt,
            "hardware-serial" => Self::HardwareSerial,
            "enumeration" => Self::Enumeration,
            _ => return None,
        };
        Some(ty)
    }

    /// Bytes occupied by one value in EEPROM; 0 when the type cannot be stored.
    pub fn size(self) -> u32 {
        match self {
            Self::Bool | Self::Char => 1,
            Self::Integer { bytes, .. } => bytes,
            Self::Float => 4,
            Self::AnalogPin | Self::DigitalPin | Self::Pin | Self::Interrupt => 1,
            Self::Enumeration => 2,
            Self::String | Self::FlashString | Self::HardwareSerial => 0,
        }
    }

    /// The C type holding a value of a domain-specific type; primitive types
    /// keep their declared name.
    pub fn carrier<'a>(self, declared: &'a str) -> &'a str {
        match self {
            Self::AnalogPin | Self::DigitalPin | Self::Pin | Self::Interrupt => "byte",
            Self::Enumeration => "int",
            _ => declared.trim(),
        }
    }

    /// Inclusive range of an integer type.
    pub fn integer_range(self) -> Option<(i64, i64)> {
        match self {
            Self::Integer { signed: true, bytes, .. } => {
                let half = 1i64 << (bytes * 8 - 1);
                Some((-half, half - 1))
            }
            Self::Integer { signed: false, bytes, .. } => Some((0, (1i64 << (bytes * 8)) - 1)),
            _ => None,
        }
    }
}
