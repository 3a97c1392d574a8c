//! EEPROM layout allocation and layout versioning.
//!
//! The first [`VERSION_BYTES`] bytes hold the layout version written by the
//! generated code; items follow in declaration order. When the stored version
//! differs from the compiled one, the generated setup code rewrites every
//! initial value.

use acp_platform::Platform;
use acp_types::{AcpError, EepromItem, Result};
use rand::Rng;
use sha2::{Digest, Sha256};

/// Bytes reserved for the stored layout version.
pub const VERSION_BYTES: u32 = 4;

/// One allocated EEPROM item.
#[derive(Debug, Clone)]
pub struct EepromSlot<'a> {
    pub item: &'a EepromItem,
    pub offset: u32,
    pub size: u32,
    /// `acp::EEPROMVar<int, 4> name;`
    pub declaration: String,
}

impl EepromSlot<'_> {
    pub fn extern_declaration(&self) -> String {
        format!("extern {}", self.declaration)
    }

    /// Statement storing the initial value, if the item has one.
    pub fn initialization(&self, platform: &Platform) -> Result<Option<String>> {
        let Some(value) = self.item.initial_value() else {
            return Ok(None);
        };
        let escaped = platform
            .check_value(&self.item.ty, Some(value))
            .then(|| platform.escape_value(&self.item.ty, Some(value)))
            .flatten()
            .ok_or_else(|| {
                AcpError::compile(format!(
                    "The value '{value}' is not valid initialization value for the eeprom variable '{}'.",
                    self.item.name
                ))
            })?;
        let method = if self.item.is_array() { "fill" } else { "setValue" };
        Ok(Some(format!("{}.{method}({escaped});", self.item.name)))
    }
}

/// Offsets of all EEPROM items.
#[derive(Debug, Clone, Default)]
pub struct EepromLayout<'a> {
    pub slots: Vec<EepromSlot<'a>>,
    /// Total bytes used, version marker included; 0 without items.
    pub usage: u32,
}

impl EepromLayout<'_> {
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn declarations(&self) -> Vec<String> {
        self.slots.iter().map(|s| s.declaration.clone()).collect()
    }
}

/// Assign offsets to `items` in declaration order.
pub fn allocate<'a>(platform: &Platform, items: &'a [EepromItem]) -> Result<EepromLayout<'a>> {
    let mut offset = VERSION_BYTES;
    let mut slots = Vec::with_capacity(items.len());
    for item in items {
        let unsupported = || {
            AcpError::compile(format!(
                "Type '{}' of eeprom item '{}' is not supported as a type of an eeprom variable.",
                item.ty, item.name
            ))
        };
        let element_size = platform.size_of(&item.ty);
        if element_size == 0 {
            return Err(unsupported());
        }
        let too_large = || {
            AcpError::compile(format!(
                "EEPROM layout of item '{}' exceeds the addressable size.",
                item.name
            ))
        };
        let size = element_size
            .checked_mul(item.array_length.unwrap_or(1))
            .ok_or_else(too_large)?;
        let next_offset = offset.checked_add(size).ok_or_else(too_large)?;
        let wrapper = platform
            .eeprom_wrapper(&item.ty, offset, item.cached, item.array_length)
            .ok_or_else(unsupported)?;
        slots.push(EepromSlot {
            item,
            offset,
            size,
            declaration: format!("{wrapper} {};", item.name),
        });
        offset = next_offset;
    }
    let usage = if slots.is_empty() { 0 } else { offset };
    Ok(EepromLayout { slots, usage })
}

// ══════════════════════════════════════════════════════════════════════════════
// Layout version
// ══════════════════════════════════════════════════════════════════════════════

/// How the layout version is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionMode {
    /// A fresh value on every compile, so flashed devices always reset.
    Random,
    /// Derived from the item declarations.
    Hash,
    Fixed(u32),
}

impl VersionMode {
    pub fn parse(directive: &str) -> Result<Self> {
        match directive.trim() {
            "random" => Ok(Self::Random),
            "" | "hash" => Ok(Self::Hash),
            other => other
                .parse::<i64>()
                .ok()
                .and_then(|v| u32::try_from(v.unsigned_abs()).ok())
                .map(Self::Fixed)
                .ok_or_else(|| {
                    AcpError::compile(format!(
                        "Invalid layout version of eeprom memory: '{other}'."
                    ))
                }),
        }
    }

    /// Compute the version for the given declaration lines.
    pub fn version(self, declarations: &[String]) -> u32 {
        match self {
            Self::Random => rand::thread_rng().gen_range(0..1u32 << 24),
            Self::Hash => declaration_hash(declarations),
            Self::Fixed(v) => v,
        }
    }
}

/// Stable 31-bit hash of the concatenated declarations.
pub fn declaration_hash(declarations: &[String]) -> u32 {
    let mut hasher = Sha256::new();
    for line in declarations {
        hasher.update(line.as_bytes());
    }
    let digest = hasher.finalize();
    let bytes = [digest[0], digest[1], digest[2], digest[3]];
    u32::from_be_bytes(bytes) & 0x7fff_ffff
}
