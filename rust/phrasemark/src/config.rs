//! Scanner and decoration settings.
//!
//! Every field has a default so hosts can send a partial JSON object.

use serde::{Deserialize, Serialize};

use crate::error::Result;

// =============================================================================
// Offset units
// =============================================================================

/// Coordinate space of reported spans
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OffsetUnit {
    /// Unicode scalar values
    #[default]
    Char,
    /// UTF-16 code units (JavaScript string indices)
    Utf16,
    /// UTF-8 bytes
    Byte,
}

impl OffsetUnit {
    /// Length of `text` in this unit
    pub fn measure(self, text: &str) -> usize {
        match self {
            OffsetUnit::Byte => text.len(),
            _ if text.is_ascii() => text.len(),
            OffsetUnit::Char => text.chars().count(),
            OffsetUnit::Utf16 => text.encode_utf16().count(),
        }
    }
}

// =============================================================================
// Decoration settings
// =============================================================================

/// Which pointer event opens the definition preview
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PopoverEvent {
    #[default]
    Hover,
    Click,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[default]
    Desktop,
    Mobile,
}

/// Underline appearance, emitted as CSS custom properties
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct UnderlineStyle {
    #[serde(default = "default_colour")]
    pub colour: String,
    #[serde(default = "default_style")]
    pub style: String,
}

fn default_colour() -> String {
    "var(--text-accent)".to_string()
}

fn default_style() -> String {
    "dotted".to_string()
}

impl Default for UnderlineStyle {
    fn default() -> Self {
        Self {
            colour: default_colour(),
            style: default_style(),
        }
    }
}

// =============================================================================
// ScannerConfig
// =============================================================================

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ScannerConfig {
    #[serde(default)]
    pub offset_unit: OffsetUnit,
    /// Render-tree annotation is skipped entirely when false
    #[serde(default = "default_true")]
    pub enable_in_reading_view: bool,
    #[serde(default)]
    pub popover_event: PopoverEvent,
    #[serde(default)]
    pub platform: Platform,
    #[serde(default)]
    pub decoration: UnderlineStyle,
}

fn default_true() -> bool {
    true
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            offset_unit: OffsetUnit::default(),
            enable_in_reading_view: true,
            popover_event: PopoverEvent::default(),
            platform: Platform::default(),
            decoration: UnderlineStyle::default(),
        }
    }
}

impl ScannerConfig {
    /// Parse a (possibly partial) JSON config
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
