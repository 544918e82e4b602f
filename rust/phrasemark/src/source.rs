//! Definition sources: the records a dictionary is built from.
//!
//! Reading and writing definition files happens in the host. This module only
//! fixes the shape of what the host hands over, plus the rules it uses to
//! decide how a definition file is laid out.

use serde::{Deserialize, Serialize};

use crate::scanner::dictionary::normalize_phrase;

/// Frontmatter key naming a definition file's layout
pub const DEF_TYPE_FM: &str = "def-type";

// =============================================================================
// File types
// =============================================================================

/// Layout of a definition file
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DefFileType {
    /// Many definitions in one file
    Consolidated,
    /// One definition per file
    Atomic,
}

impl DefFileType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DefFileType::Consolidated => "consolidated",
            DefFileType::Atomic => "atomic",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "consolidated" => Some(DefFileType::Consolidated),
            "atomic" => Some(DefFileType::Atomic),
            _ => None,
        }
    }
}

/// Decide a definition file's layout.
///
/// Order: the cached frontmatter value, then a sniff of the raw content for a
/// leading `def-type` line, then the configured default, then `Consolidated`.
pub fn resolve_def_file_type(
    frontmatter_value: Option<&str>,
    content: Option<&str>,
    configured_default: Option<DefFileType>,
) -> DefFileType {
    if let Some(file_type) = frontmatter_value.and_then(DefFileType::parse) {
        return file_type;
    }

    if let Some(content) = content {
        for file_type in [DefFileType::Atomic, DefFileType::Consolidated] {
            let header = format!("---\n{}: {}", DEF_TYPE_FM, file_type.as_str());
            if content.starts_with(&header) {
                return file_type;
            }
        }
    }

    configured_default.unwrap_or(DefFileType::Consolidated)
}

/// Split a comma-separated alias field, dropping blanks
pub fn parse_aliases(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|alias| !alias.is_empty())
        .map(str::to_string)
        .collect()
}

// =============================================================================
// Records
// =============================================================================

/// Where a record is persisted. Opaque to the scanner.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct SourceLocation {
    pub path: String,
    #[serde(default)]
    pub file_type: Option<DefFileType>,
    /// Position within a consolidated file, if any
    #[serde(default)]
    pub position: Option<usize>,
}

/// Shape accepted from hosts; the key is always derived, never trusted
#[derive(Deserialize)]
struct DefinitionInput {
    word: String,
    #[serde(default)]
    aliases: Vec<String>,
    #[serde(default)]
    body: String,
    #[serde(default)]
    source: Option<SourceLocation>,
}

impl From<DefinitionInput> for DefinitionRecord {
    fn from(input: DefinitionInput) -> Self {
        let record = DefinitionRecord::new(&input.word, input.aliases, &input.body);
        match input.source {
            Some(source) => record.with_source(source),
            None => record,
        }
    }
}

/// A defined phrase with its aliases and body
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(from = "DefinitionInput")]
pub struct DefinitionRecord {
    /// Normalized primary phrase
    pub key: String,
    /// Phrase as authored
    pub word: String,
    pub aliases: Vec<String>,
    pub body: String,
    pub source: Option<SourceLocation>,
}

impl DefinitionRecord {
    pub fn new(word: &str, aliases: Vec<String>, body: &str) -> Self {
        Self {
            key: normalize_phrase(word),
            word: word.to_string(),
            aliases,
            body: body.to_string(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: SourceLocation) -> Self {
        self.source = Some(source);
        self
    }

    /// Primary phrase followed by every alias
    pub fn phrases(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.word.as_str()).chain(self.aliases.iter().map(String::as_str))
    }
}
