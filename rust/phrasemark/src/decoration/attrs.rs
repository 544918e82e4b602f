//! Attributes attached to every decorated phrase.

use std::collections::BTreeMap;

use crate::config::{Platform, PopoverEvent, ScannerConfig};

/// Class carried by every decorated span
pub const DEF_DECORATION_CLS: &str = "def-decoration";

/// Attribute carrying the normalized phrase
pub const DEF_ATTR: &str = "def";

/// Host callback opening the definition preview for the decorated element
pub const PREVIEW_TRIGGER: &str =
    "event.stopPropagation();activeWindow.NoteDefinition.triggerDefPreview(this);";

/// Attribute map for a decorated phrase.
///
/// Mobile hosts always open previews on click and take no inline style.
pub fn decoration_attrs(phrase: &str, config: &ScannerConfig) -> BTreeMap<String, String> {
    let mut attributes = BTreeMap::new();
    attributes.insert(DEF_ATTR.to_string(), phrase.to_string());

    if config.platform == Platform::Mobile {
        attributes.insert("onclick".to_string(), PREVIEW_TRIGGER.to_string());
        return attributes;
    }

    let trigger = match config.popover_event {
        PopoverEvent::Click => "onclick",
        PopoverEvent::Hover => "onmouseenter",
    };
    attributes.insert(trigger.to_string(), PREVIEW_TRIGGER.to_string());
    attributes.insert(
        "style".to_string(),
        format!(
            "--custom-underline-color:{};--custom-underline-style:{};",
            config.decoration.colour, config.decoration.style
        ),
    );
    attributes
}
