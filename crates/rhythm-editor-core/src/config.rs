use serde::{Deserialize, Serialize};

/// Zero-width space. Gives an empty region something to put a caret in
/// without taking up visible width.
pub const DEFAULT_PLACEHOLDER: &str = "\u{200B}";

/// Per-root editor options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Filler rendered into regions whose intended value is empty.
    pub placeholder: String,
    /// Cancel the native default for insertions as well as deletions. Off by
    /// default, so typed text shows up before the host re-renders.
    pub suppress_native_insertion: bool,
    /// Collapse "start of an inline region" onto "end of the inline region
    /// before it". Placeholder clamping applies either way.
    pub normalize_adjacent_inline: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            placeholder: DEFAULT_PLACEHOLDER.to_owned(),
            suppress_native_insertion: false,
            normalize_adjacent_inline: true,
        }
    }
}

impl EditorConfig {
    /// Text to render into a region holding `value`.
    pub fn display_text<'a>(&'a self, value: &'a str) -> &'a str {
        if value.is_empty() {
            &self.placeholder
        } else {
            value
        }
    }
}
