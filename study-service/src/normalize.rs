//! Cleanup of model output before it is parsed or returned.
//!
//! Models sometimes wrap their answer in Markdown code fences even when told
//! not to. Accepted markers:
//!
//! - the JSON-tagged fence: "```json"
//! - the generic fence: "```"
//!
//! Markers are removed wherever they appear, and surrounding whitespace is
//! trimmed. Text without markers comes back trimmed and otherwise untouched.

/// JSON-tagged opening fence.
pub const JSON_FENCE: &str = "```json";

/// Generic fence, used both to open and to close a block.
pub const GENERIC_FENCE: &str = "```";

/// Strip both the JSON-tagged and the generic fence markers.
pub fn strip_code_fences(raw: &str) -> String {
    let trimmed = raw.trim();
    if !trimmed.contains(GENERIC_FENCE) {
        return trimmed.to_string();
    }

    trimmed
        .replace(JSON_FENCE, "")
        .replace(GENERIC_FENCE, "")
        .trim()
        .to_string()
}

/// Strip generic fence markers only, leaving other text as-is.
pub fn strip_generic_fences(raw: &str) -> String {
    let trimmed = raw.trim();
    if !trimmed.contains(GENERIC_FENCE) {
        return trimmed.to_string();
    }

    trimmed.replace(GENERIC_FENCE, "").trim().to_string()
}
