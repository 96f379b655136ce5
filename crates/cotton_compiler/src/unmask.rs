//! Removes the duplicate-attribute markers added by the markup parser.

use std::sync::LazyLock;

use regex::Regex;

static DUPE_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)__COTTON_DUPE_ATTR__[0-9A-F]{5}").expect("dupe marker pattern is valid")
});

/// Strips every duplicate marker and its suffix, restoring the original keys.
///
/// Applying this to already unmasked text returns it unchanged.
pub fn unmask(text: &str) -> String {
    DUPE_MARKER.replace_all(text, "").into_owned()
}
