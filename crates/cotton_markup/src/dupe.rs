//! Masking of repeated attribute keys.
//!
//! Template markup legitimately repeats attributes on one tag, e.g.
//! `<a {% if x %} class="on" {% else %} class="off" {% endif %}>`. Each repeat
//! is renamed to `<key>__COTTON_DUPE_ATTR__<5 hex>` so every key on a tag is
//! unique; the compiler strips the marker once the output is final.

use rand::Rng;

/// Marker inserted between a repeated key and its random suffix.
pub const DUPE_ATTR_MARKER: &str = "__COTTON_DUPE_ATTR__";

/// Length of the random hex suffix after [`DUPE_ATTR_MARKER`].
pub const DUPE_SUFFIX_LEN: usize = 5;

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Returns a masked key for `name` that does not collide with `seen`.
///
/// `seen` holds the lower-cased keys already present on the tag.
pub fn mask_duplicate(name: &str, seen: &[String]) -> String {
    let mut rng = rand::thread_rng();
    loop {
        let suffix: String = (0..DUPE_SUFFIX_LEN)
            .map(|_| HEX_DIGITS[rng.gen_range(0..HEX_DIGITS.len())] as char)
            .collect();
        let masked = format!("{name}{DUPE_ATTR_MARKER}{suffix}");
        let lowered = masked.to_ascii_lowercase();
        if !seen.iter().any(|s| *s == lowered) {
            return masked;
        }
    }
}
