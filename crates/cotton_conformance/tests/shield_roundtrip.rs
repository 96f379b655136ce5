//! Shielding and restoring host syntax is lossless; unmasking is idempotent.

use cotton_compiler::unmask::unmask;
use cotton_conformance::{get_compiled, shield_roundtrip};
use cotton_markup::DUPE_ATTR_MARKER;

const SOURCES: &[&str] = &[
    "",
    "plain text",
    "{{ a }}{{ b }}",
    "{{ a }} {{ b }}",
    "{{ a }}\n\t{{ b }}",
    "<div{% if x %} class=\"on\"{% endif %}>",
    "<p class=\"{{ c }}\">  {% trans 'hi' %}  </p>",
    "{% cotton_verbatim %}  <c-x>{{ y }}</c-x>\n{% endcotton_verbatim %} {{ z }}",
    "{% cotton_verbatim %}a{% endcotton_verbatim %}{% cotton_verbatim %}b{% endcotton_verbatim %}",
    "{% if a %}\n  {% for i in l %}{{ i }},{% endfor %}\n{% endif %}",
    "{ not } {% unclosed",
];

#[test]
fn shield_then_restore_is_identity() {
    for src in SOURCES {
        assert_eq!(shield_roundtrip(src), *src, "round trip of {src:?}");
    }
}

#[test]
fn many_placeholders_restore_in_place() {
    let src: String = (0..25).map(|i| format!("<b>{{{{ v{i} }}}}</b>")).collect();
    assert_eq!(shield_roundtrip(&src), src);
}

#[test]
fn unmask_is_idempotent() {
    let masked = format!("<a class{DUPE_ATTR_MARKER}0A1B2=\"x\" id{DUPE_ATTR_MARKER}ffff0>");
    let once = unmask(&masked);
    assert_eq!(once, "<a class=\"x\" id>");
    assert_eq!(unmask(&once), once);
}

#[test]
fn compiled_output_carries_no_markers() {
    let out = get_compiled("<c-x class=\"a\" class=\"b\"><i id=\"1\" id=\"2\"></i></c-x>").unwrap();
    assert!(!out.contains(DUPE_ATTR_MARKER), "{out}");
    assert!(out.contains("<i id=\"1\" id=\"2\"></i>"), "{out}");
}
