//! Reinstates the text hidden by [`crate::shield`].

use crate::shield::{placeholder_token, Placeholder, PlaceholderKind};

/// Replaces every placeholder token in `text` with its original content.
///
/// Host syntax is restored first, in ordinal order, then verbatim blocks. For
/// host syntax the padding added by the shielder is removed: on a side where
/// the original text had adjacent whitespace at most one space is absorbed, on
/// a side where it had none all whitespace next to the token is absorbed, so
/// `<div{% if a %}>` never gains a space that would change the tag name.
/// Verbatim content goes in last as a plain substring so its own edge
/// whitespace is never absorbed.
pub fn restore(text: &str, placeholders: &[Placeholder]) -> String {
    let mut out = text.to_string();
    for (i, placeholder) in placeholders.iter().enumerate() {
        if let PlaceholderKind::HostSyntax {
            leading_space,
            trailing_space,
        } = placeholder.kind
        {
            let token = placeholder_token(i + 1);
            out = replace_padded(
                &out,
                &token,
                &placeholder.original,
                leading_space,
                trailing_space,
            );
        }
    }
    for (i, placeholder) in placeholders.iter().enumerate() {
        if placeholder.kind == PlaceholderKind::Verbatim {
            out = out.replace(&placeholder_token(i + 1), &placeholder.original);
        }
    }
    out
}

fn replace_padded(
    text: &str,
    token: &str,
    original: &str,
    leading_space: bool,
    trailing_space: bool,
) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(at) = rest.find(token) {
        let before = &rest[..at];
        let kept = if leading_space {
            before.strip_suffix(' ').unwrap_or(before)
        } else {
            before.trim_end()
        };
        out.push_str(kept);
        out.push_str(original);

        let after = &rest[at + token.len()..];
        rest = if trailing_space {
            after.strip_prefix(' ').unwrap_or(after)
        } else {
            after.trim_start()
        };
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shield::shield;

    fn roundtrip(src: &str) {
        let shielded = shield(src);
        assert_eq!(
            restore(&shielded.text, &shielded.placeholders),
            src,
            "round trip of {src:?}"
        );
    }

    #[test]
    fn shield_restore_is_identity() {
        roundtrip("a {{x}} b");
        roundtrip("{{a}} {{b}}");
        roundtrip("{{a}}{{b}}");
        roundtrip("{{ a }}\n{{ b }}\n");
        roundtrip("  {% if x %}\n    <p>{{ y|default:\"z\" }}</p>\n  {% endif %}  ");
        roundtrip("<div{% if 1 = 1 %} attr1=\"variable\" {% endif %}></div>");
        roundtrip("{% cotton_verbatim %} <c-x /> {% endcotton_verbatim %}{{ v }}");
        roundtrip("{{ v }}{% cotton_verbatim %}\n{{ raw }}\n{% endcotton_verbatim %}{{ w }}");
        roundtrip("no syntax at all");
        roundtrip("");
    }

    #[test]
    fn absorbs_whitespace_when_original_had_none() {
        let placeholders = vec![Placeholder {
            kind: PlaceholderKind::HostSyntax {
                leading_space: false,
                trailing_space: false,
            },
            original: "{% x %}".to_string(),
        }];
        assert_eq!(
            restore("<div \n __django_syntax__1__  >", &placeholders),
            "<div{% x %}>"
        );
    }

    #[test]
    fn keeps_original_space() {
        let placeholders = vec![Placeholder {
            kind: PlaceholderKind::HostSyntax {
                leading_space: true,
                trailing_space: true,
            },
            original: "{{ v }}".to_string(),
        }];
        assert_eq!(
            restore("a  __django_syntax__1__  b", &placeholders),
            "a {{ v }} b"
        );
    }

    #[test]
    fn ordinal_tokens_do_not_collide() {
        let src = (1..=12).map(|i| format!("{{{{ v{i} }}}}")).collect::<String>();
        roundtrip(&src);
    }

    #[test]
    fn verbatim_content_is_literal() {
        let placeholders = vec![Placeholder {
            kind: PlaceholderKind::Verbatim,
            original: "$1 {{ x }}".to_string(),
        }];
        assert_eq!(
            restore("<pre>__django_syntax__1__</pre>", &placeholders),
            "<pre>$1 {{ x }}</pre>"
        );
    }
}
