//! Replaces host template syntax with inert placeholder tokens.
//!
//! `{% ... %}` and `{{ ... }}` may contain quotes, `<`, `>` and `=`, none of
//! which survive a markup parser intact. Each occurrence is swapped for a
//! numbered token before parsing and swapped back by [`crate::restore`].

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Prefix of every placeholder token.
pub const PLACEHOLDER_PREFIX: &str = "__django_syntax__";

static VERBATIM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\{% cotton_verbatim %\}(.*?)\{% endcotton_verbatim %\}")
        .expect("verbatim pattern is valid")
});

static HOST_SYNTAX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{%.*?%\}|\{\{.*?\}\}").expect("host syntax pattern is valid")
});

/// What a placeholder stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaceholderKind {
    /// The inner content of a verbatim block; restored by plain substitution.
    Verbatim,
    /// A `{% %}` tag or `{{ }}` expression.
    HostSyntax {
        /// The character before the original text was whitespace.
        leading_space: bool,
        /// The character after the original text was whitespace.
        trailing_space: bool,
    },
}

/// One shielded region of the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    /// Kind and surrounding whitespace.
    pub kind: PlaceholderKind,
    /// The text the token replaces.
    pub original: String,
}

/// Output of [`shield`]: the rewritten text and its placeholders.
///
/// Placeholder `n` (1-based) corresponds to `placeholders[n - 1]`.
#[derive(Debug, Clone, Default)]
pub struct Shielded {
    /// Source text with every protected region replaced by a token.
    pub text: String,
    /// Placeholders in the order their tokens were inserted.
    pub placeholders: Vec<Placeholder>,
}

/// Returns the token for the placeholder with 1-based ordinal `n`.
pub fn placeholder_token(n: usize) -> String {
    format!("{PLACEHOLDER_PREFIX}{n}__")
}

/// Shields verbatim blocks, then host syntax, left to right.
///
/// Verbatim blocks become a bare token. Host syntax becomes the token padded
/// with one space on each side; the whitespace that surrounded the original
/// text is left in place and only recorded.
pub fn shield(source: &str) -> Shielded {
    let mut placeholders = Vec::new();

    let text = VERBATIM.replace_all(source, |caps: &Captures<'_>| {
        placeholders.push(Placeholder {
            kind: PlaceholderKind::Verbatim,
            original: caps[1].to_string(),
        });
        placeholder_token(placeholders.len())
    });

    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for m in HOST_SYNTAX.find_iter(&text) {
        let leading_space = text[..m.start()]
            .chars()
            .next_back()
            .is_some_and(char::is_whitespace);
        let trailing_space = text[m.end()..]
            .chars()
            .next()
            .is_some_and(char::is_whitespace);
        placeholders.push(Placeholder {
            kind: PlaceholderKind::HostSyntax {
                leading_space,
                trailing_space,
            },
            original: m.as_str().to_string(),
        });
        out.push_str(&text[last..m.start()]);
        out.push(' ');
        out.push_str(&placeholder_token(placeholders.len()));
        out.push(' ');
        last = m.end();
    }
    out.push_str(&text[last..]);

    tracing::debug!(placeholders = placeholders.len(), "shielded host syntax");
    Shielded {
        text: out,
        placeholders,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host(leading_space: bool, trailing_space: bool) -> PlaceholderKind {
        PlaceholderKind::HostSyntax {
            leading_space,
            trailing_space,
        }
    }

    #[test]
    fn token_format() {
        assert_eq!(placeholder_token(1), "__django_syntax__1__");
        assert_eq!(placeholder_token(12), "__django_syntax__12__");
    }

    #[test]
    fn expressions_and_tags_in_source_order() {
        let s = shield("a {{ x }} b{% if y %}c");
        assert_eq!(
            s.text,
            "a  __django_syntax__1__  b __django_syntax__2__ c"
        );
        assert_eq!(s.placeholders.len(), 2);
        assert_eq!(s.placeholders[0].original, "{{ x }}");
        assert_eq!(s.placeholders[0].kind, host(true, true));
        assert_eq!(s.placeholders[1].original, "{% if y %}");
        assert_eq!(s.placeholders[1].kind, host(false, false));
    }

    #[test]
    fn verbatim_is_extracted_first() {
        let s = shield("<pre>{% cotton_verbatim %}<c-x>{{ y }}</c-x>{% endcotton_verbatim %}</pre>{{ z }}");
        assert_eq!(s.text, "<pre>__django_syntax__1__</pre> __django_syntax__2__ ");
        assert_eq!(s.placeholders[0].kind, PlaceholderKind::Verbatim);
        assert_eq!(s.placeholders[0].original, "<c-x>{{ y }}</c-x>");
        assert_eq!(s.placeholders[1].original, "{{ z }}");
    }

    #[test]
    fn verbatim_spans_lines() {
        let s = shield("{% cotton_verbatim %}\n<c-a />\n{% endcotton_verbatim %}");
        assert_eq!(s.text, "__django_syntax__1__");
        assert_eq!(s.placeholders[0].original, "\n<c-a />\n");
    }

    #[test]
    fn host_syntax_does_not_span_lines() {
        let s = shield("{% if\nx %}");
        assert!(s.placeholders.is_empty());
        assert_eq!(s.text, "{% if\nx %}");
    }

    #[test]
    fn adjacent_to_tag_boundary() {
        let s = shield("<div{% if a %}>");
        assert_eq!(s.text, "<div __django_syntax__1__ >");
        assert_eq!(s.placeholders[0].kind, host(false, false));
    }

    #[test]
    fn nothing_to_shield() {
        let s = shield("<p>plain</p>");
        assert_eq!(s.text, "<p>plain</p>");
        assert!(s.placeholders.is_empty());
    }
}
