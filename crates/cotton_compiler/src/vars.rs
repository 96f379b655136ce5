//! Wraps a component template declaring `<c-vars>` in a vars frame.

use cotton_markup::{parse, Attribute, Document};

use crate::directive::{LITERAL_MARKER, VARS_FRAME_CLOSE, VARS_FRAME_OPEN, VARS_TAG};

/// Replaces a top-level `<c-vars>` declaration with a vars frame around the
/// rest of the document.
///
/// Returns the document unchanged when there is no declaration. Otherwise the
/// declaration is removed, the remaining markup is trimmed and wrapped in
/// `{% cotton_vars_frame ... %}` / `{% endcotton_vars_frame %}`, and the
/// result is parsed into a new document.
pub fn wrap_vars_frame(mut doc: Document) -> Document {
    let Some(vars) = doc.find_top_level(VARS_TAG) else {
        return doc;
    };
    let bindings: Vec<String> = doc
        .element(vars)
        .map(|el| el.attrs.iter().map(binding).collect())
        .unwrap_or_default();
    doc.remove(vars);

    tracing::debug!(vars = bindings.len(), "wrapping template in vars frame");
    let body = doc.to_html();
    let wrapped = format!(
        "{{% {VARS_FRAME_OPEN} {} %}}{}{{% {VARS_FRAME_CLOSE} %}}",
        bindings.join(" "),
        body.trim()
    );
    parse(&wrapped)
}

/// Builds the frame argument for one declared var.
///
/// The left side keeps the declared name; the right side reads the value the
/// component received, whose key has `-` replaced by `_`.
fn binding(attr: &Attribute) -> String {
    let Some(value) = attr.value.as_deref() else {
        let accessible = attr.name.replace('-', "_");
        return format!("{}={accessible}", attr.name);
    };
    match attr.name.strip_prefix(LITERAL_MARKER) {
        Some(name) => {
            let accessible = name.replace('-', "_");
            format!("{name}={accessible}|eval_default:\"{}\"", escape(value))
        }
        None => {
            let accessible = attr.name.replace('-', "_");
            format!("{}={accessible}|default:\"{}\"", attr.name, escape(value))
        }
    }
}

/// Escapes a value for use inside a double-quoted filter argument.
fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
