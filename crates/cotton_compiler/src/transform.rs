//! Rewrites cotton component and slot tags into directive pairs.

use cotton_markup::{parse, Attribute, Document, Element, NodeId};

use crate::directive::{
    COMPONENT_CLOSE, COMPONENT_OPEN, COMPONENT_PREFIX, EXPRESSION_ATTR, SLOT_CLOSE, SLOT_OPEN,
    SLOT_TAG,
};
use crate::shield::PLACEHOLDER_PREFIX;

/// Depth-first rewriter for cotton tags.
///
/// Every element whose name starts with `c-` is replaced in place by the
/// parsed form of its compiled directive string. Content of a component is
/// compiled as a separate fragment first, so nested components and slots
/// resolve before the enclosing directive is closed.
#[derive(Debug, Clone, Copy)]
pub struct Transformer<'a> {
    cotton_dir: &'a str,
}

impl<'a> Transformer<'a> {
    /// Creates a transformer resolving component paths under `cotton_dir`.
    pub fn new(cotton_dir: &'a str) -> Self {
        Self { cotton_dir }
    }

    /// Rewrites every cotton tag in `doc`.
    ///
    /// `parent_key` tags any slot that is not inside a component; callers
    /// pass the template identity.
    pub fn transform(&self, doc: &mut Document, parent_key: &str) {
        let root = doc.root();
        self.transform_children(doc, root, parent_key);
    }

    fn transform_children(&self, doc: &mut Document, parent: NodeId, parent_key: &str) {
        let mut pending = vec![parent];
        while let Some(parent) = pending.pop() {
            for child in doc.children(parent).to_vec() {
                let Some(name) = doc.element(child).map(Element::local_name) else {
                    continue;
                };
                let compiled = if name == SLOT_TAG {
                    self.compile_slot(doc, child, parent_key)
                } else if let Some(key) = name.strip_prefix(COMPONENT_PREFIX) {
                    self.compile_component(doc, child, key)
                } else {
                    pending.push(child);
                    continue;
                };
                doc.replace_with_fragment(child, parse(&compiled));
            }
        }
    }

    /// Compiles the content of `id` as its own fragment.
    fn compile_content(&self, doc: &Document, id: NodeId, key: &str) -> String {
        let mut fragment = parse(&doc.inner_html(id));
        self.transform(&mut fragment, key);
        fragment.to_html()
    }

    fn compile_slot(&self, doc: &Document, id: NodeId, parent_key: &str) -> String {
        let name = doc
            .element(id)
            .and_then(|el| el.attr("name"))
            .unwrap_or("")
            .trim()
            .to_string();
        tracing::trace!(slot = %name, component = %parent_key, "compiling named slot");
        let content = self.compile_content(doc, id, parent_key);
        format!("{{% {SLOT_OPEN} {name} {parent_key} %}}{content}{{% {SLOT_CLOSE} %}}")
    }

    fn compile_component(&self, doc: &Document, id: NodeId, key: &str) -> String {
        let path = component_path(key);
        tracing::trace!(component = %key, path = %path, "compiling component");

        let mut out = format!(
            "{{% {COMPONENT_OPEN} {}/{path}.html {key} ",
            self.cotton_dir
        );
        let mut expression_attrs = Vec::new();
        for attr in doc.element(id).map(|el| el.attrs.as_slice()).unwrap_or(&[]) {
            let value = attribute_value(attr);
            if is_expression(&value) {
                expression_attrs.push((attr.name.as_str(), value));
            } else if value.is_empty() {
                out.push(' ');
                out.push_str(&attr.name);
            } else {
                out.push_str(&format!(" {}=\"{value}\"", attr.name));
            }
        }
        out.push_str(" %}");

        for (name, value) in expression_attrs {
            out.push_str(&format!(
                "{{% {SLOT_OPEN} {name} {key} {EXPRESSION_ATTR} %}}{value}{{% {SLOT_CLOSE} %}}"
            ));
        }

        if !doc.children(id).is_empty() {
            out.push_str(&self.compile_content(doc, id, key));
        }
        out.push_str(&format!("{{% {COMPONENT_CLOSE} %}}"));
        out
    }
}

/// Template path of a component, relative to the cotton directory and
/// without extension: `card.header-bar` becomes `card/header_bar`.
pub fn component_path(key: &str) -> String {
    key.replace('.', "/").replace('-', "_")
}

/// The value passed for an attribute. Plain list-valued attributes have
/// their tokens joined by single spaces; one holding host syntax is kept
/// as written, since the restorer relies on the padding around each token.
fn attribute_value(attr: &Attribute) -> String {
    let value = attr.value.as_deref().unwrap_or("");
    if attr.is_list_valued() && !value.contains(PLACEHOLDER_PREFIX) {
        value.split_whitespace().collect::<Vec<_>>().join(" ")
    } else {
        value.to_string()
    }
}

/// An attribute that cannot be written inline on a template tag: it holds
/// host syntax, spans lines, or contains `=` or `"`.
fn is_expression(value: &str) -> bool {
    value.contains(PLACEHOLDER_PREFIX)
        || value.contains('\n')
        || value.contains('=')
        || value.contains('"')
}
