//! The parsed document: an arena of nodes plus tree surgery and serialization.

use crate::arena::{Arena, NodeId};
use crate::node::{Attribute, Element, Node, NodeKind};

/// A parsed markup tree.
///
/// All nodes live in one arena and are addressed by [`NodeId`]. Tree edits
/// rewire `children`/`parent` links; detached nodes stay in the arena but are
/// unreachable from the root and never serialized.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Arena<Node>,
    root: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Creates a document containing only the root node.
    pub fn new() -> Self {
        let mut nodes = Arena::new();
        let root = nodes.alloc(Node {
            kind: NodeKind::Document,
            parent: None,
            children: Vec::new(),
        });
        Self { nodes, root }
    }

    /// Parses markup into a document. See [`crate::parse`].
    pub fn parse(source: &str) -> Self {
        crate::parser::parse(source)
    }

    /// Returns the root node ID.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Returns the node with the given ID.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    /// Returns the children of a node in document order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id].children
    }

    /// Returns the element payload of a node, if it is an element.
    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match &self.nodes[id].kind {
            NodeKind::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Returns a mutable element payload, if the node is an element.
    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match &mut self.nodes[id].kind {
            NodeKind::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Appends a new node under `parent` and returns its ID.
    pub fn append(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = self.nodes.alloc(Node {
            kind,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent].children.push(id);
        id
    }

    /// Appends text under `parent`, merging with a trailing text node.
    pub fn append_text(&mut self, parent: NodeId, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(&last) = self.nodes[parent].children.last() {
            if let NodeKind::Text(existing) = &mut self.nodes[last].kind {
                existing.push_str(text);
                return;
            }
        }
        self.append(parent, NodeKind::Text(text.to_string()));
    }

    /// Returns the first top-level element named `name` (ASCII case-insensitive).
    pub fn find_top_level(&self, name: &str) -> Option<NodeId> {
        self.children(self.root)
            .iter()
            .copied()
            .find(|&id| self.element(id).is_some_and(|el| el.is(name)))
    }

    /// Detaches a node (and its subtree) from its parent.
    pub fn remove(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id].parent.take() {
            self.nodes[parent].children.retain(|&c| c != id);
        }
    }

    /// Replaces the subtree at `id` with the top-level nodes of `fragment`.
    ///
    /// The fragment's nodes are copied into this document's arena at the
    /// position `id` occupied; `id` itself is detached. Replacing the root
    /// replaces the whole content.
    pub fn replace_with_fragment(&mut self, id: NodeId, fragment: Document) {
        let grafted: Vec<NodeId> = fragment
            .children(fragment.root)
            .iter()
            .map(|&child| self.import(&fragment, child))
            .collect();

        if id == self.root {
            for old in std::mem::take(&mut self.nodes[id].children) {
                self.nodes[old].parent = None;
            }
            for &new in &grafted {
                self.nodes[new].parent = Some(id);
            }
            self.nodes[id].children = grafted;
            return;
        }

        let Some(parent) = self.nodes[id].parent.take() else {
            return;
        };
        for &new in &grafted {
            self.nodes[new].parent = Some(parent);
        }
        let siblings = &mut self.nodes[parent].children;
        if let Some(pos) = siblings.iter().position(|&c| c == id) {
            siblings.splice(pos..=pos, grafted);
        }
    }

    /// Deep-copies `src_id` from `src` into this arena, returning the new ID.
    fn import(&mut self, src: &Document, src_id: NodeId) -> NodeId {
        let top = self.nodes.alloc(Node {
            kind: src.node(src_id).kind.clone(),
            parent: None,
            children: Vec::new(),
        });
        let mut pending = vec![(src_id, top)];
        while let Some((from, to)) = pending.pop() {
            for &child in src.children(from) {
                let id = self.nodes.alloc(Node {
                    kind: src.node(child).kind.clone(),
                    parent: Some(to),
                    children: Vec::new(),
                });
                self.nodes[to].children.push(id);
                pending.push((child, id));
            }
        }
        top
    }

    /// Serializes the whole document.
    pub fn to_html(&self) -> String {
        self.inner_html(self.root)
    }

    /// Serializes the children of a node.
    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        for &child in self.children(id) {
            self.write_node(child, &mut out);
        }
        out
    }

    /// Serializes a node including its own markup.
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_node(id, &mut out);
        out
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        let mut steps = vec![Step::Open(id)];
        while let Some(step) = steps.pop() {
            let id = match step {
                Step::Open(id) => id,
                Step::Close(end) => {
                    out.push_str(end);
                    continue;
                }
            };
            let node = self.node(id);
            match &node.kind {
                NodeKind::Document => {}
                NodeKind::Text(text) | NodeKind::Raw(text) => out.push_str(text),
                NodeKind::Comment(text) => {
                    out.push_str("<!--");
                    out.push_str(text);
                    out.push_str("-->");
                }
                NodeKind::Element(el) => {
                    out.push('<');
                    out.push_str(&el.name);
                    for attr in &el.attrs {
                        write_attribute(attr, out);
                    }
                    out.push_str(&el.tail);
                    out.push_str(if el.self_closing { "/>" } else { ">" });
                    if let Some(end) = &el.end_tag {
                        steps.push(Step::Close(end.as_str()));
                    }
                }
            }
            steps.extend(node.children.iter().rev().map(|&c| Step::Open(c)));
        }
    }
}

/// Pending serializer work: a node to write, or an end tag owed once its
/// children are written.
enum Step<'a> {
    Open(NodeId),
    Close(&'a str),
}

/// Writes one attribute. An empty value collapses to a bare key: a synthetic
/// `=""` would otherwise read as a value inside host template directives.
fn write_attribute(attr: &Attribute, out: &mut String) {
    out.push_str(&attr.leading);
    out.push_str(&attr.name);
    if attr.is_valueless() {
        return;
    }
    if let Some(value) = &attr.value {
        out.push_str(&attr.assign);
        out.push_str(attr.quote.as_str());
        out.push_str(value);
        out.push_str(attr.quote.as_str());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_document_is_empty() {
        let doc = Document::new();
        assert!(doc.children(doc.root()).is_empty());
        assert_eq!(doc.to_html(), "");
    }

    #[test]
    fn append_text_merges() {
        let mut doc = Document::new();
        let root = doc.root();
        doc.append_text(root, "a");
        doc.append_text(root, "b");
        assert_eq!(doc.children(root).len(), 1);
        assert_eq!(doc.to_html(), "ab");
    }

    #[test]
    fn remove_detaches_subtree() {
        let mut doc = Document::parse("<p>one</p><p>two</p>");
        let first = doc.children(doc.root())[0];
        doc.remove(first);
        assert_eq!(doc.to_html(), "<p>two</p>");
        assert!(doc.node(first).parent.is_none());
    }

    #[test]
    fn replace_with_fragment_in_place() {
        let mut doc = Document::parse("<div><span>x</span>tail</div>");
        let div = doc.children(doc.root())[0];
        let span = doc.children(div)[0];
        doc.replace_with_fragment(span, Document::parse("<b>1</b><i>2</i>"));
        assert_eq!(doc.to_html(), "<div><b>1</b><i>2</i>tail</div>");
        let div_children = doc.children(div).to_vec();
        assert_eq!(div_children.len(), 3);
        for c in div_children {
            assert_eq!(doc.node(c).parent, Some(div));
        }
    }

    #[test]
    fn replace_with_empty_fragment_removes() {
        let mut doc = Document::parse("a<br>b");
        let br = doc.children(doc.root())[1];
        doc.replace_with_fragment(br, Document::new());
        assert_eq!(doc.to_html(), "ab");
    }

    #[test]
    fn replace_root_swaps_content() {
        let mut doc = Document::parse("<p>old</p>");
        let root = doc.root();
        doc.replace_with_fragment(root, Document::parse("<p>new</p>"));
        assert_eq!(doc.to_html(), "<p>new</p>");
    }

    #[test]
    fn find_top_level_ignores_nested() {
        let doc = Document::parse("<div><c-vars a=\"1\" /></div>");
        assert!(doc.find_top_level("c-vars").is_none());
        let doc = Document::parse("\n<C-VARS a=\"1\" />\n<div></div>");
        assert!(doc.find_top_level("c-vars").is_some());
    }

    #[test]
    fn inner_and_outer_html() {
        let doc = Document::parse("<ul class=\"x\"><li>1</li></ul>");
        let ul = doc.children(doc.root())[0];
        assert_eq!(doc.inner_html(ul), "<li>1</li>");
        assert_eq!(doc.outer_html(ul), "<ul class=\"x\"><li>1</li></ul>");
    }

    #[test]
    fn deep_nesting_grafts_and_serializes() {
        let deep = "<div>".repeat(5000);
        let mut doc = Document::parse("<p>x</p>");
        let p = doc.children(doc.root())[0];
        doc.replace_with_fragment(p, Document::parse(&deep));
        assert_eq!(doc.to_html(), deep);
    }

    #[test]
    fn empty_attribute_value_collapses() {
        let doc = Document::parse("<input value=\"\" disabled>");
        assert_eq!(doc.to_html(), "<input value disabled>");
    }
}
