//! Tree node types.
//!
//! Nodes keep enough of the source text (attribute quoting, whitespace
//! between attributes, the literal end tag) to serialize unmodified markup
//! back exactly as it was written.

use crate::arena::NodeId;

/// Elements that never have content or an end tag.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements whose content is raw text up to the matching end tag.
pub const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Attribute names whose value is a whitespace-separated token list.
pub const LIST_VALUED_ATTRIBUTES: &[&str] = &["class", "accesskey", "dropzone"];

/// A node in the document tree.
#[derive(Debug, Clone)]
pub struct Node {
    /// What this node is.
    pub kind: NodeKind,
    /// The parent node, `None` for the document root and detached nodes.
    pub parent: Option<NodeId>,
    /// Child nodes in document order.
    pub children: Vec<NodeId>,
}

/// The payload of a [`Node`].
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// The document root; serializes as its children only.
    Document,
    /// An element with its attributes.
    Element(Element),
    /// Character data, kept verbatim.
    Text(String),
    /// A comment; the string excludes the `<!--` and `-->` delimiters.
    Comment(String),
    /// Markup passed through untouched: declarations, processing
    /// instructions and end tags that close nothing.
    Raw(String),
}

/// An element as written in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Tag name with its original case.
    pub name: String,
    /// Attributes in source order. Repeated keys carry a duplicate marker.
    pub attrs: Vec<Attribute>,
    /// Whitespace between the last attribute and `>` or `/>`.
    pub tail: String,
    /// Whether the start tag ended in `/>`.
    pub self_closing: bool,
    /// The literal end tag, `None` when the element was closed implicitly.
    pub end_tag: Option<String>,
}

impl Element {
    /// Creates an element with no attributes.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            tail: String::new(),
            self_closing: false,
            end_tag: None,
        }
    }

    /// Lower-cased tag name, used for all name comparisons.
    pub fn local_name(&self) -> String {
        self.name.to_ascii_lowercase()
    }

    /// Returns `true` if the tag name equals `name`, ignoring ASCII case.
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// Returns `true` for elements that can have no content.
    pub fn is_void(&self) -> bool {
        VOID_ELEMENTS.iter().any(|v| self.is(v))
    }

    /// Returns the value of the first attribute named `name`.
    ///
    /// A valueless attribute yields `Some("")`.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .map(|a| a.value.as_deref().unwrap_or(""))
    }
}

/// How an attribute value was quoted in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quote {
    /// `name="value"`
    Double,
    /// `name='value'`
    Single,
    /// `name=value`
    Unquoted,
}

impl Quote {
    /// The delimiter written around the value.
    pub fn as_str(self) -> &'static str {
        match self {
            Quote::Double => "\"",
            Quote::Single => "'",
            Quote::Unquoted => "",
        }
    }
}

/// A single attribute of a start tag.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    /// Whitespace preceding the attribute name.
    pub leading: String,
    /// The attribute name, possibly carrying a duplicate marker.
    pub name: String,
    /// Text between the name and the value, e.g. `=` or ` = `.
    pub assign: String,
    /// The value without quotes; `None` for a bare attribute.
    pub value: Option<String>,
    /// Quoting used for the value.
    pub quote: Quote,
}

impl Attribute {
    /// Creates a `name="value"` attribute preceded by a single space.
    pub fn new(name: impl Into<String>, value: Option<String>) -> Self {
        Self {
            leading: " ".to_string(),
            name: name.into(),
            assign: "=".to_string(),
            value,
            quote: Quote::Double,
        }
    }

    /// Returns `true` if the value is absent or empty.
    pub fn is_valueless(&self) -> bool {
        self.value.as_deref().map_or(true, str::is_empty)
    }

    /// Returns `true` if the attribute holds a whitespace-separated token list.
    pub fn is_list_valued(&self) -> bool {
        LIST_VALUED_ATTRIBUTES
            .iter()
            .any(|n| self.name.eq_ignore_ascii_case(n))
    }
}
