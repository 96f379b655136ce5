//! Tolerant markup parser.
//!
//! Builds a [`Document`] from template source without ever failing. Anything
//! that does not form a well-delimited tag is kept as text, end tags that
//! close nothing become raw nodes, and unclosed elements are closed at the end
//! of input. Serializing the result reproduces the input byte for byte, except
//! that repeated attribute keys carry a duplicate marker and `name=""`
//! collapses to `name`.

use crate::arena::NodeId;
use crate::document::Document;
use crate::dupe::mask_duplicate;
use crate::node::{Attribute, Element, NodeKind, Quote, RAW_TEXT_ELEMENTS};

/// Parses markup into a document tree.
pub fn parse(source: &str) -> Document {
    let mut parser = Parser {
        source,
        bytes: source.as_bytes(),
        pos: 0,
        doc: Document::new(),
        open: Vec::new(),
    };
    parser.parse_all();
    parser.doc
}

struct Parser<'a> {
    source: &'a str,
    bytes: &'a [u8],
    pos: usize,
    doc: Document,
    /// Elements whose end tag has not been seen yet, innermost last.
    open: Vec<NodeId>,
}

impl Parser<'_> {
    fn parse_all(&mut self) {
        while self.pos < self.bytes.len() {
            let start = self.pos;
            let lt = self.find_from(start, b'<').unwrap_or(self.bytes.len());
            if lt > start {
                self.text(start, lt);
            }
            self.pos = lt;
            if self.pos >= self.bytes.len() {
                break;
            }
            self.markup();
        }
    }

    fn current(&self) -> NodeId {
        self.open.last().copied().unwrap_or_else(|| self.doc.root())
    }

    fn peek(&self) -> u8 {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> u8 {
        let idx = self.pos + offset;
        if idx < self.bytes.len() {
            self.bytes[idx]
        } else {
            0
        }
    }

    fn starts_with(&self, prefix: &str) -> bool {
        self.bytes[self.pos..].starts_with(prefix.as_bytes())
    }

    fn find_from(&self, from: usize, needle: u8) -> Option<usize> {
        self.bytes[from..]
            .iter()
            .position(|&b| b == needle)
            .map(|i| from + i)
    }

    fn find_str_from(&self, from: usize, needle: &str) -> Option<usize> {
        self.source[from..].find(needle).map(|i| from + i)
    }

    fn text(&mut self, start: usize, end: usize) {
        let parent = self.current();
        let text = &self.source[start..end];
        self.doc.append_text(parent, text);
    }

    /// Emits the `<` at the cursor as text and moves past it.
    fn literal_lt(&mut self) {
        let start = self.pos;
        self.pos += 1;
        self.text(start, self.pos);
    }

    fn markup(&mut self) {
        if self.starts_with("<!--") {
            self.comment();
        } else if self.peek_at(1) == b'!' || self.peek_at(1) == b'?' {
            self.declaration();
        } else if self.peek_at(1) == b'/' && self.peek_at(2).is_ascii_alphabetic() {
            self.end_tag();
        } else if self.peek_at(1).is_ascii_alphabetic() {
            self.start_tag();
        } else {
            self.literal_lt();
        }
    }

    fn comment(&mut self) {
        let start = self.pos;
        let parent = self.current();
        match self.find_str_from(start + 4, "-->") {
            Some(end) => {
                let body = self.source[start + 4..end].to_string();
                self.doc.append(parent, NodeKind::Comment(body));
                self.pos = end + 3;
            }
            None => {
                let rest = self.source[start..].to_string();
                self.doc.append(parent, NodeKind::Raw(rest));
                self.pos = self.bytes.len();
            }
        }
    }

    /// `<!DOCTYPE ...>`, `<![CDATA[...]>` and `<?...?>` pass through as raw.
    fn declaration(&mut self) {
        let start = self.pos;
        match self.find_from(start, b'>') {
            Some(gt) => {
                let parent = self.current();
                let raw = self.source[start..=gt].to_string();
                self.doc.append(parent, NodeKind::Raw(raw));
                self.pos = gt + 1;
            }
            None => self.literal_lt(),
        }
    }

    fn end_tag(&mut self) {
        let start = self.pos;
        let Some(gt) = self.find_from(start, b'>') else {
            self.literal_lt();
            return;
        };
        let name_start = start + 2;
        let name_end = self.bytes[name_start..gt]
            .iter()
            .position(|&b| b.is_ascii_whitespace() || b == b'/')
            .map_or(gt, |i| name_start + i);
        let name = &self.source[name_start..name_end];
        let literal = self.source[start..=gt].to_string();
        self.pos = gt + 1;

        let matched = self.open.iter().rposition(|&id| {
            self.doc
                .element(id)
                .is_some_and(|el| el.name.eq_ignore_ascii_case(name))
        });
        match matched {
            Some(depth) => {
                let id = self.open[depth];
                self.open.truncate(depth);
                if let Some(el) = self.doc.element_mut(id) {
                    el.end_tag = Some(literal);
                }
            }
            None => {
                tracing::trace!(tag = %literal, "end tag closes nothing");
                let parent = self.current();
                self.doc.append(parent, NodeKind::Raw(literal));
            }
        }
    }

    fn start_tag(&mut self) {
        let start = self.pos;
        self.pos += 1;
        let Some(element) = self.scan_start_tag() else {
            self.pos = start;
            self.literal_lt();
            return;
        };
        let raw_text = RAW_TEXT_ELEMENTS.iter().any(|n| element.is(n));
        let stays_open = !element.self_closing && !element.is_void();
        let name = element.name.clone();
        let parent = self.current();
        let id = self.doc.append(parent, NodeKind::Element(element));

        if !stays_open {
            return;
        }
        if raw_text {
            self.raw_text_content(id, &name);
        } else {
            self.open.push(id);
        }
    }

    /// Scans the tag name, attributes and closing `>` of a start tag whose
    /// `<` has been consumed. Returns `None` if the input ends first.
    fn scan_start_tag(&mut self) -> Option<Element> {
        let name_start = self.pos;
        while self.pos < self.bytes.len() && !self.is_tag_name_end(self.peek()) {
            self.pos += 1;
        }
        let mut element = Element::new(&self.source[name_start..self.pos]);
        let mut seen: Vec<String> = Vec::new();

        loop {
            let ws_start = self.pos;
            while self.pos < self.bytes.len()
                && (self.peek().is_ascii_whitespace()
                    || (self.peek() == b'/' && self.peek_at(1) != b'>'))
            {
                self.pos += 1;
            }
            let leading = self.source[ws_start..self.pos].to_string();

            match self.peek() {
                0 if self.pos >= self.bytes.len() => return None,
                b'>' => {
                    element.tail = leading;
                    self.pos += 1;
                    return Some(element);
                }
                b'/' => {
                    element.tail = leading;
                    element.self_closing = true;
                    self.pos += 2;
                    return Some(element);
                }
                _ => {}
            }

            let mut attr = self.scan_attribute(leading)?;
            let lowered = attr.name.to_ascii_lowercase();
            if seen.contains(&lowered) {
                attr.name = mask_duplicate(&attr.name, &seen);
            }
            seen.push(attr.name.to_ascii_lowercase());
            element.attrs.push(attr);
        }
    }

    fn is_tag_name_end(&self, b: u8) -> bool {
        b.is_ascii_whitespace() || b == b'>' || (b == b'/' && self.peek_at(1) == b'>')
    }

    fn scan_attribute(&mut self, leading: String) -> Option<Attribute> {
        let name_start = self.pos;
        // The first character is always part of the name, even a stray `=`.
        self.pos += 1;
        while self.pos < self.bytes.len() {
            let b = self.peek();
            if b.is_ascii_whitespace() || b == b'=' || b == b'>' || b == b'/' {
                break;
            }
            self.pos += 1;
        }
        let name = self.source[name_start..self.pos].to_string();

        let assign_start = self.pos;
        let mut probe = self.pos;
        while probe < self.bytes.len() && self.bytes[probe].is_ascii_whitespace() {
            probe += 1;
        }
        if probe >= self.bytes.len() || self.bytes[probe] != b'=' {
            return Some(Attribute {
                leading,
                name,
                assign: String::new(),
                value: None,
                quote: Quote::Double,
            });
        }
        self.pos = probe + 1;
        while self.pos < self.bytes.len() && self.peek().is_ascii_whitespace() {
            self.pos += 1;
        }
        let assign = self.source[assign_start..self.pos].to_string();

        let (value, quote) = match self.peek() {
            q @ (b'"' | b'\'') => {
                let close = self.find_from(self.pos + 1, q)?;
                let value = self.source[self.pos + 1..close].to_string();
                self.pos = close + 1;
                let quote = if q == b'"' { Quote::Double } else { Quote::Single };
                (value, quote)
            }
            _ => {
                let start = self.pos;
                while self.pos < self.bytes.len()
                    && !self.peek().is_ascii_whitespace()
                    && self.peek() != b'>'
                {
                    self.pos += 1;
                }
                (self.source[start..self.pos].to_string(), Quote::Unquoted)
            }
        };

        Some(Attribute {
            leading,
            name,
            assign,
            value: Some(value),
            quote,
        })
    }

    /// Consumes the content of a raw-text element up to its end tag.
    fn raw_text_content(&mut self, id: NodeId, name: &str) {
        let close = format!("</{}", name.to_ascii_lowercase());
        let lowered = self.source[self.pos..].to_ascii_lowercase();
        let mut search = 0;
        let end = loop {
            let Some(i) = lowered[search..].find(&close) else {
                break None;
            };
            let at = search + i;
            let after = lowered.as_bytes().get(at + close.len()).copied().unwrap_or(0);
            if after.is_ascii_whitespace() || after == b'>' || after == b'/' {
                break Some(self.pos + at);
            }
            search = at + close.len();
        };

        let content_end = end.unwrap_or(self.bytes.len());
        if content_end > self.pos {
            let text = self.source[self.pos..content_end].to_string();
            self.doc.append(id, NodeKind::Text(text));
        }
        self.pos = content_end;

        let Some(end) = end else {
            return;
        };
        match self.find_from(end, b'>') {
            Some(gt) => {
                let literal = self.source[end..=gt].to_string();
                if let Some(el) = self.doc.element_mut(id) {
                    el.end_tag = Some(literal);
                }
                self.pos = gt + 1;
            }
            None => {
                let rest = &self.source[end..];
                self.doc.append_text(id, rest);
                self.pos = self.bytes.len();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dupe::DUPE_ATTR_MARKER;

    fn roundtrip(src: &str) {
        assert_eq!(parse(src).to_html(), src, "round trip of {src:?}");
    }

    #[test]
    fn plain_markup_round_trips() {
        roundtrip("<div class=\"a  b\" id='x' data-n=3>\n  <p>Hello</p>\n</div>\n");
        roundtrip("<!DOCTYPE html><html><body><!-- note --></body></html>");
        roundtrip("<div\n    class=\"a\"\n    title = \"t\"\n>text</div>");
        roundtrip("text only, no tags at all");
        roundtrip("");
    }

    #[test]
    fn stray_angle_brackets_are_text() {
        roundtrip("a < b and c > d");
        roundtrip("x <3 y");
        roundtrip("<div>unterminated <span");
        roundtrip("</ not a tag");
    }

    #[test]
    fn void_and_self_closing() {
        let doc = parse("<br><img src=\"a.png\"/><c-icon name=\"x\" />after");
        let root = doc.root();
        assert_eq!(doc.children(root).len(), 4);
        let icon = doc.children(root)[2];
        let el = doc.element(icon).expect("element");
        assert!(el.self_closing);
        assert_eq!(el.tail, " ");
        assert!(doc.children(icon).is_empty());
        assert_eq!(doc.to_html(), "<br><img src=\"a.png\"/><c-icon name=\"x\" />after");
    }

    #[test]
    fn unmatched_end_tag_is_raw() {
        let doc = parse("a</div>b");
        let kids = doc.children(doc.root()).to_vec();
        assert_eq!(kids.len(), 3);
        assert_eq!(doc.node(kids[1]).kind, NodeKind::Raw("</div>".into()));
        assert_eq!(doc.to_html(), "a</div>b");
    }

    #[test]
    fn end_tag_closes_inner_implicitly() {
        let doc = parse("<div><span>x</div>");
        let div = doc.children(doc.root())[0];
        let span = doc.children(div)[0];
        assert_eq!(doc.element(span).and_then(|e| e.end_tag.clone()), None);
        assert_eq!(
            doc.element(div).and_then(|e| e.end_tag.clone()),
            Some("</div>".into())
        );
        assert_eq!(doc.to_html(), "<div><span>x</div>");
    }

    #[test]
    fn raw_text_is_not_parsed() {
        let src = "<script>if (a < b && c > d) { x = '</div>'; }</script><p>ok</p>";
        let doc = parse(src);
        let script = doc.children(doc.root())[0];
        assert_eq!(doc.children(script).len(), 1);
        assert_eq!(doc.to_html(), src);
    }

    #[test]
    fn nesting_builds_tree() {
        let doc = parse("<c-card><c-slot name=\"header\">H</c-slot>body</c-card>");
        let card = doc.children(doc.root())[0];
        assert!(doc.element(card).is_some_and(|e| e.is("c-card")));
        let kids = doc.children(card).to_vec();
        assert_eq!(kids.len(), 2);
        assert_eq!(
            doc.element(kids[0]).and_then(|e| e.attr("name")),
            Some("header")
        );
        assert_eq!(doc.node(kids[0]).parent, Some(card));
    }

    #[test]
    fn duplicate_attributes_are_masked() {
        let doc = parse("<div class=\"a\" CLASS=\"b\" class=\"c\"></div>");
        let div = doc.children(doc.root())[0];
        let el = doc.element(div).expect("element");
        assert_eq!(el.attrs.len(), 3);
        assert_eq!(el.attrs[0].name, "class");
        assert!(el.attrs[1].name.starts_with(&format!("CLASS{DUPE_ATTR_MARKER}")));
        assert!(el.attrs[2].name.starts_with(&format!("class{DUPE_ATTR_MARKER}")));
        assert_ne!(el.attrs[1].name.to_ascii_lowercase(), el.attrs[2].name.to_ascii_lowercase());
        assert_eq!(el.attrs[2].value.as_deref(), Some("c"));
    }

    #[test]
    fn placeholder_tokens_parse_as_attributes() {
        let src = "<div __django_syntax__1__ attr1=\"variable\" __django_syntax__2__></div>";
        let doc = parse(src);
        let div = doc.children(doc.root())[0];
        let el = doc.element(div).expect("element");
        assert_eq!(el.attrs.len(), 3);
        assert_eq!(el.attrs[0].value, None);
        assert_eq!(doc.to_html(), src);
    }

    #[test]
    fn attribute_names_keep_case() {
        let doc = parse("<C-Card :Items=\"[1]\"></C-Card>");
        let card = doc.children(doc.root())[0];
        let el = doc.element(card).expect("element");
        assert_eq!(el.name, "C-Card");
        assert_eq!(el.attrs[0].name, ":Items");
    }

    #[test]
    fn unclosed_elements_end_at_eof() {
        roundtrip("<div><p>one<p>two");
        let doc = parse("<div><p>one");
        let div = doc.children(doc.root())[0];
        assert_eq!(doc.element(div).and_then(|e| e.end_tag.clone()), None);
    }

    #[test]
    fn unterminated_quote_is_text() {
        roundtrip("<div title=\"oops>text");
    }

    #[test]
    fn multibyte_text_is_preserved() {
        roundtrip("<p>héllo → wörld</p><span title=\"ü\">✓</span>");
    }
}
