//! Minimal HTML model used by the rendering host.
//!
//! - `attrs`: ordered, case-insensitive attribute list
//! - `parse`: tag-soup tokenizer producing a `Node` tree
//!
//! Text and comments are kept byte-for-byte; only attribute values are
//! decoded on parse and re-escaped on output.

mod attrs;
mod parse;

pub use attrs::{Attribute, Attributes};
pub use parse::{MAX_DEPTH, ParseError, parse};

use std::borrow::Cow;

// =============================================================================
// Tree
// =============================================================================

/// A parsed HTML node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    /// Raw text, emitted verbatim.
    Text(String),
    /// Comment body without `<!--` / `-->`.
    Comment(String),
    /// Declaration body without `<!` / `>` (e.g. `DOCTYPE html`).
    Doctype(String),
}

/// An element with ordered attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Lowercased tag name.
    pub tag: String,
    pub attrs: Attributes,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>, attrs: Attributes) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            attrs,
            children: Vec::new(),
        }
    }
}

// =============================================================================
// Serialization
// =============================================================================

/// Write `<tag attr="value" ...>` into `out`.
pub fn write_start_tag(out: &mut String, tag: &str, attrs: &Attributes) {
    out.push('<');
    out.push_str(tag);
    for attr in attrs.iter() {
        out.push(' ');
        out.push_str(&attr.name);
        if let Some(value) = &attr.value {
            out.push_str("=\"");
            out.push_str(&escape_attr(value));
            out.push('"');
        }
    }
    out.push('>');
}

/// Write `</tag>` into `out` (nothing for void elements).
pub fn write_end_tag(out: &mut String, tag: &str) {
    if is_void_element(tag) {
        return;
    }
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

/// Serialize a plain node tree (no helpers involved).
pub fn render_nodes(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Element(elem) => {
                write_start_tag(out, &elem.tag, &elem.attrs);
                render_nodes(&elem.children, out);
                write_end_tag(out, &elem.tag);
            }
            Node::Text(text) => out.push_str(text),
            Node::Comment(body) => {
                out.push_str("<!--");
                out.push_str(body);
                out.push_str("-->");
            }
            Node::Doctype(body) => {
                out.push_str("<!");
                out.push_str(body);
                out.push('>');
            }
        }
    }
}

// =============================================================================
// Escaping
// =============================================================================

/// Get the HTML entity for a character that is special in attribute values.
#[inline]
fn escape_char(c: char) -> Option<&'static str> {
    match c {
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '&' => Some("&amp;"),
        '"' => Some("&quot;"),
        '\'' => Some("&#39;"),
        _ => None,
    }
}

/// Escape an attribute value for a double-quoted context.
///
/// Uses `Cow` to avoid allocation when no escaping is needed.
pub fn escape_attr(s: &str) -> Cow<'_, str> {
    if !s.contains(['<', '>', '&', '"', '\'']) {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match escape_char(c) {
            Some(entity) => result.push_str(entity),
            None => result.push(c),
        }
    }
    Cow::Owned(result)
}

/// Decode the entities that show up in attribute values.
///
/// Unknown or malformed entities are kept as written.
pub fn unescape(s: &str) -> Cow<'_, str> {
    if !s.contains('&') {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(amp) = rest.find('&') {
        result.push_str(&rest[..amp]);
        let tail = &rest[amp + 1..];

        // Entities are short; anything longer is literal text
        let decoded = tail
            .find(';')
            .filter(|&end| end <= 10)
            .and_then(|end| decode_entity(&tail[..end]).map(|c| (c, end)));

        match decoded {
            Some((c, end)) => {
                result.push(c);
                rest = &tail[end + 1..];
            }
            None => {
                result.push('&');
                rest = tail;
            }
        }
    }
    result.push_str(rest);

    Cow::Owned(result)
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "amp" => Some('&'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{00A0}'),
        s => {
            let num = s.strip_prefix('#')?;
            let code = match num.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => num.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}

// =============================================================================
// Element Classification
// =============================================================================

/// Check if an HTML tag is a void element (no children, no end tag).
#[inline]
pub fn is_void_element(tag: &str) -> bool {
    matches!(
        tag,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "source"
            | "track"
            | "wbr"
    )
}

/// Check if tag content is raw text up to its end tag (never parsed as markup).
#[inline]
pub fn is_raw_text_element(tag: &str) -> bool {
    matches!(tag, "script" | "style" | "textarea" | "title")
}

// =============================================================================
// tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_attr() {
        assert_eq!(escape_attr("plain"), "plain");
        assert!(matches!(escape_attr("plain"), Cow::Borrowed(_)));
        assert_eq!(
            escape_attr(r#"a "b" & <c> 'd'"#),
            "a &quot;b&quot; &amp; &lt;c&gt; &#39;d&#39;"
        );
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape("no entities"), "no entities");
        assert_eq!(unescape("&quot;x&quot; &amp; y"), "\"x\" & y");
        assert_eq!(unescape("&#65;&#x42;"), "AB");
        assert_eq!(unescape("fish & chips"), "fish & chips");
        assert_eq!(unescape("&bogus;"), "&bogus;");
        assert_eq!(unescape("tail &"), "tail &");
    }

    #[test]
    fn test_render_void_and_valueless() {
        let mut attrs = Attributes::new();
        attrs.set("src", "/a.png");
        attrs.push_valueless("hidden");
        let mut out = String::new();
        write_start_tag(&mut out, "img", &attrs);
        write_end_tag(&mut out, "img");
        assert_eq!(out, r#"<img src="/a.png" hidden>"#);
    }

    #[test]
    fn test_render_nodes_roundtrip() {
        let html = r#"<!DOCTYPE html><div class="a"><!-- note --><p>Hi <b>there</b></p><br></div>"#;
        let mut out = String::new();
        render_nodes(&parse(html).unwrap(), &mut out);
        assert_eq!(out, html);
    }
}
