//! Tag-soup HTML tokenizer.
//!
//! Builds a `Node` tree while keeping attribute order and text verbatim.
//! Unmatched end tags are dropped and unclosed elements are closed at EOF.
//! Implied end tags (`<p>` closing a previous `<p>`, etc.) are not inferred.

use thiserror::Error;

use super::{Attributes, Element, Node, is_raw_text_element, is_void_element, unescape};

/// Deepest element nesting accepted by [`parse`].
///
/// Binding and rendering walk the tree recursively.
pub const MAX_DEPTH: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("<{tag}> opens more than {limit} nested elements")]
    TooDeep { tag: String, limit: usize },
}

/// Parse an HTML document or fragment.
pub fn parse(input: &str) -> Result<Vec<Node>, ParseError> {
    let mut builder = TreeBuilder::default();
    let mut pos = 0;

    while pos < input.len() {
        let rest = &input[pos..];

        if let Some(body) = rest.strip_prefix("<!--") {
            let (comment, consumed) = match body.find("-->") {
                Some(end) => (&body[..end], 4 + end + 3),
                None => (body, rest.len()),
            };
            builder.add_node(Node::Comment(comment.to_string()));
            pos += consumed;
        } else if let Some(body) = rest.strip_prefix("<!") {
            let end = body.find('>').unwrap_or(body.len());
            builder.add_node(Node::Doctype(body[..end].to_string()));
            pos += (2 + end + 1).min(rest.len());
        } else if let Some(body) = rest.strip_prefix("</")
            && body.starts_with(|c: char| c.is_ascii_alphabetic())
        {
            let end = body.find('>').unwrap_or(body.len());
            let name = body[..end].trim().to_ascii_lowercase();
            builder.end_tag(&name);
            pos += (2 + end + 1).min(rest.len());
        } else if rest.starts_with('<') && rest[1..].starts_with(|c: char| c.is_ascii_alphabetic())
        {
            let end = find_tag_end(rest);
            let inner = &rest[1..end];
            pos += (end + 1).min(rest.len());

            let (inner, self_closing) = match inner.trim_end().strip_suffix('/') {
                Some(stripped) => (stripped, true),
                None => (inner, false),
            };
            let name_end = inner
                .find(|c: char| c.is_whitespace() || c == '/')
                .unwrap_or(inner.len());
            let elem = Element::new(&inner[..name_end], parse_attributes(&inner[name_end..]));

            if self_closing || is_void_element(&elem.tag) {
                builder.add_node(Node::Element(elem));
            } else if is_raw_text_element(&elem.tag) {
                let (text, consumed) = read_raw_text(&input[pos..], &elem.tag);
                pos += consumed;
                builder.add_raw_text_element(elem, text);
            } else if builder.stack.len() >= MAX_DEPTH {
                return Err(ParseError::TooDeep {
                    tag: elem.tag,
                    limit: MAX_DEPTH,
                });
            } else {
                builder.start_tag(elem);
            }
        } else {
            // Text runs until the next thing that looks like markup
            let first = rest.chars().next().map_or(1, char::len_utf8);
            let next = rest[first..]
                .find('<')
                .map(|i| i + first)
                .unwrap_or(rest.len());
            builder.add_text(&rest[..next]);
            pos += next;
        }
    }

    Ok(builder.finish())
}

/// Index of the `>` closing a start tag, skipping quoted attribute values.
///
/// A quote only opens a value right after `=`; elsewhere it is literal.
fn find_tag_end(s: &str) -> usize {
    let mut quote: Option<char> = None;
    let mut after_eq = false;
    for (i, c) in s.char_indices().skip(1) {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') if after_eq => quote = Some(c),
            (None, '>') => return i,
            _ => {}
        }
        if !c.is_whitespace() {
            after_eq = quote.is_none() && c == '=';
        }
    }
    s.len()
}

/// Content of a raw text element up to its end tag.
///
/// Returns the text and the number of bytes consumed including the end tag.
fn read_raw_text<'a>(s: &'a str, tag: &str) -> (&'a str, usize) {
    let needle = format!("</{tag}");
    let lower = s.to_ascii_lowercase();
    match lower.find(&needle) {
        Some(start) => {
            let close = s[start..].find('>').map(|i| start + i + 1).unwrap_or(s.len());
            (&s[..start], close)
        }
        None => (s, s.len()),
    }
}

/// Parse HTML-style attributes from the part of a start tag after its name.
///
/// Input: `class="foo" data-x='{"a":1}' disabled`
/// Output: `class=foo`, `data-x={"a":1}`, `disabled` (valueless)
fn parse_attributes(s: &str) -> Attributes {
    let mut attrs = Attributes::new();
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c.is_whitespace() || c == '/' {
            continue;
        }

        // Read attribute name
        let mut name = String::new();
        name.push(c);
        while let Some(&next) = chars.peek() {
            if next == '=' || next == '/' || next.is_whitespace() {
                break;
            }
            name.push(next);
            chars.next();
        }

        while chars.next_if(|c| c.is_whitespace()).is_some() {}

        if chars.next_if_eq(&'=').is_none() {
            attrs.push_valueless(name);
            continue;
        }

        while chars.next_if(|c| c.is_whitespace()).is_some() {}

        let mut raw = String::new();
        match chars.next_if(|&c| c == '"' || c == '\'') {
            Some(quote) => {
                for c in chars.by_ref() {
                    if c == quote {
                        break;
                    }
                    raw.push(c);
                }
            }
            None => {
                while let Some(c) = chars.next_if(|c| !c.is_whitespace()) {
                    raw.push(c);
                }
            }
        }

        attrs.push(name, Some(unescape(&raw).into_owned()));
    }

    attrs
}

// =============================================================================
// Tree building
// =============================================================================

#[derive(Default)]
struct TreeBuilder {
    stack: Vec<Element>,
    root: Vec<Node>,
}

impl TreeBuilder {
    /// Add a node to the current context (top of stack or root)
    fn add_node(&mut self, node: Node) {
        match self.stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None => self.root.push(node),
        }
    }

    fn add_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        // Merge with a preceding text node (a lone `<` splits runs)
        let siblings = match self.stack.last_mut() {
            Some(parent) => &mut parent.children,
            None => &mut self.root,
        };
        if let Some(Node::Text(prev)) = siblings.last_mut() {
            prev.push_str(text);
        } else {
            siblings.push(Node::Text(text.to_string()));
        }
    }

    fn add_raw_text_element(&mut self, mut elem: Element, text: &str) {
        if !text.is_empty() {
            elem.children.push(Node::Text(text.to_string()));
        }
        self.add_node(Node::Element(elem));
    }

    fn start_tag(&mut self, elem: Element) {
        self.stack.push(elem);
    }

    /// Close the nearest open element named `tag`, closing anything inside it.
    fn end_tag(&mut self, tag: &str) {
        let Some(idx) = self.stack.iter().rposition(|e| e.tag == tag) else {
            return;
        };
        while self.stack.len() > idx {
            if let Some(elem) = self.stack.pop() {
                self.add_node(Node::Element(elem));
            }
        }
    }

    fn finish(mut self) -> Vec<Node> {
        while let Some(elem) = self.stack.pop() {
            self.add_node(Node::Element(elem));
        }
        self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_element(nodes: &[Node]) -> &Element {
        nodes
            .iter()
            .find_map(|n| match n {
                Node::Element(e) => Some(e),
                _ => None,
            })
            .expect("no element")
    }

    #[test]
    fn test_attribute_order_and_values() {
        let nodes = parse(r#"<div id="a" Class='b c' data-json='[true,"x","y"]' hidden data-n=3>"#).unwrap();
        let div = first_element(&nodes);
        let attrs: Vec<_> = div
            .attrs
            .iter()
            .map(|a| (a.name.as_str(), a.value.as_deref()))
            .collect();
        assert_eq!(
            attrs,
            [
                ("id", Some("a")),
                ("Class", Some("b c")),
                ("data-json", Some(r#"[true,"x","y"]"#)),
                ("hidden", None),
                ("data-n", Some("3")),
            ]
        );
    }

    #[test]
    fn test_entities_decoded_in_attributes() {
        let nodes = parse(r#"<p data-x="[true,&quot;a&quot;]">"#).unwrap();
        assert_eq!(first_element(&nodes).attrs.get_str("data-x"), Some(r#"[true,"a"]"#));
    }

    #[test]
    fn test_quoted_gt_does_not_end_tag() {
        let nodes = parse(r#"<a title="1 > 0">x</a>"#).unwrap();
        let a = first_element(&nodes);
        assert_eq!(a.attrs.get_str("title"), Some("1 > 0"));
        assert_eq!(a.children, vec![Node::Text("x".into())]);
    }

    #[test]
    fn test_nesting_and_void_elements() {
        let nodes = parse("<DIV><img src=a.png><p>hi<br/>there</p></DIV>").unwrap();
        let div = first_element(&nodes);
        assert_eq!(div.tag, "div");
        assert_eq!(div.children.len(), 2);
        let Node::Element(p) = &div.children[1] else {
            panic!("expected <p>");
        };
        assert_eq!(p.children.len(), 3);
    }

    #[test]
    fn test_raw_text_elements() {
        let nodes = parse("<script>if (a < b) { x = '</div>'; }</script><p>ok</p>").unwrap();
        let script = first_element(&nodes);
        assert_eq!(
            script.children,
            vec![Node::Text("if (a < b) { x = '</div>'; }".into())]
        );
        assert_eq!(nodes.len(), 2);
    }

    #[test]
    fn test_unmatched_and_unclosed_tags() {
        let nodes = parse("</span><div><p>open").unwrap();
        let div = first_element(&nodes);
        assert_eq!(div.tag, "div");
        let Node::Element(p) = &div.children[0] else {
            panic!("expected <p>");
        };
        assert_eq!(p.children, vec![Node::Text("open".into())]);
    }

    #[test]
    fn test_stray_lt_is_text() {
        let nodes = parse("a < b").unwrap();
        assert_eq!(nodes, vec![Node::Text("a < b".into())]);
    }

    #[test]
    fn test_apostrophe_in_unquoted_value() {
        let nodes = parse(r#"<p data-x=it's>a</p><b xpc-class-if='[true, "on"]'>b</b>"#).unwrap();
        assert_eq!(nodes.len(), 2);
        let p = first_element(&nodes);
        assert_eq!(p.attrs.get_str("data-x"), Some("it's"));
        assert_eq!(p.children, vec![Node::Text("a".into())]);
        let Node::Element(b) = &nodes[1] else {
            panic!("expected <b>");
        };
        assert_eq!(b.attrs.get_str("xpc-class-if"), Some(r#"[true, "on"]"#));
    }

    #[test]
    fn test_quote_after_spaced_equals() {
        let nodes = parse(r#"<a title = "x > y" href=/z>z</a>"#).unwrap();
        let a = first_element(&nodes);
        assert_eq!(a.attrs.get_str("title"), Some("x > y"));
        assert_eq!(a.children, vec![Node::Text("z".into())]);
    }

    #[test]
    fn test_nesting_limit() {
        let ok = "<div>".repeat(MAX_DEPTH) + "x";
        assert!(parse(&ok).is_ok());
        // Void and raw text elements at the limit add no depth
        let leaves = "<div>".repeat(MAX_DEPTH) + "<br><script>1</script>";
        assert!(parse(&leaves).is_ok());

        let deep = "<div>".repeat(MAX_DEPTH) + "<span>";
        let err = parse(&deep).unwrap_err();
        assert_eq!(
            err,
            ParseError::TooDeep {
                tag: "span".into(),
                limit: MAX_DEPTH
            }
        );
        assert!(parse(&"<i>".repeat(100_000)).is_err());
    }
}
