//! Rich-text wrapper (`xpc-rich-text-wrap`).
//!
//! ```html
//! <p xpc-rich-text-wrap>{{ body }}</p>
//! ```
//!
//! Editors often produce content that is already wrapped in a `<p>`. When
//! the rendered children start with an element of the same tag, the outer
//! element is dropped and only its children are emitted.

use super::{TagContext, TagHelper, TagOutput};
use crate::marker::Marker;

/// Drops the wrapper element when the content already opens with the same tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RichTextWrap;

/// Whether `content` opens with `<{tag} ` (ASCII case-insensitive).
///
/// The space is required, so `<p>` alone does not match.
fn starts_with_tag(content: &str, tag: &str) -> bool {
    let Some(rest) = content.strip_prefix('<') else {
        return false;
    };
    rest.len() > tag.len()
        && rest.is_char_boundary(tag.len())
        && rest[..tag.len()].eq_ignore_ascii_case(tag)
        && rest[tag.len()..].starts_with(' ')
}

impl TagHelper for RichTextWrap {
    async fn process_async(&self, context: &TagContext<'_>, output: &mut TagOutput<'_>) {
        let content = output.child_content().await.trim_start();
        let unwrap = content.starts_with('<') && starts_with_tag(content, context.tag_name());

        output.attributes.remove(Marker::RichTextWrap.name());
        if unwrap {
            output.set_tag_name(None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::Attributes;

    async fn run(tag: &str, content: &str) -> TagOutput<'static> {
        let declared = Attributes::from([("xpc-rich-text-wrap", "")]);
        let context = TagContext::new(tag, &declared);
        let mut output = TagOutput::new(tag, declared.clone()).with_content(content);
        RichTextWrap.process_async(&context, &mut output).await;
        output
    }

    #[tokio::test]
    async fn test_same_tag_with_attributes_unwraps() {
        let out = run("p", "<p class=\"x\">hi</p>").await;
        assert_eq!(out.tag_name(), None);
        assert!(!out.attributes.contains("xpc-rich-text-wrap"));
    }

    #[tokio::test]
    async fn test_other_tag_is_kept() {
        let out = run("p", "<span>hi</span>").await;
        assert_eq!(out.tag_name(), Some("p"));
        assert!(!out.attributes.contains("xpc-rich-text-wrap"));
    }

    #[tokio::test]
    async fn test_plain_text_is_kept() {
        let out = run("p", "plain text").await;
        assert_eq!(out.tag_name(), Some("p"));
    }

    #[tokio::test]
    async fn test_bare_tag_without_space_is_kept() {
        let out = run("p", "<p>hi</p>").await;
        assert_eq!(out.tag_name(), Some("p"));
    }

    #[tokio::test]
    async fn test_leading_whitespace_and_case() {
        let out = run("div", "\n   <DIV id=\"a\">x</DIV>").await;
        assert_eq!(out.tag_name(), None);
    }

    #[tokio::test]
    async fn test_longer_tag_name_does_not_match() {
        let out = run("div", "<divider class=\"x\"></divider>").await;
        assert_eq!(out.tag_name(), Some("div"));
    }

    #[tokio::test]
    async fn test_empty_content() {
        let out = run("p", "").await;
        assert_eq!(out.tag_name(), Some("p"));
        assert!(!out.attributes.contains("xpc-rich-text-wrap"));
    }

    #[test]
    fn test_starts_with_tag() {
        assert!(starts_with_tag("<p class=\"x\">", "p"));
        assert!(starts_with_tag("<P id=\"a\">", "p"));
        assert!(!starts_with_tag("<p>", "p"));
        assert!(!starts_with_tag("<pre class=\"x\">", "p"));
        assert!(!starts_with_tag("<é x>", "p"));
        assert!(!starts_with_tag("p x", "p"));
    }
}
