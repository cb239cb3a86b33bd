//! Tag helpers: per-element transforms triggered by marker attributes.
//!
//! # Modules
//!
//! - `attrs`: conditional attribute values (`xpc-attr-*`)
//! - `classes`: conditional classes (`xpc-class-*`)
//! - `image`: responsive `<img>` attributes (`xpc-image*`)
//! - `rich_text`: drops a wrapper already present in rich text (`xpc-rich-text-wrap`)
//!
//! A helper sees the element's declared attributes through [`TagContext`]
//! and mutates a [`TagOutput`]. The host applies the output: attribute
//! changes, suppression of the whole element, or dropping just the tag.

mod attrs;
mod classes;
mod image;
mod rich_text;

pub use attrs::{ConditionalAttributes, EitherAttr, WhenAttr};
pub use classes::{ConditionalClasses, EitherClass, WhenClass};
pub use image::{CandidateError, Density, ImageTagHelper, WidthBreakpoint};
pub use rich_text::RichTextWrap;

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use crate::html::Attributes;

/// Future resolving to rendered child markup.
pub type ContentFuture<'a> = Pin<Box<dyn Future<Output = String> + 'a>>;

type DeferredContent<'a> = Box<dyn FnOnce() -> ContentFuture<'a> + 'a>;

// =============================================================================
// Context / Output
// =============================================================================

/// Read-only view of the element as declared in the template.
#[derive(Debug, Clone, Copy)]
pub struct TagContext<'a> {
    tag_name: &'a str,
    all_attributes: &'a Attributes,
}

impl<'a> TagContext<'a> {
    pub fn new(tag_name: &'a str, all_attributes: &'a Attributes) -> Self {
        Self {
            tag_name,
            all_attributes,
        }
    }

    pub fn tag_name(&self) -> &'a str {
        self.tag_name
    }

    /// Declared value of `name` as a display string (empty when absent).
    pub fn attribute_string(&self, name: &str) -> String {
        self.all_attributes.get_string(name)
    }
}

/// Mutable result of running helpers on one element.
pub struct TagOutput<'a> {
    tag_name: Option<String>,
    pub attributes: Attributes,
    suppressed: bool,
    content: String,
    deferred: Option<DeferredContent<'a>>,
}

impl fmt::Debug for TagOutput<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagOutput")
            .field("tag_name", &self.tag_name)
            .field("attributes", &self.attributes)
            .field("suppressed", &self.suppressed)
            .field("content", &self.content)
            .field("deferred", &self.deferred.is_some())
            .finish()
    }
}

impl<'a> TagOutput<'a> {
    /// Output for `tag_name` with no child content.
    pub fn new(tag_name: &str, attributes: Attributes) -> Self {
        Self {
            tag_name: Some(tag_name.to_string()),
            attributes,
            suppressed: false,
            content: String::new(),
            deferred: None,
        }
    }

    /// Use already-rendered child markup.
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self.deferred = None;
        self
    }

    /// Render children only when someone asks for them.
    pub fn with_deferred_content(
        mut self,
        render: impl FnOnce() -> ContentFuture<'a> + 'a,
    ) -> Self {
        self.deferred = Some(Box::new(render));
        self
    }

    /// Rendered child markup, rendering it on first access.
    pub async fn child_content(&mut self) -> &str {
        if let Some(render) = self.deferred.take() {
            self.content = render().await;
        }
        &self.content
    }

    /// Consume the output's child markup.
    pub async fn into_content(mut self) -> String {
        self.child_content().await;
        self.content
    }

    /// `None` when the tag itself is dropped and only children are emitted.
    pub fn tag_name(&self) -> Option<&str> {
        self.tag_name.as_deref()
    }

    pub fn set_tag_name(&mut self, tag_name: Option<String>) {
        self.tag_name = tag_name;
    }

    /// Drop the element and its children from output.
    pub fn suppress_output(&mut self) {
        self.suppressed = true;
    }

    pub fn is_suppressed(&self) -> bool {
        self.suppressed
    }
}

// =============================================================================
// Helper trait
// =============================================================================

/// An element transform.
///
/// Implement `process` for synchronous helpers; override `process_async`
/// when the helper must wait for child content.
#[allow(async_fn_in_trait)]
pub trait TagHelper {
    /// Lower runs first; equal orders keep registration order.
    fn order(&self) -> i32 {
        0
    }

    fn process(&self, _context: &TagContext<'_>, _output: &mut TagOutput<'_>) {}

    async fn process_async(&self, context: &TagContext<'_>, output: &mut TagOutput<'_>) {
        self.process(context, output);
    }
}

/// The closed set of helpers the host can attach to an element.
pub enum Helper<'a> {
    Attributes(&'a ConditionalAttributes),
    Classes(&'a ConditionalClasses),
    Image(ImageTagHelper<'a>),
    RichText(RichTextWrap),
}

impl Helper<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Attributes(_) => "attributes",
            Self::Classes(_) => "classes",
            Self::Image(_) => "image",
            Self::RichText(_) => "rich-text",
        }
    }

    pub fn order(&self) -> i32 {
        match self {
            Self::Attributes(h) => h.order(),
            Self::Classes(h) => h.order(),
            Self::Image(h) => h.order(),
            Self::RichText(h) => h.order(),
        }
    }

    pub async fn run(&self, context: &TagContext<'_>, output: &mut TagOutput<'_>) {
        match self {
            Self::Attributes(h) => h.process_async(context, output).await,
            Self::Classes(h) => h.process_async(context, output).await,
            Self::Image(h) => h.process_async(context, output).await,
            Self::RichText(h) => h.process_async(context, output).await,
        }
    }
}

// =============================================================================
// Merge rule
// =============================================================================

/// Empty or whitespace-only.
#[inline]
pub(crate) fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// Combine an existing attribute value with a conditional one.
///
/// | existing | incoming | result                    |
/// |----------|----------|---------------------------|
/// | blank    | blank    | untouched (nothing added) |
/// | blank    | V        | `V`                       |
/// | E        | blank    | untouched (`E` stays)     |
/// | E        | V        | `E V`                     |
pub fn merge_attribute(output: &mut Attributes, name: &str, existing: &str, incoming: &str) {
    match (is_blank(existing), is_blank(incoming)) {
        (_, true) => {}
        (true, false) => output.set(name, incoming),
        (false, false) => output.set(name, format!("{existing} {incoming}")),
    }
}
