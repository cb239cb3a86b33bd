//! Binding phase: parsed nodes -> nodes with decoded helper inputs.
//!
//! Every marker payload is decoded here so rendering itself never fails.
//! Parsing only fails on markup nested past `html::MAX_DEPTH`.

use serde::de::DeserializeOwned;

use super::{Bindings, MarkerError, RenderError};
use crate::helper::{ConditionalAttributes, ConditionalClasses, Density, WidthBreakpoint};
use crate::html::{self, Attributes, Element, Node};
use crate::marker::{HelperKind, Marker};
use crate::media::{ImageDescriptor, SizeConstraint};
use crate::{debug, log};

/// Attributes the image helper owns on `<img xpc-image>`.
const IMAGE_OVERRIDES: [&str; 3] = ["alt", "title", "loading"];

#[derive(Debug)]
pub(crate) enum BoundNode {
    Element(BoundElement),
    /// Text, comments and declarations, already serialized.
    Raw(String),
}

#[derive(Debug)]
pub(crate) struct BoundElement {
    pub tag: String,
    /// Attributes as written in the template.
    pub declared: Attributes,
    /// Starting output attributes: declared minus bound ones.
    pub attributes: Attributes,
    pub helpers: Vec<HelperInput>,
    pub children: Vec<BoundNode>,
}

/// Decoded input for one helper, instantiated at render time.
#[derive(Debug)]
pub(crate) enum HelperInput {
    Attributes(ConditionalAttributes),
    Classes(ConditionalClasses),
    Image(ImageInput),
    RichText,
}

#[derive(Debug, Default)]
pub(crate) struct ImageInput {
    pub image: Option<ImageDescriptor>,
    pub constraint: Option<SizeConstraint>,
    pub srcset: Vec<Density>,
    pub sizes: Vec<WidthBreakpoint>,
    pub alt: Option<String>,
    pub title: Option<String>,
    pub loading: Option<String>,
}

pub(crate) struct Binder<'b> {
    pub bindings: &'b Bindings,
    pub strict: bool,
}

impl Binder<'_> {
    pub fn bind(&self, nodes: Vec<Node>) -> Result<Vec<BoundNode>, RenderError> {
        let mut bound = Vec::with_capacity(nodes.len());
        for node in nodes {
            match node {
                Node::Element(elem) => bound.push(BoundNode::Element(self.bind_element(elem)?)),
                other => {
                    let mut raw = String::new();
                    html::render_nodes(std::slice::from_ref(&other), &mut raw);
                    // Merge with the previous raw run
                    match bound.last_mut() {
                        Some(BoundNode::Raw(prev)) => prev.push_str(&raw),
                        _ => bound.push(BoundNode::Raw(raw)),
                    }
                }
            }
        }
        Ok(bound)
    }

    fn bind_element(&self, elem: Element) -> Result<BoundElement, RenderError> {
        let Element {
            tag,
            attrs: declared,
            children,
        } = elem;

        let mut attributes = declared.clone();
        let helpers = self
            .bind_helpers(&tag, &declared, &mut attributes)
            .map_err(|source| RenderError::Marker {
                tag: tag.clone(),
                source,
            })?;
        let children = self.bind(children)?;

        Ok(BoundElement {
            tag,
            declared,
            attributes,
            helpers,
            children,
        })
    }

    /// Decode the helpers that target this element, removing their bound
    /// attributes from `output`.
    fn bind_helpers(
        &self,
        tag: &str,
        declared: &Attributes,
        output: &mut Attributes,
    ) -> Result<Vec<HelperInput>, MarkerError> {
        let present: Vec<Marker> = declared
            .iter()
            .filter_map(|attr| Marker::parse(&attr.name))
            .collect();
        let has = |kind| present.iter().any(|m| m.helper() == kind);
        let mut helpers = Vec::new();

        if has(HelperKind::Attributes) {
            helpers.push(HelperInput::Attributes(ConditionalAttributes {
                when: self.payload(declared, Marker::AttrIf)?,
                unless: self.payload(declared, Marker::AttrIfNot)?,
                either: self.payload(declared, Marker::AttrIfElse)?,
                when_many: self.payload(declared, Marker::AttrIfMany)?.unwrap_or_default(),
                either_many: self
                    .payload(declared, Marker::AttrIfElseMany)?
                    .unwrap_or_default(),
            }));
            remove_markers(output, HelperKind::Attributes);
        }

        if has(HelperKind::Classes) {
            helpers.push(HelperInput::Classes(ConditionalClasses {
                when: self.payload(declared, Marker::ClassIf)?,
                unless: self.payload(declared, Marker::ClassIfNot)?,
                either: self.payload(declared, Marker::ClassIfElse)?,
                when_many: self.payload(declared, Marker::ClassIfMany)?.unwrap_or_default(),
                either_many: self
                    .payload(declared, Marker::ClassIfElseMany)?
                    .unwrap_or_default(),
            }));
            remove_markers(output, HelperKind::Classes);
        }

        // Image helper targets <img xpc-image> only
        if tag == "img" && present.contains(&Marker::Image) {
            helpers.push(HelperInput::Image(self.bind_image(declared)?));
            remove_markers(output, HelperKind::Image);
            for name in IMAGE_OVERRIDES {
                output.remove(name);
            }
        }

        if present.contains(&Marker::RichTextWrap) {
            helpers.push(HelperInput::RichText);
            output.remove(Marker::RichTextWrap.name());
        }

        Ok(helpers)
    }

    fn bind_image(&self, declared: &Attributes) -> Result<ImageInput, MarkerError> {
        let constraint = match declared.get(Marker::ImageSizeConstraint.name()) {
            Some(attr) => match attr.value.as_deref().unwrap_or_default().parse() {
                Ok(constraint) => Some(constraint),
                Err(err) => self.recover(MarkerError::from(err))?,
            },
            None => None,
        };

        Ok(ImageInput {
            image: self.image(&declared.get_string(Marker::Image.name()))?,
            constraint,
            srcset: self.payload(declared, Marker::ImageSrcset)?.unwrap_or_default(),
            sizes: self.payload(declared, Marker::ImageSizes)?.unwrap_or_default(),
            alt: declared.get_str("alt").map(str::to_string),
            title: declared.get_str("title").map(str::to_string),
            loading: declared.get_str("loading").map(str::to_string),
        })
    }

    /// Resolve `xpc-image`: an inline JSON descriptor or a binding name.
    fn image(&self, value: &str) -> Result<Option<ImageDescriptor>, MarkerError> {
        let value = value.trim();
        if value.starts_with('{') {
            return match serde_json::from_str(value) {
                Ok(image) => Ok(Some(image)),
                Err(source) => self.recover(MarkerError::Payload {
                    marker: Marker::Image,
                    source,
                }),
            };
        }

        match self.bindings.image(value) {
            Some(image) => Ok(Some(image.clone())),
            None if self.strict => Err(MarkerError::UnknownImage(value.to_string())),
            None => {
                debug!("image"; "no binding named `{}`, element suppressed", value);
                Ok(None)
            }
        }
    }

    /// Decode the JSON payload of `marker`, `None` when absent.
    fn payload<T: DeserializeOwned>(
        &self,
        declared: &Attributes,
        marker: Marker,
    ) -> Result<Option<T>, MarkerError> {
        let Some(attr) = declared.get(marker.name()) else {
            return Ok(None);
        };
        match serde_json::from_str(attr.value.as_deref().unwrap_or_default()) {
            Ok(value) => Ok(Some(value)),
            Err(source) => self.recover(MarkerError::Payload { marker, source }),
        }
    }

    /// Strict mode fails; lenient mode warns and treats the marker as absent.
    fn recover<T>(&self, err: MarkerError) -> Result<Option<T>, MarkerError> {
        if self.strict {
            return Err(err);
        }
        log!("warning"; "{}, ignoring", err);
        Ok(None)
    }
}

fn remove_markers(output: &mut Attributes, kind: HelperKind) {
    for marker in Marker::of(kind) {
        output.remove(marker.name());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bind_one(html: &str, bindings: &Bindings, strict: bool) -> Result<BoundElement, RenderError> {
        let binder = Binder { bindings, strict };
        let mut nodes = binder.bind(html::parse(html).unwrap())?;
        match nodes.remove(0) {
            BoundNode::Element(elem) => Ok(elem),
            BoundNode::Raw(raw) => panic!("expected element, got {raw:?}"),
        }
    }

    #[test]
    fn test_decodes_attribute_payloads() {
        let elem = bind_one(
            r#"<div id="a" xpc-attr-if='[true, "data-x", "A"]' xpc-attr-if-many='[[false, "b", "c"]]'></div>"#,
            &Bindings::new(),
            true,
        )
        .unwrap();

        assert_eq!(elem.helpers.len(), 1);
        let HelperInput::Attributes(helper) = &elem.helpers[0] else {
            panic!("expected attribute helper");
        };
        assert!(helper.when.as_ref().is_some_and(|w| w.name == "data-x"));
        assert_eq!(helper.when_many.len(), 1);
        assert!(helper.unless.is_none());

        let names: Vec<_> = elem.attributes.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["id"]);
        assert_eq!(elem.declared.len(), 3);
    }

    #[test]
    fn test_strict_rejects_bad_payload() {
        let err = bind_one(
            r#"<span xpc-class-if="[true]"></span>"#,
            &Bindings::new(),
            true,
        )
        .unwrap_err();
        let RenderError::Marker { tag, source } = err else {
            panic!("expected marker error, got {err:?}");
        };
        assert_eq!(tag, "span");
        assert!(matches!(
            source,
            MarkerError::Payload {
                marker: Marker::ClassIf,
                ..
            }
        ));
    }

    #[test]
    fn test_lenient_drops_bad_payload() {
        let elem = bind_one(
            r#"<span class="a" xpc-class-if="oops"></span>"#,
            &Bindings::new(),
            false,
        )
        .unwrap();
        let HelperInput::Classes(helper) = &elem.helpers[0] else {
            panic!("expected class helper");
        };
        assert!(helper.when.is_none());
        assert!(!elem.attributes.contains("xpc-class-if"));
    }

    #[test]
    fn test_image_binding_and_overrides() {
        let mut bindings = Bindings::new();
        bindings.insert_image("hero", ImageDescriptor::new("/hero.jpg"));
        let elem = bind_one(
            r#"<img class="h" alt="Hero" xpc-image="hero" xpc-image-size-constraint="max:800" xpc-image-srcset="[[1, 400]]">"#,
            &bindings,
            true,
        )
        .unwrap();

        let HelperInput::Image(input) = &elem.helpers[0] else {
            panic!("expected image helper");
        };
        assert_eq!(input.image.as_ref().unwrap().relative_path, "/hero.jpg");
        assert_eq!(input.constraint, Some(SizeConstraint::MaxWidthOrHeight(800)));
        assert_eq!(input.srcset, [Density::new(1.0, 400)]);
        assert_eq!(input.alt.as_deref(), Some("Hero"));

        let names: Vec<_> = elem.attributes.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["class"]);
    }

    #[test]
    fn test_inline_image_descriptor() {
        let elem = bind_one(
            r#"<img xpc-image='{"relativePath": "/a.png", "width": 4}'>"#,
            &Bindings::new(),
            true,
        )
        .unwrap();
        let HelperInput::Image(input) = &elem.helpers[0] else {
            panic!("expected image helper");
        };
        assert_eq!(input.image.as_ref().unwrap().width, 4);
    }

    #[test]
    fn test_unknown_image_binding() {
        let err = bind_one(r#"<img xpc-image="nope">"#, &Bindings::new(), true).unwrap_err();
        let RenderError::Marker { source, .. } = err else {
            panic!("expected marker error, got {err:?}");
        };
        assert!(matches!(source, MarkerError::UnknownImage(name) if name == "nope"));

        let elem = bind_one(r#"<img xpc-image="nope">"#, &Bindings::new(), false).unwrap();
        let HelperInput::Image(input) = &elem.helpers[0] else {
            panic!("expected image helper");
        };
        assert!(input.image.is_none());
    }

    #[test]
    fn test_bad_constraint() {
        let html = r#"<img xpc-image='{"relativePath": "/a.png"}' xpc-image-size-constraint="huge">"#;
        let err = bind_one(html, &Bindings::new(), true).unwrap_err();
        let RenderError::Marker { source, .. } = err else {
            panic!("expected marker error, got {err:?}");
        };
        assert!(matches!(source, MarkerError::Constraint(_)));

        let elem = bind_one(html, &Bindings::new(), false).unwrap();
        let HelperInput::Image(input) = &elem.helpers[0] else {
            panic!("expected image helper");
        };
        assert_eq!(input.constraint, None);
    }

    #[test]
    fn test_image_markers_ignored_off_img() {
        let elem = bind_one(r#"<div xpc-image="hero" alt="x"></div>"#, &Bindings::new(), true)
            .unwrap();
        assert!(elem.helpers.is_empty());
        assert!(elem.attributes.contains("xpc-image"));
        assert!(elem.attributes.contains("alt"));
    }

    #[test]
    fn test_raw_nodes_are_merged() {
        let bindings = Bindings::new();
        let binder = Binder {
            bindings: &bindings,
            strict: false,
        };
        let nodes = binder
            .bind(html::parse("<!DOCTYPE html><!-- a -->text<p></p>").unwrap())
            .unwrap();
        assert_eq!(nodes.len(), 2);
        assert!(matches!(&nodes[0], BoundNode::Raw(raw) if raw == "<!DOCTYPE html><!-- a -->text"));
    }

    #[test]
    fn test_marker_names_case_insensitive() {
        let elem = bind_one(
            r#"<p XPC-Class-If='[true, "on"]' Xpc-Rich-Text-Wrap></p>"#,
            &Bindings::new(),
            true,
        )
        .unwrap();
        assert_eq!(elem.helpers.len(), 2);
        assert!(matches!(elem.helpers[0], HelperInput::Classes(_)));
        assert!(matches!(elem.helpers[1], HelperInput::RichText));
        assert!(elem.attributes.is_empty());
    }

    #[test]
    fn test_zero_srcset_candidate() {
        let html = r#"<img xpc-image='{"relativePath": "/a.png"}' xpc-image-srcset='[[1, 0]]'>"#;
        let err = bind_one(html, &Bindings::new(), true).unwrap_err();
        let RenderError::Marker { source, .. } = err else {
            panic!("expected marker error, got {err:?}");
        };
        assert!(matches!(
            source,
            MarkerError::Payload {
                marker: Marker::ImageSrcset,
                ..
            }
        ));

        let elem = bind_one(html, &Bindings::new(), false).unwrap();
        let HelperInput::Image(input) = &elem.helpers[0] else {
            panic!("expected image helper");
        };
        assert!(input.srcset.is_empty());
    }
}
