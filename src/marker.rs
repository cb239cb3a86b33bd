//! Marker attributes that trigger helpers.
//!
//! | Marker                      | Helper     | Payload                               |
//! |-----------------------------|------------|---------------------------------------|
//! | `xpc-attr-if`               | attributes | `[bool, name, value]`                 |
//! | `xpc-attr-if-not`           | attributes | `[bool, name, value]`                 |
//! | `xpc-attr-if-else`          | attributes | `[bool, name, if_true, if_false]`     |
//! | `xpc-attr-if-many`          | attributes | `[[bool, name, value], ...]`          |
//! | `xpc-attr-if-else-many`     | attributes | `[[bool, name, if_true, if_false]...]`|
//! | `xpc-class-if*`             | classes    | same, without `name`                  |
//! | `xpc-image`                 | image      | binding name or inline descriptor     |
//! | `xpc-image-size-constraint` | image      | `none`, `max:N`, `width:N`, ...       |
//! | `xpc-image-srcset`          | image      | `[[factor, max], ...]`                |
//! | `xpc-image-sizes`           | image      | `[[max, "breakpoint"], ...]`          |
//! | `xpc-rich-text-wrap`        | rich text  | none                                  |

use std::fmt;

/// Helper family a marker belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HelperKind {
    Attributes,
    Classes,
    Image,
    RichText,
}

impl HelperKind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Attributes => "attributes",
            Self::Classes => "classes",
            Self::Image => "image",
            Self::RichText => "rich-text",
        }
    }
}

impl fmt::Display for HelperKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A recognized marker attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    AttrIf,
    AttrIfNot,
    AttrIfElse,
    AttrIfMany,
    AttrIfElseMany,
    ClassIf,
    ClassIfNot,
    ClassIfElse,
    ClassIfMany,
    ClassIfElseMany,
    Image,
    ImageSizeConstraint,
    ImageSrcset,
    ImageSizes,
    RichTextWrap,
}

/// Diagnostic attribute set when an image descriptor has no path.
pub const IMAGE_ERROR_ATTR: &str = "data-xpc-image-error";

/// Message carried by [`IMAGE_ERROR_ATTR`].
pub const IMAGE_PATH_MISSING: &str = "Image path is missing";

impl Marker {
    pub const ALL: [Marker; 15] = [
        Self::AttrIf,
        Self::AttrIfNot,
        Self::AttrIfElse,
        Self::AttrIfMany,
        Self::AttrIfElseMany,
        Self::ClassIf,
        Self::ClassIfNot,
        Self::ClassIfElse,
        Self::ClassIfMany,
        Self::ClassIfElseMany,
        Self::Image,
        Self::ImageSizeConstraint,
        Self::ImageSrcset,
        Self::ImageSizes,
        Self::RichTextWrap,
    ];

    /// Markers consumed by the image helper.
    pub const IMAGE: [Marker; 4] = [
        Self::Image,
        Self::ImageSizeConstraint,
        Self::ImageSrcset,
        Self::ImageSizes,
    ];

    /// Attribute name as written in markup.
    pub const fn name(self) -> &'static str {
        match self {
            Self::AttrIf => "xpc-attr-if",
            Self::AttrIfNot => "xpc-attr-if-not",
            Self::AttrIfElse => "xpc-attr-if-else",
            Self::AttrIfMany => "xpc-attr-if-many",
            Self::AttrIfElseMany => "xpc-attr-if-else-many",
            Self::ClassIf => "xpc-class-if",
            Self::ClassIfNot => "xpc-class-if-not",
            Self::ClassIfElse => "xpc-class-if-else",
            Self::ClassIfMany => "xpc-class-if-many",
            Self::ClassIfElseMany => "xpc-class-if-else-many",
            Self::Image => "xpc-image",
            Self::ImageSizeConstraint => "xpc-image-size-constraint",
            Self::ImageSrcset => "xpc-image-srcset",
            Self::ImageSizes => "xpc-image-sizes",
            Self::RichTextWrap => "xpc-rich-text-wrap",
        }
    }

    pub const fn helper(self) -> HelperKind {
        match self {
            Self::AttrIf
            | Self::AttrIfNot
            | Self::AttrIfElse
            | Self::AttrIfMany
            | Self::AttrIfElseMany => HelperKind::Attributes,
            Self::ClassIf
            | Self::ClassIfNot
            | Self::ClassIfElse
            | Self::ClassIfMany
            | Self::ClassIfElseMany => HelperKind::Classes,
            Self::Image | Self::ImageSizeConstraint | Self::ImageSrcset | Self::ImageSizes => {
                HelperKind::Image
            }
            Self::RichTextWrap => HelperKind::RichText,
        }
    }

    /// Short payload description for help output.
    pub const fn payload(self) -> &'static str {
        match self {
            Self::AttrIf | Self::AttrIfNot => "[bool, name, value]",
            Self::AttrIfElse => "[bool, name, if_true, if_false]",
            Self::AttrIfMany => "[[bool, name, value], ...]",
            Self::AttrIfElseMany => "[[bool, name, if_true, if_false], ...]",
            Self::ClassIf | Self::ClassIfNot => "[bool, classes]",
            Self::ClassIfElse => "[bool, if_true, if_false]",
            Self::ClassIfMany => "[[bool, classes], ...]",
            Self::ClassIfElseMany => "[[bool, if_true, if_false], ...]",
            Self::Image => "binding name | {\"relativePath\": ...}",
            Self::ImageSizeConstraint => "none | max:N | width:N | height:N | size:WxH",
            Self::ImageSrcset => "[[factor, max], ...]",
            Self::ImageSizes => "[[max, \"breakpoint\"], ...]",
            Self::RichTextWrap => "(presence only)",
        }
    }

    /// Look up a marker by attribute name (ASCII case-insensitive).
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(name))
    }

    /// Markers belonging to `kind`, in declaration order.
    pub fn of(kind: HelperKind) -> impl Iterator<Item = Marker> {
        Self::ALL.into_iter().filter(move |m| m.helper() == kind)
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
