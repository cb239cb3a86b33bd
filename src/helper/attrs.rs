//! Conditional attribute values (`xpc-attr-*`).
//!
//! ```html
//! <button xpc-attr-if='[true, "aria-pressed", "true"]'>
//! <li xpc-attr-if-many='[[true, "data-a", "1"], [false, "data-a", "2"]]'>
//! ```
//!
//! Exactly one mode runs per element. Precedence, highest first:
//! `if-else-many`, `if-many`, `if-else`, `if`, `if-not`.

use serde::Deserialize;

use super::{TagContext, TagHelper, TagOutput, is_blank, merge_attribute};
use crate::marker::Marker;

/// `(condition, name, value)`: applies `value` to `name` on a condition.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "(bool, String, String)")]
pub struct WhenAttr {
    pub condition: bool,
    pub name: String,
    pub value: String,
}

impl WhenAttr {
    pub fn new(condition: bool, name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            condition,
            name: name.into(),
            value: value.into(),
        }
    }
}

impl From<(bool, String, String)> for WhenAttr {
    fn from((condition, name, value): (bool, String, String)) -> Self {
        Self {
            condition,
            name,
            value,
        }
    }
}

/// `(condition, name, if_true, if_false)`: picks one of two values for `name`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "(bool, String, String, String)")]
pub struct EitherAttr {
    pub condition: bool,
    pub name: String,
    pub if_true: String,
    pub if_false: String,
}

impl EitherAttr {
    pub fn new(
        condition: bool,
        name: impl Into<String>,
        if_true: impl Into<String>,
        if_false: impl Into<String>,
    ) -> Self {
        Self {
            condition,
            name: name.into(),
            if_true: if_true.into(),
            if_false: if_false.into(),
        }
    }

    pub fn selected(&self) -> &str {
        if self.condition {
            &self.if_true
        } else {
            &self.if_false
        }
    }

    /// Both branches carry a value.
    fn is_complete(&self) -> bool {
        !is_blank(&self.if_true) && !is_blank(&self.if_false)
    }
}

impl From<(bool, String, String, String)> for EitherAttr {
    fn from((condition, name, if_true, if_false): (bool, String, String, String)) -> Self {
        Self {
            condition,
            name,
            if_true,
            if_false,
        }
    }
}

/// Sets or appends attribute values based on conditions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConditionalAttributes {
    /// `xpc-attr-if`: applied when the condition is true.
    pub when: Option<WhenAttr>,
    /// `xpc-attr-if-not`: applied when the condition is false.
    pub unless: Option<WhenAttr>,
    /// `xpc-attr-if-else`
    pub either: Option<EitherAttr>,
    /// `xpc-attr-if-many`
    pub when_many: Vec<WhenAttr>,
    /// `xpc-attr-if-else-many`
    pub either_many: Vec<EitherAttr>,
}

impl ConditionalAttributes {
    /// Apply grouped values, then strip `marker`.
    fn apply_grouped<'v>(
        context: &TagContext<'_>,
        output: &mut TagOutput<'_>,
        values: impl Iterator<Item = (&'v str, &'v str)>,
        marker: Marker,
    ) {
        for (name, value) in group_by_name(values) {
            merge_attribute(
                &mut output.attributes,
                name,
                &context.attribute_string(name),
                &value,
            );
        }
        output.attributes.remove(marker.name());
    }

    fn apply_single(
        context: &TagContext<'_>,
        output: &mut TagOutput<'_>,
        name: &str,
        value: &str,
        marker: Marker,
    ) {
        if !is_blank(name) {
            merge_attribute(
                &mut output.attributes,
                name,
                &context.attribute_string(name),
                value,
            );
        }
        output.attributes.remove(marker.name());
    }
}

impl TagHelper for ConditionalAttributes {
    fn process(&self, context: &TagContext<'_>, output: &mut TagOutput<'_>) {
        if !self.either_many.is_empty() {
            let values = self
                .either_many
                .iter()
                .map(|e| (e.name.as_str(), e.selected()));
            Self::apply_grouped(context, output, values, Marker::AttrIfElseMany);
        } else if !self.when_many.is_empty() {
            let values = self
                .when_many
                .iter()
                .filter(|w| w.condition)
                .map(|w| (w.name.as_str(), w.value.as_str()));
            Self::apply_grouped(context, output, values, Marker::AttrIfMany);
        } else if let Some(either) = self.either.as_ref().filter(|e| e.is_complete()) {
            Self::apply_single(
                context,
                output,
                &either.name,
                either.selected(),
                Marker::AttrIfElse,
            );
        } else if let Some(when) = self.when.as_ref().filter(|w| w.condition) {
            Self::apply_single(context, output, &when.name, &when.value, Marker::AttrIf);
        } else if let Some(unless) = self.unless.as_ref().filter(|u| !u.condition) {
            Self::apply_single(
                context,
                output,
                &unless.name,
                &unless.value,
                Marker::AttrIfNot,
            );
        }
    }
}

/// Group values by attribute name in first-seen order, space-joined.
fn group_by_name<'v>(values: impl Iterator<Item = (&'v str, &'v str)>) -> Vec<(&'v str, String)> {
    let mut grouped: Vec<(&str, String)> = Vec::new();
    for (name, value) in values {
        if is_blank(name) {
            continue;
        }
        match grouped.iter_mut().find(|(n, _)| *n == name) {
            Some((_, joined)) => {
                joined.push(' ');
                joined.push_str(value);
            }
            None => grouped.push((name, value.to_string())),
        }
    }
    grouped
}
