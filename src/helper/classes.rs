//! Conditional classes (`xpc-class-*`).
//!
//! ```html
//! <div class="card" xpc-class-if='[true, "card--active"]'>
//! <li xpc-class-if-many='[[true, "first"], [false, "last"]]'>
//! ```
//!
//! Unlike the attribute helper, `if-many` and `if-else-many` are not
//! exclusive: both run when both are present. The single modes only run
//! when there is no `if-else-many` list. Each merge builds on the current
//! `class` of the output.

use serde::Deserialize;

use super::{TagContext, TagHelper, TagOutput, is_blank, merge_attribute};
use crate::marker::Marker;

const CLASS: &str = "class";

/// `(condition, classes)`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "(bool, String)")]
pub struct WhenClass {
    pub condition: bool,
    pub classes: String,
}

impl WhenClass {
    pub fn new(condition: bool, classes: impl Into<String>) -> Self {
        Self {
            condition,
            classes: classes.into(),
        }
    }
}

impl From<(bool, String)> for WhenClass {
    fn from((condition, classes): (bool, String)) -> Self {
        Self { condition, classes }
    }
}

/// `(condition, if_true, if_false)`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "(bool, String, String)")]
pub struct EitherClass {
    pub condition: bool,
    pub if_true: String,
    pub if_false: String,
}

impl EitherClass {
    pub fn new(condition: bool, if_true: impl Into<String>, if_false: impl Into<String>) -> Self {
        Self {
            condition,
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
}

impl From<(bool, String, String)> for EitherClass {
    fn from((condition, if_true, if_false): (bool, String, String)) -> Self {
        Self {
            condition,
            if_true,
            if_false,
        }
    }
}

/// Sets or appends `class` based on conditions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConditionalClasses {
    /// `xpc-class-if`
    pub when: Option<WhenClass>,
    /// `xpc-class-if-not`
    pub unless: Option<WhenClass>,
    /// `xpc-class-if-else`
    pub either: Option<EitherClass>,
    /// `xpc-class-if-many`
    pub when_many: Vec<WhenClass>,
    /// `xpc-class-if-else-many`
    pub either_many: Vec<EitherClass>,
}

/// Merge `classes` into the output's current `class`, then strip `marker`.
fn apply(output: &mut TagOutput<'_>, classes: &str, marker: Marker) {
    let existing = output.attributes.get_string(CLASS);
    merge_attribute(&mut output.attributes, CLASS, &existing, classes);
    output.attributes.remove(marker.name());
}

/// Each fragment followed by one space, blanks included.
fn join_fragments<'v>(fragments: impl Iterator<Item = &'v str>) -> String {
    let mut joined = String::new();
    for fragment in fragments {
        joined.push_str(fragment);
        joined.push(' ');
    }
    joined
}

impl TagHelper for ConditionalClasses {
    fn process(&self, _context: &TagContext<'_>, output: &mut TagOutput<'_>) {
        if !self.when_many.is_empty() {
            let classes = join_fragments(
                self.when_many
                    .iter()
                    .filter(|w| w.condition)
                    .map(|w| w.classes.as_str()),
            );
            apply(output, &classes, Marker::ClassIfMany);
        }

        if !self.either_many.is_empty() {
            let classes = join_fragments(self.either_many.iter().map(EitherClass::selected));
            apply(output, &classes, Marker::ClassIfElseMany);
        } else if let Some(either) = self
            .either
            .as_ref()
            .filter(|e| !is_blank(&e.if_true) && !is_blank(&e.if_false))
        {
            apply(output, either.selected(), Marker::ClassIfElse);
        } else if let Some(when) = self.when.as_ref().filter(|w| w.condition) {
            apply(output, &when.classes, Marker::ClassIf);
        } else if let Some(unless) = self.unless.as_ref().filter(|u| !u.condition) {
            apply(output, &unless.classes, Marker::ClassIfNot);
        }
    }
}
