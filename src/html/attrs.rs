//! Ordered attribute list with case-insensitive name lookup.

use smallvec::SmallVec;

/// A single attribute. `value` is `None` for valueless attributes (`hidden`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: Option<String>,
}

/// Attributes in declaration order.
///
/// Names compare ASCII case-insensitively; `set` keeps the position of an
/// existing attribute and appends new ones at the end.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(SmallVec<[Attribute; 4]>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        self.0.iter()
    }

    /// First attribute matching `name`.
    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.0.iter().find(|a| a.name.eq_ignore_ascii_case(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Raw value of `name`; `None` when absent or valueless.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|a| a.value.as_deref())
    }

    /// Display value of `name`, empty when absent or valueless.
    pub fn get_string(&self, name: &str) -> String {
        self.get_str(name).unwrap_or_default().to_string()
    }

    /// Set `name` to `value`, replacing every existing occurrence.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let value = Some(value.into());
        match self.0.iter().position(|a| a.name.eq_ignore_ascii_case(name)) {
            Some(idx) => {
                self.0[idx].value = value;
                // Drop later duplicates so the element carries one value
                let mut seen = 0usize;
                self.0.retain(|a| {
                    if !a.name.eq_ignore_ascii_case(name) {
                        return true;
                    }
                    seen += 1;
                    seen == 1
                });
            }
            None => self.0.push(Attribute {
                name: name.to_string(),
                value,
            }),
        }
    }

    /// Append an attribute as parsed, keeping duplicates.
    pub fn push(&mut self, name: impl Into<String>, value: Option<String>) {
        self.0.push(Attribute {
            name: name.into(),
            value,
        });
    }

    pub fn push_valueless(&mut self, name: impl Into<String>) {
        self.push(name, None);
    }

    /// Remove every attribute named `name`. Returns whether anything was removed.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|a| !a.name.eq_ignore_ascii_case(name));
        self.0.len() != before
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for Attributes {
    fn from_iter<T: IntoIterator<Item = (&'a str, &'a str)>>(iter: T) -> Self {
        let mut attrs = Self::new();
        for (name, value) in iter {
            attrs.push(name, Some(value.to_string()));
        }
        attrs
    }
}

impl<'a, const N: usize> From<[(&'a str, &'a str); N]> for Attributes {
    fn from(pairs: [(&'a str, &'a str); N]) -> Self {
        pairs.into_iter().collect()
    }
}
