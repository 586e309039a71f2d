//! Values the suggest box can offer and select.

/// A selectable suggestion.
///
/// Items are opaque to the widget apart from their display text.  Equality is
/// whatever the caller's [`PartialEq`] says; the widget never deduplicates.
pub trait Item: Clone + PartialEq + Send + Sync + 'static {
    /// The text shown in the dropdown and in the selection chips, and the
    /// text the default filter searches.
    fn label(&self) -> &str;
}

impl Item for String {
    fn label(&self) -> &str {
        self
    }
}

impl Item for &'static str {
    fn label(&self) -> &str {
        self
    }
}

/// A record item displayed by its `name` field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Named {
    pub name: String,
}

impl Named {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Item for Named {
    fn label(&self) -> &str {
        &self.name
    }
}

impl From<&str> for Named {
    fn from(name: &str) -> Self {
        Named::new(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels() {
        assert_eq!(String::from("apple").label(), "apple");
        assert_eq!("pear".label(), "pear");
        assert_eq!(Named::new("aab").label(), "aab");
    }
}
