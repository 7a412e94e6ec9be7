//! Generic attributes of city objects.

/// A single attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    /// Free text.
    Text(String),
    /// A number.
    Number(f64),
    /// A nested attribute group.
    Nested(AttributeSet),
}

/// One named attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    /// Attribute key.
    pub key: String,
    /// Attribute value.
    pub value: AttributeValue,
}

/// An ordered set of attributes, possibly nested.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AttributeSet {
    /// The attributes in insertion order.
    pub entries: Vec<Attribute>,
}

impl AttributeSet {
    /// An empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text attribute.
    pub fn push_text(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.push(Attribute {
            key: key.into(),
            value: AttributeValue::Text(value.into()),
        });
    }

    /// Append a numeric attribute.
    pub fn push_number(&mut self, key: impl Into<String>, value: f64) {
        self.entries.push(Attribute {
            key: key.into(),
            value: AttributeValue::Number(value),
        });
    }

    /// Append a nested group.
    pub fn push_nested(&mut self, key: impl Into<String>, nested: AttributeSet) {
        self.entries.push(Attribute {
            key: key.into(),
            value: AttributeValue::Nested(nested),
        });
    }

    /// Whether the set has no attributes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Flatten nested groups into dotted keys (`parent.child`).
    #[must_use]
    pub fn flattened(&self) -> AttributeSet {
        let mut flat = AttributeSet::new();
        self.flatten_into(&mut flat, "");
        flat
    }

    fn flatten_into(&self, target: &mut AttributeSet, prefix: &str) {
        for attribute in &self.entries {
            let key = if prefix.is_empty() {
                attribute.key.clone()
            } else {
                format!("{prefix}.{}", attribute.key)
            };
            match &attribute.value {
                AttributeValue::Nested(nested) => nested.flatten_into(target, &key),
                value => target.entries.push(Attribute {
                    key,
                    value: value.clone(),
                }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_dotted_keys() {
        let mut inner = AttributeSet::new();
        inner.push_text("surface", "asphalt");
        inner.push_number("friction", 0.8);

        let mut outer = AttributeSet::new();
        outer.push_text("name", "lane");
        outer.push_nested("material", inner);

        let flat = outer.flattened();
        let keys: Vec<&str> = flat.entries.iter().map(|a| a.key.as_str()).collect();
        assert_eq!(keys, vec!["name", "material.surface", "material.friction"]);
    }

    #[test]
    fn test_flatten_is_identity_for_flat_sets() {
        let mut set = AttributeSet::new();
        set.push_text("a", "1");
        set.push_number("b", 2.0);
        assert_eq!(set.flattened(), set);
    }
}
