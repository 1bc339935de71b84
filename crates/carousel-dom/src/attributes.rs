//! Element Attributes
//!
//! Ordered attribute storage. Iteration order is insertion order, which is
//! what the configuration compiler walks.

/// Single attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr {
    pub name: String,
    pub value: String,
}

impl Attr {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Attribute collection of one element
#[derive(Debug, Clone, Default)]
pub struct AttributeMap {
    attributes: Vec<Attr>,
}

impl AttributeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of attributes
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Get attribute value
    pub fn get(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Check if attribute exists
    pub fn contains(&self, name: &str) -> bool {
        self.attributes.iter().any(|a| a.name == name)
    }

    /// Set attribute, keeping the original position when it already exists.
    /// Returns the previous value.
    pub fn set(&mut self, name: &str, value: &str) -> Option<String> {
        if let Some(attr) = self.attributes.iter_mut().find(|a| a.name == name) {
            return Some(std::mem::replace(&mut attr.value, value.to_string()));
        }
        self.attributes.push(Attr::new(name, value));
        None
    }

    /// Remove attribute by name
    pub fn remove(&mut self, name: &str) -> Option<Attr> {
        let index = self.attributes.iter().position(|a| a.name == name)?;
        Some(self.attributes.remove(index))
    }

    /// Iterate over attributes in document order
    pub fn iter(&self) -> impl Iterator<Item = &Attr> {
        self.attributes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_attribute() {
        let mut attrs = AttributeMap::new();
        attrs.set("class", "slider");
        attrs.set("se-speed", "300");

        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs.get("class"), Some("slider"));
        assert_eq!(attrs.get("se-speed"), Some("300"));
        assert_eq!(attrs.get("missing"), None);
    }

    #[test]
    fn test_overwrite_keeps_position() {
        let mut attrs = AttributeMap::new();
        attrs.set("a", "1");
        attrs.set("b", "2");
        assert_eq!(attrs.set("a", "3"), Some("1".to_string()));

        let names: Vec<&str> = attrs.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(attrs.get("a"), Some("3"));
    }

    #[test]
    fn test_remove_attribute() {
        let mut attrs = AttributeMap::new();
        attrs.set("role", "region");

        assert!(attrs.contains("role"));
        assert!(attrs.remove("role").is_some());
        assert!(!attrs.contains("role"));
        assert!(attrs.remove("role").is_none());
    }
}
