//! Attribute vocabulary
//!
//! Every declarative attribute shares one prefix (`se-` by default). This
//! module owns the reserved names so the compiler, the augmenter and the
//! control scanner agree on them.

/// Navigation marker placed on an element inside or next to a container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavMarker {
    Next,
    Prev,
    Pagination,
    Scrollbar,
}

impl NavMarker {
    pub const ALL: [NavMarker; 4] = [
        NavMarker::Next,
        NavMarker::Prev,
        NavMarker::Pagination,
        NavMarker::Scrollbar,
    ];

    /// Attribute name without prefix
    pub fn suffix(self) -> &'static str {
        match self {
            NavMarker::Next => "button-next",
            NavMarker::Prev => "button-prev",
            NavMarker::Pagination => "pagination-el",
            NavMarker::Scrollbar => "scrollbar-el",
        }
    }
}

const INSTANCE: &str = "swiper-instances";
const BREAKPOINT: &str = "breakpoint";
const CONTROL: &str = "control";
const TARGET: &str = "target";
const SLIDE: &str = "slide";

/// Prefixed attribute names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeNames {
    prefix: String,
}

impl AttributeNames {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn full(&self, suffix: &str) -> String {
        format!("{}{}", self.prefix, suffix)
    }

    /// Marks a container and carries its instance name
    pub fn instance(&self) -> String {
        self.full(INSTANCE)
    }

    /// Names the breakpoint rule gating a container
    pub fn breakpoint(&self) -> String {
        self.full(BREAKPOINT)
    }

    /// Control type on a control element
    pub fn control(&self) -> String {
        self.full(CONTROL)
    }

    /// Target instance name on a control element
    pub fn target(&self) -> String {
        self.full(TARGET)
    }

    /// Slide index on a `slide-to` control
    pub fn slide(&self) -> String {
        self.full(SLIDE)
    }

    pub fn marker(&self, marker: NavMarker) -> String {
        self.full(marker.suffix())
    }

    /// Strip the prefix from an attribute name
    pub fn strip<'a>(&self, attribute: &'a str) -> Option<&'a str> {
        attribute.strip_prefix(self.prefix.as_str())
    }

    /// Prefix-stripped names that never carry configuration
    pub fn is_reserved(&self, key: &str) -> bool {
        matches!(key, INSTANCE | BREAKPOINT | CONTROL | TARGET | SLIDE)
            || NavMarker::ALL.iter().any(|m| m.suffix() == key)
    }
}

impl Default for AttributeNames {
    fn default() -> Self {
        Self::new("se-")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_names() {
        let names = AttributeNames::default();
        assert_eq!(names.instance(), "se-swiper-instances");
        assert_eq!(names.marker(NavMarker::Pagination), "se-pagination-el");
        assert_eq!(names.strip("se-speed"), Some("speed"));
        assert_eq!(names.strip("data-speed"), None);
    }

    #[test]
    fn test_reserved() {
        let names = AttributeNames::new("data-carousel-");
        assert!(names.is_reserved("swiper-instances"));
        assert!(names.is_reserved("button-next"));
        assert!(!names.is_reserved("speed"));
        assert_eq!(names.target(), "data-carousel-target");
    }
}
