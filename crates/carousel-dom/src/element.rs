//! Element queries
//!
//! The capability set the carousel crates need from a document: selector
//! lookups scoped to a subtree, parent/child navigation, attribute and class
//! access, and inline style writes.

use crate::{ElementData, NodeId};

/// Simple selector for matching
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
    Universal,
    Tag(String),
    Class(String),
    Id(String),
    /// `[name]`
    Attribute(String),
    /// `[name="value"]`
    AttributeEquals { name: String, value: String },
}

impl SimpleSelector {
    /// Parse a simple selector string
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }

        if s == "*" {
            return Some(Self::Universal);
        }
        if let Some(inner) = s.strip_prefix('[').and_then(|r| r.strip_suffix(']')) {
            return match inner.split_once('=') {
                Some((name, value)) => {
                    let value = value.trim().trim_matches(|c| c == '"' || c == '\'');
                    Some(Self::attribute_equals(name.trim(), value))
                }
                None => Some(Self::attribute(inner.trim())),
            };
        }
        if let Some(id) = s.strip_prefix('#') {
            Some(Self::Id(id.to_string()))
        } else if let Some(class) = s.strip_prefix('.') {
            Some(Self::Class(class.to_string()))
        } else {
            Some(Self::Tag(s.to_ascii_lowercase()))
        }
    }

    pub fn attribute(name: &str) -> Self {
        Self::Attribute(name.to_string())
    }

    pub fn attribute_equals(name: &str, value: &str) -> Self {
        Self::AttributeEquals {
            name: name.to_string(),
            value: value.to_string(),
        }
    }

    /// Check an element against this selector
    pub fn matches(&self, element: &ElementData) -> bool {
        match self {
            Self::Universal => true,
            Self::Tag(tag) => element.tag().eq_ignore_ascii_case(tag),
            Self::Class(class) => element.classes().contains(class),
            Self::Id(id) => element.attr("id") == Some(id.as_str()),
            Self::Attribute(name) => element.attrs().contains(name),
            Self::AttributeEquals { name, value } => element.attr(name) == Some(value.as_str()),
        }
    }
}

impl std::fmt::Display for SimpleSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Universal => f.write_str("*"),
            Self::Tag(tag) => f.write_str(tag),
            Self::Class(class) => write!(f, ".{class}"),
            Self::Id(id) => write!(f, "#{id}"),
            Self::Attribute(name) => write!(f, "[{name}]"),
            Self::AttributeEquals { name, value } => write!(f, "[{name}=\"{value}\"]"),
        }
    }
}

/// Element capability interface
///
/// Lookups never include `scope` itself, only its descendants, in document
/// order. Element ids that do not refer to elements behave as empty.
pub trait ElementTree {
    /// Topmost node searched by document-wide scans
    fn root(&self) -> NodeId;

    /// Parent element, if the parent is an element
    fn parent_element(&self, node: NodeId) -> Option<NodeId>;

    /// Element children in order
    fn element_children(&self, node: NodeId) -> Vec<NodeId>;

    /// First element child
    fn first_element_child(&self, node: NodeId) -> Option<NodeId> {
        self.element_children(node).into_iter().next()
    }

    /// First descendant of `scope` matching `selector`
    fn find_descendant(&self, scope: NodeId, selector: &SimpleSelector) -> Option<NodeId>;

    /// All descendants of `scope` matching `selector`
    fn find_all(&self, scope: NodeId, selector: &SimpleSelector) -> Vec<NodeId>;

    /// Attributes as (name, value) pairs in declaration order
    fn attributes(&self, element: NodeId) -> Vec<(String, String)>;

    fn get_attribute(&self, element: NodeId, name: &str) -> Option<&str>;

    fn has_attribute(&self, element: NodeId, name: &str) -> bool {
        self.get_attribute(element, name).is_some()
    }

    fn set_attribute(&mut self, element: NodeId, name: &str, value: &str);

    fn remove_attribute(&mut self, element: NodeId, name: &str);

    /// Class tokens in declaration order
    fn class_list(&self, element: NodeId) -> Vec<String>;

    fn has_class(&self, element: NodeId, class: &str) -> bool {
        self.class_list(element).iter().any(|c| c == class)
    }

    /// Force a class on or off
    fn toggle_class(&mut self, element: NodeId, class: &str, force: bool);

    /// Write an inline style property
    fn set_style_property(&mut self, element: NodeId, name: &str, value: &str);

    /// Short human-readable description for diagnostics
    fn describe(&self, element: NodeId) -> String {
        let classes = self.class_list(element);
        if classes.is_empty() {
            format!("element {element}")
        } else {
            format!("element {element} .{}", classes.join("."))
        }
    }
}
