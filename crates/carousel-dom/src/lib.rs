//! Carousel DOM - element tree access
//!
//! Arena-backed element tree plus the [`ElementTree`] capability trait that the
//! configuration compiler and control binder use to read and annotate markup.
//! Anything that can answer these queries (a browser bridge, a parsed HTML
//! page, a hand-built fixture) can host carousels.

mod attributes;
mod classlist;
mod element;
mod node;
mod tree;

pub use attributes::{Attr, AttributeMap};
pub use classlist::ClassList;
pub use element::{ElementTree, SimpleSelector};
pub use node::{ElementData, Node, NodeData};
pub use tree::{Descendants, DomTree};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Document root
    pub const ROOT: NodeId = NodeId(0);

    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check whether this id points at a node
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    /// Arena index
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
