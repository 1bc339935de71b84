//! Control discovery
//!
//! Controls are elements anywhere in the document carrying `se-control`,
//! `se-target` and, for `slide-to`, `se-slide`. One scan collects all of
//! them; malformed controls are skipped with a warning.

use carousel_config::{AttributeNames, NavigationElements};
use carousel_dom::{ElementTree, NodeId, SimpleSelector};

/// What a control does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlKind {
    Next,
    Prev,
    Play,
    Pause,
    PlayPause,
    /// Jump to a fixed slide index
    SlideTo(usize),
    Pagination,
    Scrollbar,
    Progress,
}

impl ControlKind {
    /// Attribute spelling of the control type
    pub fn name(&self) -> &'static str {
        match self {
            ControlKind::Next => "next",
            ControlKind::Prev => "prev",
            ControlKind::Play => "play",
            ControlKind::Pause => "pause",
            ControlKind::PlayPause => "play-pause",
            ControlKind::SlideTo(_) => "slide-to",
            ControlKind::Pagination => "pagination",
            ControlKind::Scrollbar => "scrollbar",
            ControlKind::Progress => "progress",
        }
    }

    /// Whether clicking the control does anything
    pub fn is_interactive(&self) -> bool {
        !matches!(
            self,
            ControlKind::Pagination | ControlKind::Scrollbar | ControlKind::Progress
        )
    }
}

/// A discovered control, bound to one instance name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlDescriptor {
    pub element: NodeId,
    pub kind: ControlKind,
    pub target: String,
}

/// Scans a document for controls
#[derive(Debug, Clone)]
pub struct ControlScanner<'a> {
    names: &'a AttributeNames,
    debug: bool,
}

impl<'a> ControlScanner<'a> {
    pub fn new(names: &'a AttributeNames) -> Self {
        Self {
            names,
            debug: false,
        }
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Collect every well-formed control in document order
    pub fn scan<T: ElementTree + ?Sized>(&self, tree: &T) -> Vec<ControlDescriptor> {
        let control_attr = self.names.control();
        let target_attr = self.names.target();
        let slide_attr = self.names.slide();

        let mut controls = Vec::new();
        for element in tree.find_all(tree.root(), &SimpleSelector::attribute(&control_attr)) {
            let kind_name = tree.get_attribute(element, &control_attr).unwrap_or("").trim();

            let Some(target) = tree
                .get_attribute(element, &target_attr)
                .map(str::trim)
                .filter(|t| !t.is_empty())
            else {
                tracing::warn!(
                    "Control {} has no {} attribute, skipping: {}",
                    kind_name,
                    target_attr,
                    tree.describe(element)
                );
                continue;
            };

            let kind = match kind_name {
                "next" => ControlKind::Next,
                "prev" => ControlKind::Prev,
                "play" => ControlKind::Play,
                "pause" => ControlKind::Pause,
                "play-pause" => ControlKind::PlayPause,
                "pagination" => ControlKind::Pagination,
                "scrollbar" => ControlKind::Scrollbar,
                "progress" => ControlKind::Progress,
                "slide-to" => {
                    let raw = tree.get_attribute(element, &slide_attr).unwrap_or("");
                    match raw.trim().parse::<usize>() {
                        Ok(index) => ControlKind::SlideTo(index),
                        Err(_) => {
                            tracing::warn!(
                                "slide-to control needs a slide index in {}, got {:?}: {}",
                                slide_attr,
                                raw,
                                tree.describe(element)
                            );
                            continue;
                        }
                    }
                }
                other => {
                    tracing::warn!("Unknown control type {:?}: {}", other, tree.describe(element));
                    continue;
                }
            };

            if self.debug {
                tracing::debug!("Control {} -> {}: {}", kind.name(), target, tree.describe(element));
            }
            controls.push(ControlDescriptor {
                element,
                kind,
                target: target.to_string(),
            });
        }
        controls
    }
}

/// Controls targeting `name`, in document order
pub fn controls_for(controls: &[ControlDescriptor], name: &str) -> Vec<ControlDescriptor> {
    controls.iter().filter(|c| c.target == name).cloned().collect()
}

/// Pagination and scrollbar controls targeting an instance, as structural
/// discovery input
pub fn external_navigation(controls: &[ControlDescriptor]) -> NavigationElements {
    let first = |kind: ControlKind| controls.iter().find(|c| c.kind == kind).map(|c| c.element);
    NavigationElements {
        pagination: first(ControlKind::Pagination),
        scrollbar: first(ControlKind::Scrollbar),
        ..Default::default()
    }
}
