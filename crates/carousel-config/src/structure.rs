//! Structural augmenter
//!
//! Reads the markup around a container to fill in what attributes left out:
//! navigation elements, wrapper/slide class names following the
//! `X` / `X_list` / `X_slide` naming convention, and accessibility roles.
//!
//! Discovered elements enable their module unless the attribute set it to
//! `false` explicitly.

use carousel_dom::{ElementTree, NodeId, SimpleSelector};

use crate::compiler::AttributeConfig;
use crate::names::{AttributeNames, NavMarker};
use crate::value::{ConfigMap, Value};

/// Wrapper class the slider engine uses when nothing overrides it
pub const DEFAULT_WRAPPER_CLASS: &str = "swiper-wrapper";

/// Discovered navigation elements
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavigationElements {
    pub next: Option<NodeId>,
    pub prev: Option<NodeId>,
    pub pagination: Option<NodeId>,
    pub scrollbar: Option<NodeId>,
}

impl NavigationElements {
    pub fn get(&self, marker: NavMarker) -> Option<NodeId> {
        match marker {
            NavMarker::Next => self.next,
            NavMarker::Prev => self.prev,
            NavMarker::Pagination => self.pagination,
            NavMarker::Scrollbar => self.scrollbar,
        }
    }

    fn slot(&mut self, marker: NavMarker) -> &mut Option<NodeId> {
        match marker {
            NavMarker::Next => &mut self.next,
            NavMarker::Prev => &mut self.prev,
            NavMarker::Pagination => &mut self.pagination,
            NavMarker::Scrollbar => &mut self.scrollbar,
        }
    }

    /// Fill empty slots from `other`
    pub fn or(mut self, other: NavigationElements) -> Self {
        for marker in NavMarker::ALL {
            let slot = self.slot(marker);
            if slot.is_none() {
                *slot = other.get(marker);
            }
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        NavMarker::ALL.iter().all(|&m| self.get(m).is_none())
    }
}

/// Wrapper/slide class overrides
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassConvention {
    pub wrapper_class: String,
    pub slide_class: String,
}

/// What class detection learned about a container
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructuralHints {
    /// Wrapper element, when one could be resolved
    pub wrapper: Option<NodeId>,
    /// Overrides for the engine's wrapper/slide classes; `None` means
    /// engine defaults apply
    pub classes: Option<ClassConvention>,
    /// Element children of the first child of the container
    pub slide_count: usize,
}

/// Augments compiled configuration from the surrounding markup
#[derive(Debug, Clone)]
pub struct StructuralAugmenter<'a> {
    names: &'a AttributeNames,
    debug: bool,
}

impl<'a> StructuralAugmenter<'a> {
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

    /// Run discovery, class detection and accessibility annotation in that
    /// order. `external` supplies elements found elsewhere (targeted
    /// pagination/scrollbar controls); markers near the container win.
    pub fn augment<T: ElementTree + ?Sized>(
        &self,
        tree: &mut T,
        container: NodeId,
        instance_name: &str,
        config: &mut AttributeConfig,
        external: NavigationElements,
    ) -> StructuralHints {
        let nav = self.discover_navigation(&*tree, container).or(external);
        self.apply_navigation(config, &nav);

        let hints = self.detect_classes(&*tree, container);
        apply_classes(config, &hints);

        annotate(tree, container, instance_name, &hints);
        hints
    }

    /// Look for markers inside the container, then inside its parent
    pub fn discover_navigation<T: ElementTree + ?Sized>(
        &self,
        tree: &T,
        container: NodeId,
    ) -> NavigationElements {
        let parent = tree.parent_element(container);
        let mut nav = NavigationElements::default();

        for marker in NavMarker::ALL {
            let selector = SimpleSelector::attribute(&self.names.marker(marker));
            let found = tree
                .find_descendant(container, &selector)
                .or_else(|| parent.and_then(|p| tree.find_descendant(p, &selector)));
            if self.debug {
                if let Some(el) = found {
                    tracing::debug!("Found {} at {}", selector, tree.describe(el));
                }
            }
            *nav.slot(marker) = found;
        }

        nav
    }

    /// Merge discovered navigation elements into the config
    pub fn apply_navigation(&self, config: &mut AttributeConfig, nav: &NavigationElements) {
        if nav.next.is_some() || nav.prev.is_some() {
            let mut fields = Vec::new();
            if let Some(next) = nav.next {
                fields.push(("nextEl", Value::Element(next)));
            }
            if let Some(prev) = nav.prev {
                fields.push(("prevEl", Value::Element(prev)));
            }
            self.attach(config, "navigation", &fields, &[]);
        }

        if let Some(el) = nav.pagination {
            self.attach(
                config,
                "pagination",
                &[("el", Value::Element(el))],
                &[("clickable", Value::Bool(true))],
            );
        }

        if let Some(el) = nav.scrollbar {
            self.attach(config, "scrollbar", &[("el", Value::Element(el))], &[]);
        }
    }

    /// Materialize `key` as an object when it is absent or `true`, then set
    /// `fields` and any missing `defaults`. Explicit `false` (or any other
    /// scalar) is left alone.
    fn attach(
        &self,
        config: &mut AttributeConfig,
        key: &str,
        fields: &[(&str, Value)],
        defaults: &[(&str, Value)],
    ) {
        match config.get(key) {
            None | Some(Value::Bool(true)) => {
                config.insert(key, Value::object());
            }
            Some(Value::Object(_)) => {}
            Some(other) => {
                if self.debug {
                    tracing::debug!("Keeping explicit {} = {}; discovered element ignored", key, other);
                }
                return;
            }
        }

        let Some(map) = config.get_mut(key).and_then(Value::as_object_mut) else {
            return;
        };
        for (name, value) in fields.iter().chain(defaults) {
            map.entry(name.to_string()).or_insert_with(|| value.clone());
        }
    }

    /// Work out wrapper/slide classes from the container's children
    pub fn detect_classes<T: ElementTree + ?Sized>(&self, tree: &T, container: NodeId) -> StructuralHints {
        let Some(wrapper) = tree.first_element_child(container) else {
            if self.debug {
                tracing::debug!("No child element found as wrapper: {}", tree.describe(container));
            }
            return StructuralHints::default();
        };
        let slides = tree.element_children(wrapper);
        let slide_count = slides.len();

        for base in tree.class_list(container) {
            let wrapper_class = format!("{base}_list");
            if tree.has_class(wrapper, &wrapper_class) {
                let slide_class = format!("{base}_slide");
                if self.debug {
                    tracing::debug!(
                        "Detected class convention: base={}, wrapper={}, slide={}",
                        base,
                        wrapper_class,
                        slide_class
                    );
                }
                return StructuralHints {
                    wrapper: Some(wrapper),
                    classes: Some(ClassConvention {
                        wrapper_class,
                        slide_class,
                    }),
                    slide_count,
                };
            }
        }

        if tree.has_class(wrapper, DEFAULT_WRAPPER_CLASS) {
            return StructuralHints {
                wrapper: Some(wrapper),
                classes: None,
                slide_count,
            };
        }

        let wrapper_class = tree.class_list(wrapper).into_iter().next();
        let slide_class = slides
            .first()
            .and_then(|&slide| tree.class_list(slide).into_iter().next());

        match (wrapper_class, slide_class) {
            (Some(wrapper_class), Some(slide_class)) => {
                if self.debug {
                    tracing::debug!(
                        "Fallback class detection: wrapper={}, slide={}",
                        wrapper_class,
                        slide_class
                    );
                }
                StructuralHints {
                    wrapper: Some(wrapper),
                    classes: Some(ClassConvention {
                        wrapper_class,
                        slide_class,
                    }),
                    slide_count,
                }
            }
            _ => {
                if self.debug {
                    tracing::debug!(
                        "Could not detect wrapper/slide classes for {}",
                        tree.describe(container)
                    );
                }
                StructuralHints {
                    wrapper: None,
                    classes: None,
                    slide_count,
                }
            }
        }
    }
}

/// Set `wrapperClass`/`slideClass` unless the attributes already did
pub fn apply_classes(config: &mut AttributeConfig, hints: &StructuralHints) {
    let Some(classes) = &hints.classes else {
        return;
    };
    if !config.contains("wrapperClass") {
        config.insert("wrapperClass", Value::String(classes.wrapper_class.clone()));
    }
    if !config.contains("slideClass") {
        config.insert("slideClass", Value::String(classes.slide_class.clone()));
    }
}

/// Region role and label on the container, presentation role on the wrapper
pub fn annotate<T: ElementTree + ?Sized>(
    tree: &mut T,
    container: NodeId,
    instance_name: &str,
    hints: &StructuralHints,
) {
    tree.set_attribute(container, "role", "region");
    tree.set_attribute(container, "aria-label", &format!("{instance_name} carousel"));
    if let Some(wrapper) = hints.wrapper {
        tree.set_attribute(wrapper, "role", "presentation");
    }
}

/// Collect the element references held anywhere in a config map
pub fn referenced_elements(map: &ConfigMap) -> Vec<NodeId> {
    let mut out = Vec::new();
    let mut stack: Vec<&Value> = map.values().collect();
    while let Some(value) = stack.pop() {
        match value {
            Value::Element(id) => out.push(*id),
            Value::Object(inner) => stack.extend(inner.values()),
            Value::Array(items) => stack.extend(items.iter()),
            _ => {}
        }
    }
    out.sort();
    out.dedup();
    out
}
