//! Instance lifecycle manager
//!
//! Drives everything from host events: a page scan creates instances for
//! qualifying containers, viewport changes create and destroy breakpoint
//! gated instances, and clicks are routed to the nearest bound control.

use std::cell::RefCell;
use std::rc::Rc;

use carousel_config::{AttributeNames, ContainerPipeline, SliderConfigBuilder};
use carousel_dom::{ElementTree, NodeId, SimpleSelector};

use crate::binder;
use crate::breakpoint::{BreakpointRules, Viewport};
use crate::config::{EngineConfig, StateClasses};
use crate::controls::{controls_for, external_navigation, ControlDescriptor, ControlScanner};
use crate::error::EngineError;
use crate::registry::{BoundSlider, InstanceEntry, Registry};
use crate::slider::SliderEngine;

/// Event delivered by the host page
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PageEvent {
    /// Document is ready: initial scan
    Ready,
    /// Markup changed: pick up new containers, leave active ones alone
    Refresh,
    /// Click on `target` or one of its descendants
    Click { target: NodeId },
    ViewportChanged(Viewport),
}

/// Registry change notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleEvent {
    Created { name: String, containers: Vec<NodeId> },
    Destroyed { name: String },
}

type LifecycleObserver = Box<dyn FnMut(&LifecycleEvent)>;

/// What handling one event did
#[derive(Debug, Default)]
pub struct EventReport {
    pub created: Vec<String>,
    pub destroyed: Vec<String>,
    /// Control that handled a click
    pub control: Option<ControlDescriptor>,
    /// Per-container failures; other containers were still initialized
    pub errors: Vec<EngineError>,
}

/// Containers sharing an instance name
#[derive(Debug, Clone)]
struct ContainerGroup {
    name: String,
    containers: Vec<NodeId>,
    breakpoint: Option<String>,
}

/// Builder for [`Engine`]
pub struct EngineBuilder<D: ElementTree + 'static> {
    document: Rc<RefCell<D>>,
    slider_engine: Option<Box<dyn SliderEngine>>,
    config: EngineConfig,
    viewport: Option<Viewport>,
}

impl<D: ElementTree + 'static> EngineBuilder<D> {
    pub fn slider_engine(mut self, engine: impl SliderEngine + 'static) -> Self {
        self.slider_engine = Some(Box::new(engine));
        self
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Viewport at initialization.
    ///
    /// Without one the engine starts from a 0x0 viewport, which satisfies
    /// every `max-width` rule: instances gated on `mobile` or `tablet` are
    /// created on [`PageEvent::Ready`] until a [`PageEvent::ViewportChanged`]
    /// reports the real size.
    pub fn viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = Some(viewport);
        self
    }

    pub fn build(self) -> Result<Engine<D>, EngineError> {
        let Some(slider_engine) = self.slider_engine else {
            tracing::error!("No slider engine available, carousel initialization aborted");
            return Err(EngineError::MissingSliderEngine);
        };
        let rules = self.config.breakpoint_rules()?;
        let viewport = self.viewport.unwrap_or_else(|| {
            tracing::warn!("No viewport given, breakpoint rules are evaluated at 0x0");
            Viewport::default()
        });

        tracing::info!(
            "Carousel engine {} initialized (prefix {:?}, {} breakpoint rule(s))",
            crate::VERSION,
            self.config.prefix,
            rules.len()
        );

        Ok(Engine {
            names: self.config.names(),
            builder: self.config.slider_builder(),
            classes: Rc::new(self.config.classes.clone()),
            document: self.document,
            slider_engine,
            config: self.config,
            rules,
            registry: Registry::new(),
            viewport,
            observers: Vec::new(),
        })
    }
}

/// The carousel engine
pub struct Engine<D: ElementTree + 'static> {
    document: Rc<RefCell<D>>,
    slider_engine: Box<dyn SliderEngine>,
    config: EngineConfig,
    names: AttributeNames,
    builder: SliderConfigBuilder,
    classes: Rc<StateClasses>,
    rules: BreakpointRules,
    registry: Registry,
    viewport: Viewport,
    observers: Vec<LifecycleObserver>,
}

impl<D: ElementTree + 'static> Engine<D> {
    pub fn builder(document: Rc<RefCell<D>>) -> EngineBuilder<D> {
        EngineBuilder {
            document,
            slider_engine: None,
            config: EngineConfig::default(),
            viewport: None,
        }
    }

    pub fn document(&self) -> &Rc<RefCell<D>> {
        &self.document
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Observe instance creation and destruction
    pub fn on_lifecycle(&mut self, observer: impl FnMut(&LifecycleEvent) + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Handle one host event
    pub fn handle(&mut self, event: PageEvent) -> EventReport {
        let mut report = EventReport::default();
        match event {
            PageEvent::Ready | PageEvent::Refresh => self.scan(&mut report, |_| true),
            PageEvent::ViewportChanged(viewport) => self.resize(viewport, &mut report),
            PageEvent::Click { target } => report.control = self.click(target),
        }
        report
    }

    // ---- public control surface ----

    pub fn get(&self, name: &str) -> Option<&InstanceEntry> {
        self.registry.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut InstanceEntry> {
        self.registry.get_mut(name)
    }

    pub fn instances(&self) -> impl Iterator<Item = &InstanceEntry> {
        self.registry.iter()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn update(&mut self, name: &str) -> Result<(), EngineError> {
        let entry = self
            .registry
            .get_mut(name)
            .ok_or_else(|| EngineError::UnknownInstance(name.to_string()))?;
        entry.update();
        Ok(())
    }

    pub fn update_all(&mut self) {
        for entry in self.registry.iter_mut() {
            entry.update();
        }
    }

    pub fn destroy(&mut self, name: &str) -> Result<(), EngineError> {
        if self.teardown(name) {
            Ok(())
        } else {
            Err(EngineError::UnknownInstance(name.to_string()))
        }
    }

    /// Destroy `name`, then build it again from the current markup if its
    /// breakpoint still qualifies
    pub fn reinit(&mut self, name: &str) -> Result<EventReport, EngineError> {
        self.destroy(name)?;
        let mut report = EventReport {
            destroyed: vec![name.to_string()],
            ..Default::default()
        };
        self.scan(&mut report, |group| group.name == name);
        Ok(report)
    }

    /// Destroy every instance
    pub fn shutdown(&mut self) {
        for name in self.registry.names() {
            self.teardown(&name);
        }
        tracing::debug!("Carousel engine shut down");
    }

    // ---- lifecycle ----

    fn groups(&self) -> Vec<ContainerGroup> {
        let doc = self.document.borrow();
        let instance_attr = self.names.instance();
        let breakpoint_attr = self.names.breakpoint();

        let mut groups: Vec<ContainerGroup> = Vec::new();
        for container in doc.find_all(doc.root(), &SimpleSelector::attribute(&instance_attr)) {
            let name = doc.get_attribute(container, &instance_attr).unwrap_or("").trim();
            if name.is_empty() {
                tracing::warn!("Container without instance name: {}", doc.describe(container));
                continue;
            }
            let breakpoint = doc
                .get_attribute(container, &breakpoint_attr)
                .map(str::trim)
                .filter(|b| !b.is_empty())
                .map(str::to_string);

            match groups.iter_mut().find(|g| g.name == name) {
                Some(group) => {
                    group.containers.push(container);
                    if group.breakpoint.is_none() {
                        group.breakpoint = breakpoint;
                    }
                }
                None => groups.push(ContainerGroup {
                    name: name.to_string(),
                    containers: vec![container],
                    breakpoint,
                }),
            }
        }
        groups
    }

    /// Whether a group may exist at `viewport`. Unknown rules do not gate.
    fn qualifies(&self, breakpoint: Option<&str>, viewport: &Viewport) -> bool {
        let Some(name) = breakpoint else {
            return true;
        };
        match self.rules.get(name) {
            Some(rule) => rule.condition.matches(viewport),
            None => {
                tracing::warn!("Unknown breakpoint rule {:?}, container is not gated", name);
                true
            }
        }
    }

    /// Create every absent group accepted by `filter` whose breakpoint
    /// currently qualifies
    fn scan(&mut self, report: &mut EventReport, filter: impl Fn(&ContainerGroup) -> bool) {
        let controls = ControlScanner::new(&self.names)
            .with_debug(self.config.debug)
            .scan(&*self.document.borrow());

        for group in self.groups() {
            if !filter(&group) || self.registry.contains(&group.name) {
                continue;
            }
            if !self.qualifies(group.breakpoint.as_deref(), &self.viewport) {
                if self.config.debug {
                    tracing::debug!("{}: breakpoint {:?} not matching", group.name, group.breakpoint);
                }
                continue;
            }
            self.activate(&group, controls_for(&controls, &group.name), report);
        }
    }

    /// Destroy groups whose rule stopped matching, create those whose rule
    /// started matching
    fn resize(&mut self, viewport: Viewport, report: &mut EventReport) {
        let previous = std::mem::replace(&mut self.viewport, viewport);

        let leaving: Vec<String> = self
            .registry
            .iter()
            .filter(|entry| {
                entry.breakpoint().and_then(|b| self.rules.get(b)).is_some_and(|rule| {
                    rule.condition.matches(&previous) && !rule.condition.matches(&viewport)
                })
            })
            .map(|entry| entry.name().to_string())
            .collect();
        for name in leaving {
            if self.teardown(&name) {
                report.destroyed.push(name);
            }
        }

        let rules = &self.rules;
        let starts_matching = |group: &ContainerGroup| {
            group
                .breakpoint
                .as_deref()
                .and_then(|b| rules.get(b))
                .is_some_and(|rule| !rule.condition.matches(&previous) && rule.condition.matches(&viewport))
        };
        let entering: Vec<String> = self
            .groups()
            .into_iter()
            .filter(starts_matching)
            .map(|g| g.name)
            .collect();
        if !entering.is_empty() {
            self.scan(report, |group| entering.contains(&group.name));
        }
    }

    /// Compile, construct, bind and register one group
    fn activate(
        &mut self,
        group: &ContainerGroup,
        controls: Vec<ControlDescriptor>,
        report: &mut EventReport,
    ) {
        let external = external_navigation(&controls);
        let pipeline = ContainerPipeline::new(&self.names, &self.builder).with_debug(self.config.debug);

        let mut sliders = Vec::new();
        for &container in &group.containers {
            let compiled = {
                let mut doc = self.document.borrow_mut();
                pipeline.run(&mut *doc, container, &group.name, external)
            };
            match self.slider_engine.create(&compiled.mount, &compiled.config) {
                Ok(instance) => sliders.push(BoundSlider::new(container, compiled.config, instance)),
                Err(source) => {
                    let container = self.document.borrow().describe(container);
                    tracing::error!("Failed to initialize {} on {}: {}", group.name, container, source);
                    report.errors.push(EngineError::Construction { container, source });
                }
            }
        }
        if sliders.is_empty() {
            return;
        }

        let controls: Rc<[ControlDescriptor]> = Rc::from(controls);
        for slider in &mut sliders {
            let id = binder::subscribe(
                &mut **slider.instance_mut(),
                &self.document,
                &controls,
                &self.classes,
            );
            slider.add_subscription(id);
        }
        if let Some(first) = sliders.first() {
            let state = first.instance().state();
            let mut doc = self.document.borrow_mut();
            binder::sync_state(&mut *doc, &controls, &state, &self.classes);
        }

        let containers: Vec<NodeId> = sliders.iter().map(BoundSlider::container).collect();
        let entry = InstanceEntry::new(&group.name, sliders, controls, group.breakpoint.clone());
        if let Err(mut duplicate) = self.registry.insert(entry) {
            tracing::warn!("{} is already active, discarding new sliders", group.name);
            duplicate.detach();
            return;
        }

        tracing::debug!("Created {} with {} slider(s)", group.name, containers.len());
        report.created.push(group.name.clone());
        self.notify(&LifecycleEvent::Created {
            name: group.name.clone(),
            containers,
        });
    }

    /// Detach subscriptions and control state, destroy the sliders, then drop
    /// the entry.
    ///
    /// The document is only borrowed when nothing else holds it. A host that
    /// keeps a document borrow open across `destroy` gets the sliders torn
    /// down and the entry removed, but the control classes stay as they were
    /// and a warning is logged. Everything runs on one thread, so the only way
    /// to hit this is a re-entrant call from a lifecycle observer or a slider
    /// callback.
    fn teardown(&mut self, name: &str) -> bool {
        let Some(entry) = self.registry.get_mut(name) else {
            return false;
        };
        entry.detach();
        match self.document.try_borrow_mut() {
            Ok(mut doc) => binder::unbind(&mut *doc, entry.controls(), &self.classes),
            Err(_) => tracing::warn!("Document busy, control state of {} left in place", name),
        }
        self.registry.remove(name);

        tracing::debug!("Destroyed {}", name);
        self.notify(&LifecycleEvent::Destroyed {
            name: name.to_string(),
        });
        true
    }

    /// Route a click to the nearest bound control at or above `target`
    fn click(&mut self, target: NodeId) -> Option<ControlDescriptor> {
        let path: Vec<NodeId> = {
            let doc = self.document.borrow();
            std::iter::successors(Some(target), |&node| doc.parent_element(node)).collect()
        };

        let (name, control) = path.iter().find_map(|&node| {
            self.registry
                .iter()
                .find_map(|entry| entry.control_at(node).map(|c| (entry.name().to_string(), c.clone())))
        })?;

        if !control.kind.is_interactive() {
            return None;
        }
        let entry = self.registry.get_mut(&name)?;
        let invoked = binder::dispatch(
            control.kind,
            entry.sliders_mut().iter_mut().map(BoundSlider::instance_mut),
        );
        if self.config.debug {
            tracing::debug!("{} control -> {} ({} slider(s))", control.kind.name(), name, invoked);
        }
        Some(control)
    }

    fn notify(&mut self, event: &LifecycleEvent) {
        for observer in self.observers.iter_mut() {
            observer(event);
        }
    }
}

impl<D: ElementTree + 'static> Drop for Engine<D> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
