//! Instance registry
//!
//! Name -> [`InstanceEntry`]. The lifecycle manager owns the only registry;
//! an entry exists exactly while its sliders are alive.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use carousel_config::SliderConfig;
use carousel_dom::NodeId;

use crate::controls::ControlDescriptor;
use crate::slider::{SliderInstance, SliderState, SubscriptionId};

/// One underlying slider and the subscriptions the binder holds on it
pub struct BoundSlider {
    container: NodeId,
    config: SliderConfig,
    instance: Box<dyn SliderInstance>,
    subscriptions: Vec<SubscriptionId>,
}

impl BoundSlider {
    pub fn new(container: NodeId, config: SliderConfig, instance: Box<dyn SliderInstance>) -> Self {
        Self {
            container,
            config,
            instance,
            subscriptions: Vec::new(),
        }
    }

    pub fn container(&self) -> NodeId {
        self.container
    }

    /// Configuration the slider was constructed with
    pub fn config(&self) -> &SliderConfig {
        &self.config
    }

    pub fn instance(&self) -> &dyn SliderInstance {
        self.instance.as_ref()
    }

    pub fn instance_mut(&mut self) -> &mut Box<dyn SliderInstance> {
        &mut self.instance
    }

    pub(crate) fn add_subscription(&mut self, id: SubscriptionId) {
        self.subscriptions.push(id);
    }

    /// Unsubscribe everything, then destroy the slider
    fn detach(&mut self) {
        for id in self.subscriptions.drain(..) {
            self.instance.off(id);
        }
        self.instance.destroy(true, true);
    }
}

impl fmt::Debug for BoundSlider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundSlider")
            .field("container", &self.container)
            .field("state", &self.instance.state())
            .field("subscriptions", &self.subscriptions.len())
            .finish()
    }
}

/// A named instance: its sliders (one per container) and bound controls
#[derive(Debug)]
pub struct InstanceEntry {
    name: String,
    sliders: Vec<BoundSlider>,
    controls: Rc<[ControlDescriptor]>,
    breakpoint: Option<String>,
}

impl InstanceEntry {
    pub fn new(
        name: &str,
        sliders: Vec<BoundSlider>,
        controls: Rc<[ControlDescriptor]>,
        breakpoint: Option<String>,
    ) -> Self {
        Self {
            name: name.to_string(),
            sliders,
            controls,
            breakpoint,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn containers(&self) -> Vec<NodeId> {
        self.sliders.iter().map(BoundSlider::container).collect()
    }

    pub fn controls(&self) -> &[ControlDescriptor] {
        &self.controls
    }

    /// Breakpoint rule gating this instance, if any
    pub fn breakpoint(&self) -> Option<&str> {
        self.breakpoint.as_deref()
    }

    pub fn sliders(&self) -> &[BoundSlider] {
        &self.sliders
    }

    pub fn sliders_mut(&mut self) -> &mut [BoundSlider] {
        &mut self.sliders
    }

    /// State of the first slider
    pub fn state(&self) -> Option<SliderState> {
        self.sliders.first().map(|s| s.instance.state())
    }

    /// Control bound to `element`, if any
    pub fn control_at(&self, element: NodeId) -> Option<&ControlDescriptor> {
        self.controls.iter().find(|c| c.element == element)
    }

    pub fn update(&mut self) {
        for slider in &mut self.sliders {
            slider.instance.update();
        }
    }

    pub(crate) fn detach(&mut self) {
        for slider in &mut self.sliders {
            slider.detach();
        }
    }
}

/// Name -> entry map
#[derive(Debug, Default)]
pub struct Registry {
    entries: BTreeMap<String, InstanceEntry>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entry. Hands it back if the name is already taken.
    pub fn insert(&mut self, entry: InstanceEntry) -> Result<(), InstanceEntry> {
        if self.entries.contains_key(entry.name()) {
            return Err(entry);
        }
        self.entries.insert(entry.name.clone(), entry);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&InstanceEntry> {
        self.entries.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut InstanceEntry> {
        self.entries.get_mut(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<InstanceEntry> {
        self.entries.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &InstanceEntry> {
        self.entries.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut InstanceEntry> {
        self.entries.values_mut()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
