//! Slider engine contract
//!
//! The engine that renders and animates slides is a black box. The lifecycle
//! manager only needs to construct instances, drive navigation and autoplay,
//! and subscribe to a handful of typed events.

use carousel_config::{Mount, SliderConfig};

use crate::error::SliderError;

/// Event emitted by a slider instance
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SliderEvent {
    SlideChange,
    /// Overall progress, nominally in `[0, 1]`
    Progress(f64),
    AutoplayStart,
    AutoplayStop,
}

/// Snapshot of instance state passed alongside every event
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SliderState {
    /// Loop-normalized index of the active slide
    pub real_index: usize,
    pub is_beginning: bool,
    pub is_end: bool,
    pub progress: f64,
    /// Loop or rewind mode: navigation never runs out
    pub wraps: bool,
    /// `None` when the instance has no autoplay module
    pub autoplay_running: Option<bool>,
}

/// Handle returned by [`SliderInstance::on`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(pub u64);

/// Event callback
pub type EventHandler = Box<dyn FnMut(&SliderEvent, &SliderState)>;

/// A live slider
pub trait SliderInstance {
    fn slide_next(&mut self);

    fn slide_prev(&mut self);

    fn slide_to(&mut self, index: usize);

    fn autoplay_start(&mut self);

    fn autoplay_stop(&mut self);

    /// `None` when autoplay is not configured
    fn autoplay_running(&self) -> Option<bool>;

    /// Recompute layout after the markup changed
    fn update(&mut self);

    /// Tear the instance down. `delete_instance` releases the instance
    /// itself, `clean_styles` removes the attributes and styles it added.
    fn destroy(&mut self, delete_instance: bool, clean_styles: bool);

    fn state(&self) -> SliderState;

    /// Subscribe to every event this instance emits
    fn on(&mut self, handler: EventHandler) -> SubscriptionId;

    /// Remove a subscription. Returns false if it was not registered.
    fn off(&mut self, id: SubscriptionId) -> bool;
}

/// Constructs slider instances
pub trait SliderEngine {
    fn create(
        &mut self,
        mount: &Mount,
        config: &SliderConfig,
    ) -> Result<Box<dyn SliderInstance>, SliderError>;
}
