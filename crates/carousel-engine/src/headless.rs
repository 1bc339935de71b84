//! Headless slider
//!
//! A [`SliderEngine`] that keeps index and autoplay state without rendering
//! anything. Every call lands in a shared [`Journal`], which is what the
//! inspector prints and what tests assert against.

use std::cell::RefCell;
use std::rc::Rc;

use carousel_config::{Mount, SliderConfig, Value};
use carousel_dom::NodeId;

use crate::error::SliderError;
use crate::slider::{
    EventHandler, SliderEngine, SliderEvent, SliderInstance, SliderState, SubscriptionId,
};

/// Call recorded by a headless instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliderCall {
    Created,
    SlideNext,
    SlidePrev,
    SlideTo(usize),
    AutoplayStart,
    AutoplayStop,
    Update,
    Destroyed,
}

/// One journal line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JournalEntry {
    pub container: NodeId,
    pub call: SliderCall,
}

/// Shared call log
#[derive(Debug, Clone, Default)]
pub struct Journal {
    entries: Rc<RefCell<Vec<JournalEntry>>>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, container: NodeId, call: SliderCall) {
        self.entries.borrow_mut().push(JournalEntry { container, call });
    }

    pub fn entries(&self) -> Vec<JournalEntry> {
        self.entries.borrow().clone()
    }

    /// Calls recorded for one container, in order
    pub fn calls_for(&self, container: NodeId) -> Vec<SliderCall> {
        self.entries
            .borrow()
            .iter()
            .filter(|e| e.container == container)
            .map(|e| e.call)
            .collect()
    }

    /// How many times `call` was recorded, across all containers
    pub fn count(&self, call: SliderCall) -> usize {
        self.entries.borrow().iter().filter(|e| e.call == call).count()
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

/// Slider engine without rendering
#[derive(Debug, Clone, Default)]
pub struct HeadlessEngine {
    journal: Journal,
}

impl HeadlessEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record into an existing journal
    pub fn with_journal(journal: Journal) -> Self {
        Self { journal }
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }
}

impl SliderEngine for HeadlessEngine {
    fn create(
        &mut self,
        mount: &Mount,
        config: &SliderConfig,
    ) -> Result<Box<dyn SliderInstance>, SliderError> {
        if mount.wrapper.is_none() {
            return Err(SliderError::MissingWrapper(mount.container));
        }

        let count = mount.slide_count;
        let initial = config
            .get("initialSlide")
            .and_then(Value::as_f64)
            .filter(|n| *n >= 0.0)
            .map_or(0, |n| n as usize);

        let instance = HeadlessInstance {
            container: mount.container,
            index: initial.min(count.saturating_sub(1)),
            count,
            wraps: config.is_enabled("loop") || config.is_enabled("rewind"),
            autoplay: config.is_enabled("autoplay").then_some(true),
            handlers: Vec::new(),
            next_id: 1,
            destroyed: false,
            journal: self.journal.clone(),
        };
        self.journal.record(mount.container, SliderCall::Created);
        tracing::debug!(
            "Headless slider on {}: {} slide(s), wraps={}",
            mount.container,
            count,
            instance.wraps
        );
        Ok(Box::new(instance))
    }
}

/// Instance created by [`HeadlessEngine`]
pub struct HeadlessInstance {
    container: NodeId,
    index: usize,
    count: usize,
    wraps: bool,
    autoplay: Option<bool>,
    handlers: Vec<(SubscriptionId, EventHandler)>,
    next_id: u64,
    destroyed: bool,
    journal: Journal,
}

impl HeadlessInstance {
    fn emit(&mut self, event: SliderEvent) {
        let state = self.state();
        for (_, handler) in self.handlers.iter_mut() {
            handler(&event, &state);
        }
    }

    fn go_to(&mut self, index: usize) {
        if index == self.index {
            return;
        }
        self.index = index;
        self.emit(SliderEvent::SlideChange);
        let progress = self.state().progress;
        self.emit(SliderEvent::Progress(progress));
    }

    fn set_autoplay(&mut self, running: bool) {
        match self.autoplay {
            Some(current) if current != running => {
                self.autoplay = Some(running);
                self.emit(if running {
                    SliderEvent::AutoplayStart
                } else {
                    SliderEvent::AutoplayStop
                });
            }
            _ => {}
        }
    }
}

impl SliderInstance for HeadlessInstance {
    fn slide_next(&mut self) {
        if self.destroyed || self.count == 0 {
            return;
        }
        self.journal.record(self.container, SliderCall::SlideNext);
        let target = if self.index + 1 < self.count {
            self.index + 1
        } else if self.wraps {
            0
        } else {
            self.index
        };
        self.go_to(target);
    }

    fn slide_prev(&mut self) {
        if self.destroyed || self.count == 0 {
            return;
        }
        self.journal.record(self.container, SliderCall::SlidePrev);
        let target = if self.index > 0 {
            self.index - 1
        } else if self.wraps {
            self.count - 1
        } else {
            self.index
        };
        self.go_to(target);
    }

    fn slide_to(&mut self, index: usize) {
        if self.destroyed || self.count == 0 {
            return;
        }
        self.journal.record(self.container, SliderCall::SlideTo(index));
        self.go_to(index.min(self.count - 1));
    }

    fn autoplay_start(&mut self) {
        if self.destroyed {
            return;
        }
        self.journal.record(self.container, SliderCall::AutoplayStart);
        self.set_autoplay(true);
    }

    fn autoplay_stop(&mut self) {
        if self.destroyed {
            return;
        }
        self.journal.record(self.container, SliderCall::AutoplayStop);
        self.set_autoplay(false);
    }

    fn autoplay_running(&self) -> Option<bool> {
        self.autoplay
    }

    fn update(&mut self) {
        if !self.destroyed {
            self.journal.record(self.container, SliderCall::Update);
        }
    }

    fn destroy(&mut self, _delete_instance: bool, _clean_styles: bool) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.handlers.clear();
        self.journal.record(self.container, SliderCall::Destroyed);
    }

    fn state(&self) -> SliderState {
        let last = self.count.saturating_sub(1);
        SliderState {
            real_index: self.index,
            is_beginning: self.index == 0,
            is_end: self.index >= last,
            progress: if last == 0 {
                0.0
            } else {
                self.index as f64 / last as f64
            },
            wraps: self.wraps,
            autoplay_running: self.autoplay,
        }
    }

    fn on(&mut self, handler: EventHandler) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.handlers.push((id, handler));
        id
    }

    fn off(&mut self, id: SubscriptionId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(sid, _)| *sid != id);
        self.handlers.len() != before
    }
}
