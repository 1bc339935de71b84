//! Carousel engine
//!
//! Finds carousel containers in a document, compiles their declarative
//! attributes with [`carousel_config`], constructs sliders through a
//! [`SliderEngine`] and keeps external controls wired to them.
//!
//! # Example
//! ```rust,ignore
//! use std::{cell::RefCell, rc::Rc};
//! use carousel_engine::{Engine, HeadlessEngine, PageEvent};
//!
//! let document = Rc::new(RefCell::new(carousel_html::parse(html)?));
//! let mut engine = Engine::builder(document)
//!     .slider_engine(HeadlessEngine::new())
//!     .build()?;
//! engine.handle(PageEvent::Ready);
//! ```

mod binder;
mod breakpoint;
mod config;
mod controls;
mod engine;
mod error;
mod headless;
mod registry;
mod slider;
pub mod logging;

pub use binder::{apply_event, dispatch, subscribe, sync_state, unbind};
pub use breakpoint::{
    BreakpointRule, BreakpointRules, MediaClause, MediaCondition, Viewport, DEFAULT_RULES,
};
pub use config::{debug_from_url, EngineConfig, StateClasses};
pub use controls::{controls_for, external_navigation, ControlDescriptor, ControlKind, ControlScanner};
pub use engine::{Engine, EngineBuilder, EventReport, LifecycleEvent, PageEvent};
pub use error::{BreakpointError, EngineError, SliderError};
pub use headless::{HeadlessEngine, HeadlessInstance, Journal, JournalEntry, SliderCall};
pub use registry::{BoundSlider, InstanceEntry, Registry};
pub use slider::{
    EventHandler, SliderEngine, SliderEvent, SliderInstance, SliderState, SubscriptionId,
};

// Re-export sub-crates for advanced usage
pub use carousel_config as config_compiler;
pub use carousel_dom as dom;

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
