//! Control binding: click dispatch and state synchronization

use std::cell::RefCell;
use std::rc::Rc;

use carousel_dom::{DomTree, ElementTree, NodeId, SimpleSelector};
use carousel_engine::config_compiler::Value;
use carousel_engine::{
    ControlKind, Engine, HeadlessEngine, Journal, PageEvent, SliderCall, Viewport,
};

const PAGE: &str = r#"
    <div id="hero" se-swiper-instances="hero" se-autoplay>
      <div class="swiper-wrapper">
        <div class="swiper-slide">A</div>
        <div class="swiper-slide">B</div>
        <div class="swiper-slide">C</div>
      </div>
    </div>
    <div id="hero-2" se-swiper-instances="hero">
      <div class="swiper-wrapper">
        <div class="swiper-slide">A</div>
        <div class="swiper-slide">B</div>
        <div class="swiper-slide">C</div>
      </div>
    </div>
    <nav>
      <button id="prev" se-control="prev" se-target="hero">Prev</button>
      <button id="next" se-control="next" se-target="hero"><span id="next-icon">&gt;</span></button>
      <button id="toggle" se-control="play-pause" se-target="hero">Play/Pause</button>
      <button id="dot-0" se-control="slide-to" se-target="hero" se-slide="0"></button>
      <button id="dot-2" se-control="slide-to" se-target="hero" se-slide="2"></button>
      <div id="bar" se-control="progress" se-target="hero"></div>
      <button id="orphan" se-control="next">No target</button>
      <button id="other" se-control="next" se-target="missing">Other</button>
    </nav>
"#;

struct Fixture {
    doc: Rc<RefCell<DomTree>>,
    journal: Journal,
    engine: Engine<DomTree>,
}

impl Fixture {
    fn new() -> Self {
        let doc = Rc::new(RefCell::new(carousel_html::parse(PAGE).unwrap()));
        let journal = Journal::new();
        let mut engine = Engine::builder(Rc::clone(&doc))
            .slider_engine(HeadlessEngine::with_journal(journal.clone()))
            .viewport(Viewport::new(1280.0, 800.0))
            .build()
            .unwrap();
        engine.handle(PageEvent::Ready);
        Self {
            doc,
            journal,
            engine,
        }
    }

    fn id(&self, id: &str) -> NodeId {
        let doc = self.doc.borrow();
        doc.find_descendant(doc.root(), &SimpleSelector::Id(id.to_string()))
            .unwrap()
    }

    fn click(&mut self, id: &str) -> Option<ControlKind> {
        let target = self.id(id);
        self.engine
            .handle(PageEvent::Click { target })
            .control
            .map(|c| c.kind)
    }

    fn has_class(&self, id: &str, class: &str) -> bool {
        self.doc.borrow().has_class(self.id(id), class)
    }

    fn progress(&self) -> Option<String> {
        let doc = self.doc.borrow();
        doc.element(self.id("bar"))
            .and_then(|el| el.style_property("--se-progress"))
            .map(str::to_string)
    }
}

#[test]
fn test_controls_bound_to_their_target() {
    let fx = Fixture::new();
    let entry = fx.engine.get("hero").unwrap();
    assert_eq!(entry.controls().len(), 6);
    assert!(entry.control_at(fx.id("orphan")).is_none());
    assert!(entry.control_at(fx.id("other")).is_none());
}

#[test]
fn test_initial_sync() {
    let fx = Fixture::new();
    assert!(fx.has_class("prev", "se-disabled"));
    assert!(!fx.has_class("next", "se-disabled"));
    assert!(fx.has_class("dot-0", "se-active"));
    assert!(!fx.has_class("dot-2", "se-active"));
    assert!(fx.has_class("toggle", "se-playing"));
    assert_eq!(fx.progress().as_deref(), Some("0"));
}

#[test]
fn test_next_moves_every_slider_and_syncs() {
    let mut fx = Fixture::new();
    assert_eq!(fx.click("next"), Some(ControlKind::Next));

    assert_eq!(fx.journal.count(SliderCall::SlideNext), 2);
    assert!(!fx.has_class("prev", "se-disabled"));
    assert!(!fx.has_class("dot-0", "se-active"));
    assert_eq!(fx.progress().as_deref(), Some("0.5"));
}

#[test]
fn test_click_is_delegated_from_descendants() {
    let mut fx = Fixture::new();
    assert_eq!(fx.click("next-icon"), Some(ControlKind::Next));
    assert_eq!(fx.journal.count(SliderCall::SlideNext), 2);
}

#[test]
fn test_slide_to_jumps_every_slider() {
    let mut fx = Fixture::new();
    assert_eq!(fx.click("dot-2"), Some(ControlKind::SlideTo(2)));

    assert_eq!(fx.journal.calls_for(fx.id("hero")).last(), Some(&SliderCall::SlideTo(2)));
    assert_eq!(fx.journal.calls_for(fx.id("hero-2")).last(), Some(&SliderCall::SlideTo(2)));
    assert!(fx.has_class("dot-2", "se-active"));
    assert!(!fx.has_class("dot-0", "se-active"));
    assert!(fx.has_class("next", "se-disabled"));
    assert_eq!(fx.progress().as_deref(), Some("1"));
}

#[test]
fn test_play_pause_toggles_per_slider() {
    let mut fx = Fixture::new();

    fx.click("toggle");
    assert!(fx.has_class("toggle", "se-paused"));
    assert!(!fx.has_class("toggle", "se-playing"));
    // only the first container has autoplay; the second has nothing to stop
    assert_eq!(fx.journal.calls_for(fx.id("hero")).last(), Some(&SliderCall::AutoplayStop));
    assert_eq!(fx.journal.calls_for(fx.id("hero-2")).last(), Some(&SliderCall::AutoplayStart));

    fx.click("toggle");
    assert!(fx.has_class("toggle", "se-playing"));
}

#[test]
fn test_unbound_and_passive_clicks_do_nothing() {
    let mut fx = Fixture::new();
    assert_eq!(fx.click("orphan"), None);
    assert_eq!(fx.click("other"), None);
    assert_eq!(fx.click("bar"), None);
    assert_eq!(fx.journal.count(SliderCall::SlideNext), 0);
}

#[test]
fn test_destroy_detaches_controls() {
    let mut fx = Fixture::new();
    fx.engine.destroy("hero").unwrap();

    assert!(!fx.has_class("prev", "se-disabled"));
    assert!(!fx.has_class("dot-0", "se-active"));
    assert!(!fx.has_class("toggle", "se-playing"));

    assert_eq!(fx.click("next"), None);
    assert_eq!(fx.journal.count(SliderCall::SlideNext), 0);
}

#[test]
fn test_disabled_autoplay_options_do_not_start_playback() {
    let html = r#"
        <div id="quiet" se-swiper-instances="quiet" se-autoplay="false" se-autoplay-delay="5000">
          <div class="swiper-wrapper">
            <div class="swiper-slide">A</div>
            <div class="swiper-slide">B</div>
          </div>
        </div>
        <button id="quiet-toggle" se-control="play-pause" se-target="quiet"></button>
    "#;
    let doc = Rc::new(RefCell::new(carousel_html::parse(html).unwrap()));
    let mut engine = Engine::builder(Rc::clone(&doc))
        .slider_engine(HeadlessEngine::new())
        .viewport(Viewport::new(1280.0, 800.0))
        .build()
        .unwrap();
    engine.handle(PageEvent::Ready);

    let entry = engine.get("quiet").unwrap();
    assert_eq!(
        entry.sliders()[0].config().get_path(&["autoplay", "enabled"]),
        Some(&Value::Bool(false))
    );
    assert_eq!(entry.sliders()[0].instance().state().autoplay_running, None);

    let doc = doc.borrow();
    let toggle = doc
        .find_descendant(doc.root(), &SimpleSelector::Id("quiet-toggle".to_string()))
        .unwrap();
    assert!(!doc.has_class(toggle, "se-playing"));
}

#[test]
fn test_destroy_while_document_borrowed_keeps_control_classes() {
    let mut fx = Fixture::new();
    let held = Rc::clone(&fx.doc);
    let guard = held.borrow();

    fx.engine.destroy("hero").unwrap();
    drop(guard);

    assert!(fx.engine.get("hero").is_none());
    assert_eq!(fx.journal.count(SliderCall::Destroyed), 2);
    assert!(fx.has_class("prev", "se-disabled"));
}
