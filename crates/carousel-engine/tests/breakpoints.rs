//! Breakpoint gated lifecycle

use std::cell::RefCell;
use std::rc::Rc;

use carousel_dom::{DomTree, ElementTree, NodeId, SimpleSelector};
use carousel_engine::{
    Engine, EngineConfig, HeadlessEngine, Journal, LifecycleEvent, PageEvent, SliderCall, Viewport,
};

const PAGE: &str = r#"
    <div id="mobile" se-swiper-instances="mobile-only" se-breakpoint="mobile" se-speed="200">
      <div class="swiper-wrapper">
        <div class="swiper-slide"></div>
        <div class="swiper-slide"></div>
        <div class="swiper-slide"></div>
      </div>
    </div>
    <div id="always" se-swiper-instances="always">
      <div class="swiper-wrapper"><div class="swiper-slide"></div></div>
    </div>
    <button id="prev" se-control="prev" se-target="mobile-only"></button>
"#;

const DESKTOP: Viewport = Viewport {
    width: 1280.0,
    height: 800.0,
};
const PHONE: Viewport = Viewport {
    width: 375.0,
    height: 700.0,
};

fn setup(html: &str, viewport: Viewport, config: EngineConfig) -> (Rc<RefCell<DomTree>>, Journal, Engine<DomTree>) {
    let doc = Rc::new(RefCell::new(carousel_html::parse(html).unwrap()));
    let journal = Journal::new();
    let engine = Engine::builder(Rc::clone(&doc))
        .slider_engine(HeadlessEngine::with_journal(journal.clone()))
        .config(config)
        .viewport(viewport)
        .build()
        .unwrap();
    (doc, journal, engine)
}

fn by_id(doc: &Rc<RefCell<DomTree>>, id: &str) -> NodeId {
    let doc = doc.borrow();
    doc.find_descendant(doc.root(), &SimpleSelector::Id(id.to_string()))
        .unwrap()
}

#[test]
fn test_gated_container_waits_for_breakpoint() {
    let (_, _, mut engine) = setup(PAGE, DESKTOP, EngineConfig::default());
    let report = engine.handle(PageEvent::Ready);
    assert_eq!(report.created, vec!["always".to_string()]);
    assert!(engine.get("mobile-only").is_none());
}

#[test]
fn test_matching_at_ready_creates_immediately() {
    let (_, _, mut engine) = setup(PAGE, PHONE, EngineConfig::default());
    engine.handle(PageEvent::Ready);
    assert_eq!(engine.get("mobile-only").unwrap().breakpoint(), Some("mobile"));
}

#[test]
fn test_enter_leave_enter() {
    let (doc, journal, mut engine) = setup(PAGE, DESKTOP, EngineConfig::default());
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    engine.on_lifecycle(move |event| sink.borrow_mut().push(event.clone()));
    engine.handle(PageEvent::Ready);

    let container = by_id(&doc, "mobile");
    let prev = by_id(&doc, "prev");

    let report = engine.handle(PageEvent::ViewportChanged(PHONE));
    assert_eq!(report.created, vec!["mobile-only".to_string()]);
    assert!(doc.borrow().has_class(prev, "se-disabled"));

    let report = engine.handle(PageEvent::ViewportChanged(DESKTOP));
    assert_eq!(report.destroyed, vec!["mobile-only".to_string()]);
    assert!(engine.get("mobile-only").is_none());
    assert!(engine.get("always").is_some());
    assert!(!doc.borrow().has_class(prev, "se-disabled"));
    assert_eq!(journal.calls_for(container).last(), Some(&SliderCall::Destroyed));

    // the destroyed slider no longer reacts to its control
    engine.handle(PageEvent::Click { target: prev });
    assert_eq!(journal.count(SliderCall::SlidePrev), 0);

    doc.borrow_mut().set_attribute(container, "se-initial-slide", "1");
    engine.handle(PageEvent::ViewportChanged(PHONE));
    let entry = engine.get("mobile-only").unwrap();
    assert_eq!(entry.state().unwrap().real_index, 1);
    assert!(!doc.borrow().has_class(prev, "se-disabled"));

    assert_eq!(
        journal.calls_for(container),
        vec![
            SliderCall::Created,
            SliderCall::Destroyed,
            SliderCall::Created
        ]
    );
    let names: Vec<_> = events
        .borrow()
        .iter()
        .map(|e| match e {
            LifecycleEvent::Created { name, .. } => format!("+{name}"),
            LifecycleEvent::Destroyed { name } => format!("-{name}"),
        })
        .collect();
    assert_eq!(names, vec!["+always", "+mobile-only", "-mobile-only", "+mobile-only"]);
}

#[test]
fn test_resize_within_matching_range_keeps_instance() {
    let (_, journal, mut engine) = setup(PAGE, PHONE, EngineConfig::default());
    engine.handle(PageEvent::Ready);

    let report = engine.handle(PageEvent::ViewportChanged(Viewport::new(420.0, 700.0)));
    assert!(report.created.is_empty());
    assert!(report.destroyed.is_empty());
    assert_eq!(journal.count(SliderCall::Created), 2);
}

#[test]
fn test_unknown_rule_does_not_gate() {
    let html = r#"
        <div se-swiper-instances="odd" se-breakpoint="watch">
          <div class="swiper-wrapper"><div></div></div>
        </div>
    "#;
    let (_, _, mut engine) = setup(html, DESKTOP, EngineConfig::default());
    engine.handle(PageEvent::Ready);
    assert!(engine.get("odd").is_some());

    engine.handle(PageEvent::ViewportChanged(PHONE));
    assert!(engine.get("odd").is_some());
}

#[test]
fn test_custom_rule_from_config() {
    let html = r#"
        <div se-swiper-instances="wide" se-breakpoint="desktop">
          <div class="swiper-wrapper"><div></div></div>
        </div>
    "#;
    let config = EngineConfig::from_json(r#"{ "breakpoints": { "desktop": "(min-width: 992px)" } }"#).unwrap();
    let (_, _, mut engine) = setup(html, PHONE, config);

    engine.handle(PageEvent::Ready);
    assert!(engine.get("wide").is_none());

    engine.handle(PageEvent::ViewportChanged(DESKTOP));
    assert!(engine.get("wide").is_some());

    engine.handle(PageEvent::ViewportChanged(PHONE));
    assert!(engine.get("wide").is_none());
}

#[test]
fn test_group_uses_first_declared_breakpoint() {
    let html = r#"
        <div se-swiper-instances="pair"><div class="swiper-wrapper"><div></div></div></div>
        <div se-swiper-instances="pair" se-breakpoint="tablet"><div class="swiper-wrapper"><div></div></div></div>
    "#;
    let (_, _, mut engine) = setup(html, DESKTOP, EngineConfig::default());
    engine.handle(PageEvent::Ready);
    assert!(engine.get("pair").is_none());

    engine.handle(PageEvent::ViewportChanged(Viewport::new(900.0, 700.0)));
    assert_eq!(engine.get("pair").unwrap().sliders().len(), 2);
}

#[test]
fn test_missing_viewport_starts_at_zero() {
    let doc = Rc::new(RefCell::new(carousel_html::parse(PAGE).unwrap()));
    let mut engine = Engine::builder(Rc::clone(&doc))
        .slider_engine(HeadlessEngine::new())
        .build()
        .unwrap();
    assert_eq!(engine.viewport(), Viewport::default());

    let report = engine.handle(PageEvent::Ready);
    assert!(report.created.contains(&"mobile-only".to_string()));

    engine.handle(PageEvent::ViewportChanged(DESKTOP));
    assert!(engine.get("mobile-only").is_none());
}
