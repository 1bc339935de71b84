//! Control binder and state synchronizer
//!
//! Interaction: a control's kind maps to navigation or autoplay calls on
//! every slider of its instance. Synchronization: slider events are mirrored
//! onto control classes (disabled, active, playing/paused) and a progress
//! style property.

use std::cell::RefCell;
use std::rc::Rc;

use carousel_dom::ElementTree;

use crate::config::StateClasses;
use crate::controls::{ControlDescriptor, ControlKind};
use crate::slider::{SliderEvent, SliderInstance, SliderState, SubscriptionId};

/// Run the action bound to `kind` on every slider
pub fn dispatch<'a, I>(kind: ControlKind, sliders: I) -> usize
where
    I: IntoIterator<Item = &'a mut Box<dyn SliderInstance>>,
{
    let mut invoked = 0;
    for slider in sliders {
        match kind {
            ControlKind::Next => slider.slide_next(),
            ControlKind::Prev => slider.slide_prev(),
            ControlKind::Play => slider.autoplay_start(),
            ControlKind::Pause => slider.autoplay_stop(),
            ControlKind::PlayPause => {
                if slider.autoplay_running() == Some(true) {
                    slider.autoplay_stop();
                } else {
                    slider.autoplay_start();
                }
            }
            ControlKind::SlideTo(index) => slider.slide_to(index),
            ControlKind::Pagination | ControlKind::Scrollbar | ControlKind::Progress => continue,
        }
        invoked += 1;
    }
    invoked
}

/// Subscribe a slider so its events keep `controls` in sync.
///
/// The handler borrows the document for each event. If the document is
/// already borrowed (a slider event fired while the host holds it), that
/// event's synchronization is skipped with a warning and the next event
/// brings the controls up to date again.
pub fn subscribe<D>(
    slider: &mut dyn SliderInstance,
    document: &Rc<RefCell<D>>,
    controls: &Rc<[ControlDescriptor]>,
    classes: &Rc<StateClasses>,
) -> SubscriptionId
where
    D: ElementTree + 'static,
{
    let document = Rc::clone(document);
    let controls = Rc::clone(controls);
    let classes = Rc::clone(classes);

    slider.on(Box::new(move |event, state| match document.try_borrow_mut() {
        Ok(mut doc) => apply_event(&mut *doc, &controls, event, state, &classes),
        Err(_) => tracing::warn!("Document busy, dropped {:?} synchronization", event),
    }))
}

/// Mirror one event onto the controls
pub fn apply_event<T: ElementTree + ?Sized>(
    tree: &mut T,
    controls: &[ControlDescriptor],
    event: &SliderEvent,
    state: &SliderState,
    classes: &StateClasses,
) {
    match *event {
        SliderEvent::SlideChange => sync_navigation(tree, controls, state, classes),
        SliderEvent::Progress(progress) => sync_progress(tree, controls, progress, classes),
        SliderEvent::AutoplayStart => sync_autoplay(tree, controls, true, classes),
        SliderEvent::AutoplayStop => sync_autoplay(tree, controls, false, classes),
    }
}

/// Full synchronization, run once right after binding
pub fn sync_state<T: ElementTree + ?Sized>(
    tree: &mut T,
    controls: &[ControlDescriptor],
    state: &SliderState,
    classes: &StateClasses,
) {
    sync_navigation(tree, controls, state, classes);
    sync_progress(tree, controls, state.progress, classes);
    if let Some(running) = state.autoplay_running {
        sync_autoplay(tree, controls, running, classes);
    }
}

/// Disabled prev/next at the edges, active slide-to on the current index
pub fn sync_navigation<T: ElementTree + ?Sized>(
    tree: &mut T,
    controls: &[ControlDescriptor],
    state: &SliderState,
    classes: &StateClasses,
) {
    for control in controls {
        match control.kind {
            ControlKind::Prev => {
                let disabled = !state.wraps && state.is_beginning;
                tree.toggle_class(control.element, &classes.disabled, disabled);
            }
            ControlKind::Next => {
                let disabled = !state.wraps && state.is_end;
                tree.toggle_class(control.element, &classes.disabled, disabled);
            }
            ControlKind::SlideTo(index) => {
                tree.toggle_class(control.element, &classes.active, state.real_index == index);
            }
            _ => {}
        }
    }
}

/// Write progress, clamped to `[0, 1]`, onto progress controls
pub fn sync_progress<T: ElementTree + ?Sized>(
    tree: &mut T,
    controls: &[ControlDescriptor],
    progress: f64,
    classes: &StateClasses,
) {
    let progress = if progress.is_nan() { 0.0 } else { progress.clamp(0.0, 1.0) };
    let value = progress.to_string();
    for control in controls.iter().filter(|c| c.kind == ControlKind::Progress) {
        tree.set_style_property(control.element, &classes.progress_property, &value);
    }
}

/// Playing/paused classes on play-pause controls
pub fn sync_autoplay<T: ElementTree + ?Sized>(
    tree: &mut T,
    controls: &[ControlDescriptor],
    running: bool,
    classes: &StateClasses,
) {
    for control in controls.iter().filter(|c| c.kind == ControlKind::PlayPause) {
        tree.toggle_class(control.element, &classes.playing, running);
        tree.toggle_class(control.element, &classes.paused, !running);
    }
}

/// Remove every state class the binder may have set
pub fn unbind<T: ElementTree + ?Sized>(
    tree: &mut T,
    controls: &[ControlDescriptor],
    classes: &StateClasses,
) {
    for control in controls {
        for class in [
            &classes.disabled,
            &classes.active,
            &classes.playing,
            &classes.paused,
        ] {
            tree.toggle_class(control.element, class, false);
        }
    }
}
