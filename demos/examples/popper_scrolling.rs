// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll listeners and frame-aligned updates.
//!
//! A reference sits inside two nested scroll containers. The popper listens to
//! each of them and to the window. A burst of scroll events is coalesced into
//! a single update, driven here by a tiny event loop over the document's
//! recorded callbacks.
//!
//! Run:
//! - `cargo run -p understory_popper_demos --example popper_scrolling`

use kurbo::{Rect, Size, Vec2};
use tracing_subscriber::filter::LevelFilter;
use understory_popper::dom::{CallbackKind, Document, ElementId, LocalElement};
use understory_popper::geometry::ListenerTarget;
use understory_popper::{ComputedStyle, Options, Overflow, Popper, Position};

fn scroller(bounds: Rect) -> LocalElement {
    LocalElement::new(bounds).with_style(ComputedStyle {
        position: Position::Relative,
        overflow_y: Overflow::Auto,
        ..Default::default()
    })
}

/// Run pending frames, then pending debounced tasks. Returns how many callbacks ran.
fn pump(doc: &mut Document, popper: &mut Popper<ElementId>) -> usize {
    let mut ran = 0;
    for kind in [CallbackKind::Frame, CallbackKind::Microtask] {
        for id in doc.take_callbacks(kind) {
            if popper.run_callback(doc, id) {
                ran += 1;
            }
        }
    }
    ran
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::DEBUG)
        .init();

    let mut doc = Document::new(Size::new(800.0, 600.0));
    let body = doc.body();
    let outer = doc.insert(body, scroller(Rect::new(50.0, 50.0, 550.0, 450.0)));
    let inner = doc.insert(outer, scroller(Rect::new(100.0, 100.0, 400.0, 300.0)));
    let reference = doc.insert(inner, LocalElement::new(Rect::new(150.0, 150.0, 250.0, 180.0)));
    let tooltip = doc.insert(inner, LocalElement::new(Rect::new(0.0, 0.0, 80.0, 24.0)));

    let mut popper = Popper::new(&mut doc, reference, tooltip, Options::default()).unwrap();
    for target in popper.listeners().scroll_targets() {
        match target {
            ListenerTarget::Window => println!("listening: window"),
            ListenerTarget::Element(el) => println!("listening: {el:?}"),
        }
    }

    let before = popper.data().unwrap().popper();
    doc.set_scroll(inner, Vec2::new(0.0, 40.0));
    let ids: Vec<_> = doc.listeners().iter().map(|l| l.id).collect();
    for id in ids {
        popper.handle_event(&mut doc, id);
    }
    let ran = pump(&mut doc, &mut popper);
    println!("callbacks run for the burst: {ran}");
    println!(
        "popper moved from {before:?} to {:?}",
        popper.data().unwrap().popper()
    );

    popper.destroy(&mut doc);
    assert!(doc.listeners().is_empty());
}
