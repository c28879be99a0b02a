// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Configuring modifiers.
//!
//! Uses an offset expression, an arrow element, clockwise flipping, and a
//! custom modifier that records the final popper rect.
//!
//! Run:
//! - `cargo run -p understory_popper_demos --example popper_modifiers`

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::{Rect, Size};
use tracing_subscriber::filter::LevelFilter;
use understory_popper::dom::{Document, LocalElement};
use understory_popper::modifiers::FlipBehavior;
use understory_popper::{Modifier, Options, Placement, Popper};

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::DEBUG)
        .init();

    let mut doc = Document::new(Size::new(800.0, 600.0));
    let body = doc.body();
    let reference = doc.insert(body, LocalElement::new(Rect::new(600.0, 200.0, 700.0, 240.0)));
    let menu = doc.insert(body, LocalElement::new(Rect::new(0.0, 0.0, 180.0, 120.0)));
    let arrow = doc.insert(
        menu,
        LocalElement::new(Rect::new(0.0, 0.0, 12.0, 6.0)).with_marker("x-arrow"),
    );

    let seen = Rc::new(RefCell::new(Vec::new()));
    let options = {
        let seen = Rc::clone(&seen);
        Options::default()
            .with_placement(Placement::RIGHT)
            .with_events_enabled(false)
            .with_modifiers(|m| {
                if let Some(offset) = m.offset_mut() {
                    offset.offset = "0, 8".parse().unwrap();
                }
                if let Some(flip) = m.flip_mut() {
                    flip.behavior = FlipBehavior::Clockwise;
                }
            })
            .with_modifier(Modifier::custom("record", 840, move |data, _| {
                seen.borrow_mut().push((data.placement, data.popper()));
            }))
    };
    let popper = Popper::new(&mut doc, reference, menu, options).unwrap();

    println!("requested right, got {}", popper.placement());
    for (placement, rect) in seen.borrow().iter() {
        println!("  recorded {placement}: {rect:?}");
    }
    if let Some(offset) = popper.data().unwrap().offsets.arrow {
        println!("arrow offset: {offset:?}");
    }
    println!("arrow styles: {:?}", doc.styles(arrow).unwrap());
}
