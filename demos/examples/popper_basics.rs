// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Popper basics.
//!
//! Place a tooltip above a button, print the styles it receives, then move the
//! button to the top edge and watch the tooltip flip below it.
//!
//! Run:
//! - `cargo run -p understory_popper_demos --example popper_basics`

use kurbo::{Rect, Size};
use tracing_subscriber::filter::LevelFilter;
use understory_popper::dom::{Document, LocalElement};
use understory_popper::{Options, Placement, Popper};

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::TRACE)
        .init();

    let mut doc = Document::new(Size::new(800.0, 600.0));
    let body = doc.body();
    let button = doc.insert(body, LocalElement::new(Rect::new(350.0, 280.0, 450.0, 310.0)));
    let tooltip = doc.insert(body, LocalElement::new(Rect::new(0.0, 0.0, 120.0, 32.0)));

    let options = Options::default()
        .with_placement(Placement::TOP)
        .with_events_enabled(false);
    let mut popper = Popper::new(&mut doc, button, tooltip, options).unwrap();

    println!("placement: {}", popper.placement());
    for (name, value) in doc.styles(tooltip).unwrap() {
        println!("  {name}: {value}");
    }
    assert_eq!(popper.placement(), Placement::TOP);

    // No room above any more.
    doc.set_bounds(button, Rect::new(350.0, 4.0, 450.0, 34.0));
    popper.update(&mut doc);
    println!("after moving the button: {}", popper.placement());
    println!(
        "x-placement attribute: {:?}",
        doc.attribute(tooltip, "x-placement")
    );
    assert_eq!(popper.placement(), Placement::BOTTOM);

    popper.destroy(&mut doc);
}
