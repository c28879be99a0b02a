// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use kurbo::{Rect, Size, Vec2};
use understory_popper::dom::{Document, ElementId, LocalElement};
use understory_popper::modifiers::FlipBehavior;
use understory_popper::{ComputedStyle, Options, Overflow, Placement, Popper, Position};

/// A reference nested `depth` scroll containers deep, plus a popper next to it.
fn nested_document(depth: usize) -> (Document, ElementId, ElementId) {
    let mut doc = Document::new(Size::new(1280.0, 800.0));
    let mut parent = doc.body();
    for level in 0..depth {
        let inset = level as f64 * 10.0;
        parent = doc.insert(
            parent,
            LocalElement::new(Rect::new(inset, inset, 1200.0 - inset, 760.0 - inset)).with_style(
                ComputedStyle {
                    position: Position::Relative,
                    overflow_y: Overflow::Auto,
                    ..Default::default()
                },
            ),
        );
    }
    let reference = doc.insert(parent, LocalElement::new(Rect::new(600.0, 700.0, 700.0, 730.0)));
    let popper = doc.insert(parent, LocalElement::new(Rect::new(0.0, 0.0, 160.0, 90.0)));
    (doc, reference, popper)
}

fn options() -> Options<ElementId> {
    Options::default()
        .with_placement(Placement::BOTTOM)
        .with_events_enabled(false)
}

fn bench_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("update");
    for &depth in &[0_usize, 4, 16] {
        let (mut doc, reference, tip) = nested_document(depth);
        let mut popper = Popper::new(&mut doc, reference, tip, options()).unwrap();
        group.bench_function(format!("flip_depth{depth}"), |b| {
            b.iter(|| {
                popper.update(&mut doc);
                black_box(popper.placement());
            });
        });
    }

    let (mut doc, reference, tip) = nested_document(4);
    let clockwise = options().with_modifiers(|m| {
        if let Some(flip) = m.flip_mut() {
            flip.behavior = FlipBehavior::Clockwise;
        }
    });
    let mut popper = Popper::new(&mut doc, reference, tip, clockwise).unwrap();
    group.bench_function("clockwise_depth4", |b| {
        b.iter(|| {
            popper.update(&mut doc);
            black_box(popper.placement());
        });
    });
    group.finish();
}

fn bench_create(c: &mut Criterion) {
    c.bench_function("create_and_destroy", |b| {
        b.iter_batched(
            || nested_document(4),
            |(mut doc, reference, tip)| {
                let mut popper =
                    Popper::new(&mut doc, reference, tip, Options::default()).unwrap();
                doc.set_scroll(doc.body(), Vec2::new(0.0, 1.0));
                popper.destroy(&mut doc);
                black_box(doc)
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_update, bench_create);
criterion_main!(benches);
