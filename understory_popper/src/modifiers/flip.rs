// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `flip`: moves the popper to another placement when it overflows.

use alloc::vec::Vec;

use kurbo::{Insets, Rect};

use crate::boundaries::{BoundariesElement, boundaries};
use crate::data::LayoutData;
use crate::geometry::ElementHandle;
use crate::modifiers::names;
use crate::offsets::popper_offsets;
use crate::pipeline::{ModifierContext, is_modifier_enabled, is_modifier_required, run_modifiers};
use crate::placement::{Placement, Side, Variation};

/// Order in which placements are tried.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum FlipBehavior {
    /// The current side, then its opposite.
    #[default]
    Flip,
    /// All four sides, clockwise from the current one.
    Clockwise,
    /// All four sides, counterclockwise from the current one.
    Counterclockwise,
    /// An explicit order. A candidate's variation, when set, replaces the current one.
    Order(Vec<Placement>),
}

/// Configuration of the `flip` modifier.
#[derive(Clone, Debug, PartialEq)]
pub struct FlipConfig<E> {
    /// Candidate order.
    pub behavior: FlipBehavior,
    /// Inset applied to the flip boundaries.
    pub padding: Insets,
    /// What the flip boundaries are computed from.
    pub boundaries_element: BoundariesElement<E>,
    /// Swap `-start`/`-end` when the variation edge overflows the boundaries.
    pub flip_variations: bool,
    /// Swap `-start`/`-end` when the popper's far edge overflows the boundaries.
    pub flip_variations_by_content: bool,
}

impl<E> Default for FlipConfig<E> {
    fn default() -> Self {
        Self {
            behavior: FlipBehavior::Flip,
            padding: Insets::uniform(5.0),
            boundaries_element: BoundariesElement::Viewport,
            flip_variations: false,
            flip_variations_by_content: false,
        }
    }
}

/// Candidate placements for a popper currently on `side`.
pub fn candidates(behavior: &FlipBehavior, side: Side) -> Vec<Placement> {
    let rotate = |step: fn(Side) -> Side| {
        let mut out = Vec::with_capacity(4);
        let mut current = side;
        for _ in 0..4 {
            out.push(Placement::new(current, None));
            current = step(current);
        }
        out
    };
    match behavior {
        FlipBehavior::Flip => alloc::vec![
            Placement::new(side, None),
            Placement::new(side.opposite(), None)
        ],
        FlipBehavior::Clockwise => rotate(Side::clockwise),
        FlipBehavior::Counterclockwise => rotate(Side::counterclockwise),
        FlipBehavior::Order(order) => order.clone(),
    }
}

/// Overflow facts for a popper on one side of its reference.
///
/// All comparisons use floored coordinates.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Overflow {
    /// The popper crossed over the reference on its side.
    pub overlaps_reference: bool,
    /// The popper's left edge is outside the boundaries.
    pub left: bool,
    /// The popper's right edge is outside the boundaries.
    pub right: bool,
    /// The popper's top edge is outside the boundaries.
    pub top: bool,
    /// The popper's bottom edge is outside the boundaries.
    pub bottom: bool,
}

impl Overflow {
    /// Measure `popper` against `reference` and `bounds`.
    pub fn detect(popper: Rect, reference: Rect, bounds: Rect, side: Side) -> Self {
        let floor = f64::floor;
        let overlaps_reference = match side {
            Side::Left => floor(popper.x1) > floor(reference.x0),
            Side::Right => floor(popper.x0) < floor(reference.x1),
            Side::Top => floor(popper.y1) > floor(reference.y0),
            Side::Bottom => floor(popper.y0) < floor(reference.y1),
        };
        Self {
            overlaps_reference,
            left: floor(popper.x0) < floor(bounds.x0),
            right: floor(popper.x1) > floor(bounds.x1),
            top: floor(popper.y0) < floor(bounds.y0),
            bottom: floor(popper.y1) > floor(bounds.y1),
        }
    }

    /// Whether the popper overflows the boundaries on `side`.
    pub fn on(self, side: Side) -> bool {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
            Side::Top => self.top,
            Side::Bottom => self.bottom,
        }
    }

    /// Whether the edge a variation is aligned to overflows.
    pub fn clips_variation(self, side: Side, variation: Variation) -> bool {
        match (side.is_vertical(), variation) {
            (true, Variation::Start) => self.left,
            (true, Variation::End) => self.right,
            (false, Variation::Start) => self.top,
            (false, Variation::End) => self.bottom,
        }
    }

    /// Whether the edge opposite a variation's alignment overflows.
    pub fn clips_content(self, side: Side, variation: Variation) -> bool {
        self.clips_variation(side, variation.opposite())
    }
}

/// Walk the candidate order and move to the next placement while the current one overflows.
pub fn flip<E: ElementHandle>(
    data: &mut LayoutData<E>,
    config: &FlipConfig<E>,
    ctx: &ModifierContext<'_, E>,
) {
    if !is_modifier_required(ctx.modifiers, names::FLIP, names::PREVENT_OVERFLOW) {
        return;
    }
    if is_modifier_enabled(ctx.modifiers, names::INNER) {
        return;
    }
    if data.flipped && data.placement == data.original_placement {
        return;
    }

    let bounds = boundaries(
        ctx.geometry,
        ctx.popper,
        ctx.reference,
        config.padding,
        config.boundaries_element,
        data.position_fixed,
    );
    let order = candidates(&config.behavior, data.placement.side);
    let mut side = data.placement.side;

    for (index, step) in order.iter().enumerate() {
        if step.side != side || index + 1 == order.len() {
            continue;
        }
        side = data.placement.side;
        let mut variation = data.placement.variation;
        let overflow = Overflow::detect(data.popper(), data.reference(), bounds, side);
        let flip_side = overflow.overlaps_reference || overflow.on(side);
        let flip_variation = variation.is_some_and(|v| {
            (config.flip_variations && overflow.clips_variation(side, v))
                || (config.flip_variations_by_content && overflow.clips_content(side, v))
        });
        if !flip_side && !flip_variation {
            continue;
        }

        data.flipped = true;
        if flip_side {
            let next = order[index + 1];
            side = next.side;
            if next.variation.is_some() {
                variation = next.variation;
            }
        }
        if flip_variation {
            variation = variation.map(Variation::opposite);
        }
        let from = data.placement;
        data.placement = Placement::new(side, variation);
        let popper = popper_offsets(ctx.geometry, ctx.popper, data.reference(), data.placement);
        data.set_popper(popper);
        tracing::trace!(from = %from, to = %data.placement, "flipped");
        run_modifiers(ctx, data, Some(names::FLIP));
    }
}
