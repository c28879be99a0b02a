// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `arrow`: positions an arrow element along the popper edge facing the reference.

use alloc::string::String;

use kurbo::{Rect, Vec2};

use crate::data::{ArrowOffset, LayoutData};
use crate::geometry::ElementHandle;
use crate::measure::outer_size;
use crate::modifiers::names;
use crate::pipeline::{ModifierContext, is_modifier_required};
use crate::placement::Side;

/// Which element is the arrow.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArrowTarget<E> {
    /// The first descendant of the popper carrying this marker.
    Marker(String),
    /// An explicit element; must be a descendant of the popper.
    Element(E),
}

impl<E> Default for ArrowTarget<E> {
    fn default() -> Self {
        Self::Marker("x-arrow".into())
    }
}

/// Configuration of the `arrow` modifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArrowConfig<E> {
    /// The arrow element.
    pub element: ArrowTarget<E>,
}

impl<E> Default for ArrowConfig<E> {
    fn default() -> Self {
        Self {
            element: ArrowTarget::default(),
        }
    }
}

/// Resolve the arrow element and compute its offset.
pub fn arrow<E: ElementHandle>(
    data: &mut LayoutData<E>,
    config: &ArrowConfig<E>,
    ctx: &ModifierContext<'_, E>,
) {
    if !is_modifier_required(ctx.modifiers, names::ARROW, names::KEEP_TOGETHER) {
        return;
    }
    let g = ctx.geometry;
    let element = match &config.element {
        ArrowTarget::Marker(marker) => match g.query_marker(ctx.popper, marker) {
            Some(element) => element,
            None => {
                tracing::debug!(marker = %marker, "no arrow element found in popper");
                return;
            }
        },
        ArrowTarget::Element(element) => {
            if !g.contains(ctx.popper, *element) {
                tracing::warn!("arrow element must be a descendant of its popper");
                return;
            }
            *element
        }
    };

    let side = data.placement.side;
    let size = outer_size(g, element);
    let style = g.style(ctx.popper);
    // The arrow is positioned inside the popper's padding box.
    let inset = if side.is_vertical() {
        style.margin.x0 + style.border.x0
    } else {
        style.margin.y0 + style.border.y0
    };
    let length = if side.is_vertical() {
        size.width
    } else {
        size.height
    };

    let (popper, offset) = place_arrow(data.reference(), data.popper(), side, length, inset);
    data.set_popper(popper);
    data.offsets.arrow = Some(offset);
    data.arrow_element = Some(element);
}

/// Nudge `popper` so an arrow of `length` can point at `reference`, and place the arrow.
///
/// The arrow aims at the middle of the cross-axis overlap of both rects and is
/// clamped to `[0, popper length - arrow length]`.
pub fn place_arrow(
    reference: Rect,
    popper: Rect,
    side: Side,
    length: f64,
    inset: f64,
) -> (Rect, ArrowOffset) {
    let vertical = side.is_vertical();
    let (r0, r1) = if vertical {
        (reference.x0, reference.x1)
    } else {
        (reference.y0, reference.y1)
    };
    let (mut p0, extent) = if vertical {
        (popper.x0, popper.width())
    } else {
        (popper.y0, popper.height())
    };

    if r1 - length < p0 {
        p0 = r1 - length;
    }
    if r0 + length > p0 + extent {
        p0 = r0 + length - extent;
    }
    let nudge = if vertical {
        Vec2::new(p0 - popper.x0, 0.0)
    } else {
        Vec2::new(0.0, p0 - popper.y0)
    };

    let lo = r0.max(p0);
    let hi = r1.min(p0 + extent);
    let target = if hi >= lo {
        (lo + hi) / 2.0
    } else {
        (r0 + r1) / 2.0
    };
    let value = (target - length / 2.0 - p0 - inset)
        .round()
        .min(extent - length)
        .max(0.0);

    let offset = if vertical {
        ArrowOffset::Left(value)
    } else {
        ArrowOffset::Top(value)
    };
    (popper + nudge, offset)
}
