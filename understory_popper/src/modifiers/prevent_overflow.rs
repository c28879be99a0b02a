// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `prevent_overflow`: keeps the popper inside its boundaries.

use alloc::vec::Vec;

use kurbo::{Insets, Rect, Vec2};

use crate::boundaries::{BoundariesElement, boundaries};
use crate::data::LayoutData;
use crate::geometry::ElementHandle;
use crate::measure::offset_parent;
use crate::pipeline::ModifierContext;
use crate::placement::Side;

/// Configuration of the `prevent_overflow` modifier.
#[derive(Clone, Debug, PartialEq)]
pub struct PreventOverflowConfig<E> {
    /// Sides kept inside the boundaries, most important first.
    ///
    /// When opposite sides both overflow, the earlier one stays inside.
    pub priority: Vec<Side>,
    /// Inset applied to the boundaries.
    pub padding: Insets,
    /// What the boundaries are computed from.
    pub boundaries_element: BoundariesElement<E>,
    /// Let the popper leave the boundaries together with the reference.
    pub escape_with_reference: bool,
}

impl<E> Default for PreventOverflowConfig<E> {
    fn default() -> Self {
        Self {
            priority: alloc::vec![Side::Left, Side::Right, Side::Top, Side::Bottom],
            padding: Insets::uniform(5.0),
            boundaries_element: BoundariesElement::ScrollParent,
            escape_with_reference: false,
        }
    }
}

/// Compute the boundaries, record them on `data`, and clamp the popper into them.
pub fn prevent_overflow<E: ElementHandle>(
    data: &mut LayoutData<E>,
    config: &PreventOverflowConfig<E>,
    ctx: &ModifierContext<'_, E>,
) {
    let g = ctx.geometry;
    let target = match config.boundaries_element {
        // The reference cannot bound its own popper.
        BoundariesElement::Element(element) if element == ctx.reference => {
            BoundariesElement::Element(offset_parent(g, element))
        }
        target => target,
    };
    let bounds = boundaries(
        g,
        ctx.popper,
        ctx.reference,
        config.padding,
        target,
        data.position_fixed,
    );
    data.boundaries = Some(bounds);
    let popper = clamp(
        data.popper(),
        bounds,
        &config.priority,
        config.escape_with_reference,
    );
    data.set_popper(popper);
}

/// Move `popper` so each listed side lies within `bounds`.
///
/// Sides are corrected from last to first, so earlier sides win conflicts.
pub fn clamp(popper: Rect, bounds: Rect, priority: &[Side], escape_with_reference: bool) -> Rect {
    if escape_with_reference {
        return popper;
    }
    priority.iter().rev().fold(popper, |p, side| {
        let delta = match side {
            Side::Left if p.x0 < bounds.x0 => Vec2::new(bounds.x0 - p.x0, 0.0),
            Side::Top if p.y0 < bounds.y0 => Vec2::new(0.0, bounds.y0 - p.y0),
            Side::Right if p.x1 > bounds.x1 => Vec2::new(bounds.x1 - p.x1, 0.0),
            Side::Bottom if p.y1 > bounds.y1 => Vec2::new(0.0, bounds.y1 - p.y1),
            _ => Vec2::ZERO,
        };
        p + delta
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDS: Rect = Rect::new(0.0, 0.0, 500.0, 400.0);

    #[test]
    fn clamps_every_listed_side() {
        let priorities = [
            [Side::Left, Side::Right, Side::Top, Side::Bottom],
            [Side::Bottom, Side::Top, Side::Right, Side::Left],
            [Side::Top, Side::Left, Side::Bottom, Side::Right],
        ];
        let poppers = [
            Rect::new(-30.0, -10.0, 70.0, 40.0),
            Rect::new(450.0, 380.0, 550.0, 430.0),
            Rect::new(-5.0, 390.0, 95.0, 440.0),
        ];
        for priority in priorities {
            for popper in poppers {
                let clamped = clamp(popper, BOUNDS, &priority, false);
                assert_eq!(clamped.size(), popper.size(), "clamping only moves");
                assert!(clamped.x0 >= BOUNDS.x0 && clamped.x1 <= BOUNDS.x1, "{clamped:?}");
                assert!(clamped.y0 >= BOUNDS.y0 && clamped.y1 <= BOUNDS.y1, "{clamped:?}");
            }
        }
    }

    #[test]
    fn earlier_side_wins_for_oversized_poppers() {
        let wide = Rect::new(-50.0, 10.0, 650.0, 60.0);
        let left_first = clamp(wide, BOUNDS, &[Side::Left, Side::Right], false);
        assert_eq!(left_first.x0, BOUNDS.x0, "left listed first stays inside");
        assert_eq!(left_first.x1, 700.0, "right overflows instead");
        let right_first = clamp(wide, BOUNDS, &[Side::Right, Side::Left], false);
        assert_eq!(right_first.x1, BOUNDS.x1, "right listed first stays inside");

        let tall = Rect::new(10.0, -20.0, 60.0, 480.0);
        let bottom_first = clamp(tall, BOUNDS, &[Side::Bottom, Side::Left, Side::Top], false);
        assert_eq!(bottom_first.y1, BOUNDS.y1, "bottom listed first stays inside");
        assert_eq!(bottom_first.y0, -100.0, "top overflows instead");
    }

    #[test]
    fn unlisted_sides_and_escape_are_untouched() {
        let popper = Rect::new(-30.0, -10.0, 70.0, 40.0);
        let clamped = clamp(popper, BOUNDS, &[Side::Top], false);
        assert_eq!(clamped, Rect::new(-30.0, 0.0, 70.0, 50.0));
        assert_eq!(clamp(popper, BOUNDS, &[Side::Left, Side::Top], true), popper);
    }
}
