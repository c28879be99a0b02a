// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `keep_together`: keeps the popper touching its reference on the cross axis.

use kurbo::{Rect, Vec2};

use crate::data::LayoutData;
use crate::placement::Side;

/// Pull the popper back along the cross axis if it drifted past the reference.
pub fn keep_together<E>(data: &mut LayoutData<E>) {
    let popper = kept_together(data.popper(), data.reference(), data.placement.side);
    data.set_popper(popper);
}

/// `popper` moved along the cross axis of `side` until it overlaps `reference`.
///
/// Comparisons use floored coordinates so subpixel gaps do not cause moves.
pub fn kept_together(popper: Rect, reference: Rect, side: Side) -> Rect {
    let floor = f64::floor;
    let delta = if side.is_vertical() {
        if popper.x1 < floor(reference.x0) {
            Vec2::new(floor(reference.x0) - popper.width() - popper.x0, 0.0)
        } else if popper.x0 > floor(reference.x1) {
            Vec2::new(floor(reference.x1) - popper.x0, 0.0)
        } else {
            Vec2::ZERO
        }
    } else if popper.y1 < floor(reference.y0) {
        Vec2::new(0.0, floor(reference.y0) - popper.height() - popper.y0)
    } else if popper.y0 > floor(reference.y1) {
        Vec2::new(0.0, floor(reference.y1) - popper.y0)
    } else {
        Vec2::ZERO
    };
    popper + delta
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drifted_popper_returns_to_reference_edge() {
        let reference = Rect::new(100.0, 100.0, 120.0, 120.0);
        // Pushed far right by overflow clamping.
        let popper = Rect::new(300.0, 120.0, 360.0, 140.0);
        let kept = kept_together(popper, reference, Side::Bottom);
        assert_eq!(kept, Rect::new(120.0, 120.0, 180.0, 140.0));

        let popper = Rect::new(0.0, 120.0, 60.0, 140.0);
        let kept = kept_together(popper, reference, Side::Top);
        assert_eq!(kept.x1, 100.0);

        let popper = Rect::new(120.0, 200.0, 180.0, 220.0);
        let kept = kept_together(popper, reference, Side::Right);
        assert_eq!(kept.y0, 120.0);
    }

    #[test]
    fn overlapping_popper_stays() {
        let reference = Rect::new(100.0, 100.0, 120.0, 120.0);
        let popper = Rect::new(90.0, 120.0, 150.0, 140.0);
        assert_eq!(kept_together(popper, reference, Side::Bottom), popper);
    }
}
