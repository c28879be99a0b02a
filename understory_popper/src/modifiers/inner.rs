// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `inner`: places the popper inside the reference, against the placement side.

use kurbo::{Rect, Vec2};

use crate::data::LayoutData;
use crate::placement::Side;

/// Move the popper inside the reference and flip the placement to match.
pub fn inner<E>(data: &mut LayoutData<E>) {
    let side = data.placement.side;
    let popper = inside(data.popper(), data.reference(), side);
    data.set_popper(popper);
    data.placement = data.placement.opposite();
}

/// `popper` moved across the reference edge on `side` so it sits inside `reference`.
pub fn inside(popper: Rect, reference: Rect, side: Side) -> Rect {
    let delta = match side {
        Side::Top => Vec2::new(0.0, reference.y0 - popper.y0),
        Side::Bottom => Vec2::new(0.0, reference.y1 - popper.y1),
        Side::Left => Vec2::new(reference.x0 - popper.x0, 0.0),
        Side::Right => Vec2::new(reference.x1 - popper.x1, 0.0),
    };
    popper + delta
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Offsets;
    use crate::placement::Placement;

    #[test]
    fn bottom_popper_moves_inside_reference() {
        let reference = Rect::new(0.0, 0.0, 200.0, 100.0);
        let mut offsets = Offsets {
            reference,
            ..Offsets::default()
        };
        offsets.popper.rect = Rect::new(50.0, 100.0, 150.0, 130.0);
        let mut data: LayoutData<u32> = LayoutData::new(Placement::BOTTOM, offsets, false);
        inner(&mut data);
        assert_eq!(data.popper(), Rect::new(50.0, 70.0, 150.0, 100.0));
        assert_eq!(data.placement, Placement::TOP);
    }

    #[test]
    fn left_popper_aligns_with_left_edge() {
        let reference = Rect::new(100.0, 0.0, 300.0, 100.0);
        let popper = Rect::new(40.0, 20.0, 100.0, 80.0);
        assert_eq!(
            inside(popper, reference, Side::Left),
            Rect::new(100.0, 20.0, 160.0, 80.0)
        );
    }
}
