// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `shift`: aligns `-start` and `-end` variations with the reference's edges.

use kurbo::{Rect, Vec2};

use crate::data::LayoutData;
use crate::placement::{Placement, Variation};

/// Align the popper with the reference edge named by the placement's variation.
pub fn shift<E>(data: &mut LayoutData<E>) {
    let popper = shifted(data.popper(), data.reference(), data.placement);
    data.set_popper(popper);
}

/// `popper` moved along the cross axis so its start or end edge matches `reference`.
pub fn shifted(popper: Rect, reference: Rect, placement: Placement) -> Rect {
    let Some(variation) = placement.variation else {
        return popper;
    };
    let delta = if placement.side.is_vertical() {
        match variation {
            Variation::Start => Vec2::new(reference.x0 - popper.x0, 0.0),
            Variation::End => Vec2::new(reference.x1 - popper.x1, 0.0),
        }
    } else {
        match variation {
            Variation::Start => Vec2::new(0.0, reference.y0 - popper.y0),
            Variation::End => Vec2::new(0.0, reference.y1 - popper.y1),
        }
    };
    popper + delta
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placement::Side;

    #[test]
    fn variations_snap_to_edges() {
        let reference = Rect::new(100.0, 100.0, 200.0, 150.0);
        let popper = Rect::new(0.0, 150.0, 60.0, 170.0);
        let start = shifted(popper, reference, Placement::new(Side::Bottom, Some(Variation::Start)));
        assert_eq!(start, Rect::new(100.0, 150.0, 160.0, 170.0));
        let end = shifted(popper, reference, Placement::new(Side::Bottom, Some(Variation::End)));
        assert_eq!(end, Rect::new(140.0, 150.0, 200.0, 170.0));

        let side = Rect::new(200.0, 0.0, 260.0, 20.0);
        let end = shifted(side, reference, Placement::new(Side::Right, Some(Variation::End)));
        assert_eq!(end, Rect::new(200.0, 130.0, 260.0, 150.0));
    }

    #[test]
    fn no_variation_is_untouched() {
        let popper = Rect::new(1.0, 2.0, 3.0, 4.0);
        let reference = Rect::new(10.0, 10.0, 20.0, 20.0);
        assert_eq!(shifted(popper, reference, Placement::TOP), popper);
    }
}
