// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Initial reference and popper offsets for a pass.

use kurbo::{Point, Rect, Size};

use crate::geometry::Geometry;
use crate::measure::{
    common_offset_parent, fixed_position_offset_parent, outer_size, rect_relative_to,
};
use crate::placement::{Placement, Side, Variation};

/// Reference rect relative to the offset parent the popper will be positioned in.
pub fn reference_offsets<G: Geometry + ?Sized>(
    g: &G,
    popper: G::Element,
    reference: G::Element,
    fixed_position: bool,
) -> Rect {
    let parent = if fixed_position {
        fixed_position_offset_parent(g, popper)
    } else {
        common_offset_parent(g, popper, reference)
    };
    rect_relative_to(g, reference, parent, fixed_position).rect
}

/// Popper rect placed next to `reference` at `placement`, sized by the popper's outer size.
pub fn popper_offsets<G: Geometry + ?Sized>(
    g: &G,
    popper: G::Element,
    reference: Rect,
    placement: Placement,
) -> Rect {
    place(outer_size(g, popper), reference, placement)
}

/// Place a box of `size` against `reference`.
///
/// The main axis puts the box flush against the reference's edge. The cross axis
/// centers it, or aligns it with the start or end edge for a variation.
pub fn place(size: Size, reference: Rect, placement: Placement) -> Rect {
    let cross = |start: f64, len: f64, own: f64| match placement.variation {
        None => start + len / 2.0 - own / 2.0,
        Some(Variation::Start) => start,
        Some(Variation::End) => start + len - own,
    };
    let origin = match placement.side {
        Side::Top => Point::new(
            cross(reference.x0, reference.width(), size.width),
            reference.y0 - size.height,
        ),
        Side::Bottom => Point::new(
            cross(reference.x0, reference.width(), size.width),
            reference.y1,
        ),
        Side::Left => Point::new(
            reference.x0 - size.width,
            cross(reference.y0, reference.height(), size.height),
        ),
        Side::Right => Point::new(
            reference.x1,
            cross(reference.y0, reference.height(), size.height),
        ),
    };
    Rect::from_origin_size(origin, size)
}

#[cfg(test)]
mod tests {
    use super::*;

    const REFERENCE: Rect = Rect::new(100.0, 100.0, 200.0, 140.0);

    #[test]
    fn centered_on_cross_axis() {
        let size = Size::new(60.0, 20.0);
        let bottom = place(size, REFERENCE, Placement::BOTTOM);
        assert_eq!(bottom, Rect::new(120.0, 140.0, 180.0, 160.0));
        let top = place(size, REFERENCE, Placement::TOP);
        assert_eq!(top, Rect::new(120.0, 80.0, 180.0, 100.0));
        let left = place(size, REFERENCE, Placement::LEFT);
        assert_eq!(left, Rect::new(40.0, 110.0, 100.0, 130.0));
        let right = place(size, REFERENCE, Placement::RIGHT);
        assert_eq!(right, Rect::new(200.0, 110.0, 260.0, 130.0));
    }

    #[test]
    fn variations_align_flush() {
        let size = Size::new(60.0, 20.0);
        let start = place(size, REFERENCE, Placement::new(Side::Bottom, Some(Variation::Start)));
        assert_eq!(start.x0, REFERENCE.x0);
        let end = place(size, REFERENCE, Placement::new(Side::Top, Some(Variation::End)));
        assert_eq!(end.x1, REFERENCE.x1);
        let right_end = place(size, REFERENCE, Placement::new(Side::Right, Some(Variation::End)));
        assert_eq!(right_end.y1, REFERENCE.y1);
    }
}
