// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Resolution of `auto` placements.

use kurbo::{Insets, Rect, Size};

use crate::boundaries::{BoundariesElement, boundaries};
use crate::geometry::Geometry;
use crate::placement::{Placement, PlacementRequest, Side, Variation};

/// Resolve `request` to a concrete placement.
///
/// Fixed requests pass through. Automatic requests measure the room around
/// `reference_rect` inside the reference's scroll container and pick a side
/// with [`choose_side`]. The requested variation is kept.
pub fn compute_auto_placement<G: Geometry + ?Sized>(
    g: &G,
    request: PlacementRequest,
    reference_rect: Rect,
    popper: G::Element,
    reference: G::Element,
    fixed_position: bool,
) -> Placement {
    let variation = match request {
        PlacementRequest::Fixed(placement) => return placement,
        PlacementRequest::Auto(variation) => variation,
    };
    let bounds = boundaries(
        g,
        popper,
        reference,
        Insets::ZERO,
        BoundariesElement::ScrollParent,
        fixed_position,
    );
    resolve(variation, reference_rect, bounds, g.client_size(popper))
}

/// Build the placement chosen by [`choose_side`].
pub fn resolve(
    variation: Option<Variation>,
    reference: Rect,
    boundaries: Rect,
    popper: Size,
) -> Placement {
    Placement::new(choose_side(reference, boundaries, popper), variation)
}

/// The side with the largest free region between `reference` and `boundaries`.
///
/// Each side's region spans the boundary along the cross axis and the margin
/// between reference and boundary along the main axis. Sides whose region can
/// hold the popper win over sides that cannot; ties go to the first side in
/// clockwise order from the top.
pub fn choose_side(reference: Rect, boundaries: Rect, popper: Size) -> Side {
    let regions = [
        (
            Side::Top,
            Size::new(boundaries.width(), reference.y0 - boundaries.y0),
        ),
        (
            Side::Right,
            Size::new(boundaries.x1 - reference.x1, boundaries.height()),
        ),
        (
            Side::Bottom,
            Size::new(boundaries.width(), boundaries.y1 - reference.y1),
        ),
        (
            Side::Left,
            Size::new(reference.x0 - boundaries.x0, boundaries.height()),
        ),
    ];
    let fits = |s: &Size| s.width >= popper.width && s.height >= popper.height;
    let largest = |only_fitting: bool| {
        regions
            .iter()
            .filter(|(_, s)| !only_fitting || fits(s))
            .fold(None, |best: Option<(Side, f64)>, (side, s)| {
                let area = s.width * s.height;
                match best {
                    Some((_, best_area)) if best_area >= area => best,
                    _ => Some((*side, area)),
                }
            })
            .map(|(side, _)| side)
    };
    largest(true).or_else(|| largest(false)).unwrap_or(Side::Bottom)
}
