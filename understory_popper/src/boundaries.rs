// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Boundary rects that poppers are kept inside.

use kurbo::{Insets, Rect};

use crate::geometry::Geometry;
use crate::measure::{
    common_offset_parent, fixed_position_offset_parent, is_fixed, parent_node, rect_relative_to,
    scroll_parent, viewport_rect, window_size,
};

/// What a boundary is computed from.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum BoundariesElement<E> {
    /// The reference's nearest scroll container (the whole document at the top).
    #[default]
    ScrollParent,
    /// The whole document.
    Window,
    /// The visible viewport.
    Viewport,
    /// An explicit element.
    Element(E),
}

/// The boundary rect for a popper, relative to the popper's offset parent, shrunk by `padding`.
pub fn boundaries<G: Geometry + ?Sized>(
    g: &G,
    popper: G::Element,
    reference: G::Element,
    padding: Insets,
    target: BoundariesElement<G::Element>,
    fixed_position: bool,
) -> Rect {
    let html = g.document_element();
    let offset_parent = if fixed_position {
        fixed_position_offset_parent(g, popper)
    } else {
        common_offset_parent(g, popper, reference)
    };

    let node = match target {
        BoundariesElement::Viewport => None,
        BoundariesElement::ScrollParent => {
            let scroller = match parent_node(g, reference) {
                Some(parent) => scroll_parent(g, parent),
                None => g.body(),
            };
            Some(if scroller == g.body() { html } else { scroller })
        }
        BoundariesElement::Window => Some(html),
        BoundariesElement::Element(element) => Some(element),
    };

    let rect = match node {
        None => viewport_rect(g, offset_parent, fixed_position),
        Some(node) => {
            let offsets = rect_relative_to(g, node, offset_parent, fixed_position);
            if node == html && !is_fixed(g, offset_parent) {
                let size = window_size(g);
                Rect::new(
                    offsets.rect.x0 - offsets.margin.x,
                    offsets.rect.y0 - offsets.margin.y,
                    size.width + offsets.rect.x0,
                    size.height + offsets.rect.y0,
                )
            } else {
                offsets.rect
            }
        }
    };

    shrink(rect, padding)
}

/// Move every edge of `rect` inwards by the matching inset.
pub fn shrink(rect: Rect, padding: Insets) -> Rect {
    Rect::new(
        rect.x0 + padding.x0,
        rect.y0 + padding.y0,
        rect.x1 - padding.x1,
        rect.y1 - padding.y1,
    )
}
