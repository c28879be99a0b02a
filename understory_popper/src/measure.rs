// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry utilities: normalized rects, offset and scroll parents, relative rects.
//!
//! Every function here is total. Stale or detached elements produce degraded
//! (usually zero or root-relative) rects instead of failing, so one bad input
//! cannot abort a layout pass.

use alloc::vec::Vec;

use kurbo::{Point, Rect, Size, Vec2};

use crate::geometry::Geometry;

/// A rect relative to some element, with the root margins that were folded in.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct RelativeRect {
    /// The rect in the parent's coordinate space.
    pub rect: Rect,
    /// Left (`x`) and top (`y`) margins of the parent; non-zero only when the parent is the root.
    pub margin: Vec2,
}

/// Parent of `element`, crossing from a shadow root to its host. `None` at the root.
pub fn parent_node<G: Geometry + ?Sized>(g: &G, element: G::Element) -> Option<G::Element> {
    if element == g.document_element() {
        return None;
    }
    g.parent(element).or_else(|| g.shadow_host(element))
}

/// The topmost same-tree ancestor: the document element, a shadow root, or a detached subtree root.
pub fn root_of<G: Geometry + ?Sized>(g: &G, element: G::Element) -> G::Element {
    let mut current = element;
    while let Some(parent) = g.parent(current) {
        current = parent;
    }
    current
}

/// Size of the whole document: the largest of the body and root sizes.
pub fn window_size<G: Geometry + ?Sized>(g: &G) -> Size {
    let body = g.body();
    let html = g.document_element();
    let sizes = [
        g.offset_size(body),
        g.scroll_size(body),
        g.client_size(html),
        g.offset_size(html),
        g.scroll_size(html),
    ];
    sizes.iter().fold(Size::ZERO, |acc, s| {
        Size::new(acc.width.max(s.width), acc.height.max(s.height))
    })
}

/// Scroll offset of `element`. The body and the root report the document scroll.
pub fn scroll<G: Geometry + ?Sized>(g: &G, element: G::Element) -> Vec2 {
    let html = g.document_element();
    if element == html || element == g.body() {
        g.scroll_offset(html)
    } else {
        g.scroll_offset(element)
    }
}

/// Translate `rect` by the scroll offset of `element` (or back, when `subtract` is set).
pub fn include_scroll<G: Geometry + ?Sized>(
    g: &G,
    rect: Rect,
    element: G::Element,
    subtract: bool,
) -> Rect {
    let s = scroll(g, element);
    if subtract { rect - s } else { rect + s }
}

/// Viewport-relative border box of `element`, with scrollbars removed.
///
/// For the root element the full document size is used instead of the
/// viewport-clipped size.
pub fn bounding_rect<G: Geometry + ?Sized>(g: &G, element: G::Element) -> Rect {
    if !g.is_valid(element) {
        return Rect::ZERO;
    }
    let rect = g.client_rect(element);
    let inner = if element == g.document_element() {
        window_size(g)
    } else {
        g.client_size(element)
    };
    let width = if inner.width != 0.0 {
        inner.width
    } else {
        rect.width()
    };
    let height = if inner.height != 0.0 {
        inner.height
    } else {
        rect.height()
    };

    let outer = g.offset_size(element);
    let mut horizontal_scrollbar = outer.width - width;
    let mut vertical_scrollbar = outer.height - height;
    let mut size = rect.size();
    if horizontal_scrollbar != 0.0 || vertical_scrollbar != 0.0 {
        let border = g.style(element).border;
        horizontal_scrollbar -= border.x0 + border.x1;
        vertical_scrollbar -= border.y0 + border.y1;
        size.width -= horizontal_scrollbar;
        size.height -= vertical_scrollbar;
    }
    Rect::from_origin_size(rect.origin(), size)
}

/// Border box plus margins.
pub fn outer_size<G: Geometry + ?Sized>(g: &G, element: G::Element) -> Size {
    let size = g.offset_size(element);
    let margin = g.style(element).margin;
    Size::new(
        size.width + margin.x0 + margin.x1,
        size.height + margin.y0 + margin.y1,
    )
}

/// Nearest positioned ancestor. The body, the root, and "none" all map to the root.
pub fn offset_parent<G: Geometry + ?Sized>(g: &G, element: G::Element) -> G::Element {
    let html = g.document_element();
    match g.native_offset_parent(element) {
        Some(parent) if parent != html && parent != g.body() => parent,
        _ => html,
    }
}

/// Whether `element` is the offset parent of its own children.
pub fn is_offset_container<G: Geometry + ?Sized>(g: &G, element: G::Element) -> bool {
    if element == g.body() {
        return false;
    }
    element == g.document_element() || g.style(element).position.is_positioned()
}

fn common_ancestor<G: Geometry + ?Sized>(
    g: &G,
    a: G::Element,
    b: G::Element,
) -> Option<G::Element> {
    let mut chain = Vec::new();
    let mut current = Some(a);
    while let Some(el) = current {
        chain.push(el);
        current = g.parent(el);
    }
    let mut current = Some(b);
    while let Some(el) = current {
        if chain.contains(&el) {
            return Some(el);
        }
        current = g.parent(el);
    }
    None
}

/// Nearest offset parent shared by `a` and `b`.
///
/// When the two live in different trees (one inside a shadow root), the walk
/// restarts from the shadow host until a shared tree is found. Falls back to the root.
pub fn common_offset_parent<G: Geometry + ?Sized>(
    g: &G,
    a: G::Element,
    b: G::Element,
) -> G::Element {
    let html = g.document_element();
    if !g.is_valid(a) || !g.is_valid(b) {
        return html;
    }
    let (mut a, mut b) = (a, b);
    loop {
        if let Some(common) = common_ancestor(g, a, b) {
            return if is_offset_container(g, common) {
                common
            } else {
                offset_parent(g, common)
            };
        }
        if let Some(host) = g.shadow_host(root_of(g, a)) {
            a = host;
        } else if let Some(host) = g.shadow_host(root_of(g, b)) {
            b = host;
        } else {
            return html;
        }
    }
}

/// Offset parent of a fixed-position element: its nearest transformed ancestor, or the root.
pub fn fixed_position_offset_parent<G: Geometry + ?Sized>(
    g: &G,
    element: G::Element,
) -> G::Element {
    let mut current = g.parent(element);
    while let Some(el) = current {
        if g.style(el).has_transform {
            return el;
        }
        current = g.parent(el);
    }
    g.document_element()
}

/// Whether `element` or one of its ancestors is fixed-positioned.
pub fn is_fixed<G: Geometry + ?Sized>(g: &G, element: G::Element) -> bool {
    let html = g.document_element();
    let body = g.body();
    let mut current = Some(element);
    while let Some(el) = current {
        if el == html || el == body {
            return false;
        }
        if g.style(el).position == crate::geometry::Position::Fixed {
            return true;
        }
        current = parent_node(g, el);
    }
    false
}

/// Nearest scroll container of `element` (inclusive). Falls back to the body.
pub fn scroll_parent<G: Geometry + ?Sized>(g: &G, element: G::Element) -> G::Element {
    let html = g.document_element();
    let body = g.body();
    let mut current = element;
    loop {
        if current == html || current == body || !g.is_valid(current) {
            return body;
        }
        if g.style(current).scrolls() {
            return current;
        }
        match parent_node(g, current) {
            Some(parent) => current = parent,
            None => return body,
        }
    }
}

/// `child`'s rect in `parent`'s coordinate space.
///
/// Corrects for the parent's border, and for its margin when the parent is the
/// root. When the parent is `child`'s scroll container its scroll offset is
/// added back, since the client rects already moved with the scroll.
pub fn rect_relative_to<G: Geometry + ?Sized>(
    g: &G,
    child: G::Element,
    parent: G::Element,
    fixed_position: bool,
) -> RelativeRect {
    let html = g.document_element();
    let is_html = parent == html;
    let child_rect = bounding_rect(g, child);
    let mut parent_rect = bounding_rect(g, parent);
    let scroll_parent = scroll_parent(g, child);
    let style = g.style(parent);
    let border = style.border;

    if fixed_position && is_html {
        parent_rect = Rect::from_origin_size(
            Point::new(parent_rect.x0.max(0.0), parent_rect.y0.max(0.0)),
            parent_rect.size(),
        );
    }

    let mut rect = Rect::from_origin_size(
        Point::new(
            child_rect.x0 - parent_rect.x0 - border.x0,
            child_rect.y0 - parent_rect.y0 - border.y0,
        ),
        child_rect.size(),
    );
    let mut margin = Vec2::ZERO;

    if is_html {
        margin = Vec2::new(style.margin.x0, style.margin.y0);
        rect = rect - Vec2::new(border.x0 - margin.x, border.y0 - margin.y);
    }

    if parent == scroll_parent && scroll_parent != g.body() {
        rect = include_scroll(g, rect, parent, false);
    }

    RelativeRect { rect, margin }
}

/// The visible viewport expressed relative to `element`.
///
/// With `exclude_scroll` the document scroll is ignored, as needed for fixed poppers.
pub fn viewport_rect<G: Geometry + ?Sized>(
    g: &G,
    element: G::Element,
    exclude_scroll: bool,
) -> Rect {
    let html = g.document_element();
    let relative = rect_relative_to(g, element, html, false);
    let viewport = g.viewport_size();
    let client = g.client_size(html);
    let size = Size::new(
        client.width.max(viewport.width),
        client.height.max(viewport.height),
    );
    let s = if exclude_scroll {
        Vec2::ZERO
    } else {
        scroll(g, html)
    };
    Rect::from_origin_size(
        Point::new(
            s.x - relative.rect.x0 + relative.margin.x,
            s.y - relative.rect.y0 + relative.margin.y,
        ),
        size,
    )
}
