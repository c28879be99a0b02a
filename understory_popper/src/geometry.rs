// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host capabilities: the element tree the engine reads from and writes to.
//!
//! The engine never talks to a rendering host directly. It reads geometry
//! through [`Geometry`] and performs its few side effects (style writes,
//! listeners, scheduled callbacks) through [`Host`]. The [`dom`](crate::dom)
//! module provides a headless implementation.

use core::fmt::Debug;

use kurbo::{Insets, Rect, Size, Vec2};

use crate::data::{Attributes, Styles};

/// Handle to an element owned by a host.
///
/// Implemented for every small, copyable, comparable handle type.
pub trait ElementHandle: Copy + Eq + Debug {}

impl<T: Copy + Eq + Debug> ElementHandle for T {}

/// CSS `position` of an element.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Position {
    /// Normal flow; does not establish an offset parent.
    #[default]
    Static,
    /// Relatively positioned.
    Relative,
    /// Absolutely positioned.
    Absolute,
    /// Fixed to the viewport (or the nearest transformed ancestor).
    Fixed,
    /// Sticky.
    Sticky,
}

impl Position {
    /// Whether an element with this position is an offset parent for its descendants.
    pub const fn is_positioned(self) -> bool {
        !matches!(self, Self::Static)
    }

    /// CSS keyword.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::Relative => "relative",
            Self::Absolute => "absolute",
            Self::Fixed => "fixed",
            Self::Sticky => "sticky",
        }
    }
}

/// CSS `overflow` along one axis.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Overflow {
    /// Content is not clipped.
    #[default]
    Visible,
    /// Content is clipped without scrolling.
    Hidden,
    /// Content is clipped and may be scrolled programmatically.
    Clip,
    /// Scrollbars appear when needed.
    Auto,
    /// Scrollbars always appear.
    Scroll,
    /// Like `auto`, with scrollbars overlaying content.
    Overlay,
}

impl Overflow {
    /// Whether this value makes the element a scroll container for the engine.
    pub const fn scrolls(self) -> bool {
        matches!(self, Self::Auto | Self::Scroll | Self::Overlay)
    }
}

/// The computed style values the engine consumes.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ComputedStyle {
    /// CSS `position`.
    pub position: Position,
    /// CSS `overflow-x`.
    pub overflow_x: Overflow,
    /// CSS `overflow-y`.
    pub overflow_y: Overflow,
    /// Border widths (`x0` left, `y0` top, `x1` right, `y1` bottom).
    pub border: Insets,
    /// Margins, same layout as `border`.
    pub margin: Insets,
    /// Whether a `transform` other than `none` applies.
    pub has_transform: bool,
}

impl ComputedStyle {
    /// Whether either axis scrolls.
    pub const fn scrolls(&self) -> bool {
        self.overflow_x.scrolls() || self.overflow_y.scrolls()
    }
}

/// Read-only geometry queries over an element tree.
///
/// Rects are in CSS pixels. Implementations should never panic on stale or
/// detached handles; they return zero sizes and rects instead.
pub trait Geometry {
    /// Element handle type.
    type Element: ElementHandle;

    /// Whether `element` is a handle this host knows about.
    fn is_valid(&self, element: Self::Element) -> bool;

    /// The root element (`html` in a document).
    fn document_element(&self) -> Self::Element;

    /// The `body` element.
    fn body(&self) -> Self::Element;

    /// Parent within the same tree. `None` at the document root and at shadow roots.
    fn parent(&self, element: Self::Element) -> Option<Self::Element>;

    /// The host element when `element` is a shadow root.
    fn shadow_host(&self, element: Self::Element) -> Option<Self::Element>;

    /// The host's own offset parent, if any (`offsetParent` in a browser).
    fn native_offset_parent(&self, element: Self::Element) -> Option<Self::Element>;

    /// Border box relative to the viewport (`getBoundingClientRect`).
    fn client_rect(&self, element: Self::Element) -> Rect;

    /// Computed style.
    fn style(&self, element: Self::Element) -> ComputedStyle;

    /// Current scroll offset (`scrollLeft`, `scrollTop`).
    fn scroll_offset(&self, element: Self::Element) -> Vec2;

    /// Padding box size without scrollbars (`clientWidth`, `clientHeight`).
    fn client_size(&self, element: Self::Element) -> Size;

    /// Border box size (`offsetWidth`, `offsetHeight`).
    fn offset_size(&self, element: Self::Element) -> Size;

    /// Scrollable content size (`scrollWidth`, `scrollHeight`).
    fn scroll_size(&self, element: Self::Element) -> Size;

    /// Size of the layout viewport (`innerWidth`, `innerHeight`).
    fn viewport_size(&self) -> Size;

    /// First element inside `within` (inclusive) carrying the `marker` attribute.
    fn query_marker(&self, within: Self::Element, marker: &str) -> Option<Self::Element>;

    /// Whether `ancestor` is `descendant` or one of its same-tree ancestors.
    fn contains(&self, ancestor: Self::Element, descendant: Self::Element) -> bool {
        let mut current = Some(descendant);
        while let Some(el) = current {
            if el == ancestor {
                return true;
            }
            current = self.parent(el);
        }
        false
    }
}

/// Identifier of an event listener registered with a [`Host`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Identifier of a scheduled callback (frame, microtask, or timer).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CallbackId(pub u64);

/// Events that invalidate a popper's position.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// The window was resized.
    Resize,
    /// A scroll container scrolled.
    Scroll,
}

/// Where a listener is attached.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ListenerTarget<E> {
    /// The window (document scrolling and resizing).
    Window,
    /// A scrolling element.
    Element(E),
}

/// Side effects a hosting environment provides on top of [`Geometry`].
///
/// Listener and callback firings are routed back by the host:
/// [`Popper::handle_event`](crate::Popper::handle_event) for listeners and
/// [`Popper::run_callback`](crate::Popper::run_callback) for scheduled callbacks.
pub trait Host: Geometry {
    /// Merge `styles` into the inline style of `element`.
    fn set_styles(&mut self, element: Self::Element, styles: &Styles);

    /// Remove the named inline style properties from `element`.
    fn clear_styles(&mut self, element: Self::Element, properties: &[&str]);

    /// Set attributes on `element`; `None` values remove the attribute.
    fn set_attributes(&mut self, element: Self::Element, attributes: &Attributes);

    /// Remove `element` from its parent.
    fn detach(&mut self, element: Self::Element);

    /// Start listening for `kind` on `target`.
    fn add_event_listener(
        &mut self,
        target: ListenerTarget<Self::Element>,
        kind: EventKind,
    ) -> ListenerId;

    /// Stop a listener previously returned by [`Host::add_event_listener`].
    fn remove_event_listener(&mut self, listener: ListenerId);

    /// Schedule a callback before the next repaint.
    fn request_animation_frame(&mut self) -> CallbackId;

    /// Schedule a callback at the end of the current task, if the host supports microtasks.
    fn queue_microtask(&mut self) -> Option<CallbackId>;

    /// Schedule a callback after `delay_ms` milliseconds.
    fn set_timeout(&mut self, delay_ms: u32) -> CallbackId;

    /// Cancel a scheduled callback. Unknown or already-run ids are ignored.
    fn cancel_callback(&mut self, callback: CallbackId);
}
