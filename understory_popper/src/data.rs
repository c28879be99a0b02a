// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The layout record threaded through the modifier pipeline.

use alloc::collections::BTreeMap;
use alloc::string::String;
use core::fmt;

use kurbo::Rect;

use crate::placement::Placement;

/// Inline style value produced by the engine.
#[derive(Clone, Debug, PartialEq)]
pub enum StyleValue {
    /// A length in CSS pixels.
    Px(f64),
    /// A unitless number.
    Number(f64),
    /// A keyword or preformatted value.
    Keyword(String),
    /// Removes the property.
    Unset,
}

impl fmt::Display for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Px(v) => write!(f, "{v}px"),
            Self::Number(v) => write!(f, "{v}"),
            Self::Keyword(k) => f.write_str(k),
            Self::Unset => Ok(()),
        }
    }
}

impl From<&str> for StyleValue {
    fn from(s: &str) -> Self {
        Self::Keyword(s.into())
    }
}

/// Inline style properties by name.
pub type Styles = BTreeMap<String, StyleValue>;

/// Attributes by name. `None` requests removal.
pub type Attributes = BTreeMap<String, Option<String>>;

/// Attribute carrying the resolved placement.
pub const PLACEMENT_ATTRIBUTE: &str = "x-placement";

/// Attribute present while the reference is outside the popper's boundaries.
pub const OUT_OF_BOUNDARIES_ATTRIBUTE: &str = "x-out-of-boundaries";

/// CSS `position` used for the popper.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum PositionMode {
    /// Positioned against its offset parent.
    #[default]
    Absolute,
    /// Positioned against the viewport (or the nearest transformed ancestor).
    Fixed,
}

impl PositionMode {
    /// CSS keyword.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Absolute => "absolute",
            Self::Fixed => "fixed",
        }
    }
}

/// Popper rect together with the positioning scheme it is expressed in.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PopperOffsets {
    /// Border box plus margins, relative to the popper's offset parent.
    pub rect: Rect,
    /// Positioning scheme.
    pub position: PositionMode,
}

/// Arrow position inside the popper, measured from one of its edges.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ArrowOffset {
    /// Distance from the popper's left edge (vertical placements).
    Left(f64),
    /// Distance from the popper's top edge (horizontal placements).
    Top(f64),
}

impl ArrowOffset {
    /// The offset value regardless of edge.
    pub const fn value(self) -> f64 {
        match self {
            Self::Left(v) | Self::Top(v) => v,
        }
    }
}

/// Offsets computed during a pass.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Offsets {
    /// Reference rect relative to the common offset parent. Set once per pass.
    pub reference: Rect,
    /// Popper rect; every position-affecting modifier rewrites this.
    pub popper: PopperOffsets,
    /// Arrow position, when an arrow was resolved.
    pub arrow: Option<ArrowOffset>,
}

/// Mutable state of one update pass.
#[derive(Clone, Debug)]
pub struct LayoutData<E> {
    /// Working placement.
    pub placement: Placement,
    /// Placement after auto resolution, before any flip. Never changes during a pass.
    pub original_placement: Placement,
    /// Whether `flip` reassigned the placement in this pass.
    pub flipped: bool,
    /// Whether the reference escaped the boundaries; `None` until `hide` first runs.
    ///
    /// Carried over from the previous pass so `hide` only writes on change.
    pub hide: Option<bool>,
    /// Reference, popper, and arrow offsets.
    pub offsets: Offsets,
    /// Boundaries computed by `prevent_overflow`, consumed by `hide`.
    pub boundaries: Option<Rect>,
    /// Whether the popper uses fixed positioning.
    pub position_fixed: bool,
    /// Attributes for the popper element.
    pub attributes: Attributes,
    /// Inline styles for the popper element.
    pub styles: Styles,
    /// Inline styles for the arrow element.
    pub arrow_styles: Styles,
    /// The arrow element resolved by the `arrow` modifier.
    pub arrow_element: Option<E>,
}

impl<E> LayoutData<E> {
    /// Start a pass at `placement` with the given initial offsets.
    pub fn new(placement: Placement, offsets: Offsets, position_fixed: bool) -> Self {
        Self {
            placement,
            original_placement: placement,
            flipped: false,
            hide: None,
            offsets,
            boundaries: None,
            position_fixed,
            attributes: Attributes::new(),
            styles: Styles::new(),
            arrow_styles: Styles::new(),
            arrow_element: None,
        }
    }

    /// Popper rect shorthand.
    pub fn popper(&self) -> Rect {
        self.offsets.popper.rect
    }

    /// Reference rect shorthand.
    pub fn reference(&self) -> Rect {
        self.offsets.reference
    }

    pub(crate) fn set_popper(&mut self, rect: Rect) {
        self.offsets.popper.rect = rect;
    }
}
