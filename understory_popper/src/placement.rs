// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Placements: the side of the reference a popper sits on, plus an optional variation.
//!
//! A [`Placement`] is always concrete. Requests for automatic placement are
//! expressed with [`PlacementRequest::Auto`] and are resolved to a concrete
//! placement before any modifier runs.

use core::fmt;
use core::str::FromStr;

use crate::error::ParsePlacementError;

/// One of the four sides of the reference.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// Above the reference.
    Top,
    /// Right of the reference.
    Right,
    /// Below the reference.
    Bottom,
    /// Left of the reference.
    Left,
}

impl Side {
    /// All sides in clockwise order, starting at the top.
    pub const ALL: [Self; 4] = [Self::Top, Self::Right, Self::Bottom, Self::Left];

    /// The side across the reference.
    pub const fn opposite(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Right => Self::Left,
            Self::Bottom => Self::Top,
            Self::Left => Self::Right,
        }
    }

    /// The next side going clockwise.
    pub const fn clockwise(self) -> Self {
        match self {
            Self::Top => Self::Right,
            Self::Right => Self::Bottom,
            Self::Bottom => Self::Left,
            Self::Left => Self::Top,
        }
    }

    /// The next side going counterclockwise.
    pub const fn counterclockwise(self) -> Self {
        match self {
            Self::Top => Self::Left,
            Self::Left => Self::Bottom,
            Self::Bottom => Self::Right,
            Self::Right => Self::Top,
        }
    }

    /// Whether the popper is stacked above or below the reference.
    ///
    /// For vertical sides the main axis is `y` and the cross axis is `x`.
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }

    /// Lowercase name, as used in the `x-placement` attribute.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Right => "right",
            Self::Bottom => "bottom",
            Self::Left => "left",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Alignment of the popper along the cross axis.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Variation {
    /// Flush with the reference's left (or top) edge.
    Start,
    /// Flush with the reference's right (or bottom) edge.
    End,
}

impl Variation {
    /// The other variation.
    pub const fn opposite(self) -> Self {
        match self {
            Self::Start => Self::End,
            Self::End => Self::Start,
        }
    }

    /// Lowercase name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::End => "end",
        }
    }
}

/// A concrete placement: a side with an optional variation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Placement {
    /// Side of the reference.
    pub side: Side,
    /// Optional cross-axis alignment; `None` centers the popper.
    pub variation: Option<Variation>,
}

impl Default for Placement {
    fn default() -> Self {
        Self::BOTTOM
    }
}

impl Placement {
    /// `top`
    pub const TOP: Self = Self::new(Side::Top, None);
    /// `right`
    pub const RIGHT: Self = Self::new(Side::Right, None);
    /// `bottom`
    pub const BOTTOM: Self = Self::new(Side::Bottom, None);
    /// `left`
    pub const LEFT: Self = Self::new(Side::Left, None);

    /// All twelve concrete placements, going clockwise around the reference.
    pub const ALL: [Self; 12] = [
        Self::new(Side::Top, Some(Variation::Start)),
        Self::TOP,
        Self::new(Side::Top, Some(Variation::End)),
        Self::new(Side::Right, Some(Variation::Start)),
        Self::RIGHT,
        Self::new(Side::Right, Some(Variation::End)),
        Self::new(Side::Bottom, Some(Variation::End)),
        Self::BOTTOM,
        Self::new(Side::Bottom, Some(Variation::Start)),
        Self::new(Side::Left, Some(Variation::End)),
        Self::LEFT,
        Self::new(Side::Left, Some(Variation::Start)),
    ];

    /// Create a placement.
    pub const fn new(side: Side, variation: Option<Variation>) -> Self {
        Self { side, variation }
    }

    /// Same variation, opposite side.
    pub const fn opposite(self) -> Self {
        Self::new(self.side.opposite(), self.variation)
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.variation {
            Some(v) => write!(f, "{}-{}", self.side, v.as_str()),
            None => f.write_str(self.side.as_str()),
        }
    }
}

fn parse_variation(s: Option<&str>) -> Result<Option<Variation>, ParsePlacementError> {
    match s {
        None => Ok(None),
        Some("start") => Ok(Some(Variation::Start)),
        Some("end") => Ok(Some(Variation::End)),
        Some(other) => Err(ParsePlacementError::UnknownVariation(other.into())),
    }
}

impl FromStr for Placement {
    type Err = ParsePlacementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.trim().splitn(2, '-');
        let side = match parts.next().unwrap_or_default() {
            "top" => Side::Top,
            "right" => Side::Right,
            "bottom" => Side::Bottom,
            "left" => Side::Left,
            other => return Err(ParsePlacementError::UnknownSide(other.into())),
        };
        Ok(Self::new(side, parse_variation(parts.next())?))
    }
}

/// A requested placement, possibly automatic.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PlacementRequest {
    /// Pick the side with the most room, keeping the optional variation.
    Auto(Option<Variation>),
    /// Use this placement as the starting point.
    Fixed(Placement),
}

impl Default for PlacementRequest {
    fn default() -> Self {
        Self::Fixed(Placement::BOTTOM)
    }
}

impl From<Placement> for PlacementRequest {
    fn from(p: Placement) -> Self {
        Self::Fixed(p)
    }
}

impl fmt::Display for PlacementRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto(Some(v)) => write!(f, "auto-{}", v.as_str()),
            Self::Auto(None) => f.write_str("auto"),
            Self::Fixed(p) => p.fmt(f),
        }
    }
}

impl FromStr for PlacementRequest {
    type Err = ParsePlacementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(rest) = s.strip_prefix("auto") {
            let variation = match rest {
                "" => None,
                _ => match rest.strip_prefix('-') {
                    Some(suffix) => parse_variation(Some(suffix))?,
                    None => return Err(ParsePlacementError::UnknownSide(s.into())),
                },
            };
            return Ok(Self::Auto(variation));
        }
        s.parse().map(Self::Fixed)
    }
}
