// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `offset`: nudges the popper along its main and cross axes.
//!
//! ## Expressions
//!
//! An offset is one or two axis groups. The first group is the main axis: it
//! pushes the popper away from the reference on `bottom` and `right`, and
//! pulls it the other way on `top` and `left`. The second group is the cross
//! axis and is always added.
//!
//! Groups are separated by whitespace (`"10 20%"`) or, to allow sums inside a
//! group, by a comma (`"10 + 5%, -2vw"`). Each term is a number with an
//! optional unit:
//!
//! - `px` or no unit: pixels.
//! - `%` or `%r`: percent of the reference along that axis.
//! - `%p`: percent of the popper along that axis.
//! - `vh`, `vw`: percent of the viewport height or width.

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::str::FromStr;

use kurbo::{Rect, Size, Vec2};

use crate::data::LayoutData;
use crate::error::ParseOffsetError;
use crate::geometry::{ElementHandle, Geometry};
use crate::pipeline::ModifierContext;
use crate::placement::Side;

/// Unit of an offset term.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Unit {
    /// CSS pixels.
    #[default]
    Px,
    /// Percent of the reference.
    ReferencePercent,
    /// Percent of the popper.
    PopperPercent,
    /// Percent of the viewport height.
    ViewportHeight,
    /// Percent of the viewport width.
    ViewportWidth,
}

/// A signed number with a unit.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Term {
    /// Signed value.
    pub value: f64,
    /// Unit.
    pub unit: Unit,
}

/// A sum of terms along one axis.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Length {
    /// Terms, summed.
    pub terms: Vec<Term>,
}

/// Measurements a [`Length`] resolves against.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Basis {
    /// Reference extent along the axis.
    pub reference: f64,
    /// Popper extent along the axis.
    pub popper: f64,
    /// Viewport size.
    pub viewport: Size,
}

impl Length {
    /// A pixel length.
    pub fn px(value: f64) -> Self {
        Self {
            terms: alloc::vec![Term {
                value,
                unit: Unit::Px,
            }],
        }
    }

    /// Resolve to pixels.
    pub fn resolve(&self, basis: Basis) -> f64 {
        self.terms
            .iter()
            .map(|term| match term.unit {
                Unit::Px => term.value,
                Unit::ReferencePercent => term.value / 100.0 * basis.reference,
                Unit::PopperPercent => term.value / 100.0 * basis.popper,
                Unit::ViewportHeight => term.value / 100.0 * basis.viewport.height,
                Unit::ViewportWidth => term.value / 100.0 * basis.viewport.width,
            })
            .sum()
    }
}

/// Main-axis and cross-axis lengths.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Offset {
    /// Along the placement side.
    pub main: Length,
    /// Perpendicular to the placement side.
    pub cross: Length,
}

impl From<f64> for Offset {
    fn from(value: f64) -> Self {
        Self {
            main: Length::px(value),
            cross: Length::default(),
        }
    }
}

impl FromStr for Offset {
    type Err = ParseOffsetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseOffsetError::Empty);
        }
        let groups: Vec<&str> = if s.contains(',') {
            s.split(',').map(str::trim).collect()
        } else {
            s.split_whitespace().collect()
        };
        if groups.len() > 2 {
            return Err(ParseOffsetError::TooManyAxes(groups.len()));
        }
        let mut lengths = groups.into_iter().map(parse_length);
        let main = lengths.next().ok_or(ParseOffsetError::Empty)??;
        let cross = lengths.next().transpose()?.unwrap_or_default();
        Ok(Self { main, cross })
    }
}

/// Split a group into signed terms.
fn parse_length(group: &str) -> Result<Length, ParseOffsetError> {
    let mut terms = Vec::new();
    let mut current = String::new();
    let mut negative = false;
    for c in group.chars() {
        match c {
            '+' | '-' if current.trim().is_empty() => {
                if c == '-' {
                    negative = !negative;
                }
            }
            '+' | '-' if !ends_with_exponent(&current) => {
                terms.push(parse_term(&current, negative)?);
                current.clear();
                negative = c == '-';
            }
            c if c.is_whitespace() => {}
            c => current.push(c),
        }
    }
    if current.is_empty() {
        return Err(if terms.is_empty() {
            ParseOffsetError::Empty
        } else {
            ParseOffsetError::InvalidTerm(group.to_string())
        });
    }
    terms.push(parse_term(&current, negative)?);
    Ok(Length { terms })
}

fn ends_with_exponent(current: &str) -> bool {
    current.ends_with(['e', 'E']) && current[..current.len() - 1].parse::<f64>().is_ok()
}

fn parse_term(term: &str, negative: bool) -> Result<Term, ParseOffsetError> {
    const UNITS: [(&str, Unit); 6] = [
        ("%r", Unit::ReferencePercent),
        ("%p", Unit::PopperPercent),
        ("%", Unit::ReferencePercent),
        ("px", Unit::Px),
        ("vh", Unit::ViewportHeight),
        ("vw", Unit::ViewportWidth),
    ];
    let (number, unit) = UNITS
        .iter()
        .find_map(|(suffix, unit)| term.strip_suffix(suffix).map(|n| (n, *unit)))
        .unwrap_or((term, Unit::Px));
    let value: f64 = match number.parse() {
        Ok(v) => v,
        Err(_) => {
            let split = number
                .find(|c: char| c.is_ascii_alphabetic() || c == '%')
                .filter(|&i| i > 0 && number[..i].parse::<f64>().is_ok());
            return Err(match split {
                Some(i) => ParseOffsetError::UnknownUnit(term[i..].to_string()),
                None => ParseOffsetError::InvalidTerm(term.to_string()),
            });
        }
    };
    Ok(Term {
        value: if negative { -value } else { value },
        unit,
    })
}

/// Configuration of the `offset` modifier.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OffsetConfig {
    /// The offset to apply.
    pub offset: Offset,
}

/// Apply the configured offset to the popper.
pub fn offset<E: ElementHandle>(
    data: &mut LayoutData<E>,
    config: &OffsetConfig,
    ctx: &ModifierContext<'_, E>,
) {
    let viewport = viewport_basis(ctx.geometry);
    let popper = apply(
        &config.offset,
        data.placement.side,
        data.reference(),
        data.popper(),
        viewport,
    );
    data.set_popper(popper);
}

/// `popper` moved by `offset` for a popper on `side` of `reference`.
pub fn apply(offset: &Offset, side: Side, reference: Rect, popper: Rect, viewport: Size) -> Rect {
    let (main_basis, cross_basis) = if side.is_vertical() {
        (
            Basis {
                reference: reference.height(),
                popper: popper.height(),
                viewport,
            },
            Basis {
                reference: reference.width(),
                popper: popper.width(),
                viewport,
            },
        )
    } else {
        (
            Basis {
                reference: reference.width(),
                popper: popper.width(),
                viewport,
            },
            Basis {
                reference: reference.height(),
                popper: popper.height(),
                viewport,
            },
        )
    };
    let main = offset.main.resolve(main_basis);
    let cross = offset.cross.resolve(cross_basis);
    let delta = match side {
        Side::Top => Vec2::new(cross, -main),
        Side::Bottom => Vec2::new(cross, main),
        Side::Left => Vec2::new(-main, cross),
        Side::Right => Vec2::new(main, cross),
    };
    popper + delta
}

fn viewport_basis<E: ElementHandle>(g: &dyn Geometry<Element = E>) -> Size {
    let client = g.client_size(g.document_element());
    let viewport = g.viewport_size();
    Size::new(
        client.width.max(viewport.width),
        client.height.max(viewport.height),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Offset {
        s.parse().unwrap()
    }

    #[test]
    fn parses_axis_groups() {
        let offset = parse("10 20%");
        assert_eq!(offset.main, Length::px(10.0));
        assert_eq!(
            offset.cross.terms,
            [Term {
                value: 20.0,
                unit: Unit::ReferencePercent
            }]
        );

        let offset = parse("10 + 5%p, -2vw");
        assert_eq!(offset.main.terms.len(), 2);
        assert_eq!(offset.main.terms[1].unit, Unit::PopperPercent);
        assert_eq!(
            offset.cross.terms,
            [Term {
                value: -2.0,
                unit: Unit::ViewportWidth
            }]
        );

        let offset = parse("-4px");
        assert_eq!(offset.main, Length::px(-4.0));
        assert!(offset.cross.terms.is_empty());

        let offset = parse("10%-5");
        assert_eq!(offset.main.terms[1], Term {
            value: -5.0,
            unit: Unit::Px
        });
    }

    #[test]
    fn rejects_bad_expressions() {
        assert_eq!("".parse::<Offset>(), Err(ParseOffsetError::Empty));
        assert_eq!(
            "1 2 3".parse::<Offset>(),
            Err(ParseOffsetError::TooManyAxes(3))
        );
        assert_eq!(
            "10em".parse::<Offset>(),
            Err(ParseOffsetError::UnknownUnit("em".into()))
        );
        assert_eq!(
            "abc".parse::<Offset>(),
            Err(ParseOffsetError::InvalidTerm("abc".into()))
        );
        assert!("10 +".parse::<Offset>().is_err());
    }

    #[test]
    fn main_axis_sign_follows_side() {
        let reference = Rect::new(0.0, 0.0, 100.0, 50.0);
        let popper = Rect::new(0.0, 50.0, 40.0, 70.0);
        let viewport = Size::new(800.0, 600.0);
        let offset = parse("10 20%");

        let moved = apply(&offset, Side::Bottom, reference, popper, viewport);
        assert_eq!(moved, popper + Vec2::new(20.0, 10.0));
        let moved = apply(&offset, Side::Top, reference, popper, viewport);
        assert_eq!(moved, popper + Vec2::new(20.0, -10.0));
        // Cross axis of a horizontal placement is the reference height.
        let moved = apply(&offset, Side::Left, reference, popper, viewport);
        assert_eq!(moved, popper + Vec2::new(-10.0, 10.0));
        let moved = apply(&parse("0, 10vh"), Side::Right, reference, popper, viewport);
        assert_eq!(moved, popper + Vec2::new(0.0, 60.0));
    }
}
