// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `compute_style`: turns the final offsets into inline styles and attributes.

use alloc::format;
use alloc::string::ToString;

use kurbo::{Point, Rect};

use crate::data::{ArrowOffset, LayoutData, PLACEMENT_ATTRIBUTE, StyleValue, Styles};
use crate::geometry::ElementHandle;
use crate::measure::{bounding_rect, offset_parent};
use crate::pipeline::ModifierContext;

/// Edge the vertical position is measured from.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum VerticalAnchor {
    /// `top`
    #[default]
    Top,
    /// `bottom`
    Bottom,
}

/// Edge the horizontal position is measured from.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum HorizontalAnchor {
    /// `left`
    #[default]
    Left,
    /// `right`
    Right,
}

/// Configuration of the `compute_style` modifier.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ComputeStyleConfig {
    /// Position with `transform: translate3d(..)` instead of the anchor properties.
    pub gpu_acceleration: bool,
    /// Vertical anchor.
    pub vertical: VerticalAnchor,
    /// Horizontal anchor.
    pub horizontal: HorizontalAnchor,
}

impl Default for ComputeStyleConfig {
    fn default() -> Self {
        Self {
            gpu_acceleration: true,
            vertical: VerticalAnchor::Top,
            horizontal: HorizontalAnchor::Left,
        }
    }
}

/// Write popper styles, the placement attribute, and arrow styles into `data`.
///
/// Entries already present in `data` are kept.
pub fn compute_style<E: ElementHandle>(
    data: &mut LayoutData<E>,
    config: &ComputeStyleConfig,
    ctx: &ModifierContext<'_, E>,
) {
    let g = ctx.geometry;
    let parent = offset_parent(g, ctx.popper);
    let parent_size = if parent == g.document_element() {
        g.client_size(parent)
    } else {
        bounding_rect(g, parent).size()
    };
    let rounded = rounded(data.popper());
    let top = match config.vertical {
        VerticalAnchor::Top => rounded.y0,
        VerticalAnchor::Bottom => rounded.y1 - parent_size.height,
    };
    let left = match config.horizontal {
        HorizontalAnchor::Left => rounded.x0,
        HorizontalAnchor::Right => rounded.x1 - parent_size.width,
    };
    let styles = styles(
        config,
        data.offsets.popper.position.as_str(),
        Point::new(left, top),
    );
    for (name, value) in styles {
        data.styles.entry(name).or_insert(value);
    }
    let placement = data.placement.to_string();
    data.attributes
        .entry(PLACEMENT_ATTRIBUTE.into())
        .or_insert(Some(placement));

    if let Some(arrow) = data.offsets.arrow {
        let (set, unset) = match arrow {
            ArrowOffset::Left(_) => ("left", "top"),
            ArrowOffset::Top(_) => ("top", "left"),
        };
        data.arrow_styles
            .entry(set.into())
            .or_insert(StyleValue::Px(arrow.value()));
        data.arrow_styles
            .entry(unset.into())
            .or_insert(StyleValue::Unset);
    }
}

fn rounded(rect: Rect) -> Rect {
    let origin = Point::new(rect.x0.round(), rect.y0.round());
    Rect::new(
        origin.x,
        origin.y,
        origin.x + rect.width().round(),
        origin.y + rect.height().round(),
    )
}

/// Inline styles placing the popper at `at`, measured from the configured anchors.
pub fn styles(config: &ComputeStyleConfig, position: &str, at: Point) -> Styles {
    let side_a = match config.vertical {
        VerticalAnchor::Top => "top",
        VerticalAnchor::Bottom => "bottom",
    };
    let side_b = match config.horizontal {
        HorizontalAnchor::Left => "left",
        HorizontalAnchor::Right => "right",
    };
    let mut styles = Styles::new();
    styles.insert("position".into(), position.into());
    if config.gpu_acceleration {
        styles.insert(
            "transform".into(),
            StyleValue::Keyword(format!("translate3d({}px, {}px, 0)", at.x, at.y)),
        );
        styles.insert(side_a.into(), StyleValue::Number(0.0));
        styles.insert(side_b.into(), StyleValue::Number(0.0));
        styles.insert("will-change".into(), "transform".into());
    } else {
        let invert_top = match config.vertical {
            VerticalAnchor::Top => 1.0,
            VerticalAnchor::Bottom => -1.0,
        };
        let invert_left = match config.horizontal {
            HorizontalAnchor::Left => 1.0,
            HorizontalAnchor::Right => -1.0,
        };
        styles.insert(side_a.into(), StyleValue::Px(at.y * invert_top));
        styles.insert(side_b.into(), StyleValue::Px(at.x * invert_left));
        styles.insert(
            "will-change".into(),
            StyleValue::Keyword(format!("{side_a}, {side_b}")),
        );
    }
    styles
}
