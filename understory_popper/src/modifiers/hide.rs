// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `hide`: flags a reference that left the popper's boundaries.

use alloc::string::String;

use kurbo::Rect;

use crate::data::{LayoutData, OUT_OF_BOUNDARIES_ATTRIBUTE};
use crate::geometry::ElementHandle;
use crate::modifiers::names;
use crate::pipeline::{ModifierContext, is_modifier_required};

/// Set `hide` and the out-of-boundaries attribute from the `prevent_overflow` boundaries.
pub fn hide<E: ElementHandle>(data: &mut LayoutData<E>, ctx: &ModifierContext<'_, E>) {
    if !is_modifier_required(ctx.modifiers, names::HIDE, names::PREVENT_OVERFLOW) {
        return;
    }
    let Some(bounds) = data.boundaries else {
        return;
    };
    let escaped = escaped(data.reference(), bounds);
    if data.hide == Some(escaped) {
        return;
    }
    data.hide = Some(escaped);
    data.attributes.insert(
        OUT_OF_BOUNDARIES_ATTRIBUTE.into(),
        escaped.then(String::new),
    );
}

/// Whether `reference` lies entirely outside `bounds` on at least one side.
pub fn escaped(reference: Rect, bounds: Rect) -> bool {
    reference.y1 < bounds.y0
        || reference.x0 > bounds.x1
        || reference.y0 > bounds.y1
        || reference.x1 < bounds.x0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_requires_a_full_side() {
        let bounds = Rect::new(0.0, 0.0, 800.0, 600.0);
        assert!(escaped(Rect::new(10.0, -50.0, 60.0, -10.0), bounds));
        assert!(escaped(Rect::new(810.0, 10.0, 860.0, 40.0), bounds));
        assert!(escaped(Rect::new(-80.0, 10.0, -20.0, 40.0), bounds));
        assert!(escaped(Rect::new(10.0, 620.0, 60.0, 650.0), bounds));
        // Partially visible.
        assert!(!escaped(Rect::new(10.0, -20.0, 60.0, 10.0), bounds));
        assert!(!escaped(Rect::new(-40.0, 10.0, 5.0, 40.0), bounds));
        assert!(!escaped(Rect::new(10.0, 10.0, 60.0, 40.0), bounds));
    }
}
