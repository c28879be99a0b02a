// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Runs modifiers over a [`LayoutData`] record.

use core::fmt;

use crate::data::LayoutData;
use crate::geometry::{ElementHandle, Geometry};
use crate::modifiers::Modifier;

/// Read-only context handed to every modifier step.
pub struct ModifierContext<'a, E> {
    /// Geometry queries.
    pub geometry: &'a dyn Geometry<Element = E>,
    /// The reference element.
    pub reference: E,
    /// The popper element.
    pub popper: E,
    /// The instance's modifiers, sorted by order.
    pub modifiers: &'a [Modifier<E>],
}

impl<E: fmt::Debug> fmt::Debug for ModifierContext<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModifierContext")
            .field("reference", &self.reference)
            .field("popper", &self.popper)
            .field("modifiers", &self.modifiers.len())
            .finish_non_exhaustive()
    }
}

/// Run enabled modifiers in order.
///
/// With `ends` set, stops before the first modifier with that name; an unknown
/// name runs the whole list.
pub fn run_modifiers<E: ElementHandle>(
    ctx: &ModifierContext<'_, E>,
    data: &mut LayoutData<E>,
    ends: Option<&str>,
) {
    let end = ends
        .and_then(|name| ctx.modifiers.iter().position(|m| m.name() == name))
        .unwrap_or(ctx.modifiers.len());
    for modifier in ctx.modifiers[..end].iter().filter(|m| m.enabled) {
        modifier.apply(data, ctx);
    }
}

/// Whether the named modifier is present and enabled.
pub fn is_modifier_enabled<E>(modifiers: &[Modifier<E>], name: &str) -> bool {
    modifiers.iter().any(|m| m.enabled && m.name() == name)
}

/// Whether `requested` is enabled and ordered before `requesting`.
///
/// Logs a warning when the dependency is not satisfied.
pub fn is_modifier_required<E>(
    modifiers: &[Modifier<E>],
    requesting: &str,
    requested: &str,
) -> bool {
    let requesting_order = modifiers
        .iter()
        .find(|m| m.name() == requesting)
        .map(|m| m.order);
    let satisfied = modifiers.iter().any(|m| {
        m.name() == requested && m.enabled && requesting_order.is_some_and(|order| m.order < order)
    });
    if !satisfied {
        tracing::warn!(
            requesting,
            requested,
            "`{requesting}` modifier requires `{requested}` to be enabled and ordered before it"
        );
    }
    satisfied
}
