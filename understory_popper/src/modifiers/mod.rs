// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Modifiers: the ordered steps of the positioning pipeline.
//!
//! ## Overview
//!
//! Each [`Modifier`] has an `order`, an `enabled` flag, and a [`ModifierKind`].
//! Built-in kinds carry their configuration; [`ModifierKind::Custom`] carries a
//! named step function. The [pipeline](crate::pipeline) runs enabled modifiers in
//! ascending `order`, ties resolved by registration order.
//!
//! ## Built-ins
//!
//! | name | order | enabled | effect |
//! |---|---|---|---|
//! | `shift` | 100 | yes | aligns `-start`/`-end` variations |
//! | `offset` | 200 | yes | nudges along the main and cross axes |
//! | `prevent_overflow` | 300 | yes | clamps the popper into its boundaries |
//! | `keep_together` | 400 | yes | keeps the popper touching the reference |
//! | `arrow` | 500 | yes | positions the arrow element |
//! | `flip` | 600 | yes | moves to another side on overflow |
//! | `inner` | 700 | no | places the popper inside the reference |
//! | `hide` | 800 | yes | flags a reference outside the boundaries |
//! | `compute_style` | 850 | yes | turns offsets into styles and attributes |
//! | `apply_style` | 900 | yes | writes styles to the popper (terminal) |
//!
//! `arrow` depends on `keep_together`; `flip` and `hide` depend on
//! `prevent_overflow`. A dependent whose dependency is disabled or ordered
//! later logs a warning and does nothing for that pass.

pub mod arrow;
pub mod compute_style;
pub mod flip;
pub mod hide;
pub mod inner;
pub mod keep_together;
pub mod offset;
pub mod prevent_overflow;
pub mod shift;

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::data::LayoutData;
use crate::geometry::ElementHandle;
use crate::pipeline::ModifierContext;

pub use arrow::{ArrowConfig, ArrowTarget};
pub use compute_style::{ComputeStyleConfig, HorizontalAnchor, VerticalAnchor};
pub use flip::{FlipBehavior, FlipConfig};
pub use offset::{Length, Offset, OffsetConfig, Term, Unit};
pub use prevent_overflow::PreventOverflowConfig;

/// Names of the built-in modifiers.
pub mod names {
    /// `shift`
    pub const SHIFT: &str = "shift";
    /// `offset`
    pub const OFFSET: &str = "offset";
    /// `prevent_overflow`
    pub const PREVENT_OVERFLOW: &str = "prevent_overflow";
    /// `keep_together`
    pub const KEEP_TOGETHER: &str = "keep_together";
    /// `arrow`
    pub const ARROW: &str = "arrow";
    /// `flip`
    pub const FLIP: &str = "flip";
    /// `inner`
    pub const INNER: &str = "inner";
    /// `hide`
    pub const HIDE: &str = "hide";
    /// `compute_style`
    pub const COMPUTE_STYLE: &str = "compute_style";
    /// `apply_style`
    pub const APPLY_STYLE: &str = "apply_style";
}

/// A custom step function.
pub type Step<E> = Rc<dyn Fn(&mut LayoutData<E>, &ModifierContext<'_, E>)>;

/// What a modifier does, with its configuration.
pub enum ModifierKind<E> {
    /// Align variations flush with the reference.
    Shift,
    /// Nudge the popper.
    Offset(OffsetConfig),
    /// Clamp the popper into its boundaries.
    PreventOverflow(PreventOverflowConfig<E>),
    /// Keep the popper touching the reference.
    KeepTogether,
    /// Position the arrow element.
    Arrow(ArrowConfig<E>),
    /// Move to another placement on overflow.
    Flip(FlipConfig<E>),
    /// Place the popper inside the reference.
    Inner,
    /// Flag a reference that left the boundaries.
    Hide,
    /// Turn offsets into styles and attributes.
    ComputeStyle(ComputeStyleConfig),
    /// Write styles to the popper. Runs after the pipeline, not inside it.
    ApplyStyle,
    /// A caller-supplied step.
    Custom {
        /// Unique name.
        name: String,
        /// Step function.
        step: Step<E>,
    },
}

impl<E: Clone> Clone for ModifierKind<E> {
    fn clone(&self) -> Self {
        match self {
            Self::Shift => Self::Shift,
            Self::Offset(c) => Self::Offset(c.clone()),
            Self::PreventOverflow(c) => Self::PreventOverflow(c.clone()),
            Self::KeepTogether => Self::KeepTogether,
            Self::Arrow(c) => Self::Arrow(c.clone()),
            Self::Flip(c) => Self::Flip(c.clone()),
            Self::Inner => Self::Inner,
            Self::Hide => Self::Hide,
            Self::ComputeStyle(c) => Self::ComputeStyle(*c),
            Self::ApplyStyle => Self::ApplyStyle,
            Self::Custom { name, step } => Self::Custom {
                name: name.clone(),
                step: Rc::clone(step),
            },
        }
    }
}

impl<E: fmt::Debug> fmt::Debug for ModifierKind<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shift => f.write_str("Shift"),
            Self::Offset(c) => f.debug_tuple("Offset").field(c).finish(),
            Self::PreventOverflow(c) => f.debug_tuple("PreventOverflow").field(c).finish(),
            Self::KeepTogether => f.write_str("KeepTogether"),
            Self::Arrow(c) => f.debug_tuple("Arrow").field(c).finish(),
            Self::Flip(c) => f.debug_tuple("Flip").field(c).finish(),
            Self::Inner => f.write_str("Inner"),
            Self::Hide => f.write_str("Hide"),
            Self::ComputeStyle(c) => f.debug_tuple("ComputeStyle").field(c).finish(),
            Self::ApplyStyle => f.write_str("ApplyStyle"),
            Self::Custom { name, .. } => f
                .debug_struct("Custom")
                .field("name", name)
                .finish_non_exhaustive(),
        }
    }
}

/// One step of the pipeline.
#[derive(Clone, Debug)]
pub struct Modifier<E> {
    /// Execution order; lower runs first.
    pub order: i32,
    /// Disabled modifiers are skipped.
    pub enabled: bool,
    /// Behavior and configuration.
    pub kind: ModifierKind<E>,
}

impl<E> Modifier<E> {
    /// An enabled modifier.
    pub fn new(order: i32, kind: ModifierKind<E>) -> Self {
        Self {
            order,
            enabled: true,
            kind,
        }
    }

    /// An enabled custom modifier.
    pub fn custom(
        name: impl Into<String>,
        order: i32,
        step: impl Fn(&mut LayoutData<E>, &ModifierContext<'_, E>) + 'static,
    ) -> Self {
        Self::new(
            order,
            ModifierKind::Custom {
                name: name.into(),
                step: Rc::new(step),
            },
        )
    }

    /// The modifier's name.
    pub fn name(&self) -> &str {
        match &self.kind {
            ModifierKind::Shift => names::SHIFT,
            ModifierKind::Offset(_) => names::OFFSET,
            ModifierKind::PreventOverflow(_) => names::PREVENT_OVERFLOW,
            ModifierKind::KeepTogether => names::KEEP_TOGETHER,
            ModifierKind::Arrow(_) => names::ARROW,
            ModifierKind::Flip(_) => names::FLIP,
            ModifierKind::Inner => names::INNER,
            ModifierKind::Hide => names::HIDE,
            ModifierKind::ComputeStyle(_) => names::COMPUTE_STYLE,
            ModifierKind::ApplyStyle => names::APPLY_STYLE,
            ModifierKind::Custom { name, .. } => name,
        }
    }
}

impl<E: ElementHandle> Modifier<E> {
    /// Run this modifier's step on `data`.
    ///
    /// `apply_style` is a no-op here; its writes happen once the whole pipeline finished.
    pub fn apply(&self, data: &mut LayoutData<E>, ctx: &ModifierContext<'_, E>) {
        match &self.kind {
            ModifierKind::Shift => shift::shift(data),
            ModifierKind::Offset(config) => offset::offset(data, config, ctx),
            ModifierKind::PreventOverflow(config) => {
                prevent_overflow::prevent_overflow(data, config, ctx);
            }
            ModifierKind::KeepTogether => keep_together::keep_together(data),
            ModifierKind::Arrow(config) => arrow::arrow(data, config, ctx),
            ModifierKind::Flip(config) => flip::flip(data, config, ctx),
            ModifierKind::Inner => inner::inner(data),
            ModifierKind::Hide => hide::hide(data, ctx),
            ModifierKind::ComputeStyle(config) => compute_style::compute_style(data, config, ctx),
            ModifierKind::ApplyStyle => {}
            ModifierKind::Custom { step, .. } => step(data, ctx),
        }
    }
}

/// The modifier list of an instance.
#[derive(Clone, Debug)]
pub struct Modifiers<E> {
    list: Vec<Modifier<E>>,
}

impl<E> Default for Modifiers<E> {
    fn default() -> Self {
        let mut inner = Modifier::new(700, ModifierKind::Inner);
        inner.enabled = false;
        Self {
            list: alloc::vec![
                Modifier::new(100, ModifierKind::Shift),
                Modifier::new(200, ModifierKind::Offset(OffsetConfig::default())),
                Modifier::new(
                    300,
                    ModifierKind::PreventOverflow(PreventOverflowConfig::default())
                ),
                Modifier::new(400, ModifierKind::KeepTogether),
                Modifier::new(500, ModifierKind::Arrow(ArrowConfig::default())),
                Modifier::new(600, ModifierKind::Flip(FlipConfig::default())),
                inner,
                Modifier::new(800, ModifierKind::Hide),
                Modifier::new(
                    850,
                    ModifierKind::ComputeStyle(ComputeStyleConfig::default())
                ),
                Modifier::new(900, ModifierKind::ApplyStyle),
            ],
        }
    }
}

impl<E> Modifiers<E> {
    /// An empty list.
    pub fn empty() -> Self {
        Self { list: Vec::new() }
    }

    /// Number of modifiers.
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Modifiers in their current order.
    pub fn as_slice(&self) -> &[Modifier<E>] {
        &self.list
    }

    /// Iterate modifiers in their current order.
    pub fn iter(&self) -> impl Iterator<Item = &Modifier<E>> {
        self.list.iter()
    }

    /// Look up a modifier by name.
    pub fn get(&self, name: &str) -> Option<&Modifier<E>> {
        self.list.iter().find(|m| m.name() == name)
    }

    /// Look up a modifier by name, mutably.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Modifier<E>> {
        self.list.iter_mut().find(|m| m.name() == name)
    }

    /// Whether the named modifier exists and is enabled.
    pub fn is_enabled(&self, name: &str) -> bool {
        self.get(name).is_some_and(|m| m.enabled)
    }

    /// Enable or disable the named modifier. Returns `false` if there is none.
    pub fn set_enabled(&mut self, name: &str, enabled: bool) -> bool {
        match self.get_mut(name) {
            Some(m) => {
                m.enabled = enabled;
                true
            }
            None => false,
        }
    }

    /// Add a modifier, replacing any existing modifier with the same name in place.
    pub fn insert(&mut self, modifier: Modifier<E>) {
        match self.list.iter().position(|m| m.name() == modifier.name()) {
            Some(index) => self.list[index] = modifier,
            None => self.list.push(modifier),
        }
    }

    /// Sort by `order`, keeping registration order for ties.
    pub fn sort(&mut self) {
        self.list.sort_by_key(|m| m.order);
    }

    /// `offset` configuration.
    pub fn offset_mut(&mut self) -> Option<&mut OffsetConfig> {
        self.list.iter_mut().find_map(|m| match &mut m.kind {
            ModifierKind::Offset(c) => Some(c),
            _ => None,
        })
    }

    /// `prevent_overflow` configuration.
    pub fn prevent_overflow_mut(&mut self) -> Option<&mut PreventOverflowConfig<E>> {
        self.list.iter_mut().find_map(|m| match &mut m.kind {
            ModifierKind::PreventOverflow(c) => Some(c),
            _ => None,
        })
    }

    /// `arrow` configuration.
    pub fn arrow_mut(&mut self) -> Option<&mut ArrowConfig<E>> {
        self.list.iter_mut().find_map(|m| match &mut m.kind {
            ModifierKind::Arrow(c) => Some(c),
            _ => None,
        })
    }

    /// `flip` configuration.
    pub fn flip_mut(&mut self) -> Option<&mut FlipConfig<E>> {
        self.list.iter_mut().find_map(|m| match &mut m.kind {
            ModifierKind::Flip(c) => Some(c),
            _ => None,
        })
    }

    /// `compute_style` configuration.
    pub fn compute_style_mut(&mut self) -> Option<&mut ComputeStyleConfig> {
        self.list.iter_mut().find_map(|m| match &mut m.kind {
            ModifierKind::ComputeStyle(c) => Some(c),
            _ => None,
        })
    }
}
