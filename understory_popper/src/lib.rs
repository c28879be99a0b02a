// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_popper --heading-base-level=0

//! Understory Popper: a Kurbo-native positioning engine for floating elements.
//!
//! A *popper* is a floating box (tooltip, menu, popover) kept next to a *reference*
//! box inside a nested, scrollable element tree. This crate computes where the
//! popper goes and keeps that position fresh as things scroll and resize.
//!
//! - Resolves one of twelve [`Placement`]s, or picks the roomiest side for `auto`.
//! - Runs an ordered pipeline of [modifiers](modifiers) over a [`LayoutData`] record:
//!   shift, offset, overflow clamping, keep-together, arrow, flip, hide, and style output.
//! - Coalesces update requests to at most one pass per frame and tracks the resize
//!   and scroll listeners an instance needs.
//!
//! ## Hosts
//!
//! The engine never touches a real rendering tree. It reads geometry through
//! [`Geometry`] and performs side effects (style writes, listeners, scheduled
//! callbacks) through [`Host`]. An instance does not keep the host; each
//! operation borrows it. The host routes firings back with
//! [`Popper::handle_event`] and [`Popper::run_callback`].
//!
//! [`dom::Document`] is a headless host: an element tree with page-space boxes,
//! computed styles, and scroll offsets, recording every side effect. It backs the
//! tests and is handy for experiments.
//!
//! ## Coordinates
//!
//! Rects are [`kurbo::Rect`]s with `x0`/`y0` as left/top and `x1`/`y1` as
//! right/bottom, in CSS pixels. Offsets in [`LayoutData`] are relative to the
//! popper's offset parent.
//!
//! ## API overview
//!
//! - [`Popper`]: an instance; [`Popper::update`], [`Popper::schedule_update`],
//!   [`Popper::enable_event_listeners`], [`Popper::disable_event_listeners`],
//!   [`Popper::destroy`].
//! - [`Options`]: placement, fixed positioning, listeners, modifiers, hooks.
//! - [`Modifiers`], [`Modifier`], [`ModifierKind`]: the pipeline steps and their configuration.
//! - [`measure`]: geometry helpers (offset parents, scroll parents, relative rects).
//!
//! ### Minimal usage
//!
//! ```
//! use kurbo::{Rect, Size};
//! use understory_popper::dom::{Document, LocalElement};
//! use understory_popper::{Options, Placement, Popper};
//!
//! let mut doc = Document::new(Size::new(800.0, 600.0));
//! let body = doc.body();
//! let button = doc.insert(body, LocalElement::new(Rect::new(100.0, 100.0, 200.0, 130.0)));
//! let tip = doc.insert(body, LocalElement::new(Rect::new(0.0, 0.0, 60.0, 20.0)));
//!
//! let popper = Popper::new(&mut doc, button, tip, Options::default().with_placement(Placement::TOP))
//!     .unwrap();
//! let data = popper.data().unwrap();
//! assert_eq!(popper.placement(), Placement::TOP);
//! // Centered above the button.
//! assert_eq!(data.popper(), Rect::new(120.0, 80.0, 180.0, 100.0));
//! assert_eq!(doc.attribute(tip, "x-placement"), Some("top"));
//! ```

extern crate alloc;

pub mod auto_placement;
pub mod boundaries;
pub mod data;
pub mod dom;
mod error;
pub mod geometry;
pub mod measure;
pub mod modifiers;
pub mod offsets;
pub mod pipeline;
mod placement;
mod popper;
pub mod scheduler;

pub use boundaries::BoundariesElement;
pub use data::{ArrowOffset, LayoutData, Offsets, PopperOffsets, PositionMode, StyleValue};
pub use error::{CreateError, ParseOffsetError, ParsePlacementError};
pub use geometry::{ComputedStyle, ElementHandle, Geometry, Host, Overflow, Position};
pub use modifiers::{Modifier, ModifierKind, Modifiers};
pub use placement::{Placement, PlacementRequest, Side, Variation};
pub use popper::{Hook, Options, Popper, State};
