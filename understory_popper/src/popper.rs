// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The positioning instance.

use alloc::rc::Rc;
use alloc::string::ToString;
use core::fmt;

use crate::auto_placement::compute_auto_placement;
use crate::data::{
    Attributes, LayoutData, OUT_OF_BOUNDARIES_ATTRIBUTE, Offsets, PLACEMENT_ATTRIBUTE,
    PopperOffsets, PositionMode, Styles,
};
use crate::error::CreateError;
use crate::geometry::{CallbackId, ElementHandle, Host, ListenerId};
use crate::modifiers::{Modifier, Modifiers, names};
use crate::offsets::{popper_offsets, reference_offsets};
use crate::pipeline::{ModifierContext, run_modifiers};
use crate::placement::{Placement, PlacementRequest};
use crate::scheduler::{EventListeners, Fired, Scheduler};

/// Callback invoked with the layout data of a finished pass.
pub type Hook<E> = Rc<dyn Fn(&LayoutData<E>)>;

/// Style properties written by `apply_style` and cleared on destroy.
const POSITION_STYLES: [&str; 7] = [
    "position",
    "top",
    "left",
    "right",
    "bottom",
    "transform",
    "will-change",
];

/// Construction options.
pub struct Options<E> {
    /// Requested placement.
    pub placement: PlacementRequest,
    /// Position the popper with `position: fixed`.
    pub position_fixed: bool,
    /// Attach resize and scroll listeners on creation.
    pub events_enabled: bool,
    /// Detach the popper element from the tree on destroy.
    pub remove_on_destroy: bool,
    /// Modifier list.
    pub modifiers: Modifiers<E>,
    /// Called after the first pass.
    pub on_create: Option<Hook<E>>,
    /// Called after every later pass.
    pub on_update: Option<Hook<E>>,
}

impl<E> Default for Options<E> {
    fn default() -> Self {
        Self {
            placement: PlacementRequest::default(),
            position_fixed: false,
            events_enabled: true,
            remove_on_destroy: false,
            modifiers: Modifiers::default(),
            on_create: None,
            on_update: None,
        }
    }
}

impl<E: fmt::Debug> fmt::Debug for Options<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("placement", &self.placement)
            .field("position_fixed", &self.position_fixed)
            .field("events_enabled", &self.events_enabled)
            .field("remove_on_destroy", &self.remove_on_destroy)
            .field("modifiers", &self.modifiers)
            .field("on_create", &self.on_create.is_some())
            .field("on_update", &self.on_update.is_some())
            .finish()
    }
}

impl<E> Options<E> {
    /// Set the requested placement.
    pub fn with_placement(mut self, placement: impl Into<PlacementRequest>) -> Self {
        self.placement = placement.into();
        self
    }

    /// Use fixed positioning.
    pub fn with_position_fixed(mut self, fixed: bool) -> Self {
        self.position_fixed = fixed;
        self
    }

    /// Attach listeners on creation, or not.
    pub fn with_events_enabled(mut self, enabled: bool) -> Self {
        self.events_enabled = enabled;
        self
    }

    /// Detach the popper on destroy.
    pub fn with_remove_on_destroy(mut self, remove: bool) -> Self {
        self.remove_on_destroy = remove;
        self
    }

    /// Add or replace a modifier.
    pub fn with_modifier(mut self, modifier: Modifier<E>) -> Self {
        self.modifiers.insert(modifier);
        self
    }

    /// Edit the modifier list in place.
    pub fn with_modifiers(mut self, edit: impl FnOnce(&mut Modifiers<E>)) -> Self {
        edit(&mut self.modifiers);
        self
    }

    /// Set the creation hook.
    pub fn on_create(mut self, hook: impl Fn(&LayoutData<E>) + 'static) -> Self {
        self.on_create = Some(Rc::new(hook));
        self
    }

    /// Set the update hook.
    pub fn on_update(mut self, hook: impl Fn(&LayoutData<E>) + 'static) -> Self {
        self.on_update = Some(Rc::new(hook));
        self
    }
}

/// Lifecycle flags of an instance.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct State {
    /// A pass has completed.
    pub is_created: bool,
    /// Listeners are attached.
    pub events_enabled: bool,
    /// The instance was destroyed. Terminal.
    pub is_destroyed: bool,
}

/// Keeps one popper element positioned next to one reference element.
///
/// The instance does not hold on to the host. Every operation that reads
/// geometry or writes side effects takes it as an argument, and the host routes
/// listener and callback firings back through [`Popper::handle_event`] and
/// [`Popper::run_callback`].
pub struct Popper<E> {
    reference: E,
    popper: E,
    options: Options<E>,
    placement: Placement,
    data: Option<LayoutData<E>>,
    state: State,
    scheduler: Scheduler,
    listeners: EventListeners<E>,
}

impl<E: fmt::Debug> fmt::Debug for Popper<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Popper")
            .field("reference", &self.reference)
            .field("popper", &self.popper)
            .field("placement", &self.placement)
            .field("state", &self.state)
            .field("scheduler", &self.scheduler)
            .field("listeners", &self.listeners)
            .finish_non_exhaustive()
    }
}

impl<E: ElementHandle> Popper<E> {
    /// Create an instance, run the first pass, and attach listeners if enabled.
    pub fn new<H: Host<Element = E>>(
        host: &mut H,
        reference: E,
        popper: E,
        mut options: Options<E>,
    ) -> Result<Self, CreateError> {
        if !host.is_valid(reference) {
            return Err(CreateError::InvalidReference);
        }
        if !host.is_valid(popper) {
            return Err(CreateError::InvalidPopper);
        }
        if reference == popper {
            return Err(CreateError::SameElement);
        }
        options.modifiers.sort();
        let events_enabled = options.events_enabled;
        let mut this = Self {
            reference,
            popper,
            placement: match options.placement {
                PlacementRequest::Fixed(placement) => placement,
                PlacementRequest::Auto(_) => Placement::default(),
            },
            options,
            data: None,
            state: State::default(),
            scheduler: Scheduler::new(),
            listeners: EventListeners::new(),
        };
        if this.options.modifiers.is_enabled(names::APPLY_STYLE) {
            this.apply_style_on_load(host);
        }
        this.update(host);
        if events_enabled {
            this.enable_event_listeners(host);
        }
        tracing::debug!(placement = %this.placement, "popper created");
        Ok(this)
    }

    /// The reference element.
    pub fn reference(&self) -> E {
        self.reference
    }

    /// The popper element.
    pub fn popper(&self) -> E {
        self.popper
    }

    /// Placement resolved by the last pass.
    pub fn placement(&self) -> Placement {
        self.placement
    }

    /// Lifecycle flags.
    pub fn state(&self) -> State {
        self.state
    }

    /// Layout data of the last pass.
    pub fn data(&self) -> Option<&LayoutData<E>> {
        self.data.as_ref()
    }

    /// The modifier list.
    pub fn modifiers(&self) -> &Modifiers<E> {
        &self.options.modifiers
    }

    /// The modifier list, mutably. Changes apply from the next pass.
    pub fn modifiers_mut(&mut self) -> &mut Modifiers<E> {
        &mut self.options.modifiers
    }

    /// Scroll targets currently listened to.
    pub fn listeners(&self) -> &EventListeners<E> {
        &self.listeners
    }

    /// Recompute the position synchronously. No-op once destroyed.
    pub fn update<H: Host<Element = E>>(&mut self, host: &mut H) {
        if self.state.is_destroyed {
            tracing::debug!("update skipped: popper destroyed");
            return;
        }
        self.options.modifiers.sort();
        let fixed = self.options.position_fixed;
        let data = {
            let g = &*host;
            let reference_rect = reference_offsets(g, self.popper, self.reference, fixed);
            let placement = compute_auto_placement(
                g,
                self.options.placement,
                reference_rect,
                self.popper,
                self.reference,
                fixed,
            );
            let offsets = Offsets {
                reference: reference_rect,
                popper: PopperOffsets {
                    rect: popper_offsets(g, self.popper, reference_rect, placement),
                    position: if fixed {
                        PositionMode::Fixed
                    } else {
                        PositionMode::Absolute
                    },
                },
                arrow: None,
            };
            let mut data = LayoutData::new(placement, offsets, fixed);
            data.hide = self.data.as_ref().and_then(|previous| previous.hide);
            let ctx = ModifierContext {
                geometry: g,
                reference: self.reference,
                popper: self.popper,
                modifiers: self.options.modifiers.as_slice(),
            };
            run_modifiers(&ctx, &mut data, None);
            data
        };

        if self.options.modifiers.is_enabled(names::APPLY_STYLE) {
            apply_style(host, self.popper, &data);
        }
        self.placement = data.placement;
        tracing::trace!(
            placement = %data.placement,
            flipped = data.flipped,
            x = data.popper().x0,
            y = data.popper().y0,
            "popper updated"
        );

        let hook = if self.state.is_created {
            self.options.on_update.clone()
        } else {
            self.state.is_created = true;
            self.options.on_create.clone()
        };
        if let Some(hook) = hook {
            hook(&data);
        }
        self.data = Some(data);
    }

    /// Request an update on the next frame. Requests are coalesced until it runs.
    pub fn schedule_update<H: Host<Element = E>>(&mut self, host: &mut H) {
        if self.state.is_destroyed {
            return;
        }
        self.scheduler.request(host);
    }

    /// Route a fired callback. Returns `false` if it does not belong to this instance.
    pub fn run_callback<H: Host<Element = E>>(
        &mut self,
        host: &mut H,
        id: CallbackId,
    ) -> bool {
        if self.state.is_destroyed {
            return false;
        }
        match self.scheduler.fire(host, id) {
            Fired::Frame => true,
            Fired::Update => {
                self.update(host);
                true
            }
            Fired::Unknown => false,
        }
    }

    /// Route a listener firing. Returns `false` if it does not belong to this instance.
    pub fn handle_event<H: Host<Element = E>>(
        &mut self,
        host: &mut H,
        id: ListenerId,
    ) -> bool {
        if self.state.is_destroyed || !self.listeners.contains(id) {
            return false;
        }
        self.schedule_update(host);
        true
    }

    /// Attach the resize listener and every scroll listener of the reference's scroll chain.
    pub fn enable_event_listeners<H: Host<Element = E>>(&mut self, host: &mut H) {
        if self.state.is_destroyed || self.state.events_enabled {
            return;
        }
        self.listeners.attach(host, self.reference);
        self.state.events_enabled = true;
    }

    /// Cancel any pending update and detach every listener.
    pub fn disable_event_listeners<H: Host<Element = E>>(&mut self, host: &mut H) {
        self.scheduler.cancel(host);
        if self.state.events_enabled {
            self.listeners.detach(host);
            self.state.events_enabled = false;
        }
    }

    /// Tear the instance down. Later updates and callbacks are ignored.
    pub fn destroy<H: Host<Element = E>>(&mut self, host: &mut H) {
        if self.state.is_destroyed {
            return;
        }
        self.state.is_destroyed = true;
        if self.options.modifiers.is_enabled(names::APPLY_STYLE) {
            host.clear_styles(self.popper, &POSITION_STYLES);
            let mut attributes = Attributes::new();
            attributes.insert(PLACEMENT_ATTRIBUTE.into(), None);
            attributes.insert(OUT_OF_BOUNDARIES_ATTRIBUTE.into(), None);
            host.set_attributes(self.popper, &attributes);
        }
        self.disable_event_listeners(host);
        if self.options.remove_on_destroy {
            host.detach(self.popper);
        }
        tracing::debug!("popper destroyed");
    }

    /// Set the positioning scheme before the first measurement.
    fn apply_style_on_load<H: Host<Element = E>>(&self, host: &mut H) {
        let fixed = self.options.position_fixed;
        let placement = {
            let g = &*host;
            let reference_rect = reference_offsets(g, self.popper, self.reference, fixed);
            compute_auto_placement(
                g,
                self.options.placement,
                reference_rect,
                self.popper,
                self.reference,
                fixed,
            )
        };
        let mut attributes = Attributes::new();
        attributes.insert(PLACEMENT_ATTRIBUTE.into(), Some(placement.to_string()));
        host.set_attributes(self.popper, &attributes);
        let position = if fixed {
            PositionMode::Fixed
        } else {
            PositionMode::Absolute
        };
        let mut styles = Styles::new();
        styles.insert("position".into(), position.as_str().into());
        host.set_styles(self.popper, &styles);
    }
}

/// Write the styles and attributes of a finished pass.
fn apply_style<H: Host + ?Sized>(host: &mut H, popper: H::Element, data: &LayoutData<H::Element>) {
    host.set_styles(popper, &data.styles);
    host.set_attributes(popper, &data.attributes);
    if let Some(arrow) = data.arrow_element
        && !data.arrow_styles.is_empty()
    {
        host.set_styles(arrow, &data.arrow_styles);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{ArrowOffset, StyleValue};
    use crate::dom::{CallbackKind, Document, ElementId, LocalElement};
    use crate::geometry::{ComputedStyle, Geometry, Overflow, Position};
    use crate::modifiers::FlipBehavior;
    use crate::placement::{Side, Variation};
    use core::cell::Cell;
    use kurbo::{Rect, Size, Vec2};

    fn setup(viewport: Size, reference: Rect, popper: Size) -> (Document, ElementId, ElementId) {
        let mut doc = Document::new(viewport);
        let body = doc.body();
        let reference = doc.insert(body, LocalElement::new(reference));
        let popper = doc.insert(
            body,
            LocalElement::new(Rect::from_origin_size((0.0, 0.0), popper)),
        );
        (doc, reference, popper)
    }

    fn quiet<E>() -> Options<E> {
        Options::default().with_events_enabled(false)
    }

    #[test]
    fn every_placement_is_flush_and_aligned() {
        let reference_rect = Rect::new(400.0, 400.0, 500.0, 440.0);
        for placement in Placement::ALL {
            let (mut doc, reference, tip) =
                setup(Size::new(1000.0, 1000.0), reference_rect, Size::new(60.0, 20.0));
            let popper =
                Popper::new(&mut doc, reference, tip, quiet().with_placement(placement)).unwrap();
            assert_eq!(popper.placement(), placement);
            let rect = popper.data().unwrap().popper();

            let main_flush = match placement.side {
                Side::Top => rect.y1 == reference_rect.y0,
                Side::Bottom => rect.y0 == reference_rect.y1,
                Side::Left => rect.x1 == reference_rect.x0,
                Side::Right => rect.x0 == reference_rect.x1,
            };
            assert!(main_flush, "{placement}: {rect:?}");

            let (start, end, r_start, r_end) = if placement.side.is_vertical() {
                (rect.x0, rect.x1, reference_rect.x0, reference_rect.x1)
            } else {
                (rect.y0, rect.y1, reference_rect.y0, reference_rect.y1)
            };
            match placement.variation {
                None => {
                    let center = (start + end) / 2.0;
                    let r_center = (r_start + r_end) / 2.0;
                    assert!((center - r_center).abs() <= 1.0, "{placement}: {rect:?}");
                }
                Some(Variation::Start) => assert_eq!(start, r_start, "{placement}"),
                Some(Variation::End) => assert_eq!(end, r_end, "{placement}"),
            }
        }
    }

    #[test]
    fn overflowing_bottom_flips_to_top() {
        let (mut doc, reference, tip) = setup(
            Size::new(800.0, 600.0),
            Rect::new(100.0, 560.0, 200.0, 590.0),
            Size::new(60.0, 40.0),
        );
        let popper = Popper::new(&mut doc, reference, tip, quiet()).unwrap();
        let data = popper.data().unwrap();
        assert_eq!(popper.placement(), Placement::TOP);
        assert!(data.flipped);
        assert_eq!(data.original_placement, Placement::BOTTOM);
        assert_eq!(data.popper(), Rect::new(120.0, 520.0, 180.0, 560.0));
        assert_eq!(doc.attribute(tip, "x-placement"), Some("top"));
    }

    #[test]
    fn flip_stays_within_its_candidates() {
        // No room above or below: flip may only try the opposite side.
        let (mut doc, reference, tip) = setup(
            Size::new(800.0, 600.0),
            Rect::new(300.0, 10.0, 400.0, 590.0),
            Size::new(60.0, 40.0),
        );
        let popper = Popper::new(&mut doc, reference, tip, quiet()).unwrap();
        assert!(matches!(popper.placement().side, Side::Top | Side::Bottom));

        let options = quiet().with_modifiers(|m| {
            if let Some(flip) = m.flip_mut() {
                flip.behavior = FlipBehavior::Clockwise;
            }
        });
        let popper = Popper::new(&mut doc, reference, tip, options).unwrap();
        // Clockwise from bottom, left is next and has room.
        assert_eq!(popper.placement(), Placement::LEFT);
    }

    #[test]
    fn offset_expression_moves_both_axes() {
        let (mut doc, reference, tip) = setup(
            Size::new(800.0, 600.0),
            Rect::new(100.0, 100.0, 200.0, 140.0),
            Size::new(60.0, 20.0),
        );
        let options = quiet().with_modifiers(|m| {
            if let Some(offset) = m.offset_mut() {
                offset.offset = "10 20%".parse().unwrap();
            }
        });
        let popper = Popper::new(&mut doc, reference, tip, options).unwrap();
        let rect = popper.data().unwrap().popper();
        assert_eq!(rect, Rect::new(140.0, 150.0, 200.0, 170.0));
    }

    #[test]
    fn viewport_units_resolve_against_the_viewport() {
        let (mut doc, reference, tip) = setup(
            Size::new(800.0, 600.0),
            Rect::new(100.0, 100.0, 200.0, 140.0),
            Size::new(60.0, 20.0),
        );
        let options = quiet().with_modifiers(|m| {
            if let Some(offset) = m.offset_mut() {
                offset.offset = "2vh, 5vw".parse().unwrap();
            }
        });
        let popper = Popper::new(&mut doc, reference, tip, options).unwrap();
        // 2% of 600 down, 5% of 800 across.
        let rect = popper.data().unwrap().popper();
        assert_eq!(rect, Rect::new(160.0, 152.0, 220.0, 172.0));
    }

    #[test]
    fn auto_picks_the_roomy_side() {
        let (mut doc, reference, tip) = setup(
            Size::new(1000.0, 520.0),
            Rect::new(10.0, 500.0, 60.0, 520.0),
            Size::new(40.0, 20.0),
        );
        let options = quiet().with_placement(PlacementRequest::Auto(None));
        let popper = Popper::new(&mut doc, reference, tip, options).unwrap();
        assert_eq!(popper.placement(), Placement::TOP);
        assert!(!popper.data().unwrap().flipped);
    }

    #[test]
    fn repeated_updates_are_identical() {
        let (mut doc, reference, tip) = setup(
            Size::new(800.0, 600.0),
            Rect::new(700.0, 560.0, 790.0, 590.0),
            Size::new(120.0, 50.0),
        );
        let mut popper = Popper::new(&mut doc, reference, tip, quiet()).unwrap();
        let first = popper.data().unwrap().offsets;
        popper.update(&mut doc);
        assert_eq!(popper.data().unwrap().offsets, first);
    }

    #[test]
    fn arrow_is_placed_and_styled() {
        let (mut doc, reference, tip) = setup(
            Size::new(800.0, 600.0),
            Rect::new(100.0, 100.0, 200.0, 140.0),
            Size::new(60.0, 20.0),
        );
        let arrow = doc.insert(
            tip,
            LocalElement::new(Rect::new(0.0, 0.0, 10.0, 5.0)).with_marker("x-arrow"),
        );
        let popper = Popper::new(&mut doc, reference, tip, quiet()).unwrap();
        let data = popper.data().unwrap();
        assert_eq!(data.arrow_element, Some(arrow));
        assert_eq!(data.offsets.arrow, Some(ArrowOffset::Left(25.0)));
        let styles = doc.styles(arrow).unwrap();
        assert_eq!(styles.get("left"), Some(&StyleValue::Px(25.0)));
        assert!(!styles.contains_key("top"));
    }

    #[test]
    fn arrow_without_keep_together_is_skipped() {
        let (mut doc, reference, tip) = setup(
            Size::new(800.0, 600.0),
            Rect::new(100.0, 100.0, 200.0, 140.0),
            Size::new(60.0, 20.0),
        );
        doc.insert(
            tip,
            LocalElement::new(Rect::new(0.0, 0.0, 10.0, 5.0)).with_marker("x-arrow"),
        );
        let options = quiet().with_modifiers(|m| {
            m.set_enabled(names::KEEP_TOGETHER, false);
        });
        let popper = Popper::new(&mut doc, reference, tip, options).unwrap();
        assert_eq!(popper.data().unwrap().offsets.arrow, None);
    }

    #[test]
    fn hidden_while_reference_is_scrolled_away() {
        let mut doc = Document::new(Size::new(800.0, 600.0));
        let body = doc.body();
        let scroller = doc.insert(
            body,
            LocalElement::new(Rect::new(0.0, 0.0, 400.0, 300.0)).with_style(ComputedStyle {
                position: Position::Relative,
                overflow_y: Overflow::Auto,
                ..Default::default()
            }),
        );
        let reference = doc.insert(scroller, LocalElement::new(Rect::new(50.0, 50.0, 100.0, 70.0)));
        let tip = doc.insert(scroller, LocalElement::new(Rect::new(0.0, 0.0, 40.0, 20.0)));

        let mut popper = Popper::new(&mut doc, reference, tip, quiet()).unwrap();
        assert_eq!(popper.data().unwrap().hide, Some(false));
        assert_eq!(doc.attribute(tip, "x-out-of-boundaries"), None);

        popper.update(&mut doc);
        let data = popper.data().unwrap();
        assert_eq!(data.hide, Some(false));
        assert!(
            !data.attributes.contains_key(OUT_OF_BOUNDARIES_ATTRIBUTE),
            "unchanged flag is not written again"
        );

        doc.set_scroll(scroller, Vec2::new(0.0, 500.0));
        popper.update(&mut doc);
        assert_eq!(popper.data().unwrap().hide, Some(true));
        assert_eq!(doc.attribute(tip, "x-out-of-boundaries"), Some(""));

        popper.update(&mut doc);
        let data = popper.data().unwrap();
        assert_eq!(data.hide, Some(true));
        assert!(
            !data.attributes.contains_key(OUT_OF_BOUNDARIES_ATTRIBUTE),
            "unchanged flag is not written again"
        );
        assert_eq!(doc.attribute(tip, "x-out-of-boundaries"), Some(""), "attribute kept");

        doc.set_scroll(scroller, Vec2::ZERO);
        popper.update(&mut doc);
        assert_eq!(doc.attribute(tip, "x-out-of-boundaries"), None);
    }

    #[test]
    fn fixed_poppers_use_viewport_coordinates() {
        let (mut doc, reference, tip) = setup(
            Size::new(800.0, 600.0),
            Rect::new(100.0, 300.0, 200.0, 340.0),
            Size::new(60.0, 20.0),
        );
        let html = doc.document_element();
        doc.set_bounds(html, Rect::new(0.0, 0.0, 800.0, 2000.0));
        doc.set_scroll(html, Vec2::new(0.0, 200.0));
        let popper =
            Popper::new(&mut doc, reference, tip, quiet().with_position_fixed(true)).unwrap();
        let data = popper.data().unwrap();
        assert_eq!(data.reference(), Rect::new(100.0, 100.0, 200.0, 140.0));
        assert_eq!(data.popper(), Rect::new(120.0, 140.0, 180.0, 160.0));
        let styles = doc.styles(tip).unwrap();
        assert_eq!(styles.get("position"), Some(&StyleValue::from("fixed")));
        assert_eq!(
            styles.get("transform"),
            Some(&StyleValue::from("translate3d(120px, 140px, 0)"))
        );
    }

    #[test]
    fn custom_modifiers_run_in_order() {
        let (mut doc, reference, tip) = setup(
            Size::new(800.0, 600.0),
            Rect::new(100.0, 100.0, 200.0, 140.0),
            Size::new(60.0, 20.0),
        );
        let options = quiet().with_modifier(Modifier::custom("nudge", 150, |data, _| {
            let rect = data.popper() + Vec2::new(0.0, 7.0);
            data.offsets.popper.rect = rect;
        }));
        let popper = Popper::new(&mut doc, reference, tip, options).unwrap();
        assert_eq!(popper.data().unwrap().popper().y0, 147.0);
    }

    #[test]
    fn construction_rejects_bad_elements() {
        let (mut doc, reference, tip) = setup(
            Size::new(800.0, 600.0),
            Rect::new(100.0, 100.0, 200.0, 140.0),
            Size::new(60.0, 20.0),
        );
        let err = Popper::new(&mut doc, reference, reference, quiet()).unwrap_err();
        assert_eq!(err, CreateError::SameElement);
        doc.remove(tip);
        let err = Popper::new(&mut doc, reference, tip, quiet()).unwrap_err();
        assert_eq!(err, CreateError::InvalidPopper);
    }

    #[test]
    fn scheduled_updates_coalesce_and_stop_after_destroy() {
        let (mut doc, reference, tip) = setup(
            Size::new(800.0, 600.0),
            Rect::new(100.0, 100.0, 200.0, 140.0),
            Size::new(60.0, 20.0),
        );
        let created = Rc::new(Cell::new(0));
        let updated = Rc::new(Cell::new(0));
        let options = {
            let created = Rc::clone(&created);
            let updated = Rc::clone(&updated);
            Options::default()
                .on_create(move |_| created.set(created.get() + 1))
                .on_update(move |_| updated.set(updated.get() + 1))
                .with_remove_on_destroy(true)
        };
        let mut popper = Popper::new(&mut doc, reference, tip, options).unwrap();
        assert_eq!((created.get(), updated.get()), (1, 0));
        assert!(popper.state().events_enabled);
        // Window resize plus the document scroll.
        assert_eq!(doc.listeners().len(), 2);

        let scroll = doc.listeners()[1].id;
        assert!(popper.handle_event(&mut doc, scroll));
        assert!(popper.handle_event(&mut doc, scroll));
        let frames = doc.take_callbacks(CallbackKind::Frame);
        assert_eq!(frames.len(), 1, "one frame per burst");
        assert!(popper.run_callback(&mut doc, frames[0]));
        assert_eq!(updated.get(), 0);
        let tasks = doc.take_callbacks(CallbackKind::Microtask);
        assert!(popper.run_callback(&mut doc, tasks[0]));
        assert_eq!(updated.get(), 1);

        popper.schedule_update(&mut doc);
        popper.destroy(&mut doc);
        assert!(popper.state().is_destroyed);
        assert!(doc.listeners().is_empty());
        assert!(doc.pending_callbacks().is_empty());
        assert_eq!(doc.attribute(tip, "x-placement"), None);
        assert!(doc.styles(tip).unwrap().get("transform").is_none());
        assert_eq!(doc.parent(tip), None);

        popper.update(&mut doc);
        assert_eq!(updated.get(), 1, "destroyed instances never update");
        assert!(!popper.handle_event(&mut doc, scroll));
    }
}
