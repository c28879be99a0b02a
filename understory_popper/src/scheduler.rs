// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Update scheduling and listener bookkeeping for one instance.
//!
//! ## Scheduling
//!
//! [`Scheduler`] coalesces update requests. A request arms one animation-frame
//! callback; further requests while it is pending are dropped. When the frame
//! fires, a debounced task is queued: a microtask when the host supports them,
//! otherwise a zero-delay timer. The update runs when that task fires, at most
//! once per frame.
//!
//! ## Listeners
//!
//! [`EventListeners`] owns the window resize listener and one scroll listener per
//! scroll container between the reference and the document. All of them are
//! released together.

use alloc::vec::Vec;

use crate::geometry::{CallbackId, EventKind, Host, ListenerId, ListenerTarget};
use crate::measure::{parent_node, scroll_parent};

/// What a fired callback means for the instance.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Fired {
    /// The frame callback ran; the debounced task is now queued.
    Frame,
    /// The debounced task ran; the instance should update now.
    Update,
    /// The callback does not belong to this scheduler.
    Unknown,
}

/// Frame-aligned, debounced update requests.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Scheduler {
    frame: Option<CallbackId>,
    task: Option<CallbackId>,
}

impl Scheduler {
    /// Create an idle scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a frame or debounced task is pending.
    pub fn is_pending(&self) -> bool {
        self.frame.is_some() || self.task.is_some()
    }

    /// Arm a frame callback unless one is already pending.
    ///
    /// Returns `true` if a new frame was requested.
    pub fn request<H: Host + ?Sized>(&mut self, host: &mut H) -> bool {
        if self.frame.is_some() {
            return false;
        }
        self.frame = Some(host.request_animation_frame());
        true
    }

    /// Route a fired callback.
    pub fn fire<H: Host + ?Sized>(&mut self, host: &mut H, id: CallbackId) -> Fired {
        if self.frame == Some(id) {
            self.frame = None;
            if self.task.is_none() {
                let task = match host.queue_microtask() {
                    Some(task) => task,
                    None => host.set_timeout(0),
                };
                self.task = Some(task);
            }
            Fired::Frame
        } else if self.task == Some(id) {
            self.task = None;
            Fired::Update
        } else {
            Fired::Unknown
        }
    }

    /// Cancel anything pending.
    pub fn cancel<H: Host + ?Sized>(&mut self, host: &mut H) {
        for id in [self.frame.take(), self.task.take()].into_iter().flatten() {
            host.cancel_callback(id);
        }
    }
}

/// Listeners held by one instance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventListeners<E> {
    resize: Option<ListenerId>,
    scroll: Vec<(ListenerId, ListenerTarget<E>)>,
}

impl<E> Default for EventListeners<E> {
    fn default() -> Self {
        Self {
            resize: None,
            scroll: Vec::new(),
        }
    }
}

impl<E: Copy + PartialEq> EventListeners<E> {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether listeners are attached.
    pub fn is_attached(&self) -> bool {
        self.resize.is_some()
    }

    /// Whether `id` is one of these listeners.
    pub fn contains(&self, id: ListenerId) -> bool {
        self.resize == Some(id) || self.scroll.iter().any(|(l, _)| *l == id)
    }

    /// Scroll targets in attachment order, from the reference outwards.
    pub fn scroll_targets(&self) -> impl Iterator<Item = ListenerTarget<E>> + '_ {
        self.scroll.iter().map(|(_, target)| *target)
    }

    /// Attach the resize listener and the scroll chain of `reference`. No-op if attached.
    pub fn attach<H: Host<Element = E> + ?Sized>(&mut self, host: &mut H, reference: E) {
        if self.is_attached() {
            return;
        }
        self.resize = Some(host.add_event_listener(ListenerTarget::Window, EventKind::Resize));
        let body = host.body();
        let mut target = scroll_parent(&*host, reference);
        loop {
            if target == body {
                let id = host.add_event_listener(ListenerTarget::Window, EventKind::Scroll);
                self.scroll.push((id, ListenerTarget::Window));
                break;
            }
            let element = ListenerTarget::Element(target);
            let id = host.add_event_listener(element, EventKind::Scroll);
            self.scroll.push((id, element));
            target = match parent_node(&*host, target) {
                Some(parent) => scroll_parent(&*host, parent),
                None => body,
            };
        }
        tracing::debug!(scroll_listeners = self.scroll.len(), "event listeners attached");
    }

    /// Remove every listener.
    pub fn detach<H: Host<Element = E> + ?Sized>(&mut self, host: &mut H) {
        if let Some(id) = self.resize.take() {
            host.remove_event_listener(id);
        }
        for (id, _) in self.scroll.drain(..) {
            host.remove_event_listener(id);
        }
        tracing::debug!("event listeners detached");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{CallbackKind, Document, LocalElement};
    use crate::geometry::{ComputedStyle, Geometry, Overflow};
    use kurbo::{Rect, Size};

    #[test]
    fn one_frame_then_one_update() {
        let mut doc = Document::new(Size::new(800.0, 600.0));
        let mut scheduler = Scheduler::new();
        assert!(scheduler.request(&mut doc));
        assert!(!scheduler.request(&mut doc), "a frame is already pending");

        let frames = doc.take_callbacks(CallbackKind::Frame);
        assert_eq!(frames.len(), 1);
        assert_eq!(scheduler.fire(&mut doc, frames[0]), Fired::Frame);

        let tasks = doc.take_callbacks(CallbackKind::Microtask);
        assert_eq!(tasks.len(), 1);
        assert_eq!(scheduler.fire(&mut doc, tasks[0]), Fired::Update);
        assert!(!scheduler.is_pending());
        assert_eq!(scheduler.fire(&mut doc, tasks[0]), Fired::Unknown);
    }

    #[test]
    fn falls_back_to_timer_and_cancels() {
        let mut doc = Document::new(Size::new(800.0, 600.0));
        doc.set_microtasks_supported(false);
        let mut scheduler = Scheduler::new();
        scheduler.request(&mut doc);
        let frame = doc.take_callbacks(CallbackKind::Frame)[0];
        scheduler.fire(&mut doc, frame);
        assert_eq!(doc.pending_callbacks().len(), 1);
        assert_eq!(doc.pending_callbacks()[0].1, CallbackKind::Timeout(0));

        scheduler.cancel(&mut doc);
        assert!(doc.pending_callbacks().is_empty());
        assert!(!scheduler.is_pending());
    }

    #[test]
    fn scroll_chain_covers_every_scroller() {
        let mut doc = Document::new(Size::new(800.0, 600.0));
        let body = doc.body();
        let scrolling = ComputedStyle {
            overflow_y: Overflow::Auto,
            ..Default::default()
        };
        let outer = doc.insert(
            body,
            LocalElement::new(Rect::new(0.0, 0.0, 400.0, 400.0)).with_style(scrolling),
        );
        let plain = doc.insert(outer, LocalElement::new(Rect::new(0.0, 0.0, 300.0, 300.0)));
        let inner = doc.insert(
            plain,
            LocalElement::new(Rect::new(0.0, 0.0, 200.0, 200.0)).with_style(scrolling),
        );
        let reference = doc.insert(inner, LocalElement::new(Rect::new(10.0, 10.0, 50.0, 30.0)));

        let mut listeners = EventListeners::new();
        listeners.attach(&mut doc, reference);
        let targets: Vec<_> = listeners.scroll_targets().collect();
        assert_eq!(
            targets,
            [
                ListenerTarget::Element(inner),
                ListenerTarget::Element(outer),
                ListenerTarget::Window
            ]
        );
        // Resize plus three scroll listeners.
        assert_eq!(doc.listeners().len(), 4);
        assert!(doc.listeners().iter().all(|l| listeners.contains(l.id)));

        listeners.attach(&mut doc, reference);
        assert_eq!(doc.listeners().len(), 4, "attaching twice is a no-op");

        listeners.detach(&mut doc);
        assert!(doc.listeners().is_empty());
        assert!(!listeners.is_attached());
        assert!(doc.is_valid(reference));
    }
}
