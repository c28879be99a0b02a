// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A headless element tree implementing [`Host`].
//!
//! [`Document`] stores a page-space border box per element together with the
//! style values the engine reads. Client rects are derived by subtracting the
//! scroll offsets of every ancestor, so nested scrolling behaves like a browser
//! without any rendering. Side effects (styles, attributes, listeners, scheduled
//! callbacks) are recorded so callers can inspect and drive them.
//!
//! ```
//! use kurbo::{Rect, Size};
//! use understory_popper::dom::{Document, LocalElement};
//!
//! let mut doc = Document::new(Size::new(800.0, 600.0));
//! let body = doc.body();
//! let button = doc.insert(body, LocalElement::new(Rect::new(10.0, 10.0, 90.0, 40.0)));
//! assert!(doc.is_alive(button));
//! ```

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Rect, Size, Vec2};

use crate::data::{Attributes, StyleValue, Styles};
use crate::geometry::{
    CallbackId, ComputedStyle, EventKind, Geometry, Host, ListenerId, ListenerTarget, Position,
};

/// Identifier for an element in a [`Document`] (generational).
///
/// A removed element's id never aliases a later element that reuses its slot,
/// because the slot's generation is bumped on reuse.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ElementId(u32, u32);

impl ElementId {
    const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// Per-element flags.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ElementFlags: u8 {
        /// The element is a shadow root; its host is recorded separately.
        const SHADOW_ROOT = 0b0000_0001;
    }
}

/// Local data for an element.
#[derive(Clone, Debug, Default)]
pub struct LocalElement {
    /// Border box in page space, ignoring every scroll offset.
    pub bounds: Rect,
    /// Computed style values.
    pub style: ComputedStyle,
    /// Scroll offset of this element's content.
    pub scroll: Vec2,
    /// Space taken by scrollbars (vertical bar width, horizontal bar height).
    pub scrollbar: Size,
    /// Scrollable content size, when larger than the element itself.
    pub content_size: Option<Size>,
    /// Marker attribute name, for [`Geometry::query_marker`].
    pub marker: Option<String>,
    /// Element flags.
    pub flags: ElementFlags,
}

impl LocalElement {
    /// An unstyled element with the given page-space bounds.
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            ..Default::default()
        }
    }

    /// Replace the computed style.
    pub fn with_style(mut self, style: ComputedStyle) -> Self {
        self.style = style;
        self
    }

    /// Set the marker attribute.
    pub fn with_marker(mut self, marker: &str) -> Self {
        self.marker = Some(marker.into());
        self
    }
}

#[derive(Clone, Debug)]
struct Node {
    generation: u32,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    shadow_host: Option<ElementId>,
    local: LocalElement,
    styles: Styles,
    attributes: BTreeMap<String, String>,
}

impl Node {
    fn new(generation: u32, local: LocalElement) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            shadow_host: None,
            local,
            styles: Styles::new(),
            attributes: BTreeMap::new(),
        }
    }
}

/// Kind of a scheduled callback recorded by a [`Document`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CallbackKind {
    /// Requested with [`Host::request_animation_frame`].
    Frame,
    /// Requested with [`Host::queue_microtask`].
    Microtask,
    /// Requested with [`Host::set_timeout`].
    Timeout(u32),
}

/// A recorded event listener.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Listener {
    /// Listener id handed out to the engine.
    pub id: ListenerId,
    /// Listening target.
    pub target: ListenerTarget<ElementId>,
    /// Event kind.
    pub kind: EventKind,
}

/// Headless document: an element tree with a viewport.
pub struct Document {
    nodes: Vec<Option<Node>>, // slots
    generations: Vec<u32>,    // last generation per slot (persists across frees)
    free_list: Vec<usize>,
    html: ElementId,
    body: ElementId,
    viewport: Size,
    microtasks: bool,
    next_id: u64,
    listeners: Vec<Listener>,
    callbacks: Vec<(CallbackId, CallbackKind)>,
}

impl core::fmt::Debug for Document {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("Document")
            .field("elements_alive", &alive)
            .field("viewport", &self.viewport)
            .field("listeners", &self.listeners.len())
            .field("callbacks", &self.callbacks.len())
            .finish_non_exhaustive()
    }
}

impl Document {
    /// Create a document whose root and body both cover the viewport.
    pub fn new(viewport: Size) -> Self {
        let page = Rect::from_origin_size((0.0, 0.0), viewport);
        let mut doc = Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            html: ElementId::new(0, 1),
            body: ElementId::new(0, 1),
            viewport,
            microtasks: true,
            next_id: 0,
            listeners: Vec::new(),
            callbacks: Vec::new(),
        };
        doc.html = doc.alloc(LocalElement::new(page));
        doc.body = doc.alloc(LocalElement::new(page));
        doc.link_parent(doc.body, doc.html);
        doc
    }

    /// The root element.
    pub fn document_element(&self) -> ElementId {
        self.html
    }

    /// The body element.
    pub fn body(&self) -> ElementId {
        self.body
    }

    /// Whether the host supports microtasks. When disabled, debounced updates use timers.
    pub fn set_microtasks_supported(&mut self, supported: bool) {
        self.microtasks = supported;
    }

    /// Resize the viewport.
    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    /// Insert a new element as the last child of `parent`.
    pub fn insert(&mut self, parent: ElementId, local: LocalElement) -> ElementId {
        let id = self.alloc(local);
        if self.is_alive(parent) {
            self.link_parent(id, parent);
        }
        id
    }

    /// Attach a shadow root to `host` and return it.
    pub fn attach_shadow(&mut self, host: ElementId) -> ElementId {
        let bounds = self.node_opt(host).map(|n| n.local.bounds).unwrap_or_default();
        let mut local = LocalElement::new(bounds);
        local.flags |= ElementFlags::SHADOW_ROOT;
        let id = self.alloc(local);
        if let Some(n) = self.node_opt_mut(id) {
            n.shadow_host = Some(host);
        }
        id
    }

    /// Remove an element and its subtree; their ids become stale.
    pub fn remove(&mut self, id: ElementId) {
        if !self.is_alive(id) {
            return;
        }
        self.unlink(id);
        let children = self.node(id).children.clone();
        for child in children {
            self.remove(child);
        }
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
    }

    /// Whether `id` still refers to a live element.
    pub fn is_alive(&self, id: ElementId) -> bool {
        self.node_opt(id).is_some()
    }

    /// Whether `id` is reachable from the document root, through shadow hosts if needed.
    pub fn is_connected(&self, id: ElementId) -> bool {
        let mut current = Some(id);
        while let Some(el) = current {
            if el == self.html {
                return true;
            }
            let Some(node) = self.node_opt(el) else {
                return false;
            };
            current = node.parent.or(node.shadow_host);
        }
        false
    }

    /// Update page-space bounds.
    pub fn set_bounds(&mut self, id: ElementId, bounds: Rect) {
        if let Some(n) = self.node_opt_mut(id) {
            n.local.bounds = bounds;
        }
    }

    /// Update the scroll offset. The document scroll lives on the root element.
    pub fn set_scroll(&mut self, id: ElementId, scroll: Vec2) {
        if let Some(n) = self.node_opt_mut(id) {
            n.local.scroll = scroll;
        }
    }

    /// Update the computed style.
    pub fn set_style(&mut self, id: ElementId, style: ComputedStyle) {
        if let Some(n) = self.node_opt_mut(id) {
            n.local.style = style;
        }
    }

    /// Local data of an element.
    pub fn local(&self, id: ElementId) -> Option<&LocalElement> {
        self.node_opt(id).map(|n| &n.local)
    }

    /// Inline styles written to an element.
    pub fn styles(&self, id: ElementId) -> Option<&Styles> {
        self.node_opt(id).map(|n| &n.styles)
    }

    /// Attribute value written to an element.
    pub fn attribute(&self, id: ElementId, name: &str) -> Option<&str> {
        self.node_opt(id)?.attributes.get(name).map(String::as_str)
    }

    /// Currently registered listeners.
    pub fn listeners(&self) -> &[Listener] {
        &self.listeners
    }

    /// Pending scheduled callbacks, oldest first.
    pub fn pending_callbacks(&self) -> &[(CallbackId, CallbackKind)] {
        &self.callbacks
    }

    /// Remove and return every pending callback of the given kind, oldest first.
    pub fn take_callbacks(&mut self, kind: CallbackKind) -> Vec<CallbackId> {
        let mut taken = Vec::new();
        self.callbacks.retain(|(id, k)| {
            if *k == kind {
                taken.push(*id);
                false
            } else {
                true
            }
        });
        taken
    }

    // --- internals ---

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn alloc(&mut self, local: LocalElement) -> ElementId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, local));
            (idx, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, local)));
            self.generations.push(generation);
            (self.nodes.len() - 1, generation)
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "ElementId uses 32-bit indices by design."
        )]
        let idx = idx as u32;
        ElementId::new(idx, generation)
    }

    fn node(&self, id: ElementId) -> &Node {
        self.nodes[id.idx()].as_ref().expect("dangling ElementId")
    }

    fn node_opt(&self, id: ElementId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.1).then_some(n)
    }

    fn node_opt_mut(&mut self, id: ElementId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    fn link_parent(&mut self, id: ElementId, parent: ElementId) {
        if let Some(p) = self.node_opt_mut(parent) {
            p.children.push(id);
        }
        if let Some(n) = self.node_opt_mut(id) {
            n.parent = Some(parent);
        }
    }

    fn unlink(&mut self, id: ElementId) {
        let Some(parent) = self.node_opt(id).and_then(|n| n.parent) else {
            return;
        };
        if let Some(p) = self.node_opt_mut(parent) {
            p.children.retain(|c| *c != id);
        }
        if let Some(n) = self.node_opt_mut(id) {
            n.parent = None;
        }
    }

    fn ancestor_scroll(&self, id: ElementId) -> Vec2 {
        let mut total = Vec2::ZERO;
        let mut current = self.node_opt(id).and_then(|n| n.parent.or(n.shadow_host));
        while let Some(el) = current {
            let Some(node) = self.node_opt(el) else {
                break;
            };
            total += node.local.scroll;
            current = node.parent.or(node.shadow_host);
        }
        total
    }
}

impl Geometry for Document {
    type Element = ElementId;

    fn is_valid(&self, element: ElementId) -> bool {
        self.is_alive(element)
    }

    fn document_element(&self) -> ElementId {
        self.html
    }

    fn body(&self) -> ElementId {
        self.body
    }

    fn parent(&self, element: ElementId) -> Option<ElementId> {
        self.node_opt(element)?.parent
    }

    fn shadow_host(&self, element: ElementId) -> Option<ElementId> {
        let node = self.node_opt(element)?;
        if node.local.flags.contains(ElementFlags::SHADOW_ROOT) {
            node.shadow_host
        } else {
            None
        }
    }

    fn native_offset_parent(&self, element: ElementId) -> Option<ElementId> {
        if element == self.html || element == self.body || !self.is_connected(element) {
            return None;
        }
        if self.node(element).local.style.position == Position::Fixed {
            return None;
        }
        let mut current = crate::measure::parent_node(self, element);
        while let Some(el) = current {
            if el == self.body || el == self.html {
                break;
            }
            let node = self.node_opt(el)?;
            if !node.local.flags.contains(ElementFlags::SHADOW_ROOT)
                && node.local.style.position.is_positioned()
            {
                return Some(el);
            }
            current = crate::measure::parent_node(self, el);
        }
        Some(self.body)
    }

    fn client_rect(&self, element: ElementId) -> Rect {
        if !self.is_connected(element) {
            return Rect::ZERO;
        }
        let node = self.node(element);
        let mut scroll = self.ancestor_scroll(element);
        if element == self.html {
            scroll += node.local.scroll;
        }
        node.local.bounds - scroll
    }

    fn style(&self, element: ElementId) -> ComputedStyle {
        self.node_opt(element)
            .map(|n| n.local.style)
            .unwrap_or_default()
    }

    fn scroll_offset(&self, element: ElementId) -> Vec2 {
        self.node_opt(element)
            .map(|n| n.local.scroll)
            .unwrap_or(Vec2::ZERO)
    }

    fn client_size(&self, element: ElementId) -> Size {
        let Some(node) = self.node_opt(element) else {
            return Size::ZERO;
        };
        if element == self.html {
            return self.viewport;
        }
        let border = node.local.style.border;
        let size = node.local.bounds.size();
        Size::new(
            (size.width - border.x0 - border.x1 - node.local.scrollbar.width).max(0.0),
            (size.height - border.y0 - border.y1 - node.local.scrollbar.height).max(0.0),
        )
    }

    fn offset_size(&self, element: ElementId) -> Size {
        self.node_opt(element)
            .map(|n| n.local.bounds.size())
            .unwrap_or(Size::ZERO)
    }

    fn scroll_size(&self, element: ElementId) -> Size {
        let Some(node) = self.node_opt(element) else {
            return Size::ZERO;
        };
        let client = self.client_size(element);
        let border = node.local.style.border;
        let bounds = node.local.bounds.size();
        let content = node.local.content_size.unwrap_or(Size::ZERO);
        Size::new(
            client
                .width
                .max(bounds.width - border.x0 - border.x1)
                .max(content.width),
            client
                .height
                .max(bounds.height - border.y0 - border.y1)
                .max(content.height),
        )
    }

    fn viewport_size(&self) -> Size {
        self.viewport
    }

    fn query_marker(&self, within: ElementId, marker: &str) -> Option<ElementId> {
        let node = self.node_opt(within)?;
        if node.local.marker.as_deref() == Some(marker) {
            return Some(within);
        }
        node.children
            .iter()
            .find_map(|child| self.query_marker(*child, marker))
    }
}

impl Host for Document {
    fn set_styles(&mut self, element: ElementId, styles: &Styles) {
        if let Some(n) = self.node_opt_mut(element) {
            for (name, value) in styles {
                if *value == StyleValue::Unset {
                    n.styles.remove(name);
                } else {
                    n.styles.insert(name.clone(), value.clone());
                }
            }
        }
    }

    fn clear_styles(&mut self, element: ElementId, properties: &[&str]) {
        if let Some(n) = self.node_opt_mut(element) {
            for property in properties {
                n.styles.remove(*property);
            }
        }
    }

    fn set_attributes(&mut self, element: ElementId, attributes: &Attributes) {
        if let Some(n) = self.node_opt_mut(element) {
            for (name, value) in attributes {
                match value {
                    Some(value) => {
                        n.attributes.insert(name.clone(), value.clone());
                    }
                    None => {
                        n.attributes.remove(name);
                    }
                }
            }
        }
    }

    fn detach(&mut self, element: ElementId) {
        self.unlink(element);
    }

    fn add_event_listener(
        &mut self,
        target: ListenerTarget<ElementId>,
        kind: EventKind,
    ) -> ListenerId {
        let id = ListenerId(self.next_id());
        self.listeners.push(Listener { id, target, kind });
        id
    }

    fn remove_event_listener(&mut self, listener: ListenerId) {
        self.listeners.retain(|l| l.id != listener);
    }

    fn request_animation_frame(&mut self) -> CallbackId {
        let id = CallbackId(self.next_id());
        self.callbacks.push((id, CallbackKind::Frame));
        id
    }

    fn queue_microtask(&mut self) -> Option<CallbackId> {
        if !self.microtasks {
            return None;
        }
        let id = CallbackId(self.next_id());
        self.callbacks.push((id, CallbackKind::Microtask));
        Some(id)
    }

    fn set_timeout(&mut self, delay_ms: u32) -> CallbackId {
        let id = CallbackId(self.next_id());
        self.callbacks.push((id, CallbackKind::Timeout(delay_ms)));
        id
    }

    fn cancel_callback(&mut self, callback: CallbackId) {
        self.callbacks.retain(|(id, _)| *id != callback);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn liveness_insert_remove_reuse() {
        let mut doc = Document::new(Size::new(100.0, 100.0));
        let body = doc.body();
        let a = doc.insert(body, LocalElement::new(Rect::new(0.0, 0.0, 1.0, 1.0)));
        assert!(doc.is_alive(a));
        doc.remove(a);
        assert!(!doc.is_alive(a));

        let b = doc.insert(body, LocalElement::new(Rect::new(0.0, 0.0, 1.0, 1.0)));
        assert!(doc.is_alive(b));
        assert!(!doc.is_alive(a), "stale id must not alias the reused slot");
        if a.0 == b.0 {
            assert!(b.1 > a.1, "generation must increase on reuse");
        }
    }

    #[test]
    fn client_rect_subtracts_ancestor_scroll() {
        let mut doc = Document::new(Size::new(100.0, 100.0));
        let body = doc.body();
        let outer = doc.insert(body, LocalElement::new(Rect::new(0.0, 0.0, 100.0, 100.0)));
        let inner = doc.insert(outer, LocalElement::new(Rect::new(10.0, 50.0, 20.0, 60.0)));
        doc.set_scroll(outer, Vec2::new(0.0, 30.0));
        doc.set_scroll(doc.document_element(), Vec2::new(0.0, 5.0));
        assert_eq!(doc.client_rect(inner), Rect::new(10.0, 15.0, 20.0, 25.0));
        assert_eq!(doc.client_rect(outer), Rect::new(0.0, -5.0, 100.0, 95.0));
    }

    #[test]
    fn detached_elements_have_no_rect() {
        let mut doc = Document::new(Size::new(100.0, 100.0));
        let body = doc.body();
        let el = doc.insert(body, LocalElement::new(Rect::new(10.0, 10.0, 20.0, 20.0)));
        doc.detach(el);
        assert!(doc.is_alive(el));
        assert!(!doc.is_connected(el));
        assert_eq!(doc.client_rect(el), Rect::ZERO);
    }

    #[test]
    fn marker_query_searches_subtree() {
        let mut doc = Document::new(Size::new(100.0, 100.0));
        let body = doc.body();
        let popper = doc.insert(body, LocalElement::new(Rect::new(0.0, 0.0, 50.0, 50.0)));
        let wrapper = doc.insert(popper, LocalElement::new(Rect::new(0.0, 0.0, 50.0, 50.0)));
        let arrow = doc.insert(
            wrapper,
            LocalElement::new(Rect::new(0.0, 0.0, 10.0, 5.0)).with_marker("x-arrow"),
        );
        assert_eq!(doc.query_marker(popper, "x-arrow"), Some(arrow));
        assert_eq!(doc.query_marker(popper, "x-missing"), None);
        assert!(doc.contains(popper, arrow));
        assert!(!doc.contains(arrow, popper));
    }

    #[test]
    fn records_side_effects() {
        let mut doc = Document::new(Size::new(100.0, 100.0));
        let body = doc.body();
        let el = doc.insert(body, LocalElement::new(Rect::new(0.0, 0.0, 10.0, 10.0)));

        let mut styles = Styles::new();
        styles.insert("top".into(), StyleValue::Px(4.0));
        doc.set_styles(el, &styles);
        assert_eq!(doc.styles(el).and_then(|s| s.get("top")), Some(&StyleValue::Px(4.0)));
        doc.clear_styles(el, &["top"]);
        assert!(doc.styles(el).is_some_and(|s| s.is_empty()));

        let mut attributes = Attributes::new();
        attributes.insert("x-placement".into(), Some("top".into()));
        doc.set_attributes(el, &attributes);
        assert_eq!(doc.attribute(el, "x-placement"), Some("top"));
        attributes.insert("x-placement".into(), None);
        doc.set_attributes(el, &attributes);
        assert_eq!(doc.attribute(el, "x-placement"), None);

        let listener = doc.add_event_listener(ListenerTarget::Window, EventKind::Resize);
        assert_eq!(doc.listeners().len(), 1);
        doc.remove_event_listener(listener);
        assert!(doc.listeners().is_empty());

        let frame = doc.request_animation_frame();
        let _timer = doc.set_timeout(0);
        doc.cancel_callback(frame);
        assert_eq!(doc.take_callbacks(CallbackKind::Frame), Vec::new());
        assert_eq!(doc.take_callbacks(CallbackKind::Timeout(0)).len(), 1);

        doc.set_microtasks_supported(false);
        assert_eq!(doc.queue_microtask(), None);
    }
}
