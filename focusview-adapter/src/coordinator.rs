use alloc::vec::Vec;
use core::fmt;
use core::mem;

use focusview::geometry::{abs, clamp_symmetric};
use focusview::{
    ConfigError, Cursor, EdgeEvent, EdgeState, Item, Packed, Paged, Placement, RenderRecord,
    ScrollState, Sequence, Size, WindowLayout,
};

use crate::{
    Force, GestureEvent, NavigationError, PhysicsEngine, ScrollAnchor, ScrollOptions,
    Simulation, SpringParams, capture_anchor, resolve_anchor,
};

/// Identity type of the items in `Q`.
pub type ItemId<Q> = <<Q as Sequence>::Item as Item>::Id;

/// A continuously scrolling surface driven by [`PhysicsEngine`].
pub type ScrollView<Q> = ScrollCoordinator<Q, Packed>;

/// A one-item-per-page carousel driven by [`PhysicsEngine`].
pub type PagedView<Q> = ScrollCoordinator<Q, Paged>;

/// What a renderer needs for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame<K> {
    /// Scroll translation to apply to every record's offset.
    pub position: f64,
    pub records: Vec<RenderRecord<K>>,
}

/// The anchor moved to another item.
///
/// `index` is `None` when the anchor became undefined (the item it pointed at is gone).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageChange {
    /// Signed index delta from the previous anchor.
    pub direction: isize,
    pub index: Option<usize>,
}

/// Notifications produced by a [`ScrollCoordinator`]; drain them with
/// [`ScrollCoordinator::take_events`].
#[derive(Clone, Debug, PartialEq)]
pub enum ScrollEvent {
    OnEdge(EdgeEvent),
    OffEdge(EdgeEvent),
    PageChange(PageChange),
    /// Motion fully decayed.
    Settle,
}

/// Force changes requested while the simulation reported a settle; applied at the start of
/// the next tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ForceOp {
    Detach { spring: bool, drag: bool },
    Attach { spring: bool, drag: bool },
}

/// Couples gesture input, a [`Simulation`] and a [`WindowLayout`].
///
/// The coordinator owns the committed scroll position and the anchor cursor. Positions are
/// relative to the anchor item's leading edge; when motion carries the position into a
/// neighbor's territory the coordinator performs an origin shift, moving the anchor and
/// translating the position so nothing moves on screen.
///
/// It holds no UI objects. Hosts drive it by calling:
/// - `on_gesture_start` / `on_gesture_update` / `on_gesture_end` from their gesture source
/// - `tick(dt_ms)` once per frame, rendering the returned [`Frame`]
/// - `take_events()` to observe edge, page and settle notifications
///
/// Within a frame, gesture events must be delivered before `tick`.
pub struct ScrollCoordinator<Q, P = Packed, S = PhysicsEngine>
where
    Q: Sequence,
{
    options: ScrollOptions,
    layout: WindowLayout<ItemId<Q>, P>,
    sim: S,
    seq: Q,
    viewport: Size,
    anchor: Option<Cursor>,
    position: f64,
    edge: EdgeState,
    scale: f64,
    gesture_active: bool,
    early_end: bool,
    gesture_velocity: Option<f64>,
    deferred: Vec<ForceOp>,
    events: Vec<ScrollEvent>,
}

impl<Q, P, S> fmt::Debug for ScrollCoordinator<Q, P, S>
where
    Q: Sequence,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollCoordinator")
            .field("anchor", &self.anchor)
            .field("position", &self.position)
            .field("edge", &self.edge)
            .field("scale", &self.scale)
            .field("gesture_active", &self.gesture_active)
            .field("early_end", &self.early_end)
            .field("pending_events", &self.events.len())
            .finish()
    }
}

impl<Q, P, S> ScrollCoordinator<Q, P, S>
where
    Q: Sequence,
    P: Placement + Default,
    S: Simulation + Default,
{
    pub fn new(seq: Q, options: ScrollOptions) -> Result<Self, ConfigError> {
        Self::with_simulation(seq, options, S::default())
    }
}

impl<Q, P, S> ScrollCoordinator<Q, P, S>
where
    Q: Sequence,
    P: Placement + Default,
    S: Simulation,
{
    /// Builds a coordinator around a caller-provided simulation.
    ///
    /// The anchor starts at the first item, if any.
    pub fn with_simulation(
        seq: Q,
        options: ScrollOptions,
        mut sim: S,
    ) -> Result<Self, ConfigError> {
        options.validate()?;
        let layout = WindowLayout::new(options.layout)?;
        sim.set_drag_strength(Force::Drag, options.drag);
        sim.set_drag_strength(Force::Friction, options.friction);
        sim.set_position(0.0);
        let anchor = Cursor::first(&seq);
        Ok(Self {
            options,
            layout,
            sim,
            seq,
            viewport: Size::default(),
            anchor,
            position: 0.0,
            edge: EdgeState::None,
            scale: options.scale,
            gesture_active: false,
            early_end: false,
            gesture_velocity: None,
            deferred: Vec::new(),
            events: Vec::new(),
        })
    }
}

impl<Q, P, S> ScrollCoordinator<Q, P, S>
where
    Q: Sequence,
    P: Placement,
    S: Simulation,
{
    pub fn options(&self) -> &ScrollOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: ScrollOptions) -> Result<(), ConfigError> {
        options.validate()?;
        self.layout.set_options(options.layout)?;
        self.options = options;
        self.sim.set_drag_strength(Force::Drag, options.drag);
        self.sim.set_drag_strength(Force::Friction, options.friction);
        if !self.edge.is_pinned() {
            self.scale = options.scale;
        }
        Ok(())
    }

    pub fn layout(&self) -> &WindowLayout<ItemId<Q>, P> {
        &self.layout
    }

    pub fn simulation(&self) -> &S {
        &self.sim
    }

    pub fn sequence(&self) -> &Q {
        &self.seq
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    /// Committed position relative to the anchor item's leading edge.
    pub fn position(&self) -> f64 {
        self.position
    }

    /// The gesture velocity while a gesture is in progress, otherwise the body's.
    pub fn velocity(&self) -> f64 {
        self.gesture_velocity.unwrap_or_else(|| self.sim.velocity())
    }

    pub fn edge_state(&self) -> EdgeState {
        self.edge
    }

    pub fn is_gesture_active(&self) -> bool {
        self.gesture_active
    }

    pub fn active_index(&self) -> Option<usize> {
        self.anchor.map(Cursor::index)
    }

    pub fn take_events(&mut self) -> Vec<ScrollEvent> {
        mem::take(&mut self.events)
    }

    /// Replaces the item store; the anchor moves to the first item.
    pub fn set_sequence(&mut self, seq: Q) {
        self.seq = seq;
        self.deferred.clear();
        self.detach_forces(true, true);
        self.position = 0.0;
        self.sim.set_position(0.0);
        self.edge = EdgeState::None;
        self.scale = self.options.scale;
        self.layout.reset();
        match Cursor::first(&self.seq) {
            Some(first) => self.anchor = Some(first),
            None if self.anchor.is_some() => self.clear_anchor(),
            None => {}
        }
    }

    /// Mutates the item store in place, then checks that the anchor still resolves.
    pub fn update_sequence(&mut self, f: impl FnOnce(&mut Q)) {
        f(&mut self.seq);
        self.validate_anchor();
    }

    pub fn on_gesture_start(&mut self) {
        vtrace!(position = self.position, "gesture start");
        self.deferred.clear();
        self.detach_forces(true, true);
        self.early_end = false;
        self.gesture_active = true;
        self.gesture_velocity = None;
        self.release_brake();
        self.layout.on_gesture_start();
    }

    pub fn on_gesture_update(&mut self, ev: GestureEvent) {
        if !self.gesture_active && !self.early_end {
            self.on_gesture_start();
        }

        let (mut delta, mut velocity) = self.grip(ev);

        if self.edge.is_pinned() && ev.slip {
            let leaving = (velocity < 0.0 && self.edge == EdgeState::First)
                || (velocity > 0.0 && self.edge == EdgeState::Last);
            if leaving {
                if !self.early_end {
                    vdebug!(edge = ?self.edge, velocity, "early gesture end");
                    self.end_gesture(ev);
                    self.early_end = true;
                }
            } else if self.early_end && abs(velocity) > abs(self.sim.velocity()) {
                vdebug!(edge = ?self.edge, velocity, "gesture re-opened");
                self.on_gesture_start();
            }
        }
        if self.early_end {
            return;
        }

        if ev.slip {
            velocity = clamp_symmetric(velocity, self.options.speed_limit);
            delta = clamp_symmetric(delta, self.options.delta_limit());
        }
        self.gesture_velocity = Some(velocity);

        self.position += delta;
        self.sim.set_position(self.position);
        self.normalize(true);
    }

    pub fn on_gesture_end(&mut self, ev: GestureEvent) {
        if self.early_end {
            // The surface was already released by the early end.
            self.early_end = false;
            return;
        }
        self.end_gesture(ev);
    }

    /// Advances the simulation by `dt_ms` milliseconds and lays out the window.
    pub fn tick(&mut self, dt_ms: f64) -> Frame<ItemId<Q>> {
        self.flush_deferred();
        let outcome = self.sim.step(dt_ms);
        self.position = self.sim.position();
        self.normalize(false);
        if outcome.settled {
            self.on_settle();
        }
        self.render()
    }

    /// Jumps to `index` without visual movement; the item there becomes the anchor at
    /// position zero.
    ///
    /// A no-op when there is no anchor. Fails without changing any state when the sequence
    /// ends before `index`.
    pub fn scroll_to(&mut self, index: usize) -> Result<(), NavigationError> {
        let Some(anchor) = self.anchor else {
            return Ok(());
        };
        let target = anchor.seek(&self.seq, index).map_err(|reached| {
            vwarn!(target = index, reached = reached.index(), "scroll_to: index unreachable");
            NavigationError::IndexUnreachable {
                target: index,
                reached: reached.index(),
            }
        })?;
        self.jump(target);
        Ok(())
    }

    pub fn scroll_next(&mut self) {
        if let Some(next) = self.anchor.and_then(|a| a.next(&self.seq)) {
            self.jump(next);
        }
    }

    pub fn scroll_previous(&mut self) {
        if let Some(prev) = self.anchor.and_then(|a| a.previous(&self.seq)) {
            self.jump(prev);
        }
    }

    pub fn scroll_state(&self) -> ScrollState {
        ScrollState {
            position: self.position,
            velocity: self.velocity(),
            anchor: self.active_index(),
            edge: self.edge,
        }
    }

    /// Restores a snapshot taken with [`Self::scroll_state`].
    ///
    /// The edge state is reseeded to `None`; the next tick reports whatever edge the restored
    /// window touches. A non-zero velocity resumes inertial motion.
    pub fn restore_scroll_state(&mut self, state: ScrollState) -> Result<(), NavigationError> {
        let anchor = match state.anchor {
            None => None,
            Some(index) => Some(self.cursor_at(index)?),
        };

        self.deferred.clear();
        self.gesture_active = false;
        self.early_end = false;
        self.gesture_velocity = None;
        self.detach_forces(true, true);
        self.edge = EdgeState::None;
        self.scale = self.options.scale;
        self.layout.reset();
        self.position = state.position;
        self.sim.set_position(state.position);
        self.anchor = anchor;

        if state.velocity != 0.0 {
            let rest = self.layout.rest_anchor();
            if let Some(rest) = rest {
                self.sim.set_spring(self.rest_spring(rest));
            }
            self.attach_forces(rest.is_some(), true);
            self.sim.set_velocity(state.velocity);
        }
        Ok(())
    }

    /// Captures the anchor item's identity and the committed position.
    pub fn capture_anchor(&self) -> Option<ScrollAnchor<ItemId<Q>>> {
        capture_anchor(&self.seq, self.anchor?, self.position)
    }

    /// Re-anchors to a previously captured item identity after the sequence changed.
    ///
    /// Forces and velocity carry over. Returns `false` if the item can no longer be found.
    pub fn apply_anchor(
        &mut self,
        anchor: &ScrollAnchor<ItemId<Q>>,
        key_to_index: impl FnMut(&ItemId<Q>) -> Option<usize>,
    ) -> bool {
        let Some(cursor) = resolve_anchor(&self.seq, anchor, key_to_index) else {
            return false;
        };
        if self.anchor.is_none() {
            self.anchor = Some(cursor);
            self.events.push(ScrollEvent::PageChange(PageChange {
                direction: 0,
                index: Some(cursor.index()),
            }));
        }
        self.shift_origin(cursor, anchor.offset - self.position);
        true
    }

    fn cursor_at(&self, index: usize) -> Result<Cursor, NavigationError> {
        let start = self
            .anchor
            .or_else(|| Cursor::first(&self.seq))
            .ok_or(NavigationError::EmptySequence)?;
        start
            .seek(&self.seq, index)
            .map_err(|reached| NavigationError::IndexUnreachable {
                target: index,
                reached: reached.index(),
            })
    }

    fn jump(&mut self, target: Cursor) {
        vdebug!(from = ?self.active_index(), to = target.index(), "jump");
        self.deferred.clear();
        self.position = 0.0;
        self.sim.set_position(0.0);
        self.edge = EdgeState::None;
        self.scale = self.options.scale;
        self.layout.reset();
        if self.gesture_active {
            self.layout.on_gesture_start();
        }
        self.detach_forces(true, true);
        self.shift_origin(target, 0.0);
    }

    /// Scales gesture input: the edge grip while pushing past a pinned edge, the configured
    /// gesture scale otherwise.
    fn grip(&self, ev: GestureEvent) -> (f64, f64) {
        let pushing = (ev.delta > 0.0 && self.edge == EdgeState::First)
            || (ev.delta < 0.0 && self.edge == EdgeState::Last);
        let scale = if pushing {
            self.scale
        } else {
            self.options.scale
        };
        (ev.delta * scale, ev.velocity * scale)
    }

    fn end_gesture(&mut self, ev: GestureEvent) {
        let (_, velocity) = self.grip(ev);
        let pinned = self.edge.is_pinned();
        let mut limit = self.options.speed_limit;
        if pinned && ev.slip {
            limit *= self.layout.options().edge_grip;
        }
        let velocity = clamp_symmetric(velocity, limit);

        let rest = if pinned {
            None
        } else {
            self.layout.rest_anchor()
        };
        if let Some(rest) = rest {
            self.sim.set_spring(self.rest_spring(rest));
        }

        vtrace!(velocity, pinned, snap = rest.is_some(), "gesture end");
        self.deferred.clear();
        self.gesture_active = false;
        self.gesture_velocity = None;
        self.layout.on_gesture_end();
        self.attach_forces(pinned || rest.is_some(), true);
        self.sim.set_velocity(velocity);
    }

    fn rest_spring(&self, anchor: f64) -> SpringParams {
        let layout = self.layout.options();
        SpringParams {
            anchor,
            period: layout.spring_period,
            damping_ratio: layout.spring_damping,
        }
    }

    fn attach_forces(&mut self, spring: bool, drag: bool) {
        if spring {
            self.sim.attach(Force::Spring);
        }
        if drag {
            self.sim.attach(Force::Drag);
            self.sim.attach(Force::Friction);
        }
    }

    /// Detaching drag also stops the body.
    fn detach_forces(&mut self, spring: bool, drag: bool) {
        if spring {
            self.sim.detach(Force::Spring);
        }
        if drag {
            self.sim.detach(Force::Drag);
            self.sim.detach(Force::Friction);
            self.sim.set_velocity(0.0);
        }
    }

    fn flush_deferred(&mut self) {
        for op in mem::take(&mut self.deferred) {
            if self.gesture_active {
                break;
            }
            vtrace!(?op, "deferred force op");
            match op {
                ForceOp::Detach { spring, drag } => self.detach_forces(spring, drag),
                ForceOp::Attach { spring, drag } => self.attach_forces(spring, drag),
            }
        }
    }

    fn on_settle(&mut self) {
        if self.gesture_active {
            return;
        }
        if self.edge.is_pinned() {
            self.deferred.push(ForceOp::Detach {
                spring: false,
                drag: true,
            });
            self.deferred.push(ForceOp::Attach {
                spring: true,
                drag: false,
            });
        } else {
            self.deferred.push(ForceOp::Detach {
                spring: true,
                drag: true,
            });
        }
        vdebug!(position = self.position, edge = ?self.edge, "settle");
        self.events.push(ScrollEvent::Settle);
    }

    fn normalize(&mut self, moving: bool) {
        if self.edge.is_pinned() {
            if !moving && !self.gesture_active {
                self.brace_for_edge();
            }
            return;
        }
        let Some(anchor) = self.anchor else { return };
        let velocity = self.velocity();
        if let Some(shift) =
            self.layout
                .normalize(&self.seq, anchor, self.position, velocity, self.viewport)
        {
            self.shift_origin(shift.anchor, shift.offset);
        }
    }

    /// Coasting into an edge brakes harder than free scrolling.
    fn brace_for_edge(&mut self) {
        if self.sim.drag_strength(Force::Drag) != self.options.edge_drag
            || self.sim.drag_strength(Force::Friction) != self.options.edge_friction
        {
            vtrace!(edge = ?self.edge, "edge brake");
            self.sim.set_drag_strength(Force::Drag, self.options.edge_drag);
            self.sim.set_drag_strength(Force::Friction, self.options.edge_friction);
        }
    }

    fn release_brake(&mut self) {
        self.sim.set_drag_strength(Force::Drag, self.options.drag);
        self.sim.set_drag_strength(Force::Friction, self.options.friction);
    }

    fn shift_origin(&mut self, target: Cursor, offset: f64) {
        let velocity = self.sim.velocity();
        let spring = self.sim.is_attached(Force::Spring);
        let drag = self.sim.is_attached(Force::Drag);

        self.detach_forces(true, true);
        self.position += offset;
        self.sim.set_position(self.position);
        if !self.gesture_active {
            self.attach_forces(spring, drag);
            self.sim.set_velocity(velocity);
        }

        let previous = self.anchor.replace(target).map(Cursor::index);
        if previous != Some(target.index()) {
            let direction = match previous {
                Some(prev) => target.index() as isize - prev as isize,
                None => 0,
            };
            vdebug!(?previous, index = target.index(), direction, offset, "page change");
            self.events.push(ScrollEvent::PageChange(PageChange {
                direction,
                index: Some(target.index()),
            }));
        }
    }

    fn validate_anchor(&mut self) {
        if let Some(anchor) = self.anchor {
            if anchor.current(&self.seq).is_none() {
                self.clear_anchor();
            }
        }
    }

    fn clear_anchor(&mut self) {
        vwarn!(previous = ?self.anchor.map(Cursor::index), "anchor no longer resolves");
        self.anchor = None;
        self.events.push(ScrollEvent::PageChange(PageChange {
            direction: 0,
            index: None,
        }));
    }

    fn handle_edge(&mut self, ev: EdgeEvent) {
        self.edge = ev.edge;
        if ev.edge.is_pinned() {
            self.scale = ev.grip;
            self.sim.set_spring(SpringParams {
                anchor: ev.anchor,
                period: ev.spring_period,
                damping_ratio: ev.spring_damping,
            });
            if !self.sim.is_attached(Force::Spring) && !self.gesture_active {
                self.sim.attach(Force::Spring);
            }
        } else {
            self.scale = self.options.scale;
            self.release_brake();
            if self.sim.is_attached(Force::Spring) {
                match self.layout.rest_anchor() {
                    Some(rest) => self.sim.set_spring(self.rest_spring(rest)),
                    None => self.sim.detach(Force::Spring),
                }
            }
        }

        self.events.push(if ev.is_on_edge() {
            ScrollEvent::OnEdge(ev)
        } else {
            ScrollEvent::OffEdge(ev)
        });
    }

    fn render(&mut self) -> Frame<ItemId<Q>> {
        self.validate_anchor();
        let Some(anchor) = self.anchor else {
            return Frame {
                position: self.position,
                records: Vec::new(),
            };
        };
        let velocity = self.velocity();
        let out = self
            .layout
            .render(&self.seq, anchor, self.position, velocity, self.viewport);
        if let Some(ev) = out.edge_event {
            self.handle_edge(ev);
        }
        Frame {
            position: self.position,
            records: out.records,
        }
    }
}
