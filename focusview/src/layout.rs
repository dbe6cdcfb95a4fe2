use alloc::vec::Vec;
use core::mem;

use crate::geometry::{abs, visible_extent};
use crate::key::FocusMap;
use crate::placement::{MAX_EMPTY_RUN, Packed, Paged, Placement};
use crate::{
    ConfigError, Cursor, EdgeEvent, EdgeState, FocusRecord, Item, ItemKey, LayoutOptions,
    RenderOutput, RenderRecord, Sequence, Shift, Size, Visibility,
};

/// Continuous scrolling layout.
pub type ScrollLayout<K> = WindowLayout<K, Packed>;

/// One-item-per-page carousel layout.
pub type PagedLayout<K> = WindowLayout<K, Paged>;

/// How far from its last known index an unmounted item is looked up for its final callback.
const LEFT_SEARCH_RADIUS: usize = 256;

/// A windowed layout over a traversable item sequence.
///
/// Given an anchor cursor and a scroll position relative to the anchor's leading edge, a
/// render pass mounts the items that fall within the viewport plus `margin`, reports
/// visibility changes to [`crate::Focusable`] items and tracks whether the window touches
/// either end of the sequence.
///
/// The layout keeps two pieces of state between passes: the last edge state (transitions
/// are reported once) and the focus map (so unmounted items get a final callback). It holds
/// no item data; sizes are read from the sequence on every pass.
#[derive(Clone, Debug)]
pub struct WindowLayout<K, P = Packed> {
    options: LayoutOptions,
    placement: P,
    edge: EdgeState,
    focus: FocusMap<K>,
}

impl<K: ItemKey, P: Placement + Default> Default for WindowLayout<K, P> {
    fn default() -> Self {
        Self {
            options: P::default_options(),
            placement: P::default(),
            edge: EdgeState::None,
            focus: FocusMap::new(),
        }
    }
}

impl<K: ItemKey, P: Placement + Default> WindowLayout<K, P> {
    pub fn new(options: LayoutOptions) -> Result<Self, ConfigError> {
        options.validate()?;
        Ok(Self {
            options,
            ..Self::default()
        })
    }
}

impl<K: ItemKey, P: Placement> WindowLayout<K, P> {
    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: LayoutOptions) -> Result<(), ConfigError> {
        options.validate()?;
        self.options = options;
        Ok(())
    }

    pub fn placement(&self) -> &P {
        &self.placement
    }

    pub fn edge_state(&self) -> EdgeState {
        self.edge
    }

    /// Reseeds the edge state to `None` and re-arms the placement, without emitting events.
    ///
    /// Used for programmatic jumps; the next render pass reports whatever edge it finds.
    pub fn reset(&mut self) {
        self.edge = EdgeState::None;
        self.placement.reset();
    }

    pub fn on_gesture_start(&mut self) {
        self.placement.on_gesture_start();
    }

    pub fn on_gesture_end(&mut self) {
        self.placement.on_gesture_end();
    }

    pub fn rest_anchor(&self) -> Option<f64> {
        self.placement.rest_anchor()
    }

    pub fn focus_record(&self, id: &K) -> Option<&FocusRecord> {
        self.focus.get(id)
    }

    /// Number of items that currently hold a focus record.
    pub fn focus_len(&self) -> usize {
        self.focus.len()
    }

    pub fn for_each_focus_record(&self, mut f: impl FnMut(&K, &FocusRecord)) {
        for (k, v) in self.focus.iter() {
            f(k, v);
        }
    }

    /// Returns the re-anchoring needed for `position`, if any.
    pub fn normalize<Q>(
        &mut self,
        seq: &Q,
        anchor: Cursor,
        position: f64,
        velocity: f64,
        viewport: Size,
    ) -> Option<Shift>
    where
        Q: Sequence + ?Sized,
    {
        let page = self.options.direction.main(viewport);
        let shift = self
            .placement
            .normalize(seq, anchor, position, velocity, page, &self.options);
        if let Some(shift) = shift {
            vdebug!(
                from = anchor.index(),
                to = shift.anchor.index(),
                offset = shift.offset,
                position,
                velocity,
                "normalized"
            );
        }
        shift
    }

    /// Runs one layout pass.
    ///
    /// A viewport without extent along the scroll axis mounts nothing and leaves all state
    /// untouched.
    pub fn render<Q>(
        &mut self,
        seq: &Q,
        anchor: Cursor,
        position: f64,
        velocity: f64,
        viewport: Size,
    ) -> RenderOutput<K>
    where
        Q: Sequence + ?Sized,
        Q::Item: Item<Id = K>,
    {
        let direction = self.options.direction;
        let page = direction.main(viewport);
        if page.is_nan() || page <= 0.0 {
            vdebug!(page, "render skipped: empty viewport");
            return RenderOutput {
                records: Vec::new(),
                edge_event: None,
            };
        }
        let margin = self.options.margin;
        let mut prev_focus = mem::take(&mut self.focus);

        // Forward from the anchor; always mount at least one item.
        let mut forward = Vec::new();
        let mut offset = 0.0;
        let mut empty_run = 0;
        let mut cursor = anchor.current(seq).map(|_| anchor);
        while let Some(c) = cursor {
            if !forward.is_empty() && offset + position >= page + margin {
                break;
            }
            if empty_run > MAX_EMPTY_RUN {
                vwarn!(index = c.index(), "forward walk stopped in a run of empty items");
                break;
            }
            let Some(item) = c.current(seq) else {
                cursor = None;
                break;
            };
            let size = direction.main(item.size());
            let slot = self.placement.slot(size, page);
            forward.push(RenderRecord {
                index: c.index(),
                id: item.id(),
                offset: offset + slot.lead,
                size,
            });
            self.track_focus(&mut prev_focus, c, item, position + offset, slot.advance, page);
            offset += slot.advance;
            empty_run = if slot.advance > 0.0 { 0 } else { empty_run + 1 };
            cursor = c.next(seq);
        }
        let last_reached = !forward.is_empty() && cursor.is_none() && offset + position <= page;
        let forward_extent = offset;

        // Backward from the anchor's predecessor; each item's trailing edge touches the
        // leading edge of the one after it.
        let mut backward = Vec::new();
        let mut cursor = anchor.previous(seq);
        let first_reached = !forward.is_empty() && cursor.is_none() && position >= 0.0;
        let mut offset = 0.0;
        let mut empty_run = 0;
        while let Some(c) = cursor {
            if offset + position <= -margin || empty_run > MAX_EMPTY_RUN {
                break;
            }
            let Some(item) = c.current(seq) else { break };
            let size = direction.main(item.size());
            let slot = self.placement.slot(size, page);
            let start = offset - slot.advance;
            backward.push(RenderRecord {
                index: c.index(),
                id: item.id(),
                offset: start + slot.lead,
                size,
            });
            self.track_focus(&mut prev_focus, c, item, position + start, slot.advance, page);
            offset = start;
            empty_run = if slot.advance > 0.0 { 0 } else { empty_run + 1 };
            cursor = c.previous(seq);
        }

        for (id, record) in prev_focus {
            let Some(item) = find_near(seq, record.index, &id) else {
                vdebug!(index = record.index, "unmounted item is gone; no final callback");
                continue;
            };
            if let Some(f) = item.focusable() {
                f.on_visibility_change(Visibility::Left, 0.0);
            }
        }

        backward.reverse();
        backward.append(&mut forward);

        let edge_event =
            self.transition(last_reached, first_reached, velocity, page - forward_extent);

        vtrace!(
            anchor = anchor.index(),
            position,
            velocity,
            mounted = backward.len(),
            "render"
        );

        RenderOutput {
            records: backward,
            edge_event,
        }
    }

    fn track_focus<I: Item<Id = K>>(
        &mut self,
        prev: &mut FocusMap<K>,
        cursor: Cursor,
        item: &I,
        start: f64,
        advance: f64,
        page: f64,
    ) {
        let extent = visible_extent(start, advance, page);
        let id = item.id();
        let previous = prev.remove(&id);
        if previous.is_none() && extent <= 0.0 {
            return;
        }

        let fully_visible = advance > 0.0 && extent >= advance;
        let record = FocusRecord {
            index: cursor.index(),
            extent,
            fully_visible,
        };
        let changed = previous.is_none_or(|p| p.extent != extent);
        if changed {
            if let Some(f) = item.focusable() {
                let visibility = if fully_visible {
                    Visibility::Full
                } else {
                    Visibility::Partial
                };
                f.on_visibility_change(visibility, extent);
            }
        }
        self.focus.insert(id, record);
    }

    /// Computes the next edge state; `Last` wins over `First` when both are reached.
    fn transition(
        &mut self,
        last_reached: bool,
        first_reached: bool,
        velocity: f64,
        last_anchor: f64,
    ) -> Option<EdgeEvent> {
        let (next, anchor) = if last_reached {
            (EdgeState::Last, last_anchor)
        } else if first_reached {
            (EdgeState::First, 0.0)
        } else if abs(velocity) > self.options.page_switch_speed {
            (EdgeState::Other, 0.0)
        } else {
            (EdgeState::None, 0.0)
        };

        if next == self.edge {
            return None;
        }
        if last_reached && first_reached {
            vwarn!(anchor, "window touches both ends; resolving toward the last edge");
        }
        vdebug!(from = ?self.edge, to = ?next, anchor, "edge transition");
        self.edge = next;
        Some(EdgeEvent {
            edge: next,
            anchor,
            spring_period: self.options.spring_period,
            spring_damping: self.options.spring_damping,
            grip: self.options.edge_grip,
        })
    }
}

/// Looks `id` up at `index` first, then at growing distances on both sides, since inserts
/// and removals since the last pass may have moved it.
fn find_near<'a, Q>(
    seq: &'a Q,
    index: usize,
    id: &<Q::Item as Item>::Id,
) -> Option<&'a Q::Item>
where
    Q: Sequence + ?Sized,
{
    let matches = move |i: usize| seq.get(i).filter(|it| it.id() == *id);
    if let Some(item) = matches(index) {
        return Some(item);
    }
    for d in 1..=LEFT_SEARCH_RADIUS {
        let after = index.checked_add(d).and_then(matches);
        let found = after.or_else(|| index.checked_sub(d).and_then(matches));
        if found.is_some() {
            return found;
        }
    }
    None
}
