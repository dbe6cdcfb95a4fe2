use crate::geometry::abs;
use crate::{Cursor, Item, LayoutOptions, Sequence, Shift};

/// Longest run of consecutive items without extent that a single walk will cross.
pub(crate) const MAX_EMPTY_RUN: usize = 256;

/// Where an item sits inside the window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Slot {
    /// Distance from the slot's leading edge to the item's leading edge.
    pub lead: f64,
    /// How far the window advances past this item.
    pub advance: f64,
}

/// Per-variant placement and re-anchoring rules for [`crate::WindowLayout`].
///
/// The windowing walk, visibility tracking and edge detection are shared; a placement only
/// decides how big each slot is and when the anchor should move to a neighbor.
pub trait Placement {
    fn default_options() -> LayoutOptions;

    fn slot(&self, item_size: f64, page_size: f64) -> Slot;

    /// Decides whether `position` has carried the window into a neighbor's territory.
    ///
    /// At most one (possibly multi-item) shift is returned per call.
    fn normalize<Q: Sequence + ?Sized>(
        &mut self,
        seq: &Q,
        anchor: Cursor,
        position: f64,
        velocity: f64,
        page_size: f64,
        options: &LayoutOptions,
    ) -> Option<Shift>;

    /// Called when a new gesture starts.
    fn on_gesture_start(&mut self) {}

    /// Called when the gesture releases the surface to the simulation.
    fn on_gesture_end(&mut self) {}

    /// Forgets all per-gesture state.
    fn reset(&mut self) {}

    /// Position the surface should spring to when it is not pinned to an edge.
    fn rest_anchor(&self) -> Option<f64> {
        None
    }
}

/// Continuous scrolling: items are stacked edge to edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Packed;

impl Placement for Packed {
    fn default_options() -> LayoutOptions {
        LayoutOptions::scroll()
    }

    fn slot(&self, item_size: f64, _page_size: f64) -> Slot {
        Slot {
            lead: 0.0,
            advance: item_size,
        }
    }

    fn normalize<Q: Sequence + ?Sized>(
        &mut self,
        seq: &Q,
        anchor: Cursor,
        mut position: f64,
        _velocity: f64,
        _page_size: f64,
        options: &LayoutOptions,
    ) -> Option<Shift> {
        let main = |c: Cursor| c.current(seq).map(|it| options.direction.main(it.size()));

        let mut cursor = anchor;
        let mut offset = 0.0;
        let mut empty_run = 0;
        loop {
            let size = main(cursor)?;
            let step = if position < -size {
                let Some(next) = cursor.next(seq) else { break };
                position += size;
                offset += size;
                cursor = next;
                size
            } else if position > 0.0 {
                let Some(prev) = cursor.previous(seq) else { break };
                let prev_size = main(prev)?;
                position -= prev_size;
                offset -= prev_size;
                cursor = prev;
                prev_size
            } else {
                break;
            };
            empty_run = if step > 0.0 { 0 } else { empty_run + 1 };
            if empty_run > MAX_EMPTY_RUN {
                vwarn!(index = cursor.index(), "normalize stopped in a run of empty items");
                break;
            }
        }

        (cursor != anchor).then_some(Shift {
            anchor: cursor,
            offset,
        })
    }
}

/// One item per page, centered in a viewport-sized slot.
///
/// While a gesture holds the surface, the anchor follows the page under the finger: a fast
/// sample switches once toward the motion, and slow motion switches past half a page. Once
/// a switched surface is released, the snap spring owns the remaining travel and the anchor
/// only moves if a whole page scrolls by.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Paged {
    switched: bool,
    dragging: bool,
}

impl Paged {
    /// Whether the velocity page switch has fired since the last gesture start.
    pub fn has_switched(&self) -> bool {
        self.switched
    }
}

impl Placement for Paged {
    fn default_options() -> LayoutOptions {
        LayoutOptions::paged()
    }

    fn slot(&self, item_size: f64, page_size: f64) -> Slot {
        Slot {
            lead: (page_size - item_size) / 2.0,
            advance: page_size,
        }
    }

    fn normalize<Q: Sequence + ?Sized>(
        &mut self,
        seq: &Q,
        anchor: Cursor,
        mut position: f64,
        velocity: f64,
        page_size: f64,
        options: &LayoutOptions,
    ) -> Option<Shift> {
        if page_size.is_nan() || page_size <= 0.0 || anchor.current(seq).is_none() {
            return None;
        }

        let fast = abs(velocity) > options.page_switch_speed;
        if fast && !self.switched && abs(position) < page_size {
            // Switch once per gesture toward the motion, regardless of position.
            self.switched = true;
            let target = if velocity < 0.0 {
                anchor.next(seq).map(|c| (c, page_size))
            } else {
                anchor.previous(seq).map(|c| (c, -page_size))
            };
            let (cursor, offset) = target?;
            vtrace!(from = anchor.index(), to = cursor.index(), velocity, "velocity page switch");
            return Some(Shift {
                anchor: cursor,
                offset,
            });
        }

        let threshold = if !fast && (self.dragging || !self.switched) {
            page_size / 2.0
        } else {
            page_size
        };
        let mut cursor = anchor;
        let mut offset = 0.0;
        loop {
            if position < -threshold {
                let Some(next) = cursor.next(seq) else { break };
                position += page_size;
                offset += page_size;
                cursor = next;
            } else if position > threshold {
                let Some(prev) = cursor.previous(seq) else { break };
                position -= page_size;
                offset -= page_size;
                cursor = prev;
            } else {
                break;
            }
        }

        (cursor != anchor).then_some(Shift {
            anchor: cursor,
            offset,
        })
    }

    fn on_gesture_start(&mut self) {
        self.switched = false;
        self.dragging = true;
    }

    fn on_gesture_end(&mut self) {
        self.dragging = false;
    }

    fn reset(&mut self) {
        *self = Self::default();
    }

    fn rest_anchor(&self) -> Option<f64> {
        Some(0.0)
    }
}
