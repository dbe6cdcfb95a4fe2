use crate::*;

use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use proptest::prelude::*;

#[derive(Debug)]
struct Card {
    id: u32,
    size: Cell<f64>,
    seen: RefCell<Vec<(Visibility, f64)>>,
}

impl Card {
    fn new(id: u32, size: f64) -> Self {
        Self {
            id,
            size: Cell::new(size),
            seen: RefCell::new(Vec::new()),
        }
    }

    fn take_seen(&self) -> Vec<(Visibility, f64)> {
        self.seen.borrow_mut().drain(..).collect()
    }
}

impl Item for Card {
    type Id = u32;

    fn id(&self) -> u32 {
        self.id
    }

    fn size(&self) -> Size {
        Size::new(40.0, self.size.get())
    }

    fn focusable(&self) -> Option<&dyn Focusable> {
        Some(self)
    }
}

impl Focusable for Card {
    fn on_visibility_change(&self, visibility: Visibility, extent: f64) {
        self.seen.borrow_mut().push((visibility, extent));
    }
}

/// An item without the focus capability.
struct Plain(u64, f64);

impl Item for Plain {
    type Id = u64;

    fn id(&self) -> u64 {
        self.0
    }

    fn size(&self) -> Size {
        Size::new(self.1, self.1)
    }
}

fn cards(sizes: &[f64]) -> Vec<Card> {
    sizes
        .iter()
        .enumerate()
        .map(|(i, &s)| Card::new(i as u32, s))
        .collect()
}

const VIEW: Size = Size::new(40.0, 250.0);

fn tight() -> ScrollLayout<u32> {
    ScrollLayout::new(LayoutOptions::scroll().with_margin(0.0)).unwrap()
}

fn at(seq: &[Card], index: usize) -> Cursor {
    Cursor::at(seq, index).unwrap()
}

#[test]
fn five_items_at_origin_mount_three_and_touch_first_edge() {
    let seq = cards(&[100.0; 5]);
    let mut layout = tight();

    let out = layout.render(&seq, at(&seq, 0), 0.0, 0.0, VIEW);

    let indexes: Vec<usize> = out.records.iter().map(|r| r.index).collect();
    let offsets: Vec<f64> = out.records.iter().map(|r| r.offset).collect();
    assert_eq!(indexes, [0, 1, 2]);
    assert_eq!(offsets, [0.0, 100.0, 200.0]);

    assert_eq!(layout.focus_record(&0).unwrap().extent, 100.0);
    assert_eq!(layout.focus_record(&1).unwrap().extent, 100.0);
    assert_eq!(layout.focus_record(&2).unwrap().extent, 50.0);
    assert!(layout.focus_record(&2).is_some_and(|r| !r.fully_visible));

    let ev = out.edge_event.unwrap();
    assert_eq!(ev.edge, EdgeState::First);
    assert_eq!(ev.anchor, 0.0);
    assert_eq!(layout.edge_state(), EdgeState::First);
}

#[test]
fn normalization_combines_multi_item_shifts() {
    let seq = cards(&[100.0; 5]);
    let mut layout = tight();

    let shift = layout.normalize(&seq, at(&seq, 0), -260.0, 0.0, VIEW).unwrap();
    assert_eq!(shift.anchor.index(), 2);
    assert_eq!(shift.offset, 200.0);
    assert_eq!(-260.0 + shift.offset, -60.0);

    // Idempotent: the re-anchored position needs no further shift.
    assert!(layout.normalize(&seq, shift.anchor, -60.0, 0.0, VIEW).is_none());
}

#[test]
fn normalization_steps_back_with_predecessor_sizes() {
    let seq = cards(&[50.0, 80.0, 120.0, 100.0]);
    let mut layout = tight();

    let shift = layout.normalize(&seq, at(&seq, 3), 130.0, 0.0, VIEW).unwrap();
    // 130 - 120 = 10 > 0, 10 - 80 = -70.
    assert_eq!(shift.anchor.index(), 1);
    assert_eq!(shift.offset, -200.0);

    // Nothing before the first item.
    assert!(layout.normalize(&seq, at(&seq, 0), 40.0, 0.0, VIEW).is_none());
}

#[test]
fn trailing_items_report_last_edge_with_spring_anchor() {
    let seq = cards(&[100.0; 5]);
    let mut layout = tight();

    let out = layout.render(&seq, at(&seq, 3), 0.0, 0.0, VIEW);
    let ev = out.edge_event.unwrap();
    assert_eq!(ev.edge, EdgeState::Last);
    // Remaining content is 200 in a 250 viewport.
    assert_eq!(ev.anchor, 50.0);
    assert_eq!(ev.grip, 0.2);
    assert_eq!(ev.spring_period, 300.0);
}

#[test]
fn short_sequences_resolve_toward_last() {
    let seq = cards(&[100.0, 100.0]);
    let mut layout = tight();

    let out = layout.render(&seq, at(&seq, 0), 0.0, 0.0, VIEW);
    let ev = out.edge_event.unwrap();
    assert_eq!(ev.edge, EdgeState::Last);
    assert_eq!(ev.anchor, 50.0);
}

#[test]
fn fast_motion_away_from_edges_enters_other() {
    let seq = cards(&[100.0; 20]);
    let mut layout = tight();

    let out = layout.render(&seq, at(&seq, 5), -10.0, -3.0, VIEW);
    let ev = out.edge_event.unwrap();
    assert_eq!(ev.edge, EdgeState::Other);
    assert!(ev.is_on_edge());

    assert!(layout.render(&seq, at(&seq, 5), -20.0, -2.0, VIEW).edge_event.is_none());

    let ev = layout
        .render(&seq, at(&seq, 5), -25.0, -0.2, VIEW)
        .edge_event
        .unwrap();
    assert_eq!(ev.edge, EdgeState::None);
    assert!(!ev.is_on_edge());
}

#[test]
fn each_edge_crossing_emits_exactly_one_event() {
    let seq = cards(&[100.0; 10]);
    let mut layout = tight();
    let mut events = Vec::new();

    for position in [0.0, 0.0, -30.0, -60.0, -90.0, -40.0, 0.0, 0.0, 12.0] {
        if let Some(ev) = layout.render(&seq, at(&seq, 0), position, 0.0, VIEW).edge_event {
            events.push(ev.edge);
        }
    }

    assert_eq!(
        events,
        [EdgeState::First, EdgeState::None, EdgeState::First]
    );
}

#[test]
fn focus_changes_are_reported_once_per_change() {
    let seq = cards(&[100.0; 5]);
    let mut layout = tight();

    layout.render(&seq, at(&seq, 0), 0.0, 0.0, VIEW);
    assert_eq!(seq[0].take_seen(), [(Visibility::Full, 100.0)]);
    assert_eq!(seq[1].take_seen(), [(Visibility::Full, 100.0)]);
    assert_eq!(seq[2].take_seen(), [(Visibility::Partial, 50.0)]);
    assert!(seq[3].take_seen().is_empty());

    // Same pass again: nothing changed.
    layout.render(&seq, at(&seq, 0), 0.0, 0.0, VIEW);
    for card in &seq {
        assert!(card.take_seen().is_empty());
    }

    layout.render(&seq, at(&seq, 0), -20.0, 0.0, VIEW);
    assert_eq!(seq[0].take_seen(), [(Visibility::Partial, 80.0)]);
    assert!(seq[1].take_seen().is_empty());
    assert_eq!(seq[2].take_seen(), [(Visibility::Partial, 70.0)]);
}

#[test]
fn unmounted_items_get_a_single_left_callback() {
    let seq = cards(&[100.0; 6]);
    let mut layout = tight();

    layout.render(&seq, at(&seq, 0), 0.0, 0.0, VIEW);
    seq.iter().for_each(|c| drop(c.take_seen()));

    layout.render(&seq, at(&seq, 3), 0.0, 0.0, VIEW);
    for i in 0..3 {
        assert_eq!(seq[i].take_seen(), [(Visibility::Left, 0.0)], "item {i}");
    }

    layout.render(&seq, at(&seq, 3), 0.0, 0.0, VIEW);
    for i in 0..3 {
        assert!(seq[i].take_seen().is_empty());
    }
}

#[test]
fn items_moved_by_inserts_still_get_their_left_callback() {
    let old = cards(&[100.0; 5]);
    let mut layout = tight();
    layout.render(&old, at(&old, 0), 0.0, 0.0, VIEW);

    // Ten newer items land above; the previously visible ones move to 10..13.
    let new: Vec<Card> = (100..110)
        .map(|id| Card::new(id, 100.0))
        .chain((0..5).map(|id| Card::new(id, 100.0)))
        .collect();
    layout.render(&new, at(&new, 0), 0.0, 0.0, VIEW);

    for i in 10..13 {
        assert_eq!(new[i].take_seen(), [(Visibility::Left, 0.0)], "item {i}");
    }
    assert!(new[13].take_seen().is_empty());
    assert!(layout.focus_record(&0).is_none());
    assert_eq!(layout.focus_len(), 3);
}

#[test]
fn empty_viewport_mounts_nothing() {
    let seq = cards(&[50.0; 5000]);
    let mut layout = PagedLayout::<u32>::default();

    let out = layout.render(&seq, at(&seq, 0), 0.0, 0.0, Size::default());
    assert!(out.records.is_empty());
    assert!(out.edge_event.is_none());
    assert_eq!(layout.focus_len(), 0);
    assert_eq!(layout.edge_state(), EdgeState::None);
    assert!(layout.normalize(&seq, at(&seq, 0), -400.0, 0.0, Size::default()).is_none());
}

/// Every index holds the same item.
struct Endless(Plain);

impl Sequence for Endless {
    type Item = Plain;

    fn get(&self, _index: usize) -> Option<&Plain> {
        Some(&self.0)
    }
}

#[test]
fn runs_of_empty_items_do_not_stall_the_walk() {
    let seq = Endless(Plain(7, 0.0));
    let anchor = Cursor::first(&seq).unwrap();
    let mut layout = ScrollLayout::<u64>::new(LayoutOptions::scroll().with_margin(0.0)).unwrap();

    let out = layout.render(&seq, anchor, 0.0, 0.0, VIEW);
    assert_eq!(out.records.len(), crate::placement::MAX_EMPTY_RUN + 1);
    assert!(out.edge_event.is_some());

    let shift = layout.normalize(&seq, anchor, -10.0, 0.0, VIEW).unwrap();
    assert_eq!(shift.offset, 0.0);
    assert!(shift.anchor.index() > 0);
}

#[test]
fn mounted_but_scrolled_out_items_report_zero_extent() {
    let seq = cards(&[100.0; 6]);
    let mut layout = ScrollLayout::<u32>::default();

    layout.render(&seq, at(&seq, 0), 0.0, 0.0, VIEW);
    seq[0].take_seen();

    // Not normalized: the anchor is above the viewport but still mounted.
    let out = layout.render(&seq, at(&seq, 0), -150.0, 0.0, VIEW);
    assert!(out.records.iter().any(|r| r.index == 0));
    assert_eq!(seq[0].take_seen(), [(Visibility::Partial, 0.0)]);
    assert_eq!(layout.focus_record(&0).unwrap().extent, 0.0);
}

#[test]
fn backward_walk_places_trailing_edges_flush() {
    let seq = cards(&[30.0, 60.0, 90.0, 100.0, 100.0]);
    let mut layout = ScrollLayout::<u32>::default();

    let out = layout.render(&seq, at(&seq, 3), -10.0, 0.0, VIEW);
    let before: Vec<(usize, f64)> = out
        .records
        .iter()
        .filter(|r| r.index < 3)
        .map(|r| (r.index, r.offset))
        .collect();
    assert_eq!(before, [(0, -180.0), (1, -150.0), (2, -90.0)]);

    // Records come back in index order with no gaps.
    for pair in out.records.windows(2) {
        assert_eq!(pair[0].index + 1, pair[1].index);
        assert_eq!(pair[0].end(), pair[1].offset);
    }
}

#[test]
fn margin_keeps_nearby_items_mounted() {
    let seq = cards(&[100.0; 40]);
    let mut layout =
        ScrollLayout::<u32>::new(LayoutOptions::scroll().with_margin(300.0)).unwrap();

    let out = layout.render(&seq, at(&seq, 10), -50.0, 0.0, VIEW);
    let first = out.records.first().unwrap().index;
    let last = out.records.last().unwrap().index;
    // Backward: stop once past -300. Forward: stop once past 250 + 300.
    assert_eq!(first, 7);
    assert_eq!(last, 15);
}

#[test]
fn oversized_anchor_is_always_mounted() {
    let seq = cards(&[1000.0, 100.0]);
    let mut layout = tight();

    let out = layout.render(&seq, at(&seq, 0), -100.0, 0.0, VIEW);
    assert_eq!(out.records.len(), 1);
    assert_eq!(layout.focus_record(&0).unwrap().extent, 250.0);
    assert!(!layout.focus_record(&0).unwrap().fully_visible);
}

#[test]
fn size_changes_are_picked_up_on_the_next_pass() {
    let seq = cards(&[100.0; 5]);
    let mut layout = tight();

    layout.render(&seq, at(&seq, 0), 0.0, 0.0, VIEW);
    seq[0].size.set(200.0);
    let out = layout.render(&seq, at(&seq, 0), 0.0, 0.0, VIEW);
    let offsets: Vec<f64> = out.records.iter().map(|r| r.offset).collect();
    assert_eq!(offsets, [0.0, 200.0]);
    assert_eq!(layout.focus_record(&1).unwrap().extent, 50.0);
}

#[test]
fn horizontal_direction_reads_widths() {
    let seq = [Plain(1, 80.0), Plain(2, 80.0), Plain(3, 80.0)];
    let mut layout: ScrollLayout<u64> = ScrollLayout::new(
        LayoutOptions::scroll()
            .with_direction(Direction::X)
            .with_margin(0.0),
    )
    .unwrap();

    let view = Size::new(200.0, 10.0);
    let out = layout.render(&seq[..], Cursor::first(&seq[..]).unwrap(), 0.0, 0.0, view);
    assert_eq!(out.records.len(), 3);
    assert_eq!(out.records[2].offset, 160.0);
    assert_eq!(layout.focus_len(), 3);
}

#[test]
fn paged_items_are_centered_in_page_slots() {
    let seq = cards(&[50.0, 150.0, 250.0]);
    let mut layout = PagedLayout::<u32>::new(LayoutOptions::paged().with_margin(0.0)).unwrap();

    let out = layout.render(&seq, at(&seq, 0), 0.0, 0.0, VIEW);
    assert_eq!(out.records.len(), 1);
    assert_eq!(out.records[0].offset, 100.0);
    assert_eq!(layout.focus_record(&0).unwrap().extent, 250.0);
    assert!(layout.focus_record(&0).unwrap().fully_visible);

    let out = layout.render(&seq, at(&seq, 1), -100.0, 0.0, VIEW);
    let offsets: Vec<(usize, f64)> = out.records.iter().map(|r| (r.index, r.offset)).collect();
    assert_eq!(offsets, [(1, 50.0), (2, 250.0)]);
}

#[test]
fn paged_last_edge_rests_on_the_final_page() {
    let seq = cards(&[50.0; 3]);
    let mut layout = PagedLayout::<u32>::new(LayoutOptions::paged().with_margin(0.0)).unwrap();

    let ev = layout.render(&seq, at(&seq, 2), 0.0, 0.0, VIEW).edge_event.unwrap();
    assert_eq!(ev.edge, EdgeState::Last);
    assert_eq!(ev.anchor, 0.0);
    assert_eq!(ev.spring_period, 400.0);
}

#[test]
fn paged_velocity_switch_fires_once_per_gesture() {
    let seq = cards(&[50.0; 5]);
    let mut layout = PagedLayout::<u32>::default();
    let anchor = at(&seq, 1);

    let shift = layout.normalize(&seq, anchor, -10.0, -2.0, VIEW).unwrap();
    assert_eq!(shift.anchor.index(), 2);
    assert_eq!(shift.offset, 250.0);
    assert!(layout.placement().has_switched());

    assert!(layout.normalize(&seq, shift.anchor, 240.0, -2.0, VIEW).is_none());
    // Slow again, no gesture holds the surface: the snap spring owns the rest of the travel.
    assert!(layout.normalize(&seq, shift.anchor, 200.0, -0.5, VIEW).is_none());

    layout.on_gesture_start();
    let back = layout.normalize(&seq, shift.anchor, 10.0, 2.0, VIEW).unwrap();
    assert_eq!(back.anchor.index(), 1);
    assert_eq!(back.offset, -250.0);
}

#[test]
fn paged_slow_drag_after_a_velocity_switch_follows_the_finger() {
    let seq = cards(&[50.0; 6]);
    let mut layout = PagedLayout::<u32>::default();
    layout.on_gesture_start();

    let fast = layout.normalize(&seq, at(&seq, 2), -10.0, -2.0, VIEW).unwrap();
    assert_eq!(fast.anchor.index(), 3);

    // The finger slows down while still near the previous page.
    let back = layout.normalize(&seq, fast.anchor, 230.0, -0.1, VIEW).unwrap();
    assert_eq!(back.anchor.index(), 2);
    assert_eq!(back.offset, -250.0);

    let again = layout.normalize(&seq, at(&seq, 2), -130.0, -0.1, VIEW).unwrap();
    assert_eq!(again.anchor.index(), 3);

    // Released: the snap spring brings it home unless a whole page scrolls by.
    layout.on_gesture_end();
    assert!(layout.normalize(&seq, at(&seq, 3), 200.0, -0.5, VIEW).is_none());
    let far = layout.normalize(&seq, at(&seq, 3), 260.0, -0.5, VIEW).unwrap();
    assert_eq!(far.anchor.index(), 2);

    layout.reset();
    assert!(!layout.placement().has_switched());
}

#[test]
fn paged_slow_motion_switches_past_half_a_page() {
    let seq = cards(&[50.0; 5]);
    let mut layout = PagedLayout::<u32>::default();

    assert!(layout.normalize(&seq, at(&seq, 2), -120.0, 0.0, VIEW).is_none());
    let shift = layout.normalize(&seq, at(&seq, 2), -130.0, 0.0, VIEW).unwrap();
    assert_eq!(shift.anchor.index(), 3);
    assert_eq!(shift.offset, 250.0);

    let shift = layout.normalize(&seq, at(&seq, 2), 400.0, 0.0, VIEW).unwrap();
    assert_eq!(shift.anchor.index(), 0);
    assert_eq!(shift.offset, -500.0);
    assert_eq!(layout.rest_anchor(), Some(0.0));
}

#[test]
fn reset_reseeds_none_without_an_event() {
    let seq = cards(&[100.0; 5]);
    let mut layout = tight();

    assert!(layout.render(&seq, at(&seq, 0), 0.0, 0.0, VIEW).edge_event.is_some());
    layout.reset();
    assert_eq!(layout.edge_state(), EdgeState::None);
    let ev = layout.render(&seq, at(&seq, 0), 0.0, 0.0, VIEW).edge_event.unwrap();
    assert_eq!(ev.edge, EdgeState::First);
}

#[test]
fn cursor_seek_walks_and_reports_the_reachable_end() {
    let seq = cards(&[10.0; 4]);
    let c = at(&seq, 1);
    assert_eq!(c.seek(&seq, 3).unwrap().index(), 3);
    assert_eq!(c.seek(&seq, 0).unwrap().index(), 0);
    assert_eq!(c.seek(&seq, 9).unwrap_err().index(), 3);
    assert!(at(&seq, 3).next(&seq).is_none());
    assert!(at(&seq, 0).previous(&seq).is_none());
    assert_eq!(at(&seq, 2).current(&seq).unwrap().id, 2);
}

#[test]
fn options_are_validated_not_clamped() {
    assert_eq!(
        LayoutOptions::scroll().with_margin(-1.0).validate(),
        Err(ConfigError::Negative {
            name: "margin",
            value: -1.0
        })
    );
    assert_eq!(
        LayoutOptions::scroll().with_edge_grip(1.5).validate(),
        Err(ConfigError::InvalidEdgeGrip(1.5))
    );
    assert_eq!(
        LayoutOptions::scroll().with_spring(0.0, 1.0).validate(),
        Err(ConfigError::InvalidSpringPeriod(0.0))
    );
    assert!(ScrollLayout::<u32>::new(LayoutOptions::scroll().with_page_switch_speed(f64::NAN)).is_err());
    assert!(LayoutOptions::paged().validate().is_ok());
}

#[test]
fn direction_parses_axis_names() {
    assert_eq!("x".parse::<Direction>(), Ok(Direction::X));
    assert_eq!("Y".parse::<Direction>(), Ok(Direction::Y));
    assert_eq!(
        "z".parse::<Direction>(),
        Err(ConfigError::InvalidDirection("z".into()))
    );
}

proptest! {
    #[test]
    fn visible_extents_fit_the_viewport(
        sizes in prop::collection::vec(1.0f64..400.0, 1..40),
        anchor in 0usize..40,
        position in -300.0f64..300.0,
        viewport in 1.0f64..800.0,
    ) {
        let seq = cards(&sizes);
        let anchor = Cursor::at(&seq, anchor % sizes.len()).unwrap();
        let mut layout = ScrollLayout::<u32>::default();
        let view = Size::new(1.0, viewport);

        let out = layout.render(&seq, anchor, position, 0.0, view);
        prop_assert!(!out.records.is_empty());

        let mut total = 0.0;
        layout.for_each_focus_record(|id, record| {
            assert!(record.extent <= sizes[*id as usize] + 1e-9);
            total += record.extent;
        });
        prop_assert!(total <= viewport + 1e-6);

        for pair in out.records.windows(2) {
            prop_assert_eq!(pair[0].index + 1, pair[1].index);
            prop_assert!((pair[0].end() - pair[1].offset).abs() < 1e-6);
        }
    }

    #[test]
    fn normalization_never_shifts_twice(
        sizes in prop::collection::vec(1.0f64..300.0, 1..30),
        anchor in 0usize..30,
        position in -2000.0f64..2000.0,
    ) {
        let seq = cards(&sizes);
        let anchor = Cursor::at(&seq, anchor % sizes.len()).unwrap();
        let mut layout = ScrollLayout::<u32>::default();

        let (anchor, position) = match layout.normalize(&seq, anchor, position, 0.0, VIEW) {
            Some(shift) => (shift.anchor, position + shift.offset),
            None => (anchor, position),
        };
        prop_assert!(layout.normalize(&seq, anchor, position, 0.0, VIEW).is_none());
    }

    #[test]
    fn every_focus_change_is_reported_exactly_once(
        sizes in prop::collection::vec(10.0f64..200.0, 2..30),
        steps in prop::collection::vec(-120.0f64..120.0, 1..25),
    ) {
        let seq = cards(&sizes);
        let mut layout =
            ScrollLayout::<u32>::new(LayoutOptions::scroll().with_margin(0.0)).unwrap();
        let mut anchor = Cursor::first(&seq).unwrap();
        let mut position = 0.0;
        let mut last_seen: Vec<Option<f64>> = alloc::vec![None; sizes.len()];

        layout.render(&seq, anchor, position, 0.0, VIEW);
        for step in steps {
            for (i, card) in seq.iter().enumerate() {
                if let Some(&(v, e)) = card.take_seen().last() {
                    last_seen[i] = (v != Visibility::Left).then_some(e);
                }
            }

            position += step;
            if let Some(shift) = layout.normalize(&seq, anchor, position, 0.0, VIEW) {
                anchor = shift.anchor;
                position += shift.offset;
            }
            layout.render(&seq, anchor, position, 0.0, VIEW);

            for (i, card) in seq.iter().enumerate() {
                let seen = card.seen.borrow();
                prop_assert!(seen.len() <= 1, "item {} got {:?}", i, *seen);
                let now = layout.focus_record(&(i as u32)).map(|r| r.extent);
                match seen.first() {
                    Some(&(Visibility::Left, extent)) => {
                        prop_assert_eq!(extent, 0.0);
                        prop_assert!(last_seen[i].is_some());
                        prop_assert!(now.is_none());
                    }
                    Some(&(_, extent)) => {
                        prop_assert_eq!(Some(extent), now);
                        prop_assert_ne!(Some(extent), last_seen[i]);
                    }
                    None => prop_assert_eq!(now, last_seen[i]),
                }
            }
        }
    }
}
