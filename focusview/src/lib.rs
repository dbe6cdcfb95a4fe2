//! A headless windowed layout engine for inertial scroll and paged carousel surfaces.
//!
//! For the physics-driven scroll coordinator (gestures, springs, origin shifts), see the
//! `focusview-adapter` crate.
//!
//! This crate focuses on the per-frame layout math: given an anchor item in a lazily
//! traversable sequence and a scroll position relative to that anchor, it mounts only the
//! items within the viewport plus a margin, reports per-item visibility, detects when the
//! first/last item is reached and decides when the anchor should move to a neighbor.
//!
//! It is UI-agnostic. A host is expected to provide:
//! - an item store implementing [`Sequence`]
//! - the viewport size
//! - the scroll position and velocity (usually from `focusview-adapter`)
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod error;
pub mod geometry;
mod key;
mod layout;
mod options;
mod placement;
mod sequence;
mod state;
mod types;

#[cfg(test)]
mod tests;

pub use error::ConfigError;
pub use key::ItemKey;
pub use layout::{PagedLayout, ScrollLayout, WindowLayout};
pub use options::LayoutOptions;
pub use placement::{Packed, Paged, Placement, Slot};
pub use sequence::{Cursor, Focusable, Item, Sequence};
pub use state::ScrollState;
pub use types::{
    Direction, EdgeEvent, EdgeState, FocusRecord, RenderOutput, RenderRecord, Shift, Size,
    Visibility,
};
