//! Physics-driven scroll coordination for the `focusview` crate.
//!
//! `focusview` lays out a window of items for a given anchor and position. This crate owns
//! the moving parts around it:
//!
//! - a [`Simulation`] seam (one body; spring, drag and friction forces) with a reference
//!   [`PhysicsEngine`]
//! - [`ScrollCoordinator`], the state machine that turns gestures into inertial scrolling,
//!   edge rubber-banding and paged snapping, re-anchoring the window as items scroll by
//! - identity-based scroll anchors for keeping the surface on an item across data changes
//!
//! Like `focusview`, it is framework-agnostic and holds no UI objects.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod anchor;
mod coordinator;
mod error;
mod gesture;
mod options;
mod physics;


pub use anchor::{ScrollAnchor, capture_anchor, resolve_anchor};
pub use coordinator::{
    Frame, ItemId, PageChange, PagedView, ScrollCoordinator, ScrollEvent, ScrollView,
};
pub use error::NavigationError;
pub use gesture::GestureEvent;
pub use options::ScrollOptions;
pub use physics::{Force, PhysicsEngine, Simulation, SpringParams, StepOutcome};
