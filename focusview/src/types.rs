use alloc::string::ToString;
use alloc::vec::Vec;
use core::str::FromStr;

use crate::{ConfigError, Cursor};

/// The primary scroll axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Direction {
    X,
    #[default]
    Y,
}

impl Direction {
    /// Picks the component of `size` along this axis.
    pub fn main(self, size: Size) -> f64 {
        match self {
            Self::X => size.width,
            Self::Y => size.height,
        }
    }
}

impl FromStr for Direction {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("x") {
            Ok(Self::X)
        } else if s.eq_ignore_ascii_case("y") {
            Ok(Self::Y)
        } else {
            Err(ConfigError::InvalidDirection(s.to_string()))
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Whether the window currently touches a sequence boundary.
///
/// `First` and `Last` mean the surface is pinned against a boundary and a spring holds it
/// there. `Other` is a non-edge regime used while the surface moves faster than the
/// configured switch speed; `None` is free, slow scrolling.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EdgeState {
    First,
    #[default]
    None,
    Other,
    Last,
}

impl EdgeState {
    /// Returns `true` for `First` and `Last`.
    pub fn is_pinned(self) -> bool {
        matches!(self, Self::First | Self::Last)
    }
}

/// Emitted by a layout pass whenever the edge state changes.
///
/// `anchor` is the scroll position (in the anchor item's frame) at which a spring must be
/// placed to rest exactly on the boundary.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeEvent {
    pub edge: EdgeState,
    pub anchor: f64,
    /// Oscillation period of the edge spring, in milliseconds.
    pub spring_period: f64,
    pub spring_damping: f64,
    /// Gesture scale applied while pushing past the boundary.
    pub grip: f64,
}

impl EdgeEvent {
    /// `true` when this event enters an edge-like state (`onEdge`), `false` for `offEdge`.
    pub fn is_on_edge(&self) -> bool {
        self.edge != EdgeState::None
    }
}

/// One mounted item of a render pass.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RenderRecord<K> {
    /// Sequence index; renderers use it to look up the draw target.
    pub index: usize,
    pub id: K,
    /// Leading edge along the scroll axis, relative to the anchor's origin.
    pub offset: f64,
    /// Size along the scroll axis.
    pub size: f64,
}

impl<K> RenderRecord<K> {
    pub fn end(&self) -> f64 {
        self.offset + self.size
    }
}

/// Result of [`crate::WindowLayout::render`].
#[derive(Clone, Debug, PartialEq)]
pub struct RenderOutput<K> {
    /// Mounted items in ascending index order.
    pub records: Vec<RenderRecord<K>>,
    pub edge_event: Option<EdgeEvent>,
}

/// A re-anchoring decision produced by normalization.
///
/// Adding `offset` to the committed position keeps the visual position unchanged while the
/// reference frame moves to `anchor`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shift {
    pub anchor: Cursor,
    pub offset: f64,
}

/// Visibility signal passed to [`crate::Focusable`] items.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Visibility {
    /// The whole slot is inside the viewport.
    Full,
    /// Part of the slot is visible. An extent of `0` means mounted but scrolled out.
    Partial,
    /// The item is no longer mounted.
    Left,
}

/// Last reported visibility of a mounted item.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FocusRecord {
    pub index: usize,
    pub extent: f64,
    pub fully_visible: bool,
}
