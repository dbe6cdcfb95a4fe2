use crate::EdgeState;

/// A lightweight, serializable snapshot of a scroll surface.
///
/// `position` is relative to the anchor item's leading edge; `anchor` is the anchor's
/// sequence index (`None` when no sequence is attached).
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollState {
    pub position: f64,
    pub velocity: f64,
    pub anchor: Option<usize>,
    pub edge: EdgeState,
}
