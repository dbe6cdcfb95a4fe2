use alloc::rc::Rc;
use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::{ItemKey, Size, Visibility};

/// Optional capability for items that want visibility callbacks.
pub trait Focusable {
    /// Called when the visible extent of the item changes, and once with
    /// [`Visibility::Left`] when it is unmounted.
    fn on_visibility_change(&self, visibility: Visibility, extent: f64);
}

/// An externally owned item.
pub trait Item {
    type Id: ItemKey;

    fn id(&self) -> Self::Id;

    /// Current size. Read on every pass; layouts never cache it.
    fn size(&self) -> Size;

    fn focusable(&self) -> Option<&dyn Focusable> {
        None
    }
}

/// An indexable item store.
///
/// Unbounded stores answer `Some` for every index they can produce; traversal stops at the
/// first `None`.
pub trait Sequence {
    type Item: Item;

    fn get(&self, index: usize) -> Option<&Self::Item>;
}

impl<T: Item> Sequence for [T] {
    type Item = T;

    fn get(&self, index: usize) -> Option<&T> {
        <[T]>::get(self, index)
    }
}

impl<T: Item> Sequence for Vec<T> {
    type Item = T;

    fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }
}

impl<Q: Sequence + ?Sized> Sequence for &Q {
    type Item = Q::Item;

    fn get(&self, index: usize) -> Option<&Self::Item> {
        (**self).get(index)
    }
}

impl<Q: Sequence + ?Sized> Sequence for Rc<Q> {
    type Item = Q::Item;

    fn get(&self, index: usize) -> Option<&Self::Item> {
        (**self).get(index)
    }
}

impl<Q: Sequence + ?Sized> Sequence for Arc<Q> {
    type Item = Q::Item;

    fn get(&self, index: usize) -> Option<&Self::Item> {
        (**self).get(index)
    }
}

/// A position in a [`Sequence`].
///
/// Cursors are plain values: navigation returns a new cursor and never mutates the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cursor {
    index: usize,
}

impl Cursor {
    /// Returns a cursor at `index` if the store has an item there.
    pub fn at<Q: Sequence + ?Sized>(seq: &Q, index: usize) -> Option<Self> {
        seq.get(index).map(|_| Self { index })
    }

    pub fn first<Q: Sequence + ?Sized>(seq: &Q) -> Option<Self> {
        Self::at(seq, 0)
    }

    pub fn index(self) -> usize {
        self.index
    }

    pub fn current<Q: Sequence + ?Sized>(self, seq: &Q) -> Option<&Q::Item> {
        seq.get(self.index)
    }

    pub fn next<Q: Sequence + ?Sized>(self, seq: &Q) -> Option<Self> {
        Self::at(seq, self.index.checked_add(1)?)
    }

    pub fn previous<Q: Sequence + ?Sized>(self, seq: &Q) -> Option<Self> {
        Self::at(seq, self.index.checked_sub(1)?)
    }

    /// Walks one item at a time until reaching `target`.
    ///
    /// On failure returns the last cursor that was reached.
    pub fn seek<Q: Sequence + ?Sized>(self, seq: &Q, target: usize) -> Result<Self, Self> {
        let mut cur = self;
        while cur.index != target {
            let step = if cur.index < target {
                cur.next(seq)
            } else {
                cur.previous(seq)
            };
            cur = step.ok_or(cur)?;
        }
        Ok(cur)
    }
}
