//! Focus sequencer.
//!
//! Tracks the FocusCursor over an explicit, build-once ordering of every
//! segment in the form and moves it one step at a time:
//!
//! - a write that fills a segment moves focus forward
//! - a write that empties a segment moves focus back
//! - anything else leaves focus alone
//!
//! The cursor saturates at both ends. Each actual move is reported to a
//! [`FocusSink`], the render layer's handle for giving a widget input focus.
//!
//! ```
//! use card_entry::core::{Field, SegmentId};
//! use card_entry::focus::FocusSequencer;
//!
//! let order = vec![
//!     SegmentId::new(Field::Cvc, 0),
//!     SegmentId::new(Field::Password, 0),
//! ];
//! let mut focus = FocusSequencer::new(order);
//! let mut moves: Vec<SegmentId> = Vec::new();
//!
//! focus.advance(&mut moves);
//! focus.advance(&mut moves); // already last: no-op
//!
//! assert_eq!(focus.cursor(), 1);
//! assert_eq!(moves, vec![SegmentId::new(Field::Password, 0)]);
//! ```

use crate::core::SegmentId;
use crate::store::SegmentWrite;

/// Receives input focus hand-offs.
pub trait FocusSink {
    /// Give input focus to `segment`.
    fn focus(&mut self, segment: SegmentId);
}

/// Discards focus changes.
impl FocusSink for () {
    fn focus(&mut self, _segment: SegmentId) {}
}

/// Records focus changes in order.
impl FocusSink for Vec<SegmentId> {
    fn focus(&mut self, segment: SegmentId) {
        self.push(segment);
    }
}

impl<F: FocusSink + ?Sized> FocusSink for &mut F {
    fn focus(&mut self, segment: SegmentId) {
        (**self).focus(segment);
    }
}

/// Focus change produced by one reaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FocusMove {
    Advanced(SegmentId),
    Retreated(SegmentId),
    Stayed,
}

/// Ordered segment handles plus the cursor into them.
#[derive(Clone, Debug)]
pub struct FocusSequencer {
    order: Vec<SegmentId>,
    cursor: usize,
}

impl FocusSequencer {
    /// Create a sequencer with the cursor on the first segment.
    ///
    /// Panics if `order` is empty.
    #[must_use]
    pub fn new(order: Vec<SegmentId>) -> Self {
        assert!(!order.is_empty(), "Focus order needs at least one segment");
        Self { order, cursor: 0 }
    }

    /// Index of the focused segment in the global ordering.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The focused segment.
    #[must_use]
    pub fn current(&self) -> SegmentId {
        self.order[self.cursor]
    }

    #[must_use]
    pub fn last_index(&self) -> usize {
        self.order.len() - 1
    }

    #[must_use]
    pub fn order(&self) -> &[SegmentId] {
        &self.order
    }

    /// Position of a segment in the ordering.
    #[must_use]
    pub fn position(&self, segment: SegmentId) -> Option<usize> {
        self.order.iter().position(|&s| s == segment)
    }

    /// Move forward one segment. Returns the newly focused segment, or
    /// `None` when already at the last one.
    pub fn advance(&mut self, sink: &mut impl FocusSink) -> Option<SegmentId> {
        if self.cursor >= self.last_index() {
            return None;
        }
        self.move_to(self.cursor + 1, sink)
    }

    /// Move back one segment. Returns the newly focused segment, or `None`
    /// when already at the first one.
    pub fn retreat(&mut self, sink: &mut impl FocusSink) -> Option<SegmentId> {
        if self.cursor == 0 {
            return None;
        }
        self.move_to(self.cursor - 1, sink)
    }

    /// Place focus directly, as when the user clicks into a segment.
    ///
    /// Returns false if the segment is not part of the ordering.
    pub fn focus(&mut self, segment: SegmentId, sink: &mut impl FocusSink) -> bool {
        match self.position(segment) {
            Some(index) if index == self.cursor => true,
            Some(index) => {
                self.move_to(index, sink);
                true
            }
            None => false,
        }
    }

    /// Apply the length trigger policy to an accepted write.
    ///
    /// Input only ever arrives at the focused widget, so the cursor is first
    /// synced to the written segment without notifying the sink.
    pub fn react(&mut self, write: &SegmentWrite, sink: &mut impl FocusSink) -> FocusMove {
        if let Some(index) = self.position(write.segment) {
            self.cursor = index;
        }

        if write.is_full() {
            self.advance(sink).map_or(FocusMove::Stayed, FocusMove::Advanced)
        } else if write.is_cleared() {
            self.retreat(sink).map_or(FocusMove::Stayed, FocusMove::Retreated)
        } else {
            FocusMove::Stayed
        }
    }

    fn move_to(&mut self, index: usize, sink: &mut impl FocusSink) -> Option<SegmentId> {
        self.cursor = index;
        let segment = self.order[index];
        tracing::debug!(%segment, cursor = index, "focus moved");
        sink.focus(segment);
        Some(segment)
    }
}
