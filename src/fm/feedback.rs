//! Operator feedback.
//!
//! The output of the source operator is recorded every sample, halved, in a
//! two-sample history. The sum of both entries, i.e. the average of the last
//! two outputs, is scaled by the feedback depth and added to the phase of the
//! receiving operator. Source and receiver are the same operator except for
//! the cross loops of some algorithms.

use super::algorithms::FeedbackLoop;
use crate::numeric::Numeric;

#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackPath<T: Numeric = f32> {
    history: [T; 2],
    depth: T::Index,
    receiver: usize,
    source: usize,
}

impl<T: Numeric> FeedbackPath<T> {
    pub fn new(feedback_loop: FeedbackLoop, depth: f32) -> Self {
        Self {
            history: [T::ZERO; 2],
            depth: T::index_from_f32(depth),
            receiver: feedback_loop.receiver,
            source: feedback_loop.source,
        }
    }

    /// Offset the phase of the receiver.
    #[inline]
    pub fn modulate(&self, phase: T::Phase) -> T::Phase {
        T::modulate(phase, self.history[0].sat_add(self.history[1]), self.depth)
    }

    /// Record the latest output of the source.
    #[inline]
    pub fn push(&mut self, output: T) {
        self.history[1] = self.history[0];
        self.history[0] = output.half();
    }

    #[inline]
    pub fn set_depth(&mut self, depth: f32) {
        self.depth = T::index_from_f32(depth);
    }

    #[inline]
    pub fn receiver(&self) -> usize {
        self.receiver
    }

    #[inline]
    pub fn source(&self) -> usize {
        self.source
    }

    #[inline]
    pub fn depth(&self) -> T::Index {
        self.depth
    }

    /// Halved outputs of the source, most recent first.
    #[inline]
    pub fn history(&self) -> [T; 2] {
        self.history
    }
}
