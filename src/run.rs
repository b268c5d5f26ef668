use std::time::Instant;

use crate::category::{Category, Segment};
use crate::clock::Stopwatch;
use crate::time_format::Millis;

/// Working copy of a category for one attempt.
///
/// The segments are value copies of the baseline, so nothing recorded here
/// reaches the stored category until a reset reconciles it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunState {
    pub(crate) segments: Vec<Segment>,
    pub(crate) current_index: usize,
    pub(crate) clock: Stopwatch,
    generation: u64,
}

impl RunState {
    pub fn new(category: &Category, generation: u64) -> Self {
        Self {
            segments: category.segments.clone(),
            current_index: 0,
            clock: Stopwatch::default(),
            generation,
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Index of the next segment to split; equals `len()` once finished.
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_running(&self) -> bool {
        self.clock.is_running()
    }

    pub fn is_complete(&self) -> bool {
        self.current_index >= self.segments.len()
    }

    /// At least one segment was split or skipped.
    pub fn attempted(&self) -> bool {
        self.current_index > 0
    }

    pub fn elapsed_ms(&self, now: Instant) -> Millis {
        self.clock.elapsed_ms(now)
    }

    pub fn final_split(&self) -> Option<Millis> {
        self.segments.last().and_then(|s| s.split_time)
    }

    /// Most recent recorded split before the current segment, 0 at the start.
    /// Skipped segments have no split, so the next split absorbs their time.
    pub fn previous_split(&self) -> Millis {
        self.segments[..self.current_index.min(self.segments.len())]
            .iter()
            .rev()
            .find_map(|s| s.split_time)
            .unwrap_or(0)
    }
}
