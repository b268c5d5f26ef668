//! Read-only snapshot of a run for rendering.

use std::time::Instant;

use crate::timer::{TimerController, TimerPhase};
use crate::time_format::Millis;

pub const DEFAULT_WINDOW: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight {
    None,
    /// The segment being run.
    Active,
    /// Split this run with a time equal to its gold.
    Gold,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentView {
    pub description: String,
    pub split_time: Option<Millis>,
    pub segment_time: Option<Millis>,
    pub best_time: Option<Millis>,
    pub highlight: Highlight,
    /// Outside the scroll window.
    pub hidden: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunView {
    pub elapsed: Millis,
    pub phase: TimerPhase,
    pub current_index: usize,
    pub segments: Vec<SegmentView>,
}

impl RunView {
    pub fn capture(controller: &TimerController, now: Instant, window: usize) -> Option<Self> {
        let run = controller.run()?;
        let phase = controller.phase();
        let current = run.current_index();
        let len = run.len();

        let segments = run
            .segments()
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let highlight = if phase != TimerPhase::Running {
                    Highlight::None
                } else if i == current {
                    Highlight::Active
                } else if i < current && s.best_time.is_some() && s.best_time == s.segment_time {
                    Highlight::Gold
                } else {
                    Highlight::None
                };
                SegmentView {
                    description: s.description.clone(),
                    split_time: s.split_time,
                    segment_time: s.segment_time,
                    best_time: s.best_time,
                    highlight,
                    hidden: is_hidden(i, current, len, window),
                }
            })
            .collect();

        Some(Self {
            elapsed: controller.elapsed_ms(now),
            phase,
            current_index: current,
            segments,
        })
    }

    pub fn visible(&self) -> impl Iterator<Item = &SegmentView> {
        self.segments.iter().filter(|s| !s.hidden)
    }
}

/// Scroll window over the segment list. The last segment always stays
/// visible until the run reaches it; then the window trails behind it.
pub fn is_hidden(i: usize, current: usize, len: usize, window: usize) -> bool {
    if len == 0 || window == 0 {
        return false;
    }
    let last = len - 1;
    if current >= last {
        // A finished run (current == len) keeps the window of the last segment
        return i + window < current.min(last);
    }
    if i == last {
        return false;
    }
    if current < window {
        i >= window
    } else {
        i + window <= current || i > current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;
    use std::time::Duration;

    fn visible_indices(current: usize, len: usize) -> Vec<usize> {
        (0..len)
            .filter(|&i| !is_hidden(i, current, len, DEFAULT_WINDOW))
            .collect()
    }

    #[test]
    fn short_lists_show_everything() {
        assert_eq!(visible_indices(0, 5), vec![0, 1, 2, 3, 4]);
        assert_eq!(visible_indices(4, 5), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn early_window_keeps_last_segment() {
        assert_eq!(visible_indices(3, 12), vec![0, 1, 2, 3, 4, 5, 6, 7, 11]);
    }

    #[test]
    fn middle_window_trails_current() {
        assert_eq!(visible_indices(9, 12), vec![2, 3, 4, 5, 6, 7, 8, 9, 11]);
    }

    #[test]
    fn last_segment_window() {
        assert_eq!(visible_indices(11, 12), vec![3, 4, 5, 6, 7, 8, 9, 10, 11]);
    }

    #[test]
    fn finished_run_keeps_last_segment_window() {
        assert_eq!(visible_indices(12, 12), visible_indices(11, 12));
        assert!(is_hidden(0, 12, 12, DEFAULT_WINDOW));
    }

    #[test]
    fn highlights_only_while_running() {
        let t0 = Instant::now();
        let mut ctl = TimerController::new();
        ctl.load(&Category::new("Any%", &["A", "B", "C"]));
        let idle = RunView::capture(&ctl, t0, DEFAULT_WINDOW).unwrap();
        assert!(idle.segments.iter().all(|s| s.highlight == Highlight::None));

        ctl.start(t0);
        ctl.split(t0 + Duration::from_millis(1_000));
        let view = RunView::capture(&ctl, t0 + Duration::from_millis(1_500), DEFAULT_WINDOW)
            .unwrap();
        assert_eq!(view.elapsed, 1_500);
        assert_eq!(view.segments[0].highlight, Highlight::Gold);
        assert_eq!(view.segments[1].highlight, Highlight::Active);
        assert_eq!(view.segments[2].highlight, Highlight::None);
    }

    #[test]
    fn no_view_without_run() {
        let ctl = TimerController::new();
        assert_eq!(RunView::capture(&ctl, Instant::now(), DEFAULT_WINDOW), None);
    }
}
