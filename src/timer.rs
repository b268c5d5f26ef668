//! The run-timing state machine.
//!
//! Every transition takes the current instant explicitly and returns whether
//! it applied. Transitions attempted from the wrong state return `false` and
//! change nothing, so repeated or racing inputs are harmless.

use std::time::Instant;

use tracing::debug;

use crate::category::{Category, Segment};
use crate::reconcile::{
    BestTimeReconciler, ConfirmPrompt, ReconcileOffer, ReconcileOutcome,
};
use crate::run::RunState;
use crate::time_format::Millis;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum_macros::Display)]
pub enum TimerPhase {
    #[default]
    Idle,
    Running,
    Paused,
    Finished,
}

/// Ties a display refresh to the run it was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshHandle {
    generation: u64,
}

#[derive(Debug, Default)]
pub struct TimerController {
    run: Option<RunState>,
    phase: TimerPhase,
    generation: u64,
}

impl TimerController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn run(&self) -> Option<&RunState> {
        self.run.as_ref()
    }

    pub fn phase(&self) -> TimerPhase {
        self.phase
    }

    pub fn is_loaded(&self) -> bool {
        self.run.is_some()
    }

    pub fn is_running(&self) -> bool {
        self.phase == TimerPhase::Running
    }

    /// Elapsed time of the loaded run, zero when none is loaded.
    pub fn elapsed_ms(&self, now: Instant) -> Millis {
        self.run.as_ref().map_or(0, |run| run.elapsed_ms(now))
    }

    /// Replace any run with a fresh copy of `category`.
    pub fn load(&mut self, category: &Category) {
        self.generation += 1;
        self.run = Some(RunState::new(category, self.generation));
        self.phase = TimerPhase::Idle;
        debug!(category = %category.title, generation = self.generation, "loaded run");
    }

    pub fn unload(&mut self) {
        self.run = None;
        self.phase = TimerPhase::Idle;
    }

    pub fn start(&mut self, now: Instant) -> bool {
        let Some(run) = self.run.as_mut() else {
            return false;
        };
        if !matches!(self.phase, TimerPhase::Idle | TimerPhase::Paused) || run.is_complete() {
            return false;
        }
        run.clock.resume(now);
        self.phase = TimerPhase::Running;
        debug!(index = run.current_index, "timer started");
        true
    }

    pub fn split(&mut self, now: Instant) -> bool {
        let Some(run) = self.run.as_mut() else {
            return false;
        };
        if self.phase != TimerPhase::Running || run.is_complete() {
            return false;
        }

        let split = run.elapsed_ms(now);
        let segment_time = split.saturating_sub(run.previous_split());
        let index = run.current_index;
        let segment = &mut run.segments[index];
        segment.split_time = Some(split);
        segment.segment_time = Some(segment_time);
        if segment.best_time.map_or(true, |best| segment_time < best) {
            segment.best_time = Some(segment_time);
        }
        run.current_index += 1;
        debug!(index, split, segment_time, "split");

        if run.is_complete() {
            run.clock.stop(now);
            self.phase = TimerPhase::Finished;
            debug!(final_split = split, "run finished");
        }
        true
    }

    /// Start when stopped, split when running.
    pub fn start_or_split(&mut self, now: Instant) -> bool {
        if self.is_running() {
            self.split(now)
        } else {
            self.start(now)
        }
    }

    pub fn pause(&mut self, now: Instant) -> bool {
        let Some(run) = self.run.as_mut() else {
            return false;
        };
        if self.phase != TimerPhase::Running {
            return false;
        }
        run.clock.suspend(now);
        self.phase = TimerPhase::Paused;
        debug!(elapsed = run.elapsed_ms(now), "timer paused");
        true
    }

    /// Move past the current segment without recording a time for it.
    /// The final segment cannot be skipped.
    pub fn skip(&mut self, _now: Instant) -> bool {
        let Some(run) = self.run.as_mut() else {
            return false;
        };
        if self.phase != TimerPhase::Running || run.current_index + 1 >= run.len() {
            return false;
        }
        let index = run.current_index;
        run.segments[index].clear_times();
        run.current_index += 1;
        debug!(index, "skipped segment");
        true
    }

    /// Step back one segment, restoring it from `baseline`. Undoing the final
    /// split resumes the clock as though the run never stopped.
    pub fn undo(&mut self, baseline: &Category, now: Instant) -> bool {
        let Some(run) = self.run.as_mut() else {
            return false;
        };
        if run.current_index == 0 {
            return false;
        }

        run.current_index -= 1;
        let index = run.current_index;
        run.segments[index] = match baseline.segments.get(index) {
            Some(stored) => stored.clone(),
            None => Segment::new(run.segments[index].description.clone()),
        };
        debug!(index, "undid segment");

        if index + 1 == run.len() && self.phase == TimerPhase::Finished {
            run.clock.carry_over(now);
            run.clock.resume(now);
            self.phase = TimerPhase::Running;
            debug!("resumed finished run");
        }
        true
    }

    /// Questions a reset would ask against `baseline`.
    pub fn reset_offer(&self, baseline: &Category) -> ReconcileOffer {
        self.run
            .as_ref()
            .map(|run| BestTimeReconciler::offer(run, baseline))
            .unwrap_or_default()
    }

    /// Reconcile the run into `baseline`, then start over from it.
    pub fn reset<P: ConfirmPrompt + ?Sized>(
        &mut self,
        baseline: &mut Category,
        prompt: &mut P,
    ) -> Option<ReconcileOutcome> {
        let run = self.run.take()?;
        let outcome = BestTimeReconciler::reconcile(&run, baseline, prompt);
        self.load(baseline);
        Some(outcome)
    }

    /// Handle for the display refresh of the current running window.
    pub fn refresh_handle(&self) -> Option<RefreshHandle> {
        match (&self.run, self.phase) {
            (Some(run), TimerPhase::Running) => Some(RefreshHandle {
                generation: run.generation(),
            }),
            _ => None,
        }
    }

    /// Elapsed time for a refresh, or `None` if the handle is stale or the
    /// run is no longer running.
    pub fn refresh(&self, handle: RefreshHandle, now: Instant) -> Option<Millis> {
        let run = self.run.as_ref()?;
        (self.phase == TimerPhase::Running && run.generation() == handle.generation)
            .then(|| run.elapsed_ms(now))
    }
}
