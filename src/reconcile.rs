//! Reconciliation of a finished or abandoned run against its baseline.
//!
//! Two independent decisions are made when a run is reset: whether the run
//! becomes the new full-run personal best, and whether its golds are merged
//! into the baseline. The questions are asked through [`ConfirmPrompt`], so
//! callers can answer from a UI, from canned [`Decisions`], or from a closure.

use tracing::{debug, info};

use crate::category::Category;
use crate::run::RunState;
use crate::time_format::Millis;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileQuestion {
    /// The run finished faster than the stored run (or none is stored).
    SavePersonalBest {
        final_split: Millis,
        previous: Option<Millis>,
    },
    /// At least one segment was attempted; merge its golds.
    SaveGolds,
}

impl ReconcileQuestion {
    pub fn text(&self) -> &'static str {
        match self {
            ReconcileQuestion::SavePersonalBest { .. } => {
                "Do you want to save the new personal best?"
            }
            ReconcileQuestion::SaveGolds => "Do you want to save the new best segments?",
        }
    }
}

pub trait ConfirmPrompt {
    fn confirm(&mut self, question: ReconcileQuestion) -> bool;
}

impl<F> ConfirmPrompt for F
where
    F: FnMut(ReconcileQuestion) -> bool,
{
    fn confirm(&mut self, question: ReconcileQuestion) -> bool {
        self(question)
    }
}

/// Pre-made answers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Decisions {
    pub save_personal_best: bool,
    pub save_golds: bool,
}

impl Decisions {
    pub fn accept_all() -> Self {
        Self {
            save_personal_best: true,
            save_golds: true,
        }
    }

    pub fn decline_all() -> Self {
        Self::default()
    }
}

impl ConfirmPrompt for Decisions {
    fn confirm(&mut self, question: ReconcileQuestion) -> bool {
        match question {
            ReconcileQuestion::SavePersonalBest { .. } => self.save_personal_best,
            ReconcileQuestion::SaveGolds => self.save_golds,
        }
    }
}

/// Which questions a reset would ask.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileOffer {
    pub personal_best: Option<ReconcileQuestion>,
    pub golds: Option<ReconcileQuestion>,
}

impl ReconcileOffer {
    pub fn is_empty(&self) -> bool {
        self.personal_best.is_none() && self.golds.is_none()
    }

    /// Questions in the order they are asked.
    pub fn questions(&self) -> Vec<ReconcileQuestion> {
        self.personal_best.into_iter().chain(self.golds).collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileOutcome {
    pub personal_best_saved: bool,
    pub golds_saved: bool,
    /// Number of baseline golds that took a new value.
    pub golds_improved: usize,
}

impl ReconcileOutcome {
    pub fn changed(&self) -> bool {
        self.personal_best_saved || self.golds_saved
    }
}

pub struct BestTimeReconciler;

impl BestTimeReconciler {
    pub fn offer(run: &RunState, baseline: &Category) -> ReconcileOffer {
        let previous = baseline.personal_best();
        let personal_best = run.final_split().and_then(|final_split| {
            previous
                .map_or(true, |prev| final_split < prev)
                .then_some(ReconcileQuestion::SavePersonalBest {
                    final_split,
                    previous,
                })
        });
        let golds = run.attempted().then_some(ReconcileQuestion::SaveGolds);

        ReconcileOffer {
            personal_best,
            golds,
        }
    }

    /// Ask every offered question, then apply the answers.
    pub fn reconcile<P: ConfirmPrompt + ?Sized>(
        run: &RunState,
        baseline: &mut Category,
        prompt: &mut P,
    ) -> ReconcileOutcome {
        let offer = Self::offer(run, baseline);
        let decisions = Decisions {
            save_personal_best: offer.personal_best.is_some_and(|q| prompt.confirm(q)),
            save_golds: offer.golds.is_some_and(|q| prompt.confirm(q)),
        };
        Self::apply(run, baseline, &offer, decisions)
    }

    /// Apply answers to an offer computed for this run and baseline.
    pub fn apply(
        run: &RunState,
        baseline: &mut Category,
        offer: &ReconcileOffer,
        decisions: Decisions,
    ) -> ReconcileOutcome {
        let mut outcome = ReconcileOutcome::default();

        if offer.personal_best.is_some() && decisions.save_personal_best {
            baseline.segments = run.segments().to_vec();
            outcome.personal_best_saved = true;
            info!(
                category = %baseline.title,
                final_split = ?run.final_split(),
                "saved new personal best"
            );
        }

        if offer.golds.is_some() && decisions.save_golds {
            outcome.golds_improved = merge_golds(run, baseline);
            outcome.golds_saved = true;
            info!(
                category = %baseline.title,
                improved = outcome.golds_improved,
                "merged best segments"
            );
        }

        debug!(?outcome, "reconciled run");
        outcome
    }
}

/// A stored gold takes the run's gold when it is not lower, so equal golds
/// are overwritten too. Slots without a stored gold are left unset; only a
/// saved personal best seeds them.
fn merge_golds(run: &RunState, baseline: &mut Category) -> usize {
    let mut improved = 0;
    for (stored, ran) in baseline.segments.iter_mut().zip(run.segments()) {
        let (Some(best), Some(run_best)) = (stored.best_time, ran.best_time) else {
            continue;
        };
        if best >= run_best {
            if best != run_best {
                improved += 1;
            }
            stored.best_time = Some(run_best);
        }
    }
    improved
}
