//! Two-phase flip sequencing
//!
//! A flip collapses the card edge-on (scale 1 -> 0), swaps the visible face,
//! then expands it again (scale 0 -> 1). Each phase takes half of the
//! configured duration and ends with a scheduled [`Task::FlipPhaseEnd`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::game::Task;
use crate::scheduler::{Scheduler, TaskHandle};
use crate::types::{CardId, Face, FlipDirection};

/// Easing curve applied to both flip phases
///
/// Phase one eases in, phase two eases out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Easing {
    #[default]
    Linear,
    Quad,
    Cubic,
    Sine,
    Expo,
}

impl Easing {
    pub fn ease_in(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::Quad => t * t,
            Easing::Cubic => t * t * t,
            Easing::Sine => 1.0 - (t * core::f64::consts::FRAC_PI_2).cos(),
            Easing::Expo => {
                if t == 0.0 {
                    0.0
                } else {
                    2f64.powf(10.0 * (t - 1.0))
                }
            }
        }
    }

    pub fn ease_out(self, t: f64) -> f64 {
        1.0 - self.ease_in(1.0 - t.clamp(0.0, 1.0))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FlipPhase {
    /// Scale 1 -> 0, face swaps at the end
    Collapse,
    /// Scale 0 -> 1, pairing/closing runs at the end
    Expand,
}

/// Progress of one card's flip
#[derive(Debug, Clone, PartialEq)]
pub struct FlipState {
    pub direction: FlipDirection,
    pub phase: FlipPhase,
    pub phase_started_at: u64,
    pub phase_duration: u64,
    task: TaskHandle,
}

impl FlipState {
    /// Horizontal scale of the card at `now`
    pub fn scale_at(&self, now: u64, easing: Easing) -> f64 {
        let progress = if self.phase_duration == 0 {
            1.0
        } else {
            now.saturating_sub(self.phase_started_at) as f64 / self.phase_duration as f64
        };
        match self.phase {
            FlipPhase::Collapse => 1.0 - easing.ease_in(progress),
            FlipPhase::Expand => easing.ease_out(progress),
        }
    }
}

/// What the engine must do after a phase ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipStep {
    /// Collapse finished: show this face, expansion is now scheduled
    SwapFace(Face),
    /// Expansion finished: the flip is over
    Completed(FlipDirection),
}

/// Split a flip into its two phase durations
pub fn phase_durations(total: u64) -> (u64, u64) {
    let first = total / 2;
    (first, total - first)
}

#[derive(Debug, Clone)]
pub struct FlipSequencer {
    duration: u64,
    easing: Easing,
    flips: BTreeMap<CardId, FlipState>,
}

impl FlipSequencer {
    pub fn new(duration: u64, easing: Easing) -> Self {
        Self {
            duration,
            easing,
            flips: BTreeMap::new(),
        }
    }

    /// Start (or restart) a flip of `card` in `direction`
    pub fn start(&mut self, scheduler: &mut Scheduler<Task>, card: CardId, direction: FlipDirection) {
        self.cancel(scheduler, card);
        let (collapse, _) = phase_durations(self.duration);
        let task = scheduler.schedule_after(
            collapse,
            Task::FlipPhaseEnd {
                card,
                phase: FlipPhase::Collapse,
            },
        );
        self.flips.insert(
            card,
            FlipState {
                direction,
                phase: FlipPhase::Collapse,
                phase_started_at: scheduler.now(),
                phase_duration: collapse,
                task,
            },
        );
    }

    /// Handle the end of a phase scheduled by [`FlipSequencer::start`]
    pub fn on_phase_end(
        &mut self,
        scheduler: &mut Scheduler<Task>,
        card: CardId,
        phase: FlipPhase,
    ) -> Option<FlipStep> {
        let state = self.flips.get_mut(&card)?;
        if state.phase != phase {
            return None;
        }
        match phase {
            FlipPhase::Collapse => {
                let (_, expand) = phase_durations(self.duration);
                state.phase = FlipPhase::Expand;
                state.phase_started_at = scheduler.now();
                state.phase_duration = expand;
                state.task = scheduler.schedule_after(
                    expand,
                    Task::FlipPhaseEnd {
                        card,
                        phase: FlipPhase::Expand,
                    },
                );
                let face = match state.direction {
                    FlipDirection::ToFront => Face::Front,
                    _ => Face::Back,
                };
                Some(FlipStep::SwapFace(face))
            }
            FlipPhase::Expand => {
                let direction = state.direction;
                self.flips.remove(&card);
                Some(FlipStep::Completed(direction))
            }
        }
    }

    /// Stop a card's flip where it is
    pub fn cancel(&mut self, scheduler: &mut Scheduler<Task>, card: CardId) {
        if let Some(state) = self.flips.remove(&card) {
            scheduler.cancel(state.task);
        }
    }

    /// Forget every flip; the caller clears the scheduler
    pub fn clear(&mut self) {
        self.flips.clear();
    }

    pub fn get(&self, card: CardId) -> Option<&FlipState> {
        self.flips.get(&card)
    }

    pub fn is_idle(&self) -> bool {
        self.flips.is_empty()
    }

    /// Horizontal scale of `card` at `now`; resting cards are at full scale
    pub fn scale(&self, card: CardId, now: u64) -> f64 {
        self.flips
            .get(&card)
            .map(|state| state.scale_at(now, self.easing))
            .unwrap_or(1.0)
    }
}
