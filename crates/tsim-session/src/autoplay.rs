//! Unattended play, for simulations and smoke tests.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use tsim_core::{ApproachType, Ending};
use tsim_mechanics::{CombatAction, Roller};

use crate::error::SessionResult;
use crate::run::Run;
use crate::view::View;

/// How the autoplayer picks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Always the first choice; always strike with empathy.
    #[default]
    First,
    /// Prefer empathetic, then patient choices; listen when sanity is low.
    Empathetic,
}

impl Strategy {
    fn pick_choice(self, approaches: &[ApproachType]) -> usize {
        match self {
            Self::First => 0,
            Self::Empathetic => [ApproachType::Empathetic, ApproachType::Patient]
                .iter()
                .find_map(|want| approaches.iter().position(|a| a == want))
                .unwrap_or(0),
        }
    }

    fn pick_action(self, sanity: u32, max_sanity: u32) -> CombatAction {
        match self {
            Self::Empathetic if sanity.saturating_mul(3) <= max_sanity => {
                CombatAction::PatientListening
            }
            _ => CombatAction::EmpathySupport,
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::First => write!(f, "first"),
            Self::Empathetic => write!(f, "empathetic"),
        }
    }
}

/// Play `run` to its ending.
///
/// After `max_steps` actions the run is ended by request, so content that
/// loops forever still terminates.
pub fn autoplay<R: Roller>(
    run: &mut Run<R>,
    strategy: Strategy,
    max_steps: usize,
) -> SessionResult<Ending> {
    for step in 0..max_steps {
        match run.current_view() {
            View::Finished(ending) => return Ok(ending),
            View::Dialogue { .. } => {
                let index = strategy.pick_choice(&run.choice_approaches());
                debug!(step, index, "autoplay choice");
                run.submit_choice(index)?;
            }
            View::Combat { sanity, .. } => {
                let action = strategy.pick_action(sanity.current(), sanity.max());
                debug!(step, %action, "autoplay combat");
                run.combat_action(action)?;
            }
            View::Idle => break,
        }
    }
    if !run.is_finished() {
        warn!(max_steps, "autoplay step limit reached");
    }
    Ok(run.request_ending_now())
}
