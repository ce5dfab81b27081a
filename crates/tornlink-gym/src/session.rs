//! Action-by-action training session simulation

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::formula::GymStat;

/// How much happiness one action costs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HappinessLoss {
    /// Half the energy spent, every time
    #[default]
    Average,
    /// Uniform between 40% and 60% of the energy spent
    Random,
}

impl HappinessLoss {
    fn sample<R: Rng + ?Sized>(&self, energy_per_action: f64, rng: &mut R) -> f64 {
        match self {
            HappinessLoss::Average => 0.5 * energy_per_action,
            HappinessLoss::Random => {
                rng.random_range(0.4 * energy_per_action..=0.6 * energy_per_action)
            }
        }
    }
}

/// Inputs of one simulated session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GymSessionInput {
    pub stat: GymStat,
    pub initial_stat: f64,
    pub initial_happiness: f64,
    pub total_energy_budget: u32,
    pub energy_per_action: u32,
    pub gym_factor: f64,
    pub modifier: f64,
    pub happiness_loss: HappinessLoss,
}

impl GymSessionInput {
    /// Number of actions the budget pays for
    pub fn actions(&self) -> u32 {
        self.total_energy_budget
            .checked_div(self.energy_per_action)
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GymSessionResult {
    pub actions_performed: u32,
    pub final_stat: f64,
    pub final_happiness: f64,
    pub total_gain: f64,
    /// Gain of every action, in order
    pub gains: Vec<f64>,
}

/// Simulate a session using the thread-local RNG for random happiness loss
pub fn simulate_session(input: &GymSessionInput) -> GymSessionResult {
    simulate_session_with_rng(input, &mut rand::rng())
}

/// Simulate a session drawing random happiness loss from `rng`
///
/// Every action uses the stat and happiness left by the previous one. The
/// session always spends the whole budget; happiness bottoms out at zero.
pub fn simulate_session_with_rng<R: Rng + ?Sized>(
    input: &GymSessionInput,
    rng: &mut R,
) -> GymSessionResult {
    let actions = input.actions();
    let energy = f64::from(input.energy_per_action);

    let mut stat = input.initial_stat;
    let mut happiness = input.initial_happiness.max(0.0);
    let mut gains = Vec::with_capacity(actions as usize);

    for _ in 0..actions {
        let gain = input.stat.gain_per_action(
            stat,
            happiness,
            energy,
            input.gym_factor,
            input.modifier,
        );
        stat += gain;
        gains.push(gain);

        let loss = input.happiness_loss.sample(energy, rng);
        happiness = (happiness - loss).max(0.0);
    }

    GymSessionResult {
        actions_performed: actions,
        final_stat: stat,
        final_happiness: happiness,
        total_gain: stat - input.initial_stat,
        gains,
    }
}
