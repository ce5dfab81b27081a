//! tornlink-gym: gym gain formula and session simulator
//!
//! Pure functions with no I/O. The average happiness-loss mode is fully
//! deterministic; the random mode takes an explicit RNG when reproducible
//! runs are needed.
//!
//! ```
//! use tornlink_gym::{GymSessionInput, GymStat, HappinessLoss, simulate_session};
//!
//! let result = simulate_session(&GymSessionInput {
//!     stat: GymStat::Speed,
//!     initial_stat: 10_000.0,
//!     initial_happiness: 5_000.0,
//!     total_energy_budget: 150,
//!     energy_per_action: 10,
//!     gym_factor: 6.0,
//!     modifier: 1.0,
//!     happiness_loss: HappinessLoss::Average,
//! });
//! assert_eq!(result.actions_performed, 15);
//! ```

mod formula;
mod session;

pub use formula::{GymStat, gain_per_action, stack_modifiers};
pub use session::{
    GymSessionInput, GymSessionResult, HappinessLoss, simulate_session, simulate_session_with_rng,
};
