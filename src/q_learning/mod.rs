//! Tabular Q-learning
//!
//! The agent plays O against a rule-based X. Each stored board maps to nine
//! action values; occupied cells stay at 0 and are only ever read
//! through the bootstrap maximum.
//!
//! ## Update rule
//!
//! ```text
//! Q(s,a) <- clamp(Q(s,a) + α (r + γ max Q(s') - Q(s,a)), -bound, bound)
//! ```
//!
//! An unseen `s'` bootstraps as 0 and is not inserted.
//!
//! ## Usage Example
//!
//! ```no_run
//! use rand::{SeedableRng, rngs::StdRng};
//! use tactiq::{config::Hyperparameters, q_learning::QAgent, tictactoe::BoardState};
//!
//! let mut agent = QAgent::new(Hyperparameters::default(), 50.0)?;
//! let mut rng = StdRng::seed_from_u64(7);
//! let action = agent.choose_action(&BoardState::new(), &mut rng)?;
//! # let _ = action;
//! # Ok::<(), tactiq::Error>(())
//! ```

pub mod agent;
pub mod q_table;

pub use agent::{AGENT_PLAYER, OPPONENT_PLAYER, QAgent};
pub use q_table::{ActionValues, QTable};
