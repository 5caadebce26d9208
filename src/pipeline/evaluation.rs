//! Evaluation of the learned policy against a fixed opponent

use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::{
    Result,
    ports::Learner,
    q_learning::{AGENT_PLAYER, OPPONENT_PLAYER, QAgent},
    tictactoe::{BoardState, GameOutcome, Player},
};

/// Win/draw/loss counts from the agent's perspective
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub opponent: String,
    /// Side that opened every game
    pub first_player: Player,
    pub games: usize,
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
    /// Decisions the agent made
    pub agent_moves: usize,
    /// Decisions made on a board whose stored values were not all zero
    pub informed_moves: usize,
}

impl EvaluationResult {
    fn new(opponent: &str, first_player: Player) -> Self {
        Self {
            opponent: opponent.to_string(),
            first_player,
            games: 0,
            wins: 0,
            draws: 0,
            losses: 0,
            agent_moves: 0,
            informed_moves: 0,
        }
    }

    fn record(&mut self, outcome: GameOutcome) {
        self.games += 1;
        if outcome.is_win_for(AGENT_PLAYER) {
            self.wins += 1;
        } else if outcome.is_loss_for(AGENT_PLAYER) {
            self.losses += 1;
        } else {
            self.draws += 1;
        }
    }

    fn rate(&self, count: usize) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            count as f64 / self.games as f64
        }
    }

    pub fn win_rate(&self) -> f64 {
        self.rate(self.wins)
    }

    pub fn draw_rate(&self) -> f64 {
        self.rate(self.draws)
    }

    pub fn loss_rate(&self) -> f64 {
        self.rate(self.losses)
    }
}

/// Play `games` games between `opponent` (X) and the agent's greedy
/// policy (O), with `first_player` opening every game.
///
/// Training always lets the agent open, so only agent-first games reach
/// the boards its table has values for.
pub fn evaluate(
    agent: &mut QAgent,
    opponent: &mut dyn Learner,
    games: usize,
    first_player: Player,
    rng: &mut dyn RngCore,
) -> Result<EvaluationResult> {
    let mut result = EvaluationResult::new(opponent.name(), first_player);

    for _ in 0..games {
        let mut state = BoardState::new();
        let mut to_move = first_player;
        let outcome = loop {
            let position = if to_move == AGENT_PLAYER {
                result.agent_moves += 1;
                let informed = agent
                    .q_table()
                    .get(&state)
                    .is_some_and(|values| values.iter().any(|&q| q != 0.0));
                if informed {
                    result.informed_moves += 1;
                }
                agent.greedy_action(&state, rng)?
            } else {
                opponent.select_move(&state, OPPONENT_PLAYER, rng)?
            };
            state = state.apply_move(position, to_move)?;
            if let Some(outcome) = GameOutcome::of(&state) {
                break outcome;
            }
            to_move = to_move.opponent();
        };
        result.record(outcome);
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::{config::Hyperparameters, pipeline::opponents::ExpertLearner};

    #[test]
    fn test_counts_add_up() {
        let mut agent = QAgent::new(Hyperparameters::default(), 50.0).unwrap();
        let mut rng = StdRng::seed_from_u64(21);
        let result =
            evaluate(&mut agent, &mut ExpertLearner::new(), 25, AGENT_PLAYER, &mut rng).unwrap();

        assert_eq!(result.games, 25);
        assert_eq!(result.informed_moves, 0);
        assert_eq!(result.wins + result.draws + result.losses, 25);
        assert_eq!(result.opponent, "Expert");
        assert!((result.win_rate() + result.draw_rate() + result.loss_rate() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_greedy_play_does_not_touch_epsilon() {
        let mut agent = QAgent::new(Hyperparameters::default(), 50.0).unwrap();
        let mut rng = StdRng::seed_from_u64(2);
        evaluate(&mut agent, &mut ExpertLearner::new(), 5, OPPONENT_PLAYER, &mut rng).unwrap();
        assert_eq!(agent.epsilon(), Hyperparameters::default().epsilon);
    }

    #[test]
    fn test_empty_evaluation() {
        let result = EvaluationResult::new("Random", AGENT_PLAYER);
        assert_eq!(result.win_rate(), 0.0);
    }

    #[test]
    fn test_opening_side_sets_move_parity() {
        let mut agent = QAgent::new(Hyperparameters::default(), 50.0).unwrap();
        let mut rng = StdRng::seed_from_u64(3);

        // Agent opens: it makes the first and every other move, five at most.
        let first = evaluate(&mut agent, &mut ExpertLearner::new(), 10, AGENT_PLAYER, &mut rng).unwrap();
        assert!(first.agent_moves >= 3 * 10 && first.agent_moves <= 5 * 10);

        let second =
            evaluate(&mut agent, &mut ExpertLearner::new(), 10, OPPONENT_PLAYER, &mut rng).unwrap();
        assert!(second.agent_moves <= 4 * 10);
        assert_eq!(second.first_player, OPPONENT_PLAYER);
    }
}
