//! Self-play training loop and the live-game surface of the trainer

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use rand::{SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    config::TrainerConfig,
    pipeline::{evaluation::EvaluationResult, stats::RollingStats},
    ports::{Learner, Observer, ProgressReport},
    q_learning::{AGENT_PLAYER, OPPONENT_PLAYER, QAgent},
    reward::RewardShaper,
    tactics,
    tictactoe::{BoardState, GameOutcome, Player},
};

/// Cooperative cancellation flag, checked once per episode boundary
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    /// Ask the training loop to stop after the current episode
    pub fn stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    fn clear(&self) {
        self.0.store(false, Ordering::Relaxed);
    }
}

/// Result of one self-play episode
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpisodeResult {
    pub outcome: GameOutcome,
    /// Sum of shaped rewards, including the opponent-win penalty
    pub reward: f64,
    /// Moves played by both sides
    pub moves: usize,
}

/// Aggregate statistics of a training run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingSummary {
    pub episodes: usize,
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
    pub mean_reward: f64,
    pub final_learning_rate: f64,
    pub final_epsilon: f64,
    pub states_seen: usize,
    pub stopped_early: bool,
}

/// Running totals of one `train` call
#[derive(Debug, Default)]
struct Tally {
    rewards: Vec<f64>,
    wins: usize,
    draws: usize,
    losses: usize,
    stopped_early: bool,
}

impl Tally {
    fn with_capacity(episodes: usize) -> Self {
        Self {
            rewards: Vec::with_capacity(episodes.min(1 << 16)),
            ..Self::default()
        }
    }

    fn record(&mut self, result: &EpisodeResult) {
        self.rewards.push(result.reward);
        match result.outcome {
            GameOutcome::Win(player) if player == AGENT_PLAYER => self.wins += 1,
            GameOutcome::Win(_) => self.losses += 1,
            GameOutcome::Draw => self.draws += 1,
        }
    }
}

/// Progress callback: `(episode, mean_reward, win_rate_percent)`
pub type ProgressCallback<'a> = &'a mut dyn FnMut(usize, f64, f64);

/// Owns the agent, its hyperparameters, the random source and the live board.
///
/// The trainer is single-threaded. Callers that want to query the policy
/// while training runs elsewhere must serialize access themselves.
pub struct Trainer {
    config: TrainerConfig,
    agent: QAgent,
    shaper: RewardShaper,
    board: BoardState,
    rng: StdRng,
    observers: Vec<Box<dyn Observer>>,
    stop: StopHandle,
}

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

impl Trainer {
    /// Create a trainer from a validated configuration
    pub fn new(config: TrainerConfig) -> Result<Self> {
        config.validate()?;
        let agent = QAgent::new(config.hyperparameters, config.rewards.value_bound)?;
        Ok(Self {
            agent,
            shaper: RewardShaper::new(config.rewards),
            board: BoardState::new(),
            rng: build_rng(config.seed),
            observers: Vec::new(),
            stop: StopHandle::default(),
            config,
        })
    }

    /// Reseed the random source
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Register an observer for subsequent training runs
    pub fn add_observer(&mut self, observer: Box<dyn Observer>) {
        self.observers.push(observer);
    }

    /// Handle that can stop a running `train` call from another thread
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    pub fn agent(&self) -> &QAgent {
        &self.agent
    }

    // Live game surface: X (human) against O (agent).

    /// Clear the live board
    pub fn reset(&mut self) {
        self.board = BoardState::new();
    }

    pub fn board(&self) -> &BoardState {
        &self.board
    }

    /// Empty cells of the live board
    pub fn legal_actions(&self) -> Vec<usize> {
        self.board.legal_actions()
    }

    /// Place `player`'s mark on the live board
    ///
    /// # Errors
    ///
    /// [`Error::GameOver`] once the live game has ended, otherwise the
    /// board's own move validation errors.
    pub fn play(&mut self, position: usize, player: Player) -> Result<()> {
        if self.board.is_terminal() {
            return Err(Error::GameOver);
        }
        self.board = self.board.apply_move(position, player)?;
        Ok(())
    }

    /// Agent's move for `state`; may decay ε and grow the Q-table
    pub fn choose_action(&mut self, state: &BoardState) -> Result<usize> {
        self.agent.choose_action(state, &mut self.rng)
    }

    pub fn check_win(&self, player: Player) -> bool {
        self.board.has_won(player)
    }

    pub fn is_draw(&self) -> bool {
        self.board.is_draw()
    }

    /// Outcome of the live game, if finished
    pub fn outcome(&self) -> Option<GameOutcome> {
        GameOutcome::of(&self.board)
    }

    /// Run `episodes` self-play episodes and return each episode's reward.
    ///
    /// `callback` receives `(episodes_done, mean_reward, win_rate_percent)`
    /// every progress interval. A stop request ends the run at the next
    /// episode boundary with the rewards collected so far.
    pub fn train(
        &mut self,
        episodes: usize,
        callback: Option<ProgressCallback<'_>>,
    ) -> Result<Vec<f64>> {
        Ok(self.train_with_summary(episodes, callback)?.0)
    }

    /// Like [`Trainer::train`], also returning aggregate statistics.
    ///
    /// Observers always receive `on_training_end`, the stop flag is cleared
    /// and the live board is reset, even when an episode or an observer fails.
    pub fn train_with_summary(
        &mut self,
        episodes: usize,
        mut callback: Option<ProgressCallback<'_>>,
    ) -> Result<(Vec<f64>, TrainingSummary)> {
        log::info!(
            "training for {episodes} episodes (alpha={:.4}, epsilon={:.4})",
            self.agent.learning_rate(),
            self.agent.epsilon()
        );

        let mut tally = Tally::with_capacity(episodes);
        let run = self.run_episodes(episodes, &mut callback, &mut tally);

        let mut finished = Ok(());
        for observer in &mut self.observers {
            let ended = observer.on_training_end();
            if finished.is_ok() {
                finished = ended;
            }
        }
        self.stop.clear();
        self.reset();

        if let Err(err) = &run {
            log::warn!("training aborted after {} episodes: {err}", tally.rewards.len());
        }
        run?;
        finished?;

        let summary = TrainingSummary {
            episodes: tally.rewards.len(),
            wins: tally.wins,
            draws: tally.draws,
            losses: tally.losses,
            mean_reward: if tally.rewards.is_empty() {
                0.0
            } else {
                tally.rewards.iter().sum::<f64>() / tally.rewards.len() as f64
            },
            final_learning_rate: self.agent.learning_rate(),
            final_epsilon: self.agent.epsilon(),
            states_seen: self.agent.q_table().len(),
            stopped_early: tally.stopped_early,
        };
        log::info!(
            "training finished: {} episodes, {} wins, {} draws, {} losses, {} states",
            summary.episodes,
            summary.wins,
            summary.draws,
            summary.losses,
            summary.states_seen
        );

        Ok((tally.rewards, summary))
    }

    fn run_episodes(
        &mut self,
        episodes: usize,
        callback: &mut Option<ProgressCallback<'_>>,
        tally: &mut Tally,
    ) -> Result<()> {
        let schedule = self.config.schedule;
        let mut stats = RollingStats::new(schedule.stats_window);

        for observer in &mut self.observers {
            observer.on_training_start(episodes)?;
        }

        for episode in 0..episodes {
            if self.stop.is_stopped() {
                log::warn!("training stopped after {episode} of {episodes} episodes");
                tally.stopped_early = true;
                break;
            }

            let result = self.run_episode()?;
            tally.record(&result);
            stats.record(result.reward, result.outcome.is_win_for(AGENT_PLAYER));

            if episode % schedule.learning_rate_decay_interval == 0 {
                self.agent.decay_learning_rate();
            }

            for observer in &mut self.observers {
                observer.on_episode_end(episode, result.outcome, result.reward)?;
            }

            if episode % schedule.progress_interval == schedule.progress_interval - 1 {
                let report = ProgressReport {
                    episode: episode + 1,
                    mean_reward: stats.mean_reward(),
                    win_rate_percent: stats.win_rate_percent(schedule.win_rate_divisor),
                    learning_rate: self.agent.learning_rate(),
                    epsilon: self.agent.epsilon(),
                    states_seen: self.agent.q_table().len(),
                };
                log::debug!(
                    "episode {}: mean reward {:.2}, win rate {:.1}%",
                    report.episode,
                    report.mean_reward,
                    report.win_rate_percent
                );

                if let Some(callback) = callback.as_deref_mut() {
                    callback(report.episode, report.mean_reward, report.win_rate_percent);
                }
                for observer in &mut self.observers {
                    observer.on_progress(&report)?;
                }
            }
        }
        Ok(())
    }

    /// One episode: the agent opens, the expert answers, until the game ends
    fn run_episode(&mut self) -> Result<EpisodeResult> {
        self.run_episode_from(BoardState::new())
    }

    /// Episode continuing from `start` with the agent to move
    fn run_episode_from(&mut self, start: BoardState) -> Result<EpisodeResult> {
        self.board = start;
        let mut state = start;
        let mut total_reward = 0.0;
        let mut moves = 0;

        loop {
            let action = self.agent.choose_action(&state, &mut self.rng)?;
            let next_state = state.apply_move(action, AGENT_PLAYER)?;
            self.board = next_state;
            moves += 1;

            let reward = self.shaper.reward(&next_state, AGENT_PLAYER, action);
            self.agent.learn(state, action, &next_state, reward)?;
            total_reward += reward;

            if let Some(outcome) = GameOutcome::of(&next_state) {
                return Ok(EpisodeResult {
                    outcome,
                    reward: total_reward,
                    moves,
                });
            }

            let opponent_action = tactics::expert_move(&next_state, OPPONENT_PLAYER, &mut self.rng)?;
            let after_opponent = next_state.apply_move(opponent_action, OPPONENT_PLAYER)?;
            self.board = after_opponent;
            moves += 1;

            if let Some(outcome) = GameOutcome::of(&after_opponent) {
                if outcome.is_loss_for(AGENT_PLAYER) {
                    // Credit the loss to the agent's last move only.
                    let penalty = self.shaper.opponent_win_penalty();
                    self.agent.learn(state, action, &after_opponent, penalty)?;
                    total_reward += penalty;
                }
                return Ok(EpisodeResult {
                    outcome,
                    reward: total_reward,
                    moves,
                });
            }

            state = after_opponent;
        }
    }

    /// Play `games` games of `opponent` (X) against the agent's greedy policy,
    /// with the agent opening as it does in training. Nothing is learned and
    /// ε is left untouched.
    pub fn evaluate(&mut self, opponent: &mut dyn Learner, games: usize) -> Result<EvaluationResult> {
        self.evaluate_with_first_player(opponent, games, AGENT_PLAYER)
    }

    /// Like [`Trainer::evaluate`], choosing which side opens each game
    pub fn evaluate_with_first_player(
        &mut self,
        opponent: &mut dyn Learner,
        games: usize,
        first_player: Player,
    ) -> Result<EvaluationResult> {
        super::evaluation::evaluate(&mut self.agent, opponent, games, first_player, &mut self.rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tictactoe::Cell;

    fn trainer(seed: u64) -> Trainer {
        Trainer::new(TrainerConfig::default().with_seed(seed)).unwrap()
    }

    #[test]
    fn test_live_game_rules() {
        let mut trainer = trainer(1);
        trainer.play(0, Player::X).unwrap();
        assert!(matches!(
            trainer.play(0, Player::O),
            Err(Error::InvalidMove { position: 0 })
        ));
        assert!(matches!(
            trainer.play(12, Player::O),
            Err(Error::InvalidPosition { position: 12 })
        ));
        assert_eq!(trainer.legal_actions(), vec![1, 2, 3, 4, 5, 6, 7, 8]);

        trainer.reset();
        assert_eq!(trainer.legal_actions().len(), 9);
    }

    #[test]
    fn test_play_after_game_over() {
        let mut trainer = trainer(1);
        let moves = [
            (0, Player::X),
            (3, Player::O),
            (1, Player::X),
            (4, Player::O),
            (2, Player::X),
        ];
        for (pos, player) in moves {
            trainer.play(pos, player).unwrap();
        }
        assert!(trainer.check_win(Player::X));
        assert_eq!(trainer.outcome(), Some(GameOutcome::Win(Player::X)));
        assert!(matches!(trainer.play(5, Player::O), Err(Error::GameOver)));
    }

    #[test]
    fn test_agent_blocks_live_threat() {
        let mut trainer = trainer(3);
        trainer.play(0, Player::X).unwrap();
        trainer.play(4, Player::O).unwrap();
        trainer.play(1, Player::X).unwrap();
        let state = *trainer.board();
        assert_eq!(trainer.choose_action(&state).unwrap(), 2);
    }

    #[test]
    fn test_episode_ends_in_terminal_state() {
        let mut trainer = trainer(5);
        for _ in 0..20 {
            let result = trainer.run_episode().unwrap();
            assert!(trainer.board().is_terminal());
            assert!(result.moves >= 3 && result.moves <= 9);
            assert_eq!(GameOutcome::of(trainer.board()), Some(result.outcome));
        }
    }

    #[test]
    fn test_stop_before_training() {
        let mut trainer = trainer(2);
        trainer.stop_handle().stop();
        let (rewards, summary) = trainer.train_with_summary(100, None).unwrap();
        assert!(rewards.is_empty());
        assert!(summary.stopped_early);
        assert!(!trainer.stop_handle().is_stopped());
    }

    #[test]
    fn test_learning_rate_decays_on_schedule() {
        let mut trainer = trainer(8);
        trainer.train(1, None).unwrap();
        assert!((trainer.agent().learning_rate() - 0.4995).abs() < 1e-12);
        trainer.train(99, None).unwrap();
        // Episode indices restart at 0 on every call.
        assert!((trainer.agent().learning_rate() - 0.5 * 0.999 * 0.999).abs() < 1e-12);
    }

    #[test]
    fn test_opponent_win_penalises_last_move() {
        // X threatens 1, 6 and 8; O has no line to answer with, so whichever
        // cell the agent blocks the expert completes another line.
        let mut trainer = trainer(4);
        let start = BoardState::from_string("X.XOXO.O.").unwrap();
        let result = trainer.run_episode_from(start).unwrap();

        assert_eq!(result.outcome, GameOutcome::Win(Player::X));
        assert_eq!(result.moves, 2);
        let rewards = trainer.config().rewards;
        assert_eq!(result.reward, rewards.block + rewards.opponent_win_penalty);

        let after_opponent = *trainer.board();
        let action = [1, 6, 8]
            .into_iter()
            .find(|&pos| after_opponent.get(pos) == Cell::O)
            .unwrap();
        let hp = trainer.config().hyperparameters;
        let alpha = hp.learning_rate;
        // Neither successor board is ever an agent decision state.
        let max_next = trainer.agent().q_table().max_value(&after_opponent);
        assert_eq!(max_next, 0.0);
        let after_block = alpha * rewards.block;
        let expected = (after_block
            + alpha * (rewards.opponent_win_penalty + hp.discount_factor * max_next - after_block))
            .clamp(-rewards.value_bound, rewards.value_bound);
        let stored = trainer.agent().q_table().value(&start, action);
        assert!((stored - expected).abs() < 1e-12, "{stored} != {expected}");
        assert!((stored - -2.5).abs() < 1e-12);
    }

    struct FailingObserver {
        stop: StopHandle,
        ended: Arc<AtomicBool>,
    }

    impl Observer for FailingObserver {
        fn on_episode_end(&mut self, episode: usize, _outcome: GameOutcome, _reward: f64) -> Result<()> {
            if episode == 3 {
                self.stop.stop();
                return Err(Error::InvalidConfiguration {
                    message: "observer failed".to_string(),
                });
            }
            Ok(())
        }

        fn on_training_end(&mut self) -> Result<()> {
            self.ended.store(true, Ordering::Relaxed);
            Ok(())
        }
    }

    #[test]
    fn test_observer_error_still_finishes_run() {
        let mut trainer = trainer(7);
        let ended = Arc::new(AtomicBool::new(false));
        trainer.add_observer(Box::new(FailingObserver {
            stop: trainer.stop_handle(),
            ended: Arc::clone(&ended),
        }));

        let err = trainer.train(20, None).unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration { .. }));
        assert!(ended.load(Ordering::Relaxed));
        assert!(!trainer.stop_handle().is_stopped());
        assert_eq!(*trainer.board(), BoardState::new());
    }
}
