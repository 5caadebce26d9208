//! End-to-end tests of the self-play trainer

use std::{
    sync::{Arc, Mutex},
    thread,
};

use tactiq::{
    Error, Result,
    config::TrainerConfig,
    pipeline::{MetricsObserver, OpponentType, Trainer},
    ports::{Observer, ProgressReport},
    tictactoe::{GameOutcome, Player},
};

fn seeded(seed: u64) -> Trainer {
    Trainer::new(TrainerConfig::default().with_seed(seed)).unwrap()
}

/// Forwards events into shared state so the test can inspect them afterwards
struct Recorder {
    events: Arc<Mutex<Vec<String>>>,
}

impl Observer for Recorder {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        self.events.lock().unwrap().push(format!("start {total_episodes}"));
        Ok(())
    }

    fn on_progress(&mut self, report: &ProgressReport) -> Result<()> {
        self.events.lock().unwrap().push(format!("progress {}", report.episode));
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        self.events.lock().unwrap().push("end".to_string());
        Ok(())
    }
}

#[test]
fn q_values_stay_within_bound() {
    let mut trainer = seeded(3);
    trainer.train(500, None).unwrap();

    let table = trainer.agent().q_table();
    assert!(!table.is_empty());
    for (_, values) in table.iter() {
        assert!(values.iter().all(|v| v.abs() <= 50.0), "{values:?}");
    }
}

#[test]
fn same_seed_gives_same_rewards() {
    let first = seeded(42).train(200, None).unwrap();
    let second = seeded(42).train(200, None).unwrap();
    assert_eq!(first.len(), 200);
    assert_eq!(first, second);
}

#[test]
fn rewards_are_bounded_per_episode() {
    // At most five agent moves, each worth at most the win reward.
    let rewards = seeded(8).train(300, None).unwrap();
    assert!(rewards.iter().all(|r| r.abs() <= 5.0 * 50.0 + 15.0));
}

/// Keeps every episode outcome for later comparison with reported figures
struct OutcomeLog {
    outcomes: Arc<Mutex<Vec<(GameOutcome, f64)>>>,
}

impl Observer for OutcomeLog {
    fn on_episode_end(&mut self, _episode: usize, outcome: GameOutcome, reward: f64) -> Result<()> {
        self.outcomes.lock().unwrap().push((outcome, reward));
        Ok(())
    }
}

#[test]
fn callback_reports_trailing_window_figures() {
    let mut config = TrainerConfig::default().with_seed(1);
    config.schedule.stats_window = 60;
    let mut trainer = Trainer::new(config).unwrap();
    let outcomes = Arc::new(Mutex::new(Vec::new()));
    trainer.add_observer(Box::new(OutcomeLog {
        outcomes: Arc::clone(&outcomes),
    }));

    let mut calls = Vec::new();
    let mut callback = |episode: usize, mean: f64, rate: f64| calls.push((episode, mean, rate));
    let rewards = trainer.train(175, Some(&mut callback)).unwrap();

    let episodes: Vec<usize> = calls.iter().map(|&(episode, _, _)| episode).collect();
    assert_eq!(episodes, vec![50, 100, 150]);

    let outcomes = outcomes.lock().unwrap();
    assert_eq!(outcomes.len(), rewards.len());
    for &(episode, mean, rate) in &calls {
        let window = episode.saturating_sub(60)..episode;
        let expected_mean =
            rewards[window.clone()].iter().sum::<f64>() / window.len() as f64;
        let wins = outcomes[window]
            .iter()
            .filter(|(outcome, _)| outcome.is_win_for(Player::O))
            .count();

        assert!((mean - expected_mean).abs() < 1e-9, "episode {episode}: {mean} != {expected_mean}");
        assert_eq!(rate, wins as f64 / 10.0, "episode {episode}");
    }
}

#[test]
fn observers_see_the_whole_run() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let mut trainer = seeded(6);
    trainer.add_observer(Box::new(Recorder {
        events: Arc::clone(&events),
    }));
    trainer.train(100, None).unwrap();

    let events = events.lock().unwrap();
    assert_eq!(
        *events,
        vec!["start 100", "progress 50", "progress 100", "end"]
    );
}

#[test]
fn summary_counts_every_episode() {
    let mut trainer = seeded(12);
    trainer.add_observer(Box::new(MetricsObserver::new()));
    let (rewards, summary) = trainer.train_with_summary(250, None).unwrap();

    assert_eq!(summary.episodes, 250);
    assert_eq!(summary.wins + summary.draws + summary.losses, 250);
    assert!(!summary.stopped_early);
    assert_eq!(summary.states_seen, trainer.agent().q_table().len());
    let mean = rewards.iter().sum::<f64>() / rewards.len() as f64;
    assert!((summary.mean_reward - mean).abs() < 1e-9);
}

#[test]
fn stop_handle_ends_training_from_another_thread() {
    let mut trainer = seeded(4);
    let handle = trainer.stop_handle();

    let worker = thread::spawn(move || {
        let rewards = trainer.train(5_000_000, None).unwrap();
        (trainer, rewards)
    });
    handle.stop();
    let (mut trainer, rewards) = worker.join().unwrap();

    assert!(rewards.len() < 5_000_000);
    // The stop flag is cleared once the run has ended.
    assert!(!handle.is_stopped());
    assert_eq!(trainer.train(10, None).unwrap().len(), 10);
}

#[test]
fn trained_agent_can_be_evaluated() {
    let mut trainer = seeded(9);
    trainer.train(300, None).unwrap();

    for opponent in [OpponentType::Expert, OpponentType::Random] {
        let mut learner = opponent.build();
        let result = trainer.evaluate(learner.as_mut(), 40).unwrap();
        assert_eq!(result.games, 40);
        assert_eq!(result.wins + result.draws + result.losses, 40);
        assert_eq!(result.first_player, Player::O);
    }
}

#[test]
fn evaluation_reaches_the_trained_table() {
    let mut trained = seeded(11);
    trained.train(2000, None).unwrap();
    let mut untrained = seeded(11);

    let mut expert = OpponentType::Expert.build();
    let trained_result = trained.evaluate(expert.as_mut(), 50).unwrap();
    let untrained_result = untrained.evaluate(expert.as_mut(), 50).unwrap();

    assert!(trained_result.informed_moves > 0, "{trained_result:?}");
    assert_eq!(untrained_result.informed_moves, 0);
    assert_ne!(trained_result, untrained_result);

    // Training boards always have as many Xs as Os when the agent moves, so
    // an X-first game never lands on one of them.
    let x_first = trained
        .evaluate_with_first_player(expert.as_mut(), 50, Player::X)
        .unwrap();
    assert!(x_first.agent_moves > 0);
    assert_eq!(x_first.informed_moves, 0);
}

#[test]
fn live_game_after_training_starts_empty() {
    let mut trainer = seeded(10);
    trainer.train(20, None).unwrap();
    assert_eq!(trainer.legal_actions().len(), 9);

    trainer.play(0, Player::X).unwrap();
    trainer.play(4, Player::O).unwrap();
    trainer.play(1, Player::X).unwrap();
    let board = *trainer.board();
    let reply = trainer.choose_action(&board).unwrap();
    assert_eq!(reply, 2);

    trainer.play(reply, Player::O).unwrap();
    assert!(trainer.outcome().is_none());
    assert!(matches!(trainer.play(2, Player::X), Err(Error::InvalidMove { position: 2 })));
    assert!(!trainer.check_win(Player::X));
    assert_ne!(trainer.outcome(), Some(GameOutcome::Draw));
}
