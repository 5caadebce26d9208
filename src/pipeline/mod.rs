//! Training and evaluation pipeline
//!
//! This module provides:
//! - The self-play [`Trainer`] and its live-game surface
//! - Evaluation of the learned policy against fixed opponents
//! - Observer adapters for progress display and metrics

pub mod evaluation;
pub mod observers;
pub mod opponents;
pub mod stats;
pub mod training;

pub use evaluation::{EvaluationResult, evaluate};
pub use observers::{MetricsObserver, MetricsSummary, ProgressObserver};
pub use opponents::{ExpertLearner, OpponentType, RandomLearner};
pub use stats::RollingStats;
pub use training::{EpisodeResult, ProgressCallback, StopHandle, Trainer, TrainingSummary};

pub use crate::ports::{Learner, Observer};
