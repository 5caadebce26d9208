//! Tabular Q-learning for Tic-Tac-Toe
//!
//! This crate provides:
//! - Board representation, line analysis and game outcomes
//! - Tactical heuristics: threat detection, forks and a rule-based expert
//! - Shaped rewards and a bounded Q-table agent playing O
//! - A self-play trainer with observers, cooperative stop and evaluation
//! - A command-line interface for training, evaluation and console play

pub mod cli;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod ports;
pub mod q_learning;
pub mod reward;
pub mod tactics;
pub mod tictactoe;

pub use config::{Hyperparameters, RewardConfig, ScheduleConfig, TrainerConfig};
pub use error::{Error, Result};
pub use pipeline::{EvaluationResult, StopHandle, Trainer, TrainingSummary};
pub use q_learning::{QAgent, QTable};
pub use reward::{RewardKind, RewardShaper};
pub use tictactoe::{BoardState, Cell, GameOutcome, Player};
