//! CLI infrastructure for the tactiq trainer
//!
//! This module provides the command-line interface for training the agent,
//! evaluating it against fixed opponents and playing against it.

pub mod commands;
pub mod output;
