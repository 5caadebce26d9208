//! Subcommands of the `tactiq` binary

pub mod evaluate;
pub mod play;
pub mod train;
