//! Ports (trait boundaries) for external collaborators.
//!
//! These traits are owned by the training core and implemented by adapters
//! in the pipeline layer or by consumers of the crate.

pub mod learner;
pub mod observer;

pub use learner::Learner;
pub use observer::{Observer, ProgressReport};
