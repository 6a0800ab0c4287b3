//! Run-lifecycle shell
//!
//! Owns the run state machine, the capability bridge, and the frame driver
//! that feeds the active simulation module.

pub mod bridge;
pub mod machine;
pub mod state;

pub use bridge::{ShellApi, StateSnapshot};
pub use machine::Shell;
pub use state::{Lane, PauseReason, RunPhase, RunState};
