//! Arcade Shell - a shared run-lifecycle controller for arcade minigames
//!
//! Core modules:
//! - `shell`: run state machine, capability bridge, frame driver
//! - `games`: the module contract plus the two hosted simulations
//!   (lane catch and shard shield)
//! - `config`: validated game configuration and difficulty profiles
//! - `store`: persistent key-value contract (best score, run count, metrics)
//! - `view`: viewport policy and view geometry snapshots
//! - `render`: retained draw-command surface the modules render into
//! - `feedback`: audio/haptic capability seams

pub mod config;
pub mod feedback;
pub mod games;
pub mod render;
pub mod shell;
pub mod store;
pub mod view;

pub use config::{DifficultyKey, GameConfig};
pub use games::GameModule;
pub use shell::{Lane, RunPhase, Shell};
pub use store::{KvStore, MemoryStore};

/// Shared frame-driver constants
pub mod consts {
    /// Maximum elapsed time accepted per frame (seconds). Larger deltas are
    /// clamped so a stalled tab cannot produce a catastrophic step.
    pub const MAX_FRAME_DT: f32 = 0.033;

    /// Seconds of invulnerability granted right after a continue.
    pub const CONTINUE_INVULN_SECS: f32 = 0.9;
}

/// Linear interpolation, clamped to the [a, b] segment.
#[inline]
pub fn lerp_clamped(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t.clamp(0.0, 1.0)
}
