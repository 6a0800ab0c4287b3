//! The simulation-module contract
//!
//! A game module owns its hazards and timers and nothing else. The shell
//! drives it through this trait and hands it a `ShellApi` bridge for every
//! call that may mutate run state. Optional callbacks default to no-ops so
//! the shell never probes for presence at call sites.

use crate::config::DifficultyKey;
use crate::render::Canvas;
use crate::shell::bridge::{ShellApi, StateSnapshot};
use crate::view::ViewGeometry;

pub mod lane;
pub mod shield;

pub use lane::LaneGame;
pub use shield::ShieldGame;

/// Keys the shell forwards to modules (Space and the arrows are consumed by
/// the shell itself).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Space,
    ArrowLeft,
    ArrowRight,
    Enter,
}

/// Contract every hosted simulation module implements.
pub trait GameModule {
    /// One-time hookup after the shell is assembled.
    fn init(&mut self, _api: &mut ShellApi<'_>) {}

    /// Swap the active difficulty profile. Only invoked pre-run.
    fn set_difficulty(&mut self, key: DifficultyKey);

    /// Drop all run-scoped state (hazards, timers, counters).
    fn reset_run(&mut self, api: &mut ShellApi<'_>);

    /// Begin a fresh run.
    fn start_run(&mut self, api: &mut ShellApi<'_>);

    /// Advance the simulation by `dt` seconds. Called only while playing.
    fn update(&mut self, dt: f32, api: &mut ShellApi<'_>);

    /// Render against the supplied geometry snapshot. Called every frame
    /// regardless of phase.
    fn draw(&self, canvas: &mut Canvas, view: &ViewGeometry, snapshot: &StateSnapshot);

    /// Pointer interaction while playing (lane selection is shell-side).
    fn on_pointer_down(&mut self, _x: f32, _y: f32, _api: &mut ShellApi<'_>) {}

    /// Key interaction while playing.
    fn on_key_down(&mut self, _key: Key, _api: &mut ShellApi<'_>) {}

    /// Pause-state edge notification.
    fn on_pause_changed(&mut self, _paused: bool) {}

    /// Drop all live hazards (continue/restart housekeeping).
    fn clear_hazards(&mut self) {}

    /// Resume hazard emission cleanly after a continue, without replaying
    /// stale timers.
    fn start_stream(&mut self, _api: &mut ShellApi<'_>) {}
}
