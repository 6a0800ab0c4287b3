//! Capability bridge between the shell and the active module
//!
//! `ShellApi` is constructed by the shell around each module call. Score and
//! level changes go through the run state's clamped setters immediately;
//! game-over and hazard-clear are deferred flags the shell applies after the
//! update step returns, so a module can request them mid-iteration and then
//! simply return.

use crate::config::DifficultyKey;
use crate::feedback::{AudioCue, AudioSink, HapticSink};
use crate::shell::state::{Lane, RunPhase, RunState};
use crate::view::ViewGeometry;

/// Read-only view of the run state handed to modules.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateSnapshot {
    pub phase: RunPhase,
    pub score: u32,
    pub level: u32,
    pub best: u32,
    pub difficulty: DifficultyKey,
    pub can_continue: bool,
    pub continues_used: u8,
    pub player_lane: Lane,
}

impl StateSnapshot {
    pub fn of(run: &RunState) -> Self {
        Self {
            phase: run.phase,
            score: run.score(),
            level: run.level(),
            best: run.best,
            difficulty: run.difficulty,
            can_continue: run.can_continue,
            continues_used: run.continues_used,
            player_lane: run.player_lane,
        }
    }
}

/// Effects a module requested during a bridge scope, applied by the shell
/// after the module call returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BridgeEffects {
    pub game_over: bool,
    pub clear_hazards: bool,
}

/// The capability interface a module sees.
pub struct ShellApi<'a> {
    run: &'a mut RunState,
    view: &'a ViewGeometry,
    playable: bool,
    audio: &'a mut dyn AudioSink,
    haptics: &'a mut dyn HapticSink,
    sound_enabled: bool,
    effects: BridgeEffects,
}

impl<'a> ShellApi<'a> {
    pub(crate) fn new(
        run: &'a mut RunState,
        view: &'a ViewGeometry,
        playable: bool,
        audio: &'a mut dyn AudioSink,
        haptics: &'a mut dyn HapticSink,
        sound_enabled: bool,
    ) -> Self {
        Self {
            run,
            view,
            playable,
            audio,
            haptics,
            sound_enabled,
            effects: BridgeEffects::default(),
        }
    }

    /// Current run state snapshot.
    pub fn state(&self) -> StateSnapshot {
        StateSnapshot::of(self.run)
    }

    pub fn set_score(&mut self, n: i64) {
        self.run.set_score(n);
    }

    pub fn add_score(&mut self, delta: i64) {
        self.run.add_score(delta);
    }

    pub fn set_level(&mut self, n: i64) {
        self.run.set_level(n);
    }

    /// View geometry snapshot for this frame.
    pub fn view(&self) -> &ViewGeometry {
        self.view
    }

    pub fn is_playable_size(&self) -> bool {
        self.playable
    }

    /// Request the run to end. Honored by the shell only while `Playing`;
    /// anything else is a silent no-op.
    pub fn request_game_over(&mut self) {
        self.effects.game_over = true;
    }

    /// Ask the shell to clear the module's hazards after this call returns.
    pub fn clear_hazards(&mut self) {
        self.effects.clear_hazards = true;
    }

    pub fn play_hit(&mut self) {
        self.cue(AudioCue::Hit);
    }

    pub fn play_level_up(&mut self) {
        self.cue(AudioCue::LevelUp);
    }

    pub fn play_death(&mut self) {
        self.cue(AudioCue::Death);
    }

    pub fn haptic(&mut self, duration_ms: u32) {
        self.haptics.pulse(duration_ms);
    }

    fn cue(&mut self, cue: AudioCue) {
        if self.sound_enabled {
            self.audio.play(cue);
        }
    }

    /// Consume the bridge and return the deferred effects.
    pub(crate) fn finish(self) -> BridgeEffects {
        self.effects
    }
}

#[cfg(test)]
pub(crate) mod harness {
    //! Bridge harness for module-level tests.

    use super::*;
    use crate::feedback::NullHaptics;
    use crate::feedback::recording::RecordingAudio;
    use crate::view::{PlayfieldLayout, ViewGeometry, Viewport};

    pub struct BridgeHarness {
        pub run: RunState,
        pub view: ViewGeometry,
        /// Recording sink so module tests can assert on emitted cues.
        pub audio: RecordingAudio,
        pub haptics: NullHaptics,
        pub effects: BridgeEffects,
    }

    impl BridgeHarness {
        /// Playing-state harness on a 400x800 portrait viewport.
        pub fn playing(difficulty: DifficultyKey) -> Self {
            let mut run = RunState::new(difficulty, 0);
            run.phase = RunPhase::Playing;
            let view = ViewGeometry::compute(
                &Viewport::new(400.0, 800.0),
                &PlayfieldLayout::default(),
                0.0,
            );
            Self {
                run,
                view,
                audio: RecordingAudio::default(),
                haptics: NullHaptics,
                effects: BridgeEffects::default(),
            }
        }

        /// Run `f` with a fresh bridge; effects accumulate on the harness.
        pub fn with_api<R>(&mut self, f: impl FnOnce(&mut ShellApi<'_>) -> R) -> R {
            let mut api = ShellApi::new(
                &mut self.run,
                &self.view,
                true,
                &mut self.audio,
                &mut self.haptics,
                true,
            );
            let out = f(&mut api);
            let effects = api.finish();
            self.effects.game_over |= effects.game_over;
            self.effects.clear_hazards |= effects.clear_hazards;
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::harness::BridgeHarness;
    use super::*;
    use crate::config::DifficultyKey;

    #[test]
    fn test_bridge_clamps_through_run_state() {
        let mut h = BridgeHarness::playing(DifficultyKey::Easy);
        h.with_api(|api| {
            api.set_score(-5);
            api.set_level(0);
        });
        assert_eq!(h.run.score(), 0);
        assert_eq!(h.run.level(), 1);

        h.with_api(|api| {
            api.add_score(7);
            api.add_score(-100);
        });
        assert_eq!(h.run.score(), 0);
    }

    #[test]
    fn test_deferred_effects_surface_after_finish() {
        let mut h = BridgeHarness::playing(DifficultyKey::Easy);
        h.with_api(|api| {
            assert!(api.is_playable_size());
            api.request_game_over();
        });
        assert!(h.effects.game_over);
        assert!(!h.effects.clear_hazards);
    }
}
