//! Run state machine and frame driver
//!
//! The shell owns the run lifecycle (ready/playing/paused/dead plus the
//! one-continue ad flow), the score/level bookkeeping, and the per-frame
//! orchestration of the active module. All lifecycle requests made outside
//! their valid source state are silent no-ops.
//!
//! The ad countdown is an explicit remaining-seconds counter advanced by the
//! same frame driver that advances gameplay, so it is deterministic under
//! synthetic frame deltas and needs no host timer.

use crate::config::{ConfigError, DifficultyKey, GameConfig};
use crate::consts::MAX_FRAME_DT;
use crate::feedback::{AudioCue, AudioSink, HapticSink};
use crate::games::{GameModule, Key};
use crate::render::Canvas;
use crate::shell::bridge::{BridgeEffects, ShellApi, StateSnapshot};
use crate::shell::state::{Lane, PauseReason, RunPhase, RunState};
use crate::store::{FunnelMetrics, FunnelStage, KvStore, Store};
use crate::view::{ViewGeometry, Viewport};

/// The shared run-lifecycle controller hosting one simulation module.
pub struct Shell<G: GameModule> {
    module: G,
    config: GameConfig,
    run: RunState,
    store: Store,
    audio: Box<dyn AudioSink>,
    haptics: Box<dyn HapticSink>,
    viewport: Viewport,
    sound_enabled: bool,
    ad_seconds_left: u32,
    ad_accum: f32,
}

impl<G: GameModule> Shell<G> {
    /// Assemble the shell. Configuration problems are fatal here; nothing
    /// else in the lifecycle returns errors.
    pub fn new(
        mut module: G,
        config: GameConfig,
        kv: Box<dyn KvStore>,
        audio: Box<dyn AudioSink>,
        haptics: Box<dyn HapticSink>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let store = Store::new(kv, config.storage.clone());
        let run = RunState::new(config.default_difficulty, store.best());
        let sound_enabled = store.sound_enabled();
        module.set_difficulty(config.default_difficulty);
        let mut shell = Self {
            module,
            config,
            run,
            store,
            audio,
            haptics,
            viewport: Viewport::new(0.0, 0.0),
            sound_enabled,
            ad_seconds_left: 0,
            ad_accum: 0.0,
        };
        let _ = shell.with_api(|module, api| module.init(api));
        log::info!(
            "shell booted: {} (best {}, {} lifetime runs)",
            shell.config.title,
            shell.run.best,
            shell.store.runs()
        );
        Ok(shell)
    }

    // ---- frame driver -----------------------------------------------------

    /// Advance one frame: clamp the delta, tick the ad countdown, update the
    /// module while playing, then draw against a fresh geometry snapshot.
    pub fn frame(&mut self, dt_seconds: f32, canvas: &mut Canvas) {
        let dt = dt_seconds.clamp(0.0, MAX_FRAME_DT);

        self.advance_ad_countdown(dt);

        if self.run.phase == RunPhase::Playing {
            let ((), effects) = self.with_api(|module, api| module.update(dt, api));
            self.apply_effects(effects);
        }

        canvas.begin_frame();
        let view = self.view_geometry();
        let snapshot = StateSnapshot::of(&self.run);
        self.module.draw(canvas, &view, &snapshot);
    }

    fn advance_ad_countdown(&mut self, dt: f32) {
        if self.run.phase != RunPhase::AdCountdown {
            return;
        }
        self.ad_accum += dt;
        while self.ad_accum >= 1.0 && self.ad_seconds_left > 0 {
            self.ad_accum -= 1.0;
            self.ad_seconds_left -= 1;
        }
        if self.ad_seconds_left == 0 {
            self.store.bump(FunnelStage::Completed);
            self.store.bump(FunnelStage::Granted);
            self.run.phase = RunPhase::AdReady;
            log::info!("ad countdown complete; continue granted");
        }
    }

    // ---- lifecycle transitions ---------------------------------------------

    /// Start a run (ready -> playing). Ignored outside `Ready` or while the
    /// viewport is unplayable.
    pub fn start(&mut self) {
        if self.run.phase != RunPhase::Ready {
            log::trace!("start ignored in {:?}", self.run.phase);
            return;
        }
        if !self.is_playable() {
            log::debug!("start blocked: viewport unplayable");
            return;
        }
        let runs = self.store.increment_runs();
        self.run.reset_run();
        self.run.phase = RunPhase::Playing;
        log::info!(
            "run {} started ({})",
            runs,
            self.run.difficulty.as_str()
        );
        let ((), effects) = self.with_api(|module, api| module.start_run(api));
        self.apply_effects(effects);
        self.module.on_pause_changed(false);
    }

    /// Pause (playing -> paused). Ignored outside `Playing`.
    pub fn pause(&mut self, reason: PauseReason) {
        if self.run.phase != RunPhase::Playing {
            log::trace!("pause ignored in {:?}", self.run.phase);
            return;
        }
        self.run.phase = RunPhase::Paused;
        self.run.pause_reason = Some(reason);
        self.haptics.pulse(20);
        log::debug!("paused ({reason:?})");
        self.module.on_pause_changed(true);
    }

    /// Resume (paused -> playing). Explicit only, and only while playable.
    pub fn resume(&mut self) {
        if self.run.phase != RunPhase::Paused {
            log::trace!("resume ignored in {:?}", self.run.phase);
            return;
        }
        if !self.is_playable() {
            log::debug!("resume blocked: viewport unplayable");
            return;
        }
        self.run.phase = RunPhase::Playing;
        self.run.pause_reason = None;
        self.haptics.pulse(15);
        self.module.on_pause_changed(false);
    }

    pub fn toggle_pause(&mut self) {
        match self.run.phase {
            RunPhase::Playing => self.pause(PauseReason::Manual),
            RunPhase::Paused => self.resume(),
            _ => {}
        }
    }

    /// Consume the continue offer (dead -> ad_countdown). The offer dies the
    /// instant this is accepted, not when the countdown finishes.
    pub fn continue_run(&mut self) {
        if self.run.phase != RunPhase::Dead
            || !self.config.rewarded.enabled
            || !self.run.can_continue
        {
            log::trace!("continue ignored in {:?}", self.run.phase);
            return;
        }
        self.store.bump(FunnelStage::Clicked);
        self.run.consume_continue();
        self.ad_seconds_left = self.config.rewarded.countdown_seconds;
        self.ad_accum = 0.0;
        self.run.phase = RunPhase::AdCountdown;
        log::info!("continue consumed; {}s countdown", self.ad_seconds_left);
    }

    /// Acknowledge the finished countdown (ad_ready -> playing): clear
    /// hazards and restart the module's stream cleanly.
    pub fn acknowledge_continue(&mut self) {
        if self.run.phase != RunPhase::AdReady {
            log::trace!("continue-acknowledge ignored in {:?}", self.run.phase);
            return;
        }
        self.run.phase = RunPhase::Playing;
        self.module.clear_hazards();
        let ((), effects) = self.with_api(|module, api| module.start_stream(api));
        self.apply_effects(effects);
        self.module.on_pause_changed(false);
    }

    /// Restart (dead -> ready). Always available after death.
    pub fn restart(&mut self) {
        if self.run.phase != RunPhase::Dead {
            log::trace!("restart ignored in {:?}", self.run.phase);
            return;
        }
        self.run.reset_run();
        self.run.phase = RunPhase::Ready;
        let ((), effects) = self.with_api(|module, api| module.reset_run(api));
        self.apply_effects(effects);
    }

    /// Primary host button: start / resume / continue-acknowledge / restart
    /// depending on phase.
    pub fn primary_action(&mut self) {
        match self.run.phase {
            RunPhase::Ready => self.start(),
            RunPhase::Paused => self.resume(),
            RunPhase::AdReady => self.acknowledge_continue(),
            RunPhase::Dead => self.restart(),
            _ => {}
        }
    }

    /// Switch difficulty. Permitted only pre-run; recomputes the module's
    /// derived per-difficulty constants but never touches live hazards.
    pub fn set_difficulty(&mut self, key: DifficultyKey) {
        if self.run.phase != RunPhase::Ready {
            log::trace!("difficulty change ignored in {:?}", self.run.phase);
            return;
        }
        self.run.difficulty = key;
        self.module.set_difficulty(key);
        log::debug!("difficulty set to {}", key.as_str());
    }

    fn on_game_over(&mut self) {
        if self.run.phase != RunPhase::Playing {
            log::trace!("game-over ignored in {:?}", self.run.phase);
            return;
        }
        if self.sound_enabled {
            self.audio.play(AudioCue::Death);
        }
        self.haptics.pulse(30);

        let score = self.run.score();
        if self.store.record_best(score) {
            self.run.best = score;
        }

        self.run.phase = RunPhase::Dead;
        self.run.can_continue = self.config.rewarded.enabled && self.run.continues_used == 0;
        if self.run.can_continue {
            self.store.bump(FunnelStage::Offered);
        }
        self.module.on_pause_changed(true);
        log::info!("run ended: score {score}, best {}", self.run.best);
    }

    // ---- host signals ------------------------------------------------------

    /// Resize signal. Always pauses an active run (defensive), with the
    /// unplayable-viewport reason taking precedence.
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.viewport = Viewport::new(width, height);
        if self.run.phase == RunPhase::Playing {
            let reason = if self.is_playable() {
                PauseReason::Resized
            } else {
                PauseReason::UnplayableViewport
            };
            self.pause(reason);
        }
    }

    /// Window blur. Pauses an active run.
    pub fn on_focus_lost(&mut self) {
        self.pause(PauseReason::FocusLost);
    }

    /// Page/visibility hidden. Pauses an active run.
    pub fn on_visibility_hidden(&mut self) {
        self.pause(PauseReason::FocusLost);
    }

    /// Pointer interaction: starts a ready run (setting the lane first) or
    /// forwards to the playing module.
    pub fn pointer_down(&mut self, x: f32, y: f32) {
        if !self.is_playable() {
            self.pause(PauseReason::UnplayableViewport);
            return;
        }
        match self.run.phase {
            RunPhase::Ready => {
                // start() resets the run record, so the tapped lane goes in
                // after the reset.
                let lane = Lane::from_pointer_x(x, self.viewport.width);
                self.start();
                self.run.player_lane = lane;
            }
            RunPhase::Playing => {
                self.run.player_lane = Lane::from_pointer_x(x, self.viewport.width);
                let ((), effects) =
                    self.with_api(|module, api| module.on_pointer_down(x, y, api));
                self.apply_effects(effects);
            }
            _ => {}
        }
    }

    /// Keyboard interaction: Space toggles pause, arrows steer the lane,
    /// everything else goes to the playing module.
    pub fn key_down(&mut self, key: Key) {
        match key {
            Key::Space => self.toggle_pause(),
            Key::ArrowLeft if self.run.phase == RunPhase::Playing => {
                self.run.player_lane = Lane::Left;
            }
            Key::ArrowRight if self.run.phase == RunPhase::Playing => {
                self.run.player_lane = Lane::Right;
            }
            other if self.run.phase == RunPhase::Playing => {
                let ((), effects) = self.with_api(|module, api| module.on_key_down(other, api));
                self.apply_effects(effects);
            }
            _ => {}
        }
    }

    /// Persisted sound preference; gates all audio cues.
    pub fn set_sound_enabled(&mut self, on: bool) {
        self.sound_enabled = on;
        self.store.set_sound_enabled(on);
    }

    // ---- accessors ----------------------------------------------------------

    pub fn phase(&self) -> RunPhase {
        self.run.phase
    }

    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot::of(&self.run)
    }

    pub fn pause_reason(&self) -> Option<PauseReason> {
        self.run.pause_reason
    }

    /// Whether the continue offer is live right now.
    pub fn continue_available(&self) -> bool {
        self.run.phase == RunPhase::Dead && self.config.rewarded.enabled && self.run.can_continue
    }

    /// Remaining whole seconds of the ad countdown.
    pub fn ad_seconds_left(&self) -> u32 {
        self.ad_seconds_left
    }

    pub fn is_playable(&self) -> bool {
        self.config.viewport.is_playable(&self.viewport)
    }

    /// Soft portrait-preferred warning for host UI.
    pub fn orientation_warning(&self) -> bool {
        self.config.viewport.orientation_warning(&self.viewport)
    }

    pub fn metrics(&self) -> FunnelMetrics {
        self.store.metrics()
    }

    pub fn lifetime_runs(&self) -> u32 {
        self.store.runs()
    }

    pub fn sound_enabled(&self) -> bool {
        self.sound_enabled
    }

    pub fn module(&self) -> &G {
        &self.module
    }

    // ---- plumbing -----------------------------------------------------------

    fn view_geometry(&self) -> ViewGeometry {
        let reserve = match self.run.phase {
            RunPhase::Playing | RunPhase::Paused => self.config.playfield.ui_dock_px,
            _ => 0.0,
        };
        ViewGeometry::compute(&self.viewport, &self.config.playfield, reserve)
    }

    /// Run a module call inside a bridge scope and hand back the deferred
    /// effects. The geometry snapshot is computed fresh per scope.
    fn with_api<R>(&mut self, f: impl FnOnce(&mut G, &mut ShellApi<'_>) -> R) -> (R, BridgeEffects) {
        let view = self.view_geometry();
        let playable = self.config.viewport.is_playable(&self.viewport);
        let Self {
            module,
            run,
            audio,
            haptics,
            sound_enabled,
            ..
        } = self;
        let mut api = ShellApi::new(
            run,
            &view,
            playable,
            audio.as_mut(),
            haptics.as_mut(),
            *sound_enabled,
        );
        let out = f(module, &mut api);
        (out, api.finish())
    }

    fn apply_effects(&mut self, effects: BridgeEffects) {
        if effects.clear_hazards {
            self.module.clear_hazards();
        }
        if effects.game_over {
            self.on_game_over();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::recording::{RecordingAudio, RecordingHaptics};
    use crate::feedback::{NullAudio, NullHaptics};
    use crate::store::MemoryStore;

    /// Minimal module that can request game over on demand and records the
    /// calls the shell makes into it.
    #[derive(Default)]
    struct ProbeModule {
        die_on_update: bool,
        score_per_update: i64,
        updates: u32,
        clears: u32,
        streams: u32,
        resets: u32,
        pause_edges: Vec<bool>,
        difficulty: Option<DifficultyKey>,
    }

    impl GameModule for ProbeModule {
        fn set_difficulty(&mut self, key: DifficultyKey) {
            self.difficulty = Some(key);
        }

        fn reset_run(&mut self, _api: &mut ShellApi<'_>) {
            self.resets += 1;
        }

        fn start_run(&mut self, _api: &mut ShellApi<'_>) {}

        fn update(&mut self, _dt: f32, api: &mut ShellApi<'_>) {
            self.updates += 1;
            if self.score_per_update != 0 {
                api.add_score(self.score_per_update);
            }
            if self.die_on_update {
                api.request_game_over();
            }
        }

        fn draw(
            &self,
            canvas: &mut Canvas,
            _view: &crate::view::ViewGeometry,
            _snapshot: &StateSnapshot,
        ) {
            canvas.clear(crate::render::Color::rgba(0.0, 0.0, 0.0, 1.0));
        }

        fn clear_hazards(&mut self) {
            self.clears += 1;
        }

        fn start_stream(&mut self, _api: &mut ShellApi<'_>) {
            self.streams += 1;
        }

        fn on_pause_changed(&mut self, paused: bool) {
            self.pause_edges.push(paused);
        }
    }

    fn shell_with(module: ProbeModule) -> Shell<ProbeModule> {
        let mut shell = Shell::new(
            module,
            GameConfig::lane_catch(),
            Box::new(MemoryStore::new()),
            Box::new(NullAudio),
            Box::new(NullHaptics),
        )
        .unwrap();
        shell.set_viewport(400.0, 800.0);
        shell
    }

    fn run_frames(shell: &mut Shell<ProbeModule>, count: u32, dt: f32) {
        let mut canvas = Canvas::new();
        for _ in 0..count {
            shell.frame(dt, &mut canvas);
        }
    }

    #[test]
    fn test_invalid_config_is_fatal_at_boot() {
        let mut cfg = GameConfig::lane_catch();
        cfg.rewarded.countdown_seconds = 0;
        let result = Shell::new(
            ProbeModule::default(),
            cfg,
            Box::new(MemoryStore::new()),
            Box::new(NullAudio),
            Box::new(NullHaptics),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_start_requires_ready_and_playable() {
        let mut shell = shell_with(ProbeModule::default());
        shell.set_viewport(100.0, 100.0); // too small
        shell.start();
        assert_eq!(shell.phase(), RunPhase::Ready);

        shell.set_viewport(400.0, 800.0);
        shell.start();
        assert_eq!(shell.phase(), RunPhase::Playing);
        assert_eq!(shell.lifetime_runs(), 1);

        // start() while already playing is a no-op
        shell.start();
        assert_eq!(shell.lifetime_runs(), 1);
    }

    #[test]
    fn test_game_over_ignored_unless_playing() {
        let mut shell = shell_with(ProbeModule {
            die_on_update: true,
            ..ProbeModule::default()
        });
        // Not playing: update never runs, phase holds.
        run_frames(&mut shell, 3, 0.016);
        assert_eq!(shell.phase(), RunPhase::Ready);
        assert_eq!(shell.module().updates, 0);

        shell.start();
        run_frames(&mut shell, 1, 0.016);
        assert_eq!(shell.phase(), RunPhase::Dead);
    }

    #[test]
    fn test_best_committed_on_death() {
        let mut shell = shell_with(ProbeModule {
            die_on_update: true,
            score_per_update: 7,
            ..ProbeModule::default()
        });
        shell.start();
        run_frames(&mut shell, 1, 0.016);
        assert_eq!(shell.snapshot().best, 7);
    }

    #[test]
    fn test_continue_flow_end_to_end() {
        let mut shell = shell_with(ProbeModule {
            die_on_update: true,
            ..ProbeModule::default()
        });
        shell.start();
        run_frames(&mut shell, 1, 0.016);
        assert_eq!(shell.phase(), RunPhase::Dead);
        assert!(shell.continue_available());
        assert_eq!(shell.metrics().continue_offered, 1);

        // The offer dies the instant it is consumed.
        shell.continue_run();
        assert_eq!(shell.phase(), RunPhase::AdCountdown);
        assert!(!shell.continue_available());
        assert_eq!(shell.snapshot().continues_used, 1);
        assert_eq!(shell.metrics().continue_clicked, 1);
        assert_eq!(shell.ad_seconds_left(), 5);

        // 5 seconds of synthetic frames finish the countdown without input.
        run_frames(&mut shell, 260, 0.02);
        assert_eq!(shell.phase(), RunPhase::AdReady);
        assert_eq!(shell.metrics().continue_completed, 1);
        assert_eq!(shell.metrics().continue_granted, 1);

        // Acknowledge clears hazards and restarts the stream.
        shell.module.die_on_update = false;
        shell.acknowledge_continue();
        assert_eq!(shell.phase(), RunPhase::Playing);
        assert_eq!(shell.module().clears, 1);
        assert_eq!(shell.module().streams, 1);
    }

    #[test]
    fn test_one_continue_per_run() {
        let mut shell = shell_with(ProbeModule {
            die_on_update: true,
            ..ProbeModule::default()
        });
        shell.start();
        run_frames(&mut shell, 1, 0.016);
        shell.continue_run();
        run_frames(&mut shell, 300, 0.02);
        shell.module.die_on_update = true;
        shell.acknowledge_continue();

        // Die again: no second offer this run.
        run_frames(&mut shell, 1, 0.016);
        assert_eq!(shell.phase(), RunPhase::Dead);
        assert!(!shell.continue_available());
        shell.continue_run();
        assert_eq!(shell.phase(), RunPhase::Dead);

        // Restart is always available and re-arms the offer for a new run.
        shell.restart();
        assert_eq!(shell.phase(), RunPhase::Ready);
        assert_eq!(shell.module().resets, 1);
        assert_eq!(shell.snapshot().continues_used, 0);
    }

    #[test]
    fn test_countdown_survives_pause_signals() {
        let mut shell = shell_with(ProbeModule {
            die_on_update: true,
            ..ProbeModule::default()
        });
        shell.start();
        run_frames(&mut shell, 1, 0.016);
        shell.continue_run();

        // Blur and resize during the countdown neither pause nor cancel it.
        shell.on_focus_lost();
        shell.set_viewport(410.0, 800.0);
        assert_eq!(shell.phase(), RunPhase::AdCountdown);
        run_frames(&mut shell, 300, 0.02);
        assert_eq!(shell.phase(), RunPhase::AdReady);
    }

    #[test]
    fn test_pause_sources_only_bite_while_playing() {
        let mut shell = shell_with(ProbeModule::default());
        shell.on_focus_lost();
        assert_eq!(shell.phase(), RunPhase::Ready);

        shell.start();
        shell.on_focus_lost();
        assert_eq!(shell.phase(), RunPhase::Paused);
        assert_eq!(shell.pause_reason(), Some(PauseReason::FocusLost));

        // Resize while paused keeps it paused; no resume.
        shell.set_viewport(500.0, 900.0);
        assert_eq!(shell.phase(), RunPhase::Paused);

        shell.resume();
        assert_eq!(shell.phase(), RunPhase::Playing);

        // Resize while playing always pauses, even when still playable.
        shell.set_viewport(390.0, 780.0);
        assert_eq!(shell.phase(), RunPhase::Paused);
        assert_eq!(shell.pause_reason(), Some(PauseReason::Resized));
    }

    #[test]
    fn test_resume_blocked_while_unplayable() {
        let mut shell = shell_with(ProbeModule::default());
        shell.start();
        shell.set_viewport(100.0, 100.0);
        assert_eq!(shell.phase(), RunPhase::Paused);
        assert_eq!(shell.pause_reason(), Some(PauseReason::UnplayableViewport));

        shell.resume();
        assert_eq!(shell.phase(), RunPhase::Paused);

        shell.set_viewport(400.0, 800.0);
        shell.resume();
        assert_eq!(shell.phase(), RunPhase::Playing);
    }

    #[test]
    fn test_pointer_starts_run_and_sets_lane() {
        let mut shell = shell_with(ProbeModule::default());
        shell.pointer_down(350.0, 400.0);
        assert_eq!(shell.phase(), RunPhase::Playing);
        assert_eq!(shell.snapshot().player_lane, Lane::Right);

        shell.pointer_down(10.0, 400.0);
        assert_eq!(shell.snapshot().player_lane, Lane::Left);
    }

    #[test]
    fn test_arrow_keys_steer_only_while_playing() {
        let mut shell = shell_with(ProbeModule::default());
        shell.key_down(Key::ArrowRight);
        assert_eq!(shell.snapshot().player_lane, Lane::Left);

        shell.start();
        shell.key_down(Key::ArrowRight);
        assert_eq!(shell.snapshot().player_lane, Lane::Right);

        shell.key_down(Key::Space);
        assert_eq!(shell.phase(), RunPhase::Paused);
        shell.key_down(Key::Space);
        assert_eq!(shell.phase(), RunPhase::Playing);
    }

    #[test]
    fn test_difficulty_locked_during_run() {
        let mut shell = shell_with(ProbeModule::default());
        shell.set_difficulty(DifficultyKey::Hard);
        assert_eq!(shell.snapshot().difficulty, DifficultyKey::Hard);

        shell.start();
        shell.set_difficulty(DifficultyKey::Easy);
        assert_eq!(shell.snapshot().difficulty, DifficultyKey::Hard);
    }

    #[test]
    fn test_sound_flag_gates_death_cue() {
        let audio = RecordingAudio::default();
        let cues = audio.handle();
        let haptics = RecordingHaptics::default();
        let pulses = haptics.handle();

        let mut shell = Shell::new(
            ProbeModule {
                die_on_update: true,
                ..ProbeModule::default()
            },
            GameConfig::lane_catch(),
            Box::new(MemoryStore::new()),
            Box::new(audio),
            Box::new(haptics),
        )
        .unwrap();
        shell.set_viewport(400.0, 800.0);
        shell.set_sound_enabled(false);

        shell.start();
        run_frames(&mut shell, 1, 0.016);
        assert_eq!(shell.phase(), RunPhase::Dead);
        assert!(cues.borrow().is_empty());
        // Haptics are not gated by the sound flag.
        assert!(pulses.borrow().contains(&30));
    }

    #[test]
    fn test_draw_runs_every_frame() {
        let mut shell = shell_with(ProbeModule::default());
        let mut canvas = Canvas::new();
        shell.frame(0.016, &mut canvas);
        assert!(!canvas.is_empty());
    }

    #[test]
    fn test_frame_delta_is_clamped() {
        let mut shell = shell_with(ProbeModule {
            die_on_update: true,
            ..ProbeModule::default()
        });
        shell.start();
        shell.continue_run(); // no-op: not dead
        assert_eq!(shell.phase(), RunPhase::Playing);

        // A giant stall delta still only advances the countdown by the clamp.
        let mut canvas = Canvas::new();
        shell.frame(10.0, &mut canvas);
        assert_eq!(shell.phase(), RunPhase::Dead);
        shell.continue_run();
        shell.frame(10.0, &mut canvas);
        assert_eq!(shell.phase(), RunPhase::AdCountdown);
        assert_eq!(shell.ad_seconds_left(), 5);
    }
}
