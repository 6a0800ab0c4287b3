//! Lane-catch simulation module
//!
//! Orbs fall down two lanes; the player occupies one lane and catches what
//! reaches the line. One miss ends the run. Spawn cadence, fall speed and
//! lane choice all come from the scheduler, driven by a seeded rng so runs
//! replay deterministically.

pub mod scheduler;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::config::{DifficultyKey, LaneProfile};
use crate::games::GameModule;
use crate::render::{Canvas, Color};
use crate::shell::bridge::{ShellApi, StateSnapshot};
use crate::shell::state::{Lane, RunPhase};
use crate::view::ViewGeometry;

const ORB_RADIUS: f32 = 20.0;
const PLAYER_RADIUS: f32 = 26.0;
/// Pixels past the catch line before a miss counts, so grazes stay catches.
const MISS_GRACE: f32 = 10.0;
const LANE_FLASH_MS: f32 = 120.0;
const HISTORY_CAP: usize = 30;

/// Hue derived from where the fall speed sits in the level's range.
fn orb_hue(speed: f32, lo: f32, hi: f32) -> f32 {
    let t = if hi > lo { (speed - lo) / (hi - lo) } else { 0.0 };
    crate::lerp_clamped(160.0, 280.0, t)
}

#[derive(Debug, Clone)]
struct Orb {
    /// Append-order identity token; never reused within a run.
    id: u32,
    lane: Lane,
    y: f32,
    speed: f32,
    radius: f32,
    hue: f32,
}

pub struct LaneGame {
    profile: LaneProfile,
    rng: Pcg32,
    orbs: Vec<Orb>,
    /// Countdown to the next spawn, milliseconds.
    next_spawn_in_ms: f32,
    last_spawn_lane: Option<Lane>,
    lane_history: Vec<Lane>,
    next_orb_id: u32,
    hits: u32,
    level: u32,
    flash_ms: f32,
    last_player_lane: Lane,
}

impl LaneGame {
    pub fn new(seed: u64) -> Self {
        Self {
            profile: *LaneProfile::for_difficulty(DifficultyKey::default()),
            rng: Pcg32::seed_from_u64(seed),
            orbs: Vec::new(),
            next_spawn_in_ms: 0.0,
            last_spawn_lane: None,
            lane_history: Vec::new(),
            next_orb_id: 0,
            hits: 0,
            level: 1,
            flash_ms: 0.0,
            last_player_lane: Lane::Left,
        }
    }

    fn rearm_spawn(&mut self) {
        self.next_spawn_in_ms = scheduler::spawn_interval_ms(&mut self.rng, self.level, &self.profile);
    }

    fn spawn_orb(&mut self, view: &ViewGeometry) {
        let lane = scheduler::choose_lane(
            &mut self.rng,
            self.last_spawn_lane,
            &self.lane_history,
            self.level,
            &self.profile,
        );
        let spawn_y = -ORB_RADIUS - 2.0;
        let (lo, hi) = scheduler::speed_range(self.level, &self.profile);
        let speed = scheduler::roll_speed(&mut self.rng, lo, hi);
        let eta_ms = (view.player_y - spawn_y) / speed * 1000.0;
        let other_etas: Vec<(Lane, f32)> = self
            .orbs
            .iter()
            .map(|o| (o.lane, (view.player_y - o.y) / o.speed * 1000.0))
            .collect();
        let (lane, _) = scheduler::resolve_cross_lane(
            lane,
            eta_ms,
            &other_etas,
            self.profile.cross_lane_gap_ms,
        );

        let id = self.next_orb_id;
        self.next_orb_id += 1;
        self.orbs.push(Orb {
            id,
            lane,
            y: spawn_y,
            speed,
            radius: ORB_RADIUS,
            hue: orb_hue(speed, lo, hi),
        });
        self.last_spawn_lane = Some(lane);
        self.lane_history.push(lane);
        if self.lane_history.len() > HISTORY_CAP {
            self.lane_history.remove(0);
        }
    }

    /// Lane of the orb nearest the catch line. Headless hosts use this to
    /// drive an autopilot; None while the field is empty.
    pub fn nearest_threat(&self) -> Option<Lane> {
        self.orbs
            .iter()
            .max_by(|a, b| a.y.total_cmp(&b.y))
            .map(|o| o.lane)
    }

    fn clear_run_state(&mut self) {
        self.orbs.clear();
        self.lane_history.clear();
        self.last_spawn_lane = None;
        self.next_orb_id = 0;
        self.hits = 0;
        self.level = 1;
        self.flash_ms = 0.0;
    }
}

impl Default for LaneGame {
    fn default() -> Self {
        Self::new(0x4c414e45)
    }
}

impl GameModule for LaneGame {
    fn set_difficulty(&mut self, key: DifficultyKey) {
        self.profile = *LaneProfile::for_difficulty(key);
    }

    fn reset_run(&mut self, _api: &mut ShellApi<'_>) {
        self.clear_run_state();
    }

    fn start_run(&mut self, api: &mut ShellApi<'_>) {
        self.clear_run_state();
        self.last_player_lane = api.state().player_lane;
        self.rearm_spawn();
    }

    fn update(&mut self, dt: f32, api: &mut ShellApi<'_>) {
        let snapshot = api.state();
        if snapshot.player_lane != self.last_player_lane {
            self.last_player_lane = snapshot.player_lane;
            self.flash_ms = LANE_FLASH_MS;
        }
        self.flash_ms = (self.flash_ms - dt * 1000.0).max(0.0);

        self.next_spawn_in_ms -= dt * 1000.0;
        while self.next_spawn_in_ms <= 0.0 {
            self.spawn_orb(api.view());
            let interval =
                scheduler::spawn_interval_ms(&mut self.rng, self.level, &self.profile);
            self.next_spawn_in_ms += interval;
        }

        for orb in &mut self.orbs {
            orb.y += orb.speed * dt;
        }

        let player_lane = snapshot.player_lane;
        let player_y = api.view().player_y;
        for i in (0..self.orbs.len()).rev() {
            let orb = &self.orbs[i];
            let caught = orb.lane == player_lane
                && (orb.y - player_y).abs() <= orb.radius + PLAYER_RADIUS;
            if caught {
                // remove (not swap_remove): the collection stays in append order
                self.orbs.remove(i);
                self.hits += 1;
                api.add_score(1);
                api.play_hit();
                api.haptic(10);
                let next_level = 1 + self.hits / self.profile.hits_per_level;
                if next_level > self.level {
                    self.level = next_level;
                    api.set_level(next_level as i64);
                    api.play_level_up();
                    // new cadence takes effect immediately, not at the next re-arm
                    self.rearm_spawn();
                }
                continue;
            }
            if orb.y - orb.radius > player_y + PLAYER_RADIUS + MISS_GRACE {
                log::debug!("orb {} missed in {:?} lane", orb.id, orb.lane);
                api.request_game_over();
                return;
            }
        }
    }

    fn draw(&self, canvas: &mut Canvas, view: &ViewGeometry, snapshot: &StateSnapshot) {
        canvas.clear(Color::rgba(0.04, 0.05, 0.09, 1.0));

        for &x in &view.lane_x {
            canvas.line(
                Vec2::new(x, 0.0),
                Vec2::new(x, view.player_y + PLAYER_RADIUS),
                2.0,
                Color::rgba(1.0, 1.0, 1.0, 0.08),
            );
        }
        canvas.line(
            Vec2::new(0.0, view.player_y),
            Vec2::new(view.width, view.player_y),
            1.0,
            Color::rgba(1.0, 1.0, 1.0, 0.12),
        );

        for orb in &self.orbs {
            canvas.circle(
                Vec2::new(view.lane_x[orb.lane.index()], orb.y),
                orb.radius,
                Color::hsla(orb.hue, 0.85, 0.62, 1.0),
            );
        }

        let player = Vec2::new(view.lane_x[snapshot.player_lane.index()], view.player_y);
        let dimmed = snapshot.phase != RunPhase::Playing;
        canvas.circle(
            player,
            PLAYER_RADIUS,
            Color::rgba(0.95, 0.95, 1.0, if dimmed { 0.45 } else { 1.0 }),
        );
        if self.flash_ms > 0.0 {
            let t = self.flash_ms / LANE_FLASH_MS;
            canvas.ring(player, PLAYER_RADIUS + 8.0, 3.0, Color::rgba(1.0, 1.0, 1.0, 0.6 * t));
        }
    }

    fn clear_hazards(&mut self) {
        self.orbs.clear();
    }

    fn start_stream(&mut self, _api: &mut ShellApi<'_>) {
        self.orbs.clear();
        self.rearm_spawn();
    }
}
