//! Shard-shield survival module
//!
//! Shards stream in from the playfield edges toward the player at the
//! center. The only defense is a radial pulse on a cooldown; score is
//! seconds survived and intensity climbs with time. A granted continue
//! clears the field and gives a short invulnerability window.

pub mod collision;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::config::{DifficultyKey, ShieldProfile};
use crate::consts::CONTINUE_INVULN_SECS;
use crate::games::{GameModule, Key};
use crate::render::{Canvas, Color};
use crate::shell::bridge::{ShellApi, StateSnapshot};
use crate::shell::state::RunPhase;
use crate::view::ViewGeometry;

use collision::{Wavefront, wave_hits_shard};

const PLAYER_RADIUS: f32 = 18.0;
const SPAWN_MARGIN: f32 = 20.0;
const CULL_MARGIN: f32 = 80.0;
/// Body contact uses a forgiving fraction of the visual player radius.
const CONTACT_SCALE: f32 = 0.75;
/// Cooldown remainder carried across a continue.
const CONTINUE_COOLDOWN_CAP: f32 = 0.10;
const INTENSITY_CAP: u32 = 40;
const INTENSITY_PERIOD_S: f32 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShardShape {
    Dot,
    Diamond,
    Tri,
}

#[derive(Debug, Clone)]
struct Shard {
    pos: Vec2,
    vel: Vec2,
    radius: f32,
    shape: ShardShape,
    spin: f32,
    angle: f32,
    hue: f32,
}

pub struct ShieldGame {
    profile: ShieldProfile,
    rng: Pcg32,
    shards: Vec<Shard>,
    spawn_acc: f32,
    time_alive: f32,
    intensity: u32,
    cooldown_t: f32,
    pending_pulse: bool,
    invuln_t: f32,
    burst: Option<Wavefront>,
    last_continues_used: u8,
}

impl ShieldGame {
    pub fn new(seed: u64) -> Self {
        Self {
            profile: *ShieldProfile::for_difficulty(DifficultyKey::default()),
            rng: Pcg32::seed_from_u64(seed),
            shards: Vec::new(),
            spawn_acc: 0.0,
            time_alive: 0.0,
            intensity: 1,
            cooldown_t: 0.0,
            pending_pulse: false,
            invuln_t: 0.0,
            burst: None,
            last_continues_used: 0,
        }
    }

    fn clear_run_state(&mut self) {
        self.shards.clear();
        self.spawn_acc = 0.0;
        self.time_alive = 0.0;
        self.intensity = 1;
        self.cooldown_t = 0.0;
        self.pending_pulse = false;
        self.invuln_t = 0.0;
        self.burst = None;
    }

    fn spawn_shard(&mut self, view: &ViewGeometry, center: Vec2) {
        let pf = view.playfield;
        let pos = match self.rng.random_range(0..4) {
            0 => Vec2::new(
                self.rng.random_range(pf.x..pf.x + pf.w),
                pf.y - SPAWN_MARGIN,
            ),
            1 => Vec2::new(
                self.rng.random_range(pf.x..pf.x + pf.w),
                pf.y + pf.h + SPAWN_MARGIN,
            ),
            2 => Vec2::new(
                pf.x - SPAWN_MARGIN,
                self.rng.random_range(pf.y..pf.y + pf.h),
            ),
            _ => Vec2::new(
                pf.x + pf.w + SPAWN_MARGIN,
                self.rng.random_range(pf.y..pf.y + pf.h),
            ),
        };
        let speed = self.profile.speed + self.profile.speed_ramp * self.intensity as f32;
        let dir = (center - pos).normalize_or(Vec2::NEG_Y);
        let shape = match self.rng.random_range(0..3) {
            0 => ShardShape::Dot,
            1 => ShardShape::Diamond,
            _ => ShardShape::Tri,
        };
        self.shards.push(Shard {
            pos,
            vel: dir * speed,
            radius: (6.0 + self.rng.random_range(0.0..10.0)) * self.profile.shard_size,
            shape,
            spin: self.rng.random_range(-3.0..3.0),
            angle: 0.0,
            hue: 340.0 + self.rng.random_range(0.0..60.0),
        });
    }

    /// Grant-continue housekeeping: wipe the field, arm the grace window,
    /// cut any long cooldown remainder short.
    fn on_continue_granted(&mut self) {
        self.shards.clear();
        self.invuln_t = CONTINUE_INVULN_SECS;
        self.cooldown_t = self.cooldown_t.min(CONTINUE_COOLDOWN_CAP);
        self.burst = None;
    }

    fn shard_points(shard: &Shard) -> Option<Vec<Vec2>> {
        let sides = match shard.shape {
            ShardShape::Dot => return None,
            ShardShape::Diamond => 4,
            ShardShape::Tri => 3,
        };
        let step = std::f32::consts::TAU / sides as f32;
        Some(
            (0..sides)
                .map(|i| {
                    let a = shard.angle + step * i as f32;
                    shard.pos + Vec2::new(a.cos(), a.sin()) * shard.radius
                })
                .collect(),
        )
    }
}

impl Default for ShieldGame {
    fn default() -> Self {
        Self::new(0x53484152)
    }
}

impl GameModule for ShieldGame {
    fn set_difficulty(&mut self, key: DifficultyKey) {
        self.profile = *ShieldProfile::for_difficulty(key);
    }

    fn reset_run(&mut self, _api: &mut ShellApi<'_>) {
        self.clear_run_state();
    }

    fn start_run(&mut self, api: &mut ShellApi<'_>) {
        self.clear_run_state();
        self.last_continues_used = api.state().continues_used;
    }

    fn update(&mut self, dt: f32, api: &mut ShellApi<'_>) {
        let snapshot = api.state();
        if snapshot.continues_used != self.last_continues_used {
            self.last_continues_used = snapshot.continues_used;
            self.on_continue_granted();
        }

        self.time_alive += dt;
        self.intensity = (1 + (self.time_alive / INTENSITY_PERIOD_S) as u32).min(INTENSITY_CAP);
        self.cooldown_t = (self.cooldown_t - dt).max(0.0);
        self.invuln_t = (self.invuln_t - dt).max(0.0);

        // A press during the cooldown stays buffered and fires the moment
        // the cooldown clears. A fresh pulse overwrites a still-running
        // burst's timing.
        if self.pending_pulse && self.cooldown_t <= 0.0 {
            self.pending_pulse = false;
            self.burst = Some(Wavefront::new(
                PLAYER_RADIUS,
                PLAYER_RADIUS + self.profile.burst_range,
                self.profile.burst_duration_s,
            ));
            self.cooldown_t = self.profile.cooldown_s;
            api.haptic(12);
        }

        // Front radii bracketing this step. An expiring burst still sweeps
        // its final sliver before it is dropped below.
        let front = self.burst.as_mut().map(|w| {
            let r0 = w.radius_at(0.0);
            let r1 = w.radius_at(dt);
            w.elapsed += dt;
            (r0, r1)
        });

        let view = *api.view();
        let center = view.playfield.center();

        // Spawn pressure tracks raw survival time, not the capped intensity,
        // so late runs keep escalating.
        let rate = self.profile.start_rate + self.profile.rate_ramp * self.time_alive;
        self.spawn_acc += rate * dt;
        while self.spawn_acc >= 1.0 {
            self.spawn_acc -= 1.0;
            self.spawn_shard(&view, center);
        }

        let contact_reach = PLAYER_RADIUS * CONTACT_SCALE;
        for i in (0..self.shards.len()).rev() {
            let shard = &mut self.shards[i];
            let pre = shard.pos;
            shard.pos += shard.vel * dt;
            shard.angle += shard.spin * dt;

            if !view.playfield.contains_with_margin(shard.pos, CULL_MARGIN) {
                self.shards.swap_remove(i);
                continue;
            }

            if let Some((r0, r1)) = front {
                if wave_hits_shard(pre - center, shard.vel, shard.radius, r0, r1, dt).is_some() {
                    self.shards.swap_remove(i);
                    api.play_hit();
                    continue;
                }
            }

            if shard.pos.distance(center) < shard.radius + contact_reach {
                if self.invuln_t > 0.0 {
                    self.shards.swap_remove(i);
                    api.play_hit();
                } else {
                    api.request_game_over();
                    return;
                }
            }
        }

        if self.burst.as_ref().is_some_and(Wavefront::expired) {
            self.burst = None;
        }

        api.set_score(self.time_alive as i64);
        api.set_level(self.intensity as i64);
    }

    fn draw(&self, canvas: &mut Canvas, view: &ViewGeometry, snapshot: &StateSnapshot) {
        canvas.clear(Color::rgba(0.03, 0.04, 0.08, 1.0));
        let center = view.playfield.center();

        if let Some(wave) = &self.burst {
            let r = wave.radius_at(0.0);
            let fade = 1.0 - (wave.elapsed / wave.duration).clamp(0.0, 1.0);
            canvas.ring(center, r, 4.0, Color::rgba(0.6, 0.9, 1.0, 0.7 * fade));
        }

        for shard in &self.shards {
            let color = Color::hsla(shard.hue, 0.8, 0.58, 1.0);
            match Self::shard_points(shard) {
                Some(points) => canvas.polygon(points, color),
                None => canvas.circle(shard.pos, shard.radius, color),
            }
        }

        let dimmed = snapshot.phase != RunPhase::Playing;
        let alpha = if dimmed {
            0.45
        } else if self.invuln_t > 0.0 {
            // grace window blinks
            if (self.time_alive * 10.0) as u32 % 2 == 0 { 0.5 } else { 1.0 }
        } else {
            1.0
        };
        canvas.circle(center, PLAYER_RADIUS, Color::rgba(0.92, 0.96, 1.0, alpha));
        if self.cooldown_t > 0.0 {
            let t = 1.0 - self.cooldown_t / self.profile.cooldown_s.max(f32::EPSILON);
            canvas.ring(
                center,
                PLAYER_RADIUS + 6.0,
                2.0,
                Color::rgba(1.0, 1.0, 1.0, 0.15 + 0.25 * t),
            );
        }
    }

    fn on_pointer_down(&mut self, _x: f32, _y: f32, _api: &mut ShellApi<'_>) {
        self.pending_pulse = true;
    }

    fn on_key_down(&mut self, key: Key, _api: &mut ShellApi<'_>) {
        if key == Key::Enter {
            self.pending_pulse = true;
        }
    }

    fn clear_hazards(&mut self) {
        self.shards.clear();
    }

    fn start_stream(&mut self, _api: &mut ShellApi<'_>) {
        self.shards.clear();
        self.spawn_acc = 0.0;
    }
}
