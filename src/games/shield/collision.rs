//! Continuous pulse-versus-shard collision
//!
//! The pulse is an expanding circle around the player; a shard is a moving
//! circle. Both radii and positions are linear in time over one frame step,
//! so first contact is the earliest root of a quadratic in t. Solving it
//! analytically means no shard can tunnel through the wavefront between
//! frames, whatever the frame rate.

use glam::Vec2;

const EPS: f32 = 1e-6;

/// One expanding pulse. Radius grows linearly from `start_radius` to
/// `end_radius` over `duration` seconds and holds at the end value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wavefront {
    pub elapsed: f32,
    pub duration: f32,
    pub start_radius: f32,
    pub end_radius: f32,
}

impl Wavefront {
    pub fn new(start_radius: f32, end_radius: f32, duration: f32) -> Self {
        Self {
            elapsed: 0.0,
            duration,
            start_radius,
            end_radius,
        }
    }

    /// Radius `dt` seconds ahead of the current elapsed time.
    pub fn radius_at(&self, dt: f32) -> f32 {
        let t = ((self.elapsed + dt) / self.duration).clamp(0.0, 1.0);
        crate::lerp_clamped(self.start_radius, self.end_radius, t)
    }

    pub fn expired(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// Earliest time in `[0, dt]` at which a shard at `rel` (relative to the
/// pulse center) moving at `vel` touches a wavefront expanding from radius
/// `r0` to `r1` over the step. `shard_r` inflates the front. `None` when
/// they never meet within the step.
pub fn wave_hits_shard(
    rel: Vec2,
    vel: Vec2,
    shard_r: f32,
    r0: f32,
    r1: f32,
    dt: f32,
) -> Option<f32> {
    let reach0 = r0 + shard_r;
    if rel.length_squared() <= reach0 * reach0 {
        return Some(0.0);
    }
    if dt <= 0.0 {
        return None;
    }

    // A front that is not strictly expanding never sweeps into anything.
    let k = (r1 - r0) / dt;
    if k <= 0.0 {
        return None;
    }

    // |rel + vel t|^2 = (reach0 + k t)^2, expanded and collected in t.
    let a = vel.length_squared() - k * k;
    let b = 2.0 * (rel.dot(vel) - reach0 * k);
    let c = rel.length_squared() - reach0 * reach0;

    if a.abs() < EPS {
        if b.abs() < EPS {
            return None;
        }
        let t = -c / b;
        return (0.0..=dt).contains(&t).then_some(t);
    }

    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return None;
    }
    let sqrt = disc.sqrt();
    let t1 = (-b - sqrt) / (2.0 * a);
    let t2 = (-b + sqrt) / (2.0 * a);
    [t1.min(t2), t1.max(t2)]
        .into_iter()
        .find(|t| (0.0..=dt).contains(t))
}
