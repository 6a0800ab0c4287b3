//! Constrained-random spawn scheduling
//!
//! Pure decision functions over the rng and the recent spawn history. The
//! fairness rules are hard overrides on top of the biased lane pick: no
//! same-lane run past the profile cap, no perfect alternation streak past
//! the profile cap, and no two opposite-lane arrivals closer than the
//! profile gap when a retry can avoid it.

use rand::Rng;
use rand_pcg::Pcg32;

use crate::config::LaneProfile;
use crate::shell::state::Lane;

/// Spawn cadence never drops below this, whatever the level.
pub const MIN_INTERVAL_MS: f32 = 140.0;

/// Retry budget for the cross-lane arrival-gap rule.
pub const CROSS_LANE_ATTEMPTS: u32 = 6;

/// Length of the trailing run of identical lanes.
pub fn same_lane_run(history: &[Lane]) -> usize {
    let Some(&last) = history.last() else {
        return 0;
    };
    history.iter().rev().take_while(|&&l| l == last).count()
}

/// Length of the trailing strictly-alternating streak. A single spawn is
/// not a streak, so anything shorter than two is 0.
pub fn perfect_alt_run(history: &[Lane]) -> usize {
    if history.len() < 2 {
        return 0;
    }
    let mut run = 1;
    for pair in history.windows(2).rev() {
        if pair[0] == pair[1] {
            break;
        }
        run += 1;
    }
    if run >= 2 { run } else { 0 }
}

fn same_run_with(history: &[Lane], candidate: Lane) -> usize {
    if history.last() == Some(&candidate) {
        same_lane_run(history) + 1
    } else {
        1
    }
}

fn alt_run_with(history: &[Lane], candidate: Lane) -> usize {
    match history.last() {
        Some(&last) if last != candidate => perfect_alt_run(history).max(1) + 1,
        _ => 0,
    }
}

/// Pick the lane for the next spawn: alternation bias ramping with level,
/// then the fairness overrides. One flip always satisfies both caps because
/// the caps are >= 2 and a flip resets the opposing streak to length 2.
pub fn choose_lane(
    rng: &mut Pcg32,
    last: Option<Lane>,
    history: &[Lane],
    level: u32,
    profile: &LaneProfile,
) -> Lane {
    let bias = (profile.alt_bias_base
        + profile.alt_bias_step * level.saturating_sub(1) as f32)
        .min(profile.alt_bias_cap);

    let mut lane = match last {
        Some(prev) if rng.random_bool(bias as f64) => prev.opposite(),
        _ => {
            if rng.random_bool(0.5) {
                Lane::Left
            } else {
                Lane::Right
            }
        }
    };

    if same_run_with(history, lane) > profile.max_same_lane {
        lane = lane.opposite();
    } else if alt_run_with(history, lane) > profile.max_perfect_alt {
        lane = lane.opposite();
    }
    lane
}

/// Milliseconds until the next spawn: level-shrunk base, floored, plus
/// uniform jitter.
pub fn spawn_interval_ms(rng: &mut Pcg32, level: u32, profile: &LaneProfile) -> f32 {
    let base = (profile.base_interval_ms
        - profile.interval_step_ms * level.saturating_sub(1) as f32)
        .max(MIN_INTERVAL_MS);
    if profile.jitter_ms > 0.0 {
        base + rng.random_range(0.0..profile.jitter_ms)
    } else {
        base
    }
}

/// Fall speed bounds for a level, each bound capped independently.
pub fn speed_range(level: u32, profile: &LaneProfile) -> (f32, f32) {
    let steps = level.saturating_sub(1) as f32;
    let lo = (profile.speed_min + profile.speed_min_step * steps).min(profile.speed_cap_min);
    let hi = (profile.speed_max + profile.speed_max_step * steps).min(profile.speed_cap_max);
    (lo, hi.max(lo))
}

/// Uniform fall speed within the bounds; degenerate bounds yield the bound.
pub fn roll_speed(rng: &mut Pcg32, lo: f32, hi: f32) -> f32 {
    if hi > lo { rng.random_range(lo..hi) } else { lo }
}

/// Keep the new spawn's catch-line arrival at least the profile gap away
/// from every live orb in the opposite lane, flipping the lane after every
/// failed check and rechecking. Returns the final lane and the attempts
/// spent; an unresolvable pair exhausts the budget with all six flips
/// applied, tolerating a rare unfair pair rather than stalling the spawn.
pub fn resolve_cross_lane(
    lane: Lane,
    eta_ms: f32,
    other_etas: &[(Lane, f32)],
    gap_ms: f32,
) -> (Lane, u32) {
    let mut lane = lane;
    for attempt in 1..=CROSS_LANE_ATTEMPTS {
        let conflict = other_etas
            .iter()
            .any(|&(l, other)| l != lane && (eta_ms - other).abs() < gap_ms);
        if !conflict {
            return (lane, attempt);
        }
        lane = lane.opposite();
    }
    (lane, CROSS_LANE_ATTEMPTS)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rand::SeedableRng;

    use super::*;
    use crate::config::DifficultyKey;

    fn rng(seed: u64) -> Pcg32 {
        Pcg32::seed_from_u64(seed)
    }

    #[test]
    fn test_run_counters() {
        use Lane::{Left as L, Right as R};
        assert_eq!(same_lane_run(&[]), 0);
        assert_eq!(same_lane_run(&[L, L, R, R, R]), 3);
        assert_eq!(perfect_alt_run(&[L]), 0);
        assert_eq!(perfect_alt_run(&[L, L]), 0);
        assert_eq!(perfect_alt_run(&[L, R, L, R]), 4);
        assert_eq!(perfect_alt_run(&[L, L, R, L]), 3);
    }

    #[test]
    fn test_fairness_caps_hold_over_long_sequences() {
        let profile = *crate::config::LaneProfile::for_difficulty(DifficultyKey::Hard);
        let mut rng = rng(7);
        let mut history: Vec<Lane> = Vec::new();
        let mut last = None;
        for i in 0..1000 {
            let level = 1 + i / 50;
            let lane = choose_lane(&mut rng, last, &history, level, &profile);
            history.push(lane);
            last = Some(lane);
            assert!(same_lane_run(&history) <= profile.max_same_lane);
            assert!(perfect_alt_run(&history) <= profile.max_perfect_alt);
        }
    }

    #[test]
    fn test_cross_lane_flip_avoids_conflicting_arrival() {
        // A right-lane orb arrives at 1400ms; a 1350ms left spawn is fine,
        // a 1390ms one must flip into the right lane alongside it.
        let others = [(Lane::Right, 1400.0)];
        let (lane, attempts) = resolve_cross_lane(Lane::Left, 900.0, &others, 420.0);
        assert_eq!(lane, Lane::Left);
        assert_eq!(attempts, 1);

        let (lane, attempts) = resolve_cross_lane(Lane::Left, 1390.0, &others, 420.0);
        assert_eq!(lane, Lane::Right);
        assert_eq!(attempts, 2);
    }

    #[test]
    fn test_cross_lane_budget_or_clean() {
        // Conflicts in both lanes cannot be resolved by flipping; the loop
        // must spend exactly its budget, flipping after every failed check.
        // An even budget lands back on the requested lane.
        let others = [(Lane::Left, 1000.0), (Lane::Right, 1000.0)];
        let (lane, attempts) = resolve_cross_lane(Lane::Left, 1000.0, &others, 420.0);
        assert_eq!(attempts, CROSS_LANE_ATTEMPTS);
        assert_eq!(lane, Lane::Left);

        // No opposite-lane traffic at all resolves on the first check.
        let (lane, attempts) =
            resolve_cross_lane(Lane::Right, 1000.0, &[(Lane::Right, 1000.0)], 420.0);
        assert_eq!(lane, Lane::Right);
        assert_eq!(attempts, 1);
    }

    #[test]
    fn test_roll_speed_degenerate_bounds() {
        let mut rng = rng(3);
        assert_eq!(roll_speed(&mut rng, 500.0, 500.0), 500.0);
        let s = roll_speed(&mut rng, 100.0, 200.0);
        assert!((100.0..200.0).contains(&s));
    }

    proptest! {
        /// The cadence floor holds at every level.
        #[test]
        fn prop_interval_never_below_floor(level in 1u32..200, seed in any::<u64>()) {
            let profile = *crate::config::LaneProfile::for_difficulty(DifficultyKey::Hard);
            let mut rng = Pcg32::seed_from_u64(seed);
            let ms = spawn_interval_ms(&mut rng, level, &profile);
            prop_assert!(ms >= MIN_INTERVAL_MS);
            prop_assert!(ms <= MIN_INTERVAL_MS + profile.base_interval_ms + profile.jitter_ms);
        }

        /// Speed bounds stay ordered and capped at every level.
        #[test]
        fn prop_speed_range_ordered_and_capped(level in 1u32..500) {
            let profile = *crate::config::LaneProfile::for_difficulty(DifficultyKey::Easy);
            let (lo, hi) = speed_range(level, &profile);
            prop_assert!(lo <= hi);
            prop_assert!(lo <= profile.speed_cap_min);
            prop_assert!(hi <= profile.speed_cap_max);
        }
    }
}
