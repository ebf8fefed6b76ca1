use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::wheel_layout::WheelLayout;

// Extra whole turns per spin, inclusive.
pub const MIN_FULL_TURNS: u32 = 5;
pub const MAX_FULL_TURNS: u32 = 7;

/// Where a spin comes to rest.
#[derive(Debug, Serialize, Clone, Copy, PartialEq)]
pub struct SpinResolution {
    pub segment_index: usize,
    pub full_turns: u32,
    /// Whole turns plus the resting offset, in degrees.
    pub target_rotation: f64,
}

impl SpinResolution {
    /// Resting angle, modulo a full turn.
    pub fn offset(&self) -> f64 {
        self.target_rotation.rem_euclid(360.0)
    }
}

/// Rotation that puts segment `segment_index` under the pointer after
/// `full_turns` whole turns.
pub fn rotation_for_segment(layout: &WheelLayout, segment_index: usize, full_turns: u32) -> f64 {
    let offset = (360.0 - segment_index as f64 * layout.segment_angle()).rem_euclid(360.0);
    full_turns as f64 * 360.0 + offset
}

/// Picks one of the scenario's segments at random and computes the rotation
/// target landing on it. `None` if the scenario is not on the wheel.
pub fn resolve_spin<R: Rng + ?Sized>(
    layout: &WheelLayout,
    scenario_id: &str,
    rng: &mut R,
) -> Option<SpinResolution> {
    let segment_index = *layout.segments_for(scenario_id).choose(rng)?;
    let full_turns = rng.gen_range(MIN_FULL_TURNS..=MAX_FULL_TURNS);

    Some(SpinResolution {
        segment_index,
        full_turns,
        target_rotation: rotation_for_segment(layout, segment_index, full_turns),
    })
}

/// Absolute wheel rotation for the next spin: continue forward from the
/// previous resting rotation, rounded up to a whole turn.
pub fn accumulate_rotation(previous: f64, target_rotation: f64) -> f64 {
    let base = (previous / 360.0).ceil() * 360.0;
    base + target_rotation
}
