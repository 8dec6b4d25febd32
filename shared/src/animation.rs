use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_MAX_EXTRA_ROTATIONS, DEFAULT_MAX_SPIN_TIME_MS, DEFAULT_MIN_EXTRA_ROTATIONS,
    DEFAULT_MIN_SPIN_TIME_MS, SEGMENT_JITTER_FRACTION,
};
use crate::error::ConfigError;
use crate::selection::RandomSource;

/// Spin timing knobs. Durations are in milliseconds.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct AnimationConfig {
    #[serde(rename = "minSpinTime")]
    pub min_spin_time_ms: u64,
    #[serde(rename = "maxSpinTime")]
    pub max_spin_time_ms: u64,
    #[serde(rename = "minExtraRotations")]
    pub min_extra_rotations: u32,
    #[serde(rename = "maxExtraRotations")]
    pub max_extra_rotations: u32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            min_spin_time_ms: DEFAULT_MIN_SPIN_TIME_MS,
            max_spin_time_ms: DEFAULT_MAX_SPIN_TIME_MS,
            min_extra_rotations: DEFAULT_MIN_EXTRA_ROTATIONS,
            max_extra_rotations: DEFAULT_MAX_EXTRA_ROTATIONS,
        }
    }
}

impl AnimationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_spin_time_ms > self.max_spin_time_ms {
            return Err(ConfigError::InvalidAnimation(
                "minSpinTime must not exceed maxSpinTime",
            ));
        }
        if self.min_extra_rotations > self.max_extra_rotations {
            return Err(ConfigError::InvalidAnimation(
                "minExtraRotations must not exceed maxExtraRotations",
            ));
        }
        Ok(())
    }

    fn duration_ms(&self, draw: f64) -> f64 {
        let (lo, hi) = ordered(self.min_spin_time_ms, self.max_spin_time_ms);
        lo as f64 + draw * (hi - lo) as f64
    }

    // Always at least one full turn so the target is strictly ahead of the start.
    fn extra_rotations(&self, draw: f64) -> u32 {
        let (lo, hi) = ordered(self.min_extra_rotations, self.max_extra_rotations);
        let span = u64::from(hi - lo) + 1;
        let offset = ((draw * span as f64).floor() as u64).min(span - 1);
        (u64::from(lo) + offset).max(1) as u32
    }
}

fn ordered<T: PartialOrd>(a: T, b: T) -> (T, T) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// One spin's trajectory. Angles are radians and never wrapped, so the wheel only ever
/// moves forward.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct RotationModel {
    pub start_angle: f64,
    pub target_angle: f64,
    pub start_time_ms: f64,
    pub duration_ms: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub angle: f64,
    pub done: bool,
}

// Easing function for smooth deceleration: 1 - (1-t)^4
pub fn ease_out(t: f64) -> f64 {
    1.0 - (1.0 - t).powi(4)
}

pub fn segment_angle(segment_count: usize) -> f64 {
    TAU / segment_count.max(1) as f64
}

/// Index of the segment sitting under the pointer when the wheel is rotated by `angle`.
///
/// Segment `i` is drawn from `i * segment_angle` measured clockwise from the pointer at
/// the top, so the pointer reads the wheel at `-angle`.
pub fn segment_at_pointer(angle: f64, segment_count: usize) -> usize {
    if segment_count == 0 {
        return 0;
    }
    let position = (-angle).rem_euclid(TAU);
    let index = (position / segment_angle(segment_count)).floor() as usize;
    index.min(segment_count - 1)
}

/// Plans a rotation from `current_angle` that comes to rest with `chosen_index` under the
/// pointer.
///
/// Draws three values from `rng`, in order: the landing jitter inside the segment, the
/// number of extra full turns, and the duration.
pub fn begin_rotation<R: RandomSource + ?Sized>(
    current_angle: f64,
    chosen_index: usize,
    segment_count: usize,
    rng: &mut R,
    config: &AnimationConfig,
    now_ms: f64,
) -> RotationModel {
    let segment = segment_angle(segment_count);
    let jitter = (rng.next_f64() * 2.0 - 1.0) * SEGMENT_JITTER_FRACTION * segment;
    let landing = chosen_index as f64 * segment + segment / 2.0 + jitter;

    let delta = (-landing - current_angle.rem_euclid(TAU)).rem_euclid(TAU);
    let extra = config.extra_rotations(rng.next_f64());
    let total = delta + f64::from(extra) * TAU;

    RotationModel {
        start_angle: current_angle,
        target_angle: current_angle + total,
        start_time_ms: now_ms,
        duration_ms: config.duration_ms(rng.next_f64()),
    }
}

/// Angle at `now_ms`. Pure in its inputs; reports the exact target once the duration has
/// elapsed, however late the call arrives.
pub fn advance(model: &RotationModel, now_ms: f64) -> Frame {
    let finished = Frame {
        angle: model.target_angle,
        done: true,
    };
    if model.duration_ms.is_nan() || model.duration_ms <= 0.0 {
        return finished;
    }

    let progress = ((now_ms - model.start_time_ms) / model.duration_ms).clamp(0.0, 1.0);
    if progress >= 1.0 {
        return finished;
    }

    let travel = model.target_angle - model.start_angle;
    Frame {
        angle: (model.start_angle + travel * ease_out(progress)).min(model.target_angle),
        done: false,
    }
}
