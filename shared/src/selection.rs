use rand::rngs::{StdRng, ThreadRng};
use rand::Rng;

use crate::shared_wheel_game::WheelOption;

/// Uniform draws in `[0, 1)`. Injected everywhere randomness is consumed so tests can pin it.
pub trait RandomSource {
    fn next_f64(&mut self) -> f64;
}

impl RandomSource for StdRng {
    fn next_f64(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

impl RandomSource for ThreadRng {
    fn next_f64(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

/// Replays a fixed list of draws, cycling once it runs out.
#[derive(Debug, Clone)]
pub struct SequenceSource {
    values: Vec<f64>,
    cursor: usize,
}

impl SequenceSource {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, cursor: 0 }
    }

    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }
}

impl RandomSource for SequenceSource {
    fn next_f64(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}

pub fn total_weight(options: &[WheelOption]) -> u64 {
    options.iter().map(|option| u64::from(option.weight)).sum()
}

/// Picks an index with probability `weight / total_weight` using cumulative-weight inversion.
///
/// List order breaks ties, so a fixed draw always maps to the same index. Zero-weight
/// options are stepped over and can never win unless every weight is zero, in which case
/// the last index is returned. Returns `None` only for an empty list.
pub fn select_outcome<R: RandomSource + ?Sized>(
    options: &[WheelOption],
    rng: &mut R,
) -> Option<usize> {
    if options.is_empty() {
        return None;
    }

    let mut remaining = rng.next_f64() * total_weight(options) as f64;
    for (index, option) in options.iter().enumerate() {
        if option.weight == 0 {
            continue;
        }
        remaining -= f64::from(option.weight);
        if remaining <= 0.0 {
            return Some(index);
        }
    }

    // Residual left over from float accumulation: settle on the last option that can win.
    let fallback = options
        .iter()
        .rposition(|option| option.weight > 0)
        .unwrap_or(options.len() - 1);
    Some(fallback)
}
