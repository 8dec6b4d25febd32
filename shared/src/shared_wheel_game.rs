use std::fmt;

use serde::{Deserialize, Serialize};

use crate::animation::{self, AnimationConfig, Frame, RotationModel};
use crate::constants::DEFAULT_OPTION_COLOR;
use crate::error::SpinError;
use crate::selection::{select_outcome, RandomSource};

/// One weighted slice of the wheel
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WheelOption {
    pub text: String,
    pub weight: u32,
    #[serde(default = "default_color")]
    pub color: String,
}

fn default_color() -> String {
    DEFAULT_OPTION_COLOR.to_string()
}

impl WheelOption {
    pub fn new(text: impl Into<String>, weight: u32, color: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            weight,
            color: color.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum SpinState {
    Idle,
    Spinning,
    Settled,
}

/// The winner of a spin
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SpinOutcome {
    pub index: usize,
    pub option: WheelOption,
}

impl SpinOutcome {
    pub fn text(&self) -> &str {
        &self.option.text
    }
}

pub type SettleCallback = Box<dyn FnOnce(SpinOutcome)>;

/// A single wheel: picks the winner up front, then animates toward it one tick at a time.
///
/// At most one spin is in flight. The option list handed to [`WheelGame::request_spin`] is
/// copied, so edits to the live configuration mid-spin never reach the animation.
pub struct WheelGame {
    state: SpinState,
    current_angle: f64,
    rotation: Option<RotationModel>,
    snapshot: Vec<WheelOption>,
    pending: Option<SpinOutcome>,
    on_settled: Option<SettleCallback>,
    generation: u64,
    animation: AnimationConfig,
}

impl fmt::Debug for WheelGame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WheelGame")
            .field("state", &self.state)
            .field("current_angle", &self.current_angle)
            .field("rotation", &self.rotation)
            .field("pending", &self.pending)
            .field("generation", &self.generation)
            .finish()
    }
}

impl Default for WheelGame {
    fn default() -> Self {
        Self::new(AnimationConfig::default())
    }
}

impl WheelGame {
    pub fn new(animation: AnimationConfig) -> Self {
        Self {
            state: SpinState::Idle,
            current_angle: 0.0,
            rotation: None,
            snapshot: Vec::new(),
            pending: None,
            on_settled: None,
            generation: 0,
            animation,
        }
    }

    pub fn state(&self) -> SpinState {
        self.state
    }

    pub fn is_spinning(&self) -> bool {
        self.state == SpinState::Spinning
    }

    pub fn current_angle(&self) -> f64 {
        self.current_angle
    }

    pub fn rotation(&self) -> Option<&RotationModel> {
        self.rotation.as_ref()
    }

    pub fn pending(&self) -> Option<&SpinOutcome> {
        self.pending.as_ref()
    }

    /// Options frozen at the start of the current spin (or the last one).
    pub fn snapshot(&self) -> &[WheelOption] {
        &self.snapshot
    }

    /// Bumped on every spin start and reset; lets a render loop tell its own spin apart
    /// from a later one.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn animation_config(&self) -> &AnimationConfig {
        &self.animation
    }

    /// Takes effect from the next spin.
    pub fn set_animation_config(&mut self, animation: AnimationConfig) {
        self.animation = animation;
    }

    /// Starts a spin over `options` (already filtered down to what is spinnable) and
    /// returns the winning index. `on_settled` runs once, when the animation finishes.
    pub fn request_spin<R, F>(
        &mut self,
        options: &[WheelOption],
        rng: &mut R,
        now_ms: f64,
        on_settled: F,
    ) -> Result<usize, SpinError>
    where
        R: RandomSource + ?Sized,
        F: FnOnce(SpinOutcome) + 'static,
    {
        if self.state != SpinState::Idle {
            log::warn!("Spin requested while the wheel is {:?}; ignoring", self.state);
            return Err(SpinError::AlreadySpinning);
        }
        let index = match select_outcome(options, rng) {
            Some(index) => index,
            None => {
                log::warn!("Spin requested with no options available");
                return Err(SpinError::NoOptionsAvailable);
            }
        };

        let model = animation::begin_rotation(
            self.current_angle,
            index,
            options.len(),
            rng,
            &self.animation,
            now_ms,
        );

        self.snapshot = options.to_vec();
        self.pending = Some(SpinOutcome {
            index,
            option: options[index].clone(),
        });
        self.rotation = Some(model);
        self.on_settled = Some(Box::new(on_settled));
        self.generation += 1;
        self.state = SpinState::Spinning;

        log::debug!(
            "Spin {} started: index {} ({}) over {} options, {:.0}ms",
            self.generation,
            index,
            options[index].text,
            options.len(),
            model.duration_ms
        );
        Ok(index)
    }

    /// Moves the in-flight spin to `now_ms`. Returns `None` when nothing is spinning.
    ///
    /// The tick that reaches the end folds the rotation into the resting angle, fires the
    /// settle callback and returns the wheel to `Idle`.
    pub fn advance(&mut self, now_ms: f64) -> Option<Frame> {
        if self.state != SpinState::Spinning {
            return None;
        }
        let model = self.rotation?;
        let frame = animation::advance(&model, now_ms);
        self.current_angle = frame.angle;

        if frame.done {
            self.complete_spin(model);
        }
        Some(frame)
    }

    /// Like [`WheelGame::advance`], but only for the spin numbered `generation`. Ticks
    /// scheduled for an older spin are dropped.
    pub fn advance_for(&mut self, generation: u64, now_ms: f64) -> Option<Frame> {
        if generation != self.generation {
            log::debug!(
                "Dropping stale tick for spin {} (current {})",
                generation,
                self.generation
            );
            return None;
        }
        self.advance(now_ms)
    }

    fn complete_spin(&mut self, model: RotationModel) {
        self.current_angle = model.target_angle;
        self.rotation = None;
        self.state = SpinState::Settled;

        let outcome = self.pending.take();
        let callback = self.on_settled.take();
        if let Some(outcome) = outcome {
            log::debug!("Spin {} settled on {}", self.generation, outcome.text());
            if let Some(callback) = callback {
                callback(outcome);
            }
        }

        self.state = SpinState::Idle;
    }

    /// Forces the wheel back to `Idle` at angle zero. A pending settle callback is
    /// dropped without running.
    pub fn reset(&mut self) {
        if self.state == SpinState::Spinning {
            log::debug!("Resetting wheel mid-spin {}", self.generation);
        }
        self.state = SpinState::Idle;
        self.current_angle = 0.0;
        self.rotation = None;
        self.snapshot.clear();
        self.pending = None;
        self.on_settled = None;
        self.generation += 1;
    }
}
