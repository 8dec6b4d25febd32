use once_cell::sync::Lazy;

use crate::shared_wheel_game::WheelOption;

pub const DEFAULT_MIN_SPIN_TIME_MS: u64 = 3000;
pub const DEFAULT_MAX_SPIN_TIME_MS: u64 = 5000;
pub const DEFAULT_MIN_EXTRA_ROTATIONS: u32 = 5;
pub const DEFAULT_MAX_EXTRA_ROTATIONS: u32 = 7;

// Fraction of a segment's width the stopping point may drift from its center, each side.
pub const SEGMENT_JITTER_FRACTION: f64 = 0.4;

pub const HISTORY_LIMIT: usize = 100;
pub const MAX_OPTION_WEIGHT: u32 = 100;
pub const MAX_OPTION_TEXT_LENGTH: usize = 50;
pub const DEFAULT_OPTION_COLOR: &str = "#ffffff";

/// Colors handed out round-robin to newly added options.
pub const OPTION_PALETTE: [&str; 6] = [
    "#ff0000", "#ff7b00", "#ffff00", "#00ff00", "#00ffff", "#ff00ff",
];

pub const DEFAULT_SPIN_COMMAND: &str = "!spin";

pub static DEFAULT_OPTIONS: Lazy<Vec<WheelOption>> = Lazy::new(|| {
    [
        ("Headshot!", 10, "#ff0000"),
        ("Ace", 15, "#ff7b00"),
        ("Clutch", 20, "#ffff00"),
        ("Eco Round", 25, "#00ff00"),
        ("Force Buy", 20, "#00ffff"),
        ("Save", 10, "#ff00ff"),
    ]
    .into_iter()
    .map(|(text, weight, color)| WheelOption::new(text, weight, color))
    .collect()
});
