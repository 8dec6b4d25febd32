use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use wheel_shared::triggers::{StreamEvent, TriggerSettings};

use crate::error::Error;

const DEFAULT_TICK_MS: u64 = 16; // ~60fps
const DEFAULT_SPIN_GAP_MS: u64 = 7000;

/// Driver settings, read from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct Settings {
    pub config_path: Option<PathBuf>,
    pub tick: Duration,
    pub spin_gap: Duration,
    pub tournament: Option<bool>,
    pub demo_events: Vec<StreamEvent>,
    pub triggers: TriggerSettings,
}

impl Settings {
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config_path = lookup("WHEEL_CONFIG_PATH")
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);
        let tick_ms = parse_or(&lookup, "WHEEL_TICK_MS", DEFAULT_TICK_MS)?;
        let spin_gap_ms = parse_or(&lookup, "WHEEL_SPIN_GAP_MS", DEFAULT_SPIN_GAP_MS)?;
        let tournament = match lookup("WHEEL_TOURNAMENT") {
            Some(value) => Some(parse_bool("WHEEL_TOURNAMENT", &value)?),
            None => None,
        };
        let demo_events = lookup("WHEEL_DEMO_EVENTS")
            .map(|events| {
                events
                    .split(',')
                    .filter(|event| !event.trim().is_empty())
                    .map(StreamEvent::from_str)
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            config_path,
            tick: Duration::from_millis(tick_ms.max(1)),
            spin_gap: Duration::from_millis(spin_gap_ms),
            tournament,
            demo_events,
            triggers: TriggerSettings::default(),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, Error>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(value) => value.trim().parse().map_err(|_| Error::Setting { key, value }),
        None => Ok(default),
    }
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, Error> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::Setting {
            key,
            value: value.to_string(),
        }),
    }
}
