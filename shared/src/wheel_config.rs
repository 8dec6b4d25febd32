use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use validator::ValidationError;

use crate::animation::AnimationConfig;
use crate::constants::{DEFAULT_OPTIONS, HISTORY_LIMIT, OPTION_PALETTE};
use crate::error::ConfigError;
use crate::shared_wheel_game::WheelOption;
use crate::tournament;
use crate::validation::{validate_option, validate_unique_texts};

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_spins: u64,
    pub option_counts: BTreeMap<String, u64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub result: String,
    pub timestamp_ms: u64,
}

/// Partial edit applied by [`WheelConfig::update_option`]
#[derive(Debug, Clone, Default)]
pub struct OptionUpdate {
    pub text: Option<String>,
    pub weight: Option<u32>,
    pub color: Option<String>,
}

/// The wheel's configuration store: options, tournament progress, statistics and history.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct WheelConfig {
    pub options: Vec<WheelOption>,
    pub tournament_mode: bool,
    pub eliminated_options: Vec<String>,
    pub statistics: Statistics,
    pub history: Vec<HistoryEntry>,
    pub animation_config: AnimationConfig,
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            options: DEFAULT_OPTIONS.clone(),
            tournament_mode: false,
            eliminated_options: Vec::new(),
            statistics: Statistics::default(),
            history: Vec::new(),
            animation_config: AnimationConfig::default(),
        }
    }
}

// Shape written by export and read back by import.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportedConfig<'a> {
    options: &'a [WheelOption],
    tournament_mode: bool,
    animation_config: &'a AnimationConfig,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportedConfig {
    options: Option<Vec<WheelOption>>,
    #[serde(default)]
    tournament_mode: bool,
    animation_config: Option<AnimationConfig>,
}

impl WheelConfig {
    pub fn available_options(&self) -> Vec<WheelOption> {
        tournament::available_options(&self.options, &self.eliminated_options, self.tournament_mode)
    }

    pub fn is_tournament_complete(&self) -> bool {
        tournament::is_round_complete(&self.options, &self.eliminated_options, self.tournament_mode)
    }

    pub fn add_option(&mut self, text: &str, weight: u32) -> Result<(), ValidationError> {
        let color = OPTION_PALETTE[self.options.len() % OPTION_PALETTE.len()];
        let option = WheelOption::new(text.trim(), weight, color);
        validate_option(&option)?;
        if self.options.iter().any(|existing| existing.text == option.text) {
            return Err(ValidationError::new("duplicate_option_text"));
        }
        self.options.push(option);
        Ok(())
    }

    /// Returns `false` when `index` is out of range.
    pub fn remove_option(&mut self, index: usize) -> bool {
        if index >= self.options.len() {
            return false;
        }
        let removed = self.options.remove(index);
        self.eliminated_options.retain(|text| text != &removed.text);
        true
    }

    /// Applies `update` to the option at `index`. Out of range is `Ok(false)`; an edit that
    /// would leave the option invalid is rejected and nothing changes.
    pub fn update_option(
        &mut self,
        index: usize,
        update: OptionUpdate,
    ) -> Result<bool, ValidationError> {
        let Some(current) = self.options.get(index) else {
            return Ok(false);
        };

        let mut edited = current.clone();
        if let Some(text) = update.text {
            edited.text = text.trim().to_string();
        }
        if let Some(weight) = update.weight {
            edited.weight = weight;
        }
        if let Some(color) = update.color {
            edited.color = color;
        }
        validate_option(&edited)?;

        let clashes = self
            .options
            .iter()
            .enumerate()
            .any(|(i, other)| i != index && other.text == edited.text);
        if clashes {
            return Err(ValidationError::new("duplicate_option_text"));
        }

        let previous_text = std::mem::replace(&mut self.options[index], edited).text;
        let new_text = self.options[index].text.clone();
        for text in self.eliminated_options.iter_mut() {
            if *text == previous_text {
                *text = new_text.clone();
            }
        }
        Ok(true)
    }

    /// Books a settled spin: statistics, newest-first history and, in tournament mode, the
    /// elimination.
    pub fn record_spin(&mut self, result: &str, timestamp_ms: u64) {
        self.statistics.total_spins += 1;
        *self
            .statistics
            .option_counts
            .entry(result.to_string())
            .or_insert(0) += 1;

        self.history.insert(
            0,
            HistoryEntry {
                result: result.to_string(),
                timestamp_ms,
            },
        );
        self.history.truncate(HISTORY_LIMIT);

        self.eliminated_options =
            tournament::record_elimination(&self.eliminated_options, result, self.tournament_mode);
    }

    pub fn reset_tournament(&mut self) {
        self.eliminated_options.clear();
    }

    pub fn set_tournament_mode(&mut self, enabled: bool) {
        self.tournament_mode = enabled;
        self.eliminated_options.clear();
    }

    pub fn reset_statistics(&mut self) {
        self.statistics = Statistics::default();
        self.history.clear();
    }

    pub fn export_json(&self) -> Result<String, ConfigError> {
        let exported = ExportedConfig {
            options: &self.options,
            tournament_mode: self.tournament_mode,
            animation_config: &self.animation_config,
        };
        Ok(serde_json::to_string_pretty(&exported)?)
    }

    /// Replaces options, tournament mode and (when present) animation settings from an
    /// exported document. Statistics and history are kept; eliminations are cleared.
    pub fn import_json(&mut self, json: &str) -> Result<(), ConfigError> {
        let imported: ImportedConfig = serde_json::from_str(json).map_err(|e| {
            log::warn!("Rejected config import: {}", e);
            ConfigError::from(e)
        })?;
        let options = imported.options.ok_or(ConfigError::MissingOptions)?;

        for (index, option) in options.iter().enumerate() {
            validate_option(option)
                .map_err(|reason| ConfigError::InvalidOption { index, reason })?;
        }
        if let Err(reason) = validate_unique_texts(&options) {
            let index = first_duplicate(&options).unwrap_or(0);
            return Err(ConfigError::InvalidOption { index, reason });
        }
        if let Some(animation) = &imported.animation_config {
            animation.validate()?;
        }

        self.options = options;
        self.tournament_mode = imported.tournament_mode;
        self.eliminated_options.clear();
        if let Some(animation) = imported.animation_config {
            self.animation_config = animation;
        }
        log::debug!("Imported {} options", self.options.len());
        Ok(())
    }
}

fn first_duplicate(options: &[WheelOption]) -> Option<usize> {
    options
        .iter()
        .enumerate()
        .position(|(i, option)| options[..i].iter().any(|o| o.text == option.text))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abc() -> WheelConfig {
        WheelConfig {
            options: vec![
                WheelOption::new("A", 10, "#ff0000"),
                WheelOption::new("B", 20, "#00ff00"),
                WheelOption::new("C", 30, "#0000ff"),
            ],
            ..WheelConfig::default()
        }
    }

    #[test]
    fn test_defaults() {
        let config = WheelConfig::default();
        assert_eq!(config.options.len(), 6);
        assert_eq!(config.options[0].text, "Headshot!");
        assert!(!config.tournament_mode);
        assert_eq!(config.animation_config.min_spin_time_ms, 3000);
        assert_eq!(config.animation_config.max_spin_time_ms, 5000);
    }

    #[test]
    fn test_add_option_assigns_palette_color() {
        let mut config = abc();
        config.add_option("D", 15).unwrap();
        let added = config.options.last().unwrap();
        assert_eq!(added.text, "D");
        assert_eq!(added.weight, 15);
        assert_eq!(added.color, OPTION_PALETTE[3]);

        assert!(config.add_option("A", 5).is_err());
        assert!(config.add_option("", 5).is_err());
        assert_eq!(config.options.len(), 4);
    }

    #[test]
    fn test_remove_option() {
        let mut config = abc();
        assert!(config.remove_option(1));
        assert_eq!(config.options.len(), 2);
        assert!(!config.remove_option(5));
        assert_eq!(config.options.len(), 2);
    }

    #[test]
    fn test_update_option() {
        let mut config = abc();
        let update = OptionUpdate {
            weight: Some(50),
            ..OptionUpdate::default()
        };
        assert!(config.update_option(0, update).unwrap());
        assert_eq!(config.options[0].weight, 50);

        assert!(!config.update_option(9, OptionUpdate::default()).unwrap());

        let clash = OptionUpdate {
            text: Some("B".to_string()),
            ..OptionUpdate::default()
        };
        assert!(config.update_option(0, clash).is_err());
        assert_eq!(config.options[0].text, "A");
    }

    #[test]
    fn test_rename_carries_elimination() {
        let mut config = abc();
        config.tournament_mode = true;
        config.record_spin("A", 1);
        let rename = OptionUpdate {
            text: Some("Alpha".to_string()),
            ..OptionUpdate::default()
        };
        config.update_option(0, rename).unwrap();
        assert_eq!(config.eliminated_options, vec!["Alpha".to_string()]);
        assert_eq!(config.available_options().len(), 2);
    }

    #[test]
    fn test_record_spin() {
        let mut config = abc();
        config.record_spin("B", 100);
        config.record_spin("B", 200);
        config.record_spin("C", 300);

        assert_eq!(config.statistics.total_spins, 3);
        assert_eq!(config.statistics.option_counts.get("B"), Some(&2));
        assert_eq!(config.history[0].result, "C");
        assert_eq!(config.history[0].timestamp_ms, 300);
        assert!(config.eliminated_options.is_empty());
    }

    #[test]
    fn test_history_is_capped() {
        let mut config = abc();
        for i in 0..(HISTORY_LIMIT as u64 + 5) {
            config.record_spin("A", i);
        }
        assert_eq!(config.history.len(), HISTORY_LIMIT);
        assert_eq!(config.history[0].timestamp_ms, HISTORY_LIMIT as u64 + 4);
    }

    #[test]
    fn test_tournament_round() {
        let mut config = abc();
        config.set_tournament_mode(true);
        for text in ["A", "B", "C"] {
            assert!(!config.is_tournament_complete());
            config.record_spin(text, 0);
        }
        assert!(config.available_options().is_empty());
        assert!(config.is_tournament_complete());

        config.reset_tournament();
        assert_eq!(config.available_options().len(), 3);
    }

    #[test]
    fn test_export_import() {
        let mut source = abc();
        source.tournament_mode = true;
        let json = source.export_json().unwrap();
        assert!(json.contains("\"tournamentMode\": true"));
        assert!(json.contains("\"minSpinTime\""));

        let mut target = WheelConfig::default();
        target.record_spin("Ace", 5);
        target.import_json(&json).unwrap();
        assert_eq!(target.options, source.options);
        assert!(target.tournament_mode);
        assert_eq!(target.statistics.total_spins, 1);
    }

    #[test]
    fn test_import_rejects_bad_documents() {
        let mut config = abc();
        assert!(matches!(config.import_json("not json"), Err(ConfigError::Json(_))));
        assert!(matches!(
            config.import_json(r#"{"theme": "dark"}"#),
            Err(ConfigError::MissingOptions)
        ));
        assert!(matches!(
            config.import_json(r##"{"options": [{"text": "A", "color": "#000000"}]}"##),
            Err(ConfigError::Json(_))
        ));
        assert!(matches!(
            config.import_json(r#"{"options": [{"text": "A", "weight": 1}, {"text": "A", "weight": 2}]}"#),
            Err(ConfigError::InvalidOption { index: 1, .. })
        ));
        assert!(matches!(
            config.import_json(r#"{"options": [{"text": "A", "weight": 1, "color": "red"}]}"#),
            Err(ConfigError::InvalidOption { index: 0, .. })
        ));
        assert_eq!(config, abc());
    }
}
