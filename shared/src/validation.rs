use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidationError;

use crate::constants::{MAX_OPTION_TEXT_LENGTH, MAX_OPTION_WEIGHT};
use crate::shared_wheel_game::WheelOption;

static HEX_COLOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#[0-9a-fA-F]{6}$").expect("hex color pattern is valid"));

pub fn validate_option_text(text: &str) -> Result<(), ValidationError> {
    if text.trim().is_empty() {
        return Err(ValidationError::new("empty_option_text"));
    }
    if text.chars().count() > MAX_OPTION_TEXT_LENGTH {
        return Err(ValidationError::new("option_text_too_long"));
    }
    Ok(())
}

// Zero is allowed: the option stays on the wheel but can never be drawn.
pub fn validate_weight(weight: u32) -> Result<(), ValidationError> {
    if weight > MAX_OPTION_WEIGHT {
        return Err(ValidationError::new("invalid_weight"));
    }
    Ok(())
}

pub fn validate_color(color: &str) -> Result<(), ValidationError> {
    if !HEX_COLOR.is_match(color) {
        return Err(ValidationError::new("invalid_color"));
    }
    Ok(())
}

pub fn validate_option(option: &WheelOption) -> Result<(), ValidationError> {
    validate_option_text(&option.text)?;
    validate_weight(option.weight)?;
    validate_color(&option.color)
}

/// Option texts identify slices, so they must be unique within one wheel.
pub fn validate_unique_texts(options: &[WheelOption]) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    if options.iter().all(|option| seen.insert(option.text.as_str())) {
        Ok(())
    } else {
        Err(ValidationError::new("duplicate_option_text"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_text() {
        assert!(validate_option_text("Headshot!").is_ok());
        assert_eq!(validate_option_text("   ").unwrap_err().code, "empty_option_text");
        let long = "x".repeat(MAX_OPTION_TEXT_LENGTH + 1);
        assert_eq!(validate_option_text(&long).unwrap_err().code, "option_text_too_long");
    }

    #[test]
    fn test_weight_bounds() {
        assert!(validate_weight(0).is_ok());
        assert!(validate_weight(MAX_OPTION_WEIGHT).is_ok());
        assert!(validate_weight(MAX_OPTION_WEIGHT + 1).is_err());
    }

    #[test]
    fn test_color() {
        assert!(validate_color("#FF7b00").is_ok());
        assert!(validate_color("ff7b00").is_err());
        assert!(validate_color("#fff").is_err());
    }

    #[test]
    fn test_unique_texts() {
        let mut options = vec![
            WheelOption::new("A", 1, "#000000"),
            WheelOption::new("B", 1, "#000000"),
        ];
        assert!(validate_unique_texts(&options).is_ok());
        options.push(WheelOption::new("A", 5, "#ffffff"));
        assert_eq!(
            validate_unique_texts(&options).unwrap_err().code,
            "duplicate_option_text"
        );
    }
}
