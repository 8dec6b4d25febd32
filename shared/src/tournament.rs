use crate::shared_wheel_game::WheelOption;

/// Options that can still be drawn. Outside tournament mode that is every option.
pub fn available_options(
    all_options: &[WheelOption],
    eliminated: &[String],
    tournament_mode: bool,
) -> Vec<WheelOption> {
    if !tournament_mode {
        return all_options.to_vec();
    }
    all_options
        .iter()
        .filter(|option| !eliminated.iter().any(|text| text == &option.text))
        .cloned()
        .collect()
}

/// Appends a winner to the eliminated set when tournament mode is on. Re-recording a
/// name that is already eliminated leaves the set as it was.
pub fn record_elimination(
    eliminated: &[String],
    chosen_text: &str,
    tournament_mode: bool,
) -> Vec<String> {
    let mut next = eliminated.to_vec();
    if tournament_mode && !next.iter().any(|text| text == chosen_text) {
        next.push(chosen_text.to_string());
    }
    next
}

/// A round is over once tournament mode has eliminated every option.
pub fn is_round_complete(
    all_options: &[WheelOption],
    eliminated: &[String],
    tournament_mode: bool,
) -> bool {
    tournament_mode
        && !all_options.is_empty()
        && available_options(all_options, eliminated, tournament_mode).is_empty()
}
