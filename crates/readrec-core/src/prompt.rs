//! Prompt construction for the recommendation request.

/// Builds the fixed recommendation prompt from the three selections.
///
/// The template is not configurable; the three strings are embedded verbatim.
pub fn build_prompt(genre: &str, mood: &str, level: &str) -> String {
    format!("Recommend 6 books for a {level} {genre} reader feeling {mood}. Explain why.")
}
