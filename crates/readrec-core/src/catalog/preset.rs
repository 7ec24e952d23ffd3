//! Built-in catalog presets.
//!
//! Used whenever no catalog file is present. The labels here are the exact
//! strings embedded into prompts, so changing one changes what the remote
//! model is asked for.

use super::model::{Catalog, GenreEntry};

/// Returns the default genre/mood catalog.
pub fn default_catalog() -> Catalog {
    let entry = |name: &str, moods: &[&str]| GenreEntry {
        name: name.to_string(),
        moods: moods.iter().map(|m| m.to_string()).collect(),
    };

    Catalog::new(vec![
        entry("Fantasy", &["Whimsical", "Epic", "Dark", "Cozy"]),
        entry(
            "Science Fiction",
            &["Curious", "Adventurous", "Contemplative", "Bleak"],
        ),
        entry("Mystery", &["Tense", "Puzzled", "Gritty", "Playful"]),
        entry("Romance", &["Hopeful", "Heartbroken", "Dreamy", "Lighthearted"]),
        entry("Horror", &["Creepy", "Anxious", "Brave", "Morbid"]),
        entry(
            "Historical Fiction",
            &["Nostalgic", "Reflective", "Inspired", "Somber"],
        ),
        entry(
            "Non-Fiction",
            &["Curious", "Motivated", "Skeptical", "Focused"],
        ),
    ])
}
