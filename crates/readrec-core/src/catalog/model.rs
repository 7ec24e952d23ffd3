use serde::{Deserialize, Serialize};

/// One genre with its associated mood options, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenreEntry {
    /// Genre display label (also the lookup key)
    pub name: String,
    /// Mood labels selectable while this genre is chosen
    pub moods: Vec<String>,
}

/// The ordered set of genres and the genre-to-moods mapping.
///
/// Lookups are by exact label. An unknown (or empty) genre yields an empty
/// mood set, which is how the mood picker ends up with no selectable options
/// before a genre is chosen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Catalog {
    genres: Vec<GenreEntry>,
}

impl Catalog {
    /// Creates a catalog from an ordered list of genre entries.
    pub fn new(genres: Vec<GenreEntry>) -> Self {
        Self { genres }
    }

    /// Returns the genre labels in display order.
    pub fn genre_labels(&self) -> Vec<&str> {
        self.genres.iter().map(|g| g.name.as_str()).collect()
    }

    /// Returns the mood labels for the given genre, empty if unknown.
    pub fn moods_for(&self, genre: &str) -> &[String] {
        self.genres
            .iter()
            .find(|g| g.name == genre)
            .map(|g| g.moods.as_slice())
            .unwrap_or(&[])
    }

    /// True if the label names a known genre.
    pub fn contains_genre(&self, genre: &str) -> bool {
        self.genres.iter().any(|g| g.name == genre)
    }

    /// Number of genres in the catalog.
    pub fn len(&self) -> usize {
        self.genres.len()
    }

    /// True if the catalog has no genres.
    pub fn is_empty(&self) -> bool {
        self.genres.is_empty()
    }
}
