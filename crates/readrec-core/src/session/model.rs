//! Selection session domain model.
//!
//! This module contains the core SelectionSession entity that holds the
//! user's current picks and fetch status for one view of the application.

use serde::{Deserialize, Serialize};

use super::action::SessionAction;
use crate::recommend::Candidate;

/// The in-memory record of current genre/mood/level selections and fetch
/// status for one view instance.
///
/// A session contains:
/// - The three user selections (empty string = not yet chosen)
/// - The recommendations returned by the last successful fetch
/// - The loading flag, set only while a remote call is outstanding
/// - The ready flag, an edge-triggered signal observed by the
///   fetch-initiation logic (not a persistent mode)
///
/// The session lives for the lifetime of the displayed view and is never
/// persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionSession {
    /// Unique session identifier (UUID format)
    pub id: String,
    /// Timestamp when the session was created (ISO 8601 format)
    pub created_at: String,
    /// Selected genre, one of the catalog's genre labels, or empty
    pub genre: String,
    /// Selected mood, one of the mood labels keyed by `genre`, or empty
    pub mood: String,
    /// Selected reading level, or empty
    pub level: String,
    /// Candidates returned by the last successful fetch
    #[serde(default)]
    pub recommendations: Vec<Candidate>,
    /// True only while a remote call is outstanding
    #[serde(default)]
    pub is_loading: bool,
    /// Trigger flag: true exactly when a fetch should be initiated
    #[serde(default)]
    pub ready: bool,
}

impl SelectionSession {
    /// Creates a fresh session with all selections empty.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            created_at: chrono::Utc::now().to_rfc3339(),
            genre: String::new(),
            mood: String::new(),
            level: String::new(),
            recommendations: Vec::new(),
            is_loading: false,
            ready: false,
        }
    }

    /// True when genre, mood, and level are all chosen.
    pub fn is_complete(&self) -> bool {
        !self.genre.is_empty() && !self.mood.is_empty() && !self.level.is_empty()
    }

    /// Applies one enumerated transition to the session.
    ///
    /// This is the whole reducer: picking a genre clears the mood (the mood
    /// option set depends on the genre) and disarms the trigger; picking a
    /// mood disarms the trigger; picking a level arms it. Fetch outcomes
    /// clear both flags, and only a successful outcome replaces the
    /// recommendation list.
    pub fn apply(&mut self, action: SessionAction) {
        match action {
            SessionAction::SetGenre { genre } => {
                self.genre = genre;
                self.mood = String::new();
                self.ready = false;
            }
            SessionAction::SetMood { mood } => {
                self.mood = mood;
                self.ready = false;
            }
            SessionAction::SetLevel { level } => {
                self.level = level;
                self.ready = true;
            }
            SessionAction::FetchStart => {
                self.is_loading = true;
            }
            SessionAction::SetResults { candidates } => {
                self.recommendations = candidates;
                self.is_loading = false;
                self.ready = false;
            }
            SessionAction::FetchError => {
                self.is_loading = false;
                self.ready = false;
            }
        }
    }
}
