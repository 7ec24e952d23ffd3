use serde::{Deserialize, Serialize};

use crate::recommend::Candidate;

/// The enumerated transitions a selection session accepts.
///
/// There are no raw field setters anywhere; every state change in the
/// application is one of these actions run through
/// [`SelectionSession::apply`](super::SelectionSession::apply).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionAction {
    /// User picked a genre. Resets the mood and disarms the fetch trigger.
    SetGenre { genre: String },
    /// User picked a mood. Disarms the fetch trigger.
    SetMood { mood: String },
    /// User picked a reading level (or pressed the trigger control, which
    /// re-submits the current level). Arms the fetch trigger.
    SetLevel { level: String },
    /// A fetch has been issued.
    FetchStart,
    /// A fetch resolved with a candidate list.
    SetResults { candidates: Vec<Candidate> },
    /// A fetch failed. Leaves the current recommendations untouched.
    FetchError,
}
