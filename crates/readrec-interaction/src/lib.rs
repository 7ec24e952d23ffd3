pub mod gemini;

pub use gemini::GeminiRecommender;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::RwLock;

use readrec_core::catalog::{Catalog, READING_LEVELS};
use readrec_core::prompt::build_prompt;
use readrec_core::recommend::Recommender;
use readrec_core::session::{SelectionSession, SessionAction};
use readrec_core::{ReadrecError, Result};

/// Result of a trigger-capable entry point (level selection or the trigger
/// control).
///
/// This enum tells the caller what happened without exposing session
/// internals; rendering decisions stay in the front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// A fetch ran and its candidates were applied.
    Fetched {
        /// Number of candidates now in the session.
        count: usize,
    },
    /// A fetch ran and failed; diagnostics were logged, state shows no error.
    Failed,
    /// Not all three selections were present; nothing was attempted.
    Incomplete,
    /// The fetch completed but a newer one had been issued meanwhile; its
    /// result was discarded.
    Stale,
    /// The trigger control is disabled while a fetch is outstanding.
    Busy,
}

/// Owns one selection session and drives the recommendation flow.
///
/// The controller is the only holder of the mutable session: callers get the
/// enumerated selection entry points plus a read-only snapshot, never raw
/// field access. Each issued fetch is stamped with a monotonically
/// increasing token; a completion whose token is no longer the newest is
/// discarded, so overlapping requests resolve deterministically in favor of
/// the last one issued.
pub struct RecommendationController {
    /// Session ID for this controller instance
    session_id: String,
    /// The selection session, exclusively owned
    session: Arc<RwLock<SelectionSession>>,
    /// Read-only genre/mood catalog
    catalog: Arc<Catalog>,
    /// Provider of recommendations
    recommender: Arc<dyn Recommender>,
    /// Token of the most recently issued fetch
    fetch_seq: AtomicU64,
}

impl RecommendationController {
    /// Creates a controller over a fresh, empty session.
    ///
    /// # Arguments
    ///
    /// * `session_id` - Unique identifier for this session
    /// * `catalog` - The genre/mood lookup tables
    /// * `recommender` - The recommendation provider
    pub fn new_session(
        session_id: String,
        catalog: Arc<Catalog>,
        recommender: Arc<dyn Recommender>,
    ) -> Self {
        let session = SelectionSession::new(session_id.clone());
        Self {
            session_id,
            session: Arc::new(RwLock::new(session)),
            catalog,
            recommender,
            fetch_seq: AtomicU64::new(0),
        }
    }

    /// Returns the session ID.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Returns a read-only copy of the current session state.
    pub async fn snapshot(&self) -> SelectionSession {
        self.session.read().await.clone()
    }

    /// Genre labels in display order.
    pub fn genre_options(&self) -> Vec<String> {
        self.catalog
            .genre_labels()
            .into_iter()
            .map(String::from)
            .collect()
    }

    /// Mood labels for the currently selected genre (empty before a genre is
    /// chosen).
    pub async fn mood_options(&self) -> Vec<String> {
        let genre = self.session.read().await.genre.clone();
        self.catalog.moods_for(&genre).to_vec()
    }

    /// The fixed reading levels.
    pub fn level_options(&self) -> Vec<String> {
        READING_LEVELS.iter().map(|l| l.to_string()).collect()
    }

    /// Selects a genre. Resets the mood and disarms the fetch trigger.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the label is not in the catalog.
    pub async fn select_genre(&self, genre: &str) -> Result<()> {
        if !self.catalog.contains_genre(genre) {
            return Err(ReadrecError::not_found("genre", genre));
        }
        self.session.write().await.apply(SessionAction::SetGenre {
            genre: genre.to_string(),
        });
        Ok(())
    }

    /// Selects a mood. Disarms the fetch trigger; never touches the genre.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the label is not in the mood set of the current
    /// genre (which is empty before a genre is chosen).
    pub async fn select_mood(&self, mood: &str) -> Result<()> {
        let mut session = self.session.write().await;
        if !self.catalog.moods_for(&session.genre).contains(&mood.to_string()) {
            return Err(ReadrecError::not_found("mood", mood));
        }
        session.apply(SessionAction::SetMood {
            mood: mood.to_string(),
        });
        Ok(())
    }

    /// Selects a reading level and arms the fetch trigger.
    ///
    /// If genre and mood are both present this issues exactly one fetch and
    /// waits for its outcome; otherwise it is a silent no-op and the trigger
    /// stays armed until the next genre or mood selection clears it.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the label is not one of the fixed levels.
    pub async fn select_level(&self, level: &str) -> Result<FetchOutcome> {
        if !READING_LEVELS.contains(&level) {
            return Err(ReadrecError::not_found("level", level));
        }
        self.session.write().await.apply(SessionAction::SetLevel {
            level: level.to_string(),
        });
        Ok(self.fetch_if_complete().await)
    }

    /// The trigger control: re-submits the current level.
    ///
    /// Disabled while a fetch is outstanding; pressing it then has no
    /// effect. With a complete selection this re-issues a fetch even when
    /// nothing changed (idempotent trigger, not idempotent result).
    pub async fn press_trigger(&self) -> FetchOutcome {
        {
            let mut session = self.session.write().await;
            if session.is_loading {
                return FetchOutcome::Busy;
            }
            let level = session.level.clone();
            session.apply(SessionAction::SetLevel { level });
        }
        self.fetch_if_complete().await
    }

    /// The fetch-initiation rule: issue one request if all three selections
    /// are present, and apply its outcome unless a newer request has been
    /// issued meanwhile.
    async fn fetch_if_complete(&self) -> FetchOutcome {
        let (genre, mood, level) = {
            let session = self.session.read().await;
            if !session.is_complete() {
                return FetchOutcome::Incomplete;
            }
            (
                session.genre.clone(),
                session.mood.clone(),
                session.level.clone(),
            )
        };

        let token = self.fetch_seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.session.write().await.apply(SessionAction::FetchStart);

        let prompt = build_prompt(&genre, &mood, &level);
        tracing::info!(session_id = %self.session_id, token, "fetching recommendations");

        let result = self.recommender.recommend(&prompt).await;

        if token != self.fetch_seq.load(Ordering::SeqCst) {
            tracing::debug!(
                session_id = %self.session_id,
                token,
                "discarding stale fetch completion"
            );
            return FetchOutcome::Stale;
        }

        match result {
            Ok(candidates) => {
                let count = candidates.len();
                self.session
                    .write()
                    .await
                    .apply(SessionAction::SetResults { candidates });
                FetchOutcome::Fetched { count }
            }
            Err(e) => {
                tracing::warn!(session_id = %self.session_id, error = %e, "recommendation fetch failed");
                self.session.write().await.apply(SessionAction::FetchError);
                FetchOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use readrec_core::catalog::default_catalog;
    use readrec_core::recommend::Candidate;
    use std::collections::VecDeque;
    use std::sync::Mutex as StdMutex;
    use std::time::Duration;
    use tokio::sync::Notify;

    /// Scripted recommender: records prompts, pops queued responses, and can
    /// hold a call open behind a gate.
    struct MockRecommender {
        prompts: StdMutex<Vec<String>>,
        responses: StdMutex<VecDeque<Result<Vec<Candidate>>>>,
        gates: StdMutex<VecDeque<Arc<Notify>>>,
    }

    impl MockRecommender {
        fn new() -> Self {
            Self {
                prompts: StdMutex::new(Vec::new()),
                responses: StdMutex::new(VecDeque::new()),
                gates: StdMutex::new(VecDeque::new()),
            }
        }

        fn push_response(&self, response: Result<Vec<Candidate>>) {
            self.responses.lock().unwrap().push_back(response);
        }

        fn push_gate(&self) -> Arc<Notify> {
            let gate = Arc::new(Notify::new());
            self.gates.lock().unwrap().push_back(gate.clone());
            gate
        }

        fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }

        fn call_count(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    #[async_trait::async_trait]
    impl Recommender for MockRecommender {
        async fn recommend(&self, prompt: &str) -> Result<Vec<Candidate>> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            // Reserve this call's response before parking on the gate, so a
            // concurrent call cannot steal it.
            let response = self
                .responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(Vec::new()));
            let gate = self.gates.lock().unwrap().pop_front();
            if let Some(gate) = gate {
                gate.notified().await;
            }
            response
        }
    }

    fn controller_with(recommender: Arc<MockRecommender>) -> RecommendationController {
        RecommendationController::new_session(
            "test-session".to_string(),
            Arc::new(default_catalog()),
            recommender,
        )
    }

    async fn wait_for_loading(controller: &RecommendationController) {
        for _ in 0..200 {
            if controller.snapshot().await.is_loading {
                return;
            }
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
        panic!("fetch never started");
    }

    #[tokio::test]
    async fn test_genre_selection_drives_mood_options() {
        let mock = Arc::new(MockRecommender::new());
        let controller = controller_with(mock.clone());

        controller.select_genre("Fantasy").await.unwrap();
        assert_eq!(
            controller.mood_options().await,
            default_catalog().moods_for("Fantasy")
        );

        controller.select_mood("Epic").await.unwrap();
        controller.select_genre("Mystery").await.unwrap();

        // Changing genre cleared the mood and swapped the option set.
        let snapshot = controller.snapshot().await;
        assert_eq!(snapshot.mood, "");
        assert_eq!(
            controller.mood_options().await,
            default_catalog().moods_for("Mystery")
        );
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_mood_selection_keeps_genre_and_disarms_trigger() {
        let mock = Arc::new(MockRecommender::new());
        let controller = controller_with(mock.clone());

        controller.select_genre("Horror").await.unwrap();
        // Level without a mood: trigger armed but fetch silently skipped.
        let outcome = controller.select_level("Expert").await.unwrap();
        assert_eq!(outcome, FetchOutcome::Incomplete);
        assert!(controller.snapshot().await.ready);

        controller.select_mood("Creepy").await.unwrap();
        let snapshot = controller.snapshot().await;
        assert_eq!(snapshot.genre, "Horror");
        assert_eq!(snapshot.mood, "Creepy");
        assert!(!snapshot.ready);
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_level_selection_fetches_with_exact_prompt() {
        let mock = Arc::new(MockRecommender::new());
        let controller = controller_with(mock.clone());

        controller.select_genre("Fantasy").await.unwrap();
        controller.select_mood("Whimsical").await.unwrap();
        let outcome = controller.select_level("Beginner").await.unwrap();

        assert_eq!(outcome, FetchOutcome::Fetched { count: 0 });
        assert_eq!(
            mock.prompts(),
            vec![
                "Recommend 6 books for a Beginner Fantasy reader feeling Whimsical. Explain why."
                    .to_string()
            ]
        );
    }

    #[tokio::test]
    async fn test_trigger_disabled_while_loading() {
        let mock = Arc::new(MockRecommender::new());
        let gate = mock.push_gate();
        mock.push_response(Ok(vec![Candidate::from_text("done")]));
        let controller = Arc::new(controller_with(mock.clone()));

        controller.select_genre("Fantasy").await.unwrap();
        controller.select_mood("Epic").await.unwrap();

        let background = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.select_level("Expert").await })
        };
        wait_for_loading(&controller).await;

        // Pressing the trigger while loading has no effect at all.
        assert_eq!(controller.press_trigger().await, FetchOutcome::Busy);
        assert_eq!(mock.call_count(), 1);

        gate.notify_one();
        let outcome = background.await.unwrap().unwrap();
        assert_eq!(outcome, FetchOutcome::Fetched { count: 1 });
        assert!(!controller.snapshot().await.is_loading);
    }

    #[tokio::test]
    async fn test_successful_fetch_applies_candidates() {
        let mock = Arc::new(MockRecommender::new());
        let fixture: Vec<Candidate> =
            serde_json::from_str(r#"[{"content":{"parts":[{"text":"X"}]}}]"#).unwrap();
        mock.push_response(Ok(fixture));
        let controller = controller_with(mock);

        controller.select_genre("Romance").await.unwrap();
        controller.select_mood("Dreamy").await.unwrap();
        let outcome = controller.select_level("Intermediate").await.unwrap();

        assert_eq!(outcome, FetchOutcome::Fetched { count: 1 });
        let snapshot = controller.snapshot().await;
        assert_eq!(snapshot.recommendations.len(), 1);
        assert_eq!(snapshot.recommendations[0].display_text(), "X");
        assert!(!snapshot.is_loading);
        assert!(!snapshot.ready);
    }

    #[tokio::test]
    async fn test_empty_candidate_list_is_not_an_error() {
        let mock = Arc::new(MockRecommender::new());
        mock.push_response(Ok(Vec::new()));
        let controller = controller_with(mock);

        controller.select_genre("Non-Fiction").await.unwrap();
        controller.select_mood("Curious").await.unwrap();
        let outcome = controller.select_level("Expert").await.unwrap();

        assert_eq!(outcome, FetchOutcome::Fetched { count: 0 });
        assert!(controller.snapshot().await.recommendations.is_empty());
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_previous_recommendations() {
        let mock = Arc::new(MockRecommender::new());
        mock.push_response(Ok(vec![Candidate::from_text("kept")]));
        mock.push_response(Err(ReadrecError::api("boom")));
        let controller = controller_with(mock.clone());

        controller.select_genre("Mystery").await.unwrap();
        controller.select_mood("Tense").await.unwrap();
        controller.select_level("Beginner").await.unwrap();

        let outcome = controller.press_trigger().await;
        assert_eq!(outcome, FetchOutcome::Failed);

        let snapshot = controller.snapshot().await;
        assert_eq!(snapshot.recommendations.len(), 1);
        assert_eq!(snapshot.recommendations[0].display_text(), "kept");
        assert!(!snapshot.is_loading);
        assert!(!snapshot.ready);
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn test_reselecting_level_retriggers_fetch() {
        let mock = Arc::new(MockRecommender::new());
        let controller = controller_with(mock.clone());

        controller.select_genre("Fantasy").await.unwrap();
        controller.select_mood("Cozy").await.unwrap();
        controller.select_level("Expert").await.unwrap();
        controller.select_level("Expert").await.unwrap();

        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn test_stale_completion_is_discarded() {
        let mock = Arc::new(MockRecommender::new());
        let gate = mock.push_gate();
        mock.push_response(Ok(vec![Candidate::from_text("old")]));
        mock.push_response(Ok(vec![Candidate::from_text("new")]));
        let controller = Arc::new(controller_with(mock.clone()));

        controller.select_genre("Fantasy").await.unwrap();
        controller.select_mood("Dark").await.unwrap();

        // First fetch held open behind the gate.
        let first = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.select_level("Expert").await })
        };
        wait_for_loading(&controller).await;

        // Second fetch issued while the first is outstanding; it resolves
        // immediately and becomes the newest.
        let outcome = controller.select_level("Beginner").await.unwrap();
        assert_eq!(outcome, FetchOutcome::Fetched { count: 1 });

        // Releasing the first fetch must not overwrite the newer result.
        gate.notify_one();
        let first_outcome = first.await.unwrap().unwrap();
        assert_eq!(first_outcome, FetchOutcome::Stale);

        let snapshot = controller.snapshot().await;
        assert_eq!(snapshot.recommendations[0].display_text(), "new");
    }

    #[tokio::test]
    async fn test_unknown_labels_are_rejected() {
        let mock = Arc::new(MockRecommender::new());
        let controller = controller_with(mock.clone());

        assert!(controller.select_genre("Cookbooks").await.is_err());
        // No genre chosen yet, so every mood is out of range.
        assert!(controller.select_mood("Epic").await.is_err());
        assert!(controller.select_level("Wizard").await.is_err());

        let snapshot = controller.snapshot().await;
        assert_eq!(snapshot.genre, "");
        assert_eq!(snapshot.mood, "");
        assert_eq!(snapshot.level, "");
        assert_eq!(mock.call_count(), 0);
    }
}
