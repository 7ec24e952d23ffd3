//! GeminiRecommender - Direct REST API implementation for Gemini.
//!
//! This recommender calls the Gemini REST API directly.
//! Configuration is loaded from secret.json (or the GEMINI_API_KEY
//! environment variable).

use readrec_core::config::SecretConfig;
use readrec_core::recommend::{Candidate, Recommender};
use readrec_core::secret::SecretService;
use readrec_core::{ReadrecError, Result};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Recommender implementation that talks to the Gemini HTTP API.
///
/// No timeout is configured: a hung remote call stays outstanding until the
/// transport gives up. Callers that need responsiveness run the request on a
/// background task.
#[derive(Clone)]
pub struct GeminiRecommender {
    client: Client,
    api_key: String,
    model: String,
}

impl GeminiRecommender {
    /// Creates a new recommender with the provided API key and model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    /// Builds a recommender from loaded secret configuration.
    ///
    /// Model name defaults to `gemini-2.5-flash` if not specified.
    pub fn from_config(config: &SecretConfig) -> Result<Self> {
        let gemini = config
            .gemini
            .as_ref()
            .ok_or_else(|| ReadrecError::config("Gemini configuration not found"))?;

        let model = gemini
            .model_name
            .clone()
            .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());

        Ok(Self::new(gemini.api_key.clone(), model))
    }

    /// Loads configuration through a secret service and builds a recommender.
    pub async fn try_from_secrets(service: &dyn SecretService) -> Result<Self> {
        let config = service
            .load_secrets()
            .await
            .map_err(ReadrecError::config)?;
        Self::from_config(&config)
    }

    /// Overrides the model after construction.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Returns the model this recommender targets.
    pub fn model(&self) -> &str {
        &self.model
    }

    async fn send_request(&self, body: &GenerateContentRequest) -> Result<Vec<Candidate>> {
        let url = format!(
            "{}/{model}:generateContent?key={api_key}",
            BASE_URL,
            model = self.model,
            api_key = self.api_key
        );

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|err| ReadrecError::api(format!("Gemini API request failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Gemini error body".to_string());
            return Err(map_http_error(status, body_text));
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|err| {
            ReadrecError::api(format!("Failed to parse Gemini response: {err}"))
        })?;

        // A well-formed response without a candidates field is an empty
        // result, not an error.
        Ok(parsed.candidates.unwrap_or_default())
    }
}

#[async_trait::async_trait]
impl Recommender for GeminiRecommender {
    async fn recommend(&self, prompt: &str) -> Result<Vec<Candidate>> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };
        self.send_request(&request).await
    }
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[allow(dead_code)]
    code: Option<i32>,
    message: Option<String>,
    status: Option<String>,
}

fn map_http_error(status: StatusCode, body: String) -> ReadrecError {
    let message = serde_json::from_str::<ErrorWrapper>(&body)
        .map(|wrapper| {
            let status_text = wrapper.error.status.unwrap_or_default();
            let msg = wrapper.error.message.unwrap_or_else(|| body.clone());
            if status_text.is_empty() {
                msg
            } else {
                format!("{status_text}: {msg}")
            }
        })
        .unwrap_or_else(|_| body.clone());

    ReadrecError::api_with_status(status.as_u16(), message)
}
