//! Assist API client implementation

use crate::{
    error::AssistError,
    types::{GenerateRequest, GenerateResponse},
};
use reqwest::{Client, StatusCode};

const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-1.5-pro";

/// Client for the generative-language assist API
#[derive(Debug, Clone)]
pub struct AssistClient {
    client: Client,
    api_key: String,
    api_url: String,
    model: String,
}

impl AssistClient {
    /// Create a new client with API key from environment
    ///
    /// # Errors
    ///
    /// Returns [`AssistError::MissingApiKey`] if `ASSIST_API_KEY` is not set
    pub fn from_env() -> Result<Self, AssistError> {
        let api_key = std::env::var("ASSIST_API_KEY").map_err(|_| AssistError::MissingApiKey)?;

        Ok(Self::new(api_key))
    }

    /// Create a new client with explicit API key
    #[must_use]
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Override the API base URL (tests point this at a stub server)
    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Override the model name
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Generate content and return the first candidate's text
    ///
    /// # Errors
    ///
    /// Returns errors for network failures, API errors, parse failures, or
    /// an answer with no candidate text
    pub async fn generate(&self, request: GenerateRequest) -> Result<String, AssistError> {
        let response = self
            .client
            .post(format!(
                "{}/models/{}:generateContent",
                self.api_url, self.model
            ))
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| AssistError::RequestFailed(e.to_string()))?;

        match response.status() {
            StatusCode::OK => {
                let parsed = response
                    .json::<GenerateResponse>()
                    .await
                    .map_err(|e| AssistError::ResponseParseFailed(e.to_string()))?;
                parsed.text().ok_or(AssistError::EmptyResponse)
            },
            StatusCode::TOO_MANY_REQUESTS => Err(AssistError::RateLimited),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(AssistError::Unauthorized),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(AssistError::ApiError {
                    status: status.as_u16(),
                    message: body,
                })
            },
        }
    }

    /// Enhance a free-text issue description
    ///
    /// Best-effort: on any failure the original description is returned
    /// unchanged.
    pub async fn enhance_description(&self, description: &str) -> String {
        let prompt = format!(
            "Enhance the following accessibility issue description with more details and technical specificity: \"{description}\""
        );
        match self.generate(GenerateRequest::from_text(prompt)).await {
            Ok(text) => text,
            Err(error) => {
                tracing::warn!(%error, "Description enhancement failed, keeping original text");
                description.to_string()
            },
        }
    }

    /// Analyze a base64-encoded PNG screenshot for accessibility issues
    ///
    /// Best-effort: failures produce a fixed review-manually message.
    pub async fn analyze_screenshot(&self, image_base64: &str) -> String {
        let request = GenerateRequest::from_text_and_image(
            "Analyze this screenshot and identify any potential accessibility issues.",
            "image/png",
            image_base64,
        );
        match self.generate(request).await {
            Ok(text) => text,
            Err(error) => {
                tracing::warn!(%error, "Screenshot analysis failed");
                "Unable to analyze the screenshot. Please review manually.".to_string()
            },
        }
    }

    /// Suggest remediations for a described accessibility issue
    ///
    /// Best-effort: failures produce a fixed guidance message.
    pub async fn suggest_solutions(&self, issue: &str) -> String {
        let prompt =
            format!("Suggest potential solutions for the following accessibility issue: \"{issue}\"");
        match self.generate(GenerateRequest::from_text(prompt)).await {
            Ok(text) => text,
            Err(error) => {
                tracing::warn!(%error, "Solution suggestion failed");
                "Unable to suggest solutions at this time. Please consult accessibility guidelines."
                    .to_string()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn candidate_body(text: &str) -> serde_json::Value {
        serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "text": text }] } }]
        })
    }

    #[test]
    fn client_creation_uses_defaults() {
        let client = AssistClient::new("test-key".to_string());
        assert_eq!(client.api_key, "test-key");
        assert_eq!(client.api_url, DEFAULT_API_URL);
        assert_eq!(client.model, DEFAULT_MODEL);
    }

    #[tokio::test]
    async fn enhance_description_returns_generated_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-1.5-pro:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(candidate_body(
                "Images lack alt attributes, violating WCAG 1.1.1.",
            )))
            .mount(&server)
            .await;

        let client = AssistClient::new("key".into()).with_api_url(server.uri());
        let enhanced = client.enhance_description("missing alt text").await;
        assert_eq!(enhanced, "Images lack alt attributes, violating WCAG 1.1.1.");
    }

    #[tokio::test]
    async fn enhance_description_falls_back_to_original_on_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = AssistClient::new("key".into()).with_api_url(server.uri());
        let enhanced = client.enhance_description("missing alt text").await;
        assert_eq!(enhanced, "missing alt text");
    }

    #[tokio::test]
    async fn analyze_screenshot_falls_back_on_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let client = AssistClient::new("key".into()).with_api_url(server.uri());
        let analysis = client.analyze_screenshot("aGk=").await;
        assert_eq!(
            analysis,
            "Unable to analyze the screenshot. Please review manually."
        );
    }

    #[tokio::test]
    async fn generate_maps_unauthorized_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client = AssistClient::new("bad-key".into()).with_api_url(server.uri());
        let result = client.generate(GenerateRequest::from_text("hi")).await;
        assert!(matches!(result, Err(AssistError::Unauthorized)));
    }
}
