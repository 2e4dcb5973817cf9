use super::{ContentPart, GenerativeModel, ModelError};
use crate::config::EstimatorConfig;
use crate::http::build_client;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

/// `generateContent` client. Built once per process and reused read-only.
pub struct GeminiClient {
    http: Option<Client>,
    api_key: Option<String>,
    endpoint: String,
}

impl GeminiClient {
    pub fn new(config: &EstimatorConfig) -> Self {
        let endpoint = format!("{}/{}:generateContent", config.api_base, config.model);
        let http = match &config.api_key {
            None => {
                warn!(
                    target = "estimator.model",
                    "no API key provided; set GEMINI_API_KEY to enable model estimates"
                );
                None
            }
            Some(_) => match build_client() {
                Ok(client) => {
                    info!(target = "estimator.model", model = %config.model, "gemini client initialized");
                    Some(client)
                }
                Err(err) => {
                    error!(target = "estimator.model", error = %err, "failed to initialize gemini client");
                    None
                }
            },
        };
        Self {
            http,
            api_key: config.api_key.clone(),
            endpoint,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl GenerativeModel for GeminiClient {
    fn available(&self) -> bool {
        self.http.is_some() && self.api_key.is_some()
    }

    async fn generate(&self, parts: &[ContentPart]) -> Result<String, ModelError> {
        let (Some(http), Some(api_key)) = (&self.http, &self.api_key) else {
            return Err(ModelError::Unavailable);
        };

        let body = GenerateRequest {
            contents: [RequestContent {
                role: "user",
                parts,
            }],
        };
        debug!(target = "estimator.model", parts = parts.len(), "sending generateContent");

        let response = http
            .post(&self.endpoint)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|err| ModelError::Http(err.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ModelError::Status {
                status: status.as_u16(),
                body: text.chars().take(200).collect(),
            });
        }

        let payload: GenerateResponse = response
            .json()
            .await
            .map_err(|err| ModelError::InvalidResponse(err.to_string()))?;

        payload.into_text()
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: [RequestContent<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'static str,
    parts: &'a [ContentPart],
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default, rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text parts of the first candidate.
    fn into_text(self) -> Result<String, ModelError> {
        let Some(candidate) = self.candidates.into_iter().next() else {
            return Err(ModelError::EmptyResponse("no candidates".into()));
        };
        let text: String = candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect()
            })
            .unwrap_or_default();
        if text.trim().is_empty() {
            return Err(ModelError::EmptyResponse(
                candidate.finish_reason.unwrap_or_else(|| "unknown".into()),
            ));
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_without_key_is_unavailable() {
        let client = GeminiClient::new(&EstimatorConfig::default());
        assert!(!client.available());
        assert!(client.endpoint().ends_with("models/gemini-2.5-flash:generateContent"));
    }

    #[tokio::test]
    async fn generate_without_key_makes_no_call() {
        let client = GeminiClient::new(&EstimatorConfig::default());
        let err = client
            .generate(&[ContentPart::text("hi")])
            .await
            .expect_err("should be unavailable");
        assert!(matches!(err, ModelError::Unavailable));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_http_error() {
        let config = EstimatorConfig {
            api_key: Some("test-key".into()),
            api_base: "http://127.0.0.1:9".into(),
            ..EstimatorConfig::default()
        };
        let client = GeminiClient::new(&config);
        assert!(client.available());
        let err = client
            .generate(&[ContentPart::text("hi")])
            .await
            .expect_err("nothing listens on port 9");
        assert!(matches!(err, ModelError::Http(_)));
    }

    #[test]
    fn response_text_joins_parts() {
        let payload: GenerateResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"{\"a\":"},{"text":"1}"}]},"finishReason":"STOP"}]}"#,
        )
        .unwrap();
        assert_eq!(payload.into_text().unwrap(), "{\"a\":1}");
    }

    #[test]
    fn blocked_response_is_empty() {
        let payload: GenerateResponse =
            serde_json::from_str(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#).unwrap();
        match payload.into_text() {
            Err(ModelError::EmptyResponse(reason)) => assert_eq!(reason, "SAFETY"),
            other => panic!("unexpected {other:?}"),
        }
        let payload: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert!(matches!(payload.into_text(), Err(ModelError::EmptyResponse(_))));
    }
}
