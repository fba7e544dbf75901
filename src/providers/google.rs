use std::time::Duration;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use url::Url;
use log::{debug, error};

use crate::errors::{ProviderError, TranslationError};
use crate::providers::Translator;

/// Client for the public Google translate endpoint (`client=gtx`)
#[derive(Debug, Clone)]
pub struct GoogleTranslator {
    /// HTTP client for API requests
    client: Client,
    /// Base endpoint, e.g. `https://translate.googleapis.com`
    endpoint: String,
}

impl GoogleTranslator {
    /// Create a new client
    pub fn new(endpoint: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            endpoint: endpoint.into(),
        }
    }

    /// Build the request URL for one text
    pub fn request_url(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<Url, ProviderError> {
        let base = format!("{}/translate_a/single", self.endpoint.trim_end_matches('/'));
        Url::parse_with_params(
            &base,
            &[
                ("client", "gtx"),
                ("sl", source_language),
                ("tl", target_language),
                ("dt", "t"),
                ("q", text),
            ],
        )
        .map_err(|e| ProviderError::RequestFailed(format!("Invalid endpoint '{}': {}", base, e)))
    }

    /// Extract the translation from a response body.
    ///
    /// The body is a nested array; the first element holds one
    /// `[translated, original, ...]` entry per sentence, and the translated
    /// parts are concatenated in order.
    pub fn extract_text(body: &Value) -> Result<String, ProviderError> {
        let segments = body
            .get(0)
            .and_then(Value::as_array)
            .ok_or_else(|| ProviderError::ParseError("missing sentence array".to_string()))?;

        Ok(segments
            .iter()
            .filter_map(|segment| segment.get(0).and_then(Value::as_str))
            .collect())
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, TranslationError> {
        let url = self.request_url(text, source_language, target_language)?;
        debug!("Translating {} chars ({} -> {})", text.len(), source_language, target_language);

        let response = self.client.get(url).send().await.map_err(ProviderError::from)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Translate API error ({}): {}", status, error_text);
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message: error_text,
            }
            .into());
        }

        let body: Value = response.json().await.map_err(ProviderError::from)?;
        let translated = Self::extract_text(&body)?;
        if translated.trim().is_empty() && !text.trim().is_empty() {
            return Err(TranslationError::Empty(text.to_string()));
        }

        Ok(translated)
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        self.translate("Hello", "en", "fr")
            .await
            .map(|_| ())
            .map_err(|e| match e {
                TranslationError::Provider(provider) => provider,
                other => ProviderError::ParseError(other.to_string()),
            })
    }
}
