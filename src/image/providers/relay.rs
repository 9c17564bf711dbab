//! Provider backed by the inference relay service.

use crate::error::{ForgeError, Result};
use crate::image::provider::ImageProvider;
use crate::image::types::{
    GenerationOutcome, GenerationRequest, ImageProviderKind, ImageReference,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Builder for [`RelayProvider`].
#[derive(Debug, Clone, Default)]
pub struct RelayProviderBuilder {
    url: Option<String>,
}

impl RelayProviderBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the relay's generate endpoint. Falls back to `RELAY_URL` env var.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Builds the provider, resolving the endpoint URL.
    pub fn build(self) -> Result<RelayProvider> {
        let url = self
            .url
            .or_else(|| std::env::var("RELAY_URL").ok())
            .ok_or_else(|| {
                ForgeError::Validation("RELAY_URL not set and no relay URL provided".into())
            })?;

        Ok(RelayProvider {
            client: reqwest::Client::new(),
            url,
        })
    }
}

/// Provider that forwards generation through an inference relay.
///
/// The relay answers `{image, prompt}` where `image` is a base64 data URL
/// and `prompt` echoes the style-enhanced phrasing it actually used.
pub struct RelayProvider {
    client: reqwest::Client,
    url: String,
}

impl RelayProvider {
    /// Creates a new [`RelayProviderBuilder`].
    pub fn builder() -> RelayProviderBuilder {
        RelayProviderBuilder::new()
    }
}

#[async_trait]
impl ImageProvider for RelayProvider {
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationOutcome> {
        request.validate()?;
        let start = Instant::now();

        let body = RelayRequest {
            prompt: &request.prompt,
            style: request.style.as_str(),
            aspect_ratio: request.aspect_ratio.as_str(),
        };

        let response = self.client.post(&self.url).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ForgeError::Api {
                status: status.as_u16(),
                message: text,
            });
        }

        let body: RelayResponse = response.json().await?;
        let image = body.image.ok_or(ForgeError::MissingImage)?;
        let reference = if image.starts_with("data:") {
            ImageReference::from_data_url(&image)?
        } else {
            ImageReference::Url(image)
        };

        Ok(GenerationOutcome {
            reference,
            prompt: body.prompt.unwrap_or_else(|| request.prompt.clone()),
            provider: ImageProviderKind::Relay,
            duration_ms: Some(start.elapsed().as_millis() as u64),
        })
    }

    fn kind(&self) -> ImageProviderKind {
        ImageProviderKind::Relay
    }
}

#[derive(Debug, Serialize)]
struct RelayRequest<'a> {
    prompt: &'a str,
    style: &'a str,
    aspect_ratio: &'a str,
}

#[derive(Debug, Deserialize)]
struct RelayResponse {
    #[serde(default)]
    image: Option<String>,
    /// The enhanced prompt the relay forwarded upstream.
    #[serde(default)]
    prompt: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_requires_url() {
        // Force-miss the env fallback.
        std::env::remove_var("RELAY_URL");
        assert!(RelayProviderBuilder::new().build().is_err());
        assert!(RelayProviderBuilder::new()
            .url("http://localhost:8787/generate")
            .build()
            .is_ok());
    }

    #[test]
    fn test_request_serialization() {
        let request = GenerationRequest::new("a red fox in snow")
            .with_style(crate::image::StylePreset::Anime)
            .with_aspect_ratio(crate::image::AspectRatio::Square);
        let body = RelayRequest {
            prompt: &request.prompt,
            style: request.style.as_str(),
            aspect_ratio: request.aspect_ratio.as_str(),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["prompt"], "a red fox in snow");
        assert_eq!(json["style"], "anime");
        assert_eq!(json["aspect_ratio"], "1:1");
    }

    #[test]
    fn test_response_deserialization() {
        let json = r#"{"image": "data:image/png;base64,AQID", "prompt": "anime style, a fox"}"#;
        let resp: RelayResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.prompt.as_deref(), Some("anime style, a fox"));
        assert!(resp.image.unwrap().starts_with("data:"));
    }
}
