//! Vyro commercial image generation provider.

use crate::error::{ForgeError, Result};
use crate::image::provider::ImageProvider;
use crate::image::types::{
    GenerationOutcome, GenerationRequest, ImageProviderKind, ImageReference,
};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Instant;

const GENERATIONS_URL: &str = "https://api.vyro.ai/v2/image/generations";

/// Builder for [`VyroProvider`].
#[derive(Debug, Clone, Default)]
pub struct VyroProviderBuilder {
    api_key: Option<String>,
    endpoint: Option<String>,
}

impl VyroProviderBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key. Falls back to `VYRO_API_KEY` env var.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Overrides the generations endpoint URL.
    pub fn endpoint(mut self, url: impl Into<String>) -> Self {
        self.endpoint = Some(url.into());
        self
    }

    /// Builds the provider, resolving the API key.
    pub fn build(self) -> Result<VyroProvider> {
        let api_key = self
            .api_key
            .or_else(|| std::env::var("VYRO_API_KEY").ok())
            .ok_or_else(|| {
                ForgeError::Auth("VYRO_API_KEY not set and no API key provided".into())
            })?;

        Ok(VyroProvider {
            client: reqwest::Client::new(),
            api_key,
            endpoint: self.endpoint.unwrap_or_else(|| GENERATIONS_URL.to_string()),
        })
    }
}

/// Vyro image generation provider.
///
/// Sends one multipart form per request and accepts either a `url` field or
/// an inline base64 payload in the response.
pub struct VyroProvider {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
}

impl VyroProvider {
    /// Creates a new [`VyroProviderBuilder`].
    pub fn builder() -> VyroProviderBuilder {
        VyroProviderBuilder::new()
    }
}

#[async_trait]
impl ImageProvider for VyroProvider {
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationOutcome> {
        request.validate()?;
        let start = Instant::now();

        let form = reqwest::multipart::Form::new()
            .text("prompt", request.prompt.clone())
            .text("style", request.style.as_str())
            .text("aspect_ratio", request.aspect_ratio.as_str());

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ForgeError::Api {
                status: status.as_u16(),
                message: text,
            });
        }

        let body: VyroResponse = response.json().await?;
        let reference = body.into_reference()?;

        Ok(GenerationOutcome {
            reference,
            prompt: request.prompt.clone(),
            provider: ImageProviderKind::Vyro,
            duration_ms: Some(start.elapsed().as_millis() as u64),
        })
    }

    fn kind(&self) -> ImageProviderKind {
        ImageProviderKind::Vyro
    }
}

#[derive(Debug, Deserialize)]
struct VyroResponse {
    /// Remote URL of the generated image.
    #[serde(default)]
    url: Option<String>,
    /// Inline payload, either raw base64 or a data URL.
    #[serde(default)]
    image: Option<String>,
    /// Inline payload under the OpenAI-compatible field name.
    #[serde(default)]
    b64_json: Option<String>,
}

impl VyroResponse {
    fn into_reference(self) -> Result<ImageReference> {
        if let Some(url) = self.url {
            return Ok(ImageReference::Url(url));
        }
        if let Some(payload) = self.image.or(self.b64_json) {
            if payload.starts_with("data:") {
                return ImageReference::from_data_url(&payload);
            }
            return ImageReference::from_base64(&payload, "image/png");
        }
        Err(ForgeError::MissingImage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_with_explicit_key() {
        let provider = VyroProviderBuilder::new().api_key("vk-test").build();
        assert!(provider.is_ok());
    }

    #[test]
    fn test_response_with_url() {
        let json = r#"{"url": "https://example/img.png"}"#;
        let resp: VyroResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            resp.into_reference().unwrap(),
            ImageReference::Url("https://example/img.png".into())
        );
    }

    #[test]
    fn test_response_with_inline_payload() {
        let json = r#"{"image": "AQID"}"#;
        let resp: VyroResponse = serde_json::from_str(json).unwrap();
        let reference = resp.into_reference().unwrap();
        assert!(reference.is_inline());
        assert_eq!(reference.display_source(), "data:image/png;base64,AQID");
    }

    #[test]
    fn test_response_with_data_url_payload() {
        let json = r#"{"b64_json": "data:image/jpeg;base64,AQID"}"#;
        let resp: VyroResponse = serde_json::from_str(json).unwrap();
        let reference = resp.into_reference().unwrap();
        assert_eq!(reference.file_extension(), "jpg");
    }

    #[test]
    fn test_response_without_image_field() {
        let json = r#"{"status": "done"}"#;
        let resp: VyroResponse = serde_json::from_str(json).unwrap();
        assert!(matches!(
            resp.into_reference(),
            Err(ForgeError::MissingImage)
        ));
    }
}
