//! Core types for image generation.

use crate::error::{ForgeError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Style presets biasing the generated image.
///
/// A closed set: the wire format is the snake_case tag and unknown tags are
/// rejected at the parse boundary rather than passed through as free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StylePreset {
    /// Photorealistic output.
    #[default]
    Realistic,
    /// Anime / manga style.
    Anime,
    /// Neon-lit futuristic style.
    Cyberpunk,
    /// Fantasy art.
    Fantasy,
    /// Abstract art.
    Abstract,
    /// Oil painting.
    OilPainting,
    /// Watercolor.
    Watercolor,
    /// Pencil sketch.
    Sketch,
    /// Generic artistic rendering.
    Artistic,
}

impl StylePreset {
    /// All presets, in the order a picker would offer them.
    pub const ALL: [StylePreset; 9] = [
        Self::Realistic,
        Self::Anime,
        Self::Cyberpunk,
        Self::Fantasy,
        Self::Abstract,
        Self::OilPainting,
        Self::Watercolor,
        Self::Sketch,
        Self::Artistic,
    ];

    /// Returns the wire tag for this preset (e.g., "oil_painting").
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Realistic => "realistic",
            Self::Anime => "anime",
            Self::Cyberpunk => "cyberpunk",
            Self::Fantasy => "fantasy",
            Self::Abstract => "abstract",
            Self::OilPainting => "oil_painting",
            Self::Watercolor => "watercolor",
            Self::Sketch => "sketch",
            Self::Artistic => "artistic",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Realistic => "Realistic",
            Self::Anime => "Anime",
            Self::Cyberpunk => "Cyberpunk",
            Self::Fantasy => "Fantasy",
            Self::Abstract => "Abstract",
            Self::OilPainting => "Oil Painting",
            Self::Watercolor => "Watercolor",
            Self::Sketch => "Sketch",
            Self::Artistic => "Artistic",
        }
    }

    /// Prepends style-specific descriptive text to a prompt.
    ///
    /// Purely a phrasing bias; presets without a known prefix return the
    /// prompt unchanged.
    pub fn apply(&self, prompt: &str) -> String {
        match self {
            Self::Realistic => format!("photorealistic, high quality, detailed, {prompt}"),
            Self::Artistic => format!("artistic, creative, beautiful, {prompt}"),
            Self::Anime => format!("anime style, manga, Japanese art, {prompt}"),
            Self::Cyberpunk => format!("cyberpunk, neon lights, futuristic, sci-fi, {prompt}"),
            Self::Fantasy => format!("fantasy art, magical, mystical, {prompt}"),
            Self::Abstract => format!("abstract art, artistic, creative, {prompt}"),
            Self::OilPainting | Self::Watercolor | Self::Sketch => prompt.to_string(),
        }
    }
}

impl std::fmt::Display for StylePreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StylePreset {
    type Err = ForgeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|preset| preset.as_str() == s)
            .ok_or_else(|| ForgeError::Validation(format!("unknown style: {s}")))
    }
}

/// Supported aspect ratios.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AspectRatio {
    /// 1:1 square.
    #[default]
    #[serde(rename = "1:1")]
    Square,
    /// 16:9 widescreen landscape.
    #[serde(rename = "16:9")]
    Landscape,
    /// 9:16 tall portrait.
    #[serde(rename = "9:16")]
    Portrait,
    /// 4:3 classic.
    #[serde(rename = "4:3")]
    Classic,
    /// 3:2 photo.
    #[serde(rename = "3:2")]
    Photo,
}

impl AspectRatio {
    /// All ratios, in the order a picker would offer them.
    pub const ALL: [AspectRatio; 5] = [
        Self::Square,
        Self::Landscape,
        Self::Portrait,
        Self::Classic,
        Self::Photo,
    ];

    /// Returns the ratio as a string (e.g., "16:9").
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Square => "1:1",
            Self::Landscape => "16:9",
            Self::Portrait => "9:16",
            Self::Classic => "4:3",
            Self::Photo => "3:2",
        }
    }
}

impl std::fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AspectRatio {
    type Err = ForgeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|ratio| ratio.as_str() == s)
            .ok_or_else(|| ForgeError::Validation(format!("unknown aspect ratio: {s}")))
    }
}

/// A request to generate an image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// The text prompt describing the desired image.
    pub prompt: String,
    /// Style preset biasing the output.
    pub style: StylePreset,
    /// Aspect ratio of the output.
    pub aspect_ratio: AspectRatio,
}

impl GenerationRequest {
    /// Creates a new request with the given prompt and default style/ratio.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            style: StylePreset::default(),
            aspect_ratio: AspectRatio::default(),
        }
    }

    /// Sets the style preset.
    pub fn with_style(mut self, style: StylePreset) -> Self {
        self.style = style;
        self
    }

    /// Sets the aspect ratio.
    pub fn with_aspect_ratio(mut self, ratio: AspectRatio) -> Self {
        self.aspect_ratio = ratio;
        self
    }

    /// Rejects empty and whitespace-only prompts.
    ///
    /// Providers call this before building any outbound request.
    pub fn validate(&self) -> Result<()> {
        if self.prompt.trim().is_empty() {
            return Err(ForgeError::Validation("Please enter a prompt".into()));
        }
        Ok(())
    }
}

/// Canonical in-memory form of a generated image, regardless of whether the
/// endpoint answered with a remote URL or an inline payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageReference {
    /// Remote image addressed by URL.
    Url(String),
    /// Inline image payload.
    Inline {
        /// Raw image bytes.
        data: Vec<u8>,
        /// MIME type of the payload (e.g., "image/png").
        mime_type: String,
    },
}

impl ImageReference {
    /// Decodes a base64 payload into an inline reference.
    pub fn from_base64(b64: &str, mime_type: impl Into<String>) -> Result<Self> {
        use base64::Engine;
        let data = base64::engine::general_purpose::STANDARD
            .decode(b64.trim())
            .map_err(|e| ForgeError::Decode(e.to_string()))?;
        Ok(Self::Inline {
            data,
            mime_type: mime_type.into(),
        })
    }

    /// Parses a `data:<mime>;base64,<payload>` URL into an inline reference.
    pub fn from_data_url(url: &str) -> Result<Self> {
        let rest = url
            .strip_prefix("data:")
            .ok_or_else(|| ForgeError::Decode("not a data URL".into()))?;
        let (mime_type, b64) = rest
            .split_once(";base64,")
            .ok_or_else(|| ForgeError::Decode("data URL is not base64-encoded".into()))?;
        Self::from_base64(b64, mime_type)
    }

    /// Returns a string usable directly as a display source: the URL verbatim
    /// for remote references, a `data:` URL for inline ones.
    pub fn display_source(&self) -> String {
        match self {
            Self::Url(url) => url.clone(),
            Self::Inline { data, mime_type } => {
                use base64::Engine;
                format!(
                    "data:{mime_type};base64,{}",
                    base64::engine::general_purpose::STANDARD.encode(data)
                )
            }
        }
    }

    /// File extension matching the reference's content.
    ///
    /// Remote references always save as `png` (the endpoints serve PNG);
    /// inline ones derive the extension from the MIME type.
    pub fn file_extension(&self) -> &str {
        match self {
            Self::Url(_) => "png",
            Self::Inline { mime_type, .. } => match mime_type.as_str() {
                "image/jpeg" => "jpg",
                "image/webp" => "webp",
                _ => "png",
            },
        }
    }

    /// Returns true for inline references.
    pub fn is_inline(&self) -> bool {
        matches!(self, Self::Inline { .. })
    }
}

/// Image provider kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageProviderKind {
    /// Vyro commercial image API.
    Vyro,
    /// Self-hosted inference relay.
    Relay,
}

impl std::fmt::Display for ImageProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Vyro => write!(f, "vyro"),
            Self::Relay => write!(f, "relay"),
        }
    }
}

/// The result of one successful generation.
#[derive(Debug, Clone)]
#[must_use = "generation outcome should be displayed or recorded"]
pub struct GenerationOutcome {
    /// Where the generated image lives.
    pub reference: ImageReference,
    /// The prompt actually sent to the endpoint, after any style phrasing.
    pub prompt: String,
    /// Provider that produced this image.
    pub provider: ImageProviderKind,
    /// Round-trip duration in milliseconds.
    pub duration_ms: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_round_trip() {
        for preset in StylePreset::ALL {
            assert_eq!(preset.as_str().parse::<StylePreset>().unwrap(), preset);
        }
        assert!("vaporwave".parse::<StylePreset>().is_err());
    }

    #[test]
    fn test_style_apply() {
        assert_eq!(
            StylePreset::Anime.apply("a red fox"),
            "anime style, manga, Japanese art, a red fox"
        );
        // Presets without a phrasing bias pass the prompt through.
        assert_eq!(StylePreset::Sketch.apply("a red fox"), "a red fox");
    }

    #[test]
    fn test_aspect_ratio_as_str() {
        assert_eq!(AspectRatio::Square.as_str(), "1:1");
        assert_eq!(AspectRatio::Photo.as_str(), "3:2");
        assert_eq!("9:16".parse::<AspectRatio>().unwrap(), AspectRatio::Portrait);
        assert!("21:9".parse::<AspectRatio>().is_err());
    }

    #[test]
    fn test_serde_wire_tags() {
        let json = serde_json::to_string(&StylePreset::OilPainting).unwrap();
        assert_eq!(json, "\"oil_painting\"");
        let json = serde_json::to_string(&AspectRatio::Landscape).unwrap();
        assert_eq!(json, "\"16:9\"");
    }

    #[test]
    fn test_request_validate() {
        assert!(GenerationRequest::new("a red fox in snow").validate().is_ok());
        assert!(GenerationRequest::new("").validate().is_err());
        assert!(GenerationRequest::new("   \t\n").validate().is_err());
    }

    #[test]
    fn test_reference_from_data_url() {
        let reference = ImageReference::from_data_url("data:image/png;base64,AQID").unwrap();
        match &reference {
            ImageReference::Inline { data, mime_type } => {
                assert_eq!(data, &vec![1, 2, 3]);
                assert_eq!(mime_type, "image/png");
            }
            ImageReference::Url(_) => panic!("expected inline reference"),
        }
        assert!(ImageReference::from_data_url("https://example/img.png").is_err());
    }

    #[test]
    fn test_display_source_round_trip() {
        let url = ImageReference::Url("https://example/img.png".into());
        assert_eq!(url.display_source(), "https://example/img.png");

        let inline = ImageReference::from_base64("AQID", "image/png").unwrap();
        let source = inline.display_source();
        assert_eq!(source, "data:image/png;base64,AQID");
        // Normalization is transparent: the data URL parses back to the same
        // reference.
        assert_eq!(ImageReference::from_data_url(&source).unwrap(), inline);
    }

    #[test]
    fn test_file_extension() {
        assert_eq!(ImageReference::Url("https://x/y".into()).file_extension(), "png");
        let jpeg = ImageReference::from_base64("AQID", "image/jpeg").unwrap();
        assert_eq!(jpeg.file_extension(), "jpg");
    }
}
