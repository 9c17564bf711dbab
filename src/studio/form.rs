//! Prompt form state.

use crate::error::Result;
use crate::image::{AspectRatio, GenerationRequest, StylePreset};
use crate::studio::history::HistoryEntry;

/// The prompt, style, and aspect-ratio selections backing the generate form.
#[derive(Debug, Clone, Default)]
pub struct GenerationForm {
    /// Free-text prompt.
    pub prompt: String,
    /// Selected style preset.
    pub style: StylePreset,
    /// Selected aspect ratio.
    pub aspect_ratio: AspectRatio,
    generating: bool,
}

impl GenerationForm {
    /// Creates an empty form with default selections.
    pub fn new() -> Self {
        Self::default()
    }

    /// True when the form may be submitted: a non-blank prompt and no
    /// generation currently outstanding.
    pub fn can_submit(&self) -> bool {
        !self.prompt.trim().is_empty() && !self.generating
    }

    /// True while a generation call is outstanding.
    pub fn is_generating(&self) -> bool {
        self.generating
    }

    /// Builds a validated request from the current selections.
    pub fn request(&self) -> Result<GenerationRequest> {
        let request = GenerationRequest::new(self.prompt.clone())
            .with_style(self.style)
            .with_aspect_ratio(self.aspect_ratio);
        request.validate()?;
        Ok(request)
    }

    /// Repopulates the form from a past generation.
    pub fn adopt(&mut self, entry: &HistoryEntry) {
        self.prompt = entry.prompt.clone();
        self.style = entry.style;
        self.aspect_ratio = entry.aspect_ratio;
    }

    pub(crate) fn set_generating(&mut self, generating: bool) {
        self.generating = generating;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::ImageReference;
    use chrono::Utc;

    #[test]
    fn test_can_submit_requires_nonblank_prompt() {
        let mut form = GenerationForm::new();
        assert!(!form.can_submit());

        form.prompt = "   ".into();
        assert!(!form.can_submit());

        form.prompt = "a red fox in snow".into();
        assert!(form.can_submit());
    }

    #[test]
    fn test_can_submit_blocked_while_generating() {
        let mut form = GenerationForm::new();
        form.prompt = "a red fox in snow".into();
        form.set_generating(true);
        assert!(!form.can_submit());

        form.set_generating(false);
        assert!(form.can_submit());
    }

    #[test]
    fn test_adopt_restores_selections() {
        let entry = HistoryEntry {
            id: "0-0".into(),
            prompt: "a red fox in snow".into(),
            style: StylePreset::Anime,
            aspect_ratio: AspectRatio::Portrait,
            reference: ImageReference::Url("https://example/img.png".into()),
            created_at: Utc::now(),
        };

        let mut form = GenerationForm::new();
        form.adopt(&entry);
        assert_eq!(form.prompt, "a red fox in snow");
        assert_eq!(form.style, StylePreset::Anime);
        assert_eq!(form.aspect_ratio, AspectRatio::Portrait);
    }
}
