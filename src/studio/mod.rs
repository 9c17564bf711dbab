//! The generation studio: form, result display, and history wired into the
//! submit lifecycle.

mod display;
mod download;
mod form;
mod history;

pub use display::{ResultDisplay, ViewState};
pub use download::save_image;
pub use form::GenerationForm;
pub use history::{HistoryCache, HistoryEntry, HISTORY_CAP};

use crate::error::{ForgeError, Result};
use crate::image::ImageProvider;

/// One user's generation session.
///
/// Everything runs on the task that calls [`generate`](Self::generate): the
/// only suspension point is the provider call itself, resubmission is
/// blocked while one is outstanding, and history is touched only from the
/// success path, so no synchronization is needed. Dropping the studio
/// mid-call simply discards the in-flight response.
#[derive(Default)]
pub struct Studio {
    /// The prompt form.
    pub form: GenerationForm,
    display: ResultDisplay,
    history: HistoryCache,
}

impl Studio {
    /// Creates a studio with an empty form, display, and history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current result view.
    pub fn display(&self) -> &ResultDisplay {
        &self.display
    }

    /// Past generations, newest first.
    pub fn history(&self) -> &HistoryCache {
        &self.history
    }

    /// Submits the form against `provider`.
    ///
    /// On success the image is shown and recorded at the front of the
    /// history. On failure the display returns to empty, nothing is
    /// recorded, and the form is immediately resubmittable.
    pub async fn generate(&mut self, provider: &dyn ImageProvider) -> Result<&HistoryEntry> {
        if self.form.is_generating() {
            return Err(ForgeError::Validation(
                "A generation is already in progress".into(),
            ));
        }
        let request = self.form.request()?;

        self.form.set_generating(true);
        self.display.begin();

        let result = provider.generate(&request).await;
        self.form.set_generating(false);

        match result {
            Ok(outcome) => {
                self.display.succeed(outcome.reference.clone());
                Ok(self.history.append(&request, outcome.reference))
            }
            Err(err) => {
                self.display.fail();
                Err(err)
            }
        }
    }

    /// Re-selects a past generation: the form and display adopt the entry's
    /// prompt, selections, and image. The cache itself is left untouched.
    pub fn select_history(&mut self, id: &str) -> bool {
        let Some(entry) = self.history.select(id).cloned() else {
            return false;
        };
        self.form.adopt(&entry);
        self.display.succeed(entry.reference);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::{
        AspectRatio, GenerationOutcome, GenerationRequest, ImageProviderKind, ImageReference,
        StylePreset,
    };
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Provider double that counts calls and answers from a script.
    struct ScriptedProvider {
        calls: AtomicUsize,
        response: fn() -> Result<ImageReference>,
    }

    impl ScriptedProvider {
        fn succeeding_with(response: fn() -> Result<ImageReference>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                response,
            }
        }

        fn url() -> Self {
            Self::succeeding_with(|| Ok(ImageReference::Url("https://example/img.png".into())))
        }

        fn server_error() -> Self {
            Self::succeeding_with(|| {
                Err(ForgeError::Api {
                    status: 500,
                    message: "upstream failure".into(),
                })
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ImageProvider for ScriptedProvider {
        async fn generate(&self, request: &GenerationRequest) -> Result<GenerationOutcome> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(GenerationOutcome {
                reference: (self.response)()?,
                prompt: request.prompt.clone(),
                provider: ImageProviderKind::Vyro,
                duration_ms: None,
            })
        }

        fn kind(&self) -> ImageProviderKind {
            ImageProviderKind::Vyro
        }
    }

    fn studio_with_prompt(prompt: &str) -> Studio {
        let mut studio = Studio::new();
        studio.form.prompt = prompt.into();
        studio.form.style = StylePreset::Anime;
        studio.form.aspect_ratio = AspectRatio::Square;
        studio
    }

    #[tokio::test]
    async fn test_blank_prompt_never_reaches_provider() {
        let provider = ScriptedProvider::url();

        for prompt in ["", "   ", "\t\n"] {
            let mut studio = studio_with_prompt(prompt);
            let err = studio.generate(&provider).await.unwrap_err();
            assert!(err.is_validation());
            assert_eq!(studio.display().state(), &ViewState::Empty);
        }
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_success_records_history_and_shows_image() {
        let provider = ScriptedProvider::url();
        let mut studio = studio_with_prompt("a red fox in snow");

        let entry = studio.generate(&provider).await.unwrap();
        assert_eq!(entry.prompt, "a red fox in snow");
        assert_eq!(entry.style, StylePreset::Anime);

        assert_eq!(provider.calls(), 1);
        assert_eq!(
            studio.display().image().unwrap().display_source(),
            "https://example/img.png"
        );
        assert_eq!(studio.history().len(), 1);
        // The lock on resubmission is released.
        assert!(studio.form.can_submit());
    }

    #[tokio::test]
    async fn test_inline_payload_renders_like_url() {
        let provider = ScriptedProvider::succeeding_with(|| {
            ImageReference::from_base64("AQID", "image/png")
        });
        let mut studio = studio_with_prompt("a red fox in snow");

        studio.generate(&provider).await.unwrap();
        assert_eq!(
            studio.display().image().unwrap().display_source(),
            "data:image/png;base64,AQID"
        );
    }

    #[tokio::test]
    async fn test_server_error_returns_display_to_empty() {
        let provider = ScriptedProvider::server_error();
        let mut studio = studio_with_prompt("a red fox in snow");

        let err = studio.generate(&provider).await.unwrap_err();
        assert!(err.is_generation_failure());
        assert_eq!(studio.display().state(), &ViewState::Empty);
        assert!(studio.history().is_empty());
        // No partial state: the user may resubmit immediately.
        assert!(studio.form.can_submit());
    }

    #[tokio::test]
    async fn test_history_never_exceeds_cap() {
        let provider = ScriptedProvider::url();
        let mut studio = studio_with_prompt("a red fox in snow");

        for _ in 0..HISTORY_CAP + 5 {
            studio.generate(&provider).await.unwrap();
        }
        assert_eq!(studio.history().len(), HISTORY_CAP);
    }

    #[tokio::test]
    async fn test_select_history_repopulates_form_and_display() {
        let provider = ScriptedProvider::url();
        let mut studio = studio_with_prompt("a red fox in snow");
        let id = studio.generate(&provider).await.unwrap().id.clone();

        studio.form.prompt = "something else".into();
        studio.form.style = StylePreset::Sketch;
        studio.display.fail();

        assert!(studio.select_history(&id));
        assert_eq!(studio.form.prompt, "a red fox in snow");
        assert_eq!(studio.form.style, StylePreset::Anime);
        assert_eq!(studio.form.aspect_ratio, AspectRatio::Square);
        assert_eq!(
            studio.display().image().unwrap().display_source(),
            "https://example/img.png"
        );

        assert!(!studio.select_history("missing"));
    }
}
