//! Result display state machine.

use crate::error::ForgeError;
use crate::image::ImageReference;

/// What the result area is currently showing. Exactly one state holds at a
/// time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewState {
    /// Nothing generated yet, or the last attempt failed.
    #[default]
    Empty,
    /// A generation call is outstanding.
    Generating,
    /// A generated image is on screen.
    Ready(ImageReference),
}

/// Owner of the current result view.
#[derive(Debug, Clone, Default)]
pub struct ResultDisplay {
    state: ViewState,
}

impl ResultDisplay {
    /// Creates an empty display.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current view state.
    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// True while a generation call is outstanding.
    pub fn is_generating(&self) -> bool {
        matches!(self.state, ViewState::Generating)
    }

    /// The displayed image, if any.
    pub fn image(&self) -> Option<&ImageReference> {
        match &self.state {
            ViewState::Ready(reference) => Some(reference),
            _ => None,
        }
    }

    /// Enters the generating state, discarding any previous image.
    pub fn begin(&mut self) {
        self.state = ViewState::Generating;
    }

    /// Shows a freshly generated image.
    pub fn succeed(&mut self, reference: ImageReference) {
        self.state = ViewState::Ready(reference);
    }

    /// Returns to empty after a failed generation. No partial state remains.
    pub fn fail(&mut self) {
        self.state = ViewState::Empty;
    }

    /// Records that the current image failed to render.
    ///
    /// Non-fatal: the error is logged and handed back for notification, and
    /// the display (and therefore the history that produced it) is left
    /// untouched.
    pub fn mark_render_failed(&self, detail: impl Into<String>) -> ForgeError {
        let detail = detail.into();
        tracing::warn!(detail = %detail, "generated image failed to render");
        ForgeError::Display(detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> ImageReference {
        ImageReference::Url("https://example/img.png".into())
    }

    #[test]
    fn test_lifecycle_success() {
        let mut display = ResultDisplay::new();
        assert_eq!(display.state(), &ViewState::Empty);

        display.begin();
        assert!(display.is_generating());
        assert!(display.image().is_none());

        display.succeed(reference());
        assert_eq!(display.image(), Some(&reference()));
    }

    #[test]
    fn test_lifecycle_failure_returns_to_empty() {
        let mut display = ResultDisplay::new();
        display.begin();
        display.fail();
        assert_eq!(display.state(), &ViewState::Empty);
    }

    #[test]
    fn test_render_failure_keeps_state() {
        let mut display = ResultDisplay::new();
        display.succeed(reference());

        let err = display.mark_render_failed("decode error");
        assert!(matches!(err, ForgeError::Display(_)));
        assert_eq!(display.image(), Some(&reference()));
    }
}
