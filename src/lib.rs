#![warn(missing_docs)]
//! ImageForge - prompt-to-image generation with auth gating and history.
//!
//! This crate implements the full lifecycle of a text-to-image front end:
//! a validated prompt form, a provider call, a result display, a bounded
//! most-recent-first history, and email/password auth against a hosted
//! identity provider.
//!
//! # Quick Start - Generation
//!
//! ```no_run
//! use imageforge::{GenerationRequest, ImageProvider, StylePreset, VyroProvider};
//!
//! #[tokio::main]
//! async fn main() -> imageforge::Result<()> {
//!     let provider = VyroProvider::builder().build()?;
//!     let request = GenerationRequest::new("A red fox in snow")
//!         .with_style(StylePreset::Anime);
//!     let outcome = provider.generate(&request).await?;
//!     println!("{}", outcome.reference.display_source());
//!     Ok(())
//! }
//! ```
//!
//! # Quick Start - Studio Session
//!
//! ```no_run
//! use imageforge::{Studio, VyroProvider};
//!
//! #[tokio::main]
//! async fn main() -> imageforge::Result<()> {
//!     let provider = VyroProvider::builder().build()?;
//!     let mut studio = Studio::new();
//!     studio.form.prompt = "A red fox in snow".into();
//!     let entry = studio.generate(&provider).await?;
//!     println!("recorded generation {}", entry.id);
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - `server`: the HTTP relay service ([`relay`])
//! - `cli`: the `imageforge` command-line binary

pub mod auth;
mod error;
pub mod image;
pub mod studio;

#[cfg(feature = "server")]
pub mod relay;

// Re-export error types at crate root
pub use error::{ForgeError, Result};

// Re-export commonly used types
pub use auth::{AuthClient, CredentialsForm, IdentityProvider, Session, SessionStore};
pub use image::{
    AspectRatio, GenerationOutcome, GenerationRequest, ImageProvider, ImageProviderKind,
    ImageReference, StylePreset,
};
pub use image::providers::{RelayProvider, VyroProvider};
pub use studio::{HistoryCache, HistoryEntry, ResultDisplay, Studio, ViewState};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::auth::{AuthClient, CredentialsForm, IdentityProvider, SessionStore};
    pub use crate::error::{ForgeError, Result};
    pub use crate::image::providers::{RelayProvider, VyroProvider};
    pub use crate::image::{
        AspectRatio, GenerationRequest, ImageProvider, ImageReference, StylePreset,
    };
    pub use crate::studio::{Studio, ViewState};
}
