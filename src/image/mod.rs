//! Image generation module.

mod provider;
pub mod providers;
mod types;

pub use provider::ImageProvider;
pub use types::{
    AspectRatio, GenerationOutcome, GenerationRequest, ImageProviderKind, ImageReference,
    StylePreset,
};
