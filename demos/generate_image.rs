//! Basic image generation example.
//!
//! Run with: `cargo run --example generate_image`
//!
//! Requires `VYRO_API_KEY` environment variable.

use imageforge::{GenerationRequest, ImageProvider, StylePreset, VyroProvider};

#[tokio::main]
async fn main() -> imageforge::Result<()> {
    let provider = VyroProvider::builder().build()?;

    let request = GenerationRequest::new("A red fox trotting through fresh snow")
        .with_style(StylePreset::Realistic);
    let outcome = provider.generate(&request).await?;

    let client = reqwest::Client::new();
    let path = imageforge::studio::save_image(&client, &outcome.reference, ".").await?;
    println!("Saved {} (generated via {})", path.display(), outcome.provider);

    Ok(())
}
