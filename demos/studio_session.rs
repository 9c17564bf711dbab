//! Full studio session: generate twice, then re-select the first entry.
//!
//! Run with: `cargo run --example studio_session`
//!
//! Requires `VYRO_API_KEY` environment variable.

use imageforge::{AspectRatio, Studio, StylePreset, VyroProvider};

#[tokio::main]
async fn main() -> imageforge::Result<()> {
    let provider = VyroProvider::builder().build()?;
    let mut studio = Studio::new();

    studio.form.prompt = "A red fox trotting through fresh snow".into();
    studio.form.style = StylePreset::Anime;
    studio.form.aspect_ratio = AspectRatio::Square;
    let first = studio.generate(&provider).await?.id.clone();

    studio.form.prompt = "A lighthouse in a storm".into();
    studio.form.style = StylePreset::OilPainting;
    studio.generate(&provider).await?;

    println!("history ({} entries):", studio.history().len());
    for entry in studio.history().entries() {
        println!("  [{}] {} ({})", entry.created_at, entry.prompt, entry.style);
    }

    // Selecting a past entry repopulates the form and display.
    studio.select_history(&first);
    println!("form now holds: {}", studio.form.prompt);

    Ok(())
}
