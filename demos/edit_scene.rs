//! Scene editing example - applies natural-language edits to a previously
//! generated concept scene.
//!
//! Run with: `cargo run --example edit_scene -- <scene.png>`
//!
//! Requires `GOOGLE_API_KEY` environment variable.

use eduviz::{
    ConceptScene, GeminiClient, GeneratedImage, GenerationMetadata, ImageFormat, Session, Studio,
};

#[tokio::main]
async fn main() -> eduviz::Result<()> {
    let scene_path = std::env::args()
        .nth(1)
        .expect("Usage: edit_scene <scene.png>");

    let bytes = std::fs::read(&scene_path)?;
    let format = ImageFormat::from_magic_bytes(&bytes).unwrap_or_default();

    let studio = Studio::new(GeminiClient::builder().build()?);
    let mut session = Session::new();
    session.put_scene(ConceptScene {
        concept: "Photosynthesis process".into(),
        image: GeneratedImage::new(bytes, format, "", GenerationMetadata::default()),
        edit_of: None,
    });

    let edited = studio
        .edit_scene(
            &mut session,
            "Photosynthesis process",
            "Add a label pointing to the sun and make the plant larger",
        )
        .await?;
    edited.image.save("edited.png")?;
    println!("Edited scene saved to edited.png ({} bytes)", edited.image.size());

    Ok(())
}
