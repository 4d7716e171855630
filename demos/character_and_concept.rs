//! End-to-end example - generates a base character, then a concept scene
//! featuring that same character.
//!
//! Run with: `cargo run --example character_and_concept`
//!
//! Requires `GOOGLE_API_KEY` environment variable.

use eduviz::{GeminiClient, Session, Studio};

#[tokio::main]
async fn main() -> eduviz::Result<()> {
    let studio = Studio::new(GeminiClient::builder().build()?);
    let mut session = Session::new();

    let character = studio
        .create_character(
            &mut session,
            "A curious 10-year-old student with glasses, wearing blue t-shirt, brown hair",
        )
        .await?;
    std::fs::write("character.png", &character.data)?;
    println!("Base character saved to character.png");

    let scene = studio
        .illustrate_concept(&mut session, "Photosynthesis process")
        .await?;
    scene.image.save("photosynthesis.png")?;
    println!(
        "Concept scene saved to photosynthesis.png ({} bytes, {} API calls)",
        scene.image.size(),
        session.api_calls
    );

    Ok(())
}
