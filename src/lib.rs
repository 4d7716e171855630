#![warn(missing_docs)]
//! EduViz - character-consistent educational concept illustrations.
//!
//! Describe an educational character once, then generate illustrations of
//! educational concepts featuring that same character, and iteratively edit
//! them with natural-language instructions. Generation goes through the
//! Gemini image API; the character image is attached to every request as a
//! reference so the figure stays visually consistent.
//!
//! # Quick Start
//!
//! ```no_run
//! use eduviz::{GeminiClient, Session, Studio};
//!
//! #[tokio::main]
//! async fn main() -> eduviz::Result<()> {
//!     let studio = Studio::new(GeminiClient::builder().build()?);
//!     let mut session = Session::new();
//!
//!     studio
//!         .create_character(&mut session, "A curious student with glasses, blue shirt")
//!         .await?;
//!     let scene = studio
//!         .illustrate_concept(&mut session, "Photosynthesis process")
//!         .await?;
//!     scene.image.save("photosynthesis.png")?;
//!     Ok(())
//! }
//! ```
//!
//! # Design notes
//!
//! - All state lives in the caller-owned [`Session`]; operations are
//!   independent and perform at most one API call each.
//! - Failures are classified ([`EduVizError`]) and mapped to user-facing
//!   messages; nothing is retried automatically.
//! - Pre-shipped example images ([`fallback`]) cover quota exhaustion and
//!   outages.

mod error;
pub mod fallback;
pub mod image;
pub mod prompts;
mod session;
mod studio;

pub use error::{EduVizError, Result};
pub use image::{
    prepare_reference, GeminiClient, GeminiClientBuilder, GeminiModel, GeneratedImage,
    GenerationMetadata, GenerationRequest, ImageFormat, ImageProvider, PreparedReference,
};
pub use session::{CharacterOrigin, CharacterReference, ConceptScene, Session};
pub use studio::Studio;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{EduVizError, Result};
    pub use crate::image::{
        GeminiClient, GeneratedImage, GenerationRequest, ImageFormat, ImageProvider,
    };
    pub use crate::session::{CharacterReference, ConceptScene, Session};
    pub use crate::studio::Studio;
}
