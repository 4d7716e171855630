//! Pre-generated example images shipped with the application.
//!
//! Used by the presentation layer when the API is unavailable or the quota is
//! exhausted: a failed concept generation can fall back to the closest
//! pre-shipped scene so the user still sees something.

use crate::error::EduVizError;
use crate::image::ImageFormat;

/// A pre-generated example scene embedded in the binary.
#[derive(Debug, Clone, Copy)]
pub struct ExampleScene {
    /// The concept this example illustrates.
    pub concept: &'static str,
    /// PNG image bytes.
    pub data: &'static [u8],
}

impl ExampleScene {
    /// The format of the embedded bytes.
    pub fn format(&self) -> ImageFormat {
        ImageFormat::Png
    }
}

/// An example base character, for sessions that cannot generate one.
pub const EXAMPLE_CHARACTER: &[u8] = include_bytes!("../assets/examples/base_character.png");

/// The shipped example scenes, one per preset concept.
pub const EXAMPLE_SCENES: [ExampleScene; 5] = [
    ExampleScene {
        concept: "Photosynthesis process",
        data: include_bytes!("../assets/examples/photosynthesis.png"),
    },
    ExampleScene {
        concept: "Ancient Roman marketplace",
        data: include_bytes!("../assets/examples/roman_marketplace.png"),
    },
    ExampleScene {
        concept: "Water cycle diagram",
        data: include_bytes!("../assets/examples/water_cycle.png"),
    },
    ExampleScene {
        concept: "Newton's laws of motion",
        data: include_bytes!("../assets/examples/newtons_laws.png"),
    },
    ExampleScene {
        concept: "Human digestive system",
        data: include_bytes!("../assets/examples/digestive_system.png"),
    },
];

/// Returns the pre-shipped example closest to the requested concept.
///
/// Matching is by shared keyword (case-insensitive); unknown concepts get the
/// first shipped example so the fallback never comes up empty.
pub fn example_for(concept: &str) -> &'static ExampleScene {
    let wanted = concept.to_lowercase();
    EXAMPLE_SCENES
        .iter()
        .find(|example| {
            example
                .concept
                .to_lowercase()
                .split_whitespace()
                .any(|word| word.len() > 3 && wanted.contains(word))
        })
        .unwrap_or(&EXAMPLE_SCENES[0])
}

/// Decides whether a failed generation should fall back to a pre-shipped
/// example scene.
///
/// Only quota exhaustion and transient failures qualify; terminal errors
/// (rejected key, blocked content, bad input) must surface to the user so
/// they can act on them.
pub fn fallback_scene(err: &EduVizError, concept: &str) -> Option<&'static ExampleScene> {
    if err.is_retryable() {
        Some(example_for(concept))
    } else {
        None
    }
}
