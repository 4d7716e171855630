//! Explicit session state: the character reference and the scene gallery.
//!
//! The original workflow kept these in ambient UI state; here the caller owns
//! a [`Session`] and passes it into each operation. Nothing in this crate
//! holds state between calls.

use crate::error::Result;
use crate::image::{prepare_reference, GeneratedImage, ImageFormat};

/// How the session's character reference came to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharacterOrigin {
    /// Generated from a text description.
    Generated,
    /// Uploaded by the user and normalized.
    Uploaded,
}

/// The conditioning image used to keep the generated figure visually
/// consistent across requests.
#[derive(Debug, Clone)]
pub struct CharacterReference {
    /// Raw image bytes.
    pub data: Vec<u8>,
    /// Image format of the bytes.
    pub format: ImageFormat,
    /// The description the character was created from.
    pub description: String,
    /// Whether the image was generated or uploaded.
    pub origin: CharacterOrigin,
}

/// One generated concept illustration, possibly an edit of a prior scene.
#[derive(Debug, Clone)]
pub struct ConceptScene {
    /// The educational concept this scene illustrates.
    pub concept: String,
    /// The generated image, carrying the prompt that produced it.
    pub image: GeneratedImage,
    /// For edited scenes, the concept of the scene this was derived from.
    pub edit_of: Option<String>,
}

impl ConceptScene {
    /// Returns true if this scene is an edit of another scene.
    pub fn is_edit(&self) -> bool {
        self.edit_of.is_some()
    }

    /// Display caption: the concept, marked when edited.
    pub fn caption(&self) -> String {
        match &self.edit_of {
            Some(original) => format!("{} (edited)", original),
            None => self.concept.clone(),
        }
    }
}

/// Per-session state: one optional character reference plus the gallery of
/// generated scenes. Lives only as long as the owning process.
#[derive(Debug, Clone, Default)]
pub struct Session {
    /// The current character reference, if one has been generated or uploaded.
    pub character: Option<CharacterReference>,
    scenes: Vec<ConceptScene>,
    /// Number of generation API calls made through this session.
    pub api_calls: u32,
}

impl Session {
    /// Creates an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the session's character reference, returning the stored value.
    pub fn set_character(&mut self, character: CharacterReference) -> &CharacterReference {
        self.character.insert(character)
    }

    /// Normalizes an uploaded image and stores it as the session's character
    /// reference. A pure local transform: no API call is made and no
    /// credential is required.
    pub fn upload_character(
        &mut self,
        bytes: &[u8],
        description: &str,
    ) -> Result<&CharacterReference> {
        let prepared = prepare_reference(bytes)?;
        if prepared.downscaled {
            tracing::warn!(
                width = prepared.width,
                height = prepared.height,
                "uploaded character image was downscaled to meet size requirements"
            );
        }

        let description = match description.trim() {
            "" => "Uploaded character image".to_string(),
            d => d.to_string(),
        };
        let format = prepared.format();
        Ok(self.set_character(CharacterReference {
            data: prepared.data,
            format,
            description,
            origin: CharacterOrigin::Uploaded,
        }))
    }

    /// Looks up the original (non-edited) scene for a concept.
    pub fn scene(&self, concept: &str) -> Option<&ConceptScene> {
        self.scenes
            .iter()
            .find(|s| !s.is_edit() && s.concept == concept)
    }

    /// Looks up the edited version of a concept's scene, if any.
    pub fn edited_scene(&self, concept: &str) -> Option<&ConceptScene> {
        self.scenes
            .iter()
            .find(|s| s.edit_of.as_deref() == Some(concept))
    }

    /// Stores a scene, replacing any prior scene of the same concept and
    /// kind. Returns the stored scene.
    pub fn put_scene(&mut self, scene: ConceptScene) -> &ConceptScene {
        let existing = self
            .scenes
            .iter()
            .position(|s| s.concept == scene.concept && s.is_edit() == scene.is_edit());
        let idx = match existing {
            Some(idx) => {
                self.scenes[idx] = scene;
                idx
            }
            None => {
                self.scenes.push(scene);
                self.scenes.len() - 1
            }
        };
        &self.scenes[idx]
    }

    /// Gallery in display order: originals in insertion order, each
    /// immediately followed by its edited version.
    pub fn gallery(&self) -> Vec<&ConceptScene> {
        let mut ordered = Vec::with_capacity(self.scenes.len());
        for scene in self.scenes.iter().filter(|s| !s.is_edit()) {
            ordered.push(scene);
            if let Some(edit) = self.edited_scene(&scene.concept) {
                ordered.push(edit);
            }
        }
        // Edits whose original was replaced away still belong in the gallery
        for scene in self.scenes.iter().filter(|s| s.is_edit()) {
            if !ordered.iter().any(|s| std::ptr::eq(*s, scene)) {
                ordered.push(scene);
            }
        }
        ordered
    }

    /// Number of scenes (originals and edits) in the gallery.
    pub fn scene_count(&self) -> usize {
        self.scenes.len()
    }

    /// Returns true if no scenes have been generated yet.
    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::GenerationMetadata;

    fn scene(concept: &str, edit_of: Option<&str>, marker: u8) -> ConceptScene {
        ConceptScene {
            concept: concept.into(),
            image: GeneratedImage::new(
                vec![marker],
                ImageFormat::Png,
                format!("prompt for {concept}"),
                GenerationMetadata::default(),
            ),
            edit_of: edit_of.map(Into::into),
        }
    }

    #[test]
    fn test_scene_lookup() {
        let mut session = Session::new();
        session.put_scene(scene("Photosynthesis process", None, 1));
        session.put_scene(scene(
            "Photosynthesis process",
            Some("Photosynthesis process"),
            2,
        ));

        assert_eq!(session.scene("Photosynthesis process").unwrap().image.data, [1]);
        assert_eq!(
            session
                .edited_scene("Photosynthesis process")
                .unwrap()
                .image
                .data,
            [2]
        );
        assert!(session.scene("Water cycle diagram").is_none());
    }

    #[test]
    fn test_put_scene_replaces_same_kind() {
        let mut session = Session::new();
        session.put_scene(scene("Water cycle diagram", None, 1));
        session.put_scene(scene("Water cycle diagram", None, 2));
        assert_eq!(session.scene_count(), 1);
        assert_eq!(session.scene("Water cycle diagram").unwrap().image.data, [2]);
    }

    #[test]
    fn test_gallery_interleaves_edits_after_originals() {
        let mut session = Session::new();
        session.put_scene(scene("Photosynthesis process", None, 1));
        session.put_scene(scene("Water cycle diagram", None, 2));
        session.put_scene(scene(
            "Photosynthesis process",
            Some("Photosynthesis process"),
            3,
        ));

        let captions: Vec<String> = session.gallery().iter().map(|s| s.caption()).collect();
        assert_eq!(
            captions,
            vec![
                "Photosynthesis process",
                "Photosynthesis process (edited)",
                "Water cycle diagram",
            ]
        );
    }

    #[test]
    fn test_upload_character_needs_no_provider_or_credential() {
        // Normalization is purely local; no client is ever constructed
        let img = image::RgbImage::from_pixel(2048, 1024, image::Rgb([90, 120, 200]));
        let mut buf = std::io::Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut buf, image::ImageFormat::Png)
            .unwrap();

        let mut session = Session::new();
        let character = session.upload_character(&buf.into_inner(), "").unwrap();
        assert_eq!(character.origin, CharacterOrigin::Uploaded);
        assert_eq!(character.format, ImageFormat::Jpeg);
        assert_eq!(character.description, "Uploaded character image");
        assert_eq!(session.api_calls, 0);
    }

    #[test]
    fn test_upload_character_rejects_bad_format() {
        let mut session = Session::new();
        let err = session.upload_character(b"GIF89a......", "sprite").unwrap_err();
        assert!(matches!(err, crate::error::EduVizError::InvalidInput(_)));
        assert!(session.character.is_none());
    }

    #[test]
    fn test_character_replacement() {
        let mut session = Session::new();
        session.set_character(CharacterReference {
            data: vec![1],
            format: ImageFormat::Jpeg,
            description: "first".into(),
            origin: CharacterOrigin::Generated,
        });
        session.set_character(CharacterReference {
            data: vec![2],
            format: ImageFormat::Jpeg,
            description: "second".into(),
            origin: CharacterOrigin::Uploaded,
        });
        let character = session.character.as_ref().unwrap();
        assert_eq!(character.data, [2]);
        assert_eq!(character.origin, CharacterOrigin::Uploaded);
    }
}
