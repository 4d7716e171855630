//! The studio operations: generate the base character, illustrate concepts
//! with it, and edit generated scenes. Uploading a character instead is a
//! pure state operation, [`Session::upload_character`].
//!
//! Each operation is independent: it validates its inputs, performs at most
//! one API call, and mutates only the [`Session`] passed in. Failures are
//! returned to the caller; nothing is retried automatically.

use crate::error::{EduVizError, Result};
use crate::image::{GenerationRequest, ImageProvider};
use crate::prompts;
use crate::session::{CharacterOrigin, CharacterReference, ConceptScene, Session};

/// Drives the generation workflow against an [`ImageProvider`].
pub struct Studio<P> {
    provider: P,
}

impl<P: ImageProvider> Studio<P> {
    /// Creates a studio over the given provider.
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Returns the underlying provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Generates the base character from a text description and stores it as
    /// the session's character reference, replacing any previous one.
    pub async fn create_character<'s>(
        &self,
        session: &'s mut Session,
        description: &str,
    ) -> Result<&'s CharacterReference> {
        let description = description.trim();
        if description.is_empty() {
            return Err(EduVizError::InvalidInput(
                "Please provide a character description.".into(),
            ));
        }

        let request = GenerationRequest::new(prompts::character_prompt(description));
        let image = self.provider.generate(&request).await?;
        session.api_calls += 1;

        tracing::info!(size = image.size(), "base character created");
        Ok(session.set_character(CharacterReference {
            data: image.data,
            format: image.format,
            description: description.to_string(),
            origin: CharacterOrigin::Generated,
        }))
    }

    /// Illustrates an educational concept featuring the session's character,
    /// conditioning the generation on the character reference image.
    pub async fn illustrate_concept<'s>(
        &self,
        session: &'s mut Session,
        concept: &str,
    ) -> Result<&'s ConceptScene> {
        let concept = concept.trim();
        if concept.is_empty() {
            return Err(EduVizError::InvalidInput(
                "Please select or enter an educational concept.".into(),
            ));
        }
        let character = session.character.as_ref().ok_or_else(|| {
            EduVizError::InvalidInput("Generate or upload a base character first.".into())
        })?;

        let request = GenerationRequest::new(prompts::concept_prompt(concept))
            .with_reference_image(character.data.clone());
        let image = self.provider.generate(&request).await?;
        session.api_calls += 1;

        tracing::info!(concept, size = image.size(), "concept scene generated");
        Ok(session.put_scene(ConceptScene {
            concept: concept.to_string(),
            image,
            edit_of: None,
        }))
    }

    /// Applies natural-language edits to a previously generated scene,
    /// conditioning on the scene image itself. The result is stored as the
    /// edited version of that scene.
    pub async fn edit_scene<'s>(
        &self,
        session: &'s mut Session,
        concept: &str,
        instructions: &str,
    ) -> Result<&'s ConceptScene> {
        let instructions = instructions.trim();
        if instructions.is_empty() {
            return Err(EduVizError::InvalidInput(
                "Please enter an edit description.".into(),
            ));
        }
        let scene = session.scene(concept).ok_or_else(|| {
            EduVizError::InvalidInput(format!("No generated scene for \"{concept}\" to edit."))
        })?;

        let request = GenerationRequest::new(prompts::edit_prompt(concept, instructions))
            .with_reference_image(scene.image.data.clone());
        let image = self.provider.generate(&request).await?;
        session.api_calls += 1;

        tracing::info!(concept, "scene edits applied");
        Ok(session.put_scene(ConceptScene {
            concept: concept.to_string(),
            image,
            edit_of: Some(concept.to_string()),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::{GeneratedImage, GenerationMetadata, ImageFormat};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    const PNG_MAGIC: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    /// Provider that replays scripted outcomes and records every request.
    struct FakeProvider {
        outcomes: Mutex<VecDeque<Result<GeneratedImage>>>,
        requests: Mutex<Vec<GenerationRequest>>,
    }

    impl FakeProvider {
        fn new(outcomes: Vec<Result<GeneratedImage>>) -> Self {
            Self {
                outcomes: Mutex::new(outcomes.into()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<GenerationRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ImageProvider for FakeProvider {
        async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedImage> {
            self.requests.lock().unwrap().push(request.clone());
            self.outcomes
                .lock()
                .unwrap()
                .pop_front()
                .expect("fake provider called more times than scripted")
        }

        async fn health_check(&self) -> Result<()> {
            Ok(())
        }
    }

    fn fake_image(marker: u8) -> GeneratedImage {
        let mut data = PNG_MAGIC.to_vec();
        data.push(marker);
        GeneratedImage::new(
            data,
            ImageFormat::Png,
            "fake prompt",
            GenerationMetadata::default(),
        )
    }

    #[tokio::test]
    async fn test_character_then_concept_sends_reference_bytes() {
        let studio = Studio::new(FakeProvider::new(vec![
            Ok(fake_image(1)),
            Ok(fake_image(2)),
        ]));
        let mut session = Session::new();

        studio
            .create_character(&mut session, "curious student with glasses, blue shirt")
            .await
            .unwrap();
        let character_bytes = session.character.as_ref().unwrap().data.clone();

        let scene = studio
            .illustrate_concept(&mut session, "Photosynthesis process")
            .await
            .unwrap();
        assert_eq!(scene.concept, "Photosynthesis process");

        let requests = studio.provider().requests();
        assert_eq!(requests.len(), 2);
        assert!(requests[0].reference_image.is_none());
        assert_eq!(
            requests[1].reference_image.as_deref(),
            Some(character_bytes.as_slice())
        );
        assert!(requests[1].prompt.contains("Photosynthesis process"));
        assert_eq!(session.api_calls, 2);
    }

    #[tokio::test]
    async fn test_concept_requires_character() {
        let studio = Studio::new(FakeProvider::new(vec![]));
        let mut session = Session::new();

        let err = studio
            .illustrate_concept(&mut session, "Water cycle diagram")
            .await
            .unwrap_err();
        assert!(matches!(err, EduVizError::InvalidInput(_)));
        assert!(studio.provider().requests().is_empty());
    }

    #[tokio::test]
    async fn test_empty_inputs_rejected_without_api_call() {
        let studio = Studio::new(FakeProvider::new(vec![]));
        let mut session = Session::new();

        assert!(studio.create_character(&mut session, "  ").await.is_err());
        assert!(studio
            .illustrate_concept(&mut session, "")
            .await
            .is_err());
        assert!(studio
            .edit_scene(&mut session, "Water cycle diagram", "")
            .await
            .is_err());
        assert!(studio.provider().requests().is_empty());
        assert_eq!(session.api_calls, 0);
    }

    #[tokio::test]
    async fn test_auth_failure_is_not_retried() {
        let studio = Studio::new(FakeProvider::new(vec![Err(EduVizError::Auth(
            "bad key".into(),
        ))]));
        let mut session = Session::new();

        let err = studio
            .create_character(&mut session, "a robot teacher")
            .await
            .unwrap_err();
        assert!(matches!(err, EduVizError::Auth(_)));
        // Exactly one call: failures surface immediately, no automatic retry
        assert_eq!(studio.provider().requests().len(), 1);
        assert_eq!(session.api_calls, 0);
        assert!(session.character.is_none());
    }

    #[tokio::test]
    async fn test_quota_failure_leaves_session_unchanged() {
        let studio = Studio::new(FakeProvider::new(vec![
            Ok(fake_image(1)),
            Err(EduVizError::Quota {
                retry_after: Some(Duration::from_secs(60)),
            }),
        ]));
        let mut session = Session::new();

        studio
            .create_character(&mut session, "a robot teacher")
            .await
            .unwrap();
        let err = studio
            .illustrate_concept(&mut session, "Newton's laws of motion")
            .await
            .unwrap_err();

        assert!(err.is_retryable());
        assert!(session.is_empty());
        assert_eq!(session.api_calls, 1);
    }

    #[tokio::test]
    async fn test_edit_uses_scene_as_reference() {
        let studio = Studio::new(FakeProvider::new(vec![
            Ok(fake_image(1)),
            Ok(fake_image(2)),
            Ok(fake_image(3)),
        ]));
        let mut session = Session::new();

        studio
            .create_character(&mut session, "a robot teacher")
            .await
            .unwrap();
        studio
            .illustrate_concept(&mut session, "Water cycle diagram")
            .await
            .unwrap();
        let scene_bytes = session.scene("Water cycle diagram").unwrap().image.data.clone();

        let edited = studio
            .edit_scene(
                &mut session,
                "Water cycle diagram",
                "Add a label pointing to the sun",
            )
            .await
            .unwrap();
        assert!(edited.is_edit());

        let requests = studio.provider().requests();
        assert_eq!(
            requests[2].reference_image.as_deref(),
            Some(scene_bytes.as_slice())
        );
        assert!(requests[2].prompt.contains("Add a label pointing to the sun"));

        let captions: Vec<String> = session.gallery().iter().map(|s| s.caption()).collect();
        assert_eq!(
            captions,
            vec!["Water cycle diagram", "Water cycle diagram (edited)"]
        );
    }

    #[tokio::test]
    async fn test_edit_requires_existing_scene() {
        let studio = Studio::new(FakeProvider::new(vec![]));
        let mut session = Session::new();

        let err = studio
            .edit_scene(&mut session, "Water cycle diagram", "make it bigger")
            .await
            .unwrap_err();
        assert!(matches!(err, EduVizError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_regenerating_concept_replaces_scene() {
        let studio = Studio::new(FakeProvider::new(vec![
            Ok(fake_image(1)),
            Ok(fake_image(2)),
            Ok(fake_image(3)),
        ]));
        let mut session = Session::new();

        studio
            .create_character(&mut session, "a robot teacher")
            .await
            .unwrap();
        studio
            .illustrate_concept(&mut session, "Human digestive system")
            .await
            .unwrap();
        studio
            .illustrate_concept(&mut session, "Human digestive system")
            .await
            .unwrap();

        assert_eq!(session.scene_count(), 1);
        let scene = session.scene("Human digestive system").unwrap();
        assert_eq!(*scene.image.data.last().unwrap(), 3);
    }
}
