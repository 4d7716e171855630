//! Core types for image generation.

use crate::error::{EduVizError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Supported image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// PNG format (lossless).
    #[default]
    Png,
    /// JPEG format (lossy).
    Jpeg,
}

impl ImageFormat {
    /// Returns the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }

    /// Returns the MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }

    /// Attempts to detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            _ => None,
        }
    }

    /// Detects image format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        // PNG: 89 50 4E 47 0D 0A 1A 0A
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Some(Self::Png);
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(Self::Jpeg);
        }

        None
    }

    /// Checks if the given data matches this format's magic bytes.
    pub fn matches_bytes(&self, data: &[u8]) -> bool {
        Self::from_magic_bytes(data) == Some(*self)
    }
}

/// Metadata about the generation process.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationMetadata {
    /// Model used for generation.
    pub model: Option<String>,
    /// Generation duration in milliseconds.
    pub duration_ms: Option<u64>,
}

/// A request to generate an image: a prompt plus an optional conditioning image.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// The text prompt describing the desired image.
    pub prompt: String,
    /// Conditioning image used to keep a generated figure visually
    /// consistent across requests (raw bytes).
    pub reference_image: Option<Vec<u8>>,
}

impl GenerationRequest {
    /// Creates a new request with the given prompt.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            reference_image: None,
        }
    }

    /// Sets a reference image to condition the generation on.
    pub fn with_reference_image(mut self, image: Vec<u8>) -> Self {
        self.reference_image = Some(image);
        self
    }

    /// Returns true if this request conditions on a prior image.
    pub fn has_reference(&self) -> bool {
        self.reference_image.is_some()
    }

    /// Rejects empty or whitespace-only prompts.
    pub fn validate(&self) -> Result<()> {
        if self.prompt.trim().is_empty() {
            return Err(EduVizError::InvalidInput("Prompt must not be empty.".into()));
        }
        Ok(())
    }
}

/// A generated image with its data, the prompt that produced it, and metadata.
#[derive(Debug, Clone)]
#[must_use = "generated image should be saved or stored in the session"]
pub struct GeneratedImage {
    /// Raw image bytes.
    pub data: Vec<u8>,
    /// Image format.
    pub format: ImageFormat,
    /// The prompt that produced this image.
    pub prompt: String,
    /// Generation metadata.
    pub metadata: GenerationMetadata,
}

impl GeneratedImage {
    /// Creates a new generated image.
    pub fn new(
        data: Vec<u8>,
        format: ImageFormat,
        prompt: impl Into<String>,
        metadata: GenerationMetadata,
    ) -> Self {
        Self {
            data,
            format,
            prompt: prompt.into(),
            metadata,
        }
    }

    /// Creates a new generated image, detecting format from magic bytes.
    pub fn from_bytes(
        data: Vec<u8>,
        prompt: impl Into<String>,
        metadata: GenerationMetadata,
    ) -> Result<Self> {
        let format = ImageFormat::from_magic_bytes(&data)
            .ok_or_else(|| EduVizError::Decode("Unknown image format".into()))?;
        Ok(Self::new(data, format, prompt, metadata))
    }

    /// Decodes the raw bytes into a displayable bitmap.
    pub fn decode(&self) -> Result<image::DynamicImage> {
        Ok(image::load_from_memory(&self.data)?)
    }

    /// Validates that the image data matches the claimed format.
    pub fn validate_format(&self) -> bool {
        self.format.matches_bytes(&self.data)
    }

    /// Returns the size of the image data in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Saves the image to the specified path.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, &self.data)?;
        Ok(())
    }

    /// Encodes the image data as base64.
    pub fn to_base64(&self) -> String {
        use base64::Engine;
        base64::engine::general_purpose::STANDARD.encode(&self.data)
    }

    /// Returns the image as a data URL.
    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.format.mime_type(),
            self.to_base64()
        )
    }
}
