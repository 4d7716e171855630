//! Image generation module.

mod client;
pub mod prepare;
mod provider;
mod types;

pub use client::{GeminiClient, GeminiClientBuilder, GeminiModel};
pub use prepare::{prepare_reference, PreparedReference, MAX_DIMENSION, MAX_REFERENCE_BYTES};
pub use provider::ImageProvider;
pub use types::{GeneratedImage, GenerationMetadata, GenerationRequest, ImageFormat};
