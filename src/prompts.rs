//! Prompt assembly for educational illustrations.
//!
//! Every generation call goes out with one of three prompt shapes: a base
//! character profile, a concept scene conditioned on the character reference,
//! or an edit of a previously generated scene.

/// The educational concepts offered as presets.
pub const PRESET_CONCEPTS: [&str; 5] = [
    "Photosynthesis process",
    "Ancient Roman marketplace",
    "Water cycle diagram",
    "Newton's laws of motion",
    "Human digestive system",
];

/// Builds the prompt for generating the base character from a description.
pub fn character_prompt(description: &str) -> String {
    format!(
        "Create a detailed full-body image of: {description}. \
         This character will appear in multiple educational contexts. \
         Focus on distinctive features that will remain consistent across different scenes. \
         Style: Bright, clear educational illustration, suitable for children."
    )
}

/// Builds the prompt for illustrating a concept with the character reference.
///
/// The consistency guidelines assume the character image is attached to the
/// same request as a reference.
pub fn concept_prompt(concept: &str) -> String {
    format!(
        "Create an educational illustration showing {concept}.\n\
         IMPORTANT CHARACTER GUIDELINES:\n\
         1. Use the provided character image as exact reference.\n\
         2. Maintain ALL physical features of the character (appearance, clothing, style).\n\
         3. The character should be prominently featured in the scene.\n\
         4. Keep the character's proportions and style consistent.\n\
         \n\
         SCENE REQUIREMENTS:\n\
         - Style: Clear educational diagram with bright colors.\n\
         - Make the concept easy to understand for students.\n\
         - Include labeled elements and simple explanations.\n\
         - Ensure the character is actively involved in demonstrating the concept."
    )
}

/// Builds the prompt for editing an existing concept scene.
///
/// The scene being edited is attached to the same request as a reference.
pub fn edit_prompt(concept: &str, instructions: &str) -> String {
    format!(
        "You are an expert educational illustrator.\n\
         You have been given the following image of {concept}.\n\
         Apply these edits to the image:\n\
         {instructions}\n\
         \n\
         IMPORTANT INSTRUCTIONS:\n\
         1. Keep the main character from the original image (use it as a reference).\n\
         2. Maintain all physical features of the character (appearance, clothing, style).\n\
         3. Make the requested changes clearly visible and relevant to the educational concept.\n\
         4. Ensure the final image remains a clear educational diagram."
    )
}
