//! CLI for EduViz - character-consistent educational illustrations.

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use eduviz::{
    fallback, prompts, CharacterOrigin, CharacterReference, ConceptScene, EduVizError,
    GeminiClient, GeminiModel, GeneratedImage, GenerationMetadata, ImageFormat, ImageProvider,
    Session, Studio,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "eduviz")]
#[command(about = "Generate educational concept illustrations with a consistent character")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Gemini API key (falls back to GOOGLE_API_KEY)
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Model variant to use
    #[arg(long, global = true, value_enum, default_value = "flash-image-preview")]
    model: ModelArg,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the base character from a text description
    Character(CharacterArgs),

    /// Normalize an uploaded character image (no API call)
    Upload(UploadArgs),

    /// Illustrate an educational concept featuring the character
    Concept(ConceptArgs),

    /// Apply natural-language edits to a generated scene
    Edit(EditArgs),

    /// List the preset educational concepts
    Concepts,

    /// Verify the API credential without spending generation quota
    Check,
}

#[derive(Args)]
struct CharacterArgs {
    /// Description of the educational character
    description: String,

    /// Output file path
    #[arg(short, long)]
    output: PathBuf,
}

#[derive(Args)]
struct UploadArgs {
    /// Path to a JPG, JPEG, or PNG image
    input: PathBuf,

    /// Output file path for the normalized reference
    #[arg(short, long)]
    output: PathBuf,

    /// Description of the uploaded character
    #[arg(short, long, default_value = "")]
    description: String,
}

#[derive(Args)]
struct ConceptArgs {
    /// The educational concept to illustrate (preset or custom)
    concept: String,

    /// Path to the character reference image
    #[arg(short, long)]
    reference: PathBuf,

    /// Output file path
    #[arg(short, long)]
    output: PathBuf,

    /// On quota exhaustion or outage, write a pre-shipped example instead
    #[arg(long)]
    fallback: bool,
}

#[derive(Args)]
struct EditArgs {
    /// Path to the previously generated scene image
    scene: PathBuf,

    /// Natural-language edit instructions
    instructions: String,

    /// Concept name of the scene (defaults to the file stem)
    #[arg(short, long)]
    concept: Option<String>,

    /// Output file path
    #[arg(short, long)]
    output: PathBuf,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModelArg {
    FlashImagePreview,
    FlashImage,
}

impl From<ModelArg> for GeminiModel {
    fn from(arg: ModelArg) -> Self {
        match arg {
            ModelArg::FlashImagePreview => GeminiModel::FlashImagePreview,
            ModelArg::FlashImage => GeminiModel::FlashImage,
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let Cli {
        command,
        api_key,
        model,
        json,
    } = cli;

    match command {
        Commands::Character(args) => {
            let studio = build_studio(api_key.as_deref(), model)?;
            generate_character(&studio, args, json).await
        }
        // Upload is a pure local normalization; no client, no credential
        Commands::Upload(args) => upload_character(args, json),
        Commands::Concept(args) => {
            let studio = build_studio(api_key.as_deref(), model)?;
            generate_concept(&studio, args, json).await
        }
        Commands::Edit(args) => {
            let studio = build_studio(api_key.as_deref(), model)?;
            edit_scene(&studio, args, json).await
        }
        Commands::Concepts => {
            list_concepts(json);
            Ok(())
        }
        Commands::Check => {
            let studio = build_studio(api_key.as_deref(), model)?;
            studio.provider().health_check().await.map_err(user_error)?;
            println!("API key is valid.");
            Ok(())
        }
    }
}

fn build_studio(api_key: Option<&str>, model: ModelArg) -> anyhow::Result<Studio<GeminiClient>> {
    let mut builder = GeminiClient::builder().model(model.into());
    if let Some(key) = api_key {
        builder = builder.api_key(key);
    }
    Ok(Studio::new(builder.build().map_err(user_error)?))
}

/// Maps a pipeline error to its user-facing message and remediation hint.
fn user_error(err: EduVizError) -> anyhow::Error {
    tracing::debug!(?err, "operation failed");
    match err.remediation() {
        Some(hint) => anyhow::anyhow!("{}\n  hint: {}", err.user_message(), hint),
        None => anyhow::anyhow!(err.user_message()),
    }
}

async fn generate_character(
    studio: &Studio<GeminiClient>,
    args: CharacterArgs,
    json: bool,
) -> anyhow::Result<()> {
    let mut session = Session::new();
    let character = studio
        .create_character(&mut session, &args.description)
        .await
        .map_err(user_error)?;

    std::fs::write(&args.output, &character.data)
        .with_context(|| format!("writing {}", args.output.display()))?;

    if json {
        print_json(&serde_json::json!({
            "type": "character",
            "output": args.output.display().to_string(),
            "size_bytes": character.data.len(),
            "format": character.format.extension(),
        }))?;
    } else {
        println!(
            "Base character created: {} ({} bytes)",
            args.output.display(),
            character.data.len()
        );
    }
    Ok(())
}

fn upload_character(args: UploadArgs, json: bool) -> anyhow::Result<()> {
    let bytes = std::fs::read(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;

    let mut session = Session::new();
    let character = session
        .upload_character(&bytes, &args.description)
        .map_err(user_error)?;

    std::fs::write(&args.output, &character.data)
        .with_context(|| format!("writing {}", args.output.display()))?;

    if json {
        print_json(&serde_json::json!({
            "type": "upload",
            "output": args.output.display().to_string(),
            "size_bytes": character.data.len(),
            "format": character.format.extension(),
        }))?;
    } else {
        println!(
            "Character image normalized: {} ({} bytes)",
            args.output.display(),
            character.data.len()
        );
    }
    Ok(())
}

async fn generate_concept(
    studio: &Studio<GeminiClient>,
    args: ConceptArgs,
    json: bool,
) -> anyhow::Result<()> {
    let mut session = Session::new();
    session.set_character(load_character(&args.reference)?);

    match studio.illustrate_concept(&mut session, &args.concept).await {
        Ok(scene) => {
            scene.image.save(&args.output).map_err(user_error)?;
            report_scene(scene, &args.output, false, json)
        }
        Err(err) => {
            let example = if args.fallback {
                fallback::fallback_scene(&err, &args.concept)
            } else {
                None
            };
            let Some(example) = example else {
                return Err(user_error(err));
            };

            std::fs::write(&args.output, example.data)
                .with_context(|| format!("writing {}", args.output.display()))?;
            eprintln!("Warning: {}", err.user_message());
            if json {
                print_json(&serde_json::json!({
                    "type": "concept",
                    "concept": example.concept,
                    "output": args.output.display().to_string(),
                    "fallback": true,
                }))?;
            } else {
                println!(
                    "Wrote pre-shipped example \"{}\" to {}",
                    example.concept,
                    args.output.display()
                );
            }
            Ok(())
        }
    }
}

async fn edit_scene(
    studio: &Studio<GeminiClient>,
    args: EditArgs,
    json: bool,
) -> anyhow::Result<()> {
    let bytes = std::fs::read(&args.scene)
        .with_context(|| format!("reading {}", args.scene.display()))?;
    let format = ImageFormat::from_magic_bytes(&bytes)
        .ok_or_else(|| anyhow::anyhow!("{} is not a PNG or JPEG image", args.scene.display()))?;
    let concept = match args.concept {
        Some(c) => c,
        None => args
            .scene
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("scene")
            .to_string(),
    };

    let mut session = Session::new();
    session.put_scene(ConceptScene {
        concept: concept.clone(),
        image: GeneratedImage::new(bytes, format, "", GenerationMetadata::default()),
        edit_of: None,
    });

    let edited = studio
        .edit_scene(&mut session, &concept, &args.instructions)
        .await
        .map_err(user_error)?;
    edited.image.save(&args.output).map_err(user_error)?;
    report_scene(edited, &args.output, true, json)
}

fn load_character(path: &Path) -> anyhow::Result<CharacterReference> {
    let data = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let format = ImageFormat::from_magic_bytes(&data)
        .ok_or_else(|| anyhow::anyhow!("{} is not a PNG or JPEG image", path.display()))?;
    Ok(CharacterReference {
        data,
        format,
        description: format!("Loaded from {}", path.display()),
        origin: CharacterOrigin::Uploaded,
    })
}

fn report_scene(
    scene: &ConceptScene,
    output: &Path,
    edited: bool,
    json: bool,
) -> anyhow::Result<()> {
    if json {
        print_json(&serde_json::json!({
            "type": if edited { "edit" } else { "concept" },
            "concept": scene.concept,
            "output": output.display().to_string(),
            "size_bytes": scene.image.size(),
            "format": scene.image.format.extension(),
            "model": scene.image.metadata.model,
            "duration_ms": scene.image.metadata.duration_ms,
        }))?;
    } else {
        let verb = if edited { "edited" } else { "generated" };
        println!(
            "Scene {} for \"{}\": {} ({} bytes)",
            verb,
            scene.concept,
            output.display(),
            scene.image.size()
        );
        if let Some(duration) = scene.image.metadata.duration_ms {
            println!("Duration: {}ms", duration);
        }
    }
    Ok(())
}

fn list_concepts(json: bool) {
    if json {
        let list: Vec<&str> = prompts::PRESET_CONCEPTS.to_vec();
        if let Ok(s) = serde_json::to_string_pretty(&list) {
            println!("{s}");
        }
    } else {
        println!("Preset educational concepts:");
        for concept in prompts::PRESET_CONCEPTS {
            println!("  - {concept}");
        }
        println!("\nAny custom concept text is accepted as well.");
    }
}

fn print_json(value: &serde_json::Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_build_studio_with_explicit_key() {
        assert!(build_studio(Some("test-key"), ModelArg::FlashImage).is_ok());
    }

    #[test]
    fn test_global_flags_parse_alongside_subcommand() {
        let cli = Cli::parse_from([
            "eduviz",
            "concept",
            "Photosynthesis process",
            "--reference",
            "character.png",
            "-o",
            "scene.png",
            "--fallback",
            "--api-key",
            "k",
            "--json",
        ]);
        assert!(cli.json);
        assert_eq!(cli.api_key.as_deref(), Some("k"));
        match cli.command {
            Commands::Concept(args) => {
                assert!(args.fallback);
                assert_eq!(args.concept, "Photosynthesis process");
            }
            _ => panic!("expected concept subcommand"),
        }
    }
}
