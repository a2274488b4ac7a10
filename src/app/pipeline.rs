//! Steps shared by the interactive and one-shot workflows.

use crate::config::Config;
use crate::error::{GenerationError, MailError};
use crate::images::ImageGenerator;
use crate::notify::Mailer;
use crate::post::{GeneratedPost, PostArchive, PostGenerator};
use crate::profile;
use crate::prompt;
use crate::providers::OpenAiProvider;
use std::fs;
use std::sync::Arc;

/// Resolve the voice/system prompt, in order of preference: the saved voice
/// profile, a fresh compilation from the export directory, the built-in
/// generic voice.
pub fn load_voice_prompt(config: &Config) -> String {
    let saved = config.voice_profile_path();
    if let Ok(contents) = fs::read_to_string(&saved) {
        let trimmed = contents.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let export_dir = config.export_dir();
    if export_dir.is_dir() {
        match profile::extract(&export_dir) {
            Ok(extracted) => match prompt::compile_voice_prompt(&extracted) {
                Ok(compiled) => return compiled,
                Err(e) => {
                    tracing::warn!(error = %e, "voice compilation failed, using generic voice");
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, "export extraction failed, using generic voice");
            }
        }
    }

    prompt::generic_voice_prompt()
}

/// Extract the profile, compile the voice prompt and persist it for later
/// runs. Returns the compiled prompt.
pub fn build_voice_profile(config: &Config) -> crate::error::Result<String> {
    let profile = profile::extract(&config.export_dir())?;
    let compiled = prompt::compile_voice_prompt(&profile)?;
    fs::write(config.voice_profile_path(), &compiled).map_err(crate::error::ConfigError::Io)?;
    Ok(compiled)
}

/// Build the post generator from config, failing when no completion key is
/// available anywhere.
pub fn build_generator(config: &Config) -> Result<PostGenerator, GenerationError> {
    let api_key = config.completion_api_key();
    if api_key.is_none() {
        return Err(GenerationError::MissingKey);
    }
    let provider = OpenAiProvider::new(api_key.as_deref(), &config.provider.base_url);
    Ok(PostGenerator::new(
        Arc::new(provider),
        config.provider.model.clone(),
        config.provider.temperature,
    ))
}

/// Best-effort illustration; the post comes back unchanged when the image
/// step is skipped or fails.
pub async fn illustrate(config: &Config, post: GeneratedPost) -> GeneratedPost {
    let image = ImageGenerator::from_config(config)
        .generate(&post.body, &post.topic)
        .await;
    post.with_image(image)
}

pub fn archive(config: &Config, post: &GeneratedPost) -> crate::error::Result<()> {
    PostArchive::new(config.archive_file()).append(post)?;
    Ok(())
}

/// Mail the accepted post. Absent `[email]` configuration is a loud failure
/// like any other delivery problem; callers decide whether that aborts the
/// run.
pub fn notify(config: &Config, post: &GeneratedPost) -> Result<(), MailError> {
    let email = config
        .email
        .clone()
        .ok_or_else(|| MailError::Missing("email section".to_string()))?;
    let subject = format!("New LinkedIn post: {}", post.topic);
    Mailer::new(email).send(&subject, &post.body, post.image_path.as_deref())
}
