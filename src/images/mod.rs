//! Best-effort illustration for a drafted post. Image absence is a normal
//! branch of the pipeline, never a failure that aborts generation or
//! archiving.

use crate::config::Config;
use anyhow::Context;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::Local;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Maximum characters of sanitized topic carried into the image filename.
const MAX_SLUG_CHARS: usize = 30;

/// Characters of post text folded into the image prompt.
const MAX_PROMPT_EXCERPT_CHARS: usize = 300;

pub struct ImageGenerator {
    api_key: Option<String>,
    cached_url: String,
    model: String,
    size: String,
    out_dir: PathBuf,
    client: Client,
}

#[derive(Debug, Serialize)]
struct ImageRequest {
    model: String,
    prompt: String,
    n: u8,
    size: String,
    response_format: &'static str,
}

#[derive(Debug, Deserialize)]
struct ImageResponse {
    data: Vec<ImagePayload>,
}

#[derive(Debug, Deserialize)]
struct ImagePayload {
    b64_json: Option<String>,
    url: Option<String>,
}

impl ImageGenerator {
    pub fn new(
        api_key: Option<String>,
        base_url: &str,
        model: impl Into<String>,
        size: impl Into<String>,
        out_dir: impl Into<PathBuf>,
    ) -> Self {
        let base_url = base_url.trim_end_matches('/');
        Self {
            api_key,
            cached_url: format!("{base_url}/images/generations"),
            model: model.into(),
            size: size.into(),
            out_dir: out_dir.into(),
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .connect_timeout(std::time::Duration::from_secs(10))
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.image_api_key(),
            &config.image.base_url,
            config.image.model.clone(),
            config.image.size.clone(),
            config.image_dir(),
        )
    }

    /// Generate and save an illustration for a post. Returns `None` when the
    /// provider is unconfigured or the call fails; the cause is logged and
    /// the pipeline carries on without an image.
    pub async fn generate(&self, post_text: &str, topic: &str) -> Option<PathBuf> {
        if self.api_key.is_none() {
            tracing::info!("image generation skipped: no API key configured");
            return None;
        }

        match self.try_generate(post_text, topic).await {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::warn!(error = %e, "image generation failed, continuing without an image");
                None
            }
        }
    }

    async fn try_generate(&self, post_text: &str, topic: &str) -> anyhow::Result<PathBuf> {
        let auth_header = format!(
            "Bearer {}",
            self.api_key.as_deref().unwrap_or_default()
        );

        let request = ImageRequest {
            model: self.model.clone(),
            prompt: build_image_prompt(post_text),
            n: 1,
            size: self.size.clone(),
            response_format: "b64_json",
        };

        let response = self
            .client
            .post(&self.cached_url)
            .header("Authorization", auth_header)
            .json(&request)
            .send()
            .await
            .context("image request failed")?;

        if !response.status().is_success() {
            return Err(crate::providers::api_error("image", response).await);
        }

        let payload: ImageResponse = response
            .json()
            .await
            .context("image response JSON decode failed")?;
        let first = payload
            .data
            .first()
            .ok_or_else(|| anyhow::anyhow!("image service returned no payload"))?;

        let bytes = if let Some(b64) = &first.b64_json {
            BASE64
                .decode(b64)
                .context("inline image payload was not valid base64")?
        } else if let Some(url) = &first.url {
            self.client
                .get(url)
                .send()
                .await
                .context("image download failed")?
                .error_for_status()
                .context("image download returned failure status")?
                .bytes()
                .await
                .context("image download body read failed")?
                .to_vec()
        } else {
            anyhow::bail!("image payload carried neither inline data nor a URL");
        };

        fs::create_dir_all(&self.out_dir).context("could not create image directory")?;
        let file_name = format!(
            "{}_{}.png",
            Local::now().format("%Y-%m-%d"),
            sanitize_topic_slice(topic)
        );
        let path = self.out_dir.join(file_name);
        fs::write(&path, bytes).context("could not write image file")?;
        Ok(path)
    }
}

/// Fixed-style image prompt derived from the post text.
fn build_image_prompt(post_text: &str) -> String {
    let flattened = post_text.split_whitespace().collect::<Vec<_>>().join(" ");
    let excerpt: String = flattened.chars().take(MAX_PROMPT_EXCERPT_CHARS).collect();
    format!(
        "Minimalist editorial illustration for a professional LinkedIn post about: {excerpt}. \
         Clean flat design, soft gradients, professional color palette, no text, no words, no letters."
    )
}

/// Filename-safe slice of the topic: alphanumerics only, length-capped.
pub fn sanitize_topic_slice(topic: &str) -> String {
    let cleaned: String = topic
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .take(MAX_SLUG_CHARS)
        .collect();
    if cleaned.is_empty() {
        "post".to_string()
    } else {
        cleaned
    }
}
