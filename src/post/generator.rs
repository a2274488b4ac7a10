use crate::error::GenerationError;
use crate::providers::CompletionProvider;
use std::sync::Arc;

/// Labels the completion service sometimes echoes back from the prompt.
/// Stripped case-insensitively from the head of a response.
const ECHO_LABELS: [&str; 5] = [
    "post:",
    "linkedin post:",
    "here is your post:",
    "here's the post:",
    "draft:",
];

/// Drafts and revises posts through the completion seam. Stateless between
/// calls; every invocation is a fresh request.
pub struct PostGenerator {
    provider: Arc<dyn CompletionProvider>,
    model: String,
    temperature: f64,
}

impl PostGenerator {
    pub fn new(provider: Arc<dyn CompletionProvider>, model: impl Into<String>, temperature: f64) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature,
        }
    }

    pub async fn generate(
        &self,
        voice_prompt: &str,
        topic: &str,
    ) -> Result<String, GenerationError> {
        let message = format!("Write a LinkedIn post about the following topic:\n\n{topic}");
        self.request(voice_prompt, &message).await
    }

    pub async fn revise(
        &self,
        voice_prompt: &str,
        current: &str,
        instructions: &str,
    ) -> Result<String, GenerationError> {
        let message = format!(
            "Here is a LinkedIn post draft:\n\n{current}\n\nRevise it according to this instruction, \
             keeping everything else intact:\n\n{instructions}\n\nReturn only the revised post."
        );
        self.request(voice_prompt, &message).await
    }

    async fn request(&self, voice_prompt: &str, message: &str) -> Result<String, GenerationError> {
        let raw = self
            .provider
            .complete(Some(voice_prompt), message, &self.model, self.temperature)
            .await
            .map_err(|e| GenerationError::Remote(e.to_string()))?;

        let cleaned = clean_response(&raw);
        if cleaned.is_empty() {
            return Err(GenerationError::EmptyCompletion);
        }
        Ok(cleaned)
    }
}

/// Strip known prompt-echo artifacts: wrapping code fences, wrapping quotes
/// and leading reply labels.
fn clean_response(raw: &str) -> String {
    let mut text = raw.trim();

    if let Some(inner) = strip_code_fence(text) {
        text = inner;
    }

    if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
        text = text[1..text.len() - 1].trim();
    }

    let mut owned = text.to_string();
    loop {
        let lowered = owned.to_lowercase();
        let Some(label) = ECHO_LABELS.iter().find(|l| lowered.starts_with(*l)) else {
            break;
        };
        owned = owned[label.len()..].trim_start().to_string();
    }

    owned.trim().to_string()
}

fn strip_code_fence(text: &str) -> Option<&str> {
    let rest = text.strip_prefix("```")?;
    // Drop an optional language tag on the opening fence line.
    let rest = match rest.find('\n') {
        Some(idx) if rest[..idx].chars().all(|c| c.is_ascii_alphanumeric()) => &rest[idx + 1..],
        _ => rest,
    };
    rest.strip_suffix("```").map(str::trim)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct FixedProvider {
        reply: Option<String>,
    }

    #[async_trait]
    impl CompletionProvider for FixedProvider {
        async fn complete(
            &self,
            _system_prompt: Option<&str>,
            _message: &str,
            _model: &str,
            _temperature: f64,
        ) -> anyhow::Result<String> {
            self.reply
                .clone()
                .ok_or_else(|| anyhow::anyhow!("service unavailable"))
        }
    }

    fn generator(reply: Option<&str>) -> PostGenerator {
        PostGenerator::new(
            Arc::new(FixedProvider {
                reply: reply.map(String::from),
            }),
            "gpt-4o",
            0.7,
        )
    }

    #[test]
    fn clean_strips_wrapping_quotes() {
        assert_eq!(clean_response("\"A post body.\""), "A post body.");
    }

    #[test]
    fn clean_strips_code_fence_with_language() {
        assert_eq!(
            clean_response("```markdown\nA post body.\n```"),
            "A post body."
        );
    }

    #[test]
    fn clean_strips_echo_label() {
        assert_eq!(clean_response("LinkedIn Post: A post body."), "A post body.");
        assert_eq!(clean_response("Draft:\nA post body."), "A post body.");
    }

    #[test]
    fn clean_keeps_interior_quotes_and_hashes() {
        let body = "Shipping \"good enough\" beats perfect.\n\n#shipping";
        assert_eq!(clean_response(body), body);
    }

    #[test]
    fn clean_of_whitespace_only_is_empty() {
        assert_eq!(clean_response("   \n  "), "");
    }

    #[tokio::test]
    async fn generate_returns_cleaned_text() {
        let g = generator(Some("\"The drafted post.\""));
        let body = g.generate("voice", "rust tooling").await.unwrap();
        assert_eq!(body, "The drafted post.");
    }

    #[tokio::test]
    async fn generate_maps_remote_failure() {
        let g = generator(None);
        let err = g.generate("voice", "rust tooling").await.unwrap_err();
        assert!(matches!(err, GenerationError::Remote(_)));
        assert!(err.to_string().contains("service unavailable"));
    }

    #[tokio::test]
    async fn empty_completion_is_its_own_error() {
        let g = generator(Some("   "));
        let err = g.generate("voice", "rust tooling").await.unwrap_err();
        assert!(matches!(err, GenerationError::EmptyCompletion));
    }

    #[tokio::test]
    async fn revise_packages_current_body() {
        struct CapturingProvider;

        #[async_trait]
        impl CompletionProvider for CapturingProvider {
            async fn complete(
                &self,
                system_prompt: Option<&str>,
                message: &str,
                _model: &str,
                _temperature: f64,
            ) -> anyhow::Result<String> {
                assert_eq!(system_prompt, Some("voice"));
                assert!(message.contains("the old body"));
                assert!(message.contains("make it shorter"));
                Ok("revised".into())
            }
        }

        let g = PostGenerator::new(Arc::new(CapturingProvider), "gpt-4o", 0.7);
        let body = g.revise("voice", "the old body", "make it shorter").await.unwrap();
        assert_eq!(body, "revised");
    }
}
