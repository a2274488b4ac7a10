use async_trait::async_trait;

/// The completion-service seam. The post generator only ever talks to this
/// trait, so tests can drive the workflow with a scripted implementation.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(
        &self,
        system_prompt: Option<&str>,
        message: &str,
        model: &str,
        temperature: f64,
    ) -> anyhow::Result<String>;
}
