use crate::providers::traits::CompletionProvider;
use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Chat-completions client for OpenAI and compatible endpoints. The base URL
/// is injected so scripted servers can stand in for the real service.
pub struct OpenAiProvider {
    /// Pre-computed `"Bearer <key>"` header value (avoids `format!` per request).
    cached_auth_header: Option<String>,
    /// Pre-computed chat completions URL.
    cached_chat_url: String,
    client: Client,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl OpenAiProvider {
    pub fn new(api_key: Option<&str>, base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/');
        Self {
            cached_auth_header: api_key.map(|k| format!("Bearer {k}")),
            cached_chat_url: format!("{base_url}/chat/completions"),
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .connect_timeout(std::time::Duration::from_secs(10))
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    fn build_request(
        system_prompt: Option<&str>,
        message: &str,
        model: &str,
        temperature: f64,
    ) -> ChatRequest {
        let capacity = if system_prompt.is_some() { 2 } else { 1 };
        let mut messages = Vec::with_capacity(capacity);

        if let Some(sys) = system_prompt {
            messages.push(Message {
                role: "system",
                content: sys.to_string(),
            });
        }

        messages.push(Message {
            role: "user",
            content: message.to_string(),
        });

        ChatRequest {
            model: model.to_string(),
            messages,
            temperature,
        }
    }

    fn extract_text(chat_response: &ChatResponse) -> anyhow::Result<String> {
        chat_response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .ok_or_else(|| anyhow::anyhow!("No response from completion service"))
    }

    async fn call_api(&self, request: &ChatRequest) -> anyhow::Result<ChatResponse> {
        let auth_header = self.cached_auth_header.as_ref().ok_or_else(|| {
            anyhow::anyhow!("Completion API key not set. Set OPENAI_API_KEY or edit config.toml.")
        })?;

        let response = self
            .client
            .post(&self.cached_chat_url)
            .header("Authorization", auth_header)
            .json(&request)
            .send()
            .await
            .context("completion request failed")?;

        if !response.status().is_success() {
            return Err(super::api_error("completion", response).await);
        }

        response
            .json()
            .await
            .context("completion response JSON decode failed")
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    async fn complete(
        &self,
        system_prompt: Option<&str>,
        message: &str,
        model: &str,
        temperature: f64,
    ) -> anyhow::Result<String> {
        let request = Self::build_request(system_prompt, message, model, temperature);
        let chat_response = self.call_api(&request).await?;
        Self::extract_text(&chat_response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const BASE: &str = "https://api.openai.com/v1";

    #[test]
    fn creates_with_key() {
        let p = OpenAiProvider::new(Some("sk-proj-abc123"), BASE);
        assert_eq!(
            p.cached_auth_header.as_deref(),
            Some("Bearer sk-proj-abc123")
        );
        assert_eq!(p.cached_chat_url, format!("{BASE}/chat/completions"));
    }

    #[test]
    fn creates_without_key() {
        let p = OpenAiProvider::new(None, BASE);
        assert!(p.cached_auth_header.is_none());
    }

    #[test]
    fn trailing_slash_in_base_url_is_normalized() {
        let p = OpenAiProvider::new(None, "http://localhost:9999/v1/");
        assert_eq!(p.cached_chat_url, "http://localhost:9999/v1/chat/completions");
    }

    #[tokio::test]
    async fn complete_fails_without_key() {
        let p = OpenAiProvider::new(None, BASE);
        let result = p.complete(None, "hello", "gpt-4o", 0.7).await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("API key not set"));
    }

    #[test]
    fn request_serializes_with_system_message() {
        let req = OpenAiProvider::build_request(Some("You ghostwrite"), "hello", "gpt-4o", 0.7);
        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains("\"role\":\"system\""));
        assert!(json.contains("\"role\":\"user\""));
        assert!(json.contains("gpt-4o"));
    }

    #[test]
    fn request_serializes_without_system() {
        let req = OpenAiProvider::build_request(None, "hello", "gpt-4o", 0.0);
        let json = serde_json::to_string(&req).unwrap();
        assert!(!json.contains("system"));
        assert!(json.contains("\"temperature\":0.0"));
    }

    #[test]
    fn response_deserializes_single_choice() {
        let json = r#"{"choices":[{"message":{"content":"Hi!"}}]}"#;
        let resp: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.choices[0].message.content.as_deref(), Some("Hi!"));
    }

    #[test]
    fn empty_choices_yield_no_text() {
        let resp: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(OpenAiProvider::extract_text(&resp).is_err());
    }

    #[tokio::test]
    async fn complete_round_trips_against_mock_server() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("Authorization", "Bearer sk-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"content": "A drafted post."}}]
            })))
            .mount(&server)
            .await;

        let p = OpenAiProvider::new(Some("sk-test"), &format!("{}/v1", server.uri()));
        let text = p
            .complete(Some("voice"), "write about rust", "gpt-4o", 0.7)
            .await
            .unwrap();
        assert_eq!(text, "A drafted post.");
    }

    #[tokio::test]
    async fn complete_surfaces_api_failure_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
            .mount(&server)
            .await;

        let p = OpenAiProvider::new(Some("sk-test"), &format!("{}/v1", server.uri()));
        let err = p
            .complete(None, "write", "gpt-4o", 0.7)
            .await
            .unwrap_err()
            .to_string();
        assert!(err.contains("500"));
        assert!(err.contains("upstream exploded"));
    }
}
