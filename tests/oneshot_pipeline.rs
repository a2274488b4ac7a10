//! One-shot workflow against a scripted completion endpoint.

use postpilot::Config;
use postpilot::app::oneshot;
use std::fs;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_against(server: &MockServer) -> (tempfile::TempDir, Config) {
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::with_home(dir.path());
    config.provider.api_key = Some("sk-test".into());
    config.provider.base_url = format!("{}/v1", server.uri());
    config.image.base_url = format!("{}/v1", server.uri());
    (dir, config)
}

fn mock_completion(body: &str) -> Mock {
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [{"message": {"content": body}}]
        })))
}

#[tokio::test]
async fn archive_happens_before_mail_failure_is_reported() {
    let server = MockServer::start().await;
    mock_completion("A generated post body.").mount(&server).await;

    let (_dir, config) = config_against(&server);
    fs::write(config.topics_file(), "**TOPIC** Rust in production\n").unwrap();

    // No [email] section: delivery fails loudly after the archive write.
    let result = oneshot::run(&config, &[]).await;
    assert!(result.is_err());

    let archive = fs::read_to_string(config.archive_file()).unwrap();
    assert!(archive.contains("**Topic:** Rust in production"));
    assert!(archive.contains("A generated post body."));

    // The claim is consumed regardless.
    let topics = fs::read_to_string(config.topics_file()).unwrap();
    assert_eq!(topics, "**USED** Rust in production\n");
}

#[tokio::test]
async fn explicit_topic_argument_bypasses_the_store() {
    let server = MockServer::start().await;
    mock_completion("Another body.").mount(&server).await;

    let (_dir, config) = config_against(&server);
    fs::write(config.topics_file(), "**TOPIC** Stored topic\n").unwrap();

    let _ = oneshot::run(&config, &["explicit".to_string(), "topic".to_string()]).await;

    let archive = fs::read_to_string(config.archive_file()).unwrap();
    assert!(archive.contains("**Topic:** explicit topic"));
    assert_eq!(
        fs::read_to_string(config.topics_file()).unwrap(),
        "**TOPIC** Stored topic\n"
    );
}

#[tokio::test]
async fn generation_failure_aborts_before_archiving() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let (_dir, config) = config_against(&server);
    fs::write(config.topics_file(), "**TOPIC** Doomed topic\n").unwrap();

    let result = oneshot::run(&config, &[]).await;
    assert!(result.is_err());
    assert!(!config.archive_file().exists());
}

#[tokio::test]
async fn image_failure_never_blocks_archiving() {
    let server = MockServer::start().await;
    mock_completion("Body without image.").mount(&server).await;
    Mock::given(method("POST"))
        .and(path("/v1/images/generations"))
        .respond_with(ResponseTemplate::new(503).set_body_string("image service down"))
        .mount(&server)
        .await;

    let (_dir, config) = config_against(&server);

    let _ = oneshot::run(&config, &["topic".to_string()]).await;

    let archive = fs::read_to_string(config.archive_file()).unwrap();
    assert!(archive.contains("Body without image."));
    assert!(!archive.contains("**Image:**"));
}

#[tokio::test]
async fn empty_backlog_and_no_argument_aborts() {
    let server = MockServer::start().await;
    let (_dir, config) = config_against(&server);

    let result = oneshot::run(&config, &[]).await;
    assert!(result.is_err());
    assert!(!config.archive_file().exists());
}
