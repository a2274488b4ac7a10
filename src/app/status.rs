use crate::config::Config;
use crate::post::PostArchive;
use crate::topics::{TopicStatus, TopicStore};

/// Read-only diagnostics: where things live, what is configured, how much
/// backlog is left.
pub fn render_status(config: &Config) -> String {
    let entries = TopicStore::new(config.topics_file())
        .entries()
        .unwrap_or_default();
    let unused = entries
        .iter()
        .filter(|e| e.status == TopicStatus::Unused && !e.text.is_empty())
        .count();
    let used = entries
        .iter()
        .filter(|e| e.status == TopicStatus::Used)
        .count();
    let archived = PostArchive::new(config.archive_file()).entry_count();

    let configured = |present: bool| -> String {
        if present {
            t!("status.configured").into_owned()
        } else {
            t!("status.missing").into_owned()
        }
    };

    let lines = vec![
        format!("◆ {}", t!("status.title")),
        String::new(),
        format!("  {}        {}", t!("status.version"), env!("CARGO_PKG_VERSION")),
        format!(
            "  {}         {}",
            t!("status.config"),
            config.config_path.display()
        ),
        String::new(),
        format!("  {}          {}", t!("status.model"), config.provider.model),
        format!(
            "  {} {}",
            t!("status.completion_key"),
            configured(config.completion_api_key().is_some())
        ),
        format!(
            "  {}      {}",
            t!("status.image_model"),
            config.image.model
        ),
        format!(
            "  {}          {}",
            t!("status.email"),
            configured(config.email.is_some())
        ),
        String::new(),
        format!(
            "  {}         {} ({})",
            t!("status.topics"),
            config.topics_file().display(),
            t!("status.topic_counts", unused = unused, used = used)
        ),
        format!(
            "  {}        {} ({})",
            t!("status.archive"),
            config.archive_file().display(),
            t!("status.archive_count", count = archived)
        ),
        format!(
            "  {}          {}",
            t!("status.voice"),
            configured(config.voice_profile_path().exists())
        ),
    ];

    lines.join("\n")
}
