use crate::cli::{Cli, Commands, TopicsCommands};
use crate::config::Config;
use crate::topics::TopicStore;
use crate::ui::style as ui;
use anyhow::Result;

use super::status::render_status;
use super::{interactive, oneshot};

pub async fn dispatch(cli: Cli, config: Config) -> Result<()> {
    match cli.command {
        // Bare invocation: the interactive menu.
        None => interactive::run_menu(&config).await,

        Some(Commands::Post { topic }) => oneshot::run(&config, &topic).await,

        Some(Commands::Topics { topics_command }) => handle_topics(topics_command, &config),

        Some(Commands::Status) => {
            println!("{}", render_status(&config));
            Ok(())
        }
    }
}

fn handle_topics(command: TopicsCommands, config: &Config) -> Result<()> {
    let store = TopicStore::new(config.topics_file());
    match command {
        TopicsCommands::Add { text } => {
            let text = text.join(" ").trim().to_string();
            if text.is_empty() {
                anyhow::bail!("topic text cannot be empty");
            }
            store.append(&text)?;
            println!("  {} {}", ui::success("✓"), t!("topics.added", topic = text));
            Ok(())
        }
        TopicsCommands::List => {
            let entries = store.entries()?;
            if entries.is_empty() {
                println!("  {}", ui::dim(t!("topics.empty")));
                return Ok(());
            }
            println!("  {}", ui::header(t!("topics.list_header")));
            for entry in entries {
                let glyph = match entry.status {
                    crate::topics::TopicStatus::Unused => ui::success("·"),
                    crate::topics::TopicStatus::Used => ui::dim("✓"),
                };
                println!("  {glyph} [{}] {}", entry.status, entry.text);
            }
            Ok(())
        }
    }
}
