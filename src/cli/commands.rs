use clap::{Parser, Subcommand};

/// `PostPilot` - personal LinkedIn post automation console.
#[derive(Parser, Debug)]
#[command(name = "postpilot")]
#[command(version = "0.1.0")]
#[command(about = "Draft, review, archive and send LinkedIn posts.", long_about = None)]
pub struct Cli {
    /// With no subcommand the interactive menu runs.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate one post without prompts (cron mode). The topic comes from
    /// the arguments when present, else from the topic backlog.
    Post {
        /// Topic text; remaining words are joined with spaces
        topic: Vec<String>,
    },

    /// Manage the topic backlog
    Topics {
        #[command(subcommand)]
        topics_command: TopicsCommands,
    },

    /// Show configuration and pipeline status
    Status,
}

#[derive(Subcommand, Debug)]
pub enum TopicsCommands {
    /// Append an unused topic to the backlog
    Add {
        /// Topic text; remaining words are joined with spaces
        text: Vec<String>,
    },
    /// List backlog entries with their status
    List,
}

#[cfg(test)]
mod tests {
    use super::{Cli, Commands};
    use clap::{CommandFactory, Parser};

    #[test]
    fn cli_definition_has_no_flag_conflicts() {
        Cli::command().debug_assert();
    }

    #[test]
    fn bare_invocation_has_no_command() {
        let cli = Cli::parse_from(["postpilot"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn post_collects_topic_words() {
        let cli = Cli::parse_from(["postpilot", "post", "rust", "in", "production"]);
        match cli.command {
            Some(Commands::Post { topic }) => {
                assert_eq!(topic, vec!["rust", "in", "production"]);
            }
            other => panic!("unexpected parse: {other:?}"),
        }
    }

    #[test]
    fn unknown_subcommand_is_rejected() {
        assert!(Cli::try_parse_from(["postpilot", "bogus"]).is_err());
    }
}
