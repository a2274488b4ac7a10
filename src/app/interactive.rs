//! Interactive workflow.
//!
//! The review loop is an explicit state machine (await topic, generated,
//! satisfied) whose inputs arrive through the [`ReviewPrompt`] seam, so the
//! same loop runs against the console or a scripted test harness. A failed
//! generation or revision reports the error and leaves the previous body
//! intact; only accepting a draft leaves the loop.

use super::pipeline;
use crate::config::Config;
use crate::post::{GeneratedPost, PostGenerator};
use crate::ui::style as ui;
use anyhow::Result;
use dialoguer::{Input, Select};

/// Operator choice while a draft exists.
#[derive(Debug, Clone)]
pub enum ReviewAction {
    /// Amend the current draft with a change instruction.
    Revise(String),
    /// Throw the draft away and generate for a new topic.
    Regenerate(String),
    /// Keep the draft: triggers illustration, archiving and notification.
    Accept,
}

/// Input source for the review loop.
pub trait ReviewPrompt {
    /// Topic for the first draft. `None` cancels the run.
    fn initial_topic(&mut self) -> Result<Option<String>>;

    /// Next action while a draft exists; `current_body` is shown to the
    /// operator beforehand.
    fn next_action(&mut self, current_body: &str) -> Result<ReviewAction>;
}

/// Drive one post from topic to acceptance. Returns `None` when the
/// operator cancels before a first draft exists.
pub async fn run_review(
    generator: &PostGenerator,
    voice_prompt: &str,
    prompt: &mut dyn ReviewPrompt,
) -> Result<Option<GeneratedPost>> {
    let Some(mut topic) = prompt.initial_topic()? else {
        return Ok(None);
    };

    let mut body = generator.generate(voice_prompt, &topic).await?;

    loop {
        match prompt.next_action(&body)? {
            ReviewAction::Revise(instructions) => {
                match generator.revise(voice_prompt, &body, &instructions).await {
                    Ok(revised) => body = revised,
                    Err(e) => {
                        println!("  {} {}", ui::error("✗"), t!("review.revision_failed", error = e));
                    }
                }
            }
            ReviewAction::Regenerate(new_topic) => {
                match generator.generate(voice_prompt, &new_topic).await {
                    Ok(regenerated) => {
                        body = regenerated;
                        topic = new_topic;
                    }
                    Err(e) => {
                        println!("  {} {}", ui::error("✗"), t!("review.generation_failed", error = e));
                    }
                }
            }
            ReviewAction::Accept => {
                return Ok(Some(GeneratedPost::new(topic, body)));
            }
        }
    }
}

/// Console-backed [`ReviewPrompt`].
struct ConsolePrompt;

impl ReviewPrompt for ConsolePrompt {
    fn initial_topic(&mut self) -> Result<Option<String>> {
        let topic: String = Input::new()
            .with_prompt(format!("  {}", t!("review.topic_prompt")))
            .allow_empty(true)
            .interact_text()?;
        let topic = topic.trim().to_string();
        Ok(if topic.is_empty() { None } else { Some(topic) })
    }

    fn next_action(&mut self, current_body: &str) -> Result<ReviewAction> {
        println!();
        println!("  {}", ui::header(t!("review.draft_header")));
        println!();
        for line in current_body.lines() {
            println!("  {line}");
        }
        println!();

        let choices = [
            t!("review.action_revise"),
            t!("review.action_regenerate"),
            t!("review.action_accept"),
        ];
        let choice = Select::new()
            .with_prompt(format!("  {}", t!("review.action_prompt")))
            .items(&choices)
            .default(2)
            .interact()?;

        match choice {
            0 => {
                let instructions: String = Input::new()
                    .with_prompt(format!("  {}", t!("review.revise_prompt")))
                    .interact_text()?;
                Ok(ReviewAction::Revise(instructions))
            }
            1 => {
                let new_topic: String = Input::new()
                    .with_prompt(format!("  {}", t!("review.regenerate_prompt")))
                    .interact_text()?;
                Ok(ReviewAction::Regenerate(new_topic))
            }
            _ => Ok(ReviewAction::Accept),
        }
    }
}

/// Top-level interactive menu. Every failure prints one diagnostic line and
/// falls through to the next menu iteration.
pub async fn run_menu(config: &Config) -> Result<()> {
    println!();
    println!("  {} {}", ui::accent("◆"), ui::header(t!("menu.title")));
    println!();

    loop {
        let choices = [
            t!("menu.option_voice"),
            t!("menu.option_post"),
            t!("menu.option_exit"),
        ];
        let choice = Select::new()
            .with_prompt(format!("  {}", t!("menu.prompt")))
            .items(&choices)
            .default(1)
            .interact()?;

        match choice {
            0 => {
                if let Err(e) = generate_voice_profile(config) {
                    println!("  {} {e}", ui::error("✗"));
                }
            }
            1 => {
                if let Err(e) = generate_post(config).await {
                    println!("  {} {e}", ui::error("✗"));
                }
            }
            _ => return Ok(()),
        }
        println!();
    }
}

fn generate_voice_profile(config: &Config) -> Result<()> {
    println!("  {}", ui::dim(t!("voice.extracting")));
    pipeline::build_voice_profile(config)?;
    println!(
        "  {} {}",
        ui::success("✓"),
        t!("voice.saved", path = config.voice_profile_path().display())
    );
    Ok(())
}

async fn generate_post(config: &Config) -> Result<()> {
    let voice_prompt = pipeline::load_voice_prompt(config);
    let generator = pipeline::build_generator(config)?;

    let Some(post) = run_review(&generator, &voice_prompt, &mut ConsolePrompt).await? else {
        println!("  {}", ui::dim(t!("review.cancelled")));
        return Ok(());
    };

    let post = pipeline::illustrate(config, post).await;
    if let Some(image) = &post.image_path {
        println!(
            "  {} {}",
            ui::success("✓"),
            t!("review.image_saved", path = image.display())
        );
    }

    pipeline::archive(config, &post)?;
    println!(
        "  {} {}",
        ui::success("✓"),
        t!("review.archived", path = config.archive_file().display())
    );

    // Mail is a courtesy in interactive mode; the archive already holds the
    // post, so a delivery problem does not unwind anything.
    if config.email.is_some() {
        match pipeline::notify(config, &post) {
            Ok(()) => println!("  {} {}", ui::success("✓"), t!("review.emailed")),
            Err(e) => println!("  {} {}", ui::warn("!"), t!("review.email_failed", error = e)),
        }
    }

    Ok(())
}
