//! One-shot workflow for unattended runs (cron, scripts).
//!
//! A straight pipeline with no branching state: resolve topic, generate,
//! illustrate (best effort), archive, mail. A failure before the archive
//! write aborts the run; the archive write itself is attempted even when
//! imaging failed; a mail failure is reported after the fact and never
//! unwinds the archive.

use super::pipeline;
use crate::config::Config;
use crate::post::GeneratedPost;
use crate::topics::TopicStore;
use crate::ui::style as ui;
use crate::utils::truncate_with_ellipsis;
use anyhow::{Result, bail};

pub async fn run(config: &Config, topic_args: &[String]) -> Result<()> {
    let topic = resolve_topic(config, topic_args)?;
    println!("  {} {}", ui::accent("›"), t!("oneshot.topic", topic = ui::value(&topic)));

    let voice_prompt = pipeline::load_voice_prompt(config);
    let generator = pipeline::build_generator(config)?;
    let body = generator.generate(&voice_prompt, &topic).await?;
    println!(
        "  {} {}",
        ui::accent("›"),
        t!("oneshot.generated", preview = truncate_with_ellipsis(&body, 80))
    );

    let post = pipeline::illustrate(config, GeneratedPost::new(topic, body)).await;
    match &post.image_path {
        Some(path) => println!(
            "  {} {}",
            ui::accent("›"),
            t!("oneshot.image", path = path.display())
        ),
        None => println!("  {} {}", ui::dim("›"), t!("oneshot.no_image")),
    }

    pipeline::archive(config, &post)?;
    println!(
        "  {} {}",
        ui::success("✓"),
        t!("oneshot.archived", path = config.archive_file().display())
    );

    // The archive write is durable at this point; a delivery failure is
    // reported through the non-zero exit, nothing is rolled back.
    pipeline::notify(config, &post)?;
    println!("  {} {}", ui::success("✓"), t!("oneshot.emailed"));

    Ok(())
}

fn resolve_topic(config: &Config, topic_args: &[String]) -> Result<String> {
    if !topic_args.is_empty() {
        let joined = topic_args.join(" ").trim().to_string();
        if !joined.is_empty() {
            return Ok(joined);
        }
    }

    let store = TopicStore::new(config.topics_file());
    match store.claim_next() {
        Some(topic) => Ok(topic),
        None => bail!(
            "no unused topic available in {}",
            config.topics_file().display()
        ),
    }
}
