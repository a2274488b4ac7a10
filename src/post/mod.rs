mod archive;
mod generator;

pub use archive::PostArchive;
pub use generator::PostGenerator;

use chrono::{DateTime, Local};
use std::path::PathBuf;

/// One drafted post. Revisions replace `body` wholesale; no version history
/// is kept. A post that is never archived is simply discarded.
#[derive(Debug, Clone)]
pub struct GeneratedPost {
    pub topic: String,
    pub body: String,
    pub image_path: Option<PathBuf>,
    pub created_at: DateTime<Local>,
}

impl GeneratedPost {
    pub fn new(topic: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            body: body.into(),
            image_path: None,
            created_at: Local::now(),
        }
    }

    pub fn with_image(mut self, image_path: Option<PathBuf>) -> Self {
        self.image_path = image_path;
        self
    }
}
