mod extractor;

pub use extractor::extract;

use serde::Serialize;

/// Normalized writing-style and biography data derived from a LinkedIn data
/// export. Assembled once per run, read-only afterwards; its only consumer
/// is the voice-prompt compiler.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Profile {
    pub name: String,
    pub headline: String,
    pub summary: String,
    pub experience: Vec<Experience>,
    pub education: Vec<Education>,
    pub skills: Vec<String>,
    pub writing_samples: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Experience {
    pub title: String,
    pub company: String,
    pub period: String,
    pub summary: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Education {
    pub school: String,
    pub degree: String,
    pub period: String,
}

impl Profile {
    /// True when the export produced nothing usable for voice compilation.
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
            && self.headline.is_empty()
            && self.summary.is_empty()
            && self.experience.is_empty()
            && self.skills.is_empty()
            && self.writing_samples.is_empty()
    }
}
