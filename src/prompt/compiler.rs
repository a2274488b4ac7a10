//! Voice-prompt compiler: renders a [`Profile`] into the system instruction
//! handed to the completion service. Pure function of its input; no network
//! or disk access.

use crate::profile::Profile;
use anyhow::{Context, Result};
use tera::Tera;

const VOICE_TEMPLATE: &str = r#"You are a ghostwriter drafting LinkedIn posts{% if name %} for {{ name }}{% endif %}.
{% if headline %}
Professional headline: {{ headline }}
{% endif %}{% if summary %}
About the author:
{{ summary }}
{% endif %}{% if experience %}
Career background:
{% for exp in experience %}- {{ exp.title }}{% if exp.company %} at {{ exp.company }}{% endif %}{% if exp.period %} ({{ exp.period }}){% endif %}
{% endfor %}{% endif %}{% if education %}
Education:
{% for edu in education %}- {{ edu.degree }}{% if edu.school %}, {{ edu.school }}{% endif %}{% if edu.period %} ({{ edu.period }}){% endif %}
{% endfor %}{% endif %}{% if skills %}
Core skills: {{ skills | join(sep=", ") }}
{% endif %}{% if writing_samples %}
The author's recent posts, as voice exemplars. Match their cadence, vocabulary and paragraph rhythm:
{% for sample in writing_samples %}
--- sample {{ loop.index }} ---
{{ sample }}
{% endfor %}
--- end samples ---
{% endif %}
Formatting and tone rules:
- Write in the first person, in the author's established voice.
- Aim for 120 to 220 words: a hook line, two or three short paragraphs, a closing question or call to discussion.
- At most two emoji in the whole post, and only where the author's samples use them.
- At most three hashtags, all at the very end.
- Never open with "I'm excited to announce" or "I'm thrilled".
- No clickbait, no engagement bait ("agree?", "thoughts?" as the entire closer), no bullet-point listicles unless the topic demands one.
- Output only the post text itself: no preamble, no quotation marks around the post, no explanations.
"#;

/// Compile the system/voice instruction from a profile. Deterministic for
/// identical input.
pub fn compile_voice_prompt(profile: &Profile) -> Result<String> {
    let mut tera = Tera::default();
    tera.add_raw_template("voice", VOICE_TEMPLATE)
        .context("voice template failed to parse")?;

    let context =
        tera::Context::from_serialize(profile).context("profile could not enter template")?;
    let rendered = tera
        .render("voice", &context)
        .context("voice template render failed")?;
    Ok(rendered)
}

/// Generic fallback voice used when no export and no saved voice profile
/// exist. Still produced through the same template so formatting rules stay
/// in one place.
pub fn generic_voice_prompt() -> String {
    compile_voice_prompt(&Profile::default())
        .unwrap_or_else(|_| "You are a ghostwriter drafting LinkedIn posts.".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{Experience, Profile};

    fn sample_profile() -> Profile {
        Profile {
            name: "Ada Lovelace".into(),
            headline: "Engineer & writer".into(),
            summary: "I write about computing.".into(),
            experience: vec![Experience {
                title: "Principal Engineer".into(),
                company: "Analytical Engines Ltd".into(),
                period: "Jan 2020 - present".into(),
                summary: String::new(),
            }],
            education: Vec::new(),
            skills: vec!["Mathematics".into(), "Writing".into()],
            writing_samples: vec!["Shipping beats perfecting.".into()],
        }
    }

    #[test]
    fn renders_all_present_sections() {
        let prompt = compile_voice_prompt(&sample_profile()).unwrap();
        assert!(prompt.contains("for Ada Lovelace"));
        assert!(prompt.contains("Professional headline: Engineer & writer"));
        assert!(prompt.contains("Principal Engineer at Analytical Engines Ltd"));
        assert!(prompt.contains("Core skills: Mathematics, Writing"));
        assert!(prompt.contains("Shipping beats perfecting."));
        assert!(prompt.contains("--- sample 1 ---"));
    }

    #[test]
    fn omits_absent_sections() {
        let prompt = compile_voice_prompt(&Profile::default()).unwrap();
        assert!(!prompt.contains("Career background:"));
        assert!(!prompt.contains("Core skills:"));
        assert!(!prompt.contains("voice exemplars"));
        // Formatting rules always present.
        assert!(prompt.contains("Formatting and tone rules:"));
    }

    #[test]
    fn deterministic_for_identical_input() {
        let profile = sample_profile();
        assert_eq!(
            compile_voice_prompt(&profile).unwrap(),
            compile_voice_prompt(&profile).unwrap()
        );
    }

    #[test]
    fn generic_fallback_is_nonempty() {
        let prompt = generic_voice_prompt();
        assert!(prompt.contains("ghostwriter"));
    }
}
