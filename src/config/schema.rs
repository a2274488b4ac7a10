use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Base directory (`~/.postpilot`) - computed from home, not serialized
    #[serde(skip)]
    pub home_dir: PathBuf,
    /// Path to config.toml - computed from home, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,

    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub image: ImageConfig,

    #[serde(default)]
    pub email: Option<EmailConfig>,

    #[serde(default)]
    pub paths: PathsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".into()
}

fn default_model() -> String {
    "gpt-4o".into()
}

fn default_temperature() -> f64 {
    0.7
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            temperature: default_temperature(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_image_model")]
    pub model: String,
    #[serde(default = "default_image_size")]
    pub size: String,
}

fn default_image_model() -> String {
    "dall-e-3".into()
}

fn default_image_size() -> String {
    "1024x1024".into()
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            model: default_image_model(),
            size: default_image_size(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    pub smtp_host: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    #[serde(default = "default_true")]
    pub smtp_tls: bool,
    pub username: String,
    pub password: String,
    pub from_address: String,
    pub to_address: String,
}

fn default_smtp_port() -> u16 {
    587
}

fn default_true() -> bool {
    true
}

/// Pipeline file locations. Relative entries resolve under the `~/.postpilot`
/// base directory; absolute and `~`-prefixed entries are used as given.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_topics_file")]
    pub topics_file: String,
    #[serde(default = "default_archive_file")]
    pub archive_file: String,
    #[serde(default = "default_image_dir")]
    pub image_dir: String,
    #[serde(default = "default_export_dir")]
    pub export_dir: String,
    #[serde(default = "default_voice_profile")]
    pub voice_profile: String,
}

fn default_topics_file() -> String {
    "topics.md".into()
}

fn default_archive_file() -> String {
    "posts.md".into()
}

fn default_image_dir() -> String {
    "images".into()
}

fn default_export_dir() -> String {
    "linkedin-export".into()
}

fn default_voice_profile() -> String {
    "voice_profile.md".into()
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            topics_file: default_topics_file(),
            archive_file: default_archive_file(),
            image_dir: default_image_dir(),
            export_dir: default_export_dir(),
            voice_profile: default_voice_profile(),
        }
    }
}

impl Config {
    /// Build a config rooted at an explicit base directory instead of the
    /// user's home. Used by tests and scripted runs.
    pub fn with_home(home_dir: impl Into<PathBuf>) -> Self {
        let home_dir = home_dir.into();
        Self {
            config_path: home_dir.join("config.toml"),
            home_dir,
            ..Self::default()
        }
    }

    fn resolve(&self, raw: &str) -> PathBuf {
        let expanded = shellexpand::tilde(raw);
        let path = Path::new(expanded.as_ref());
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.home_dir.join(path)
        }
    }

    pub fn topics_file(&self) -> PathBuf {
        self.resolve(&self.paths.topics_file)
    }

    pub fn archive_file(&self) -> PathBuf {
        self.resolve(&self.paths.archive_file)
    }

    pub fn image_dir(&self) -> PathBuf {
        self.resolve(&self.paths.image_dir)
    }

    pub fn export_dir(&self) -> PathBuf {
        self.resolve(&self.paths.export_dir)
    }

    pub fn voice_profile_path(&self) -> PathBuf {
        self.resolve(&self.paths.voice_profile)
    }

    /// API key for the completion endpoint: config value, else `OPENAI_API_KEY`.
    pub fn completion_api_key(&self) -> Option<String> {
        self.provider
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| {
                std::env::var("OPENAI_API_KEY")
                    .ok()
                    .filter(|k| !k.trim().is_empty())
            })
    }

    /// API key for the image endpoint, falling back to the completion key.
    pub fn image_api_key(&self) -> Option<String> {
        self.image
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.completion_api_key())
    }
}
