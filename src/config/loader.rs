use super::Config;
use anyhow::{Context, Result};
use directories::UserDirs;
use std::fs;

impl Config {
    pub fn load_or_init() -> Result<Self> {
        let home = UserDirs::new()
            .map(|u| u.home_dir().to_path_buf())
            .context("Could not find home directory")?;
        let pilot_dir = home.join(".postpilot");
        let config_path = pilot_dir.join("config.toml");

        if !pilot_dir.exists() {
            fs::create_dir_all(&pilot_dir).context("Failed to create .postpilot directory")?;
        }

        if config_path.exists() {
            let contents =
                fs::read_to_string(&config_path).context("Failed to read config file")?;
            let mut config: Config =
                toml::from_str(&contents).context("Failed to parse config file")?;
            config.config_path.clone_from(&config_path);
            config.home_dir = pilot_dir;
            Ok(config)
        } else {
            let config = Self::with_home(pilot_dir);
            config.save()?;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<()> {
        let toml_str = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&self.config_path, toml_str).context("Failed to write config file")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_and_reload_round_trips_sections() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::with_home(dir.path());
        config.provider.model = "gpt-4o-mini".into();
        config.paths.topics_file = "backlog.md".into();
        config.save().unwrap();

        let contents = fs::read_to_string(dir.path().join("config.toml")).unwrap();
        let mut reloaded: Config = toml::from_str(&contents).unwrap();
        reloaded.home_dir = dir.path().to_path_buf();

        assert_eq!(reloaded.provider.model, "gpt-4o-mini");
        assert_eq!(reloaded.topics_file(), dir.path().join("backlog.md"));
    }
}
