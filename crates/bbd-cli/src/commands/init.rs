//! Init command for writing a starter config file.

use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::config;

const STARTER: &str = r#"# Baby Buddy dashboard configuration.
#
# Every value can also be set via BBD_-prefixed environment variables,
# e.g. BBD_API_KEY overrides api_key.

# Base URL of your Baby Buddy server.
base_url = ""

# API token from Baby Buddy's user settings page.
api_key = ""

# Seconds between full-data refreshes in `bbd watch`.
refresh_interval_secs = 30

# Unit labels for display: "metric" or "imperial".
units = "metric"
"#;

/// Writes the starter config to `path`. Returns `false` when the file
/// already exists and `force` is not set.
pub fn write_starter(path: &Path, force: bool) -> Result<bool> {
    if path.exists() && !force {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, STARTER).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(true)
}

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    let Some(path) = config::config_file_path() else {
        bail!("could not determine the config directory");
    };

    if write_starter(&path, force)? {
        println!("Wrote starter config to {}", path.display());
        println!("Fill in base_url and api_key, then run `bbd status`.");
    } else {
        println!(
            "Config already exists at {} (use --force to overwrite)",
            path.display()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_parseable_starter_config() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("bbd").join("config.toml");

        assert!(write_starter(&path, false).unwrap());
        let written = std::fs::read_to_string(&path).unwrap();
        let parsed: crate::Config = toml_parse(&written);
        assert_eq!(parsed.refresh_interval_secs, 30);
        assert!(parsed.base_url.is_empty());
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "base_url = \"https://kept.example.com\"").unwrap();

        assert!(!write_starter(&path, false).unwrap());
        let kept = std::fs::read_to_string(&path).unwrap();
        assert!(kept.contains("kept.example.com"));

        assert!(write_starter(&path, true).unwrap());
        let replaced = std::fs::read_to_string(&path).unwrap();
        assert!(!replaced.contains("kept.example.com"));
    }

    fn toml_parse(text: &str) -> crate::Config {
        use figment::Figment;
        use figment::providers::{Format, Serialized, Toml};

        Figment::from(Serialized::defaults(crate::Config::default()))
            .merge(Toml::string(text))
            .extract()
            .unwrap()
    }
}
