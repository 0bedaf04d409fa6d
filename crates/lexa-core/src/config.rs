//! Configuration management for Lexa.
//!
//! Loads configuration from ${LEXA_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::DEFAULT_BASE_URL;

pub mod paths {
    //! Path resolution for Lexa configuration and data directories.
    //!
    //! LEXA_HOME resolution order:
    //! 1. LEXA_HOME environment variable (if set)
    //! 2. ~/.config/lexa (default)

    use std::path::PathBuf;

    /// Returns the Lexa home directory.
    ///
    /// Checks LEXA_HOME env var first, falls back to ~/.config/lexa
    pub fn lexa_home() -> PathBuf {
        if let Ok(home) = std::env::var("LEXA_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir()
            .map(|h| h.join(".config").join("lexa"))
            .expect("Could not determine home directory")
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        lexa_home().join("config.toml")
    }

    /// Returns the path to the persisted user profile.
    pub fn profile_path() -> PathBuf {
        lexa_home().join("profile.toml")
    }

    /// Returns the directory for log files.
    pub fn logs_dir() -> PathBuf {
        lexa_home().join("logs")
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend API base URL.
    pub base_url: String,

    /// API key for the backend (optional, LEXA_API_KEY takes precedence).
    pub api_key: Option<String>,

    /// Default jurisdiction for the chat advisor.
    pub jurisdiction: String,

    /// Default country for intake and document prefill.
    pub country: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            jurisdiction: Self::DEFAULT_JURISDICTION.to_string(),
            country: Self::DEFAULT_COUNTRY.to_string(),
        }
    }
}

impl Config {
    pub const DEFAULT_JURISDICTION: &str = "FR";
    pub const DEFAULT_COUNTRY: &str = "France";

    /// Loads configuration from the default config path.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from `path`, falling back to defaults when the
    /// file is missing. A partial file fills unset fields from defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Returns the effective base URL for API requests.
    ///
    /// The LEXA_BASE_URL environment variable wins over the config file.
    pub fn effective_base_url(&self) -> String {
        std::env::var("LEXA_BASE_URL").unwrap_or_else(|_| self.base_url.clone())
    }

    /// Returns the effective API key, if any.
    ///
    /// The LEXA_API_KEY environment variable wins over the config file.
    pub fn effective_api_key(&self) -> Option<String> {
        std::env::var("LEXA_API_KEY")
            .ok()
            .filter(|k| !k.is_empty())
            .or_else(|| self.api_key.clone().filter(|k| !k.is_empty()))
    }

    /// Saves only the jurisdiction field to the config file.
    ///
    /// Creates the file if it doesn't exist.
    /// Preserves existing fields and comments using toml_edit.
    pub fn save_jurisdiction(jurisdiction: &str) -> Result<()> {
        Self::save_jurisdiction_to(&paths::config_path(), jurisdiction)
    }

    /// Saves only the jurisdiction field to a specific config file path.
    pub fn save_jurisdiction_to(path: &Path, jurisdiction: &str) -> Result<()> {
        use toml_edit::{DocumentMut, value};

        let contents = if path.exists() {
            fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?
        } else {
            default_config_template().to_string()
        };

        let mut doc: DocumentMut = contents
            .parse()
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;

        doc["jurisdiction"] = value(jurisdiction);

        Self::write_config(path, &doc.to_string())
    }

    /// Writes the commented template to `path`.
    /// Refuses to overwrite an existing file.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        Self::write_config(path, default_config_template())
    }

    /// Renders a config TOML from `Config::default()`.
    ///
    /// The embedded template provides the structure and comments; generated
    /// values are merged over it.
    pub fn generate() -> Result<String> {
        use toml_edit::{DocumentMut, Item};

        let config = Config::default();
        let generated_toml =
            toml::to_string(&config).context("Failed to serialize default config to TOML")?;

        // The template is the base document so its comments survive
        let mut doc: DocumentMut = default_config_template()
            .parse()
            .context("Failed to parse default config template")?;

        let generated_doc: DocumentMut = generated_toml
            .parse()
            .context("Failed to parse generated config")?;

        for (key, item) in generated_doc.as_table() {
            if let Item::Value(v) = item {
                doc[key] = Item::Value(v.clone());
            }
        }

        Ok(doc.to_string())
    }

    /// Writes `content` to `path` atomically (temp file + rename),
    /// creating parent directories first.
    fn write_config(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!("Failed to move config into place at {}", path.display())
        })
    }
}

/// The commented config template written by `lexa config init`.
fn default_config_template() -> &'static str {
    r#"# Lexa configuration.
# Commented entries show their default values.

# Backend API base URL.
base_url = "https://api.lexa.legal"

# API key for the backend. The LEXA_API_KEY environment variable
# takes precedence over this value.
# api_key = ""

# Default jurisdiction for the chat advisor.
jurisdiction = "FR"

# Default country for intake and document prefill.
country = "France"
"#
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    /// A missing file loads as pure defaults.
    #[test]
    fn test_load_missing_file_returns_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("nonexistent.toml");

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.jurisdiction, "FR");
        assert_eq!(config.country, "France");
        assert_eq!(config.api_key, None);
    }

    /// A partial file keeps defaults for the fields it omits.
    #[test]
    fn test_load_partial_config_merges_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        fs::write(&config_path, "jurisdiction = \"BE\"\n").unwrap();

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.jurisdiction, "BE");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.country, "France");
    }

    /// `init` writes the template, creating parent dirs on the way.
    #[test]
    fn test_init_creates_config_with_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("subdir").join("config.toml");

        Config::init(&config_path).unwrap();

        assert!(config_path.exists());
        let contents = fs::read_to_string(&config_path).unwrap();
        assert!(contents.contains("api.lexa.legal"));
        assert!(contents.contains("# api_key ="));
    }

    /// `init` never overwrites silently.
    #[test]
    fn test_init_fails_if_exists() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        fs::write(&config_path, "").unwrap();

        let result = Config::init(&config_path);
        assert!(result.is_err());
    }

    /// Single-field save preserves other fields and comments.
    #[test]
    fn test_save_jurisdiction_preserves_existing_fields() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        fs::write(
            &config_path,
            "# my note\nbase_url = \"https://proxy.example.com\"\njurisdiction = \"FR\"\n",
        )
        .unwrap();

        Config::save_jurisdiction_to(&config_path, "BE").unwrap();

        let contents = fs::read_to_string(&config_path).unwrap();
        assert!(contents.contains("# my note"));
        assert!(contents.contains("proxy.example.com"));

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.jurisdiction, "BE");
        assert_eq!(config.base_url, "https://proxy.example.com");
    }

    /// Single-field save creates the file from the template when missing.
    #[test]
    fn test_save_jurisdiction_creates_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        Config::save_jurisdiction_to(&config_path, "CH").unwrap();

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.jurisdiction, "CH");
    }

    /// Generated config parses back into default values.
    #[test]
    fn test_generate_round_trips_defaults() {
        let generated = Config::generate().unwrap();
        let config: Config = toml::from_str(&generated).unwrap();
        assert_eq!(config.base_url, Config::default().base_url);
        assert_eq!(config.jurisdiction, Config::default().jurisdiction);
    }
}
