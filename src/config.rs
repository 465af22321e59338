use crate::analyzer::{ChangeMapping, Section, Sections, DEFAULT_TYPE};
use crate::domain::{deduct, ChangeType, Strategy};
use crate::error::{CcsError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// File name looked up in the working directory
pub const CONFIG_FILE: &str = "gitccs.toml";
/// File name looked up in the user config directory
pub const USER_CONFIG_FILE: &str = ".gitccs.toml";

/// Represents the complete configuration for git-ccs.
///
/// Contains commit type mappings, the pre-release format and changelog layout.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub mapping: MappingConfig,

    #[serde(default)]
    pub pre_release: PreReleaseConfig,

    #[serde(default)]
    pub changes: ChangesConfig,
}

/// Additional commit types per change type, applied on top of the built-in mapping
/// (`feat` minor, `fix` and everything else patch).
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct MappingConfig {
    #[serde(default)]
    pub none: Vec<String>,

    #[serde(default)]
    pub patch: Vec<String>,

    #[serde(default)]
    pub minor: Vec<String>,

    #[serde(default)]
    pub major: Vec<String>,
}

impl MappingConfig {
    /// Built-in mapping extended by the configured types, in none/patch/minor/major order
    pub fn change_mapping(&self) -> ChangeMapping {
        ChangeMapping::default()
            .add(ChangeType::None, self.none.iter().cloned())
            .add(ChangeType::Patch, self.patch.iter().cloned())
            .add(ChangeType::Minor, self.minor.iter().cloned())
            .add(ChangeType::Major, self.major.iter().cloned())
    }
}

/// Returns the default pre-release format, a counter keyed `SNAPSHOT`.
fn default_pre_release_format() -> String {
    "SNAPSHOT.1".to_string()
}

/// Configuration for pre-release versions.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PreReleaseConfig {
    /// Example indicator the strategy is deduced from, e.g. `RC.1` or `alpha.1.snap`
    #[serde(default = "default_pre_release_format")]
    pub format: String,
}

impl Default for PreReleaseConfig {
    fn default() -> Self {
        PreReleaseConfig {
            format: default_pre_release_format(),
        }
    }
}

impl PreReleaseConfig {
    pub fn strategy(&self) -> Result<Box<dyn Strategy>> {
        deduct(&self.format)
    }
}

fn default_breaking_changes() -> String {
    crate::analyzer::sections::BREAKING_CHANGES.to_string()
}

fn default_level() -> u8 {
    2
}

fn default_sections() -> Vec<SectionConfig> {
    vec![
        SectionConfig::new("Features", &["feat"]),
        SectionConfig::new("Bugfixes", &["fix"]),
        SectionConfig::new("Other", &[DEFAULT_TYPE]),
    ]
}

/// One changelog section
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SectionConfig {
    pub headline: String,
    pub types: Vec<String>,
}

impl SectionConfig {
    fn new(headline: &str, types: &[&str]) -> Self {
        SectionConfig {
            headline: headline.to_string(),
            types: types.iter().map(|t| t.to_string()).collect(),
        }
    }
}

/// Configuration for the Markdown changelog.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ChangesConfig {
    #[serde(default = "default_breaking_changes")]
    pub breaking_changes: String,

    /// Markdown headline level, 1 to 7
    #[serde(default = "default_level")]
    pub level: u8,

    #[serde(default = "default_sections")]
    pub sections: Vec<SectionConfig>,
}

impl Default for ChangesConfig {
    fn default() -> Self {
        ChangesConfig {
            breaking_changes: default_breaking_changes(),
            level: default_level(),
            sections: default_sections(),
        }
    }
}

impl ChangesConfig {
    pub fn sections(&self) -> Sections {
        self.sections
            .iter()
            .fold(Sections::empty(), |sections, s| {
                sections.with_section(Section::new(s.headline.clone(), s.types.iter().cloned()))
            })
            .with_breaking_changes(self.breaking_changes.clone())
    }
}

/// Check a Markdown headline level
pub fn validate_level(level: u8) -> Result<u8> {
    if (1..=7).contains(&level) {
        Ok(level)
    } else {
        Err(CcsError::config(format!(
            "headline level must be between 1 and 7, got {}",
            level
        )))
    }
}

impl Config {
    /// Reject values that would only fail later, such as an unusable pre-release format
    pub fn validate(&self) -> Result<()> {
        validate_level(self.changes.level)?;
        self.pre_release.strategy()?;
        Ok(())
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `gitccs.toml` in current directory
/// 3. `.gitccs.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read, parsed or validated
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        debug!(path, "loading configuration");
        fs::read_to_string(path)?
    } else if Path::new(CONFIG_FILE).exists() {
        debug!(path = CONFIG_FILE, "loading configuration");
        fs::read_to_string(CONFIG_FILE)?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(USER_CONFIG_FILE);
        if config_path.exists() {
            debug!(path = %config_path.display(), "loading configuration");
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    let config: Config = toml::from_str(&config_str)?;
    config.validate()?;
    Ok(config)
}
