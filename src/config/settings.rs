//! Configuration file support for sg-toolbox

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const LOCAL_CONFIG: &str = ".sg-toolbox.toml";

/// Main configuration structure
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Settings {
    #[serde(default)]
    pub defaults: Defaults,

    #[serde(default)]
    pub labels: Labels,

    #[serde(default)]
    pub behavior: Behavior,
}

/// Default values for flags not given on the command line
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Defaults {
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Kubeconfig to use when neither --kubeconfig nor KUBECONFIG is set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kubeconfig: Option<String>,

    /// Row list file used by --row filters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_file: Option<String>,
}

/// Label used to take storage-group pods in and out of service
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Labels {
    #[serde(default = "default_active_key")]
    pub active_key: String,

    #[serde(default = "default_enabled_value")]
    pub enabled_value: String,

    #[serde(default = "default_disabled_value")]
    pub disabled_value: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Behavior {
    #[serde(default = "default_true")]
    pub confirm_destructive: bool,

    #[serde(default = "default_true")]
    pub show_progress: bool,
}

fn default_namespace() -> String {
    "storagepod".to_string()
}

fn default_active_key() -> String {
    "active".to_string()
}

fn default_enabled_value() -> String {
    "enable".to_string()
}

fn default_disabled_value() -> String {
    "disable".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            kubeconfig: None,
            row_file: None,
        }
    }
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            active_key: default_active_key(),
            enabled_value: default_enabled_value(),
            disabled_value: default_disabled_value(),
        }
    }
}

impl Default for Behavior {
    fn default() -> Self {
        Self {
            confirm_destructive: default_true(),
            show_progress: default_true(),
        }
    }
}

impl Settings {
    /// Load settings from the first config file found, or defaults.
    /// A file that fails to parse is reported and ignored.
    pub fn load() -> Self {
        match Self::find_config_file() {
            Some(path) => Self::load_from_file(&path).unwrap_or_else(|e| {
                crate::log_warn!("{:#}, using defaults", e);
                Self::default()
            }),
            None => Self::default(),
        }
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(settings)
    }

    /// Find config file in standard locations
    /// Priority:
    /// 1. .sg-toolbox.toml in current directory
    /// 2. <config dir>/sg-toolbox/config.toml
    pub fn find_config_file() -> Option<PathBuf> {
        let local_config = PathBuf::from(LOCAL_CONFIG);
        if local_config.exists() {
            return Some(local_config);
        }

        Self::user_config_path().filter(|p| p.exists())
    }

    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("sg-toolbox").join("config.toml"))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self).context("Failed to serialize settings")?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Example config file content
    pub fn example_config() -> String {
        let header = "# sg-toolbox configuration file\n\
                      # Place this file at ~/.config/sg-toolbox/config.toml or .sg-toolbox.toml in your working directory\n\n";

        let body = toml::to_string_pretty(&Settings::default()).unwrap_or_default();
        let hints = "\n# Optional:\n\
                     # [defaults]\n\
                     # kubeconfig = \"/home/ops/.kube/config\"\n\
                     # row_file = \"/etc/sg/rows.txt\"\n";

        format!("{}{}{}", header, body, hints)
    }
}
