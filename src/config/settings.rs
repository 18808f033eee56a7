//! User configuration settings
//!
//! Layered configuration: defaults → config file → environment variables

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::{BaseDirs, ProjectDirs};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use super::roots::read_roots_file;
use crate::error::{ConfigError, Error, Result};

/// Prefix for environment overrides (e.g. `TMUX_WARDEN_CLEAR_SCREEN=false`)
pub const ENV_PREFIX: &str = "TMUX_WARDEN_";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// tmux binary to invoke
    pub tmux_binary: String,

    /// Per-command timeout in milliseconds (0 = wait forever)
    pub command_timeout_ms: u64,

    /// Session names that are never offered for closing
    pub protected_sessions: Vec<String>,

    /// Directories whose children are project directories
    pub project_roots: Vec<PathBuf>,

    /// File listing project roots, one per line; overrides `project_roots`
    pub roots_file: Option<PathBuf>,

    /// Fuzzy picker program
    pub picker_program: String,

    /// Prompt shown by the picker
    pub picker_prompt: String,

    /// Height passed to the picker
    pub picker_height: String,

    /// Name of the first window in new project sessions
    pub window_name: String,

    /// Commands typed into the first panes of new project sessions
    pub seed_commands: Vec<String>,

    /// How long status messages stay on screen, in milliseconds
    pub message_pause_ms: u64,

    /// Clear the terminal before each screen
    pub clear_screen: bool,

    /// Enable debug logging
    pub debug: bool,

    /// Log file path (defaults to the data directory)
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        let home = BaseDirs::new().map(|d| d.home_dir().to_path_buf());
        let project_roots = home
            .map(|h| vec![h.join("projects"), h.join("workspace")])
            .unwrap_or_default();

        Self {
            tmux_binary: "tmux".to_string(),
            command_timeout_ms: 0,
            protected_sessions: vec!["workspace".to_string()],
            project_roots,
            roots_file: None,
            picker_program: "fzf".to_string(),
            picker_prompt: "Project: ".to_string(),
            picker_height: "90%".to_string(),
            window_name: "Multi-View".to_string(),
            seed_commands: vec!["claude".to_string(), "ranger".to_string()],
            message_pause_ms: 1500,
            clear_screen: true,
            debug: false,
            log_file: None,
        }
    }
}

impl Config {
    /// Load configuration from the default file and the environment
    pub fn load() -> Result<Self> {
        let config_path = Self::config_file_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from a specific file and the environment
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let config: Config = Figment::new()
            // Start with defaults
            .merge(Serialized::defaults(Config::default()))
            // Layer config file if it exists
            .merge(Toml::file(config_path))
            // Layer environment variables (TMUX_WARDEN_PICKER_PROGRAM, etc.)
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()
            .map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        Ok(config)
    }

    /// Get the configuration file path
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Get the data directory path
    pub fn data_dir() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.data_dir().to_path_buf())
    }

    /// Get the log file path
    pub fn log_file_path(&self) -> Result<PathBuf> {
        match self.log_file {
            Some(ref path) => Ok(path.clone()),
            None => Ok(Self::data_dir()?.join("tmux-warden.log")),
        }
    }

    /// Get the roots file path
    pub fn roots_file_path(&self) -> Result<PathBuf> {
        match self.roots_file {
            Some(ref path) => Ok(path.clone()),
            None => Ok(Self::project_dirs()?.config_dir().join("roots")),
        }
    }

    /// Project roots: the roots file when it lists any, else `project_roots`
    pub fn resolve_project_roots(&self) -> Vec<PathBuf> {
        let from_file = self
            .roots_file_path()
            .ok()
            .and_then(|path| read_roots_file(&path))
            .unwrap_or_default();

        if from_file.is_empty() {
            self.project_roots.clone()
        } else {
            from_file
        }
    }

    /// Timeout for each tmux command
    pub fn command_timeout(&self) -> Option<Duration> {
        (self.command_timeout_ms > 0).then(|| Duration::from_millis(self.command_timeout_ms))
    }

    /// Pause after status messages
    pub fn message_pause(&self) -> Duration {
        Duration::from_millis(self.message_pause_ms)
    }

    /// Ensure all required directories exist
    pub fn ensure_directories(&self) -> Result<()> {
        let dirs = Self::project_dirs()?;

        std::fs::create_dir_all(dirs.config_dir()).map_err(|_e| {
            Error::Config(ConfigError::DirectoryCreationFailed(
                dirs.config_dir().to_path_buf(),
            ))
        })?;

        std::fs::create_dir_all(dirs.data_dir()).map_err(|_e| {
            Error::Config(ConfigError::DirectoryCreationFailed(
                dirs.data_dir().to_path_buf(),
            ))
        })?;

        Ok(())
    }

    /// Save current configuration to the default file
    pub fn save(&self) -> Result<PathBuf> {
        let config_path = Self::config_file_path()?;
        self.save_to(&config_path)?;
        Ok(config_path)
    }

    /// Save current configuration to a specific file
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|_e| {
                Error::Config(ConfigError::DirectoryCreationFailed(parent.to_path_buf()))
            })?;
        }

        let toml = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SaveFailed(e.to_string()))?;

        std::fs::write(config_path, toml).map_err(|e| ConfigError::SaveFailed(e.to_string()))?;

        Ok(())
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("com", "tmux-warden", "tmux-warden").ok_or_else(|| {
            Error::Config(ConfigError::LoadFailed(
                "Could not determine home directory".to_string(),
            ))
        })
    }
}
