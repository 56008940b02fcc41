use std::{
    fs::{self, OpenOptions},
    io::Write,
    num::NonZeroUsize,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    discord_helpers::{multipage_embed::DEFAULT_EMPTY_TEXT, PaginatorOptions},
    hey, say,
};

pub const CONFIG_PATH: &str = "./config.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct PaginatorConfig {
    /// seconds without a button press before the buttons stop working, `null` to never time out
    pub timeout_secs: Option<u64>,
    pub delete_message_after: bool,
    pub per_page: NonZeroUsize,
    /// shown when there are no pages at all
    pub empty_text: String,
}

impl Default for PaginatorConfig {
    fn default() -> Self {
        let options = PaginatorOptions::default();
        Self {
            timeout_secs: options.timeout.map(|timeout| timeout.as_secs()),
            delete_message_after: options.delete_message_after,
            per_page: options.per_page,
            empty_text: DEFAULT_EMPTY_TEXT.to_string(),
        }
    }
}

impl PaginatorConfig {
    pub fn options(&self) -> PaginatorOptions {
        PaginatorOptions {
            timeout: self.timeout_secs.map(Duration::from_secs),
            delete_message_after: self.delete_message_after,
            per_page: self.per_page,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct HelpConfig {
    pub colour: u32,
    pub inline: bool,
    pub commands_per_page: NonZeroUsize,
    pub prefix: String,
}

impl Default for HelpConfig {
    fn default() -> Self {
        Self {
            // discord blurple
            colour: 0x5865F2,
            inline: false,
            commands_per_page: NonZeroUsize::new(5).unwrap_or(NonZeroUsize::MIN),
            prefix: "!".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ConfigSettings {
    pub paginator: PaginatorConfig,
    pub help: HelpConfig,
}

impl ConfigSettings {
    pub fn get() -> Result<Self, ConfigError> {
        Self::load(Path::new(CONFIG_PATH))
    }

    /// Reads the config at `path`, writing out the defaults first if it does not exist yet.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            say!("No config found, generating {}", path.display());
            Self::generate(path)?;
            return Ok(Self::default());
        }

        let data = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse(&data).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(data: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(data)
    }

    fn generate(path: &Path) -> Result<(), ConfigError> {
        if path.exists() {
            hey!("Config data already exists");
            return Ok(());
        };

        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(io_err)?;

        let data = serde_json::to_string_pretty(&Self::default()).map_err(|source| {
            ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }
        })?;

        write!(file, "{}", data).map_err(io_err)
    }
}
