//! # Board Configuration
//!
//! A small TOML file (or bare entry parameters) selects which board to
//! open and in which view. Every field has a default; an absent file is
//! handled by the caller falling back to [`BoardConfig::default`].
//!
//! ```toml
//! session = "QX7B"
//! view-mode = "player"
//! facilitator = "Dana"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use processorix_model::{SessionRequest, NEW_SESSION_SENTINEL};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file {path}")]
    Read {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML for this schema.
    #[error("failed to parse config file {path}")]
    Parse {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying TOML error.
        #[source]
        source: toml::de::Error,
    },

    /// The session parameter is empty.
    #[error("session parameter must not be empty")]
    EmptySession,
}

/// Which surface of the board this client presents.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewMode {
    /// The facilitator's full-board view.
    #[default]
    Master,
    /// A participant's per-player view.
    Player,
}

/// Configuration for opening one board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BoardConfig {
    /// Session parameter: a code to join, or `"NEW"` to create.
    pub session: String,
    /// Which view to present.
    pub view_mode: ViewMode,
    /// Facilitator display name, if any.
    pub facilitator: Option<String>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            session: NEW_SESSION_SENTINEL.to_string(),
            view_mode: ViewMode::default(),
            facilitator: None,
        }
    }
}

impl BoardConfig {
    /// Loads and validates a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks invariants that the TOML schema cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.session.trim().is_empty() {
            return Err(ConfigError::EmptySession);
        }
        Ok(())
    }

    /// Resolves the session parameter into a request.
    #[must_use]
    pub fn session_request(&self) -> SessionRequest {
        SessionRequest::parse(self.session.trim())
    }
}
