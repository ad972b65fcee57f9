pub mod game;
pub mod loader;

use log::warn;
use serde::{Deserialize, Serialize};

/// On-disk configuration. Read once when an engine is constructed; the
/// grid dimensions and queue lookahead it carries are fixed for the
/// session, so nothing re-reads the file mid-game.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub game: game::GameplayConfig,
}

impl Config {
    /// Loads the config file, falling back to defaults when it is missing
    /// or unreadable. A malformed file is logged, never fatal.
    #[must_use]
    pub fn load_or_default() -> Self {
        match loader::load_config_from_file() {
            Ok(config) => config,
            Err(err) => {
                warn!("Falling back to default config: {err}");
                Self::default()
            }
        }
    }
}
