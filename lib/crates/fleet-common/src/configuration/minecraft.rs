use serde::{Deserialize, Serialize};

use super::BaseConfig;
use crate::validate::ValidationError;

/// Allowed values for [`MinecraftConfig::gamemode`].
pub mod gamemodes {
    pub const SURVIVAL: &str = "survival";
    pub const CREATIVE: &str = "creative";
    pub const ADVENTURE: &str = "adventure";
    pub const SPECTATOR: &str = "spectator";

    pub const ALL: &[&str] = &[SURVIVAL, CREATIVE, ADVENTURE, SPECTATOR];
}

/// Minecraft dedicated-server configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MinecraftConfig {
    #[serde(flatten)]
    pub base: BaseConfig,
    #[serde(default)]
    pub seed: String,
    #[serde(default)]
    pub rcon_port: u16,
    #[serde(default = "default_gamemode")]
    pub gamemode: String,
    #[serde(default)]
    pub server_name: String,
    #[serde(default)]
    pub max_players: u32,
    #[serde(default)]
    pub view_distance: i32,
}

fn default_gamemode() -> String {
    gamemodes::SURVIVAL.to_string()
}

impl MinecraftConfig {
    #[must_use]
    pub fn new(base: BaseConfig) -> Self {
        Self {
            base,
            seed: String::new(),
            rcon_port: 0,
            gamemode: default_gamemode(),
            server_name: String::new(),
            max_players: 0,
            view_distance: 0,
        }
    }

    pub(super) fn check_gamemode(&self) -> Result<(), ValidationError> {
        if gamemodes::ALL.contains(&self.gamemode.as_str()) {
            return Ok(());
        }
        Err(ValidationError::InvalidValue {
            field: "gamemode",
            reason: format!(
                "{:?} is not one of {}",
                self.gamemode,
                gamemodes::ALL.join(", ")
            ),
        })
    }
}
