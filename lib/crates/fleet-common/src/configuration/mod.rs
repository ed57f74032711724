//! Per-task-type server configurations.
//!
//! Every variant embeds a [`BaseConfig`]. On the wire the variant is
//! discriminated by a `type` field carrying the task type tag, so a stored
//! configuration is a flat JSON object:
//!
//! ```json
//! {"type":"factorio","id":"…","agent_id":"…","port":34197,"server_settings":{…}}
//! ```

mod factorio;
mod minecraft;

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::task::kinds;
use crate::validate::{Identified, Validate, ValidationError, require_id, require_non_empty};

pub use factorio::{
    CliffSettings, Difficulty, EnemyEvolution, EnemyExpansion, FactorioConfig, MapGenSettings,
    MapSettings, Pollution, ResourceSettings, ServerSettings, UnitGroup,
};
pub use minecraft::{MinecraftConfig, gamemodes};

/// Fields shared by every configuration variant.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub struct BaseConfig {
    pub id: Uuid,
    /// Agent that runs the task this configuration belongs to.
    pub agent_id: Uuid,
    #[serde(default)]
    pub port: u16,
}

impl BaseConfig {
    #[must_use]
    pub fn new(id: Uuid, agent_id: Uuid, port: u16) -> Self {
        Self { id, agent_id, port }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Configuration {
    Factorio(FactorioConfig),
    Minecraft(MinecraftConfig),
}

impl Configuration {
    #[must_use]
    pub fn base(&self) -> &BaseConfig {
        match self {
            Self::Factorio(c) => &c.base,
            Self::Minecraft(c) => &c.base,
        }
    }

    /// The type discriminator, equal to the task type tag it serves.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Factorio(_) => kinds::FACTORIO,
            Self::Minecraft(_) => kinds::MINECRAFT,
        }
    }
}

impl From<FactorioConfig> for Configuration {
    fn from(c: FactorioConfig) -> Self {
        Self::Factorio(c)
    }
}

impl From<MinecraftConfig> for Configuration {
    fn from(c: MinecraftConfig) -> Self {
        Self::Minecraft(c)
    }
}

impl Identified for Configuration {
    fn id(&self) -> Uuid {
        self.base().id
    }
}

impl Validate for Configuration {
    fn validate(&self) -> Result<(), ValidationError> {
        let base = self.base();
        require_id("id", base.id)?;
        require_non_empty("type", self.kind())?;
        require_id("agent_id", base.agent_id)?;
        match self {
            Self::Factorio(_) => Ok(()),
            Self::Minecraft(c) => c.check_gamemode(),
        }
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let base = self.base();
        write!(
            f,
            "{} {:?} for agent {:?} on port {}",
            self.kind(),
            base.id.to_string(),
            base.agent_id.to_string(),
            base.port
        )
    }
}
