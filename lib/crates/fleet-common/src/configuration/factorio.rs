//! Factorio dedicated-server configuration.
//!
//! Field names follow Factorio's own `server-settings.json`,
//! `map-settings.json` and `map-gen-settings.json` files so a stored
//! configuration can be rendered into those files without renaming.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::BaseConfig;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct FactorioConfig {
    #[serde(flatten)]
    pub base: BaseConfig,
    #[serde(rename = "server_settings", default)]
    pub server: ServerSettings,
    #[serde(rename = "map_settings", default)]
    pub map: MapSettings,
    #[serde(rename = "map_gen_settings", default)]
    pub map_gen: MapGenSettings,
}

impl FactorioConfig {
    #[must_use]
    pub fn new(base: BaseConfig) -> Self {
        Self {
            base,
            ..Self::default()
        }
    }
}

/// `server-settings.json`.
///
/// `password` and `game_password` are held in memory only and are never
/// serialized, so they do not reach storage, history or API responses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct ServerSettings {
    pub name: String,
    pub description: String,
    pub tags: Vec<String>,
    pub max_players: u32,
    pub username: String,
    #[serde(skip)]
    password: String,
    pub token: String,
    #[serde(skip)]
    game_password: String,
    pub require_user_verification: bool,
    pub max_upload_in_kilobytes_per_second: u32,
    pub max_upload_slots: u32,
    pub minimum_latency_in_ticks: u32,
    pub max_heartbeats_per_second: u32,
    pub ignore_player_limit_for_returning_players: bool,
    pub allow_commands: String,
    pub autosave_interval: u32,
    pub autosave_slots: u32,
    pub afk_autokick_interval: u32,
    pub auto_pause: bool,
    pub auto_pause_when_players_connect: bool,
    pub only_admins_can_pause_the_game: bool,
    pub autosave_only_on_server: bool,
    pub non_blocking_saving: bool,
    pub minimum_segment_size: u32,
    pub minimum_segment_size_peer_count: u32,
    pub maximum_segment_size: u32,
    pub maximum_segment_size_peer_count: u32,
}

impl ServerSettings {
    pub fn set_password(&mut self, password: impl Into<String>) {
        self.password = password.into();
    }

    pub fn set_game_password(&mut self, password: impl Into<String>) {
        self.game_password = password.into();
    }

    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }

    #[must_use]
    pub fn game_password(&self) -> &str {
        &self.game_password
    }
}

/// `map-settings.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct MapSettings {
    pub difficulty_settings: Difficulty,
    pub pollution: Pollution,
    pub enemy_evolution: EnemyEvolution,
    pub enemy_expansion: EnemyExpansion,
    pub unit_group: UnitGroup,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Difficulty {
    pub technology_price_multiplier: f32,
    pub spoil_time_modifier: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Pollution {
    pub enabled: bool,
    pub diffusion_ratio: f64,
    pub min_to_diffuse: i32,
    pub ageing: i32,
    pub expected_max_per_chunk: i32,
    pub min_to_show_per_chunk: i32,
    pub min_pollution_to_damage_trees: i32,
    pub pollution_with_max_forest_damage: i32,
    pub pollution_per_tree_damage: i32,
    pub pollution_restored_per_tree_damage: i32,
    pub max_pollution_to_restore_trees: i32,
    pub enemy_attack_pollution_consumption_modifier: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct EnemyEvolution {
    pub enabled: bool,
    pub time_factor: f64,
    pub destroy_factor: f64,
    pub pollution_factor: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct EnemyExpansion {
    pub enabled: bool,
    pub max_expansion_distance: i32,
    pub friendly_base_influence_radius: i32,
    pub enemy_building_influence_radius: i32,
    pub building_coefficient: f64,
    pub other_base_coefficient: f64,
    pub neighbouring_chunk_coefficient: f64,
    pub neighbouring_base_chunk_coefficient: f64,
    pub max_colliding_tiles_coefficient: f64,
    pub settler_group_min_size: i32,
    pub settler_group_max_size: i32,
    pub min_expansion_cooldown: i32,
    pub max_expansion_cooldown: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct UnitGroup {
    pub min_group_gathering_time: i32,
    pub max_group_gathering_time: i32,
    pub max_wait_time_for_late_members: i32,
    pub max_group_radius: f64,
    pub min_group_radius: f64,
    pub max_member_speedup_when_behind: f64,
    pub max_member_slowdown_when_ahead: f64,
    pub max_group_slowdown_factor: f64,
    pub max_group_member_fallback_factor: i32,
    pub member_disown_distance: i32,
    pub tick_tolerance_when_member_arrives: i32,
    pub max_gathering_unit_groups: i32,
    pub max_unit_group_size: i32,
}

/// `map-gen-settings.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct MapGenSettings {
    pub width: u32,
    pub height: u32,
    pub starting_area: i32,
    pub peaceful_mode: bool,
    /// Keyed by resource name, e.g. `"iron-ore"`.
    pub autoplace_controls: BTreeMap<String, ResourceSettings>,
    pub cliff_settings: CliffSettings,
    pub seed: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct ResourceSettings {
    pub frequency: f32,
    pub size: f32,
    pub richness: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct CliffSettings {
    pub name: String,
    pub cliff_elevation_0: i32,
    pub cliff_elevation_interval: i32,
    pub richness: i32,
}
