//! Game configuration.

use crate::character::Character;
use crate::game::GameError;
use crate::inventory::DEFAULT_MAX_CARRY_WEIGHT;
use crate::items::find_item;
use crate::zone::Coordinate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// NPC templates that can be spawned from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NpcKind {
    Swordsman,
}

impl NpcKind {
    pub fn build(&self) -> Character {
        match self {
            NpcKind::Swordsman => Character::swordsman(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpcSpawn {
    pub kind: NpcKind,
    pub position: Coordinate,
}

/// Everything needed to set up a game.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Player character name.
    pub player_name: String,

    /// Where the player is placed.
    pub player_start: Coordinate,

    /// Player health at the start (max stays 100).
    pub player_health: f64,

    /// Catalog names of items the player starts with.
    pub starting_items: Vec<String>,

    /// NPCs placed after the player, in order.
    pub npcs: Vec<NpcSpawn>,

    /// Seed for NPC wandering. Entropy when unset.
    pub seed: Option<u64>,

    /// Player carry limit.
    pub max_carry_weight: f64,

    /// Most rounds a single command may chain through.
    pub round_limit: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            player_name: "Player".to_string(),
            player_start: Coordinate::new(0, 0),
            player_health: 50.0,
            starting_items: vec!["Health Potion".to_string(), "Sword".to_string()],
            npcs: vec![NpcSpawn {
                kind: NpcKind::Swordsman,
                position: Coordinate::new(4, 2),
            }],
            seed: None,
            max_carry_weight: DEFAULT_MAX_CARRY_WEIGHT,
            round_limit: 64,
        }
    }
}

impl GameConfig {
    /// The standard starting scenario.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty zone with just the player at full health.
    pub fn empty() -> Self {
        Self {
            player_health: 100.0,
            starting_items: Vec::new(),
            npcs: Vec::new(),
            ..Self::default()
        }
    }

    pub fn with_player_name(mut self, name: impl Into<String>) -> Self {
        self.player_name = name.into();
        self
    }

    pub fn with_player_start(mut self, position: Coordinate) -> Self {
        self.player_start = position;
        self
    }

    pub fn with_player_health(mut self, health: f64) -> Self {
        self.player_health = health;
        self
    }

    pub fn with_starting_item(mut self, name: impl Into<String>) -> Self {
        self.starting_items.push(name.into());
        self
    }

    pub fn with_npc(mut self, kind: NpcKind, position: Coordinate) -> Self {
        self.npcs.push(NpcSpawn { kind, position });
        self
    }

    /// Drop the default NPCs.
    pub fn without_npcs(mut self) -> Self {
        self.npcs.clear();
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_max_carry_weight(mut self, weight: f64) -> Self {
        self.max_carry_weight = weight;
        self
    }

    pub fn with_round_limit(mut self, limit: u32) -> Self {
        self.round_limit = limit;
        self
    }

    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, GameError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), GameError> {
        let mut taken = HashSet::new();
        let placements = std::iter::once(("player", self.player_start))
            .chain(self.npcs.iter().map(|npc| ("npc", npc.position)));

        for (who, position) in placements {
            if !position.in_bounds() {
                return Err(GameError::Config(format!(
                    "{who} start {position} is out of bounds"
                )));
            }
            if !taken.insert(position) {
                return Err(GameError::Config(format!(
                    "{who} start {position} is already taken"
                )));
            }
        }

        if let Some(unknown) = self.starting_items.iter().find(|n| find_item(n).is_none()) {
            return Err(GameError::Config(format!("unknown item '{unknown}'")));
        }
        if self.player_health <= 0.0 {
            return Err(GameError::Config("player health must be positive".to_string()));
        }
        if self.max_carry_weight <= 0.0 {
            return Err(GameError::Config(
                "max carry weight must be positive".to_string(),
            ));
        }
        if self.round_limit == 0 {
            return Err(GameError::Config("round limit must be at least 1".to_string()));
        }
        Ok(())
    }
}
