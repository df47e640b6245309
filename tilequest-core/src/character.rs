//! Characters: the player and NPCs.
//!
//! A character owns its stats, inventory and status effects. Anything that
//! reaches another character or the zone (attacking, dying, ending a turn)
//! lives in [`crate::turn`] and works through the zone's character arena.

use crate::effects::StatusEffect;
use crate::inventory::{InventoryError, InventoryManager};
use crate::items::{sword, EquipSlot, Item, ItemId, Quality, UNARMED_DAMAGE};
use crate::zone::Coordinate;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// ID Types
// ============================================================================

/// Unique identifier for characters. Tiles and the zone refer to characters
/// by id rather than by reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CharacterId(pub Uuid);

impl CharacterId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CharacterId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Stats
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Health {
    pub current: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Speed {
    pub current: i32,
    pub base: i32,
}

/// Core stats shared by every character.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stats {
    pub health: Health,
    /// Spent on moves and attacks. May dip below zero after an overspend.
    pub action_points: i32,
    pub speed: Speed,
    pub level: u32,
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            health: Health {
                current: 100.0,
                max: 100.0,
            },
            action_points: 100,
            speed: Speed {
                current: 100,
                base: 100,
            },
            level: 1,
        }
    }
}

/// Player or NPC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CharacterKind {
    Player { experience: u32 },
    Npc,
}

// ============================================================================
// Character
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    pub id: CharacterId,
    pub name: String,
    pub kind: CharacterKind,
    pub stats: Stats,
    pub inventory: InventoryManager,
    pub status_effects: Vec<StatusEffect>,
    pub(crate) position: Option<Coordinate>,
    pub(crate) taking_turn: bool,
    pub(crate) alive: bool,
}

impl Character {
    fn new(name: impl Into<String>, kind: CharacterKind) -> Self {
        Self {
            id: CharacterId::new(),
            name: name.into(),
            kind,
            stats: Stats::default(),
            inventory: InventoryManager::new(),
            status_effects: Vec::new(),
            position: None,
            taking_turn: false,
            alive: true,
        }
    }

    pub fn player(name: impl Into<String>) -> Self {
        Self::new(name, CharacterKind::Player { experience: 0 })
    }

    pub fn npc(name: impl Into<String>) -> Self {
        Self::new(name, CharacterKind::Npc)
    }

    /// The standard melee NPC: a Swordsman holding a regular sword.
    pub fn swordsman() -> Self {
        let mut npc = Self::npc("Swordsman");
        // An empty weapon slot never displaces anything
        let _ = npc.inventory.equip_item(sword(Quality::Regular));
        npc
    }

    /// Set current health (clamped to max).
    pub fn with_health(mut self, current: f64) -> Self {
        self.stats.health.current = current.min(self.stats.health.max);
        self
    }

    pub fn with_max_carry_weight(mut self, max: f64) -> Self {
        self.inventory = std::mem::take(&mut self.inventory).with_max_carry_weight(max);
        self
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn is_player(&self) -> bool {
        matches!(self.kind, CharacterKind::Player { .. })
    }

    pub fn is_npc(&self) -> bool {
        matches!(self.kind, CharacterKind::Npc)
    }

    /// False once the character has died. Dead characters are no longer
    /// placed in the zone and take no further turns.
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn is_taking_turn(&self) -> bool {
        self.taking_turn
    }

    pub fn position(&self) -> Option<Coordinate> {
        self.position
    }

    pub fn health(&self) -> f64 {
        self.stats.health.current
    }

    pub fn max_health(&self) -> f64 {
        self.stats.health.max
    }

    pub fn action_points(&self) -> i32 {
        self.stats.action_points
    }

    pub fn speed(&self) -> i32 {
        self.stats.speed.current
    }

    pub fn level(&self) -> u32 {
        self.stats.level
    }

    /// Player experience; NPCs have none.
    pub fn experience(&self) -> Option<u32> {
        match self.kind {
            CharacterKind::Player { experience } => Some(experience),
            CharacterKind::Npc => None,
        }
    }

    pub fn money(&self) -> u32 {
        self.inventory.currency()
    }

    pub fn equipped(&self, slot: EquipSlot) -> Option<&Item> {
        self.inventory.equipped().get(slot)
    }

    pub fn death_message(&self) -> String {
        if self.is_player() {
            "You have died.".to_string()
        } else {
            format!("{} has died.", self.name)
        }
    }

    // ------------------------------------------------------------------------
    // Combat math
    // ------------------------------------------------------------------------

    /// Damage of the equipped weapon, or the unarmed baseline.
    pub fn calc_damage(&self) -> f64 {
        // TODO: add strength modifiers once characters have attributes
        self.equipped(EquipSlot::Weapon)
            .and_then(Item::damage)
            .unwrap_or(UNARMED_DAMAGE)
    }

    /// Total armor value across equipped armor.
    pub fn calc_defense(&self) -> f64 {
        self.inventory
            .equipped()
            .items()
            .filter_map(Item::armor_value)
            .sum()
    }

    // ------------------------------------------------------------------------
    // Stat changes
    // ------------------------------------------------------------------------

    pub fn increase_health(&mut self, amount: f64) {
        let health = &mut self.stats.health;
        health.current = (health.current + amount).min(health.max);
    }

    /// Refill action points by one turn's worth of speed, never above speed.
    ///
    /// A large overspend can take more than one call to recover from.
    pub fn restore_ap(&mut self) {
        let speed = self.speed();
        if self.stats.action_points < speed {
            self.stats.action_points += speed;
        }
        if self.stats.action_points > speed {
            self.stats.action_points = speed;
        }
    }

    /// Apply every live effect once, then drop the ones that ran out.
    pub fn process_status_effects(&mut self) {
        let mut effects = std::mem::take(&mut self.status_effects);
        for effect in effects.iter_mut().filter(|e| e.duration > 0) {
            effect.apply(self);
        }
        effects.retain(|e| !e.is_expired());
        // Anything added while ticking goes after the survivors
        effects.append(&mut self.status_effects);
        self.status_effects = effects;
    }

    pub fn level_up(&mut self) {
        self.stats.level += 1;
    }

    /// Add experience. Returns false for NPCs, which do not track it.
    pub fn gain_experience(&mut self, amount: u32) -> bool {
        match self.kind {
            CharacterKind::Player { ref mut experience } => {
                *experience = experience.saturating_add(amount);
                true
            }
            CharacterKind::Npc => false,
        }
    }

    // ------------------------------------------------------------------------
    // Inventory
    // ------------------------------------------------------------------------

    /// Drink a carried consumable: its effect joins the active effects and
    /// the item leaves the inventory.
    pub fn consume_item(&mut self, id: ItemId) -> Result<StatusEffect, InventoryError> {
        let item = self.inventory.find(id).ok_or(InventoryError::ItemNotFound)?;
        let effect = item
            .as_consumable()
            .map(|c| c.effect.clone())
            .ok_or_else(|| InventoryError::NotConsumable(item.full_name()))?;

        self.inventory.remove_item(id)?;
        self.status_effects.push(effect.clone());
        Ok(effect)
    }

    pub fn add_item(&mut self, item: Item) -> Result<(), InventoryError> {
        self.inventory.add_item(item)
    }

    pub fn remove_item(&mut self, id: ItemId) -> Result<Item, InventoryError> {
        self.inventory.remove_item(id)
    }

    pub fn equip_item(&mut self, item: Item) -> Result<(), InventoryError> {
        self.inventory.equip_item(item)
    }

    /// Take the item out of `slot`. Failures are logged and yield `None`;
    /// the caller decides where a returned item goes.
    pub fn unequip_item(&mut self, slot: EquipSlot) -> Option<Item> {
        match self.inventory.unequip_item(slot) {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::warn!(character = %self.name, slot = %slot, error = %e, "Unequip failed");
                None
            }
        }
    }

    pub fn add_currency(&mut self, amount: u32) {
        self.inventory.add_currency(amount);
    }

    pub fn reduce_currency(&mut self, amount: u32) -> Result<(), InventoryError> {
        self.inventory.reduce_currency(amount)
    }
}
