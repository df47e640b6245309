//! Carried items, equipped slots, carry weight and currency.

use crate::items::{EquipSlot, Item, ItemId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default carry weight limit.
pub const DEFAULT_MAX_CARRY_WEIGHT: f64 = 200.0;

/// Errors from inventory operations.
#[derive(Debug, Error, PartialEq)]
pub enum InventoryError {
    #[error("Too heavy: carrying {current} of {max}, cannot add {adding}")]
    CapacityExceeded { current: f64, adding: f64, max: f64 },

    #[error("No such item in inventory")]
    ItemNotFound,

    #[error("No item in the {0} slot")]
    EmptySlot(EquipSlot),

    #[error("Not enough money: have {available}, need {requested}")]
    InsufficientFunds { available: u32, requested: u32 },

    #[error("{0} cannot be equipped")]
    NotEquipable(String),

    #[error("{0} cannot be consumed")]
    NotConsumable(String),
}

// ============================================================================
// Equipment
// ============================================================================

/// One optional item per equip slot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Equipment {
    slots: [Option<Item>; 5],
}

impl Equipment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: EquipSlot) -> Option<&Item> {
        self.slots[slot.index()].as_ref()
    }

    /// Put `item` in `slot`, returning whatever was there.
    pub fn set(&mut self, slot: EquipSlot, item: Item) -> Option<Item> {
        self.slots[slot.index()].replace(item)
    }

    pub fn take(&mut self, slot: EquipSlot) -> Option<Item> {
        self.slots[slot.index()].take()
    }

    /// Every slot with its contents, in `EquipSlot::ALL` order.
    pub fn iter(&self) -> impl Iterator<Item = (EquipSlot, Option<&Item>)> {
        EquipSlot::ALL.into_iter().map(move |slot| (slot, self.get(slot)))
    }

    /// Equipped items only.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.slots.iter().flatten()
    }
}

// ============================================================================
// Inventory Manager
// ============================================================================

/// A character's inventory. `current_weight` tracks only carried items;
/// equipped items do not count against the carry limit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryManager {
    items: Vec<Item>,
    equipped: Equipment,
    current_weight: f64,
    max_carry_weight: f64,
    currency: u32,
}

impl Default for InventoryManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InventoryManager {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            equipped: Equipment::new(),
            current_weight: 0.0,
            max_carry_weight: DEFAULT_MAX_CARRY_WEIGHT,
            currency: 0,
        }
    }

    pub fn with_max_carry_weight(mut self, max: f64) -> Self {
        self.max_carry_weight = max;
        self
    }

    /// Carried items in insertion order.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn equipped(&self) -> &Equipment {
        &self.equipped
    }

    pub fn current_weight(&self) -> f64 {
        self.current_weight
    }

    pub fn max_carry_weight(&self) -> f64 {
        self.max_carry_weight
    }

    pub fn currency(&self) -> u32 {
        self.currency
    }

    pub fn find(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.find(id).is_some()
    }

    /// Add an item, failing if it would exceed the carry limit.
    pub fn add_item(&mut self, item: Item) -> Result<(), InventoryError> {
        if self.current_weight + item.weight > self.max_carry_weight {
            return Err(InventoryError::CapacityExceeded {
                current: self.current_weight,
                adding: item.weight,
                max: self.max_carry_weight,
            });
        }
        self.current_weight += item.weight;
        self.items.push(item);
        Ok(())
    }

    /// Remove the first item with the given id and hand it back.
    pub fn remove_item(&mut self, id: ItemId) -> Result<Item, InventoryError> {
        let idx = self
            .items
            .iter()
            .position(|i| i.id == id)
            .ok_or(InventoryError::ItemNotFound)?;
        let item = self.items.remove(idx);
        self.current_weight -= item.weight;
        if self.items.is_empty() {
            // Nothing carried, nothing weighed
            self.current_weight = 0.0;
        }
        Ok(item)
    }

    /// Equip an item into its slot.
    ///
    /// A previously equipped item is moved back into the carried items first;
    /// if that would exceed the carry limit nothing changes and the error is
    /// returned. If `item` was being carried it is taken out of the carried
    /// items so its weight is not counted twice.
    pub fn equip_item(&mut self, item: Item) -> Result<(), InventoryError> {
        let slot = item
            .equip_slot()
            .ok_or_else(|| InventoryError::NotEquipable(item.full_name()))?;

        if let Some(previous) = self.equipped.take(slot) {
            if let Err(e) = self.add_item(previous.clone()) {
                self.equipped.set(slot, previous);
                return Err(e);
            }
        }

        let id = item.id;
        self.equipped.set(slot, item);

        if self.contains(id) {
            self.remove_item(id)?;
        }
        Ok(())
    }

    /// Clear a slot and return its item. The caller decides where it goes.
    pub fn unequip_item(&mut self, slot: EquipSlot) -> Result<Item, InventoryError> {
        self.equipped.take(slot).ok_or(InventoryError::EmptySlot(slot))
    }

    pub fn add_currency(&mut self, amount: u32) {
        self.currency = self.currency.saturating_add(amount);
    }

    pub fn reduce_currency(&mut self, amount: u32) -> Result<(), InventoryError> {
        self.currency = self
            .currency
            .checked_sub(amount)
            .ok_or(InventoryError::InsufficientFunds {
                available: self.currency,
                requested: amount,
            })?;
        Ok(())
    }
}
