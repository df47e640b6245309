//! Items, quality tiers and the standard item catalog.
//!
//! Every item has a weight, a display category, a quality tier and a full
//! name. Weapons and armor are equipable into one of five slots; consumables
//! carry a status effect handed to whoever drinks them.

use crate::effects::StatusEffect;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Identity
// ============================================================================

/// Unique identifier for items. Inventories and tiles match items by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(pub Uuid);

impl ItemId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Quality
// ============================================================================

/// Quality tier: a name prefix plus an effectiveness multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Quality {
    Shoddy,
    #[default]
    Regular,
    Fine,
}

impl Quality {
    pub fn prefix(&self) -> &'static str {
        match self {
            Quality::Shoddy => "Shoddy",
            Quality::Regular => "Regular",
            Quality::Fine => "Fine",
        }
    }

    pub fn effectiveness_mult(&self) -> f64 {
        match self {
            Quality::Shoddy => 0.8,
            Quality::Regular => 1.0,
            Quality::Fine => 1.33,
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.prefix())
    }
}

// ============================================================================
// Equip Slots
// ============================================================================

/// The five equipment slots a character has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquipSlot {
    Weapon,
    Headwear,
    Shirt,
    Pants,
    Footwear,
}

impl EquipSlot {
    pub const ALL: [EquipSlot; 5] = [
        EquipSlot::Weapon,
        EquipSlot::Headwear,
        EquipSlot::Shirt,
        EquipSlot::Pants,
        EquipSlot::Footwear,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            EquipSlot::Weapon => "weapon",
            EquipSlot::Headwear => "headwear",
            EquipSlot::Shirt => "shirt",
            EquipSlot::Pants => "pants",
            EquipSlot::Footwear => "footwear",
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            EquipSlot::Weapon => 0,
            EquipSlot::Headwear => 1,
            EquipSlot::Shirt => 2,
            EquipSlot::Pants => 3,
            EquipSlot::Footwear => 4,
        }
    }
}

impl fmt::Display for EquipSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The slots armor may occupy (everything but the weapon slot).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArmorSlot {
    Headwear,
    Shirt,
    Pants,
    Footwear,
}

impl From<ArmorSlot> for EquipSlot {
    fn from(slot: ArmorSlot) -> Self {
        match slot {
            ArmorSlot::Headwear => EquipSlot::Headwear,
            ArmorSlot::Shirt => EquipSlot::Shirt,
            ArmorSlot::Pants => EquipSlot::Pants,
            ArmorSlot::Footwear => EquipSlot::Footwear,
        }
    }
}

// ============================================================================
// Items
// ============================================================================

/// A weapon. Its effective damage is the base damage scaled by quality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    pub weapon_type: String,
    pub base_damage: f64,
    pub damage: f64,
}

/// A piece of armor worn in one of the four armor slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Armor {
    pub armor_type: String,
    pub slot: ArmorSlot,
    pub armor_value: f64,
    pub color: String,
}

/// Something that is used up to gain a status effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Consumable {
    pub name: String,
    pub effect: StatusEffect,
    pub liquid_color: String,
}

/// What kind of item this is. Equipability is decided by the variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ItemKind {
    Weapon(Weapon),
    Armor(Armor),
    Consumable(Consumable),
}

/// An inventory item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub weight: f64,
    pub quality: Quality,
    pub kind: ItemKind,
}

impl Item {
    /// A regular-quality weapon with no weight.
    pub fn weapon(weapon_type: impl Into<String>, base_damage: f64) -> Self {
        Self {
            id: ItemId::new(),
            weight: 0.0,
            quality: Quality::Regular,
            kind: ItemKind::Weapon(Weapon {
                weapon_type: weapon_type.into(),
                base_damage,
                damage: base_damage,
            }),
        }
    }

    /// A regular-quality gray piece of armor with no weight.
    pub fn armor(armor_type: impl Into<String>, slot: ArmorSlot, armor_value: f64) -> Self {
        Self {
            id: ItemId::new(),
            weight: 0.0,
            quality: Quality::Regular,
            kind: ItemKind::Armor(Armor {
                armor_type: armor_type.into(),
                slot,
                armor_value,
                color: "gray".to_string(),
            }),
        }
    }

    /// A potion weighing 5 that grants `effect` when drunk.
    pub fn potion(name: impl Into<String>, effect: StatusEffect) -> Self {
        Self {
            id: ItemId::new(),
            weight: 5.0,
            quality: Quality::Regular,
            kind: ItemKind::Consumable(Consumable {
                name: name.into(),
                effect,
                liquid_color: "red".to_string(),
            }),
        }
    }

    /// Set the quality. Weapon damage is recomputed from the base damage.
    pub fn with_quality(mut self, quality: Quality) -> Self {
        self.quality = quality;
        if let ItemKind::Weapon(ref mut weapon) = self.kind {
            weapon.damage = weapon.base_damage * quality.effectiveness_mult();
        }
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Set the armor or liquid color. No effect on weapons.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        match self.kind {
            ItemKind::Armor(ref mut armor) => armor.color = color.into(),
            ItemKind::Consumable(ref mut consumable) => consumable.liquid_color = color.into(),
            ItemKind::Weapon(_) => {}
        }
        self
    }

    /// A copy of this item with a fresh identity.
    pub fn duplicate(&self) -> Self {
        Self {
            id: ItemId::new(),
            ..self.clone()
        }
    }

    /// Display category, e.g. "Sword" or "potion".
    pub fn item_type(&self) -> &str {
        match &self.kind {
            ItemKind::Weapon(w) => &w.weapon_type,
            ItemKind::Armor(a) => &a.armor_type,
            ItemKind::Consumable(_) => "potion",
        }
    }

    /// Quality prefix plus type ("Fine Sword"). Potions and bare fists go by
    /// their plain name.
    pub fn full_name(&self) -> String {
        match &self.kind {
            ItemKind::Consumable(c) => c.name.clone(),
            ItemKind::Weapon(w) if w.weapon_type == UNARMED => w.weapon_type.clone(),
            _ => format!("{} {}", self.quality.prefix(), self.item_type()),
        }
    }

    /// The slot this item equips into, or `None` if it is not equipable.
    pub fn equip_slot(&self) -> Option<EquipSlot> {
        match &self.kind {
            ItemKind::Weapon(_) => Some(EquipSlot::Weapon),
            ItemKind::Armor(a) => Some(a.slot.into()),
            ItemKind::Consumable(_) => None,
        }
    }

    pub fn is_equipable(&self) -> bool {
        self.equip_slot().is_some()
    }

    /// Effective weapon damage, if this is a weapon.
    pub fn damage(&self) -> Option<f64> {
        match &self.kind {
            ItemKind::Weapon(w) => Some(w.damage),
            _ => None,
        }
    }

    /// Armor value, if this is armor.
    pub fn armor_value(&self) -> Option<f64> {
        match &self.kind {
            ItemKind::Armor(a) => Some(a.armor_value),
            _ => None,
        }
    }

    pub fn as_consumable(&self) -> Option<&Consumable> {
        match &self.kind {
            ItemKind::Consumable(c) => Some(c),
            _ => None,
        }
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full_name())
    }
}

// ============================================================================
// Standard Items
// ============================================================================

const UNARMED: &str = "Unarmed";

/// Damage dealt with nothing in the weapon slot.
pub const UNARMED_DAMAGE: f64 = 20.0;

/// A sword: 35 base damage, weight 10 scaled by quality.
pub fn sword(quality: Quality) -> Item {
    Item::weapon("Sword", 35.0)
        .with_quality(quality)
        .with_weight(10.0 * quality.effectiveness_mult())
}

/// Bare fists, as a weightless weapon.
pub fn unarmed() -> Item {
    Item::weapon(UNARMED, UNARMED_DAMAGE)
}

pub fn helmet() -> Item {
    Item::armor("Helmet", ArmorSlot::Headwear, 10.0).with_weight(5.0)
}

pub fn breastplate() -> Item {
    Item::armor("Breastplate", ArmorSlot::Shirt, 20.0).with_weight(25.0)
}

/// A health potion healing `magnitude` per turn for `duration` turns.
pub fn health_potion(magnitude: f64, duration: f64) -> Item {
    Item::potion("Health Potion", StatusEffect::heal(magnitude, duration))
}

lazy_static::lazy_static! {
    /// Catalog of standard items, looked up by full name.
    pub static ref CATALOG: Vec<Item> = vec![
        sword(Quality::Regular),
        sword(Quality::Fine),
        sword(Quality::Shoddy),
        helmet(),
        breastplate(),
        health_potion(5.0, 5.0),
    ];
}

/// Find a catalog item by name, case-insensitive. "Sword" matches the
/// regular sword; quality prefixes select the other tiers. Every call returns
/// a fresh item with its own id.
pub fn find_item(name: &str) -> Option<Item> {
    let name_lower = name.trim().to_lowercase();
    CATALOG
        .iter()
        .find(|item| {
            item.full_name().to_lowercase() == name_lower
                || (item.quality == Quality::Regular
                    && item.item_type().to_lowercase() == name_lower)
        })
        .map(Item::duplicate)
}
