//! Read-only snapshots of game state for a UI.

use crate::character::Character;
use crate::game::GameError;
use crate::inventory::InventoryManager;
use crate::items::{EquipSlot, ItemId};
use crate::zone::{Coordinate, Zone, ZONE_SIZE};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileView {
    pub sprite: String,
    /// Name of the character standing here.
    pub character: Option<String>,
    /// First letter of that name, for a compact map.
    pub character_glyph: Option<char>,
    /// Display category of each dropped item, in drop order.
    pub items: Vec<String>,
}

/// The whole grid, row by row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneView {
    pub rows: Vec<Vec<TileView>>,
}

impl ZoneView {
    pub fn from_zone(zone: &Zone) -> Self {
        let rows = (0..ZONE_SIZE)
            .map(|row| {
                (0..ZONE_SIZE)
                    .filter_map(|column| {
                        let coord = Coordinate::new(row, column);
                        let tile = zone.get_tile(coord).ok()?;
                        let name = zone.character_at(coord).map(|c| c.name.clone());
                        Some(TileView {
                            sprite: tile.sprite().to_string(),
                            character_glyph: name.as_deref().and_then(|n| n.chars().next()),
                            character: name,
                            items: tile.items().iter().map(|i| i.item_type().to_string()).collect(),
                        })
                    })
                    .collect()
            })
            .collect();
        Self { rows }
    }

    pub fn tile(&self, coord: Coordinate) -> Option<&TileView> {
        let row = usize::try_from(coord.row).ok()?;
        let column = usize::try_from(coord.column).ok()?;
        self.rows.get(row)?.get(column)
    }

    /// One line per row: a character's glyph, `*` for dropped items, `.`
    /// for an empty tile.
    pub fn render(&self) -> String {
        self.rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|tile| match (tile.character_glyph, tile.items.is_empty()) {
                        (Some(glyph), _) => glyph,
                        (None, false) => '*',
                        (None, true) => '.',
                    })
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn to_json(&self) -> Result<String, GameError> {
        Ok(serde_json::to_string(self)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EquippedView {
    pub slot: EquipSlot,
    pub item: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerView {
    pub name: String,
    pub health: f64,
    pub max_health: f64,
    pub action_points: i32,
    pub speed: i32,
    pub level: u32,
    pub experience: u32,
    pub alive: bool,
    pub equipment: Vec<EquippedView>,
}

impl PlayerView {
    pub fn from_character(character: &Character) -> Self {
        let equipment = character
            .inventory
            .equipped()
            .iter()
            .map(|(slot, item)| EquippedView {
                slot,
                item: item.map(|i| i.full_name()),
            })
            .collect();

        Self {
            name: character.name.clone(),
            health: character.health(),
            max_health: character.max_health(),
            action_points: character.action_points(),
            speed: character.speed(),
            level: character.level(),
            experience: character.experience().unwrap_or(0),
            alive: character.is_alive(),
            equipment,
        }
    }

    pub fn equipped(&self, slot: EquipSlot) -> Option<&str> {
        self.equipment
            .iter()
            .find(|e| e.slot == slot)
            .and_then(|e| e.item.as_deref())
    }

    pub fn to_json(&self) -> Result<String, GameError> {
        Ok(serde_json::to_string(self)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryEntry {
    pub id: ItemId,
    pub name: String,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryView {
    pub items: Vec<InventoryEntry>,
    pub current_weight: f64,
    pub max_carry_weight: f64,
    pub currency: u32,
}

impl InventoryView {
    pub fn from_inventory(inventory: &InventoryManager) -> Self {
        Self {
            items: inventory
                .items()
                .iter()
                .map(|item| InventoryEntry {
                    id: item.id,
                    name: item.full_name(),
                    weight: item.weight,
                })
                .collect(),
            current_weight: inventory.current_weight(),
            max_carry_weight: inventory.max_carry_weight(),
            currency: inventory.currency(),
        }
    }

    pub fn names(&self) -> Vec<&str> {
        self.items.iter().map(|e| e.name.as_str()).collect()
    }

    pub fn to_json(&self) -> Result<String, GameError> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::{health_potion, helmet, sword, Quality};

    #[test]
    fn test_zone_view_shows_characters_and_items() {
        let mut zone = Zone::new();
        zone.place_character(Character::player("Hero"), Coordinate::new(0, 0))
            .unwrap();
        zone.place_character(Character::swordsman(), Coordinate::new(4, 2))
            .unwrap();
        zone.get_tile_mut(Coordinate::new(9, 9))
            .unwrap()
            .add_item(health_potion(5.0, 5.0));

        let view = ZoneView::from_zone(&zone);
        assert_eq!(view.rows.len(), 10);
        assert!(view.rows.iter().all(|r| r.len() == 10));

        let hero = view.tile(Coordinate::new(0, 0)).unwrap();
        assert_eq!(hero.character.as_deref(), Some("Hero"));
        assert_eq!(hero.character_glyph, Some('H'));
        assert_eq!(view.tile(Coordinate::new(9, 9)).unwrap().items, vec!["potion"]);
        assert_eq!(view.tile(Coordinate::new(5, 5)).unwrap().sprite, "empty");
        assert!(view.tile(Coordinate::new(-1, 0)).is_none());

        let map = view.render();
        let lines: Vec<&str> = map.lines().collect();
        assert_eq!(lines[0], "H.........");
        assert_eq!(lines[4], "..S.......");
        assert_eq!(lines[9], ".........*");
    }

    #[test]
    fn test_player_view() {
        let mut hero = Character::player("Hero").with_health(50.0);
        hero.equip_item(sword(Quality::Fine)).unwrap();
        hero.equip_item(helmet()).unwrap();

        let view = PlayerView::from_character(&hero);
        assert_eq!(view.health, 50.0);
        assert_eq!(view.max_health, 100.0);
        assert_eq!(view.equipment.len(), 5);
        assert_eq!(view.equipped(EquipSlot::Weapon), Some("Fine Sword"));
        assert_eq!(view.equipped(EquipSlot::Headwear), Some("Regular Helmet"));
        assert_eq!(view.equipped(EquipSlot::Footwear), None);

        let json: serde_json::Value = serde_json::from_str(&view.to_json().unwrap()).unwrap();
        assert_eq!(json["name"], "Hero");
        assert_eq!(json["action_points"], 100);
    }

    #[test]
    fn test_inventory_view() {
        let mut inventory = InventoryManager::new();
        inventory.add_item(health_potion(5.0, 5.0)).unwrap();
        inventory.add_item(sword(Quality::Regular)).unwrap();
        inventory.add_currency(12);

        let view = InventoryView::from_inventory(&inventory);
        assert_eq!(view.names(), vec!["Health Potion", "Regular Sword"]);
        assert_eq!(view.current_weight, 15.0);
        assert_eq!(view.max_carry_weight, 200.0);
        assert_eq!(view.currency, 12);
    }
}
