//! The 10x10 zone grid and its tiles.
//!
//! The zone is the arena for every character in play: tiles refer to
//! characters by [`CharacterId`] and the zone keeps the characters
//! themselves. Events raised while mutating the zone are queued on its
//! outbox until the game drains them.

use crate::character::{Character, CharacterId};
use crate::events::GameEvent;
use crate::items::{Item, ItemId};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::fmt;
use thiserror::Error;

/// Width and height of a zone.
pub const ZONE_SIZE: i32 = 10;

pub const DEFAULT_SPRITE: &str = "empty";

#[derive(Debug, Error, PartialEq)]
pub enum ZoneError {
    #[error("Coordinate ({row}, {column}) is out of bounds")]
    OutOfBounds { row: i32, column: i32 },

    #[error("There is already a character in this tile")]
    TileOccupied,

    #[error("There is no character in this tile")]
    EmptyTile,

    #[error("Item not in tile")]
    ItemNotOnTile,

    #[error("Unknown character: {0}")]
    UnknownCharacter(CharacterId),

    #[error("Character {0} is already on the grid")]
    AlreadyPlaced(CharacterId),

    #[error("Character {0} is dead")]
    DeadCharacter(CharacterId),
}

// ============================================================================
// Coordinates
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    pub row: i32,
    pub column: i32,
}

impl Coordinate {
    pub fn new(row: i32, column: i32) -> Self {
        Self { row, column }
    }

    pub fn in_bounds(&self) -> bool {
        (0..ZONE_SIZE).contains(&self.row) && (0..ZONE_SIZE).contains(&self.column)
    }

    /// The neighbouring coordinate in `direction`. May be out of bounds.
    pub fn offset(&self, direction: Direction) -> Coordinate {
        let (dr, dc) = direction.delta();
        Coordinate::new(self.row + dr, self.column + dc)
    }

    /// King-move distance: the larger of the row and column deltas.
    pub fn chebyshev_distance(&self, other: Coordinate) -> i32 {
        (self.row - other.row)
            .abs()
            .max((self.column - other.column).abs())
    }

    fn index(&self) -> Result<usize, ZoneError> {
        if !self.in_bounds() {
            return Err(ZoneError::OutOfBounds {
                row: self.row,
                column: self.column,
            });
        }
        Ok((self.row * ZONE_SIZE + self.column) as usize)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// The eight compass directions. Rows grow downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    /// (row, column) step.
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::North => (-1, 0),
            Direction::NorthEast => (-1, 1),
            Direction::East => (0, 1),
            Direction::SouthEast => (1, 1),
            Direction::South => (1, 0),
            Direction::SouthWest => (1, -1),
            Direction::West => (0, -1),
            Direction::NorthWest => (-1, -1),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Direction::North => "North",
            Direction::NorthEast => "North-East",
            Direction::East => "East",
            Direction::SouthEast => "South-East",
            Direction::South => "South",
            Direction::SouthWest => "South-West",
            Direction::West => "West",
            Direction::NorthWest => "North-West",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ============================================================================
// Tile
// ============================================================================

/// One grid cell: at most one character and any number of dropped items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tile {
    sprite: String,
    character: Option<CharacterId>,
    items: Vec<Item>,
}

impl Tile {
    pub fn new(sprite: impl Into<String>) -> Self {
        Self {
            sprite: sprite.into(),
            character: None,
            items: Vec::new(),
        }
    }

    pub fn add_character(&mut self, id: CharacterId) -> Result<(), ZoneError> {
        if self.character.is_some() {
            return Err(ZoneError::TileOccupied);
        }
        self.character = Some(id);
        Ok(())
    }

    pub fn remove_character(&mut self) -> Result<CharacterId, ZoneError> {
        self.character.take().ok_or(ZoneError::EmptyTile)
    }

    pub fn character(&self) -> Option<CharacterId> {
        self.character
    }

    pub fn has_character(&self) -> bool {
        self.character.is_some()
    }

    pub fn add_item(&mut self, item: Item) {
        self.items.push(item);
    }

    pub fn remove_item(&mut self, id: ItemId) -> Result<Item, ZoneError> {
        let index = self
            .items
            .iter()
            .position(|i| i.id == id)
            .ok_or(ZoneError::ItemNotOnTile)?;
        Ok(self.items.remove(index))
    }

    /// Dropped items in the order they landed.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn sprite(&self) -> &str {
        &self.sprite
    }
}

impl Default for Tile {
    fn default() -> Self {
        Self::new(DEFAULT_SPRITE)
    }
}

// ============================================================================
// Zone
// ============================================================================

#[derive(Debug, Clone)]
pub struct Zone {
    tiles: Vec<Tile>,
    characters: HashMap<CharacterId, Character>,
    /// NPCs in placement order; rounds visit them in this order.
    npcs: Vec<CharacterId>,
    player: Option<CharacterId>,
    outbox: VecDeque<GameEvent>,
}

impl Default for Zone {
    fn default() -> Self {
        Self::new()
    }
}

impl Zone {
    pub fn new() -> Self {
        let tiles = (0..ZONE_SIZE * ZONE_SIZE).map(|_| Tile::default()).collect();
        Self {
            tiles,
            characters: HashMap::new(),
            npcs: Vec::new(),
            player: None,
            outbox: VecDeque::new(),
        }
    }

    pub fn get_tile(&self, coord: Coordinate) -> Result<&Tile, ZoneError> {
        let index = coord.index()?;
        Ok(&self.tiles[index])
    }

    pub fn get_tile_mut(&mut self, coord: Coordinate) -> Result<&mut Tile, ZoneError> {
        let index = coord.index()?;
        Ok(&mut self.tiles[index])
    }

    // ------------------------------------------------------------------------
    // Characters
    // ------------------------------------------------------------------------

    /// Put a character on the grid. The zone takes ownership; the returned id
    /// is the handle for every later operation.
    ///
    /// A character whose id is already on the grid (a clone, say) is
    /// refused, as is a dead one.
    pub fn place_character(
        &mut self,
        mut character: Character,
        coord: Coordinate,
    ) -> Result<CharacterId, ZoneError> {
        let id = character.id;
        if !character.is_alive() {
            return Err(ZoneError::DeadCharacter(id));
        }
        if self.characters.get(&id).is_some_and(|c| c.position.is_some()) {
            return Err(ZoneError::AlreadyPlaced(id));
        }
        self.get_tile_mut(coord)?.add_character(id)?;

        character.position = Some(coord);
        if character.is_player() {
            self.player = Some(id);
        } else if !self.npcs.contains(&id) {
            self.npcs.push(id);
        }

        tracing::debug!(character = %character.name, position = %coord, "Placed character");
        self.characters.insert(id, character);
        Ok(id)
    }

    /// Move a placed character. An occupied destination leaves everything
    /// as it was and returns `false`; attacking is the caller's decision.
    pub fn move_character(&mut self, id: CharacterId, to: Coordinate) -> Result<bool, ZoneError> {
        let to_index = to.index()?;
        if self.tiles[to_index].has_character() {
            return Ok(false);
        }

        let from = self
            .characters
            .get(&id)
            .and_then(Character::position)
            .ok_or(ZoneError::UnknownCharacter(id))?;
        let from_index = from.index()?;

        self.tiles[from_index].remove_character()?;
        self.tiles[to_index].add_character(id)?;
        if let Some(character) = self.characters.get_mut(&id) {
            character.position = Some(to);
        }

        self.emit_event(GameEvent::move_event());
        Ok(true)
    }

    /// Take a character off the grid and out of the NPC list or player slot.
    /// The character itself stays in the arena so it can still be inspected.
    pub fn remove_character(&mut self, id: CharacterId) -> Result<(), ZoneError> {
        let character = self
            .characters
            .get_mut(&id)
            .ok_or(ZoneError::UnknownCharacter(id))?;
        let coord = character.position.take().ok_or(ZoneError::EmptyTile)?;

        let index = coord.index()?;
        self.tiles[index].remove_character()?;

        self.npcs.retain(|npc| *npc != id);
        if self.player == Some(id) {
            self.player = None;
        }
        Ok(())
    }

    /// Remove a character from the zone entirely and hand it back.
    pub fn take_character(&mut self, id: CharacterId) -> Option<Character> {
        if self.characters.get(&id)?.position.is_some() {
            // Position was just checked, so only an inconsistent grid fails here
            if let Err(e) = self.remove_character(id) {
                tracing::warn!(character = %id, error = %e, "Grid out of sync while taking character");
            }
        }
        self.characters.remove(&id)
    }

    pub fn character(&self, id: CharacterId) -> Option<&Character> {
        self.characters.get(&id)
    }

    pub fn character_mut(&mut self, id: CharacterId) -> Option<&mut Character> {
        self.characters.get_mut(&id)
    }

    /// Every character the zone knows about, placed or dead.
    pub fn characters(&self) -> impl Iterator<Item = &Character> {
        self.characters.values()
    }

    pub fn character_at(&self, coord: Coordinate) -> Option<&Character> {
        let id = self.get_tile(coord).ok()?.character()?;
        self.characters.get(&id)
    }

    pub fn npc_ids(&self) -> &[CharacterId] {
        &self.npcs
    }

    pub fn player_id(&self) -> Option<CharacterId> {
        self.player
    }

    pub fn player(&self) -> Option<&Character> {
        self.player.and_then(|id| self.characters.get(&id))
    }

    // ------------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------------

    pub fn emit_event(&mut self, event: GameEvent) {
        self.outbox.push_back(event);
    }

    /// Next queued event, oldest first.
    pub fn next_event(&mut self) -> Option<GameEvent> {
        self.outbox.pop_front()
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.outbox.drain(..).collect()
    }

    pub fn pending_events(&self) -> usize {
        self.outbox.len()
    }
}
