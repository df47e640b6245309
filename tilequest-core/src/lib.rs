//! Turn-based 10x10 grid RPG simulation.
//!
//! This crate provides:
//! - Items with quality tiers, equipment slots and carry weight
//! - Characters with action points, status effects and a turn lifecycle
//! - A zone grid with movement, collision and combat
//! - A simple NPC AI that hunts the player or wanders
//! - A game orchestrator that routes events to a UI listener
//!
//! # Quick Start
//!
//! ```ignore
//! use tilequest_core::{Direction, Game, GameConfig};
//! use tilequest_core::events::FnListener;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut game = Game::new(GameConfig::new().with_seed(7))?;
//!     game.initialize()?;
//!     game.register_listener(FnListener(|event: &tilequest_core::GameEvent| {
//!         if let Some(text) = event.text() {
//!             println!("{text}");
//!         }
//!     }));
//!
//!     game.move_player(Direction::SouthEast)?;
//!     println!("{}", game.zone_view().render());
//!     Ok(())
//! }
//! ```

pub mod ai;
pub mod character;
pub mod config;
pub mod effects;
pub mod events;
pub mod game;
pub mod headless;
pub mod inventory;
pub mod items;
pub mod testing;
pub mod turn;
pub mod view;
pub mod zone;

// Primary public API
pub use ai::{MoveChooser, RandomChooser};
pub use character::{Character, CharacterId, CharacterKind};
pub use config::{GameConfig, NpcKind};
pub use events::{EventKind, EventListener, GameEvent};
pub use game::{Game, GameError, MoveOutcome};
pub use headless::{Command, HeadlessGame};
pub use inventory::{InventoryError, InventoryManager};
pub use items::{find_item, EquipSlot, Item, ItemId, Quality};
pub use testing::{EventLog, ScriptedChooser, TestHarness};
pub use zone::{Coordinate, Direction, Tile, Zone, ZoneError};
