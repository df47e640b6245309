//! Headless game interface for programmatic use.
//!
//! This module provides a simplified interface for running the game without
//! any UI. It's designed for:
//! - Integration tests that play through scenarios
//! - Scripted or bot-driven sessions
//! - Keyboard glue that maps key codes to [`Command`]s
//!
//! # Example
//!
//! ```ignore
//! use tilequest_core::headless::{Command, HeadlessGame};
//! use tilequest_core::{Direction, GameConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut game = HeadlessGame::new(GameConfig::new().with_seed(7))?;
//!
//!     let response = game.send(Command::Move(Direction::SouthEast))?;
//!     for line in &response.messages {
//!         println!("{line}");
//!     }
//!
//!     println!("HP: {}/{}", game.current_hp(), game.max_hp());
//!     Ok(())
//! }
//! ```

use crate::character::CharacterId;
use crate::config::GameConfig;
use crate::events::{FnListener, GameEvent};
use crate::game::{Game, GameError, MoveOutcome};
use crate::items::{EquipSlot, ItemId};
use crate::view::{InventoryView, PlayerView, ZoneView};
use crate::zone::{Coordinate, Direction};
use std::cell::RefCell;
use std::rc::Rc;

/// A player command, as a UI would issue it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    Attack(CharacterId),
    Equip(ItemId),
    Unequip(EquipSlot),
    Consume(ItemId),
    PickUp(ItemId),
    Drop(ItemId),
    EndTurn,
}

impl Command {
    /// Map a keyboard code to a command. WASD and the numpad move; Space
    /// and Numpad5 end the turn.
    pub fn from_key(code: &str) -> Option<Self> {
        let command = match code {
            "Space" | "Numpad5" => Command::EndTurn,
            "KeyW" | "Numpad8" => Command::Move(Direction::North),
            "KeyS" | "Numpad2" => Command::Move(Direction::South),
            "KeyA" | "Numpad4" => Command::Move(Direction::West),
            "KeyD" | "Numpad6" => Command::Move(Direction::East),
            "Numpad9" => Command::Move(Direction::NorthEast),
            "Numpad7" => Command::Move(Direction::NorthWest),
            "Numpad3" => Command::Move(Direction::SouthEast),
            "Numpad1" => Command::Move(Direction::SouthWest),
            _ => return None,
        };
        Some(command)
    }
}

/// A simplified response from the game.
#[derive(Debug, Clone)]
pub struct CommandResponse {
    /// Message log lines produced by this command.
    pub messages: Vec<String>,
    /// Current HP.
    pub current_hp: f64,
    /// Maximum HP.
    pub max_hp: f64,
    /// Action points left.
    pub action_points: i32,
    /// Whether the player is still alive.
    pub alive: bool,
}

/// A headless game that can be controlled programmatically.
///
/// This wraps [`Game`] and keeps the message log a UI would show.
pub struct HeadlessGame {
    game: Game,
    log: Rc<RefCell<Vec<String>>>,
}

impl HeadlessGame {
    /// Create and initialize a game with the given configuration.
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        Self::from_game(Game::new(config)?)
    }

    /// Wrap an existing game (e.g. one with a scripted chooser). The game
    /// is initialized and its listener replaced by the message log.
    pub fn from_game(mut game: Game) -> Result<Self, GameError> {
        game.initialize()?;

        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        game.register_listener(FnListener(move |event: &GameEvent| {
            if let Some(text) = event.text() {
                sink.borrow_mut().push(text.to_string());
            }
        }));

        Ok(Self { game, log })
    }

    /// Run a command and collect the messages it produced.
    pub fn send(&mut self, command: Command) -> Result<CommandResponse, GameError> {
        let before = self.log.borrow().len();

        match command {
            Command::Move(direction) => {
                if let MoveOutcome::Attacked { target, damage } = self.game.move_player(direction)? {
                    tracing::debug!(%target, damage, "Move became an attack");
                }
            }
            Command::Attack(target) => {
                self.game.attack(target)?;
            }
            Command::Equip(item) => self.game.equip(item)?,
            Command::Unequip(slot) => {
                self.game.unequip(slot)?;
            }
            Command::Consume(item) => {
                self.game.consume(item)?;
            }
            Command::PickUp(item) => self.game.pick_up(item)?,
            Command::Drop(item) => self.game.drop_item(item)?,
            Command::EndTurn => self.game.end_turn()?,
        }

        let messages = self.log.borrow()[before..].to_vec();
        Ok(CommandResponse {
            messages,
            current_hp: self.current_hp(),
            max_hp: self.max_hp(),
            action_points: self.action_points(),
            alive: self.game.is_player_alive(),
        })
    }

    // ========================================================================
    // Game State Queries
    // ========================================================================

    /// Every message logged so far.
    pub fn messages(&self) -> Vec<String> {
        self.log.borrow().clone()
    }

    /// Get the last message, if any.
    pub fn last_message(&self) -> Option<String> {
        self.log.borrow().last().cloned()
    }

    /// Get current HP.
    pub fn current_hp(&self) -> f64 {
        self.game.player().map_or(0.0, |p| p.health())
    }

    /// Get maximum HP.
    pub fn max_hp(&self) -> f64 {
        self.game.player().map_or(0.0, |p| p.max_health())
    }

    pub fn action_points(&self) -> i32 {
        self.game.player().map_or(0, |p| p.action_points())
    }

    /// Player position; `None` once the player has died.
    pub fn position(&self) -> Option<Coordinate> {
        self.game.player().and_then(|p| p.position())
    }

    /// Rounds played.
    pub fn rounds(&self) -> u32 {
        self.game.rounds()
    }

    pub fn zone_view(&self) -> ZoneView {
        self.game.zone_view()
    }

    pub fn player_view(&self) -> Option<PlayerView> {
        self.game.player_view()
    }

    pub fn inventory_view(&self) -> Option<InventoryView> {
        self.game.inventory_view()
    }

    /// Get the underlying game for advanced use.
    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Get mutable access to the underlying game.
    pub fn game_mut(&mut self) -> &mut Game {
        &mut self.game
    }
}
