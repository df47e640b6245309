//! Testing utilities for the game.
//!
//! This module provides tools for integration testing:
//! - `ScriptedChooser` for deterministic NPC wandering
//! - `EventLog` for recording what the game routes outward
//! - `TestHarness` for scripted game scenarios
//! - Assertion helpers for verifying game state

use crate::ai::MoveChooser;
use crate::character::{Character, CharacterId};
use crate::config::GameConfig;
use crate::events::{EventKind, EventListener, GameEvent};
use crate::game::{Game, GameError};
use crate::items::Item;
use crate::zone::{Coordinate, ZoneError};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// A move chooser that returns scripted picks in order, then 0 forever.
#[derive(Debug, Clone, Default)]
pub struct ScriptedChooser {
    picks: VecDeque<usize>,
    calls: usize,
}

impl ScriptedChooser {
    pub fn new(picks: impl IntoIterator<Item = usize>) -> Self {
        Self {
            picks: picks.into_iter().collect(),
            calls: 0,
        }
    }

    /// Queue another pick.
    pub fn push(&mut self, pick: usize) {
        self.picks.push_back(pick);
    }

    /// How many choices have been asked for.
    pub fn calls(&self) -> usize {
        self.calls
    }
}

impl MoveChooser for ScriptedChooser {
    fn choose(&mut self, _count: usize) -> usize {
        self.calls += 1;
        self.picks.pop_front().unwrap_or(0)
    }
}

#[derive(Debug, Default)]
struct Recorded {
    events: Vec<GameEvent>,
    state_changes: usize,
}

/// A listener that records every event it receives.
///
/// Clones share the same record, so keep one clone and register another.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    inner: Rc<RefCell<Recorded>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<GameEvent> {
        self.inner.borrow().events.clone()
    }

    pub fn kinds(&self) -> Vec<EventKind> {
        self.inner.borrow().events.iter().map(GameEvent::kind).collect()
    }

    /// Text of every message event, in order.
    pub fn messages(&self) -> Vec<String> {
        self.inner
            .borrow()
            .events
            .iter()
            .filter_map(|e| e.text().map(str::to_string))
            .collect()
    }

    pub fn count(&self, kind: EventKind) -> usize {
        self.inner
            .borrow()
            .events
            .iter()
            .filter(|e| e.kind() == kind)
            .count()
    }

    pub fn state_changes(&self) -> usize {
        self.inner.borrow().state_changes
    }

    pub fn clear(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.events.clear();
        inner.state_changes = 0;
    }
}

impl EventListener for EventLog {
    fn handle_event(&mut self, event: &GameEvent) {
        self.inner.borrow_mut().events.push(event.clone());
    }

    fn state_changed(&mut self) {
        self.inner.borrow_mut().state_changes += 1;
    }
}

/// Test harness for running scripted game scenarios.
pub struct TestHarness {
    /// The game under test.
    pub game: Game,
    /// Everything the game routed to its listener.
    pub log: EventLog,
}

impl TestHarness {
    /// An empty zone with a full-health player at (0, 0).
    pub fn new() -> Result<Self, GameError> {
        Self::with_config(GameConfig::empty())
    }

    /// Create a harness from a config. NPC wandering always picks the
    /// first free neighbour unless `script_wander` says otherwise.
    pub fn with_config(config: GameConfig) -> Result<Self, GameError> {
        let log = EventLog::new();
        let mut game = Game::new(config)?.with_chooser(ScriptedChooser::default());
        game.initialize()?;
        game.register_listener(log.clone());
        Ok(Self { game, log })
    }

    /// Script the next wander picks.
    pub fn script_wander(&mut self, picks: impl IntoIterator<Item = usize>) -> &mut Self {
        self.game.set_chooser(ScriptedChooser::new(picks));
        self
    }

    /// Place an extra character and return its id.
    pub fn spawn(&mut self, character: Character, at: Coordinate) -> Result<CharacterId, ZoneError> {
        self.game.zone_mut().place_character(character, at)
    }

    /// Drop an item on a tile.
    pub fn drop_on(&mut self, at: Coordinate, item: Item) -> Result<(), ZoneError> {
        self.game.zone_mut().get_tile_mut(at)?.add_item(item);
        Ok(())
    }

    pub fn player(&self) -> Option<&Character> {
        self.game.player()
    }

    pub fn player_mut(&mut self) -> Option<&mut Character> {
        let id = self.game.player_id()?;
        self.game.zone_mut().character_mut(id)
    }

    pub fn character(&self, id: CharacterId) -> Option<&Character> {
        self.game.zone().character(id)
    }

    pub fn character_mut(&mut self, id: CharacterId) -> Option<&mut Character> {
        self.game.zone_mut().character_mut(id)
    }

    /// Get current player HP (0 without a player).
    pub fn player_hp(&self) -> f64 {
        self.player().map_or(0.0, Character::health)
    }

    pub fn player_ap(&self) -> i32 {
        self.player().map_or(0, Character::action_points)
    }

    pub fn player_position(&self) -> Option<Coordinate> {
        self.player().and_then(Character::position)
    }

    pub fn messages(&self) -> Vec<String> {
        self.log.messages()
    }

    pub fn last_message(&self) -> Option<String> {
        self.log.messages().pop()
    }
}

// ============================================================================
// Assertion Helpers
// ============================================================================

/// Assert the player's current health.
#[track_caller]
pub fn assert_hp(harness: &TestHarness, current: f64) {
    let actual = harness.player_hp();
    assert!(
        (actual - current).abs() < 1e-9,
        "Expected player HP {current}, got {actual}"
    );
}

/// Assert the player's action points.
#[track_caller]
pub fn assert_ap(harness: &TestHarness, expected: i32) {
    assert_eq!(harness.player_ap(), expected, "Unexpected player AP");
}

/// Assert where a character stands.
#[track_caller]
pub fn assert_at(harness: &TestHarness, id: CharacterId, coord: Coordinate) {
    let position = harness.character(id).and_then(Character::position);
    assert_eq!(position, Some(coord), "Expected character {id} at {coord}");
}

/// Assert that some message with exactly this text was routed.
#[track_caller]
pub fn assert_message(harness: &TestHarness, text: &str) {
    let messages = harness.messages();
    assert!(
        messages.iter().any(|m| m == text),
        "Expected message '{text}', got {messages:?}"
    );
}

/// Assert a character is dead and gone from the grid.
#[track_caller]
pub fn assert_dead(harness: &TestHarness, id: CharacterId) {
    let character = harness.character(id);
    assert!(
        character.is_some_and(|c| !c.is_alive() && c.position().is_none()),
        "Expected character {id} to be dead and off the grid"
    );
}

#[track_caller]
pub fn assert_alive(harness: &TestHarness, id: CharacterId) {
    assert!(
        harness.character(id).is_some_and(Character::is_alive),
        "Expected character {id} to be alive"
    );
}
