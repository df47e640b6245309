//! The game orchestrator.
//!
//! The game owns the active zone and the player handle. Characters and the
//! zone queue events as they act; [`Game::dispatch`] drains that queue in
//! order, running a round of turns for every `TurnOver` and forwarding
//! everything else to the registered listener. Turn advancement is
//! therefore never re-entrant: a round triggered mid-command runs after the
//! events already queued ahead of it have been routed.

use crate::ai::{MoveChooser, RandomChooser};
use crate::character::{Character, CharacterId};
use crate::config::GameConfig;
use crate::effects::StatusEffect;
use crate::events::{EventListener, GameEvent};
use crate::inventory::InventoryError;
use crate::items::{find_item, EquipSlot, Item, ItemId};
use crate::turn::{self, MOVE_COST};
use crate::view::{InventoryView, PlayerView, ZoneView};
use crate::zone::{Coordinate, Direction, Zone, ZoneError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("Zone error: {0}")]
    Zone(#[from] ZoneError),

    #[error("Inventory error: {0}")]
    Inventory(#[from] InventoryError),

    #[error("{0} is dead")]
    CharacterDead(String),

    #[error("No player in the game")]
    PlayerMissing,

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// What a directional command turned into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveOutcome {
    Moved(Coordinate),
    /// Someone stood in the way and got hit instead.
    Attacked { target: CharacterId, damage: f64 },
}

pub struct Game {
    config: GameConfig,
    zone: Zone,
    player: Option<CharacterId>,
    listener: Option<Box<dyn EventListener>>,
    chooser: Box<dyn MoveChooser>,
    rounds: u32,
}

impl Game {
    /// Create a game from a validated config. The zone stays empty until
    /// [`Game::initialize`].
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        config.validate()?;
        let chooser = match config.seed {
            Some(seed) => RandomChooser::from_seed(seed),
            None => RandomChooser::from_entropy(),
        };
        Ok(Self {
            config,
            zone: Zone::new(),
            player: None,
            listener: None,
            chooser: Box::new(chooser),
            rounds: 0,
        })
    }

    /// Replace the source of NPC wander choices.
    pub fn with_chooser(mut self, chooser: impl MoveChooser + 'static) -> Self {
        self.set_chooser(chooser);
        self
    }

    pub fn set_chooser(&mut self, chooser: impl MoveChooser + 'static) {
        self.chooser = Box::new(chooser);
    }

    /// Build a fresh zone with the player and starting NPCs in place.
    pub fn initialize(&mut self) -> Result<(), GameError> {
        let mut zone = Zone::new();

        let mut player = Character::player(&self.config.player_name)
            .with_max_carry_weight(self.config.max_carry_weight)
            .with_health(self.config.player_health);
        for name in &self.config.starting_items {
            let item = find_item(name)
                .ok_or_else(|| GameError::Config(format!("unknown item '{name}'")))?;
            player.add_item(item)?;
        }
        player.taking_turn = true;
        let player_id = zone.place_character(player, self.config.player_start)?;

        for spawn in &self.config.npcs {
            zone.place_character(spawn.kind.build(), spawn.position)?;
        }

        tracing::debug!(
            player = %self.config.player_name,
            npcs = self.config.npcs.len(),
            "Zone initialized"
        );
        self.zone = zone;
        self.player = Some(player_id);
        self.rounds = 0;
        Ok(())
    }

    pub fn register_listener(&mut self, listener: impl EventListener + 'static) {
        self.listener = Some(Box::new(listener));
    }

    // ========================================================================
    // Event routing
    // ========================================================================

    /// Route one event from outside the game. A turn-over runs the next
    /// round through [`Game::take_turn`], so the round's own events are
    /// routed and the listener hears `state_changed`. Anything else goes
    /// straight to the listener.
    pub fn handle_event(&mut self, event: GameEvent) -> Result<(), GameError> {
        match event {
            GameEvent::TurnOver => self.take_turn(),
            other => {
                self.notify_listener(&other);
                Ok(())
            }
        }
    }

    /// Drain the zone's queued events in order. Rounds triggered while
    /// draining queue their own events behind the current ones. The
    /// listener hears `state_changed` once the queue is empty if any round
    /// ran.
    pub fn dispatch(&mut self) -> Result<(), GameError> {
        self.drain_outbox(false)
    }

    /// Run one round (every NPC, then the player) and route the results.
    pub fn take_turn(&mut self) -> Result<(), GameError> {
        self.run_round()?;
        self.drain_outbox(true)
    }

    fn notify_listener(&mut self, event: &GameEvent) {
        if let Some(listener) = self.listener.as_mut() {
            listener.handle_event(event);
        }
    }

    fn drain_outbox(&mut self, round_ran: bool) -> Result<(), GameError> {
        let mut rounds_run = 0;
        while let Some(event) = self.zone.next_event() {
            if event != GameEvent::TurnOver {
                self.notify_listener(&event);
                continue;
            }
            if rounds_run >= self.config.round_limit {
                tracing::warn!(
                    limit = self.config.round_limit,
                    "Round limit reached, dropping turn-over"
                );
                continue;
            }
            rounds_run += 1;
            self.run_round()?;
        }

        if round_ran || rounds_run > 0 {
            if let Some(listener) = self.listener.as_mut() {
                listener.state_changed();
            }
        }
        Ok(())
    }

    fn run_round(&mut self) -> Result<(), GameError> {
        self.rounds += 1;
        tracing::debug!(round = self.rounds, "Round start");

        let npcs = self.zone.npc_ids().to_vec();
        for npc in npcs {
            turn::preprocess_turn(&mut self.zone, npc, self.chooser.as_mut())?;
        }
        // The player may have been taken out of the zone entirely
        let player = self.player.filter(|id| self.zone.character(*id).is_some());
        if let Some(player) = player {
            turn::preprocess_turn(&mut self.zone, player, self.chooser.as_mut())?;
        }
        Ok(())
    }

    // ========================================================================
    // Commands
    // ========================================================================

    /// The player's id, if the player is still alive.
    fn acting_player(&self) -> Result<CharacterId, GameError> {
        let id = self.player.ok_or(GameError::PlayerMissing)?;
        let player = self.zone.character(id).ok_or(GameError::PlayerMissing)?;
        if !player.is_alive() {
            return Err(GameError::CharacterDead(player.name.clone()));
        }
        Ok(id)
    }

    fn player_mut(&mut self) -> Result<&mut Character, GameError> {
        let id = self.acting_player()?;
        self.zone.character_mut(id).ok_or(GameError::PlayerMissing)
    }

    fn player_position(&self) -> Result<Coordinate, GameError> {
        let id = self.acting_player()?;
        self.zone
            .character(id)
            .and_then(Character::position)
            .ok_or(GameError::PlayerMissing)
    }

    /// Step one tile. A character in the way is attacked instead; a step
    /// off the grid is refused without spending anything.
    pub fn move_player(&mut self, direction: Direction) -> Result<MoveOutcome, GameError> {
        let player = self.acting_player()?;
        let to = self.player_position()?.offset(direction);

        let occupant = self.zone.get_tile(to)?.character();
        let outcome = match occupant {
            Some(target) => {
                let damage = turn::attack(&mut self.zone, player, target)?;
                MoveOutcome::Attacked { target, damage }
            }
            None => {
                turn::reduce_action_points(&mut self.zone, player, MOVE_COST)?;
                self.zone.move_character(player, to)?;
                MoveOutcome::Moved(to)
            }
        };

        self.dispatch()?;
        Ok(outcome)
    }

    /// Attack a living character. Returns the damage dealt.
    pub fn attack(&mut self, target: CharacterId) -> Result<f64, GameError> {
        let player = self.acting_player()?;
        let victim = self
            .zone
            .character(target)
            .ok_or(ZoneError::UnknownCharacter(target))?;
        if !victim.is_alive() {
            return Err(GameError::CharacterDead(victim.name.clone()));
        }

        let damage = turn::attack(&mut self.zone, player, target)?;
        self.dispatch()?;
        Ok(damage)
    }

    /// Equip a carried item. Whatever it displaces goes back into the pack.
    pub fn equip(&mut self, id: ItemId) -> Result<(), GameError> {
        let player = self.player_mut()?;
        let item = player
            .inventory
            .find(id)
            .cloned()
            .ok_or(InventoryError::ItemNotFound)?;
        player.equip_item(item)?;

        self.notify_player_changed(true);
        self.dispatch()
    }

    /// Unequip a slot back into the pack. If the pack cannot take the
    /// weight the item is dropped on the player's tile. An empty slot is
    /// a quiet no-op.
    pub fn unequip(&mut self, slot: EquipSlot) -> Result<Option<ItemId>, GameError> {
        let position = self.player_position()?;
        let player = self.player_mut()?;
        let Some(item) = player.unequip_item(slot) else {
            return Ok(None);
        };
        let id = item.id;

        if let Err(e) = player.add_item(item.clone()) {
            tracing::debug!(item = %item, error = %e, "Pack full, dropping unequipped item");
            self.zone.get_tile_mut(position)?.add_item(item);
        }

        self.notify_player_changed(true);
        self.dispatch()?;
        Ok(Some(id))
    }

    /// Drink a carried consumable.
    pub fn consume(&mut self, id: ItemId) -> Result<StatusEffect, GameError> {
        let effect = self.player_mut()?.consume_item(id)?;
        self.notify_player_changed(false);
        self.dispatch()?;
        Ok(effect)
    }

    pub fn add_item(&mut self, item: Item) -> Result<(), GameError> {
        self.player_mut()?.add_item(item)?;
        self.notify_player_changed(false);
        self.dispatch()
    }

    pub fn remove_item(&mut self, id: ItemId) -> Result<Item, GameError> {
        let item = self.player_mut()?.remove_item(id)?;
        self.notify_player_changed(false);
        self.dispatch()?;
        Ok(item)
    }

    /// Pick an item up from the player's tile. If it is too heavy it stays
    /// where it was.
    pub fn pick_up(&mut self, id: ItemId) -> Result<(), GameError> {
        let position = self.player_position()?;
        let item = self.zone.get_tile_mut(position)?.remove_item(id)?;

        if let Err(e) = self.player_mut()?.add_item(item.clone()) {
            self.zone.get_tile_mut(position)?.add_item(item);
            return Err(e.into());
        }

        self.notify_player_changed(false);
        self.dispatch()
    }

    /// Drop a carried item onto the player's tile.
    pub fn drop_item(&mut self, id: ItemId) -> Result<(), GameError> {
        let position = self.player_position()?;
        let item = self.player_mut()?.remove_item(id)?;
        self.zone.get_tile_mut(position)?.add_item(item);

        self.notify_player_changed(false);
        self.dispatch()
    }

    /// End the player's turn voluntarily; the next round runs.
    pub fn end_turn(&mut self) -> Result<(), GameError> {
        let player = self.acting_player()?;
        turn::end_turn(&mut self.zone, player)?;
        self.dispatch()
    }

    fn notify_player_changed(&mut self, equipment: bool) {
        if equipment {
            self.zone.emit_event(GameEvent::player_ui_change());
        }
        self.zone.emit_event(GameEvent::inventory());
    }

    // ========================================================================
    // State queries
    // ========================================================================

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn zone(&self) -> &Zone {
        &self.zone
    }

    pub fn zone_mut(&mut self) -> &mut Zone {
        &mut self.zone
    }

    /// The player's id, alive or not.
    pub fn player_id(&self) -> Option<CharacterId> {
        self.player
    }

    pub fn player(&self) -> Option<&Character> {
        self.player.and_then(|id| self.zone.character(id))
    }

    pub fn is_player_alive(&self) -> bool {
        self.player().is_some_and(Character::is_alive)
    }

    /// Rounds run since the last initialize.
    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    pub fn zone_view(&self) -> ZoneView {
        ZoneView::from_zone(&self.zone)
    }

    pub fn player_view(&self) -> Option<PlayerView> {
        self.player().map(PlayerView::from_character)
    }

    pub fn inventory_view(&self) -> Option<InventoryView> {
        self.player().map(|p| InventoryView::from_inventory(&p.inventory))
    }
}
