//! Domain events emitted by the zone and characters.
//!
//! Events are queued on the zone's outbox as they happen and drained by
//! [`crate::game::Game::dispatch`], which routes them to the registered
//! [`EventListener`].

use crate::character::Character;
use serde::Serialize;
use std::fmt;

pub const WHITE: &str = "white";
pub const RED: &str = "red";

/// Tag of a [`GameEvent`], for matching without the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EventKind {
    Message,
    Move,
    TurnOver,
    PlayerUiChange,
    Inventory,
}

impl EventKind {
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::Message => "MESSAGE",
            EventKind::Move => "MOVE",
            EventKind::TurnOver => "TURN_OVER",
            EventKind::PlayerUiChange => "PLAYER_UI_CHANGE",
            EventKind::Inventory => "INVENTORY_EVENT",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    /// A line for the message log.
    #[serde(rename = "MESSAGE")]
    Message { color: String, text: String },
    /// Something moved on the grid.
    #[serde(rename = "MOVE")]
    Move,
    /// The player's turn is over; the next round should run.
    #[serde(rename = "TURN_OVER")]
    TurnOver,
    /// A player stat or equipment changed.
    #[serde(rename = "PLAYER_UI_CHANGE")]
    PlayerUiChange,
    /// The player's carried items changed.
    #[serde(rename = "INVENTORY_EVENT")]
    Inventory,
}

impl GameEvent {
    pub fn message(color: impl Into<String>, text: impl Into<String>) -> Self {
        GameEvent::Message {
            color: color.into(),
            text: text.into(),
        }
    }

    /// Describe an attack from the player's point of view.
    pub fn attack_message(attacker: &Character, defender: &Character, damage: f64) -> Self {
        let damage = format_damage(damage);
        let text = if attacker.is_player() {
            format!("You deal {damage} damage to {}.", defender.name)
        } else if defender.is_player() {
            format!("{} deals {damage} damage to you.", attacker.name)
        } else {
            format!("{} deals {damage} damage to {}.", attacker.name, defender.name)
        };
        Self::message(WHITE, text)
    }

    pub fn death_message(character: &Character) -> Self {
        Self::message(RED, character.death_message())
    }

    pub fn move_event() -> Self {
        GameEvent::Move
    }

    pub fn end_turn() -> Self {
        GameEvent::TurnOver
    }

    pub fn player_ui_change() -> Self {
        GameEvent::PlayerUiChange
    }

    pub fn inventory() -> Self {
        GameEvent::Inventory
    }

    pub fn kind(&self) -> EventKind {
        match self {
            GameEvent::Message { .. } => EventKind::Message,
            GameEvent::Move => EventKind::Move,
            GameEvent::TurnOver => EventKind::TurnOver,
            GameEvent::PlayerUiChange => EventKind::PlayerUiChange,
            GameEvent::Inventory => EventKind::Inventory,
        }
    }

    /// Message text, if this is a message.
    pub fn text(&self) -> Option<&str> {
        match self {
            GameEvent::Message { text, .. } => Some(text),
            _ => None,
        }
    }
}

/// Two decimals at most, without trailing zeros: 35, 7, 26.6, 26.67.
fn format_damage(damage: f64) -> String {
    let formatted = format!("{damage:.2}");
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

// ============================================================================
// Listeners
// ============================================================================

/// Receiver for events the game routes outward (the UI layer).
pub trait EventListener {
    fn handle_event(&mut self, event: &GameEvent);

    /// Called once a full round has been processed.
    fn state_changed(&mut self) {}
}

/// Adapts a closure into an [`EventListener`].
pub struct FnListener<F>(pub F);

impl<F: FnMut(&GameEvent)> EventListener for FnListener<F> {
    fn handle_event(&mut self, event: &GameEvent) {
        (self.0)(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_damage() {
        assert_eq!(format_damage(35.0), "35");
        assert_eq!(format_damage(7.0), "7");
        assert_eq!(format_damage(26.6), "26.6");
        assert_eq!(format_damage(80.0 / 3.0), "26.67");
    }

    #[test]
    fn test_attack_message_perspectives() {
        let player = Character::player("Hero");
        let swordsman = Character::swordsman();
        let goblin = Character::npc("Goblin");

        assert_eq!(
            GameEvent::attack_message(&player, &swordsman, 20.0).text(),
            Some("You deal 20 damage to Swordsman.")
        );
        assert_eq!(
            GameEvent::attack_message(&swordsman, &player, 35.0).text(),
            Some("Swordsman deals 35 damage to you.")
        );
        assert_eq!(
            GameEvent::attack_message(&swordsman, &goblin, 7.0).text(),
            Some("Swordsman deals 7 damage to Goblin.")
        );
    }

    #[test]
    fn test_death_message_is_red() {
        let event = GameEvent::death_message(&Character::swordsman());
        assert_eq!(
            event,
            GameEvent::message(RED, "Swordsman has died.")
        );
        assert_eq!(event.kind(), EventKind::Message);
    }

    #[test]
    fn test_kinds() {
        assert_eq!(GameEvent::end_turn().kind(), EventKind::TurnOver);
        assert_eq!(GameEvent::move_event().kind(), EventKind::Move);
        assert_eq!(GameEvent::inventory().kind().name(), "INVENTORY_EVENT");
        assert!(GameEvent::player_ui_change().text().is_none());
    }

    #[test]
    fn test_serialize_tagged() {
        let json = serde_json::to_value(GameEvent::message(WHITE, "hi")).unwrap();
        assert_eq!(json["type"], "MESSAGE");
        assert_eq!(json["color"], "white");
        assert_eq!(json["text"], "hi");

        let json = serde_json::to_value(GameEvent::end_turn()).unwrap();
        assert_eq!(json["type"], "TURN_OVER");
    }

    #[test]
    fn test_fn_listener() {
        let mut seen = Vec::new();
        {
            let mut listener = FnListener(|e: &GameEvent| seen.push(e.kind()));
            listener.handle_event(&GameEvent::move_event());
            listener.state_changed();
        }
        assert_eq!(seen, vec![EventKind::Move]);
    }
}
