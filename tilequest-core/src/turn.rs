//! Turn lifecycle and combat resolution.
//!
//! These operations touch more than one character (or a character and the
//! zone), so they run against the zone's arena by id rather than living on
//! [`Character`] itself.

use crate::ai::{self, MoveChooser};
use crate::character::{Character, CharacterId};
use crate::events::GameEvent;
use crate::zone::{Zone, ZoneError};

/// AP spent on one attack.
pub const ATTACK_COST: i32 = 50;
/// AP spent on one step.
pub const MOVE_COST: i32 = 100;

/// Defense can absorb at most this share of an attack.
const MAX_REDUCTION_RATIO: f64 = 0.80;
/// Share of the attack that always lands once the cap is reached.
const MIN_DAMAGE_SHARE: f64 = 0.20;

/// Final damage for `attack` against `defense`.
///
/// Defense is weighed against twice the attack; at a ratio of 0.8 or more
/// only a fifth of the attack gets through.
pub fn damage_after_defense(attack: f64, defense: f64) -> f64 {
    if attack <= 0.0 {
        return 0.0;
    }
    let ratio = defense / (attack * 2.0);
    if ratio >= MAX_REDUCTION_RATIO {
        attack * MIN_DAMAGE_SHARE
    } else {
        attack * (1.0 - ratio)
    }
}

fn lookup(zone: &Zone, id: CharacterId) -> Result<&Character, ZoneError> {
    zone.character(id).ok_or(ZoneError::UnknownCharacter(id))
}

fn lookup_mut(zone: &mut Zone, id: CharacterId) -> Result<&mut Character, ZoneError> {
    zone.character_mut(id).ok_or(ZoneError::UnknownCharacter(id))
}

// ============================================================================
// Combat
// ============================================================================

/// Resolve one attack. The attack message is queued first, then the
/// attacker pays for the swing, then the target takes the damage (so any
/// death message lands after the attack message). Returns the damage dealt.
pub fn attack(zone: &mut Zone, attacker: CharacterId, target: CharacterId) -> Result<f64, ZoneError> {
    let (damage, message) = {
        let a = lookup(zone, attacker)?;
        let t = lookup(zone, target)?;
        let damage = damage_after_defense(a.calc_damage(), t.calc_defense());
        tracing::debug!(attacker = %a.name, target = %t.name, damage, "Attack");
        (damage, GameEvent::attack_message(a, t, damage))
    };

    zone.emit_event(message);
    reduce_action_points(zone, attacker, ATTACK_COST)?;
    reduce_health(zone, target, damage)?;
    Ok(damage)
}

/// Subtract health (never below zero). A placed character reaching zero
/// dies: it leaves the zone and a death message is queued. This happens
/// once; later reductions only lower a corpse's health further.
///
/// Returns true if this call killed the character.
pub fn reduce_health(zone: &mut Zone, id: CharacterId, amount: f64) -> Result<bool, ZoneError> {
    let character = lookup_mut(zone, id)?;
    character.stats.health.current = (character.stats.health.current - amount).max(0.0);

    let is_player = character.is_player();
    let dies = character.alive && character.health() <= 0.0;
    let placed = character.position.is_some();
    if dies {
        character.alive = false;
        character.taking_turn = false;
    }
    let death = if dies {
        Some(GameEvent::death_message(character))
    } else {
        None
    };
    let name = character.name.clone();

    if is_player {
        zone.emit_event(GameEvent::player_ui_change());
    }

    match death {
        Some(message) if placed => {
            zone.remove_character(id)?;
            zone.emit_event(message);
            tracing::info!(character = %name, "Character died");
            Ok(true)
        }
        Some(_) => {
            tracing::info!(character = %name, "Unplaced character died");
            Ok(true)
        }
        None => Ok(false),
    }
}

// ============================================================================
// Turn lifecycle
// ============================================================================

/// Spend action points; running out ends the turn.
pub fn reduce_action_points(zone: &mut Zone, id: CharacterId, cost: i32) -> Result<(), ZoneError> {
    let character = lookup_mut(zone, id)?;
    character.stats.action_points -= cost;
    let exhausted = character.action_points() <= 0;

    if character.is_player() {
        zone.emit_event(GameEvent::player_ui_change());
    }
    if exhausted {
        end_turn(zone, id)?;
    }
    Ok(())
}

/// Stop acting. For the player this signals the game to run the next round.
pub fn end_turn(zone: &mut Zone, id: CharacterId) -> Result<(), ZoneError> {
    let character = lookup_mut(zone, id)?;
    character.taking_turn = false;
    if character.is_player() {
        zone.emit_event(GameEvent::end_turn());
    }
    Ok(())
}

/// Start-of-turn bookkeeping: restore AP, tick status effects, then either
/// end the turn right away (still in AP debt) or begin acting. NPCs act
/// through [`ai::take_turn`]; the player waits for commands.
pub fn preprocess_turn(
    zone: &mut Zone,
    id: CharacterId,
    chooser: &mut dyn MoveChooser,
) -> Result<(), ZoneError> {
    let character = lookup_mut(zone, id)?;
    if !character.is_alive() {
        return Ok(());
    }

    character.restore_ap();
    character.process_status_effects();
    let can_act = character.action_points() > 0;
    let is_player = character.is_player();

    if is_player {
        zone.emit_event(GameEvent::player_ui_change());
    }

    if !can_act {
        return end_turn(zone, id);
    }

    lookup_mut(zone, id)?.taking_turn = true;
    if !is_player {
        ai::take_turn(zone, id, chooser)?;
    }
    Ok(())
}
