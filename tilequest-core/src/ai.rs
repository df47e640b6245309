//! NPC decision making.
//!
//! Each decision spends AP or ends the turn, so [`take_turn`] always
//! terminates: attacking costs 50, stepping costs 100 (even if the step is
//! blocked) and a boxed-in wanderer gives up its turn.

use crate::character::CharacterId;
use crate::turn::{self, MOVE_COST};
use crate::zone::{Coordinate, Zone, ZoneError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// ============================================================================
// Random source
// ============================================================================

/// Source of choices for wandering NPCs.
pub trait MoveChooser {
    /// Pick an index in `0..count`. `count` is never zero.
    fn choose(&mut self, count: usize) -> usize;
}

/// Uniform choices from a seedable RNG.
#[derive(Debug, Clone)]
pub struct RandomChooser {
    rng: StdRng,
}

impl RandomChooser {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl MoveChooser for RandomChooser {
    fn choose(&mut self, count: usize) -> usize {
        self.rng.gen_range(0..count)
    }
}

// ============================================================================
// Turn
// ============================================================================

fn position_of(zone: &Zone, id: CharacterId) -> Result<Coordinate, ZoneError> {
    zone.character(id)
        .ok_or(ZoneError::UnknownCharacter(id))?
        .position()
        .ok_or(ZoneError::EmptyTile)
}

fn can_keep_acting(zone: &Zone, id: CharacterId) -> bool {
    zone.character(id).is_some_and(|npc| {
        npc.is_alive()
            && npc.position().is_some()
            && npc.is_taking_turn()
            && npc.action_points() > 0
    })
}

/// Act until out of AP or the turn is given up, then end the turn.
pub fn take_turn(zone: &mut Zone, id: CharacterId, chooser: &mut dyn MoveChooser) -> Result<(), ZoneError> {
    while can_keep_acting(zone, id) {
        decide_move(zone, id, chooser)?;
    }
    turn::end_turn(zone, id)
}

/// Go after the player if there is one, otherwise wander.
pub fn decide_move(zone: &mut Zone, id: CharacterId, chooser: &mut dyn MoveChooser) -> Result<(), ZoneError> {
    match zone.player_id() {
        Some(player) => attack_target(zone, id, player),
        None => wander(zone, id, chooser),
    }
}

/// Attack `target` when adjacent (diagonals included), otherwise step
/// toward it.
pub fn attack_target(zone: &mut Zone, id: CharacterId, target: CharacterId) -> Result<(), ZoneError> {
    let here = position_of(zone, id)?;
    let there = position_of(zone, target)?;

    if here.chebyshev_distance(there) <= 1 {
        turn::attack(zone, id, target)?;
    } else {
        let step = find_move_toward_target(here, there);
        tracing::debug!(npc = %id, from = %here, to = %step, "Closing in");
        move_actor(zone, id, step)?;
    }
    Ok(())
}

/// One step toward `to`, moving on each axis by the sign of the difference.
/// An axis that already lines up stays put, so the step never leaves the
/// grid when both ends are on it.
pub fn find_move_toward_target(from: Coordinate, to: Coordinate) -> Coordinate {
    Coordinate::new(
        from.row + (to.row - from.row).signum(),
        from.column + (to.column - from.column).signum(),
    )
}

/// Every in-bounds, unoccupied neighbour of `from`, row by row.
pub fn find_potential_moves(zone: &Zone, from: Coordinate) -> Vec<Coordinate> {
    let mut moves = Vec::with_capacity(8);
    for row in from.row - 1..=from.row + 1 {
        for column in from.column - 1..=from.column + 1 {
            let candidate = Coordinate::new(row, column);
            if candidate == from {
                continue;
            }
            // Out of bounds just means no move there
            if let Ok(tile) = zone.get_tile(candidate) {
                if !tile.has_character() {
                    moves.push(candidate);
                }
            }
        }
    }
    moves
}

pub fn pick_a_move(moves: &[Coordinate], chooser: &mut dyn MoveChooser) -> Option<Coordinate> {
    match moves.len() {
        0 => None,
        1 => Some(moves[0]),
        len => moves.get(chooser.choose(len).min(len - 1)).copied(),
    }
}

/// Step to a random free neighbour. With nowhere to go the turn ends
/// without spending AP.
pub fn wander(zone: &mut Zone, id: CharacterId, chooser: &mut dyn MoveChooser) -> Result<(), ZoneError> {
    let here = position_of(zone, id)?;
    let moves = find_potential_moves(zone, here);

    match pick_a_move(&moves, chooser) {
        Some(step) => move_actor(zone, id, step),
        None => {
            tracing::debug!(npc = %id, position = %here, "Boxed in, ending turn");
            turn::end_turn(zone, id)
        }
    }
}

/// Pay for a step, then take it. A blocked step is still paid for.
pub fn move_actor(zone: &mut Zone, id: CharacterId, to: Coordinate) -> Result<(), ZoneError> {
    turn::reduce_action_points(zone, id, MOVE_COST)?;
    match zone.move_character(id, to) {
        Ok(_) => Ok(()),
        Err(ZoneError::OutOfBounds { .. }) => {
            tracing::debug!(npc = %id, to = %to, "Step out of bounds ignored");
            Ok(())
        }
        Err(e) => Err(e),
    }
}
