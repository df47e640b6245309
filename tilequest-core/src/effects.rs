//! Timed status effects.
//!
//! An effect is applied to its bearer once per turn tick and expires when its
//! duration reaches zero. Potions hand their effect to the drinker.

use crate::character::Character;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a status effect does when it ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    /// Restores `magnitude` health per tick.
    Heal,
}

impl EffectKind {
    pub fn name(&self) -> &'static str {
        match self {
            EffectKind::Heal => "Heal",
        }
    }

    pub fn nature(&self) -> EffectNature {
        match self {
            EffectKind::Heal => EffectNature::Beneficial,
        }
    }
}

/// Whether an effect helps or harms its bearer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectNature {
    Beneficial,
    Negative,
}

/// A timed modifier attached to a character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusEffect {
    pub kind: EffectKind,
    pub magnitude: f64,
    /// Remaining ticks. Decremented once per application.
    pub duration: u32,
}

impl StatusEffect {
    /// A heal-over-time effect. Fractional durations are rounded to the
    /// nearest whole tick; negative ones become zero.
    pub fn heal(magnitude: f64, duration: f64) -> Self {
        Self {
            kind: EffectKind::Heal,
            magnitude,
            duration: duration.round().max(0.0) as u32,
        }
    }

    pub fn nature(&self) -> EffectNature {
        self.kind.nature()
    }

    pub fn is_expired(&self) -> bool {
        self.duration == 0
    }

    /// Apply one tick of the effect to `target` and consume one tick of
    /// duration. Expired effects do nothing.
    pub fn apply(&mut self, target: &mut Character) {
        if self.is_expired() {
            return;
        }
        match self.kind {
            EffectKind::Heal => target.increase_health(self.magnitude),
        }
        self.duration -= 1;
    }
}

impl fmt::Display for StatusEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({} turns left)",
            self.kind.name(),
            self.magnitude,
            self.duration
        )
    }
}
