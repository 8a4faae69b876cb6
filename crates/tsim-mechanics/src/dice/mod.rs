//! Dice and the [`Roller`] abstraction every random draw goes through.
//!
//! Runs roll with a seeded [`StdRng`]; tests script exact faces with
//! [`ScriptedRolls`].

/// Scripted dice for deterministic tests.
pub mod scripted;

pub use scripted::ScriptedRolls;

use rand::Rng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

/// A die type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Die {
    /// Four-sided die.
    D4,
    /// Six-sided die.
    D6,
    /// Percentile die (1-100).
    D100,
    /// A die with a custom number of sides.
    Custom(u32),
}

impl Die {
    /// Number of faces. Custom dice have at least one.
    pub fn sides(self) -> u32 {
        match self {
            Self::D4 => 4,
            Self::D6 => 6,
            Self::D100 => 100,
            Self::Custom(n) => n.max(1),
        }
    }
}

impl std::fmt::Display for Die {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "d{}", self.sides())
    }
}

/// A source of die faces.
pub trait Roller {
    /// Roll one die, returning a face in `1..=die.sides()`.
    fn roll(&mut self, die: Die) -> u32;

    /// `true` with a `percent` in 100 chance.
    fn chance(&mut self, percent: u32) -> bool {
        self.roll(Die::D100) <= percent
    }

    /// A uniformly chosen index below `len`, or `None` when `len` is 0.
    fn pick(&mut self, len: usize) -> Option<usize> {
        let sides = u32::try_from(len).ok().filter(|n| *n > 0)?;
        Some(self.roll(Die::Custom(sides)).saturating_sub(1) as usize)
    }
}

impl Roller for StdRng {
    fn roll(&mut self, die: Die) -> u32 {
        self.random_range(1..=die.sides())
    }
}
