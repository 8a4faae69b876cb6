//! Bounded, non-negative resource meters (sanity, chaos).

use serde::{Deserialize, Serialize};

/// A value in `0..=max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meter {
    current: u32,
    max: u32,
}

impl Meter {
    /// A meter at `current`, capped at `max`.
    pub fn new(current: u32, max: u32) -> Self {
        Self {
            current: current.min(max),
            max,
        }
    }

    /// A full meter.
    pub fn full(max: u32) -> Self {
        Self::new(max, max)
    }

    /// Current value.
    pub fn current(&self) -> u32 {
        self.current
    }

    /// Maximum value.
    pub fn max(&self) -> u32 {
        self.max
    }

    /// Remove up to `amount`, flooring at 0. Returns how much was removed.
    pub fn drain(&mut self, amount: u32) -> u32 {
        let taken = amount.min(self.current);
        self.current -= taken;
        taken
    }

    /// Add up to `amount`, capping at max. Returns how much was added.
    pub fn fill(&mut self, amount: u32) -> u32 {
        let added = amount.min(self.max - self.current);
        self.current += added;
        added
    }

    /// Whether the meter is at 0.
    pub fn is_empty(&self) -> bool {
        self.current == 0
    }

    /// Current as a fraction of max (0.0 when max is 0).
    pub fn fraction(&self) -> f64 {
        if self.max == 0 {
            0.0
        } else {
            f64::from(self.current) / f64::from(self.max)
        }
    }
}

impl std::fmt::Display for Meter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.current, self.max)
    }
}
