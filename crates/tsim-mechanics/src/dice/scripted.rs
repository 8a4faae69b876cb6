use std::collections::VecDeque;

use super::{Die, Roller};

/// A [`Roller`] that returns pre-arranged faces in order.
///
/// Each face is clamped to the die rolled. Once the script runs out every
/// roll returns the fallback face (1 unless set).
#[derive(Debug, Clone, Default)]
pub struct ScriptedRolls {
    faces: VecDeque<u32>,
    fallback: u32,
}

impl ScriptedRolls {
    /// Script the given faces.
    pub fn new(faces: impl IntoIterator<Item = u32>) -> Self {
        Self {
            faces: faces.into_iter().collect(),
            fallback: 1,
        }
    }

    /// Face returned after the script is exhausted.
    pub fn with_fallback(mut self, face: u32) -> Self {
        self.fallback = face;
        self
    }

    /// Faces not yet consumed.
    pub fn remaining(&self) -> usize {
        self.faces.len()
    }
}

impl Roller for ScriptedRolls {
    fn roll(&mut self, die: Die) -> u32 {
        let face = self.faces.pop_front().unwrap_or(self.fallback);
        face.clamp(1, die.sides())
    }
}
