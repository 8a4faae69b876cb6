//! Per-session client state.

use serde::{Deserialize, Serialize};

use crate::catalog::{Client, Location};

/// Per-session client state: the client's current absurdity and resistance
/// after location modifiers. Dialogue lowers absurdity, combat victory
/// resets it, and a combat defeat raises it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Encounter {
    /// Client id.
    pub client_id: String,
    /// Client display name.
    pub client_name: String,
    /// Location the session takes place in.
    pub location_id: String,
    /// Current absurdity.
    pub absurdity: u32,
    /// Current resistance.
    pub resistance: u32,
    /// The location's difficulty modifier.
    pub difficulty: i32,
}

impl Encounter {
    /// Build the encounter for `client` at `location`.
    ///
    /// Absurdity and resistance get the location's difficulty modifier and
    /// never drop below 1.
    pub fn new(client: &Client, location: &Location) -> Self {
        let modified = |base: u32| {
            let v = i64::from(base) + i64::from(location.difficulty_modifier);
            u32::try_from(v.max(1)).unwrap_or(u32::MAX)
        };
        Self {
            client_id: client.id.clone(),
            client_name: client.name.clone(),
            location_id: location.id.clone(),
            absurdity: modified(client.absurdity),
            resistance: modified(client.resistance),
            difficulty: location.difficulty_modifier,
        }
    }

    /// Change absurdity by `delta`, flooring at 0. Returns the new value.
    pub fn shift_absurdity(&mut self, delta: i32) -> u32 {
        self.absurdity = self.absurdity.saturating_add_signed(delta);
        self.absurdity
    }
}
