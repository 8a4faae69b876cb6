//! The fixed effect profile of each approach type.

use tsim_core::flags::HEATED_ARGUMENTS;
use tsim_core::{ApproachType, Stat, StatDeltas};

/// What choosing an approach does before any authored choice effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApproachEffect {
    /// Intrinsic stat changes.
    pub deltas: StatDeltas,
    /// Whether the approach lowers the client's absurdity.
    pub reduces_absurdity: bool,
    /// Flag counter bumped by the approach.
    pub flag: Option<&'static str>,
}

impl ApproachEffect {
    /// The effect table entry for `approach`.
    pub fn of(approach: ApproachType) -> Self {
        match approach {
            ApproachType::Empathetic => Self::training(Stat::Empathy),
            ApproachType::Analytical => Self::training(Stat::Insight),
            ApproachType::Patient => Self::training(Stat::Patience),
            ApproachType::Dismissive => Self {
                deltas: StatDeltas::new().with(Stat::Composure, 1),
                reduces_absurdity: false,
                flag: None,
            },
            ApproachType::Challenging => Self {
                deltas: StatDeltas::new()
                    .with(Stat::Patience, -2)
                    .with(Stat::Composure, -1),
                reduces_absurdity: false,
                flag: Some(HEATED_ARGUMENTS),
            },
        }
    }

    fn training(stat: Stat) -> Self {
        Self {
            deltas: StatDeltas::new().with(stat, 1),
            reduces_absurdity: true,
            flag: None,
        }
    }
}
