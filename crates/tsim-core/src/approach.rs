//! Therapeutic approach types attached to dialogue choices.

use serde::{Deserialize, Serialize};

use crate::stat::Stat;

/// The tone of a dialogue choice. Each approach has a fixed effect profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApproachType {
    /// Validating, supportive responses.
    Empathetic,
    /// Probing, analytical questions.
    Analytical,
    /// Waiting, letting the client talk.
    Patient,
    /// Detached or sarcastic brush-offs.
    Dismissive,
    /// Confrontational pushback.
    Challenging,
}

impl ApproachType {
    /// All approaches in declaration order.
    pub const ALL: [ApproachType; 5] = [
        ApproachType::Empathetic,
        ApproachType::Analytical,
        ApproachType::Patient,
        ApproachType::Dismissive,
        ApproachType::Challenging,
    ];

    /// The stat this approach trains, and that location bonuses add to.
    pub fn primary_stat(self) -> Stat {
        match self {
            Self::Empathetic => Stat::Empathy,
            Self::Analytical => Stat::Insight,
            Self::Patient => Stat::Patience,
            Self::Dismissive | Self::Challenging => Stat::Composure,
        }
    }

    /// The stat whose mastery amplifies absurdity reduction, if this
    /// approach reduces absurdity at all.
    pub fn mastery_stat(self) -> Option<Stat> {
        match self {
            Self::Empathetic => Some(Stat::Empathy),
            Self::Analytical => Some(Stat::Insight),
            Self::Patient => Some(Stat::Patience),
            Self::Dismissive | Self::Challenging => None,
        }
    }
}

impl std::fmt::Display for ApproachType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empathetic => write!(f, "empathetic"),
            Self::Analytical => write!(f, "analytical"),
            Self::Patient => write!(f, "patient"),
            Self::Dismissive => write!(f, "dismissive"),
            Self::Challenging => write!(f, "challenging"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reducing_approaches_have_mastery_stats() {
        assert_eq!(ApproachType::Empathetic.mastery_stat(), Some(Stat::Empathy));
        assert_eq!(ApproachType::Analytical.mastery_stat(), Some(Stat::Insight));
        assert_eq!(ApproachType::Patient.mastery_stat(), Some(Stat::Patience));
        assert_eq!(ApproachType::Dismissive.mastery_stat(), None);
        assert_eq!(ApproachType::Challenging.mastery_stat(), None);
    }

    #[test]
    fn serde_lowercase() {
        let json = serde_json::to_string(&ApproachType::Challenging).unwrap();
        assert_eq!(json, "\"challenging\"");
        let back: ApproachType = serde_json::from_str("\"patient\"").unwrap();
        assert_eq!(back, ApproachType::Patient);
    }
}
