//! Predicates over the therapist profile, used by ending rules.

use serde::{Deserialize, Serialize};

use crate::profile::StatProfile;
use crate::stat::Stat;

/// A serializable predicate over a therapist profile, used by ending rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Condition {
    /// Stat is at least `value`.
    StatAtLeast {
        /// Stat to test.
        stat: Stat,
        /// Threshold.
        value: i32,
    },
    /// Stat is at most `value`.
    StatAtMost {
        /// Stat to test.
        stat: Stat,
        /// Threshold.
        value: i32,
    },
    /// XP is at least `value`.
    XpAtLeast {
        /// Threshold.
        value: u32,
    },
    /// Reputation is at least `value`.
    ReputationAtLeast {
        /// Threshold.
        value: u32,
    },
    /// Reputation is at most `value`.
    ReputationAtMost {
        /// Threshold.
        value: u32,
    },
    /// Flag counter is at least `value`.
    FlagAtLeast {
        /// Flag key.
        flag: String,
        /// Threshold.
        value: u32,
    },
    /// Flag counter is non-zero.
    FlagSet {
        /// Flag key.
        flag: String,
    },
    /// Negation.
    Not {
        /// Inner condition.
        condition: Box<Condition>,
    },
    /// All must hold.
    And {
        /// Inner conditions.
        conditions: Vec<Condition>,
    },
    /// Any must hold.
    Or {
        /// Inner conditions.
        conditions: Vec<Condition>,
    },
    /// Always true.
    Always,
}

/// A profile quantity a threshold is measured on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Measure {
    /// A stat.
    Stat {
        /// Stat read.
        stat: Stat,
    },
    /// Experience points.
    Xp,
    /// Reputation.
    Reputation,
    /// A flag counter.
    Flag {
        /// Flag key.
        flag: String,
    },
}

impl Measure {
    /// Current value on a profile.
    pub fn read(&self, profile: &StatProfile) -> i64 {
        match self {
            Self::Stat { stat } => i64::from(profile.stat(*stat)),
            Self::Xp => i64::from(profile.xp),
            Self::Reputation => i64::from(profile.reputation),
            Self::Flag { flag } => i64::from(profile.flags.count(flag)),
        }
    }
}

impl std::fmt::Display for Measure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stat { stat } => write!(f, "{stat}"),
            Self::Xp => write!(f, "XP"),
            Self::Reputation => write!(f, "Reputation"),
            Self::Flag { flag } => write!(f, "{}", flag.replace('_', " ")),
        }
    }
}

/// A lower bound a condition asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Threshold {
    /// What is measured.
    pub measure: Measure,
    /// Value to reach.
    pub target: i64,
}

impl Condition {
    /// Evaluate against a profile.
    pub fn evaluate(&self, profile: &StatProfile) -> bool {
        match self {
            Self::StatAtLeast { stat, value } => profile.stat(*stat) >= *value,
            Self::StatAtMost { stat, value } => profile.stat(*stat) <= *value,
            Self::XpAtLeast { value } => profile.xp >= *value,
            Self::ReputationAtLeast { value } => profile.reputation >= *value,
            Self::ReputationAtMost { value } => profile.reputation <= *value,
            Self::FlagAtLeast { flag, value } => profile.flags.count(flag) >= *value,
            Self::FlagSet { flag } => profile.flags.is_set(flag),
            Self::Not { condition } => !condition.evaluate(profile),
            Self::And { conditions } => conditions.iter().all(|c| c.evaluate(profile)),
            Self::Or { conditions } => conditions.iter().any(|c| c.evaluate(profile)),
            Self::Always => true,
        }
    }

    /// The "at least" bounds this condition needs to hold.
    ///
    /// Bounds under a negation are skipped, since reaching them works
    /// against the condition.
    pub fn thresholds(&self) -> Vec<Threshold> {
        let mut out = Vec::new();
        self.collect_thresholds(&mut out);
        out
    }

    fn collect_thresholds(&self, out: &mut Vec<Threshold>) {
        let (measure, target) = match self {
            Self::StatAtLeast { stat, value } => (Measure::Stat { stat: *stat }, i64::from(*value)),
            Self::XpAtLeast { value } => (Measure::Xp, i64::from(*value)),
            Self::ReputationAtLeast { value } => (Measure::Reputation, i64::from(*value)),
            Self::FlagAtLeast { flag, value } => (
                Measure::Flag {
                    flag: flag.clone(),
                },
                i64::from(*value),
            ),
            Self::And { conditions } | Self::Or { conditions } => {
                for condition in conditions {
                    condition.collect_thresholds(out);
                }
                return;
            }
            _ => return,
        };
        out.push(Threshold { measure, target });
    }

    /// Negate this condition.
    pub fn negate(self) -> Self {
        Self::Not {
            condition: Box::new(self),
        }
    }

    /// Both this and `other`.
    pub fn and(self, other: Condition) -> Self {
        match self {
            Self::And { mut conditions } => {
                conditions.push(other);
                Self::And { conditions }
            }
            first => Self::And {
                conditions: vec![first, other],
            },
        }
    }

    /// Either this or `other`.
    pub fn or(self, other: Condition) -> Self {
        match self {
            Self::Or { mut conditions } => {
                conditions.push(other);
                Self::Or { conditions }
            }
            first => Self::Or {
                conditions: vec![first, other],
            },
        }
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StatAtLeast { stat, value } => write!(f, "{stat} >= {value}"),
            Self::StatAtMost { stat, value } => write!(f, "{stat} <= {value}"),
            Self::XpAtLeast { value } => write!(f, "XP >= {value}"),
            Self::ReputationAtLeast { value } => write!(f, "Reputation >= {value}"),
            Self::ReputationAtMost { value } => write!(f, "Reputation <= {value}"),
            Self::FlagAtLeast { flag, value } => write!(f, "{flag} >= {value}"),
            Self::FlagSet { flag } => write!(f, "{flag}"),
            Self::Not { condition } => write!(f, "NOT ({condition})"),
            Self::And { conditions } => write_joined(f, conditions, " AND "),
            Self::Or { conditions } => write_joined(f, conditions, " OR "),
            Self::Always => write!(f, "always"),
        }
    }
}

fn write_joined(
    f: &mut std::fmt::Formatter<'_>,
    conditions: &[Condition],
    sep: &str,
) -> std::fmt::Result {
    for (i, c) in conditions.iter().enumerate() {
        if i > 0 {
            write!(f, "{sep}")?;
        }
        match c {
            Condition::And { .. } | Condition::Or { .. } => write!(f, "({c})")?,
            _ => write!(f, "{c}")?,
        }
    }
    Ok(())
}
