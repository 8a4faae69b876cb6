//! Ending rules and their resolution.
//!
//! Rules are grouped into tiers that are scanned in a fixed priority order.
//! Within a tier the first satisfied rule in declaration order wins. The
//! resolver is total: if no rule matches, a built-in default is returned.

use serde::{Deserialize, Serialize};

use crate::condition::{Condition, Measure};
use crate::profile::StatProfile;

/// Priority tier of an ending rule, highest priority first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndingTier {
    /// Career-ending failure.
    Catastrophic,
    /// Memorable for the wrong reasons.
    Controversial,
    /// Exceptional therapeutic results.
    Excellent,
    /// Solid professional success.
    Success,
    /// Mastery of a single stat.
    Specialized,
    /// Unremarkable but respectable.
    Neutral,
    /// Reputation in tatters.
    Poor,
    /// Fallback.
    Default,
}

impl EndingTier {
    /// Tiers in scan order.
    pub const ORDER: [EndingTier; 8] = [
        EndingTier::Catastrophic,
        EndingTier::Controversial,
        EndingTier::Excellent,
        EndingTier::Success,
        EndingTier::Specialized,
        EndingTier::Neutral,
        EndingTier::Poor,
        EndingTier::Default,
    ];
}

impl std::fmt::Display for EndingTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Catastrophic => "catastrophic",
            Self::Controversial => "controversial",
            Self::Excellent => "excellent",
            Self::Success => "success",
            Self::Specialized => "specialized",
            Self::Neutral => "neutral",
            Self::Poor => "poor",
            Self::Default => "default",
        };
        write!(f, "{name}")
    }
}

/// A content-defined ending and the predicate that selects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndingRule {
    /// Unique id.
    pub id: String,
    /// Headline.
    pub title: String,
    /// One-paragraph outcome.
    pub summary: String,
    /// Closing line.
    #[serde(default)]
    pub flavor: String,
    /// Priority tier.
    pub tier: EndingTier,
    /// When this ending applies.
    pub condition: Condition,
}

/// The resolved ending of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ending {
    /// Id of the matched rule.
    pub id: String,
    /// Headline.
    pub title: String,
    /// One-paragraph outcome.
    pub summary: String,
    /// Closing line.
    pub flavor: String,
    /// Tier of the matched rule.
    pub tier: EndingTier,
}

impl Ending {
    /// The ending returned when no rule matches.
    pub fn quiet_exit() -> Self {
        Self {
            id: "quiet_exit".to_string(),
            title: "The Quiet Exit".to_string(),
            summary: "You complete your sessions and go home, wondering what it all means."
                .to_string(),
            flavor: "Helping people or enabling them? Either way, it's been a day.".to_string(),
            tier: EndingTier::Default,
        }
    }
}

impl From<&EndingRule> for Ending {
    fn from(rule: &EndingRule) -> Self {
        Self {
            id: rule.id.clone(),
            title: rule.title.clone(),
            summary: rule.summary.clone(),
            flavor: rule.flavor.clone(),
            tier: rule.tier,
        }
    }
}

impl std::fmt::Display for Ending {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}]", self.title, self.tier)
    }
}

/// How far a profile is from one threshold of an ending rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndingProgress {
    /// Id of the rule.
    pub ending_id: String,
    /// Title of the rule.
    pub title: String,
    /// Tier of the rule.
    pub tier: EndingTier,
    /// What is measured.
    pub measure: Measure,
    /// Current value.
    pub current: i64,
    /// Value the rule asks for.
    pub target: i64,
}

impl EndingProgress {
    /// Whether the threshold is met.
    pub fn reached(&self) -> bool {
        self.current >= self.target
    }
}

impl std::fmt::Display for EndingProgress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {}/{} ({})",
            self.measure, self.current, self.target, self.title
        )
    }
}

/// Evaluates a profile against an ending rule table.
#[derive(Debug, Clone, Copy)]
pub struct EndingResolver<'a> {
    rules: &'a [EndingRule],
}

impl<'a> EndingResolver<'a> {
    /// Resolver over a rule table.
    pub fn new(rules: &'a [EndingRule]) -> Self {
        Self { rules }
    }

    /// Rules in the order they are evaluated.
    pub fn ordered(&self) -> impl Iterator<Item = &'a EndingRule> + '_ {
        EndingTier::ORDER
            .into_iter()
            .flat_map(move |tier| self.rules.iter().filter(move |r| r.tier == tier))
    }

    /// The first matching ending, or [`Ending::quiet_exit`].
    pub fn resolve(&self, profile: &StatProfile) -> Ending {
        self.ordered()
            .find(|rule| rule.condition.evaluate(profile))
            .map(Ending::from)
            .unwrap_or_else(Ending::quiet_exit)
    }

    /// Every "at least" threshold of every rule, in evaluation order, with
    /// the profile's current value.
    pub fn progress(&self, profile: &StatProfile) -> Vec<EndingProgress> {
        self.ordered()
            .flat_map(move |rule| {
                rule.condition
                    .thresholds()
                    .into_iter()
                    .map(move |t| EndingProgress {
                        ending_id: rule.id.clone(),
                        title: rule.title.clone(),
                        tier: rule.tier,
                        current: t.measure.read(profile),
                        measure: t.measure,
                        target: t.target,
                    })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::MELTED_DOWN;
    use crate::stat::{Stat, StatBlock, StatBounds};

    fn rule(id: &str, tier: EndingTier, condition: Condition) -> EndingRule {
        EndingRule {
            id: id.to_string(),
            title: id.to_string(),
            summary: String::new(),
            flavor: String::new(),
            tier,
            condition,
        }
    }

    fn rules() -> Vec<EndingRule> {
        // Declared out of tier order on purpose.
        vec![
            rule("celebrity", EndingTier::Success, Condition::ReputationAtLeast { value: 16 }),
            rule(
                "breakdown",
                EndingTier::Catastrophic,
                Condition::FlagSet { flag: MELTED_DOWN.to_string() }
                    .or(Condition::StatAtMost { stat: Stat::Composure, value: 0 }),
            ),
            rule("decent", EndingTier::Neutral, Condition::ReputationAtLeast { value: 8 }),
            rule("steady", EndingTier::Neutral, Condition::StatAtLeast { stat: Stat::Composure, value: 8 }),
        ]
    }

    fn profile() -> StatProfile {
        StatProfile::new("counselor", StatBlock::new(5, 8, 3, 6), StatBounds::new(0, 15))
    }

    #[test]
    fn catastrophic_beats_success() {
        let rules = rules();
        let mut p = profile();
        p.reputation = 16;
        p.flags.set(MELTED_DOWN);
        assert_eq!(EndingResolver::new(&rules).resolve(&p).id, "breakdown");
    }

    #[test]
    fn first_in_declaration_order_within_tier() {
        let rules = rules();
        let mut p = profile();
        p.adjust(Stat::Composure, 4);
        assert_eq!(EndingResolver::new(&rules).resolve(&p).id, "decent");
    }

    #[test]
    fn falls_back_to_quiet_exit() {
        let rules = rules();
        let mut p = profile();
        p.reputation = 2;
        assert_eq!(EndingResolver::new(&rules).resolve(&p), Ending::quiet_exit());
        assert_eq!(EndingResolver::new(&[]).resolve(&p).title, "The Quiet Exit");
    }

    #[test]
    fn ordered_follows_tiers() {
        let rules = rules();
        let ids: Vec<_> = EndingResolver::new(&rules).ordered().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["breakdown", "celebrity", "decent", "steady"]);
    }

    #[test]
    fn progress_lists_thresholds_in_order() {
        let rules = rules();
        let mut p = profile();
        p.reputation = 10;
        let progress = EndingResolver::new(&rules).progress(&p);
        let lines: Vec<String> = progress.iter().map(ToString::to_string).collect();
        assert_eq!(
            lines,
            vec![
                "Reputation: 10/16 (celebrity)",
                "Reputation: 10/8 (decent)",
                "Composure: 6/8 (steady)",
            ]
        );
        let reached: Vec<bool> = progress.iter().map(EndingProgress::reached).collect();
        assert_eq!(reached, vec![false, true, false]);
    }
}
