//! The shared two-field counter document and its derived display values.

use serde::{Deserialize, Serialize};

/// Aggregate public vote state. Both fields are always present; this
/// document is the sole source of truth for displayed totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    pub support: u64,
    pub burn: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteKind {
    Support,
    Burn,
}

impl VoteKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Support => "support",
            Self::Burn => "burn",
        }
    }
}

impl VoteTally {
    pub fn total(&self) -> u64 {
        self.support + self.burn
    }

    /// Rounded support share, or a neutral 50 when nobody has voted yet.
    pub fn support_pct(&self) -> u8 {
        let total = self.total();
        if total == 0 {
            return 50;
        }
        ((self.support as f64 / total as f64) * 100.0).round() as u8
    }

    pub fn burn_pct(&self) -> u8 {
        100 - self.support_pct()
    }

    /// The one mutation votes apply: increment exactly one field.
    #[must_use]
    pub fn bump(mut self, kind: VoteKind) -> Self {
        match kind {
            VoteKind::Support => self.support = self.support.saturating_add(1),
            VoteKind::Burn => self.burn = self.burn.saturating_add(1),
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_tally_reads_as_neutral() {
        let tally = VoteTally::default();
        assert_eq!(tally.total(), 0);
        assert_eq!(tally.support_pct(), 50);
        assert_eq!(tally.burn_pct(), 50);
    }

    #[test]
    fn percentages_round_and_complement() {
        let tally = VoteTally {
            support: 2,
            burn: 1,
        };
        assert_eq!(tally.support_pct(), 67);
        assert_eq!(tally.burn_pct(), 33);

        let even = VoteTally {
            support: 1,
            burn: 1,
        };
        assert_eq!(even.support_pct(), 50);
        assert_eq!(even.total(), 2);
    }

    #[test]
    fn bump_touches_exactly_one_field() {
        let tally = VoteTally::default()
            .bump(VoteKind::Burn)
            .bump(VoteKind::Support)
            .bump(VoteKind::Support);
        assert_eq!(
            tally,
            VoteTally {
                support: 2,
                burn: 1,
            }
        );
    }

    #[test]
    fn kind_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&VoteKind::Burn).unwrap(), "\"burn\"");
        assert_eq!(VoteKind::Support.as_str(), "support");
    }
}
