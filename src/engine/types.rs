//! Value types delivered by the fishing engine.

use serde::Serialize;

/// Minigame phase reported by the fishing controller.
///
/// The engine owns this value; automation only observes it. The only way
/// automation influences it is the controller's hooked trigger, which moves
/// the minigame out of [`MinigamePhase::Pregame`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum MinigamePhase {
    /// Rod cast, minigame being prepared.
    Setup = 1,
    /// Line in the water, waiting for a bite.
    Pregame = 2,
    /// Fish hooked, crit windows are being shown.
    Active = 3,
    /// Fish landed.
    Win = 4,
    /// Fish escaped.
    Lose = 5,
    /// Player aborted the minigame.
    Canceled = 6,
    /// No minigame running.
    Inactive = 7,
}

impl MinigamePhase {
    /// Every phase, in engine order.
    pub const ALL: [Self; 7] = [
        Self::Setup,
        Self::Pregame,
        Self::Active,
        Self::Win,
        Self::Lose,
        Self::Canceled,
        Self::Inactive,
    ];

    /// Compact encoding used for atomic storage. Never zero.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Inverse of [`as_u8`](Self::as_u8); `None` for unknown codes.
    #[must_use]
    pub const fn from_u8(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Setup),
            2 => Some(Self::Pregame),
            3 => Some(Self::Active),
            4 => Some(Self::Win),
            5 => Some(Self::Lose),
            6 => Some(Self::Canceled),
            7 => Some(Self::Inactive),
            _ => None,
        }
    }

    /// Returns `true` for the phases that close a round.
    #[must_use]
    pub const fn is_outcome(self) -> bool {
        matches!(self, Self::Win | Self::Lose | Self::Canceled)
    }

    /// Lower-case label used in logs and metrics.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Setup => "setup",
            Self::Pregame => "pregame",
            Self::Active => "active",
            Self::Win => "win",
            Self::Lose => "lose",
            Self::Canceled => "canceled",
            Self::Inactive => "inactive",
        }
    }
}

impl std::fmt::Display for MinigamePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Classification of a crit window shown during the active phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CritSignal {
    /// Favorable window; reeling now helps.
    Good,
    /// Unfavorable window; reeling now hurts.
    Bad,
    /// The window passed without input.
    Miss,
}

impl CritSignal {
    /// Lower-case label used in logs and metrics.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Bad => "bad",
            Self::Miss => "miss",
        }
    }
}

impl std::fmt::Display for CritSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_code_roundtrips_for_every_variant() {
        for phase in MinigamePhase::ALL {
            assert_eq!(MinigamePhase::from_u8(phase.as_u8()), Some(phase));
        }
    }

    #[test]
    fn zero_code_means_unknown() {
        assert_eq!(MinigamePhase::from_u8(0), None);
        assert_eq!(MinigamePhase::from_u8(42), None);
    }

    #[test]
    fn outcome_phases() {
        assert!(MinigamePhase::Win.is_outcome());
        assert!(MinigamePhase::Lose.is_outcome());
        assert!(MinigamePhase::Canceled.is_outcome());
        assert!(!MinigamePhase::Inactive.is_outcome());
        assert!(!MinigamePhase::Active.is_outcome());
    }

    #[test]
    fn serializes_snake_case() {
        let json = serde_json::to_string(&MinigamePhase::Pregame).unwrap();
        assert_eq!(json, "\"pregame\"");
        let json = serde_json::to_string(&CritSignal::Good).unwrap();
        assert_eq!(json, "\"good\"");
    }
}
