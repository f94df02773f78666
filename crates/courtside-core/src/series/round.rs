// Playoff round names, their canonical numbers, and identifier tokens.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The fixed set of playoff rounds, ordered from earliest to latest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RoundName {
    PlayIn,
    FirstRound,
    ConferenceSemifinals,
    ConferenceFinals,
    Finals,
}

impl RoundName {
    pub const ALL: [RoundName; 5] = [
        RoundName::PlayIn,
        RoundName::FirstRound,
        RoundName::ConferenceSemifinals,
        RoundName::ConferenceFinals,
        RoundName::Finals,
    ];

    /// Parse the stored display name. Matching is exact; callers that only
    /// need a best-effort classification should use `round_token`.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "Play-In Tournament" => Some(RoundName::PlayIn),
            "Round 1" => Some(RoundName::FirstRound),
            "Conference Semifinals" => Some(RoundName::ConferenceSemifinals),
            "Conference Finals" => Some(RoundName::ConferenceFinals),
            "NBA Finals" => Some(RoundName::Finals),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RoundName::PlayIn => "Play-In Tournament",
            RoundName::FirstRound => "Round 1",
            RoundName::ConferenceSemifinals => "Conference Semifinals",
            RoundName::ConferenceFinals => "Conference Finals",
            RoundName::Finals => "NBA Finals",
        }
    }

    /// Canonical round number stored alongside the name.
    pub fn number(&self) -> u8 {
        match self {
            RoundName::PlayIn => 0,
            RoundName::FirstRound => 1,
            RoundName::ConferenceSemifinals => 2,
            RoundName::ConferenceFinals => 3,
            RoundName::Finals => 4,
        }
    }

    /// Short token embedded in series identifiers.
    pub fn token(&self) -> &'static str {
        match self {
            RoundName::PlayIn => "plyn",
            RoundName::FirstRound => "rnd1",
            RoundName::ConferenceSemifinals => "rnd2",
            RoundName::ConferenceFinals => "cnf",
            RoundName::Finals => "fnl",
        }
    }

    pub fn is_finals(&self) -> bool {
        matches!(self, RoundName::Finals)
    }
}

impl fmt::Display for RoundName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Canonical round number for a stored round name, if the name is known.
pub fn round_number(name: &str) -> Option<u8> {
    RoundName::parse(name).map(|r| r.number())
}

/// Identifier token for a stored round name. Unrecognized names map to the
/// first-round token.
pub fn round_token(name: &str) -> &'static str {
    RoundName::parse(name)
        .map(|r| r.token())
        .unwrap_or(RoundName::FirstRound.token())
}
