// Conference membership lookup for league team identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Team identifiers that belong to the Eastern conference. Every other
/// non-empty identifier is treated as Western.
pub const EAST_TEAM_IDS: [&str; 15] = [
    "team-atl", "team-bos", "team-bkn", "team-cha", "team-chi", "team-cle", "team-det",
    "team-ind", "team-mia", "team-mil", "team-nyk", "team-orl", "team-phi", "team-tor",
    "team-was",
];

/// One of the two league halves used to route bracket placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Conference {
    East,
    West,
}

impl Conference {
    /// Single-letter token used inside series identifiers.
    pub fn letter(&self) -> char {
        match self {
            Conference::East => 'e',
            Conference::West => 'w',
        }
    }

    pub fn display_str(&self) -> &'static str {
        match self {
            Conference::East => "East",
            Conference::West => "West",
        }
    }
}

impl fmt::Display for Conference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

/// Resolve the conference a team plays in. Absent or empty identifiers have
/// no conference.
pub fn conference_of(team_id: Option<&str>) -> Option<Conference> {
    let id = team_id.filter(|id| !id.is_empty())?;
    if EAST_TEAM_IDS.contains(&id) {
        Some(Conference::East)
    } else {
        Some(Conference::West)
    }
}

/// Resolve a series' conference from its first participant, falling back to
/// the second.
pub fn conference_of_pair(team1_id: Option<&str>, team2_id: Option<&str>) -> Option<Conference> {
    conference_of(team1_id).or_else(|| conference_of(team2_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eastern_teams_resolve_east() {
        for id in EAST_TEAM_IDS {
            assert_eq!(conference_of(Some(id)), Some(Conference::East), "{id}");
        }
    }

    #[test]
    fn unknown_non_empty_ids_resolve_west() {
        assert_eq!(conference_of(Some("team-lal")), Some(Conference::West));
        assert_eq!(conference_of(Some("team-gsw")), Some(Conference::West));
        assert_eq!(conference_of(Some("whatever")), Some(Conference::West));
    }

    #[test]
    fn absent_or_empty_ids_have_no_conference() {
        assert_eq!(conference_of(None), None);
        assert_eq!(conference_of(Some("")), None);
    }

    #[test]
    fn pair_falls_back_to_second_team() {
        assert_eq!(conference_of_pair(None, Some("team-bos")), Some(Conference::East));
        assert_eq!(conference_of_pair(Some(""), Some("team-lal")), Some(Conference::West));
        assert_eq!(conference_of_pair(Some("team-lal"), Some("team-bos")), Some(Conference::West));
        assert_eq!(conference_of_pair(None, None), None);
    }

    #[test]
    fn letters_match_id_tokens() {
        assert_eq!(Conference::East.letter(), 'e');
        assert_eq!(Conference::West.letter(), 'w');
        assert_eq!(Conference::West.to_string(), "West");
    }
}
