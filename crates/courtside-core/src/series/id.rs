// Human-readable playoff series identifiers.
//
// Format: `{player}-{season}-{round}[-{conference}][-{n}]`, e.g.
// `1-2324-rnd1-e` or `1-2324-fnl-2`.

use tracing::debug;

use super::model::{PlayoffSeries, Season};
use super::round::{round_token, RoundName};
use crate::conference::{conference_of_pair, Conference};

/// Player token used when the player id carries no `-` segment.
const DEFAULT_PLAYER_TOKEN: &str = "0";

/// Derive the identifier for a new series.
///
/// The base key is suffixed with `-{n+1}` when `n` series in `existing`
/// already start with it for the same season and player. The suffix depends
/// on that point-in-time count, so callers must serialize creations per
/// season/player pair.
pub fn generate_series_id(
    season: &Season,
    round_name: &str,
    team1_id: Option<&str>,
    team2_id: Option<&str>,
    player_id: &str,
    existing: &[PlayoffSeries],
) -> String {
    let base = base_series_id(season, round_name, team1_id, team2_id, player_id);

    let matches = existing
        .iter()
        .filter(|s| s.id.starts_with(&base) && s.season_id == season.id && s.player_id == player_id)
        .count();

    let id = if matches > 0 {
        format!("{base}-{}", matches + 1)
    } else {
        base
    };
    debug!("derived series id {} ({} prior matches)", id, matches);
    id
}

/// The unsuffixed key for a series.
pub fn base_series_id(
    season: &Season,
    round_name: &str,
    team1_id: Option<&str>,
    team2_id: Option<&str>,
    player_id: &str,
) -> String {
    let player = player_token(player_id);
    let season_tok = season_token(season);
    let round = round_token(round_name);

    if round_name == RoundName::Finals.label() {
        return format!("{player}-{season_tok}-{round}");
    }

    // Wholly unresolved matchups route East, matching bracket placement.
    let conference = conference_of_pair(team1_id, team2_id).unwrap_or(Conference::East);
    format!("{player}-{season_tok}-{round}-{}", conference.letter())
}

/// The segment after the first `-` in a player id ("player-1" -> "1").
pub fn player_token(player_id: &str) -> &str {
    player_id
        .split('-')
        .nth(1)
        .filter(|tok| !tok.is_empty())
        .unwrap_or(DEFAULT_PLAYER_TOKEN)
}

/// Last two digits of both season years ("2023-2024" -> "2324").
pub fn season_token(season: &Season) -> String {
    format!(
        "{:02}{:02}",
        season.year_start.rem_euclid(100),
        season.year_end.rem_euclid(100)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn season() -> Season {
        Season::new("s1", 2023, 2024).unwrap()
    }

    fn existing(id: &str, season_id: &str, player_id: &str) -> PlayoffSeries {
        PlayoffSeries {
            id: id.to_string(),
            ..PlayoffSeries::draft(season_id, player_id)
        }
    }

    #[test]
    fn first_round_east_series() {
        let id = generate_series_id(
            &season(),
            "Round 1",
            Some("team-bos"),
            Some("team-lal"),
            "player-1",
            &[],
        );
        assert_eq!(id, "1-2324-rnd1-e");
    }

    #[test]
    fn existing_match_appends_suffix() {
        let prior = vec![existing("1-2324-rnd1-e", "s1", "player-1")];
        let id = generate_series_id(
            &season(),
            "Round 1",
            Some("team-bos"),
            Some("team-lal"),
            "player-1",
            &prior,
        );
        assert_eq!(id, "1-2324-rnd1-e-2");
    }

    #[test]
    fn suffix_counts_every_prior_match() {
        let prior = vec![
            existing("1-2324-rnd1-e", "s1", "player-1"),
            existing("1-2324-rnd1-e-2", "s1", "player-1"),
        ];
        let id = generate_series_id(&season(), "Round 1", Some("team-nyk"), None, "player-1", &prior);
        assert_eq!(id, "1-2324-rnd1-e-3");
    }

    #[test]
    fn matches_from_other_players_or_seasons_are_ignored() {
        let prior = vec![
            existing("1-2324-rnd1-e", "s2", "player-1"),
            existing("1-2324-rnd1-e", "s1", "player-9"),
        ];
        let id = generate_series_id(&season(), "Round 1", Some("team-bos"), None, "player-1", &prior);
        assert_eq!(id, "1-2324-rnd1-e");
    }

    #[test]
    fn generation_is_idempotent_for_a_fixed_snapshot() {
        let prior = vec![existing("1-2324-cnf-w", "s1", "player-1")];
        let a = generate_series_id(&season(), "Conference Finals", Some("team-den"), None, "player-1", &prior);
        let b = generate_series_id(&season(), "Conference Finals", Some("team-den"), None, "player-1", &prior);
        assert_eq!(a, b);
        assert_eq!(a, "1-2324-cnf-w-2");
    }

    #[test]
    fn finals_never_carry_a_conference_letter() {
        let id = generate_series_id(
            &season(),
            "NBA Finals",
            Some("team-bos"),
            Some("team-dal"),
            "player-1",
            &[],
        );
        assert_eq!(id, "1-2324-fnl");
    }

    #[test]
    fn other_rounds_always_carry_a_conference_letter() {
        for round in RoundName::ALL.iter().filter(|r| !r.is_finals()) {
            let east = base_series_id(&season(), round.label(), Some("team-bos"), None, "player-1");
            let west = base_series_id(&season(), round.label(), Some("team-lal"), None, "player-1");
            let tbd = base_series_id(&season(), round.label(), None, None, "player-1");
            assert!(east.ends_with("-e"), "{east}");
            assert!(west.ends_with("-w"), "{west}");
            assert!(tbd.ends_with("-e"), "{tbd}");
        }
    }

    #[test]
    fn conference_falls_back_to_team2() {
        let id = base_series_id(&season(), "Conference Semifinals", None, Some("team-phx"), "player-2");
        assert_eq!(id, "2-2324-rnd2-w");
    }

    #[test]
    fn unknown_round_uses_first_round_token() {
        let id = base_series_id(&season(), "Quarterfinal", Some("team-bos"), None, "player-1");
        assert_eq!(id, "1-2324-rnd1-e");
    }

    #[test]
    fn player_token_defaults_to_zero() {
        assert_eq!(player_token("player-7"), "7");
        assert_eq!(player_token("player-7-alt"), "7");
        assert_eq!(player_token("player"), "0");
        assert_eq!(player_token("player-"), "0");
    }

    #[test]
    fn play_in_token() {
        let id = base_series_id(&season(), "Play-In Tournament", Some("team-mia"), None, "player-1");
        assert_eq!(id, "1-2324-plyn-e");
    }

    #[test]
    fn season_token_pads_two_digits() {
        let s = Season::new("s9", 2009, 2010).unwrap();
        assert_eq!(season_token(&s), "0910");
    }
}
