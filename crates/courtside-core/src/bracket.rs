// Bracket organization: flat series rows -> conference/round structure.
//
// Finals are split out first, then play-in series, then everything else is
// grouped by conference and round number. Input order is preserved within
// every bucket; callers supply rows sorted by round number then creation time.

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::conference::{conference_of_pair, Conference};
use crate::directory::TeamDirectory;
use crate::games::{games_for_series, GameRecord};
use crate::series::round::RoundName;
use crate::series::PlayoffSeries;

/// Placeholder shown for an unresolved bracket slot.
pub const TBD: &str = "TBD";

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// A stored series plus the display fields derived for the bracket. The
/// stored fields are carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedSeries {
    #[serde(flatten)]
    pub series: PlayoffSeries,
    pub team1_display_name: String,
    pub team2_display_name: String,
    pub team1_abbreviation: String,
    pub team2_abbreviation: String,
    pub conference: Conference,
    pub games: Vec<GameRecord>,
}

impl EnrichedSeries {
    /// Short summary such as "BOS leads 3-2" or "BOS wins 4-2".
    pub fn status_line(&self) -> String {
        let s = &self.series;
        let (hi, lo) = (s.team1_wins.max(s.team2_wins), s.team1_wins.min(s.team2_wins));

        if s.is_complete {
            let winner = if s.winner_team_id.is_some() && s.winner_team_id == s.team2_id {
                &self.team2_abbreviation
            } else {
                &self.team1_abbreviation
            };
            return format!("{winner} wins {hi}-{lo}");
        }
        if hi == 0 {
            return "Series not started".to_string();
        }
        if s.team1_wins == s.team2_wins {
            return format!("Series tied {hi}-{lo}");
        }
        let leader = if s.team1_wins > s.team2_wins {
            &self.team1_abbreviation
        } else {
            &self.team2_abbreviation
        };
        format!("{leader} leads {hi}-{lo}")
    }
}

/// The structured, never-persisted view of one player's postseason.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bracket {
    pub east: BTreeMap<u8, Vec<EnrichedSeries>>,
    pub west: BTreeMap<u8, Vec<EnrichedSeries>>,
    pub east_play_in: Vec<EnrichedSeries>,
    pub west_play_in: Vec<EnrichedSeries>,
    pub finals: Vec<EnrichedSeries>,
}

impl Bracket {
    pub fn rounds(&self, conference: Conference) -> &BTreeMap<u8, Vec<EnrichedSeries>> {
        match conference {
            Conference::East => &self.east,
            Conference::West => &self.west,
        }
    }

    pub fn play_in(&self, conference: Conference) -> &[EnrichedSeries] {
        match conference {
            Conference::East => &self.east_play_in,
            Conference::West => &self.west_play_in,
        }
    }

    /// Total number of series placed anywhere in the bracket.
    pub fn len(&self) -> usize {
        let rounds: usize = self.east.values().chain(self.west.values()).map(Vec::len).sum();
        rounds + self.east_play_in.len() + self.west_play_in.len() + self.finals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Winner of the first completed finals series, if any.
    pub fn champion(&self) -> Option<&EnrichedSeries> {
        self.finals.iter().find(|s| s.series.is_complete)
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

pub fn is_finals(series: &PlayoffSeries) -> bool {
    series.round_name == RoundName::Finals.label()
}

pub fn is_play_in(series: &PlayoffSeries) -> bool {
    if series.round_number == 0 {
        return true;
    }
    let name = series.round_name.to_lowercase();
    name.contains("play-in") || name.contains("play in")
}

// ---------------------------------------------------------------------------
// Organizer
// ---------------------------------------------------------------------------

/// Attach display data, conference, and games to one series.
pub fn enrich_series(
    series: &PlayoffSeries,
    games: &[GameRecord],
    directory: &TeamDirectory,
) -> EnrichedSeries {
    let team1_id = series.team1_id.as_deref().filter(|id| !id.is_empty());
    let team2_id = series.team2_id.as_deref().filter(|id| !id.is_empty());

    EnrichedSeries {
        team1_display_name: display_name(team1_id, series.team1_name.as_deref(), directory),
        team2_display_name: display_name(team2_id, series.team2_name.as_deref(), directory),
        team1_abbreviation: abbreviation(team1_id, directory),
        team2_abbreviation: abbreviation(team2_id, directory),
        conference: conference_of_pair(team1_id, team2_id).unwrap_or(Conference::East),
        games: games_for_series(games, &series.id),
        series: series.clone(),
    }
}

/// Build the bracket for a flat list of series. Never fails: unresolved
/// teams and unknown round names degrade to placeholder values.
pub fn organize_bracket(
    series: &[PlayoffSeries],
    games: &[GameRecord],
    directory: &TeamDirectory,
) -> Bracket {
    let mut bracket = Bracket::default();

    for s in series {
        if RoundName::parse(&s.round_name).is_none() {
            warn!("series {} has unrecognized round '{}'", s.id, s.round_name);
        }
        let enriched = enrich_series(s, games, directory);

        if is_finals(s) {
            bracket.finals.push(enriched);
        } else if is_play_in(s) {
            match enriched.conference {
                Conference::East => bracket.east_play_in.push(enriched),
                Conference::West => bracket.west_play_in.push(enriched),
            }
        } else {
            let rounds = match enriched.conference {
                Conference::East => &mut bracket.east,
                Conference::West => &mut bracket.west,
            };
            rounds.entry(s.round_number).or_default().push(enriched);
        }
    }

    debug!(
        "organized {} series: east rounds={}, west rounds={}, play-in={}/{}, finals={}",
        series.len(),
        bracket.east.len(),
        bracket.west.len(),
        bracket.east_play_in.len(),
        bracket.west_play_in.len(),
        bracket.finals.len()
    );
    bracket
}

fn display_name(team_id: Option<&str>, stored: Option<&str>, directory: &TeamDirectory) -> String {
    team_id
        .and_then(|id| directory.lookup(id))
        .map(|info| info.name.clone())
        .or_else(|| stored.filter(|n| !n.is_empty()).map(str::to_string))
        .unwrap_or_else(|| TBD.to_string())
}

fn abbreviation(team_id: Option<&str>, directory: &TeamDirectory) -> String {
    team_id
        .and_then(|id| directory.lookup(id))
        .map(|info| info.abbreviation.clone())
        .unwrap_or_else(|| TBD.to_string())
}
