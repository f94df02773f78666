// Season and playoff series records, plus typed partial updates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::outcome::{determine_winner, SeriesOutcome};
use super::round::{round_number, RoundName};
use super::SeriesError;

/// Prefix marking a series that has not been saved yet.
pub const PLACEHOLDER_ID_PREFIX: &str = "temp-";

// ---------------------------------------------------------------------------
// Season
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeasonError {
    #[error("season id must not be empty")]
    EmptyId,

    #[error("season {id}: year_end must be {expected}, got {year_end}")]
    YearSpan {
        id: String,
        year_end: i32,
        expected: i32,
    },

    #[error("season {id}: start year {year_start} is out of range")]
    YearOutOfRange { id: String, year_start: i32 },
}

/// A league season spanning two calendar years (e.g. 2023-24).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Season {
    pub id: String,
    pub year_start: i32,
    pub year_end: i32,
}

impl Season {
    pub fn new(id: impl Into<String>, year_start: i32, year_end: i32) -> Result<Self, SeasonError> {
        let season = Season {
            id: id.into(),
            year_start,
            year_end,
        };
        season.validate()?;
        Ok(season)
    }

    /// Build the season that starts in `year_start`.
    pub fn starting(id: impl Into<String>, year_start: i32) -> Result<Self, SeasonError> {
        let id = id.into();
        match year_start.checked_add(1) {
            Some(year_end) => Self::new(id, year_start, year_end),
            None => Err(SeasonError::YearOutOfRange { id, year_start }),
        }
    }

    pub fn validate(&self) -> Result<(), SeasonError> {
        if self.id.trim().is_empty() {
            return Err(SeasonError::EmptyId);
        }
        let Some(expected) = self.year_start.checked_add(1) else {
            return Err(SeasonError::YearOutOfRange {
                id: self.id.clone(),
                year_start: self.year_start,
            });
        };
        if self.year_end != expected {
            return Err(SeasonError::YearSpan {
                id: self.id.clone(),
                year_end: self.year_end,
                expected,
            });
        }
        Ok(())
    }

    /// Display label, e.g. "2023-24".
    pub fn label(&self) -> String {
        format!("{}-{:02}", self.year_start, self.year_end.rem_euclid(100))
    }
}

// ---------------------------------------------------------------------------
// Playoff series
// ---------------------------------------------------------------------------

/// A best-of-seven series between two teams, tracked for one player in one
/// season and round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayoffSeries {
    pub id: String,
    pub player_id: String,
    pub season_id: String,
    pub round_name: String,
    pub round_number: u8,
    pub team1_id: Option<String>,
    pub team1_name: Option<String>,
    pub team1_seed: Option<u8>,
    pub team2_id: Option<String>,
    pub team2_name: Option<String>,
    pub team2_seed: Option<u8>,
    pub team1_wins: u32,
    pub team2_wins: u32,
    pub winner_team_id: Option<String>,
    pub winner_team_name: Option<String>,
    pub is_complete: bool,
    /// Set by the repository on first save.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl PlayoffSeries {
    /// An unsaved series for `player_id` in `season_id`, carrying a
    /// placeholder id until the first save assigns a permanent one.
    pub fn draft(season_id: &str, player_id: &str) -> Self {
        PlayoffSeries {
            id: placeholder_id(),
            player_id: player_id.to_string(),
            season_id: season_id.to_string(),
            round_name: RoundName::FirstRound.label().to_string(),
            round_number: RoundName::FirstRound.number(),
            team1_id: None,
            team1_name: None,
            team1_seed: None,
            team2_id: None,
            team2_name: None,
            team2_seed: None,
            team1_wins: 0,
            team2_wins: 0,
            winner_team_id: None,
            winner_team_name: None,
            is_complete: false,
            created_at: None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        is_placeholder_id(&self.id)
    }

    /// Evaluate the current win counts.
    pub fn outcome(&self) -> SeriesOutcome {
        determine_winner(
            self.team1_id.as_deref(),
            self.team1_name.as_deref(),
            self.team1_wins,
            self.team2_id.as_deref(),
            self.team2_name.as_deref(),
            self.team2_wins,
        )
    }

    pub fn set_outcome(&mut self, outcome: SeriesOutcome) {
        self.winner_team_id = outcome.winner_team_id;
        self.winner_team_name = outcome.winner_team_name;
        self.is_complete = outcome.is_complete;
    }

    /// Recompute every derived field: round number from the round name and
    /// winner/completion from the win counts.
    pub fn rederive(&mut self) -> Result<(), SeriesError> {
        self.round_number = round_number(&self.round_name).ok_or_else(|| unknown_round(&self.round_name))?;
        let outcome = self.outcome();
        self.set_outcome(outcome);
        Ok(())
    }
}

/// Input for creating a series. Identity and derived fields are computed on
/// creation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSeries {
    pub player_id: String,
    pub round_name: String,
    pub team1_id: Option<String>,
    pub team1_name: Option<String>,
    pub team1_seed: Option<u8>,
    pub team2_id: Option<String>,
    pub team2_name: Option<String>,
    pub team2_seed: Option<u8>,
    pub team1_wins: u32,
    pub team2_wins: u32,
}

impl NewSeries {
    pub(crate) fn validate(&self) -> Result<(), SeriesError> {
        if self.player_id.trim().is_empty() {
            return Err(SeriesError::validation("player_id", "must not be empty"));
        }
        if RoundName::parse(&self.round_name).is_none() {
            return Err(unknown_round(&self.round_name));
        }
        validate_seed("team1_seed", self.team1_seed)?;
        validate_seed("team2_seed", self.team2_seed)?;
        validate_distinct_teams(self.team1_id.as_deref(), self.team2_id.as_deref())
    }
}

impl From<&PlayoffSeries> for NewSeries {
    fn from(series: &PlayoffSeries) -> Self {
        NewSeries {
            player_id: series.player_id.clone(),
            round_name: series.round_name.clone(),
            team1_id: series.team1_id.clone(),
            team1_name: series.team1_name.clone(),
            team1_seed: series.team1_seed,
            team2_id: series.team2_id.clone(),
            team2_name: series.team2_name.clone(),
            team2_seed: series.team2_seed,
            team1_wins: series.team1_wins,
            team2_wins: series.team2_wins,
        }
    }
}

// ---------------------------------------------------------------------------
// Partial updates
// ---------------------------------------------------------------------------

/// Field-by-field update for an existing series. `None` leaves a field
/// untouched; for nullable fields `Some(None)` clears it back to "TBD".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeriesPatch {
    pub round_name: Option<String>,
    pub team1_id: Option<Option<String>>,
    pub team1_name: Option<Option<String>>,
    pub team1_seed: Option<Option<u8>>,
    pub team2_id: Option<Option<String>>,
    pub team2_name: Option<Option<String>>,
    pub team2_seed: Option<Option<u8>>,
    pub team1_wins: Option<u32>,
    pub team2_wins: Option<u32>,
}

impl SeriesPatch {
    /// Patch that only changes the win counts.
    pub fn wins(team1_wins: u32, team2_wins: u32) -> Self {
        SeriesPatch {
            team1_wins: Some(team1_wins),
            team2_wins: Some(team2_wins),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == SeriesPatch::default()
    }

    /// Apply the patch to `series` and re-derive round number and outcome.
    ///
    /// Every field is validated before anything is written, so a rejected
    /// patch leaves `series` unchanged.
    pub fn apply(&self, series: &mut PlayoffSeries) -> Result<(), SeriesError> {
        let round_name = self.round_name.as_ref().unwrap_or(&series.round_name);
        if RoundName::parse(round_name).is_none() {
            return Err(unknown_round(round_name));
        }
        if let Some(seed) = self.team1_seed {
            validate_seed("team1_seed", seed)?;
        }
        if let Some(seed) = self.team2_seed {
            validate_seed("team2_seed", seed)?;
        }
        let team1_id = self.team1_id.clone().unwrap_or_else(|| series.team1_id.clone());
        let team2_id = self.team2_id.clone().unwrap_or_else(|| series.team2_id.clone());
        validate_distinct_teams(team1_id.as_deref(), team2_id.as_deref())?;

        if let Some(name) = &self.round_name {
            series.round_name = name.clone();
        }
        series.team1_id = team1_id;
        series.team2_id = team2_id;
        if let Some(name) = &self.team1_name {
            series.team1_name = name.clone();
        }
        if let Some(name) = &self.team2_name {
            series.team2_name = name.clone();
        }
        if let Some(seed) = self.team1_seed {
            series.team1_seed = seed;
        }
        if let Some(seed) = self.team2_seed {
            series.team2_seed = seed;
        }
        if let Some(wins) = self.team1_wins {
            series.team1_wins = wins;
        }
        if let Some(wins) = self.team2_wins {
            series.team2_wins = wins;
        }
        series.rederive()
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Generate a placeholder id for an unsaved series.
pub fn placeholder_id() -> String {
    let now = Utc::now();
    format!("{PLACEHOLDER_ID_PREFIX}{}", now.format("%Y%m%d%H%M%S%3f"))
}

pub fn is_placeholder_id(id: &str) -> bool {
    id.starts_with(PLACEHOLDER_ID_PREFIX)
}

fn unknown_round(name: &str) -> SeriesError {
    SeriesError::validation("round_name", format!("unknown round '{name}'"))
}

fn validate_seed(field: &str, seed: Option<u8>) -> Result<(), SeriesError> {
    match seed {
        Some(0) => Err(SeriesError::validation(field, "must be at least 1")),
        _ => Ok(()),
    }
}

fn validate_distinct_teams(team1_id: Option<&str>, team2_id: Option<&str>) -> Result<(), SeriesError> {
    match (team1_id, team2_id) {
        (Some(a), Some(b)) if !a.is_empty() && a == b => Err(SeriesError::validation(
            "team2_id",
            format!("must differ from team1_id ('{a}')"),
        )),
        _ => Ok(()),
    }
}
