// Game records as consumed by the bracket: read-only children of a series.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;
use tracing::warn;

use crate::directory::DirectoryError;

/// A single game played by a tracked player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub id: String,
    pub season_id: String,
    pub player_id: String,
    #[serde(default)]
    pub played_on: Option<NaiveDate>,
    #[serde(default)]
    pub team_id: Option<String>,
    #[serde(default)]
    pub opponent_team_id: Option<String>,
    #[serde(default)]
    pub points: Option<u32>,
    #[serde(default)]
    pub playoff_series_id: Option<String>,
    #[serde(default)]
    pub is_playoff_game: bool,
}

impl GameRecord {
    /// Whether this game counts toward the given playoff series.
    pub fn belongs_to_series(&self, series_id: &str) -> bool {
        self.is_playoff_game && self.playoff_series_id.as_deref() == Some(series_id)
    }
}

/// Playoff games attached to `series_id`, in input order.
pub fn games_for_series(games: &[GameRecord], series_id: &str) -> Vec<GameRecord> {
    games
        .iter()
        .filter(|g| g.belongs_to_series(series_id))
        .cloned()
        .collect()
}

/// Load game records from a CSV file.
pub fn load_games(path: &Path) -> Result<Vec<GameRecord>, DirectoryError> {
    let file = std::fs::File::open(path).map_err(|e| DirectoryError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    load_games_from_reader(file).map_err(|e| DirectoryError::Csv {
        path: path.display().to_string(),
        source: e,
    })
}

/// Reader-based loader. Malformed rows are skipped with a warning.
pub fn load_games_from_reader<R: Read>(rdr: R) -> Result<Vec<GameRecord>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(rdr);
    let mut games = Vec::new();

    for result in reader.deserialize::<GameRecord>() {
        match result {
            Ok(game) => games.push(game),
            Err(e) => warn!("skipping malformed game row: {}", e),
        }
    }

    Ok(games)
}
