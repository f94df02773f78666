// Team reference data: display names and abbreviations keyed by team id.
//
// Loaded from a CSV file with `id,name,abbreviation` columns. The directory
// is passed explicitly to every consumer rather than cached globally.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::warn;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamInfo {
    pub name: String,
    pub abbreviation: String,
}

/// Read-only lookup of team display data.
#[derive(Debug, Clone, Default)]
pub struct TeamDirectory {
    teams: HashMap<String, TeamInfo>,
}

impl TeamDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, team_id: impl Into<String>, info: TeamInfo) {
        self.teams.insert(team_id.into(), info);
    }

    pub fn lookup(&self, team_id: &str) -> Option<&TeamInfo> {
        self.teams.get(team_id)
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }
}

impl FromIterator<(String, TeamInfo)> for TeamDirectory {
    fn from_iter<I: IntoIterator<Item = (String, TeamInfo)>>(iter: I) -> Self {
        TeamDirectory {
            teams: iter.into_iter().collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },
}

// ---------------------------------------------------------------------------
// CSV loading
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawTeam {
    id: String,
    name: String,
    #[serde(default)]
    abbreviation: String,
}

/// Load a team directory from a CSV file.
pub fn load_teams(path: &Path) -> Result<TeamDirectory, DirectoryError> {
    let file = std::fs::File::open(path).map_err(|e| DirectoryError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    load_teams_from_reader(file).map_err(|e| DirectoryError::Csv {
        path: path.display().to_string(),
        source: e,
    })
}

/// Reader-based loader. Malformed rows and rows without an id are skipped;
/// a repeated id replaces the earlier row.
pub fn load_teams_from_reader<R: Read>(rdr: R) -> Result<TeamDirectory, csv::Error> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(rdr);
    let mut directory = TeamDirectory::new();

    for result in reader.deserialize::<RawTeam>() {
        match result {
            Ok(raw) => {
                if raw.id.is_empty() {
                    warn!("skipping team row without an id ('{}')", raw.name);
                    continue;
                }
                if directory.lookup(&raw.id).is_some() {
                    warn!("duplicate team entry for '{}', using latest row", raw.id);
                }
                let abbreviation = if raw.abbreviation.is_empty() {
                    abbreviate(&raw.id)
                } else {
                    raw.abbreviation
                };
                directory.insert(
                    raw.id,
                    TeamInfo {
                        name: raw.name,
                        abbreviation,
                    },
                );
            }
            Err(e) => {
                warn!("skipping malformed team row: {}", e);
            }
        }
    }

    Ok(directory)
}

/// Fallback abbreviation from an id such as "team-bos" -> "BOS".
fn abbreviate(team_id: &str) -> String {
    team_id.rsplit('-').next().unwrap_or(team_id).to_uppercase()
}
