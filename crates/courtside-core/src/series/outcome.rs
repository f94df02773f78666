// Series completion and winner determination from win counts.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Wins needed to take a best-of-seven series.
pub const WINS_TO_CLINCH: u32 = 4;

/// Result of evaluating a series' win counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesOutcome {
    pub winner_team_id: Option<String>,
    pub winner_team_name: Option<String>,
    pub is_complete: bool,
}

impl SeriesOutcome {
    pub fn incomplete() -> Self {
        Self::default()
    }

    fn won_by(team_id: &str, team_name: Option<&str>) -> Self {
        SeriesOutcome {
            winner_team_id: Some(team_id.to_string()),
            winner_team_name: team_name.map(str::to_string),
            is_complete: true,
        }
    }
}

/// Decide whether a series is over and who won it.
///
/// Team 1 is checked first, so if both sides (invalidly) have reached the
/// clinch threshold team 1 is reported as the winner. A side only wins once
/// its team identity is resolved: a "TBD" slot with four wins leaves the
/// series incomplete.
pub fn determine_winner(
    team1_id: Option<&str>,
    team1_name: Option<&str>,
    team1_wins: u32,
    team2_id: Option<&str>,
    team2_name: Option<&str>,
    team2_wins: u32,
) -> SeriesOutcome {
    let team1_id = team1_id.filter(|id| !id.is_empty());
    let team2_id = team2_id.filter(|id| !id.is_empty());

    if team1_wins >= WINS_TO_CLINCH && team2_wins >= WINS_TO_CLINCH {
        warn!(
            "both sides at or above {} wins ({}-{}); reporting team 1 as winner",
            WINS_TO_CLINCH, team1_wins, team2_wins
        );
    }

    if team1_wins >= WINS_TO_CLINCH {
        if let Some(id) = team1_id {
            return SeriesOutcome::won_by(id, team1_name);
        }
    }
    if team2_wins >= WINS_TO_CLINCH {
        if let Some(id) = team2_id {
            return SeriesOutcome::won_by(id, team2_name);
        }
    }
    SeriesOutcome::incomplete()
}
