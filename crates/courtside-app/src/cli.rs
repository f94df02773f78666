use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about = "Playoff series tracker and bracket builder")]
pub struct Cli {
    /// Project root holding `config/` (and `defaults/` on first run)
    #[arg(long, global = true, default_value = ".")]
    pub root: PathBuf,

    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "kebab-case")]
pub enum Command {
    /// Register a season (the end year is always start + 1)
    AddSeason {
        /// Season id
        id: String,
        /// First calendar year of the season, e.g. 2023 for 2023-24
        start: i32,
    },
    /// List registered seasons, oldest first
    ListSeasons,
    /// Create a playoff series with a derived id
    AddSeries {
        #[arg(long)]
        season: String,
        #[arg(long)]
        player: String,
        /// Round name, e.g. "Round 1" or "NBA Finals"
        #[arg(long)]
        round: String,
        #[arg(long)]
        team1: Option<String>,
        #[arg(long)]
        team2: Option<String>,
        #[arg(long)]
        team1_name: Option<String>,
        #[arg(long)]
        team2_name: Option<String>,
        #[arg(long)]
        team1_seed: Option<u8>,
        #[arg(long)]
        team2_seed: Option<u8>,
        #[arg(long, default_value_t = 0)]
        team1_wins: u32,
        #[arg(long, default_value_t = 0)]
        team2_wins: u32,
    },
    /// Record the current win counts of a series
    SetWins {
        #[arg(long)]
        season: String,
        #[arg(long)]
        player: String,
        /// Series id
        id: String,
        team1_wins: u32,
        team2_wins: u32,
    },
    /// Delete a series
    DeleteSeries {
        /// Series id
        id: String,
    },
    /// List a player's series for a season
    ListSeries {
        #[arg(long)]
        season: String,
        #[arg(long)]
        player: String,
    },
    /// Import game records from a CSV file
    ImportGames {
        file: PathBuf,
    },
    /// Record a single game (re-recording an id replaces it)
    RecordGame {
        /// Game id
        id: String,
        #[arg(long)]
        season: String,
        #[arg(long)]
        player: String,
        /// Game date, YYYY-MM-DD
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        team: Option<String>,
        #[arg(long)]
        opponent: Option<String>,
        #[arg(long)]
        points: Option<u32>,
        /// Playoff series the game belongs to
        #[arg(long)]
        series: Option<String>,
    },
    /// Print the organized bracket as JSON
    Bracket {
        #[arg(long)]
        season: String,
        #[arg(long)]
        player: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_add_series_flags() {
        let cli = Cli::try_parse_from([
            "courtside",
            "add-series",
            "--season",
            "s1",
            "--player",
            "player-1",
            "--round",
            "Round 1",
            "--team1",
            "team-bos",
            "--team2",
            "team-mia",
            "--team1-wins",
            "2",
        ])
        .unwrap();

        match cli.command {
            Command::AddSeries {
                round,
                team1,
                team1_wins,
                team2_wins,
                ..
            } => {
                assert_eq!(round, "Round 1");
                assert_eq!(team1.as_deref(), Some("team-bos"));
                assert_eq!(team1_wins, 2);
                assert_eq!(team2_wins, 0);
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert_eq!(cli.root, PathBuf::from("."));
    }

    #[test]
    fn parses_record_game_date() {
        let cli = Cli::try_parse_from([
            "courtside",
            "record-game",
            "g-0421",
            "--season",
            "s1",
            "--player",
            "player-1",
            "--date",
            "2024-04-21",
            "--series",
            "1-2324-rnd1-e",
        ])
        .unwrap();

        match cli.command {
            Command::RecordGame {
                id, date, series, points, ..
            } => {
                assert_eq!(id, "g-0421");
                assert_eq!(date, NaiveDate::from_ymd_opt(2024, 4, 21));
                assert_eq!(series.as_deref(), Some("1-2324-rnd1-e"));
                assert_eq!(points, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_malformed_game_date() {
        let result = Cli::try_parse_from([
            "courtside",
            "record-game",
            "g-1",
            "--season",
            "s1",
            "--player",
            "player-1",
            "--date",
            "April 21",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn parses_set_wins_positionals() {
        let cli = Cli::try_parse_from([
            "courtside",
            "--root",
            "/srv/courtside",
            "set-wins",
            "--season",
            "s1",
            "--player",
            "player-1",
            "1-2324-rnd1-e",
            "4",
            "1",
        ])
        .unwrap();
        assert_eq!(cli.root, PathBuf::from("/srv/courtside"));
        assert_eq!(
            cli.command,
            Command::SetWins {
                season: "s1".into(),
                player: "player-1".into(),
                id: "1-2324-rnd1-e".into(),
                team1_wins: 4,
                team2_wins: 1,
            }
        );
    }
}
