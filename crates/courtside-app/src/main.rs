// Courtside entry point.
//
// Startup sequence:
// 1. Parse command line
// 2. Load config (copying defaults on first run)
// 3. Initialize tracing (log to file, not terminal)
// 4. Open database
// 5. Run the requested command, printing results to stdout

mod cli;

use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;

use courtside_core::config::{self, Config};
use courtside_core::db::Database;
use courtside_core::directory;
use courtside_core::games::{self, GameRecord};
use courtside_core::series::{NewSeries, Season, SeriesPatch};
use courtside_core::service::SeriesService;

use cli::{Cli, Command};

fn main() {
    let cli = Cli::parse();
    run(cli).unwrap_or_else(|e| {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    });
}

fn run(cli: Cli) -> Result<()> {
    let config = config::load_or_init(&cli.root).context("failed to load configuration")?;

    init_tracing(&cli.root, &config)?;
    info!("courtside starting: {:?}", cli.command);

    let db_path = cli.root.join(&config.database.path);
    let db = Database::open(&db_path.to_string_lossy()).context("failed to open database")?;
    info!("Database opened at {}", db_path.display());

    execute_command(&cli.root, &config, SeriesService::new(db), cli.command)
}

fn execute_command(
    root: &Path,
    config: &Config,
    svc: SeriesService<Database>,
    command: Command,
) -> Result<()> {
    match command {
        Command::AddSeason { id, start } => {
            let season = Season::starting(id, start)?;
            svc.repository().upsert_season(&season)?;
            println!("{} {}", season.id, season.label());
        }
        Command::ListSeasons => {
            for season in svc.repository().list_seasons()? {
                println!("{:<12} {}", season.id, season.label());
            }
        }
        Command::AddSeries {
            season,
            player,
            round,
            team1,
            team2,
            team1_name,
            team2_name,
            team1_seed,
            team2_seed,
            team1_wins,
            team2_wins,
        } => {
            let season = find_season(&svc, &season)?;
            let input = NewSeries {
                player_id: player,
                round_name: round,
                team1_id: team1,
                team1_name,
                team1_seed,
                team2_id: team2,
                team2_name,
                team2_seed,
                team1_wins,
                team2_wins,
            };
            let created = svc.create(&season, input)?;
            println!("{}", serde_json::to_string_pretty(&created)?);
        }
        Command::SetWins {
            season,
            player,
            id,
            team1_wins,
            team2_wins,
        } => {
            let patch = SeriesPatch::wins(team1_wins, team2_wins);
            let updated = svc.update(&season, &player, &id, &patch)?;
            println!("{}", serde_json::to_string_pretty(&updated)?);
        }
        Command::DeleteSeries { id } => {
            svc.delete(&id)?;
            println!("deleted {id}");
        }
        Command::ListSeries { season, player } => {
            for s in svc.list(&season, &player)? {
                println!(
                    "{:<20} {:<22} {} {}-{} {}",
                    s.id,
                    s.round_name,
                    matchup_label(s.team1_id.as_deref(), s.team2_id.as_deref()),
                    s.team1_wins,
                    s.team2_wins,
                    if s.is_complete { "final" } else { "open" },
                );
            }
        }
        Command::ImportGames { file } => {
            let records = games::load_games(&file)?;
            let count = svc.repository().import_games(&records)?;
            info!("Imported {} games from {}", count, file.display());
            println!("imported {count} games");
        }
        Command::RecordGame {
            id,
            season,
            player,
            date,
            team,
            opponent,
            points,
            series,
        } => {
            let game = GameRecord {
                id,
                season_id: season,
                player_id: player,
                played_on: date,
                team_id: team,
                opponent_team_id: opponent,
                points,
                is_playoff_game: series.is_some(),
                playoff_series_id: series,
            };
            svc.repository().record_game(&game)?;
            info!("Recorded game {}", game.id);
            println!("recorded {}", game.id);
        }
        Command::Bracket { season, player } => {
            let teams = directory::load_teams(&root.join(&config.data_paths.teams))
                .context("failed to load team directory")?;
            let played = svc.repository().load_games(&season, &player)?;
            let bracket = svc.bracket(&season, &player, &played, &teams)?;
            println!("{}", serde_json::to_string_pretty(&bracket)?);
        }
    }
    Ok(())
}

fn find_season(svc: &SeriesService<Database>, id: &str) -> Result<Season> {
    match svc.repository().load_season(id)? {
        Some(season) => Ok(season),
        None => bail!("unknown season {id}; add it with `courtside add-season`"),
    }
}

fn matchup_label(team1: Option<&str>, team2: Option<&str>) -> String {
    format!("{} vs {}", team1.unwrap_or("TBD"), team2.unwrap_or("TBD"))
}

/// Initialize tracing to a file in the configured log directory.
///
/// Terminal output is reserved for command results.
fn init_tracing(root: &Path, config: &Config) -> Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = root.join(&config.logging.dir);
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("courtside.log"))
        .context("failed to open log file")?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter)),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matchup_label_fills_open_slots() {
        assert_eq!(matchup_label(Some("team-bos"), None), "team-bos vs TBD");
        assert_eq!(matchup_label(None, None), "TBD vs TBD");
    }
}
