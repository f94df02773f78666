// SQLite persistence layer for seasons, playoff series, and games.

use std::sync::{Mutex, MutexGuard};

use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::games::GameRecord;
use crate::repository::SeriesRepository;
use crate::series::{PlayoffSeries, Season};

/// Column list shared by every playoff_series SELECT, in `series_from_row` order.
const SERIES_COLUMNS: &str = "id, player_id, season_id, round_name, round_number,
    team1_id, team1_name, team1_seed, team2_id, team2_name, team2_seed,
    team1_wins, team2_wins, winner_team_id, winner_team_name, is_complete, created_at";

const GAME_COLUMNS: &str = "id, season_id, player_id, played_on, team_id, opponent_team_id,
    points, playoff_series_id, is_playoff_game";

/// SQLite-backed storage. Implements [`SeriesRepository`] for the series
/// engine and carries the season and game tables it reads alongside.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) a SQLite database at `path` and ensure all tables
    /// exist. Pass `":memory:"` for an ephemeral in-memory database (useful
    /// for tests).
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open database at {path}"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;
             PRAGMA foreign_keys = ON;",
        )
        .context("failed to set database pragmas")?;

        // Series ids are the primary key: two racing creations that derive
        // the same id fail on insert instead of overwriting each other.
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS seasons (
                id         TEXT PRIMARY KEY,
                year_start INTEGER NOT NULL,
                year_end   INTEGER NOT NULL,
                CHECK (year_end = year_start + 1)
            );

            CREATE TABLE IF NOT EXISTS playoff_series (
                id               TEXT PRIMARY KEY,
                player_id        TEXT NOT NULL,
                season_id        TEXT NOT NULL,
                round_name       TEXT NOT NULL,
                round_number     INTEGER NOT NULL,
                team1_id         TEXT,
                team1_name       TEXT,
                team1_seed       INTEGER,
                team2_id         TEXT,
                team2_name       TEXT,
                team2_seed       INTEGER,
                team1_wins       INTEGER NOT NULL DEFAULT 0,
                team2_wins       INTEGER NOT NULL DEFAULT 0,
                winner_team_id   TEXT,
                winner_team_name TEXT,
                is_complete      INTEGER NOT NULL DEFAULT 0,
                created_at       TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS games (
                id                TEXT PRIMARY KEY,
                season_id         TEXT NOT NULL,
                player_id         TEXT NOT NULL,
                played_on         TEXT,
                team_id           TEXT,
                opponent_team_id  TEXT,
                points            INTEGER,
                playoff_series_id TEXT,
                is_playoff_game   INTEGER NOT NULL DEFAULT 0
            );
            ",
        )
        .context("failed to create database schema")?;

        conn.execute_batch(
            "CREATE INDEX IF NOT EXISTS idx_series_scope ON playoff_series(season_id, player_id);
             CREATE INDEX IF NOT EXISTS idx_games_scope ON games(season_id, player_id);",
        )
        .context("failed to create indexes")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Acquire the database connection.
    ///
    /// Panics if the mutex is poisoned (another thread panicked while
    /// holding the lock). This should never happen in normal operation.
    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().expect("database mutex poisoned")
    }

    // ------------------------------------------------------------------
    // Seasons
    // ------------------------------------------------------------------

    /// Insert a season, or overwrite its years if the id already exists.
    pub fn upsert_season(&self, season: &Season) -> Result<()> {
        season.validate().context("refusing to store invalid season")?;
        let conn = self.conn();
        conn.execute(
            "INSERT INTO seasons (id, year_start, year_end) VALUES (?1, ?2, ?3)
             ON CONFLICT(id) DO UPDATE SET
                year_start = excluded.year_start,
                year_end   = excluded.year_end",
            params![season.id, season.year_start, season.year_end],
        )
        .context("failed to upsert season")?;
        Ok(())
    }

    /// Load a season by id. Returns `None` if it does not exist.
    pub fn load_season(&self, id: &str) -> Result<Option<Season>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT id, year_start, year_end FROM seasons WHERE id = ?1",
            params![id],
            |row| {
                Ok(Season {
                    id: row.get(0)?,
                    year_start: row.get(1)?,
                    year_end: row.get(2)?,
                })
            },
        )
        .optional()
        .context("failed to load season")
    }

    /// All seasons, oldest first.
    pub fn list_seasons(&self) -> Result<Vec<Season>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare("SELECT id, year_start, year_end FROM seasons ORDER BY year_start, id")
            .context("failed to prepare list_seasons query")?;
        let seasons = stmt
            .query_map([], |row| {
                Ok(Season {
                    id: row.get(0)?,
                    year_start: row.get(1)?,
                    year_end: row.get(2)?,
                })
            })
            .context("failed to query seasons")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("failed to map season rows")?;
        Ok(seasons)
    }

    // ------------------------------------------------------------------
    // Games
    // ------------------------------------------------------------------

    /// Record a single game. Re-recording the same id replaces the row.
    pub fn record_game(&self, game: &GameRecord) -> Result<()> {
        let conn = self.conn();
        insert_game(&conn, game).context("failed to record game")?;
        Ok(())
    }

    /// Import many games in a single transaction.
    pub fn import_games(&self, games: &[GameRecord]) -> Result<usize> {
        let mut conn = self.conn();
        let tx = conn.transaction().context("failed to begin import transaction")?;
        for game in games {
            insert_game(&tx, game)
                .with_context(|| format!("failed to insert game {} in batch", game.id))?;
        }
        tx.commit().context("failed to commit game import")?;
        Ok(games.len())
    }

    /// Games for one player in one season, ordered by date then id.
    pub fn load_games(&self, season_id: &str, player_id: &str) -> Result<Vec<GameRecord>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {GAME_COLUMNS} FROM games
                 WHERE season_id = ?1 AND player_id = ?2
                 ORDER BY played_on, id"
            ))
            .context("failed to prepare load_games query")?;
        let games = stmt
            .query_map(params![season_id, player_id], game_from_row)
            .context("failed to query games")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("failed to map game rows")?;
        Ok(games)
    }

    // ------------------------------------------------------------------
    // Series
    // ------------------------------------------------------------------

    fn load_series(conn: &Connection, id: &str) -> Result<Option<PlayoffSeries>> {
        conn.query_row(
            &format!("SELECT {SERIES_COLUMNS} FROM playoff_series WHERE id = ?1"),
            params![id],
            series_from_row,
        )
        .optional()
        .context("failed to load playoff series")
    }
}

impl SeriesRepository for Database {
    fn list(&self, season_id: &str, player_id: &str) -> Result<Vec<PlayoffSeries>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {SERIES_COLUMNS} FROM playoff_series
                 WHERE season_id = ?1 AND player_id = ?2
                 ORDER BY round_number, created_at, rowid"
            ))
            .context("failed to prepare list series query")?;
        let series = stmt
            .query_map(params![season_id, player_id], series_from_row)
            .context("failed to query playoff series")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("failed to map playoff series rows")?;
        Ok(series)
    }

    fn create(&self, series: &PlayoffSeries) -> Result<PlayoffSeries> {
        let conn = self.conn();
        let created_at = format_timestamp(series.created_at.unwrap_or_else(Utc::now));
        conn.execute(
            &format!(
                "INSERT INTO playoff_series ({SERIES_COLUMNS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)"
            ),
            params![
                series.id,
                series.player_id,
                series.season_id,
                series.round_name,
                series.round_number,
                series.team1_id,
                series.team1_name,
                series.team1_seed,
                series.team2_id,
                series.team2_name,
                series.team2_seed,
                series.team1_wins,
                series.team2_wins,
                series.winner_team_id,
                series.winner_team_name,
                series.is_complete,
                created_at,
            ],
        )
        .with_context(|| format!("failed to create playoff series {}", series.id))?;

        Self::load_series(&conn, &series.id)?
            .with_context(|| format!("playoff series {} missing after insert", series.id))
    }

    fn update(&self, id: &str, series: &PlayoffSeries) -> Result<PlayoffSeries> {
        let conn = self.conn();
        let changed = conn
            .execute(
                "UPDATE playoff_series SET
                    round_name = ?2, round_number = ?3,
                    team1_id = ?4, team1_name = ?5, team1_seed = ?6,
                    team2_id = ?7, team2_name = ?8, team2_seed = ?9,
                    team1_wins = ?10, team2_wins = ?11,
                    winner_team_id = ?12, winner_team_name = ?13, is_complete = ?14
                 WHERE id = ?1",
                params![
                    id,
                    series.round_name,
                    series.round_number,
                    series.team1_id,
                    series.team1_name,
                    series.team1_seed,
                    series.team2_id,
                    series.team2_name,
                    series.team2_seed,
                    series.team1_wins,
                    series.team2_wins,
                    series.winner_team_id,
                    series.winner_team_name,
                    series.is_complete,
                ],
            )
            .with_context(|| format!("failed to update playoff series {id}"))?;
        if changed == 0 {
            bail!("no playoff series with id {id}");
        }

        Self::load_series(&conn, id)?
            .with_context(|| format!("playoff series {id} missing after update"))
    }

    fn delete(&self, id: &str) -> Result<()> {
        let conn = self.conn();
        let changed = conn
            .execute("DELETE FROM playoff_series WHERE id = ?1", params![id])
            .with_context(|| format!("failed to delete playoff series {id}"))?;
        if changed == 0 {
            bail!("no playoff series with id {id}");
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Row mapping
// ---------------------------------------------------------------------------

fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
}

fn series_from_row(row: &Row<'_>) -> rusqlite::Result<PlayoffSeries> {
    let created_at: Option<String> = row.get(16)?;
    Ok(PlayoffSeries {
        id: row.get(0)?,
        player_id: row.get(1)?,
        season_id: row.get(2)?,
        round_name: row.get(3)?,
        round_number: row.get(4)?,
        team1_id: row.get(5)?,
        team1_name: row.get(6)?,
        team1_seed: row.get(7)?,
        team2_id: row.get(8)?,
        team2_name: row.get(9)?,
        team2_seed: row.get(10)?,
        team1_wins: row.get(11)?,
        team2_wins: row.get(12)?,
        winner_team_id: row.get(13)?,
        winner_team_name: row.get(14)?,
        is_complete: row.get(15)?,
        created_at: created_at.as_deref().and_then(parse_timestamp),
    })
}

fn game_from_row(row: &Row<'_>) -> rusqlite::Result<GameRecord> {
    let played_on: Option<String> = row.get(3)?;
    Ok(GameRecord {
        id: row.get(0)?,
        season_id: row.get(1)?,
        player_id: row.get(2)?,
        played_on: played_on
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()),
        team_id: row.get(4)?,
        opponent_team_id: row.get(5)?,
        points: row.get(6)?,
        playoff_series_id: row.get(7)?,
        is_playoff_game: row.get(8)?,
    })
}

fn insert_game(conn: &Connection, game: &GameRecord) -> rusqlite::Result<usize> {
    conn.execute(
        &format!(
            "INSERT OR REPLACE INTO games ({GAME_COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"
        ),
        params![
            game.id,
            game.season_id,
            game.player_id,
            game.played_on.map(|d| d.format("%Y-%m-%d").to_string()),
            game.team_id,
            game.opponent_team_id,
            game.points,
            game.playoff_series_id,
            game.is_playoff_game,
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper: create a fresh in-memory database for each test.
    fn test_db() -> Database {
        Database::open(":memory:").expect("in-memory database should open")
    }

    /// Helper: build a saved-looking series.
    fn sample_series(id: &str, round_number: u8, round_name: &str) -> PlayoffSeries {
        PlayoffSeries {
            id: id.to_string(),
            round_name: round_name.to_string(),
            round_number,
            team1_id: Some("team-bos".into()),
            team1_name: Some("Celtics".into()),
            team1_seed: Some(1),
            team2_id: Some("team-mia".into()),
            team2_seed: Some(8),
            ..PlayoffSeries::draft("s1", "player-1")
        }
    }

    fn sample_game(id: &str, played_on: &str, series_id: Option<&str>) -> GameRecord {
        GameRecord {
            id: id.into(),
            season_id: "s1".into(),
            player_id: "player-1".into(),
            played_on: NaiveDate::parse_from_str(played_on, "%Y-%m-%d").ok(),
            team_id: Some("team-bos".into()),
            opponent_team_id: Some("team-mia".into()),
            points: Some(27),
            playoff_series_id: series_id.map(str::to_string),
            is_playoff_game: series_id.is_some(),
        }
    }

    // ------------------------------------------------------------------
    // Schema / open
    // ------------------------------------------------------------------

    #[test]
    fn open_creates_tables() {
        let db = test_db();
        let conn = db.conn();

        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();

        assert!(tables.contains(&"seasons".to_string()));
        assert!(tables.contains(&"playoff_series".to_string()));
        assert!(tables.contains(&"games".to_string()));
    }

    // ------------------------------------------------------------------
    // Seasons
    // ------------------------------------------------------------------

    #[test]
    fn season_upsert_and_load() {
        let db = test_db();
        db.upsert_season(&Season::new("s2", 2024, 2025).unwrap()).unwrap();
        db.upsert_season(&Season::new("s1", 2023, 2024).unwrap()).unwrap();

        let s1 = db.load_season("s1").unwrap().unwrap();
        assert_eq!(s1.year_start, 2023);
        assert!(db.load_season("missing").unwrap().is_none());

        let ids: Vec<String> = db.list_seasons().unwrap().into_iter().map(|s| s.id).collect();
        assert_eq!(ids, vec!["s1", "s2"]);
    }

    #[test]
    fn invalid_season_is_rejected() {
        let db = test_db();
        let bad = Season {
            id: "s1".into(),
            year_start: 2023,
            year_end: 2030,
        };
        assert!(db.upsert_season(&bad).is_err());
        assert!(db.load_season("s1").unwrap().is_none());
    }

    // ------------------------------------------------------------------
    // Series
    // ------------------------------------------------------------------

    #[test]
    fn create_and_list_round_trip() {
        let db = test_db();
        let series = sample_series("1-2324-rnd1-e", 1, "Round 1");
        let stored = db.create(&series).unwrap();

        assert_eq!(stored.id, series.id);
        assert_eq!(stored.team1_seed, Some(1));
        assert_eq!(stored.team2_name, None);
        assert!(stored.created_at.is_some());

        let listed = db.list("s1", "player-1").unwrap();
        assert_eq!(listed, vec![stored]);
    }

    #[test]
    fn duplicate_id_insert_fails() {
        let db = test_db();
        let series = sample_series("1-2324-rnd1-e", 1, "Round 1");
        db.create(&series).unwrap();
        let err = db.create(&series).unwrap_err();
        assert!(err.to_string().contains("failed to create playoff series"));
        assert_eq!(db.list("s1", "player-1").unwrap().len(), 1);
    }

    #[test]
    fn list_orders_by_round_then_creation() {
        let db = test_db();
        let base = Utc::now();
        let rows = [
            ("1-2324-rnd2-e", 2, "Conference Semifinals", 0),
            ("1-2324-rnd1-e", 1, "Round 1", 2),
            ("1-2324-rnd1-e-2", 1, "Round 1", 1),
            ("1-2324-plyn-e", 0, "Play-In Tournament", 3),
        ];
        for (id, num, name, offset) in rows {
            let series = PlayoffSeries {
                created_at: Some(base + chrono::Duration::seconds(offset)),
                ..sample_series(id, num, name)
            };
            db.create(&series).unwrap();
        }

        let ids: Vec<String> = db.list("s1", "player-1").unwrap().into_iter().map(|s| s.id).collect();
        assert_eq!(
            ids,
            vec!["1-2324-plyn-e", "1-2324-rnd1-e-2", "1-2324-rnd1-e", "1-2324-rnd2-e"]
        );
    }

    #[test]
    fn list_is_scoped_to_season_and_player() {
        let db = test_db();
        db.create(&sample_series("1-2324-rnd1-e", 1, "Round 1")).unwrap();
        let other_player = PlayoffSeries {
            player_id: "player-2".into(),
            ..sample_series("2-2324-rnd1-e", 1, "Round 1")
        };
        db.create(&other_player).unwrap();

        assert_eq!(db.list("s1", "player-1").unwrap().len(), 1);
        assert_eq!(db.list("s1", "player-2").unwrap().len(), 1);
        assert!(db.list("s2", "player-1").unwrap().is_empty());
    }

    #[test]
    fn update_replaces_fields_but_keeps_created_at() {
        let db = test_db();
        let stored = db.create(&sample_series("1-2324-rnd1-e", 1, "Round 1")).unwrap();

        let mut edited = stored.clone();
        edited.team1_wins = 4;
        edited.team2_wins = 2;
        edited.winner_team_id = Some("team-bos".into());
        edited.is_complete = true;
        edited.created_at = None;

        let updated = db.update(&stored.id, &edited).unwrap();
        assert_eq!(updated.team1_wins, 4);
        assert!(updated.is_complete);
        assert_eq!(updated.created_at, stored.created_at);
    }

    #[test]
    fn update_never_changes_owner() {
        let db = test_db();
        let stored = db.create(&sample_series("1-2324-rnd1-e", 1, "Round 1")).unwrap();

        let mut edited = stored.clone();
        edited.player_id = "player-2".into();
        edited.season_id = "s2".into();
        edited.team1_wins = 1;

        let updated = db.update(&stored.id, &edited).unwrap();
        assert_eq!(updated.player_id, "player-1");
        assert_eq!(updated.season_id, "s1");
        assert_eq!(updated.team1_wins, 1);
        assert_eq!(db.list("s1", "player-1").unwrap().len(), 1);
        assert!(db.list("s2", "player-2").unwrap().is_empty());
    }

    #[test]
    fn update_missing_series_fails() {
        let db = test_db();
        let series = sample_series("1-2324-rnd1-e", 1, "Round 1");
        let err = db.update(&series.id, &series).unwrap_err();
        assert!(err.to_string().contains("no playoff series"));
    }

    #[test]
    fn delete_removes_row() {
        let db = test_db();
        db.create(&sample_series("1-2324-rnd1-e", 1, "Round 1")).unwrap();
        db.delete("1-2324-rnd1-e").unwrap();
        assert!(db.list("s1", "player-1").unwrap().is_empty());
        assert!(db.delete("1-2324-rnd1-e").is_err());
    }

    // ------------------------------------------------------------------
    // Games
    // ------------------------------------------------------------------

    #[test]
    fn games_round_trip_in_date_order() {
        let db = test_db();
        db.record_game(&sample_game("g2", "2024-04-23", Some("1-2324-rnd1-e"))).unwrap();
        db.record_game(&sample_game("g1", "2024-04-21", Some("1-2324-rnd1-e"))).unwrap();
        db.record_game(&sample_game("g0", "2024-03-01", None)).unwrap();

        let games = db.load_games("s1", "player-1").unwrap();
        let ids: Vec<&str> = games.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, vec!["g0", "g1", "g2"]);
        assert!(!games[0].is_playoff_game);
        assert_eq!(games[1].playoff_series_id.as_deref(), Some("1-2324-rnd1-e"));
        assert_eq!(games[1].points, Some(27));
    }

    #[test]
    fn import_games_is_idempotent() {
        let db = test_db();
        let games = vec![
            sample_game("g1", "2024-04-21", Some("x")),
            sample_game("g2", "2024-04-23", Some("x")),
        ];
        assert_eq!(db.import_games(&games).unwrap(), 2);
        assert_eq!(db.import_games(&games).unwrap(), 2);
        assert_eq!(db.load_games("s1", "player-1").unwrap().len(), 2);
    }
}
