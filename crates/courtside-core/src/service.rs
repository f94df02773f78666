// Series lifecycle: create, save, patch, delete, and bracket reads.
//
// Every mutation derives ids and outcomes here before handing a complete
// record to the repository, so a failed call leaves storage untouched.

use tracing::info;

use crate::bracket::{organize_bracket, Bracket};
use crate::directory::TeamDirectory;
use crate::games::GameRecord;
use crate::repository::SeriesRepository;
use crate::series::{generate_series_id, NewSeries, PlayoffSeries, Season, SeriesError, SeriesPatch};

pub struct SeriesService<R> {
    repo: R,
}

impl<R: SeriesRepository> SeriesService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// All series for a player's season, in bracket order.
    pub fn list(&self, season_id: &str, player_id: &str) -> Result<Vec<PlayoffSeries>, SeriesError> {
        Ok(self.repo.list(season_id, player_id)?)
    }

    /// Look up one series within its owning season/player scope.
    pub fn find(&self, season_id: &str, player_id: &str, id: &str) -> Result<PlayoffSeries, SeriesError> {
        self.list(season_id, player_id)?
            .into_iter()
            .find(|s| s.id == id)
            .ok_or_else(|| SeriesError::NotFound { id: id.to_string() })
    }

    /// A new unsaved series for editing; it gets its permanent id on `save`.
    pub fn draft(&self, season: &Season, player_id: &str) -> PlayoffSeries {
        PlayoffSeries::draft(&season.id, player_id)
    }

    /// Create a series with a freshly derived id and outcome.
    pub fn create(&self, season: &Season, input: NewSeries) -> Result<PlayoffSeries, SeriesError> {
        season.validate()?;
        input.validate()?;

        let existing = self.repo.list(&season.id, &input.player_id)?;
        let id = generate_series_id(
            season,
            &input.round_name,
            input.team1_id.as_deref(),
            input.team2_id.as_deref(),
            &input.player_id,
            &existing,
        );

        let mut series = PlayoffSeries {
            id,
            season_id: season.id.clone(),
            round_name: input.round_name,
            team1_id: input.team1_id,
            team1_name: input.team1_name,
            team1_seed: input.team1_seed,
            team2_id: input.team2_id,
            team2_name: input.team2_name,
            team2_seed: input.team2_seed,
            team1_wins: input.team1_wins,
            team2_wins: input.team2_wins,
            ..PlayoffSeries::draft(&season.id, &input.player_id)
        };
        series.rederive()?;

        let stored = self.repo.create(&series)?;
        info!(
            "created series {} ({}, player {}, season {})",
            stored.id, stored.round_name, stored.player_id, stored.season_id
        );
        Ok(stored)
    }

    /// Persist an edited record. Series still carrying a placeholder id are
    /// created (and receive their permanent id); saved ones are replaced.
    /// A saved series must already exist under the record's season and
    /// player, so a save never moves it to another owner.
    pub fn save(&self, season: &Season, series: &PlayoffSeries) -> Result<PlayoffSeries, SeriesError> {
        if series.season_id != season.id {
            return Err(SeriesError::validation(
                "season_id",
                format!("series belongs to {}, not {}", series.season_id, season.id),
            ));
        }
        if series.is_placeholder() {
            return self.create(season, NewSeries::from(series));
        }

        NewSeries::from(series).validate()?;
        self.find(&season.id, &series.player_id, &series.id)?;
        let mut updated = series.clone();
        updated.rederive()?;
        let stored = self.repo.update(&updated.id, &updated)?;
        info!("saved series {} ({}-{})", stored.id, stored.team1_wins, stored.team2_wins);
        Ok(stored)
    }

    /// Apply a partial update to an existing series.
    pub fn update(
        &self,
        season_id: &str,
        player_id: &str,
        id: &str,
        patch: &SeriesPatch,
    ) -> Result<PlayoffSeries, SeriesError> {
        let mut series = self.find(season_id, player_id, id)?;
        if patch.is_empty() {
            return Ok(series);
        }
        patch.apply(&mut series)?;

        let stored = self.repo.update(id, &series)?;
        info!(
            "updated series {} ({}-{}, complete={})",
            stored.id, stored.team1_wins, stored.team2_wins, stored.is_complete
        );
        Ok(stored)
    }

    /// Delete a saved series. Unsaved drafts have nothing to remove.
    pub fn delete(&self, id: &str) -> Result<(), SeriesError> {
        if crate::series::model::is_placeholder_id(id) {
            return Ok(());
        }
        self.repo.delete(id)?;
        info!("deleted series {}", id);
        Ok(())
    }

    /// Build the bracket view for a player's season.
    pub fn bracket(
        &self,
        season_id: &str,
        player_id: &str,
        games: &[GameRecord],
        directory: &TeamDirectory,
    ) -> Result<Bracket, SeriesError> {
        let series = self.list(season_id, player_id)?;
        Ok(organize_bracket(&series, games, directory))
    }
}
