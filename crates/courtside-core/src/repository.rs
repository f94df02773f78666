// Storage boundary for playoff series.

use anyhow::Result;

use crate::series::PlayoffSeries;

/// Persistence operations the series engine relies on.
///
/// Implementations report failures through `anyhow::Error`; the engine passes
/// them to its caller unchanged and never retries. Creation is not atomic
/// with id derivation, so callers serialize mutations per
/// `(season_id, player_id)`.
pub trait SeriesRepository {
    /// All series for one player in one season, ordered by round number then
    /// creation time.
    fn list(&self, season_id: &str, player_id: &str) -> Result<Vec<PlayoffSeries>>;

    /// Insert a new series. Returns the stored record.
    fn create(&self, series: &PlayoffSeries) -> Result<PlayoffSeries>;

    /// Replace the stored fields of series `id`. Returns the stored record.
    ///
    /// `player_id`, `season_id` and `created_at` are fixed at creation:
    /// implementations leave them as stored whatever `series` carries.
    fn update(&self, id: &str, series: &PlayoffSeries) -> Result<PlayoffSeries>;

    /// Remove series `id`.
    fn delete(&self, id: &str) -> Result<()>;
}

impl<R: SeriesRepository + ?Sized> SeriesRepository for &R {
    fn list(&self, season_id: &str, player_id: &str) -> Result<Vec<PlayoffSeries>> {
        (**self).list(season_id, player_id)
    }

    fn create(&self, series: &PlayoffSeries) -> Result<PlayoffSeries> {
        (**self).create(series)
    }

    fn update(&self, id: &str, series: &PlayoffSeries) -> Result<PlayoffSeries> {
        (**self).update(id, series)
    }

    fn delete(&self, id: &str) -> Result<()> {
        (**self).delete(id)
    }
}
