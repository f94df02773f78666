// Playoff series records, identity, and outcome rules.

pub mod id;
pub mod model;
pub mod outcome;
pub mod round;

pub use id::generate_series_id;
pub use model::{NewSeries, PlayoffSeries, Season, SeasonError, SeriesPatch};
pub use outcome::{determine_winner, SeriesOutcome, WINS_TO_CLINCH};
pub use round::RoundName;

use thiserror::Error;

/// Failures surfaced by series mutations.
#[derive(Debug, Error)]
pub enum SeriesError {
    #[error("validation error for field `{field}`: {message}")]
    Validation { field: String, message: String },

    #[error("series not found: {id}")]
    NotFound { id: String },

    #[error(transparent)]
    Season(#[from] SeasonError),

    /// Storage failures pass through with their original message.
    #[error(transparent)]
    Repository(#[from] anyhow::Error),
}

impl SeriesError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        SeriesError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }
}
