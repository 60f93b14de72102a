use std::error::Error;
use std::fmt;

/// Error taxonomy of the retrieval core.
///
/// An empty retrieval result is deliberately not represented here: callers
/// must treat "no matches" as a valid outcome, and the answer builder renders
/// a canonical no-match message for it.
#[derive(Debug)]
pub enum PlantMatchError {
    /// The corpus snapshot or the embedding index could not be loaded/built.
    /// Fatal: no retrieval can proceed without them.
    DataUnavailable(String),
    /// The caller supplied an empty query or a zero `top_k`. Recoverable,
    /// surfaced as a rejected request.
    InvalidQuery(String),
}

impl fmt::Display for PlantMatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlantMatchError::DataUnavailable(reason) => {
                write!(f, "Plant data unavailable: {}", reason)
            }
            PlantMatchError::InvalidQuery(reason) => {
                write!(f, "Invalid query: {}", reason)
            }
        }
    }
}

impl Error for PlantMatchError {}
