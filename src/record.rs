//! Film record types
//!
//! A `PartialRecord` is what the wiki article yields; a `Record` adds the
//! rating and is the unit handed to an item sink.

use serde::Serialize;

/// Placeholder written when a rating could not be determined
pub const RATING_SENTINEL: &str = "Not specified";

/// Fields extracted from a film's wiki article
///
/// Built once by the field extractor and never mutated afterwards; when the
/// chain hops to the rating site it is moved into the follow-up task as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialRecord {
    pub title: String,
    pub genre: String,
    pub director: String,
    pub country: String,
    pub year: String,
}

impl PartialRecord {
    /// Completes the record with a rating
    ///
    /// A blank rating is replaced by [`RATING_SENTINEL`].
    pub fn finalize(self, rating: Option<String>) -> Record {
        let rating = rating
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| RATING_SENTINEL.to_string());

        Record {
            title: self.title,
            genre: self.genre,
            director: self.director,
            country: self.country,
            year: self.year,
            rating,
        }
    }
}

/// A finished film record
///
/// Serialized field order and column names are the output schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    #[serde(rename = "Название")]
    pub title: String,

    #[serde(rename = "Жанр")]
    pub genre: String,

    #[serde(rename = "Режиссёр")]
    pub director: String,

    #[serde(rename = "Страна")]
    pub country: String,

    #[serde(rename = "Год")]
    pub year: String,

    #[serde(rename = "IMDB Rating")]
    pub rating: String,
}
