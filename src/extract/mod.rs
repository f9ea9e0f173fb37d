//! Field extraction for film articles
//!
//! This module turns a parsed wiki article into a [`PartialRecord`]:
//! - Reading the infobox title and labeled rows
//! - Pulling four-digit years out of the release row
//! - Cleaning multi-value fields with [`normalize`]
//!
//! [`PartialRecord`]: crate::record::PartialRecord

mod fields;
mod normalize;

pub use fields::{
    extract_fields, extract_years, raw_row, COUNTRY_LABEL, DIRECTOR_LABEL, GENRE_LABEL,
    YEAR_LABEL,
};
pub use normalize::normalize;
