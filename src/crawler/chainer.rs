//! Cross-site chain handlers
//!
//! A film's chain begins on its wiki article. If the article links to the
//! rating site, the extracted fields ride along to that page and the rating
//! is read there; otherwise the record is finished straight away with the
//! sentinel rating. Either way a chain yields at most one record, and a chain
//! whose rating page turns out to be a block page yields none.

use crate::crawler::counter::CompletionCounter;
use crate::crawler::parser::{Document, ParsedPage};
use crate::crawler::task::CrawlTask;
use crate::extract::extract_fields;
use crate::record::{PartialRecord, Record};
use crate::state::ChainState;
use crate::KinoError;
use scraper::Selector;
use std::sync::LazyLock;

static RATING_PRIMARY: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"div[data-testid="hero-rating-bar__aggregate-rating__score"] span:first-child"#)
        .expect("primary rating selector is valid")
});

static RATING_FALLBACK: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(".sc-bde20123-1.iZLXmJ").expect("fallback rating selector is valid")
});

/// How a chain stage ended
#[derive(Debug)]
pub enum ChainOutcome {
    /// Continue on the rating site with the carried fields
    Chain(CrawlTask),

    /// The chain finished with a record, already counted
    Emit(Record),

    /// The rating site answered with something other than a rating page
    Blocked,

    /// The target was already reached; nothing was done
    Skipped,
}

/// Handles a film article
pub fn handle_detail(
    page: &ParsedPage,
    rating_link: &str,
    counter: &CompletionCounter,
) -> Result<ChainOutcome, KinoError> {
    let mut state = ChainState::Extracting;

    if counter.at_limit() {
        state.transition(ChainState::Done)?;
        return Ok(ChainOutcome::Skipped);
    }

    let partial = extract_fields(page);

    match page.link_containing(rating_link) {
        Some(rating_url) => {
            state.transition(ChainState::Chaining)?;
            tracing::debug!("Chaining '{}' to {}", partial.title, rating_url);
            Ok(ChainOutcome::Chain(CrawlTask::rating(rating_url, partial)))
        }
        None => {
            tracing::debug!("No rating link for '{}'", partial.title);
            finalize(&mut state, partial, None, counter)
        }
    }
}

/// Handles a rating-site page for a film whose fields were carried along
///
/// The raw body must contain `marker`; a response without it is treated as
/// a block page and the chain is dropped without a record.
pub fn handle_rating(
    document: &Document,
    partial: PartialRecord,
    marker: &str,
    counter: &CompletionCounter,
) -> Result<ChainOutcome, KinoError> {
    let mut state = ChainState::Chaining;

    if counter.at_limit() {
        state.transition(ChainState::Done)?;
        return Ok(ChainOutcome::Skipped);
    }

    if !document.contains(marker) {
        tracing::error!(
            "Blocked by rating site at {} (no '{}' marker), dropping '{}'",
            document.url(),
            marker,
            partial.title
        );
        state.transition(ChainState::Done)?;
        return Ok(ChainOutcome::Blocked);
    }

    let rating = read_rating(&document.parse());
    finalize(&mut state, partial, rating, counter)
}

/// Reads the rating from the primary selector, then the fallback
fn read_rating(page: &ParsedPage) -> Option<String> {
    page.first_text(&RATING_PRIMARY)
        .or_else(|| page.first_text(&RATING_FALLBACK))
}

fn finalize(
    state: &mut ChainState,
    partial: PartialRecord,
    rating: Option<String>,
    counter: &CompletionCounter,
) -> Result<ChainOutcome, KinoError> {
    state.transition(ChainState::Finalizing)?;
    let record = partial.finalize(rating);
    let count = counter.increment();
    state.transition(ChainState::Done)?;

    tracing::info!(
        "Record {}/{}: {} ({})",
        count,
        counter.limit(),
        record.title,
        record.rating
    );
    Ok(ChainOutcome::Emit(record))
}
