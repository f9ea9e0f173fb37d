//! Units of crawl work

use crate::record::PartialRecord;
use url::Url;

/// Which handler a fetched page is routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// A paginated category listing
    Category,

    /// A film article on the wiki
    Detail,

    /// A film's page on the rating site
    Rating,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Category => "category",
            Stage::Detail => "detail",
            Stage::Rating => "rating",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A URL to fetch plus the stage that handles it
///
/// Only `Rating` tasks carry data: the fields already extracted from the
/// film's article.
#[derive(Debug, Clone)]
pub struct CrawlTask {
    pub url: Url,
    pub stage: Stage,
    pub carried: Option<PartialRecord>,
}

impl CrawlTask {
    pub fn category(url: Url) -> Self {
        Self {
            url,
            stage: Stage::Category,
            carried: None,
        }
    }

    pub fn detail(url: Url) -> Self {
        Self {
            url,
            stage: Stage::Detail,
            carried: None,
        }
    }

    pub fn rating(url: Url, partial: PartialRecord) -> Self {
        Self {
            url,
            stage: Stage::Rating,
            carried: Some(partial),
        }
    }
}
