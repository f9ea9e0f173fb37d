//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the main crawl loop that coordinates all aspects of
//! the crawling process, including:
//! - Managing the queue of pending tasks
//! - Keeping up to the concurrency cap of tasks in flight
//! - Routing fetched pages to the stage handlers
//! - Stopping new work once the record target is reached
//! - Forwarding records to the sink

use crate::config::Config;
use crate::crawler::chainer::{handle_detail, handle_rating, ChainOutcome};
use crate::crawler::counter::CompletionCounter;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::parser::Document;
use crate::crawler::task::{CrawlTask, Stage};
use crate::crawler::walker::{walk_category, ListingPage};
use crate::output::{CrawlStatistics, ItemSink};
use crate::KinoError;
use chrono::Utc;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::task::JoinSet;
use url::Url;

/// Settings the coordinator and stage handlers need
#[derive(Debug, Clone)]
pub struct CrawlSettings {
    /// Maximum number of tasks in flight
    pub concurrency: usize,

    /// Records after which no new work is started
    pub target_records: usize,

    pub next_page_label: String,
    pub rating_link: String,
    pub rating_marker: String,
}

impl From<&Config> for CrawlSettings {
    fn from(config: &Config) -> Self {
        Self {
            concurrency: config.crawler.concurrent_requests as usize,
            target_records: config.crawler.target_records,
            next_page_label: config.sites.next_page_label.clone(),
            rating_link: config.sites.rating_link.clone(),
            rating_marker: config.sites.rating_marker.clone(),
        }
    }
}

/// What a finished task hands back to the loop
struct TaskReport {
    url: Url,
    stage: Stage,
    result: Result<StageOutput, KinoError>,
}

enum StageOutput {
    Listing(ListingPage),
    Chain(ChainOutcome),

    /// The target was reached before the task was fetched
    Skipped,
}

/// Main crawler coordinator structure
pub struct Coordinator<F, S> {
    fetcher: Arc<F>,
    sink: S,
    settings: Arc<CrawlSettings>,
    counter: Arc<CompletionCounter>,
    stats: CrawlStatistics,
}

impl<F, S> Coordinator<F, S>
where
    F: Fetcher + 'static,
    S: ItemSink,
{
    /// Creates a new coordinator
    pub fn new(fetcher: F, sink: S, settings: CrawlSettings) -> Self {
        let counter = Arc::new(CompletionCounter::new(settings.target_records));
        Self {
            fetcher: Arc::new(fetcher),
            sink,
            settings: Arc::new(settings),
            counter,
            stats: CrawlStatistics::new(),
        }
    }

    /// The shared completion counter
    pub fn counter(&self) -> &CompletionCounter {
        &self.counter
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Runs the main crawl loop from the given category seeds
    ///
    /// This is the core crawling logic that:
    /// 1. Starts pending tasks while below the concurrency cap and the target
    /// 2. Waits for any in-flight task to finish
    /// 3. Queues the follow-up work it produced, or emits its record
    /// 4. Ends once nothing is in flight and no more work may start
    ///
    /// Only sink failures end the run early; a failed task is logged and
    /// dropped.
    pub async fn run(&mut self, seeds: Vec<Url>) -> Result<CrawlStatistics, KinoError> {
        self.stats = CrawlStatistics::new();
        self.stats.started_at = Some(Utc::now());
        tracing::info!(
            "Starting crawl: {} seed(s), target {} records, {} concurrent tasks",
            seeds.len(),
            self.settings.target_records,
            self.settings.concurrency
        );

        let mut pending: VecDeque<CrawlTask> = seeds.into_iter().map(CrawlTask::category).collect();
        let mut in_flight = JoinSet::new();
        let cap = self.settings.concurrency.max(1);

        loop {
            while in_flight.len() < cap && !self.counter.at_limit() {
                let Some(task) = pending.pop_front() else {
                    break;
                };
                self.spawn(&mut in_flight, task);
            }

            let Some(joined) = in_flight.join_next().await else {
                break;
            };

            match joined {
                Ok(report) => self.absorb(report, &mut pending)?,
                Err(e) => {
                    tracing::warn!("Crawl task did not complete: {}", e);
                    self.stats.tasks_failed += 1;
                }
            }
        }

        if !pending.is_empty() {
            tracing::debug!("Dropping {} queued task(s) at target", pending.len());
            self.stats.tasks_skipped += pending.len() as u64;
        }

        self.sink.finish()?;
        self.stats.finished_at = Some(Utc::now());

        tracing::info!(
            "Crawl completed: {} records ({} target), {} pages",
            self.counter.count(),
            self.counter.limit(),
            self.stats.pages_handled()
        );

        Ok(self.stats.clone())
    }

    fn spawn(&self, in_flight: &mut JoinSet<TaskReport>, task: CrawlTask) {
        let fetcher = Arc::clone(&self.fetcher);
        let settings = Arc::clone(&self.settings);
        let counter = Arc::clone(&self.counter);

        in_flight.spawn(async move {
            let url = task.url.clone();
            let stage = task.stage;
            let result = run_task(fetcher.as_ref(), &settings, &counter, task).await;
            TaskReport { url, stage, result }
        });
    }

    /// Folds one finished task into the queue, the sink and the statistics
    fn absorb(
        &mut self,
        report: TaskReport,
        pending: &mut VecDeque<CrawlTask>,
    ) -> Result<(), KinoError> {
        let output = match report.result {
            Ok(output) => output,
            Err(KinoError::Fetch(e)) => {
                tracing::warn!("Giving up on {} ({} task): {}", e.url(), report.stage, e);
                self.stats.tasks_failed += 1;
                return Ok(());
            }
            Err(e) => {
                tracing::warn!("Abandoning {} task {}: {}", report.stage, report.url, e);
                self.stats.tasks_failed += 1;
                return Ok(());
            }
        };

        match output {
            StageOutput::Skipped | StageOutput::Chain(ChainOutcome::Skipped) => {
                self.stats.tasks_skipped += 1;
            }
            StageOutput::Listing(listing) => {
                self.stats.category_pages += 1;
                for url in listing.item_links {
                    self.enqueue(pending, CrawlTask::detail(url), false);
                }
                if let Some(next) = listing.next_page {
                    self.enqueue(pending, CrawlTask::category(next), false);
                }
            }
            StageOutput::Chain(ChainOutcome::Chain(task)) => {
                self.count_page(report.stage);
                // Finish started chains before opening new ones.
                self.enqueue(pending, task, true);
            }
            StageOutput::Chain(ChainOutcome::Emit(record)) => {
                self.count_page(report.stage);
                self.sink.emit(&record)?;
                self.stats.records_emitted += 1;
            }
            StageOutput::Chain(ChainOutcome::Blocked) => {
                self.count_page(report.stage);
                self.stats.chains_abandoned += 1;
            }
        }

        Ok(())
    }

    fn enqueue(&mut self, pending: &mut VecDeque<CrawlTask>, task: CrawlTask, front: bool) {
        if self.counter.at_limit() {
            tracing::trace!("Target reached, not queueing {}", task.url);
            self.stats.tasks_skipped += 1;
        } else if front {
            pending.push_front(task);
        } else {
            pending.push_back(task);
        }
    }

    fn count_page(&mut self, stage: Stage) {
        match stage {
            Stage::Category => self.stats.category_pages += 1,
            Stage::Detail => self.stats.detail_pages += 1,
            Stage::Rating => self.stats.rating_pages += 1,
        }
    }
}

/// Fetches one task and runs its stage handler
async fn run_task<F: Fetcher + ?Sized>(
    fetcher: &F,
    settings: &CrawlSettings,
    counter: &CompletionCounter,
    task: CrawlTask,
) -> Result<StageOutput, KinoError> {
    if counter.at_limit() {
        return Ok(StageOutput::Skipped);
    }

    let document = fetcher.fetch(&task).await?;
    tracing::debug!("Fetched {} page {}", task.stage, document.url());
    handle_stage(&document, task, settings, counter)
}

/// Routes a fetched page to its handler
///
/// Kept synchronous: a parsed DOM must not live across an await.
fn handle_stage(
    document: &Document,
    task: CrawlTask,
    settings: &CrawlSettings,
    counter: &CompletionCounter,
) -> Result<StageOutput, KinoError> {
    match task.stage {
        Stage::Category => {
            let listing = walk_category(&document.parse(), &settings.next_page_label, counter);
            Ok(StageOutput::Listing(listing))
        }
        Stage::Detail => {
            handle_detail(&document.parse(), &settings.rating_link, counter).map(StageOutput::Chain)
        }
        Stage::Rating => {
            let partial = task.carried.ok_or_else(|| KinoError::MissingCarried {
                url: task.url.to_string(),
                stage: task.stage,
            })?;
            handle_rating(document, partial, &settings.rating_marker, counter)
                .map(StageOutput::Chain)
        }
    }
}
