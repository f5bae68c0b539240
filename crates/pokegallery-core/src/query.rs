//! Query controller: turns search text and page number into fetches and
//! reconciles their results into view state.
//!
//! The flow for every input change is
//!
//! 1. an input commits (debounced search text, page change, refresh);
//! 2. the controller snapshots `(search_text, page)` into a [`Ticket`] with
//!    a [`FetchPlan`] from [`plan`] and marks the state as loading;
//! 3. an [`Executor`] runs the plan (possibly on another task) and produces
//!    a [`BatchOutcome`];
//! 4. [`QueryController::apply`] merges the outcome, unless the ticket's
//!    snapshot no longer matches the latest committed inputs, in which case
//!    the outcome is dropped as stale.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;
use tokio::time::Instant;

use crate::Config;
use crate::debounce::Debouncer;
use crate::join::join_all_or_nothing;
use crate::model::{DetailRecord, RecordRef};
use crate::name_index::NameIndex;
use crate::source::{DetailKey, RecordSource, SourceError};

pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const DEFAULT_SEARCH_CAP: usize = 20;
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// How non-empty search text is resolved. Fixed per controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchStrategy {
    /// Exact-name lookup; a 404 means not found.
    #[serde(alias = "direct-lookup")]
    Direct,
    /// Substring filter over the full name index; zero matches means not found.
    #[default]
    #[serde(alias = "substring-filter")]
    Substring,
}

impl FromStr for SearchStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "direct" | "direct-lookup" => Ok(SearchStrategy::Direct),
            "substring" | "substring-filter" => Ok(SearchStrategy::Substring),
            other => Err(format!(
                "unknown search strategy {other:?} (expected \"direct\" or \"substring\")"
            )),
        }
    }
}

impl fmt::Display for SearchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchStrategy::Direct => write!(f, "direct"),
            SearchStrategy::Substring => write!(f, "substring"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Browse,
    Search,
}

/// Snapshot of the committed inputs a batch was issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryInputs {
    pub search_text: String,
    pub page: usize,
}

impl QueryInputs {
    pub fn mode(&self) -> Mode {
        if self.search_text.is_empty() {
            Mode::Browse
        } else {
            Mode::Search
        }
    }
}

/// Remote calls needed to satisfy a set of inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchPlan {
    /// List one page, then fetch every detail on it.
    Page { limit: usize, offset: usize },
    /// Fetch one detail by exact name.
    Lookup { name: String },
    /// Filter the name index, then fetch details of the first `cap` matches.
    Filter { query: String, cap: usize },
}

/// Decide which calls `inputs` need. Pure.
pub fn plan(
    inputs: &QueryInputs,
    strategy: SearchStrategy,
    page_size: usize,
    search_cap: usize,
) -> FetchPlan {
    match inputs.mode() {
        Mode::Browse => FetchPlan::Page {
            limit: page_size,
            offset: inputs.page.saturating_sub(1).saturating_mul(page_size),
        },
        Mode::Search => match strategy {
            SearchStrategy::Direct => FetchPlan::Lookup {
                name: inputs.search_text.to_lowercase(),
            },
            SearchStrategy::Substring => FetchPlan::Filter {
                query: inputs.search_text.clone(),
                cap: search_cap,
            },
        },
    }
}

/// An issued batch: the inputs it answers and the plan to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub inputs: QueryInputs,
    pub plan: FetchPlan,
}

/// Which stage of a batch failed; picks the user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureContext {
    Index,
    List,
    Details,
}

impl FailureContext {
    pub fn message(&self) -> &'static str {
        match self {
            FailureContext::Index => "Failed to load Pokémon data",
            FailureContext::List => "Failed to load Pokémon list",
            FailureContext::Details => "Failed to fetch Pokémon details",
        }
    }
}

/// Result of running a [`Ticket`].
#[derive(Debug, Clone, PartialEq)]
pub enum BatchOutcome {
    /// Browse page with the catalog total.
    Page {
        total: usize,
        records: Vec<DetailRecord>,
    },
    /// Search hits.
    Found { records: Vec<DetailRecord> },
    /// Search resolved to nothing (404 or zero matches).
    NoMatch,
    Failed {
        context: FailureContext,
        error: SourceError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    NotFound,
    Failed,
    /// Outcome answered superseded inputs and was discarded.
    Stale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Transient message for the renderer to show once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryState {
    pub search_text: String,
    pub current_page: usize,
    pub page_size: usize,
    pub total: usize,
    /// May be stale while `loading` is set.
    pub displayed_records: Vec<DetailRecord>,
    /// When set, `displayed_records` is empty.
    pub not_found: bool,
    pub loading: bool,
    pub notice: Option<Notice>,
}

impl QueryState {
    fn new(page_size: usize) -> Self {
        Self {
            search_text: String::new(),
            current_page: 1,
            page_size,
            total: 0,
            displayed_records: Vec::new(),
            not_found: false,
            loading: false,
            notice: None,
        }
    }
}

/// What a renderer needs to draw the listing.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewSnapshot<'a> {
    pub mode: Mode,
    pub search_text: &'a str,
    pub loading: bool,
    pub not_found: bool,
    pub records: &'a [DetailRecord],
    pub total: usize,
    pub current_page: usize,
    pub page_size: usize,
    pub page_count: usize,
    pub pagination_visible: bool,
}

/// Runs fetch plans. Cheap to clone; clones share the name index.
#[derive(Clone)]
pub struct Executor {
    source: Arc<dyn RecordSource>,
    index: Arc<OnceCell<NameIndex>>,
    bulk_limit: usize,
}

impl Executor {
    pub fn new(source: Arc<dyn RecordSource>, bulk_limit: usize) -> Self {
        Self {
            source,
            index: Arc::new(OnceCell::new()),
            bulk_limit,
        }
    }

    pub fn source(&self) -> &Arc<dyn RecordSource> {
        &self.source
    }

    /// Whether the name index has been fetched.
    pub fn index_loaded(&self) -> bool {
        self.index.initialized()
    }

    pub async fn run(&self, ticket: &Ticket) -> BatchOutcome {
        match &ticket.plan {
            FetchPlan::Page { limit, offset } => {
                tracing::debug!(page = ticket.inputs.page, limit, offset, "browse batch");
                let page = match self.source.list_page(*limit, *offset).await {
                    Ok(page) => page,
                    Err(error) => {
                        return BatchOutcome::Failed {
                            context: FailureContext::List,
                            error,
                        };
                    }
                };
                match self.fetch_details(page.results).await {
                    Ok(records) => BatchOutcome::Page {
                        total: page.count,
                        records,
                    },
                    Err(error) => BatchOutcome::Failed {
                        context: FailureContext::List,
                        error,
                    },
                }
            }
            FetchPlan::Lookup { name } => {
                tracing::debug!(query = %name, "lookup batch");
                let key = DetailKey::Name(name.clone());
                match self.source.fetch_detail(&key).await {
                    Ok(record) => BatchOutcome::Found {
                        records: vec![record],
                    },
                    Err(e) if e.is_not_found() => BatchOutcome::NoMatch,
                    Err(error) => BatchOutcome::Failed {
                        context: FailureContext::Details,
                        error,
                    },
                }
            }
            FetchPlan::Filter { query, cap } => {
                let index = match self
                    .index
                    .get_or_try_init(|| NameIndex::load(self.source.as_ref(), self.bulk_limit))
                    .await
                {
                    Ok(index) => index,
                    Err(error) => {
                        return BatchOutcome::Failed {
                            context: FailureContext::Index,
                            error,
                        };
                    }
                };
                let matches = index.filter(query, *cap);
                tracing::debug!(query = %query, matches = matches.len(), "filter batch");
                if matches.is_empty() {
                    return BatchOutcome::NoMatch;
                }
                match self.fetch_details(matches).await {
                    Ok(records) => BatchOutcome::Found { records },
                    Err(error) => BatchOutcome::Failed {
                        context: FailureContext::Details,
                        error,
                    },
                }
            }
        }
    }

    /// Fetch all details in parallel; all or nothing.
    pub async fn fetch_details(
        &self,
        refs: Vec<RecordRef>,
    ) -> Result<Vec<DetailRecord>, SourceError> {
        let tasks = refs.into_iter().map(|r| {
            let source = Arc::clone(&self.source);
            async move {
                let key = DetailKey::Url(r.url);
                source.fetch_detail(&key).await
            }
        });
        join_all_or_nothing(tasks).await
    }
}

pub struct QueryController {
    executor: Executor,
    strategy: SearchStrategy,
    search_cap: usize,
    state: QueryState,
    debouncer: Debouncer<String>,
}

impl QueryController {
    pub fn new(source: Arc<dyn RecordSource>, config: &Config) -> Self {
        Self {
            executor: Executor::new(source, config.bulk_limit),
            strategy: config.search_strategy,
            search_cap: config.search_cap.max(1),
            state: QueryState::new(config.page_size.max(1)),
            debouncer: Debouncer::new(config.debounce()),
        }
    }

    pub fn strategy(&self) -> SearchStrategy {
        self.strategy
    }

    pub fn state(&self) -> &QueryState {
        &self.state
    }

    pub fn executor(&self) -> Executor {
        self.executor.clone()
    }

    pub fn inputs(&self) -> QueryInputs {
        QueryInputs {
            search_text: self.state.search_text.clone(),
            page: self.state.current_page,
        }
    }

    pub fn mode(&self) -> Mode {
        self.inputs().mode()
    }

    pub fn page_count(&self) -> usize {
        self.state.total.div_ceil(self.state.page_size).max(1)
    }

    /// Feed raw search box text. Commits after the debounce delay.
    pub fn on_search_text_change(&mut self, raw: &str) {
        self.debouncer.schedule(raw.to_string());
    }

    /// When the pending search text will commit, if any.
    pub fn debounce_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    pub fn cancel_pending_search(&mut self) {
        self.debouncer.cancel_pending();
    }

    /// Commit debounced search text if its delay has elapsed.
    pub fn poll_debounce(&mut self, now: Instant) -> Option<Ticket> {
        let raw = self.debouncer.take_due(now)?;
        self.commit_search_text(&raw)
    }

    /// Commit search text immediately. Returns `None` if nothing changed.
    pub fn commit_search_text(&mut self, raw: &str) -> Option<Ticket> {
        let text = raw.trim();
        if text == self.state.search_text {
            return None;
        }
        let was_searching = !self.state.search_text.is_empty();
        self.state.search_text = text.to_string();
        if text.is_empty() && was_searching {
            self.state.current_page = 1;
        }
        Some(self.begin())
    }

    /// Move to `page`. Ignored while searching or if the page is unchanged.
    pub fn on_page_change(&mut self, page: usize) -> Option<Ticket> {
        if self.mode() == Mode::Search {
            tracing::trace!(page, "page change ignored while searching");
            return None;
        }
        // Keeps the listing offset representable before a total is known.
        let mut page = page.clamp(1, usize::MAX / self.state.page_size);
        if self.state.total > 0 {
            page = page.min(self.page_count());
        }
        if page == self.state.current_page {
            return None;
        }
        self.state.current_page = page;
        Some(self.begin())
    }

    /// Re-issue a batch for the current inputs (initial load, manual reload).
    pub fn refresh(&mut self) -> Ticket {
        self.begin()
    }

    fn begin(&mut self) -> Ticket {
        let inputs = self.inputs();
        let plan = plan(&inputs, self.strategy, self.state.page_size, self.search_cap);
        self.state.loading = true;
        tracing::debug!(search = %inputs.search_text, page = inputs.page, ?plan, "issuing batch");
        Ticket { inputs, plan }
    }

    /// Merge a finished batch into state, unless it is stale.
    pub fn apply(&mut self, ticket: &Ticket, outcome: BatchOutcome) -> ApplyOutcome {
        if ticket.inputs != self.inputs() {
            tracing::trace!(
                search = %ticket.inputs.search_text,
                page = ticket.inputs.page,
                "discarding stale batch"
            );
            return ApplyOutcome::Stale;
        }

        self.state.loading = false;
        match outcome {
            BatchOutcome::Page { total, records } => {
                self.state.total = total;
                self.state.displayed_records = records;
                self.state.not_found = false;
                ApplyOutcome::Applied
            }
            BatchOutcome::Found { records } => {
                self.state.displayed_records = records;
                self.state.not_found = false;
                ApplyOutcome::Applied
            }
            BatchOutcome::NoMatch => {
                self.state.displayed_records.clear();
                self.state.not_found = true;
                if let FetchPlan::Lookup { name } = &ticket.plan {
                    tracing::info!(query = %name, "no record with that name");
                    self.state.notice = Some(Notice {
                        level: NoticeLevel::Info,
                        message: format!("No Pokémon named \"{}\"", name),
                    });
                }
                ApplyOutcome::NotFound
            }
            BatchOutcome::Failed { context, error } => {
                tracing::warn!(error = %error, "{}", context.message());
                self.state.notice = Some(Notice {
                    level: NoticeLevel::Error,
                    message: context.message().to_string(),
                });
                ApplyOutcome::Failed
            }
        }
    }

    /// Run `ticket` to completion on this task and apply it.
    pub async fn run(&mut self, ticket: Ticket) -> ApplyOutcome {
        let executor = self.executor.clone();
        let outcome = executor.run(&ticket).await;
        self.apply(&ticket, outcome)
    }

    /// Issue and run a batch for the current inputs.
    pub async fn reconcile(&mut self) -> ApplyOutcome {
        let ticket = self.refresh();
        self.run(ticket).await
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.state.notice.take()
    }

    pub fn view(&self) -> ViewSnapshot<'_> {
        let mode = self.mode();
        ViewSnapshot {
            mode,
            search_text: &self.state.search_text,
            loading: self.state.loading,
            not_found: self.state.not_found,
            records: &self.state.displayed_records,
            total: self.state.total,
            current_page: self.state.current_page,
            page_size: self.state.page_size,
            page_count: self.page_count(),
            pagination_visible: mode == Mode::Browse
                && !self.state.loading
                && !self.state.not_found,
        }
    }
}
