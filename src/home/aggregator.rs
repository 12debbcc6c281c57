//! Homepage data aggregation.
//!
//! The homepage shows six independent feeds plus the church history
//! timeline.  Each feed is described once, as data, in a [`Slot`]: how to
//! fetch it, what to show when that fails, and how to trim a successful
//! response down to what the page displays.  [`HomeAggregator::load`] fans
//! every slot out onto its own task, waits for all of them to settle, and
//! hands back one immutable [`HomePage`].
//!
//! No slot failure is ever fatal.  A failed fetch is logged and replaced by
//! the slot's fallback, so an empty card and a failed card look the same to
//! the renderer.

use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use tracing::{debug, error, warn};

use crate::api::{
    Announcement, ApiFuture, Bulletin, BulletinPage, CarouselSlide, ContentApi, Devotional,
    FinanceEnvelope, FinanceSummary, HistoryEntry, Program,
};

pub const MAX_PROGRAMS: usize = 6;
pub const MAX_BULLETINS: usize = 3;
pub const MAX_ANNOUNCEMENTS: usize = 5;

/// One named homepage data source.
///
/// `R` is the raw API response, `T` the display-ready value.  All three
/// behaviours are plain function pointers so a slot table can live in a
/// `static`.
pub struct Slot<R, T> {
    pub name: &'static str,
    pub fetch: for<'a> fn(&'a dyn ContentApi) -> ApiFuture<'a, R>,
    pub fallback: fn() -> T,
    pub transform: fn(R) -> T,
}

// ---------------------------------------------------------------------------
// Slot table
// ---------------------------------------------------------------------------

pub static PROGRAMS: Slot<Vec<Program>, Vec<Program>> = Slot {
    name: "programs",
    fetch: |api| api.programs(),
    fallback: Vec::new,
    transform: |list| first_n(list, MAX_PROGRAMS),
};

pub static BULLETINS: Slot<BulletinPage, Vec<Bulletin>> = Slot {
    name: "bulletins",
    fetch: |api| api.bulletins(),
    fallback: Vec::new,
    transform: |page| first_n(page.data, MAX_BULLETINS),
};

pub static ANNOUNCEMENTS: Slot<Vec<Announcement>, Vec<Announcement>> = Slot {
    name: "announcements",
    fetch: |api| api.announcements(),
    fallback: Vec::new,
    transform: |list| first_n(list, MAX_ANNOUNCEMENTS),
};

pub static DEVOTIONAL: Slot<Vec<Devotional>, Option<Devotional>> = Slot {
    name: "devotional",
    fetch: |api| api.devotionals(),
    fallback: || None,
    transform: |list| list.into_iter().next(),
};

pub static CAROUSEL_SLIDES: Slot<Vec<CarouselSlide>, Vec<CarouselSlide>> = Slot {
    name: "carousel_slides",
    fetch: |api| api.carousel_slides(),
    fallback: Vec::new,
    transform: |slides| slides,
};

pub static FINANCE_SUMMARY: Slot<FinanceEnvelope, Option<FinanceSummary>> = Slot {
    name: "finance_summary",
    fetch: |api| api.finance_summary(),
    fallback: || None,
    transform: FinanceEnvelope::into_summary,
};

/// History is loaded beside the main batch, never inside it.
pub static HISTORY: Slot<Vec<HistoryEntry>, Vec<HistoryEntry>> = Slot {
    name: "history",
    fetch: |api| api.history_entries(),
    fallback: Vec::new,
    transform: |entries| entries,
};

fn first_n<T>(mut list: Vec<T>, n: usize) -> Vec<T> {
    list.truncate(n);
    list
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// The six main-batch slots, each either transformed data or its fallback.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregateResult {
    pub programs: Vec<Program>,
    pub bulletins: Vec<Bulletin>,
    pub announcements: Vec<Announcement>,
    pub devotional: Option<Devotional>,
    pub carousel_slides: Vec<CarouselSlide>,
    pub finance_summary: Option<FinanceSummary>,
}

/// The history timeline, loaded and degraded independently.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryResult {
    pub entries: Vec<HistoryEntry>,
}

/// Everything the homepage renders; delivered once both halves are done.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HomePage {
    pub aggregate: AggregateResult,
    pub history: HistoryResult,
}

// ---------------------------------------------------------------------------
// Aggregator
// ---------------------------------------------------------------------------

/// Produces the six main-batch slots.
type BatchFn = fn(Arc<dyn ContentApi>) -> BoxFuture<'static, AggregateResult>;

/// Loads the homepage from a [`ContentApi`].
#[derive(Clone)]
pub struct HomeAggregator {
    api: Arc<dyn ContentApi>,
    batch: BatchFn,
}

impl HomeAggregator {
    pub fn new(api: Arc<dyn ContentApi>) -> Self {
        Self {
            api,
            batch: |api| run_batch(api).boxed(),
        }
    }

    #[cfg(test)]
    fn with_batch(api: Arc<dyn ContentApi>, batch: BatchFn) -> Self {
        Self { api, batch }
    }

    /// Load the whole homepage.
    ///
    /// Runs the main batch and the history fetch concurrently and returns
    /// only when both have completed.  Never fails: every problem degrades to
    /// fallback data.
    pub async fn load(&self) -> HomePage {
        let (aggregate, history) = tokio::join!(self.load_batch(), self.load_history());
        HomePage { aggregate, history }
    }

    /// The six main-batch slots, all in flight at once.
    ///
    /// The batch itself runs on its own task so that a bug in the
    /// orchestration (rather than in a fetch) still leaves the page
    /// renderable.
    pub async fn load_batch(&self) -> AggregateResult {
        let api = Arc::clone(&self.api);
        match tokio::spawn((self.batch)(api)).await {
            Ok(result) => result,
            Err(join_err) => {
                error!(error = %join_err, "critical: homepage aggregation failed, rendering fallbacks");
                AggregateResult::default()
            }
        }
    }

    pub async fn load_history(&self) -> HistoryResult {
        HistoryResult {
            entries: settle(&HISTORY, Arc::clone(&self.api)).await,
        }
    }
}

async fn run_batch(api: Arc<dyn ContentApi>) -> AggregateResult {
    let (programs, bulletins, announcements, devotional, carousel_slides, finance_summary) = tokio::join!(
        settle(&PROGRAMS, Arc::clone(&api)),
        settle(&BULLETINS, Arc::clone(&api)),
        settle(&ANNOUNCEMENTS, Arc::clone(&api)),
        settle(&DEVOTIONAL, Arc::clone(&api)),
        settle(&CAROUSEL_SLIDES, Arc::clone(&api)),
        settle(&FINANCE_SUMMARY, api),
    );

    AggregateResult {
        programs,
        bulletins,
        announcements,
        devotional,
        carousel_slides,
        finance_summary,
    }
}

/// Run one slot to completion and resolve it to a display value.
///
/// The fetch runs on its own task.  A fetch error is caught inside that
/// task; a panic surfaces as a `JoinError` here.  Both resolve to the slot's
/// fallback.
pub async fn settle<R, T>(slot: &'static Slot<R, T>, api: Arc<dyn ContentApi>) -> T
where
    R: Send + 'static,
    T: Send + 'static,
{
    let task = tokio::spawn(async move {
        match (slot.fetch)(&*api).await {
            Ok(raw) => Some((slot.transform)(raw)),
            Err(err) => {
                warn!(
                    slot = slot.name,
                    endpoint = err.endpoint().unwrap_or("-"),
                    error = %err,
                    "homepage slot failed, using fallback"
                );
                None
            }
        }
    });

    match task.await {
        Ok(Some(value)) => {
            debug!(slot = slot.name, "homepage slot loaded");
            value
        }
        Ok(None) => (slot.fallback)(),
        Err(join_err) => {
            warn!(slot = slot.name, error = %join_err, "homepage slot task died, using fallback");
            (slot.fallback)()
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
