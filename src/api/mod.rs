//! Content API abstraction layer.
//!
//! This module defines the [`ContentApi`] trait, the JSON records it returns
//! ([`models`]), and the reqwest-backed implementation ([`HttpApi`]).
//!
//! ## For contributors — adding an endpoint
//!
//! 1. Add the record type to `models.rs` (derive `Deserialize`, default every
//!    optional field).
//! 2. Add a method to [`ContentApi`] returning [`ApiFuture`].
//! 3. Implement it in `http.rs` with the `get`/`send_json`/`delete` helpers so
//!    that errors are wrapped the same way as every other call.
//! 4. Add a canned response to the test doubles in `home::aggregator` if the
//!    homepage consumes it.

mod http;
pub mod models;
#[cfg(test)]
pub mod testing;

pub use http::HttpApi;
pub use models::{
    Announcement, Bulletin, BulletinPage, CarouselSlide, Devotional, FinanceEnvelope,
    FinanceSummary, HistoryEntry, Program,
};

use futures::future::BoxFuture;

use crate::error::ApiError;

/// The future type every [`ContentApi`] method returns.
///
/// Boxed so that the trait stays object-safe and can be shared as
/// `Arc<dyn ContentApi>` between spawned tasks.
pub type ApiFuture<'a, T> = BoxFuture<'a, Result<T, ApiError>>;

/// Everything the portal reads from or writes to the remote content API.
///
/// Implementations must be [`Send`] + [`Sync`]: the homepage aggregator
/// fans every read out onto its own tokio task.
pub trait ContentApi: Send + Sync {
    // -- homepage feeds -------------------------------------------------------

    fn programs(&self) -> ApiFuture<'_, Vec<Program>>;

    fn bulletins(&self) -> ApiFuture<'_, BulletinPage>;

    fn announcements(&self) -> ApiFuture<'_, Vec<Announcement>>;

    fn devotionals(&self) -> ApiFuture<'_, Vec<Devotional>>;

    fn carousel_slides(&self) -> ApiFuture<'_, Vec<CarouselSlide>>;

    fn finance_summary(&self) -> ApiFuture<'_, FinanceEnvelope>;

    fn history_entries(&self) -> ApiFuture<'_, Vec<HistoryEntry>>;

    // -- single records -------------------------------------------------------

    fn devotional(&self, id: i64) -> ApiFuture<'_, Devotional>;

    fn carousel_slide(&self, id: i64) -> ApiFuture<'_, CarouselSlide>;

    fn history_entry(&self, id: i64) -> ApiFuture<'_, HistoryEntry>;

    // -- admin writes ---------------------------------------------------------

    fn create_carousel_slide<'a>(&'a self, slide: &'a CarouselSlide)
        -> ApiFuture<'a, CarouselSlide>;

    fn update_carousel_slide<'a>(
        &'a self,
        id: i64,
        slide: &'a CarouselSlide,
    ) -> ApiFuture<'a, CarouselSlide>;

    fn delete_carousel_slide(&self, id: i64) -> ApiFuture<'_, ()>;

    fn create_devotional<'a>(&'a self, devotional: &'a Devotional) -> ApiFuture<'a, Devotional>;

    fn update_devotional<'a>(
        &'a self,
        id: i64,
        devotional: &'a Devotional,
    ) -> ApiFuture<'a, Devotional>;

    fn delete_devotional(&self, id: i64) -> ApiFuture<'_, ()>;

    fn create_history_entry<'a>(&'a self, entry: &'a HistoryEntry)
        -> ApiFuture<'a, HistoryEntry>;

    fn update_history_entry<'a>(
        &'a self,
        id: i64,
        entry: &'a HistoryEntry,
    ) -> ApiFuture<'a, HistoryEntry>;

    fn delete_history_entry(&self, id: i64) -> ApiFuture<'_, ()>;
}

