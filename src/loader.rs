//! Background loading.
//!
//! Network work runs on tokio tasks and reports back to the UI loop over an
//! unbounded [`mpsc`] channel, which the main loop drains every tick.  The
//! carousel timer feeds the same channel, so the UI has a single inbox.
//!
//! Loads are fire-and-forget: nothing cancels an in-flight request.  Each
//! homepage load carries a generation number instead, and the app ignores
//! results from loads it has since superseded.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::api::{ContentApi, Devotional};
use crate::home::{HomeAggregator, HomePage};

/// Messages delivered to the UI loop.
#[derive(Debug, Clone)]
pub enum PortalMsg {
    /// A homepage load finished (always succeeds, possibly with fallbacks).
    Home { generation: u64, page: Box<HomePage> },
    /// A devotional detail fetch finished.
    Devotional {
        id: i64,
        result: Result<Devotional, String>,
    },
    /// Time to rotate the hero carousel, from the timer armed as `epoch`.
    CarouselTick { epoch: u64 },
}

pub type Inbox = mpsc::UnboundedReceiver<PortalMsg>;
pub type Outbox = mpsc::UnboundedSender<PortalMsg>;

pub fn channel() -> (Outbox, Inbox) {
    mpsc::unbounded_channel()
}

/// Load the homepage in the background.
pub fn spawn_home_load(aggregator: HomeAggregator, generation: u64, tx: Outbox) {
    tokio::spawn(async move {
        let page = aggregator.load().await;
        info!(
            generation,
            slides = page.aggregate.carousel_slides.len(),
            history = page.history.entries.len(),
            "homepage loaded"
        );
        // If the receiver is gone the UI has exited; nothing to do.
        if tx
            .send(PortalMsg::Home {
                generation,
                page: Box::new(page),
            })
            .is_err()
        {
            debug!(generation, "homepage load finished after UI exit");
        }
    });
}

/// Fetch one devotional for the detail page.
pub fn spawn_devotional_load(api: Arc<dyn ContentApi>, id: i64, tx: Outbox) {
    tokio::spawn(async move {
        let result = api.devotional(id).await.map_err(|e| e.to_string());
        let _ = tx.send(PortalMsg::Devotional { id, result });
    });
}
