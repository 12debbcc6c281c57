//! Hero carousel rotation.
//!
//! [`Carousel`] is the pure index arithmetic; [`RotationTimer`] is the
//! background interval that asks for the next slide; [`HeroCarousel`] ties
//! the two together and re-arms the timer whenever the slide count or the
//! current index changes, so there is only ever one live timer.
//!
//! Every re-arm gets a new epoch and each tick carries the epoch of the timer
//! that sent it.  A tick already queued when the user moved the carousel by
//! hand belongs to a dead timer and is dropped.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::debug;

/// Which way the last move went.  Only affects presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

/// Current slide index over `len` slides, always wrapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Carousel {
    index: usize,
    len: usize,
    direction: Direction,
}

impl Carousel {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Change the slide count; an index that no longer exists resets to 0.
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        if self.index >= len {
            self.index = 0;
        }
    }

    pub fn next(&mut self) {
        if self.len == 0 {
            return;
        }
        self.direction = Direction::Forward;
        self.index = (self.index + 1) % self.len;
    }

    pub fn previous(&mut self) {
        if self.len == 0 {
            return;
        }
        self.direction = Direction::Backward;
        self.index = (self.index + self.len - 1) % self.len;
    }

    /// Jump to `index`, clamped to the last slide.
    pub fn go_to(&mut self, index: usize) {
        if self.len == 0 {
            return;
        }
        let target = index.min(self.len - 1);
        self.direction = if target < self.index {
            Direction::Backward
        } else {
            Direction::Forward
        };
        self.index = target;
    }
}

#[cfg(test)]
impl Carousel {
    pub fn new(len: usize) -> Self {
        Self {
            len,
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

// ---------------------------------------------------------------------------
// Timer
// ---------------------------------------------------------------------------

/// Sends `make(epoch)` on `tx` every `period` until stopped or dropped.
///
/// The first message arrives one full period after (re)start.  The task
/// also ends on its own once the receiving side is gone.
pub struct RotationTimer<M> {
    period: Duration,
    tx: mpsc::UnboundedSender<M>,
    make: fn(u64) -> M,
    handle: Option<JoinHandle<()>>,
}

impl<M: Send + 'static> RotationTimer<M> {
    /// Create a stopped timer.  Call [`restart`](Self::restart) from inside a
    /// tokio runtime to begin ticking.
    pub fn new(period: Duration, tx: mpsc::UnboundedSender<M>, make: fn(u64) -> M) -> Self {
        Self {
            period,
            tx,
            make,
            handle: None,
        }
    }

    /// Tear down any running interval and start a fresh one whose ticks are
    /// tagged with `epoch`.
    pub fn restart(&mut self, epoch: u64) {
        self.stop();

        let period = self.period;
        let tx = self.tx.clone();
        let make = self.make;
        self.handle = Some(tokio::spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if tx.send(make(epoch)).is_err() {
                    break;
                }
            }
        }));
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl<M> Drop for RotationTimer<M> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
impl<M> RotationTimer<M> {
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

// ---------------------------------------------------------------------------
// Carousel + timer
// ---------------------------------------------------------------------------

/// The homepage hero: rotation state plus an optional auto-advance timer.
pub struct HeroCarousel<M> {
    state: Carousel,
    timer: Option<RotationTimer<M>>,
    /// Bumped on every re-arm and suspend; only ticks tagged with the
    /// current value advance the carousel.
    epoch: u64,
}

impl<M: Send + 'static> HeroCarousel<M> {
    pub fn with_timer(timer: RotationTimer<M>) -> Self {
        Self {
            state: Carousel::default(),
            timer: Some(timer),
            epoch: 0,
        }
    }

    pub fn state(&self) -> &Carousel {
        &self.state
    }

    /// New slides arrived.
    pub fn set_slide_count(&mut self, len: usize) {
        self.state.set_len(len);
        self.rearm();
    }

    /// Handle one timer tick sent under `epoch`.
    pub fn tick(&mut self, epoch: u64) {
        if epoch != self.epoch {
            debug!(epoch, current = self.epoch, "stale carousel tick dropped");
            return;
        }
        self.state.next();
        self.rearm();
    }

    pub fn next(&mut self) {
        self.state.next();
        self.rearm();
    }

    pub fn previous(&mut self) {
        self.state.previous();
        self.rearm();
    }

    pub fn go_to(&mut self, index: usize) {
        self.state.go_to(index);
        self.rearm();
    }

    /// Stop ticking while the carousel is off screen; keeps the timer.
    pub fn suspend(&mut self) {
        self.epoch += 1;
        if let Some(timer) = self.timer.as_mut() {
            timer.stop();
        }
    }

    /// Back on screen: start a fresh period.
    pub fn resume(&mut self) {
        self.rearm();
    }

    /// Stop auto-advancing for good (e.g. on screen teardown).
    pub fn teardown(&mut self) {
        self.epoch += 1;
        self.timer = None;
    }

    fn rearm(&mut self) {
        self.epoch += 1;
        if let Some(timer) = self.timer.as_mut() {
            timer.restart(self.epoch);
        }
    }
}

#[cfg(test)]
impl<M: Send + 'static> HeroCarousel<M> {
    /// No timer: nothing ticks unless a test sends [`epoch`](Self::epoch).
    pub fn detached() -> Self {
        Self {
            state: Carousel::default(),
            timer: None,
            epoch: 0,
        }
    }

    pub fn index(&self) -> usize {
        self.state.index()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn is_ticking(&self) -> bool {
        self.timer.as_ref().is_some_and(RotationTimer::is_running)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PERIOD: Duration = Duration::from_secs(7);

    // -- Carousel ------------------------------------------------------------

    #[test]
    fn next_wraps_instead_of_overrunning() {
        let mut c = Carousel::new(3);
        c.go_to(2);
        c.next();
        assert_eq!(c.index(), 0);
    }

    #[test]
    fn previous_wraps_to_last() {
        let mut c = Carousel::new(3);
        c.previous();
        assert_eq!(c.index(), 2);
        assert_eq!(c.direction(), Direction::Backward);
    }

    #[test]
    fn empty_carousel_never_moves() {
        let mut c = Carousel::new(0);
        c.next();
        c.previous();
        c.go_to(4);
        assert_eq!(c.index(), 0);
    }

    #[test]
    fn go_to_clamps_and_sets_direction() {
        let mut c = Carousel::new(4);
        c.go_to(10);
        assert_eq!(c.index(), 3);
        assert_eq!(c.direction(), Direction::Forward);
        c.go_to(1);
        assert_eq!(c.direction(), Direction::Backward);
    }

    #[test]
    fn shrinking_below_index_resets_to_start() {
        let mut c = Carousel::new(5);
        c.go_to(4);
        c.set_len(2);
        assert_eq!(c.index(), 0);

        c.go_to(1);
        c.set_len(3);
        assert_eq!(c.index(), 1, "index still valid, kept");
    }

    // -- RotationTimer ---------------------------------------------------------

    #[tokio::test(start_paused = true)]
    async fn timer_ticks_once_per_period() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut timer = RotationTimer::new(PERIOD, tx, |epoch| epoch);
        timer.restart(1);

        time::sleep(PERIOD - Duration::from_millis(1)).await;
        assert!(rx.try_recv().is_err(), "no tick before the period");

        time::sleep(Duration::from_millis(2)).await;
        assert_eq!(rx.try_recv(), Ok(1));

        time::sleep(PERIOD).await;
        assert_eq!(rx.try_recv(), Ok(1));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn restart_replaces_the_previous_timer() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut timer = RotationTimer::new(PERIOD, tx, |epoch| epoch);
        timer.restart(1);
        time::sleep(Duration::from_secs(3)).await;
        timer.restart(2);

        // The first timer would have fired at 7s; only the second, at 10s, may.
        time::sleep(Duration::from_secs(5)).await;
        assert!(rx.try_recv().is_err());

        time::sleep(Duration::from_secs(3)).await;
        assert_eq!(rx.try_recv(), Ok(2));
        assert!(rx.try_recv().is_err(), "exactly one live timer");
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_timer_stops_all_ticks() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut timer = RotationTimer::new(PERIOD, tx, |epoch| epoch);
        timer.restart(1);
        drop(timer);

        // Every sender is gone once the aborted task has been reaped.
        assert_eq!(rx.recv().await, None);
    }

    // -- HeroCarousel ----------------------------------------------------------

    #[test]
    fn hero_tick_wraps_from_last_slide() {
        let mut hero: HeroCarousel<u64> = HeroCarousel::detached();
        hero.set_slide_count(3);
        hero.go_to(2);
        hero.tick(hero.epoch());
        assert_eq!(hero.index(), 0);
    }

    #[test]
    fn tick_from_an_older_arm_is_ignored() {
        let mut hero: HeroCarousel<u64> = HeroCarousel::detached();
        hero.set_slide_count(3);
        let queued = hero.epoch();
        hero.next();

        hero.tick(queued);
        assert_eq!(hero.index(), 1, "a manual move is not doubled by a queued tick");
    }

    #[tokio::test(start_paused = true)]
    async fn manual_navigation_rearms_the_timer() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut hero = HeroCarousel::with_timer(RotationTimer::new(PERIOD, tx, |epoch| epoch));
        hero.set_slide_count(3);

        time::sleep(Duration::from_secs(6)).await;
        hero.next();
        time::sleep(Duration::from_secs(6)).await;
        assert!(rx.try_recv().is_err(), "navigation pushed the next tick back");

        time::sleep(Duration::from_secs(2)).await;
        let epoch = rx.try_recv().unwrap();
        hero.tick(epoch);
        assert_eq!(hero.index(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn tick_queued_before_manual_move_does_not_advance() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut hero = HeroCarousel::with_timer(RotationTimer::new(PERIOD, tx, |epoch| epoch));
        hero.set_slide_count(3);

        time::sleep(PERIOD + Duration::from_millis(1)).await;
        let queued = rx.try_recv().unwrap();
        hero.next();
        hero.tick(queued);
        assert_eq!(hero.index(), 1);

        time::sleep(PERIOD + Duration::from_millis(1)).await;
        let fresh = rx.try_recv().unwrap();
        hero.tick(fresh);
        assert_eq!(hero.index(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn suspend_then_resume_starts_a_fresh_period() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut hero = HeroCarousel::with_timer(RotationTimer::new(PERIOD, tx, |epoch| epoch));
        hero.set_slide_count(2);
        assert!(hero.is_ticking());

        hero.suspend();
        assert!(!hero.is_ticking());
        time::sleep(PERIOD * 2).await;
        assert!(rx.try_recv().is_err(), "suspended carousel never ticks");

        hero.resume();
        time::sleep(PERIOD + Duration::from_millis(1)).await;
        assert!(rx.try_recv().is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn teardown_stops_index_changes() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut hero = HeroCarousel::with_timer(RotationTimer::new(PERIOD, tx, |epoch| epoch));
        hero.set_slide_count(3);
        hero.teardown();

        assert_eq!(rx.recv().await, None);
        assert_eq!(hero.index(), 0);
    }
}
