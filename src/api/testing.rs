//! Scriptable in-memory [`ContentApi`] for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::FutureExt;

use super::{
    Announcement, ApiFuture, Bulletin, BulletinPage, CarouselSlide, ContentApi, Devotional,
    FinanceEnvelope, HistoryEntry, Program,
};
use crate::error::ApiError;

/// How a stubbed endpoint answers.
#[derive(Debug, Clone)]
pub enum Reply<T> {
    Ok(T),
    /// Answer after `Duration` of (tokio) time.
    Delayed(Duration, T),
    Fail,
    /// The fetch task panics instead of returning.
    Panic,
}

impl<T: Clone + Send + 'static> Reply<T> {
    fn play(&self, endpoint: &'static str) -> ApiFuture<'static, T> {
        let reply = self.clone();
        async move {
            match reply {
                Reply::Ok(value) => Ok(value),
                Reply::Delayed(delay, value) => {
                    tokio::time::sleep(delay).await;
                    Ok(value)
                }
                Reply::Fail => Err(ApiError::Decode {
                    endpoint: endpoint.to_string(),
                    message: "stubbed failure".to_string(),
                }),
                Reply::Panic => panic!("stubbed panic in {endpoint}"),
            }
        }
        .boxed()
    }
}

/// Every endpoint answers from a canned [`Reply`]; writes are recorded.
#[derive(Debug, Clone)]
pub struct StubApi {
    pub programs: Reply<Vec<Program>>,
    pub bulletins: Reply<BulletinPage>,
    pub announcements: Reply<Vec<Announcement>>,
    pub devotionals: Reply<Vec<Devotional>>,
    pub slides: Reply<Vec<CarouselSlide>>,
    pub finance: Reply<FinanceEnvelope>,
    pub history: Reply<Vec<HistoryEntry>>,
    /// Log of write calls, e.g. `"create carousel-slides"`, `"delete devotionals/4"`.
    pub writes: Arc<Mutex<Vec<String>>>,
    pub calls: Arc<AtomicUsize>,
}

impl StubApi {
    /// A stub where every read succeeds with `n` generated records.
    pub fn healthy(n: usize) -> Self {
        Self {
            programs: Reply::Ok((1..=n as i64).map(program).collect()),
            bulletins: Reply::Ok(BulletinPage {
                data: (1..=n as i64).map(bulletin).collect(),
            }),
            announcements: Reply::Ok((1..=n as i64).map(announcement).collect()),
            devotionals: Reply::Ok((1..=n as i64).map(devotional).collect()),
            slides: Reply::Ok((1..=n as i64).map(slide).collect()),
            finance: Reply::Ok(FinanceEnvelope {
                success: true,
                data: Some(super::FinanceSummary {
                    balance: 100.0,
                    total_income: 250.0,
                    total_expense: 150.0,
                }),
            }),
            history: Reply::Ok((1..=n as i64).map(history).collect()),
            writes: Arc::default(),
            calls: Arc::default(),
        }
    }

    /// A stub where every read fails.
    pub fn failing() -> Self {
        Self {
            programs: Reply::Fail,
            bulletins: Reply::Fail,
            announcements: Reply::Fail,
            devotionals: Reply::Fail,
            slides: Reply::Fail,
            finance: Reply::Fail,
            history: Reply::Fail,
            writes: Arc::default(),
            calls: Arc::default(),
        }
    }

    pub fn into_shared(self) -> Arc<dyn ContentApi> {
        Arc::new(self)
    }

    fn record(&self, what: String) -> ApiFuture<'static, ()> {
        self.writes.lock().unwrap().push(what);
        async { Ok(()) }.boxed()
    }

    fn count(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

pub fn program(id: i64) -> Program {
    Program {
        id,
        title: format!("Program {id}"),
        description: None,
        schedule: Some("Minggu 08.00".into()),
        location: None,
    }
}

pub fn bulletin(id: i64) -> Bulletin {
    Bulletin {
        id,
        title: format!("Warta {id}"),
        date: Some(format!("2024-01-{id:02}")),
        file_url: None,
    }
}

pub fn announcement(id: i64) -> Announcement {
    Announcement {
        id,
        title: format!("Pengumuman {id}"),
        content: Some("Isi pengumuman".into()),
        date: None,
    }
}

pub fn devotional(id: i64) -> Devotional {
    Devotional {
        id: Some(id),
        title: format!("Renungan {id}"),
        verse: Some("Mazmur 23:1".into()),
        content: "Tuhan adalah gembalaku.".into(),
        date: Some("2024-03-01".into()),
        author: None,
    }
}

pub fn slide(id: i64) -> CarouselSlide {
    CarouselSlide {
        id: Some(id),
        title: format!("Slide {id}"),
        image_url: format!("/img/{id}.jpg"),
        order_index: id as i32,
        is_active: id % 2 == 1,
        ..CarouselSlide::default()
    }
}

pub fn history(id: i64) -> HistoryEntry {
    HistoryEntry {
        id: Some(id),
        judul: format!("Peristiwa {id}"),
        tanggal_peristiwa: format!("19{:02}-01-01", 50 + id),
        deskripsi: None,
        gambar_url: None,
    }
}

fn single<T: Clone + Send + 'static>(
    reply: &Reply<Vec<T>>,
    endpoint: &'static str,
    pick: impl Fn(&T) -> bool + Send + 'static,
) -> ApiFuture<'static, T> {
    let list = reply.play(endpoint);
    async move {
        list.await?
            .into_iter()
            .find(|item| pick(item))
            .ok_or_else(|| ApiError::Decode {
                endpoint: endpoint.to_string(),
                message: "not found".to_string(),
            })
    }
    .boxed()
}

impl ContentApi for StubApi {
    fn programs(&self) -> ApiFuture<'_, Vec<Program>> {
        self.count();
        self.programs.play("programs")
    }

    fn bulletins(&self) -> ApiFuture<'_, BulletinPage> {
        self.count();
        self.bulletins.play("bulletins")
    }

    fn announcements(&self) -> ApiFuture<'_, Vec<Announcement>> {
        self.count();
        self.announcements.play("announcements")
    }

    fn devotionals(&self) -> ApiFuture<'_, Vec<Devotional>> {
        self.count();
        self.devotionals.play("devotionals")
    }

    fn carousel_slides(&self) -> ApiFuture<'_, Vec<CarouselSlide>> {
        self.count();
        self.slides.play("carousel-slides")
    }

    fn finance_summary(&self) -> ApiFuture<'_, FinanceEnvelope> {
        self.count();
        self.finance.play("finance-summary")
    }

    fn history_entries(&self) -> ApiFuture<'_, Vec<HistoryEntry>> {
        self.count();
        self.history.play("history-entries")
    }

    fn devotional(&self, id: i64) -> ApiFuture<'_, Devotional> {
        single(&self.devotionals, "devotionals", move |d: &Devotional| {
            d.id == Some(id)
        })
    }

    fn carousel_slide(&self, id: i64) -> ApiFuture<'_, CarouselSlide> {
        single(&self.slides, "carousel-slides", move |s: &CarouselSlide| {
            s.id == Some(id)
        })
    }

    fn history_entry(&self, id: i64) -> ApiFuture<'_, HistoryEntry> {
        single(&self.history, "history-entries", move |h: &HistoryEntry| {
            h.id == Some(id)
        })
    }

    fn create_carousel_slide<'a>(
        &'a self,
        slide: &'a CarouselSlide,
    ) -> ApiFuture<'a, CarouselSlide> {
        let saved = slide.clone();
        let write = self.record("create carousel-slides".into());
        async move { write.await.map(|_| saved) }.boxed()
    }

    fn update_carousel_slide<'a>(
        &'a self,
        id: i64,
        slide: &'a CarouselSlide,
    ) -> ApiFuture<'a, CarouselSlide> {
        let saved = CarouselSlide {
            id: Some(id),
            ..slide.clone()
        };
        let write = self.record(format!("update carousel-slides/{id}"));
        async move { write.await.map(|_| saved) }.boxed()
    }

    fn delete_carousel_slide(&self, id: i64) -> ApiFuture<'_, ()> {
        self.record(format!("delete carousel-slides/{id}"))
    }

    fn create_devotional<'a>(&'a self, devotional: &'a Devotional) -> ApiFuture<'a, Devotional> {
        let saved = devotional.clone();
        let write = self.record("create devotionals".into());
        async move { write.await.map(|_| saved) }.boxed()
    }

    fn update_devotional<'a>(
        &'a self,
        id: i64,
        devotional: &'a Devotional,
    ) -> ApiFuture<'a, Devotional> {
        let saved = Devotional {
            id: Some(id),
            ..devotional.clone()
        };
        let write = self.record(format!("update devotionals/{id}"));
        async move { write.await.map(|_| saved) }.boxed()
    }

    fn delete_devotional(&self, id: i64) -> ApiFuture<'_, ()> {
        self.record(format!("delete devotionals/{id}"))
    }

    fn create_history_entry<'a>(
        &'a self,
        entry: &'a HistoryEntry,
    ) -> ApiFuture<'a, HistoryEntry> {
        let saved = entry.clone();
        let write = self.record("create history-entries".into());
        async move { write.await.map(|_| saved) }.boxed()
    }

    fn update_history_entry<'a>(
        &'a self,
        id: i64,
        entry: &'a HistoryEntry,
    ) -> ApiFuture<'a, HistoryEntry> {
        let saved = HistoryEntry {
            id: Some(id),
            ..entry.clone()
        };
        let write = self.record(format!("update history-entries/{id}"));
        async move { write.await.map(|_| saved) }.boxed()
    }

    fn delete_history_entry(&self, id: i64) -> ApiFuture<'_, ()> {
        self.record(format!("delete history-entries/{id}"))
    }
}
