//! Content administration commands.
//!
//! Every managed collection behaves the same way: list, submit a validated
//! form, then list again so the operator sees the result.  The per-resource
//! differences (endpoints, required fields) live in the [`Collection`] and
//! [`Form`] impls; [`run`] is shared.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::info;

use crate::api::{ApiFuture, CarouselSlide, ContentApi, Devotional, HistoryEntry};
use crate::api::models::parse_api_date;
use crate::cli::{AdminAction, Resource};
use crate::error::ValidationError;

/// A record that can be submitted from an admin form.
pub trait Form: Serialize + DeserializeOwned + Send + Sync {
    /// Form name used in messages.
    const NAME: &'static str;

    /// Check required fields before anything is sent.
    fn validate(&self) -> Result<(), ValidationError>;
}

impl Form for CarouselSlide {
    const NAME: &'static str = "slide";

    fn validate(&self) -> Result<(), ValidationError> {
        let mut problems = Vec::new();
        require(&mut problems, "title", &self.title);
        require(&mut problems, "image_url", &self.image_url);
        if self.order_index < 0 {
            problems.push("order_index must not be negative".to_string());
        }
        finish(Self::NAME, problems)
    }
}

impl Form for Devotional {
    const NAME: &'static str = "devotional";

    fn validate(&self) -> Result<(), ValidationError> {
        let mut problems = Vec::new();
        require(&mut problems, "title", &self.title);
        require(&mut problems, "content", &self.content);
        if let Some(date) = &self.date {
            if chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
                problems.push(format!("date '{date}' is not YYYY-MM-DD"));
            }
        }
        finish(Self::NAME, problems)
    }
}

impl Form for HistoryEntry {
    const NAME: &'static str = "history entry";

    fn validate(&self) -> Result<(), ValidationError> {
        let mut problems = Vec::new();
        require(&mut problems, "judul", &self.judul);
        require(&mut problems, "tanggal_peristiwa", &self.tanggal_peristiwa);
        if !self.tanggal_peristiwa.trim().is_empty() && parse_api_date(&self.tanggal_peristiwa).is_none()
        {
            problems.push(format!(
                "tanggal_peristiwa '{}' is not a date",
                self.tanggal_peristiwa
            ));
        }
        finish(Self::NAME, problems)
    }
}

fn require(problems: &mut Vec<String>, field: &str, value: &str) {
    if value.trim().is_empty() {
        problems.push(format!("{field} is required"));
    }
}

fn finish(form: &'static str, problems: Vec<String>) -> Result<(), ValidationError> {
    if problems.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { form, problems })
    }
}

// ---------------------------------------------------------------------------
// Collections
// ---------------------------------------------------------------------------

/// Maps the generic admin workflow onto one set of API endpoints.
pub trait Collection {
    type Record: Form;

    fn list(api: &dyn ContentApi) -> ApiFuture<'_, Vec<Self::Record>>;
    fn get(api: &dyn ContentApi, id: i64) -> ApiFuture<'_, Self::Record>;
    fn create<'a>(api: &'a dyn ContentApi, record: &'a Self::Record)
        -> ApiFuture<'a, Self::Record>;
    fn update<'a>(
        api: &'a dyn ContentApi,
        id: i64,
        record: &'a Self::Record,
    ) -> ApiFuture<'a, Self::Record>;
    fn delete(api: &dyn ContentApi, id: i64) -> ApiFuture<'_, ()>;
}

pub struct Slides;
pub struct Devotionals;
pub struct History;

impl Collection for Slides {
    type Record = CarouselSlide;

    fn list(api: &dyn ContentApi) -> ApiFuture<'_, Vec<CarouselSlide>> {
        api.carousel_slides()
    }
    fn get(api: &dyn ContentApi, id: i64) -> ApiFuture<'_, CarouselSlide> {
        api.carousel_slide(id)
    }
    fn create<'a>(api: &'a dyn ContentApi, record: &'a CarouselSlide) -> ApiFuture<'a, CarouselSlide> {
        api.create_carousel_slide(record)
    }
    fn update<'a>(
        api: &'a dyn ContentApi,
        id: i64,
        record: &'a CarouselSlide,
    ) -> ApiFuture<'a, CarouselSlide> {
        api.update_carousel_slide(id, record)
    }
    fn delete(api: &dyn ContentApi, id: i64) -> ApiFuture<'_, ()> {
        api.delete_carousel_slide(id)
    }
}

impl Collection for Devotionals {
    type Record = Devotional;

    fn list(api: &dyn ContentApi) -> ApiFuture<'_, Vec<Devotional>> {
        api.devotionals()
    }
    fn get(api: &dyn ContentApi, id: i64) -> ApiFuture<'_, Devotional> {
        api.devotional(id)
    }
    fn create<'a>(api: &'a dyn ContentApi, record: &'a Devotional) -> ApiFuture<'a, Devotional> {
        api.create_devotional(record)
    }
    fn update<'a>(
        api: &'a dyn ContentApi,
        id: i64,
        record: &'a Devotional,
    ) -> ApiFuture<'a, Devotional> {
        api.update_devotional(id, record)
    }
    fn delete(api: &dyn ContentApi, id: i64) -> ApiFuture<'_, ()> {
        api.delete_devotional(id)
    }
}

impl Collection for History {
    type Record = HistoryEntry;

    fn list(api: &dyn ContentApi) -> ApiFuture<'_, Vec<HistoryEntry>> {
        api.history_entries()
    }
    fn get(api: &dyn ContentApi, id: i64) -> ApiFuture<'_, HistoryEntry> {
        api.history_entry(id)
    }
    fn create<'a>(api: &'a dyn ContentApi, record: &'a HistoryEntry) -> ApiFuture<'a, HistoryEntry> {
        api.create_history_entry(record)
    }
    fn update<'a>(
        api: &'a dyn ContentApi,
        id: i64,
        record: &'a HistoryEntry,
    ) -> ApiFuture<'a, HistoryEntry> {
        api.update_history_entry(id, record)
    }
    fn delete(api: &dyn ContentApi, id: i64) -> ApiFuture<'_, ()> {
        api.delete_history_entry(id)
    }
}

// ---------------------------------------------------------------------------
// Workflow
// ---------------------------------------------------------------------------

/// Run one admin command and return what should be printed.
pub async fn run(api: &dyn ContentApi, resource: Resource, action: AdminAction) -> Result<String> {
    match resource {
        Resource::Slides => run_for::<Slides>(api, action).await,
        Resource::Devotionals => run_for::<Devotionals>(api, action).await,
        Resource::History => run_for::<History>(api, action).await,
    }
}

async fn run_for<C: Collection>(api: &dyn ContentApi, action: AdminAction) -> Result<String> {
    let name = <C::Record as Form>::NAME;
    match action {
        AdminAction::List => {
            let records = C::list(api).await.with_context(|| format!("listing {name} records"))?;
            pretty(&records)
        }
        AdminAction::Show { id } => {
            let record = C::get(api, id)
                .await
                .with_context(|| format!("fetching {name} #{id}"))?;
            pretty(&record)
        }
        AdminAction::Create { file } => {
            let record: C::Record = read_form(&file)?;
            let saved = C::create(api, &record)
                .await
                .with_context(|| format!("creating {name}"))?;
            info!(form = name, "created");
            refetch::<C>(api, "created", &saved).await
        }
        AdminAction::Update { id, file } => {
            let record: C::Record = read_form(&file)?;
            let saved = C::update(api, id, &record)
                .await
                .with_context(|| format!("updating {name} #{id}"))?;
            info!(form = name, id, "updated");
            refetch::<C>(api, "updated", &saved).await
        }
        AdminAction::Delete { id } => {
            C::delete(api, id)
                .await
                .with_context(|| format!("deleting {name} #{id}"))?;
            info!(form = name, id, "deleted");
            refetch::<C>(api, "deleted", &format!("{name} #{id}")).await
        }
    }
}

/// After a write, show what changed and the refreshed list.
async fn refetch<C: Collection>(
    api: &dyn ContentApi,
    verb: &str,
    changed: &impl Serialize,
) -> Result<String> {
    let name = <C::Record as Form>::NAME;
    let records = C::list(api)
        .await
        .with_context(|| format!("refreshing {name} records"))?;
    Ok(format!(
        "{verb}: {}\n{}",
        serde_json::to_string(changed)?,
        pretty(&records)?
    ))
}

fn pretty(value: &impl Serialize) -> Result<String> {
    serde_json::to_string_pretty(value).context("serializing output")
}

/// Read a JSON form from `path` (`-` for stdin) and validate it.
pub fn read_form<T: Form>(path: &Path) -> Result<T> {
    let raw = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("reading form from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("reading form file {}", path.display()))?
    };
    parse_form(&raw)
}

pub fn parse_form<T: Form>(raw: &str) -> Result<T> {
    let record: T = serde_json::from_str(raw)
        .with_context(|| format!("{} form is not valid JSON", T::NAME))?;
    record.validate()?;
    Ok(record)
}
