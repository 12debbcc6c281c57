//! Records served by the content API.
//!
//! Every struct mirrors one JSON shape.  Unknown fields are ignored, and a
//! missing or `null` field takes its default, so a partially-populated record
//! from the server still decodes instead of failing the whole slot.
//!
//! Records that the admin screens create (slides, devotionals, history
//! entries) carry `id: Option<i64>`: `None` means "not saved yet" and is left
//! out of the request body.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

/// A recurring church program (worship service, youth group, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub schedule: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

/// A weekly sermon bulletin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bulletin {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub file_url: Option<String>,
}

/// `GET bulletins` wraps its list in a `data` field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BulletinPage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<Bulletin>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Announcement {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

/// A daily devotional reading.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Devotional {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    /// Scripture reference, e.g. "Mazmur 23:1".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verse: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

/// One hero card of the homepage carousel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CarouselSlide {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub quote: Option<String>,
    #[serde(default)]
    pub badge: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image_url: String,
    #[serde(default)]
    pub cta_text: Option<String>,
    #[serde(default)]
    pub cta_link: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub order_index: i32,
    #[serde(default = "default_active", deserialize_with = "null_as_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

fn null_as_active<'de, D: Deserializer<'de>>(de: D) -> Result<bool, D::Error> {
    Ok(Option::<bool>::deserialize(de)?.unwrap_or_else(default_active))
}

/// A JSON `null` reads as the field's default, the same as a missing field.
fn null_as_default<'de, D, T>(de: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(de)?.unwrap_or_default())
}

/// Totals shown on the finance card, in rupiah.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinanceSummary {
    #[serde(default, deserialize_with = "null_as_default")]
    pub balance: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_income: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_expense: f64,
}

/// `GET finance-summary` reports success explicitly; `data` is only
/// meaningful when `success` is true.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinanceEnvelope {
    #[serde(default, deserialize_with = "null_as_default")]
    pub success: bool,
    #[serde(default)]
    pub data: Option<FinanceSummary>,
}

impl FinanceEnvelope {
    pub fn into_summary(self) -> Option<FinanceSummary> {
        if self.success {
            self.data
        } else {
            None
        }
    }
}

/// A milestone in the congregation's history.
///
/// Field names follow the API (Indonesian): `judul` is the title,
/// `tanggal_peristiwa` the event date, `deskripsi` the description and
/// `gambar_url` an optional picture.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub judul: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tanggal_peristiwa: String,
    #[serde(default)]
    pub deskripsi: Option<String>,
    #[serde(default)]
    pub gambar_url: Option<String>,
}

impl HistoryEntry {
    /// The event date, accepting `YYYY-MM-DD` or a full RFC 3339 timestamp.
    pub fn event_date(&self) -> Option<NaiveDate> {
        parse_api_date(&self.tanggal_peristiwa)
    }
}

/// Dates arrive either as `2024-05-01` or as `2024-05-01T00:00:00Z`.
pub fn parse_api_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
        .or_else(|| raw.get(..10).and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()))
}
