//! reqwest-backed [`ContentApi`] implementation.
//!
//! Every endpoint goes through one of three helpers ([`HttpApi::get`],
//! [`HttpApi::send_json`], [`HttpApi::delete`]) which share a single
//! error-wrapping convention: transport failures, non-2xx statuses and
//! undecodable bodies all become an [`ApiError`] that names the endpoint, and
//! each one is logged once at `warn` level before being returned.

use std::time::Duration;

use futures::FutureExt;
use reqwest::{Client, Method, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use super::{
    Announcement, ApiFuture, BulletinPage, CarouselSlide, ContentApi, Devotional,
    FinanceEnvelope, HistoryEntry, Program,
};
use crate::error::ApiError;

const SLIDES: &str = "carousel-slides";
const DEVOTIONALS: &str = "devotionals";
const HISTORY: &str = "history-entries";

/// A content API reachable over HTTP.
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: Client,
    /// Always ends in `/` so that relative joins append instead of replace.
    base: Url,
}

impl HttpApi {
    /// Create a client for the API rooted at `base_url`.
    ///
    /// # Arguments
    ///
    /// * `base_url`: e.g. `https://gereja.example/api`; a trailing slash is
    ///   optional.
    /// * `timeout`: per-request timeout enforced by the transport.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let base = normalize_base(base_url)?;
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("church-portal/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| ApiError::Network {
                endpoint: base.to_string(),
                source,
            })?;
        Ok(Self { client, base })
    }

    /// Resolve an endpoint path against the base URL.
    pub fn endpoint_url(&self, path: &str) -> Result<Url, ApiError> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|_| ApiError::InvalidUrl(format!("{}{path}", self.base)))
    }

    async fn get<T: DeserializeOwned>(&self, path: String) -> Result<T, ApiError> {
        let url = self.endpoint_url(&path)?;
        let request = self.client.get(url);
        self.execute(&path, request).await
    }

    async fn send_json<B, T>(&self, method: Method, path: String, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint_url(&path)?;
        let request = self.client.request(method, url).json(body);
        self.execute(&path, request).await
    }

    async fn delete(&self, path: String) -> Result<(), ApiError> {
        let url = self.endpoint_url(&path)?;
        let request = self.client.delete(url);
        self.fetch_bytes(&path, request).await.map(|_| ())
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let body = self.fetch_bytes(endpoint, request).await?;
        decode(endpoint, &body).map_err(|err| {
            warn!(endpoint, error = %err, "API response could not be decoded");
            err
        })
    }

    async fn fetch_bytes(
        &self,
        endpoint: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<Vec<u8>, ApiError> {
        debug!(endpoint, "API request");
        let result: Result<Vec<u8>, ApiError> = async {
            let response = request.send().await.map_err(|source| ApiError::Network {
                endpoint: endpoint.to_string(),
                source,
            })?;
            let status = response.status();
            if !status.is_success() {
                return Err(ApiError::Status {
                    endpoint: endpoint.to_string(),
                    status,
                });
            }
            let bytes = response.bytes().await.map_err(|source| ApiError::Network {
                endpoint: endpoint.to_string(),
                source,
            })?;
            Ok(bytes.to_vec())
        }
        .await;

        if let Err(err) = &result {
            warn!(endpoint, error = %err, "API request failed");
        }
        result
    }
}

/// Parse and normalize the configured base URL.
fn normalize_base(base_url: &str) -> Result<Url, ApiError> {
    let trimmed = base_url.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    let url = Url::parse(&with_slash).map_err(|_| ApiError::InvalidUrl(trimmed.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(ApiError::InvalidUrl(trimmed.to_string()));
    }
    Ok(url)
}

/// Decode a JSON body, mapping serde failures onto [`ApiError::Decode`].
///
/// Pure (no I/O) so the envelope handling can be tested without a server.
pub(crate) fn decode<T: DeserializeOwned>(endpoint: &str, body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|err| ApiError::Decode {
        endpoint: endpoint.to_string(),
        message: err.to_string(),
    })
}

impl ContentApi for HttpApi {
    fn programs(&self) -> ApiFuture<'_, Vec<Program>> {
        self.get("programs".into()).boxed()
    }

    fn bulletins(&self) -> ApiFuture<'_, BulletinPage> {
        self.get("bulletins".into()).boxed()
    }

    fn announcements(&self) -> ApiFuture<'_, Vec<Announcement>> {
        self.get("announcements".into()).boxed()
    }

    fn devotionals(&self) -> ApiFuture<'_, Vec<Devotional>> {
        self.get(DEVOTIONALS.into()).boxed()
    }

    fn carousel_slides(&self) -> ApiFuture<'_, Vec<CarouselSlide>> {
        self.get(SLIDES.into()).boxed()
    }

    fn finance_summary(&self) -> ApiFuture<'_, FinanceEnvelope> {
        self.get("finance-summary".into()).boxed()
    }

    fn history_entries(&self) -> ApiFuture<'_, Vec<HistoryEntry>> {
        self.get(HISTORY.into()).boxed()
    }

    fn devotional(&self, id: i64) -> ApiFuture<'_, Devotional> {
        self.get(format!("{DEVOTIONALS}/{id}")).boxed()
    }

    fn carousel_slide(&self, id: i64) -> ApiFuture<'_, CarouselSlide> {
        self.get(format!("{SLIDES}/{id}")).boxed()
    }

    fn history_entry(&self, id: i64) -> ApiFuture<'_, HistoryEntry> {
        self.get(format!("{HISTORY}/{id}")).boxed()
    }

    fn create_carousel_slide<'a>(
        &'a self,
        slide: &'a CarouselSlide,
    ) -> ApiFuture<'a, CarouselSlide> {
        self.send_json(Method::POST, SLIDES.into(), slide).boxed()
    }

    fn update_carousel_slide<'a>(
        &'a self,
        id: i64,
        slide: &'a CarouselSlide,
    ) -> ApiFuture<'a, CarouselSlide> {
        self.send_json(Method::PUT, format!("{SLIDES}/{id}"), slide)
            .boxed()
    }

    fn delete_carousel_slide(&self, id: i64) -> ApiFuture<'_, ()> {
        self.delete(format!("{SLIDES}/{id}")).boxed()
    }

    fn create_devotional<'a>(&'a self, devotional: &'a Devotional) -> ApiFuture<'a, Devotional> {
        self.send_json(Method::POST, DEVOTIONALS.into(), devotional)
            .boxed()
    }

    fn update_devotional<'a>(
        &'a self,
        id: i64,
        devotional: &'a Devotional,
    ) -> ApiFuture<'a, Devotional> {
        self.send_json(Method::PUT, format!("{DEVOTIONALS}/{id}"), devotional)
            .boxed()
    }

    fn delete_devotional(&self, id: i64) -> ApiFuture<'_, ()> {
        self.delete(format!("{DEVOTIONALS}/{id}")).boxed()
    }

    fn create_history_entry<'a>(
        &'a self,
        entry: &'a HistoryEntry,
    ) -> ApiFuture<'a, HistoryEntry> {
        self.send_json(Method::POST, HISTORY.into(), entry).boxed()
    }

    fn update_history_entry<'a>(
        &'a self,
        id: i64,
        entry: &'a HistoryEntry,
    ) -> ApiFuture<'a, HistoryEntry> {
        self.send_json(Method::PUT, format!("{HISTORY}/{id}"), entry)
            .boxed()
    }

    fn delete_history_entry(&self, id: i64) -> ApiFuture<'_, ()> {
        self.delete(format!("{HISTORY}/{id}")).boxed()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn api(base: &str) -> HttpApi {
        HttpApi::new(base, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn endpoint_url_appends_to_base_path() {
        let api = api("http://localhost:8000/api");
        assert_eq!(
            api.endpoint_url("programs").unwrap().as_str(),
            "http://localhost:8000/api/programs"
        );
    }

    #[test]
    fn trailing_slash_and_leading_slash_are_tolerated() {
        let api = api("http://localhost:8000/api/");
        assert_eq!(
            api.endpoint_url("/devotionals/7").unwrap().as_str(),
            "http://localhost:8000/api/devotionals/7"
        );
    }

    #[test]
    fn rejects_unparseable_base_url() {
        let err = HttpApi::new("not a url", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl(_)));
    }

    #[test]
    fn decode_reads_bulletin_envelope() {
        let page: BulletinPage = decode(
            "bulletins",
            br#"{"data":[{"id":1,"title":"Warta 1"},{"id":2,"title":"Warta 2"}]}"#,
        )
        .unwrap();
        assert_eq!(page.data.len(), 2);
        assert_eq!(page.data[1].title, "Warta 2");
    }

    #[test]
    fn decode_failure_names_endpoint() {
        let err = decode::<Vec<Program>>("programs", b"<html>502</html>").unwrap_err();
        assert!(matches!(err, ApiError::Decode { .. }));
        assert_eq!(err.endpoint(), Some("programs"));
    }

    #[tokio::test]
    async fn unreachable_server_is_a_network_error() {
        // Port 9 (discard) on localhost is closed in test environments.
        let api = HttpApi::new("http://127.0.0.1:9/api", Duration::from_secs(2)).unwrap();
        let err = api.programs().await.unwrap_err();
        assert!(matches!(err, ApiError::Network { .. }));
        assert_eq!(err.endpoint(), Some("programs"));
    }
}
