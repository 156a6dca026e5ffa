// Canary cloud API HTTP client
//
// Wraps `reqwest::Client` with endpoint construction, bearer auth, and
// the three freshness-bounded caches (session, locations, readings).
// The login flow lives in `auth.rs` as inherent methods on the same type.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::auth::Credentials;
use crate::cache::TtlCache;
use crate::error::Error;
use crate::models::{Device, DeviceId, Location, Reading, ReadingKind};
use crate::transport::TransportConfig;

/// Origin of the vendor's web API.
pub const DEFAULT_BASE_URL: &str = "https://my.canary.is";

const BODY_PREVIEW_CHARS: usize = 200;

/// Freshness windows for the client's caches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheTtls {
    pub session: Duration,
    pub locations: Duration,
    pub readings: Duration,
}

impl Default for CacheTtls {
    fn default() -> Self {
        Self {
            session: Duration::from_secs(14 * 24 * 60 * 60),
            locations: Duration::from_secs(60 * 60),
            readings: Duration::from_secs(5 * 60),
        }
    }
}

/// Authenticated, caching client for one Canary account.
///
/// Callers never log in explicitly: every read obtains the session token
/// through the session cache, and results are reused within their TTL.
/// Cheap to share behind an `Arc`; all methods take `&self`.
pub struct CanaryClient {
    http: reqwest::Client,
    base_url: Url,
    credentials: Credentials,
    session: TtlCache<(), SecretString, Error>,
    locations: TtlCache<(), Vec<Location>, Error>,
    readings: TtlCache<(DeviceId, String), Vec<Reading>, Error>,
}

impl CanaryClient {
    /// Create a client against the production API.
    pub fn new(credentials: Credentials, transport: &TransportConfig) -> Result<Self, Error> {
        let base_url = Url::parse(DEFAULT_BASE_URL)?;
        Self::with_base_url(base_url, credentials, transport)
    }

    /// Create a client against a different origin (staging, a fake server).
    pub fn with_base_url(
        base_url: Url,
        credentials: Credentials,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url, credentials))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    ///
    /// The client must have a cookie store enabled or login will fail.
    pub fn with_client(http: reqwest::Client, base_url: Url, credentials: Credentials) -> Self {
        let ttls = CacheTtls::default();
        Self {
            http,
            base_url,
            credentials,
            session: TtlCache::new(ttls.session),
            locations: TtlCache::new(ttls.locations),
            readings: TtlCache::new(ttls.readings),
        }
    }

    /// Replace the cache freshness windows. Intended for construction time;
    /// anything cached so far is dropped.
    pub fn with_ttls(mut self, ttls: CacheTtls) -> Self {
        self.session = TtlCache::new(ttls.session);
        self.locations = TtlCache::new(ttls.locations);
        self.readings = TtlCache::new(ttls.readings);
        self
    }

    /// The freshness windows currently in effect.
    pub fn ttls(&self) -> CacheTtls {
        CacheTtls {
            session: self.session.ttl(),
            locations: self.locations.ttl(),
            readings: self.readings.ttl(),
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub(crate) fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub(crate) fn session_cache(&self) -> &TtlCache<(), SecretString, Error> {
        &self.session
    }

    // ── Endpoints ────────────────────────────────────────────────────

    /// All locations on the account, each with its devices.
    ///
    /// `GET /api/locations`, cached for the locations TTL (1 hour).
    pub async fn locations(&self) -> Result<Vec<Location>, Error> {
        self.locations
            .get_or_try_fetch(&(), move || async move {
                debug!("listing locations");
                let url = self.endpoint("/api/locations")?;
                self.fetch(url).await
            })
            .await
    }

    /// Every device on the account, in location order.
    ///
    /// Served from the locations cache.
    pub async fn devices(&self) -> Result<Vec<Device>, Error> {
        let locations = self.locations().await?;
        Ok(locations.into_iter().flat_map(|l| l.devices).collect())
    }

    /// Latest sensor readings for a device.
    ///
    /// `GET /api/readings?deviceId={id}&type={canary|flex}`, cached for the
    /// readings TTL (5 minutes) per `(device_id, model)`.
    pub async fn readings(&self, device_id: &DeviceId, model: &str) -> Result<Vec<Reading>, Error> {
        let key = (device_id.clone(), model.to_owned());
        self.readings
            .get_or_try_fetch(&key, move || async move {
                let kind = ReadingKind::for_model(model);
                debug!(device_id = %device_id, %kind, "fetching readings");

                let mut url = self.endpoint("/api/readings")?;
                url.query_pairs_mut()
                    .append_pair("deviceId", device_id.as_str())
                    .append_pair("type", kind.as_str());
                self.fetch(url).await
            })
            .await
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Build an absolute URL for an API path (leading slash expected).
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}{path}"))?)
    }

    /// Authenticated GET returning the parsed JSON body.
    pub(crate) async fn fetch<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        let token = self.session_token().await?;

        debug!("GET {}", url);
        let resp = self
            .http
            .get(url)
            .bearer_auth(token.expose_secret())
            .send()
            .await?;

        let resp = check_status(resp).await?;
        parse_json(resp).await
    }
}

/// Turn a non-2xx response into `Error::Status`.
pub(crate) async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, Error> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let url = resp.url().to_string();
    let body = resp.text().await.unwrap_or_default();
    Err(Error::Status {
        status: status.as_u16(),
        url,
        body: preview(&body),
    })
}

/// Read the body and decode it as JSON.
pub(crate) async fn parse_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
    let body = resp.text().await?;
    serde_json::from_str(&body).map_err(|e| Error::Deserialization {
        message: format!("{e} (body preview: {:?})", preview(&body)),
        body: body.clone(),
    })
}

fn preview(body: &str) -> String {
    body.chars().take(BODY_PREVIEW_CHARS).collect()
}
