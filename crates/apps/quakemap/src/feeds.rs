//! Feed loading.
//!
//! The earthquake feed and the plate feed are fetched by two independent
//! tasks. Each task writes only its own overlay slot; neither waits on the
//! other, and a failure in one leaves the other untouched.

use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use formats::{EarthquakeFeed, FeedFormatError, GeoJsonError, PlateCollection};
use layers::{EarthquakeOverlay, PlateOverlay};
use serde_json::Value;
use tokio::sync::OnceCell;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Type alias for a boxed future that can be sent between threads.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Where a feed is read from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FeedLocation {
    Url(String),
    File(PathBuf),
}

impl FeedLocation {
    /// `http(s)://` strings are URLs; anything else is a local path.
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s.starts_with("http://") || s.starts_with("https://") {
            FeedLocation::Url(s.to_string())
        } else {
            FeedLocation::File(PathBuf::from(s))
        }
    }
}

impl fmt::Display for FeedLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedLocation::Url(url) => f.write_str(url),
            FeedLocation::File(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("fetch {location} failed: {source}")]
    Http {
        location: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{location} returned HTTP {status}")]
    Status { location: String, status: u16 },
    #[error("{location} payload too large (max {max} bytes)")]
    TooLarge { location: String, max: usize },
    #[error("read {location}: {source}")]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{location} is not valid JSON: {source}")]
    Json {
        location: String,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Earthquakes(#[from] FeedFormatError),
    #[error(transparent)]
    Plates(#[from] GeoJsonError),
}

/// Retrieves a feed body as JSON.
///
/// Implementations must be `Send + Sync` for use across async tasks.
/// Methods return boxed futures for dyn-compatibility.
pub trait FeedSource: Send + Sync {
    fn fetch_json<'a>(
        &'a self,
        location: &'a FeedLocation,
    ) -> BoxFuture<'a, Result<Value, FeedError>>;
}

/// Reads URLs with reqwest and paths with tokio's filesystem API.
pub struct HttpFeedSource {
    client: reqwest::Client,
    max_bytes: usize,
}

impl HttpFeedSource {
    pub fn new(client: reqwest::Client, max_bytes: usize) -> Self {
        Self { client, max_bytes }
    }

    async fn fetch_bytes(&self, location: &FeedLocation) -> Result<Vec<u8>, FeedError> {
        let name = location.to_string();
        match location {
            FeedLocation::Url(url) => {
                let resp = self
                    .client
                    .get(url)
                    .send()
                    .await
                    .map_err(|source| FeedError::Http {
                        location: name.clone(),
                        source,
                    })?;

                if !resp.status().is_success() {
                    return Err(FeedError::Status {
                        location: name,
                        status: resp.status().as_u16(),
                    });
                }
                if resp.content_length().is_some_and(|n| n as usize > self.max_bytes) {
                    return Err(FeedError::TooLarge {
                        location: name,
                        max: self.max_bytes,
                    });
                }

                let bytes = resp.bytes().await.map_err(|source| FeedError::Http {
                    location: name.clone(),
                    source,
                })?;
                self.check_size(&name, bytes.len())?;
                Ok(bytes.to_vec())
            }
            FeedLocation::File(path) => {
                let bytes = tokio::fs::read(path).await.map_err(|source| FeedError::Io {
                    location: name.clone(),
                    source,
                })?;
                self.check_size(&name, bytes.len())?;
                Ok(bytes)
            }
        }
    }

    fn check_size(&self, location: &str, len: usize) -> Result<(), FeedError> {
        if len > self.max_bytes {
            return Err(FeedError::TooLarge {
                location: location.to_string(),
                max: self.max_bytes,
            });
        }
        Ok(())
    }
}

impl FeedSource for HttpFeedSource {
    fn fetch_json<'a>(
        &'a self,
        location: &'a FeedLocation,
    ) -> BoxFuture<'a, Result<Value, FeedError>> {
        Box::pin(async move {
            let bytes = self.fetch_bytes(location).await?;
            debug!(%location, bytes = bytes.len(), "feed body received");
            serde_json::from_slice(&bytes).map_err(|source| FeedError::Json {
                location: location.to_string(),
                source,
            })
        })
    }
}

/// One write-once slot per overlay.
#[derive(Debug, Default)]
pub struct OverlaySlots {
    earthquakes: OnceCell<EarthquakeOverlay>,
    plates: OnceCell<PlateOverlay>,
}

impl OverlaySlots {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn earthquakes(&self) -> Option<&EarthquakeOverlay> {
        self.earthquakes.get()
    }

    pub fn plates(&self) -> Option<&PlateOverlay> {
        self.plates.get()
    }
}

pub async fn fetch_earthquakes(
    source: &dyn FeedSource,
    location: &FeedLocation,
) -> Result<EarthquakeOverlay, FeedError> {
    let value = source.fetch_json(location).await?;
    let feed = EarthquakeFeed::from_geojson_value(value)?;
    Ok(EarthquakeOverlay::from_feed(&feed))
}

pub async fn fetch_plates(
    source: &dyn FeedSource,
    location: &FeedLocation,
) -> Result<PlateOverlay, FeedError> {
    let value = source.fetch_json(location).await?;
    let plates = PlateCollection::from_geojson_value(value)?;
    Ok(PlateOverlay::from_collection(plates))
}

pub struct LoadHandles {
    pub earthquakes: JoinHandle<()>,
    pub plates: JoinHandle<()>,
}

impl LoadHandles {
    /// Waits for each task on its own up to `deadline`. A task still
    /// running at the deadline is aborted and its slot stays empty.
    pub async fn settle(self, deadline: Duration) {
        tokio::join!(
            settle_one("earthquakes", self.earthquakes, deadline),
            settle_one("plates", self.plates, deadline),
        );
    }
}

async fn settle_one(feed: &'static str, mut handle: JoinHandle<()>, deadline: Duration) {
    match tokio::time::timeout(deadline, &mut handle).await {
        Ok(Ok(())) => {}
        Ok(Err(err)) => warn!(feed, "feed task failed: {err}"),
        Err(_) => {
            handle.abort();
            warn!(feed, ?deadline, "feed did not arrive before the deadline");
        }
    }
}

pub struct FeedLoader {
    source: Arc<dyn FeedSource>,
    earthquakes: FeedLocation,
    plates: FeedLocation,
}

impl FeedLoader {
    pub fn new(
        source: Arc<dyn FeedSource>,
        earthquakes: FeedLocation,
        plates: FeedLocation,
    ) -> Self {
        Self {
            source,
            earthquakes,
            plates,
        }
    }

    /// Starts both fetches. Must be called from within a tokio runtime.
    pub fn spawn(&self, slots: Arc<OverlaySlots>) -> LoadHandles {
        let earthquakes = tokio::spawn(load_earthquakes(
            self.source.clone(),
            self.earthquakes.clone(),
            slots.clone(),
        ));
        let plates = tokio::spawn(load_plates(self.source.clone(), self.plates.clone(), slots));
        LoadHandles {
            earthquakes,
            plates,
        }
    }
}

async fn load_earthquakes(
    source: Arc<dyn FeedSource>,
    location: FeedLocation,
    slots: Arc<OverlaySlots>,
) {
    match fetch_earthquakes(source.as_ref(), &location).await {
        Ok(overlay) => {
            info!(
                %location,
                markers = overlay.markers.len(),
                skipped = overlay.skipped,
                title = overlay.title.as_deref().unwrap_or(""),
                "earthquake feed loaded"
            );
            if slots.earthquakes.set(overlay).is_err() {
                warn!("earthquake overlay already set");
            }
        }
        Err(err) => warn!(%location, "earthquake feed unavailable: {err}"),
    }
}

async fn load_plates(
    source: Arc<dyn FeedSource>,
    location: FeedLocation,
    slots: Arc<OverlaySlots>,
) {
    match fetch_plates(source.as_ref(), &location).await {
        Ok(overlay) => {
            info!(
                %location,
                features = overlay.summary.features,
                unsummarized = overlay.summary.unsummarized,
                lines = overlay.summary.lines,
                areas = overlay.summary.areas,
                vertices = overlay.summary.vertices,
                "plate feed loaded"
            );
            if slots.plates.set(overlay).is_err() {
                warn!("plate overlay already set");
            }
        }
        Err(err) => warn!(%location, "plate feed unavailable: {err}"),
    }
}
