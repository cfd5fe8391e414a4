use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use layers::{MapBuilder, MapDocument};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::feeds::OverlaySlots;
use crate::page::render_page;

#[derive(Clone)]
pub struct AppState {
    pub slots: Arc<OverlaySlots>,
    pub builder: Arc<MapBuilder>,
}

impl AppState {
    /// Document for whatever has arrived so far.
    pub fn snapshot(&self) -> MapDocument {
        self.builder
            .build(self.slots.earthquakes(), self.slots.plates())
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(get_page))
        .route("/map.json", get(get_document))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("quakemap listening on http://{addr}");
    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn healthz() -> Response {
    (StatusCode::OK, "ok").into_response()
}

async fn get_page(State(state): State<AppState>) -> Response {
    let doc = state.snapshot();
    match render_page(&doc) {
        Ok(html) => {
            let mut headers = HeaderMap::new();
            headers.insert(
                http::header::CONTENT_TYPE,
                HeaderValue::from_static("text/html; charset=utf-8"),
            );
            headers.insert(http::header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
            (StatusCode::OK, headers, Body::from(html)).into_response()
        }
        Err(err) => {
            error!("page render failed: {err}");
            (StatusCode::INTERNAL_SERVER_ERROR, "render error").into_response()
        }
    }
}

async fn get_document(State(state): State<AppState>) -> Json<MapDocument> {
    Json(state.snapshot())
}

#[cfg(test)]
mod tests {
    use super::{AppState, get_document, get_page, healthz};
    use crate::feeds::tests::{StaticSource, plates, quake_body, quakes};
    use crate::feeds::{FeedLoader, OverlaySlots};
    use axum::extract::State;
    use axum::http::StatusCode;
    use layers::overlay::{EARTHQUAKES_NAME, PLATES_NAME};
    use layers::{MapBuilder, MapView, TileProvider};
    use std::sync::Arc;
    use std::time::Duration;

    fn state(slots: Arc<OverlaySlots>) -> AppState {
        let builder =
            MapBuilder::new(MapView::default(), &TileProvider::mapbox("pk.test")).expect("builder");
        AppState {
            slots,
            builder: Arc::new(builder),
        }
    }

    #[tokio::test]
    async fn health_check() {
        assert_eq!(healthz().await.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn serves_page_before_feeds_arrive() {
        let resp = get_page(State(state(Arc::new(OverlaySlots::new())))).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers()
                .get(http::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok()),
            Some("text/html; charset=utf-8")
        );
    }

    #[tokio::test]
    async fn document_reflects_arrived_overlays() {
        let slots = Arc::new(OverlaySlots::new());
        let source = Arc::new(StaticSource::new(vec![
            (quakes(), Some(quake_body())),
            (plates(), None),
        ]));
        FeedLoader::new(source, quakes(), plates())
            .spawn(slots.clone())
            .settle(Duration::from_millis(200))
            .await;

        let doc = get_document(State(state(slots))).await.0;
        let quake_layer = doc.overlay(EARTHQUAKES_NAME).expect("earthquakes");
        assert!(quake_layer.loaded);
        assert_eq!(quake_layer.len(), 2);
        let plate_layer = doc.overlay(PLATES_NAME).expect("plates");
        assert!(!plate_layer.loaded);
        assert!(plate_layer.is_empty());
    }
}
