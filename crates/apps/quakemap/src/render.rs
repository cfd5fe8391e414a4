use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use layers::MapBuilder;
use tokio::io::AsyncWriteExt;
use tracing::info;

use crate::feeds::{FeedLoader, OverlaySlots};
use crate::page::render_page;

/// Fetches both feeds, waits up to `deadline` for each, and renders the
/// page with whichever overlays arrived.
pub async fn render_once(
    loader: &FeedLoader,
    builder: &MapBuilder,
    deadline: Duration,
) -> anyhow::Result<String> {
    let slots = Arc::new(OverlaySlots::new());
    loader.spawn(slots.clone()).settle(deadline).await;

    let doc = builder.build(slots.earthquakes(), slots.plates());
    let html = render_page(&doc)?;
    Ok(html)
}

/// Writes `html` to `out`, or to stdout when `out` is `-`.
pub async fn write_output(out: &Path, html: &str) -> anyhow::Result<()> {
    if out == Path::new("-") {
        let mut stdout = tokio::io::stdout();
        stdout.write_all(html.as_bytes()).await?;
        stdout.flush().await?;
        return Ok(());
    }

    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("create {}", parent.display()))?;
    }
    tokio::fs::write(out, html)
        .await
        .with_context(|| format!("write {}", out.display()))?;
    info!(path = %out.display(), bytes = html.len(), "map written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{render_once, write_output};
    use crate::feeds::tests::{StaticSource, plate_body, plates, quake_body, quakes};
    use crate::feeds::FeedLoader;
    use layers::{MapBuilder, MapView, TileProvider};
    use std::sync::Arc;
    use std::time::Duration;

    fn builder() -> MapBuilder {
        MapBuilder::new(MapView::default(), &TileProvider::mapbox("pk.test")).expect("builder")
    }

    #[tokio::test]
    async fn renders_both_overlays() {
        let source = Arc::new(StaticSource::new(vec![
            (quakes(), Some(quake_body())),
            (plates(), Some(plate_body())),
        ]));
        let loader = FeedLoader::new(source, quakes(), plates());
        let html = render_once(&loader, &builder(), Duration::from_secs(5))
            .await
            .expect("render");
        assert!(html.contains("10km N of X"));
        assert!(html.contains("NA-PA"));
        assert!(html.contains(r#""loaded":true"#));
        assert!(!html.contains(r#""loaded":false"#));
    }

    #[tokio::test]
    async fn renders_without_stalled_plate_feed() {
        let source = Arc::new(StaticSource::new(vec![
            (quakes(), Some(quake_body())),
            (plates(), None),
        ]));
        let loader = FeedLoader::new(source, quakes(), plates());
        let html = render_once(&loader, &builder(), Duration::from_millis(200))
            .await
            .expect("render");
        assert!(html.contains("10km N of X"));
        assert!(html.contains(r#""loaded":false"#));
    }

    #[tokio::test]
    async fn writes_file_creating_parents() {
        let dir = std::env::temp_dir().join(format!("quakemap-out-{}", std::process::id()));
        let out = dir.join("nested").join("map.html");
        write_output(&out, "<html></html>").await.expect("write");
        let written = tokio::fs::read_to_string(&out).await.expect("read back");
        assert_eq!(written, "<html></html>");
        let _ = tokio::fs::remove_dir_all(&dir).await;
    }
}
