//! HTML page around a map document.
//!
//! The page carries the document as inline JSON plus a fixed bootstrap
//! script, so a rendered file works offline apart from Leaflet and tiles.

use layers::MapDocument;
use layers::html::escape_html;

const LEAFLET_CSS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
const LEAFLET_JS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";
const BOOTSTRAP_JS: &str = include_str!("../assets/bootstrap.js");
const STYLE_CSS: &str = include_str!("../assets/style.css");

pub const PAGE_TITLE: &str = "Earthquakes & Tectonic Plates";

#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error("map document serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Serializes `doc` for embedding in a `<script type="application/json">`
/// element. `</` is written as `<\/`, which JSON reads back unchanged but
/// which can never close the element early.
pub fn document_json(doc: &MapDocument) -> Result<String, PageError> {
    let json = serde_json::to_string(doc)?;
    Ok(json.replace("</", "<\\/"))
}

pub fn render_page(doc: &MapDocument) -> Result<String, PageError> {
    let json = document_json(doc)?;
    let container = escape_html(&doc.container_id);
    Ok(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{PAGE_TITLE}</title>
<link rel="stylesheet" href="{LEAFLET_CSS}">
<style>
{STYLE_CSS}</style>
</head>
<body>
<div id="{container}"></div>
<script src="{LEAFLET_JS}"></script>
<script type="application/json" id="map-document">{json}</script>
<script>
{BOOTSTRAP_JS}</script>
</body>
</html>
"#
    ))
}
