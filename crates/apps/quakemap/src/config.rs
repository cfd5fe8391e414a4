//! Command-line and environment configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use foundation::LatLng;
use layers::map::MAP_CONTAINER_ID;
use layers::tiles::{DEFAULT_BASE_LAYER, MAPBOX_URL_TEMPLATE};
use layers::{MapView, TileProvider};

use crate::feeds::FeedLocation;

const USGS_SUMMARY_BASE: &str = "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary";
const PLATES_BASE: &str = "https://raw.githubusercontent.com/fraxen/tectonicplates/master/GeoJSON";

pub const DEFAULT_MAX_FEED_BYTES: usize = 32 * 1024 * 1024;

#[derive(Parser, Debug)]
#[command(author, version, about = "Earthquake and tectonic plate map renderer")]
pub struct Cli {
    #[command(flatten)]
    pub feeds: FeedArgs,

    #[command(flatten)]
    pub map: MapArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch both feeds once and write a self-contained HTML map
    Render {
        /// Output file, or `-` for stdout
        #[arg(long, short, default_value = "map.html")]
        out: PathBuf,

        /// Seconds to wait for each feed before rendering without it
        #[arg(long, default_value_t = 30)]
        feed_timeout: u64,
    },

    /// Serve the map over HTTP, filling overlays as feeds arrive
    Serve {
        #[arg(long, env = "QUAKEMAP_ADDR", default_value = "127.0.0.1:8080")]
        addr: SocketAddr,
    },
}

/// USGS summary feeds.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EarthquakePreset {
    /// Past 7 days, all magnitudes
    AllWeek,
    /// Past 30 days, all magnitudes
    AllMonth,
    /// Past 30 days, M4.5+
    M45Month,
    /// Past day, all magnitudes
    AllDay,
    /// Past 7 days, M4.5+
    M45Week,
}

impl EarthquakePreset {
    fn file_name(self) -> &'static str {
        match self {
            EarthquakePreset::AllWeek => "all_week.geojson",
            EarthquakePreset::AllMonth => "all_month.geojson",
            EarthquakePreset::M45Month => "4.5_month.geojson",
            EarthquakePreset::AllDay => "all_day.geojson",
            EarthquakePreset::M45Week => "4.5_week.geojson",
        }
    }

    pub fn url(self) -> String {
        format!("{USGS_SUMMARY_BASE}/{}", self.file_name())
    }
}

/// PB2002 plate model datasets.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlateDataset {
    /// Plate polygons
    Plates,
    /// Boundary polylines
    Boundaries,
}

impl PlateDataset {
    pub fn url(self) -> String {
        let file = match self {
            PlateDataset::Plates => "PB2002_plates.json",
            PlateDataset::Boundaries => "PB2002_boundaries.json",
        };
        format!("{PLATES_BASE}/{file}")
    }
}

#[derive(Args, Debug, Clone)]
pub struct FeedArgs {
    /// Earthquake feed preset
    #[arg(long, value_enum, default_value_t = EarthquakePreset::AllWeek)]
    pub earthquake_feed: EarthquakePreset,

    /// Earthquake feed URL or file path; overrides --earthquake-feed
    #[arg(long, env = "QUAKEMAP_EARTHQUAKES_URL")]
    pub earthquakes_url: Option<String>,

    /// Plate dataset preset
    #[arg(long, value_enum, default_value_t = PlateDataset::Plates)]
    pub plate_dataset: PlateDataset,

    /// Plate feed URL or file path; overrides --plate-dataset
    #[arg(long, env = "QUAKEMAP_PLATES_URL")]
    pub plates_url: Option<String>,

    /// Largest feed body accepted, in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_FEED_BYTES)]
    pub max_feed_bytes: usize,
}

impl FeedArgs {
    pub fn earthquakes_location(&self) -> FeedLocation {
        match &self.earthquakes_url {
            Some(s) => FeedLocation::parse(s),
            None => FeedLocation::Url(self.earthquake_feed.url()),
        }
    }

    pub fn plates_location(&self) -> FeedLocation {
        match &self.plates_url {
            Some(s) => FeedLocation::parse(s),
            None => FeedLocation::Url(self.plate_dataset.url()),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct MapArgs {
    /// Tile provider access token
    #[arg(long, env = "MAPBOX_ACCESS_TOKEN", default_value = "", hide_env_values = true)]
    pub access_token: String,

    /// Tile URL template; `{id}` is replaced by each base layer's style id
    #[arg(long, default_value = MAPBOX_URL_TEMPLATE)]
    pub tile_url: String,

    #[arg(long, default_value_t = 37.09, allow_negative_numbers = true)]
    pub center_lat: f64,

    #[arg(long, default_value_t = -95.71, allow_negative_numbers = true)]
    pub center_lon: f64,

    #[arg(long, default_value_t = 5)]
    pub zoom: u8,

    /// Base layer shown on load
    #[arg(long, default_value = DEFAULT_BASE_LAYER)]
    pub base_layer: String,
}

impl MapArgs {
    pub fn view(&self) -> MapView {
        MapView {
            container_id: MAP_CONTAINER_ID.to_string(),
            center: LatLng::new(self.center_lat, self.center_lon),
            zoom: self.zoom,
            default_base: self.base_layer.clone(),
        }
    }

    pub fn tile_provider(&self) -> TileProvider {
        TileProvider::mapbox(self.access_token.clone()).with_url_template(self.tile_url.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command, EarthquakePreset, PlateDataset};
    use crate::feeds::FeedLocation;
    use clap::{CommandFactory, Parser};
    use foundation::LatLng;
    use std::path::PathBuf;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_match_initial_map() {
        let cli = Cli::try_parse_from(["quakemap", "render"]).expect("parse");
        assert_eq!(cli.feeds.earthquake_feed, EarthquakePreset::AllWeek);
        assert_eq!(cli.feeds.plate_dataset, PlateDataset::Plates);
        let view = cli.map.view();
        assert_eq!(view.center, LatLng::new(37.09, -95.71));
        assert_eq!(view.zoom, 5);
        assert_eq!(view.container_id, "map");
        assert_eq!(view.default_base, "Streets-Satellite");
        assert!(matches!(cli.command, Command::Render { feed_timeout: 30, .. }));
    }

    #[test]
    fn presets_resolve_to_usgs_urls() {
        assert_eq!(
            EarthquakePreset::AllWeek.url(),
            "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_week.geojson"
        );
        assert_eq!(
            EarthquakePreset::M45Month.url(),
            "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/4.5_month.geojson"
        );
        assert!(PlateDataset::Boundaries.url().ends_with("PB2002_boundaries.json"));
    }

    #[test]
    fn overrides_accept_urls_and_paths() {
        let cli = Cli::try_parse_from([
            "quakemap",
            "--earthquakes-url",
            "https://example.com/q.geojson",
            "--plates-url",
            "static/data/plates.json",
            "--center-lon",
            "-120.5",
            "serve",
            "--addr",
            "0.0.0.0:9000",
        ])
        .expect("parse");
        assert_eq!(
            cli.feeds.earthquakes_location(),
            FeedLocation::Url("https://example.com/q.geojson".to_string())
        );
        assert_eq!(
            cli.feeds.plates_location(),
            FeedLocation::File(PathBuf::from("static/data/plates.json"))
        );
        assert_eq!(cli.map.center_lon, -120.5);
        assert!(matches!(cli.command, Command::Serve { addr } if addr.port() == 9000));
    }
}
