pub mod config;
pub mod feeds;
pub mod page;
pub mod render;
pub mod server;

pub use config::{Cli, Command};
pub use feeds::{FeedLoader, FeedLocation, FeedSource, HttpFeedSource, OverlaySlots};
