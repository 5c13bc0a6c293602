//! Terminal news reader for the Guardian content API.
//!
//! The pipeline is `FeedLoader::load` → `FeedClient::fetch_raw` →
//! `parser::parse` → `AppEvent::FeedLoaded` → `FeedListPresenter`.

pub mod app;
pub mod config;
pub mod feed;
pub mod ui;
pub mod util;
