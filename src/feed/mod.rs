//! News feed pipeline: fetch, parse, load.
//!
//! - [`client`] - HTTP retrieval of the raw JSON body
//! - [`parser`] - JSON to [`FeedItem`] extraction with per-record tolerance
//! - [`loader`] - background fetch + parse cycles with stale-result suppression

pub mod client;
mod item;
pub mod loader;
pub mod parser;

pub use client::{FeedClient, FetchError};
pub use item::{FeedItem, AUTHOR_NOT_AVAILABLE};
pub use loader::{FeedLoader, LoadError, LoadResult, LoadState};
pub use parser::{parse, ParseError};
