//! Utility functions for common operations.
//!
//! - **Text**: terminal-safe, width-aware rendering of feed-supplied strings
//! - **URLs**: validation before handing a link to the system browser
//! - **Network**: the connectivity check performed before a load

mod network;
mod text;
mod url_validator;

pub use network::ConnectivityCheck;
pub use text::{display_width, strip_control_chars, truncate_to_width};
pub use url_validator::{validate_url_for_open, UrlValidationError};
