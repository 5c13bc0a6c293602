//! Terminal User Interface module.
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard input handling
//! - `events` - Background task event processing
//! - `render` - Layout and render dispatch
//! - `items` - News list widget
//! - `status` - Status bar widget

mod events;
mod input;
mod items;
mod loop_runner;
mod render;
mod status;

pub use events::handle_app_event;
pub use input::SystemBrowser;
pub use loop_runner::{run, Action};
