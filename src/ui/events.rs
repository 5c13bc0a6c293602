//! Application event handling.
//!
//! Processes background task completions on the coordinating context.

use crate::app::{App, AppEvent};

/// Apply one background event to application state.
pub fn handle_app_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::FeedLoaded { generation, result } => {
            app.handle_feed_loaded(generation, result);
        }
        AppEvent::ConnectivityChecked { available } => {
            app.handle_connectivity_checked(available);
        }
    }
}
