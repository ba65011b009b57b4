//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use court_summarizer_core::services::{AuthService, SummaryService};
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all handlers.
pub struct AppState {
    pub summaries: SummaryService,
    pub auth: AuthService,
    pub config: Arc<Config>,
}
