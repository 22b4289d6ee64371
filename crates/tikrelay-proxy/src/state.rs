//! Shared application state type.

use crate::bootstrap::RelayContext;
use std::sync::Arc;

/// Application state shared across all handlers.
///
/// Immutable once built; requests share nothing mutable.
pub type AppState = Arc<RelayContext>;
