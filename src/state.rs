use std::sync::Arc;

use crate::config::{Config, EmptyResultPolicy};
use crate::error::ApiError;
use crate::store::{AttendanceStore, StoreError};

/// Shared per-app state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn AttendanceStore>,
    pub empty_history_policy: EmptyResultPolicy,
    pub expose_store_errors: bool,
}

impl AppState {
    pub fn new(store: Arc<dyn AttendanceStore>, config: &Config) -> Self {
        Self {
            store,
            empty_history_policy: config.empty_history_policy,
            expose_store_errors: config.expose_store_errors,
        }
    }

    /// State with the legacy defaults: empty history is a 404 and store
    /// errors are redacted.
    pub fn with_store(store: Arc<dyn AttendanceStore>) -> Self {
        Self {
            store,
            empty_history_policy: EmptyResultPolicy::NotFound,
            expose_store_errors: false,
        }
    }

    /// Logs a store failure and turns it into the client-facing error.
    pub fn store_failure(&self, err: StoreError, context: &str) -> ApiError {
        tracing::error!(error = %err, "{}", context);

        if self.expose_store_errors {
            ApiError::Store(err.to_string())
        } else {
            ApiError::Store("Internal Server Error".to_string())
        }
    }
}
