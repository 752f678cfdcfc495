//! Per-route adapter options.

use serde::{Deserialize, Serialize};

/// Default request body limit (2 MiB).
pub const DEFAULT_BODY_LIMIT: usize = 2 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConnectOptions {
    /// Status written when the controller succeeds.
    pub success_status: u16,
    /// What a 500 caused by an unclassified controller error carries as its body.
    pub internal_errors: InternalErrors,
    /// Maximum request body size in bytes.
    pub body_limit: usize,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            success_status: 200,
            internal_errors: InternalErrors::default(),
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }
}

/// Body policy for unclassified controller errors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InternalErrors {
    /// Serialize the error (message and cause chain) into the response.
    ///
    /// This leaks internal detail to clients; hosts should conceal or sanitize in production.
    #[default]
    Expose,
    /// Answer with a generic message; the error is only logged.
    Conceal,
}
