//! Structured errors for deliberately rejected requests.
//!
//! Controllers return an [`ApiError`] when they want a specific status and user-facing message
//! to reach the client. The adapter recognizes it among any other failure and answers with
//! its status and message. The `info` text is for operators only: it is logged and never
//! written to the response.
//!
//! Every builder step takes the error by value and hands back a new one, so a module-level
//! [`ApiErrors`] template can be shared between concurrent requests.

use std::borrow::Cow;
use thiserror::Error;

/// Template for [`ApiError`] values originating from one module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiErrors {
    module: Cow<'static, str>,
}

impl ApiErrors {
    #[must_use]
    pub const fn new(module: &'static str) -> Self {
        Self {
            module: Cow::Borrowed(module),
        }
    }

    #[must_use]
    pub fn owned(module: impl Into<String>) -> Self {
        Self {
            module: Cow::Owned(module.into()),
        }
    }

    #[must_use]
    pub fn module(&self) -> &str {
        &self.module
    }

    /// An error with an arbitrary status code and no message or info. The code is not
    /// validated.
    #[must_use]
    pub fn status(&self, status_code: u16) -> ApiError {
        self.with(status_code, None, None)
    }

    /// An error with status, message and info set in one step.
    #[must_use]
    pub fn with(&self, status_code: u16, message: Option<&str>, info: Option<&str>) -> ApiError {
        ApiError {
            module: self.module.clone(),
            status_code,
            message: message.map(str::to_string),
            info: info.map(str::to_string),
        }
    }

    /// 403 Forbidden.
    #[must_use]
    pub fn forbidden(&self, message: Option<&str>, info: Option<&str>) -> ApiError {
        self.with(403, message, info)
    }

    /// 401 Unauthorized.
    #[must_use]
    pub fn unauthorized(&self, message: Option<&str>, info: Option<&str>) -> ApiError {
        self.with(401, message, info)
    }

    /// 404 Not Found.
    #[must_use]
    pub fn not_found(&self, message: Option<&str>, info: Option<&str>) -> ApiError {
        self.with(404, message, info)
    }

    /// 400 Bad Request.
    #[must_use]
    pub fn bad_request(&self, message: Option<&str>, info: Option<&str>) -> ApiError {
        self.with(400, message, info)
    }
}

/// A rejected request: status code, optional user-facing message, optional diagnostic info.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{module} rejected the request with status {status_code}")]
pub struct ApiError {
    module: Cow<'static, str>,
    status_code: u16,
    message: Option<String>,
    info: Option<String>,
}

impl ApiError {
    /// Replace status, message and info in one step.
    #[must_use]
    pub fn with(self, status_code: u16, message: Option<&str>, info: Option<&str>) -> Self {
        Self {
            status_code,
            message: message.map(str::to_string),
            info: info.map(str::to_string),
            ..self
        }
    }

    #[must_use]
    pub fn with_status(self, status_code: u16) -> Self {
        Self {
            status_code,
            ..self
        }
    }

    /// Set the message sent to the client.
    #[must_use]
    pub fn with_message(self, message: &str) -> Self {
        Self {
            message: Some(message.to_string()),
            ..self
        }
    }

    /// Set diagnostic detail that only ever reaches the logs.
    #[must_use]
    pub fn with_info(self, info: &str) -> Self {
        Self {
            info: Some(info.to_string()),
            ..self
        }
    }

    #[must_use]
    pub fn module(&self) -> &str {
        &self.module
    }

    #[must_use]
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    #[must_use]
    pub fn info(&self) -> Option<&str> {
        self.info.as_deref()
    }
}
