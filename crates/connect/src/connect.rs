//! The two-stage adapter: `connect(mapping)` then `.to(controller)`.
//!
//! The connected handler:
//! 1. resolves the controller's arguments from the request (an invalid mapping is forwarded to
//!    the `next` continuation, the controller is not called),
//! 2. awaits the controller,
//! 3. answers success with the configured status (status only when the result is empty),
//! 4. answers an [`ApiError`] with its status and message, and any other failure with a 500.
//!
//! No state is shared between invocations.

use crate::api_error::ApiError;
use crate::controller::Controller;
use crate::error::{ConfigurationError, ConnectError};
use crate::mapping::{IntoMapping, MapRequestToArgs};
use crate::options::{ConnectOptions, InternalErrors};
use crate::reply::{Reply, ReplyBody};
use crate::request::RequestView;
use axum::response::Response;
use serde_json::{Value, json};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Continuation receiving failures the adapter does not answer itself.
pub type Next = Arc<dyn Fn(ConnectError) -> Response + Send + Sync>;

/// First stage: fix the argument mapping (and options).
///
/// The mapping is validated here but an invalid one is only reported when a request arrives,
/// through the handler's `next` continuation.
#[must_use]
pub fn connect<M: IntoMapping>(mapping: M) -> Connect {
    Connect {
        mapping: mapping.into_mapping(),
        options: ConnectOptions::default(),
    }
}

#[derive(Debug, Clone)]
pub struct Connect {
    mapping: Result<MapRequestToArgs, ConfigurationError>,
    options: ConnectOptions,
}

impl Connect {
    #[must_use]
    pub fn success_status(mut self, status: u16) -> Self {
        self.options.success_status = status;
        self
    }

    #[must_use]
    pub fn internal_errors(mut self, internal_errors: InternalErrors) -> Self {
        self.options.internal_errors = internal_errors;
        self
    }

    #[must_use]
    pub fn body_limit(mut self, body_limit: usize) -> Self {
        self.options.body_limit = body_limit;
        self
    }

    /// Replace all options at once, e.g. with values read from a config file.
    #[must_use]
    pub fn options(mut self, options: ConnectOptions) -> Self {
        self.options = options;
        self
    }

    /// Second stage: bind the controller.
    pub fn to<C, T>(self, controller: C) -> Connected<C, T>
    where
        C: Controller<T>,
    {
        Connected {
            mapping: self.mapping,
            options: self.options,
            controller,
            next: None,
            _marker: PhantomData,
        }
    }
}

/// A controller bound to its argument mapping. Used as an axum handler.
pub struct Connected<C, T> {
    pub(crate) mapping: Result<MapRequestToArgs, ConfigurationError>,
    pub(crate) options: ConnectOptions,
    controller: C,
    pub(crate) next: Option<Next>,
    _marker: PhantomData<fn() -> T>,
}

impl<C: Clone, T> Clone for Connected<C, T> {
    fn clone(&self) -> Self {
        Self {
            mapping: self.mapping.clone(),
            options: self.options,
            controller: self.controller.clone(),
            next: self.next.clone(),
            _marker: PhantomData,
        }
    }
}

impl<C, T> fmt::Debug for Connected<C, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connected")
            .field("mapping", &self.mapping)
            .field("options", &self.options)
            .field("next", &self.next.is_some())
            .finish_non_exhaustive()
    }
}

impl<C, T> Connected<C, T>
where
    C: Controller<T>,
{
    /// Install the continuation that receives forwarded failures (invalid mapping, unreadable
    /// body). Without one, [`ConnectError`]'s own response is used.
    #[must_use]
    pub fn next<F>(mut self, next: F) -> Self
    where
        F: Fn(ConnectError) -> Response + Send + Sync + 'static,
    {
        self.next = Some(Arc::new(next));
        self
    }

    /// Resolve the controller's arguments for `req`.
    ///
    /// # Errors
    ///
    /// Returns the configuration error if the route was connected with an invalid mapping.
    pub fn arguments(&self, req: &RequestView) -> Result<Vec<Value>, ConfigurationError> {
        let mapping = self.mapping.as_ref().map_err(Clone::clone)?;
        Ok(mapping.resolve(req))
    }

    /// Run one request through mapping, controller and outcome translation.
    ///
    /// # Errors
    ///
    /// Returns an error (to be forwarded to `next`) if the mapping is invalid. The controller is
    /// not invoked in that case.
    pub async fn dispatch(&self, req: &RequestView) -> crate::error::Result<Reply> {
        let args = self.arguments(req)?;
        let outcome = self.controller.invoke(args).await;
        Ok(settle(outcome, &self.options))
    }
}

/// Translate a controller outcome into a reply.
fn settle(outcome: anyhow::Result<Value>, options: &ConnectOptions) -> Reply {
    match outcome {
        Ok(value) => Reply::from_value(options.success_status, value),
        Err(err) => match err.downcast_ref::<ApiError>() {
            Some(api) => rejected(api),
            None => unclassified(&err, options.internal_errors),
        },
    }
}

fn rejected(api: &ApiError) -> Reply {
    tracing::debug!(
        module = api.module(),
        status = api.status_code(),
        info = api.info(),
        "controller rejected request"
    );
    Reply {
        status: api.status_code(),
        body: api.message().map(|m| ReplyBody::Text(m.to_string())),
    }
}

fn unclassified(err: &anyhow::Error, internal_errors: InternalErrors) -> Reply {
    tracing::error!(error = ?err, "controller failed");
    let body = match internal_errors {
        InternalErrors::Expose => {
            let causes: Vec<String> = err.chain().skip(1).map(ToString::to_string).collect();
            if causes.is_empty() {
                json!({ "message": err.to_string() })
            } else {
                json!({ "message": err.to_string(), "causes": causes })
            }
        }
        InternalErrors::Conceal => json!({ "message": "Internal Server Error" }),
    };
    Reply::with_body(500, ReplyBody::Json(body))
}
