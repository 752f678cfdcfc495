//! Connect plain controller functions to axum routes.
//!
//! A controller is an ordinary (async) function taking positional arguments and returning a
//! serializable value. [`connect`] describes how those arguments are pulled out of the
//! incoming request and how the controller's outcome is turned into a response:
//!
//! ```ignore
//! router.route("/notes/{id}", get(connect("req.params.id").to(get_note)));
//! router.route("/notes", post(connect(["body.title", "body.text"]).success_status(201).to(create_note)));
//! ```
//!
//! Controllers reject requests deliberately with an [`ApiError`]; anything else they fail with
//! is answered with a 500.

pub mod api_error;
pub mod connect;
pub mod controller;
pub mod error;
pub mod mapping;
pub mod options;
pub mod reply;
pub mod request;
pub mod transport;

pub use api_error::{ApiError, ApiErrors};
pub use connect::{Connect, Connected, connect};
pub use controller::Controller;
pub use error::{ConfigurationError, ConnectError};
pub use mapping::{IntoMapping, MapRequestToArgs};
pub use options::{ConnectOptions, InternalErrors};
pub use reply::{Reply, ReplyBody, ResponseSink};
pub use request::RequestView;
