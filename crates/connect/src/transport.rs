//! axum boundary.
//!
//! Everything that touches axum types lives here: building a [`RequestView`] from an axum
//! request, writing a [`Reply`] as an axum response, and running a [`Connected`] controller as
//! an axum handler.

use crate::connect::Connected;
use crate::controller::Controller;
use crate::error::{ConnectError, Result};
use crate::reply::{Reply, ReplyBody, ResponseSink};
use crate::request::{RequestView, append};
use axum::Json;
use axum::body::to_bytes;
use axum::extract::{FromRequestParts, RawPathParams, Request};
use axum::handler::Handler;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use futures::FutureExt as _;
use futures::future::BoxFuture;
use mime::Mime;
use serde_json::{Map, Value, json};

/// Handler marker for connected controllers.
#[doc(hidden)]
pub struct ConnectedHandler;

impl<C, T, S> Handler<(ConnectedHandler, T), S> for Connected<C, T>
where
    C: Controller<T>,
    T: 'static,
    S: Clone + Send + Sync + 'static,
{
    type Future = BoxFuture<'static, Response>;

    fn call(self, req: Request, _state: S) -> Self::Future {
        async move {
            // Misconfigured routes are forwarded before the body is even read.
            if let Err(err) = &self.mapping {
                return self.forward(err.clone().into());
            }
            let view = match read_request(req, self.options.body_limit).await {
                Ok(view) => view,
                Err(err) => return self.forward(err),
            };
            match self.dispatch(&view).await {
                Ok(reply) => reply.into_response(),
                Err(err) => self.forward(err),
            }
        }
        .boxed()
    }
}

impl<C, T> Connected<C, T> {
    fn forward(&self, err: ConnectError) -> Response {
        if err.is_configuration() {
            tracing::error!(error = %err, "route is misconfigured");
        } else {
            tracing::warn!(error = %err, "unreadable request");
        }
        match &self.next {
            Some(next) => next(err),
            None => err.into_response(),
        }
    }
}

/// Build a [`RequestView`] from an axum request.
///
/// Path parameters are only present when the request went through a router. Query pairs and
/// form fields with repeated names collect into arrays. JSON bodies are parsed, other UTF-8
/// bodies become strings, anything else is `null`.
///
/// # Errors
///
/// Returns an error if the body cannot be read within `body_limit` bytes or if a JSON body
/// does not parse.
pub async fn read_request(req: Request, body_limit: usize) -> Result<RequestView> {
    let (mut parts, body) = req.into_parts();

    let mut view = RequestView::builder()
        .method(parts.method.as_str())
        .path(parts.uri.path());

    if let Ok(params) = RawPathParams::from_request_parts(&mut parts, &()).await {
        for (name, value) in params.iter() {
            view = view.param(name, value);
        }
    }
    if let Some(query) = parts.uri.query() {
        for (name, value) in url::form_urlencoded::parse(query.as_bytes()) {
            view = view.query(name, value);
        }
    }
    for (name, value) in &parts.headers {
        if let Ok(value) = value.to_str() {
            view = view.header(name.as_str(), value);
        }
    }

    let bytes = to_bytes(body, body_limit)
        .await
        .map_err(|e| ConnectError::UnreadableBody(e.to_string()))?;
    let content_type = parts
        .headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<Mime>().ok());

    Ok(view.body(parse_body(content_type.as_ref(), &bytes)?).build())
}

fn parse_body(content_type: Option<&Mime>, bytes: &[u8]) -> Result<Value> {
    if bytes.is_empty() {
        return Ok(Value::Null);
    }
    match content_type {
        Some(mime) if is_json(mime) => Ok(serde_json::from_slice(bytes)?),
        Some(mime) if is_form(mime) => {
            let mut fields = Map::new();
            for (name, value) in url::form_urlencoded::parse(bytes) {
                append(&mut fields, name.into_owned(), value.into_owned());
            }
            Ok(Value::Object(fields))
        }
        _ => Ok(std::str::from_utf8(bytes)
            .map_or(Value::Null, |text| Value::String(text.to_string()))),
    }
}

fn is_json(mime: &Mime) -> bool {
    mime.type_() == mime::APPLICATION
        && (mime.subtype() == mime::JSON || mime.suffix() == Some(mime::JSON))
}

fn is_form(mime: &Mime) -> bool {
    mime.essence_str() == mime::APPLICATION_WWW_FORM_URLENCODED.essence_str()
}

/// [`ResponseSink`] collecting an axum response.
#[derive(Debug)]
struct ResponseWriter {
    status: StatusCode,
    body: Option<ReplyBody>,
}

impl ResponseWriter {
    fn new() -> Self {
        Self {
            status: StatusCode::OK,
            body: None,
        }
    }

    fn finish(self) -> Response {
        match self.body {
            None => self.status.into_response(),
            Some(ReplyBody::Json(value)) => (self.status, Json(value)).into_response(),
            Some(ReplyBody::Text(text)) => (self.status, text).into_response(),
        }
    }
}

impl ResponseSink for ResponseWriter {
    fn status(&mut self, status: u16) {
        self.status = status_code(status);
    }

    fn send(&mut self, body: ReplyBody) {
        self.body = Some(body);
    }

    fn send_status(&mut self, status: u16) {
        self.status = status_code(status);
        self.body = None;
    }
}

/// Final status for a reply. Codes HTTP cannot carry, and informational 1xx codes (which
/// cannot end a response), go out as a 500.
fn status_code(status: u16) -> StatusCode {
    match StatusCode::from_u16(status) {
        Ok(code) if !code.is_informational() => code,
        _ => {
            tracing::warn!(status, "unusable status code, answering 500 instead");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        let mut writer = ResponseWriter::new();
        self.write_to(&mut writer);
        writer.finish()
    }
}

/// Default `next`: configuration problems are the server's fault (500), body problems the
/// client's (400).
impl IntoResponse for ConnectError {
    fn into_response(self) -> Response {
        let status = if self.is_configuration() {
            StatusCode::INTERNAL_SERVER_ERROR
        } else {
            StatusCode::BAD_REQUEST
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
