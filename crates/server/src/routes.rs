//! HTTP surface of the notes service. Every route except `/health` goes through `connect`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use plainroute_connect::{
    Connect, ConnectError, IntoMapping, MapRequestToArgs, RequestView, connect,
};
use serde_json::{Value, json};

use crate::config::ServerConfig;
use crate::notes::{self, NoteStore};

/// Routes whose argument mapping can be overridden in the config file.
pub const ROUTE_NAMES: &[&str] = &["listNotes", "getNote", "createNote", "deleteNote", "boom"];

pub fn router(store: NoteStore, config: &ServerConfig) -> Router {
    let list = {
        let store = store.clone();
        route(config, "listNotes", MapRequestToArgs::extractor(limit))
            .to(move |limit: Option<usize>| store.clone().list(limit))
            .next(forwarded)
    };
    let get_note = {
        let store = store.clone();
        route(config, "getNote", MapRequestToArgs::path("req.params.id"))
            .to(move |id: String| store.clone().get(id))
            .next(forwarded)
    };
    let create = {
        let store = store.clone();
        route(
            config,
            "createNote",
            MapRequestToArgs::paths(["body.title", "body.text"]),
        )
        .success_status(201)
        .to(move |title: Option<String>, text: Option<String>| store.clone().create(title, text))
        .next(forwarded)
    };
    let delete = route(config, "deleteNote", MapRequestToArgs::path("params.id"))
        .success_status(204)
        .to(move |id: String| store.clone().delete(id))
        .next(forwarded);
    let boom = route(config, "boom", MapRequestToArgs::Paths(Vec::new()))
        .to(notes::boom)
        .next(forwarded);

    Router::new()
        .route("/health", get(health))
        .route("/notes", get(list).post(create))
        .route("/notes/{id}", get(get_note).delete(delete))
        .route("/boom", get(boom))
}

/// First stage for a named route: the config override if there is one, otherwise `default`.
fn route(config: &ServerConfig, name: &str, default: MapRequestToArgs) -> Connect {
    let first = match config.routes.get(name) {
        Some(mapping) => {
            if let Err(e) = mapping.clone().into_mapping() {
                tracing::warn!(route = name, error = %e, "route override is invalid");
            }
            connect(mapping.clone())
        }
        None => connect(default),
    };
    first.options(config.connect)
}

/// `?limit=N`, ignored when it is not a number.
fn limit(req: &RequestView) -> Vec<Value> {
    let limit = req
        .get("query.limit")
        .and_then(Value::as_str)
        .and_then(|v| v.parse::<usize>().ok());
    vec![json!(limit)]
}

async fn health() -> Json<Value> {
    Json(json!({ "ok": true }))
}

/// Failures the adapter forwards instead of answering: a misconfigured route or an
/// unreadable request.
fn forwarded(err: ConnectError) -> Response {
    let (status, kind) = if err.is_configuration() {
        (StatusCode::INTERNAL_SERVER_ERROR, "configuration")
    } else {
        (StatusCode::BAD_REQUEST, "request")
    };
    (
        status,
        Json(json!({ "error": { "kind": kind, "message": err.to_string() } })),
    )
        .into_response()
}
