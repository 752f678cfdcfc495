use anyhow::Context as _;
use axum::Router;
use axum::http::StatusCode;
use axum::response::IntoResponse as _;
use axum::routing::{get, post};
use plainroute_connect::{ApiErrors, ConnectError, MapRequestToArgs, RequestView, connect};
use plainroute_test_support::serve;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};

const ORDERS: ApiErrors = ApiErrors::new("orders");

#[tokio::test]
async fn path_parameter_reaches_the_controller() -> anyhow::Result<()> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_in = Arc::clone(&seen);
    let app = Router::new().route(
        "/{id}",
        get(connect("req.params.id").to(move |id: String| {
            seen_in.lock().expect("lock").push(id);
            async { anyhow::Ok(json!({"payload": "data"})) }
        })),
    );
    let server = serve(app).await?;

    let resp = reqwest::get(server.url("/123")).await.context("GET /123")?;
    assert_eq!(resp.status(), reqwest::StatusCode::OK);
    let body: Value = resp.json().await.context("json body")?;
    assert_eq!(body, json!({"payload": "data"}));
    assert_eq!(*seen.lock().expect("lock"), vec!["123".to_string()]);
    Ok(())
}

#[tokio::test]
async fn invalid_mapping_goes_to_next() -> anyhow::Result<()> {
    let called = Arc::new(Mutex::new(false));
    let called_in = Arc::clone(&called);
    let app = Router::new().route(
        "/{id}",
        get(connect(json!(42))
            .to(move |_: Value| {
                *called_in.lock().expect("lock") = true;
                async { anyhow::Ok(()) }
            })
            .next(|err: ConnectError| {
                (StatusCode::SERVICE_UNAVAILABLE, format!("next: {err}")).into_response()
            })),
    );
    let server = serve(app).await?;

    let resp = reqwest::get(server.url("/1")).await.context("GET /1")?;
    assert_eq!(resp.status(), reqwest::StatusCode::SERVICE_UNAVAILABLE);
    let text = resp.text().await?;
    assert!(text.starts_with("next: "), "{text}");
    assert!(text.contains("must be one of"), "{text}");
    assert!(!*called.lock().expect("lock"));
    Ok(())
}

#[tokio::test]
async fn invalid_mapping_without_next_answers_500() -> anyhow::Result<()> {
    let app = Router::new().route(
        "/",
        get(connect(None::<&str>).to(|| async { anyhow::Ok(()) })),
    );
    let server = serve(app).await?;

    let resp = reqwest::get(server.url("/")).await?;
    assert_eq!(resp.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = resp.json().await?;
    let message = body["error"].as_str().context("error message")?;
    assert!(message.contains("must be one of"), "{message}");
    Ok(())
}

#[tokio::test]
async fn api_error_is_answered_with_its_status_and_message() -> anyhow::Result<()> {
    let app = Router::new().route(
        "/{id}",
        get(connect("params.id").to(|_: String| async {
            Err::<(), anyhow::Error>(
                ORDERS
                    .forbidden(Some("nope"), Some("order belongs to another tenant"))
                    .into(),
            )
        })),
    );
    let server = serve(app).await?;

    let resp = reqwest::get(server.url("/7")).await?;
    assert_eq!(resp.status(), reqwest::StatusCode::FORBIDDEN);
    assert_eq!(resp.text().await?, "nope");
    Ok(())
}

#[tokio::test]
async fn unclassified_error_is_a_500_with_the_serialized_error() -> anyhow::Result<()> {
    let app = Router::new().route(
        "/",
        get(connect(["query.a"])
            .to(|_: Value| async { Err::<(), _>(anyhow::anyhow!("ledger offline")) })),
    );
    let server = serve(app).await?;

    let resp = reqwest::get(server.url("/")).await?;
    assert_eq!(resp.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = resp.json().await?;
    assert_eq!(body, json!({"message": "ledger offline"}));
    Ok(())
}

#[tokio::test]
async fn json_body_fields_map_positionally() -> anyhow::Result<()> {
    let app = Router::new().route(
        "/orders",
        post(
            connect(["req.body.id", "req.body.name"])
                .success_status(201)
                .to(|id: u64, name: String| async move {
                    anyhow::Ok(json!({"id": id, "name": name}))
                }),
        ),
    );
    let server = serve(app).await?;

    let resp = reqwest::Client::new()
        .post(server.url("/orders"))
        .json(&json!({"id": 1234, "name": "samsung"}))
        .send()
        .await?;
    assert_eq!(resp.status(), reqwest::StatusCode::CREATED);
    let body: Value = resp.json().await?;
    assert_eq!(body, json!({"id": 1234, "name": "samsung"}));
    Ok(())
}

#[tokio::test]
async fn form_body_and_query_reach_an_extractor() -> anyhow::Result<()> {
    let extractor = MapRequestToArgs::extractor(|req: &RequestView| {
        vec![
            req.get("body.title").cloned().unwrap_or(Value::Null),
            req.get("query.lang").cloned().unwrap_or(Value::Null),
        ]
    });
    let app = Router::new().route(
        "/titles",
        post(connect(extractor).to(|title: String, lang: Option<String>| async move {
            anyhow::Ok(format!("{title} ({})", lang.unwrap_or_default()))
        })),
    );
    let server = serve(app).await?;

    let resp = reqwest::Client::new()
        .post(server.url("/titles?lang=en"))
        .header("content-type", "application/x-www-form-urlencoded")
        .body("title=hello+world")
        .send()
        .await?;
    assert_eq!(resp.status(), reqwest::StatusCode::OK);
    assert_eq!(resp.text().await?, "hello world (en)");
    Ok(())
}

#[tokio::test]
async fn empty_result_sends_status_only() -> anyhow::Result<()> {
    let app = Router::new().route(
        "/{id}",
        axum::routing::delete(
            connect("params.id")
                .success_status(204)
                .to(|_: String| async { anyhow::Ok(()) }),
        ),
    );
    let server = serve(app).await?;

    let resp = reqwest::Client::new()
        .delete(server.url("/9"))
        .send()
        .await?;
    assert_eq!(resp.status(), reqwest::StatusCode::NO_CONTENT);
    assert!(resp.bytes().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn malformed_json_body_is_a_bad_request() -> anyhow::Result<()> {
    let app = Router::new().route(
        "/",
        post(connect("body").to(|_: Value| async { anyhow::Ok("unreachable") })),
    );
    let server = serve(app).await?;

    let resp = reqwest::Client::new()
        .post(server.url("/"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await?;
    assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn oversized_body_is_a_bad_request() -> anyhow::Result<()> {
    let app = Router::new().route(
        "/",
        post(
            connect("body")
                .body_limit(8)
                .to(|_: Value| async { anyhow::Ok("unreachable") }),
        ),
    );
    let server = serve(app).await?;

    let resp = reqwest::Client::new()
        .post(server.url("/"))
        .header("content-type", "text/plain")
        .body("far more than eight bytes")
        .send()
        .await?;
    assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn informational_api_error_status_goes_out_as_500_with_message() -> anyhow::Result<()> {
    let app = Router::new().route(
        "/{status}",
        get(connect("params.status").to(|status: String| async move {
            let status: u16 = status.parse()?;
            Err::<(), anyhow::Error>(ORDERS.with(status, Some("msg"), None).into())
        })),
    );
    let server = serve(app).await?;

    for status in ["100", "101", "103", "1000"] {
        let resp = reqwest::get(server.url(&format!("/{status}"))).await?;
        assert_eq!(
            resp.status(),
            reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            "status {status}"
        );
        assert_eq!(resp.text().await?, "msg", "status {status}");
    }

    let resp = reqwest::get(server.url("/409")).await?;
    assert_eq!(resp.status(), reqwest::StatusCode::CONFLICT);
    assert_eq!(resp.text().await?, "msg");
    Ok(())
}
