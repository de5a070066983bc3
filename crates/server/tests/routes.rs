use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use configs::ServerConfig;
use serde_json::{json, Value};
use service::storage::memory_store::PayloadStore;
use tower::Service;

fn build_app() -> Router {
    server::build_app(&ServerConfig::default(), PayloadStore::new())
}

async fn post_upload(app: &Router, body: impl Into<Body>) -> anyhow::Result<(StatusCode, Value)> {
    let req = Request::builder()
        .method("POST")
        .uri("/upload")
        .header("content-type", "application/json")
        .body(body.into())?;
    let resp = app.clone().call(req).await?;
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
    Ok((status, serde_json::from_slice(&bytes)?))
}

async fn get_data(app: &Router) -> anyhow::Result<Vec<Value>> {
    let req = Request::builder().method("GET").uri("/data").body(Body::empty())?;
    let resp = app.clone().call(req).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[tokio::test]
async fn fresh_instance_has_no_data() -> anyhow::Result<()> {
    let app = build_app();
    assert!(get_data(&app).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn upload_then_fetch_preserves_order() -> anyhow::Result<()> {
    let app = build_app();

    let (status, body) = post_upload(&app, r#"{"x": 1}"#).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "data received and stored", "total": 1}));

    let (status, body) = post_upload(&app, r#"{"y": 2}"#).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);

    let data = get_data(&app).await?;
    assert_eq!(data, vec![json!({"x": 1}), json!({"y": 2})]);
    Ok(())
}

#[tokio::test]
async fn each_upload_adds_exactly_one_item() -> anyhow::Result<()> {
    let app = build_app();
    post_upload(&app, r#"{"a": true}"#).await?;
    let before = get_data(&app).await?.len();

    let (_, body) = post_upload(&app, r#"{"b": [1, 2, 3]}"#).await?;
    let after = get_data(&app).await?;

    assert_eq!(after.len(), before + 1);
    assert_eq!(body["total"].as_u64(), Some(after.len() as u64));
    Ok(())
}

#[tokio::test]
async fn empty_body_is_rejected_without_storing() -> anyhow::Result<()> {
    let app = build_app();
    post_upload(&app, r#"{"keep": 1}"#).await?;

    let (status, body) = post_upload(&app, Body::empty()).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "no JSON data received"}));

    assert_eq!(get_data(&app).await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn malformed_json_is_rejected_without_storing() -> anyhow::Result<()> {
    let app = build_app();

    let (status, body) = post_upload(&app, "this is not json").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let msg = body["error"].as_str().unwrap_or_default();
    assert!(msg.starts_with("invalid JSON payload"), "unexpected error message: {msg}");

    assert!(get_data(&app).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn scalars_and_arrays_are_stored_verbatim() -> anyhow::Result<()> {
    let app = build_app();
    post_upload(&app, "[1, \"two\", null]").await?;
    post_upload(&app, "3.5").await?;
    assert_eq!(get_data(&app).await?, vec![json!([1, "two", null]), json!(3.5)]);
    Ok(())
}

#[tokio::test]
async fn falsy_json_values_are_stored() -> anyhow::Result<()> {
    let app = build_app();
    let bodies = ["false", "0", "\"\"", "[]", "{}", "null"];
    for (i, body) in bodies.iter().enumerate() {
        let (status, ack) = post_upload(&app, *body).await?;
        assert_eq!(status, StatusCode::OK, "body {body} was rejected");
        assert_eq!(ack["total"].as_u64(), Some(i as u64 + 1));
    }
    assert_eq!(
        get_data(&app).await?,
        vec![json!(false), json!(0), json!(""), json!([]), json!({}), Value::Null]
    );
    Ok(())
}

#[tokio::test]
async fn missing_content_type_is_still_parsed() -> anyhow::Result<()> {
    let app = build_app();
    let req = Request::builder()
        .method("POST")
        .uri("/upload")
        .body(Body::from(r#"{"lat": 48.85, "lon": 2.35}"#))?;
    let resp = app.clone().call(req).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(get_data(&app).await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn oversized_body_is_refused() -> anyhow::Result<()> {
    let cfg = ServerConfig { max_body_bytes: 16, ..ServerConfig::default() };
    let app = server::build_app(&cfg, PayloadStore::new());

    let big = format!(r#"{{"blob": "{}"}}"#, "x".repeat(64));
    let req = Request::builder().method("POST").uri("/upload").body(Body::from(big))?;
    let resp = app.clone().call(req).await?;
    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(get_data(&app).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn new_store_means_empty_data() -> anyhow::Result<()> {
    let first = build_app();
    post_upload(&first, r#"{"x": 1}"#).await?;
    assert_eq!(get_data(&first).await?.len(), 1);

    let restarted = build_app();
    assert!(get_data(&restarted).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn health_and_metrics_are_served() -> anyhow::Result<()> {
    let app = build_app();

    let req = Request::builder().uri("/health").body(Body::empty())?;
    let resp = app.clone().call(req).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
    assert_eq!(serde_json::from_slice::<Value>(&bytes)?, json!({"status": "ok"}));

    post_upload(&app, r#"{"m": 1}"#).await?;
    let req = Request::builder().uri("/metrics").body(Body::empty())?;
    let resp = app.clone().call(req).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
    let text = String::from_utf8(bytes.to_vec())?;
    assert!(text.contains("json_inbox_uploads_total"));
    Ok(())
}
