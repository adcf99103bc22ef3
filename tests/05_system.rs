mod common;

use anyhow::Result;
use axum::http::StatusCode;

use common::TestApp;

#[tokio::test]
async fn health_reports_store_status() -> Result<()> {
    let app = TestApp::new();

    let res = app.get("/health", None).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["status"], "ok");
    assert_eq!(res.body["database"], "ok");
    assert!(res.body["timestamp"].is_string());
    Ok(())
}

#[tokio::test]
async fn root_lists_endpoints() -> Result<()> {
    let app = TestApp::new();

    let res = app.get("/", None).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["name"], "Xchange API");
    assert_eq!(res.body["version"], env!("CARGO_PKG_VERSION"));
    assert!(res.body["endpoints"]["register"]
        .as_str()
        .unwrap()
        .contains("/user/general"));
    Ok(())
}
