mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::Value;

#[tokio::test]
async fn health_endpoint_reports_store_ok() -> Result<()> {
    let server = common::spawn_server().await?;

    let res = server.client.get(server.url("/health")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Successful");
    assert_eq!(body["data"]["database"], "ok");
    Ok(())
}

#[tokio::test]
async fn root_returns_welcome_envelope() -> Result<()> {
    let server = common::spawn_server().await?;

    let body: Value = server.client.get(server.url("/")).send().await?.json().await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["name"], "Mini Blog API");
    Ok(())
}

#[tokio::test]
async fn unknown_routes_return_enveloped_404() -> Result<()> {
    let server = common::spawn_server().await?;

    let res = server.client.get(server.url("/api/nope")).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let body: Value = res.json().await?;
    assert_eq!(body["message"], "API route not found");
    assert_eq!(body["success"], false);
    assert!(body["data"].is_null());
    Ok(())
}

#[tokio::test]
async fn openapi_document_describes_the_api() -> Result<()> {
    let server = common::spawn_server().await?;

    let res = server.client.get(server.url("/api-docs")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let doc: Value = res.json().await?;
    assert!(doc["openapi"].as_str().unwrap_or_default().starts_with("3."));
    assert_eq!(doc["info"]["title"], "Mini Blog API");
    assert!(doc["paths"]["/api/auth/register"]["post"].is_object());
    assert!(doc["paths"]["/api/posts/{id}"]["put"].is_object());
    assert!(doc["paths"]["/api/posts/{id}"]["delete"].is_object());
    assert_eq!(
        doc["components"]["securitySchemes"]["bearer_auth"]["scheme"],
        "bearer"
    );
    assert!(doc["components"]["schemas"]["PostWithAuthor"].is_object());
    Ok(())
}
