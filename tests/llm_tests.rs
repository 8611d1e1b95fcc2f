use mockito::{Matcher, Server};
use playscout::pipeline::PackageResolver;
use playscout::{AppCandidate, GeminiClient};
use pretty_assertions::assert_eq;
use serde_json::json;

mod common;
use common::test_helpers::*;

const GENERATE_PATH: &str = "/v1beta/models/gemini-2.0-flash:generateContent";

fn reply_with_text(text: &str) -> String {
    json!({
        "candidates": [{
            "content": {
                "parts": [{"text": text}]
            }
        }]
    })
    .to_string()
}

fn test_client(base_url: &str) -> GeminiClient {
    GeminiClient::new(&test_config(base_url), "test-key", "gemini-2.0-flash").unwrap()
}

#[tokio::test]
async fn test_market_research_parses_fenced_json_array() {
    setup_test_logger();
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", GENERATE_PATH)
        .match_query(Matcher::UrlEncoded("key".into(), "test-key".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(reply_with_text(
            "```json\n[{\"package\": \"com.fit.app\", \"name\": \"FitApp\", \"weight\": 1.0}]\n```",
        ))
        .create_async()
        .await;

    let client = test_client(&server.url());
    let apps = client.market_research("fitness tracking", "DE").await;

    assert_eq!(
        apps,
        vec![AppCandidate {
            package: "com.fit.app".to_string(),
            name: "FitApp".to_string(),
            weight: 1.0,
        }]
    );
    mock.assert_async().await;
}

#[tokio::test]
async fn test_market_research_provider_error_yields_empty_list() {
    setup_test_logger();
    let mut server = Server::new_async().await;
    server
        .mock("POST", GENERATE_PATH)
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;

    let client = test_client(&server.url());
    assert!(client.market_research("fitness", "US").await.is_empty());
}

#[tokio::test]
async fn test_market_research_malformed_reply_yields_empty_list() {
    setup_test_logger();
    let mut server = Server::new_async().await;
    server
        .mock("POST", GENERATE_PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(reply_with_text("Sure! Here are some great apps for you:"))
        .create_async()
        .await;

    let client = test_client(&server.url());
    assert!(client.market_research("fitness", "US").await.is_empty());
}

#[tokio::test]
async fn test_resolve_package_id_from_mapping_reply() {
    setup_test_logger();
    let mut server = Server::new_async().await;
    server
        .mock("POST", GENERATE_PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(reply_with_text("```json\n{\"FitApp\": \"com.fit.app\"}\n```"))
        .create_async()
        .await;

    let client = test_client(&server.url());
    let package = client.resolve_package_id("FitApp").await;

    assert_eq!(package, Some("com.fit.app".to_string()));
}

#[tokio::test]
async fn test_resolve_package_id_falls_back_to_raw_text() {
    setup_test_logger();
    let mut server = Server::new_async().await;
    server
        .mock("POST", GENERATE_PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(reply_with_text("  com.fit.app  "))
        .create_async()
        .await;

    let client = test_client(&server.url());
    let package = client.resolve_package_id("FitApp").await;

    assert_eq!(package, Some("com.fit.app".to_string()));
}

#[tokio::test]
async fn test_resolve_package_id_transport_error_yields_none() {
    setup_test_logger();
    let mut server = Server::new_async().await;
    server
        .mock("POST", GENERATE_PATH)
        .match_query(Matcher::Any)
        .with_status(503)
        .create_async()
        .await;

    let client = test_client(&server.url());
    assert_eq!(client.resolve_package_id("FitApp").await, None);
}

#[tokio::test]
async fn test_list_models() {
    setup_test_logger();
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/v1beta/models")
        .match_query(Matcher::UrlEncoded("key".into(), "test-key".into()))
        .with_status(200)
        .with_body(
            json!({
                "models": [
                    {"name": "models/gemini-2.0-flash"},
                    {"name": "models/gemini-2.5-pro"}
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = test_client(&server.url());
    let models = client.list_models().await.unwrap();

    assert_eq!(
        models,
        vec![
            "models/gemini-2.0-flash".to_string(),
            "models/gemini-2.5-pro".to_string()
        ]
    );
    mock.assert_async().await;
}

#[tokio::test]
async fn test_list_models_provider_error() {
    setup_test_logger();
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/v1beta/models")
        .match_query(Matcher::Any)
        .with_status(403)
        .create_async()
        .await;

    let client = test_client(&server.url());
    assert!(client.list_models().await.is_err());
}
