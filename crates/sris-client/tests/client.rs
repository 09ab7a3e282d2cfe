//! Integration tests for `ApiClient` using wiremock HTTP mocks.

use serde_json::json;
use sris_client::{ApiClient, ClientError};
use sris_core::{ContractStatus, SourceStatus};
use wiremock::matchers::{body_json, body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> ApiClient {
    ApiClient::with_base_url(base_url, 5, 5, "sris-test/0.1")
        .expect("client construction should not fail")
}

// ---------------------------------------------------------------------------
// Intelligence
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_intelligence_returns_parsed_items() {
    let server = MockServer::start().await;

    let body = json!([
        {
            "id": "i-1",
            "source_id": "s-1",
            "source_url": "https://news.example.com/a",
            "title": "Port strike",
            "title_zh": "港口罢工",
            "publish_date": "2025-03-01",
            "content_type": "news",
            "summary": "Dock workers walk out",
            "risk_tags": ["labour", "logistics"],
            "risk_hint": "高风险",
            "original_text": "...",
            "translated_text": "...",
            "relevance_score": 0.9
        },
        { "id": "i-2", "source_id": "s-2", "summary": null, "risk_hint": null }
    ]);

    Mock::given(method("GET"))
        .and(path("/api/intelligence/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let items = test_client(&server.uri())
        .list_intelligence()
        .await
        .expect("should parse items");

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].id, "i-1");
    assert_eq!(items[0].risk_hint.as_deref(), Some("高风险"));
    assert_eq!(items[0].risk_tags.as_ref().map(Vec::len), Some(2));
    assert!(items[1].summary.is_none());
}

#[tokio::test]
async fn list_intelligence_rejects_item_without_id() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/intelligence/list"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{ "source_id": "s-1" }])),
        )
        .mount(&server)
        .await;

    let result = test_client(&server.uri()).list_intelligence().await;
    assert!(
        matches!(result, Err(ClientError::Deserialize { ref context, .. }) if context == "intelligence/list"),
        "expected Deserialize error, got: {result:?}"
    );
}

#[tokio::test]
async fn add_source_sends_url_as_query_param() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/intelligence/source"))
        .and(query_param("url", "https://news.example.com/list?page=1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "processing",
            "source_id": "s-9",
            "message": "Source added, processing in background"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let receipt = test_client(&server.uri())
        .add_source("https://news.example.com/list?page=1")
        .await
        .expect("should add source");

    assert_eq!(receipt.source_id.as_deref(), Some("s-9"));
    assert!(!receipt.already_exists());
}

#[tokio::test]
async fn delete_item_succeeds_on_200() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/intelligence/item/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "deleted" })))
        .expect(1)
        .mount(&server)
        .await;

    test_client(&server.uri())
        .delete_item("7")
        .await
        .expect("delete should succeed");
}

#[tokio::test]
async fn delete_item_treats_other_success_codes_as_failure() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/intelligence/item/7"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let result = test_client(&server.uri()).delete_item("7").await;
    assert!(
        matches!(result, Err(ClientError::UnexpectedStatus { status: 204, .. })),
        "expected UnexpectedStatus(204), got: {result:?}"
    );
}

#[tokio::test]
async fn delete_item_404_is_failure() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/intelligence/item/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "detail": "Item not found" })))
        .mount(&server)
        .await;

    let result = test_client(&server.uri()).delete_item("missing").await;
    assert!(matches!(result, Err(ClientError::UnexpectedStatus { status: 404, .. })));
}

#[tokio::test]
async fn batch_delete_posts_id_array() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/intelligence/batch-delete"))
        .and(body_json(json!(["1", "2", "3"])))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "status": "deleted", "count": 3 })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let ids = vec!["1".to_string(), "2".to_string(), "3".to_string()];
    let receipt = test_client(&server.uri())
        .batch_delete_items(&ids)
        .await
        .expect("batch delete should succeed");
    assert_eq!(receipt.count, Some(3));
}

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_sources_maps_backend_statuses() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/source/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "a", "url": "https://a.example", "status": "processing",
              "last_crawled_at": null, "error_message": null, "created_at": "2025-03-01T08:00:00" },
            { "id": "b", "url": "https://b.example", "status": "active",
              "last_crawled_at": "2025-03-01T09:00:00.5", "error_message": null, "created_at": null },
            { "id": "c", "url": "https://c.example", "status": "error",
              "last_crawled_at": null, "error_message": "Crawl failed", "created_at": null }
        ])))
        .mount(&server)
        .await;

    let sources = test_client(&server.uri())
        .list_sources()
        .await
        .expect("should parse sources");

    let statuses: Vec<SourceStatus> = sources.iter().map(|s| s.status).collect();
    assert_eq!(
        statuses,
        vec![SourceStatus::Processing, SourceStatus::Done, SourceStatus::Failed]
    );
    assert_eq!(sources[2].error_message.as_deref(), Some("Crawl failed"));
}

#[tokio::test]
async fn retry_source_posts_to_retry_path() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/source/s-1/retry"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "processing" })))
        .expect(1)
        .mount(&server)
        .await;

    test_client(&server.uri())
        .retry_source("s-1")
        .await
        .expect("retry should succeed");
}

#[tokio::test]
async fn batch_crawl_returns_started_count() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/source/batch-crawl"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "processing",
            "message": "Started crawling 4 sources in background",
            "count": 4
        })))
        .mount(&server)
        .await;

    let receipt = test_client(&server.uri())
        .batch_crawl()
        .await
        .expect("batch crawl should succeed");
    assert_eq!(receipt.count, 4);
}

#[tokio::test]
async fn update_source_url_puts_query_param() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/source/s-1"))
        .and(query_param("url", "https://new.example.com/feed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "updated" })))
        .expect(1)
        .mount(&server)
        .await;

    test_client(&server.uri())
        .update_source_url("s-1", "https://new.example.com/feed")
        .await
        .expect("update should succeed");
}

#[tokio::test]
async fn update_source_url_non_ok_is_failure() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/source/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let result = test_client(&server.uri())
        .update_source_url("gone", "https://x.example")
        .await;
    assert!(matches!(result, Err(ClientError::UnexpectedStatus { status: 404, .. })));
}

#[tokio::test]
async fn delete_source_server_error_is_failure() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/source/s-1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let result = test_client(&server.uri()).delete_source("s-1").await;
    assert!(matches!(result, Err(ClientError::UnexpectedStatus { status: 500, .. })));
}

// ---------------------------------------------------------------------------
// Contracts
// ---------------------------------------------------------------------------

#[tokio::test]
async fn upload_contract_sends_multipart_file_field() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/contract/upload"))
        .and(body_string_contains("name=\"file\""))
        .and(body_string_contains("filename=\"lease.pdf\""))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "task_id": "t-1", "status": "done" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let receipt = test_client(&server.uri())
        .upload_contract("lease.pdf", b"%PDF-1.4 lease".to_vec())
        .await
        .expect("upload should succeed");
    assert_eq!(receipt.task_id, "t-1");
}

#[tokio::test]
async fn contract_result_decodes_task_and_risks() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/contract/t-1/result"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "task": {
                "id": "t-1",
                "filename": "lease.pdf",
                "upload_time": "2025-03-01T08:00:00",
                "status": "done",
                "overall_risk_level": "High"
            },
            "risks": [
                {
                    "id": "r-1",
                    "task_id": "t-1",
                    "clause_id": "4.2",
                    "clause_text": "Tenant bears all losses",
                    "risk_category": "liability",
                    "risk_level": "High",
                    "risk_reason": "unbounded",
                    "explanation": "...",
                    "confidence": 0.8
                }
            ]
        })))
        .mount(&server)
        .await;

    let result = test_client(&server.uri())
        .contract_result("t-1")
        .await
        .expect("should parse result");

    assert_eq!(result.task.status, ContractStatus::Completed);
    assert_eq!(result.task.overall_risk_level.as_deref(), Some("High"));
    assert_eq!(result.risks.len(), 1);
    assert_eq!(result.risks[0].clause_id.as_deref(), Some("4.2"));
}

#[tokio::test]
async fn list_contract_tasks_returns_summaries() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/contract/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "t-2", "filename": "nda.docx", "status": "processing",
              "overall_risk_level": null, "created_at": "2025-03-02T08:00:00" },
            { "id": "t-1", "filename": "lease.pdf", "status": "failed",
              "overall_risk_level": null, "created_at": "2025-03-01T08:00:00" }
        ])))
        .mount(&server)
        .await;

    let tasks = test_client(&server.uri())
        .list_contract_tasks()
        .await
        .expect("should parse tasks");

    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].status, ContractStatus::Processing);
    assert_eq!(tasks[1].status, ContractStatus::Failed);
}

#[tokio::test]
async fn delete_contract_task_hits_task_path() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/contract/t-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "deleted" })))
        .expect(1)
        .mount(&server)
        .await;

    test_client(&server.uri())
        .delete_contract_task("t-1")
        .await
        .expect("delete should succeed");
}

#[tokio::test]
async fn service_status_reads_root_message() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Strategic Risk Intelligence System is Running"
        })))
        .mount(&server)
        .await;

    let status = test_client(&server.uri())
        .service_status()
        .await
        .expect("should parse status");
    assert!(status.message.contains("Running"));
}

#[tokio::test]
async fn non_json_body_is_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/source/list"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let result = test_client(&server.uri()).list_sources().await;
    assert!(matches!(result, Err(ClientError::Deserialize { .. })));
}
