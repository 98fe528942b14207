//! HTTP API tests over the in-memory pipeline

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use core_kernel::{AdapterHealth, HealthCheckResult, HealthCheckable};
use domain_claims::ClaimStatus;
use interface_api::{create_router, ApiConfig, AppState};
use test_utils::*;

fn router_for(harness: &TestHarness) -> Router {
    create_router(AppState::new(harness.pipeline.clone(), ApiConfig::default()))
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

struct StaticHealth(AdapterHealth);

#[async_trait]
impl HealthCheckable for StaticHealth {
    async fn health_check(&self) -> HealthCheckResult {
        HealthCheckResult {
            adapter_id: "static".to_string(),
            status: self.0,
            latency_ms: 0,
            message: None,
            checked_at: chrono::Utc::now(),
        }
    }
}

mod health_tests {
    use super::*;

    #[tokio::test]
    async fn test_liveness() {
        let response = router_for(&TestHarness::new()).oneshot(get("/health")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
        let body = json_body(response).await;
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_readiness_without_checks_is_ready() {
        let response = router_for(&TestHarness::new())
            .oneshot(get("/health/ready"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ready");
    }

    #[tokio::test]
    async fn test_readiness_reports_unhealthy_adapter() {
        let harness = TestHarness::new();
        let state = AppState::new(harness.pipeline.clone(), ApiConfig::default()).with_health_checks(vec![
            Arc::new(StaticHealth(AdapterHealth::Healthy)) as Arc<dyn HealthCheckable>,
            Arc::new(StaticHealth(AdapterHealth::Unhealthy)) as Arc<dyn HealthCheckable>,
        ]);

        let response = create_router(state).oneshot(get("/health/ready")).await.unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = json_body(response).await;
        assert_eq!(body["status"], "not_ready");
        assert_eq!(body["checks"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_request_id_is_propagated() {
        let request = Request::builder()
            .method("GET")
            .uri("/health")
            .header("x-request-id", "req-42")
            .body(Body::empty())
            .unwrap();

        let response = router_for(&TestHarness::new()).oneshot(request).await.unwrap();

        assert_eq!(response.headers()["x-request-id"], "req-42");
    }
}

mod normalization_tests {
    use super::*;

    #[tokio::test]
    async fn test_single_claim_success() {
        let harness = TestHarness::new();
        let claim_id = harness
            .upload(ClaimBuilder::new().build(), DocumentFixtures::denial_csv())
            .await;

        let response = router_for(&harness)
            .oneshot(post_json(
                "/api/v1/normalizations",
                json!({ "claim_id": claim_id.as_uuid().to_string() }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "success");
        assert_eq!(body["entities_created"]["claim_updated"], true);
        assert_eq!(body["processing_summary"]["total_rows"], 1);
        assert_eq!(harness.claim(claim_id).await.status, ClaimStatus::Denied);
    }

    #[tokio::test]
    async fn test_single_claim_failure_is_reported_in_body() {
        let harness = TestHarness::new();
        let claim_id = harness
            .upload(
                ClaimBuilder::new().with_content_type("application/zip").build(),
                b"PK".to_vec(),
            )
            .await;

        let response = router_for(&harness)
            .oneshot(post_json(
                "/api/v1/normalizations",
                json!({ "claim_id": claim_id.as_uuid().to_string(), "uploaded_by": "ops" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "error");
        assert_eq!(body["requires_manual_review"], true);
        assert_eq!(body["error"], "Unsupported content type: application/zip");
    }

    #[tokio::test]
    async fn test_body_without_claim_id_is_an_error_outcome() {
        let harness = TestHarness::new();
        let response = router_for(&harness)
            .oneshot(post_json("/api/v1/normalizations", json!({ "tenant_id": "t" })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "error");
        assert_eq!(body["requires_manual_review"], true);
        assert!(body["error"].as_str().unwrap().contains("claim_id is required"), "{}", body);
        assert!(harness.denials().await.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/normalizations")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"claim_id\":"))
            .unwrap();

        let response = router_for(&TestHarness::new()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "invalid_body");
    }

    #[tokio::test]
    async fn test_batch_keeps_request_order() {
        let harness = TestHarness::new();
        let good = harness
            .upload(ClaimBuilder::new().build(), DocumentFixtures::denial_csv())
            .await;
        let missing = harness.register_without_document(ClaimBuilder::new().build()).await;
        let ids = vec![
            good.as_uuid().to_string(),
            "not-a-uuid".to_string(),
            missing.as_uuid().to_string(),
        ];

        let response = router_for(&harness)
            .oneshot(post_json("/api/v1/normalizations/batch", json!({ "claim_ids": ids })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["total"], 3);
        assert_eq!(body["succeeded"], 1);
        assert_eq!(body["failed"], 2);

        let outcomes = body["outcomes"].as_array().unwrap();
        let returned: Vec<&str> = outcomes.iter().map(|o| o["claim_id"].as_str().unwrap()).collect();
        assert_eq!(returned, ids.iter().map(String::as_str).collect::<Vec<_>>());
        assert_eq!(outcomes[0]["status"], "success");
        assert_eq!(outcomes[1]["status"], "error");
        assert_eq!(outcomes[2]["status"], "error");
    }

    #[tokio::test]
    async fn test_empty_batch_is_rejected() {
        let response = router_for(&TestHarness::new())
            .oneshot(post_json("/api/v1/normalizations/batch", json!({ "claim_ids": [] })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = json_body(response).await;
        assert_eq!(body["error"], "validation_error");
        assert_eq!(body["details"][0], "claim_ids: claim_ids must not be empty");
    }

    #[tokio::test]
    async fn test_oversized_batch_is_rejected() {
        let harness = TestHarness::new();
        let config = ApiConfig {
            max_batch_size: 2,
            ..ApiConfig::default()
        };
        let router = create_router(AppState::new(harness.pipeline.clone(), config));

        let response = router
            .oneshot(post_json(
                "/api/v1/normalizations/batch",
                json!({ "claim_ids": ["a", "b", "c"] }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = json_body(response).await;
        assert!(body["message"].as_str().unwrap().contains("maximum of 2"));
        assert!(harness.audit_events().await.is_empty());
    }
}
