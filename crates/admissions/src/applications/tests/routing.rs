use super::common::*;
use axum::extract::{Path, State};
use axum::http::{header, Request, StatusCode};
use std::sync::Arc;
use tower::ServiceExt;

use crate::applications::{admission_router, AdmissionService, ScoringPolicy};

fn get(uri: &str) -> Request<axum::body::Body> {
    Request::get(uri)
        .body(axum::body::Body::empty())
        .expect("request")
}

#[tokio::test]
async fn ranking_route_defaults_to_merit_regular() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router.oneshot(get("/api/v1/applications")).await.expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["category"], "management_merit_regular");
    assert_eq!(body["count"], 2);
    assert_eq!(body["applications"][0]["applicationId"], "app-strong");
    assert_eq!(body["applications"][0]["rank"], 1);
    assert_eq!(body["applications"][0]["courseType"], "X");
}

#[tokio::test]
async fn ranking_route_rejects_unknown_category() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(get("/api/v1/applications?category=sports_quota"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json_body(response).await;
    assert_eq!(body["error"], "unknown category filter 'sports_quota'");
}

#[tokio::test]
async fn detail_route_returns_not_found_for_unknown_id() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(get("/api/v1/applications/nobody"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn export_route_serves_csv_attachment() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(get("/api/v1/exports/all"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/csv; charset=utf-8"
    );
    let disposition = response.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .expect("ascii header")
        .to_string();
    assert!(disposition.starts_with("attachment; filename=\"all_applications_"));

    let body = String::from_utf8(read_body(response).await).expect("utf-8");
    assert!(body.starts_with("\"Rank\""));
    assert_eq!(body.lines().count(), 4);
}

#[tokio::test]
async fn export_route_reports_empty_category() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(get("/api/v1/exports/management_quota_lateral_entry"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn form_route_renders_text_on_request() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(get("/api/v1/applications/app-strong/form?format=text"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"app-strong_Application.txt\""
    );
    let body = String::from_utf8(read_body(response).await).expect("utf-8");
    assert!(body.starts_with("Carmel Polytechnic College"));
    assert!(body.contains("Application Number: CRML-2025-00002"));
}

#[tokio::test]
async fn summary_and_audit_routes_return_json() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let summary = router
        .clone()
        .oneshot(get("/api/v1/summary"))
        .await
        .expect("response");
    assert_eq!(summary.status(), StatusCode::OK);
    assert_eq!(read_json_body(summary).await["total"], 3);

    let audit = router.oneshot(get("/api/v1/audit")).await.expect("response");
    assert_eq!(audit.status(), StatusCode::OK);
    let body = read_json_body(audit).await;
    assert_eq!(body["missing"][0], "CRML-2025-00003");
}

#[tokio::test]
async fn detail_handler_maps_upstream_failure_to_bad_gateway() {
    let service = Arc::new(AdmissionService::new(
        Arc::new(FlakyUpstreamRepository),
        ScoringPolicy::default(),
        "CRML-2025",
    ));

    let response = crate::applications::router::detail_handler::<FlakyUpstreamRepository>(
        State(service),
        Path("app-strong".to_string()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn summary_route_maps_unavailable_store_to_internal_error() {
    let service = AdmissionService::new(
        Arc::new(UnavailableRepository),
        ScoringPolicy::default(),
        "CRML-2025",
    );
    let router = admission_router(Arc::new(service));

    let response = router.oneshot(get("/api/v1/summary")).await.expect("response");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = read_json_body(response).await;
    assert_eq!(
        body["error"],
        "repository unavailable: document store offline"
    );
}
