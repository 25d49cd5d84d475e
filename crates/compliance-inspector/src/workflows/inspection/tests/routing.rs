use super::common::*;
use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use std::sync::Arc;
use tower::ServiceExt;

use crate::workflows::inspection::{ReportServiceConfig, ViolationReportService};

#[tokio::test]
async fn submit_route_stores_record() {
    let (service, repository, _) = build_service(recipients());
    let router = router_with_service(service);

    let response = router
        .oneshot(
            Request::post("/api/v1/inspections")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    serde_json::to_vec(&pine_record()).expect("serialize record"),
                ))
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CREATED);
    let stored = repository.records.lock().expect("repository mutex").clone();
    assert_eq!(stored, vec![pine_record()]);
}

#[tokio::test]
async fn violations_route_returns_summary_and_groups() {
    let (service, _) = seeded_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(
            Request::get("/api/v1/inspections/violations")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["summary"]["total_properties"], 1);
    assert_eq!(payload["groups"][0]["address"], "55 Pine Ave");
    assert_eq!(payload["groups"][0]["violations"][0]["field"], "roof");
}

#[tokio::test]
async fn report_route_honours_text_format() {
    let (service, _) = seeded_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(
            Request::get("/api/v1/inspections/report?format=text")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/plain; charset=utf-8"
    );
    let body = String::from_utf8(read_body(response).await).expect("utf-8 body");
    assert!(body.contains("PROPERTY VIOLATIONS REPORT"));
}

#[tokio::test]
async fn report_route_defaults_to_html() {
    let (service, _) = seeded_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(
            Request::get("/api/v1/inspections/report")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/html; charset=utf-8"
    );
}

#[tokio::test]
async fn document_route_sets_attachment_name() {
    let (service, _) = seeded_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(
            Request::get("/api/v1/inspections/report/document")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let disposition = response.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .expect("ascii header");
    assert!(disposition.starts_with("attachment; filename=\"Property_Violations_Report_"));
    assert!(disposition.ends_with(".json\""));
}

#[tokio::test]
async fn email_handler_returns_unprocessable_without_recipients() {
    let (service, _, mailer) = build_service(Vec::new());

    let response = crate::workflows::inspection::router::email_handler::<
        MemoryRepository,
        MemoryMailer,
    >(State(Arc::new(service)))
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(mailer.sent().is_empty());
}

#[tokio::test]
async fn email_route_accepts_dispatch() {
    let (service, mailer) = seeded_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(
            Request::post("/api/v1/inspections/report/email")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let payload = read_json_body(response).await;
    assert_eq!(payload["recipients"], 2);
    assert_eq!(mailer.sent().len(), 1);
}

#[tokio::test]
async fn violations_handler_maps_store_outage_to_bad_gateway() {
    let service = Arc::new(ViolationReportService::new(
        Arc::new(UnavailableRepository),
        Arc::new(MemoryMailer::default()),
        ReportServiceConfig {
            organization: ORGANIZATION.to_string(),
            recipients: recipients(),
        },
    ));

    let response = crate::workflows::inspection::router::violations_handler::<
        UnavailableRepository,
        MemoryMailer,
    >(State(service))
    .await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let payload = read_json_body(response).await;
    assert!(payload["error"]
        .as_str()
        .is_some_and(|message| message.contains("connection refused")));
}
