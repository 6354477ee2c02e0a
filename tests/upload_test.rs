mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use common::{MockStorageService, harness, harness_with, staging_config};
use csv_bucket_upload::config::UploadConfig;
use csv_bucket_upload::services::storage::StorageError;
use csv_bucket_upload::{AppState, create_app};
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

const BOUNDARY: &str = "---------------------------123456789012345678901234567";

fn multipart_body(bucket: Option<&str>, file: Option<(&str, &str)>) -> String {
    let mut body = String::new();
    if let Some(bucket) = bucket {
        body.push_str(&format!(
            "--{BOUNDARY}\r\n\
            Content-Disposition: form-data; name=\"bucket\"\r\n\r\n\
            {bucket}\r\n"
        ));
    }
    if let Some((filename, content)) = file {
        body.push_str(&format!(
            "--{BOUNDARY}\r\n\
            Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
            Content-Type: text/csv\r\n\r\n\
            {content}\r\n"
        ));
    }
    body.push_str(&format!("--{BOUNDARY}--\r\n"));
    body
}

fn upload_request(body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            "Content-Type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn read_json(response: axum::response::Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_upload_flow() {
    let h = harness(UploadConfig::default());
    let app = create_app(AppState {
        service: h.service.clone(),
    });

    let content = "timestamp,usage_kwh\n2018-01-01 00:15,3.17\n";
    let response = app
        .oneshot(upload_request(multipart_body(
            Some("energy-data-bucket"),
            Some(("plant_A_jan.csv", content)),
        )))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = read_json(response).await;
    assert_eq!(json["bucket"], "energy-data-bucket");
    assert_eq!(json["object_name"], "plant_A_jan.csv");
    assert_eq!(json["details"]["filename"], "plant_A_jan.csv");
    assert_eq!(json["details"]["size_bytes"], content.len() as u64);
    assert_eq!(
        json["message"],
        "File plant_A_jan.csv uploaded successfully to bucket: energy-data-bucket."
    );
    assert!(json["local_copy"].is_null());

    let objects = h.storage.objects();
    assert_eq!(objects.len(), 1);
    assert_eq!(objects[0].key, "plant_A_jan.csv");
    assert_eq!(objects[0].content_type, "text/csv");
    assert_eq!(objects[0].data, content.as_bytes());
}

#[tokio::test]
async fn test_upload_with_staging_reports_local_copy() {
    let dir = tempfile::tempdir().unwrap();
    let h = harness(staging_config(dir.path()));
    let app = create_app(AppState {
        service: h.service.clone(),
    });

    let response = app
        .oneshot(upload_request(multipart_body(
            Some("energy-data-bucket"),
            Some(("q1.csv", "a,b\n1,2\n")),
        )))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = read_json(response).await;
    assert!(json["local_copy"].as_str().unwrap().ends_with("q1.csv"));
    assert_eq!(std::fs::read(dir.path().join("q1.csv")).unwrap(), b"a,b\n1,2\n");
    assert_eq!(h.storage.objects()[0].data, b"a,b\n1,2\n");
}

#[tokio::test]
async fn test_rejects_oversize_file() {
    let config = UploadConfig {
        bucket_size_limit_bytes: 16,
        ..UploadConfig::default()
    };
    let h = harness(config);
    let app = create_app(AppState {
        service: h.service.clone(),
    });

    let response = app
        .oneshot(upload_request(multipart_body(
            Some("energy-data-bucket"),
            Some(("big.csv", "this content is longer than sixteen bytes")),
        )))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let json = read_json(response).await;
    assert_eq!(json["code"], "FILE_TOO_LARGE");
    assert_eq!(h.storage.calls(), 0);
}

#[tokio::test]
async fn test_rejects_invalid_requests() {
    let h = harness(UploadConfig::default());
    let app = create_app(AppState {
        service: h.service.clone(),
    });

    // Not a CSV
    let response = app
        .clone()
        .oneshot(upload_request(multipart_body(
            Some("energy-data-bucket"),
            Some(("notes.txt", "hello")),
        )))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(response).await["code"], "INVALID_REQUEST");

    // No file
    let response = app
        .clone()
        .oneshot(upload_request(multipart_body(Some("energy-data-bucket"), None)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(response).await["error"], "Bad Request: No file provided");

    // No bucket
    let response = app
        .oneshot(upload_request(multipart_body(None, Some(("a.csv", "x,y")))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(response).await["code"], "INVALID_REQUEST");

    assert_eq!(h.storage.calls(), 0);
}

#[tokio::test]
async fn test_sink_failure_returns_bad_gateway() {
    let storage = Arc::new(MockStorageService::failing(StorageError::Transmission(
        "simulated network failure".to_string(),
    )));
    let h = harness_with(storage, UploadConfig::default());
    let app = create_app(AppState {
        service: h.service.clone(),
    });

    let response = app
        .oneshot(upload_request(multipart_body(
            Some("energy-data-bucket"),
            Some(("plant_A_jan.csv", "a,b")),
        )))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = read_json(response).await;
    assert_eq!(json["code"], "TRANSMISSION_FAILED");
    assert!(
        json["error"]
            .as_str()
            .unwrap()
            .contains("simulated network failure")
    );
}

#[tokio::test]
async fn test_form_and_health() {
    let config = UploadConfig {
        default_bucket: Some("energy-data-bucket".to_string()),
        ..UploadConfig::default()
    };
    let h = harness(config);
    let app = create_app(AppState {
        service: h.service.clone(),
    });

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let html = String::from_utf8_lossy(&body);
    assert!(html.contains(r#"value="energy-data-bucket""#));
    assert!(html.contains("max 200 MB"));

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["status"], "ok");
}
