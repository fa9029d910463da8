//! Integration tests for the web front-end.
//!
//! Both upstream APIs are served by `wiremock`; requests go straight to the
//! router through `tower::ServiceExt::oneshot`.

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use serde_json::{Value, json};
use tower::ServiceExt;
use weather_trend::domain::PipelineConfig;
use weather_trend::web::{AppState, build_router};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn hourly_payload(n: usize) -> Value {
    let time: Vec<String> = (0..n)
        .map(|i| format!("2024-12-{:02}T{:02}:00", 25 + i / 24, i % 24))
        .collect();
    let temperature: Vec<Option<f64>> = (0..n)
        .map(|i| if i == 5 { None } else { Some(18.0 + (i as f64 / 3.0).sin() * 4.0) })
        .collect();
    let humidity: Vec<f64> = (0..n).map(|i| 55.0 + (i % 7) as f64).collect();
    let wind: Vec<f64> = (0..n).map(|i| 10.0 + (i as f64 / 5.0).cos()).collect();

    json!({
        "latitude": 31.52,
        "longitude": 74.36,
        "hourly": {
            "time": time,
            "temperature_2m": temperature,
            "relative_humidity_2m": humidity,
            "wind_speed_10m": wind,
        }
    })
}

struct TestApp {
    app: Router,
    _dir: tempfile::TempDir,
}

fn build_test_app(server: &MockServer) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let config = PipelineConfig {
        geocoder_url: format!("{}/search", server.uri()),
        archive_url: format!("{}/v1/archive", server.uri()),
        cache_dir: dir.path().join("cache"),
        artifact_dir: dir.path().join("artifacts"),
        ..PipelineConfig::default()
    };
    TestApp {
        app: build_router(AppState::new(config)),
        _dir: dir,
    }
}

async fn mount_geocoder(server: &MockServer, body: Value) {
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_archive(server: &MockServer, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/v1/archive"))
        .and(query_param("timezone", "auto"))
        .and(query_param(
            "hourly",
            "temperature_2m,relative_humidity_2m,wind_speed_10m",
        ))
        .respond_with(template)
        .mount(server)
        .await;
}

async fn post_city(app: &Router, city: &str) -> Response {
    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(format!("city={city}")))
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

async fn get(app: &Router, uri: &str) -> Response {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.clone().oneshot(request).await.unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8_lossy(&bytes).into_owned()
}

// ---------------------------------------------------------------------------
// Test: a successful run renders the result and serves the PDF
// ---------------------------------------------------------------------------

#[tokio::test(flavor = "multi_thread")]
async fn successful_request_renders_result_and_pdf_is_downloadable() {
    let server = MockServer::start().await;
    mount_geocoder(
        &server,
        json!([{"lat": "31.5204", "lon": "74.3587", "display_name": "Lahore, Pakistan"}]),
    )
    .await;
    mount_archive(&server, ResponseTemplate::new(200).set_body_json(hourly_payload(48))).await;
    let test = build_test_app(&server);

    let response = post_city(&test.app, "Lahore").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Weather Prediction for Lahore"), "{html}");
    assert!(html.contains("°C"));

    let response = get(&test.app, "/download_pdf").await;
    assert_eq!(response.status(), StatusCode::OK);
    let disposition = response
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.contains("filename=\"weather_prediction_insights.pdf\""));

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(!bytes.is_empty());
    assert!(bytes.starts_with(b"%PDF"));
}

// ---------------------------------------------------------------------------
// Test: the archive response is cached across requests
// ---------------------------------------------------------------------------

#[tokio::test(flavor = "multi_thread")]
async fn identical_requests_hit_the_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/archive"))
        .respond_with(ResponseTemplate::new(200).set_body_json(hourly_payload(48)))
        .expect(1)
        .mount(&server)
        .await;
    let test = build_test_app(&server);

    // Default city: no geocoder call at all.
    assert_eq!(post_city(&test.app, "").await.status(), StatusCode::OK);
    assert_eq!(post_city(&test.app, "Karachi").await.status(), StatusCode::OK);

    server.verify().await;
}

// ---------------------------------------------------------------------------
// Test: failures re-render the form with a typed error
// ---------------------------------------------------------------------------

#[tokio::test(flavor = "multi_thread")]
async fn unknown_city_renders_form_with_error() {
    let server = MockServer::start().await;
    mount_geocoder(&server, json!([])).await;
    let test = build_test_app(&server);

    let response = post_city(&test.app, "Atlantis").await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let html = body_text(response).await;
    assert!(html.contains("Location not found"));
    assert!(html.contains("<form"));
}

#[tokio::test(flavor = "multi_thread")]
async fn upstream_error_renders_form_with_status() {
    let server = MockServer::start().await;
    mount_archive(
        &server,
        ResponseTemplate::new(400).set_body_string("{\"error\":true,\"reason\":\"bad range\"}"),
    )
    .await;
    let test = build_test_app(&server);

    let response = post_city(&test.app, "Karachi").await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let html = body_text(response).await;
    assert!(html.contains("Fetch error"));
    assert!(html.contains("400"));
}

// ---------------------------------------------------------------------------
// Test: download before any report
// ---------------------------------------------------------------------------

#[tokio::test]
async fn download_without_report_is_not_found() {
    let server = MockServer::start().await;
    let test = build_test_app(&server);

    let response = get(&test.app, "/download_pdf").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get(
        &test.app,
        "/download_pdf?report=0190f3a2-7b1c-7d4e-8f00-000000000000",
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn index_and_health() {
    let server = MockServer::start().await;
    let test = build_test_app(&server);

    let response = get(&test.app, "/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("name=\"city\""));

    let response = get(&test.app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(json["status"], "ok");
}
