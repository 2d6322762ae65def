use std::sync::Once;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use docscan_core::api_types::{
    EncodedImage, ErrorResponse, ExtractRequest, ExtractResponse, HealthResponse,
};
use docscan_core::AppConfig;
use docscan_server::AppState;
use docscan_tests::{chat_reply, pipeline};
use serde_json::json;
use wiremock::matchers::{body_string_contains, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

static INIT: Once = Once::new();

fn setup_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

/// Server on a random port, vision calls routed to `mock`.
struct TestApp {
    address: String,
    client: reqwest::Client,
}

impl TestApp {
    async fn spawn(mock: &MockServer, api_key: &str) -> Self {
        setup_tracing();
        let config = AppConfig {
            openai_api_key: api_key.to_string(),
            openai_base_url: mock.uri(),
            ..AppConfig::default()
        };
        let state = AppState::with_pipeline(config, pipeline(&mock.uri()));
        let app = docscan_server::app(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            address,
            client: reqwest::Client::new(),
        }
    }
}

async fn mount_rg_reply(mock: &MockServer) {
    Mock::given(method("POST"))
        .and(body_string_contains(STANDARD.encode(b"rg-frente")))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply(
            "```json\n{\"Tipo de Documento\": \"RG\", \"Nome\": \"Maria Silva\", \"CPF\": \"123.456.789-09\"}\n```",
        )))
        .mount(mock)
        .await;
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_reports_configuration() {
    let mock = MockServer::start().await;
    let app = TestApp::spawn(&mock, "sk-test").await;

    let response = app
        .client
        .get(format!("{}/api/health", app.address))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let health: HealthResponse = response.json().await.unwrap();
    assert_eq!(health.status, "ok");
    assert_eq!(health.model, "gpt-4o");
    assert_eq!(health.ocr_language, "por");
    assert!(health.credential_configured);
}

#[tokio::test]
async fn health_is_degraded_without_credential() {
    let mock = MockServer::start().await;
    let app = TestApp::spawn(&mock, "").await;

    let health: HealthResponse = app
        .client
        .get(format!("{}/api/health", app.address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health.status, "degraded");
    assert!(!health.credential_configured);
}

// ---------------------------------------------------------------------------
// JSON extraction
// ---------------------------------------------------------------------------

#[tokio::test]
async fn json_extraction_returns_ordered_report() {
    let mock = MockServer::start().await;
    mount_rg_reply(&mock).await;
    let app = TestApp::spawn(&mock, "sk-test").await;

    let request = ExtractRequest {
        images: vec![
            EncodedImage {
                name: "rg.jpg".into(),
                data_base64: STANDARD.encode(b"rg-frente"),
            },
            EncodedImage {
                name: "desconhecido.jpg".into(),
                data_base64: STANDARD.encode(b"texto do verso"),
            },
        ],
        api_key: None,
    };

    let response = app
        .client
        .post(format!("{}/api/extract", app.address))
        .json(&request)
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        body["results"],
        json!([
            {"Tipo de Documento": "RG", "Nome": "Maria Silva", "CPF": "123.456.789-09"},
            {"error": "transport failure", "ocr_text": "texto do verso"}
        ])
    );
    assert_eq!(body["document_types"], json!({"RG": 1}));
    assert_eq!(body["structured_count"], 1);
    assert_eq!(body["degraded_count"], 1);
    assert_eq!(body["images"][0]["name"], "rg.jpg");
    assert_eq!(body["images"][1]["index"], 1);

    let typed: ExtractResponse = serde_json::from_value(body).unwrap();
    assert_eq!(typed.report.len(), 2);
}

#[tokio::test]
async fn request_key_is_used_for_upstream_call() {
    let mock = MockServer::start().await;
    Mock::given(method("POST"))
        .and(wiremock::matchers::header("authorization", "Bearer sk-override"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(chat_reply("{\"Tipo de Documento\": \"CNH\"}")),
        )
        .expect(1)
        .mount(&mock)
        .await;
    let app = TestApp::spawn(&mock, "").await;

    let response = app
        .client
        .post(format!("{}/api/extract", app.address))
        .json(&json!({
            "images": [{"name": "cnh.jpg", "data_base64": STANDARD.encode(b"cnh")}],
            "api_key": "sk-override"
        }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["document_types"], json!({"CNH": 1}));
    mock.verify().await;
}

#[tokio::test]
async fn missing_credential_is_bad_request() {
    let mock = MockServer::start().await;
    let app = TestApp::spawn(&mock, "").await;

    let response = app
        .client
        .post(format!("{}/api/extract", app.address))
        .json(&json!({"images": []}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);

    let error: ErrorResponse = response.json().await.unwrap();
    assert!(error.error.contains("OPENAI_API_KEY"));
}

#[tokio::test]
async fn invalid_base64_is_bad_request() {
    let mock = MockServer::start().await;
    let app = TestApp::spawn(&mock, "sk-test").await;

    let response = app
        .client
        .post(format!("{}/api/extract", app.address))
        .json(&json!({"images": [{"name": "x.jpg", "data_base64": "%%% not base64 %%%"}]}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);

    let error: ErrorResponse = response.json().await.unwrap();
    assert!(error.error.contains("x.jpg"));
}

#[tokio::test]
async fn empty_batch_returns_empty_report() {
    let mock = MockServer::start().await;
    let app = TestApp::spawn(&mock, "sk-test").await;

    let body: serde_json::Value = app
        .client
        .post(format!("{}/api/extract", app.address))
        .json(&json!({"images": []}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["results"], json!([]));
    assert_eq!(body["document_types"], json!({}));
}

// ---------------------------------------------------------------------------
// Multipart upload
// ---------------------------------------------------------------------------

#[tokio::test]
async fn multipart_upload_preserves_file_order() {
    let mock = MockServer::start().await;
    mount_rg_reply(&mock).await;
    let app = TestApp::spawn(&mock, "sk-test").await;

    let form = reqwest::multipart::Form::new()
        .part(
            "files",
            reqwest::multipart::Part::bytes(b"primeiro arquivo".to_vec()).file_name("um.png"),
        )
        .part(
            "files",
            reqwest::multipart::Part::bytes(b"rg-frente".to_vec()).file_name("dois.jpg"),
        )
        .text("note", "ignored");

    let response = app
        .client
        .post(format!("{}/api/extract/upload", app.address))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["images"][0]["name"], "um.png");
    assert_eq!(body["images"][1]["name"], "dois.jpg");
    assert_eq!(
        body["results"][0],
        json!({"error": "transport failure", "ocr_text": "primeiro arquivo"})
    );
    assert_eq!(body["results"][1]["Nome"], "Maria Silva");
}

#[tokio::test]
async fn unselected_file_input_is_skipped() {
    let mock = MockServer::start().await;
    mount_rg_reply(&mock).await;
    let app = TestApp::spawn(&mock, "sk-test").await;

    let form = reqwest::multipart::Form::new()
        .part(
            "files",
            reqwest::multipart::Part::bytes(Vec::new()).file_name(""),
        )
        .part(
            "files",
            reqwest::multipart::Part::bytes(b"rg-frente".to_vec()).file_name("rg.jpg"),
        );

    let response = app
        .client
        .post(format!("{}/api/extract/upload", app.address))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["results"].as_array().unwrap().len(), 1);
    assert_eq!(body["images"][0]["name"], "rg.jpg");
    assert_eq!(body["images"][0]["index"], 0);
    assert_eq!(body["document_types"], json!({"RG": 1}));
}
