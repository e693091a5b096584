//! HTTP router.
//!
//! JSON endpoints live under `/api/`; the reminder route keeps its legacy
//! path. Every other path is served from the static directory.
//!
//! Layers (outermost first): access log, CORS, body limit.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;
use crate::core_state::CoreState;

/// Build the full application router.
pub fn api_router(core: Arc<CoreState>) -> Router {
    let static_dir = core.config.static_dir.clone();
    let body_limit = core.config.max_upload_bytes;
    let ctx = ApiContext::new(core);

    // NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
    let api = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/login", post(endpoints::auth::login))
        .route("/fee_finder", post(endpoints::pipelines::fee_finder))
        .route("/case_simulate", post(endpoints::pipelines::case_simulate))
        .route("/law_advice", post(endpoints::pipelines::law_advice))
        .route("/pdf_summary", post(endpoints::pipelines::pdf_summary))
        .route("/pdf_lock", post(endpoints::documents::pdf_lock))
        .route("/documents", get(endpoints::documents::list));

    Router::new()
        .nest("/api", api)
        .route(
            "/reminders/save-case-local",
            post(endpoints::reminders::save_case),
        )
        .route_service("/login", ServeFile::new(static_dir.join("login.html")))
        .fallback_service(ServeDir::new(static_dir))
        .with_state(ctx)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .layer(axum::middleware::from_fn(middleware::access_log::log_access))
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use super::*;
    use crate::config::AppConfig;
    use crate::pipeline::llm::gateway::testing::ScriptedLlmClient;
    use crate::pipeline::llm::ModelGateway;
    use crate::pipeline::rag::ContextBuilder;
    use crate::pipeline::LegalOrchestrator;
    use crate::reminders::ReminderStore;
    use crate::vault::{LocalDocumentStore, Vault};

    const BOUNDARY: &str = "lexaid-test-boundary";

    struct TestApp {
        router: Router,
        client: ScriptedLlmClient,
        dir: tempfile::TempDir,
    }

    fn test_app_with(answers: &[&str], with_reminders: bool) -> TestApp {
        let dir = tempfile::tempdir().unwrap();
        let static_dir = dir.path().join("static");
        std::fs::create_dir_all(&static_dir).unwrap();
        std::fs::write(static_dir.join("index.html"), "<h1>LexAid home</h1>").unwrap();
        std::fs::write(static_dir.join("login.html"), "<h1>LexAid login</h1>").unwrap();

        let mut config = AppConfig::default();
        config.static_dir = static_dir;
        config.upload_dir = dir.path().join("uploads");
        config.db_path = dir.path().join("lexaid.db");
        config.supabase = None;

        let client = ScriptedLlmClient::new(answers);
        let gateway = ModelGateway::new(Box::new(client.clone()), "llama-3.1-8b-instant", 0.5);
        let orchestrator =
            LegalOrchestrator::new(gateway, ContextBuilder::truncating(), config.context_cap);
        let vault = Vault::new(
            None,
            Box::new(LocalDocumentStore::new(config.upload_dir.clone())),
        );
        let reminders = if with_reminders {
            Some(ReminderStore::open(&config.db_path).unwrap())
        } else {
            None
        };

        let core = Arc::new(CoreState::new(config, orchestrator, vault, reminders));
        TestApp {
            router: api_router(core),
            client,
            dir,
        }
    }

    fn test_app(answers: &[&str]) -> TestApp {
        test_app_with(answers, true)
    }

    fn json_request(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    enum Part<'a> {
        Text(&'a str, &'a str),
        File(&'a str, &'a str, &'a [u8]),
    }

    fn multipart_request(uri: &str, parts: &[Part]) -> Request<Body> {
        let mut body: Vec<u8> = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match part {
                Part::Text(name, value) => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n")
                            .as_bytes(),
                    );
                    body.extend_from_slice(value.as_bytes());
                }
                Part::File(name, filename, bytes) => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                             Content-Type: application/pdf\r\n\r\n"
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(bytes);
                }
            }
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn send(app: &TestApp, req: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = app.router.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, bytes.to_vec())
    }

    async fn send_json(app: &TestApp, req: Request<Body>) -> (StatusCode, serde_json::Value) {
        let (status, bytes) = send(app, req).await;
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn uploads(dir: &Path) -> Vec<String> {
        std::fs::read_dir(dir.join("uploads"))
            .map(|entries| {
                entries
                    .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
                    .collect()
            })
            .unwrap_or_default()
    }

    #[tokio::test]
    async fn health_reports_capabilities() {
        let app = test_app(&[]);
        let (status, body) = send_json(&app, get_request("/api/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["retrieval"], "truncation");
        assert_eq!(body["cloud_vault"], false);
        assert_eq!(body["reminders"], true);
        assert!(body["version"].is_string());
    }

    #[tokio::test]
    async fn login_accepts_configured_password() {
        let app = test_app(&[]);
        let (status, body) = send_json(
            &app,
            json_request("/api/login", serde_json::json!({"password": "admin"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({"status": "success", "redirect": "/"}));
    }

    #[tokio::test]
    async fn login_rejects_wrong_password() {
        let app = test_app(&[]);
        let (status, body) = send_json(
            &app,
            json_request("/api/login", serde_json::json!({"password": "guess"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, serde_json::json!({"error": "Invalid Credentials"}));
    }

    #[tokio::test]
    async fn fee_finder_returns_model_answer() {
        let app = test_app(&["Retainer: INR 40,000. Not legal advice."]);
        let (status, body) = send_json(
            &app,
            json_request(
                "/api/fee_finder",
                serde_json::json!({"prompt": "divorce case in Mumbai"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            serde_json::json!({"response": "Retainer: INR 40,000. Not legal advice."})
        );
        assert_eq!(app.client.requests().len(), 1);
    }

    #[tokio::test]
    async fn fee_finder_without_prompt_is_400() {
        let app = test_app(&[]);
        let (status, body) =
            send_json(&app, json_request("/api/fee_finder", serde_json::json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, serde_json::json!({"error": "No prompt"}));
        assert!(app.client.requests().is_empty());
    }

    #[tokio::test]
    async fn malformed_json_is_400() {
        let app = test_app(&[]);
        let req = Request::builder()
            .method("POST")
            .uri("/api/law_advice")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, body) = send_json(&app, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn model_outage_is_still_200() {
        let app = test_app(&[]);
        app.client.push_failure("connection refused");
        let (status, body) = send_json(
            &app,
            json_request("/api/fee_finder", serde_json::json!({"prompt": "bail costs"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["response"]
            .as_str()
            .unwrap()
            .starts_with("AI Service Unavailable:"));
    }

    #[tokio::test]
    async fn law_advice_returns_three_fields() {
        let app = test_app(&["'Article 21'", "Protection of life and liberty.", "Approach the High Court."]);
        let (status, body) = send_json(
            &app,
            json_request("/api/law_advice", serde_json::json!({"query": "right to privacy"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            serde_json::json!({
                "article": "Article 21",
                "law_text": "Protection of life and liberty.",
                "advice": "Approach the High Court."
            })
        );
    }

    #[tokio::test]
    async fn pdf_summary_without_file_is_400() {
        let app = test_app(&[]);
        let (status, body) = send_json(
            &app,
            multipart_request("/api/pdf_summary", &[Part::Text("note", "no file here")]),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, serde_json::json!({"error": "No file"}));
    }

    #[tokio::test]
    async fn pdf_summary_of_empty_file_skips_model() {
        let app = test_app(&[]);
        let (status, body) = send_json(
            &app,
            multipart_request("/api/pdf_summary", &[Part::File("pdf", "scan.pdf", b"")]),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({"response": "Error: Empty or scanned PDF."}));
        assert!(app.client.requests().is_empty());
    }

    #[tokio::test]
    async fn pdf_summary_of_digital_pdf() {
        let app = test_app(&["Lease between landlord and tenant."]);
        let pdf = crate::pipeline::extraction::pdf::tests::make_test_pdf(&["Lease Deed"]);
        let (status, body) = send_json(
            &app,
            multipart_request("/api/pdf_summary", &[Part::File("pdf", "lease.pdf", &pdf)]),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            serde_json::json!({"summary": "Done", "response": "Lease between landlord and tenant."})
        );
    }

    #[tokio::test]
    async fn case_simulate_with_description_only() {
        let app = test_app(&["1. Win Probability: High"]);
        let (status, body) = send_json(
            &app,
            multipart_request(
                "/api/case_simulate",
                &[Part::Text("case_description", "Cheque bounced under Section 138")],
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            serde_json::json!({"prediction": "Done", "response": "1. Win Probability: High"})
        );
        let prompt = &app.client.requests()[0].messages[0].content;
        assert!(prompt.contains("Cheque bounced under Section 138"));
    }

    #[tokio::test]
    async fn case_simulate_with_no_parts() {
        let app = test_app(&["analysis"]);
        let (status, body) = send_json(&app, multipart_request("/api/case_simulate", &[])).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["prediction"], "Done");
    }

    #[tokio::test]
    async fn pdf_lock_then_list() {
        let app = test_app(&[]);
        let (status, body) = send_json(
            &app,
            multipart_request(
                "/api/pdf_lock",
                &[Part::File("pdf", "../Bail Order.pdf", b"%PDF-1.4 order")],
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            serde_json::json!({"message": "Vaulted Locally", "filename": "Bail_Order.pdf"})
        );
        assert_eq!(uploads(app.dir.path()), vec!["Bail_Order.pdf"]);

        let (status, body) = send_json(&app, get_request("/api/documents")).await;
        assert_eq!(status, StatusCode::OK);
        let docs = body.as_array().unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0]["name"], "Bail_Order.pdf");
        assert!(docs[0]["created_at"].is_string());
    }

    #[tokio::test]
    async fn pdf_lock_without_file_is_400() {
        let app = test_app(&[]);
        let (status, _) = send_json(&app, multipart_request("/api/pdf_lock", &[])).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn reminder_saved() {
        let app = test_app(&[]);
        let (status, body) = send_json(
            &app,
            json_request(
                "/reminders/save-case-local",
                serde_json::json!({
                    "case_title": "Bail hearing",
                    "description": "Sessions Court, Room 4",
                    "due_date": "2026-11-02",
                    "user_email": "client@example.in",
                    "sender_email": "advocate@example.in"
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({"message": "Saved"}));

        let store = ReminderStore::open(&app.dir.path().join("lexaid.db")).unwrap();
        assert_eq!(store.list().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn reminder_store_not_connected_is_500() {
        let app = test_app_with(&[], false);
        let (status, body) = send_json(
            &app,
            json_request(
                "/reminders/save-case-local",
                serde_json::json!({"case_title": "x", "due_date": "2026-11-02", "user_email": "a@b.in"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, serde_json::json!({"error": "Reminder store not connected"}));
    }

    #[tokio::test]
    async fn reminder_missing_title_is_400() {
        let app = test_app(&[]);
        let (status, body) = send_json(
            &app,
            json_request(
                "/reminders/save-case-local",
                serde_json::json!({"due_date": "2026-11-02", "user_email": "a@b.in"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, serde_json::json!({"error": "case_title is required"}));
    }

    #[tokio::test]
    async fn static_pages_are_served() {
        let app = test_app(&[]);

        let (status, body) = send(&app, get_request("/")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"<h1>LexAid home</h1>");

        let (status, body) = send(&app, get_request("/login")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"<h1>LexAid login</h1>");

        let (status, _) = send(&app, get_request("/missing.js")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn oversized_body_is_rejected() {
        let mut app = test_app(&[]);
        let core = {
            let dir = app.dir.path();
            let mut config = AppConfig::default();
            config.static_dir = dir.join("static");
            config.upload_dir = dir.join("uploads");
            config.max_upload_bytes = 1024;
            let gateway = ModelGateway::new(Box::new(app.client.clone()), "m", 0.5);
            let orchestrator =
                LegalOrchestrator::new(gateway, ContextBuilder::truncating(), config.context_cap);
            let vault = Vault::new(None, Box::new(LocalDocumentStore::new(config.upload_dir.clone())));
            Arc::new(CoreState::new(config, orchestrator, vault, None))
        };
        app.router = api_router(core);

        let big = vec![b'x'; 4096];
        let (status, _) = send(
            &app,
            multipart_request("/api/pdf_lock", &[Part::File("pdf", "big.pdf", &big)]),
        )
        .await;
        assert!(status.is_client_error(), "got {status}");
        assert!(uploads(app.dir.path()).is_empty());
    }
}
