//! Integration tests for the advise flow against a mock backend.


use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a temp LEXA_HOME directory for test isolation.
fn temp_lexa_home() -> TempDir {
    TempDir::new().expect("create temp lexa home")
}

fn can_bind_localhost() -> bool {
    std::net::TcpListener::bind("127.0.0.1:0").is_ok()
}

#[tokio::test]
async fn test_advise_streams_reply_to_stdout() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let lexa_home = temp_lexa_home();
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/advise/stream"))
        .and(header("x-api-key", "test-api-key"))
        .and(body_partial_json(serde_json::json!({
            "jurisdiction": "FR",
            "messages": [{ "role": "user", "content": "Bonjour" }]
        })))
        .respond_with(fixtures::text_response(
            "Bonjour, comment puis-je vous aider ?",
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    cargo_bin_cmd!("lexa")
        .env("LEXA_HOME", lexa_home.path())
        .env("LEXA_API_KEY", "test-api-key")
        .env("LEXA_BASE_URL", mock_server.uri())
        .env("LEXA_BLOCK_REAL_API", "1")
        .args(["advise", "Bonjour"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Bonjour, comment puis-je vous aider ?",
        ));
}

#[tokio::test]
async fn test_advise_prints_clarification_question() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let lexa_home = temp_lexa_home();
    let mock_server = MockServer::start().await;

    let body = fixtures::clarification_sse(
        "Cela dépend de votre situation.",
        "Combien d'associés serez-vous ?",
    );
    Mock::given(method("POST"))
        .and(path("/v1/advise/stream"))
        .respond_with(fixtures::sse_response(&body))
        .mount(&mock_server)
        .await;

    cargo_bin_cmd!("lexa")
        .env("LEXA_HOME", lexa_home.path())
        .env("LEXA_API_KEY", "test-api-key")
        .env("LEXA_BASE_URL", mock_server.uri())
        .env("LEXA_BLOCK_REAL_API", "1")
        .args(["advise", "SASU ou EURL ?"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cela dépend de votre situation."))
        .stdout(predicate::str::contains("Combien d'associés serez-vous ?"))
        .stdout(predicate::str::contains("SASU"));
}

#[tokio::test]
async fn test_advise_jurisdiction_flag_overrides_config() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let lexa_home = temp_lexa_home();
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/advise/stream"))
        .and(body_partial_json(serde_json::json!({
            "jurisdiction": "BE"
        })))
        .respond_with(fixtures::text_response("En Belgique, la SRL est courante."))
        .expect(1)
        .mount(&mock_server)
        .await;

    cargo_bin_cmd!("lexa")
        .env("LEXA_HOME", lexa_home.path())
        .env("LEXA_API_KEY", "test-api-key")
        .env("LEXA_BASE_URL", mock_server.uri())
        .env("LEXA_BLOCK_REAL_API", "1")
        .args(["advise", "--jurisdiction", "BE", "Quelle forme choisir ?"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SRL"));
}

#[tokio::test]
async fn test_advise_surfaces_normalized_http_error() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let lexa_home = temp_lexa_home();
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/advise/stream"))
        .respond_with(fixtures::error_response(
            401,
            "invalid api key",
            "unauthorized",
        ))
        .mount(&mock_server)
        .await;

    cargo_bin_cmd!("lexa")
        .env("LEXA_HOME", lexa_home.path())
        .env("LEXA_API_KEY", "bad-key")
        .env("LEXA_BASE_URL", mock_server.uri())
        .env("LEXA_BLOCK_REAL_API", "1")
        .args(["advise", "Bonjour"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("HTTP 401"))
        .stderr(predicate::str::contains("invalid api key"));
}

#[tokio::test]
async fn test_advise_surfaces_mid_stream_error_event() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let lexa_home = temp_lexa_home();
    let mock_server = MockServer::start().await;

    let body = fixtures::mid_stream_error_sse("Je ", "overloaded", "backend overloaded");
    Mock::given(method("POST"))
        .and(path("/v1/advise/stream"))
        .respond_with(fixtures::sse_response(&body))
        .mount(&mock_server)
        .await;

    cargo_bin_cmd!("lexa")
        .env("LEXA_HOME", lexa_home.path())
        .env("LEXA_API_KEY", "test-api-key")
        .env("LEXA_BASE_URL", mock_server.uri())
        .env("LEXA_BLOCK_REAL_API", "1")
        .args(["advise", "Bonjour"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("backend overloaded"));
}

#[tokio::test]
async fn test_advise_no_stream_uses_sync_endpoint() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let lexa_home = temp_lexa_home();
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/advise"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "reply": "La SASU limite votre responsabilité."
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    cargo_bin_cmd!("lexa")
        .env("LEXA_HOME", lexa_home.path())
        .env("LEXA_API_KEY", "test-api-key")
        .env("LEXA_BASE_URL", mock_server.uri())
        .env("LEXA_BLOCK_REAL_API", "1")
        .args(["advise", "--no-stream", "Pourquoi une SASU ?"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "La SASU limite votre responsabilité.",
        ));
}

#[tokio::test]
async fn test_health_reports_backend_status() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let lexa_home = temp_lexa_home();
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/health"))
        .and(header("x-api-key", "test-api-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "ok",
            "version": "2.4.1"
        })))
        .mount(&mock_server)
        .await;

    cargo_bin_cmd!("lexa")
        .env("LEXA_HOME", lexa_home.path())
        .env("LEXA_API_KEY", "test-api-key")
        .env("LEXA_BASE_URL", mock_server.uri())
        .env("LEXA_BLOCK_REAL_API", "1")
        .arg("health")
        .assert()
        .success()
        .stdout(predicate::str::contains("ok (backend 2.4.1)"));
}
