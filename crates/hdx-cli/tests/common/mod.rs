use std::process::Output;

use serde_json::json;
use tokio::process::Command;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TOKEN: &str = "cli-test-jwt";
pub const PATIENT_ID: &str = "p1";

/// Run the CLI binary against `server` with test credentials in the
/// environment.
pub async fn run_cli(server: &MockServer, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_hdx"))
        .args(args)
        .env("HDX_BASE_URL", server.uri())
        .env("HDX_CLIENT_ID", "cli-client")
        .env("HDX_CLIENT_SECRET", "cli-secret")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1")
        .output()
        .await
        .expect("Failed to execute CLI")
}

/// Run the CLI and expect success, returning stdout.
pub async fn run_cli_success(server: &MockServer, args: &[&str]) -> String {
    let output = run_cli(server, args).await;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!("CLI command failed: {:?}\nstderr: {}", args, stderr);
    }
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Run the CLI and expect failure, returning stderr.
pub async fn run_cli_failure(server: &MockServer, args: &[&str]) -> String {
    let output = run_cli(server, args).await;
    if output.status.success() {
        panic!("CLI command should have failed: {:?}", args);
    }
    assert_eq!(output.status.code(), Some(1));
    String::from_utf8_lossy(&output.stderr).to_string()
}

pub async fn mount_auth(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/auth/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(TOKEN))
        .mount(server)
        .await;
}

/// Patient creation and query submission for [`PATIENT_ID`].
pub async fn mount_registration(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/R4/Patient"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({ "resourceType": "Patient", "id": PATIENT_ID })),
        )
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path(format!("/R4/Patient/{PATIENT_ID}/$query")))
        .respond_with(ResponseTemplate::new(202))
        .mount(server)
        .await;
}

pub async fn mount_query_status(server: &MockServer, status: u16) {
    Mock::given(method("GET"))
        .and(path(format!("/R4/Patient/{PATIENT_ID}/$query")))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Single-page `$everything` and medication statement results.
pub async fn mount_results(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(format!("/R4/Patient/{PATIENT_ID}/$everything")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "resourceType": "Bundle",
            "entry": [
                { "resource": { "resourceType": "Patient", "id": PATIENT_ID } },
                { "resource": { "resourceType": "Encounter", "id": "e1" } }
            ]
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/R4/MedicationStatement"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "resourceType": "Bundle",
            "entry": [
                { "resource": { "resourceType": "MedicationStatement", "id": "m1" } }
            ]
        })))
        .mount(server)
        .await;
}
