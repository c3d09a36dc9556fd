mod common;

use common::LspClient;
use serde_json::Value;

#[test]
fn initialize_smoke() {
    let mut server = LspClient::spawn(&[]);

    let response = server.initialize();
    validate_initialize_response(&response);

    server.shutdown();
}

#[test]
fn initialize_with_forced_profile() {
    let mut server = LspClient::spawn(&["--profile", "cnrh", "--log-level", "debug"]);

    let response = server.initialize();
    assert!(response.get("result").is_some());

    let log = server.read_until(|m| {
        m.get("method").and_then(Value::as_str) == Some("window/logMessage")
    });
    let message = log["params"]["message"].as_str().unwrap_or_default();
    assert!(message.contains("forced to CNRH"), "log message: {}", message);

    server.shutdown();
}

fn validate_initialize_response(response: &Value) {
    assert_eq!(
        response.get("jsonrpc").and_then(|v| v.as_str()),
        Some("2.0"),
        "Response should have jsonrpc: '2.0'"
    );

    assert_eq!(
        response.get("id").and_then(|v| v.as_i64()),
        Some(1),
        "Response should have matching request id"
    );

    let result = response
        .get("result")
        .expect("Response should contain 'result' field");

    let capabilities = result
        .get("capabilities")
        .expect("Result should contain server capabilities");

    assert!(capabilities.is_object(), "Capabilities should be an object");
    assert_eq!(capabilities["hoverProvider"], Value::Bool(true));
    assert_eq!(capabilities["documentSymbolProvider"], Value::Bool(true));
    assert_eq!(
        capabilities["codeActionProvider"]["codeActionKinds"][0],
        Value::String("quickfix".to_string())
    );
    assert_eq!(result["serverInfo"]["name"], Value::String("resolucao-ls".to_string()));
}
