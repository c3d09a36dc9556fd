//! JSON-RPC over stdio against the `resolucao-ls` binary
#![allow(dead_code)]

use std::io::{BufRead, BufReader, Read, Write};
use std::process::{Child, ChildStdout, Command, Stdio};
use std::time::{Duration, Instant};

use serde_json::Value;

pub const SERVER_TIMEOUT: Duration = Duration::from_secs(5);
const SHUTDOWN_GRACE_PERIOD: Duration = Duration::from_millis(200);

pub struct LspClient {
    child: Child,
    reader: BufReader<ChildStdout>,
}

impl LspClient {
    pub fn spawn(args: &[&str]) -> Self {
        let bin_path = std::env::var("CARGO_BIN_EXE_resolucao-ls")
            .unwrap_or_else(|_| "target/debug/resolucao-ls".to_string());

        let mut child = Command::new(bin_path)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .expect("Failed to spawn language server");
        let stdout = child
            .stdout
            .take()
            .expect("Child stdout should be available");

        Self {
            child,
            reader: BufReader::new(stdout),
        }
    }

    pub fn send(&mut self, message: &Value) {
        let body = message.to_string();
        let request = format!("Content-Length: {}\r\n\r\n{}", body.len(), body);

        let stdin = self
            .child
            .stdin
            .as_mut()
            .expect("Child stdin should be available");
        stdin
            .write_all(request.as_bytes())
            .expect("Failed to write request");
        stdin.flush().expect("Failed to flush stdin");
    }

    pub fn initialize(&mut self) -> Value {
        self.send(&serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "initialize",
            "params": {
                "processId": null,
                "rootUri": null,
                "capabilities": {
                    "textDocument": {
                        "hover": { "dynamicRegistration": false },
                        "codeAction": { "dynamicRegistration": false }
                    }
                },
                "clientInfo": { "name": "test-client", "version": "1.0" }
            }
        }));
        let response = self.read_until(|m| m.get("id").and_then(Value::as_i64) == Some(1));
        self.send(&serde_json::json!({
            "jsonrpc": "2.0",
            "method": "initialized",
            "params": {}
        }));
        response
    }

    pub fn read_message(&mut self) -> Value {
        let content_length = self.read_content_length_header();
        let mut body_bytes = vec![0u8; content_length];
        self.reader
            .read_exact(&mut body_bytes)
            .expect("Failed to read response body");

        let body = String::from_utf8(body_bytes).expect("Response body should be valid UTF-8");
        serde_json::from_str(&body)
            .unwrap_or_else(|e| panic!("Invalid JSON response: {}\nBody: {}", e, body))
    }

    /// Skip messages until one satisfies `pred`
    pub fn read_until(&mut self, pred: impl Fn(&Value) -> bool) -> Value {
        let start_time = Instant::now();
        loop {
            if start_time.elapsed() > SERVER_TIMEOUT {
                panic!("Timeout waiting for the expected message");
            }
            let message = self.read_message();
            if pred(&message) {
                return message;
            }
        }
    }

    fn read_content_length_header(&mut self) -> usize {
        let start_time = Instant::now();
        let mut content_length = None;

        loop {
            if start_time.elapsed() > SERVER_TIMEOUT {
                panic!("Timeout waiting for response headers");
            }

            let mut line = String::new();
            match self.reader.read_line(&mut line) {
                Ok(0) => panic!("Unexpected EOF while reading headers"),
                Ok(_) => {
                    if line.trim().is_empty() {
                        break;
                    }
                    if let Some(length_str) = line.strip_prefix("Content-Length:") {
                        content_length = Some(
                            length_str
                                .trim()
                                .parse::<usize>()
                                .expect("Invalid Content-Length header"),
                        );
                    }
                }
                Err(e) => panic!("Error reading headers: {}", e),
            }
        }

        content_length.expect("Missing Content-Length header")
    }

    pub fn shutdown(mut self) {
        // Close stdin to signal we're done
        drop(self.child.stdin.take());

        std::thread::sleep(SHUTDOWN_GRACE_PERIOD);

        match self.child.try_wait() {
            Ok(Some(status)) => {
                if !status.success() {
                    eprintln!("Server exited with non-zero status: {:?}", status);
                }
            }
            Ok(None) => {
                let _ = self.child.kill();
                let _ = self.child.wait();
            }
            Err(e) => panic!("Error checking server status: {}", e),
        }
    }
}
