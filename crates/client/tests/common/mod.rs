//! Scripted transport double shared by the protocol tests.

#![allow(dead_code)]

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use emissary_client::{Response, Transport, TransportError};
use serde_json::json;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

/// One request the engine issued against the double.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: &'static str,
    pub url: String,
    pub body: Option<String>,
    pub timeout: Option<Duration>,
}

/// Store double: answers from a script, records every request.
#[derive(Default)]
pub struct MockTransport {
    script: Mutex<VecDeque<Result<Response, TransportError>>>,
    log: Mutex<Vec<Request>>,
}

impl MockTransport {
    pub fn new() -> Self {
        MockTransport::default()
    }

    /// Script the next response.
    pub fn respond(self, status: u16, headers: &[(&str, &str)], body: &str) -> Self {
        self.script.lock().unwrap().push_back(Ok(Response {
            status,
            headers: headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            body: body.to_string(),
        }));
        self
    }

    /// Script the next call to fail at the transport level.
    pub fn fail(self, error: TransportError) -> Self {
        self.script.lock().unwrap().push_back(Err(error));
        self
    }

    /// Everything the engine sent, in order.
    pub fn requests(&self) -> Vec<Request> {
        self.log.lock().unwrap().clone()
    }

    fn next(
        &self,
        method: &'static str,
        url: &str,
        body: Option<&str>,
        timeout: Option<Duration>,
    ) -> Result<Response, TransportError> {
        self.log.lock().unwrap().push(Request {
            method,
            url: url.to_string(),
            body: body.map(str::to_string),
            timeout,
        });
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("unscripted {} {}", method, url))
    }
}

impl Transport for MockTransport {
    fn get(&self, url: &str) -> Result<Response, TransportError> {
        self.next("GET", url, None, None)
    }

    fn get_with_timeout(
        &self,
        url: &str,
        timeout: Duration,
    ) -> Result<Response, TransportError> {
        self.next("GET", url, None, Some(timeout))
    }

    fn put(&self, url: &str, body: &str) -> Result<Response, TransportError> {
        self.next("PUT", url, Some(body), None)
    }

    fn delete(&self, url: &str) -> Result<Response, TransportError> {
        self.next("DELETE", url, None, None)
    }
}

/// A store record whose body is `plain` before base64.
pub fn entry(key: &str, plain: &str, flags: u64, modify_index: u64) -> serde_json::Value {
    json!({
        "LockIndex": 0,
        "Key": key,
        "Flags": flags,
        "Value": BASE64.encode(plain),
        "CreateIndex": modify_index,
        "ModifyIndex": modify_index,
    })
}

/// A directory-style record with no value body.
pub fn null_entry(key: &str, flags: u64, modify_index: u64) -> serde_json::Value {
    json!({
        "LockIndex": 0,
        "Key": key,
        "Flags": flags,
        "Value": null,
        "CreateIndex": modify_index,
        "ModifyIndex": modify_index,
    })
}

/// The store's response body: a JSON array even for one entry.
pub fn listing(entries: &[serde_json::Value]) -> String {
    serde_json::Value::Array(entries.to_vec()).to_string()
}
