//! Shared fixtures for unit tests: a scripted transport and a test key.

use async_trait::async_trait;
use reqwest::Method;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::ledger::transport::{check_envelope, Transport};
use crate::ledger::types::{ClientError, ClientResult};

// Well-known test private key (Anvil's first account)
pub(crate) const TEST_PRIVATE_KEY: &str =
    "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

struct Route {
    method: Method,
    prefix: String,
    /// The last body repeats once the queue drains to it.
    bodies: VecDeque<String>,
}

#[derive(Default)]
struct Inner {
    routes: Vec<Route>,
    calls: Vec<(Method, String, Vec<u8>)>,
}

/// In-memory transport answering from scripted bodies, routed by method and
/// longest matching path prefix. Bodies go through the same error envelope
/// check as the HTTP transport.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    inner: Mutex<Inner>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn on(&self, method: Method, prefix: &str, body: &str) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(route) = inner
            .routes
            .iter_mut()
            .find(|r| r.method == method && r.prefix == prefix)
        {
            route.bodies.push_back(body.to_string());
            return;
        }
        inner.routes.push(Route {
            method,
            prefix: prefix.to_string(),
            bodies: VecDeque::from([body.to_string()]),
        });
    }

    pub(crate) fn push_get(&self, body: &str) {
        self.on(Method::GET, "", body);
    }

    pub(crate) fn gets(&self) -> Vec<String> {
        self.calls_to(Method::GET, "")
            .into_iter()
            .map(|(path, _)| path)
            .collect()
    }

    /// Calls made with `method` whose path starts with `prefix`.
    pub(crate) fn calls_to(&self, method: Method, prefix: &str) -> Vec<(String, Vec<u8>)> {
        let inner = self.inner.lock().unwrap();
        inner
            .calls
            .iter()
            .filter(|(m, p, _)| *m == method && p.starts_with(prefix))
            .map(|(_, p, b)| (p.clone(), b.clone()))
            .collect()
    }

    fn respond(&self, method: Method, path: &str, body: Vec<u8>) -> ClientResult<Vec<u8>> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push((method.clone(), path.to_string(), body));

        let route = inner
            .routes
            .iter_mut()
            .filter(|r| r.method == method && path.starts_with(&r.prefix))
            .max_by_key(|r| r.prefix.len())
            .ok_or_else(|| {
                ClientError::Transport(format!("no scripted response for {} {}", method, path))
            })?;

        let body = if route.bodies.len() > 1 {
            route.bodies.pop_front().unwrap_or_default()
        } else {
            route.bodies.front().cloned().unwrap_or_default()
        };
        check_envelope(body.into_bytes())
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(&self, path: &str) -> ClientResult<Vec<u8>> {
        self.respond(Method::GET, path, Vec::new())
    }

    async fn mutate(&self, method: Method, path: &str, body: Vec<u8>) -> ClientResult<Vec<u8>> {
        self.respond(method, path, body)
    }
}
