//! Scripted in-memory transport for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use futures::future::BoxFuture;
use url::Url;

use crate::error_handling::TransportError;
use crate::fetch::transport::{Transport, TransportResponse};

/// Answers requests from a fixed URL -> response table and records every URL
/// it was asked for. Unknown URLs fail like an unreachable host.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    routes: HashMap<String, Result<TransportResponse, TransportError>>,
    requested: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(mut self, url: &str, response: TransportResponse) -> Self {
        self.routes.insert(url.to_string(), Ok(response));
        self
    }

    pub(crate) fn jrd(self, url: &str, body: &str) -> Self {
        self.respond(
            url,
            TransportResponse {
                status: 200,
                content_type: Some("application/jrd+json".to_string()),
                body: body.to_string(),
                ..Default::default()
            },
        )
    }

    pub(crate) fn status(self, url: &str, status: u16) -> Self {
        self.respond(
            url,
            TransportResponse {
                status,
                ..Default::default()
            },
        )
    }

    pub(crate) fn fail(mut self, url: &str, error: TransportError) -> Self {
        self.routes.insert(url.to_string(), Err(error));
        self
    }

    pub(crate) fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

impl Transport for ScriptedTransport {
    fn get<'a>(&'a self, url: &'a Url) -> BoxFuture<'a, Result<TransportResponse, TransportError>> {
        Box::pin(async move {
            self.requested.lock().unwrap().push(url.to_string());
            self.routes
                .get(url.as_str())
                .cloned()
                .unwrap_or_else(|| Err(TransportError::Connect(format!("no route to {url}"))))
        })
    }
}

pub(crate) fn redirect(location: &str) -> TransportResponse {
    TransportResponse {
        status: 302,
        location: Some(location.to_string()),
        ..Default::default()
    }
}
