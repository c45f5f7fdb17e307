//! In-memory transport for service and screen tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::transport::{ApiRequest, Endpoint, Reply, Transport};
use crate::ClientError;

/// Answers requests from a route table and records every request it sees.
///
/// Unrouted endpoints answer 404 with an empty body.
#[derive(Default)]
pub struct FakeTransport {
    routes: Mutex<HashMap<Endpoint, Result<Reply, String>>>,
    calls: Mutex<Vec<ApiRequest>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, endpoint: Endpoint, status: u16, body: Value) -> Self {
        self.set(endpoint, Ok(Reply { status, body }));
        self
    }

    pub fn fail(self, endpoint: Endpoint, error: &str) -> Self {
        self.set(endpoint, Err(error.to_string()));
        self
    }

    pub fn set(&self, endpoint: Endpoint, answer: Result<Reply, String>) {
        self.routes.lock().unwrap().insert(endpoint, answer);
    }

    pub fn calls(&self) -> Vec<ApiRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn endpoints(&self) -> Vec<Endpoint> {
        self.calls().into_iter().map(|c| c.endpoint).collect()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn send(&self, request: ApiRequest) -> Result<Reply, ClientError> {
        let answer = self.routes.lock().unwrap().get(&request.endpoint).cloned();
        self.calls.lock().unwrap().push(request);
        match answer {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(message)) => Err(ClientError::Other(message)),
            None => Ok(Reply {
                status: 404,
                body: Value::Null,
            }),
        }
    }
}
