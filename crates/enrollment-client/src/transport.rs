//! Request vocabulary shared by the service and its transports.

use async_trait::async_trait;
use serde_json::Value;

use crate::ClientError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    /// Safe to resend after a transport failure.
    pub fn is_idempotent(self) -> bool {
        matches!(self, Method::Get | Method::Put | Method::Delete)
    }
}

/// Backend endpoints, relative to the API base URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Register,
    All,
    /// `GET /Student/{idOrPid}`
    ById(String),
    /// `GET /Student/pid/{pid}`
    ByPid(String),
    Update(String),
    Patch(String),
    Delete(String),
    Upload(String),
}

impl Endpoint {
    pub fn method(&self) -> Method {
        match self {
            Endpoint::Register | Endpoint::Upload(_) => Method::Post,
            Endpoint::All | Endpoint::ById(_) | Endpoint::ByPid(_) => Method::Get,
            Endpoint::Update(_) => Method::Put,
            Endpoint::Patch(_) => Method::Patch,
            Endpoint::Delete(_) => Method::Delete,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Endpoint::Register => "/Student/register".to_string(),
            Endpoint::All => "/Student/all".to_string(),
            Endpoint::ById(id)
            | Endpoint::Update(id)
            | Endpoint::Patch(id)
            | Endpoint::Delete(id) => format!("/Student/{id}"),
            Endpoint::ByPid(pid) => format!("/Student/pid/{pid}"),
            Endpoint::Upload(id) => format!("/Student/{id}/upload-files"),
        }
    }
}

/// One multipart file part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub part: &'static str,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(Value),
    Multipart(Vec<UploadFile>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub endpoint: Endpoint,
    pub body: RequestBody,
}

impl ApiRequest {
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            body: RequestBody::Empty,
        }
    }

    pub fn json(endpoint: Endpoint, body: Value) -> Self {
        Self {
            endpoint,
            body: RequestBody::Json(body),
        }
    }
}

/// Status and parsed body of any HTTP answer, successful or not.
///
/// Bodies that are not JSON are kept as a JSON string; empty bodies are null.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: u16,
    pub body: Value,
}

impl Reply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The body with a `data` envelope removed. `None` for failures and empty bodies.
    pub fn payload(&self) -> Option<&Value> {
        if !self.is_success() {
            return None;
        }
        let payload = match self.body.get("data") {
            Some(data) if !data.is_null() => data,
            _ => &self.body,
        };
        (!payload.is_null()).then_some(payload)
    }

    pub fn message(&self) -> Option<&str> {
        self.text_field("message")
    }

    pub fn text_field(&self, key: &str) -> Option<&str> {
        self.body
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<Reply, ClientError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn endpoint_paths() {
        assert_eq!(Endpoint::ByPid("P042".into()).path(), "/Student/pid/P042");
        assert_eq!(Endpoint::Upload("7".into()).path(), "/Student/7/upload-files");
        assert_eq!(Endpoint::Patch("7".into()).method(), Method::Patch);
        assert!(!Method::Post.is_idempotent());
        assert!(!Method::Patch.is_idempotent());
        assert!(Method::Put.is_idempotent());
    }

    #[test]
    fn payload_unwraps_data_envelope() {
        let wrapped = Reply {
            status: 200,
            body: json!({"data": {"id": 1}, "message": "ok"}),
        };
        assert_eq!(wrapped.payload(), Some(&json!({"id": 1})));

        let bare = Reply {
            status: 200,
            body: json!([{"id": 1}]),
        };
        assert_eq!(bare.payload(), Some(&json!([{"id": 1}])));
    }

    #[test]
    fn failures_and_empty_bodies_have_no_payload() {
        let missing = Reply {
            status: 404,
            body: json!({"message": "Student not found"}),
        };
        assert_eq!(missing.payload(), None);
        assert_eq!(missing.message(), Some("Student not found"));

        let empty = Reply {
            status: 204,
            body: Value::Null,
        };
        assert_eq!(empty.payload(), None);
    }
}
