//! Student operations over a [`Transport`].
//!
//! Every operation answers with an [`ApiResponse`]. Transport failures are
//! folded into `success: false` with the message `Network error` so callers
//! handle a single shape.

use enrollment_core::{ApiResponse, PendingUpload, StudentRecord, merge_payloads};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::transport::{ApiRequest, Endpoint, RequestBody, Transport, UploadFile};
use crate::ClientError;

pub const NETWORK_ERROR: &str = "Network error";
pub const NOT_FOUND: &str = "Student not found";

pub struct StudentService<T> {
    transport: T,
}

impl<T: Transport> StudentService<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Create a student, then upload any selected files.
    ///
    /// The create is committed once the register call succeeds; upload
    /// failures are logged and do not change the result.
    pub async fn submit_enrollment(
        &self,
        record: &StudentRecord,
        uploads: &[PendingUpload],
    ) -> ApiResponse<Value> {
        let body = match serde_json::to_value(record) {
            Ok(body) => body,
            Err(err) => return ApiResponse::fail("Failed to submit", vec![err.to_string()]),
        };

        info!(uploads = uploads.len(), "submitting enrollment");
        let reply = match self
            .transport
            .send(ApiRequest::json(Endpoint::Register, body))
            .await
        {
            Ok(reply) => reply,
            Err(err) => return network_error(err),
        };

        if !reply.is_success() {
            let message = reply
                .message()
                .map(str::to_string)
                .unwrap_or_else(|| format!("Error: {}", reply.status));
            warn!(status = reply.status, message = %message, "enrollment rejected");
            return ApiResponse::fail(message.clone(), vec![message]);
        }

        let created_id = reply
            .body
            .get("data")
            .and_then(|d| d.get("id"))
            .or_else(|| reply.body.get("id"))
            .and_then(id_text);
        if let Some(id) = &created_id
            && !uploads.is_empty()
        {
            self.upload_documents(id, uploads).await;
        }

        let message = reply
            .message()
            .unwrap_or("Enrollment submitted successfully!")
            .to_string();
        info!(id = ?created_id, "enrollment created");
        ApiResponse::ok(reply.body).with_message(message)
    }

    async fn upload_documents(&self, id: &str, uploads: &[PendingUpload]) {
        let files = uploads
            .iter()
            .map(|u| UploadFile {
                part: u.part,
                path: u.path.clone(),
            })
            .collect();
        let request = ApiRequest {
            endpoint: Endpoint::Upload(id.to_string()),
            body: RequestBody::Multipart(files),
        };
        info!(id, count = uploads.len(), "uploading documents");
        match self.transport.send(request).await {
            Ok(reply) if reply.is_success() => info!(id, status = reply.status, "documents uploaded"),
            Ok(reply) => warn!(id, status = reply.status, "document upload rejected"),
            Err(err) => warn!(id, error = %err, "document upload failed"),
        }
    }

    pub async fn get_all_students(&self) -> ApiResponse<Vec<Value>> {
        match self.fetch_all().await {
            Ok(Some(students)) => ApiResponse::ok(students),
            Ok(None) => ApiResponse::fail(
                "Failed to fetch students",
                vec!["Failed to retrieve student list".to_string()],
            ),
            Err(err) => network_error(err),
        }
    }

    /// `None` when the backend refuses the list.
    async fn fetch_all(&self) -> Result<Option<Vec<Value>>, ClientError> {
        let reply = self.transport.send(ApiRequest::new(Endpoint::All)).await?;
        if !reply.is_success() {
            warn!(status = reply.status, "student list refused");
            return Ok(None);
        }
        let students = reply
            .payload()
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        info!(count = students.len(), "fetched students");
        Ok(Some(students))
    }

    /// Look a student up by id or pid.
    ///
    /// Both lookup routes are queried and their payloads merged. When neither
    /// answers and the query is numeric, the list is scanned for that id and
    /// the record is refetched by its pid.
    pub async fn get_student_by_id(&self, id_or_pid: &str) -> ApiResponse<Value> {
        let query = id_or_pid.trim();
        if query.is_empty() {
            return ApiResponse::fail("Student ID is required", vec![NOT_FOUND.to_string()]);
        }
        match self.lookup(query).await {
            Ok(response) => response,
            Err(err) => network_error(err),
        }
    }

    async fn lookup(&self, query: &str) -> Result<ApiResponse<Value>, ClientError> {
        let by_id = self
            .transport
            .send(ApiRequest::new(Endpoint::ById(query.to_string())))
            .await?;
        let by_pid = self
            .transport
            .send(ApiRequest::new(Endpoint::ByPid(query.to_string())))
            .await?;

        let merged = merge_payloads(by_id.payload().cloned(), by_pid.payload().cloned());
        if let Some(student) = merged {
            debug!(
                query,
                by_id = by_id.is_success(),
                by_pid = by_pid.is_success(),
                "lookup merged"
            );
            return Ok(ApiResponse::ok(student));
        }

        if let Ok(numeric) = query.parse::<i64>() {
            debug!(query, "direct lookups failed, scanning student list");
            if let Some(student) = self.find_by_numeric_id(numeric).await? {
                return Ok(ApiResponse::ok(student));
            }
        }

        let message = by_id
            .message()
            .or_else(|| by_pid.message())
            .unwrap_or("Failed to fetch student");
        info!(query, "student not found");
        Ok(ApiResponse::fail(message, vec![NOT_FOUND.to_string()]))
    }

    async fn find_by_numeric_id(&self, id: i64) -> Result<Option<Value>, ClientError> {
        let Some(students) = self.fetch_all().await? else {
            return Ok(None);
        };
        let pid = students
            .iter()
            .find(|s| s.get("id").and_then(id_number) == Some(id))
            .and_then(|s| s.get("pid"))
            .and_then(id_text);
        let Some(pid) = pid else {
            debug!(id, "no student with this id in list");
            return Ok(None);
        };

        debug!(id, pid = %pid, "refetching by pid");
        let reply = self
            .transport
            .send(ApiRequest::new(Endpoint::ById(pid)))
            .await?;
        Ok(reply.payload().cloned())
    }

    /// Replace a student record.
    pub async fn update_student(&self, id: &str, record: &Value) -> ApiResponse<Value> {
        info!(id, "updating student");
        let request = ApiRequest::json(Endpoint::Update(id.to_string()), record.clone());
        let reply = match self.transport.send(request).await {
            Ok(reply) => reply,
            Err(err) => return network_error(err),
        };
        if reply.is_success() {
            return ApiResponse::ok(reply.body).with_message("Student updated successfully");
        }

        let mut errors = field_errors(reply.body.get("errors"));
        if errors.is_empty() {
            errors.push(reply.message().unwrap_or("Update failed").to_string());
        }
        let message = reply
            .message()
            .or_else(|| reply.text_field("title"))
            .unwrap_or("Failed to update student");
        warn!(id, status = reply.status, count = errors.len(), "update rejected");
        ApiResponse::fail(message, errors)
    }

    /// Send only the changed fields.
    pub async fn update_student_partial(&self, id: &str, changes: &Value) -> ApiResponse<Value> {
        info!(id, "patching student");
        let request = ApiRequest::json(Endpoint::Patch(id.to_string()), changes.clone());
        let reply = match self.transport.send(request).await {
            Ok(reply) => reply,
            Err(err) => return network_error(err),
        };
        if reply.is_success() {
            return ApiResponse::ok(reply.body).with_message("Student updated successfully");
        }

        let errors = match reply.body.get("errors") {
            Some(Value::Array(items)) => items.iter().map(value_text).collect(),
            Some(Value::Object(fields)) => fields
                .values()
                .flat_map(|v| match v {
                    Value::Array(items) => items.iter().map(value_text).collect(),
                    other => vec![value_text(other)],
                })
                .collect(),
            _ => Vec::new(),
        };
        warn!(id, status = reply.status, "patch rejected");
        ApiResponse::fail(
            reply.message().unwrap_or("Failed to update student"),
            errors,
        )
    }

    pub async fn delete_student(&self, id: &str) -> ApiResponse<()> {
        info!(id, "deleting student");
        match self
            .transport
            .send(ApiRequest::new(Endpoint::Delete(id.to_string())))
            .await
        {
            Ok(reply) if reply.is_success() => ApiResponse::done("Student deleted successfully"),
            Ok(reply) => {
                warn!(id, status = reply.status, "delete rejected");
                ApiResponse::fail("Failed to delete student", vec!["Delete failed".to_string()])
            }
            Err(err) => network_error(err),
        }
    }
}

fn network_error<T>(err: ClientError) -> ApiResponse<T> {
    warn!(error = %err, "request failed");
    ApiResponse::fail(NETWORK_ERROR, vec![err.to_string()])
}

/// Flatten `{ field: [msg, ...] }` validation errors into `field: msg, msg`.
fn field_errors(errors: Option<&Value>) -> Vec<String> {
    let Some(Value::Object(fields)) = errors else {
        return Vec::new();
    };
    fields
        .iter()
        .map(|(field, messages)| {
            let joined = match messages {
                Value::Array(items) => items.iter().map(value_text).collect::<Vec<_>>().join(", "),
                other => value_text(other),
            };
            format!("{field}: {joined}")
        })
        .collect()
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// An id rendered for a URL path.
pub fn id_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn id_number(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
