//! Uniform result shape of every service operation.

use serde::Serialize;

/// Outcome of a service call. Failures carry a message and optional details.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            errors: Vec::new(),
        }
    }

    pub fn fail(message: impl Into<String>, errors: Vec<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
            errors,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Message for display, falling back to the first error detail.
    pub fn summary(&self) -> &str {
        self.message
            .as_deref()
            .or_else(|| self.errors.first().map(String::as_str))
            .unwrap_or(if self.success { "OK" } else { "Request failed" })
    }
}

impl ApiResponse<()> {
    /// Success without a payload.
    pub fn done(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
            errors: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_summary_prefers_message() {
        let r: ApiResponse<()> = ApiResponse::fail("Failed to delete student", vec!["Delete failed".into()]);
        assert!(!r.success);
        assert_eq!(r.summary(), "Failed to delete student");
    }

    #[test]
    fn serializes_without_empty_parts() {
        let r = ApiResponse::ok(7);
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json, serde_json::json!({"success": true, "data": 7}));
    }
}
