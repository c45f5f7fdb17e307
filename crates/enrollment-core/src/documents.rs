//! Display URLs for stored photos and documents.
//!
//! Resolved URLs are for display only. The form never carries them, so they
//! are never written back to the backend.

use serde::Serialize;
use serde_json::Value;

/// Resolve a stored file path against the uploads base URL.
///
/// Absolute `http(s)` URLs pass through. Backslashes become `/`, repeated
/// separators collapse, and base and path are joined with exactly one `/`.
/// Blank paths resolve to `None`.
pub fn document_url(base: &str, path: &str) -> Option<String> {
    let path = path.trim();
    if path.is_empty() {
        return None;
    }
    let lower = path.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        return Some(path.to_string());
    }

    let normalized = path.replace('\\', "/");
    let relative: Vec<&str> = normalized.split('/').filter(|s| !s.is_empty()).collect();
    Some(format!("{}/{}", base.trim_end_matches('/'), relative.join("/")))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentLink {
    pub label: String,
    pub url: String,
}

/// Photo and document links of a fetched record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Attachments {
    pub photo: Option<String>,
    pub documents: Vec<DocumentLink>,
}

impl Attachments {
    pub fn is_empty(&self) -> bool {
        self.photo.is_none() && self.documents.is_empty()
    }
}

pub fn attachments(record: &Value, base: &str) -> Attachments {
    let photo = record
        .get("photoPath")
        .and_then(Value::as_str)
        .and_then(|p| document_url(base, p));

    let documents = record
        .get("documents")
        .and_then(Value::as_array)
        .map(|docs| {
            docs.iter()
                .enumerate()
                .filter_map(|(i, doc)| {
                    let url = document_url(base, doc.get("filePath")?.as_str()?)?;
                    Some(DocumentLink {
                        label: document_label(doc, i),
                        url,
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    Attachments { photo, documents }
}

fn document_label(doc: &Value, index: usize) -> String {
    ["documentTypeDisplay", "documentType"]
        .iter()
        .filter_map(|key| match doc.get(*key)? {
            Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .next()
        .unwrap_or_else(|| format!("Document {}", index + 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const BASE: &str = "https://host/Uploads/";

    #[test]
    fn windows_separators_are_normalized() {
        assert_eq!(
            document_url(BASE, "uploads\\photos\\a.png").as_deref(),
            Some("https://host/Uploads/uploads/photos/a.png")
        );
    }

    #[test]
    fn separators_are_not_duplicated() {
        assert_eq!(
            document_url(BASE, "/uploads//docs/b.pdf").as_deref(),
            Some("https://host/Uploads/uploads/docs/b.pdf")
        );
        assert_eq!(
            document_url("https://host/Uploads", "c.pdf").as_deref(),
            Some("https://host/Uploads/c.pdf")
        );
    }

    #[test]
    fn absolute_urls_pass_through() {
        let url = "https://cdn.example.com/x//y.png";
        assert_eq!(document_url(BASE, url).as_deref(), Some(url));
    }

    #[test]
    fn blank_path_has_no_url() {
        assert_eq!(document_url(BASE, "  "), None);
    }

    #[test]
    fn attachments_label_documents() {
        let record = json!({
            "photoPath": "uploads\\photos\\p.jpg",
            "documents": [
                { "filePath": "docs/cit.pdf", "documentTypeDisplay": "Citizenship" },
                { "filePath": "docs/sig.png", "documentType": 2 },
                { "filePath": "docs/other.pdf" },
                { "documentType": "Orphan" }
            ]
        });
        let found = attachments(&record, BASE);
        assert_eq!(
            found.photo.as_deref(),
            Some("https://host/Uploads/uploads/photos/p.jpg")
        );
        let labels: Vec<&str> = found.documents.iter().map(|d| d.label.as_str()).collect();
        assert_eq!(labels, vec!["Citizenship", "2", "Document 3"]);
    }

    #[test]
    fn record_without_files_is_empty() {
        assert!(attachments(&json!({"photoPath": ""}), BASE).is_empty());
    }
}
