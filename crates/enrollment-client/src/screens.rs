//! Per-screen state for list, view, edit, delete and enroll.
//!
//! Each screen owns its fetched copy, a busy flag that refuses re-entry while
//! a call is in flight, and the last error or success message. Screens hold
//! no transport; the service is passed to every call.

use enrollment_core::dates::now_iso;
use enrollment_core::{
    ApiResponse, Attachments, EnrollmentWizard, FieldPath, FlowError, FormError, FormModel,
    StudentRecord, attachments, from_backend_record, to_backend_record,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::service::{StudentService, id_text};
use crate::transport::Transport;

pub const EMPTY_QUERY: &str = "Please enter a student ID";
const BUSY: &str = "Another request is still in progress";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScreenStatus {
    pub busy: bool,
    pub error: Option<String>,
    pub success: Option<String>,
}

impl ScreenStatus {
    /// Mark the screen busy. Returns `false`, with an error set, if it already was.
    fn begin(&mut self) -> bool {
        if self.busy {
            self.error = Some(BUSY.to_string());
            return false;
        }
        self.busy = true;
        self.error = None;
        self.success = None;
        true
    }

    fn finish<T>(&mut self, response: &ApiResponse<T>, success: Option<&str>) {
        self.busy = false;
        if response.success {
            self.success = success.map(str::to_string);
        } else {
            self.error = Some(response.summary().to_string());
        }
    }

    /// Reject a blank query without a request.
    fn check_query(&mut self, query: &str) -> bool {
        if query.trim().is_empty() {
            self.error = Some(EMPTY_QUERY.to_string());
            return false;
        }
        true
    }
}

/// One row of the student list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentSummary {
    /// PID, else internal id, else `N/A`.
    pub display_id: String,
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub roll_number: String,
}

impl StudentSummary {
    pub fn from_record(record: &Value) -> Self {
        let text = |key: &str| {
            record
                .get(key)
                .and_then(id_text)
                .unwrap_or_else(|| "N/A".to_string())
        };
        let name = ["firstName", "middleName", "lastName"]
            .iter()
            .filter_map(|k| record.get(*k).and_then(Value::as_str))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        Self {
            display_id: display_id(record),
            name,
            email: text("email"),
            mobile: text("primaryMobile"),
            roll_number: text("rollNumber"),
        }
    }
}

pub fn display_id(record: &Value) -> String {
    record
        .get("pid")
        .and_then(id_text)
        .or_else(|| record.get("id").and_then(id_text))
        .unwrap_or_else(|| "N/A".to_string())
}

// ── List ──

#[derive(Debug, Default)]
pub struct ListScreen {
    pub status: ScreenStatus,
    pub students: Vec<StudentSummary>,
}

impl ListScreen {
    pub async fn load<T: Transport>(&mut self, service: &StudentService<T>) {
        if !self.status.begin() {
            return;
        }
        let response = service.get_all_students().await;
        self.students = response
            .data
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(StudentSummary::from_record)
            .collect();
        info!(count = self.students.len(), "student list loaded");
        self.status.finish(&response, None);
    }
}

// ── View ──

#[derive(Debug)]
pub struct ViewScreen {
    pub status: ScreenStatus,
    pub record: Option<Value>,
    pub attachments: Attachments,
    uploads_base_url: String,
}

impl ViewScreen {
    pub fn new(uploads_base_url: impl Into<String>) -> Self {
        Self {
            status: ScreenStatus::default(),
            record: None,
            attachments: Attachments::default(),
            uploads_base_url: uploads_base_url.into(),
        }
    }

    pub async fn search<T: Transport>(&mut self, service: &StudentService<T>, query: &str) {
        if !self.status.check_query(query) || !self.status.begin() {
            return;
        }
        let response = service.get_student_by_id(query).await;
        self.record = response.data.clone();
        self.attachments = self
            .record
            .as_ref()
            .map(|r| attachments(r, &self.uploads_base_url))
            .unwrap_or_default();
        self.status.finish(&response, None);
    }
}

// ── Edit ──

#[derive(Debug, Default)]
pub struct EditScreen {
    pub status: ScreenStatus,
    pub record: Option<Value>,
    pub form: FormModel,
    query: String,
}

impl EditScreen {
    pub async fn search<T: Transport>(&mut self, service: &StudentService<T>, query: &str) {
        if !self.status.check_query(query) || !self.status.begin() {
            return;
        }
        let response = service.get_student_by_id(query).await;
        self.query = query.trim().to_string();
        self.record = response.data.clone();
        self.form = self
            .record
            .as_ref()
            .map(from_backend_record)
            .unwrap_or_default();
        self.status.finish(&response, None);
    }

    pub fn set_field(&mut self, path: &str, value: Value) -> Result<(), FormError> {
        let path = FieldPath::parse(path)?;
        self.form = self.form.set(&path, value)?;
        Ok(())
    }

    /// Record sent on save: the mapped form plus the server-owned metadata of the fetched copy.
    pub fn payload(&self) -> StudentRecord {
        let fetched = self.record.as_ref();
        let field = |key: &str| fetched.and_then(|r| r.get(key)).filter(|v| !v.is_null());

        let mut record = to_backend_record(&self.form);
        record.id = Some(
            field("id")
                .cloned()
                .unwrap_or_else(|| Value::String(self.query.clone())),
        );
        record.pid = Some(
            field("pid")
                .and_then(id_text)
                .unwrap_or_else(|| self.query.clone()),
        );
        record.created_on = field("createdOn").and_then(Value::as_str).map(str::to_string);
        record.updated_on = Some(now_iso());
        record.photo_path = field("photoPath")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        record.documents = field("documents")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        record.is_active = Some(field("isActive").and_then(Value::as_bool).unwrap_or(true));
        record
    }

    pub async fn save<T: Transport>(&mut self, service: &StudentService<T>) {
        if self.record.is_none() {
            self.status.error = Some("Load a student before saving".to_string());
            return;
        }
        if !self.status.begin() {
            return;
        }
        let record = self.payload();
        let id = record
            .id
            .as_ref()
            .and_then(id_text)
            .unwrap_or_else(|| self.query.clone());
        let response = match serde_json::to_value(&record) {
            Ok(body) => service.update_student(&id, &body).await,
            Err(err) => ApiResponse::fail("Failed to update student", vec![err.to_string()]),
        };
        self.status.finish(&response, Some("Student updated successfully"));
    }
}

// ── Delete ──

#[derive(Debug, Default)]
pub struct DeleteScreen {
    pub status: ScreenStatus,
    pub record: Option<Value>,
    pub confirming: bool,
    query: String,
}

impl DeleteScreen {
    pub async fn search<T: Transport>(&mut self, service: &StudentService<T>, query: &str) {
        if !self.status.check_query(query) || !self.status.begin() {
            return;
        }
        let response = service.get_student_by_id(query).await;
        self.query = query.trim().to_string();
        self.record = response.data.clone();
        self.confirming = false;
        self.status.finish(&response, None);
    }

    /// First step of the delete. Requires a fetched record.
    pub fn request_delete(&mut self) -> bool {
        if self.record.is_none() {
            self.status.error = Some("Search for a student first".to_string());
            return false;
        }
        self.confirming = true;
        true
    }

    pub fn cancel(&mut self) {
        self.confirming = false;
    }

    pub async fn confirm_delete<T: Transport>(&mut self, service: &StudentService<T>) {
        if !self.confirming {
            self.status.error = Some("Delete has not been requested".to_string());
            return;
        }
        if !self.status.begin() {
            return;
        }
        let id = self
            .record
            .as_ref()
            .and_then(|r| r.get("id"))
            .and_then(id_text)
            .unwrap_or_else(|| self.query.clone());
        debug!(id = %id, "confirmed delete");
        let response = service.delete_student(&id).await;
        if response.success {
            self.record = None;
        }
        self.confirming = false;
        self.status.finish(&response, Some("Student record deleted successfully"));
    }
}

// ── Enroll ──

#[derive(Debug, Default)]
pub struct EnrollScreen {
    pub status: ScreenStatus,
    pub wizard: EnrollmentWizard,
}

impl EnrollScreen {
    pub fn new(wizard: EnrollmentWizard) -> Self {
        Self {
            status: ScreenStatus::default(),
            wizard,
        }
    }

    /// Validate, map and submit the form, then upload any selected files.
    pub async fn submit<T: Transport>(
        &mut self,
        service: &StudentService<T>,
    ) -> Result<ApiResponse<Value>, FlowError> {
        let record = self.wizard.begin_submit()?;
        self.status.busy = true;
        let uploads = self.wizard.pending_uploads();
        let response = service.submit_enrollment(&record, &uploads).await;
        self.wizard.finish_submit(&response);
        self.status.finish(&response, response.message.as_deref());
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeTransport;
    use crate::transport::{Endpoint, RequestBody};
    use enrollment_core::Step;
    use serde_json::json;

    fn stored_student() -> Value {
        json!({
            "id": 42,
            "pid": "P042",
            "createdOn": "2024-01-05T09:00:00Z",
            "isActive": false,
            "photoPath": "uploads\\photos\\p.jpg",
            "documents": [{"filePath": "docs/c.pdf", "documentTypeDisplay": "Citizenship"}],
            "firstName": "Sita",
            "lastName": "Sharma",
            "email": "sita@example.com",
            "parentGuardians": [
                {"parentType": 1, "fullName": "Gita"},
                {"parentType": 0, "fullName": "Hari"}
            ]
        })
    }

    #[tokio::test]
    async fn empty_query_is_rejected_locally() {
        let service = StudentService::new(FakeTransport::new());
        let mut view = ViewScreen::new("https://host/Uploads/");
        view.search(&service, "  ").await;
        assert_eq!(view.status.error.as_deref(), Some(EMPTY_QUERY));
        assert!(service.transport().calls().is_empty());
    }

    #[tokio::test]
    async fn list_projects_summaries() {
        let fake = FakeTransport::new().reply(
            Endpoint::All,
            200,
            json!([
                {"id": 1, "pid": "P001", "firstName": "Sita", "middleName": "", "lastName": "Sharma"},
                {"id": 2, "firstName": "Ram", "lastName": "Thapa", "email": "ram@example.com"},
                {}
            ]),
        );
        let service = StudentService::new(fake);
        let mut list = ListScreen::default();
        list.load(&service).await;

        assert!(!list.status.busy);
        let ids: Vec<&str> = list.students.iter().map(|s| s.display_id.as_str()).collect();
        assert_eq!(ids, vec!["P001", "2", "N/A"]);
        assert_eq!(list.students[0].name, "Sita Sharma");
        assert_eq!(list.students[1].email, "ram@example.com");
        assert_eq!(list.students[0].email, "N/A");
    }

    #[tokio::test]
    async fn view_resolves_attachments() {
        let fake = FakeTransport::new().reply(Endpoint::ById("P042".into()), 200, stored_student());
        let service = StudentService::new(fake);
        let mut view = ViewScreen::new("https://host/Uploads/");
        view.search(&service, "P042").await;

        assert!(view.status.error.is_none());
        assert_eq!(
            view.attachments.photo.as_deref(),
            Some("https://host/Uploads/uploads/photos/p.jpg")
        );
        assert_eq!(view.attachments.documents[0].label, "Citizenship");
    }

    #[tokio::test]
    async fn view_reports_not_found() {
        let service = StudentService::new(FakeTransport::new());
        let mut view = ViewScreen::new("https://host/Uploads/");
        view.search(&service, "P404").await;
        assert!(view.record.is_none());
        assert_eq!(view.status.error.as_deref(), Some("Failed to fetch student"));
    }

    #[tokio::test]
    async fn edit_saves_with_carried_metadata() {
        let fake = FakeTransport::new()
            .reply(Endpoint::ById("P042".into()), 200, stored_student())
            .reply(Endpoint::Update("42".into()), 200, json!({"success": true}));
        let service = StudentService::new(fake);
        let mut edit = EditScreen::default();
        edit.search(&service, "P042").await;
        assert_eq!(edit.form.parent_guardian_details.father.full_name, "Hari");

        edit.set_field("personalDetails.firstName", json!("Sunita")).unwrap();
        edit.save(&service).await;
        assert_eq!(edit.status.success.as_deref(), Some("Student updated successfully"));

        let calls = service.transport().calls();
        let put = calls
            .iter()
            .find(|c| c.endpoint == Endpoint::Update("42".into()))
            .unwrap();
        let RequestBody::Json(body) = &put.body else {
            panic!("expected a JSON body");
        };
        assert_eq!(body["firstName"], "Sunita");
        assert_eq!(body["id"], 42);
        assert_eq!(body["pid"], "P042");
        assert_eq!(body["createdOn"], "2024-01-05T09:00:00Z");
        assert_eq!(body["isActive"], false);
        assert_eq!(body["photoPath"], "uploads\\photos\\p.jpg");
        assert_eq!(body["documents"].as_array().unwrap().len(), 1);
        assert!(body["updatedOn"].as_str().is_some());
        assert_eq!(body["parentGuardians"][0]["parentType"], 0);
        assert_eq!(body["parentGuardians"][0]["fullName"], "Hari");
    }

    #[tokio::test]
    async fn edit_rejects_unknown_field() {
        let mut edit = EditScreen::default();
        assert!(edit.set_field("personalDetails.nickname", json!("x")).is_err());
    }

    #[tokio::test]
    async fn delete_is_two_step_and_uses_record_id() {
        let fake = FakeTransport::new()
            .reply(Endpoint::ById("P042".into()), 200, stored_student())
            .reply(Endpoint::Delete("42".into()), 200, Value::Null);
        let service = StudentService::new(fake);
        let mut delete = DeleteScreen::default();

        delete.confirm_delete(&service).await;
        assert!(delete.status.error.is_some());

        delete.search(&service, "P042").await;
        assert!(delete.request_delete());
        delete.confirm_delete(&service).await;
        assert_eq!(
            delete.status.success.as_deref(),
            Some("Student record deleted successfully")
        );
        assert!(delete.record.is_none());
        assert!(
            service
                .transport()
                .endpoints()
                .contains(&Endpoint::Delete("42".into()))
        );
    }

    #[tokio::test]
    async fn enroll_rejects_incomplete_form() {
        let service = StudentService::new(FakeTransport::new());
        let mut screen = EnrollScreen::default();
        screen.wizard.jump(Step::LAST);
        assert!(matches!(
            screen.submit(&service).await,
            Err(FlowError::FormInvalid(_))
        ));
        assert!(service.transport().calls().is_empty());
    }

    #[test]
    fn busy_screen_refuses_reentry() {
        let mut status = ScreenStatus::default();
        assert!(status.begin());
        assert!(!status.begin());
        assert_eq!(status.error.as_deref(), Some(BUSY));
    }
}
