//! Seven-step enrollment wizard.
//!
//! The wizard owns the form and gates navigation on per-step validation.
//! Submission is split into [`EnrollmentWizard::begin_submit`], which
//! validates and maps the form, and [`EnrollmentWizard::finish_submit`],
//! which records the backend's answer. The network call between the two is
//! the caller's business.

use std::fmt;

use serde_json::Value;
use tracing::{debug, info};

use crate::error::{FlowError, FormError};
use crate::form::FormModel;
use crate::mapper::to_backend_record;
use crate::path::FieldPath;
use crate::record::StudentRecord;
use crate::response::ApiResponse;
use crate::validate::{FieldError, validate_form, validate_step};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Step {
    Personal,
    Address,
    Guardian,
    Academic,
    Financial,
    Extracurricular,
    Declaration,
}

impl Step {
    pub const ALL: [Step; 7] = [
        Step::Personal,
        Step::Address,
        Step::Guardian,
        Step::Academic,
        Step::Financial,
        Step::Extracurricular,
        Step::Declaration,
    ];
    pub const FIRST: Step = Step::Personal;
    pub const LAST: Step = Step::Declaration;

    /// 1-based position.
    pub fn number(self) -> usize {
        self as usize + 1
    }

    pub fn from_number(n: usize) -> Option<Step> {
        n.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn title(self) -> &'static str {
        match self {
            Step::Personal => "Personal & Biometric Details",
            Step::Address => "Address Details",
            Step::Guardian => "Parent/Guardian Details",
            Step::Academic => "Academic Details",
            Step::Financial => "Financial Details",
            Step::Extracurricular => "Extracurricular & Other Info",
            Step::Declaration => "Declaration",
        }
    }

    /// Form-model section the step edits.
    pub fn section(self) -> &'static str {
        match self {
            Step::Personal => "personalDetails",
            Step::Address => "addressDetails",
            Step::Guardian => "parentGuardianDetails",
            Step::Academic => "academicDetails",
            Step::Financial => "financialDetails",
            Step::Extracurricular => "extracurricularDetails",
            Step::Declaration => "declaration",
        }
    }

    fn next(self) -> Step {
        Step::from_number(self.number() + 1).unwrap_or(Step::LAST)
    }

    fn previous(self) -> Option<Step> {
        Step::from_number(self.number() - 1)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step {} ({})", self.number(), self.title())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Editing,
    Submitting,
    Submitted,
}

/// A local file selected for one of the multipart upload parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingUpload {
    pub part: &'static str,
    pub path: String,
}

/// Upload slots in multipart order, keyed by part name.
pub fn pending_uploads(form: &FormModel) -> Vec<PendingUpload> {
    let a = &form.academic_details;
    [
        ("PhotoFile", &a.photo_upload),
        ("CitizenshipFile", &a.citizenship_upload),
        ("SignatureFile", &a.signature_upload),
        ("CharacterCertificateFile", &a.character_certificate_upload),
    ]
    .into_iter()
    .filter(|(_, path)| !path.trim().is_empty())
    .map(|(part, path)| PendingUpload {
        part,
        path: path.trim().to_string(),
    })
    .collect()
}

#[derive(Debug, Clone)]
pub struct EnrollmentWizard {
    form: FormModel,
    step: Step,
    errors: Vec<FieldError>,
    phase: Phase,
    message: Option<String>,
}

impl Default for EnrollmentWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl EnrollmentWizard {
    pub fn new() -> Self {
        Self::with_form(FormModel::default())
    }

    /// Start from a pre-filled form, e.g. one loaded from a file.
    pub fn with_form(form: FormModel) -> Self {
        Self {
            form,
            step: Step::FIRST,
            errors: Vec::new(),
            phase: Phase::Editing,
            message: None,
        }
    }

    pub fn form(&self) -> &FormModel {
        &self.form
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Outcome message of the last submission.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn pending_uploads(&self) -> Vec<PendingUpload> {
        pending_uploads(&self.form)
    }

    /// Set one field. The form is left untouched when the update is rejected.
    pub fn update(&mut self, path: &str, value: Value) -> Result<(), FormError> {
        let path = FieldPath::parse(path)?;
        self.form = self.form.set(&path, value)?;
        Ok(())
    }

    /// Validate the current step and advance on success.
    pub fn next(&mut self) -> Result<Step, FlowError> {
        let errors = validate_step(&self.form, self.step);
        if !errors.is_empty() {
            debug!(step = self.step.number(), count = errors.len(), "step rejected");
            self.errors = errors.clone();
            return Err(FlowError::Invalid {
                step: self.step,
                errors,
            });
        }
        self.errors.clear();
        self.step = self.step.next();
        Ok(self.step)
    }

    pub fn previous(&mut self) -> Result<Step, FlowError> {
        let step = self.step.previous().ok_or(FlowError::AtFirstStep)?;
        self.step = step;
        self.errors.clear();
        Ok(step)
    }

    /// Go to any step without validation.
    pub fn jump(&mut self, step: Step) {
        self.step = step;
    }

    /// Validate the whole form and map it for submission.
    ///
    /// On success the wizard is `Submitting` until [`finish_submit`](Self::finish_submit).
    pub fn begin_submit(&mut self) -> Result<StudentRecord, FlowError> {
        if self.phase == Phase::Submitting {
            return Err(FlowError::Busy);
        }
        if self.step != Step::LAST {
            return Err(FlowError::NotOnFinalStep);
        }
        let errors = validate_form(&self.form);
        if !errors.is_empty() {
            self.errors = errors.clone();
            return Err(FlowError::FormInvalid(errors));
        }
        self.errors.clear();
        self.message = None;
        self.phase = Phase::Submitting;
        info!("enrollment submission started");
        Ok(to_backend_record(&self.form))
    }

    pub fn finish_submit<T>(&mut self, response: &ApiResponse<T>) {
        self.message = Some(response.summary().to_string());
        if response.success {
            self.phase = Phase::Submitted;
            info!("enrollment submitted");
        } else {
            self.phase = Phase::Editing;
            info!(message = response.summary(), "enrollment submission failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn complete_form() -> FormModel {
        let mut form = FormModel::default();
        let p = &mut form.personal_details;
        p.first_name = "Sita".into();
        p.last_name = "Sharma".into();
        p.date_of_birth = "2001-02-03".into();
        p.gender = "Female".into();
        p.email = "sita@example.com".into();
        p.primary_mobile = "9841000000".into();
        p.emergency_contact_name = "Gita".into();
        p.emergency_contact_number = "9841000001".into();
        let a = &mut form.address_details;
        a.permanent.province = "Gandaki".into();
        a.permanent.district = "Kaski".into();
        a.permanent.municipality = "Pokhara".into();
        a.permanent.ward_number = "8".into();
        a.same_as_permanent = true;
        form.parent_guardian_details.father.full_name = "Hari".into();
        form.parent_guardian_details.mother.full_name = "Gita".into();
        let e = &mut form.academic_details.current_enrollment;
        e.faculty = "Management".into();
        e.program = "BBA".into();
        e.course_level = "Bachelor".into();
        form.financial_details.fee_category = "Regular".into();
        form.declaration.agreed_to_terms = true;
        form.declaration.place = "Pokhara".into();
        form
    }

    #[test]
    fn empty_first_name_blocks_step_one() {
        let mut wizard = EnrollmentWizard::new();
        let err = wizard.next().unwrap_err();
        assert!(matches!(err, FlowError::Invalid { step: Step::Personal, .. }));
        assert_eq!(wizard.step(), Step::Personal);
        assert!(
            wizard
                .errors()
                .iter()
                .any(|e| e.path == "personalDetails.firstName")
        );
        assert!(
            wizard
                .errors()
                .iter()
                .all(|e| e.path.starts_with("personalDetails."))
        );
    }

    #[test]
    fn valid_step_advances_and_clears_errors() {
        let mut wizard = EnrollmentWizard::with_form(complete_form());
        wizard.update("personalDetails.firstName", json!("")).unwrap();
        assert!(wizard.next().is_err());
        wizard.update("personalDetails.firstName", json!("Sita")).unwrap();
        assert_eq!(wizard.next(), Ok(Step::Address));
        assert!(wizard.errors().is_empty());
    }

    #[test]
    fn next_is_clamped_at_last_step() {
        let mut wizard = EnrollmentWizard::with_form(complete_form());
        wizard.jump(Step::LAST);
        assert_eq!(wizard.next(), Ok(Step::LAST));
    }

    #[test]
    fn previous_fails_on_first_step() {
        let mut wizard = EnrollmentWizard::new();
        assert_eq!(wizard.previous(), Err(FlowError::AtFirstStep));
        wizard.jump(Step::Academic);
        assert_eq!(wizard.previous(), Ok(Step::Guardian));
    }

    #[test]
    fn bad_update_leaves_form_unchanged() {
        let mut wizard = EnrollmentWizard::with_form(complete_form());
        let before = wizard.form().clone();
        assert!(wizard.update("personalDetails.firstNme", json!("x")).is_err());
        assert!(wizard.update("personalDetails..firstName", json!("x")).is_err());
        assert_eq!(wizard.form(), &before);
    }

    #[test]
    fn submit_only_from_last_step() {
        let mut wizard = EnrollmentWizard::with_form(complete_form());
        assert_eq!(wizard.begin_submit().unwrap_err(), FlowError::NotOnFinalStep);
    }

    #[test]
    fn submit_validates_whole_form() {
        let mut wizard = EnrollmentWizard::new();
        wizard.jump(Step::LAST);
        assert!(matches!(wizard.begin_submit(), Err(FlowError::FormInvalid(_))));
        assert_eq!(wizard.phase(), Phase::Editing);
        assert!(!wizard.errors().is_empty());
    }

    #[test]
    fn submission_lifecycle() {
        let mut wizard = EnrollmentWizard::with_form(complete_form());
        wizard.jump(Step::LAST);
        let record = wizard.begin_submit().unwrap();
        assert_eq!(record.first_name, "Sita");
        assert_eq!(wizard.phase(), Phase::Submitting);
        assert_eq!(wizard.begin_submit().unwrap_err(), FlowError::Busy);

        wizard.finish_submit(&ApiResponse::<()>::fail("Email already registered", vec![]));
        assert_eq!(wizard.phase(), Phase::Editing);
        assert_eq!(wizard.message(), Some("Email already registered"));

        wizard.begin_submit().unwrap();
        wizard.finish_submit(&ApiResponse::ok(json!({"id": 7})).with_message("Enrollment submitted successfully!"));
        assert_eq!(wizard.phase(), Phase::Submitted);
    }

    #[test]
    fn uploads_in_part_order() {
        let mut form = FormModel::default();
        form.academic_details.signature_upload = "sig.png".into();
        form.academic_details.photo_upload = " photo.jpg ".into();
        let parts: Vec<_> = pending_uploads(&form).into_iter().map(|u| (u.part, u.path)).collect();
        assert_eq!(
            parts,
            vec![
                ("PhotoFile", "photo.jpg".to_string()),
                ("SignatureFile", "sig.png".to_string())
            ]
        );
    }

    #[test]
    fn step_numbers() {
        assert_eq!(Step::Personal.number(), 1);
        assert_eq!(Step::LAST.number(), 7);
        assert_eq!(Step::from_number(3), Some(Step::Guardian));
        assert_eq!(Step::from_number(0), None);
        assert_eq!(Step::from_number(8), None);
    }
}
