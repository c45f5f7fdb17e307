//! Per-step validation of the enrollment form.
//!
//! Errors are keyed by form-model paths (`personalDetails.firstName`,
//! `parentGuardianDetails.legalGuardians[0].relation`) so a front end can
//! attach them to the field that produced them.

use std::fmt;

use serde::Serialize;

use crate::dates::normalize_date;
use crate::form::{Address, FormModel, Parent};
use crate::labels::{self, LabelTable, OTHER};
use crate::wizard::Step;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub path: String,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Validate the section a wizard step edits.
pub fn validate_step(form: &FormModel, step: Step) -> Vec<FieldError> {
    let mut c = Checker::default();
    match step {
        Step::Personal => personal(&mut c, form),
        Step::Address => address(&mut c, form),
        Step::Guardian => guardian(&mut c, form),
        Step::Academic => academic(&mut c, form),
        Step::Financial => financial(&mut c, form),
        Step::Extracurricular => extracurricular(&mut c, form),
        Step::Declaration => declaration(&mut c, form),
    }
    c.errors
}

/// Validate every step, in step order.
pub fn validate_form(form: &FormModel) -> Vec<FieldError> {
    Step::ALL
        .iter()
        .flat_map(|step| validate_step(form, *step))
        .collect()
}

// ── Steps ──

fn personal(c: &mut Checker, form: &FormModel) {
    let p = &form.personal_details;
    let at = |field: &str| format!("personalDetails.{field}");

    c.required(at("firstName"), &p.first_name);
    c.required(at("lastName"), &p.last_name);
    if c.required(at("dateOfBirth"), &p.date_of_birth) {
        c.date(at("dateOfBirth"), &p.date_of_birth);
    }
    if c.required(at("gender"), &p.gender) {
        c.label(at("gender"), &p.gender, &labels::GENDER);
    }
    c.label(at("nationality"), &p.nationality, &labels::NATIONALITY);
    c.label(at("bloodGroup"), &p.blood_group, &labels::BLOOD_GROUP);
    c.label(at("maritalStatus"), &p.marital_status, &labels::MARITAL_STATUS);
    c.date(at("citizenshipIssueDate"), &p.citizenship_issue_date);

    if c.required(at("email"), &p.email) {
        c.email(at("email"), &p.email);
    }
    c.email(at("alternateEmail"), &p.alternate_email);
    if c.required(at("primaryMobile"), &p.primary_mobile) {
        c.mobile(at("primaryMobile"), &p.primary_mobile);
    }
    c.mobile(at("secondaryMobile"), &p.secondary_mobile);

    c.required(at("emergencyContactName"), &p.emergency_contact_name);
    c.label(
        at("emergencyContactRelation"),
        &p.emergency_contact_relation,
        &labels::RELATION,
    );
    if c.required(at("emergencyContactNumber"), &p.emergency_contact_number) {
        c.mobile(at("emergencyContactNumber"), &p.emergency_contact_number);
    }

    if !p.disability_percentage.trim().is_empty() {
        match p.disability_percentage.trim().parse::<f64>() {
            Ok(n) if (0.0..=100.0).contains(&n) => {}
            _ => c.push(at("disabilityPercentage"), "must be a number between 0 and 100"),
        }
    }
}

fn address(c: &mut Checker, form: &FormModel) {
    let a = &form.address_details;
    address_fields(c, "addressDetails.permanent", &a.permanent);
    if !a.same_as_permanent {
        address_fields(c, "addressDetails.temporary", &a.temporary);
    }
}

fn address_fields(c: &mut Checker, prefix: &str, address: &Address) {
    let at = |field: &str| format!("{prefix}.{field}");
    c.required(at("province"), &address.province);
    c.required(at("district"), &address.district);
    c.required(at("municipality"), &address.municipality);
    if c.required(at("wardNumber"), &address.ward_number) {
        match address.ward_number.trim().parse::<u32>() {
            Ok(1..=35) => {}
            _ => c.push(at("wardNumber"), "must be a ward number between 1 and 35"),
        }
    }
}

fn guardian(c: &mut Checker, form: &FormModel) {
    let g = &form.parent_guardian_details;
    parent_fields(c, "parentGuardianDetails.father", &g.father);
    parent_fields(c, "parentGuardianDetails.mother", &g.mother);

    for (i, guardian) in g.legal_guardians.iter().enumerate() {
        let at = |field: &str| format!("parentGuardianDetails.legalGuardians[{i}].{field}");
        c.required(at("fullName"), &guardian.full_name);
        c.required(at("relation"), &guardian.relation);
        c.mobile(at("mobileNumber"), &guardian.mobile_number);
        c.email(at("email"), &guardian.email);
    }

    c.amount(
        "parentGuardianDetails.annualFamilyIncome".to_string(),
        &g.annual_family_income,
    );
}

fn parent_fields(c: &mut Checker, prefix: &str, parent: &Parent) {
    let at = |field: &str| format!("{prefix}.{field}");
    c.required(at("fullName"), &parent.full_name);
    c.mobile(at("mobileNumber"), &parent.mobile_number);
    c.email(at("email"), &parent.email);
}

fn academic(c: &mut Checker, form: &FormModel) {
    let e = &form.academic_details.current_enrollment;
    let at = |field: &str| format!("academicDetails.currentEnrollment.{field}");

    if c.required(at("faculty"), &e.faculty) {
        c.label(at("faculty"), &e.faculty, &labels::FACULTY);
    }
    if c.required(at("program"), &e.program) {
        c.label(at("program"), &e.program, &labels::PROGRAM);
    }
    if c.required(at("courseLevel"), &e.course_level) {
        c.label(at("courseLevel"), &e.course_level, &labels::LEVEL);
    }
    c.year(at("academicYear"), &e.academic_year);
    c.label(at("semesterClass"), &e.semester_class, &labels::SEMESTER);
    c.label(at("section"), &e.section, &labels::SECTION);
    c.date(at("enrollDate"), &e.enroll_date);
    c.label(at("academicStatus"), &e.academic_status, &labels::ACADEMIC_STATUS);

    for (i, history) in form.academic_details.previous_history.iter().enumerate() {
        let at = |field: &str| format!("academicDetails.previousHistory[{i}].{field}");
        c.required(at("qualification"), &history.qualification);
        c.required(at("institutionName"), &history.institution_name);
        c.year(at("passedYear"), &history.passed_year);
    }
}

fn financial(c: &mut Checker, form: &FormModel) {
    let f = &form.financial_details;
    let at = |field: &str| format!("financialDetails.{field}");

    if c.required(at("feeCategory"), &f.fee_category) {
        c.label(at("feeCategory"), &f.fee_category, &labels::FEE_CATEGORY);
    }
    let s = &f.scholarship_details;
    c.label(
        at("scholarshipDetails.scholarshipType"),
        &s.scholarship_type,
        &labels::SCHOLARSHIP_TYPE,
    );
    c.amount(at("scholarshipDetails.scholarshipAmount"), &s.scholarship_amount);

    if let Some(bank) = &f.bank_details {
        c.required(at("bankDetails.accountHolderName"), &bank.account_holder_name);
        if c.required(at("bankDetails.bankName"), &bank.bank_name) {
            c.label(at("bankDetails.bankName"), &bank.bank_name, &labels::BANK);
        }
        c.required(at("bankDetails.accountNumber"), &bank.account_number);
    }
}

fn extracurricular(c: &mut Checker, form: &FormModel) {
    let x = &form.extracurricular_details;
    let at = |field: &str| format!("extracurricularDetails.{field}");

    for (i, interest) in x.interests.iter().enumerate() {
        c.label(format!("extracurricularDetails.interests[{i}]"), interest, &labels::INTERESTS);
    }
    if x.interests.iter().any(|i| i.eq_ignore_ascii_case(OTHER)) {
        c.required(at("otherInterestDetails"), &x.other_interest_details);
    }
    c.label(at("hostellerStatus"), &x.hosteller_status, &labels::HOSTELLER_STATUS);
    c.label(at("transportationMethod"), &x.transportation_method, &labels::TRANSPORT);
}

fn declaration(c: &mut Checker, form: &FormModel) {
    let d = &form.declaration;
    if !d.agreed_to_terms {
        c.push(
            "declaration.agreedToTerms".to_string(),
            "the declaration must be accepted",
        );
    }
    c.date("declaration.dateOfApplication".to_string(), &d.date_of_application);
    c.required("declaration.place".to_string(), &d.place);
}

// ── Checks ──

#[derive(Default)]
struct Checker {
    errors: Vec<FieldError>,
}

impl Checker {
    fn push(&mut self, path: String, message: &str) {
        self.errors.push(FieldError {
            path,
            message: message.to_string(),
        });
    }

    /// Records an error for a blank value. Returns whether the value is present.
    fn required(&mut self, path: String, value: &str) -> bool {
        if value.trim().is_empty() {
            self.push(path, "is required");
            false
        } else {
            true
        }
    }

    fn date(&mut self, path: String, value: &str) {
        if !value.trim().is_empty() && normalize_date(value).is_none() {
            self.push(path, "must be a valid date (YYYY-MM-DD)");
        }
    }

    fn email(&mut self, path: String, value: &str) {
        let value = value.trim();
        if !value.is_empty() && !looks_like_email(value) {
            self.push(path, "must be a valid email address");
        }
    }

    fn mobile(&mut self, path: String, value: &str) {
        let value = value.trim();
        if !value.is_empty() && !(value.len() == 10 && value.bytes().all(|b| b.is_ascii_digit())) {
            self.push(path, "must be a 10-digit mobile number");
        }
    }

    fn year(&mut self, path: String, value: &str) {
        let value = value.trim();
        if !value.is_empty() && !(value.len() == 4 && value.bytes().all(|b| b.is_ascii_digit())) {
            self.push(path, "must be a 4-digit year");
        }
    }

    fn amount(&mut self, path: String, value: &str) {
        let value = value.trim().replace(',', "");
        if value.is_empty() {
            return;
        }
        match value.parse::<f64>() {
            Ok(n) if n >= 0.0 => {}
            _ => self.push(path, "must be a non-negative number"),
        }
    }

    fn label(&mut self, path: String, value: &str, table: &LabelTable) {
        if !value.trim().is_empty() && table.code_for(value).is_none() {
            let allowed: Vec<&str> = table.ui_labels().collect();
            self.errors.push(FieldError {
                path,
                message: format!("must be one of: {}", allowed.join(", ")),
            });
        }
    }
}

fn looks_like_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !value.contains(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(errors: &[FieldError]) -> Vec<&str> {
        errors.iter().map(|e| e.path.as_str()).collect()
    }

    fn valid_personal() -> FormModel {
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
        form
    }

    #[test]
    fn missing_first_name_is_scoped_to_its_path() {
        let mut form = valid_personal();
        form.personal_details.first_name.clear();
        let errors = validate_step(&form, Step::Personal);
        assert_eq!(paths(&errors), vec!["personalDetails.firstName"]);
        assert_eq!(errors[0].to_string(), "personalDetails.firstName: is required");
    }

    #[test]
    fn valid_personal_step_passes() {
        assert!(validate_step(&valid_personal(), Step::Personal).is_empty());
    }

    #[test]
    fn formats_are_checked() {
        let mut form = valid_personal();
        form.personal_details.email = "sita@".into();
        form.personal_details.primary_mobile = "98410".into();
        form.personal_details.blood_group = "C+".into();
        form.personal_details.date_of_birth = "2001-13-01".into();
        let errors = validate_step(&form, Step::Personal);
        assert_eq!(
            paths(&errors),
            vec![
                "personalDetails.dateOfBirth",
                "personalDetails.bloodGroup",
                "personalDetails.email",
                "personalDetails.primaryMobile",
            ]
        );
    }

    #[test]
    fn same_as_permanent_skips_temporary() {
        let mut form = FormModel::default();
        form.address_details.permanent = Address {
            province: "Gandaki".into(),
            district: "Kaski".into(),
            municipality: "Pokhara".into(),
            ward_number: "8".into(),
            ..Address::default()
        };
        let errors = validate_step(&form, Step::Address);
        assert!(paths(&errors).iter().all(|p| p.starts_with("addressDetails.temporary")));
        assert_eq!(errors.len(), 4);

        form.address_details.same_as_permanent = true;
        assert!(validate_step(&form, Step::Address).is_empty());
    }

    #[test]
    fn ward_number_range() {
        let mut form = FormModel::default();
        form.address_details.same_as_permanent = true;
        form.address_details.permanent = Address {
            province: "Gandaki".into(),
            district: "Kaski".into(),
            municipality: "Pokhara".into(),
            ward_number: "0".into(),
            ..Address::default()
        };
        let errors = validate_step(&form, Step::Address);
        assert_eq!(paths(&errors), vec!["addressDetails.permanent.wardNumber"]);
    }

    #[test]
    fn legal_guardian_rows_are_indexed() {
        let mut form = FormModel::default();
        form.parent_guardian_details.father.full_name = "Hari".into();
        form.parent_guardian_details.mother.full_name = "Gita".into();
        form.parent_guardian_details
            .legal_guardians
            .push(crate::form::LegalGuardian {
                full_name: "Ram".into(),
                ..Default::default()
            });
        let errors = validate_step(&form, Step::Guardian);
        assert_eq!(
            paths(&errors),
            vec!["parentGuardianDetails.legalGuardians[0].relation"]
        );
    }

    #[test]
    fn other_interest_needs_detail() {
        let mut form = FormModel::default();
        form.extracurricular_details.interests = vec!["Music".into(), "Other".into()];
        let errors = validate_step(&form, Step::Extracurricular);
        assert_eq!(paths(&errors), vec!["extracurricularDetails.otherInterestDetails"]);
    }

    #[test]
    fn declaration_requires_consent_and_place() {
        let errors = validate_step(&FormModel::default(), Step::Declaration);
        assert_eq!(
            paths(&errors),
            vec!["declaration.agreedToTerms", "declaration.place"]
        );
    }

    #[test]
    fn bank_details_checked_only_when_present() {
        let mut form = FormModel::default();
        form.financial_details.fee_category = "Regular".into();
        assert!(validate_step(&form, Step::Financial).is_empty());

        form.financial_details.bank_details = Some(Default::default());
        assert_eq!(validate_step(&form, Step::Financial).len(), 3);
    }

    #[test]
    fn whole_form_collects_every_step() {
        let errors = validate_form(&FormModel::default());
        assert!(errors.iter().any(|e| e.path.starts_with("personalDetails.")));
        assert!(errors.iter().any(|e| e.path.starts_with("declaration.")));
    }

    #[test]
    fn email_shapes() {
        assert!(looks_like_email("a@b.co"));
        assert!(!looks_like_email("a@b"));
        assert!(!looks_like_email("@b.co"));
        assert!(!looks_like_email("a b@c.de"));
        assert!(!looks_like_email("a@@c.de"));
    }
}
