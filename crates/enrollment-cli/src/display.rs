//! Terminal rendering of students.
//!
//! A fetched record is first mapped to the form model, so the card shows the
//! same labels the enrollment form uses, then printed section by section.
//! Sections with no populated field are skipped.

use enrollment_client::StudentSummary;
use enrollment_core::{Attachments, FieldError, FieldPath, FormModel, get_path};
use serde_json::Value;

const MAX_LIST_ITEMS: usize = 10;

// ── Card sections (label, form path) ──

type Section = &'static [(&'static str, &'static str)];

const PERSONAL: Section = &[
    ("First name", "personalDetails.firstName"),
    ("Middle name", "personalDetails.middleName"),
    ("Last name", "personalDetails.lastName"),
    ("Date of birth", "personalDetails.dateOfBirth"),
    ("Place of birth", "personalDetails.placeOfBirth"),
    ("Gender", "personalDetails.gender"),
    ("Nationality", "personalDetails.nationality"),
    ("Blood group", "personalDetails.bloodGroup"),
    ("Marital status", "personalDetails.maritalStatus"),
    ("Religion", "personalDetails.religion"),
    ("Ethnicity", "personalDetails.ethnicity"),
];

const CONTACT: Section = &[
    ("Email", "personalDetails.email"),
    ("Alternate email", "personalDetails.alternateEmail"),
    ("Primary mobile", "personalDetails.primaryMobile"),
    ("Secondary mobile", "personalDetails.secondaryMobile"),
    ("Emergency contact", "personalDetails.emergencyContactName"),
    ("Emergency relation", "personalDetails.emergencyContactRelation"),
    ("Emergency number", "personalDetails.emergencyContactNumber"),
];

const CITIZENSHIP: Section = &[
    ("Citizenship number", "personalDetails.citizenshipNumber"),
    ("Issue date", "personalDetails.citizenshipIssueDate"),
    ("Issue district", "personalDetails.citizenshipIssueDistrict"),
    ("Disability status", "personalDetails.disabilityStatus"),
    ("Disability type", "personalDetails.disabilityType"),
    ("Disability percentage", "personalDetails.disabilityPercentage"),
];

const PERMANENT_ADDRESS: Section = &[
    ("Province", "addressDetails.permanent.province"),
    ("District", "addressDetails.permanent.district"),
    ("Municipality", "addressDetails.permanent.municipality"),
    ("Ward", "addressDetails.permanent.wardNumber"),
    ("Tole/Street", "addressDetails.permanent.toleStreet"),
    ("House number", "addressDetails.permanent.houseNumber"),
];

const TEMPORARY_ADDRESS: Section = &[
    ("Province", "addressDetails.temporary.province"),
    ("District", "addressDetails.temporary.district"),
    ("Municipality", "addressDetails.temporary.municipality"),
    ("Ward", "addressDetails.temporary.wardNumber"),
    ("Tole/Street", "addressDetails.temporary.toleStreet"),
    ("House number", "addressDetails.temporary.houseNumber"),
];

const PARENTS: Section = &[
    ("Father", "parentGuardianDetails.father.fullName"),
    ("Father occupation", "parentGuardianDetails.father.occupation"),
    ("Father mobile", "parentGuardianDetails.father.mobileNumber"),
    ("Father email", "parentGuardianDetails.father.email"),
    ("Mother", "parentGuardianDetails.mother.fullName"),
    ("Mother occupation", "parentGuardianDetails.mother.occupation"),
    ("Mother mobile", "parentGuardianDetails.mother.mobileNumber"),
    ("Mother email", "parentGuardianDetails.mother.email"),
    ("Annual family income", "parentGuardianDetails.annualFamilyIncome"),
];

const ENROLLMENT: Section = &[
    ("Faculty", "academicDetails.currentEnrollment.faculty"),
    ("Program", "academicDetails.currentEnrollment.program"),
    ("Level", "academicDetails.currentEnrollment.courseLevel"),
    ("Academic year", "academicDetails.currentEnrollment.academicYear"),
    ("Semester", "academicDetails.currentEnrollment.semesterClass"),
    ("Section", "academicDetails.currentEnrollment.section"),
    ("Roll number", "academicDetails.currentEnrollment.rollNumber"),
    ("Registration number", "academicDetails.currentEnrollment.registrationNumber"),
    ("Enrollment date", "academicDetails.currentEnrollment.enrollDate"),
    ("Academic status", "academicDetails.currentEnrollment.academicStatus"),
];

const FINANCIAL: Section = &[
    ("Fee category", "financialDetails.feeCategory"),
    ("Scholarship type", "financialDetails.scholarshipDetails.scholarshipType"),
    ("Scholarship provider", "financialDetails.scholarshipDetails.scholarshipProviderName"),
    ("Scholarship amount", "financialDetails.scholarshipDetails.scholarshipAmount"),
    ("Account holder", "financialDetails.bankDetails.accountHolderName"),
    ("Bank", "financialDetails.bankDetails.bankName"),
    ("Account number", "financialDetails.bankDetails.accountNumber"),
    ("Branch", "financialDetails.bankDetails.branch"),
];

const EXTRACURRICULAR: Section = &[
    ("Interests", "extracurricularDetails.interests"),
    ("Other interests", "extracurricularDetails.otherInterestDetails"),
    ("Awards", "extracurricularDetails.previousAwards"),
    ("Hosteller status", "extracurricularDetails.hostellerStatus"),
    ("Transport", "extracurricularDetails.transportationMethod"),
];

const DECLARATION: Section = &[
    ("Agreed to terms", "declaration.agreedToTerms"),
    ("Application date", "declaration.dateOfApplication"),
    ("Place", "declaration.place"),
];

const METADATA: &[(&str, &str)] = &[
    ("ID", "id"),
    ("PID", "pid"),
    ("Created", "createdOn"),
    ("Updated", "updatedOn"),
    ("Active", "isActive"),
];

// ── Public API ──

pub fn print_student_card(record: &Value, form: &FormModel, files: &Attachments) {
    for line in student_card(record, form, files) {
        println!("{line}");
    }
}

pub fn print_student_table(students: &[StudentSummary]) {
    for line in student_table(students) {
        println!("{line}");
    }
}

pub fn print_field_errors(errors: &[FieldError]) {
    for error in errors {
        eprintln!("  {:<52} {}", error.path, error.message);
    }
}

// ── Rendering ──

pub fn student_card(record: &Value, form: &FormModel, files: &Attachments) -> Vec<String> {
    let mut out = Vec::new();
    let p = &form.personal_details;
    let name = [&p.first_name, &p.middle_name, &p.last_name]
        .into_iter()
        .filter(|s| !s.is_empty())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ");
    out.push(format!("=== {} ===", if name.is_empty() { "(unnamed)" } else { &name }));
    out.push(String::new());

    let meta: Vec<(&str, String)> = METADATA
        .iter()
        .filter_map(|(label, key)| record.get(*key).and_then(metadata).map(|v| (*label, v)))
        .collect();
    push_rows(&mut out, "Record", meta);

    let form_json = serde_json::to_value(form).unwrap_or(Value::Null);
    push_section(&mut out, &form_json, "Personal", PERSONAL);
    push_section(&mut out, &form_json, "Contact", CONTACT);
    push_section(&mut out, &form_json, "Citizenship & Disability", CITIZENSHIP);
    push_section(&mut out, &form_json, "Permanent Address", PERMANENT_ADDRESS);
    if form.address_details.same_as_permanent {
        out.push("Temporary Address".to_string());
        out.push("  Same as permanent".to_string());
        out.push(String::new());
    } else {
        push_section(&mut out, &form_json, "Temporary Address", TEMPORARY_ADDRESS);
    }
    push_section(&mut out, &form_json, "Parents", PARENTS);
    push_list(
        &mut out,
        "Legal guardians",
        form.parent_guardian_details
            .legal_guardians
            .iter()
            .map(|g| format!("{} ({}) {}", g.full_name, g.relation, g.mobile_number)),
    );
    push_section(&mut out, &form_json, "Current Enrollment", ENROLLMENT);
    push_list(
        &mut out,
        "Academic history",
        form.academic_details.previous_history.iter().map(|h| {
            format!(
                "{} - {} ({}, {}) {}",
                h.qualification, h.institution_name, h.board_university, h.passed_year, h.division_gpa
            )
        }),
    );
    push_section(&mut out, &form_json, "Financial", FINANCIAL);
    push_section(&mut out, &form_json, "Extracurricular", EXTRACURRICULAR);
    push_section(&mut out, &form_json, "Declaration", DECLARATION);

    let mut documents: Vec<(&str, String)> = Vec::new();
    if let Some(photo) = &files.photo {
        documents.push(("Photo", photo.clone()));
    }
    documents.extend(files.documents.iter().map(|d| (d.label.as_str(), d.url.clone())));
    if documents.is_empty() {
        out.push("Documents".to_string());
        out.push("  No documents available".to_string());
        out.push(String::new());
    } else {
        push_rows(&mut out, "Documents", documents);
    }
    out
}

pub fn student_table(students: &[StudentSummary]) -> Vec<String> {
    let mut out = vec![
        format!(
            "{:<12} {:<30} {:<30} {:<12} {:<10}",
            "ID", "Name", "Email", "Mobile", "Roll"
        ),
        "-".repeat(98),
    ];
    out.extend(students.iter().map(|s| {
        format!(
            "{:<12} {:<30} {:<30} {:<12} {:<10}",
            s.display_id,
            truncate(&s.name, 30),
            truncate(&s.email, 30),
            s.mobile,
            s.roll_number
        )
    }));
    out.push(String::new());
    out.push(format!("{} student(s)", students.len()));
    out
}

fn push_section(out: &mut Vec<String>, form: &Value, header: &str, fields: Section) {
    let rows = fields
        .iter()
        .filter_map(|(label, path)| {
            let path = FieldPath::parse(path).ok()?;
            get_path(form, &path).and_then(scalar).map(|v| (*label, v))
        })
        .collect();
    push_rows(out, header, rows);
}

fn push_rows(out: &mut Vec<String>, header: &str, rows: Vec<(&str, String)>) {
    if rows.is_empty() {
        return;
    }
    out.push(header.to_string());
    for (label, value) in rows {
        out.push(format!("  {label:<26} {value}"));
    }
    out.push(String::new());
}

fn push_list(out: &mut Vec<String>, header: &str, items: impl ExactSizeIterator<Item = String>) {
    let len = items.len();
    if len == 0 {
        return;
    }
    out.push(format!("{header} ({len}):"));
    for item in items.take(MAX_LIST_ITEMS) {
        out.push(format!("    {}", item.trim()));
    }
    if len > MAX_LIST_ITEMS {
        out.push(format!("    ... and {} more", len - MAX_LIST_ITEMS));
    }
    out.push(String::new());
}

/// Record metadata shows flags either way.
fn metadata(value: &Value) -> Option<String> {
    match value {
        Value::Bool(false) => Some("no".to_string()),
        other => scalar(other),
    }
}

/// Display text for a populated leaf. Blank strings, unset flags and empty lists are skipped.
fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("yes".to_string()),
        Value::Array(items) if !items.is_empty() => Some(
            items
                .iter()
                .filter_map(scalar)
                .collect::<Vec<_>>()
                .join(", "),
        ),
        _ => None,
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        let cut: String = text.chars().take(width - 3).collect();
        format!("{cut}...")
    } else {
        text.to_string()
    }
}
