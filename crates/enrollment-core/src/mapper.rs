//! Form ⇄ backend record mapping.
//!
//! [`to_backend_record`] flattens the nested form into the record the backend
//! accepts on create and update. [`from_backend_record`] goes the other way,
//! reading either the partially nested shape the backend returns on lookup
//! (`contactDetail.email`, `personalDetails.genderDisplay`, ...) or the flat
//! write shape, so a record saved by this crate loads back into the same form.

use serde_json::Value;
use tracing::warn;

use crate::dates::{date_part, normalize_date, now_iso};
use crate::form::{
    AcademicDetails, AcademicHistory, Address, AddressDetails, BankDetails, CurrentEnrollment,
    Declaration, ExtracurricularDetails, FinancialDetails, FormModel, LegalGuardian, Parent,
    ParentGuardianDetails, PersonalDetails, ScholarshipDetails,
};
use crate::labels::{self, LabelTable, OTHER};
use crate::placeholders::{PLACEHOLDERS, ParentPlaceholders};
use crate::record::{
    ADDRESS_PERMANENT, ADDRESS_TEMPORARY, AcademicHistoryRecord, AddressRecord, DisabilityRecord,
    EmergencyContactRecord, ExtracurricularRecord, PARENT_FATHER, PARENT_LEGAL_GUARDIAN,
    PARENT_MOTHER, ParentGuardianRecord, StudentRecord,
};

const AWARD_SEPARATOR: &str = "; ";
const INTEREST_SEPARATOR: &str = ", ";

/// Backend fields that were filled from [`PLACEHOLDERS`] during a mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingReport {
    pub placeholders: Vec<String>,
}

// ── Form → record ──

/// Map a form to the backend record, logging any placeholder substitutions.
pub fn to_backend_record(form: &FormModel) -> StudentRecord {
    let (record, report) = to_backend_record_with_report(form);
    if !report.placeholders.is_empty() {
        warn!(
            count = report.placeholders.len(),
            fields = ?report.placeholders,
            "required fields filled with placeholders"
        );
    }
    record
}

/// Map a form to the backend record and report which fields were defaulted.
pub fn to_backend_record_with_report(form: &FormModel) -> (StudentRecord, MappingReport) {
    let mut fill = Filler::default();
    let personal = &form.personal_details;
    let academic = &form.academic_details;
    let enrollment = &academic.current_enrollment;
    let financial = &form.financial_details;
    let declaration = &form.declaration;

    let (account_holder_name, bank_name, account_number, branch) =
        bank_fields(&mut fill, financial.bank_details.as_ref());

    let application_date = match normalize_date(&declaration.date_of_application) {
        Some(date) => date,
        None => {
            fill.note("applicationDate");
            now_iso()
        }
    };

    let record = StudentRecord {
        id: None,
        pid: None,
        created_on: None,
        updated_on: None,
        is_active: None,

        first_name: fill.text("firstName", &personal.first_name, PLACEHOLDERS.first_name),
        middle_name: optional(&personal.middle_name),
        last_name: fill.text("lastName", &personal.last_name, PLACEHOLDERS.last_name),
        date_of_birth: fill.date(
            "dateOfBirth",
            &personal.date_of_birth,
            PLACEHOLDERS.date_of_birth,
        ),
        place_of_birth: fill.text(
            "placeOfBirth",
            &personal.place_of_birth,
            PLACEHOLDERS.place_of_birth,
        ),
        photo_path: String::new(),
        gender: fill.code("gender", &personal.gender, &labels::GENDER),
        nationality: fill.code("nationality", &personal.nationality, &labels::NATIONALITY),
        blood_group: fill.code("bloodGroup", &personal.blood_group, &labels::BLOOD_GROUP),
        marital_status: fill.code(
            "maritalStatus",
            &personal.marital_status,
            &labels::MARITAL_STATUS,
        ),
        religion: fill.text("religion", &personal.religion, PLACEHOLDERS.religion),
        ethnicity: fill.text("ethnicity", &personal.ethnicity, PLACEHOLDERS.ethnicity),
        email: fill.text("email", &personal.email, PLACEHOLDERS.email),
        alternate_email: optional(&personal.alternate_email),
        primary_mobile: fill.text(
            "primaryMobile",
            &personal.primary_mobile,
            PLACEHOLDERS.primary_mobile,
        ),
        secondary_mobile: optional(&personal.secondary_mobile),

        fee_category: fill.code(
            "feeCategory",
            &financial.fee_category,
            &labels::FEE_CATEGORY,
        ),
        scholarship_type: fill.code(
            "scholarshipType",
            &financial.scholarship_details.scholarship_type,
            &labels::SCHOLARSHIP_TYPE,
        ),
        scholarship_provider_name: optional(
            &financial.scholarship_details.scholarship_provider_name,
        ),
        scholarship_amount: parse_amount(&financial.scholarship_details.scholarship_amount),
        account_holder_name,
        bank_name,
        account_number,
        branch,

        citizenship_number: fill.text(
            "citizenshipNumber",
            &personal.citizenship_number,
            PLACEHOLDERS.citizenship_number,
        ),
        issue_date: fill.date(
            "issueDate",
            &personal.citizenship_issue_date,
            PLACEHOLDERS.issue_date,
        ),
        issue_district: fill.text(
            "issueDistrict",
            &personal.citizenship_issue_district,
            PLACEHOLDERS.issue_district,
        ),

        faculty: fill.code("faculty", &enrollment.faculty, &labels::FACULTY),
        program: fill.code("program", &enrollment.program, &labels::PROGRAM),
        level: fill.code("level", &enrollment.course_level, &labels::LEVEL),
        academic_year: fill.int(
            "academicYear",
            &enrollment.academic_year,
            PLACEHOLDERS.academic_year,
        ),
        semester: fill.code("semester", &enrollment.semester_class, &labels::SEMESTER),
        section: fill.code("section", &enrollment.section, &labels::SECTION),
        roll_number: fill.text(
            "rollNumber",
            &enrollment.roll_number,
            PLACEHOLDERS.roll_number,
        ),
        registration_number: fill.text(
            "registrationNumber",
            &enrollment.registration_number,
            PLACEHOLDERS.registration_number,
        ),
        enrollment_date: fill.date(
            "enrollmentDate",
            &enrollment.enroll_date,
            PLACEHOLDERS.enrollment_date,
        ),
        academic_status: fill.code(
            "academicStatus",
            &enrollment.academic_status,
            &labels::ACADEMIC_STATUS,
        ),

        is_agreed: declaration.agreed_to_terms,
        application_date,
        place: fill.text("place", &declaration.place, PLACEHOLDERS.place),

        addresses: address_records(&mut fill, &form.address_details),
        emergency_contacts: vec![EmergencyContactRecord {
            contact_name: fill.text(
                "emergencyContacts[0].contactName",
                &personal.emergency_contact_name,
                PLACEHOLDERS.emergency_contact_name,
            ),
            relation: fill.code(
                "emergencyContacts[0].relation",
                &personal.emergency_contact_relation,
                &labels::RELATION,
            ),
            contact_number: fill.text(
                "emergencyContacts[0].contactNumber",
                &personal.emergency_contact_number,
                PLACEHOLDERS.emergency_contact_number,
            ),
        }],
        disability_details: disability_records(personal),
        parent_guardians: parent_records(&mut fill, &form.parent_guardian_details),
        academic_histories: academic
            .previous_history
            .iter()
            .map(|h| AcademicHistoryRecord {
                qualification: optional(&h.qualification),
                board_university: optional(&h.board_university),
                institution_name: optional(&h.institution_name),
                passed_year: h.passed_year.trim().parse().unwrap_or(0),
                division_gpa: optional(&h.division_gpa),
            })
            .collect(),
        extracurricular_details: vec![extracurricular_record(
            &mut fill,
            &form.extracurricular_details,
        )],
        documents: Vec::new(),
    };

    (
        record,
        MappingReport {
            placeholders: fill.defaulted,
        },
    )
}

/// Tracks which backend fields fell back to placeholders.
#[derive(Default)]
struct Filler {
    defaulted: Vec<String>,
}

impl Filler {
    fn note(&mut self, field: &str) {
        self.defaulted.push(field.to_string());
    }

    fn text(&mut self, field: &str, value: &str, placeholder: &str) -> String {
        let value = value.trim();
        if value.is_empty() {
            self.note(field);
            placeholder.to_string()
        } else {
            value.to_string()
        }
    }

    fn date(&mut self, field: &str, value: &str, placeholder: &str) -> String {
        match normalize_date(value) {
            Some(date) => date,
            None => {
                if !value.trim().is_empty() {
                    warn!(field, value, "unparseable date, using placeholder");
                }
                self.note(field);
                placeholder.to_string()
            }
        }
    }

    fn int(&mut self, field: &str, value: &str, placeholder: i32) -> i32 {
        match value.trim().parse() {
            Ok(n) => n,
            Err(_) => {
                self.note(field);
                placeholder
            }
        }
    }

    fn code(&mut self, field: &str, value: &str, table: &LabelTable) -> i32 {
        match table.code_for(value) {
            Some(code) => code,
            None => {
                if !value.trim().is_empty() {
                    warn!(field, value, table = table.name, "unknown label, using placeholder code");
                }
                self.note(field);
                PLACEHOLDERS.enum_code
            }
        }
    }
}

fn optional(value: &str) -> String {
    value.trim().to_string()
}

fn parse_amount(value: &str) -> f64 {
    value.trim().replace(',', "").parse().unwrap_or(0.0)
}

fn bank_fields(fill: &mut Filler, bank: Option<&BankDetails>) -> (String, i32, String, String) {
    let empty = BankDetails::default();
    let bank = bank.unwrap_or(&empty);
    (
        fill.text(
            "accountHolderName",
            &bank.account_holder_name,
            PLACEHOLDERS.account_holder_name,
        ),
        fill.code("bankName", &bank.bank_name, &labels::BANK),
        fill.text(
            "accountNumber",
            &bank.account_number,
            PLACEHOLDERS.account_number,
        ),
        fill.text("branch", &bank.branch, PLACEHOLDERS.branch),
    )
}

fn address_records(fill: &mut Filler, details: &AddressDetails) -> Vec<AddressRecord> {
    let temporary = if details.same_as_permanent {
        &details.permanent
    } else {
        &details.temporary
    };
    vec![
        address_record(fill, ADDRESS_PERMANENT, &details.permanent),
        address_record(fill, ADDRESS_TEMPORARY, temporary),
    ]
}

fn address_record(fill: &mut Filler, address_type: i32, address: &Address) -> AddressRecord {
    let at = |field: &str| format!("addresses[{address_type}].{field}");
    AddressRecord {
        address_type,
        province: fill.text(&at("province"), &address.province, PLACEHOLDERS.province),
        district: fill.text(&at("district"), &address.district, PLACEHOLDERS.district),
        municipality: fill.text(
            &at("municipality"),
            &address.municipality,
            PLACEHOLDERS.municipality,
        ),
        ward_number: fill.int(
            &at("wardNumber"),
            &address.ward_number,
            PLACEHOLDERS.ward_number,
        ),
        tole_street: fill.text(
            &at("toleStreet"),
            &address.tole_street,
            PLACEHOLDERS.tole_street,
        ),
        house_number: fill.text(
            &at("houseNumber"),
            &address.house_number,
            PLACEHOLDERS.house_number,
        ),
    }
}

fn parent_records(
    fill: &mut Filler,
    details: &ParentGuardianDetails,
) -> Vec<ParentGuardianRecord> {
    let income = parse_amount(&details.annual_family_income);
    let mut records = vec![
        parent_record(fill, PARENT_FATHER, &details.father, &PLACEHOLDERS.father, income),
        parent_record(fill, PARENT_MOTHER, &details.mother, &PLACEHOLDERS.mother, income),
    ];
    records.extend(
        details
            .legal_guardians
            .iter()
            .map(|g| ParentGuardianRecord {
                parent_type: PARENT_LEGAL_GUARDIAN,
                full_name: optional(&g.full_name),
                relation: Some(optional(&g.relation)),
                occupation: optional(&g.occupation),
                designation: String::new(),
                organization: String::new(),
                mobile_number: optional(&g.mobile_number),
                guardian_email: optional(&g.email),
                annual_family_income: 0.0,
            }),
    );
    records
}

fn parent_record(
    fill: &mut Filler,
    parent_type: i32,
    parent: &Parent,
    defaults: &ParentPlaceholders,
    income: f64,
) -> ParentGuardianRecord {
    let at = |field: &str| format!("parentGuardians[{parent_type}].{field}");
    ParentGuardianRecord {
        parent_type,
        full_name: fill.text(&at("fullName"), &parent.full_name, defaults.full_name),
        relation: None,
        occupation: fill.text(&at("occupation"), &parent.occupation, defaults.occupation),
        designation: optional(&parent.designation),
        organization: optional(&parent.organization),
        mobile_number: fill.text(
            &at("mobileNumber"),
            &parent.mobile_number,
            defaults.mobile_number,
        ),
        guardian_email: fill.text(&at("gardianEmail"), &parent.email, defaults.email),
        annual_family_income: income,
    }
}

fn disability_records(personal: &PersonalDetails) -> Vec<DisabilityRecord> {
    if personal.disability_status.trim().is_empty() {
        return Vec::new();
    }
    vec![DisabilityRecord {
        disability_status: optional(&personal.disability_status),
        disability_type: optional(&personal.disability_type),
        disability_percentage: parse_amount(&personal.disability_percentage),
    }]
}

fn extracurricular_record(
    fill: &mut Filler,
    details: &ExtracurricularDetails,
) -> ExtracurricularRecord {
    let mut interests: Vec<String> = Vec::new();
    for interest in &details.interests {
        if interest.eq_ignore_ascii_case(OTHER) {
            interests.extend(split_list(&details.other_interest_details, ','));
        } else if let Some(label) = labels::INTERESTS.ui_for_backend(interest) {
            interests.push(label.to_string());
        } else if !interest.trim().is_empty() {
            interests.push(interest.trim().to_string());
        }
    }
    ExtracurricularRecord {
        interests: interests.join(INTEREST_SEPARATOR),
        achievements: details
            .previous_awards
            .iter()
            .map(|a| a.trim())
            .filter(|a| !a.is_empty())
            .collect::<Vec<_>>()
            .join(AWARD_SEPARATOR),
        scholar_type: fill.code(
            "extracurricularDetails[0].scholarType",
            &details.hosteller_status,
            &labels::HOSTELLER_STATUS,
        ),
        transport_method: fill.code(
            "extracurricularDetails[0].transportMethod",
            &details.transportation_method,
            &labels::TRANSPORT,
        ),
    }
}

fn split_list(raw: &str, separator: char) -> impl Iterator<Item = String> + '_ {
    raw.split(separator)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

// ── Record → form ──

/// Populate a form from a backend record in either the lookup or the write shape.
///
/// Addresses and parents are located by discriminant. An element without a
/// discriminant is accepted at its legacy position (0 = permanent/father,
/// 1 = temporary/mother).
pub fn from_backend_record(record: &Value) -> FormModel {
    let src = Source(record);

    let addresses = src.array("addresses");
    let permanent = read_address(pick(addresses, "addressType", ADDRESS_PERMANENT));
    let temporary = read_address(pick(addresses, "addressType", ADDRESS_TEMPORARY));
    let same_as_permanent = !permanent.is_blank() && temporary == permanent;

    let parents = src.array("parentGuardians");
    let father = pick(parents, "parentType", PARENT_FATHER);
    let mother = pick(parents, "parentType", PARENT_MOTHER);

    let emergency = Source::at(src.array("emergencyContacts").first());
    let disability = Source::at(src.array("disabilityDetails").first());
    let extracurricular = Source::at(src.array("extracurricularDetails").first());

    FormModel {
        personal_details: PersonalDetails {
            first_name: src.text(&["firstName", "personalDetails.firstName"]),
            middle_name: src.text(&["middleName", "personalDetails.middleName"]),
            last_name: src.text(&["lastName", "personalDetails.lastName"]),
            date_of_birth: src.date(&["dateOfBirth", "personalDetails.dateOfBirth"]),
            place_of_birth: src.text(&["placeOfBirth", "personalDetails.placeOfBirth"]),
            nationality: src.label(
                &labels::NATIONALITY,
                &["personalDetails.nationalityDisplay", "nationalityDisplay"],
                &["personalDetails.nationality", "nationality"],
            ),
            citizenship_number: src.text(&[
                "citizenshipDetail.citizenshipNumber",
                "citizenshipNumber",
            ]),
            citizenship_issue_date: src.date(&["citizenshipDetail.issueDate", "issueDate"]),
            citizenship_issue_district: src
                .text(&["citizenshipDetail.issueDistrict", "issueDistrict"]),
            email: src.text(&["contactDetail.email", "email"]),
            alternate_email: src.text(&["contactDetail.alternateEmail", "alternateEmail"]),
            primary_mobile: src.text(&["contactDetail.primaryMobile", "primaryMobile"]),
            secondary_mobile: src.text(&["contactDetail.secondaryMobile", "secondaryMobile"]),
            emergency_contact_name: emergency.text(&["contactName"]),
            emergency_contact_relation: emergency.label(
                &labels::RELATION,
                &["relationDisplay"],
                &["relation"],
            ),
            emergency_contact_number: emergency.text(&["contactNumber"]),
            gender: src.label(
                &labels::GENDER,
                &["personalDetails.genderDisplay", "genderDisplay"],
                &["personalDetails.gender", "gender"],
            ),
            blood_group: src.label(
                &labels::BLOOD_GROUP,
                &["personalDetails.bloodGroupDisplay", "bloodGroupDisplay"],
                &["personalDetails.bloodGroup", "bloodGroup"],
            ),
            marital_status: src.label(
                &labels::MARITAL_STATUS,
                &["personalDetails.maritalStatusDisplay", "maritalStatusDisplay"],
                &["personalDetails.maritalStatus", "maritalStatus"],
            ),
            religion: src.text(&["personalDetails.religion", "religion"]),
            ethnicity: src.text(&["personalDetails.ethnicity", "ethnicity"]),
            disability_status: disability.text(&["disabilityStatus"]),
            disability_type: disability.text(&["disabilityType"]),
            disability_percentage: disability.text(&["disabilityPercentage"]),
        },
        address_details: AddressDetails {
            permanent,
            temporary,
            same_as_permanent,
        },
        parent_guardian_details: ParentGuardianDetails {
            father: read_parent(father),
            mother: read_parent(mother),
            legal_guardians: legal_guardians(parents),
            annual_family_income: [father, mother]
                .into_iter()
                .map(|p| Source::at(p).text(&["annualFamilyIncome"]))
                .find(|income| !income.is_empty() && income != "0")
                .unwrap_or_default(),
        },
        academic_details: AcademicDetails {
            current_enrollment: CurrentEnrollment {
                faculty: src.label(
                    &labels::FACULTY,
                    &["academicEnrollment.facultyDisplay", "facultyDisplay"],
                    &["academicEnrollment.faculty", "faculty"],
                ),
                program: src.label(
                    &labels::PROGRAM,
                    &["academicEnrollment.programDisplay", "programDisplay"],
                    &["academicEnrollment.program", "program"],
                ),
                course_level: src.label(
                    &labels::LEVEL,
                    &["academicEnrollment.levelDisplay", "levelDisplay"],
                    &["academicEnrollment.level", "level"],
                ),
                academic_year: src.text(&["academicEnrollment.academicYear", "academicYear"]),
                semester_class: src.label(
                    &labels::SEMESTER,
                    &["academicEnrollment.semesterDisplay", "semesterDisplay"],
                    &["academicEnrollment.semester", "semester"],
                ),
                section: src.label(
                    &labels::SECTION,
                    &["academicEnrollment.sectionDisplay", "sectionDisplay"],
                    &["academicEnrollment.section", "section"],
                ),
                roll_number: src.text(&["academicEnrollment.rollNumber", "rollNumber"]),
                registration_number: src.text(&[
                    "academicEnrollment.registrationNumber",
                    "registrationNumber",
                ]),
                enroll_date: src.date(&["academicEnrollment.enrollmentDate", "enrollmentDate"]),
                academic_status: src.label(
                    &labels::ACADEMIC_STATUS,
                    &[
                        "academicEnrollment.academicStatusDisplay",
                        "academicStatusDisplay",
                    ],
                    &["academicEnrollment.academicStatus", "academicStatus"],
                ),
            },
            previous_history: src
                .array("academicHistories")
                .iter()
                .map(|h| {
                    let h = Source(h);
                    AcademicHistory {
                        qualification: h.text(&["qualification"]),
                        board_university: h.text(&["boardUniversity", "board"]),
                        institution_name: h.text(&["institutionName"]),
                        passed_year: h.text(&["passedYear"]),
                        division_gpa: h.text(&["divisionGPA", "divisionGpa"]),
                    }
                })
                .collect(),
            ..AcademicDetails::default()
        },
        financial_details: read_financial(&src),
        extracurricular_details: read_extracurricular(&extracurricular),
        declaration: Declaration {
            agreed_to_terms: src
                .value(&["declaration.isAgreed", "isAgreed"])
                .and_then(Value::as_bool)
                .unwrap_or(false),
            date_of_application: src.date(&["declaration.applicationDate", "applicationDate"]),
            place: src.text(&["declaration.place", "place"]),
        },
    }
}

fn read_address(address: Option<&Value>) -> Address {
    let a = Source::at(address);
    Address {
        province: a.text(&["province"]),
        district: a.text(&["district"]),
        municipality: a.text(&["municipality"]),
        ward_number: a.text(&["wardNumber"]),
        tole_street: a.text(&["toleStreet"]),
        house_number: a.text(&["houseNumber"]),
    }
}

fn read_parent(parent: Option<&Value>) -> Parent {
    let p = Source::at(parent);
    Parent {
        full_name: p.text(&["fullName"]),
        occupation: p.text(&["occupation"]),
        designation: p.text(&["designation"]),
        organization: p.text(&["organization"]),
        mobile_number: p.text(&["mobileNumber"]),
        email: p.text(&["gardianEmail", "email"]),
    }
}

fn legal_guardians(parents: &[Value]) -> Vec<LegalGuardian> {
    parents
        .iter()
        .enumerate()
        .filter(|(i, p)| match discriminant(p, "parentType") {
            Some(t) => t != i64::from(PARENT_FATHER) && t != i64::from(PARENT_MOTHER),
            None => *i > 1,
        })
        .map(|(_, p)| {
            let p = Source(p);
            LegalGuardian {
                full_name: p.text(&["fullName"]),
                relation: p.text(&["relation"]),
                occupation: p.text(&["occupation"]),
                mobile_number: p.text(&["mobileNumber"]),
                email: p.text(&["gardianEmail", "email"]),
            }
        })
        .collect()
}

fn read_financial(src: &Source<'_>) -> FinancialDetails {
    let bank = BankDetails {
        account_holder_name: src.text(&["bankDetail.accountHolderName", "accountHolderName"]),
        bank_name: src.label(
            &labels::BANK,
            &["bankDetail.bankNameDisplay", "bankNameDisplay"],
            &["bankDetail.bankName", "bankName"],
        ),
        account_number: src.text(&["bankDetail.accountNumber", "accountNumber"]),
        branch: src.text(&["bankDetail.branch", "branch"]),
    };
    // Any stored bank field keeps the block.
    let bank_details = (bank != BankDetails::default()).then_some(bank);

    FinancialDetails {
        fee_category: src.label(
            &labels::FEE_CATEGORY,
            &["financialDetail.feeCategoryDisplay", "feeCategoryDisplay"],
            &["financialDetail.feeCategory", "feeCategory"],
        ),
        scholarship_details: ScholarshipDetails {
            scholarship_type: src.label(
                &labels::SCHOLARSHIP_TYPE,
                &[
                    "financialDetail.scholarshipTypeDisplay",
                    "scholarshipTypeDisplay",
                ],
                &["financialDetail.scholarshipType", "scholarshipType"],
            ),
            scholarship_provider_name: src.text(&[
                "financialDetail.scholarshipProviderName",
                "scholarshipProviderName",
            ]),
            scholarship_amount: src.text(&[
                "financialDetail.scholarshipAmount",
                "scholarshipAmount",
            ]),
        },
        bank_details,
    }
}

fn read_extracurricular(src: &Source<'_>) -> ExtracurricularDetails {
    let (interests, unknown) = split_interests(&src.list(&["interests"], ','));
    let explicit_other = src.text(&["otherInterestDetails"]);
    let other_interest_details = if explicit_other.is_empty() {
        unknown.join(INTEREST_SEPARATOR)
    } else {
        explicit_other
    };

    ExtracurricularDetails {
        interests,
        other_interest_details,
        previous_awards: src.list(&["previousAwards", "achievements"], ';'),
        hosteller_status: src.label(
            &labels::HOSTELLER_STATUS,
            &["scholarTypeDisplay", "hostellerStatusDisplay"],
            &["scholarType", "hostellerStatus"],
        ),
        transportation_method: src.label(
            &labels::TRANSPORT,
            &["transportMethodDisplay", "transportationMethodDisplay"],
            &["transportMethod", "transportationMethod"],
        ),
    }
}

/// Split backend interest labels into UI labels plus the unknown remainder.
///
/// When anything is unknown the UI list is tagged [`OTHER`].
pub fn split_interests(raw: &[String]) -> (Vec<String>, Vec<String>) {
    let mut known = Vec::new();
    let mut unknown = Vec::new();
    for label in raw {
        match labels::INTERESTS.ui_for_backend(label) {
            Some(ui) if ui != OTHER => known.push(ui.to_string()),
            Some(_) => {}
            None => unknown.push(label.clone()),
        }
    }
    if !unknown.is_empty() || raw.iter().any(|l| l.eq_ignore_ascii_case(OTHER)) {
        known.push(OTHER.to_string());
    }
    (known, unknown)
}

fn discriminant(item: &Value, key: &str) -> Option<i64> {
    match item.get(key)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Element tagged `wanted`, else the untagged element at the legacy position.
fn pick<'a>(items: &'a [Value], key: &str, wanted: i32) -> Option<&'a Value> {
    let wanted_code = i64::from(wanted);
    items
        .iter()
        .find(|item| discriminant(item, key) == Some(wanted_code))
        .or_else(|| {
            usize::try_from(wanted)
                .ok()
                .and_then(|i| items.get(i))
                .filter(|item| discriminant(item, key).is_none())
        })
}

/// Read-side view over a backend JSON value with fallback candidate keys.
#[derive(Clone, Copy)]
struct Source<'a>(&'a Value);

static NULL: Value = Value::Null;

impl<'a> Source<'a> {
    fn at(value: Option<&'a Value>) -> Self {
        Self(value.unwrap_or(&NULL))
    }

    fn lookup(&self, dotted: &str) -> Option<&'a Value> {
        dotted
            .split('.')
            .try_fold(self.0, |node, key| node.get(key))
            .filter(|v| !v.is_null())
    }

    fn value(&self, candidates: &[&str]) -> Option<&'a Value> {
        candidates.iter().find_map(|c| self.lookup(c))
    }

    fn array(&self, key: &str) -> &'a [Value] {
        self.lookup(key)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// First candidate rendering to a non-blank string.
    fn text(&self, candidates: &[&str]) -> String {
        candidates
            .iter()
            .filter_map(|c| self.lookup(c).and_then(scalar_text))
            .find(|s| !s.trim().is_empty())
            .unwrap_or_default()
    }

    fn date(&self, candidates: &[&str]) -> String {
        date_part(&self.text(candidates)).to_string()
    }

    /// A string list stored either as a JSON array or a separated string.
    fn list(&self, candidates: &[&str], separator: char) -> Vec<String> {
        match self.value(candidates) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(scalar_text)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            Some(other) => scalar_text(other)
                .map(|s| split_list(&s, separator).collect())
                .unwrap_or_default(),
            None => Vec::new(),
        }
    }

    /// UI label from a display label, falling back to the integer code.
    ///
    /// Display labels unknown to the table are kept verbatim.
    fn label(&self, table: &LabelTable, display: &[&str], code: &[&str]) -> String {
        let shown = self.text(display);
        if !shown.is_empty() {
            return table
                .ui_for_backend(&shown)
                .map_or(shown, str::to_string);
        }
        match self.value(code) {
            Some(Value::Number(n)) => n
                .as_i64()
                .and_then(|c| table.ui_label(c))
                .map(str::to_string)
                .unwrap_or_default(),
            Some(Value::String(s)) => match s.trim().parse::<i64>() {
                Ok(c) => table.ui_label(c).map(str::to_string).unwrap_or_default(),
                Err(_) => table.ui_for_backend(s).map_or_else(|| s.clone(), str::to_string),
            },
            _ => String::new(),
        }
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(number_text(n)),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Whole floats render without a trailing `.0`, the way a form input shows them.
fn number_text(n: &serde_json::Number) -> String {
    if n.is_f64()
        && let Some(f) = n.as_f64()
        && f.fract() == 0.0
        && f.abs() < 1e15
    {
        return format!("{}", f as i64);
    }
    n.to_string()
}
