//! Client-side enrollment form model.
//!
//! The serialized (camelCase) field names are the path vocabulary used by
//! [`FormModel::set`], e.g. `parentGuardianDetails.father.fullName`.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::path::{FieldPath, set_path};
use crate::FormError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct FormModel {
    pub personal_details: PersonalDetails,
    pub address_details: AddressDetails,
    pub parent_guardian_details: ParentGuardianDetails,
    pub academic_details: AcademicDetails,
    pub financial_details: FinancialDetails,
    pub extracurricular_details: ExtracurricularDetails,
    pub declaration: Declaration,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct PersonalDetails {
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub date_of_birth: String,
    pub place_of_birth: String,
    pub nationality: String,
    pub citizenship_number: String,
    pub citizenship_issue_date: String,
    pub citizenship_issue_district: String,
    pub email: String,
    pub alternate_email: String,
    pub primary_mobile: String,
    pub secondary_mobile: String,
    pub emergency_contact_name: String,
    pub emergency_contact_relation: String,
    pub emergency_contact_number: String,
    pub gender: String,
    pub blood_group: String,
    pub marital_status: String,
    pub religion: String,
    pub ethnicity: String,
    pub disability_status: String,
    pub disability_type: String,
    pub disability_percentage: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct AddressDetails {
    pub permanent: Address,
    pub temporary: Address,
    pub same_as_permanent: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct Address {
    pub province: String,
    pub district: String,
    pub municipality: String,
    pub ward_number: String,
    pub tole_street: String,
    pub house_number: String,
}

impl Address {
    pub fn is_blank(&self) -> bool {
        [
            &self.province,
            &self.district,
            &self.municipality,
            &self.ward_number,
            &self.tole_street,
            &self.house_number,
        ]
        .iter()
        .all(|s| s.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ParentGuardianDetails {
    pub father: Parent,
    pub mother: Parent,
    #[serde(deserialize_with = "vec_with_null_defaults")]
    pub legal_guardians: Vec<LegalGuardian>,
    pub annual_family_income: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct Parent {
    pub full_name: String,
    pub occupation: String,
    pub designation: String,
    pub organization: String,
    pub mobile_number: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct LegalGuardian {
    pub full_name: String,
    pub relation: String,
    pub occupation: String,
    pub mobile_number: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct AcademicDetails {
    pub current_enrollment: CurrentEnrollment,
    #[serde(deserialize_with = "vec_with_null_defaults")]
    pub previous_history: Vec<AcademicHistory>,
    /// Local file paths, uploaded after a successful create.
    pub photo_upload: String,
    pub citizenship_upload: String,
    pub signature_upload: String,
    pub character_certificate_upload: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct CurrentEnrollment {
    pub faculty: String,
    pub program: String,
    pub course_level: String,
    pub academic_year: String,
    pub semester_class: String,
    pub section: String,
    pub roll_number: String,
    pub registration_number: String,
    pub enroll_date: String,
    pub academic_status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct AcademicHistory {
    pub qualification: String,
    pub board_university: String,
    pub institution_name: String,
    pub passed_year: String,
    #[serde(rename = "divisionGPA")]
    pub division_gpa: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct FinancialDetails {
    pub fee_category: String,
    pub scholarship_details: ScholarshipDetails,
    pub bank_details: Option<BankDetails>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ScholarshipDetails {
    pub scholarship_type: String,
    pub scholarship_provider_name: String,
    pub scholarship_amount: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct BankDetails {
    pub account_holder_name: String,
    pub bank_name: String,
    pub account_number: String,
    pub branch: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ExtracurricularDetails {
    pub interests: Vec<String>,
    pub other_interest_details: String,
    pub previous_awards: Vec<String>,
    pub hosteller_status: String,
    pub transportation_method: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct Declaration {
    pub agreed_to_terms: bool,
    pub date_of_application: String,
    pub place: String,
}

/// Lists grown by an index update are padded with nulls; treat those as empty rows.
fn vec_with_null_defaults<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    let items: Vec<Option<T>> = Vec::deserialize(deserializer)?;
    Ok(items.into_iter().map(Option::unwrap_or_default).collect())
}

impl FormModel {
    /// Return a copy of the form with `value` stored at `path`.
    ///
    /// The update goes through the JSON form of the model, so containers
    /// along the path are created on demand. Paths naming fields the model
    /// does not have are rejected rather than dropped.
    pub fn set(&self, path: &FieldPath, value: Value) -> Result<Self, FormError> {
        let current = serde_json::to_value(self)?;
        let updated = set_path(&current, path, value);
        serde_json::from_value(updated).map_err(|source| FormError::Shape {
            path: path.to_string(),
            source,
        })
    }

    /// Parse `path` and store a string value there.
    pub fn set_text(&self, path: &str, value: &str) -> Result<Self, FormError> {
        let path = FieldPath::parse(path)?;
        self.set(&path, Value::String(value.to_string()))
    }

    pub fn from_json(text: &str) -> Result<Self, FormError> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_form_serializes_with_camel_case_paths() {
        let value = serde_json::to_value(FormModel::default()).unwrap();
        assert_eq!(value["personalDetails"]["firstName"], "");
        assert_eq!(value["addressDetails"]["sameAsPermanent"], false);
        assert_eq!(value["financialDetails"]["bankDetails"], Value::Null);
        assert_eq!(value["academicDetails"]["previousHistory"], json!([]));
    }

    #[test]
    fn set_text_updates_nested_field() {
        let form = FormModel::default();
        let updated = form
            .set_text("parentGuardianDetails.father.fullName", "Ram Shrestha")
            .unwrap();
        assert_eq!(
            updated.parent_guardian_details.father.full_name,
            "Ram Shrestha"
        );
        assert_eq!(form.parent_guardian_details.father.full_name, "");
    }

    #[test]
    fn set_grows_lists_with_default_rows() {
        let form = FormModel::default()
            .set_text(
                "parentGuardianDetails.legalGuardians[1].fullName",
                "Hari Karki",
            )
            .unwrap();
        let guardians = &form.parent_guardian_details.legal_guardians;
        assert_eq!(guardians.len(), 2);
        assert_eq!(guardians[0], LegalGuardian::default());
        assert_eq!(guardians[1].full_name, "Hari Karki");
    }

    #[test]
    fn set_creates_optional_bank_details() {
        let form = FormModel::default()
            .set_text("financialDetails.bankDetails.branch", "New Road")
            .unwrap();
        let bank = form.financial_details.bank_details.unwrap();
        assert_eq!(bank.branch, "New Road");
        assert_eq!(bank.account_number, "");
    }

    #[test]
    fn set_accepts_boolean_flags() {
        let path = FieldPath::parse("declaration.agreedToTerms").unwrap();
        let form = FormModel::default().set(&path, json!(true)).unwrap();
        assert!(form.declaration.agreed_to_terms);
    }

    #[test]
    fn typo_in_path_is_rejected() {
        let err = FormModel::default()
            .set_text("personalDetails.frstName", "Sita")
            .unwrap_err();
        assert!(matches!(err, FormError::Shape { ref path, .. } if path == "personalDetails.frstName"));
    }

    #[test]
    fn malformed_path_is_rejected() {
        let err = FormModel::default()
            .set_text("personalDetails..firstName", "Sita")
            .unwrap_err();
        assert!(matches!(err, FormError::Path(_)));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let form =
            FormModel::from_json(r#"{ "personalDetails": { "firstName": "Sita" } }"#).unwrap();
        assert_eq!(form.personal_details.first_name, "Sita");
        assert_eq!(form.declaration, Declaration::default());
    }
}
