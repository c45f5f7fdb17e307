//! Backend student record, as sent on create and update.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `addressType` discriminants.
pub const ADDRESS_PERMANENT: i32 = 0;
pub const ADDRESS_TEMPORARY: i32 = 1;

/// `parentType` discriminants. Anything other than father or mother is a legal guardian.
pub const PARENT_FATHER: i32 = 0;
pub const PARENT_MOTHER: i32 = 1;
pub const PARENT_LEGAL_GUARDIAN: i32 = 2;

/// Flat student record with integer-coded enums and ISO 8601 date-times.
///
/// The server-owned metadata (`id`, `pid`, `createdOn`, `updatedOn`,
/// `isActive`) is never produced by the mapper; the edit screen copies it
/// from the fetched record before saving.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_on: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_on: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,

    // Basic details
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub date_of_birth: String,
    pub place_of_birth: String,
    pub photo_path: String,
    pub gender: i32,
    pub nationality: i32,
    pub blood_group: i32,
    pub marital_status: i32,
    pub religion: String,
    pub ethnicity: String,
    pub email: String,
    pub alternate_email: String,
    pub primary_mobile: String,
    pub secondary_mobile: String,

    // Financial
    pub fee_category: i32,
    pub scholarship_type: i32,
    pub scholarship_provider_name: String,
    pub scholarship_amount: f64,
    pub account_holder_name: String,
    pub bank_name: i32,
    pub account_number: String,
    pub branch: String,

    // Citizenship
    pub citizenship_number: String,
    pub issue_date: String,
    pub issue_district: String,

    // Academic
    pub faculty: i32,
    pub program: i32,
    pub level: i32,
    pub academic_year: i32,
    pub semester: i32,
    pub section: i32,
    pub roll_number: String,
    pub registration_number: String,
    pub enrollment_date: String,
    pub academic_status: i32,

    // Declaration
    pub is_agreed: bool,
    pub application_date: String,
    pub place: String,

    pub addresses: Vec<AddressRecord>,
    pub emergency_contacts: Vec<EmergencyContactRecord>,
    pub disability_details: Vec<DisabilityRecord>,
    pub parent_guardians: Vec<ParentGuardianRecord>,
    pub academic_histories: Vec<AcademicHistoryRecord>,
    pub extracurricular_details: Vec<ExtracurricularRecord>,
    pub documents: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressRecord {
    pub address_type: i32,
    pub province: String,
    pub district: String,
    pub municipality: String,
    pub ward_number: i32,
    pub tole_street: String,
    pub house_number: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyContactRecord {
    pub contact_name: String,
    pub relation: i32,
    pub contact_number: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisabilityRecord {
    pub disability_status: String,
    pub disability_type: String,
    pub disability_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentGuardianRecord {
    pub parent_type: i32,
    pub full_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation: Option<String>,
    pub occupation: String,
    pub designation: String,
    pub organization: String,
    pub mobile_number: String,
    /// The backend contract spells this field `gardianEmail`.
    #[serde(rename = "gardianEmail")]
    pub guardian_email: String,
    pub annual_family_income: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcademicHistoryRecord {
    pub qualification: String,
    pub board_university: String,
    pub institution_name: String,
    pub passed_year: i32,
    #[serde(rename = "divisionGPA")]
    pub division_gpa: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtracurricularRecord {
    pub interests: String,
    pub achievements: String,
    pub scholar_type: i32,
    pub transport_method: i32,
}

impl StudentRecord {
    pub fn address(&self, address_type: i32) -> Option<&AddressRecord> {
        self.addresses.iter().find(|a| a.address_type == address_type)
    }

    pub fn parent(&self, parent_type: i32) -> Option<&ParentGuardianRecord> {
        self.parent_guardians
            .iter()
            .find(|p| p.parent_type == parent_type)
    }

    pub fn legal_guardians(&self) -> impl Iterator<Item = &ParentGuardianRecord> {
        self.parent_guardians
            .iter()
            .filter(|p| p.parent_type != PARENT_FATHER && p.parent_type != PARENT_MOTHER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parent_guardian_uses_backend_spelling() {
        let parent = ParentGuardianRecord {
            parent_type: PARENT_MOTHER,
            full_name: "Gita".into(),
            relation: None,
            occupation: String::new(),
            designation: String::new(),
            organization: String::new(),
            mobile_number: "9800000003".into(),
            guardian_email: "gita@example.com".into(),
            annual_family_income: 0.0,
        };
        let value = serde_json::to_value(&parent).unwrap();
        assert_eq!(value["gardianEmail"], "gita@example.com");
        assert_eq!(value["parentType"], 1);
        assert!(value.get("relation").is_none());
    }

    #[test]
    fn academic_history_gpa_field_name() {
        let json = r#"{
            "qualification": "SEE",
            "boardUniversity": "NEB",
            "institutionName": "Budhanilkantha School",
            "passedYear": 2075,
            "divisionGPA": "3.6"
        }"#;
        let parsed: AcademicHistoryRecord = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.division_gpa, "3.6");
        assert_eq!(parsed.passed_year, 2075);
    }
}
