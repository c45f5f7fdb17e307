//! Placeholder values for required backend fields the form left empty.
//!
//! The backend rejects records with missing required fields, including ones
//! the form does not collect yet. The mapper substitutes these values and
//! reports every substitution, so callers can tell synthetic data from real
//! input. Review this table together with the backend's field contract.

/// Fallbacks keyed by backend field.
#[derive(Debug, Clone, Copy)]
pub struct Placeholders {
    pub first_name: &'static str,
    pub last_name: &'static str,
    pub date_of_birth: &'static str,
    pub place_of_birth: &'static str,
    pub religion: &'static str,
    pub ethnicity: &'static str,
    pub email: &'static str,
    pub primary_mobile: &'static str,

    pub account_holder_name: &'static str,
    pub account_number: &'static str,
    pub branch: &'static str,

    pub citizenship_number: &'static str,
    pub issue_date: &'static str,
    pub issue_district: &'static str,

    pub academic_year: i32,
    pub roll_number: &'static str,
    pub registration_number: &'static str,
    pub enrollment_date: &'static str,
    pub place: &'static str,

    pub province: &'static str,
    pub district: &'static str,
    pub municipality: &'static str,
    pub ward_number: i32,
    pub tole_street: &'static str,
    pub house_number: &'static str,

    pub emergency_contact_name: &'static str,
    pub emergency_contact_number: &'static str,

    pub father: ParentPlaceholders,
    pub mother: ParentPlaceholders,

    /// Code used for any enum field left empty or holding an unknown label.
    pub enum_code: i32,
}

#[derive(Debug, Clone, Copy)]
pub struct ParentPlaceholders {
    pub full_name: &'static str,
    pub occupation: &'static str,
    pub mobile_number: &'static str,
    pub email: &'static str,
}

pub const PLACEHOLDERS: Placeholders = Placeholders {
    first_name: "Test",
    last_name: "User",
    date_of_birth: "2000-01-01T00:00:00Z",
    place_of_birth: "Kathmandu",
    religion: "Hindu",
    ethnicity: "Newari",
    email: "test@example.com",
    primary_mobile: "9800000000",

    account_holder_name: "N/A",
    account_number: "0000000000",
    branch: "Main Branch",

    citizenship_number: "12345678",
    issue_date: "2020-01-01T00:00:00Z",
    issue_district: "Kathmandu",

    academic_year: 2078,
    roll_number: "001",
    registration_number: "REG001",
    enrollment_date: "2024-01-01T00:00:00Z",
    place: "Kathmandu",

    province: "Bagmati",
    district: "Kathmandu",
    municipality: "Kathmandu",
    ward_number: 1,
    tole_street: "Main Street",
    house_number: "123",

    emergency_contact_name: "Parent",
    emergency_contact_number: "9800000001",

    father: ParentPlaceholders {
        full_name: "Father",
        occupation: "Business",
        mobile_number: "9800000002",
        email: "father@example.com",
    },
    mother: ParentPlaceholders {
        full_name: "Mother",
        occupation: "Housewife",
        mobile_number: "9800000003",
        email: "mother@example.com",
    },

    enum_code: 0,
};
