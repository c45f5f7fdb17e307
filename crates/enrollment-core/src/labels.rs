//! Enum label tables shared by the mapper and the validator.
//!
//! Each table lists `(ui_label, backend_label)` pairs. The position of a pair
//! is the integer code the backend stores, and the backend label is the
//! display string it returns alongside that code. The UI and backend
//! vocabularies differ in places (`Day Scholar` vs `DayScholar`), so lookups
//! go through the table in both directions. Adding a value is a data change
//! here, nothing else.

/// Tag used in multi-selects for values outside the known set.
pub const OTHER: &str = "Other";

#[derive(Debug, Clone, Copy)]
pub struct LabelTable {
    pub name: &'static str,
    entries: &'static [(&'static str, &'static str)],
}

impl LabelTable {
    pub const fn new(name: &'static str, entries: &'static [(&'static str, &'static str)]) -> Self {
        Self { name, entries }
    }

    pub fn ui_labels(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(ui, _)| *ui)
    }

    /// UI label for a backend code.
    pub fn ui_label(&self, code: i64) -> Option<&'static str> {
        let index = usize::try_from(code).ok()?;
        self.entries.get(index).map(|(ui, _)| *ui)
    }

    /// Code for a form value: a UI label, a backend label, or a numeric code string.
    pub fn code_for(&self, input: &str) -> Option<i32> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }
        if let Ok(code) = input.parse::<usize>() {
            return (code < self.entries.len()).then(|| code as i32);
        }
        self.entries
            .iter()
            .position(|(ui, backend)| {
                ui.eq_ignore_ascii_case(input) || backend.eq_ignore_ascii_case(input)
            })
            .map(|i| i as i32)
    }

    /// UI label for a backend display label. UI labels are accepted as-is.
    pub fn ui_for_backend(&self, display: &str) -> Option<&'static str> {
        let display = display.trim();
        self.entries
            .iter()
            .find(|(ui, backend)| {
                backend.eq_ignore_ascii_case(display) || ui.eq_ignore_ascii_case(display)
            })
            .map(|(ui, _)| *ui)
    }
}

pub const GENDER: LabelTable = LabelTable::new(
    "gender",
    &[("Male", "Male"), ("Female", "Female"), ("Other", "Other")],
);

pub const NATIONALITY: LabelTable = LabelTable::new(
    "nationality",
    &[("Nepali", "Nepali"), ("Indian", "Indian"), ("Other", "Other")],
);

pub const BLOOD_GROUP: LabelTable = LabelTable::new(
    "bloodGroup",
    &[
        ("A+", "A_Positive"),
        ("A-", "A_Negative"),
        ("B+", "B_Positive"),
        ("B-", "B_Negative"),
        ("O+", "O_Positive"),
        ("O-", "O_Negative"),
        ("AB+", "AB_Positive"),
        ("AB-", "AB_Negative"),
    ],
);

pub const MARITAL_STATUS: LabelTable = LabelTable::new(
    "maritalStatus",
    &[
        ("Single", "Single"),
        ("Married", "Married"),
        ("Divorced", "Divorced"),
        ("Widowed", "Widowed"),
    ],
);

pub const RELATION: LabelTable = LabelTable::new(
    "relation",
    &[
        ("Father", "Father"),
        ("Mother", "Mother"),
        ("Sibling", "Sibling"),
        ("Spouse", "Spouse"),
        ("Relative", "Relative"),
        ("Guardian", "Guardian"),
        ("Other", "Other"),
    ],
);

pub const FACULTY: LabelTable = LabelTable::new(
    "faculty",
    &[
        ("Science and Technology", "ScienceAndTechnology"),
        ("Management", "Management"),
        ("Humanities and Social Sciences", "HumanitiesAndSocialSciences"),
        ("Education", "Education"),
        ("Law", "Law"),
    ],
);

pub const PROGRAM: LabelTable = LabelTable::new(
    "program",
    &[
        ("BSc CSIT", "BScCSIT"),
        ("BCA", "BCA"),
        ("BIT", "BIT"),
        ("BBA", "BBA"),
        ("BBS", "BBS"),
        ("BA", "BA"),
        ("BEd", "BEd"),
        ("LLB", "LLB"),
    ],
);

pub const LEVEL: LabelTable = LabelTable::new(
    "level",
    &[
        ("Bachelor", "Bachelor"),
        ("Master", "Master"),
        ("MPhil", "MPhil"),
        ("PhD", "PhD"),
    ],
);

pub const SEMESTER: LabelTable = LabelTable::new(
    "semester",
    &[
        ("First Semester", "First"),
        ("Second Semester", "Second"),
        ("Third Semester", "Third"),
        ("Fourth Semester", "Fourth"),
        ("Fifth Semester", "Fifth"),
        ("Sixth Semester", "Sixth"),
        ("Seventh Semester", "Seventh"),
        ("Eighth Semester", "Eighth"),
    ],
);

pub const SECTION: LabelTable = LabelTable::new(
    "section",
    &[("A", "A"), ("B", "B"), ("C", "C"), ("D", "D")],
);

pub const ACADEMIC_STATUS: LabelTable = LabelTable::new(
    "academicStatus",
    &[
        ("Active", "Active"),
        ("On Leave", "OnLeave"),
        ("Suspended", "Suspended"),
        ("Graduated", "Graduated"),
        ("Dropped Out", "DroppedOut"),
    ],
);

pub const FEE_CATEGORY: LabelTable = LabelTable::new(
    "feeCategory",
    &[
        ("Regular", "Regular"),
        ("Self Financed", "SelfFinanced"),
        ("Scholarship", "Scholarship"),
        ("Quota", "Quota"),
    ],
);

pub const SCHOLARSHIP_TYPE: LabelTable = LabelTable::new(
    "scholarshipType",
    &[
        ("None", "None"),
        ("Government Scholarship", "Government"),
        ("Merit Based", "MeritBased"),
        ("Need Based", "NeedBased"),
        ("Sports Scholarship", "Sports"),
    ],
);

pub const BANK: LabelTable = LabelTable::new(
    "bankName",
    &[
        ("Nepal Bank", "NepalBank"),
        ("Rastriya Banijya Bank", "RastriyaBanijyaBank"),
        ("Nabil Bank", "NabilBank"),
        ("Global IME Bank", "GlobalIMEBank"),
        ("NIC Asia Bank", "NICAsiaBank"),
        ("Everest Bank", "EverestBank"),
    ],
);

pub const HOSTELLER_STATUS: LabelTable = LabelTable::new(
    "scholarType",
    &[("Day Scholar", "DayScholar"), ("Hosteller", "Hosteller")],
);

pub const TRANSPORT: LabelTable = LabelTable::new(
    "transportMethod",
    &[
        ("Walking", "Walking"),
        ("Bicycle", "Bicycle"),
        ("Public Transport", "PublicTransport"),
        ("Private Vehicle", "PrivateVehicle"),
        ("College Bus", "CollegeBus"),
    ],
);

/// Multi-select interests. Codes are unused; only membership matters.
pub const INTERESTS: LabelTable = LabelTable::new(
    "interests",
    &[
        ("Sports", "Sports"),
        ("Music", "Music"),
        ("Dance", "Dance"),
        ("Art", "Art"),
        ("Debate", "Debate"),
        ("Coding", "Coding"),
        ("Volunteering", "Volunteering"),
        ("Other", "Other"),
    ],
);
