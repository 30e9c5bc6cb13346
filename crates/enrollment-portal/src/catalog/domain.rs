use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

macro_rules! identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

identifier!(
    /// Store-allocated identity of a registered institution.
    InstitutionId
);
identifier!(
    /// Store-allocated identity of a discipline.
    DisciplineId
);
identifier!(
    /// Store-allocated identity of a class section.
    ClassSectionId
);
identifier!(
    /// Identity of a professor loaded from the roster.
    ProfessorId
);
identifier!(
    /// Identity of a student loaded from the roster.
    StudentId
);
identifier!(EnrollmentId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstitutionCategory {
    Public,
    Private,
}

impl InstitutionCategory {
    pub const fn label(self) -> &'static str {
        match self {
            InstitutionCategory::Public => "public",
            InstitutionCategory::Private => "private",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstitutionStatus {
    Active,
    Inactive,
}

impl InstitutionStatus {
    pub const fn label(self) -> &'static str {
        match self {
            InstitutionStatus::Active => "active",
            InstitutionStatus::Inactive => "inactive",
        }
    }
}

/// Offering status of a class section. Set at creation and managed externally afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassSectionStatus {
    Active,
    Planned,
    Closed,
}

impl ClassSectionStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ClassSectionStatus::Active => "active",
            ClassSectionStatus::Planned => "planned",
            ClassSectionStatus::Closed => "closed",
        }
    }
}

/// Caller-supplied fields for registering an institution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstitutionRegistration {
    pub name: String,
    pub registration_number: String,
    pub category: InstitutionCategory,
    pub status: InstitutionStatus,
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Institution {
    pub id: InstitutionId,
    pub name: String,
    pub registration_number: String,
    pub category: InstitutionCategory,
    pub status: InstitutionStatus,
    pub email: String,
    pub phone: String,
}

/// Caller-supplied fields for registering a discipline under an institution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisciplineRegistration {
    pub institution_id: InstitutionId,
    pub name: String,
    pub hours: u16,
    #[serde(default)]
    pub syllabus: String,
    #[serde(default)]
    pub objectives: String,
    #[serde(default)]
    pub bibliography: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discipline {
    pub id: DisciplineId,
    pub institution_id: InstitutionId,
    pub name: String,
    pub hours: u16,
    pub syllabus: String,
    pub objectives: String,
    pub bibliography: String,
}

/// Caller-supplied fields for opening a class section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassSectionRegistration {
    pub professor_id: ProfessorId,
    pub discipline_id: DisciplineId,
    pub status: ClassSectionStatus,
    pub total_seats: u32,
    pub location: String,
    pub schedule: String,
    pub year: i32,
    pub term: u8,
}

/// A class section row. `available_seats` never exceeds `total_seats`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassSection {
    pub id: ClassSectionId,
    pub professor_id: ProfessorId,
    pub discipline_id: DisciplineId,
    pub status: ClassSectionStatus,
    pub total_seats: u32,
    pub available_seats: u32,
    pub location: String,
    pub schedule: String,
    pub year: i32,
    pub term: u8,
}

impl ClassSection {
    pub fn is_open(&self) -> bool {
        self.status == ClassSectionStatus::Active && self.available_seats > 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Professor {
    pub id: ProfessorId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    pub registration_code: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentRequest {
    pub student_id: StudentId,
    pub class_section_id: ClassSectionId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: EnrollmentId,
    pub student_id: StudentId,
    pub class_section_id: ClassSectionId,
    pub enrolled_at: DateTime<Utc>,
}

/// Confirmation returned by a successful enrollment: exactly one seat was consumed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentResult {
    pub enrollment_id: EnrollmentId,
    pub student_id: StudentId,
    pub class_section_id: ClassSectionId,
    pub remaining_seats: u32,
    pub message: String,
}

/// Student projection used to populate enrollment pickers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrollableStudent {
    pub student_id: StudentId,
    pub name: String,
    pub registration_code: String,
}

/// Active class section that still has seats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpenClassSection {
    pub class_section_id: ClassSectionId,
    pub discipline_name: String,
    pub available_seats: u32,
    pub total_seats: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstitutionSummary {
    pub institution_id: InstitutionId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisciplineSummary {
    pub discipline_id: DisciplineId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfessorSummary {
    pub professor_id: ProfessorId,
    pub name: String,
}
