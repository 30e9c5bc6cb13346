use std::sync::Arc;

use chrono::{Datelike, Utc};
use tracing::{debug, info, warn};

use super::domain::{
    ClassSectionId, ClassSectionRegistration, DisciplineId, DisciplineRegistration,
    DisciplineSummary, EnrollableStudent, EnrollmentRequest, EnrollmentResult, InstitutionId,
    InstitutionRegistration, InstitutionSummary, OpenClassSection, ProfessorSummary, StudentId,
};
use super::collation::name_key;
use super::policy::{registration_number, required, EnrollmentPolicy};
use super::repository::{CatalogStore, CatalogTransaction, RepositoryError};

/// Service owning every catalog and enrollment invariant on top of a transactional store.
pub struct CatalogService<S> {
    store: Arc<S>,
    policy: EnrollmentPolicy,
}

impl<S> CatalogService<S>
where
    S: CatalogStore + 'static,
{
    pub fn new(store: Arc<S>, policy: EnrollmentPolicy) -> Self {
        Self { store, policy }
    }

    pub fn policy(&self) -> &EnrollmentPolicy {
        &self.policy
    }

    /// Register an institution. Registration numbers are unique across the catalog.
    pub fn register_institution(
        &self,
        registration: InstitutionRegistration,
    ) -> Result<InstitutionId, CatalogError> {
        let registration = InstitutionRegistration {
            name: required("name", registration.name)?,
            registration_number: registration_number(registration.registration_number)?,
            email: required("email", registration.email)?,
            phone: registration.phone.trim().to_string(),
            ..registration
        };

        let mut tx = self.store.begin()?;
        let institution = tx.insert_institution(registration)?;
        tx.commit()?;

        info!(
            institution_id = %institution.id,
            registration_number = %institution.registration_number,
            "institution registered"
        );
        Ok(institution.id)
    }

    /// Register a discipline owned by an existing institution.
    pub fn register_discipline(
        &self,
        registration: DisciplineRegistration,
    ) -> Result<DisciplineId, CatalogError> {
        let name = required("name", registration.name)?;
        self.policy.check_hours(registration.hours)?;

        let mut tx = self.store.begin()?;
        if tx.institution(registration.institution_id)?.is_none() {
            return Err(CatalogError::NotFound {
                entity: "institution",
                id: registration.institution_id.0,
            });
        }

        let discipline = tx.insert_discipline(DisciplineRegistration {
            name,
            ..registration
        })?;
        tx.commit()?;

        info!(
            discipline_id = %discipline.id,
            institution_id = %discipline.institution_id,
            "discipline registered"
        );
        Ok(discipline.id)
    }

    /// Open a class section with every seat available.
    pub fn register_class_section(
        &self,
        registration: ClassSectionRegistration,
    ) -> Result<ClassSectionId, CatalogError> {
        let location = required("location", registration.location)?;
        let schedule = required("schedule", registration.schedule)?;
        self.policy.check_seats(registration.total_seats)?;
        self.policy.check_year(registration.year, Utc::now().year())?;
        if !matches!(registration.term, 1 | 2) {
            return Err(CatalogError::validation(
                "term",
                format!("must be 1 or 2 (got {})", registration.term),
            ));
        }

        let mut tx = self.store.begin()?;
        if tx.professor(registration.professor_id)?.is_none() {
            return Err(CatalogError::NotFound {
                entity: "professor",
                id: registration.professor_id.0,
            });
        }
        if tx.discipline(registration.discipline_id)?.is_none() {
            return Err(CatalogError::NotFound {
                entity: "discipline",
                id: registration.discipline_id.0,
            });
        }

        let section = tx.insert_class_section(ClassSectionRegistration {
            location,
            schedule,
            ..registration
        })?;
        tx.commit()?;

        info!(
            class_section_id = %section.id,
            discipline_id = %section.discipline_id,
            total_seats = section.total_seats,
            status = section.status.label(),
            "class section registered"
        );
        Ok(section.id)
    }

    /// Enroll a student, consuming exactly one seat. Nothing is written on failure.
    pub fn enroll_student(
        &self,
        request: EnrollmentRequest,
    ) -> Result<EnrollmentResult, CatalogError> {
        let EnrollmentRequest {
            student_id,
            class_section_id,
        } = request;

        let mut tx = self.store.begin()?;
        let section = tx
            .class_section_for_update(class_section_id)?
            .ok_or(CatalogError::NotFound {
                entity: "class section",
                id: class_section_id.0,
            })?;
        let student = tx.student(student_id)?.ok_or(CatalogError::NotFound {
            entity: "student",
            id: student_id.0,
        })?;

        if section.available_seats == 0 {
            warn!(%class_section_id, %student_id, "enrollment rejected: no seats left");
            return Err(CatalogError::Capacity(class_section_id));
        }
        if tx.enrollment_exists(student_id, class_section_id)? {
            warn!(%class_section_id, %student_id, "enrollment rejected: already enrolled");
            return Err(CatalogError::DuplicateEnrollment {
                student: student_id,
                class_section: class_section_id,
            });
        }

        let enrollment = tx
            .insert_enrollment(student_id, class_section_id, Utc::now())
            .map_err(|err| match err {
                RepositoryError::Conflict(_) => CatalogError::DuplicateEnrollment {
                    student: student_id,
                    class_section: class_section_id,
                },
                other => CatalogError::from(other),
            })?;
        let remaining_seats = section.available_seats - 1;
        tx.set_available_seats(class_section_id, remaining_seats)?;
        tx.commit()?;

        info!(
            enrollment_id = %enrollment.id,
            %class_section_id,
            %student_id,
            remaining_seats,
            "student enrolled"
        );

        Ok(EnrollmentResult {
            enrollment_id: enrollment.id,
            student_id,
            class_section_id,
            remaining_seats,
            message: format!(
                "{} enrolled in class section {class_section_id}; {remaining_seats} of {} seats remain",
                student.name, section.total_seats
            ),
        })
    }

    /// Students ordered by name.
    pub fn list_enrollable_students(&self) -> Result<Vec<EnrollableStudent>, CatalogError> {
        let tx = self.store.begin()?;
        let mut students: Vec<EnrollableStudent> = tx
            .students()?
            .into_iter()
            .map(|student| EnrollableStudent {
                student_id: student.id,
                name: student.name,
                registration_code: student.registration_code,
            })
            .collect();
        students.sort_by_cached_key(|student| (name_key(&student.name), student.student_id));
        Ok(students)
    }

    /// Active sections with at least one seat, ordered by discipline name.
    pub fn list_open_class_sections(&self) -> Result<Vec<OpenClassSection>, CatalogError> {
        let tx = self.store.begin()?;
        let disciplines = tx.disciplines()?;
        let mut open = Vec::new();
        for section in tx.class_sections()?.into_iter().filter(|s| s.is_open()) {
            let Some(discipline) = disciplines.iter().find(|d| d.id == section.discipline_id)
            else {
                debug!(class_section_id = %section.id, "skipping section with dangling discipline");
                continue;
            };
            open.push(OpenClassSection {
                class_section_id: section.id,
                discipline_name: discipline.name.clone(),
                available_seats: section.available_seats,
                total_seats: section.total_seats,
            });
        }
        open.sort_by_cached_key(|section| {
            (name_key(&section.discipline_name), section.class_section_id)
        });
        Ok(open)
    }

    pub fn list_institutions(&self) -> Result<Vec<InstitutionSummary>, CatalogError> {
        let tx = self.store.begin()?;
        let mut institutions: Vec<InstitutionSummary> = tx
            .institutions()?
            .into_iter()
            .map(|institution| InstitutionSummary {
                institution_id: institution.id,
                name: institution.name,
            })
            .collect();
        institutions.sort_by_cached_key(|entry| (name_key(&entry.name), entry.institution_id));
        Ok(institutions)
    }

    pub fn list_disciplines(&self) -> Result<Vec<DisciplineSummary>, CatalogError> {
        let tx = self.store.begin()?;
        let mut disciplines: Vec<DisciplineSummary> = tx
            .disciplines()?
            .into_iter()
            .map(|discipline| DisciplineSummary {
                discipline_id: discipline.id,
                name: discipline.name,
            })
            .collect();
        disciplines.sort_by_cached_key(|entry| (name_key(&entry.name), entry.discipline_id));
        Ok(disciplines)
    }

    pub fn list_professors(&self) -> Result<Vec<ProfessorSummary>, CatalogError> {
        let tx = self.store.begin()?;
        let mut professors: Vec<ProfessorSummary> = tx
            .professors()?
            .into_iter()
            .map(|professor| ProfessorSummary {
                professor_id: professor.id,
                name: professor.name,
            })
            .collect();
        professors.sort_by_cached_key(|entry| (name_key(&entry.name), entry.professor_id));
        Ok(professors)
    }
}

/// Error raised by the catalog service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },
    #[error("{entity} {id} does not exist")]
    NotFound { entity: &'static str, id: u64 },
    #[error("{0}")]
    Conflict(String),
    #[error("class section {0} has no available seats")]
    Capacity(ClassSectionId),
    #[error("student {student} is already enrolled in class section {class_section}")]
    DuplicateEnrollment {
        student: StudentId,
        class_section: ClassSectionId,
    },
    #[error("storage failure: {0}")]
    Storage(RepositoryError),
}

impl CatalogError {
    pub(crate) fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// Stable machine-readable name of the error category.
    pub const fn kind(&self) -> &'static str {
        match self {
            CatalogError::Validation { .. } => "validation",
            CatalogError::NotFound { .. } => "not_found",
            CatalogError::Conflict(_) => "conflict",
            CatalogError::Capacity(_) => "capacity",
            CatalogError::DuplicateEnrollment { .. } => "duplicate_enrollment",
            CatalogError::Storage(_) => "storage",
        }
    }
}

impl From<RepositoryError> for CatalogError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::Conflict(constraint) => Self::Conflict(constraint),
            other => Self::Storage(other),
        }
    }
}
