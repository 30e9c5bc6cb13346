use chrono::{DateTime, Utc};

use super::domain::{
    ClassSection, ClassSectionId, ClassSectionRegistration, Discipline, DisciplineId,
    DisciplineRegistration, Enrollment, Institution, InstitutionId, InstitutionRegistration,
    Professor, ProfessorId, Student, StudentId,
};

/// Transactional storage abstraction so the service can be exercised against any backend.
///
/// A transaction returned by [`CatalogStore::begin`] has exclusive access to the rows it
/// touches for its whole lifetime. Writes become visible only through
/// [`CatalogTransaction::commit`]; dropping an uncommitted transaction rolls it back.
pub trait CatalogStore: Send + Sync {
    type Transaction<'a>: CatalogTransaction
    where
        Self: 'a;

    fn begin(&self) -> Result<Self::Transaction<'_>, RepositoryError>;
}

/// Row-level operations available inside a single unit of work.
pub trait CatalogTransaction {
    fn institution(&self, id: InstitutionId) -> Result<Option<Institution>, RepositoryError>;
    /// Fails with [`RepositoryError::Conflict`] when the registration number is taken.
    fn insert_institution(
        &mut self,
        registration: InstitutionRegistration,
    ) -> Result<Institution, RepositoryError>;
    fn institutions(&self) -> Result<Vec<Institution>, RepositoryError>;

    fn discipline(&self, id: DisciplineId) -> Result<Option<Discipline>, RepositoryError>;
    fn insert_discipline(
        &mut self,
        registration: DisciplineRegistration,
    ) -> Result<Discipline, RepositoryError>;
    fn disciplines(&self) -> Result<Vec<Discipline>, RepositoryError>;

    fn professor(&self, id: ProfessorId) -> Result<Option<Professor>, RepositoryError>;
    fn professors(&self) -> Result<Vec<Professor>, RepositoryError>;

    fn student(&self, id: StudentId) -> Result<Option<Student>, RepositoryError>;
    fn students(&self) -> Result<Vec<Student>, RepositoryError>;

    /// Reads a class section and holds it for update until the transaction ends.
    fn class_section_for_update(
        &mut self,
        id: ClassSectionId,
    ) -> Result<Option<ClassSection>, RepositoryError>;
    /// Inserts a section with `available_seats == total_seats`.
    fn insert_class_section(
        &mut self,
        registration: ClassSectionRegistration,
    ) -> Result<ClassSection, RepositoryError>;
    fn set_available_seats(
        &mut self,
        id: ClassSectionId,
        available_seats: u32,
    ) -> Result<(), RepositoryError>;
    fn class_sections(&self) -> Result<Vec<ClassSection>, RepositoryError>;

    fn enrollment_exists(
        &self,
        student_id: StudentId,
        class_section_id: ClassSectionId,
    ) -> Result<bool, RepositoryError>;
    /// Fails with [`RepositoryError::Conflict`] when the pair is already enrolled.
    fn insert_enrollment(
        &mut self,
        student_id: StudentId,
        class_section_id: ClassSectionId,
        enrolled_at: DateTime<Utc>,
    ) -> Result<Enrollment, RepositoryError>;

    fn commit(self) -> Result<(), RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("uniqueness constraint violated: {0}")]
    Conflict(String),
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
