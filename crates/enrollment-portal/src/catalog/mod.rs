//! Institution, discipline, class-section and enrollment registration.
//!
//! [`CatalogService`] owns every cross-entity invariant and talks to storage only through
//! the [`CatalogStore`] unit-of-work abstraction, so the HTTP router and the CLI demo are
//! thin callers.

mod collation;
pub mod domain;
pub mod memory;
pub mod policy;
pub mod repository;
pub mod roster;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    ClassSection, ClassSectionId, ClassSectionRegistration, ClassSectionStatus, Discipline,
    DisciplineId, DisciplineRegistration, DisciplineSummary, EnrollableStudent, Enrollment,
    EnrollmentId, EnrollmentRequest, EnrollmentResult, Institution, InstitutionCategory,
    InstitutionId, InstitutionRegistration, InstitutionStatus, InstitutionSummary,
    OpenClassSection, Professor, ProfessorId, ProfessorSummary, Student, StudentId,
};
pub use memory::InMemoryCatalogStore;
pub use policy::{EnrollmentPolicy, PolicyError};
pub use repository::{CatalogStore, CatalogTransaction, RepositoryError};
pub use roster::{Roster, RosterError, RosterProfessor, RosterStudent};
pub use router::catalog_router;
pub use service::{CatalogError, CatalogService};
