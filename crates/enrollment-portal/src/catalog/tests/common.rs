use std::sync::Arc;

use axum::response::Response;
use chrono::{DateTime, Datelike, Utc};
use serde_json::Value;

use crate::catalog::domain::{
    ClassSection, ClassSectionId, ClassSectionRegistration, ClassSectionStatus, Discipline,
    DisciplineId, DisciplineRegistration, Enrollment, Institution, InstitutionCategory,
    InstitutionId, InstitutionRegistration, InstitutionStatus, Professor, ProfessorId, Student,
    StudentId,
};
use crate::catalog::repository::{CatalogStore, CatalogTransaction, RepositoryError};
use crate::catalog::{
    catalog_router, CatalogService, EnrollmentPolicy, InMemoryCatalogStore, Roster,
    RosterProfessor, RosterStudent,
};

pub(super) fn roster() -> Roster {
    Roster {
        professors: vec![RosterProfessor {
            name: "Helena Duarte".to_string(),
        }],
        students: ["Carla Mendes", "Ana Souza", "Bruno Lima"]
            .into_iter()
            .enumerate()
            .map(|(index, name)| RosterStudent {
                name: name.to_string(),
                registration_code: format!("2025-{:04}", index + 1),
            })
            .collect(),
    }
}

pub(super) fn build_service() -> (
    CatalogService<InMemoryCatalogStore>,
    Arc<InMemoryCatalogStore>,
) {
    let store = Arc::new(InMemoryCatalogStore::with_roster(&roster()));
    let service = CatalogService::new(store.clone(), EnrollmentPolicy::default());
    (service, store)
}

pub(super) fn institution_registration() -> InstitutionRegistration {
    InstitutionRegistration {
        name: "Instituto X".to_string(),
        registration_number: "12.345.678/0001-99".to_string(),
        category: InstitutionCategory::Public,
        status: InstitutionStatus::Active,
        email: "a@b.com".to_string(),
        phone: "119999999".to_string(),
    }
}

pub(super) fn discipline_registration(institution_id: InstitutionId) -> DisciplineRegistration {
    DisciplineRegistration {
        institution_id,
        name: "Engenharia de Software I".to_string(),
        hours: 60,
        syllabus: "Processos de software".to_string(),
        objectives: "Modelar sistemas".to_string(),
        bibliography: "Sommerville".to_string(),
    }
}

pub(super) fn section_registration(
    professor_id: ProfessorId,
    discipline_id: DisciplineId,
    total_seats: u32,
) -> ClassSectionRegistration {
    ClassSectionRegistration {
        professor_id,
        discipline_id,
        status: ClassSectionStatus::Active,
        total_seats,
        location: "Sala 301B".to_string(),
        schedule: "Seg/Qua 10:00-12:00".to_string(),
        year: Utc::now().year(),
        term: 1,
    }
}

pub(super) fn professor_id(store: &InMemoryCatalogStore) -> ProfessorId {
    let tx = store.begin().expect("begin");
    tx.professors().expect("professors")[0].id
}

/// Students sorted by id: Carla, Ana, Bruno.
pub(super) fn student_ids(store: &InMemoryCatalogStore) -> Vec<StudentId> {
    let tx = store.begin().expect("begin");
    tx.students()
        .expect("students")
        .into_iter()
        .map(|student| student.id)
        .collect()
}

pub(super) fn section(store: &InMemoryCatalogStore, id: ClassSectionId) -> ClassSection {
    let tx = store.begin().expect("begin");
    tx.class_sections()
        .expect("sections")
        .into_iter()
        .find(|section| section.id == id)
        .expect("section present")
}

/// Registers an institution, a discipline, and a section with `total_seats` seats.
pub(super) fn seeded_section(
    service: &CatalogService<InMemoryCatalogStore>,
    store: &InMemoryCatalogStore,
    total_seats: u32,
) -> ClassSectionId {
    let institution = service
        .register_institution(institution_registration())
        .expect("institution registers");
    let discipline = service
        .register_discipline(discipline_registration(institution))
        .expect("discipline registers");
    service
        .register_class_section(section_registration(
            professor_id(store),
            discipline,
            total_seats,
        ))
        .expect("section registers")
}

pub(super) struct UnavailableStore;

pub(super) struct UnavailableTransaction;

impl CatalogStore for UnavailableStore {
    type Transaction<'a> = UnavailableTransaction
    where
        Self: 'a;

    fn begin(&self) -> Result<Self::Transaction<'_>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

fn offline<T>() -> Result<T, RepositoryError> {
    Err(RepositoryError::Unavailable("database offline".to_string()))
}

impl CatalogTransaction for UnavailableTransaction {
    fn institution(&self, _id: InstitutionId) -> Result<Option<Institution>, RepositoryError> {
        offline()
    }

    fn insert_institution(
        &mut self,
        _registration: InstitutionRegistration,
    ) -> Result<Institution, RepositoryError> {
        offline()
    }

    fn institutions(&self) -> Result<Vec<Institution>, RepositoryError> {
        offline()
    }

    fn discipline(&self, _id: DisciplineId) -> Result<Option<Discipline>, RepositoryError> {
        offline()
    }

    fn insert_discipline(
        &mut self,
        _registration: DisciplineRegistration,
    ) -> Result<Discipline, RepositoryError> {
        offline()
    }

    fn disciplines(&self) -> Result<Vec<Discipline>, RepositoryError> {
        offline()
    }

    fn professor(&self, _id: ProfessorId) -> Result<Option<Professor>, RepositoryError> {
        offline()
    }

    fn professors(&self) -> Result<Vec<Professor>, RepositoryError> {
        offline()
    }

    fn student(&self, _id: StudentId) -> Result<Option<Student>, RepositoryError> {
        offline()
    }

    fn students(&self) -> Result<Vec<Student>, RepositoryError> {
        offline()
    }

    fn class_section_for_update(
        &mut self,
        _id: ClassSectionId,
    ) -> Result<Option<ClassSection>, RepositoryError> {
        offline()
    }

    fn insert_class_section(
        &mut self,
        _registration: ClassSectionRegistration,
    ) -> Result<ClassSection, RepositoryError> {
        offline()
    }

    fn set_available_seats(
        &mut self,
        _id: ClassSectionId,
        _available_seats: u32,
    ) -> Result<(), RepositoryError> {
        offline()
    }

    fn class_sections(&self) -> Result<Vec<ClassSection>, RepositoryError> {
        offline()
    }

    fn enrollment_exists(
        &self,
        _student_id: StudentId,
        _class_section_id: ClassSectionId,
    ) -> Result<bool, RepositoryError> {
        offline()
    }

    fn insert_enrollment(
        &mut self,
        _student_id: StudentId,
        _class_section_id: ClassSectionId,
        _enrolled_at: DateTime<Utc>,
    ) -> Result<Enrollment, RepositoryError> {
        offline()
    }

    fn commit(self) -> Result<(), RepositoryError> {
        offline()
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn router_with_service(service: CatalogService<InMemoryCatalogStore>) -> axum::Router {
    catalog_router(Arc::new(service))
}
