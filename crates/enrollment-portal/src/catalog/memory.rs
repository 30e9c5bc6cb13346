use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use super::domain::{
    ClassSection, ClassSectionId, ClassSectionRegistration, Discipline, DisciplineId,
    DisciplineRegistration, Enrollment, EnrollmentId, Institution, InstitutionId,
    InstitutionRegistration, Professor, ProfessorId, Student, StudentId,
};
use super::repository::{CatalogStore, CatalogTransaction, RepositoryError};
use super::roster::Roster;

/// Process-local catalog store.
///
/// Every transaction holds the store mutex until it is committed or dropped, which gives
/// serializable isolation. Writes are applied in place and recorded in an undo log that is
/// replayed if the transaction is dropped without committing. Allocated ids are not
/// handed back on rollback.
#[derive(Debug, Default)]
pub struct InMemoryCatalogStore {
    state: Mutex<CatalogState>,
}

#[derive(Debug, Default)]
struct CatalogState {
    institutions: BTreeMap<InstitutionId, Institution>,
    disciplines: BTreeMap<DisciplineId, Discipline>,
    professors: BTreeMap<ProfessorId, Professor>,
    students: BTreeMap<StudentId, Student>,
    class_sections: BTreeMap<ClassSectionId, ClassSection>,
    enrollments: BTreeMap<EnrollmentId, Enrollment>,
    enrolled_pairs: BTreeSet<(StudentId, ClassSectionId)>,
    last_id: u64,
}

impl CatalogState {
    fn next_id(&mut self) -> u64 {
        self.last_id += 1;
        self.last_id
    }

    fn revert(&mut self, entry: UndoEntry) {
        match entry {
            UndoEntry::Institution(id) => {
                self.institutions.remove(&id);
            }
            UndoEntry::Discipline(id) => {
                self.disciplines.remove(&id);
            }
            UndoEntry::ClassSection(id) => {
                self.class_sections.remove(&id);
            }
            UndoEntry::AvailableSeats { id, previous } => {
                if let Some(section) = self.class_sections.get_mut(&id) {
                    section.available_seats = previous;
                }
            }
            UndoEntry::Enrollment(id) => {
                if let Some(enrollment) = self.enrollments.remove(&id) {
                    self.enrolled_pairs
                        .remove(&(enrollment.student_id, enrollment.class_section_id));
                }
            }
        }
    }
}

/// Inverse of one write made by an uncommitted transaction.
#[derive(Debug)]
enum UndoEntry {
    Institution(InstitutionId),
    Discipline(DisciplineId),
    ClassSection(ClassSectionId),
    AvailableSeats { id: ClassSectionId, previous: u32 },
    Enrollment(EnrollmentId),
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store whose professors and students come from `roster`.
    pub fn with_roster(roster: &Roster) -> Self {
        let mut state = CatalogState::default();
        for professor in &roster.professors {
            let id = ProfessorId(state.next_id());
            state.professors.insert(
                id,
                Professor {
                    id,
                    name: professor.name.trim().to_string(),
                },
            );
        }
        for student in &roster.students {
            let id = StudentId(state.next_id());
            state.students.insert(
                id,
                Student {
                    id,
                    name: student.name.trim().to_string(),
                    registration_code: student.registration_code.trim().to_string(),
                },
            );
        }

        Self {
            state: Mutex::new(state),
        }
    }
}

impl CatalogStore for InMemoryCatalogStore {
    type Transaction<'a> = InMemoryTransaction<'a>
    where
        Self: 'a;

    fn begin(&self) -> Result<Self::Transaction<'_>, RepositoryError> {
        let state = self.state.lock().map_err(|_| {
            RepositoryError::Unavailable("catalog store lock poisoned".to_string())
        })?;
        Ok(InMemoryTransaction {
            state,
            undo: Vec::new(),
        })
    }
}

/// Unit of work over [`InMemoryCatalogStore`]. Dropping it without committing reverts
/// every write it made.
#[derive(Debug)]
pub struct InMemoryTransaction<'a> {
    state: MutexGuard<'a, CatalogState>,
    undo: Vec<UndoEntry>,
}

impl InMemoryTransaction<'_> {
    fn state(&self) -> &CatalogState {
        &self.state
    }
}

impl Drop for InMemoryTransaction<'_> {
    fn drop(&mut self) {
        while let Some(entry) = self.undo.pop() {
            self.state.revert(entry);
        }
    }
}

impl CatalogTransaction for InMemoryTransaction<'_> {
    fn institution(&self, id: InstitutionId) -> Result<Option<Institution>, RepositoryError> {
        Ok(self.state().institutions.get(&id).cloned())
    }

    fn insert_institution(
        &mut self,
        registration: InstitutionRegistration,
    ) -> Result<Institution, RepositoryError> {
        let state = &mut *self.state;
        if state
            .institutions
            .values()
            .any(|existing| existing.registration_number == registration.registration_number)
        {
            return Err(RepositoryError::Conflict(format!(
                "registration number '{}' is already registered",
                registration.registration_number
            )));
        }

        let id = InstitutionId(state.next_id());
        let institution = Institution {
            id,
            name: registration.name,
            registration_number: registration.registration_number,
            category: registration.category,
            status: registration.status,
            email: registration.email,
            phone: registration.phone,
        };
        state.institutions.insert(id, institution.clone());
        self.undo.push(UndoEntry::Institution(id));
        Ok(institution)
    }

    fn institutions(&self) -> Result<Vec<Institution>, RepositoryError> {
        Ok(self.state().institutions.values().cloned().collect())
    }

    fn discipline(&self, id: DisciplineId) -> Result<Option<Discipline>, RepositoryError> {
        Ok(self.state().disciplines.get(&id).cloned())
    }

    fn insert_discipline(
        &mut self,
        registration: DisciplineRegistration,
    ) -> Result<Discipline, RepositoryError> {
        let state = &mut *self.state;
        if !state.institutions.contains_key(&registration.institution_id) {
            return Err(RepositoryError::NotFound);
        }

        let id = DisciplineId(state.next_id());
        let discipline = Discipline {
            id,
            institution_id: registration.institution_id,
            name: registration.name,
            hours: registration.hours,
            syllabus: registration.syllabus,
            objectives: registration.objectives,
            bibliography: registration.bibliography,
        };
        state.disciplines.insert(id, discipline.clone());
        self.undo.push(UndoEntry::Discipline(id));
        Ok(discipline)
    }

    fn disciplines(&self) -> Result<Vec<Discipline>, RepositoryError> {
        Ok(self.state().disciplines.values().cloned().collect())
    }

    fn professor(&self, id: ProfessorId) -> Result<Option<Professor>, RepositoryError> {
        Ok(self.state().professors.get(&id).cloned())
    }

    fn professors(&self) -> Result<Vec<Professor>, RepositoryError> {
        Ok(self.state().professors.values().cloned().collect())
    }

    fn student(&self, id: StudentId) -> Result<Option<Student>, RepositoryError> {
        Ok(self.state().students.get(&id).cloned())
    }

    fn students(&self) -> Result<Vec<Student>, RepositoryError> {
        Ok(self.state().students.values().cloned().collect())
    }

    fn class_section_for_update(
        &mut self,
        id: ClassSectionId,
    ) -> Result<Option<ClassSection>, RepositoryError> {
        // The whole store is already held exclusively by this transaction.
        Ok(self.state().class_sections.get(&id).cloned())
    }

    fn insert_class_section(
        &mut self,
        registration: ClassSectionRegistration,
    ) -> Result<ClassSection, RepositoryError> {
        let state = &mut *self.state;
        if !state.professors.contains_key(&registration.professor_id)
            || !state.disciplines.contains_key(&registration.discipline_id)
        {
            return Err(RepositoryError::NotFound);
        }

        let id = ClassSectionId(state.next_id());
        let section = ClassSection {
            id,
            professor_id: registration.professor_id,
            discipline_id: registration.discipline_id,
            status: registration.status,
            total_seats: registration.total_seats,
            available_seats: registration.total_seats,
            location: registration.location,
            schedule: registration.schedule,
            year: registration.year,
            term: registration.term,
        };
        state.class_sections.insert(id, section.clone());
        self.undo.push(UndoEntry::ClassSection(id));
        Ok(section)
    }

    fn set_available_seats(
        &mut self,
        id: ClassSectionId,
        available_seats: u32,
    ) -> Result<(), RepositoryError> {
        let section = self
            .state
            .class_sections
            .get_mut(&id)
            .ok_or(RepositoryError::NotFound)?;
        if available_seats > section.total_seats {
            return Err(RepositoryError::Conflict(format!(
                "available seats {available_seats} exceed total seats {} for class section {id}",
                section.total_seats
            )));
        }
        let previous = std::mem::replace(&mut section.available_seats, available_seats);
        self.undo.push(UndoEntry::AvailableSeats { id, previous });
        Ok(())
    }

    fn class_sections(&self) -> Result<Vec<ClassSection>, RepositoryError> {
        Ok(self.state().class_sections.values().cloned().collect())
    }

    fn enrollment_exists(
        &self,
        student_id: StudentId,
        class_section_id: ClassSectionId,
    ) -> Result<bool, RepositoryError> {
        Ok(self
            .state()
            .enrolled_pairs
            .contains(&(student_id, class_section_id)))
    }

    fn insert_enrollment(
        &mut self,
        student_id: StudentId,
        class_section_id: ClassSectionId,
        enrolled_at: DateTime<Utc>,
    ) -> Result<Enrollment, RepositoryError> {
        let state = &mut *self.state;
        if !state.enrolled_pairs.insert((student_id, class_section_id)) {
            return Err(RepositoryError::Conflict(format!(
                "student {student_id} is already enrolled in class section {class_section_id}"
            )));
        }

        let id = EnrollmentId(state.next_id());
        let enrollment = Enrollment {
            id,
            student_id,
            class_section_id,
            enrolled_at,
        };
        state.enrollments.insert(id, enrollment.clone());
        self.undo.push(UndoEntry::Enrollment(id));
        Ok(enrollment)
    }

    fn commit(mut self) -> Result<(), RepositoryError> {
        self.undo.clear();
        Ok(())
    }
}
