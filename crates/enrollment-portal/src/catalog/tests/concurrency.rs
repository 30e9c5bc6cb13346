use super::common::*;
use crate::catalog::domain::EnrollmentRequest;
use crate::catalog::repository::{CatalogStore, CatalogTransaction};
use crate::catalog::{
    CatalogError, CatalogService, EnrollmentPolicy, InMemoryCatalogStore, Roster, RosterProfessor,
    RosterStudent,
};
use std::sync::{Arc, Barrier};
use std::thread;

fn crowded_service(
    students: usize,
) -> (CatalogService<InMemoryCatalogStore>, Arc<InMemoryCatalogStore>) {
    let roster = Roster {
        professors: vec![RosterProfessor {
            name: "Helena Duarte".to_string(),
        }],
        students: (0..students)
            .map(|index| RosterStudent {
                name: format!("Student {index:03}"),
                registration_code: format!("2025-{index:04}"),
            })
            .collect(),
    };
    let store = Arc::new(InMemoryCatalogStore::with_roster(&roster));
    let service = CatalogService::new(store.clone(), EnrollmentPolicy::default());
    (service, store)
}

fn enroll_all_at_once(
    service: &CatalogService<InMemoryCatalogStore>,
    requests: Vec<EnrollmentRequest>,
) -> Vec<Result<u32, CatalogError>> {
    let barrier = Barrier::new(requests.len());
    thread::scope(|scope| {
        let handles: Vec<_> = requests
            .into_iter()
            .map(|request| {
                let barrier = &barrier;
                scope.spawn(move || {
                    barrier.wait();
                    service
                        .enroll_student(request)
                        .map(|result| result.remaining_seats)
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("enrollment thread panicked"))
            .collect()
    })
}

#[test]
fn concurrent_enrollments_never_oversell_a_section() {
    const SEATS: u32 = 5;
    const CALLERS: usize = 24;

    let (service, store) = crowded_service(CALLERS);
    let section_id = seeded_section(&service, &store, SEATS);
    let requests = student_ids(&store)
        .into_iter()
        .map(|student_id| EnrollmentRequest {
            student_id,
            class_section_id: section_id,
        })
        .collect();

    let outcomes = enroll_all_at_once(&service, requests);

    let successes = outcomes.iter().filter(|outcome| outcome.is_ok()).count();
    let capacity_failures = outcomes
        .iter()
        .filter(|outcome| matches!(outcome, Err(CatalogError::Capacity(_))))
        .count();
    assert_eq!(successes, SEATS as usize);
    assert_eq!(capacity_failures, CALLERS - SEATS as usize);

    let mut remaining: Vec<u32> = outcomes.into_iter().filter_map(Result::ok).collect();
    remaining.sort_unstable();
    assert_eq!(remaining, (0..SEATS).collect::<Vec<_>>());

    assert_eq!(section(&store, section_id).available_seats, 0);
}

#[test]
fn single_seat_goes_to_exactly_one_of_two_students() {
    let (service, store) = build_service();
    let section_id = seeded_section(&service, &store, 1);
    let students = student_ids(&store);
    let requests = students[..2]
        .iter()
        .map(|&student_id| EnrollmentRequest {
            student_id,
            class_section_id: section_id,
        })
        .collect();

    let outcomes = enroll_all_at_once(&service, requests);

    assert_eq!(outcomes.iter().filter(|outcome| outcome.is_ok()).count(), 1);
    assert_eq!(
        outcomes
            .iter()
            .filter(|outcome| matches!(outcome, Err(CatalogError::Capacity(_))))
            .count(),
        1
    );

    let tx = store.begin().expect("begin");
    let enrolled = students[..2]
        .iter()
        .filter(|&&student_id| {
            tx.enrollment_exists(student_id, section_id)
                .expect("lookup")
        })
        .count();
    assert_eq!(enrolled, 1);
}

#[test]
fn concurrent_duplicates_consume_one_seat() {
    let (service, store) = build_service();
    let section_id = seeded_section(&service, &store, 10);
    let request = EnrollmentRequest {
        student_id: student_ids(&store)[2],
        class_section_id: section_id,
    };

    let outcomes = enroll_all_at_once(&service, vec![request; 8]);

    assert_eq!(outcomes.iter().filter(|outcome| outcome.is_ok()).count(), 1);
    assert!(outcomes
        .iter()
        .filter(|outcome| outcome.is_err())
        .all(|outcome| matches!(outcome, Err(CatalogError::DuplicateEnrollment { .. }))));
    assert_eq!(section(&store, section_id).available_seats, 9);
}
