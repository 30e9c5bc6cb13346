use crate::infra::{build_catalog_service, PortalService};
use chrono::{Datelike, Utc};
use clap::Args;
use enrollment_portal::catalog::{
    CatalogError, ClassSectionId, ClassSectionRegistration, ClassSectionStatus,
    DisciplineRegistration, EnrollmentPolicy, EnrollmentRequest, InstitutionCategory,
    InstitutionRegistration, InstitutionStatus, StudentId,
};
use enrollment_portal::config::CatalogConfig;
use enrollment_portal::error::AppError;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Roster JSON with professors and students (defaults to the built-in roster)
    #[arg(long)]
    pub(crate) roster: Option<PathBuf>,
    /// Seats offered by the demo class section
    #[arg(long, default_value_t = 2)]
    pub(crate) seats: u32,
    /// Academic year of the demo class section (defaults to the current year)
    #[arg(long)]
    pub(crate) year: Option<i32>,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { roster, seats, year } = args;
    let year = year.unwrap_or_else(|| Utc::now().year());

    let service = build_catalog_service(&CatalogConfig {
        roster_path: roster,
        policy: EnrollmentPolicy::default(),
    })?;

    println!("Enrollment portal demo");

    let institution_id = service.register_institution(InstitutionRegistration {
        name: "Instituto X".to_string(),
        registration_number: "12.345.678/0001-99".to_string(),
        category: InstitutionCategory::Public,
        status: InstitutionStatus::Active,
        email: "secretaria@institutox.edu.br".to_string(),
        phone: "(11) 99999-9999".to_string(),
    })?;
    println!("- Registered institution #{institution_id}");

    let discipline_id = service.register_discipline(DisciplineRegistration {
        institution_id,
        name: "Engenharia de Software I".to_string(),
        hours: 60,
        syllabus: "Requirements, modelling and testing".to_string(),
        objectives: "Deliver a small system end to end".to_string(),
        bibliography: "Sommerville, Software Engineering".to_string(),
    })?;
    println!("- Registered discipline #{discipline_id}");

    let Some(professor) = service.list_professors()?.into_iter().next() else {
        println!("  Roster has no professors; nothing to schedule");
        return Ok(());
    };
    let section_id = service.register_class_section(ClassSectionRegistration {
        professor_id: professor.professor_id,
        discipline_id,
        status: ClassSectionStatus::Active,
        total_seats: seats,
        location: "Sala 301B".to_string(),
        schedule: "Seg/Qua 10:00-12:00".to_string(),
        year,
        term: 1,
    })?;
    println!(
        "- Opened class section #{section_id} with {seats} seats, taught by {}",
        professor.name
    );

    render_open_sections(&service)?;

    println!("\nEnrollment attempts");
    let students = service.list_enrollable_students()?;
    for student in &students {
        attempt(&service, student.student_id, section_id, &student.name);
    }
    if let Some(first) = students.first() {
        attempt(&service, first.student_id, section_id, &first.name);
    }

    render_open_sections(&service)?;
    Ok(())
}

fn attempt(
    service: &PortalService,
    student_id: StudentId,
    section_id: ClassSectionId,
    name: &str,
) {
    let request = EnrollmentRequest {
        student_id,
        class_section_id: section_id,
    };
    match service.enroll_student(request) {
        Ok(result) => println!("- {}", result.message),
        Err(err @ (CatalogError::Capacity(_) | CatalogError::DuplicateEnrollment { .. })) => {
            println!("- {name}: rejected ({})", err)
        }
        Err(err) => println!("- {name}: failed [{}] {}", err.kind(), err),
    }
}

fn render_open_sections(service: &PortalService) -> Result<(), AppError> {
    let open = service.list_open_class_sections()?;
    if open.is_empty() {
        println!("\nOpen class sections: none");
        return Ok(());
    }

    println!("\nOpen class sections");
    for section in open {
        println!(
            "- #{} {} (seats: {}/{})",
            section.class_section_id,
            section.discipline_name,
            section.available_seats,
            section.total_seats
        );
    }
    Ok(())
}
