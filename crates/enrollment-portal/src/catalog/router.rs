use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use serde_json::json;

use super::domain::{
    ClassSectionRegistration, DisciplineRegistration, EnrollmentRequest, InstitutionRegistration,
};
use super::repository::CatalogStore;
use super::service::{CatalogError, CatalogService};

/// Router builder exposing registration, enrollment, and listing endpoints.
pub fn catalog_router<S>(service: Arc<CatalogService<S>>) -> Router
where
    S: CatalogStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/institutions",
            post(register_institution_handler::<S>).get(list_institutions_handler::<S>),
        )
        .route(
            "/api/v1/disciplines",
            post(register_discipline_handler::<S>).get(list_disciplines_handler::<S>),
        )
        .route(
            "/api/v1/class-sections",
            post(register_class_section_handler::<S>),
        )
        .route(
            "/api/v1/class-sections/open",
            get(list_open_class_sections_handler::<S>),
        )
        .route("/api/v1/enrollments", post(enroll_handler::<S>))
        .route("/api/v1/students", get(list_students_handler::<S>))
        .route("/api/v1/professors", get(list_professors_handler::<S>))
        .with_state(service)
}

pub(crate) fn error_status(error: &CatalogError) -> StatusCode {
    match error {
        CatalogError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        CatalogError::NotFound { .. } => StatusCode::NOT_FOUND,
        CatalogError::Conflict(_)
        | CatalogError::Capacity(_)
        | CatalogError::DuplicateEnrollment { .. } => StatusCode::CONFLICT,
        CatalogError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(error: CatalogError) -> Response {
    let payload = json!({
        "error": error.to_string(),
        "kind": error.kind(),
    });
    (error_status(&error), axum::Json(payload)).into_response()
}

/// Malformed or mistyped request bodies are validation failures.
fn rejection_response(rejection: JsonRejection) -> Response {
    let payload = json!({
        "error": rejection.body_text(),
        "kind": "validation",
    });
    (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
}

fn created(id: u64) -> Response {
    (StatusCode::CREATED, axum::Json(json!({ "id": id }))).into_response()
}

fn listing<T: Serialize>(result: Result<Vec<T>, CatalogError>) -> Response {
    match result {
        Ok(entries) => (StatusCode::OK, axum::Json(entries)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn register_institution_handler<S>(
    State(service): State<Arc<CatalogService<S>>>,
    body: Result<axum::Json<InstitutionRegistration>, JsonRejection>,
) -> Response
where
    S: CatalogStore + 'static,
{
    let axum::Json(registration) = match body {
        Ok(body) => body,
        Err(rejection) => return rejection_response(rejection),
    };
    match service.register_institution(registration) {
        Ok(id) => created(id.0),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn register_discipline_handler<S>(
    State(service): State<Arc<CatalogService<S>>>,
    body: Result<axum::Json<DisciplineRegistration>, JsonRejection>,
) -> Response
where
    S: CatalogStore + 'static,
{
    let axum::Json(registration) = match body {
        Ok(body) => body,
        Err(rejection) => return rejection_response(rejection),
    };
    match service.register_discipline(registration) {
        Ok(id) => created(id.0),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn register_class_section_handler<S>(
    State(service): State<Arc<CatalogService<S>>>,
    body: Result<axum::Json<ClassSectionRegistration>, JsonRejection>,
) -> Response
where
    S: CatalogStore + 'static,
{
    let axum::Json(registration) = match body {
        Ok(body) => body,
        Err(rejection) => return rejection_response(rejection),
    };
    match service.register_class_section(registration) {
        Ok(id) => created(id.0),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn enroll_handler<S>(
    State(service): State<Arc<CatalogService<S>>>,
    body: Result<axum::Json<EnrollmentRequest>, JsonRejection>,
) -> Response
where
    S: CatalogStore + 'static,
{
    let axum::Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => return rejection_response(rejection),
    };
    match service.enroll_student(request) {
        Ok(result) => (StatusCode::CREATED, axum::Json(result)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_students_handler<S>(
    State(service): State<Arc<CatalogService<S>>>,
) -> Response
where
    S: CatalogStore + 'static,
{
    listing(service.list_enrollable_students())
}

pub(crate) async fn list_open_class_sections_handler<S>(
    State(service): State<Arc<CatalogService<S>>>,
) -> Response
where
    S: CatalogStore + 'static,
{
    listing(service.list_open_class_sections())
}

pub(crate) async fn list_institutions_handler<S>(
    State(service): State<Arc<CatalogService<S>>>,
) -> Response
where
    S: CatalogStore + 'static,
{
    listing(service.list_institutions())
}

pub(crate) async fn list_disciplines_handler<S>(
    State(service): State<Arc<CatalogService<S>>>,
) -> Response
where
    S: CatalogStore + 'static,
{
    listing(service.list_disciplines())
}

pub(crate) async fn list_professors_handler<S>(
    State(service): State<Arc<CatalogService<S>>>,
) -> Response
where
    S: CatalogStore + 'static,
{
    listing(service.list_professors())
}
