use enrollment_portal::catalog::{CatalogService, InMemoryCatalogStore, Roster};
use enrollment_portal::config::CatalogConfig;
use enrollment_portal::error::AppError;
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type PortalService = CatalogService<InMemoryCatalogStore>;

/// Loads the roster file when one is given, the built-in demo roster otherwise.
pub(crate) fn load_roster(path: Option<&Path>) -> Result<Roster, AppError> {
    match path {
        Some(path) => {
            let roster = Roster::from_path(path)?;
            info!(
                path = %path.display(),
                professors = roster.professors.len(),
                students = roster.students.len(),
                "roster loaded"
            );
            Ok(roster)
        }
        None => {
            warn!("no roster configured, using the built-in demo roster");
            Ok(Roster::demo())
        }
    }
}

pub(crate) fn build_catalog_service(
    config: &CatalogConfig,
) -> Result<Arc<PortalService>, AppError> {
    let roster = load_roster(config.roster_path.as_deref())?;
    let store = Arc::new(InMemoryCatalogStore::with_roster(&roster));
    Ok(Arc::new(CatalogService::new(store, config.policy)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use enrollment_portal::catalog::EnrollmentPolicy;
    use std::io::Write;

    #[test]
    fn missing_roster_path_falls_back_to_demo() {
        let roster = load_roster(None).expect("demo roster");
        assert_eq!(roster, Roster::demo());
    }

    #[test]
    fn unreadable_roster_is_an_error() {
        let path = std::env::temp_dir().join("enrollment-portal-missing-roster.json");
        let _ = std::fs::remove_file(&path);
        assert!(matches!(
            load_roster(Some(path.as_path())),
            Err(AppError::Roster(_))
        ));
    }

    #[test]
    fn service_is_seeded_from_roster_file() {
        let path = std::env::temp_dir().join(format!(
            "enrollment-portal-roster-{}.json",
            std::process::id()
        ));
        let mut file = std::fs::File::create(&path).expect("temp file");
        file.write_all(
            br#"{"professors":[{"name":"Rita"}],"students":[{"name":"Davi","registration_code":"R-1"}]}"#,
        )
        .expect("write roster");
        drop(file);

        let config = CatalogConfig {
            roster_path: Some(path.clone()),
            policy: EnrollmentPolicy::default(),
        };
        let service = build_catalog_service(&config).expect("service builds");
        let students = service.list_enrollable_students().expect("students");
        let _ = std::fs::remove_file(&path);

        assert_eq!(students.len(), 1);
        assert_eq!(students[0].registration_code, "R-1");
        assert_eq!(service.list_professors().expect("professors")[0].name, "Rita");
    }
}
