pub mod auth;
pub mod config;
pub mod entity;
pub mod ids;
pub mod models;
pub mod service;
pub mod test_utils;

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tokio::sync::OnceCell;

use crate::service::{
    assignments::AssignmentsService, attendance::AttendanceService, classes::ClassesService,
    enrollments::EnrollmentsService, exercises::ExercisesService, progress::ProgressService,
    reports::ReportsService, sessions::SessionsService, templates::TemplatesService,
    users::UsersService, workout_logs::WorkoutLogsService,
};

static STUDIO_CORE: OnceCell<Arc<StudioCore>> = OnceCell::const_new();

pub async fn core() -> Arc<StudioCore> {
    STUDIO_CORE
        .get_or_init(|| async move { Arc::new(StudioCore::start().await.expect("failed to init")) })
        .await
        .clone()
}

/// Main runtime handle: config, database and the per-aggregate services.
pub struct StudioCore {
    pub config: config::StudioConfig,

    pub db: DatabaseConnection,

    pub users: UsersService,
    pub exercises: ExercisesService,
    pub templates: TemplatesService,
    pub assignments: AssignmentsService,
    pub workout_logs: WorkoutLogsService,
    pub classes: ClassesService,
    pub sessions: SessionsService,
    pub enrollments: EnrollmentsService,
    pub attendance: AttendanceService,
    pub progress: ProgressService,
    pub reports: ReportsService,
}

impl StudioCore {
    pub async fn start() -> Result<Self, Box<dyn std::error::Error>> {
        let _ = env_logger::try_init();

        let config = config::get_or_init().await?;

        // DB + migrations
        let db = models::open_or_create_db(&config).await;
        models::migrate_up(db.clone()).await;

        Ok(Self {
            config,
            users: UsersService::new(db.clone()),
            exercises: ExercisesService::new(db.clone()),
            templates: TemplatesService::new(db.clone()),
            assignments: AssignmentsService::new(db.clone()),
            workout_logs: WorkoutLogsService::new(db.clone()),
            classes: ClassesService::new(db.clone()),
            sessions: SessionsService::new(db.clone()),
            enrollments: EnrollmentsService::new(db.clone()),
            attendance: AttendanceService::new(db.clone()),
            progress: ProgressService::new(db.clone()),
            reports: ReportsService::new(db.clone()),
            db,
        })
    }

    pub async fn shutdown(self) -> Result<(), Box<dyn std::error::Error>> {
        self.db.close().await?;
        Ok(())
    }
}

pub mod prelude {
    pub use super::auth;
    pub use super::config;
    pub use super::entity;
    pub use super::ids;
    pub use super::models;

    pub use super::service;
}
