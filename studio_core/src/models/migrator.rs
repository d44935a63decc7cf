use sea_orm_migration::prelude::*;

mod m20260412_000001_create_users_table;
mod m20260412_000002_create_exercises_table;
mod m20260412_000003_create_workout_templates_table;
mod m20260412_000004_create_template_exercises_table;
mod m20260412_000005_create_workout_assignments_table;
mod m20260412_000006_create_workout_logs_table;
mod m20260412_000007_create_workout_log_entries_table;
mod m20260412_000008_create_classes_table;
mod m20260412_000009_create_class_sessions_table;
mod m20260412_000010_create_class_enrollments_table;
mod m20260412_000011_create_attendance_table;
mod m20260412_000012_create_progress_measurements_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260412_000001_create_users_table::Migration),
            Box::new(m20260412_000002_create_exercises_table::Migration),
            Box::new(m20260412_000003_create_workout_templates_table::Migration),
            Box::new(m20260412_000004_create_template_exercises_table::Migration),
            Box::new(m20260412_000005_create_workout_assignments_table::Migration),
            Box::new(m20260412_000006_create_workout_logs_table::Migration),
            Box::new(m20260412_000007_create_workout_log_entries_table::Migration),
            Box::new(m20260412_000008_create_classes_table::Migration),
            Box::new(m20260412_000009_create_class_sessions_table::Migration),
            Box::new(m20260412_000010_create_class_enrollments_table::Migration),
            Box::new(m20260412_000011_create_attendance_table::Migration),
            Box::new(m20260412_000012_create_progress_measurements_table::Migration),
        ]
    }
}

#[cfg(test)]
use sea_orm::{Database, DbErr};

#[tokio::test]
async fn test_migrations_okay() -> Result<(), DbErr> {
    let db = Database::connect("sqlite::memory:").await?;
    let schema_manager = SchemaManager::new(&db);

    Migrator::refresh(&db).await?;

    assert!(schema_manager.has_table("users").await?);
    assert!(schema_manager.has_table("exercises").await?);
    assert!(schema_manager.has_table("workout_templates").await?);
    assert!(schema_manager.has_table("template_exercises").await?);
    assert!(schema_manager.has_table("workout_assignments").await?);
    assert!(schema_manager.has_table("workout_logs").await?);
    assert!(schema_manager.has_table("workout_log_entries").await?);
    assert!(schema_manager.has_table("classes").await?);
    assert!(schema_manager.has_table("class_sessions").await?);
    assert!(schema_manager.has_table("class_enrollments").await?);
    assert!(schema_manager.has_table("attendance").await?);
    assert!(schema_manager.has_table("progress_measurements").await?);

    Ok(())
}
