//! Shared helpers for tests: a fresh in-memory database plus row
//! fixtures the service tests build their scenarios from.

use sea_orm::{Database, DatabaseConnection, EntityTrait, Set};
use sea_orm_migration::MigratorTrait;

use crate::entity::prelude::*;
use crate::ids::{ClassId, ExerciseId, TemplateId, UserId};
use crate::models::migrator::Migrator;

/// Create a new in-memory SQLite database with migrations applied.
/// Each call creates a fresh, isolated database instance.
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Insert a user row directly. Email is derived from the generated id so
/// repeated calls never collide with the unique index.
pub async fn seed_user(
    db: &DatabaseConnection,
    role: Role,
    assigned_admin_id: Option<UserId>,
) -> UserModel {
    let id = UserId::new();
    let now = chrono::Utc::now().to_rfc3339();

    let user = UserActiveModel {
        id: Set(id),
        name: Set(format!("User {}", id)),
        email: Set(format!("{}@example.test", id)),
        password: Set("secret".to_string()),
        role: Set(role),
        status: Set(UserStatus::Active),
        assigned_admin_id: Set(assigned_admin_id),
        weekly_goal: Set(None),
        created_at: Set(now.clone()),
        updated_at: Set(now),
    };

    User::insert(user)
        .exec_with_returning(db)
        .await
        .expect("Failed to seed user")
}

/// Insert an active class row directly.
pub async fn seed_class(
    db: &DatabaseConnection,
    instructor_id: UserId,
    capacity: i32,
) -> ClassModel {
    let id = ClassId::new();
    let now = chrono::Utc::now().to_rfc3339();

    let class = ClassActiveModel {
        id: Set(id),
        name: Set(format!("Class {}", id)),
        class_type: Set("strength".to_string()),
        description: Set(None),
        level: Set("All Levels".to_string()),
        capacity: Set(capacity),
        duration_minutes: Set(60),
        instructor_id: Set(instructor_id),
        location: Set(None),
        status: Set(ClassStatus::Active),
        created_at: Set(now.clone()),
        updated_at: Set(now),
    };

    Class::insert(class)
        .exec_with_returning(db)
        .await
        .expect("Failed to seed class")
}

/// Insert an exercise row directly.
pub async fn seed_exercise(db: &DatabaseConnection, created_by: UserId) -> ExerciseModel {
    let id = ExerciseId::new();
    let now = chrono::Utc::now().to_rfc3339();

    let exercise = ExerciseActiveModel {
        id: Set(id),
        name: Set(format!("Exercise {}", id)),
        category: Set("strength".to_string()),
        difficulty: Set(Difficulty::Beginner),
        primary_muscles: Set("[\"chest\"]".to_string()),
        equipment: Set(None),
        description: Set(None),
        image_url: Set(None),
        video_url: Set(None),
        created_by: Set(created_by),
        created_at: Set(now.clone()),
        updated_at: Set(now),
    };

    Exercise::insert(exercise)
        .exec_with_returning(db)
        .await
        .expect("Failed to seed exercise")
}

/// Insert a workout template row directly (no prescriptions).
pub async fn seed_template(db: &DatabaseConnection, created_by: UserId) -> WorkoutTemplateModel {
    let id = TemplateId::new();
    let now = chrono::Utc::now().to_rfc3339();

    let template = WorkoutTemplateActiveModel {
        id: Set(id),
        name: Set(format!("Template {}", id)),
        description: Set(None),
        difficulty: Set(Difficulty::Beginner),
        duration_minutes: Set(45),
        created_by: Set(created_by),
        created_at: Set(now.clone()),
        updated_at: Set(now),
    };

    WorkoutTemplate::insert(template)
        .exec_with_returning(db)
        .await
        .expect("Failed to seed template")
}
