#[cfg(test)]
mod entity_tests {
    use crate::entity::prelude::*;
    use crate::ids::*;
    use crate::test_utils;

    #[tokio::test]
    async fn test_create_and_find_user() {
        let db = test_utils::setup_test_db().await;

        let user = test_utils::seed_user(&db, Role::Trainee, None).await;

        let found = User::find_by_id(user.id)
            .one(&db)
            .await
            .expect("Failed to query user");

        assert!(found.is_some());
        let found_user = found.unwrap();
        assert_eq!(found_user.id, user.id);
        assert_eq!(found_user.role, Role::Trainee);
        assert_eq!(found_user.status, UserStatus::Active);
    }

    #[tokio::test]
    async fn test_missing_user_is_none_not_error() {
        let db = test_utils::setup_test_db().await;

        let found = User::find_by_id(UserId::new()).one(&db).await.unwrap();

        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_email_unique_index_rejects_duplicates() {
        let db = test_utils::setup_test_db().await;

        let existing = test_utils::seed_user(&db, Role::Trainee, None).await;

        let now = chrono::Utc::now().to_rfc3339();
        let duplicate = UserActiveModel {
            id: Set(UserId::new()),
            name: Set("Copycat".to_string()),
            email: Set(existing.email.clone()),
            password: Set("secret".to_string()),
            role: Set(Role::Trainee),
            status: Set(UserStatus::Active),
            assigned_admin_id: Set(None),
            weekly_goal: Set(None),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        };

        let result = User::insert(duplicate).exec(&db).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_attendance_natural_key_is_unique() {
        let db = test_utils::setup_test_db().await;

        let admin = test_utils::seed_user(&db, Role::Admin, None).await;
        let trainee = test_utils::seed_user(&db, Role::Trainee, None).await;
        let class = test_utils::seed_class(&db, admin.id, 10).await;
        let day = chrono::NaiveDate::from_ymd_opt(2026, 4, 20).unwrap();

        let row = |status: AttendanceStatus| AttendanceActiveModel {
            id: Set(AttendanceId::new()),
            class_id: Set(class.id),
            trainee_id: Set(trainee.id),
            schedule_date: Set(day),
            status: Set(status),
            marked_by: Set(admin.id),
            marked_at: Set(chrono::Utc::now().to_rfc3339()),
            notes: Set(None),
        };

        Attendance::insert(row(AttendanceStatus::Present))
            .exec(&db)
            .await
            .unwrap();

        // Same (trainee, class, day) again hits the unique index
        let duplicate = Attendance::insert(row(AttendanceStatus::Absent)).exec(&db).await;
        assert!(duplicate.is_err());
    }

    #[tokio::test]
    async fn test_class_delete_cascades_children() {
        let db = test_utils::setup_test_db().await;

        let admin = test_utils::seed_user(&db, Role::Admin, None).await;
        let trainee = test_utils::seed_user(&db, Role::Trainee, None).await;
        let class = test_utils::seed_class(&db, admin.id, 10).await;

        let enrollment = ClassEnrollmentActiveModel {
            id: Set(EnrollmentId::new()),
            class_id: Set(class.id),
            trainee_id: Set(trainee.id),
            status: Set(EnrollmentStatus::Active),
            enrolled_at: Set(chrono::Utc::now().to_rfc3339()),
            dropped_at: Set(None),
        };
        ClassEnrollment::insert(enrollment).exec(&db).await.unwrap();

        let session = ClassSessionActiveModel {
            id: Set(SessionId::new()),
            class_id: Set(class.id),
            starts_at: Set("2026-04-20T09:00:00+00:00".to_string()),
            ends_at: Set("2026-04-20T10:00:00+00:00".to_string()),
            session_date: Set(chrono::NaiveDate::from_ymd_opt(2026, 4, 20).unwrap()),
            status: Set(SessionStatus::Scheduled),
            location_override: Set(None),
            capacity_override: Set(None),
            notes: Set(None),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            updated_at: Set(chrono::Utc::now().to_rfc3339()),
        };
        ClassSession::insert(session).exec(&db).await.unwrap();

        Class::delete_by_id(class.id).exec(&db).await.unwrap();

        let enrollments = ClassEnrollment::find()
            .filter(ClassEnrollmentColumn::ClassId.eq(class.id))
            .all(&db)
            .await
            .unwrap();
        assert!(enrollments.is_empty());

        let sessions = ClassSession::find()
            .filter(ClassSessionColumn::ClassId.eq(class.id))
            .all(&db)
            .await
            .unwrap();
        assert!(sessions.is_empty());
    }

    #[tokio::test]
    async fn test_assignment_soft_references_survive_template_delete() {
        let db = test_utils::setup_test_db().await;

        let admin = test_utils::seed_user(&db, Role::Admin, None).await;
        let trainee = test_utils::seed_user(&db, Role::Trainee, Some(admin.id)).await;
        let template = test_utils::seed_template(&db, admin.id).await;

        let assignment = WorkoutAssignmentActiveModel {
            id: Set(AssignmentId::new()),
            trainee_id: Set(trainee.id),
            template_id: Set(template.id),
            assigned_by: Set(admin.id),
            status: Set(AssignmentStatus::Active),
            weekdays: Set("[0,2]".to_string()),
            start_date: Set(chrono::NaiveDate::from_ymd_opt(2026, 4, 13).unwrap()),
            end_date: Set(None),
            notes: Set(None),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            updated_at: Set(chrono::Utc::now().to_rfc3339()),
        };
        let assignment = WorkoutAssignment::insert(assignment)
            .exec_with_returning(&db)
            .await
            .unwrap();

        WorkoutTemplate::delete_by_id(template.id)
            .exec(&db)
            .await
            .unwrap();

        // Assignment row is now dangling but still present; cleanup is a
        // separate maintenance operation
        let found = WorkoutAssignment::find_by_id(assignment.id)
            .one(&db)
            .await
            .unwrap();
        assert!(found.is_some());
    }
}
