use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    auth::Caller,
    entity::prelude::*,
    ids::{ClassId, TemplateId, UserId},
    service::attendance::attendance_rate,
};

/// Trailing window for "recent" sub-counts on the dashboard.
const RECENT_WINDOW_DAYS: i64 = 7;
/// Trailing window for attendance rates. Independent of the recency
/// window; the two are not interchangeable.
const ATTENDANCE_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Error)]
pub enum ReportsServiceError {
    #[error("fatal database error")]
    DbError(#[from] DbErr),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub trainees: u64,
    pub active_classes: u64,
    pub active_assignments: u64,
    pub active_enrollments: u64,
    pub new_trainees_recent: u64,
    pub new_enrollments_recent: u64,
    pub attendance_rate: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityKind {
    WorkoutAssigned,
    ClassEnrolled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEvent {
    pub kind: ActivityKind,
    pub trainee_id: UserId,
    pub occurred_at: String,
}

#[derive(Clone)]
pub struct ReportsService {
    db: DatabaseConnection,
}

impl ReportsService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Caller-scoped dashboard counts. Super admins see studio-wide
    /// numbers, admins their own slice, trainees their own activity.
    pub async fn dashboard_stats(
        &self,
        caller: &Caller,
    ) -> Result<DashboardStats, ReportsServiceError> {
        let recent_cutoff = (chrono::Utc::now() - chrono::Duration::days(RECENT_WINDOW_DAYS))
            .to_rfc3339();
        let attendance_cutoff = (chrono::Utc::now()
            - chrono::Duration::days(ATTENDANCE_WINDOW_DAYS))
        .date_naive();

        let stats = match caller.role {
            Role::SuperAdmin => {
                let trainees = User::find()
                    .filter(UserColumn::Role.eq(Role::Trainee))
                    .count(&self.db)
                    .await?;
                let new_trainees = User::find()
                    .filter(UserColumn::Role.eq(Role::Trainee))
                    .filter(UserColumn::CreatedAt.gte(recent_cutoff.clone()))
                    .count(&self.db)
                    .await?;
                let active_classes = Class::find()
                    .filter(ClassColumn::Status.eq(ClassStatus::Active))
                    .count(&self.db)
                    .await?;
                let active_assignments = WorkoutAssignment::find()
                    .filter(WorkoutAssignmentColumn::Status.eq(AssignmentStatus::Active))
                    .count(&self.db)
                    .await?;
                let active_enrollments = ClassEnrollment::find()
                    .filter(ClassEnrollmentColumn::Status.eq(EnrollmentStatus::Active))
                    .count(&self.db)
                    .await?;
                let new_enrollments = ClassEnrollment::find()
                    .filter(ClassEnrollmentColumn::EnrolledAt.gte(recent_cutoff))
                    .count(&self.db)
                    .await?;
                let attendance = Attendance::find()
                    .filter(AttendanceColumn::ScheduleDate.gte(attendance_cutoff))
                    .all(&self.db)
                    .await?;

                DashboardStats {
                    trainees,
                    active_classes,
                    active_assignments,
                    active_enrollments,
                    new_trainees_recent: new_trainees,
                    new_enrollments_recent: new_enrollments,
                    attendance_rate: rate_of(&attendance),
                }
            }
            Role::Admin => {
                let class_ids = self.class_ids_for_instructor(caller.id).await?;

                let trainees = User::find()
                    .filter(UserColumn::AssignedAdminId.eq(caller.id))
                    .filter(UserColumn::Role.eq(Role::Trainee))
                    .count(&self.db)
                    .await?;
                let new_trainees = User::find()
                    .filter(UserColumn::AssignedAdminId.eq(caller.id))
                    .filter(UserColumn::Role.eq(Role::Trainee))
                    .filter(UserColumn::CreatedAt.gte(recent_cutoff.clone()))
                    .count(&self.db)
                    .await?;
                let active_classes = Class::find()
                    .filter(ClassColumn::InstructorId.eq(caller.id))
                    .filter(ClassColumn::Status.eq(ClassStatus::Active))
                    .count(&self.db)
                    .await?;
                let active_assignments = WorkoutAssignment::find()
                    .filter(WorkoutAssignmentColumn::AssignedBy.eq(caller.id))
                    .filter(WorkoutAssignmentColumn::Status.eq(AssignmentStatus::Active))
                    .count(&self.db)
                    .await?;
                let active_enrollments = ClassEnrollment::find()
                    .filter(ClassEnrollmentColumn::ClassId.is_in(class_ids.clone()))
                    .filter(ClassEnrollmentColumn::Status.eq(EnrollmentStatus::Active))
                    .count(&self.db)
                    .await?;
                let new_enrollments = ClassEnrollment::find()
                    .filter(ClassEnrollmentColumn::ClassId.is_in(class_ids.clone()))
                    .filter(ClassEnrollmentColumn::EnrolledAt.gte(recent_cutoff))
                    .count(&self.db)
                    .await?;
                let attendance = Attendance::find()
                    .filter(AttendanceColumn::ClassId.is_in(class_ids))
                    .filter(AttendanceColumn::ScheduleDate.gte(attendance_cutoff))
                    .all(&self.db)
                    .await?;

                DashboardStats {
                    trainees,
                    active_classes,
                    active_assignments,
                    active_enrollments,
                    new_trainees_recent: new_trainees,
                    new_enrollments_recent: new_enrollments,
                    attendance_rate: rate_of(&attendance),
                }
            }
            Role::Trainee => {
                let active_enrollments = ClassEnrollment::find()
                    .filter(ClassEnrollmentColumn::TraineeId.eq(caller.id))
                    .filter(ClassEnrollmentColumn::Status.eq(EnrollmentStatus::Active))
                    .count(&self.db)
                    .await?;
                let new_enrollments = ClassEnrollment::find()
                    .filter(ClassEnrollmentColumn::TraineeId.eq(caller.id))
                    .filter(ClassEnrollmentColumn::EnrolledAt.gte(recent_cutoff))
                    .count(&self.db)
                    .await?;
                let active_assignments = WorkoutAssignment::find()
                    .filter(WorkoutAssignmentColumn::TraineeId.eq(caller.id))
                    .filter(WorkoutAssignmentColumn::Status.eq(AssignmentStatus::Active))
                    .count(&self.db)
                    .await?;
                let attendance = Attendance::find()
                    .filter(AttendanceColumn::TraineeId.eq(caller.id))
                    .filter(AttendanceColumn::ScheduleDate.gte(attendance_cutoff))
                    .all(&self.db)
                    .await?;

                DashboardStats {
                    trainees: 0,
                    active_classes: active_enrollments,
                    active_assignments,
                    active_enrollments,
                    new_trainees_recent: 0,
                    new_enrollments_recent: new_enrollments,
                    attendance_rate: rate_of(&attendance),
                }
            }
        };

        Ok(stats)
    }

    /// Assignment and enrollment events in the caller's scope, merged
    /// and sorted newest first, truncated to `limit` (default 10). Tie
    /// order on equal timestamps follows the stable sort and is not part
    /// of the contract.
    pub async fn recent_activity(
        &self,
        caller: &Caller,
        limit: Option<usize>,
    ) -> Result<Vec<ActivityEvent>, ReportsServiceError> {
        let limit = limit.unwrap_or(10);

        let mut assignments = WorkoutAssignment::find();
        let mut enrollments = ClassEnrollment::find();
        match caller.role {
            Role::SuperAdmin => {}
            Role::Admin => {
                let class_ids = self.class_ids_for_instructor(caller.id).await?;
                assignments =
                    assignments.filter(WorkoutAssignmentColumn::AssignedBy.eq(caller.id));
                enrollments =
                    enrollments.filter(ClassEnrollmentColumn::ClassId.is_in(class_ids));
            }
            Role::Trainee => {
                assignments =
                    assignments.filter(WorkoutAssignmentColumn::TraineeId.eq(caller.id));
                enrollments =
                    enrollments.filter(ClassEnrollmentColumn::TraineeId.eq(caller.id));
            }
        }

        let mut events: Vec<ActivityEvent> = Vec::new();
        for assignment in assignments.all(&self.db).await? {
            events.push(ActivityEvent {
                kind: ActivityKind::WorkoutAssigned,
                trainee_id: assignment.trainee_id,
                occurred_at: assignment.created_at,
            });
        }
        for enrollment in enrollments.all(&self.db).await? {
            events.push(ActivityEvent {
                kind: ActivityKind::ClassEnrolled,
                trainee_id: enrollment.trainee_id,
                occurred_at: enrollment.enrolled_at,
            });
        }

        // Stable: equal timestamps keep their concatenation order
        events.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));
        events.truncate(limit);

        Ok(events)
    }

    /// Mean completion across all logs of a template: per log, the
    /// fraction of the template's exercises marked completed. 0 with no
    /// exercises or no logs.
    pub async fn template_completion_rate(
        &self,
        template_id: TemplateId,
    ) -> Result<u32, ReportsServiceError> {
        let exercise_count = TemplateExercise::find()
            .filter(TemplateExerciseColumn::TemplateId.eq(template_id))
            .count(&self.db)
            .await?;
        if exercise_count == 0 {
            return Ok(0);
        }

        let logs = WorkoutLog::find()
            .filter(WorkoutLogColumn::TemplateId.eq(template_id))
            .all(&self.db)
            .await?;
        if logs.is_empty() {
            return Ok(0);
        }

        let mut total_fraction = 0.0;
        for log in &logs {
            let completed = WorkoutLogEntry::find()
                .filter(WorkoutLogEntryColumn::LogId.eq(log.id))
                .filter(WorkoutLogEntryColumn::Completed.eq(true))
                .count(&self.db)
                .await?;
            total_fraction += completed as f64 / exercise_count as f64;
        }

        Ok(((total_fraction / logs.len() as f64) * 100.0).round() as u32)
    }

    async fn class_ids_for_instructor(
        &self,
        instructor_id: UserId,
    ) -> Result<Vec<ClassId>, ReportsServiceError> {
        let classes = Class::find()
            .filter(ClassColumn::InstructorId.eq(instructor_id))
            .all(&self.db)
            .await?;

        Ok(classes.into_iter().map(|c| c.id).collect())
    }
}

fn rate_of(records: &[AttendanceModel]) -> u32 {
    let present = records
        .iter()
        .filter(|r| r.status == AttendanceStatus::Present)
        .count() as u64;
    attendance_rate(present, records.len() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{AssignmentId, EnrollmentId, LogEntryId, WorkoutLogId};
    use crate::test_utils;

    async fn setup_test_service() -> ReportsService {
        let db = test_utils::setup_test_db().await;
        ReportsService::new(db)
    }

    fn caller_for(user: &UserModel) -> Caller {
        Caller::new(user.id, user.role)
    }

    async fn insert_enrollment(
        db: &DatabaseConnection,
        class_id: ClassId,
        trainee_id: UserId,
        enrolled_at: String,
    ) {
        let enrollment = ClassEnrollmentActiveModel {
            id: Set(EnrollmentId::new()),
            class_id: Set(class_id),
            trainee_id: Set(trainee_id),
            status: Set(EnrollmentStatus::Active),
            enrolled_at: Set(enrolled_at),
            dropped_at: Set(None),
        };
        ClassEnrollment::insert(enrollment).exec(db).await.unwrap();
    }

    async fn insert_assignment(
        db: &DatabaseConnection,
        trainee_id: UserId,
        template_id: crate::ids::TemplateId,
        assigned_by: UserId,
        created_at: String,
    ) {
        let assignment = WorkoutAssignmentActiveModel {
            id: Set(AssignmentId::new()),
            trainee_id: Set(trainee_id),
            template_id: Set(template_id),
            assigned_by: Set(assigned_by),
            status: Set(AssignmentStatus::Active),
            weekdays: Set("[0]".to_string()),
            start_date: Set(chrono::NaiveDate::from_ymd_opt(2026, 4, 13).unwrap()),
            end_date: Set(None),
            notes: Set(None),
            created_at: Set(created_at.clone()),
            updated_at: Set(created_at),
        };
        WorkoutAssignment::insert(assignment).exec(db).await.unwrap();
    }

    async fn insert_log_with_completion(
        db: &DatabaseConnection,
        trainee_id: UserId,
        template_id: crate::ids::TemplateId,
        exercises: &[crate::ids::ExerciseId],
        completed: usize,
    ) {
        let log_id = WorkoutLogId::new();
        let log = WorkoutLogActiveModel {
            id: Set(log_id),
            trainee_id: Set(trainee_id),
            assignment_id: Set(None),
            template_id: Set(template_id),
            duration_minutes: Set(30),
            notes: Set(None),
            completed_at: Set(chrono::Utc::now().to_rfc3339()),
        };
        WorkoutLog::insert(log).exec(db).await.unwrap();

        for (i, exercise_id) in exercises.iter().enumerate() {
            let entry = WorkoutLogEntryActiveModel {
                id: Set(LogEntryId::new()),
                log_id: Set(log_id),
                exercise_id: Set(*exercise_id),
                completed: Set(i < completed),
                sets_performed: Set(None),
                reps_performed: Set(None),
                weight: Set(None),
            };
            WorkoutLogEntry::insert(entry).exec(db).await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_completion_rate_without_logs_is_zero() {
        let service = setup_test_service().await;
        let admin = test_utils::seed_user(&service.db, Role::Admin, None).await;
        let template = test_utils::seed_template(&service.db, admin.id).await;

        let rate = service.template_completion_rate(template.id).await.unwrap();
        assert_eq!(rate, 0);
    }

    #[tokio::test]
    async fn test_completion_rate_half_completed() {
        let service = setup_test_service().await;
        let admin = test_utils::seed_user(&service.db, Role::Admin, None).await;
        let trainee = test_utils::seed_user(&service.db, Role::Trainee, None).await;
        let template = test_utils::seed_template(&service.db, admin.id).await;

        // Four prescribed exercises
        let mut exercise_ids = Vec::new();
        for position in 0..4 {
            let exercise = test_utils::seed_exercise(&service.db, admin.id).await;
            exercise_ids.push(exercise.id);
            let prescription = TemplateExerciseActiveModel {
                id: Set(crate::ids::PrescriptionId::new()),
                template_id: Set(template.id),
                exercise_id: Set(exercise.id),
                position: Set(position),
                sets: Set(3),
                reps: Set("10".to_string()),
                rest_seconds: Set(60),
                notes: Set(None),
            };
            TemplateExercise::insert(prescription)
                .exec(&service.db)
                .await
                .unwrap();
        }

        // One log completing 2 of 4
        insert_log_with_completion(&service.db, trainee.id, template.id, &exercise_ids, 2).await;

        let rate = service.template_completion_rate(template.id).await.unwrap();
        assert_eq!(rate, 50);
    }

    #[tokio::test]
    async fn test_recent_activity_merges_sorts_and_truncates() {
        let service = setup_test_service().await;
        let admin = test_utils::seed_user(&service.db, Role::Admin, None).await;
        let superuser = test_utils::seed_user(&service.db, Role::SuperAdmin, None).await;
        let trainee = test_utils::seed_user(&service.db, Role::Trainee, Some(admin.id)).await;
        let template = test_utils::seed_template(&service.db, admin.id).await;
        let class = test_utils::seed_class(&service.db, admin.id, 10).await;

        insert_assignment(
            &service.db,
            trainee.id,
            template.id,
            admin.id,
            "2026-04-14T09:00:00+00:00".to_string(),
        )
        .await;
        insert_enrollment(
            &service.db,
            class.id,
            trainee.id,
            "2026-04-15T09:00:00+00:00".to_string(),
        )
        .await;

        let feed = service
            .recent_activity(&caller_for(&superuser), None)
            .await
            .unwrap();

        assert_eq!(feed.len(), 2);
        assert_eq!(feed[0].kind, ActivityKind::ClassEnrolled);
        assert_eq!(feed[1].kind, ActivityKind::WorkoutAssigned);

        let capped = service
            .recent_activity(&caller_for(&superuser), Some(1))
            .await
            .unwrap();
        assert_eq!(capped.len(), 1);
        assert_eq!(capped[0].kind, ActivityKind::ClassEnrolled);
    }

    #[tokio::test]
    async fn test_recent_activity_scoped_for_admin() {
        let service = setup_test_service().await;
        let admin_a = test_utils::seed_user(&service.db, Role::Admin, None).await;
        let admin_b = test_utils::seed_user(&service.db, Role::Admin, None).await;
        let trainee = test_utils::seed_user(&service.db, Role::Trainee, Some(admin_a.id)).await;
        let template = test_utils::seed_template(&service.db, admin_a.id).await;
        let class_a = test_utils::seed_class(&service.db, admin_a.id, 10).await;

        insert_assignment(
            &service.db,
            trainee.id,
            template.id,
            admin_a.id,
            chrono::Utc::now().to_rfc3339(),
        )
        .await;
        insert_enrollment(
            &service.db,
            class_a.id,
            trainee.id,
            chrono::Utc::now().to_rfc3339(),
        )
        .await;

        let own = service
            .recent_activity(&caller_for(&admin_a), None)
            .await
            .unwrap();
        assert_eq!(own.len(), 2);

        let foreign = service
            .recent_activity(&caller_for(&admin_b), None)
            .await
            .unwrap();
        assert!(foreign.is_empty());
    }

    #[tokio::test]
    async fn test_dashboard_counts_for_admin_slice() {
        let service = setup_test_service().await;
        let admin_a = test_utils::seed_user(&service.db, Role::Admin, None).await;
        let admin_b = test_utils::seed_user(&service.db, Role::Admin, None).await;
        let t1 = test_utils::seed_user(&service.db, Role::Trainee, Some(admin_a.id)).await;
        let t2 = test_utils::seed_user(&service.db, Role::Trainee, Some(admin_b.id)).await;
        let class_a = test_utils::seed_class(&service.db, admin_a.id, 10).await;
        let class_b = test_utils::seed_class(&service.db, admin_b.id, 10).await;

        insert_enrollment(
            &service.db,
            class_a.id,
            t1.id,
            chrono::Utc::now().to_rfc3339(),
        )
        .await;
        insert_enrollment(
            &service.db,
            class_b.id,
            t2.id,
            chrono::Utc::now().to_rfc3339(),
        )
        .await;

        let stats = service
            .dashboard_stats(&caller_for(&admin_a))
            .await
            .unwrap();

        assert_eq!(stats.trainees, 1);
        assert_eq!(stats.active_classes, 1);
        assert_eq!(stats.active_enrollments, 1);
        assert_eq!(stats.new_enrollments_recent, 1);
        // No attendance yet: rate degrades to 0, not an error
        assert_eq!(stats.attendance_rate, 0);

        let super_view = test_utils::seed_user(&service.db, Role::SuperAdmin, None).await;
        let all = service
            .dashboard_stats(&caller_for(&super_view))
            .await
            .unwrap();
        assert_eq!(all.trainees, 2);
        assert_eq!(all.active_enrollments, 2);
    }
}
