use sea_orm::{DatabaseConnection, TransactionTrait};
use thiserror::Error;

use crate::{
    auth::Caller,
    entity::prelude::*,
    ids::{ClassId, EnrollmentId, UserId},
};

#[derive(Debug, Error)]
pub enum EnrollmentsServiceError {
    #[error("fatal database error")]
    DbError(#[from] DbErr),

    #[error("class not found")]
    ClassNotFound,

    #[error("already enrolled in this class")]
    AlreadyEnrolled,

    #[error("class is full")]
    CapacityExceeded,

    #[error("no active enrollment for this class")]
    NotEnrolled,

    #[error("unauthorized")]
    Unauthorized,
}

#[derive(Clone)]
pub struct EnrollmentsService {
    db: DatabaseConnection,
}

impl EnrollmentsService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Enroll a trainee in a class. Trainees enroll themselves; an admin
    /// may enroll anyone into a class they instruct. Checks run in a
    /// fixed order: duplicate active enrollment, class existence, then
    /// capacity. The count and insert share one transaction.
    pub async fn enroll(
        &self,
        caller: &Caller,
        trainee_id: UserId,
        class_id: ClassId,
    ) -> Result<ClassEnrollmentModel, EnrollmentsServiceError> {
        if caller.role == Role::Trainee && caller.id != trainee_id {
            return Err(EnrollmentsServiceError::Unauthorized);
        }

        let txn = self.db.begin().await?;

        let already = ClassEnrollment::find()
            .filter(ClassEnrollmentColumn::ClassId.eq(class_id))
            .filter(ClassEnrollmentColumn::TraineeId.eq(trainee_id))
            .filter(ClassEnrollmentColumn::Status.eq(EnrollmentStatus::Active))
            .one(&txn)
            .await?
            .is_some();
        if already {
            return Err(EnrollmentsServiceError::AlreadyEnrolled);
        }

        let Some(class) = find_class(class_id, &txn).await? else {
            return Err(EnrollmentsServiceError::ClassNotFound);
        };

        // Mutation-time ownership re-check for admins enrolling on a
        // trainee's behalf
        if caller.role == Role::Admin && class.instructor_id != caller.id {
            return Err(EnrollmentsServiceError::Unauthorized);
        }

        let active_count = ClassEnrollment::find()
            .filter(ClassEnrollmentColumn::ClassId.eq(class_id))
            .filter(ClassEnrollmentColumn::Status.eq(EnrollmentStatus::Active))
            .count(&txn)
            .await?;
        if active_count >= class.capacity as u64 {
            return Err(EnrollmentsServiceError::CapacityExceeded);
        }

        let enrollment = ClassEnrollmentActiveModel {
            id: Set(EnrollmentId::new()),
            class_id: Set(class_id),
            trainee_id: Set(trainee_id),
            status: Set(EnrollmentStatus::Active),
            enrolled_at: Set(chrono::Utc::now().to_rfc3339()),
            dropped_at: Set(None),
        };

        let created = ClassEnrollment::insert(enrollment)
            .exec_with_returning(&txn)
            .await?;

        txn.commit().await?;
        Ok(created)
    }

    /// Drop a trainee from a class. The row transitions to `Dropped` and
    /// is kept; re-enrollment later inserts a fresh row.
    pub async fn drop(
        &self,
        caller: &Caller,
        trainee_id: UserId,
        class_id: ClassId,
    ) -> Result<ClassEnrollmentModel, EnrollmentsServiceError> {
        if caller.role == Role::Trainee && caller.id != trainee_id {
            return Err(EnrollmentsServiceError::Unauthorized);
        }

        let enrollment = ClassEnrollment::find()
            .filter(ClassEnrollmentColumn::ClassId.eq(class_id))
            .filter(ClassEnrollmentColumn::TraineeId.eq(trainee_id))
            .filter(ClassEnrollmentColumn::Status.eq(EnrollmentStatus::Active))
            .one(&self.db)
            .await?
            .ok_or(EnrollmentsServiceError::NotEnrolled)?;

        if caller.role == Role::Admin {
            let class = find_class(class_id, &self.db).await?;
            let instructs = class.map(|c| c.instructor_id == caller.id).unwrap_or(false);
            if !instructs {
                return Err(EnrollmentsServiceError::Unauthorized);
            }
        }

        let mut active: ClassEnrollmentActiveModel = enrollment.into();
        active.status = Set(EnrollmentStatus::Dropped);
        active.dropped_at = Set(Some(chrono::Utc::now().to_rfc3339()));

        let updated = active.update(&self.db).await?;
        Ok(updated)
    }

    /// Enrollments for a class. Admins who do not instruct the class get
    /// an empty list; trainees only see their own rows.
    pub async fn list_for_class(
        &self,
        caller: &Caller,
        class_id: ClassId,
    ) -> Result<Vec<ClassEnrollmentModel>, EnrollmentsServiceError> {
        if caller.role == Role::Admin {
            let class = find_class(class_id, &self.db).await?;
            let instructs = class.map(|c| c.instructor_id == caller.id).unwrap_or(false);
            if !instructs {
                return Ok(Vec::new());
            }
        }

        let mut query = ClassEnrollment::find().filter(ClassEnrollmentColumn::ClassId.eq(class_id));

        if caller.role == Role::Trainee {
            query = query.filter(ClassEnrollmentColumn::TraineeId.eq(caller.id));
        }

        let enrollments = query.all(&self.db).await?;
        Ok(enrollments)
    }

    /// Enrollment history for a trainee, newest first. Admins only see
    /// trainees assigned to them; out-of-scope callers get an empty
    /// list.
    pub async fn list_for_trainee(
        &self,
        caller: &Caller,
        trainee_id: UserId,
    ) -> Result<Vec<ClassEnrollmentModel>, EnrollmentsServiceError> {
        if !self.may_view_trainee(caller, trainee_id).await? {
            return Ok(Vec::new());
        }

        let enrollments = ClassEnrollment::find()
            .filter(ClassEnrollmentColumn::TraineeId.eq(trainee_id))
            .order_by_desc(ClassEnrollmentColumn::EnrolledAt)
            .all(&self.db)
            .await?;

        Ok(enrollments)
    }

    /// Number of active enrollments in a class.
    pub async fn count_active(&self, class_id: ClassId) -> Result<u64, EnrollmentsServiceError> {
        let count = ClassEnrollment::find()
            .filter(ClassEnrollmentColumn::ClassId.eq(class_id))
            .filter(ClassEnrollmentColumn::Status.eq(EnrollmentStatus::Active))
            .count(&self.db)
            .await?;

        Ok(count)
    }

    async fn may_view_trainee(
        &self,
        caller: &Caller,
        trainee_id: UserId,
    ) -> Result<bool, EnrollmentsServiceError> {
        if caller.is_super() || caller.id == trainee_id {
            return Ok(true);
        }
        if caller.role != Role::Admin {
            return Ok(false);
        }

        let trainee = User::find_by_id(trainee_id).one(&self.db).await?;
        Ok(trainee
            .map(|t| t.assigned_admin_id == Some(caller.id))
            .unwrap_or(false))
    }
}

/// Parent-class lookup shared by the guard paths.
async fn find_class<C: ConnectionTrait>(
    class_id: ClassId,
    conn: &C,
) -> Result<Option<ClassModel>, DbErr> {
    Class::find_by_id(class_id).one(conn).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils;

    async fn setup_test_service() -> EnrollmentsService {
        let db = test_utils::setup_test_db().await;
        EnrollmentsService::new(db)
    }

    fn caller_for(user: &UserModel) -> Caller {
        Caller::new(user.id, user.role)
    }

    #[tokio::test]
    async fn test_enroll_up_to_capacity_then_reject() {
        let service = setup_test_service().await;
        let admin = test_utils::seed_user(&service.db, Role::Admin, None).await;
        let class = test_utils::seed_class(&service.db, admin.id, 2).await;
        let t1 = test_utils::seed_user(&service.db, Role::Trainee, None).await;
        let t2 = test_utils::seed_user(&service.db, Role::Trainee, None).await;
        let t3 = test_utils::seed_user(&service.db, Role::Trainee, None).await;

        service
            .enroll(&caller_for(&t1), t1.id, class.id)
            .await
            .unwrap();
        assert_eq!(service.count_active(class.id).await.unwrap(), 1);

        service
            .enroll(&caller_for(&t2), t2.id, class.id)
            .await
            .unwrap();
        assert_eq!(service.count_active(class.id).await.unwrap(), 2);

        let full = service.enroll(&caller_for(&t3), t3.id, class.id).await;
        assert!(matches!(
            full,
            Err(EnrollmentsServiceError::CapacityExceeded)
        ));

        // Count unchanged by the rejected enrollment
        assert_eq!(service.count_active(class.id).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_drop_then_reenroll_creates_new_row() {
        let service = setup_test_service().await;
        let admin = test_utils::seed_user(&service.db, Role::Admin, None).await;
        let class = test_utils::seed_class(&service.db, admin.id, 2).await;
        let t1 = test_utils::seed_user(&service.db, Role::Trainee, None).await;
        let t2 = test_utils::seed_user(&service.db, Role::Trainee, None).await;

        let first = service
            .enroll(&caller_for(&t1), t1.id, class.id)
            .await
            .unwrap();
        service
            .enroll(&caller_for(&t2), t2.id, class.id)
            .await
            .unwrap();

        let dropped = service
            .drop(&caller_for(&t1), t1.id, class.id)
            .await
            .unwrap();
        assert_eq!(dropped.id, first.id);
        assert_eq!(dropped.status, EnrollmentStatus::Dropped);
        assert!(dropped.dropped_at.is_some());
        assert_eq!(service.count_active(class.id).await.unwrap(), 1);

        let second = service
            .enroll(&caller_for(&t1), t1.id, class.id)
            .await
            .unwrap();
        assert_ne!(second.id, first.id);
        assert_eq!(service.count_active(class.id).await.unwrap(), 2);

        // Both rows survive: one dropped, one active
        let history = ClassEnrollment::find()
            .filter(ClassEnrollmentColumn::TraineeId.eq(t1.id))
            .filter(ClassEnrollmentColumn::ClassId.eq(class.id))
            .all(&service.db)
            .await
            .unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(
            history
                .iter()
                .filter(|e| e.status == EnrollmentStatus::Active)
                .count(),
            1
        );
    }

    #[tokio::test]
    async fn test_duplicate_active_enrollment_rejected() {
        let service = setup_test_service().await;
        let admin = test_utils::seed_user(&service.db, Role::Admin, None).await;
        let class = test_utils::seed_class(&service.db, admin.id, 5).await;
        let trainee = test_utils::seed_user(&service.db, Role::Trainee, None).await;

        service
            .enroll(&caller_for(&trainee), trainee.id, class.id)
            .await
            .unwrap();

        let again = service
            .enroll(&caller_for(&trainee), trainee.id, class.id)
            .await;

        assert!(matches!(
            again,
            Err(EnrollmentsServiceError::AlreadyEnrolled)
        ));
    }

    #[tokio::test]
    async fn test_enroll_into_missing_class_fails() {
        let service = setup_test_service().await;
        let trainee = test_utils::seed_user(&service.db, Role::Trainee, None).await;

        let result = service
            .enroll(&caller_for(&trainee), trainee.id, ClassId::new())
            .await;

        assert!(matches!(
            result,
            Err(EnrollmentsServiceError::ClassNotFound)
        ));
    }

    #[tokio::test]
    async fn test_drop_without_enrollment_fails() {
        let service = setup_test_service().await;
        let admin = test_utils::seed_user(&service.db, Role::Admin, None).await;
        let class = test_utils::seed_class(&service.db, admin.id, 5).await;
        let trainee = test_utils::seed_user(&service.db, Role::Trainee, None).await;

        let result = service
            .drop(&caller_for(&trainee), trainee.id, class.id)
            .await;

        assert!(matches!(result, Err(EnrollmentsServiceError::NotEnrolled)));
    }

    #[tokio::test]
    async fn test_trainee_cannot_enroll_someone_else() {
        let service = setup_test_service().await;
        let admin = test_utils::seed_user(&service.db, Role::Admin, None).await;
        let class = test_utils::seed_class(&service.db, admin.id, 5).await;
        let t1 = test_utils::seed_user(&service.db, Role::Trainee, None).await;
        let t2 = test_utils::seed_user(&service.db, Role::Trainee, None).await;

        let result = service.enroll(&caller_for(&t1), t2.id, class.id).await;

        assert!(matches!(result, Err(EnrollmentsServiceError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_admin_enrolls_only_into_own_class() {
        let service = setup_test_service().await;
        let admin_a = test_utils::seed_user(&service.db, Role::Admin, None).await;
        let admin_b = test_utils::seed_user(&service.db, Role::Admin, None).await;
        let class = test_utils::seed_class(&service.db, admin_a.id, 5).await;
        let trainee = test_utils::seed_user(&service.db, Role::Trainee, Some(admin_b.id)).await;

        let denied = service
            .enroll(&caller_for(&admin_b), trainee.id, class.id)
            .await;
        assert!(matches!(denied, Err(EnrollmentsServiceError::Unauthorized)));

        let allowed = service
            .enroll(&caller_for(&admin_a), trainee.id, class.id)
            .await;
        assert!(allowed.is_ok());
    }

    #[tokio::test]
    async fn test_roster_quietly_empty_for_foreign_admin() {
        let service = setup_test_service().await;
        let admin_a = test_utils::seed_user(&service.db, Role::Admin, None).await;
        let admin_b = test_utils::seed_user(&service.db, Role::Admin, None).await;
        let class = test_utils::seed_class(&service.db, admin_a.id, 5).await;
        let trainee = test_utils::seed_user(&service.db, Role::Trainee, None).await;

        service
            .enroll(&caller_for(&trainee), trainee.id, class.id)
            .await
            .unwrap();

        let foreign = service
            .list_for_class(&caller_for(&admin_b), class.id)
            .await
            .unwrap();
        assert!(foreign.is_empty());

        let own = service
            .list_for_class(&caller_for(&admin_a), class.id)
            .await
            .unwrap();
        assert_eq!(own.len(), 1);
    }
}
