use chrono::NaiveDate;
use sea_orm::{DatabaseConnection, TransactionTrait};
use thiserror::Error;

use crate::{
    auth::{authorize_scope, Caller},
    entity::prelude::*,
    ids::{AttendanceId, ClassId, UserId},
};

#[derive(Debug, Error)]
pub enum AttendanceServiceError {
    #[error("fatal database error")]
    DbError(#[from] DbErr),

    #[error("class not found")]
    ClassNotFound,

    #[error("no active enrollment for this class")]
    NotEnrolled,

    #[error("unauthorized")]
    Unauthorized,
}

/// round(present / total * 100); 0 when there is nothing to count.
pub fn attendance_rate(present: u64, total: u64) -> u32 {
    if total == 0 {
        return 0;
    }
    ((present as f64 / total as f64) * 100.0).round() as u32
}

#[derive(Clone)]
pub struct AttendanceService {
    db: DatabaseConnection,
}

impl AttendanceService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Mark attendance for one trainee, class and day. Upserts by the
    /// (trainee, class, schedule_date) natural key: marking the same day
    /// twice patches the row instead of duplicating it.
    ///
    /// The enrollment check runs at call time: a trainee who has dropped
    /// cannot have attendance marked even for a date when they were
    /// enrolled.
    pub async fn mark_attendance(
        &self,
        caller: &Caller,
        trainee_id: UserId,
        class_id: ClassId,
        schedule_date: NaiveDate,
        status: AttendanceStatus,
        notes: Option<String>,
    ) -> Result<AttendanceModel, AttendanceServiceError> {
        if !caller.is_admin_level() {
            return Err(AttendanceServiceError::Unauthorized);
        }

        let class = Class::find_by_id(class_id)
            .one(&self.db)
            .await?
            .ok_or(AttendanceServiceError::ClassNotFound)?;

        // A plain admin may only mark attendance for classes they
        // instruct, whatever the caller already queried
        if !authorize_scope(caller, class.instructor_id) {
            return Err(AttendanceServiceError::Unauthorized);
        }

        let enrolled = ClassEnrollment::find()
            .filter(ClassEnrollmentColumn::ClassId.eq(class_id))
            .filter(ClassEnrollmentColumn::TraineeId.eq(trainee_id))
            .filter(ClassEnrollmentColumn::Status.eq(EnrollmentStatus::Active))
            .one(&self.db)
            .await?
            .is_some();
        if !enrolled {
            return Err(AttendanceServiceError::NotEnrolled);
        }

        let txn = self.db.begin().await?;

        let existing = Attendance::find()
            .filter(AttendanceColumn::TraineeId.eq(trainee_id))
            .filter(AttendanceColumn::ClassId.eq(class_id))
            .filter(AttendanceColumn::ScheduleDate.eq(schedule_date))
            .one(&txn)
            .await?;

        let now = chrono::Utc::now().to_rfc3339();
        let record = match existing {
            Some(record) => {
                let mut active: AttendanceActiveModel = record.into();
                active.status = Set(status);
                active.notes = Set(notes);
                active.marked_by = Set(caller.id);
                active.marked_at = Set(now);
                active.update(&txn).await?
            }
            None => {
                let row = AttendanceActiveModel {
                    id: Set(AttendanceId::new()),
                    class_id: Set(class_id),
                    trainee_id: Set(trainee_id),
                    schedule_date: Set(schedule_date),
                    status: Set(status),
                    marked_by: Set(caller.id),
                    marked_at: Set(now),
                    notes: Set(notes),
                };
                Attendance::insert(row).exec_with_returning(&txn).await?
            }
        };

        txn.commit().await?;
        Ok(record)
    }

    /// Attendance for a class on one day. Admins who do not instruct the
    /// class get an empty list.
    pub async fn list_for_class_on(
        &self,
        caller: &Caller,
        class_id: ClassId,
        schedule_date: NaiveDate,
    ) -> Result<Vec<AttendanceModel>, AttendanceServiceError> {
        if caller.role == Role::Admin {
            let class = Class::find_by_id(class_id).one(&self.db).await?;
            let instructs = class.map(|c| c.instructor_id == caller.id).unwrap_or(false);
            if !instructs {
                return Ok(Vec::new());
            }
        }

        let mut query = Attendance::find()
            .filter(AttendanceColumn::ClassId.eq(class_id))
            .filter(AttendanceColumn::ScheduleDate.eq(schedule_date));

        if caller.role == Role::Trainee {
            query = query.filter(AttendanceColumn::TraineeId.eq(caller.id));
        }

        let records = query.all(&self.db).await?;
        Ok(records)
    }

    /// Attendance history for a trainee, newest first. Out-of-scope
    /// callers get an empty list.
    pub async fn history_for_trainee(
        &self,
        caller: &Caller,
        trainee_id: UserId,
        limit: Option<u64>,
    ) -> Result<Vec<AttendanceModel>, AttendanceServiceError> {
        if !self.may_view_trainee(caller, trainee_id).await? {
            return Ok(Vec::new());
        }

        let records = Attendance::find()
            .filter(AttendanceColumn::TraineeId.eq(trainee_id))
            .order_by_desc(AttendanceColumn::ScheduleDate)
            .limit(limit)
            .all(&self.db)
            .await?;

        Ok(records)
    }

    /// Attendance rate for a trainee over records on or after `since`
    /// (all records when `None`). Out-of-scope callers get 0.
    pub async fn rate_for_trainee(
        &self,
        caller: &Caller,
        trainee_id: UserId,
        since: Option<NaiveDate>,
    ) -> Result<u32, AttendanceServiceError> {
        if !self.may_view_trainee(caller, trainee_id).await? {
            return Ok(0);
        }

        let mut query = Attendance::find().filter(AttendanceColumn::TraineeId.eq(trainee_id));
        if let Some(since) = since {
            query = query.filter(AttendanceColumn::ScheduleDate.gte(since));
        }

        let records = query.all(&self.db).await?;
        let total = records.len() as u64;
        let present = records
            .iter()
            .filter(|r| r.status == AttendanceStatus::Present)
            .count() as u64;

        Ok(attendance_rate(present, total))
    }

    async fn may_view_trainee(
        &self,
        caller: &Caller,
        trainee_id: UserId,
    ) -> Result<bool, AttendanceServiceError> {
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
