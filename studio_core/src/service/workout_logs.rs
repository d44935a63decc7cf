use sea_orm::{DatabaseConnection, TransactionTrait};
use thiserror::Error;

use crate::{
    auth::Caller,
    entity::prelude::*,
    ids::{AssignmentId, LogEntryId, TemplateId, UserId, WorkoutLogId},
};

#[derive(Debug, Error)]
pub enum WorkoutLogsServiceError {
    #[error("fatal database error")]
    DbError(#[from] DbErr),

    #[error("workout template not found")]
    TemplateNotFound,

    #[error("assignment not found")]
    AssignmentNotFound,

    #[error("unauthorized")]
    Unauthorized,

    #[error("invalid {0}")]
    Invalid(&'static str),
}

/// What the trainee actually did for one exercise.
#[derive(Debug, Clone)]
pub struct LogEntryInput {
    pub exercise_id: crate::ids::ExerciseId,
    pub completed: bool,
    pub sets_performed: Option<i32>,
    pub reps_performed: Option<String>,
    pub weight: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct WorkoutLogDetail {
    pub log: WorkoutLogModel,
    pub entries: Vec<WorkoutLogEntryModel>,
}

#[derive(Clone)]
pub struct WorkoutLogsService {
    db: DatabaseConnection,
}

impl WorkoutLogsService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Record a completed workout. Only the trainee themselves creates
    /// logs, and a log is immutable once written.
    pub async fn log_workout(
        &self,
        caller: &Caller,
        template_id: TemplateId,
        assignment_id: Option<AssignmentId>,
        duration_minutes: i32,
        notes: Option<String>,
        entries: Vec<LogEntryInput>,
    ) -> Result<WorkoutLogModel, WorkoutLogsServiceError> {
        if caller.role != Role::Trainee {
            return Err(WorkoutLogsServiceError::Unauthorized);
        }
        if duration_minutes <= 0 {
            return Err(WorkoutLogsServiceError::Invalid("duration"));
        }

        let template_exists = WorkoutTemplate::find_by_id(template_id)
            .one(&self.db)
            .await?
            .is_some();
        if !template_exists {
            return Err(WorkoutLogsServiceError::TemplateNotFound);
        }

        if let Some(assignment_id) = assignment_id {
            let assignment = WorkoutAssignment::find_by_id(assignment_id)
                .one(&self.db)
                .await?
                .ok_or(WorkoutLogsServiceError::AssignmentNotFound)?;
            if assignment.trainee_id != caller.id {
                return Err(WorkoutLogsServiceError::Unauthorized);
            }
        }

        let txn = self.db.begin().await?;

        let log_id = WorkoutLogId::new();
        let log = WorkoutLogActiveModel {
            id: Set(log_id),
            trainee_id: Set(caller.id),
            assignment_id: Set(assignment_id),
            template_id: Set(template_id),
            duration_minutes: Set(duration_minutes),
            notes: Set(notes),
            completed_at: Set(chrono::Utc::now().to_rfc3339()),
        };

        let created = WorkoutLog::insert(log).exec_with_returning(&txn).await?;

        for input in entries {
            let entry = WorkoutLogEntryActiveModel {
                id: Set(LogEntryId::new()),
                log_id: Set(log_id),
                exercise_id: Set(input.exercise_id),
                completed: Set(input.completed),
                sets_performed: Set(input.sets_performed),
                reps_performed: Set(input.reps_performed),
                weight: Set(input.weight),
            };
            WorkoutLogEntry::insert(entry).exec(&txn).await?;
        }

        txn.commit().await?;
        Ok(created)
    }

    /// Logs for a trainee, newest first. Out-of-scope callers get an
    /// empty list.
    pub async fn list_for_trainee(
        &self,
        caller: &Caller,
        trainee_id: UserId,
    ) -> Result<Vec<WorkoutLogModel>, WorkoutLogsServiceError> {
        if !self.may_view_trainee(caller, trainee_id).await? {
            return Ok(Vec::new());
        }

        let logs = WorkoutLog::find()
            .filter(WorkoutLogColumn::TraineeId.eq(trainee_id))
            .order_by_desc(WorkoutLogColumn::CompletedAt) // Newest first
            .all(&self.db)
            .await?;

        Ok(logs)
    }

    /// A log with its entries. Out-of-scope callers get `None`, same as
    /// absence.
    pub async fn get_log_detail(
        &self,
        caller: &Caller,
        log_id: WorkoutLogId,
    ) -> Result<Option<WorkoutLogDetail>, WorkoutLogsServiceError> {
        let Some(log) = WorkoutLog::find_by_id(log_id).one(&self.db).await? else {
            return Ok(None);
        };

        if !self.may_view_trainee(caller, log.trainee_id).await? {
            return Ok(None);
        }

        let entries = WorkoutLogEntry::find()
            .filter(WorkoutLogEntryColumn::LogId.eq(log_id))
            .all(&self.db)
            .await?;

        Ok(Some(WorkoutLogDetail { log, entries }))
    }

    async fn may_view_trainee(
        &self,
        caller: &Caller,
        trainee_id: UserId,
    ) -> Result<bool, WorkoutLogsServiceError> {
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
