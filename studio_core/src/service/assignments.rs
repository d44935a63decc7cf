use chrono::NaiveDate;
use log::info;
use sea_orm::DatabaseConnection;
use thiserror::Error;

use crate::{
    auth::{authorize_scope, Caller},
    entity::prelude::*,
    ids::{AssignmentId, TemplateId, UserId},
};

#[derive(Debug, Error)]
pub enum AssignmentsServiceError {
    #[error("fatal database error")]
    DbError(#[from] DbErr),

    #[error("workout template not found")]
    TemplateNotFound,

    #[error("trainee not found")]
    TraineeNotFound,

    #[error("assignment not found")]
    AssignmentNotFound,

    #[error("trainee already has an active assignment for this template")]
    AlreadyAssigned,

    #[error("unauthorized")]
    Unauthorized,

    #[error("invalid {0}")]
    Invalid(&'static str),
}

#[derive(Clone)]
pub struct AssignmentsService {
    db: DatabaseConnection,
}

impl AssignmentsService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Assign a template to a trainee. A plain admin may only assign to
    /// trainees assigned to them; the check runs here regardless of what
    /// the caller already queried.
    pub async fn assign_workout(
        &self,
        caller: &Caller,
        trainee_id: UserId,
        template_id: TemplateId,
        weekdays: Vec<u8>,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
        notes: Option<String>,
    ) -> Result<WorkoutAssignmentModel, AssignmentsServiceError> {
        if !caller.is_admin_level() {
            return Err(AssignmentsServiceError::Unauthorized);
        }
        if weekdays.iter().any(|d| *d > 6) {
            return Err(AssignmentsServiceError::Invalid("weekdays"));
        }
        if let Some(end) = end_date {
            if end < start_date {
                return Err(AssignmentsServiceError::Invalid("end date"));
            }
        }

        let template_exists = WorkoutTemplate::find_by_id(template_id)
            .one(&self.db)
            .await?
            .is_some();
        if !template_exists {
            return Err(AssignmentsServiceError::TemplateNotFound);
        }

        let trainee = User::find_by_id(trainee_id)
            .one(&self.db)
            .await?
            .filter(|u| u.role == Role::Trainee)
            .ok_or(AssignmentsServiceError::TraineeNotFound)?;

        // Ownership boundary: the trainee's assigned admin, not the
        // trainee's own id
        if !caller.is_super() && trainee.assigned_admin_id != Some(caller.id) {
            return Err(AssignmentsServiceError::Unauthorized);
        }

        let duplicate = WorkoutAssignment::find()
            .filter(WorkoutAssignmentColumn::TraineeId.eq(trainee_id))
            .filter(WorkoutAssignmentColumn::TemplateId.eq(template_id))
            .filter(WorkoutAssignmentColumn::Status.eq(AssignmentStatus::Active))
            .one(&self.db)
            .await?
            .is_some();
        if duplicate {
            return Err(AssignmentsServiceError::AlreadyAssigned);
        }

        let weekdays_json = serde_json::to_string(&weekdays)
            .map_err(|_| AssignmentsServiceError::Invalid("weekdays"))?;

        let now = chrono::Utc::now().to_rfc3339();
        let assignment = WorkoutAssignmentActiveModel {
            id: Set(AssignmentId::new()),
            trainee_id: Set(trainee_id),
            template_id: Set(template_id),
            assigned_by: Set(caller.id),
            status: Set(AssignmentStatus::Active),
            weekdays: Set(weekdays_json),
            start_date: Set(start_date),
            end_date: Set(end_date),
            notes: Set(notes),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        };

        let created = WorkoutAssignment::insert(assignment)
            .exec_with_returning(&self.db)
            .await?;

        Ok(created)
    }

    /// Transition an assignment's status. Only the assigner (or a super
    /// admin) may do this.
    pub async fn set_status(
        &self,
        caller: &Caller,
        assignment_id: AssignmentId,
        status: AssignmentStatus,
    ) -> Result<WorkoutAssignmentModel, AssignmentsServiceError> {
        let assignment = WorkoutAssignment::find_by_id(assignment_id)
            .one(&self.db)
            .await?
            .ok_or(AssignmentsServiceError::AssignmentNotFound)?;

        if !authorize_scope(caller, assignment.assigned_by) {
            return Err(AssignmentsServiceError::Unauthorized);
        }

        let mut active: WorkoutAssignmentActiveModel = assignment.into();
        active.status = Set(status);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let updated = active.update(&self.db).await?;
        Ok(updated)
    }

    pub async fn get_assignment(
        &self,
        assignment_id: AssignmentId,
    ) -> Result<Option<WorkoutAssignmentModel>, AssignmentsServiceError> {
        let assignment = WorkoutAssignment::find_by_id(assignment_id)
            .one(&self.db)
            .await?;
        Ok(assignment)
    }

    /// Assignments for a trainee, newest first. Trainees see their own;
    /// an admin sees trainees assigned to them; anyone else quietly gets
    /// an empty list.
    pub async fn list_for_trainee(
        &self,
        caller: &Caller,
        trainee_id: UserId,
    ) -> Result<Vec<WorkoutAssignmentModel>, AssignmentsServiceError> {
        if !self.may_view_trainee(caller, trainee_id).await? {
            return Ok(Vec::new());
        }

        let assignments = WorkoutAssignment::find()
            .filter(WorkoutAssignmentColumn::TraineeId.eq(trainee_id))
            .order_by_desc(WorkoutAssignmentColumn::CreatedAt) // Newest first
            .all(&self.db)
            .await?;

        Ok(assignments)
    }

    /// Assignments created by an admin, newest first. Out-of-scope
    /// callers get an empty list.
    pub async fn list_by_assigner(
        &self,
        caller: &Caller,
        admin_id: UserId,
    ) -> Result<Vec<WorkoutAssignmentModel>, AssignmentsServiceError> {
        if !authorize_scope(caller, admin_id) {
            return Ok(Vec::new());
        }

        let assignments = WorkoutAssignment::find()
            .filter(WorkoutAssignmentColumn::AssignedBy.eq(admin_id))
            .order_by_desc(WorkoutAssignmentColumn::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(assignments)
    }

    /// Maintenance sweep: delete assignments whose template, trainee or
    /// assigner no longer resolves. Idempotent; returns the number of
    /// rows removed.
    pub async fn remove_orphaned(&self, caller: &Caller) -> Result<u64, AssignmentsServiceError> {
        if !caller.is_super() {
            return Err(AssignmentsServiceError::Unauthorized);
        }

        let assignments = WorkoutAssignment::find().all(&self.db).await?;

        let mut removed = 0u64;
        for assignment in assignments {
            let template_ok = WorkoutTemplate::find_by_id(assignment.template_id)
                .one(&self.db)
                .await?
                .is_some();
            let trainee_ok = User::find_by_id(assignment.trainee_id)
                .one(&self.db)
                .await?
                .is_some();
            let assigner_ok = User::find_by_id(assignment.assigned_by)
                .one(&self.db)
                .await?
                .is_some();

            if !(template_ok && trainee_ok && assigner_ok) {
                WorkoutAssignment::delete_by_id(assignment.id)
                    .exec(&self.db)
                    .await?;
                removed += 1;
            }
        }

        info!("orphaned assignment sweep removed {} rows", removed);
        Ok(removed)
    }

    async fn may_view_trainee(
        &self,
        caller: &Caller,
        trainee_id: UserId,
    ) -> Result<bool, AssignmentsServiceError> {
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
