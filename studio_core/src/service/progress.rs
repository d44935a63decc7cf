use sea_orm::DatabaseConnection;
use thiserror::Error;

use crate::{
    auth::Caller,
    entity::prelude::*,
    ids::{MeasurementId, UserId},
};

#[derive(Debug, Error)]
pub enum ProgressServiceError {
    #[error("fatal database error")]
    DbError(#[from] DbErr),

    #[error("unauthorized")]
    Unauthorized,

    #[error("invalid {0}")]
    Invalid(&'static str),
}

/// Kind-specific payload for one measurement.
#[derive(Debug, Clone, Default)]
pub struct MeasurementInput {
    pub weight: Option<f64>,
    pub body_fat_pct: Option<f64>,
    pub measurement_name: Option<String>,
    pub measurement_value: Option<f64>,
    pub measurement_unit: Option<String>,
    pub pr_value: Option<f64>,
    pub exercise_id: Option<crate::ids::ExerciseId>,
    pub notes: Option<String>,
}

#[derive(Clone)]
pub struct ProgressService {
    db: DatabaseConnection,
}

impl ProgressService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Append a measurement to a trainee's progress log. Trainees record
    /// for themselves; admins for trainees assigned to them. There is no
    /// update or delete.
    pub async fn record_measurement(
        &self,
        caller: &Caller,
        trainee_id: UserId,
        kind: MeasurementKind,
        input: MeasurementInput,
    ) -> Result<ProgressMeasurementModel, ProgressServiceError> {
        if !self.may_record_for(caller, trainee_id).await? {
            return Err(ProgressServiceError::Unauthorized);
        }

        if let Some(weight) = input.weight {
            if weight <= 0.0 {
                return Err(ProgressServiceError::Invalid("weight"));
            }
        }
        if let Some(pct) = input.body_fat_pct {
            if !(0.0..=100.0).contains(&pct) {
                return Err(ProgressServiceError::Invalid("body fat percentage"));
            }
        }

        let measurement = ProgressMeasurementActiveModel {
            id: Set(MeasurementId::new()),
            trainee_id: Set(trainee_id),
            kind: Set(kind),
            weight: Set(input.weight),
            body_fat_pct: Set(input.body_fat_pct),
            measurement_name: Set(input.measurement_name),
            measurement_value: Set(input.measurement_value),
            measurement_unit: Set(input.measurement_unit),
            pr_value: Set(input.pr_value),
            exercise_id: Set(input.exercise_id),
            notes: Set(input.notes),
            recorded_at: Set(chrono::Utc::now().to_rfc3339()),
        };

        let created = ProgressMeasurement::insert(measurement)
            .exec_with_returning(&self.db)
            .await?;

        Ok(created)
    }

    /// Measurements for a trainee, newest first, optionally filtered by
    /// kind. Out-of-scope callers get an empty list.
    pub async fn list_for_trainee(
        &self,
        caller: &Caller,
        trainee_id: UserId,
        kind: Option<MeasurementKind>,
    ) -> Result<Vec<ProgressMeasurementModel>, ProgressServiceError> {
        if !self.may_record_for(caller, trainee_id).await? {
            return Ok(Vec::new());
        }

        let mut query =
            ProgressMeasurement::find().filter(ProgressMeasurementColumn::TraineeId.eq(trainee_id));
        if let Some(kind) = kind {
            query = query.filter(ProgressMeasurementColumn::Kind.eq(kind));
        }

        let measurements = query
            .order_by_desc(ProgressMeasurementColumn::RecordedAt)
            .all(&self.db)
            .await?;

        Ok(measurements)
    }

    async fn may_record_for(
        &self,
        caller: &Caller,
        trainee_id: UserId,
    ) -> Result<bool, ProgressServiceError> {
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
