use sea_orm::{DatabaseConnection, TransactionTrait};
use thiserror::Error;

use crate::{
    auth::{authorize_scope, Caller},
    entity::prelude::*,
    ids::{PrescriptionId, TemplateId, UserId},
};

#[derive(Debug, Error)]
pub enum TemplatesServiceError {
    #[error("fatal database error")]
    DbError(#[from] DbErr),

    #[error("workout template not found")]
    TemplateNotFound,

    #[error("unauthorized")]
    Unauthorized,

    #[error("invalid {0}")]
    Invalid(&'static str),
}

/// One exercise prescription supplied when authoring a template.
#[derive(Debug, Clone)]
pub struct PrescriptionInput {
    pub exercise_id: crate::ids::ExerciseId,
    pub sets: i32,
    pub reps: String,
    pub rest_seconds: i32,
    pub notes: Option<String>,
}

#[derive(Debug, Default)]
pub struct TemplateUpdate {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub difficulty: Option<Difficulty>,
    pub duration_minutes: Option<i32>,
    /// Replaces the full prescription list when set.
    pub prescriptions: Option<Vec<PrescriptionInput>>,
}

/// A prescription joined with the exercise it references. Prescriptions
/// whose exercise no longer exists are skipped, not surfaced as errors.
#[derive(Debug, Clone)]
pub struct PrescribedExercise {
    pub prescription: TemplateExerciseModel,
    pub exercise: ExerciseModel,
}

#[derive(Debug, Clone)]
pub struct TemplateDetail {
    pub template: WorkoutTemplateModel,
    pub exercises: Vec<PrescribedExercise>,
}

#[derive(Clone)]
pub struct TemplatesService {
    db: DatabaseConnection,
}

impl TemplatesService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a template and its ordered prescriptions in one
    /// transaction.
    pub async fn create_template(
        &self,
        caller: &Caller,
        name: String,
        description: Option<String>,
        difficulty: Difficulty,
        duration_minutes: i32,
        prescriptions: Vec<PrescriptionInput>,
    ) -> Result<WorkoutTemplateModel, TemplatesServiceError> {
        if !caller.is_admin_level() {
            return Err(TemplatesServiceError::Unauthorized);
        }
        if name.trim().is_empty() {
            return Err(TemplatesServiceError::Invalid("name"));
        }
        if duration_minutes <= 0 {
            return Err(TemplatesServiceError::Invalid("duration"));
        }
        validate_prescriptions(&prescriptions)?;

        let txn = self.db.begin().await?;

        let template_id = TemplateId::new();
        let now = chrono::Utc::now().to_rfc3339();
        let template = WorkoutTemplateActiveModel {
            id: Set(template_id),
            name: Set(name),
            description: Set(description),
            difficulty: Set(difficulty),
            duration_minutes: Set(duration_minutes),
            created_by: Set(caller.id),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        };

        let created = WorkoutTemplate::insert(template)
            .exec_with_returning(&txn)
            .await?;

        for (position, input) in prescriptions.into_iter().enumerate() {
            let row = TemplateExerciseActiveModel {
                id: Set(PrescriptionId::new()),
                template_id: Set(template_id),
                exercise_id: Set(input.exercise_id),
                position: Set(position as i32),
                sets: Set(input.sets),
                reps: Set(input.reps),
                rest_seconds: Set(input.rest_seconds),
                notes: Set(input.notes),
            };
            TemplateExercise::insert(row).exec(&txn).await?;
        }

        txn.commit().await?;
        Ok(created)
    }

    pub async fn get_template(
        &self,
        template_id: TemplateId,
    ) -> Result<Option<WorkoutTemplateModel>, TemplatesServiceError> {
        let template = WorkoutTemplate::find_by_id(template_id).one(&self.db).await?;
        Ok(template)
    }

    /// Template plus its prescriptions joined with their exercises, in
    /// prescription order. Dangling exercise references are skipped.
    pub async fn get_template_detail(
        &self,
        template_id: TemplateId,
    ) -> Result<Option<TemplateDetail>, TemplatesServiceError> {
        let Some(template) = WorkoutTemplate::find_by_id(template_id).one(&self.db).await? else {
            return Ok(None);
        };

        let prescriptions = TemplateExercise::find()
            .filter(TemplateExerciseColumn::TemplateId.eq(template_id))
            .order_by_asc(TemplateExerciseColumn::Position)
            .all(&self.db)
            .await?;

        let mut exercises = Vec::new();
        for prescription in prescriptions {
            let exercise = Exercise::find_by_id(prescription.exercise_id)
                .one(&self.db)
                .await?;
            // Exercise may have been deleted since authoring; skip
            if let Some(exercise) = exercise {
                exercises.push(PrescribedExercise {
                    prescription,
                    exercise,
                });
            }
        }

        Ok(Some(TemplateDetail {
            template,
            exercises,
        }))
    }

    pub async fn list_templates(&self) -> Result<Vec<WorkoutTemplateModel>, TemplatesServiceError> {
        let templates = WorkoutTemplate::find().all(&self.db).await?;
        Ok(templates)
    }

    /// Templates authored by a specific admin. Out-of-scope callers get
    /// an empty list.
    pub async fn list_templates_created_by(
        &self,
        caller: &Caller,
        creator_id: UserId,
    ) -> Result<Vec<WorkoutTemplateModel>, TemplatesServiceError> {
        if !authorize_scope(caller, creator_id) {
            return Ok(Vec::new());
        }

        let templates = WorkoutTemplate::find()
            .filter(WorkoutTemplateColumn::CreatedBy.eq(creator_id))
            .all(&self.db)
            .await?;

        Ok(templates)
    }

    /// Partial update; a supplied prescription list replaces the old one
    /// wholesale inside the same transaction.
    pub async fn update_template(
        &self,
        caller: &Caller,
        template_id: TemplateId,
        update: TemplateUpdate,
    ) -> Result<WorkoutTemplateModel, TemplatesServiceError> {
        let template = WorkoutTemplate::find_by_id(template_id)
            .one(&self.db)
            .await?
            .ok_or(TemplatesServiceError::TemplateNotFound)?;

        if !authorize_scope(caller, template.created_by) {
            return Err(TemplatesServiceError::Unauthorized);
        }

        if let Some(duration) = update.duration_minutes {
            if duration <= 0 {
                return Err(TemplatesServiceError::Invalid("duration"));
            }
        }
        if let Some(prescriptions) = &update.prescriptions {
            validate_prescriptions(prescriptions)?;
        }

        let txn = self.db.begin().await?;

        let mut active: WorkoutTemplateActiveModel = template.into();

        if let Some(name) = update.name {
            if name.trim().is_empty() {
                return Err(TemplatesServiceError::Invalid("name"));
            }
            active.name = Set(name);
        }
        if let Some(description) = update.description {
            active.description = Set(description);
        }
        if let Some(difficulty) = update.difficulty {
            active.difficulty = Set(difficulty);
        }
        if let Some(duration) = update.duration_minutes {
            active.duration_minutes = Set(duration);
        }
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let updated = active.update(&txn).await?;

        if let Some(prescriptions) = update.prescriptions {
            TemplateExercise::delete_many()
                .filter(TemplateExerciseColumn::TemplateId.eq(template_id))
                .exec(&txn)
                .await?;

            for (position, input) in prescriptions.into_iter().enumerate() {
                let row = TemplateExerciseActiveModel {
                    id: Set(PrescriptionId::new()),
                    template_id: Set(template_id),
                    exercise_id: Set(input.exercise_id),
                    position: Set(position as i32),
                    sets: Set(input.sets),
                    reps: Set(input.reps),
                    rest_seconds: Set(input.rest_seconds),
                    notes: Set(input.notes),
                };
                TemplateExercise::insert(row).exec(&txn).await?;
            }
        }

        txn.commit().await?;
        Ok(updated)
    }

    /// Delete a template; prescriptions cascade with it.
    pub async fn delete_template(
        &self,
        caller: &Caller,
        template_id: TemplateId,
    ) -> Result<(), TemplatesServiceError> {
        let template = WorkoutTemplate::find_by_id(template_id)
            .one(&self.db)
            .await?
            .ok_or(TemplatesServiceError::TemplateNotFound)?;

        if !authorize_scope(caller, template.created_by) {
            return Err(TemplatesServiceError::Unauthorized);
        }

        WorkoutTemplate::delete_by_id(template_id)
            .exec(&self.db)
            .await?;

        Ok(())
    }
}

fn validate_prescriptions(
    prescriptions: &[PrescriptionInput],
) -> Result<(), TemplatesServiceError> {
    for input in prescriptions {
        if input.sets <= 0 {
            return Err(TemplatesServiceError::Invalid("sets"));
        }
        if input.rest_seconds < 0 {
            return Err(TemplatesServiceError::Invalid("rest seconds"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils;

    async fn setup_test_service() -> TemplatesService {
        let db = test_utils::setup_test_db().await;
        TemplatesService::new(db)
    }

    fn caller_for(user: &UserModel) -> Caller {
        Caller::new(user.id, user.role)
    }

    fn prescription_for(exercise: &ExerciseModel) -> PrescriptionInput {
        PrescriptionInput {
            exercise_id: exercise.id,
            sets: 3,
            reps: "10-12".to_string(),
            rest_seconds: 60,
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_create_template_with_ordered_prescriptions() {
        let service = setup_test_service().await;
        let admin = test_utils::seed_user(&service.db, Role::Admin, None).await;
        let first = test_utils::seed_exercise(&service.db, admin.id).await;
        let second = test_utils::seed_exercise(&service.db, admin.id).await;

        let template = service
            .create_template(
                &caller_for(&admin),
                "Push Day".to_string(),
                None,
                Difficulty::Intermediate,
                45,
                vec![prescription_for(&first), prescription_for(&second)],
            )
            .await
            .unwrap();

        let detail = service
            .get_template_detail(template.id)
            .await
            .unwrap()
            .expect("template should exist");

        assert_eq!(detail.exercises.len(), 2);
        assert_eq!(detail.exercises[0].exercise.id, first.id);
        assert_eq!(detail.exercises[1].exercise.id, second.id);
        assert_eq!(detail.exercises[0].prescription.position, 0);
        assert_eq!(detail.exercises[1].prescription.position, 1);
    }

    #[tokio::test]
    async fn test_detail_skips_deleted_exercises() {
        let service = setup_test_service().await;
        let admin = test_utils::seed_user(&service.db, Role::Admin, None).await;
        let kept = test_utils::seed_exercise(&service.db, admin.id).await;
        let doomed = test_utils::seed_exercise(&service.db, admin.id).await;

        let template = service
            .create_template(
                &caller_for(&admin),
                "Leg Day".to_string(),
                None,
                Difficulty::Beginner,
                30,
                vec![prescription_for(&kept), prescription_for(&doomed)],
            )
            .await
            .unwrap();

        Exercise::delete_by_id(doomed.id)
            .exec(&service.db)
            .await
            .unwrap();

        let detail = service
            .get_template_detail(template.id)
            .await
            .unwrap()
            .unwrap();

        // Dangling prescription is skipped, not an error
        assert_eq!(detail.exercises.len(), 1);
        assert_eq!(detail.exercises[0].exercise.id, kept.id);
    }

    #[tokio::test]
    async fn test_invalid_duration_rejected() {
        let service = setup_test_service().await;
        let admin = test_utils::seed_user(&service.db, Role::Admin, None).await;

        let result = service
            .create_template(
                &caller_for(&admin),
                "Bad".to_string(),
                None,
                Difficulty::Beginner,
                0,
                vec![],
            )
            .await;

        assert!(matches!(result, Err(TemplatesServiceError::Invalid(_))));
    }

    #[tokio::test]
    async fn test_replacing_prescriptions_is_wholesale() {
        let service = setup_test_service().await;
        let admin = test_utils::seed_user(&service.db, Role::Admin, None).await;
        let first = test_utils::seed_exercise(&service.db, admin.id).await;
        let second = test_utils::seed_exercise(&service.db, admin.id).await;

        let template = service
            .create_template(
                &caller_for(&admin),
                "Pull Day".to_string(),
                None,
                Difficulty::Advanced,
                60,
                vec![prescription_for(&first)],
            )
            .await
            .unwrap();

        service
            .update_template(
                &caller_for(&admin),
                template.id,
                TemplateUpdate {
                    prescriptions: Some(vec![prescription_for(&second)]),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let detail = service
            .get_template_detail(template.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(detail.exercises.len(), 1);
        assert_eq!(detail.exercises[0].exercise.id, second.id);
    }

    #[tokio::test]
    async fn test_update_restricted_to_creator_or_super() {
        let service = setup_test_service().await;
        let admin_a = test_utils::seed_user(&service.db, Role::Admin, None).await;
        let admin_b = test_utils::seed_user(&service.db, Role::Admin, None).await;
        let template = test_utils::seed_template(&service.db, admin_a.id).await;

        let result = service
            .update_template(
                &caller_for(&admin_b),
                template.id,
                TemplateUpdate {
                    name: Some("Taken".to_string()),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(TemplatesServiceError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_delete_cascades_prescriptions() {
        let service = setup_test_service().await;
        let admin = test_utils::seed_user(&service.db, Role::Admin, None).await;
        let exercise = test_utils::seed_exercise(&service.db, admin.id).await;

        let template = service
            .create_template(
                &caller_for(&admin),
                "Doomed".to_string(),
                None,
                Difficulty::Beginner,
                30,
                vec![prescription_for(&exercise)],
            )
            .await
            .unwrap();

        service
            .delete_template(&caller_for(&admin), template.id)
            .await
            .unwrap();

        let orphans = TemplateExercise::find()
            .filter(TemplateExerciseColumn::TemplateId.eq(template.id))
            .all(&service.db)
            .await
            .unwrap();
        assert!(orphans.is_empty());
    }
}
