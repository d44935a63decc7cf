use sea_orm::DatabaseConnection;
use thiserror::Error;

use crate::{
    auth::{authorize_scope, Caller},
    entity::prelude::*,
    ids::{ExerciseId, UserId},
};

#[derive(Debug, Error)]
pub enum ExercisesServiceError {
    #[error("fatal database error")]
    DbError(#[from] DbErr),

    #[error("exercise not found")]
    ExerciseNotFound,

    #[error("unauthorized")]
    Unauthorized,

    #[error("invalid {0}")]
    Invalid(&'static str),
}

#[derive(Debug, Default)]
pub struct ExerciseUpdate {
    pub name: Option<String>,
    pub category: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub primary_muscles: Option<Vec<String>>,
    pub equipment: Option<Option<String>>,
    pub description: Option<Option<String>>,
    pub image_url: Option<Option<String>>,
    pub video_url: Option<Option<String>>,
}

#[derive(Clone)]
pub struct ExercisesService {
    db: DatabaseConnection,
}

impl ExercisesService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create_exercise(
        &self,
        caller: &Caller,
        name: String,
        category: String,
        difficulty: Difficulty,
        primary_muscles: Vec<String>,
        equipment: Option<String>,
        description: Option<String>,
    ) -> Result<ExerciseModel, ExercisesServiceError> {
        if !caller.is_admin_level() {
            return Err(ExercisesServiceError::Unauthorized);
        }
        if name.trim().is_empty() {
            return Err(ExercisesServiceError::Invalid("name"));
        }

        let muscles_json = serde_json::to_string(&primary_muscles)
            .map_err(|_| ExercisesServiceError::Invalid("primary muscles"))?;

        let now = chrono::Utc::now().to_rfc3339();
        let exercise = ExerciseActiveModel {
            id: Set(ExerciseId::new()),
            name: Set(name),
            category: Set(category),
            difficulty: Set(difficulty),
            primary_muscles: Set(muscles_json),
            equipment: Set(equipment),
            description: Set(description),
            image_url: Set(None),
            video_url: Set(None),
            created_by: Set(caller.id),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        };

        let created = Exercise::insert(exercise)
            .exec_with_returning(&self.db)
            .await?;

        Ok(created)
    }

    pub async fn get_exercise(
        &self,
        exercise_id: ExerciseId,
    ) -> Result<Option<ExerciseModel>, ExercisesServiceError> {
        let exercise = Exercise::find_by_id(exercise_id).one(&self.db).await?;
        Ok(exercise)
    }

    /// The exercise library is visible to everyone.
    pub async fn list_exercises(&self) -> Result<Vec<ExerciseModel>, ExercisesServiceError> {
        let exercises = Exercise::find().all(&self.db).await?;
        Ok(exercises)
    }

    /// Exercises created by a specific admin. Out-of-scope callers get
    /// an empty list.
    pub async fn list_exercises_created_by(
        &self,
        caller: &Caller,
        creator_id: UserId,
    ) -> Result<Vec<ExerciseModel>, ExercisesServiceError> {
        if !authorize_scope(caller, creator_id) {
            return Ok(Vec::new());
        }

        let exercises = Exercise::find()
            .filter(ExerciseColumn::CreatedBy.eq(creator_id))
            .all(&self.db)
            .await?;

        Ok(exercises)
    }

    /// Partial update; only the creator or a super admin may modify.
    pub async fn update_exercise(
        &self,
        caller: &Caller,
        exercise_id: ExerciseId,
        update: ExerciseUpdate,
    ) -> Result<ExerciseModel, ExercisesServiceError> {
        let exercise = Exercise::find_by_id(exercise_id)
            .one(&self.db)
            .await?
            .ok_or(ExercisesServiceError::ExerciseNotFound)?;

        if !authorize_scope(caller, exercise.created_by) {
            return Err(ExercisesServiceError::Unauthorized);
        }

        let mut active: ExerciseActiveModel = exercise.into();

        if let Some(name) = update.name {
            if name.trim().is_empty() {
                return Err(ExercisesServiceError::Invalid("name"));
            }
            active.name = Set(name);
        }
        if let Some(category) = update.category {
            active.category = Set(category);
        }
        if let Some(difficulty) = update.difficulty {
            active.difficulty = Set(difficulty);
        }
        if let Some(muscles) = update.primary_muscles {
            let muscles_json = serde_json::to_string(&muscles)
                .map_err(|_| ExercisesServiceError::Invalid("primary muscles"))?;
            active.primary_muscles = Set(muscles_json);
        }
        if let Some(equipment) = update.equipment {
            active.equipment = Set(equipment);
        }
        if let Some(description) = update.description {
            active.description = Set(description);
        }
        if let Some(image_url) = update.image_url {
            active.image_url = Set(image_url);
        }
        if let Some(video_url) = update.video_url {
            active.video_url = Set(video_url);
        }
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let updated = active.update(&self.db).await?;
        Ok(updated)
    }

    /// Delete an exercise. Prescriptions referencing it survive and are
    /// skipped at join time.
    pub async fn delete_exercise(
        &self,
        caller: &Caller,
        exercise_id: ExerciseId,
    ) -> Result<(), ExercisesServiceError> {
        let exercise = Exercise::find_by_id(exercise_id)
            .one(&self.db)
            .await?
            .ok_or(ExercisesServiceError::ExerciseNotFound)?;

        if !authorize_scope(caller, exercise.created_by) {
            return Err(ExercisesServiceError::Unauthorized);
        }

        Exercise::delete_by_id(exercise_id).exec(&self.db).await?;

        Ok(())
    }
}
