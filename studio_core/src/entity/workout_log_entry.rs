use crate::ids::{ExerciseId, LogEntryId, WorkoutLogId};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Per-exercise detail inside a workout log. `exercise_id` is a soft
/// reference.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "workout_log_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: LogEntryId,
    pub log_id: WorkoutLogId,
    pub exercise_id: ExerciseId,
    pub completed: bool,
    pub sets_performed: Option<i32>,
    pub reps_performed: Option<String>,
    pub weight: Option<f64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::workout_log::Entity",
        from = "Column::LogId",
        to = "super::workout_log::Column::Id"
    )]
    WorkoutLog,
}

impl Related<super::workout_log::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WorkoutLog.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
