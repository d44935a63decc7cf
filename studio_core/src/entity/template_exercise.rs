use crate::ids::{ExerciseId, PrescriptionId, TemplateId};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One prescribed exercise inside a workout template. `exercise_id` is a
/// soft reference: the exercise may have been deleted since, and joins
/// skip prescriptions that no longer resolve.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "template_exercises")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: PrescriptionId,
    pub template_id: TemplateId,
    pub exercise_id: ExerciseId,
    pub position: i32,
    pub sets: i32,
    /// Free-form rep prescription, e.g. "10-12".
    pub reps: String,
    pub rest_seconds: i32,
    pub notes: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::workout_template::Entity",
        from = "Column::TemplateId",
        to = "super::workout_template::Column::Id"
    )]
    WorkoutTemplate,
}

impl Related<super::workout_template::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WorkoutTemplate.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
