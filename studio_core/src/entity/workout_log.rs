use crate::ids::{AssignmentId, TemplateId, UserId, WorkoutLogId};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A completed workout, recorded by the trainee. Immutable once created.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "workout_logs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: WorkoutLogId,
    pub trainee_id: UserId,
    pub assignment_id: Option<AssignmentId>,
    pub template_id: TemplateId,
    pub duration_minutes: i32,
    pub notes: Option<String>,
    pub completed_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::workout_log_entry::Entity")]
    Entries,
}

impl Related<super::workout_log_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Entries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
