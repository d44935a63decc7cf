use crate::ids::{TemplateId, UserId};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::exercise::Difficulty;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "workout_templates")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: TemplateId,
    pub name: String,
    pub description: Option<String>,
    pub difficulty: Difficulty,
    pub duration_minutes: i32,
    pub created_by: UserId,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::template_exercise::Entity")]
    TemplateExercises,
}

impl Related<super::template_exercise::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TemplateExercises.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
