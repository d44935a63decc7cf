use crate::ids::{ExerciseId, UserId};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum Difficulty {
    #[sea_orm(string_value = "Beginner")]
    Beginner,

    #[sea_orm(string_value = "Intermediate")]
    Intermediate,

    #[sea_orm(string_value = "Advanced")]
    Advanced,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "exercises")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: ExerciseId,
    pub name: String,
    pub category: String,
    pub difficulty: Difficulty,
    /// JSON array of muscle labels.
    pub primary_muscles: String,
    pub equipment: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub created_by: UserId,
    pub created_at: String,
    pub updated_at: String,
}

impl Model {
    /// Decoded `primary_muscles`. Tolerates malformed stored JSON.
    pub fn muscles(&self) -> Vec<String> {
        serde_json::from_str(&self.primary_muscles).unwrap_or_default()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
