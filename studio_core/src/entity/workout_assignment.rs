use crate::ids::{AssignmentId, TemplateId, UserId};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum AssignmentStatus {
    #[sea_orm(string_value = "active")]
    Active,

    #[sea_orm(string_value = "completed")]
    Completed,

    #[sea_orm(string_value = "cancelled")]
    Cancelled,

    #[sea_orm(string_value = "paused")]
    Paused,
}

/// A workout template assigned to a trainee by an admin. Template,
/// trainee and assigner are soft references; the orphan sweep in the
/// assignments service removes rows whose references no longer resolve.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "workout_assignments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: AssignmentId,
    pub trainee_id: UserId,
    pub template_id: TemplateId,
    pub assigned_by: UserId,
    pub status: AssignmentStatus,
    /// JSON array of scheduled weekday numbers (0 = Monday .. 6 = Sunday).
    pub weekdays: String,
    pub start_date: Date,
    pub end_date: Option<Date>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Model {
    /// Decoded `weekdays`. Tolerates malformed stored JSON.
    pub fn scheduled_weekdays(&self) -> Vec<u8> {
        serde_json::from_str(&self.weekdays).unwrap_or_default()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
