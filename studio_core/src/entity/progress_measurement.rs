use crate::ids::{ExerciseId, MeasurementId, UserId};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum MeasurementKind {
    #[sea_orm(string_value = "body_weight")]
    BodyWeight,

    #[sea_orm(string_value = "body_fat")]
    BodyFat,

    #[sea_orm(string_value = "personal_record")]
    PersonalRecord,

    #[sea_orm(string_value = "measurement")]
    Measurement,
}

/// Append-only progress log. Which payload columns are populated depends
/// on `kind`; there is no update or delete flow.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "progress_measurements")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: MeasurementId,
    pub trainee_id: UserId,
    pub kind: MeasurementKind,
    pub weight: Option<f64>,
    pub body_fat_pct: Option<f64>,
    pub measurement_name: Option<String>,
    pub measurement_value: Option<f64>,
    pub measurement_unit: Option<String>,
    pub pr_value: Option<f64>,
    pub exercise_id: Option<ExerciseId>,
    pub notes: Option<String>,
    pub recorded_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
