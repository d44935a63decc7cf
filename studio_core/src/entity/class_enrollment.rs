use crate::ids::{ClassId, EnrollmentId, UserId};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum EnrollmentStatus {
    #[sea_orm(string_value = "active")]
    Active,

    #[sea_orm(string_value = "dropped")]
    Dropped,
}

/// A trainee's enrollment in a class. Dropping transitions the row to
/// `Dropped` and stamps `dropped_at`; rows are never deleted, so a
/// (trainee, class) pair accumulates history. At most one row per pair
/// may be `Active` at a time, enforced by a check before insert.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "class_enrollments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: EnrollmentId,
    pub class_id: ClassId,
    pub trainee_id: UserId,
    pub status: EnrollmentStatus,
    pub enrolled_at: String,
    pub dropped_at: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::class::Entity",
        from = "Column::ClassId",
        to = "super::class::Column::Id"
    )]
    Class,
}

impl Related<super::class::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Class.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
