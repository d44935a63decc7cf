use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20260412_000010_create_class_enrollments_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // No unique index on (class_id, trainee_id): dropped rows are
        // kept as history and only the single-active invariant holds,
        // enforced by a check before insert
        manager
            .create_table(
                Table::create()
                    .table(ClassEnrollments::Table)
                    .col(
                        ColumnDef::new(ClassEnrollments::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ClassEnrollments::ClassId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ClassEnrollments::TraineeId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ClassEnrollments::Status)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ClassEnrollments::EnrolledAt)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ClassEnrollments::DroppedAt).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_class_enrollments_class_id")
                            .from(ClassEnrollments::Table, ClassEnrollments::ClassId)
                            .to(Classes::Table, Classes::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_class_enrollments_class_id")
                    .table(ClassEnrollments::Table)
                    .col(ClassEnrollments::ClassId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_class_enrollments_trainee_id")
                    .table(ClassEnrollments::Table)
                    .col(ClassEnrollments::TraineeId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ClassEnrollments::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum ClassEnrollments {
    Table,
    Id,
    ClassId,
    TraineeId,
    Status,
    EnrolledAt,
    DroppedAt,
}

#[derive(Iden)]
enum Classes {
    Table,
    Id,
}
