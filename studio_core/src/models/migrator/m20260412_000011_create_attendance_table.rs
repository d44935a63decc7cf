use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20260412_000011_create_attendance_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Attendance::Table)
                    .col(
                        ColumnDef::new(Attendance::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Attendance::ClassId).string().not_null())
                    .col(ColumnDef::new(Attendance::TraineeId).string().not_null())
                    .col(ColumnDef::new(Attendance::ScheduleDate).date().not_null())
                    .col(ColumnDef::new(Attendance::Status).string_len(16).not_null())
                    .col(ColumnDef::new(Attendance::MarkedBy).string().not_null())
                    .col(ColumnDef::new(Attendance::MarkedAt).string().not_null())
                    .col(ColumnDef::new(Attendance::Notes).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_attendance_class_id")
                            .from(Attendance::Table, Attendance::ClassId)
                            .to(Classes::Table, Classes::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Natural key behind the mark-attendance upsert; turns a lost
        // check-then-insert race into a database error instead of a
        // duplicate row
        manager
            .create_index(
                Index::create()
                    .name("idx_attendance_natural_key_unique")
                    .table(Attendance::Table)
                    .col(Attendance::TraineeId)
                    .col(Attendance::ClassId)
                    .col(Attendance::ScheduleDate)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_attendance_class_id_schedule_date")
                    .table(Attendance::Table)
                    .col(Attendance::ClassId)
                    .col(Attendance::ScheduleDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_attendance_trainee_id")
                    .table(Attendance::Table)
                    .col(Attendance::TraineeId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Attendance::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Attendance {
    Table,
    Id,
    ClassId,
    TraineeId,
    ScheduleDate,
    Status,
    MarkedBy,
    MarkedAt,
    Notes,
}

#[derive(Iden)]
enum Classes {
    Table,
    Id,
}
