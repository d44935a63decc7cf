use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20260412_000007_create_workout_log_entries_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(WorkoutLogEntries::Table)
                    .col(
                        ColumnDef::new(WorkoutLogEntries::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(WorkoutLogEntries::LogId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WorkoutLogEntries::ExerciseId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WorkoutLogEntries::Completed)
                            .boolean()
                            .not_null(),
                    )
                    .col(ColumnDef::new(WorkoutLogEntries::SetsPerformed).integer())
                    .col(ColumnDef::new(WorkoutLogEntries::RepsPerformed).string())
                    .col(ColumnDef::new(WorkoutLogEntries::Weight).double())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_workout_log_entries_log_id")
                            .from(WorkoutLogEntries::Table, WorkoutLogEntries::LogId)
                            .to(WorkoutLogs::Table, WorkoutLogs::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_workout_log_entries_log_id")
                    .table(WorkoutLogEntries::Table)
                    .col(WorkoutLogEntries::LogId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(WorkoutLogEntries::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum WorkoutLogEntries {
    Table,
    Id,
    LogId,
    ExerciseId,
    Completed,
    SetsPerformed,
    RepsPerformed,
    Weight,
}

#[derive(Iden)]
enum WorkoutLogs {
    Table,
    Id,
}
