use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20260412_000006_create_workout_logs_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(WorkoutLogs::Table)
                    .col(
                        ColumnDef::new(WorkoutLogs::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(WorkoutLogs::TraineeId).string().not_null())
                    .col(ColumnDef::new(WorkoutLogs::AssignmentId).string())
                    .col(ColumnDef::new(WorkoutLogs::TemplateId).string().not_null())
                    .col(
                        ColumnDef::new(WorkoutLogs::DurationMinutes)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(WorkoutLogs::Notes).string())
                    .col(ColumnDef::new(WorkoutLogs::CompletedAt).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_workout_logs_trainee_id")
                    .table(WorkoutLogs::Table)
                    .col(WorkoutLogs::TraineeId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_workout_logs_template_id")
                    .table(WorkoutLogs::Table)
                    .col(WorkoutLogs::TemplateId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(WorkoutLogs::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum WorkoutLogs {
    Table,
    Id,
    TraineeId,
    AssignmentId,
    TemplateId,
    DurationMinutes,
    Notes,
    CompletedAt,
}
