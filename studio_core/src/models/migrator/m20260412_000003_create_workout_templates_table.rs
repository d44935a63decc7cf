use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20260412_000003_create_workout_templates_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(WorkoutTemplates::Table)
                    .col(
                        ColumnDef::new(WorkoutTemplates::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(WorkoutTemplates::Name).string().not_null())
                    .col(ColumnDef::new(WorkoutTemplates::Description).string())
                    .col(
                        ColumnDef::new(WorkoutTemplates::Difficulty)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WorkoutTemplates::DurationMinutes)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WorkoutTemplates::CreatedBy)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WorkoutTemplates::CreatedAt)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WorkoutTemplates::UpdatedAt)
                            .string()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_workout_templates_created_by")
                    .table(WorkoutTemplates::Table)
                    .col(WorkoutTemplates::CreatedBy)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(WorkoutTemplates::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum WorkoutTemplates {
    Table,
    Id,
    Name,
    Description,
    Difficulty,
    DurationMinutes,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}
