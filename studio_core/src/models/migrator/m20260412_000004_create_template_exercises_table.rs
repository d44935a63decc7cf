use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20260412_000004_create_template_exercises_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TemplateExercises::Table)
                    .col(
                        ColumnDef::new(TemplateExercises::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(TemplateExercises::TemplateId)
                            .string()
                            .not_null(),
                    )
                    // Soft reference: no foreign key, exercises may be
                    // deleted out from under a prescription
                    .col(
                        ColumnDef::new(TemplateExercises::ExerciseId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TemplateExercises::Position)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TemplateExercises::Sets).integer().not_null())
                    .col(ColumnDef::new(TemplateExercises::Reps).string().not_null())
                    .col(
                        ColumnDef::new(TemplateExercises::RestSeconds)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TemplateExercises::Notes).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_template_exercises_template_id")
                            .from(TemplateExercises::Table, TemplateExercises::TemplateId)
                            .to(WorkoutTemplates::Table, WorkoutTemplates::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_template_exercises_template_id")
                    .table(TemplateExercises::Table)
                    .col(TemplateExercises::TemplateId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TemplateExercises::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum TemplateExercises {
    Table,
    Id,
    TemplateId,
    ExerciseId,
    Position,
    Sets,
    Reps,
    RestSeconds,
    Notes,
}

#[derive(Iden)]
enum WorkoutTemplates {
    Table,
    Id,
}
