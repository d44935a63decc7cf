use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20260412_000005_create_workout_assignments_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // All references are soft: the orphan sweep removes rows whose
        // template, trainee or assigner is gone
        manager
            .create_table(
                Table::create()
                    .table(WorkoutAssignments::Table)
                    .col(
                        ColumnDef::new(WorkoutAssignments::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(WorkoutAssignments::TraineeId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WorkoutAssignments::TemplateId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WorkoutAssignments::AssignedBy)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WorkoutAssignments::Status)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WorkoutAssignments::Weekdays)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WorkoutAssignments::StartDate)
                            .date()
                            .not_null(),
                    )
                    .col(ColumnDef::new(WorkoutAssignments::EndDate).date())
                    .col(ColumnDef::new(WorkoutAssignments::Notes).string())
                    .col(
                        ColumnDef::new(WorkoutAssignments::CreatedAt)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WorkoutAssignments::UpdatedAt)
                            .string()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_workout_assignments_trainee_id")
                    .table(WorkoutAssignments::Table)
                    .col(WorkoutAssignments::TraineeId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_workout_assignments_assigned_by")
                    .table(WorkoutAssignments::Table)
                    .col(WorkoutAssignments::AssignedBy)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_workout_assignments_template_id")
                    .table(WorkoutAssignments::Table)
                    .col(WorkoutAssignments::TemplateId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(WorkoutAssignments::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum WorkoutAssignments {
    Table,
    Id,
    TraineeId,
    TemplateId,
    AssignedBy,
    Status,
    Weekdays,
    StartDate,
    EndDate,
    Notes,
    CreatedAt,
    UpdatedAt,
}
