use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20260412_000012_create_progress_measurements_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ProgressMeasurements::Table)
                    .col(
                        ColumnDef::new(ProgressMeasurements::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ProgressMeasurements::TraineeId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProgressMeasurements::Kind)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(ProgressMeasurements::Weight).double())
                    .col(ColumnDef::new(ProgressMeasurements::BodyFatPct).double())
                    .col(ColumnDef::new(ProgressMeasurements::MeasurementName).string())
                    .col(ColumnDef::new(ProgressMeasurements::MeasurementValue).double())
                    .col(ColumnDef::new(ProgressMeasurements::MeasurementUnit).string())
                    .col(ColumnDef::new(ProgressMeasurements::PrValue).double())
                    .col(ColumnDef::new(ProgressMeasurements::ExerciseId).string())
                    .col(ColumnDef::new(ProgressMeasurements::Notes).string())
                    .col(
                        ColumnDef::new(ProgressMeasurements::RecordedAt)
                            .string()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_progress_measurements_trainee_id")
                    .table(ProgressMeasurements::Table)
                    .col(ProgressMeasurements::TraineeId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ProgressMeasurements::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum ProgressMeasurements {
    Table,
    Id,
    TraineeId,
    Kind,
    Weight,
    BodyFatPct,
    MeasurementName,
    MeasurementValue,
    MeasurementUnit,
    PrValue,
    ExerciseId,
    Notes,
    RecordedAt,
}
