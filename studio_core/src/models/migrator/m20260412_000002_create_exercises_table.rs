use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20260412_000002_create_exercises_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Exercises::Table)
                    .col(
                        ColumnDef::new(Exercises::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Exercises::Name).string().not_null())
                    .col(ColumnDef::new(Exercises::Category).string().not_null())
                    .col(
                        ColumnDef::new(Exercises::Difficulty)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Exercises::PrimaryMuscles)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Exercises::Equipment).string())
                    .col(ColumnDef::new(Exercises::Description).string())
                    .col(ColumnDef::new(Exercises::ImageUrl).string())
                    .col(ColumnDef::new(Exercises::VideoUrl).string())
                    .col(ColumnDef::new(Exercises::CreatedBy).string().not_null())
                    .col(ColumnDef::new(Exercises::CreatedAt).string().not_null())
                    .col(ColumnDef::new(Exercises::UpdatedAt).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_exercises_created_by")
                    .table(Exercises::Table)
                    .col(Exercises::CreatedBy)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Exercises::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Exercises {
    Table,
    Id,
    Name,
    Category,
    Difficulty,
    PrimaryMuscles,
    Equipment,
    Description,
    ImageUrl,
    VideoUrl,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}
