use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20260412_000008_create_classes_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Classes::Table)
                    .col(
                        ColumnDef::new(Classes::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Classes::Name).string().not_null())
                    .col(ColumnDef::new(Classes::ClassType).string().not_null())
                    .col(ColumnDef::new(Classes::Description).string())
                    .col(ColumnDef::new(Classes::Level).string().not_null())
                    .col(ColumnDef::new(Classes::Capacity).integer().not_null())
                    .col(
                        ColumnDef::new(Classes::DurationMinutes)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Classes::InstructorId).string().not_null())
                    .col(ColumnDef::new(Classes::Location).string())
                    .col(ColumnDef::new(Classes::Status).string_len(16).not_null())
                    .col(ColumnDef::new(Classes::CreatedAt).string().not_null())
                    .col(ColumnDef::new(Classes::UpdatedAt).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_classes_instructor_id")
                    .table(Classes::Table)
                    .col(Classes::InstructorId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_classes_status")
                    .table(Classes::Table)
                    .col(Classes::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Classes::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Classes {
    Table,
    Id,
    Name,
    ClassType,
    Description,
    Level,
    Capacity,
    DurationMinutes,
    InstructorId,
    Location,
    Status,
    CreatedAt,
    UpdatedAt,
}
