use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20260412_000009_create_class_sessions_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ClassSessions::Table)
                    .col(
                        ColumnDef::new(ClassSessions::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ClassSessions::ClassId).string().not_null())
                    .col(ColumnDef::new(ClassSessions::StartsAt).string().not_null())
                    .col(ColumnDef::new(ClassSessions::EndsAt).string().not_null())
                    .col(
                        ColumnDef::new(ClassSessions::SessionDate)
                            .date()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ClassSessions::Status)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(ColumnDef::new(ClassSessions::LocationOverride).string())
                    .col(ColumnDef::new(ClassSessions::CapacityOverride).integer())
                    .col(ColumnDef::new(ClassSessions::Notes).string())
                    .col(ColumnDef::new(ClassSessions::CreatedAt).string().not_null())
                    .col(ColumnDef::new(ClassSessions::UpdatedAt).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_class_sessions_class_id")
                            .from(ClassSessions::Table, ClassSessions::ClassId)
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
                    .name("idx_class_sessions_class_id")
                    .table(ClassSessions::Table)
                    .col(ClassSessions::ClassId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_class_sessions_session_date")
                    .table(ClassSessions::Table)
                    .col(ClassSessions::SessionDate)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ClassSessions::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum ClassSessions {
    Table,
    Id,
    ClassId,
    StartsAt,
    EndsAt,
    SessionDate,
    Status,
    LocationOverride,
    CapacityOverride,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Classes {
    Table,
    Id,
}
