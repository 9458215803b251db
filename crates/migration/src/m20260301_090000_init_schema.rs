use sea_orm_migration::prelude::*;
use sea_orm_migration::schema::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Answer::Table)
                    .if_not_exists()
                    .col(pk_auto(Answer::Id))
                    .col(string_len(Answer::Name, 100))
                    // Difficulty enum is represented in app code. DB stores compact numeric code.
                    // 0=easy, 1=normal, 2=hard
                    .col(
                        small_integer(Answer::Difficulty)
                            .check(Expr::col(Answer::Difficulty).gte(0))
                            .check(Expr::col(Answer::Difficulty).lte(2)),
                    )
                    .col(timestamp(Answer::CreatedAt).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Image::Table)
                    .if_not_exists()
                    .col(pk_auto(Image::Id))
                    .col(integer(Image::AnswerId))
                    // Relative to the media root, e.g. images/ada-lovelace_<uuid>
                    .col(string_len(Image::Path, 255))
                    .col(timestamp(Image::CreatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-images-answer_id")
                            .from(Image::Table, Image::AnswerId)
                            .to(Answer::Table, Answer::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_answers_difficulty")
                    .table(Answer::Table)
                    .col(Answer::Difficulty)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_answers_name")
                    .table(Answer::Table)
                    .col(Answer::Name)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_images_answer_id")
                    .table(Image::Table)
                    .col(Image::AnswerId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Image::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Answer::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Answer {
    Table,
    Id,
    Name,
    Difficulty,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Image {
    Table,
    Id,
    AnswerId,
    Path,
    CreatedAt,
}
