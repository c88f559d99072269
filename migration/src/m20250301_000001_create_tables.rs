use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 考生表
        manager
            .create_table(
                Table::create()
                    .table(Examinees::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Examinees::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Examinees::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Examinees::EmailAuth)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Examinees::FirstName).string().not_null())
                    .col(ColumnDef::new(Examinees::LastName).string().not_null())
                    .col(ColumnDef::new(Examinees::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Examinees::PhoneNumber).string().not_null())
                    .col(ColumnDef::new(Examinees::ProfileImage).string().null())
                    .col(
                        ColumnDef::new(Examinees::Status)
                            .string()
                            .not_null()
                            .default("Pending"),
                    )
                    .col(ColumnDef::new(Examinees::FourDigitCode).integer().null())
                    .col(ColumnDef::new(Examinees::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Examinees::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 出题人表
        manager
            .create_table(
                Table::create()
                    .table(Examiners::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Examiners::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Examiners::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Examiners::FirstName).string().not_null())
                    .col(ColumnDef::new(Examiners::LastName).string().not_null())
                    .col(ColumnDef::new(Examiners::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Examiners::ProfileImage).string().null())
                    .col(
                        ColumnDef::new(Examiners::Status)
                            .string()
                            .not_null()
                            .default("Pending"),
                    )
                    .col(ColumnDef::new(Examiners::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Examiners::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 管理员表
        manager
            .create_table(
                Table::create()
                    .table(Admins::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Admins::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Admins::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Admins::FirstName).string().not_null())
                    .col(ColumnDef::new(Admins::LastName).string().not_null())
                    .col(ColumnDef::new(Admins::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Admins::ProfileImage).string().null())
                    .col(
                        ColumnDef::new(Admins::Status)
                            .string()
                            .not_null()
                            .default("Pending"),
                    )
                    .col(ColumnDef::new(Admins::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Admins::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 考试表
        manager
            .create_table(
                Table::create()
                    .table(Exams::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Exams::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Exams::Title).string().not_null())
                    .col(ColumnDef::new(Exams::TotalQuestions).integer().not_null())
                    .col(ColumnDef::new(Exams::TimeDuration).integer().not_null())
                    .col(ColumnDef::new(Exams::Description).text().null())
                    .col(ColumnDef::new(Exams::PassingRate).double().not_null())
                    .col(ColumnDef::new(Exams::CreatedBy).uuid().not_null())
                    .col(ColumnDef::new(Exams::CoverPhoto).string().null())
                    .col(
                        ColumnDef::new(Exams::Enrollees)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Exams::ExamTopic).string().not_null())
                    .col(ColumnDef::new(Exams::GradingSystem).string().not_null())
                    .col(ColumnDef::new(Exams::NumberOfItems).integer().not_null())
                    .col(ColumnDef::new(Exams::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Exams::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Exams::Table, Exams::CreatedBy)
                            .to(Examiners::Table, Examiners::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 主题表
        manager
            .create_table(
                Table::create()
                    .table(Topics::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Topics::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Topics::ExamId).uuid().not_null())
                    .col(ColumnDef::new(Topics::Name).string().not_null())
                    .col(ColumnDef::new(Topics::Position).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Topics::Table, Topics::ExamId)
                            .to(Exams::Table, Exams::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 题目表
        manager
            .create_table(
                Table::create()
                    .table(Questions::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Questions::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Questions::TopicId).uuid().not_null())
                    .col(ColumnDef::new(Questions::Question).text().not_null())
                    .col(ColumnDef::new(Questions::CorrectAnswer).string().not_null())
                    .col(ColumnDef::new(Questions::AnswerTemp).string().null())
                    .col(ColumnDef::new(Questions::OptionsTemp).string().null())
                    .col(ColumnDef::new(Questions::Position).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Questions::Table, Questions::TopicId)
                            .to(Topics::Table, Topics::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 选项表
        manager
            .create_table(
                Table::create()
                    .table(Choices::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Choices::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Choices::QuestionId).uuid().not_null())
                    .col(ColumnDef::new(Choices::OptionText).string().not_null())
                    .col(ColumnDef::new(Choices::Position).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Choices::Table, Choices::QuestionId)
                            .to(Questions::Table, Questions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 考生-考试关联表
        manager
            .create_table(
                Table::create()
                    .table(ExamineeExams::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ExamineeExams::ExamineeId).uuid().not_null())
                    .col(ColumnDef::new(ExamineeExams::ExamId).uuid().not_null())
                    .col(
                        ColumnDef::new(ExamineeExams::IsApproved)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .primary_key(
                        Index::create()
                            .col(ExamineeExams::ExamineeId)
                            .col(ExamineeExams::ExamId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ExamineeExams::Table, ExamineeExams::ExamineeId)
                            .to(Examinees::Table, Examinees::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ExamineeExams::Table, ExamineeExams::ExamId)
                            .to(Exams::Table, Exams::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 考试申请表
        manager
            .create_table(
                Table::create()
                    .table(ExamRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ExamRequests::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ExamRequests::ExamId).uuid().not_null())
                    .col(ColumnDef::new(ExamRequests::ExamineeId).uuid().not_null())
                    .col(
                        ColumnDef::new(ExamRequests::Status)
                            .string()
                            .not_null()
                            .default("Pending"),
                    )
                    .col(
                        ColumnDef::new(ExamRequests::IsApproved)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ExamRequests::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ExamRequests::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ExamRequests::Table, ExamRequests::ExamId)
                            .to(Exams::Table, Exams::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ExamRequests::Table, ExamRequests::ExamineeId)
                            .to(Examinees::Table, Examinees::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 索引
        manager
            .create_index(
                Index::create()
                    .name("idx_exams_created_by")
                    .table(Exams::Table)
                    .col(Exams::CreatedBy)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_topics_exam_id")
                    .table(Topics::Table)
                    .col(Topics::ExamId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_questions_topic_id")
                    .table(Questions::Table)
                    .col(Questions::TopicId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_choices_question_id")
                    .table(Choices::Table)
                    .col(Choices::QuestionId)
                    .to_owned(),
            )
            .await?;

        // 同一考生对同一考试只能有一条申请
        manager
            .create_index(
                Index::create()
                    .name("idx_exam_requests_exam_examinee")
                    .table(ExamRequests::Table)
                    .col(ExamRequests::ExamId)
                    .col(ExamRequests::ExamineeId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ExamRequests::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ExamineeExams::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Choices::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Questions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Topics::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Exams::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Admins::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Examiners::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Examinees::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Examinees {
    #[sea_orm(iden = "examinees")]
    Table,
    Id,
    Email,
    EmailAuth,
    FirstName,
    LastName,
    PasswordHash,
    PhoneNumber,
    ProfileImage,
    Status,
    FourDigitCode,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Examiners {
    #[sea_orm(iden = "examiners")]
    Table,
    Id,
    Email,
    FirstName,
    LastName,
    PasswordHash,
    ProfileImage,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Admins {
    #[sea_orm(iden = "admins")]
    Table,
    Id,
    Email,
    FirstName,
    LastName,
    PasswordHash,
    ProfileImage,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Exams {
    #[sea_orm(iden = "exams")]
    Table,
    Id,
    Title,
    TotalQuestions,
    TimeDuration,
    Description,
    PassingRate,
    CreatedBy,
    CoverPhoto,
    Enrollees,
    ExamTopic,
    GradingSystem,
    NumberOfItems,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Topics {
    #[sea_orm(iden = "topics")]
    Table,
    Id,
    ExamId,
    Name,
    Position,
}

#[derive(DeriveIden)]
enum Questions {
    #[sea_orm(iden = "questions")]
    Table,
    Id,
    TopicId,
    Question,
    CorrectAnswer,
    AnswerTemp,
    OptionsTemp,
    Position,
}

#[derive(DeriveIden)]
enum Choices {
    #[sea_orm(iden = "choices")]
    Table,
    Id,
    QuestionId,
    #[sea_orm(iden = "option")]
    OptionText,
    Position,
}

#[derive(DeriveIden)]
enum ExamineeExams {
    #[sea_orm(iden = "examinee_exams")]
    Table,
    ExamineeId,
    ExamId,
    IsApproved,
}

#[derive(DeriveIden)]
enum ExamRequests {
    #[sea_orm(iden = "exam_requests")]
    Table,
    Id,
    ExamId,
    ExamineeId,
    Status,
    IsApproved,
    CreatedAt,
    UpdatedAt,
}
