//! 考生实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "examinees")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub email_auth: bool,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub phone_number: String,
    pub profile_image: Option<String>,
    pub status: String,
    pub four_digit_code: Option<i32>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::examinee_exams::Entity")]
    ExamineeExams,
    #[sea_orm(has_many = "super::exam_requests::Entity")]
    ExamRequests,
}

impl Related<super::examinee_exams::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ExamineeExams.def()
    }
}

impl Related<super::exam_requests::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ExamRequests.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    /// `exam_ids` 只应包含已批准的考试
    pub fn into_examinee(
        self,
        exam_ids: Vec<Uuid>,
    ) -> crate::models::principals::entities::Examinee {
        use crate::models::principals::entities::{Account, Examinee, PrincipalKind};
        use chrono::{DateTime, Utc};

        Examinee {
            account: Account {
                id: self.id,
                email: self.email,
                password_hash: self.password_hash,
                first_name: self.first_name,
                last_name: self.last_name,
                profile_image: self.profile_image,
                status: self.status,
                user_type: PrincipalKind::Examinee,
                created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0)
                    .unwrap_or_default(),
                updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0)
                    .unwrap_or_default(),
            },
            phone_number: self.phone_number,
            email_auth: self.email_auth,
            four_digit_code: self.four_digit_code,
            exam_ids,
        }
    }
}
