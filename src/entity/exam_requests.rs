//! 考试申请实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "exam_requests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub exam_id: Uuid,
    pub examinee_id: Uuid,
    pub status: String,
    pub is_approved: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::exams::Entity",
        from = "Column::ExamId",
        to = "super::exams::Column::Id"
    )]
    Exam,
    #[sea_orm(
        belongs_to = "super::examinees::Entity",
        from = "Column::ExamineeId",
        to = "super::examinees::Column::Id"
    )]
    Examinee,
}

impl Related<super::exams::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Exam.def()
    }
}

impl Related<super::examinees::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Examinee.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_exam_request(self) -> crate::models::exam_requests::entities::ExamRequest {
        use crate::models::exam_requests::entities::ExamRequest;
        use chrono::{DateTime, Utc};

        ExamRequest {
            id: self.id,
            exam_id: self.exam_id,
            examinee_id: self.examinee_id,
            status: self.status,
            is_approved: self.is_approved,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}
