//! 考试实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "exams")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    pub total_questions: i32,
    pub time_duration: i32,
    pub description: Option<String>,
    #[sea_orm(column_type = "Double")]
    pub passing_rate: f64,
    pub created_by: Uuid,
    pub cover_photo: Option<String>,
    pub enrollees: i32,
    pub exam_topic: String,
    pub grading_system: String,
    pub number_of_items: i32,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::examiners::Entity",
        from = "Column::CreatedBy",
        to = "super::examiners::Column::Id"
    )]
    Examiner,
    #[sea_orm(has_many = "super::topics::Entity")]
    Topics,
    #[sea_orm(has_many = "super::examinee_exams::Entity")]
    ExamineeExams,
    #[sea_orm(has_many = "super::exam_requests::Entity")]
    ExamRequests,
}

impl Related<super::examiners::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Examiner.def()
    }
}

impl Related<super::topics::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Topics.def()
    }
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
    pub fn into_exam(
        self,
        topics: Vec<crate::models::exams::entities::Topic>,
    ) -> crate::models::exams::entities::Exam {
        use crate::models::exams::entities::Exam;
        use chrono::{DateTime, Utc};

        Exam {
            id: self.id,
            title: self.title,
            total_questions: self.total_questions,
            time_duration: self.time_duration,
            description: self.description,
            passing_rate: self.passing_rate,
            created_by: self.created_by,
            cover_photo: self.cover_photo,
            enrollees: self.enrollees,
            exam_topic: self.exam_topic,
            grading_system: self.grading_system,
            number_of_items: self.number_of_items,
            topics,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}
