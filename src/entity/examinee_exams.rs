//! 考生与考试的关联实体（报名记录）

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "examinee_exams")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub examinee_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub exam_id: Uuid,
    pub is_approved: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::examinees::Entity",
        from = "Column::ExamineeId",
        to = "super::examinees::Column::Id"
    )]
    Examinee,
    #[sea_orm(
        belongs_to = "super::exams::Entity",
        from = "Column::ExamId",
        to = "super::exams::Column::Id"
    )]
    Exam,
}

impl Related<super::examinees::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Examinee.def()
    }
}

impl Related<super::exams::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Exam.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_enrollment(self) -> crate::models::exam_requests::entities::Enrollment {
        crate::models::exam_requests::entities::Enrollment {
            examinee_id: self.examinee_id,
            exam_id: self.exam_id,
            is_approved: self.is_approved,
        }
    }
}
