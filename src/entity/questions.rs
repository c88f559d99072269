//! 题目实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "questions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub topic_id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub question: String,
    pub correct_answer: String,
    pub answer_temp: Option<String>,
    pub options_temp: Option<String>,
    pub position: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::topics::Entity",
        from = "Column::TopicId",
        to = "super::topics::Column::Id"
    )]
    Topic,
    #[sea_orm(has_many = "super::choices::Entity")]
    Choices,
}

impl Related<super::topics::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Topic.def()
    }
}

impl Related<super::choices::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Choices.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_question(
        self,
        choices: Vec<crate::models::exams::entities::Choice>,
    ) -> crate::models::exams::entities::Question {
        crate::models::exams::entities::Question {
            id: self.id,
            topic_id: self.topic_id,
            question: self.question,
            correct_answer: self.correct_answer,
            answer_temp: self.answer_temp,
            options_temp: self.options_temp,
            choices,
        }
    }
}
