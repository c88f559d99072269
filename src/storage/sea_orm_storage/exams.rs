//! 考试聚合存储
//!
//! 考试 → 主题 → 题目 → 选项，整棵树在一个事务中创建或部分更新，
//! 删除依赖外键级联。

use std::collections::HashMap;

use super::{SeaOrmStorage, db_err};
use crate::entity::{choices, exams, questions, topics};
use crate::errors::{ExamSystemError, Result};
use crate::models::exams::{
    entities::Exam,
    requests::{
        CreateExamRequest, CreateQuestionRequest, UpdateChoiceRequest, UpdateExamRequest,
        UpdateQuestionRequest, UpdateTopicRequest,
    },
};
use crate::storage::ExamNode;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseTransaction, EntityTrait,
    IntoActiveModel, JoinType, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
    TransactionTrait,
};
use tracing::debug;
use uuid::Uuid;

/// 批量读取多个考试的完整树，子节点按 position 排序
pub(crate) async fn load_exam_trees<C: ConnectionTrait>(
    conn: &C,
    exam_models: Vec<exams::Model>,
) -> Result<Vec<Exam>> {
    if exam_models.is_empty() {
        return Ok(Vec::new());
    }

    let exam_ids: Vec<Uuid> = exam_models.iter().map(|e| e.id).collect();
    let topic_models = topics::Entity::find()
        .filter(topics::Column::ExamId.is_in(exam_ids))
        .order_by_asc(topics::Column::Position)
        .all(conn)
        .await
        .map_err(db_err("查询主题失败"))?;

    let topic_ids: Vec<Uuid> = topic_models.iter().map(|t| t.id).collect();
    let question_models = if topic_ids.is_empty() {
        Vec::new()
    } else {
        questions::Entity::find()
            .filter(questions::Column::TopicId.is_in(topic_ids))
            .order_by_asc(questions::Column::Position)
            .all(conn)
            .await
            .map_err(db_err("查询题目失败"))?
    };

    let question_ids: Vec<Uuid> = question_models.iter().map(|q| q.id).collect();
    let choice_models = if question_ids.is_empty() {
        Vec::new()
    } else {
        choices::Entity::find()
            .filter(choices::Column::QuestionId.is_in(question_ids))
            .order_by_asc(choices::Column::Position)
            .all(conn)
            .await
            .map_err(db_err("查询选项失败"))?
    };

    // 自底向上组装
    let mut choices_by_question: HashMap<Uuid, Vec<_>> = HashMap::new();
    for choice in choice_models {
        choices_by_question
            .entry(choice.question_id)
            .or_default()
            .push(choice.into_choice());
    }

    let mut questions_by_topic: HashMap<Uuid, Vec<_>> = HashMap::new();
    for question in question_models {
        let choices = choices_by_question.remove(&question.id).unwrap_or_default();
        questions_by_topic
            .entry(question.topic_id)
            .or_default()
            .push(question.into_question(choices));
    }

    let mut topics_by_exam: HashMap<Uuid, Vec<_>> = HashMap::new();
    for topic in topic_models {
        let questions = questions_by_topic.remove(&topic.id).unwrap_or_default();
        topics_by_exam
            .entry(topic.exam_id)
            .or_default()
            .push(topic.into_topic(questions));
    }

    Ok(exam_models
        .into_iter()
        .map(|exam| {
            let topics = topics_by_exam.remove(&exam.id).unwrap_or_default();
            exam.into_exam(topics)
        })
        .collect())
}

async fn next_topic_position(txn: &DatabaseTransaction, exam_id: Uuid) -> Result<i32> {
    let max = topics::Entity::find()
        .select_only()
        .column_as(topics::Column::Position.max(), "max_position")
        .filter(topics::Column::ExamId.eq(exam_id))
        .into_tuple::<Option<i32>>()
        .one(txn)
        .await
        .map_err(db_err("查询主题顺序失败"))?;
    Ok(max.flatten().map_or(0, |p| p + 1))
}

async fn next_question_position(txn: &DatabaseTransaction, topic_id: Uuid) -> Result<i32> {
    let max = questions::Entity::find()
        .select_only()
        .column_as(questions::Column::Position.max(), "max_position")
        .filter(questions::Column::TopicId.eq(topic_id))
        .into_tuple::<Option<i32>>()
        .one(txn)
        .await
        .map_err(db_err("查询题目顺序失败"))?;
    Ok(max.flatten().map_or(0, |p| p + 1))
}

async fn next_choice_position(txn: &DatabaseTransaction, question_id: Uuid) -> Result<i32> {
    let max = choices::Entity::find()
        .select_only()
        .column_as(choices::Column::Position.max(), "max_position")
        .filter(choices::Column::QuestionId.eq(question_id))
        .into_tuple::<Option<i32>>()
        .one(txn)
        .await
        .map_err(db_err("查询选项顺序失败"))?;
    Ok(max.flatten().map_or(0, |p| p + 1))
}

async fn insert_topic(
    txn: &DatabaseTransaction,
    exam_id: Uuid,
    name: String,
    position: i32,
) -> Result<Uuid> {
    let model = topics::ActiveModel {
        id: Set(Uuid::new_v4()),
        exam_id: Set(exam_id),
        name: Set(name),
        position: Set(position),
    };
    let result = model.insert(txn).await.map_err(db_err("创建主题失败"))?;
    Ok(result.id)
}

async fn insert_question(
    txn: &DatabaseTransaction,
    topic_id: Uuid,
    req: CreateQuestionRequest,
    position: i32,
) -> Result<Uuid> {
    let model = questions::ActiveModel {
        id: Set(Uuid::new_v4()),
        topic_id: Set(topic_id),
        question: Set(req.question),
        correct_answer: Set(req.correct_answer),
        answer_temp: Set(req.answer_temp),
        options_temp: Set(req.options_temp),
        position: Set(position),
    };
    let question = model.insert(txn).await.map_err(db_err("创建题目失败"))?;

    for (index, choice) in req.choices.into_iter().enumerate() {
        insert_choice(txn, question.id, choice.option, index as i32).await?;
    }

    Ok(question.id)
}

async fn insert_choice(
    txn: &DatabaseTransaction,
    question_id: Uuid,
    option: String,
    position: i32,
) -> Result<Uuid> {
    let model = choices::ActiveModel {
        id: Set(Uuid::new_v4()),
        question_id: Set(question_id),
        option_text: Set(option),
        position: Set(position),
    };
    let result = model.insert(txn).await.map_err(db_err("创建选项失败"))?;
    Ok(result.id)
}

/// 查找属于指定考试的选项
async fn find_choice_in_exam(
    txn: &DatabaseTransaction,
    choice_id: Uuid,
    exam_id: Uuid,
) -> Result<Option<choices::Model>> {
    choices::Entity::find_by_id(choice_id)
        .join(JoinType::InnerJoin, choices::Relation::Question.def())
        .join(JoinType::InnerJoin, questions::Relation::Topic.def())
        .filter(topics::Column::ExamId.eq(exam_id))
        .one(txn)
        .await
        .map_err(db_err("查询选项失败"))
}

/// 合并选项列表：带 id 的必须属于同一考试，并挂到当前题目下
async fn merge_choices(
    txn: &DatabaseTransaction,
    exam_id: Uuid,
    question_id: Uuid,
    entries: Vec<UpdateChoiceRequest>,
) -> Result<()> {
    for entry in entries {
        match entry.id {
            Some(choice_id) => {
                let existing = find_choice_in_exam(txn, choice_id, exam_id)
                    .await?
                    .ok_or_else(|| {
                        ExamSystemError::not_found(format!("Choice not found: {choice_id}"))
                    })?;

                let moved = existing.question_id != question_id;
                let mut model = existing.into_active_model();
                if moved {
                    let position = next_choice_position(txn, question_id).await?;
                    model.question_id = Set(question_id);
                    model.position = Set(position);
                }
                if let Some(option) = entry.option {
                    model.option_text = Set(option);
                }
                if model.is_changed() {
                    model.update(txn).await.map_err(db_err("更新选项失败"))?;
                }
            }
            None => {
                let option = entry
                    .option
                    .ok_or_else(|| ExamSystemError::validation("Choice option is required"))?;
                let position = next_choice_position(txn, question_id).await?;
                insert_choice(txn, question_id, option, position).await?;
            }
        }
    }
    Ok(())
}

/// 将不带 id 的题目条目转换为创建请求
fn new_question(entry: &UpdateQuestionRequest) -> Result<CreateQuestionRequest> {
    let question = entry
        .question
        .clone()
        .ok_or_else(|| ExamSystemError::validation("Question text is required"))?;
    let correct_answer = entry
        .correct_answer
        .clone()
        .ok_or_else(|| ExamSystemError::validation("Question correct_answer is required"))?;

    Ok(CreateQuestionRequest {
        question,
        correct_answer,
        answer_temp: entry.answer_temp.clone(),
        options_temp: entry.options_temp.clone(),
        choices: Vec::new(),
    })
}

/// 合并题目列表：带 id 但不属于该主题的条目被跳过
async fn merge_questions(
    txn: &DatabaseTransaction,
    exam_id: Uuid,
    topic_id: Uuid,
    entries: Vec<UpdateQuestionRequest>,
) -> Result<()> {
    for entry in entries {
        let question_id = match entry.id {
            Some(question_id) => {
                let existing = questions::Entity::find_by_id(question_id)
                    .filter(questions::Column::TopicId.eq(topic_id))
                    .one(txn)
                    .await
                    .map_err(db_err("查询题目失败"))?;
                let Some(existing) = existing else {
                    debug!("跳过不存在的题目 {} (主题 {})", question_id, topic_id);
                    continue;
                };

                let mut model = existing.into_active_model();
                if let Some(question) = entry.question {
                    model.question = Set(question);
                }
                if let Some(correct_answer) = entry.correct_answer {
                    model.correct_answer = Set(correct_answer);
                }
                if let Some(answer_temp) = entry.answer_temp {
                    model.answer_temp = Set(Some(answer_temp));
                }
                if let Some(options_temp) = entry.options_temp {
                    model.options_temp = Set(Some(options_temp));
                }
                if model.is_changed() {
                    model.update(txn).await.map_err(db_err("更新题目失败"))?;
                }
                question_id
            }
            None => {
                let req = new_question(&entry)?;
                let position = next_question_position(txn, topic_id).await?;
                insert_question(txn, topic_id, req, position).await?
            }
        };

        if let Some(choices) = entry.choices {
            merge_choices(txn, exam_id, question_id, choices).await?;
        }
    }
    Ok(())
}

/// 合并主题列表：带 id 但不属于该考试的条目被跳过
async fn merge_topics(
    txn: &DatabaseTransaction,
    exam_id: Uuid,
    entries: Vec<UpdateTopicRequest>,
) -> Result<()> {
    for entry in entries {
        let topic_id = match entry.id {
            Some(topic_id) => {
                let existing = topics::Entity::find_by_id(topic_id)
                    .filter(topics::Column::ExamId.eq(exam_id))
                    .one(txn)
                    .await
                    .map_err(db_err("查询主题失败"))?;
                let Some(existing) = existing else {
                    debug!("跳过不存在的主题 {} (考试 {})", topic_id, exam_id);
                    continue;
                };

                if let Some(name) = entry.name {
                    let mut model = existing.into_active_model();
                    model.name = Set(name);
                    model.update(txn).await.map_err(db_err("更新主题失败"))?;
                }
                topic_id
            }
            None => {
                let name = entry
                    .name
                    .ok_or_else(|| ExamSystemError::validation("Topic name is required"))?;
                let position = next_topic_position(txn, exam_id).await?;
                insert_topic(txn, exam_id, name, position).await?
            }
        };

        if let Some(questions) = entry.questions {
            merge_questions(txn, exam_id, topic_id, questions).await?;
        }
    }
    Ok(())
}

impl SeaOrmStorage {
    /// 创建整棵考试树，任何一步失败都会回滚
    pub async fn create_exam_impl(&self, owner: Uuid, req: CreateExamRequest) -> Result<Exam> {
        let now = chrono::Utc::now().timestamp();
        let exam_id = Uuid::new_v4();

        let txn = self.db.begin().await.map_err(db_err("开启事务失败"))?;

        let exam = exams::ActiveModel {
            id: Set(exam_id),
            title: Set(req.title),
            total_questions: Set(req.total_questions),
            time_duration: Set(req.time_duration),
            description: Set(req.description),
            passing_rate: Set(req.passing_rate),
            created_by: Set(owner),
            cover_photo: Set(None),
            enrollees: Set(req.enrollees),
            exam_topic: Set(req.exam_topic),
            grading_system: Set(req.grading_system),
            number_of_items: Set(req.number_of_items),
            created_at: Set(now),
            updated_at: Set(now),
        };
        exam.insert(&txn).await.map_err(db_err("创建考试失败"))?;

        for (topic_index, topic) in req.topics.into_iter().enumerate() {
            let topic_id = insert_topic(&txn, exam_id, topic.name, topic_index as i32).await?;
            for (question_index, question) in topic.questions.into_iter().enumerate() {
                insert_question(&txn, topic_id, question, question_index as i32).await?;
            }
        }

        txn.commit().await.map_err(db_err("提交事务失败"))?;

        self.get_exam_by_id_impl(exam_id)
            .await?
            .ok_or_else(|| ExamSystemError::database_operation("创建后未找到考试"))
    }

    /// 设置封面图片路径
    pub async fn set_exam_cover_photo_impl(&self, exam_id: Uuid, cover_photo: &str) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = exams::Entity::update_many()
            .col_expr(
                exams::Column::CoverPhoto,
                sea_orm::sea_query::Expr::value(cover_photo),
            )
            .col_expr(exams::Column::UpdatedAt, sea_orm::sea_query::Expr::value(now))
            .filter(exams::Column::Id.eq(exam_id))
            .exec(&self.db)
            .await
            .map_err(db_err("更新考试封面失败"))?;

        Ok(result.rows_affected > 0)
    }

    /// 获取完整考试树
    pub async fn get_exam_by_id_impl(&self, exam_id: Uuid) -> Result<Option<Exam>> {
        let Some(model) = exams::Entity::find_by_id(exam_id)
            .one(&self.db)
            .await
            .map_err(db_err("查询考试失败"))?
        else {
            return Ok(None);
        };

        Ok(load_exam_trees(&self.db, vec![model]).await?.pop())
    }

    pub async fn get_exam_owner_impl(&self, exam_id: Uuid) -> Result<Option<Uuid>> {
        exams::Entity::find_by_id(exam_id)
            .select_only()
            .column(exams::Column::CreatedBy)
            .into_tuple::<Uuid>()
            .one(&self.db)
            .await
            .map_err(db_err("查询考试所有者失败"))
    }

    /// 列出考官拥有的考试
    pub async fn list_exams_by_owner_impl(&self, owner: Uuid) -> Result<Vec<Exam>> {
        let models = exams::Entity::find()
            .filter(exams::Column::CreatedBy.eq(owner))
            .order_by_asc(exams::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err("查询考试列表失败"))?;

        load_exam_trees(&self.db, models).await
    }

    /// 部分更新考试树，所有改动在同一事务内完成
    pub async fn update_exam_impl(
        &self,
        exam_id: Uuid,
        update: UpdateExamRequest,
    ) -> Result<Option<Exam>> {
        let txn = self.db.begin().await.map_err(db_err("开启事务失败"))?;

        let Some(existing) = exams::Entity::find_by_id(exam_id)
            .one(&txn)
            .await
            .map_err(db_err("查询考试失败"))?
        else {
            return Ok(None);
        };

        // created_by 不可修改
        let mut model = existing.into_active_model();
        if let Some(title) = update.title {
            model.title = Set(title);
        }
        if let Some(total_questions) = update.total_questions {
            model.total_questions = Set(total_questions);
        }
        if let Some(time_duration) = update.time_duration {
            model.time_duration = Set(time_duration);
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }
        if let Some(passing_rate) = update.passing_rate {
            model.passing_rate = Set(passing_rate);
        }
        if let Some(enrollees) = update.enrollees {
            model.enrollees = Set(enrollees);
        }
        if let Some(exam_topic) = update.exam_topic {
            model.exam_topic = Set(exam_topic);
        }
        if let Some(grading_system) = update.grading_system {
            model.grading_system = Set(grading_system);
        }
        if let Some(number_of_items) = update.number_of_items {
            model.number_of_items = Set(number_of_items);
        }
        model.updated_at = Set(chrono::Utc::now().timestamp());
        model.update(&txn).await.map_err(db_err("更新考试失败"))?;

        if let Some(topics) = update.topics {
            merge_topics(&txn, exam_id, topics).await?;
        }

        txn.commit().await.map_err(db_err("提交事务失败"))?;

        self.get_exam_by_id_impl(exam_id).await
    }

    pub async fn delete_exam_impl(&self, exam_id: Uuid) -> Result<bool> {
        let result = exams::Entity::delete_by_id(exam_id)
            .exec(&self.db)
            .await
            .map_err(db_err("删除考试失败"))?;

        Ok(result.rows_affected > 0)
    }

    /// 查找子节点所属考试
    pub async fn resolve_exam_node_impl(&self, node: ExamNode) -> Result<Option<Uuid>> {
        let topic_id = match node {
            ExamNode::Topic(topic_id) => topic_id,
            ExamNode::Question(question_id) => {
                let Some(question) = questions::Entity::find_by_id(question_id)
                    .one(&self.db)
                    .await
                    .map_err(db_err("查询题目失败"))?
                else {
                    return Ok(None);
                };
                question.topic_id
            }
            ExamNode::Choice(choice_id) => {
                let Some(choice) = choices::Entity::find_by_id(choice_id)
                    .one(&self.db)
                    .await
                    .map_err(db_err("查询选项失败"))?
                else {
                    return Ok(None);
                };
                let Some(question) = questions::Entity::find_by_id(choice.question_id)
                    .one(&self.db)
                    .await
                    .map_err(db_err("查询题目失败"))?
                else {
                    return Ok(None);
                };
                question.topic_id
            }
        };

        let topic = topics::Entity::find_by_id(topic_id)
            .one(&self.db)
            .await
            .map_err(db_err("查询主题失败"))?;

        Ok(topic.map(|t| t.exam_id))
    }

    /// 删除单个子节点，其下级由外键级联删除
    pub async fn delete_exam_node_impl(&self, node: ExamNode) -> Result<bool> {
        let result = match node {
            ExamNode::Topic(id) => topics::Entity::delete_by_id(id).exec(&self.db).await,
            ExamNode::Question(id) => questions::Entity::delete_by_id(id).exec(&self.db).await,
            ExamNode::Choice(id) => choices::Entity::delete_by_id(id).exec(&self.db).await,
        }
        .map_err(db_err("删除考试节点失败"))?;

        Ok(result.rows_affected > 0)
    }
}
