//! 考试申请与报名记录
//!
//! 申请与报名记录总是在同一事务中一起变更，保证报名记录的
//! is_approved 与申请状态一致。

use std::collections::HashMap;

use super::exams::load_exam_trees;
use super::principals::load_examinee;
use super::{SeaOrmStorage, db_err, unique_err};
use crate::entity::{exam_requests, examinee_exams, exams};
use crate::errors::{ExamSystemError, Result};
use crate::models::exam_requests::{
    entities::{Enrollment, ExamRequest, STATUS_APPROVED, STATUS_PENDING},
    responses::ExamRequestDetail,
};
use crate::models::principals::entities::Examinee;
use crate::storage::ExamRequestScope;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, JoinType,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};
use uuid::Uuid;

const ALREADY_REQUESTED: &str = "You have already requested this exam.";

/// 为申请附上完整考试与考生信息
async fn attach_details<C: ConnectionTrait>(
    conn: &C,
    requests: Vec<exam_requests::Model>,
) -> Result<Vec<ExamRequestDetail>> {
    if requests.is_empty() {
        return Ok(Vec::new());
    }

    let mut exam_ids: Vec<Uuid> = requests.iter().map(|r| r.exam_id).collect();
    exam_ids.sort();
    exam_ids.dedup();

    let exam_models = exams::Entity::find()
        .filter(exams::Column::Id.is_in(exam_ids))
        .all(conn)
        .await
        .map_err(db_err("查询考试失败"))?;
    let exams_by_id: HashMap<Uuid, _> = load_exam_trees(conn, exam_models)
        .await?
        .into_iter()
        .map(|exam| (exam.id, exam))
        .collect();

    let mut examinees_by_id: HashMap<Uuid, Examinee> = HashMap::new();
    for request in &requests {
        if examinees_by_id.contains_key(&request.examinee_id) {
            continue;
        }
        if let Some(examinee) = load_examinee(conn, request.examinee_id).await? {
            examinees_by_id.insert(request.examinee_id, examinee);
        }
    }

    // 外键级联保证考试和考生存在，缺失的记录直接跳过
    Ok(requests
        .into_iter()
        .filter_map(|request| {
            let exam = exams_by_id.get(&request.exam_id)?.clone();
            let examinee = examinees_by_id.get(&request.examinee_id)?.clone();
            Some(ExamRequestDetail {
                request: request.into_exam_request(),
                exam,
                examinee,
            })
        })
        .collect())
}

impl SeaOrmStorage {
    /// 创建申请，同时写入待批准的报名记录
    pub async fn create_exam_request_impl(
        &self,
        examinee_id: Uuid,
        exam_id: Uuid,
    ) -> Result<ExamRequest> {
        let txn = self.db.begin().await.map_err(db_err("开启事务失败"))?;

        let exam = exams::Entity::find_by_id(exam_id)
            .one(&txn)
            .await
            .map_err(db_err("查询考试失败"))?;
        if exam.is_none() {
            return Err(ExamSystemError::not_found("Exam not found"));
        }

        let existing = exam_requests::Entity::find()
            .filter(exam_requests::Column::ExamId.eq(exam_id))
            .filter(exam_requests::Column::ExamineeId.eq(examinee_id))
            .one(&txn)
            .await
            .map_err(db_err("查询考试申请失败"))?;
        if existing.is_some() {
            return Err(ExamSystemError::duplicate(ALREADY_REQUESTED));
        }

        let now = chrono::Utc::now().timestamp();
        let request = exam_requests::ActiveModel {
            id: Set(Uuid::new_v4()),
            exam_id: Set(exam_id),
            examinee_id: Set(examinee_id),
            status: Set(STATUS_PENDING.to_string()),
            is_approved: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(unique_err("创建考试申请失败", ALREADY_REQUESTED))?;

        let enrollment = examinee_exams::Entity::find_by_id((examinee_id, exam_id))
            .one(&txn)
            .await
            .map_err(db_err("查询报名记录失败"))?;
        if enrollment.is_none() {
            examinee_exams::ActiveModel {
                examinee_id: Set(examinee_id),
                exam_id: Set(exam_id),
                is_approved: Set(false),
            }
            .insert(&txn)
            .await
            .map_err(db_err("创建报名记录失败"))?;
        }

        txn.commit().await.map_err(db_err("提交事务失败"))?;

        Ok(request.into_exam_request())
    }

    pub async fn get_exam_request_by_id_impl(
        &self,
        request_id: Uuid,
    ) -> Result<Option<ExamRequestDetail>> {
        let Some(request) = exam_requests::Entity::find_by_id(request_id)
            .one(&self.db)
            .await
            .map_err(db_err("查询考试申请失败"))?
        else {
            return Ok(None);
        };

        Ok(attach_details(&self.db, vec![request]).await?.pop())
    }

    pub async fn list_exam_requests_impl(
        &self,
        scope: ExamRequestScope,
    ) -> Result<Vec<ExamRequestDetail>> {
        let mut select = exam_requests::Entity::find();

        select = match scope {
            ExamRequestScope::OwnedBy(owner) => select
                .join(JoinType::InnerJoin, exam_requests::Relation::Exam.def())
                .filter(exams::Column::CreatedBy.eq(owner)),
            ExamRequestScope::RequestedBy(examinee_id) => {
                select.filter(exam_requests::Column::ExamineeId.eq(examinee_id))
            }
            ExamRequestScope::All => select,
        };

        let requests = select
            .order_by_asc(exam_requests::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err("查询考试申请列表失败"))?;

        attach_details(&self.db, requests).await
    }

    /// 批准申请：申请状态、报名记录在同一事务内更新
    pub async fn approve_exam_request_impl(&self, request_id: Uuid) -> Result<Examinee> {
        let txn = self.db.begin().await.map_err(db_err("开启事务失败"))?;

        let request = exam_requests::Entity::find_by_id(request_id)
            .one(&txn)
            .await
            .map_err(db_err("查询考试申请失败"))?
            .ok_or_else(|| ExamSystemError::not_found("Exam request not found"))?;

        if request.is_approved {
            return Err(ExamSystemError::conflict(
                "This exam request has already been approved.",
            ));
        }

        let examinee_id = request.examinee_id;
        let exam_id = request.exam_id;

        let mut model = request.into_active_model();
        model.status = Set(STATUS_APPROVED.to_string());
        model.is_approved = Set(true);
        model.updated_at = Set(chrono::Utc::now().timestamp());
        model.update(&txn).await.map_err(db_err("更新考试申请失败"))?;

        let enrollment = examinee_exams::Entity::find_by_id((examinee_id, exam_id))
            .one(&txn)
            .await
            .map_err(db_err("查询报名记录失败"))?;
        match enrollment {
            Some(enrollment) => {
                let mut enrollment = enrollment.into_active_model();
                enrollment.is_approved = Set(true);
                enrollment
                    .update(&txn)
                    .await
                    .map_err(db_err("更新报名记录失败"))?;
            }
            None => {
                examinee_exams::ActiveModel {
                    examinee_id: Set(examinee_id),
                    exam_id: Set(exam_id),
                    is_approved: Set(true),
                }
                .insert(&txn)
                .await
                .map_err(db_err("创建报名记录失败"))?;
            }
        }

        txn.commit().await.map_err(db_err("提交事务失败"))?;

        load_examinee(&self.db, examinee_id)
            .await?
            .ok_or_else(|| ExamSystemError::not_found("Examinee not found"))
    }

    /// 删除申请及同一 (考生, 考试) 的报名记录
    pub async fn delete_exam_request_impl(&self, request_id: Uuid) -> Result<bool> {
        let txn = self.db.begin().await.map_err(db_err("开启事务失败"))?;

        let Some(request) = exam_requests::Entity::find_by_id(request_id)
            .one(&txn)
            .await
            .map_err(db_err("查询考试申请失败"))?
        else {
            return Ok(false);
        };

        examinee_exams::Entity::delete_many()
            .filter(examinee_exams::Column::ExamineeId.eq(request.examinee_id))
            .filter(examinee_exams::Column::ExamId.eq(request.exam_id))
            .exec(&txn)
            .await
            .map_err(db_err("删除报名记录失败"))?;

        exam_requests::Entity::delete_by_id(request_id)
            .exec(&txn)
            .await
            .map_err(db_err("删除考试申请失败"))?;

        txn.commit().await.map_err(db_err("提交事务失败"))?;

        Ok(true)
    }

    pub async fn get_enrollment_impl(
        &self,
        examinee_id: Uuid,
        exam_id: Uuid,
    ) -> Result<Option<Enrollment>> {
        let enrollment = examinee_exams::Entity::find_by_id((examinee_id, exam_id))
            .one(&self.db)
            .await
            .map_err(db_err("查询报名记录失败"))?;

        Ok(enrollment.map(|e| e.into_enrollment()))
    }
}
