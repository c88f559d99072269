use std::sync::Arc;

use uuid::Uuid;

use crate::config::DatabaseConfig;
use crate::errors::Result;
use crate::models::{
    exam_requests::{
        entities::{Enrollment, ExamRequest},
        responses::ExamRequestDetail,
    },
    exams::{
        entities::Exam,
        requests::{CreateExamRequest, UpdateExamRequest},
    },
    principals::{
        entities::{Examinee, Principal, PrincipalKind},
        requests::{CreatePrincipalRequest, UpdatePrincipalRequest},
    },
};

pub mod sea_orm_storage;

/// 考试树中可单独删除的子节点
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExamNode {
    Topic(Uuid),
    Question(Uuid),
    Choice(Uuid),
}

impl ExamNode {
    pub fn label(&self) -> &'static str {
        match self {
            ExamNode::Topic(_) => "Topic",
            ExamNode::Question(_) => "Question",
            ExamNode::Choice(_) => "Choice",
        }
    }
}

/// 考试申请列表的可见范围
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExamRequestScope {
    /// 考官拥有的考试
    OwnedBy(Uuid),
    /// 考生自己的申请
    RequestedBy(Uuid),
    All,
}

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 主体管理方法
    // 创建主体，password 字段需已哈希
    async fn create_principal(
        &self,
        kind: PrincipalKind,
        req: CreatePrincipalRequest,
    ) -> Result<Principal>;
    // 通过ID获取指定类型的主体
    async fn get_principal_by_id(&self, kind: PrincipalKind, id: Uuid)
    -> Result<Option<Principal>>;
    // 通过邮箱获取指定类型的主体
    async fn get_principal_by_email(
        &self,
        kind: PrincipalKind,
        email: &str,
    ) -> Result<Option<Principal>>;
    // 列出指定类型的全部主体
    async fn list_principals(&self, kind: PrincipalKind) -> Result<Vec<Principal>>;
    // 部分更新主体，password 字段需已哈希
    async fn update_principal(
        &self,
        kind: PrincipalKind,
        id: Uuid,
        update: UpdatePrincipalRequest,
    ) -> Result<Option<Principal>>;
    // 删除主体
    async fn delete_principal(&self, kind: PrincipalKind, id: Uuid) -> Result<bool>;
    // 统计指定类型的主体数量
    async fn count_principals(&self, kind: PrincipalKind) -> Result<u64>;

    /// 按解析顺序在三类主体中查找 id
    async fn find_principal_by_id(&self, id: Uuid) -> Result<Option<Principal>> {
        for kind in PrincipalKind::resolution_order() {
            if let Some(principal) = self.get_principal_by_id(*kind, id).await? {
                return Ok(Some(principal));
            }
        }
        Ok(None)
    }

    /// 按解析顺序在三类主体中查找邮箱，返回第一个命中
    async fn find_principal_by_email(&self, email: &str) -> Result<Option<Principal>> {
        for kind in PrincipalKind::resolution_order() {
            if let Some(principal) = self.get_principal_by_email(*kind, email).await? {
                return Ok(Some(principal));
            }
        }
        Ok(None)
    }

    /// 考试管理方法
    // 在一个事务中创建整棵考试树
    async fn create_exam(&self, owner: Uuid, req: CreateExamRequest) -> Result<Exam>;
    // 设置考试封面
    async fn set_exam_cover_photo(&self, exam_id: Uuid, cover_photo: &str) -> Result<bool>;
    // 获取完整考试树
    async fn get_exam_by_id(&self, exam_id: Uuid) -> Result<Option<Exam>>;
    // 只读取考试的所有者，不加载子节点
    async fn get_exam_owner(&self, exam_id: Uuid) -> Result<Option<Uuid>>;
    // 列出考官拥有的考试
    async fn list_exams_by_owner(&self, owner: Uuid) -> Result<Vec<Exam>>;
    // 在一个事务中部分更新考试树
    async fn update_exam(&self, exam_id: Uuid, update: UpdateExamRequest) -> Result<Option<Exam>>;
    // 删除考试（级联）
    async fn delete_exam(&self, exam_id: Uuid) -> Result<bool>;
    // 查找子节点所属的考试
    async fn resolve_exam_node(&self, node: ExamNode) -> Result<Option<Uuid>>;
    // 删除子节点（级联）
    async fn delete_exam_node(&self, node: ExamNode) -> Result<bool>;

    /// 考试申请方法
    // 创建申请及待批准的报名记录
    async fn create_exam_request(&self, examinee_id: Uuid, exam_id: Uuid)
    -> Result<ExamRequest>;
    // 获取申请详情
    async fn get_exam_request_by_id(&self, request_id: Uuid)
    -> Result<Option<ExamRequestDetail>>;
    // 按范围列出申请
    async fn list_exam_requests(&self, scope: ExamRequestScope) -> Result<Vec<ExamRequestDetail>>;
    // 批准申请并同步报名记录，返回更新后的考生
    async fn approve_exam_request(&self, request_id: Uuid) -> Result<Examinee>;
    // 删除申请及对应的报名记录
    async fn delete_exam_request(&self, request_id: Uuid) -> Result<bool>;
    // 获取报名记录
    async fn get_enrollment(&self, examinee_id: Uuid, exam_id: Uuid)
    -> Result<Option<Enrollment>>;
}

pub async fn create_storage(config: &DatabaseConfig) -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::connect(config).await?;
    Ok(Arc::new(storage))
}
