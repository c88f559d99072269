//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod exam_requests;
mod exams;
mod principals;

use crate::config::DatabaseConfig;
use crate::errors::{ExamSystemError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 连接数据库并运行迁移
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let db_url = Self::build_database_url(&config.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| ExamSystemError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + 外键约束）
    async fn connect_sqlite(url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        // 内存数据库随连接关闭而消失，不能回收空闲连接
        let in_memory = url.contains(":memory:");

        let mut opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| ExamSystemError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5));
        if !in_memory {
            opt = opt
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal)
                .pragma("cache_size", "-64000")
                .pragma("temp_store", "memory");
        }

        let mut pool = SqlitePoolOptions::new()
            .max_connections(config.pool_size.max(1))
            .min_connections(1)
            .acquire_timeout(Duration::from_secs(config.timeout));
        pool = if in_memory {
            pool.idle_timeout(None).max_lifetime(None)
        } else {
            pool.test_before_acquire(true)
                .idle_timeout(Duration::from_secs(300))
        };

        let pool = pool
            .connect_with(opt)
            .await
            .map_err(|e| ExamSystemError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.pool_size)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(config.timeout))
            .acquire_timeout(Duration::from_secs(config.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| ExamSystemError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url == ":memory:" {
            Ok("sqlite::memory:".to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(ExamSystemError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite:, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

/// 数据库错误转换的简写
pub(crate) fn db_err(context: &'static str) -> impl Fn(sea_orm::DbErr) -> ExamSystemError {
    move |e| ExamSystemError::database_operation(format!("{context}: {e}"))
}

/// 插入或更新时唯一索引冲突视为重复，其余错误同 [`db_err`]
///
/// 并发请求可能同时通过先查后写的检查，此时由唯一索引兜底。
pub(crate) fn unique_err(
    context: &'static str,
    duplicate: &'static str,
) -> impl Fn(sea_orm::DbErr) -> ExamSystemError {
    move |e| match e.sql_err() {
        Some(sea_orm::SqlErr::UniqueConstraintViolation(_)) => {
            ExamSystemError::duplicate(duplicate)
        }
        _ => ExamSystemError::database_operation(format!("{context}: {e}")),
    }
}

// Storage trait 实现
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
use crate::storage::{ExamNode, ExamRequestScope, Storage};
use async_trait::async_trait;
use uuid::Uuid;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 主体模块
    async fn create_principal(
        &self,
        kind: PrincipalKind,
        req: CreatePrincipalRequest,
    ) -> Result<Principal> {
        self.create_principal_impl(kind, req).await
    }

    async fn get_principal_by_id(
        &self,
        kind: PrincipalKind,
        id: Uuid,
    ) -> Result<Option<Principal>> {
        self.get_principal_by_id_impl(kind, id).await
    }

    async fn get_principal_by_email(
        &self,
        kind: PrincipalKind,
        email: &str,
    ) -> Result<Option<Principal>> {
        self.get_principal_by_email_impl(kind, email).await
    }

    async fn list_principals(&self, kind: PrincipalKind) -> Result<Vec<Principal>> {
        self.list_principals_impl(kind).await
    }

    async fn update_principal(
        &self,
        kind: PrincipalKind,
        id: Uuid,
        update: UpdatePrincipalRequest,
    ) -> Result<Option<Principal>> {
        self.update_principal_impl(kind, id, update).await
    }

    async fn delete_principal(&self, kind: PrincipalKind, id: Uuid) -> Result<bool> {
        self.delete_principal_impl(kind, id).await
    }

    async fn count_principals(&self, kind: PrincipalKind) -> Result<u64> {
        self.count_principals_impl(kind).await
    }

    // 考试模块
    async fn create_exam(&self, owner: Uuid, req: CreateExamRequest) -> Result<Exam> {
        self.create_exam_impl(owner, req).await
    }

    async fn set_exam_cover_photo(&self, exam_id: Uuid, cover_photo: &str) -> Result<bool> {
        self.set_exam_cover_photo_impl(exam_id, cover_photo).await
    }

    async fn get_exam_by_id(&self, exam_id: Uuid) -> Result<Option<Exam>> {
        self.get_exam_by_id_impl(exam_id).await
    }

    async fn get_exam_owner(&self, exam_id: Uuid) -> Result<Option<Uuid>> {
        self.get_exam_owner_impl(exam_id).await
    }

    async fn list_exams_by_owner(&self, owner: Uuid) -> Result<Vec<Exam>> {
        self.list_exams_by_owner_impl(owner).await
    }

    async fn update_exam(&self, exam_id: Uuid, update: UpdateExamRequest) -> Result<Option<Exam>> {
        self.update_exam_impl(exam_id, update).await
    }

    async fn delete_exam(&self, exam_id: Uuid) -> Result<bool> {
        self.delete_exam_impl(exam_id).await
    }

    async fn resolve_exam_node(&self, node: ExamNode) -> Result<Option<Uuid>> {
        self.resolve_exam_node_impl(node).await
    }

    async fn delete_exam_node(&self, node: ExamNode) -> Result<bool> {
        self.delete_exam_node_impl(node).await
    }

    // 考试申请模块
    async fn create_exam_request(
        &self,
        examinee_id: Uuid,
        exam_id: Uuid,
    ) -> Result<ExamRequest> {
        self.create_exam_request_impl(examinee_id, exam_id).await
    }

    async fn get_exam_request_by_id(
        &self,
        request_id: Uuid,
    ) -> Result<Option<ExamRequestDetail>> {
        self.get_exam_request_by_id_impl(request_id).await
    }

    async fn list_exam_requests(&self, scope: ExamRequestScope) -> Result<Vec<ExamRequestDetail>> {
        self.list_exam_requests_impl(scope).await
    }

    async fn approve_exam_request(&self, request_id: Uuid) -> Result<Examinee> {
        self.approve_exam_request_impl(request_id).await
    }

    async fn delete_exam_request(&self, request_id: Uuid) -> Result<bool> {
        self.delete_exam_request_impl(request_id).await
    }

    async fn get_enrollment(
        &self,
        examinee_id: Uuid,
        exam_id: Uuid,
    ) -> Result<Option<Enrollment>> {
        self.get_enrollment_impl(examinee_id, exam_id).await
    }
}
