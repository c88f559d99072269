use super::{SeaOrmStorage, db_err, unique_err};
use crate::entity::{admins, examinee_exams, examinees, examiners};
use crate::errors::{ExamSystemError, Result};
use crate::models::principals::{
    entities::{DEFAULT_STATUS, Examinee, Principal, PrincipalKind},
    requests::{CreatePrincipalRequest, UpdatePrincipalRequest},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

const EMAIL_IN_USE: &str = "Email is already in use";

/// 考生已批准报名的考试 id
pub(crate) async fn approved_exam_ids<C: ConnectionTrait>(
    conn: &C,
    examinee_id: Uuid,
) -> Result<Vec<Uuid>> {
    examinee_exams::Entity::find()
        .select_only()
        .column(examinee_exams::Column::ExamId)
        .filter(examinee_exams::Column::ExamineeId.eq(examinee_id))
        .filter(examinee_exams::Column::IsApproved.eq(true))
        .into_tuple::<Uuid>()
        .all(conn)
        .await
        .map_err(db_err("查询报名记录失败"))
}

/// 读取考生并附带已批准的考试
pub(crate) async fn load_examinee<C: ConnectionTrait>(
    conn: &C,
    examinee_id: Uuid,
) -> Result<Option<Examinee>> {
    let Some(model) = examinees::Entity::find_by_id(examinee_id)
        .one(conn)
        .await
        .map_err(db_err("查询考生失败"))?
    else {
        return Ok(None);
    };
    let exam_ids = approved_exam_ids(conn, examinee_id).await?;
    Ok(Some(model.into_examinee(exam_ids)))
}

impl SeaOrmStorage {
    /// 创建主体，同类型内邮箱唯一
    pub async fn create_principal_impl(
        &self,
        kind: PrincipalKind,
        req: CreatePrincipalRequest,
    ) -> Result<Principal> {
        if self.get_principal_by_email_impl(kind, &req.email).await?.is_some() {
            return Err(ExamSystemError::duplicate(EMAIL_IN_USE));
        }

        let now = chrono::Utc::now().timestamp();
        let id = Uuid::new_v4();

        let principal = match kind {
            PrincipalKind::Examinee => {
                let model = examinees::ActiveModel {
                    id: Set(id),
                    email: Set(req.email),
                    email_auth: Set(req.email_auth.unwrap_or(false)),
                    first_name: Set(req.first_name),
                    last_name: Set(req.last_name),
                    password_hash: Set(req.password),
                    phone_number: Set(req.phone_number.unwrap_or_default()),
                    profile_image: Set(req.profile_image),
                    status: Set(DEFAULT_STATUS.to_string()),
                    four_digit_code: Set(req.four_digit_code),
                    created_at: Set(now),
                    updated_at: Set(now),
                };
                let result = model
                    .insert(&self.db)
                    .await
                    .map_err(unique_err("创建考生失败", EMAIL_IN_USE))?;
                Principal::Examinee(result.into_examinee(Vec::new()))
            }
            PrincipalKind::Examiner => {
                let model = examiners::ActiveModel {
                    id: Set(id),
                    email: Set(req.email),
                    first_name: Set(req.first_name),
                    last_name: Set(req.last_name),
                    password_hash: Set(req.password),
                    profile_image: Set(req.profile_image),
                    status: Set(DEFAULT_STATUS.to_string()),
                    created_at: Set(now),
                    updated_at: Set(now),
                };
                let result = model
                    .insert(&self.db)
                    .await
                    .map_err(unique_err("创建考官失败", EMAIL_IN_USE))?;
                Principal::Examiner(result.into_account())
            }
            PrincipalKind::Administrator => {
                let model = admins::ActiveModel {
                    id: Set(id),
                    email: Set(req.email),
                    first_name: Set(req.first_name),
                    last_name: Set(req.last_name),
                    password_hash: Set(req.password),
                    profile_image: Set(req.profile_image),
                    status: Set(DEFAULT_STATUS.to_string()),
                    created_at: Set(now),
                    updated_at: Set(now),
                };
                let result = model
                    .insert(&self.db)
                    .await
                    .map_err(unique_err("创建管理员失败", EMAIL_IN_USE))?;
                Principal::Administrator(result.into_account())
            }
        };

        Ok(principal)
    }

    /// 通过 ID 获取主体
    pub async fn get_principal_by_id_impl(
        &self,
        kind: PrincipalKind,
        id: Uuid,
    ) -> Result<Option<Principal>> {
        let principal = match kind {
            PrincipalKind::Examinee => load_examinee(&self.db, id).await?.map(Principal::Examinee),
            PrincipalKind::Examiner => examiners::Entity::find_by_id(id)
                .one(&self.db)
                .await
                .map_err(db_err("查询考官失败"))?
                .map(|m| Principal::Examiner(m.into_account())),
            PrincipalKind::Administrator => admins::Entity::find_by_id(id)
                .one(&self.db)
                .await
                .map_err(db_err("查询管理员失败"))?
                .map(|m| Principal::Administrator(m.into_account())),
        };
        Ok(principal)
    }

    /// 通过邮箱获取主体
    pub async fn get_principal_by_email_impl(
        &self,
        kind: PrincipalKind,
        email: &str,
    ) -> Result<Option<Principal>> {
        let principal = match kind {
            PrincipalKind::Examinee => {
                let model = examinees::Entity::find()
                    .filter(examinees::Column::Email.eq(email))
                    .one(&self.db)
                    .await
                    .map_err(db_err("查询考生失败"))?;
                match model {
                    Some(m) => {
                        let exam_ids = approved_exam_ids(&self.db, m.id).await?;
                        Some(Principal::Examinee(m.into_examinee(exam_ids)))
                    }
                    None => None,
                }
            }
            PrincipalKind::Examiner => examiners::Entity::find()
                .filter(examiners::Column::Email.eq(email))
                .one(&self.db)
                .await
                .map_err(db_err("查询考官失败"))?
                .map(|m| Principal::Examiner(m.into_account())),
            PrincipalKind::Administrator => admins::Entity::find()
                .filter(admins::Column::Email.eq(email))
                .one(&self.db)
                .await
                .map_err(db_err("查询管理员失败"))?
                .map(|m| Principal::Administrator(m.into_account())),
        };
        Ok(principal)
    }

    /// 列出指定类型的主体，按创建时间排序
    pub async fn list_principals_impl(&self, kind: PrincipalKind) -> Result<Vec<Principal>> {
        let principals = match kind {
            PrincipalKind::Examinee => {
                let models = examinees::Entity::find()
                    .order_by_asc(examinees::Column::CreatedAt)
                    .all(&self.db)
                    .await
                    .map_err(db_err("查询考生列表失败"))?;

                // 一次取出全部已批准的报名记录
                let approved = examinee_exams::Entity::find()
                    .filter(examinee_exams::Column::IsApproved.eq(true))
                    .all(&self.db)
                    .await
                    .map_err(db_err("查询报名记录失败"))?;

                models
                    .into_iter()
                    .map(|m| {
                        let exam_ids = approved
                            .iter()
                            .filter(|e| e.examinee_id == m.id)
                            .map(|e| e.exam_id)
                            .collect();
                        Principal::Examinee(m.into_examinee(exam_ids))
                    })
                    .collect()
            }
            PrincipalKind::Examiner => examiners::Entity::find()
                .order_by_asc(examiners::Column::CreatedAt)
                .all(&self.db)
                .await
                .map_err(db_err("查询考官列表失败"))?
                .into_iter()
                .map(|m| Principal::Examiner(m.into_account()))
                .collect(),
            PrincipalKind::Administrator => admins::Entity::find()
                .order_by_asc(admins::Column::CreatedAt)
                .all(&self.db)
                .await
                .map_err(db_err("查询管理员列表失败"))?
                .into_iter()
                .map(|m| Principal::Administrator(m.into_account()))
                .collect(),
        };
        Ok(principals)
    }

    /// 部分更新主体，只覆盖请求中出现的字段
    pub async fn update_principal_impl(
        &self,
        kind: PrincipalKind,
        id: Uuid,
        update: UpdatePrincipalRequest,
    ) -> Result<Option<Principal>> {
        let Some(existing) = self.get_principal_by_id_impl(kind, id).await? else {
            return Ok(None);
        };

        // 邮箱变更时重新检查唯一性
        if let Some(ref email) = update.email
            && email != existing.email()
            && self.get_principal_by_email_impl(kind, email).await?.is_some()
        {
            return Err(ExamSystemError::duplicate(EMAIL_IN_USE));
        }

        let now = chrono::Utc::now().timestamp();

        match kind {
            PrincipalKind::Examinee => {
                let mut model = examinees::ActiveModel {
                    id: Set(id),
                    updated_at: Set(now),
                    ..Default::default()
                };
                if let Some(email) = update.email {
                    model.email = Set(email);
                }
                if let Some(password) = update.password {
                    model.password_hash = Set(password);
                }
                if let Some(first_name) = update.first_name {
                    model.first_name = Set(first_name);
                }
                if let Some(last_name) = update.last_name {
                    model.last_name = Set(last_name);
                }
                if let Some(status) = update.status {
                    model.status = Set(status);
                }
                if let Some(phone_number) = update.phone_number {
                    model.phone_number = Set(phone_number);
                }
                if let Some(email_auth) = update.email_auth {
                    model.email_auth = Set(email_auth);
                }
                if let Some(code) = update.four_digit_code {
                    model.four_digit_code = Set(Some(code));
                }
                if let Some(image) = update.profile_image {
                    model.profile_image = Set(Some(image));
                }
                model.update(&self.db).await.map_err(unique_err("更新考生失败", EMAIL_IN_USE))?;
            }
            PrincipalKind::Examiner => {
                let mut model = examiners::ActiveModel {
                    id: Set(id),
                    updated_at: Set(now),
                    ..Default::default()
                };
                if let Some(email) = update.email {
                    model.email = Set(email);
                }
                if let Some(password) = update.password {
                    model.password_hash = Set(password);
                }
                if let Some(first_name) = update.first_name {
                    model.first_name = Set(first_name);
                }
                if let Some(last_name) = update.last_name {
                    model.last_name = Set(last_name);
                }
                if let Some(status) = update.status {
                    model.status = Set(status);
                }
                if let Some(image) = update.profile_image {
                    model.profile_image = Set(Some(image));
                }
                model.update(&self.db).await.map_err(unique_err("更新考官失败", EMAIL_IN_USE))?;
            }
            PrincipalKind::Administrator => {
                let mut model = admins::ActiveModel {
                    id: Set(id),
                    updated_at: Set(now),
                    ..Default::default()
                };
                if let Some(email) = update.email {
                    model.email = Set(email);
                }
                if let Some(password) = update.password {
                    model.password_hash = Set(password);
                }
                if let Some(first_name) = update.first_name {
                    model.first_name = Set(first_name);
                }
                if let Some(last_name) = update.last_name {
                    model.last_name = Set(last_name);
                }
                if let Some(status) = update.status {
                    model.status = Set(status);
                }
                if let Some(image) = update.profile_image {
                    model.profile_image = Set(Some(image));
                }
                model.update(&self.db).await.map_err(unique_err("更新管理员失败", EMAIL_IN_USE))?;
            }
        }

        self.get_principal_by_id_impl(kind, id).await
    }

    /// 删除主体，关联的考试、报名记录和申请由外键级联删除
    pub async fn delete_principal_impl(&self, kind: PrincipalKind, id: Uuid) -> Result<bool> {
        let result = match kind {
            PrincipalKind::Examinee => examinees::Entity::delete_by_id(id).exec(&self.db).await,
            PrincipalKind::Examiner => examiners::Entity::delete_by_id(id).exec(&self.db).await,
            PrincipalKind::Administrator => admins::Entity::delete_by_id(id).exec(&self.db).await,
        }
        .map_err(db_err("删除主体失败"))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn count_principals_impl(&self, kind: PrincipalKind) -> Result<u64> {
        let count = match kind {
            PrincipalKind::Examinee => examinees::Entity::find().count(&self.db).await,
            PrincipalKind::Examiner => examiners::Entity::find().count(&self.db).await,
            PrincipalKind::Administrator => admins::Entity::find().count(&self.db).await,
        }
        .map_err(db_err("统计主体数量失败"))?;

        Ok(count)
    }
}
