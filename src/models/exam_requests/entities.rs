use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

pub const STATUS_PENDING: &str = "Pending";
pub const STATUS_APPROVED: &str = "Approved";

// 考试申请
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "exam_request.ts")]
pub struct ExamRequest {
    pub id: Uuid,
    pub exam_id: Uuid,
    pub examinee_id: Uuid,
    pub status: String,
    pub is_approved: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 报名记录（考生与考试的关联），不单独对外暴露
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "exam_request.ts")]
pub struct Enrollment {
    pub examinee_id: Uuid,
    pub exam_id: Uuid,
    pub is_approved: bool,
}
