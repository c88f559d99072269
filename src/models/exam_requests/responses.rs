use super::entities::ExamRequest;
use crate::models::exams::entities::Exam;
use crate::models::principals::entities::Examinee;
use serde::Serialize;
use ts_rs::TS;

/// 申请详情，附带完整考试与考生信息
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "exam_request.ts")]
pub struct ExamRequestDetail {
    #[serde(flatten)]
    #[ts(flatten)]
    pub request: ExamRequest,
    pub exam: Exam,
    pub examinee: Examinee,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "exam_request.ts")]
pub struct ExamRequestListResponse {
    pub items: Vec<ExamRequestDetail>,
}
