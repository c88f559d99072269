use super::entities::Exam;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "exam.ts")]
pub struct ExamListResponse {
    pub items: Vec<Exam>,
}
