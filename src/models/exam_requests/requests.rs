use serde::Deserialize;
use ts_rs::TS;
use uuid::Uuid;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "exam_request.ts")]
pub struct CreateExamRequestRequest {
    pub exam_id: Uuid,
}
