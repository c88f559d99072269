use serde::Deserialize;
use ts_rs::TS;
use uuid::Uuid;

// 创建考试时的选项
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "exam.ts")]
pub struct CreateChoiceRequest {
    pub option: String,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "exam.ts")]
pub struct CreateQuestionRequest {
    pub question: String,
    pub correct_answer: String,
    #[serde(default)]
    pub answer_temp: Option<String>,
    #[serde(default)]
    pub options_temp: Option<String>,
    #[serde(default)]
    pub choices: Vec<CreateChoiceRequest>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "exam.ts")]
pub struct CreateTopicRequest {
    pub name: String,
    #[serde(default)]
    pub questions: Vec<CreateQuestionRequest>,
}

/// 创建考试请求，一次提交整棵树
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "exam.ts")]
pub struct CreateExamRequest {
    pub title: String,
    pub total_questions: i32,
    pub time_duration: i32,
    #[serde(default)]
    pub description: Option<String>,
    pub passing_rate: f64,
    #[serde(default)]
    pub enrollees: i32,
    pub exam_topic: String,
    pub grading_system: String,
    pub number_of_items: i32,
    #[serde(default)]
    pub topics: Vec<CreateTopicRequest>,
}

// 部分更新：带 id 的条目合并到已有节点，不带 id 的条目作为新节点追加

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "exam.ts")]
pub struct UpdateChoiceRequest {
    pub id: Option<Uuid>,
    pub option: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "exam.ts")]
pub struct UpdateQuestionRequest {
    pub id: Option<Uuid>,
    pub question: Option<String>,
    pub correct_answer: Option<String>,
    pub answer_temp: Option<String>,
    pub options_temp: Option<String>,
    pub choices: Option<Vec<UpdateChoiceRequest>>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "exam.ts")]
pub struct UpdateTopicRequest {
    pub id: Option<Uuid>,
    pub name: Option<String>,
    pub questions: Option<Vec<UpdateQuestionRequest>>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "exam.ts")]
pub struct UpdateExamRequest {
    pub title: Option<String>,
    pub total_questions: Option<i32>,
    pub time_duration: Option<i32>,
    pub description: Option<String>,
    pub passing_rate: Option<f64>,
    pub enrollees: Option<i32>,
    pub exam_topic: Option<String>,
    pub grading_system: Option<String>,
    pub number_of_items: Option<i32>,
    pub topics: Option<Vec<UpdateTopicRequest>>,
}
