use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

// 选项
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "exam.ts")]
pub struct Choice {
    pub id: Uuid,
    pub question_id: Uuid,
    pub option: String,
}

// 题目
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "exam.ts")]
pub struct Question {
    pub id: Uuid,
    pub topic_id: Uuid,
    pub question: String,
    pub correct_answer: String,
    pub answer_temp: Option<String>,
    pub options_temp: Option<String>,
    pub choices: Vec<Choice>,
}

// 主题
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "exam.ts")]
pub struct Topic {
    pub id: Uuid,
    pub exam_id: Uuid,
    pub name: String,
    pub questions: Vec<Question>,
}

/// 考试聚合根，拥有主题、题目和选项
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "exam.ts")]
pub struct Exam {
    pub id: Uuid,
    pub title: String,
    pub total_questions: i32,
    /// 分钟
    pub time_duration: i32,
    pub description: Option<String>,
    pub passing_rate: f64,
    /// 创建考试的考官，创建后不可修改
    pub created_by: Uuid,
    pub cover_photo: Option<String>,
    pub enrollees: i32,
    pub exam_topic: String,
    pub grading_system: String,
    pub number_of_items: i32,
    pub topics: Vec<Topic>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Exam {
    pub fn question_count(&self) -> usize {
        self.topics.iter().map(|t| t.questions.len()).sum()
    }

    pub fn choice_count(&self) -> usize {
        self.topics
            .iter()
            .flat_map(|t| t.questions.iter())
            .map(|q| q.choices.len())
            .sum()
    }
}
