//! 预导入模块，方便使用

pub use super::admins::{ActiveModel as AdminActiveModel, Entity as Admins, Model as AdminModel};
pub use super::choices::{
    ActiveModel as ChoiceActiveModel, Entity as Choices, Model as ChoiceModel,
};
pub use super::exam_requests::{
    ActiveModel as ExamRequestActiveModel, Entity as ExamRequests, Model as ExamRequestModel,
};
pub use super::examinee_exams::{
    ActiveModel as ExamineeExamActiveModel, Entity as ExamineeExams, Model as ExamineeExamModel,
};
pub use super::examinees::{
    ActiveModel as ExamineeActiveModel, Entity as Examinees, Model as ExamineeModel,
};
pub use super::examiners::{
    ActiveModel as ExaminerActiveModel, Entity as Examiners, Model as ExaminerModel,
};
pub use super::exams::{ActiveModel as ExamActiveModel, Entity as Exams, Model as ExamModel};
pub use super::questions::{
    ActiveModel as QuestionActiveModel, Entity as Questions, Model as QuestionModel,
};
pub use super::topics::{ActiveModel as TopicActiveModel, Entity as Topics, Model as TopicModel};
