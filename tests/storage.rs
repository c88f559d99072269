mod common;

use common::{create_principal, sample_exam_json, setup};
use rust_examsystem::errors::ExamSystemError;
use rust_examsystem::models::exam_requests::entities::{STATUS_APPROVED, STATUS_PENDING};
use rust_examsystem::models::exams::requests::{CreateExamRequest, UpdateExamRequest};
use rust_examsystem::models::principals::entities::{Principal, PrincipalKind};
use rust_examsystem::models::principals::requests::{CreatePrincipalRequest, UpdatePrincipalRequest};
use rust_examsystem::storage::{ExamNode, ExamRequestScope};
use serde_json::json;

fn sample_exam() -> CreateExamRequest {
    serde_json::from_value(sample_exam_json()).unwrap()
}

fn update_from(value: serde_json::Value) -> UpdateExamRequest {
    serde_json::from_value(value).unwrap()
}

#[tokio::test]
async fn test_create_exam_persists_whole_tree_in_order() {
    let ctx = setup().await;
    let examiner = create_principal(&ctx, PrincipalKind::Examiner, "owner@example.com").await;

    let exam = ctx
        .storage
        .create_exam(examiner.id(), sample_exam())
        .await
        .unwrap();

    assert_eq!(exam.created_by, examiner.id());
    assert_eq!(exam.topics.len(), 2);
    assert_eq!(exam.question_count(), 3);
    assert_eq!(exam.choice_count(), 7);
    assert_eq!(exam.topics[0].name, "Algebra");
    assert_eq!(exam.topics[1].name, "Geometry");
    let options: Vec<&str> = exam.topics[0].questions[0]
        .choices
        .iter()
        .map(|c| c.option.as_str())
        .collect();
    assert_eq!(options, vec!["1", "2", "4"]);

    let reloaded = ctx.storage.get_exam_by_id(exam.id).await.unwrap().unwrap();
    assert_eq!(reloaded.choice_count(), 7);
    assert_eq!(reloaded.topics[0].questions[1].question, "x + 1 = 3, x = ?");
}

#[tokio::test]
async fn test_delete_exam_cascades_to_every_node() {
    let ctx = setup().await;
    let examiner = create_principal(&ctx, PrincipalKind::Examiner, "owner@example.com").await;
    let exam = ctx
        .storage
        .create_exam(examiner.id(), sample_exam())
        .await
        .unwrap();

    let topic_id = exam.topics[0].id;
    let question_id = exam.topics[0].questions[0].id;
    let choice_id = exam.topics[0].questions[0].choices[0].id;

    assert_eq!(
        ctx.storage
            .resolve_exam_node(ExamNode::Choice(choice_id))
            .await
            .unwrap(),
        Some(exam.id)
    );

    assert!(ctx.storage.delete_exam(exam.id).await.unwrap());
    assert!(ctx.storage.get_exam_by_id(exam.id).await.unwrap().is_none());

    for node in [
        ExamNode::Topic(topic_id),
        ExamNode::Question(question_id),
        ExamNode::Choice(choice_id),
    ] {
        assert_eq!(ctx.storage.resolve_exam_node(node).await.unwrap(), None);
    }

    assert!(!ctx.storage.delete_exam(exam.id).await.unwrap());
}

#[tokio::test]
async fn test_get_exam_owner_reads_only_the_exam_row() {
    let ctx = setup().await;
    let examiner = create_principal(&ctx, PrincipalKind::Examiner, "owner@example.com").await;
    let exam = ctx
        .storage
        .create_exam(examiner.id(), sample_exam())
        .await
        .unwrap();

    let owner = ctx.storage.get_exam_owner(exam.id).await.unwrap();
    assert_eq!(owner, Some(examiner.id()));

    assert!(ctx.storage.delete_exam(exam.id).await.unwrap());
    assert!(ctx.storage.get_exam_owner(exam.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_delete_topic_removes_its_questions_only() {
    let ctx = setup().await;
    let examiner = create_principal(&ctx, PrincipalKind::Examiner, "owner@example.com").await;
    let exam = ctx
        .storage
        .create_exam(examiner.id(), sample_exam())
        .await
        .unwrap();

    assert!(
        ctx.storage
            .delete_exam_node(ExamNode::Topic(exam.topics[0].id))
            .await
            .unwrap()
    );

    let reloaded = ctx.storage.get_exam_by_id(exam.id).await.unwrap().unwrap();
    assert_eq!(reloaded.topics.len(), 1);
    assert_eq!(reloaded.topics[0].name, "Geometry");
    assert_eq!(reloaded.question_count(), 1);
    assert_eq!(reloaded.choice_count(), 2);
}

#[tokio::test]
async fn test_deleting_examiner_removes_owned_exams() {
    let ctx = setup().await;
    let examiner = create_principal(&ctx, PrincipalKind::Examiner, "owner@example.com").await;
    let exam = ctx
        .storage
        .create_exam(examiner.id(), sample_exam())
        .await
        .unwrap();

    assert!(
        ctx.storage
            .delete_principal(PrincipalKind::Examiner, examiner.id())
            .await
            .unwrap()
    );
    assert!(ctx.storage.get_exam_by_id(exam.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_duplicate_email_within_kind_is_rejected() {
    let ctx = setup().await;
    create_principal(&ctx, PrincipalKind::Examinee, "same@example.com").await;

    let err = ctx
        .storage
        .create_principal(
            PrincipalKind::Examinee,
            serde_json::from_value(json!({
                "email": "same@example.com",
                "password": "hash",
                "first_name": "Second",
                "last_name": "Examinee",
                "phone_number": "0917"
            }))
            .unwrap(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ExamSystemError::Duplicate(_)));
    assert_eq!(err.message(), "Email is already in use");

    // 不同类型的主体之间不检查
    let examiner = create_principal(&ctx, PrincipalKind::Examiner, "same@example.com").await;
    assert_eq!(examiner.kind(), PrincipalKind::Examiner);

    // 按解析顺序先命中考生
    let found = ctx
        .storage
        .find_principal_by_email("same@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.kind(), PrincipalKind::Examinee);
}

#[tokio::test]
async fn test_concurrent_registrations_yield_one_duplicate() {
    let ctx = setup().await;
    let request = || -> CreatePrincipalRequest {
        serde_json::from_value(json!({
            "email": "racer@example.com",
            "password": "hash",
            "first_name": "Race",
            "last_name": "Examiner"
        }))
        .unwrap()
    };

    let (first, second) = tokio::join!(
        ctx.storage.create_principal(PrincipalKind::Examiner, request()),
        ctx.storage.create_principal(PrincipalKind::Examiner, request()),
    );

    let errors: Vec<_> = [first, second].into_iter().filter_map(|r| r.err()).collect();
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], ExamSystemError::Duplicate(_)));
    assert_eq!(errors[0].message(), "Email is already in use");
}

#[tokio::test]
async fn test_update_principal_rechecks_email() {
    let ctx = setup().await;
    create_principal(&ctx, PrincipalKind::Examiner, "taken@example.com").await;
    let examiner = create_principal(&ctx, PrincipalKind::Examiner, "mine@example.com").await;

    let err = ctx
        .storage
        .update_principal(
            PrincipalKind::Examiner,
            examiner.id(),
            UpdatePrincipalRequest {
                email: Some("taken@example.com".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ExamSystemError::Duplicate(_)));

    let updated = ctx
        .storage
        .update_principal(
            PrincipalKind::Examiner,
            examiner.id(),
            UpdatePrincipalRequest {
                email: Some("mine@example.com".to_string()),
                first_name: Some("Renamed".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.account().first_name, "Renamed");
    assert_eq!(updated.account().status, "Pending");
}

#[tokio::test]
async fn test_exam_request_lifecycle() {
    let ctx = setup().await;
    let examiner = create_principal(&ctx, PrincipalKind::Examiner, "owner@example.com").await;
    let examinee = create_principal(&ctx, PrincipalKind::Examinee, "taker@example.com").await;
    let exam = ctx
        .storage
        .create_exam(examiner.id(), sample_exam())
        .await
        .unwrap();

    let request = ctx
        .storage
        .create_exam_request(examinee.id(), exam.id)
        .await
        .unwrap();
    assert_eq!(request.status, STATUS_PENDING);
    assert!(!request.is_approved);

    let enrollment = ctx
        .storage
        .get_enrollment(examinee.id(), exam.id)
        .await
        .unwrap()
        .unwrap();
    assert!(!enrollment.is_approved);

    // 未批准的报名不出现在 exam_ids 中
    let Some(Principal::Examinee(pending)) = ctx
        .storage
        .get_principal_by_id(PrincipalKind::Examinee, examinee.id())
        .await
        .unwrap()
    else {
        panic!("expected examinee");
    };
    assert!(pending.exam_ids.is_empty());

    let err = ctx
        .storage
        .create_exam_request(examinee.id(), exam.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ExamSystemError::Duplicate(_)));
    assert_eq!(err.message(), "You have already requested this exam.");

    let approved = ctx.storage.approve_exam_request(request.id).await.unwrap();
    assert_eq!(approved.exam_ids, vec![exam.id]);

    let detail = ctx
        .storage
        .get_exam_request_by_id(request.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(detail.request.status, STATUS_APPROVED);
    assert!(detail.request.is_approved);
    assert_eq!(detail.exam.id, exam.id);
    assert_eq!(detail.examinee.account.id, examinee.id());

    let err = ctx
        .storage
        .approve_exam_request(request.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ExamSystemError::Conflict(_)));
    let enrollment = ctx
        .storage
        .get_enrollment(examinee.id(), exam.id)
        .await
        .unwrap()
        .unwrap();
    assert!(enrollment.is_approved);

    assert!(ctx.storage.delete_exam_request(request.id).await.unwrap());
    assert!(
        ctx.storage
            .get_enrollment(examinee.id(), exam.id)
            .await
            .unwrap()
            .is_none()
    );
    assert!(
        ctx.storage
            .get_exam_request_by_id(request.id)
            .await
            .unwrap()
            .is_none()
    );
    assert!(!ctx.storage.delete_exam_request(request.id).await.unwrap());
}

#[tokio::test]
async fn test_exam_request_for_missing_exam() {
    let ctx = setup().await;
    let examinee = create_principal(&ctx, PrincipalKind::Examinee, "taker@example.com").await;

    let err = ctx
        .storage
        .create_exam_request(examinee.id(), uuid::Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, ExamSystemError::NotFound(_)));
    assert!(
        ctx.storage
            .list_exam_requests(ExamRequestScope::All)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn test_list_exam_requests_by_scope() {
    let ctx = setup().await;
    let owner = create_principal(&ctx, PrincipalKind::Examiner, "owner@example.com").await;
    let other = create_principal(&ctx, PrincipalKind::Examiner, "other@example.com").await;
    let first = create_principal(&ctx, PrincipalKind::Examinee, "first@example.com").await;
    let second = create_principal(&ctx, PrincipalKind::Examinee, "second@example.com").await;

    let owned = ctx
        .storage
        .create_exam(owner.id(), sample_exam())
        .await
        .unwrap();
    let foreign = ctx
        .storage
        .create_exam(other.id(), sample_exam())
        .await
        .unwrap();

    ctx.storage
        .create_exam_request(first.id(), owned.id)
        .await
        .unwrap();
    ctx.storage
        .create_exam_request(second.id(), owned.id)
        .await
        .unwrap();
    ctx.storage
        .create_exam_request(first.id(), foreign.id)
        .await
        .unwrap();

    let by_owner = ctx
        .storage
        .list_exam_requests(ExamRequestScope::OwnedBy(owner.id()))
        .await
        .unwrap();
    assert_eq!(by_owner.len(), 2);
    assert!(by_owner.iter().all(|d| d.exam.created_by == owner.id()));

    let by_first = ctx
        .storage
        .list_exam_requests(ExamRequestScope::RequestedBy(first.id()))
        .await
        .unwrap();
    assert_eq!(by_first.len(), 2);
    assert!(by_first.iter().all(|d| d.request.examinee_id == first.id()));

    let all = ctx
        .storage
        .list_exam_requests(ExamRequestScope::All)
        .await
        .unwrap();
    assert_eq!(all.len(), 3);
}

#[tokio::test]
async fn test_update_merges_existing_and_appends_new_nodes() {
    let ctx = setup().await;
    let examiner = create_principal(&ctx, PrincipalKind::Examiner, "owner@example.com").await;
    let exam = ctx
        .storage
        .create_exam(examiner.id(), sample_exam())
        .await
        .unwrap();
    let algebra = &exam.topics[0];

    let updated = ctx
        .storage
        .update_exam(
            exam.id,
            update_from(json!({
                "title": "Mathematics Final",
                "topics": [
                    {
                        "id": algebra.id,
                        "name": "Linear Algebra",
                        "questions": [
                            {
                                "id": algebra.questions[0].id,
                                "correct_answer": "two",
                                "choices": [
                                    {"id": algebra.questions[0].choices[2].id, "option": "8"},
                                    {"option": "16"}
                                ]
                            },
                            {
                                "question": "3x = 9, x = ?",
                                "correct_answer": "3",
                                "choices": [{"option": "3"}, {"option": "9"}]
                            }
                        ]
                    },
                    {"id": uuid::Uuid::new_v4(), "name": "Ghost"},
                    {"name": "Statistics"}
                ]
            })),
        )
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.title, "Mathematics Final");
    assert_eq!(updated.created_by, examiner.id());
    // 不存在的主题被跳过
    let names: Vec<&str> = updated.topics.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["Linear Algebra", "Geometry", "Statistics"]);

    let first = &updated.topics[0];
    assert_eq!(first.questions.len(), 3);
    assert_eq!(first.questions[0].correct_answer, "two");
    assert_eq!(first.questions[0].question, "2x = 4, x = ?");
    let options: Vec<&str> = first.questions[0]
        .choices
        .iter()
        .map(|c| c.option.as_str())
        .collect();
    assert_eq!(options, vec!["1", "2", "8", "16"]);
    assert_eq!(first.questions[2].question, "3x = 9, x = ?");
    assert_eq!(first.questions[2].choices.len(), 2);
}

#[tokio::test]
async fn test_update_moves_choice_within_same_exam() {
    let ctx = setup().await;
    let examiner = create_principal(&ctx, PrincipalKind::Examiner, "owner@example.com").await;
    let exam = ctx
        .storage
        .create_exam(examiner.id(), sample_exam())
        .await
        .unwrap();
    let moved = exam.topics[0].questions[0].choices[0].id;
    let geometry = &exam.topics[1];

    let updated = ctx
        .storage
        .update_exam(
            exam.id,
            update_from(json!({
                "topics": [{
                    "id": geometry.id,
                    "questions": [{
                        "id": geometry.questions[0].id,
                        "choices": [{"id": moved}]
                    }]
                }]
            })),
        )
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.topics[0].questions[0].choices.len(), 2);
    let target = &updated.topics[1].questions[0];
    assert_eq!(target.choices.len(), 3);
    assert_eq!(target.choices[2].id, moved);
    assert_eq!(target.choices[2].question_id, target.id);
}

#[tokio::test]
async fn test_update_with_foreign_choice_rolls_back() {
    let ctx = setup().await;
    let examiner = create_principal(&ctx, PrincipalKind::Examiner, "owner@example.com").await;
    let exam = ctx
        .storage
        .create_exam(examiner.id(), sample_exam())
        .await
        .unwrap();
    let other = ctx
        .storage
        .create_exam(examiner.id(), sample_exam())
        .await
        .unwrap();
    let foreign_choice = other.topics[0].questions[0].choices[0].id;
    let algebra = &exam.topics[0];

    let err = ctx
        .storage
        .update_exam(
            exam.id,
            update_from(json!({
                "title": "Should not persist",
                "topics": [
                    {"name": "Should not persist either"},
                    {
                        "id": algebra.id,
                        "questions": [{
                            "id": algebra.questions[0].id,
                            "choices": [{"id": foreign_choice, "option": "hijacked"}]
                        }]
                    }
                ]
            })),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ExamSystemError::NotFound(_)));
    assert_eq!(err.message(), format!("Choice not found: {foreign_choice}"));

    let unchanged = ctx.storage.get_exam_by_id(exam.id).await.unwrap().unwrap();
    assert_eq!(unchanged.title, "Mathematics Midterm");
    assert_eq!(unchanged.topics.len(), 2);
    let untouched = ctx.storage.get_exam_by_id(other.id).await.unwrap().unwrap();
    assert_eq!(untouched.topics[0].questions[0].choices[0].option, "1");
    assert_eq!(untouched.choice_count(), 7);
}

#[tokio::test]
async fn test_update_new_topic_without_name_fails() {
    let ctx = setup().await;
    let examiner = create_principal(&ctx, PrincipalKind::Examiner, "owner@example.com").await;
    let exam = ctx
        .storage
        .create_exam(examiner.id(), sample_exam())
        .await
        .unwrap();

    let err = ctx
        .storage
        .update_exam(
            exam.id,
            update_from(json!({
                "title": "Renamed",
                "topics": [{"questions": []}]
            })),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ExamSystemError::Validation(_)));

    let unchanged = ctx.storage.get_exam_by_id(exam.id).await.unwrap().unwrap();
    assert_eq!(unchanged.title, "Mathematics Midterm");
}

#[tokio::test]
async fn test_update_missing_exam_returns_none() {
    let ctx = setup().await;
    let result = ctx
        .storage
        .update_exam(uuid::Uuid::new_v4(), UpdateExamRequest::default())
        .await
        .unwrap();
    assert!(result.is_none());
}
