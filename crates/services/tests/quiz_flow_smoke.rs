use std::sync::Arc;

use api::{InMemoryBackend, InMemoryTokenStore};
use quiz_core::model::{
    Field, FieldId, GradedAnswer, Question, QuestionId, QuestionKind, ScoredReport, SessionState,
};
use quiz_core::time::{fixed_clock, fixed_now};
use services::{AuthService, QuizError, QuizFlowService, RegistrationForm, SubmitOutcome, TimerTick};

fn seed_field(backend: &InMemoryBackend, id: &str) -> FieldId {
    let field_id = FieldId::new(id).unwrap();
    let field = Field::new(field_id.clone(), "Physics", "Mechanics", "JEE", 60).unwrap();
    backend.seed_field(field);
    field_id
}

fn mcq(field: &FieldId, id: &str, text: &str, options: &[&str]) -> Question {
    Question::new(
        QuestionId::new(id).unwrap(),
        field.clone(),
        QuestionKind::Mcq,
        text,
        options.iter().map(|s| (*s).to_string()).collect(),
        None,
        Some(30),
        fixed_now(),
    )
    .unwrap()
}

fn flow(backend: &InMemoryBackend) -> QuizFlowService {
    QuizFlowService::new(
        fixed_clock(),
        Arc::new(backend.clone()),
        Arc::new(backend.clone()),
    )
}

fn report_for(question: &Question, answer: &str, correct: bool) -> ScoredReport {
    ScoredReport::from_parts(
        1,
        u32::from(correct),
        vec![GradedAnswer {
            question_id: question.id().clone(),
            question_text: question.text().to_string(),
            submitted_answer: answer.to_string(),
            is_correct: correct,
            correct_answer: Some("B".to_string()),
            graded_at: fixed_now(),
        }],
    )
    .unwrap()
}

#[tokio::test]
async fn full_attempt_produces_expected_payload_and_report() {
    let backend = InMemoryBackend::new();
    let field_id = seed_field(&backend, "f1");
    let question = mcq(&field_id, "q1", "2+2?", &["A", "B"]);
    backend.seed_questions(&field_id, vec![question.clone()]);
    backend.set_report(&field_id, report_for(&question, "B", true));

    let flow = flow(&backend);
    let mut session = flow.load(&field_id).await.unwrap();
    assert_eq!(session.state(), SessionState::NotStarted);
    assert_eq!(session.total_questions(), 1);

    session.begin("Priya", fixed_now()).unwrap();
    session.record_answer(question.id(), "B").unwrap();

    let outcome = flow.submit(&mut session).await.unwrap();
    assert_eq!(outcome, SubmitOutcome::Accepted);
    assert_eq!(session.state(), SessionState::Submitted);

    // Exactly one request, with the documented payload shape.
    let submissions = backend.submissions();
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].field_id, field_id);
    assert_eq!(submissions[0].user_name, "Priya");
    assert_eq!(submissions[0].answers.len(), 1);
    assert_eq!(submissions[0].answers[0].question_id, *question.id());
    assert_eq!(submissions[0].answers[0].answer, "B");

    let report = session.report().unwrap();
    assert_eq!(report.total_correct(), 1);
}

#[tokio::test]
async fn manual_submit_below_gate_sends_nothing() {
    let backend = InMemoryBackend::new();
    let field_id = seed_field(&backend, "f1");
    backend.seed_questions(&field_id, vec![mcq(&field_id, "q1", "2+2?", &["A", "B"])]);

    let flow = flow(&backend);
    let mut session = flow.load(&field_id).await.unwrap();
    session.begin("Priya", fixed_now()).unwrap();

    let err = flow.submit(&mut session).await.unwrap_err();
    assert!(matches!(err, QuizError::NothingAnswered));
    assert_eq!(session.state(), SessionState::InProgress);
    assert!(backend.submissions().is_empty());
}

#[tokio::test]
async fn timeout_submits_once_even_with_zero_answers() {
    let backend = InMemoryBackend::new();
    let field_id = seed_field(&backend, "f1");
    let question = mcq(&field_id, "q1", "2+2?", &["A", "B"]);
    backend.seed_questions(&field_id, vec![question.clone()]);
    backend.set_report(&field_id, report_for(&question, "", false));

    let flow = flow(&backend);
    let mut session = flow.load(&field_id).await.unwrap();
    session.begin("Priya", fixed_now()).unwrap();

    // Run the clock all the way out; expiry must surface exactly once.
    let total = session.total_duration_seconds();
    let mut expirations = 0;
    for _ in 0..total {
        if session.tick() == TimerTick::Expired {
            expirations += 1;
        }
    }
    assert_eq!(expirations, 1);

    flow.submit_on_timeout(&mut session).await.unwrap();
    assert_eq!(session.state(), SessionState::Submitted);

    let submissions = backend.submissions();
    assert_eq!(submissions.len(), 1);
    // Empty but well-formed answers array.
    assert!(submissions[0].answers.is_empty());

    // A manual click racing in after expiry must not dispatch again, and
    // later ticks stay inert.
    let err = flow.submit(&mut session).await.unwrap_err();
    assert!(matches!(err, QuizError::AlreadySubmitted));
    assert_eq!(session.tick(), TimerTick::Inert);
    assert_eq!(backend.submissions().len(), 1);
}

#[tokio::test]
async fn failed_dispatch_with_time_left_returns_to_in_progress() {
    let backend = InMemoryBackend::new();
    let field_id = seed_field(&backend, "f1");
    let question = mcq(&field_id, "q1", "2+2?", &["A", "B"]);
    backend.seed_questions(&field_id, vec![question.clone()]);
    backend.set_report(&field_id, report_for(&question, "A", false));
    backend.fail_submissions(true);

    let flow = flow(&backend);
    let mut session = flow.load(&field_id).await.unwrap();
    session.begin("Priya", fixed_now()).unwrap();
    session.record_answer(question.id(), "A").unwrap();

    let err = flow.submit(&mut session).await.unwrap_err();
    assert!(matches!(err, QuizError::Api(_)));
    // Time remains, so the learner is back in the attempt.
    assert_eq!(session.state(), SessionState::InProgress);
    assert!(backend.submissions().is_empty());

    // The backend recovers; the same submit control re-sends.
    backend.fail_submissions(false);
    flow.submit(&mut session).await.unwrap();
    assert_eq!(session.state(), SessionState::Submitted);
    assert_eq!(backend.submissions().len(), 1);
}

#[tokio::test]
async fn failed_timeout_dispatch_lands_in_retryable_failure() {
    let backend = InMemoryBackend::new();
    let field_id = seed_field(&backend, "f1");
    let question = mcq(&field_id, "q1", "2+2?", &["A", "B"]);
    backend.seed_questions(&field_id, vec![question.clone()]);
    backend.set_report(&field_id, report_for(&question, "A", false));
    backend.fail_submissions(true);

    let flow = flow(&backend);
    let mut session = flow.load(&field_id).await.unwrap();
    session.begin("Priya", fixed_now()).unwrap();
    session.record_answer(question.id(), "A").unwrap();
    while session.tick() != TimerTick::Expired {}

    let err = flow.submit_on_timeout(&mut session).await.unwrap_err();
    assert!(matches!(err, QuizError::Api(_)));
    assert_eq!(session.state(), SessionState::SubmissionFailed);

    backend.fail_submissions(false);
    let outcome = flow.retry_submission(&mut session).await.unwrap();
    assert_eq!(outcome, SubmitOutcome::Accepted);
    assert_eq!(session.state(), SessionState::Submitted);
}

#[tokio::test]
async fn unacknowledged_submission_is_not_a_success() {
    let backend = InMemoryBackend::new();
    let field_id = seed_field(&backend, "f1");
    let question = mcq(&field_id, "q1", "2+2?", &["A", "B"]);
    backend.seed_questions(&field_id, vec![question.clone()]);
    backend.acknowledge_submissions(false);

    let flow = flow(&backend);
    let mut session = flow.load(&field_id).await.unwrap();
    session.begin("Priya", fixed_now()).unwrap();
    session.record_answer(question.id(), "A").unwrap();

    let err = flow.submit(&mut session).await.unwrap_err();
    assert!(matches!(err, QuizError::NotAcknowledged));
    // "Tried to submit" is not "submitted".
    assert_ne!(session.state(), SessionState::Submitted);
}

#[tokio::test]
async fn report_failure_degrades_but_keeps_submission() {
    let backend = InMemoryBackend::new();
    let field_id = seed_field(&backend, "f1");
    let question = mcq(&field_id, "q1", "2+2?", &["A", "B"]);
    backend.seed_questions(&field_id, vec![question.clone()]);
    backend.fail_reports(true);

    let flow = flow(&backend);
    let mut session = flow.load(&field_id).await.unwrap();
    session.begin("Priya", fixed_now()).unwrap();
    session.record_answer(question.id(), "B").unwrap();

    let outcome = flow.submit(&mut session).await.unwrap();
    assert_eq!(outcome, SubmitOutcome::ReportUnavailable);
    assert_eq!(session.state(), SessionState::Submitted);
    assert!(session.report().is_none());

    // The report-only retry succeeds once the backend recovers.
    backend.fail_reports(false);
    backend.set_report(&field_id, report_for(&question, "B", true));
    flow.fetch_report(&mut session).await.unwrap();
    assert!(session.report().is_some());
}

#[tokio::test]
async fn empty_question_list_loads_but_cannot_start() {
    let backend = InMemoryBackend::new();
    let field_id = seed_field(&backend, "f1");

    let flow = flow(&backend);
    let mut session = flow.load(&field_id).await.unwrap();
    assert_eq!(session.total_questions(), 0);
    assert!(!session.can_submit());
    assert!(matches!(
        session.begin("Priya", fixed_now()),
        Err(QuizError::NoQuestions)
    ));
}

#[tokio::test]
async fn unknown_field_fails_to_load() {
    let backend = InMemoryBackend::new();
    let flow = flow(&backend);
    let missing = FieldId::new("nope").unwrap();
    let err = flow.load(&missing).await.unwrap_err();
    assert!(matches!(err, QuizError::UnknownField(_)));
}

#[tokio::test]
async fn auth_roundtrip_stores_and_clears_token() {
    let backend = InMemoryBackend::new();
    let tokens = Arc::new(InMemoryTokenStore::new());
    let auth = AuthService::new(Arc::new(backend.clone()), tokens);

    let form = RegistrationForm {
        name: "Priya Patel".into(),
        email: "priya@example.com".into(),
        password: "secret123".into(),
        mobile: "9876543210".into(),
        role: None,
    };

    auth.send_otp(&form.email).await.unwrap();
    auth.verify_otp(&form.email, InMemoryBackend::OTP)
        .await
        .unwrap();
    auth.register(&form).await.unwrap();

    assert!(!auth.is_logged_in());
    auth.login("priya@example.com", "secret123").await.unwrap();
    assert!(auth.is_logged_in());

    let user = auth.current_user().await.unwrap();
    assert_eq!(user.name, "Priya Patel");

    auth.logout().unwrap();
    assert!(!auth.is_logged_in());
}
