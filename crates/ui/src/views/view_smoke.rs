use api::InMemoryBackend;
use quiz_core::model::SessionState;

use crate::vm::QuizIntent;
use super::test_harness::{ViewKind, seeded_field, seeded_mcq, setup_view_harness};

#[tokio::test(flavor = "current_thread")]
async fn landing_view_smoke_renders_hero() {
    let mut harness = setup_view_harness(ViewKind::Landing, InMemoryBackend::new());
    harness.rebuild();

    let html = harness.render();
    assert!(html.contains("MyTestBuddies"), "missing hero in {html}");
    assert!(html.contains("Start Free Trial"), "missing CTA in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_shows_name_gate_after_load() {
    let backend = InMemoryBackend::new();
    let field_id = seeded_field(&backend, "f1", "Physics");
    let question = seeded_mcq(&field_id, "q1", "2+2?", &["3", "4"]);
    backend.seed_questions(&field_id, vec![question]);

    let mut harness = setup_view_harness(ViewKind::Quiz("f1".into()), backend);
    harness.rebuild();
    harness.drive_async().await;
    harness.drive_async().await;

    let html = harness.render();
    assert!(html.contains("Quiz: Physics"), "missing heading in {html}");
    assert!(html.contains("Start Quiz"), "missing name gate in {html}");
    assert!(html.contains("1 questions"), "missing count in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_renders_no_questions_state() {
    let backend = InMemoryBackend::new();
    seeded_field(&backend, "f1", "Physics");

    let mut harness = setup_view_harness(ViewKind::Quiz("f1".into()), backend);
    harness.rebuild();
    harness.drive_async().await;
    harness.drive_async().await;

    let html = harness.render();
    assert!(html.contains("No questions found."), "missing empty state in {html}");
    assert!(!html.contains("quiz-submit"), "submit must be absent in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_begin_starts_the_attempt() {
    let backend = InMemoryBackend::new();
    let field_id = seeded_field(&backend, "f1", "Physics");
    let question = seeded_mcq(&field_id, "q1", "2+2?", &["3", "4"]);
    backend.seed_questions(&field_id, vec![question]);

    let mut harness = setup_view_harness(ViewKind::Quiz("f1".into()), backend);
    harness.rebuild();
    harness.drive_async().await;
    harness.drive_async().await;

    let handles = harness.quiz_handles.clone().expect("quiz handles");
    handles.dispatch().call(QuizIntent::Begin {
        name: "Priya".into(),
    });
    harness.drive_async().await;

    {
        let vm = handles.vm();
        let guard = vm.read();
        let vm = guard.as_ref().expect("vm present");
        assert_eq!(vm.state(), SessionState::InProgress);
        assert_eq!(vm.remaining_seconds(), 30);
    }

    let html = harness.render();
    assert!(html.contains("2+2?"), "missing question text in {html}");
    assert!(html.contains("0 / 1 answered"), "missing progress in {html}");
    assert!(html.contains("Submit Quiz"), "missing submit control in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_answer_updates_progress() {
    let backend = InMemoryBackend::new();
    let field_id = seeded_field(&backend, "f1", "Physics");
    let question = seeded_mcq(&field_id, "q1", "2+2?", &["3", "4"]);
    backend.seed_questions(&field_id, vec![question.clone()]);

    let mut harness = setup_view_harness(ViewKind::Quiz("f1".into()), backend);
    harness.rebuild();
    harness.drive_async().await;
    harness.drive_async().await;

    let handles = harness.quiz_handles.clone().expect("quiz handles");
    handles.dispatch().call(QuizIntent::Begin {
        name: "Priya".into(),
    });
    harness.drive_async().await;
    handles.dispatch().call(QuizIntent::Answer {
        question_id: question.id().clone(),
        value: "4".into(),
    });
    harness.drive_async().await;

    let html = harness.render();
    assert!(html.contains("1 / 1 answered"), "missing progress in {html}");

    let vm = handles.vm();
    let guard = vm.read();
    assert!(guard.as_ref().expect("vm present").can_submit());
}
