use dioxus::prelude::*;

use quiz_core::model::{FieldId, Question, QuestionKind, SessionState};
use services::{QuizError, TimerTick};

use crate::context::AppContext;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{QuizIntent, QuizVm, ResultVm, format_countdown, map_report};

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

/// The timed quiz attempt for one field: name gate, answer collection
/// against the countdown, one-shot submission, and the scored breakdown.
#[component]
pub fn QuizView(field_id: String) -> Element {
    let ctx = use_context::<AppContext>();
    let quiz_flow = ctx.quiz_flow();
    let parsed_field = FieldId::new(field_id.clone()).ok();

    let vm = use_signal(|| None::<QuizVm>);
    let action_error = use_signal(String::new);
    let mut name_input = use_signal(String::new);
    // Bumped per started attempt so a stale ticker from a previous attempt
    // in this view can never touch the current session.
    let attempt = use_signal(|| 0_u32);

    let quiz_flow_for_resource = quiz_flow.clone();
    let parsed_for_resource = parsed_field.clone();
    let resource = use_resource(move || {
        let quiz_flow = quiz_flow_for_resource.clone();
        let field_id = parsed_for_resource.clone();
        let mut vm = vm;
        let mut action_error = action_error;
        async move {
            let Some(field_id) = field_id else {
                return Err(ViewError::InvalidField);
            };
            let session = quiz_flow.load(&field_id).await.map_err(|err| match err {
                QuizError::UnknownField(_) => ViewError::InvalidField,
                _ => ViewError::Unknown,
            })?;
            vm.set(Some(QuizVm::new(session)));
            action_error.set(String::new());
            Ok::<_, ViewError>(())
        }
    });
    let state = view_state_from_resource(&resource);

    // One 1 Hz loop per started attempt. Every iteration re-checks the
    // attempt generation and the session state, so the loop goes quiet the
    // moment the attempt leaves `InProgress` for good; while a submission
    // is merely in flight it idles instead of dying, in case a failed
    // dispatch puts the learner back into the attempt.
    let start_ticker = {
        let quiz_flow = quiz_flow.clone();
        use_callback(move |generation: u32| {
            let quiz_flow = quiz_flow.clone();
            let mut vm = vm;
            let mut action_error = action_error;
            let attempt = attempt;
            spawn(async move {
                loop {
                    tokio::time::sleep(std::time::Duration::from_secs(1)).await;
                    if attempt() != generation {
                        break;
                    }
                    let tick = match vm.write().as_mut() {
                        Some(vm) => vm.tick(),
                        // A submission briefly owns the session.
                        None => continue,
                    };
                    match tick {
                        TimerTick::Ticked { .. } => {}
                        TimerTick::Inert => {
                            let session_state = vm.read().as_ref().map(QuizVm::state);
                            if session_state == Some(SessionState::Submitting) {
                                continue;
                            }
                            break;
                        }
                        TimerTick::Expired => {
                            let mut local = vm.write().take();
                            let Some(mut vm_value) = local.take() else {
                                break;
                            };
                            let result = vm_value.submit_on_timeout(&quiz_flow).await;
                            {
                                let mut guard = vm.write();
                                *guard = Some(vm_value);
                            }
                            match result {
                                Ok(_) => action_error.set(String::new()),
                                // A manual submit won the race; nothing to report.
                                Err(
                                    QuizError::AlreadySubmitted | QuizError::SubmissionInFlight,
                                ) => {}
                                Err(err) => action_error.set(err.to_string()),
                            }
                            break;
                        }
                    }
                }
            });
        })
    };

    let dispatch_intent = {
        let quiz_flow = quiz_flow.clone();
        use_callback(move |intent: QuizIntent| {
            let quiz_flow = quiz_flow.clone();
            let mut vm = vm;
            let mut action_error = action_error;
            let mut attempt = attempt;

            match intent {
                QuizIntent::Begin { name } => {
                    let begun = match vm.write().as_mut() {
                        Some(vm) => vm.begin(&name),
                        None => return,
                    };
                    match begun {
                        Ok(()) => {
                            action_error.set(String::new());
                            let generation = attempt() + 1;
                            attempt.set(generation);
                            start_ticker.call(generation);
                        }
                        Err(err) => action_error.set(err.to_string()),
                    }
                }
                QuizIntent::Answer { question_id, value } => {
                    if let Some(vm) = vm.write().as_mut() {
                        match vm.record_answer(&question_id, value) {
                            Ok(()) => action_error.set(String::new()),
                            Err(err) => action_error.set(err.to_string()),
                        }
                    }
                }
                QuizIntent::Submit | QuizIntent::RetrySubmission => {
                    spawn(async move {
                        let mut local = vm.write().take();
                        let Some(mut vm_value) = local.take() else {
                            return;
                        };
                        let result = vm_value.submit(&quiz_flow).await;
                        // Always put the session back so the view stays
                        // usable after errors.
                        {
                            let mut guard = vm.write();
                            *guard = Some(vm_value);
                        }
                        match result {
                            Ok(_) => action_error.set(String::new()),
                            Err(err) => action_error.set(err.to_string()),
                        }
                    });
                }
                QuizIntent::FetchReport => {
                    spawn(async move {
                        let mut local = vm.write().take();
                        let Some(mut vm_value) = local.take() else {
                            return;
                        };
                        let result = vm_value.fetch_report(&quiz_flow).await;
                        {
                            let mut guard = vm.write();
                            *guard = Some(vm_value);
                        }
                        match result {
                            Ok(()) => action_error.set(String::new()),
                            Err(err) => action_error.set(err.to_string()),
                        }
                    });
                }
            }
        })
    };

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<QuizTestHandles>() {
                handles.register(dispatch_intent, vm);
            }
        }
    }

    let vm_guard = vm.read();
    let session_state = vm_guard.as_ref().map(QuizVm::state);
    let action_message = action_error();

    rsx! {
        div { class: "page quiz-page",
            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading questions..." }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "error", "{err.message()}" }
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        onclick: move |_| {
                            let mut resource = resource;
                            resource.restart();
                        },
                        "Retry"
                    }
                },
                ViewState::Ready(()) => rsx! {
                    if let Some(vm) = vm_guard.as_ref() {
                        h2 { "Quiz: {vm.field_name()}" }
                        if !action_message.is_empty() {
                            p { class: "error", id: "quiz-action-error", "{action_message}" }
                        }
                        match session_state {
                            Some(SessionState::NotStarted) => rsx! {
                                if vm.total_questions() == 0 {
                                    p { "No questions found." }
                                } else {
                                    NameGate {
                                        name_input: name_input(),
                                        question_count: vm.total_questions(),
                                        duration_label: format_countdown(vm.total_duration_seconds()),
                                        on_name: move |value| name_input.set(value),
                                        on_intent: dispatch_intent,
                                    }
                                }
                            },
                            Some(SessionState::InProgress | SessionState::Submitting) => rsx! {
                                AttemptPanel {
                                    in_flight: session_state == Some(SessionState::Submitting),
                                    questions: vm.questions().to_vec(),
                                    answers: vm
                                        .questions()
                                        .iter()
                                        .map(|q| vm.answer(q.id()).map(str::to_string))
                                        .collect::<Vec<_>>(),
                                    answered: vm.answered_count(),
                                    total: vm.total_questions(),
                                    percent: vm.progress_percent(),
                                    remaining_label: format_countdown(vm.remaining_seconds()),
                                    can_submit: vm.can_submit(),
                                    on_intent: dispatch_intent,
                                }
                            },
                            Some(SessionState::Submitted) => rsx! {
                                if let Some(report) = vm.report() {
                                    ResultPanel { result: map_report(report) }
                                } else {
                                    p { "Your answers were submitted." }
                                    p { "The score report is not available yet." }
                                    button {
                                        class: "btn btn-secondary",
                                        id: "quiz-fetch-report",
                                        r#type: "button",
                                        onclick: move |_| dispatch_intent.call(QuizIntent::FetchReport),
                                        "Fetch report"
                                    }
                                }
                            },
                            Some(SessionState::SubmissionFailed) => rsx! {
                                p { class: "error",
                                    "Your answers could not be submitted. They are still here; try again."
                                }
                                button {
                                    class: "btn",
                                    id: "quiz-retry-submit",
                                    r#type: "button",
                                    onclick: move |_| dispatch_intent.call(QuizIntent::RetrySubmission),
                                    "Retry submission"
                                }
                            },
                            None => rsx! {},
                        }
                    } else {
                        p { "Loading questions..." }
                    }
                },
            }
        }
    }
}

/// Name capture before the clock starts.
#[component]
fn NameGate(
    name_input: String,
    question_count: usize,
    duration_label: String,
    on_name: EventHandler<String>,
    on_intent: EventHandler<QuizIntent>,
) -> Element {
    let start_disabled = name_input.trim().is_empty();
    let name_for_start = name_input.clone();
    rsx! {
        div { class: "name-gate",
            p { "{question_count} questions · {duration_label} on the clock" }
            p { "The quiz is submitted automatically when time runs out." }
            label { r#for: "quiz-name", "Your name" }
            input {
                id: "quiz-name",
                value: "{name_input}",
                placeholder: "Enter your name",
                oninput: move |evt| on_name.call(evt.value()),
            }
            button {
                class: "btn",
                id: "quiz-start",
                r#type: "button",
                disabled: start_disabled,
                onclick: move |_| {
                    on_intent.call(QuizIntent::Begin {
                        name: name_for_start.clone(),
                    });
                },
                "Start Quiz"
            }
        }
    }
}

/// The timed form: questions, progress, countdown, and the gated submit.
#[component]
#[allow(clippy::too_many_arguments)]
fn AttemptPanel(
    in_flight: bool,
    questions: Vec<Question>,
    answers: Vec<Option<String>>,
    answered: usize,
    total: usize,
    percent: u32,
    remaining_label: String,
    can_submit: bool,
    on_intent: EventHandler<QuizIntent>,
) -> Element {
    rsx! {
        div { class: "quiz-header",
            span { class: "quiz-timer", id: "quiz-timer", "Time left: {remaining_label}" }
            span { class: "quiz-progress-label", "{answered} / {total} answered" }
            div { class: "quiz-progress-track",
                div { class: "quiz-progress-fill", style: "width: {percent}%" }
            }
        }
        for (index, question) in questions.iter().enumerate() {
            QuestionCard {
                key: "{question.id()}",
                number: index + 1,
                question: question.clone(),
                answer: answers.get(index).cloned().flatten(),
                disabled: in_flight,
                on_intent,
            }
        }
        button {
            class: "btn quiz-submit",
            id: "quiz-submit",
            r#type: "button",
            disabled: !can_submit || in_flight,
            onclick: move |_| on_intent.call(QuizIntent::Submit),
            if in_flight { "Submitting..." } else { "Submit Quiz" }
        }
    }
}

#[component]
fn QuestionCard(
    number: usize,
    question: Question,
    answer: Option<String>,
    disabled: bool,
    on_intent: EventHandler<QuizIntent>,
) -> Element {
    let question_id = question.id().clone();
    rsx! {
        div { class: "question-card",
            h4 { "{number}. {question.text()}" }
            match question.kind() {
                QuestionKind::Mcq => rsx! {
                    for (index, option) in question.options().iter().enumerate() {
                        label { key: "{index}", class: "question-option",
                            input {
                                r#type: "radio",
                                name: "{question_id}",
                                value: "{option}",
                                checked: answer.as_deref() == Some(option.as_str()),
                                disabled,
                                onchange: {
                                    let question_id = question_id.clone();
                                    let option = option.clone();
                                    move |_| {
                                        on_intent.call(QuizIntent::Answer {
                                            question_id: question_id.clone(),
                                            value: option.clone(),
                                        });
                                    }
                                },
                            }
                            " {option}"
                        }
                    }
                },
                QuestionKind::Descriptive => rsx! {
                    textarea {
                        rows: 3,
                        class: "question-answer",
                        placeholder: "Write your answer...",
                        value: answer.as_deref().unwrap_or(""),
                        disabled,
                        oninput: {
                            let question_id = question_id.clone();
                            move |evt: FormEvent| {
                                on_intent.call(QuizIntent::Answer {
                                    question_id: question_id.clone(),
                                    value: evt.value(),
                                });
                            }
                        },
                    }
                },
            }
        }
    }
}

/// Per-question breakdown of the scored report.
#[component]
fn ResultPanel(result: ResultVm) -> Element {
    rsx! {
        div { class: "quiz-result",
            h3 { "Quiz submitted" }
            p { class: "quiz-score",
                "Score: {result.total_correct} / {result.total_answered}"
            }
            for row in result.rows.iter() {
                div {
                    key: "{row.question_id}",
                    class: row_class(row.is_correct),
                    p { "{row.question_text}" }
                    p { "Your answer: {row.submitted_answer}" }
                    if row.is_correct {
                        p { class: "result-verdict", "Correct" }
                    } else {
                        p { class: "result-verdict", "Incorrect" }
                        if let Some(correct) = row.correct_answer.as_deref() {
                            p { class: "result-correct-answer", "Correct answer: {correct}" }
                        }
                    }
                }
            }
        }
    }
}

fn row_class(is_correct: bool) -> &'static str {
    if is_correct {
        "result-row correct"
    } else {
        "result-row incorrect"
    }
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct QuizTestHandles {
    dispatch: Rc<RefCell<Option<Callback<QuizIntent>>>>,
    vm: Rc<RefCell<Option<Signal<Option<QuizVm>>>>>,
}

#[cfg(test)]
impl QuizTestHandles {
    pub(crate) fn register(&self, dispatch: Callback<QuizIntent>, vm: Signal<Option<QuizVm>>) {
        *self.dispatch.borrow_mut() = Some(dispatch);
        *self.vm.borrow_mut() = Some(vm);
    }

    pub(crate) fn dispatch(&self) -> Callback<QuizIntent> {
        (*self.dispatch.borrow()).expect("quiz dispatch registered")
    }

    pub(crate) fn vm(&self) -> Signal<Option<QuizVm>> {
        (*self.vm.borrow()).expect("quiz vm registered")
    }
}
