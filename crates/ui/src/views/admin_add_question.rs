use dioxus::prelude::*;

use quiz_core::model::{Field, FieldId, QuestionKind};

use crate::context::AppContext;
use crate::views::{ViewError, ViewState, view_state_from_resource};

/// Admin question authoring: pick a field, choose the question shape, fill
/// in options and the correct answer, and submit.
#[component]
pub fn AdminAddQuestionView() -> Element {
    let ctx = use_context::<AppContext>();
    let questions = ctx.questions();

    let selected_field = use_signal(|| None::<FieldId>);
    let mut kind = use_signal(|| QuestionKind::Mcq);
    let mut text = use_signal(String::new);
    let mut options = use_signal(|| vec![String::new(); 4]);
    let mut correct_answer = use_signal(String::new);
    let mut solution = use_signal(String::new);
    let mut time_allocated = use_signal(String::new);
    let error = use_signal(String::new);
    let notice = use_signal(String::new);
    let busy = use_signal(|| false);

    let submit = {
        let questions = questions.clone();
        use_callback(move |(): ()| {
            let questions = questions.clone();
            let mut error = error;
            let mut notice = notice;
            let mut busy = busy;

            let Some(field_id) = selected_field() else {
                error.set("Select a field first".to_string());
                return;
            };
            let time = time_allocated();
            let time = time.trim();
            let parsed_time = if time.is_empty() {
                None
            } else {
                match time.parse::<u32>() {
                    Ok(seconds) => Some(seconds),
                    Err(_) => {
                        error.set("Time allocated must be a number of seconds".to_string());
                        return;
                    }
                }
            };
            let current_kind = kind();
            let option_values = if current_kind == QuestionKind::Mcq {
                options()
            } else {
                Vec::new()
            };

            spawn(async move {
                busy.set(true);
                let created = questions
                    .create(
                        &field_id,
                        current_kind,
                        &text(),
                        option_values,
                        &correct_answer(),
                        Some(solution()),
                        parsed_time,
                    )
                    .await;
                match created {
                    Ok(_) => {
                        error.set(String::new());
                        notice.set("Question created".to_string());
                        text.set(String::new());
                        options.set(vec![String::new(); 4]);
                        correct_answer.set(String::new());
                        solution.set(String::new());
                        time_allocated.set(String::new());
                    }
                    Err(err) => {
                        notice.set(String::new());
                        error.set(err.to_string());
                    }
                }
                busy.set(false);
            });
        })
    };

    let error_text = error();
    let notice_text = notice();
    let current_kind = kind();
    let option_values = options();
    let type_class = |active: bool| if active { "type-btn active" } else { "type-btn" };
    let mcq_class = type_class(current_kind == QuestionKind::Mcq);
    let descriptive_class = type_class(current_kind == QuestionKind::Descriptive);

    rsx! {
        div { class: "page admin-page",
            h2 { "Add New Question" }
            p { "Create questions for your assessment fields." }
            FieldDropdown { selected: selected_field }
            if !error_text.is_empty() {
                p { class: "error", id: "question-error", "{error_text}" }
            }
            if !notice_text.is_empty() {
                p { class: "info", id: "question-notice", "{notice_text}" }
            }
            div { class: "type-selector",
                button {
                    class: "{mcq_class}",
                    r#type: "button",
                    onclick: move |_| kind.set(QuestionKind::Mcq),
                    "Multiple Choice"
                }
                button {
                    class: "{descriptive_class}",
                    r#type: "button",
                    onclick: move |_| kind.set(QuestionKind::Descriptive),
                    "Descriptive"
                }
            }
            label { r#for: "question-text", "Question text" }
            textarea {
                id: "question-text",
                rows: 3,
                value: "{text}",
                placeholder: "Enter your question here...",
                oninput: move |evt| text.set(evt.value()),
            }
            if current_kind == QuestionKind::Mcq {
                h4 { "Options" }
                for (index, value) in option_values.iter().enumerate() {
                    div { key: "{index}", class: "option-row",
                        input {
                            value: "{value}",
                            placeholder: format!("Option {}", index + 1),
                            oninput: move |evt| {
                                let mut updated = options();
                                updated[index] = evt.value();
                                options.set(updated);
                            },
                        }
                        button {
                            class: "btn btn-ghost",
                            r#type: "button",
                            disabled: option_values.len() <= 1,
                            onclick: move |_| {
                                let mut updated = options();
                                updated.remove(index);
                                options.set(updated);
                            },
                            "Remove"
                        }
                    }
                }
                button {
                    class: "btn btn-secondary",
                    r#type: "button",
                    onclick: move |_| {
                        let mut updated = options();
                        updated.push(String::new());
                        options.set(updated);
                    },
                    "Add option"
                }
                label { r#for: "correct-answer", "Correct answer (exact option text)" }
                input {
                    id: "correct-answer",
                    value: "{correct_answer}",
                    oninput: move |evt| correct_answer.set(evt.value()),
                }
            }
            label { r#for: "solution", "Solution (optional)" }
            textarea {
                id: "solution",
                rows: 2,
                value: "{solution}",
                oninput: move |evt| solution.set(evt.value()),
            }
            label { r#for: "time-allocated", "Time allocated in seconds (optional)" }
            input {
                id: "time-allocated",
                value: "{time_allocated}",
                oninput: move |evt| time_allocated.set(evt.value()),
            }
            button {
                class: "btn",
                id: "question-submit",
                r#type: "button",
                disabled: busy() || text().trim().is_empty(),
                onclick: move |_| submit.call(()),
                if busy() { "Creating..." } else { "Create Question" }
            }
        }
    }
}

/// Field picker with inline creation, shared by the authoring form.
#[component]
fn FieldDropdown(selected: Signal<Option<FieldId>>) -> Element {
    let ctx = use_context::<AppContext>();
    let fields = ctx.fields();

    let mut new_field_name = use_signal(String::new);
    let creating = use_signal(|| false);
    let error = use_signal(String::new);

    let fields_for_resource = fields.clone();
    let resource = use_resource(move || {
        let fields = fields_for_resource.clone();
        async move {
            fields
                .list_admin()
                .await
                .map_err(|_| ViewError::Unknown)
        }
    });
    let state: ViewState<Vec<Field>> = view_state_from_resource(&resource);

    let create_field = {
        let fields = fields.clone();
        use_callback(move |(): ()| {
            let fields = fields.clone();
            let mut selected = selected;
            let mut new_field_name = new_field_name;
            let mut creating = creating;
            let mut error = error;
            let mut resource = resource;
            spawn(async move {
                creating.set(true);
                match fields.create(&new_field_name(), "", "", None).await {
                    Ok(field) => {
                        error.set(String::new());
                        selected.set(Some(field.id().clone()));
                        new_field_name.set(String::new());
                        resource.restart();
                    }
                    Err(err) => error.set(err.to_string()),
                }
                creating.set(false);
            });
        })
    };

    let error_text = error();
    let selected_value = selected()
        .map(|id| id.to_string())
        .unwrap_or_default();

    rsx! {
        div { class: "field-dropdown",
            label { r#for: "field-select", "Field" }
            match state {
                ViewState::Idle => rsx! { p { "Idle" } },
                ViewState::Loading => rsx! { p { "Loading fields..." } },
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
                ViewState::Ready(listed) => rsx! {
                    select {
                        id: "field-select",
                        value: "{selected_value}",
                        onchange: move |evt| {
                            let mut selected = selected;
                            selected.set(FieldId::new(evt.value()).ok());
                        },
                        option { value: "", "-- Select Field / Exam --" }
                        for field in listed.iter() {
                            option { key: "{field.id()}", value: "{field.id()}", "{field.name()}" }
                        }
                    }
                },
            }
            div { class: "field-create",
                input {
                    value: "{new_field_name}",
                    placeholder: "Create new field name",
                    oninput: move |evt| new_field_name.set(evt.value()),
                }
                button {
                    class: "btn btn-secondary",
                    r#type: "button",
                    disabled: creating() || new_field_name().trim().is_empty(),
                    onclick: move |_| create_field.call(()),
                    if creating() { "Creating..." } else { "Create" }
                }
            }
            if !error_text.is_empty() {
                p { class: "error", "{error_text}" }
            }
        }
    }
}
