use dioxus::prelude::*;

use quiz_core::model::{Field, FieldId};

use crate::context::AppContext;
use crate::views::{ViewError, ViewState, view_state_from_resource};

/// Admin CRUD over quiz fields.
#[component]
pub fn AdminFieldsView() -> Element {
    let ctx = use_context::<AppContext>();
    let fields = ctx.fields();

    let mut name = use_signal(String::new);
    let mut description = use_signal(String::new);
    let mut audience = use_signal(String::new);
    let mut time_per_question = use_signal(String::new);
    let mut editing = use_signal(|| None::<FieldId>);
    let error = use_signal(String::new);
    let busy = use_signal(|| false);

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

    let clear_form = use_callback(move |(): ()| {
        name.set(String::new());
        description.set(String::new());
        audience.set(String::new());
        time_per_question.set(String::new());
        editing.set(None);
    });

    let save = {
        let fields = fields.clone();
        use_callback(move |(): ()| {
            let fields = fields.clone();
            let mut error = error;
            let mut busy = busy;
            let mut resource = resource;

            // An explicit value must parse; blank falls back server-side.
            let time = time_per_question();
            let time = time.trim();
            let parsed_time = if time.is_empty() {
                None
            } else {
                match time.parse::<u32>() {
                    Ok(seconds) => Some(seconds),
                    Err(_) => {
                        error.set("Time per question must be a number of seconds".to_string());
                        return;
                    }
                }
            };

            spawn(async move {
                busy.set(true);
                let result = match editing() {
                    Some(id) => {
                        fields
                            .update(&id, &name(), &description(), &audience(), parsed_time)
                            .await
                    }
                    None => {
                        fields
                            .create(&name(), &description(), &audience(), parsed_time)
                            .await
                    }
                };
                match result {
                    Ok(_) => {
                        error.set(String::new());
                        clear_form.call(());
                        resource.restart();
                    }
                    Err(err) => error.set(err.to_string()),
                }
                busy.set(false);
            });
        })
    };

    let edit = use_callback(move |field: Field| {
        name.set(field.name().to_string());
        description.set(field.description().to_string());
        audience.set(field.audience().to_string());
        time_per_question.set(field.default_time_per_question().to_string());
        editing.set(Some(field.id().clone()));
    });

    let delete = {
        let fields = fields.clone();
        use_callback(move |id: FieldId| {
            let fields = fields.clone();
            let mut error = error;
            let mut resource = resource;
            spawn(async move {
                match fields.delete(&id).await {
                    Ok(()) => resource.restart(),
                    Err(err) => error.set(err.to_string()),
                }
            });
        })
    };

    let error_text = error();
    let is_editing = editing().is_some();

    rsx! {
        div { class: "page admin-page",
            h2 { "Manage Fields" }
            if !error_text.is_empty() {
                p { class: "error", id: "fields-error", "{error_text}" }
            }
            div { class: "field-form",
                input {
                    id: "field-name",
                    value: "{name}",
                    placeholder: "Field name",
                    oninput: move |evt| name.set(evt.value()),
                }
                input {
                    id: "field-description",
                    value: "{description}",
                    placeholder: "Description",
                    oninput: move |evt| description.set(evt.value()),
                }
                input {
                    id: "field-audience",
                    value: "{audience}",
                    placeholder: "For (exam / audience)",
                    oninput: move |evt| audience.set(evt.value()),
                }
                input {
                    id: "field-time",
                    value: "{time_per_question}",
                    placeholder: "Default seconds per question",
                    oninput: move |evt| time_per_question.set(evt.value()),
                }
                button {
                    class: "btn",
                    id: "field-save",
                    r#type: "button",
                    disabled: busy() || name().trim().is_empty(),
                    onclick: move |_| save.call(()),
                    if is_editing { "Update Field" } else { "Create Field" }
                }
                if is_editing {
                    button {
                        class: "btn btn-ghost",
                        r#type: "button",
                        onclick: move |_| clear_form.call(()),
                        "Cancel edit"
                    }
                }
            }
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
                    ul { class: "admin-field-list",
                        for field in listed.iter() {
                            li { key: "{field.id()}",
                                strong { "{field.name()}" }
                                span { " · {field.default_time_per_question()}s/question" }
                                if !field.description().is_empty() {
                                    p { "{field.description()}" }
                                }
                                button {
                                    class: "btn btn-secondary",
                                    r#type: "button",
                                    onclick: {
                                        let field = field.clone();
                                        move |_| edit.call(field.clone())
                                    },
                                    "Edit"
                                }
                                button {
                                    class: "btn btn-danger",
                                    r#type: "button",
                                    onclick: {
                                        let id = field.id().clone();
                                        move |_| delete.call(id.clone())
                                    },
                                    "Delete"
                                }
                            }
                        }
                    }
                },
            }
        }
    }
}
