use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};

use quiz_core::model::Field;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};

/// The student home: profile greeting plus the fields open for practice.
#[component]
pub fn DashboardView() -> Element {
    let ctx = use_context::<AppContext>();
    let auth = ctx.auth();
    let fields = ctx.fields();
    let navigator = use_navigator();

    let me_resource = {
        let auth = auth.clone();
        use_resource(move || {
            let auth = auth.clone();
            async move {
                auth.current_user()
                    .await
                    .map_err(|_| ViewError::Unknown)
            }
        })
    };

    let fields_resource = {
        let fields = fields.clone();
        use_resource(move || {
            let fields = fields.clone();
            async move {
                fields
                    .list()
                    .await
                    .map_err(|_| ViewError::Unknown)
            }
        })
    };
    let fields_state: ViewState<Vec<Field>> = view_state_from_resource(&fields_resource);

    let greeting = me_resource
        .value()
        .read()
        .as_ref()
        .and_then(|value| value.as_ref().ok())
        .map_or_else(|| "Student".to_string(), |user| user.name.clone());

    let logout = {
        let auth = auth.clone();
        use_callback(move |(): ()| {
            let _ = auth.logout();
            navigator.push(Route::Landing {});
        })
    };

    rsx! {
        div { class: "page dashboard-page",
            header { class: "dashboard-header",
                h2 { "Welcome back, {greeting}!" }
                button {
                    class: "btn btn-ghost",
                    id: "logout",
                    r#type: "button",
                    onclick: move |_| logout.call(()),
                    "Logout"
                }
            }
            div { class: "announcement",
                strong { "Important" }
                p { "Your next mega test will be announced by email and WhatsApp." }
            }
            h3 { "Practice fields" }
            match fields_state {
                ViewState::Idle => rsx! { p { "Idle" } },
                ViewState::Loading => rsx! { p { "Loading fields..." } },
                ViewState::Error(err) => rsx! {
                    p { class: "error", "{err.message()}" }
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        onclick: move |_| {
                            let mut fields_resource = fields_resource;
                            fields_resource.restart();
                        },
                        "Retry"
                    }
                },
                ViewState::Ready(fields) => rsx! {
                    if fields.is_empty() {
                        p { "No fields are open yet. Check back later." }
                    } else {
                        ul { class: "field-list",
                            for field in fields.iter() {
                                li { key: "{field.id()}", class: "field-card",
                                    strong { "{field.name()}" }
                                    if !field.description().is_empty() {
                                        p { "{field.description()}" }
                                    }
                                    if !field.audience().is_empty() {
                                        span { class: "field-audience", "For: {field.audience()}" }
                                    }
                                    div { class: "field-actions",
                                        Link {
                                            class: "btn",
                                            to: Route::Quiz { field_id: field.id().to_string() },
                                            "Start Quiz"
                                        }
                                        Link {
                                            class: "btn btn-secondary",
                                            to: Route::JoinQuiz { field_id: field.id().to_string() },
                                            "Join (paid)"
                                        }
                                    }
                                }
                            }
                        }
                    }
                },
            }
        }
    }
}
