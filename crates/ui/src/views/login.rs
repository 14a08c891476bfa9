use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};

use crate::context::AppContext;
use crate::routes::Route;

#[component]
pub fn LoginView() -> Element {
    let ctx = use_context::<AppContext>();
    let auth = ctx.auth();
    let navigator = use_navigator();

    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let error = use_signal(String::new);
    let loading = use_signal(|| false);

    let submit = {
        let auth = auth.clone();
        use_callback(move |(): ()| {
            let auth = auth.clone();
            let mut error = error;
            let mut loading = loading;
            spawn(async move {
                loading.set(true);
                match auth.login(&email(), &password()).await {
                    Ok(()) => {
                        error.set(String::new());
                        navigator.push(Route::Dashboard {});
                    }
                    Err(err) => error.set(err.to_string()),
                }
                loading.set(false);
            });
        })
    };

    let error_message = error();
    let disabled = loading() || email().trim().is_empty() || password().is_empty();

    rsx! {
        div { class: "page auth-page",
            h2 { "Welcome back" }
            if !error_message.is_empty() {
                p { class: "error", id: "login-error", "{error_message}" }
            }
            label { r#for: "email", "Email" }
            input {
                id: "email",
                r#type: "email",
                value: "{email}",
                placeholder: "Enter your email",
                oninput: move |evt| email.set(evt.value()),
            }
            label { r#for: "password", "Password" }
            input {
                id: "password",
                r#type: "password",
                value: "{password}",
                placeholder: "Enter your password",
                oninput: move |evt| password.set(evt.value()),
            }
            button {
                class: "btn",
                id: "login-submit",
                r#type: "button",
                disabled,
                onclick: move |_| submit.call(()),
                if loading() { "Signing in..." } else { "Login" }
            }
            p {
                "New here? "
                Link { to: Route::Register {}, "Create an account" }
            }
        }
    }
}
