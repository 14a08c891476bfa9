use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};

use quiz_core::model::UserRole;
use services::{AuthError, OTP_RESEND_WINDOW_SECS, RegistrationForm};

use crate::context::AppContext;
use crate::routes::Route;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Step {
    BasicInfo,
    UserType,
}

/// Two-step registration: basic info with email OTP verification, then
/// user type. The account is created only after the OTP check passes.
#[component]
pub fn RegisterView() -> Element {
    let ctx = use_context::<AppContext>();
    let auth = ctx.auth();
    let navigator = use_navigator();

    let mut name = use_signal(String::new);
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut mobile = use_signal(String::new);
    let mut role = use_signal(|| None::<UserRole>);

    let mut step = use_signal(|| Step::BasicInfo);
    let field_error = use_signal(String::new);
    let info = use_signal(String::new);

    let mut otp_open = use_signal(|| false);
    let mut otp = use_signal(String::new);
    let otp_error = use_signal(String::new);
    let resend_left = use_signal(|| 0_u32);
    let busy = use_signal(|| false);

    let form = move || RegistrationForm {
        name: name(),
        email: email(),
        password: password(),
        mobile: mobile(),
        role: role(),
    };

    // Resend window countdown; one loop per send, keyed on the remaining
    // seconds it was started with.
    let start_resend_window = use_callback(move |(): ()| {
        let mut resend_left = resend_left;
        resend_left.set(OTP_RESEND_WINDOW_SECS);
        spawn(async move {
            while resend_left() > 0 {
                tokio::time::sleep(std::time::Duration::from_secs(1)).await;
                let left = resend_left();
                if left == 0 {
                    break;
                }
                resend_left.set(left - 1);
            }
        });
    });

    let send_otp = {
        let auth = auth.clone();
        use_callback(move |(): ()| {
            let auth = auth.clone();
            let mut field_error = field_error;
            let mut info = info;
            let mut otp_error = otp_error;
            let mut busy = busy;
            let form = form();

            // Validate everything the learner typed before any request.
            if let Err(err) = form.validate() {
                field_error.set(err.to_string());
                return;
            }

            spawn(async move {
                busy.set(true);
                field_error.set(String::new());
                otp_error.set(String::new());
                match auth.send_otp(&form.email).await {
                    Ok(()) => {
                        otp_open.set(true);
                        info.set("OTP sent to your email. Check inbox and spam.".to_string());
                        start_resend_window.call(());
                    }
                    Err(err) => field_error.set(err.to_string()),
                }
                busy.set(false);
            });
        })
    };

    let verify_otp = {
        let auth = auth.clone();
        use_callback(move |(): ()| {
            let auth = auth.clone();
            let mut otp_error = otp_error;
            let mut busy = busy;
            spawn(async move {
                busy.set(true);
                match auth.verify_otp(&email(), &otp()).await {
                    Ok(()) => {
                        otp_open.set(false);
                        otp_error.set(String::new());
                        step.set(Step::UserType);
                    }
                    Err(AuthError::EmptyOtp) => otp_error.set(AuthError::EmptyOtp.to_string()),
                    Err(_) => otp_error.set("Invalid or expired OTP. Try again.".to_string()),
                }
                busy.set(false);
            });
        })
    };

    let create_account = {
        let auth = auth.clone();
        use_callback(move |(): ()| {
            let auth = auth.clone();
            let mut field_error = field_error;
            let mut busy = busy;
            let form = form();
            spawn(async move {
                busy.set(true);
                match auth.register(&form).await {
                    Ok(()) => {
                        navigator.push(Route::Login {});
                    }
                    Err(err) => field_error.set(err.to_string()),
                }
                busy.set(false);
            });
        })
    };

    let field_message = field_error();
    let info_message = info();
    let otp_message = otp_error();
    let resend_secs = resend_left();
    let step_now = step();
    let all_filled = !name().trim().is_empty()
        && !email().trim().is_empty()
        && !password().is_empty()
        && mobile().len() == 10;

    rsx! {
        div { class: "page auth-page",
            h2 { "Create your account" }
            if !field_message.is_empty() {
                p { class: "error", id: "register-error", "{field_message}" }
            }
            if !info_message.is_empty() {
                p { class: "info", "{info_message}" }
            }
            match step_now {
                Step::BasicInfo => rsx! {
                    label { r#for: "name", "Full name" }
                    input {
                        id: "name",
                        value: "{name}",
                        placeholder: "Your full name",
                        oninput: move |evt| name.set(evt.value()),
                    }
                    label { r#for: "email", "Email" }
                    input {
                        id: "email",
                        r#type: "email",
                        value: "{email}",
                        placeholder: "you@example.com",
                        oninput: move |evt| email.set(evt.value()),
                    }
                    label { r#for: "password", "Password" }
                    input {
                        id: "password",
                        r#type: "password",
                        value: "{password}",
                        placeholder: "At least 6 characters",
                        oninput: move |evt| password.set(evt.value()),
                    }
                    label { r#for: "mobile", "WhatsApp number" }
                    input {
                        id: "mobile",
                        value: "{mobile}",
                        placeholder: "10-digit mobile number",
                        oninput: move |evt| {
                            // Digits only, clamped to 10.
                            let digits: String = evt
                                .value()
                                .chars()
                                .filter(char::is_ascii_digit)
                                .take(10)
                                .collect();
                            mobile.set(digits);
                        },
                    }
                    button {
                        class: "btn",
                        id: "register-continue",
                        r#type: "button",
                        disabled: !all_filled || busy(),
                        onclick: move |_| send_otp.call(()),
                        if busy() { "Sending OTP..." } else { "Continue" }
                    }
                    p {
                        "Already a member? "
                        Link { to: Route::Login {}, "Login" }
                    }
                },
                Step::UserType => rsx! {
                    p { "Who is this account for?" }
                    label { class: "role-option",
                        input {
                            r#type: "radio",
                            name: "role",
                            checked: role() == Some(UserRole::Student),
                            onchange: move |_| role.set(Some(UserRole::Student)),
                        }
                        " Student"
                    }
                    label { class: "role-option",
                        input {
                            r#type: "radio",
                            name: "role",
                            checked: role() == Some(UserRole::Admin),
                            onchange: move |_| role.set(Some(UserRole::Admin)),
                        }
                        " Admin"
                    }
                    button {
                        class: "btn",
                        id: "register-submit",
                        r#type: "button",
                        disabled: role().is_none() || busy(),
                        onclick: move |_| create_account.call(()),
                        if busy() { "Creating account..." } else { "Create account" }
                    }
                },
            }
            if otp_open() {
                div { class: "modal-backdrop", role: "dialog", aria_modal: "true",
                    div { class: "modal",
                        h3 { "Verify your email" }
                        p { "Enter the 6-digit OTP sent to {email}" }
                        input {
                            id: "otp",
                            value: "{otp}",
                            placeholder: "Enter OTP",
                            oninput: move |evt| {
                                let digits: String = evt
                                    .value()
                                    .chars()
                                    .filter(char::is_ascii_digit)
                                    .take(6)
                                    .collect();
                                otp.set(digits);
                            },
                        }
                        if !otp_message.is_empty() {
                            p { class: "error", "{otp_message}" }
                        }
                        button {
                            class: "btn",
                            id: "otp-verify",
                            r#type: "button",
                            disabled: busy(),
                            onclick: move |_| verify_otp.call(()),
                            "Verify"
                        }
                        button {
                            class: "btn btn-secondary",
                            id: "otp-resend",
                            r#type: "button",
                            disabled: busy() || resend_secs > 0,
                            onclick: move |_| send_otp.call(()),
                            if resend_secs > 0 { "Resend in {resend_secs}s" } else { "Resend OTP" }
                        }
                        button {
                            class: "btn btn-ghost",
                            r#type: "button",
                            onclick: move |_| otp_open.set(false),
                            "Cancel"
                        }
                    }
                }
            }
        }
    }
}
