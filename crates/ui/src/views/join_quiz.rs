use dioxus::prelude::*;

use quiz_core::model::{FieldId, OrderQr, PaymentOrder};

use crate::context::AppContext;
use crate::views::{ViewError, ViewState, view_state_from_resource};

/// The paid-quiz join flow: open an order, show the UPI QR, collect the
/// bank UTR reference. "Start Quiz" unlocks after admin verification.
#[component]
pub fn JoinQuizView(field_id: String) -> Element {
    let ctx = use_context::<AppContext>();
    let payments = ctx.payments();
    let parsed_field = FieldId::new(field_id.clone()).ok();

    let mut utr = use_signal(String::new);
    let message = use_signal(String::new);
    let error = use_signal(String::new);
    let busy = use_signal(|| false);

    let payments_for_resource = payments.clone();
    let resource = use_resource(move || {
        let payments = payments_for_resource.clone();
        let field_id = parsed_field.clone();
        async move {
            let Some(field_id) = field_id else {
                return Err(ViewError::InvalidField);
            };
            payments
                .open_order(&field_id)
                .await
                .map_err(|_| ViewError::Unknown)
        }
    });
    let state: ViewState<(PaymentOrder, OrderQr)> = view_state_from_resource(&resource);

    let submit_utr = {
        let payments = payments.clone();
        use_callback(move |order_id: quiz_core::model::OrderId| {
            let payments = payments.clone();
            let mut message = message;
            let mut error = error;
            let mut busy = busy;
            spawn(async move {
                busy.set(true);
                match payments.submit_utr(&order_id, &utr(), None).await {
                    Ok(ack) => {
                        error.set(String::new());
                        message.set(ack);
                    }
                    Err(err) => error.set(err.to_string()),
                }
                busy.set(false);
            });
        })
    };

    let message_text = message();
    let error_text = error();

    rsx! {
        div { class: "page join-page",
            h2 { "Join Quiz" }
            match state {
                ViewState::Idle => rsx! { p { "Idle" } },
                ViewState::Loading => rsx! { p { "Preparing your order..." } },
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
                ViewState::Ready((order, qr)) => rsx! {
                    div { class: "order-card",
                        p { "Order: " b { "{order.order_id}" } }
                        p { "Amount: ₹{order.amount}" }
                        img { src: "{qr.qr_data_url}", alt: "UPI QR", width: "280" }
                        p { class: "upi-uri", "{qr.upi_uri}" }
                    }
                    div { class: "utr-form",
                        label { r#for: "utr", "Enter bank UTR / reference number" }
                        input {
                            id: "utr",
                            value: "{utr}",
                            oninput: move |evt| utr.set(evt.value()),
                        }
                        button {
                            class: "btn",
                            id: "utr-submit",
                            r#type: "button",
                            disabled: busy() || utr().trim().is_empty(),
                            onclick: {
                                let order_id = order.order_id.clone();
                                move |_| submit_utr.call(order_id.clone())
                            },
                            "Submit UTR"
                        }
                    }
                    if !message_text.is_empty() {
                        p { class: "info", "{message_text}" }
                    }
                    if !error_text.is_empty() {
                        p { class: "error", "{error_text}" }
                    }
                    p { "Note: \"Start Quiz\" unlocks after admin verification." }
                },
            }
        }
    }
}
