use dioxus::prelude::*;

use quiz_core::model::{PaymentAction, PendingPayment};

use crate::context::AppContext;
use crate::views::{ViewError, ViewState, view_state_from_resource};

/// Admin review queue for payment proofs.
#[component]
pub fn AdminPaymentsView() -> Element {
    let ctx = use_context::<AppContext>();
    let payments = ctx.payments();

    let error = use_signal(String::new);

    let payments_for_resource = payments.clone();
    let resource = use_resource(move || {
        let payments = payments_for_resource.clone();
        async move {
            payments
                .pending()
                .await
                .map_err(|_| ViewError::Unknown)
        }
    });
    let state: ViewState<Vec<PendingPayment>> = view_state_from_resource(&resource);

    let review = {
        let payments = payments.clone();
        use_callback(move |(id, action): (String, PaymentAction)| {
            let payments = payments.clone();
            let mut error = error;
            let mut resource = resource;
            spawn(async move {
                match payments.review(&id, action).await {
                    Ok(()) => {
                        error.set(String::new());
                        resource.restart();
                    }
                    Err(err) => error.set(err.to_string()),
                }
            });
        })
    };

    let error_text = error();

    rsx! {
        div { class: "page admin-page",
            h2 { "Pending Payments" }
            if !error_text.is_empty() {
                p { class: "error", "{error_text}" }
            }
            match state {
                ViewState::Idle => rsx! { p { "Idle" } },
                ViewState::Loading => rsx! { p { "Loading payments..." } },
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
                ViewState::Ready(pending) => rsx! {
                    if pending.is_empty() {
                        p { "Nothing waiting for review." }
                    } else {
                        table { class: "payments-table",
                            thead {
                                tr {
                                    th { "Order" }
                                    th { "Amount" }
                                    th { "UTR" }
                                    th { "Actions" }
                                }
                            }
                            tbody {
                                for payment in pending.iter() {
                                    tr { key: "{payment.id}",
                                        td { "{payment.order_id}" }
                                        td { "₹{payment.amount}" }
                                        td { {payment.utr.as_deref().unwrap_or("-")} }
                                        td {
                                            button {
                                                class: "btn",
                                                r#type: "button",
                                                onclick: {
                                                    let id = payment.id.clone();
                                                    move |_| review.call((id.clone(), PaymentAction::Approve))
                                                },
                                                "Approve"
                                            }
                                            button {
                                                class: "btn btn-danger",
                                                r#type: "button",
                                                onclick: {
                                                    let id = payment.id.clone();
                                                    move |_| review.call((id.clone(), PaymentAction::Reject))
                                                },
                                                "Reject"
                                            }
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
