use dioxus::prelude::*;
use dioxus_router::Link;

use crate::routes::Route;

/// Marketing front page. Copy only; the styling lives in the app shell.
#[component]
pub fn LandingView() -> Element {
    let features = [
        ("Daily Quizzes", "Fresh, exam-style questions to sharpen your skills"),
        ("Performance Reports", "Per-question breakdowns after every attempt"),
        ("Timed Practice", "Real exam pressure with an auto-submitting clock"),
    ];

    rsx! {
        div { class: "page landing-page",
            section { class: "hero",
                h2 { "Ace your exams with MyTestBuddies" }
                p {
                    "Join students preparing for competitive exams with daily "
                    "quizzes and personalised score reports."
                }
                div { class: "hero-actions",
                    Link { class: "btn", to: Route::Register {}, "Start Free Trial" }
                    Link { class: "btn btn-secondary", to: Route::Login {}, "Already a member?" }
                }
            }
            section { class: "features",
                h3 { "Why MyTestBuddies?" }
                ul {
                    for (title, description) in features.iter() {
                        li { key: "{title}",
                            strong { "{title}" }
                            p { "{description}" }
                        }
                    }
                }
            }
        }
    }
}
