use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable};

use crate::views::{
    AdminAddQuestionView, AdminFieldsView, AdminPaymentsView, DashboardView, JoinQuizView,
    LandingView, LoginView, QuizView, RegisterView,
};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", LandingView)] Landing {},
        #[route("/login", LoginView)] Login {},
        #[route("/register", RegisterView)] Register {},
        #[route("/dashboard", DashboardView)] Dashboard {},
        #[route("/quiz/:field_id", QuizView)] Quiz { field_id: String },
        #[route("/quiz/:field_id/join", JoinQuizView)] JoinQuiz { field_id: String },
        #[route("/admin/fields", AdminFieldsView)] AdminFields {},
        #[route("/admin/questions", AdminAddQuestionView)] AdminAddQuestion {},
        #[route("/admin/payments", AdminPaymentsView)] AdminPayments {},
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            Navbar {}
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
fn Navbar() -> Element {
    rsx! {
        nav { class: "navbar",
            h1 { "MyTestBuddies" }
            ul {
                li { Link { to: Route::Landing {}, "Home" } }
                li { Link { to: Route::Dashboard {}, "Dashboard" } }
                li { Link { to: Route::AdminFields {}, "Fields" } }
                li { Link { to: Route::AdminAddQuestion {}, "Add Question" } }
                li { Link { to: Route::AdminPayments {}, "Payments" } }
                li { Link { to: Route::Login {}, "Login" } }
            }
        }
    }
}
