use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};

use api::{InMemoryBackend, InMemoryTokenStore};
use quiz_core::model::{Field, FieldId, Question, QuestionId, QuestionKind};
use quiz_core::time::{fixed_clock, fixed_now};
use services::{
    AuthService, FieldService, PaymentService, QuestionService, QuizFlowService,
};

use crate::context::{UiApp, build_app_context};
use crate::views::quiz::QuizTestHandles;
use crate::views::{DashboardView, LandingView, QuizView};

#[derive(Clone)]
struct TestApp {
    auth: Arc<AuthService>,
    fields: Arc<FieldService>,
    questions: Arc<QuestionService>,
    payments: Arc<PaymentService>,
    quiz_flow: Arc<QuizFlowService>,
}

impl UiApp for TestApp {
    fn auth(&self) -> Arc<AuthService> {
        Arc::clone(&self.auth)
    }

    fn fields(&self) -> Arc<FieldService> {
        Arc::clone(&self.fields)
    }

    fn questions(&self) -> Arc<QuestionService> {
        Arc::clone(&self.questions)
    }

    fn payments(&self) -> Arc<PaymentService> {
        Arc::clone(&self.payments)
    }

    fn quiz_flow(&self) -> Arc<QuizFlowService> {
        Arc::clone(&self.quiz_flow)
    }
}

#[derive(Clone, PartialEq, Eq)]
pub enum ViewKind {
    Landing,
    Dashboard,
    Quiz(String),
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
    quiz_handles: Option<QuizTestHandles>,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for ViewHarnessProps {}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view.clone());
    if let Some(handles) = props.quiz_handles.clone() {
        use_context_provider(|| handles);
    }
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Landing => rsx! { LandingView {} },
        ViewKind::Dashboard => rsx! { DashboardView {} },
        ViewKind::Quiz(field_id) => rsx! { QuizView { field_id } },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub backend: InMemoryBackend,
    pub quiz_handles: Option<QuizTestHandles>,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn seeded_field(backend: &InMemoryBackend, id: &str, name: &str) -> FieldId {
    let field_id = FieldId::new(id).expect("field id");
    let field = Field::new(field_id.clone(), name, "", "JEE", 60).expect("field");
    backend.seed_field(field);
    field_id
}

pub fn seeded_mcq(field: &FieldId, id: &str, text: &str, options: &[&str]) -> Question {
    Question::new(
        QuestionId::new(id).expect("question id"),
        field.clone(),
        QuestionKind::Mcq,
        text,
        options.iter().map(|s| (*s).to_string()).collect(),
        None,
        Some(30),
        fixed_now(),
    )
    .expect("question")
}

pub fn setup_view_harness(view: ViewKind, backend: InMemoryBackend) -> ViewHarness {
    let tokens = Arc::new(InMemoryTokenStore::new());
    let backend_arc = Arc::new(backend.clone());

    let app = Arc::new(TestApp {
        auth: Arc::new(AuthService::new(backend_arc.clone(), tokens)),
        fields: Arc::new(FieldService::new(backend_arc.clone())),
        questions: Arc::new(QuestionService::new(backend_arc.clone())),
        payments: Arc::new(PaymentService::new(backend_arc.clone())),
        quiz_flow: Arc::new(QuizFlowService::new(
            fixed_clock(),
            backend_arc.clone(),
            backend_arc,
        )),
    });

    let quiz_handles = match view {
        ViewKind::Quiz(_) => Some(QuizTestHandles::default()),
        _ => None,
    };

    let dom = VirtualDom::new_with_props(
        ViewRouterHarness,
        ViewHarnessProps {
            app,
            view,
            quiz_handles: quiz_handles.clone(),
        },
    );

    ViewHarness {
        dom,
        backend,
        quiz_handles,
    }
}
