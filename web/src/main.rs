use std::rc::Rc;
use std::sync::Arc;

use dioxus::prelude::*;

use ui::core::context::AppContext;
use ui::data::source::EmbeddedSource;
use ui::views::Dashboard;
use ui::vote::store::MemoryCounterStore;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[route("/")]
    Home {},
}

const MAIN_CSS: Asset = asset!("/assets/main.css");

/// The provisional dataset ships with the app; swap the source behind
/// `AppContext` to fetch a live export instead.
const DATASET_CSV: &str = include_str!("../assets/overdose_deaths.csv");

fn main() {
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    // Constructed once at startup; components reach these through context.
    use_context_provider(|| {
        AppContext::new(
            Rc::new(EmbeddedSource::new(DATASET_CSV)),
            Arc::new(MemoryCounterStore::new()),
        )
    });

    rsx! {
        document::Link { rel: "stylesheet", href: MAIN_CSS }

        Router::<Route> {}
    }
}

#[component]
fn Home() -> Element {
    rsx! {
        Dashboard {}
    }
}
