use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::{BookReader, EssaySection, SiteHeader};
use crate::config_loader::{self, Settings};

const BUILD_HASH: &str = env!("INKWELL_BUILD_HASH");
const BUILD_STAMP: &str = env!("INKWELL_BUILD_STAMP");

#[component]
pub fn App() -> impl IntoView {
    // Widgets mount once the config files have been fetched
    let settings = RwSignal::new(None::<Settings>);

    spawn_local(async move {
        settings.set(Some(config_loader::load().await));
    });

    view! {
        <div class="site">
            <SiteHeader />
            <main class="site-main">
                {move || settings.get().map(|s| view! { <Widgets settings=s /> })}
            </main>
            <footer class="site-footer" id="kontakt">
                <span class="build-info">{format!("{BUILD_HASH} · {BUILD_STAMP}")}</span>
            </footer>
        </div>
    }
}

#[component]
fn Widgets(settings: Settings) -> impl IntoView {
    let Settings {
        site,
        reader,
        writer,
        library,
    } = settings;
    let mobile = site.breakpoints.mobile;

    let shelf = library
        .books
        .into_iter()
        .map(|entry| {
            view! { <BookReader entry=entry config=reader.clone() mobile_breakpoint=mobile /> }
        })
        .collect_view();

    view! {
        <section class="bookshelf" id="knjige">{shelf}</section>
        <div id="eseji">
            <EssaySection essays=library.essays config=writer mobile_breakpoint=mobile />
        </div>
    }
}
