use leptos::prelude::*;

use inkwell_core::WriterMode;

use crate::content::EssayEntryData;
use crate::dom;
use crate::writer_host::SharedHost;

const MODES: [(WriterMode, &str, &str); 2] = [
    (WriterMode::Typewriter, "Kucanje", "Režim kucanja"),
    (WriterMode::Handwriting, "Rukopis", "Režim rukopisa"),
];

/// Swap the reading font of a finished handwritten essay.
fn toggle_font(id: &str) {
    let Some(entry) = dom::by_id(id) else {
        return;
    };
    let classes = entry.class_list();
    if classes.contains("cursive-text") {
        let _ = classes.remove_1("cursive-text");
        let _ = classes.add_1("normal-text");
    } else {
        let _ = classes.remove_1("normal-text");
        let _ = classes.add_1("cursive-text");
    }
}

/// One essay, typed out by the shared writer host when its turn comes.
#[component]
pub fn EssayEntry(data: EssayEntryData, index: usize, host: SharedHost) -> impl IntoView {
    let initial_mode = host.borrow().mode(index).unwrap_or_default();
    let mode = RwSignal::new(initial_mode);
    let locked = data.mode.is_some();

    let mode_toggle = (!locked).then(|| {
        let buttons = MODES
            .into_iter()
            .map(|(option, label, aria)| {
                let host = host.clone();
                let class = move || {
                    if mode.get() == option {
                        "active"
                    } else {
                        ""
                    }
                };
                view! {
                    <button
                        type="button"
                        class=class
                        data-mode=option.as_str()
                        aria-label=aria
                        on:click=move |_| {
                            let changed = host
                                .try_borrow_mut()
                                .map(|mut h| h.select_mode(index, option))
                                .unwrap_or(false);
                            if changed {
                                mode.set(option);
                            }
                        }
                    >
                        {label}
                    </button>
                }
            })
            .collect_view();
        view! { <div class="essay-mode-toggle">{buttons}</div> }
    });

    let skip_host = host.clone();
    let on_skip = move |_| {
        if let Ok(mut host) = skip_host.try_borrow_mut() {
            host.skip(index);
        }
    };

    let font_target = data.slug.clone();
    let author = data.author.clone();

    view! {
        <article
            class="essay-entry waiting-to-animate"
            id=data.slug.clone()
            data-mode=data.mode.map(WriterMode::as_str)
        >
            <div class="essay-parchment">
                {mode_toggle}
                <div class="essay-paper">
                    <h2 class="essay-title">{data.title.clone()}</h2>
                    <div class="essay-content"></div>
                    <button type="button" class="essay-skip" aria-label="Preskoči animaciju" on:click=on_skip>
                        "Preskoči " <span aria-hidden="true">"›"</span>
                    </button>
                    <img class="essay-pen" src="assets/img/svg/quill.svg" alt="" aria-hidden="true" />
                    <button
                        type="button"
                        class="essay-font-toggle"
                        aria-label="Promeni font"
                        hidden=true
                        on:click=move |_| toggle_font(&font_target)
                    >
                        <span class="toggle-icon">"Aa"</span>
                    </button>
                </div>
            </div>
            {author.map(essay_meta)}
        </article>
    }
}

fn essay_meta(author: String) -> impl IntoView {
    view! {
        <div class="essay-meta">
            <span class="essay-author">{author}</span>
        </div>
    }
}

/// An essay shown in full, for when the writer animation is turned off.
#[component]
pub fn StaticEssay(data: EssayEntryData) -> impl IntoView {
    let html = inkwell_core::writer::markdown::render_blocks(&data.content);
    view! {
        <article class="essay-entry has-animated" id=data.slug.clone()>
            <div class="essay-parchment">
                <div class="essay-paper">
                    <h2 class="essay-title">{data.title.clone()}</h2>
                    <div class="essay-content" inner_html=html></div>
                </div>
            </div>
            {data.author.clone().map(essay_meta)}
        </article>
    }
}
