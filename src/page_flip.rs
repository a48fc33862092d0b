//! StPageFlip bindings
//!
//! Wraps the `St.PageFlip` global (page-flip.browser.js) as the page-turn
//! engine the flipbook controller drives.

use inkwell_core::flipbook::{EngineFactory, EngineSettings, PageSpec, PageTurnEngine, PositionSink};
use inkwell_core::EngineError;
use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

use crate::dom;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = St)]
    type PageFlip;

    #[wasm_bindgen(constructor, catch, js_namespace = St)]
    fn new(element: &HtmlElement, settings: &JsValue) -> Result<PageFlip, JsValue>;

    #[wasm_bindgen(method, catch, js_name = loadFromHTML)]
    fn load_from_html(this: &PageFlip, items: &js_sys::Array) -> Result<(), JsValue>;

    #[wasm_bindgen(method, js_name = flipNext)]
    fn flip_next(this: &PageFlip);

    #[wasm_bindgen(method, js_name = flipPrev)]
    fn flip_prev(this: &PageFlip);

    #[wasm_bindgen(method)]
    fn flip(this: &PageFlip, page: u32);

    #[wasm_bindgen(method, js_name = getPageCount)]
    fn get_page_count(this: &PageFlip) -> u32;

    #[wasm_bindgen(method)]
    fn on(this: &PageFlip, event: &str, handler: &Closure<dyn FnMut(JsValue)>);

    #[wasm_bindgen(method, catch)]
    fn destroy(this: &PageFlip) -> Result<(), JsValue>;
}

/// Builds engines on the `.book-flipbook` element inside one book container.
pub struct PageFlipFactory {
    root_id: String,
}

impl PageFlipFactory {
    pub fn new(root_id: impl Into<String>) -> Self {
        Self {
            root_id: root_id.into(),
        }
    }
}

impl EngineFactory for PageFlipFactory {
    type Engine = PageFlipEngine;

    fn create(&mut self, settings: &EngineSettings) -> Result<PageFlipEngine, EngineError> {
        let mount = dom::by_id(&self.root_id)
            .and_then(|root| dom::query(&root, ".book-flipbook"))
            .ok_or_else(|| EngineError::Construct(format!("no flip surface in #{}", self.root_id)))?;
        let options = serde_wasm_bindgen::to_value(settings)
            .map_err(|e| EngineError::Construct(e.to_string()))?;
        let flip = PageFlip::new(&mount, &options)
            .map_err(|e| EngineError::Construct(dom::js_error(&e)))?;
        Ok(PageFlipEngine {
            flip,
            mount,
            on_flip: None,
        })
    }
}

pub struct PageFlipEngine {
    flip: PageFlip,
    mount: HtmlElement,
    // Must outlive every "flip" event the engine can still emit.
    on_flip: Option<Closure<dyn FnMut(JsValue)>>,
}

fn page_element(spec: &PageSpec) -> Option<HtmlElement> {
    let class = if spec.is_cover() { "page page-cover" } else { "page" };
    let page = dom::create("div", class)?;
    page.set_attribute("data-density", spec.density.as_str()).ok()?;
    let img = dom::create("img", "")?;
    img.set_attribute("src", &spec.src).ok()?;
    img.set_attribute("alt", &spec.alt).ok()?;
    page.append_child(&img).ok()?;
    Some(page)
}

impl PageTurnEngine for PageFlipEngine {
    fn load_pages(&mut self, pages: &[PageSpec]) -> Result<(), EngineError> {
        let items = js_sys::Array::new();
        for spec in pages {
            let page = page_element(spec)
                .ok_or_else(|| EngineError::Load(format!("could not build page {}", spec.src)))?;
            self.mount
                .append_child(&page)
                .map_err(|e| EngineError::Load(dom::js_error(&e)))?;
            items.push(&page);
        }
        self.flip
            .load_from_html(&items)
            .map_err(|e| EngineError::Load(dom::js_error(&e)))
    }

    fn subscribe(&mut self, sink: PositionSink) {
        let handler = Closure::<dyn FnMut(JsValue)>::new(move |event: JsValue| {
            let leaf = js_sys::Reflect::get(&event, &JsValue::from_str("data"))
                .ok()
                .and_then(|v| v.as_f64());
            match leaf {
                Some(leaf) if leaf >= 0.0 => sink(leaf as usize),
                _ => tracing::warn!("Flip event without a page index"),
            }
        });
        self.flip.on("flip", &handler);
        self.on_flip = Some(handler);
    }

    fn advance(&mut self) {
        self.flip.flip_next();
    }

    fn retreat(&mut self) {
        self.flip.flip_prev();
    }

    fn go_to_leaf(&mut self, index: usize) {
        self.flip.flip(u32::try_from(index).unwrap_or(u32::MAX));
    }

    fn leaf_count(&self) -> usize {
        self.flip.get_page_count() as usize
    }

    fn destroy(&mut self) -> Result<(), EngineError> {
        let result = self
            .flip
            .destroy()
            .map_err(|e| EngineError::Destroy(dom::js_error(&e)));
        self.on_flip = None;
        result
    }
}
