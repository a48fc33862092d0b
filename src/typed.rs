//! Typed.js bindings

use inkwell_core::writer::TypingPlan;
use js_sys::{Array, Object, Reflect};
use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

use crate::dom;

#[wasm_bindgen]
extern "C" {
    type Typed;

    #[wasm_bindgen(constructor, catch)]
    fn new(target: &HtmlElement, options: &JsValue) -> Result<Typed, JsValue>;

    #[wasm_bindgen(method)]
    fn destroy(this: &Typed);
}

/// One running typing animation.
pub struct TypedRun {
    typed: Typed,
    _on_complete: Closure<dyn FnMut()>,
}

impl TypedRun {
    /// Fails when the library is not loaded or rejects the options.
    pub fn start(target: &HtmlElement, plan: &TypingPlan, on_complete: impl FnMut() + 'static) -> Result<Self, String> {
        let on_complete = Closure::<dyn FnMut()>::new(on_complete);

        let options = Object::new();
        let fields: [(&str, JsValue); 7] = [
            ("strings", Array::of1(&JsValue::from_str(&plan.html)).into()),
            ("typeSpeed", f64::from(plan.char_delay_ms).into()),
            ("startDelay", f64::from(plan.start_delay_ms).into()),
            ("showCursor", plan.cursor.is_some().into()),
            ("cursorChar", plan.cursor.as_deref().unwrap_or("").into()),
            ("contentType", "html".into()),
            ("loop", false.into()),
        ];
        for (key, value) in fields {
            Reflect::set(&options, &JsValue::from_str(key), &value).map_err(|e| dom::js_error(&e))?;
        }
        Reflect::set(&options, &JsValue::from_str("onComplete"), on_complete.as_ref())
            .map_err(|e| dom::js_error(&e))?;

        let typed = Typed::new(target, &options).map_err(|e| dom::js_error(&e))?;
        Ok(Self {
            typed,
            _on_complete: on_complete,
        })
    }

    pub fn stop(self) {
        self.typed.destroy();
    }
}
