//! Console logging that stays callable from native tests.
//!
//! In the browser messages go to `console.debug`/`console.warn`; everywhere
//! else they go through the `log` facade.

pub(crate) fn debug(message: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::debug_1(&wasm_bindgen::JsValue::from_str(message));
    #[cfg(not(target_arch = "wasm32"))]
    log::debug!("{}", message);
}

pub(crate) fn warn(message: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::warn_1(&wasm_bindgen::JsValue::from_str(message));
    #[cfg(not(target_arch = "wasm32"))]
    log::warn!("{}", message);
}
