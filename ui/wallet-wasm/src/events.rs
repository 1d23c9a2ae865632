//! Event binding.
//!
//! Wires all UI event listeners. To add new events, add closures here and
//! (if async) spawn via `wasm_bindgen_futures::spawn_local`.

use crate::dom::Elements;
use crate::wallet_ops;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

/// Helper: attach async click handler to an element.
macro_rules! on_click_async {
    ($el:expr, $els:expr, $handler:expr) => {{
        let els = $els.clone();
        let cb = Closure::wrap(Box::new(move |_: web_sys::MouseEvent| {
            let els2 = els.clone();
            wasm_bindgen_futures::spawn_local(async move {
                $handler(&els2).await;
            });
        }) as Box<dyn FnMut(_)>);
        $el.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())?;
        cb.forget();
    }};
}

/// Helper: attach sync click handler.
macro_rules! on_click {
    ($el:expr, $cb:expr) => {{
        let cb = Closure::wrap(Box::new($cb) as Box<dyn FnMut(web_sys::MouseEvent)>);
        $el.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())?;
        cb.forget();
    }};
}

/// Bind all UI event listeners. Call once after init.
pub fn bind_events(els: &Elements) -> Result<(), JsValue> {
    // ── Create ──
    on_click_async!(els.create_wallet_btn, els, wallet_ops::on_create_wallet);

    // Enter in the name field submits too
    {
        let els2 = els.clone();
        let cb = Closure::wrap(Box::new(move |event: web_sys::KeyboardEvent| {
            if event.key() == "Enter" {
                event.prevent_default();
                let els3 = els2.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    wallet_ops::on_create_wallet(&els3).await;
                });
            }
        }) as Box<dyn FnMut(_)>);
        els.wallet_name_input
            .add_event_listener_with_callback("keydown", cb.as_ref().unchecked_ref())?;
        cb.forget();
    }

    // ── Logout ──
    {
        let els2 = els.clone();
        on_click!(els.logout_btn, move |_: web_sys::MouseEvent| {
            wallet_ops::on_logout(&els2);
        });
    }

    Ok(())
}
