//! DOM element bindings.
//!
//! All fields are resolved once at startup.
//! To add new UI elements, add a field here and bind it in `Elements::bind()`.

use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlButtonElement, HtmlElement, HtmlInputElement};

// ── Helpers ──

pub fn window() -> Result<web_sys::Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no window"))
}

fn doc() -> Result<Document, JsValue> {
    window()?
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))
}

pub fn by_id(id: &str) -> Option<Element> {
    doc().ok()?.get_element_by_id(id)
}

pub fn by_id_typed<T: JsCast>(id: &str) -> Option<T> {
    by_id(id).and_then(|e| e.dyn_into::<T>().ok())
}

pub fn set_text(el: &Element, text: &str) {
    el.set_text_content(Some(text));
}

pub fn get_input_value(el: &HtmlInputElement) -> String {
    el.value().trim().to_string()
}

pub fn add_class(el: &Element, cls: &str) {
    let _ = el.class_list().add_1(cls);
}

pub fn remove_class(el: &Element, cls: &str) {
    let _ = el.class_list().remove_1(cls);
}

pub fn set_visible(el: &HtmlElement, visible: bool) {
    let display = if visible { "" } else { "none" };
    let _ = el.style().set_property("display", display);
}

// ── Elements struct ──

/// DOM references used by the wallet session UI.
/// Clone-friendly (all inner types are reference-counted via JS GC).
#[derive(Clone)]
pub struct Elements {
    // Creation form
    pub create_form: HtmlElement,
    pub wallet_name_input: HtmlInputElement,
    pub create_wallet_btn: HtmlButtonElement,
    pub validation_msg: Element,

    // Active session
    pub session_panel: HtmlElement,
    pub session_name: Element,
    pub session_address: Element,
    pub session_balance: Element,
    pub logout_btn: HtmlButtonElement,

    pub status_line: Element,
}

macro_rules! get_el {
    ($id:expr) => {
        by_id($id).ok_or_else(|| JsValue::from_str(&format!("missing element #{}", $id)))?
    };
}

macro_rules! get_typed {
    ($ty:ty, $id:expr) => {
        by_id_typed::<$ty>($id)
            .ok_or_else(|| JsValue::from_str(&format!("missing {} #{}", stringify!($ty), $id)))?
    };
}

impl Elements {
    /// Resolve all DOM references. Call once after DOMContentLoaded.
    pub fn bind() -> Result<Elements, JsValue> {
        Ok(Elements {
            create_form: get_typed!(HtmlElement, "createForm"),
            wallet_name_input: get_typed!(HtmlInputElement, "walletNameInput"),
            create_wallet_btn: get_typed!(HtmlButtonElement, "createWalletBtn"),
            validation_msg: get_el!("validationMsg"),

            session_panel: get_typed!(HtmlElement, "sessionPanel"),
            session_name: get_el!("sessionName"),
            session_address: get_el!("sessionAddress"),
            session_balance: get_el!("sessionBalance"),
            logout_btn: get_typed!(HtmlButtonElement, "logoutBtn"),

            status_line: get_el!("statusLine"),
        })
    }
}
