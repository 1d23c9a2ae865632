//! Wallet Session WASM Frontend
//!
//! Browser surface for the wallet session controller: a creation form, the
//! active session panel, and a logout control. The session lives in
//! `localStorage`, so a reload lands straight back in the active wallet.

pub mod api;
pub mod dom;
pub mod events;
pub mod state;
pub mod view;
pub mod wallet_ops;

use wasm_bindgen::prelude::*;
use ws_session_core::SessionController;
use ws_session_store::SessionStore;

/// WASM entry point – called automatically when the module is instantiated.
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    // Improve panic messages in the browser console
    console_error_panic_hook::set_once();

    init()
}

/// Main initialisation sequence.
fn init() -> Result<(), JsValue> {
    let els = dom::Elements::bind()?;

    let store = SessionStore::new(state::LocalStorageSlot);
    if let Err(err) = store.try_load() {
        gloo_console::warn!(format!("ignoring stored wallet session: {err}"));
    }

    // Rehydrate before the first paint so a stored session never flashes the form
    let controller = SessionController::init(store, api::FetchWalletCreator);
    gloo_console::log!(format!("wallet session: {}", controller.state().label()));
    state::install(controller);

    events::bind_events(&els)?;
    view::render(&els);

    Ok(())
}
