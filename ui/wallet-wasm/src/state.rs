//! Global application state.
//!
//! Uses `RefCell`-wrapped `thread_local!` storage (WASM is single-threaded).
//! Borrows never span an `.await`, so event handlers firing while a request
//! is in flight observe `Creating` instead of panicking on a double borrow.

use anyhow::{Result, anyhow};
use std::cell::RefCell;
use wasm_bindgen::JsValue;
use ws_session_core::{SessionController, SessionState};
use ws_session_store::DurableSlot;

use crate::api::FetchWalletCreator;

/// localStorage key of the durable session slot.
pub const SESSION_STORAGE_KEY: &str = "ws_wallet_session";

pub type Controller = SessionController<LocalStorageSlot, FetchWalletCreator>;

// ── Thread-local singleton ──

thread_local! {
    static CONTROLLER: RefCell<Option<Controller>> = const { RefCell::new(None) };
}

pub fn install(controller: Controller) {
    CONTROLLER.with(|c| *c.borrow_mut() = Some(controller));
}

/// Run a closure with mutable access to the controller, if installed.
pub fn with_mut<F, R>(f: F) -> Option<R>
where
    F: FnOnce(&mut Controller) -> R,
{
    CONTROLLER.with(|c| c.borrow_mut().as_mut().map(f))
}

/// Snapshot of the current session state.
pub fn current() -> SessionState {
    CONTROLLER.with(|c| {
        c.borrow()
            .as_ref()
            .map(|controller| controller.state().clone())
            .unwrap_or(SessionState::NoSession)
    })
}

// ── localStorage slot ──

/// The browser profile's durable slot.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStorageSlot;

fn js_err(err: JsValue) -> anyhow::Error {
    anyhow!("{:?}", err)
}

fn storage() -> Result<web_sys::Storage> {
    web_sys::window()
        .ok_or_else(|| anyhow!("no window"))?
        .local_storage()
        .map_err(js_err)?
        .ok_or_else(|| anyhow!("localStorage unavailable"))
}

impl DurableSlot for LocalStorageSlot {
    fn read(&self) -> Result<Option<String>> {
        storage()?.get_item(SESSION_STORAGE_KEY).map_err(js_err)
    }

    fn write(&self, value: &str) -> Result<()> {
        storage()?
            .set_item(SESSION_STORAGE_KEY, value)
            .map_err(js_err)
    }

    fn remove(&self) -> Result<()> {
        storage()?.remove_item(SESSION_STORAGE_KEY).map_err(js_err)
    }
}
