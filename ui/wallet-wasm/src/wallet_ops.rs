//! Wallet session operations triggered from the page.

use ws_session_core::SubmitError;
use ws_wallet_client::WalletCreator;

use crate::dom::{self, Elements};
use crate::state;
use crate::view;

/// POST /wallet/create
pub async fn on_create_wallet(els: &Elements) {
    let name = dom::get_input_value(&els.wallet_name_input);

    let started = state::with_mut(|c| {
        c.begin_submit(&name)
            .map(|pending| (pending, *c.creator()))
    });
    let (pending, creator) = match started {
        Some(Ok(started)) => started,
        // A second click while the first request is in flight.
        Some(Err(SubmitError::AlreadyCreating)) | None => return,
        Some(Err(err)) => {
            view::show_validation(els, &err.to_string());
            return;
        }
    };

    view::clear_validation(els);
    view::render(els);

    let outcome = creator.create_wallet(&pending.request()).await;

    state::with_mut(|c| {
        c.complete(&pending, outcome);
    });

    if let Some(line) = view::failure_log(&state::current()) {
        gloo_console::warn!(line);
    }
    view::render(els);
}

pub fn on_logout(els: &Elements) {
    if let Some(Err(err)) = state::with_mut(|c| c.logout()) {
        gloo_console::warn!(err.to_string());
    }
    els.wallet_name_input.set_value("");
    view::render(els);
}
