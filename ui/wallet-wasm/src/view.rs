//! Renders the controller state into the page.

use crate::dom::{self, Elements};
use crate::state;
use ws_session_core::SessionState;

pub const CREATE_LABEL: &str = "Create wallet";
pub const CREATING_LABEL: &str = "Creating\u{2026}";

/// Status line text for a state.
pub fn status_text(state: &SessionState) -> String {
    match state {
        SessionState::NoSession => String::new(),
        SessionState::Creating { pending } => {
            format!("Creating wallet for {}\u{2026}", pending.username())
        }
        SessionState::Active { session } => format!("Signed in as {}", session.name()),
        SessionState::CreationFailed { error } => error.user_message().to_owned(),
    }
}

/// Console line for a failed creation. Keeps the cause the status line hides.
pub fn failure_log(state: &SessionState) -> Option<String> {
    match state {
        SessionState::CreationFailed { error } => Some(format!("wallet creation failed: {error}")),
        _ => None,
    }
}

pub fn render(els: &Elements) {
    let current = state::current();

    let creating = current.is_creating();
    els.create_wallet_btn.set_disabled(creating);
    els.wallet_name_input.set_disabled(creating);
    dom::set_text(
        &els.create_wallet_btn,
        if creating { CREATING_LABEL } else { CREATE_LABEL },
    );

    match current.session() {
        Some(session) => {
            dom::set_text(&els.session_name, session.name());
            dom::set_text(&els.session_address, session.address());
            dom::set_text(&els.session_balance, &session.balance().to_string());
            dom::set_visible(&els.create_form, false);
            dom::set_visible(&els.session_panel, true);
        }
        None => {
            dom::set_visible(&els.create_form, true);
            dom::set_visible(&els.session_panel, false);
        }
    }

    dom::set_text(&els.status_line, &status_text(&current));
    if matches!(current, SessionState::CreationFailed { .. }) {
        dom::add_class(&els.status_line, "error");
    } else {
        dom::remove_class(&els.status_line, "error");
    }
}

pub fn show_validation(els: &Elements, message: &str) {
    dom::add_class(&els.validation_msg, "error");
    dom::set_text(&els.validation_msg, message);
}

pub fn clear_validation(els: &Elements) {
    dom::remove_class(&els.validation_msg, "error");
    dom::set_text(&els.validation_msg, "");
}
