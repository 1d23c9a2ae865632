//! Wallet session controller.
//!
//! Drives `NoSession -> Creating -> Active | CreationFailed` and keeps the
//! [`SessionStore`] in step with the active session. The controller never
//! touches ambient storage or the network directly: both are injected.

use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;
use ws_api_types::{WalletCreateRequest, WalletCreateResponse, WalletSession};
use ws_session_store::{DurableSlot, SessionStore};
use ws_wallet_client::{CreateError, WalletCreator};

/// An accepted submission waiting for the service response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCreation {
    id: Uuid,
    username: String,
}

impl PendingCreation {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn request(&self) -> WalletCreateRequest {
        WalletCreateRequest {
            username: self.username.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CreationError {
    #[error("wallet service request failed: {message}")]
    Network { status: Option<u16>, message: String },
    #[error("wallet service returned a malformed response: {0}")]
    MalformedResponse(String),
}

impl CreationError {
    /// Text shown to the user. Identical for every variant.
    pub fn user_message(&self) -> &'static str {
        "Wallet creation failed. Please try again."
    }
}

impl From<CreateError> for CreationError {
    fn from(err: CreateError) -> Self {
        match err {
            CreateError::Transport(message) => CreationError::Network {
                status: None,
                message,
            },
            CreateError::Status { status, body } => CreationError::Network {
                status: Some(status),
                message: body,
            },
            CreateError::Malformed(message) => CreationError::MalformedResponse(message),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    NoSession,
    Creating { pending: PendingCreation },
    Active { session: WalletSession },
    CreationFailed { error: CreationError },
}

impl SessionState {
    pub fn session(&self) -> Option<&WalletSession> {
        match self {
            SessionState::Active { session } => Some(session),
            _ => None,
        }
    }

    pub fn is_creating(&self) -> bool {
        matches!(self, SessionState::Creating { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            SessionState::NoSession => "no_session",
            SessionState::Creating { .. } => "creating",
            SessionState::Active { .. } => "active",
            SessionState::CreationFailed { .. } => "creation_failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("wallet name is required")]
    EmptyName,
    #[error("a wallet creation request is already in flight")]
    AlreadyCreating,
    #[error("a wallet session is already active; log out first")]
    SessionActive,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LogoutError {
    #[error("cannot log out while a wallet creation request is in flight")]
    CreationInFlight,
}

pub struct SessionController<D, C> {
    store: SessionStore<D>,
    creator: C,
    state: SessionState,
}

impl<D, C> SessionController<D, C>
where
    D: DurableSlot,
    C: WalletCreator,
{
    /// Rehydrates from the store. A stored session makes the controller
    /// start in `Active` without any network call.
    pub fn init(store: SessionStore<D>, creator: C) -> Self {
        let state = match store.load() {
            Some(session) => {
                info!(address = session.address(), "restored wallet session");
                SessionState::Active { session }
            }
            None => SessionState::NoSession,
        };

        Self {
            store,
            creator,
            state,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn creator(&self) -> &C {
        &self.creator
    }

    /// Validates `name` and enters `Creating`.
    ///
    /// The caller must issue exactly one request for the returned submission
    /// and hand its outcome to [`SessionController::complete`].
    pub fn begin_submit(&mut self, name: &str) -> Result<PendingCreation, SubmitError> {
        match &self.state {
            SessionState::Creating { pending } => {
                debug!(submission = %pending.id, "ignoring submit while creation is in flight");
                return Err(SubmitError::AlreadyCreating);
            }
            SessionState::Active { .. } => return Err(SubmitError::SessionActive),
            SessionState::NoSession | SessionState::CreationFailed { .. } => {}
        }

        let username = name.trim();
        if username.is_empty() {
            return Err(SubmitError::EmptyName);
        }

        let pending = PendingCreation {
            id: Uuid::new_v4(),
            username: username.to_owned(),
        };
        info!(submission = %pending.id, username, "wallet creation submitted");

        self.state = SessionState::Creating {
            pending: pending.clone(),
        };
        Ok(pending)
    }

    /// Reconciles the outcome of an in-flight submission.
    ///
    /// Outcomes for any submission other than the one in flight are dropped.
    pub fn complete(
        &mut self,
        pending: &PendingCreation,
        outcome: Result<WalletCreateResponse, CreateError>,
    ) -> &SessionState {
        let in_flight = matches!(
            &self.state,
            SessionState::Creating { pending: current } if current.id == pending.id
        );
        if !in_flight {
            warn!(submission = %pending.id, "ignoring response for a stale wallet creation");
            return &self.state;
        }

        let result = outcome.map_err(CreationError::from).and_then(|response| {
            WalletSession::from_create_response(&pending.username, response)
                .map_err(|err| CreationError::MalformedResponse(err.to_string()))
        });

        self.state = match result {
            Ok(session) => {
                if let Err(err) = self.store.save(&session) {
                    warn!(
                        submission = %pending.id,
                        error = %err,
                        "wallet created but the session could not be persisted"
                    );
                }
                info!(submission = %pending.id, address = session.address(), "wallet session active");
                SessionState::Active { session }
            }
            Err(error) => {
                match &error {
                    CreationError::Network { status, message } => warn!(
                        submission = %pending.id,
                        status = ?status,
                        message = %message,
                        "wallet creation failed"
                    ),
                    CreationError::MalformedResponse(reason) => warn!(
                        submission = %pending.id,
                        reason = %reason,
                        "wallet service returned a malformed response"
                    ),
                }
                SessionState::CreationFailed { error }
            }
        };

        &self.state
    }

    /// Submits `name`, issuing exactly one creation request, and returns the
    /// state the submission resolved to.
    pub async fn submit(&mut self, name: &str) -> Result<&SessionState, SubmitError> {
        let pending = self.begin_submit(name)?;
        let outcome = self.creator.create_wallet(&pending.request()).await;
        Ok(self.complete(&pending, outcome))
    }

    /// Returns to `NoSession`, clearing the durable slot if a session was active.
    pub fn logout(&mut self) -> Result<(), LogoutError> {
        match &self.state {
            SessionState::Creating { .. } => return Err(LogoutError::CreationInFlight),
            SessionState::NoSession => return Ok(()),
            SessionState::Active { session } => {
                info!(address = session.address(), "logging out of wallet session");
                if let Err(err) = self.store.clear() {
                    warn!(error = %err, "failed to clear the stored wallet session");
                }
            }
            SessionState::CreationFailed { .. } => {}
        }

        self.state = SessionState::NoSession;
        Ok(())
    }
}
