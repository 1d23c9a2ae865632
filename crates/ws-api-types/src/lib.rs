use serde::{Deserialize, Deserializer, Serialize, de};
use thiserror::Error;

/// Path of the remote wallet-creation endpoint, appended to the configured base URL.
pub const WALLET_CREATE_PATH: &str = "/wallet/create";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidSession {
    #[error("wallet name cannot be empty")]
    EmptyName,
    #[error("wallet address cannot be empty")]
    EmptyAddress,
    #[error("wallet balance must be a finite number")]
    NonFiniteBalance,
}

/// The single persisted/active wallet record.
///
/// Fields are private so a value of this type is always complete: every
/// constructor, including deserialization, goes through [`WalletSession::new`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WalletSession {
    name: String,
    address: String,
    balance: f64,
}

impl WalletSession {
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        balance: f64,
    ) -> Result<Self, InvalidSession> {
        let name = name.into();
        let address = address.into();

        if name.trim().is_empty() {
            return Err(InvalidSession::EmptyName);
        }
        if address.trim().is_empty() {
            return Err(InvalidSession::EmptyAddress);
        }
        if !balance.is_finite() {
            return Err(InvalidSession::NonFiniteBalance);
        }

        Ok(Self {
            name,
            address,
            balance,
        })
    }

    /// Builds a session from a 2xx creation response.
    ///
    /// This is the one place the response fallbacks live: a missing or blank
    /// `name` becomes the submitted username, a missing `balance` becomes zero.
    /// A missing or blank `address` is rejected.
    pub fn from_create_response(
        username: &str,
        response: WalletCreateResponse,
    ) -> Result<Self, InvalidSession> {
        let address = response
            .address
            .filter(|address| !address.trim().is_empty())
            .ok_or(InvalidSession::EmptyAddress)?;

        let name = match response.name {
            Some(name) if !name.trim().is_empty() => name,
            _ => username.to_owned(),
        };

        let balance = response.balance.unwrap_or(0.0);

        Self::new(name, address, balance)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawWalletSession {
    name: String,
    address: String,
    balance: f64,
}

impl<'de> Deserialize<'de> for WalletSession {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawWalletSession::deserialize(deserializer)?;
        WalletSession::new(raw.name, raw.address, raw.balance).map_err(de::Error::custom)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WalletCreateRequest {
    pub username: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WalletCreateResponse {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub balance: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_incomplete_sessions() {
        assert_eq!(
            WalletSession::new("  ", "bc1qaddr", 1.0),
            Err(InvalidSession::EmptyName)
        );
        assert_eq!(
            WalletSession::new("alice", "", 1.0),
            Err(InvalidSession::EmptyAddress)
        );
        assert_eq!(
            WalletSession::new("alice", "bc1qaddr", f64::NAN),
            Err(InvalidSession::NonFiniteBalance)
        );
    }

    #[test]
    fn response_fallbacks_use_username_and_zero_balance() {
        let response = WalletCreateResponse {
            address: Some("bc1qalice".to_owned()),
            name: None,
            balance: None,
        };

        let session = WalletSession::from_create_response("alice", response).unwrap();
        assert_eq!(session.name(), "alice");
        assert_eq!(session.address(), "bc1qalice");
        assert_eq!(session.balance(), 0.0);
    }

    #[test]
    fn response_values_take_precedence_over_fallbacks() {
        let response = WalletCreateResponse {
            address: Some("bc1qcarol".to_owned()),
            name: Some("carol-main".to_owned()),
            balance: Some(6.25),
        };

        let session = WalletSession::from_create_response("carol", response).unwrap();
        assert_eq!(session.name(), "carol-main");
        assert_eq!(session.balance(), 6.25);
    }

    #[test]
    fn blank_response_name_falls_back_to_username() {
        let response = WalletCreateResponse {
            address: Some("bc1qdave".to_owned()),
            name: Some(" ".to_owned()),
            balance: Some(2.0),
        };

        let session = WalletSession::from_create_response("dave", response).unwrap();
        assert_eq!(session.name(), "dave");
    }

    #[test]
    fn response_without_address_is_rejected() {
        let response = WalletCreateResponse {
            address: None,
            name: Some("erin".to_owned()),
            balance: Some(0.0),
        };

        assert_eq!(
            WalletSession::from_create_response("erin", response),
            Err(InvalidSession::EmptyAddress)
        );
    }

    #[test]
    fn deserialization_enforces_the_session_shape() {
        let ok: WalletSession =
            serde_json::from_str(r#"{"name":"alice","address":"bc1q","balance":0}"#).unwrap();
        assert_eq!(ok, WalletSession::new("alice", "bc1q", 0.0).unwrap());

        assert!(serde_json::from_str::<WalletSession>(r#"{"name":"alice","balance":0}"#).is_err());
        assert!(
            serde_json::from_str::<WalletSession>(r#"{"name":"alice","address":"","balance":0}"#)
                .is_err()
        );
        assert!(
            serde_json::from_str::<WalletSession>(
                r#"{"name":"alice","address":"bc1q","balance":0,"extra":true}"#
            )
            .is_err()
        );
    }

    #[test]
    fn create_response_tolerates_missing_optional_fields() {
        let response: WalletCreateResponse = serde_json::from_str(r#"{"address":"bc1q"}"#).unwrap();
        assert_eq!(response.address.as_deref(), Some("bc1q"));
        assert!(response.name.is_none());
        assert!(response.balance.is_none());
    }
}
