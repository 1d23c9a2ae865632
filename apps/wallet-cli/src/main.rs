use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;
use ws_session_core::{SessionController, SessionState, SubmitError};
use ws_session_store::{RocksDbSlot, SessionStore};
use ws_wallet_client::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, HttpWalletCreator};

#[derive(Debug, Parser)]
#[command(name = "wallet-cli", version, about = "Create a wallet and keep its session across runs")]
struct Cli {
    /// Base URL of the wallet service; `/wallet/create` is appended.
    #[arg(long, env = "WALLET_SERVICE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// RocksDB directory holding the session slot. One directory per profile.
    #[arg(long, env = "WALLET_SESSION_DB", default_value = "./wallet-session-db")]
    session_db: PathBuf,

    /// Request timeout in seconds, 0 disables it.
    #[arg(long, env = "WALLET_REQUEST_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show the current wallet session.
    Status,
    /// Create a wallet under the given name.
    Create { name: String },
    /// Forget the current wallet session.
    Logout,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let slot = RocksDbSlot::open_default(&cli.session_db).with_context(|| {
        format!("failed to open session database at {}", cli.session_db.display())
    })?;
    let creator = HttpWalletCreator::new(ClientConfig {
        base_url: cli.base_url.clone(),
        timeout: (cli.timeout_secs > 0).then(|| Duration::from_secs(cli.timeout_secs)),
    })?;
    info!(url = creator.url(), db = %cli.session_db.display(), "wallet-cli starting");

    let mut controller = SessionController::init(SessionStore::new(slot), creator);

    let code = match cli.command {
        Command::Status => {
            println!("{}", render(controller.state()));
            ExitCode::SUCCESS
        }
        Command::Create { name } => match controller.submit(&name).await.map(|_| ()) {
            Ok(()) => {
                let state = controller.state();
                println!("{}", render(state));
                exit_code(state)
            }
            Err(err @ SubmitError::SessionActive) => {
                eprintln!("{err}");
                println!("{}", render(controller.state()));
                ExitCode::FAILURE
            }
            Err(err) => {
                eprintln!("{err}");
                ExitCode::from(2)
            }
        },
        Command::Logout => {
            controller.logout()?;
            println!("{}", render(controller.state()));
            ExitCode::SUCCESS
        }
    };

    Ok(code)
}

fn exit_code(state: &SessionState) -> ExitCode {
    match state {
        SessionState::CreationFailed { .. } => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    }
}

fn render(state: &SessionState) -> String {
    match state {
        SessionState::NoSession => "No wallet session. Run `wallet-cli create <NAME>`.".to_owned(),
        SessionState::Creating { pending } => {
            format!("Creating wallet for {}...", pending.username())
        }
        SessionState::Active { session } => format!(
            "Wallet: {}\nAddress: {}\nBalance: {}",
            session.name(),
            session.address(),
            session.balance()
        ),
        SessionState::CreationFailed { error } => error.user_message().to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use ws_api_types::WalletSession;
    use ws_session_core::CreationError;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_apply_without_flags() {
        let cli = Cli::try_parse_from(["wallet-cli", "status"]).unwrap();

        assert_eq!(cli.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert!(matches!(cli.command, Command::Status));
    }

    #[test]
    fn parses_create_with_overrides() {
        let cli = Cli::try_parse_from([
            "wallet-cli",
            "--base-url",
            "http://wallet.local",
            "--timeout-secs",
            "0",
            "create",
            "alice",
        ])
        .unwrap();

        assert_eq!(cli.base_url, "http://wallet.local");
        assert_eq!(cli.timeout_secs, 0);
        assert!(matches!(cli.command, Command::Create { ref name } if name == "alice"));
    }

    #[test]
    fn renders_active_session() {
        let session = WalletSession::new("alice", "bc1qalice", 6.25).unwrap();
        let text = render(&SessionState::Active { session });

        assert_eq!(text, "Wallet: alice\nAddress: bc1qalice\nBalance: 6.25");
    }

    #[test]
    fn failures_render_the_generic_message() {
        let network = SessionState::CreationFailed {
            error: CreationError::Network {
                status: Some(500),
                message: "internal".to_owned(),
            },
        };
        let malformed = SessionState::CreationFailed {
            error: CreationError::MalformedResponse("missing address".to_owned()),
        };

        assert_eq!(render(&network), render(&malformed));
        assert_eq!(exit_code(&network), ExitCode::FAILURE);
    }
}
