mod file_storage;

use std::io::{self, BufRead, Write as _};
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use sia_client::config::{ClientConfig, ConfigError};
use sia_client::net::api::ApiClient;
use sia_client::net::auth_api::AuthApi;
use sia_client::net::transport::{ReqwestTransport, TransportError};
use sia_client::pages::login::{
    SubmitError, refresh_session, register_account, sign_out, submit_login, sync_current_user,
};
use sia_client::state::auth::AuthStore;
use sia_client::storage::{SessionPersistence, StorageError};
use sia_client::util::roles::{display_name, primary_role, role_label};
use tracing_subscriber::EnvFilter;

use crate::file_storage::FileStore;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("http client setup failed: {0}")]
    Transport(#[from] TransportError),
    #[error("session file: {0}")]
    Storage(#[from] StorageError),
    #[error("{}", describe_submit(.0))]
    Submit(#[from] SubmitError),
    #[error("not signed in; run `sia login` first")]
    NotSignedIn,
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "sia", about = "SIA school-administration session CLI")]
struct Cli {
    /// Auth service origin; the `/api/v1` prefix is appended.
    #[arg(long, env = "PUBLIC_API_URL")]
    api_url: Option<String>,

    /// Where the session mirror is kept between runs.
    #[arg(long, env = "SIA_STATE_FILE", default_value = ".sia-session.json")]
    state_file: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and store the session.
    Login(LoginArgs),
    /// End the session remotely and locally.
    Logout,
    /// Fetch the current user from the server.
    Whoami,
    /// Show the stored session without contacting the server.
    Status,
    /// Exchange the refresh token for a new token pair.
    Refresh,
    /// Create an account.
    Register(RegisterArgs),
}

#[derive(Args, Debug)]
struct LoginArgs {
    #[arg(long)]
    email: String,
    /// Read from stdin when omitted.
    #[arg(long, env = "SIA_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

#[derive(Args, Debug)]
struct RegisterArgs {
    #[arg(long)]
    email: String,
    #[arg(long)]
    name: String,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long, env = "SIA_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

struct Session {
    api: AuthApi,
    store: AuthStore,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let session = open_session(&cli)?;

    match cli.command {
        Command::Login(args) => run_login(&session, args).await,
        Command::Logout => run_logout(&session).await,
        Command::Whoami => run_whoami(&session).await,
        Command::Status => {
            run_status(&session);
            Ok(())
        }
        Command::Refresh => run_refresh(&session).await,
        Command::Register(args) => run_register(&session, args).await,
    }
}

fn open_session(cli: &Cli) -> Result<Session, CliError> {
    let mut config = ClientConfig::from_env()?;
    if let Some(api_url) = &cli.api_url {
        config.api_url = api_url.trim_end_matches('/').to_owned();
    }

    let file = Arc::new(FileStore::open(&cli.state_file)?);
    tracing::debug!(path = %file.path().display(), api = %config.api_base(), "session opened");

    let transport = Arc::new(ReqwestTransport::new()?);
    let api = AuthApi::new(ApiClient::from_config(&config, transport));
    let store = AuthStore::new(SessionPersistence::new(file.clone(), file));
    store.initialize();
    Ok(Session { api, store })
}

async fn run_login(session: &Session, args: LoginArgs) -> Result<(), CliError> {
    let password = password_or_prompt(args.password)?;
    let user = submit_login(&session.api, &session.store, &args.email, &password).await?;
    tracing::info!(user_id = %user.user_id, "logged in");
    println!("Signed in as {} ({})", display_name(Some(&user)), role_label(primary_role(Some(&user))));
    Ok(())
}

async fn run_logout(session: &Session) -> Result<(), CliError> {
    if let Err(e) = sign_out(&session.api, &session.store).await {
        tracing::warn!(error = %e, "remote logout failed; local session cleared");
    }
    println!("Signed out");
    Ok(())
}

async fn run_whoami(session: &Session) -> Result<(), CliError> {
    if !session.store.is_authenticated() {
        return Err(CliError::NotSignedIn);
    }
    let user = sync_current_user(&session.api, &session.store).await?;
    println!("{}", serde_json::to_string_pretty(&user)?);
    Ok(())
}

fn run_status(session: &Session) {
    let state = session.store.get();
    if !state.is_authenticated {
        println!("Not signed in");
        return;
    }
    let user = state.user.as_ref();
    println!("Signed in as {}", display_name(user));
    println!("Role: {}", role_label(primary_role(user)));
    if let Some(email) = user.map(|u| u.email.as_str()) {
        println!("Email: {email}");
    }
    println!("Refresh token: {}", if state.refresh_token.is_some() { "present" } else { "missing" });
}

async fn run_refresh(session: &Session) -> Result<(), CliError> {
    if !session.store.is_authenticated() {
        return Err(CliError::NotSignedIn);
    }
    refresh_session(&session.api, &session.store).await?;
    println!("Session refreshed");
    Ok(())
}

async fn run_register(session: &Session, args: RegisterArgs) -> Result<(), CliError> {
    let password = password_or_prompt(args.password)?;
    let data = register_account(&session.api, &args.email, &password, &args.name, args.phone.as_deref()).await?;
    println!("{}", serde_json::to_string_pretty(&data)?);
    Ok(())
}

fn password_or_prompt(password: Option<String>) -> Result<String, CliError> {
    if let Some(password) = password {
        return Ok(password);
    }
    eprint!("Password: ");
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_owned())
}

fn describe_submit(error: &SubmitError) -> String {
    match error {
        SubmitError::Validation(errors) => {
            let lines: Vec<String> = errors
                .iter()
                .map(|(field, message)| format!("  {}: {message}", field.as_str()))
                .collect();
            format!("invalid input:\n{}", lines.join("\n"))
        }
        other => other.banner_message().unwrap_or_else(|| other.to_string()),
    }
}
