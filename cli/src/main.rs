//! Command-line front end for the vitals dashboard API.
//!
//! Drives the same login, registration, Google Fit and dashboard flows as the
//! browser client, with a JSON file standing in for `localStorage`.

mod file_store;
mod http;


use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::Value;
use vitals::config::{BASE_URL_ENV, ClientConfig};
use vitals::dashboard::{DashboardQuery, DEFAULT_DAYS, LogChartRenderer, StatField};
use vitals::register::{RegisterError, RegistrationForm};
use vitals::strength::StrengthMeter;
use vitals::types::Credentials;
use vitals::{ApiError, session};

use crate::file_store::FileStore;
use crate::http::HttpTransport;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Register(#[from] RegisterError),
    #[error("failed to load dashboard data")]
    DashboardUnavailable,
    #[error("not logged in; run `vitals login` first")]
    NotLoggedIn,
    #[error("http client error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "vitals", about = "Health dashboard API CLI")]
struct Cli {
    #[arg(long, env = BASE_URL_ENV, default_value = "http://127.0.0.1:8000")]
    base_url: String,

    #[arg(long, env = "VITALS_SESSION_FILE", default_value = ".vitals-session.json")]
    session_file: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and store the session token.
    Login {
        username: String,
        #[arg(long, env = "VITALS_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account.
    Register {
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "VITALS_PASSWORD", hide_env_values = true)]
        password: String,
        /// Defaults to `--password`.
        #[arg(long)]
        confirm_password: Option<String>,
        #[arg(long, default_value_t = false)]
        accept_terms: bool,
    },
    /// Print the Google Fit authorization URL.
    GoogleFit,
    /// Print the dashboard stats.
    Dashboard {
        #[arg(long, default_value_t = DEFAULT_DAYS)]
        days: u32,
    },
    /// Show the account behind the stored token.
    Whoami {
        /// Print the user saved at login instead of asking the server.
        #[arg(long, default_value_t = false)]
        local: bool,
    },
    /// End the session and forget the stored token.
    Logout,
    /// Score a password without sending it anywhere.
    Strength { password: String },
}

struct CliContext {
    transport: HttpTransport,
    store: FileStore,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let ctx = CliContext {
        transport: HttpTransport::new(ClientConfig::new(&cli.base_url))?,
        store: FileStore::new(cli.session_file),
    };

    match cli.command {
        Command::Login { username, password } => run_login(&ctx, Credentials::new(username, password)).await,
        Command::Register { username, email, password, confirm_password, accept_terms } => {
            let form = RegistrationForm {
                username,
                email,
                confirm_password: confirm_password.unwrap_or_else(|| password.clone()),
                password,
                terms_accepted: accept_terms,
            };
            run_register(&ctx, form).await
        }
        Command::GoogleFit => run_google_fit(&ctx).await,
        Command::Dashboard { days } => run_dashboard(&ctx, DashboardQuery { days }).await,
        Command::Whoami { local } => run_whoami(&ctx, local).await,
        Command::Logout => run_logout(&ctx).await,
        Command::Strength { password } => {
            println!("{}", strength_report(&password));
            Ok(())
        }
    }
}

async fn run_login(ctx: &CliContext, credentials: Credentials) -> Result<(), CliError> {
    let outcome = vitals::login::submit_login(&ctx.transport, &ctx.store, credentials).await?;
    println!("{} {}", outcome.notice.title, outcome.notice.text);
    println!("logged in as {}", outcome.session.user.display_name());
    Ok(())
}

async fn run_register(ctx: &CliContext, form: RegistrationForm) -> Result<(), CliError> {
    vitals::register::submit_registration(&ctx.transport, form).await?;
    let notice = vitals::login::registration_success_notice();
    println!("{} {}", notice.title, notice.text);
    Ok(())
}

async fn run_google_fit(ctx: &CliContext) -> Result<(), CliError> {
    if session::access_token(&ctx.store).is_none() {
        return Err(CliError::NotLoggedIn);
    }
    match vitals::login::start_google_fit_auth(&ctx.transport, &ctx.store).await {
        Ok(Some(url)) => println!("{url}"),
        Ok(None) => println!("server returned no authorization URL"),
        Err(e) => {
            let notice = vitals::login::google_fit_error_notice(&e);
            eprintln!("{}: {}", notice.title, notice.text);
            return Err(e.into());
        }
    }
    Ok(())
}

async fn run_dashboard(ctx: &CliContext, query: DashboardQuery) -> Result<(), CliError> {
    let mut cards = BTreeMap::new();
    vitals::dashboard::load_dashboard(&ctx.transport, &ctx.store, query, &mut cards, &LogChartRenderer)
        .await
        .ok_or(CliError::DashboardUnavailable)?;
    println!("{}", render_stats(&cards));
    Ok(())
}

async fn run_whoami(ctx: &CliContext, local: bool) -> Result<(), CliError> {
    let user = if local {
        session::load_session(&ctx.store).ok_or(CliError::NotLoggedIn)?.user
    } else {
        vitals::login::fetch_current_user(&ctx.transport, &ctx.store).await?
    };
    print_json(&serde_json::to_value(&user)?)
}

async fn run_logout(ctx: &CliContext) -> Result<(), CliError> {
    vitals::login::logout(&ctx.transport, &ctx.store).await?;
    println!("logged out");
    Ok(())
}

fn render_stats(cards: &BTreeMap<StatField, String>) -> String {
    StatField::ALL
        .into_iter()
        .filter_map(|field| cards.get(&field).map(|text| format!("{:<14} {text}", field.label())))
        .collect::<Vec<_>>()
        .join("\n")
}

fn strength_report(password: &str) -> String {
    let meter = StrengthMeter::measure(password);
    format!("{}/100 {} ({})", meter.score, meter.band.label(), meter.band.hint())
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
