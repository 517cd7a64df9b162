pub mod commands;
pub mod config;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::api::ApiClient;
use crate::auth::{CookieSessionProbe, SessionProbe, SessionStatus};
use crate::config::AppConfig;
use crate::error::ApiError;
use config::{SessionConfig, SessionStore};

#[derive(Parser)]
#[command(name = "admin")]
#[command(about = "Admin console - users, roles and permissions on the backend")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Login, registration and password reset")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "Roles and their permissions")]
    Role {
        #[command(subcommand)]
        cmd: commands::role::RoleCommands,
    },

    #[command(about = "User management")]
    User {
        #[command(subcommand)]
        cmd: commands::user::UserCommands,
    },

    #[command(about = "Supplier listing")]
    Supplier {
        #[command(subcommand)]
        cmd: commands::supplier::SupplierCommands,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

/// Everything a command needs: configuration, the stored session and a
/// client already carrying the session cookie.
pub struct Context {
    pub app: AppConfig,
    pub store: SessionStore,
    pub session: SessionConfig,
    pub client: ApiClient,
    pub output: OutputFormat,
}

impl Context {
    pub fn new(app: AppConfig, store: SessionStore, output: OutputFormat) -> anyhow::Result<Self> {
        let session = store.load()?;
        let token = session.token_for(&app.client.base_url).map(str::to_string);
        let client = ApiClient::new(app.client.clone())?.with_session_token(token);

        Ok(Self {
            app,
            store,
            session,
            client,
            output,
        })
    }

    pub fn probe(&self) -> CookieSessionProbe {
        CookieSessionProbe::from_token(self.client.session_token().as_deref())
    }

    /// Gate for protected commands
    pub fn require_session(&self) -> anyhow::Result<()> {
        match self.probe().check_session() {
            SessionStatus::Authenticated => Ok(()),
            SessionStatus::Unauthenticated => {
                anyhow::bail!("Not logged in. Run `admin auth login <username>` first")
            }
        }
    }

    /// Store whatever session cookie the client holds now
    pub fn persist_session(&mut self, username: Option<String>) -> anyhow::Result<()> {
        self.session = SessionConfig::new(self.client.session_token(), username, self.app.client.base_url.clone());
        self.store.save(&self.session)
    }

    pub fn clear_session(&mut self) -> anyhow::Result<()> {
        self.client.set_session_token(None);
        self.session = SessionConfig::default();
        self.store.clear()
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let mut ctx = Context::new(AppConfig::from_env(), SessionStore::from_env()?, output_format)?;
    dispatch(cli.command, &mut ctx).await
}

/// Run one command against an existing context
pub async fn dispatch(command: Commands, ctx: &mut Context) -> anyhow::Result<()> {
    let result = match command {
        Commands::Auth { cmd } => commands::auth::handle(cmd, ctx).await,
        Commands::Role { cmd } => commands::role::handle(cmd, ctx).await,
        Commands::User { cmd } => commands::user::handle(cmd, ctx).await,
        Commands::Supplier { cmd } => commands::supplier::handle(cmd, ctx).await,
    };

    // A 401 means the stored cookie is no longer accepted
    match result {
        Err(err) if err.downcast_ref::<ApiError>().is_some_and(ApiError::is_unauthorized) => {
            ctx.clear_session()?;
            Err(err.context("Session expired or invalid. Log in again with `admin auth login`"))
        }
        other => other,
    }
}
