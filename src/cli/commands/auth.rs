use clap::Subcommand;
use serde_json::json;

use crate::auth::{peek_claims, SessionProbe};
use crate::cli::utils::{output_success, prompt_line, value_or_prompt};
use crate::cli::{Context, OutputFormat};
use crate::forms::{is_valid_email, NewPasswordForm, ValidationError};

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Login to the backend")]
    Login {
        #[arg(help = "Username")]
        username: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Forget the stored session")]
    Logout,

    #[command(about = "Show current authentication status")]
    Status,

    #[command(about = "Register new user")]
    Register {
        #[arg(help = "Username")]
        username: String,
        #[arg(help = "Email")]
        email: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Confirm a registration with the emailed token")]
    Confirm {
        #[arg(help = "Activation token")]
        token: String,
    },

    #[command(about = "Request a password reset email")]
    ResetPassword {
        #[arg(help = "Account email")]
        email: String,
    },

    #[command(about = "Set a new password with the emailed reset token")]
    NewPassword {
        #[arg(help = "Reset token")]
        token: String,
        #[arg(long, help = "New password (will prompt if not provided)")]
        password: Option<String>,
        #[arg(long, help = "Repeat the new password (will prompt if not provided)")]
        confirm: Option<String>,
    },
}

pub async fn handle(cmd: AuthCommands, ctx: &mut Context) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Login { username, password } => {
            let password = value_or_prompt(password, "Password: ")?;
            let token = ctx.client.login(&username, &password).await?;

            if token.is_none() {
                anyhow::bail!("Login accepted but the backend did not set a session cookie");
            }

            ctx.persist_session(Some(username.clone()))?;
            output_success(
                &ctx.output,
                &format!("Logged in as {}", username),
                Some(json!({ "username": username, "backend": ctx.app.client.base_url })),
            )
        }
        AuthCommands::Logout => {
            ctx.clear_session()?;
            output_success(&ctx.output, "Logged out", None)
        }
        AuthCommands::Status => status(ctx),
        AuthCommands::Register { username, email, password } => {
            if !is_valid_email(email.trim()) {
                return Err(ValidationError::InvalidEmail.into());
            }
            let password = value_or_prompt(password, "Password: ")?;
            let message = ctx.client.register(username.trim(), email.trim(), &password).await?;
            output_success(&ctx.output, &non_empty(message, "Registered. Check your email to activate the account"), None)
        }
        AuthCommands::Confirm { token } => {
            let message = ctx.client.confirm_registration(&token).await?;
            output_success(&ctx.output, &non_empty(message, "Registration confirmed, you can now log in"), None)
        }
        AuthCommands::ResetPassword { email } => {
            ctx.client.request_password_reset(email.trim()).await?;
            output_success(
                &ctx.output,
                "If the email exists, you will receive instructions to reset your password",
                None,
            )
        }
        AuthCommands::NewPassword { token, password, confirm } => {
            let password = value_or_prompt(password, "New password: ")?;
            let confirm_password = match confirm {
                Some(confirm) => confirm,
                None => prompt_line("Repeat new password: ")?,
            };

            let form = NewPasswordForm {
                token: Some(token),
                password,
                confirm_password,
            };
            let (token, password) = form.validate()?;
            let message = ctx.client.reset_password(&token, &password).await?;
            output_success(&ctx.output, &non_empty(message, "Password updated"), None)
        }
    }
}

fn status(ctx: &Context) -> anyhow::Result<()> {
    let status = ctx.probe().check_session();
    let expires_at = ctx
        .client
        .session_token()
        .and_then(|token| peek_claims(&token))
        .and_then(|claims| claims.exp)
        .and_then(|exp| chrono::DateTime::from_timestamp(exp, 0));

    match ctx.output {
        OutputFormat::Json => crate::cli::utils::output_json(&json!({
            "status": status,
            "username": ctx.session.username,
            "backend": ctx.app.client.base_url,
            "saved_at": ctx.session.saved_at,
            "expires_at": expires_at,
        })),
        OutputFormat::Text => {
            if status.is_authenticated() {
                println!("Logged in as {}", ctx.session.username.as_deref().unwrap_or("(unknown user)"));
            } else {
                println!("Not logged in");
            }
            println!("Backend: {}", ctx.app.client.base_url);
            if let Some(saved_at) = ctx.session.saved_at {
                println!("Session saved: {}", saved_at.to_rfc3339());
            }
            if let Some(expires_at) = expires_at {
                println!("Token expires: {}", expires_at.to_rfc3339());
            }
            Ok(())
        }
    }
}

fn non_empty(message: String, fallback: &str) -> String {
    if message.trim().is_empty() {
        fallback.to_string()
    } else {
        message
    }
}
