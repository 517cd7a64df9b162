use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::{confirm, output_empty_collection, output_json, output_success, prompt_line, value_or_prompt};
use crate::cli::{Context, OutputFormat};
use crate::forms::{NewUserForm, UserUpdateForm};
use crate::tree::SelectionState;
use crate::types::{RoleId, User, UserId};

#[derive(Subcommand)]
pub enum UserCommands {
    #[command(about = "List users")]
    List,

    #[command(about = "Show one user")]
    Show {
        #[arg(help = "User ID")]
        id: UserId,
    },

    #[command(about = "Create a user")]
    Create {
        #[arg(help = "Username")]
        username: String,
        #[arg(help = "Email")]
        email: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
        #[arg(long, help = "Repeat the password (will prompt if not provided)")]
        confirm: Option<String>,
        #[arg(long, value_delimiter = ',', help = "Role ids to toggle on")]
        role: Vec<RoleId>,
    },

    #[command(about = "Change a user's username or email")]
    Update {
        #[arg(help = "User ID")]
        id: UserId,
        #[arg(long, help = "New username")]
        username: Option<String>,
        #[arg(long, help = "New email")]
        email: Option<String>,
    },

    #[command(about = "Delete a user")]
    Delete {
        #[arg(help = "User ID")]
        id: UserId,
        #[arg(long, short = 'y', help = "Do not ask for confirmation")]
        yes: bool,
    },
}

pub async fn handle(cmd: UserCommands, ctx: &Context) -> anyhow::Result<()> {
    ctx.require_session()?;

    match cmd {
        UserCommands::List => {
            let users = ctx.client.list_users().await?;
            if users.is_empty() {
                return output_empty_collection(&ctx.output, "users", "No users found");
            }
            match ctx.output {
                OutputFormat::Json => output_json(&json!({ "users": users })),
                OutputFormat::Text => {
                    for user in &users {
                        print_user(user);
                    }
                    Ok(())
                }
            }
        }
        UserCommands::Show { id } => {
            let user = ctx.client.get_user(id).await?;
            match ctx.output {
                OutputFormat::Json => output_json(&json!({ "user": user })),
                OutputFormat::Text => {
                    print_user(&user);
                    Ok(())
                }
            }
        }
        UserCommands::Create { username, email, password, confirm, role } => {
            let password = value_or_prompt(password, "Password: ")?;
            let confirm_password = match confirm {
                Some(confirm) => confirm,
                None => prompt_line("Repeat password: ")?,
            };

            let mut roles = SelectionState::new();
            for id in role {
                roles.toggle_in_place(id);
            }

            let form = NewUserForm {
                username,
                email,
                password,
                confirm_password,
                roles,
            };
            let payload = form.to_payload()?;
            ctx.client.create_user(&payload).await?;
            output_success(
                &ctx.output,
                "User created",
                Some(json!({ "username": payload.username, "email": payload.email, "roles": payload.roles })),
            )
        }
        UserCommands::Update { id, username, email } => {
            let current = ctx.client.get_user(id).await?;
            let form = UserUpdateForm {
                username: username.unwrap_or(current.username),
                email: email.unwrap_or(current.email),
            };
            let payload = form.to_payload()?;
            ctx.client.update_user(id, &payload).await?;
            output_success(&ctx.output, "User updated", Some(json!({ "user": payload })))
        }
        UserCommands::Delete { id, yes } => {
            if !yes && !confirm(&format!("Delete user {}?", id))? {
                return output_success(&ctx.output, "Nothing deleted", None);
            }
            ctx.client.delete_user(id).await?;
            output_success(&ctx.output, &format!("User {} deleted", id), None)
        }
    }
}

fn print_user(user: &User) {
    let roles: Vec<&str> = user.roles.iter().map(|r| r.name.as_str()).collect();
    if roles.is_empty() {
        println!("#{} {} <{}> (no roles)", user.id, user.username, user.email);
    } else {
        println!("#{} {} <{}> roles: {}", user.id, user.username, user.email, roles.join(", "));
    }
}
