use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::{confirm, output_empty_collection, output_json, output_success, plural};
use crate::cli::{Context, OutputFormat};
use crate::forms::RoleForm;
use crate::tree::{render_rows, OrphanPolicy, SelectionState, TreeBuilder, TreeController};
use crate::types::{PermissionId, Role, RoleId};

#[derive(Subcommand)]
pub enum RoleCommands {
    #[command(about = "List roles with their permissions")]
    List,

    #[command(about = "Show one role")]
    Show {
        #[arg(help = "Role ID")]
        id: RoleId,
    },

    #[command(about = "Show the permission tree")]
    Tree {
        #[arg(long, value_delimiter = ',', help = "Permission ids to show as checked")]
        select: Vec<PermissionId>,
        #[arg(long, value_delimiter = ',', help = "Parent ids to expand")]
        expand: Vec<PermissionId>,
        #[arg(long, help = "Expand every parent")]
        expand_all: bool,
        #[arg(long, help = "Role whose permissions start checked")]
        role: Option<RoleId>,
        #[arg(long, help = "Records with an unknown parent: drop, promote or reject")]
        orphans: Option<OrphanPolicy>,
    },

    #[command(about = "Create a role")]
    Create {
        #[arg(help = "Role name")]
        name: String,
        #[arg(long, value_delimiter = ',', help = "Permission ids to toggle on")]
        access: Vec<PermissionId>,
    },

    #[command(about = "Rename a role or toggle its permissions")]
    Update {
        #[arg(help = "Role ID")]
        id: RoleId,
        #[arg(long, help = "New role name")]
        name: Option<String>,
        #[arg(long, value_delimiter = ',', help = "Permission ids to toggle")]
        toggle: Vec<PermissionId>,
    },

    #[command(about = "Delete a role")]
    Delete {
        #[arg(help = "Role ID")]
        id: RoleId,
        #[arg(long, short = 'y', help = "Do not ask for confirmation")]
        yes: bool,
    },
}

pub async fn handle(cmd: RoleCommands, ctx: &Context) -> anyhow::Result<()> {
    ctx.require_session()?;

    match cmd {
        RoleCommands::List => {
            let roles = ctx.client.list_roles().await?;
            if roles.is_empty() {
                return output_empty_collection(&ctx.output, "roles", "No roles configured");
            }
            match ctx.output {
                OutputFormat::Json => output_json(&json!({ "roles": roles })),
                OutputFormat::Text => {
                    for role in &roles {
                        print_role(role);
                    }
                    Ok(())
                }
            }
        }
        RoleCommands::Show { id } => {
            let role = ctx.client.get_role(id).await?;
            match ctx.output {
                OutputFormat::Json => output_json(&json!({ "role": role })),
                OutputFormat::Text => {
                    print_role(&role);
                    Ok(())
                }
            }
        }
        RoleCommands::Tree { select, expand, expand_all, role, orphans } => {
            let mut selection = match role {
                Some(role_id) => role_selection(&ctx.client.get_role(role_id).await?),
                None => SelectionState::new(),
            };
            for id in select {
                selection.toggle_in_place(id);
            }

            let records = ctx.client.list_permissions().await?;
            let policy = orphans.unwrap_or(ctx.app.tree.orphan_policy);
            let forest = TreeBuilder::new().orphan_policy(policy).build(&records)?;

            let mut controller = TreeController::new(forest).with_selection(selection);
            if expand_all {
                controller.expand_all();
            }
            for id in expand {
                controller.expand(id);
            }

            match ctx.output {
                OutputFormat::Json => output_json(&json!({
                    "permissions": controller.forest(),
                    "rows": render_rows(controller.forest(), controller.selection(), controller.expansion()),
                    "selected": controller.selection().ids().collect::<Vec<_>>(),
                })),
                OutputFormat::Text => {
                    println!("{}", controller.render_text());
                    Ok(())
                }
            }
        }
        RoleCommands::Create { name, access } => {
            let mut selection = SelectionState::new();
            for id in access {
                selection.toggle_in_place(id);
            }

            let payload = RoleForm::new(name, selection).to_payload()?;
            let message = ctx.client.create_role(&payload).await?;
            let message = if message.trim().is_empty() { "Role created".to_string() } else { message };
            output_success(&ctx.output, &message, Some(json!({ "role": payload })))
        }
        RoleCommands::Update { id, name, toggle } => {
            let role = ctx.client.get_role(id).await?;
            let mut selection = role_selection(&role);
            for access_id in toggle {
                selection.toggle_in_place(access_id);
            }

            let payload = RoleForm::new(name.unwrap_or(role.name), selection).to_payload()?;
            ctx.client.update_role(id, &payload).await?;
            output_success(&ctx.output, "Role updated", Some(json!({ "role": payload })))
        }
        RoleCommands::Delete { id, yes } => {
            if !yes && !confirm(&format!("Delete role {}?", id))? {
                return output_success(&ctx.output, "Nothing deleted", None);
            }
            ctx.client.delete_role(id).await?;
            output_success(&ctx.output, &format!("Role {} deleted", id), None)
        }
    }
}

/// Selection preloaded with a role's current permissions
pub fn role_selection(role: &Role) -> SelectionState {
    role.accesses.iter().map(|access| access.id).collect()
}

fn print_role(role: &Role) {
    println!(
        "#{} {} ({})",
        role.id,
        role.name,
        plural(role.accesses.len(), "access", "accesses")
    );
    if role.accesses.is_empty() {
        println!("    no permissions assigned");
    } else {
        let names: Vec<&str> = role.accesses.iter().map(|a| a.name.as_str()).collect();
        println!("    {}", names.join(", "));
    }
}
