use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::{output_empty_collection, output_json};
use crate::cli::{Context, OutputFormat};

#[derive(Subcommand)]
pub enum SupplierCommands {
    #[command(about = "List suppliers")]
    List,
}

pub async fn handle(cmd: SupplierCommands, ctx: &Context) -> anyhow::Result<()> {
    ctx.require_session()?;

    match cmd {
        SupplierCommands::List => {
            let suppliers = ctx.client.list_suppliers().await?;
            if suppliers.is_empty() {
                return output_empty_collection(&ctx.output, "suppliers", "No suppliers found");
            }
            match ctx.output {
                OutputFormat::Json => output_json(&json!({ "suppliers": suppliers })),
                OutputFormat::Text => {
                    for supplier in &suppliers {
                        let id = supplier.get("id").map(|v| v.to_string()).unwrap_or_default();
                        let name = supplier
                            .get("name")
                            .and_then(|v| v.as_str())
                            .map(str::to_string)
                            .unwrap_or_else(|| supplier.to_string());
                        println!("#{} {}", id, name);
                    }
                    Ok(())
                }
            }
        }
    }
}
