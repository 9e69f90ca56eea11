use crate::cmd::{copy_to_clipboard, print_json, progress, prompts};
use crate::config::Config;
use crate::error::{Result, ToolsError};
use crate::form::{AsyncForm, FormPhase};
use crate::http::{Fetcher, HttpClient};
use crate::tools::tenant::{self, TENANT_LOOKUP_ERROR, TenantLookup};
use clap::Args;
use colored::Colorize;

#[derive(Args, Debug)]
pub struct TenantLookupArgs {
    /// Email address on the tenant's domain (prompted for if omitted)
    email: Option<String>,

    /// Identity authority hosting the discovery document
    #[arg(long)]
    authority: Option<String>,

    /// Copy the tenant ID to the clipboard
    #[arg(short, long)]
    copy: bool,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

pub async fn lookup(args: TenantLookupArgs, config: &Config) -> Result<()> {
    let email = prompts::value_or_prompt(args.email, "Email address")?;
    let authority = args
        .authority
        .unwrap_or_else(|| config.login_authority.clone());
    let client = HttpClient::from_config(config)?;

    let spinner = if args.json {
        progress::hidden_spinner()
    } else {
        progress::create_spinner("Looking up...")
    };

    let form = submit_lookup(&client, &authority, email).await;
    let lookup = match form.phase() {
        FormPhase::Ready(lookup) => lookup,
        FormPhase::Failed(message) => {
            progress::finish_spinner_error(&spinner, "Lookup failed");
            return Err(ToolsError::ToolFailed(message.clone()));
        }
        FormPhase::Idle | FormPhase::Loading => {
            progress::finish_spinner_error(&spinner, "Lookup failed");
            return Err(ToolsError::ToolFailed(TENANT_LOOKUP_ERROR.into()));
        }
    };

    if args.json {
        print_json(lookup)?;
    } else {
        progress::finish_spinner_success(&spinner, &format!("Found tenant for {}", lookup.domain));
        println!("\n{}", "Tenant ID:".bold());
        println!("  {}", lookup.tenant_id.cyan());
        println!("  {} {}", "Issuer:".dimmed(), lookup.issuer.dimmed());
    }

    if args.copy || config.copy_on_success {
        copy_to_clipboard(&lookup.tenant_id);
    }

    Ok(())
}

/// Run one lookup through the tenant form. A blank email leaves it idle.
async fn submit_lookup(
    fetcher: &dyn Fetcher,
    authority: &str,
    email: String,
) -> AsyncForm<String, TenantLookup> {
    let mut form = AsyncForm::new(email);
    form.submit(|email| async move {
        tenant::lookup_tenant_for_display(fetcher, authority, &email).await
    })
    .await;
    form
}
