use crate::cmd::{print_json, progress, prompts};
use crate::config::Config;
use crate::error::{Result, ToolsError};
use crate::form::{AsyncForm, FormPhase};
use crate::http::{Fetcher, HttpClient};
use crate::tools::dns::{self, DnsCheckState};
use clap::Args;
use colored::Colorize;

#[derive(Args, Debug)]
pub struct DnsArgs {
    /// Domain to check (prompted for if omitted)
    domain: Option<String>,

    /// DNS-over-HTTPS JSON endpoint
    #[arg(long)]
    endpoint: Option<String>,

    /// DKIM selector to probe
    #[arg(long)]
    selector: Option<String>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

pub async fn check(args: DnsArgs, config: &Config) -> Result<()> {
    let domain = dns::normalize_domain(&prompts::value_or_prompt(args.domain, "Domain")?);
    if domain.is_empty() {
        return Err(ToolsError::InvalidInput("a domain is required".into()));
    }

    let endpoint = args.endpoint.unwrap_or_else(|| config.doh_endpoint.clone());
    let selector = args.selector.unwrap_or_else(|| config.dkim_selector.clone());
    let client = HttpClient::from_config(config)?;

    let spinner = if args.json {
        progress::hidden_spinner()
    } else {
        progress::create_spinner(&format!("Checking DNS records for {}...", domain))
    };

    let form = submit_check(&client, &endpoint, &selector, domain.clone()).await;

    let state = match form.phase() {
        FormPhase::Ready(state @ DnsCheckState::Result { .. }) => state,
        FormPhase::Failed(message) => {
            progress::finish_spinner_error(&spinner, "Check failed");
            return Err(ToolsError::ToolFailed(message.clone()));
        }
        FormPhase::Ready(_) | FormPhase::Idle | FormPhase::Loading => {
            spinner.finish_and_clear();
            return Ok(());
        }
    };
    progress::finish_spinner_success(&spinner, &format!("DNS records for {}", domain));

    if args.json {
        return print_json(&serde_json::json!({
            "domain": domain,
            "dkim_selector": selector,
            "state": state,
        }));
    }

    println!();
    for (label, found) in state.rows() {
        let marker = if found { "✓".green() } else { "✗".red() };
        let status = if found {
            dns::found_label(found).green()
        } else {
            dns::found_label(found).red()
        };
        println!("  {} {:<6} {}", marker, label.bold(), status);
    }
    println!(
        "\n  {} DKIM probed at {}",
        "→".dimmed(),
        dns::dkim_name(&selector, &domain).dimmed()
    );

    Ok(())
}

/// Run one check through the DNS form
async fn submit_check(
    fetcher: &dyn Fetcher,
    endpoint: &str,
    selector: &str,
    domain: String,
) -> AsyncForm<String, DnsCheckState> {
    let mut form = AsyncForm::new(domain);
    form.submit(|domain| async move {
        dns::check_domain(fetcher, endpoint, selector, &domain)
            .await
            .into_outcome()
    })
    .await;
    form
}
