use crate::cmd::{copy_to_clipboard, print_json, prompts};
use crate::config::Config;
use crate::error::Result;
use crate::tools::upn::{UpnInput, generate_upn};
use clap::Args;
use colored::Colorize;

#[derive(Args, Debug)]
pub struct UpnArgs {
    /// First name
    first: Option<String>,

    /// Last name
    last: Option<String>,

    /// Domain, used as given (e.g. contoso.com)
    domain: Option<String>,

    /// Copy the UPN to the clipboard
    #[arg(short, long)]
    copy: bool,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

pub async fn generate(args: UpnArgs, config: &Config) -> Result<()> {
    let input = UpnInput {
        first: prompts::value_or_prompt(args.first, "First name")?,
        last: prompts::value_or_prompt(args.last, "Last name")?,
        domain: prompts::value_or_prompt(args.domain, "Domain")?,
    };

    let upn = generate_upn(&input)?;

    if args.json {
        print_json(&serde_json::json!({ "input": input, "upn": upn }))?;
    } else {
        println!("{}", "Generated UPN:".bold());
        println!("  {}", upn.cyan());
    }

    if args.copy || config.copy_on_success {
        copy_to_clipboard(&upn);
    }

    Ok(())
}
