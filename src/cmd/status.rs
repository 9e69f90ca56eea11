use crate::cmd::{print_json, prompts};
use crate::error::Result;
use crate::tools::status::{self, SERVICE_LINKS};
use clap::Args;
use colored::Colorize;

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Open link number N in the default browser
    #[arg(short, long, value_name = "N")]
    open: Option<usize>,

    /// Print the links as JSON
    #[arg(long)]
    json: bool,
}

pub async fn show(args: StatusArgs) -> Result<()> {
    if let Some(number) = args.open {
        let link = status::link_by_number(number)?;
        prompts::info(&format!("Opening {}", link.label.bold()));
        if let Err(e) = status::open_link(link) {
            prompts::warning(&format!("Could not launch a browser: {}", e));
            println!("  {}", link.url);
        }
        return Ok(());
    }

    if args.json {
        return print_json(&SERVICE_LINKS);
    }

    prompts::section_header(
        "Service Status",
        "Check the status of Microsoft 365 services",
    );
    for (idx, link) in SERVICE_LINKS.iter().enumerate() {
        println!("  {} {}", format!("{}.", idx + 1).dimmed(), link.label.bold());
        println!("     {}", link.url.cyan().underline());
    }
    println!(
        "\n{} Run {} to open one",
        "→".cyan(),
        "m365tools status --open <N>".bold()
    );

    Ok(())
}
