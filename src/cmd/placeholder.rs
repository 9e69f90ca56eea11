use crate::cmd::prompts;
use crate::error::Result;
use crate::tools::placeholder::{COMING_SOON, GROUP_MEMBERSHIP, LICENSE_LOOKUP, Placeholder};
use colored::Colorize;

fn announce(tool: &Placeholder) {
    prompts::section_header(tool.title, tool.description);
    println!("{}", COMING_SOON.yellow());
}

pub async fn license() -> Result<()> {
    announce(&LICENSE_LOOKUP);
    Ok(())
}

pub async fn groups() -> Result<()> {
    announce(&GROUP_MEMBERSHIP);
    Ok(())
}
